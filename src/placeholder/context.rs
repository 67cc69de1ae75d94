//! Rendering context - who and where a template is rendered for.
//!
//! The engine never talks to Discord directly. Callers take snapshots of the
//! user, member, guild and channel involved in an interaction or gateway
//! event, and may attach a [`GuildDirectory`] for placeholders that need a
//! network lookup. Any part may be missing; placeholders bound to a missing
//! part resolve to `"Unknown"`.

use crate::errors::Result;
use chrono::{DateTime, Utc};
use poise::BoxFuture;
use std::sync::Arc;

/// Identity fields of a Discord user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSnapshot {
    /// Snowflake id
    pub id: u64,
    /// Unique username
    pub username: String,
    /// Display name chosen by the user, if any
    pub global_name: Option<String>,
    /// Legacy discriminator (`None` for migrated accounts)
    pub discriminator: Option<u16>,
    /// Avatar URL, falling back to the default avatar
    pub avatar_url: String,
    /// Profile banner URL
    pub banner_url: Option<String>,
    /// Account creation time
    pub created_at: DateTime<Utc>,
    /// Whether the account is a bot
    pub bot: bool,
}

impl UserSnapshot {
    /// `<@id>` mention markup
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    /// Global display name or the username
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }

    /// `username#1234` for legacy accounts, the bare username otherwise
    #[must_use]
    pub fn tag(&self) -> String {
        match self.discriminator {
            Some(discriminator) => format!("{}#{discriminator:04}", self.username),
            None => self.username.clone(),
        }
    }
}

/// A guild role, as far as placeholders care
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSnapshot {
    /// Role name
    pub name: String,
    /// RGB color, 0 when the role is uncolored
    pub color: u32,
    /// Position in the role hierarchy
    pub position: u16,
}

/// The guild-member projection of a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSnapshot {
    /// Server nickname
    pub nickname: Option<String>,
    /// When the member joined
    pub joined_at: Option<DateTime<Utc>>,
    /// Roles held, `@everyone` excluded
    pub roles: Vec<RoleSnapshot>,
    /// Resolved permission names, when the platform supplied them
    pub permissions: Option<Vec<String>>,
    /// Nickname, global name, or username
    pub display_name: String,
}

impl MemberSnapshot {
    /// Role with the highest position
    #[must_use]
    pub fn highest_role(&self) -> Option<&RoleSnapshot> {
        self.roles.iter().max_by_key(|role| role.position)
    }

    /// Color of the highest colored role as `#rrggbb`, `#000000` when none
    #[must_use]
    pub fn display_hex_color(&self) -> String {
        let color = self
            .roles
            .iter()
            .filter(|role| role.color != 0)
            .max_by_key(|role| role.position)
            .map_or(0, |role| role.color);
        format!("#{color:06x}")
    }
}

/// Guild (server) fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildSnapshot {
    /// Snowflake id
    pub id: u64,
    /// Guild name
    pub name: String,
    /// Approximate member count
    pub member_count: u64,
    /// Icon URL
    pub icon_url: Option<String>,
    /// Owner's user id
    pub owner_id: u64,
    /// Verification level name (e.g. `High`)
    pub verification_level: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Number of boosts
    pub boost_count: Option<u64>,
    /// Boost tier, 0 to 3
    pub boost_tier: u8,
    /// Community description
    pub description: Option<String>,
    /// System channel id
    pub system_channel_id: Option<u64>,
    /// Vanity invite code
    pub vanity_url_code: Option<String>,
    /// Banner URL
    pub banner_url: Option<String>,
}

/// Channel fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSnapshot {
    /// Snowflake id
    pub id: u64,
    /// Channel name, absent for DMs
    pub name: Option<String>,
    /// Age restriction flag, absent for channel kinds without one
    pub nsfw: Option<bool>,
    /// Channel type name (e.g. `text`, `voice`)
    pub kind: String,
    /// Owning guild, absent for DMs
    pub guild_id: Option<u64>,
}

impl ChannelSnapshot {
    /// `<#id>` mention markup
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }

    /// Jump URL of the channel
    #[must_use]
    pub fn url(&self) -> String {
        match self.guild_id {
            Some(guild_id) => format!("https://discord.com/channels/{guild_id}/{}", self.id),
            None => format!("https://discord.com/channels/@me/{}", self.id),
        }
    }
}

/// Async lookups a placeholder may need beyond the snapshots.
pub trait GuildDirectory: Send + Sync {
    /// Fetches the current owner of a guild.
    fn fetch_owner<'a>(
        &'a self,
        guild_id: u64,
        owner_id: u64,
    ) -> BoxFuture<'a, Result<UserSnapshot>>;
}

/// Everything a render can draw placeholder values from.
#[derive(Clone, Default)]
pub struct RenderContext {
    /// Acting or target user
    pub user: Option<UserSnapshot>,
    /// Guild-member projection of the user
    pub member: Option<MemberSnapshot>,
    /// Guild the render happens in
    pub guild: Option<GuildSnapshot>,
    /// Channel the render happens in
    pub channel: Option<ChannelSnapshot>,
    /// Network-backed lookups
    pub directory: Option<Arc<dyn GuildDirectory>>,
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("user", &self.user.as_ref().map(|u| u.id))
            .field("guild", &self.guild.as_ref().map(|g| g.id))
            .field("channel", &self.channel.as_ref().map(|c| c.id))
            .field("member", &self.member.is_some())
            .field("directory", &self.directory.is_some())
            .finish()
    }
}

impl RenderContext {
    /// Context with nothing populated
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_user(mut self, user: UserSnapshot) -> Self {
        self.user = Some(user);
        self
    }

    #[must_use]
    pub fn with_member(mut self, member: MemberSnapshot) -> Self {
        self.member = Some(member);
        self
    }

    #[must_use]
    pub fn with_guild(mut self, guild: GuildSnapshot) -> Self {
        self.guild = Some(guild);
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel: ChannelSnapshot) -> Self {
        self.channel = Some(channel);
        self
    }

    #[must_use]
    pub fn with_directory(mut self, directory: Arc<dyn GuildDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_channel, sample_member, sample_user};

    #[test]
    fn test_user_tag_and_display_name() {
        let mut user = sample_user();
        assert_eq!(user.tag(), "herald_fan");
        assert_eq!(user.display_name(), "Herald Fan");

        user.discriminator = Some(7);
        user.global_name = None;
        assert_eq!(user.tag(), "herald_fan#0007");
        assert_eq!(user.display_name(), "herald_fan");
    }

    #[test]
    fn test_member_highest_role_and_color() {
        let member = sample_member();
        assert_eq!(member.highest_role().map(|r| r.name.as_str()), Some("Moderator"));
        // Moderator is uncolored, so the next colored role wins
        assert_eq!(member.display_hex_color(), "#3498db");

        let bare = MemberSnapshot {
            roles: Vec::new(),
            ..member
        };
        assert!(bare.highest_role().is_none());
        assert_eq!(bare.display_hex_color(), "#000000");
    }

    #[test]
    fn test_channel_url() {
        let mut channel = sample_channel();
        assert_eq!(channel.url(), "https://discord.com/channels/42/77");
        channel.guild_id = None;
        assert_eq!(channel.url(), "https://discord.com/channels/@me/77");
    }
}
