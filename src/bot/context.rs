//! Builds rendering contexts from serenity models.
//!
//! Cache references are not `Send`, so everything needed from the cache is
//! copied into snapshots before the first `.await`.

use crate::{
    bot::BotData,
    errors::{Error, Result},
    placeholder::{
        ChannelSnapshot, GuildDirectory, GuildSnapshot, MemberSnapshot, RenderContext,
        RoleSnapshot, UserSnapshot,
    },
};
use chrono::{DateTime, Utc};
use poise::{BoxFuture, serenity_prelude as serenity};
use std::{collections::HashMap, sync::Arc};

fn to_utc(timestamp: serenity::Timestamp) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp.unix_timestamp(), 0).unwrap_or_default()
}

/// Snapshot of a user
#[must_use]
pub fn user_snapshot(user: &serenity::User) -> UserSnapshot {
    UserSnapshot {
        id: user.id.get(),
        username: user.name.clone(),
        global_name: user.global_name.clone(),
        discriminator: user.discriminator.map(std::num::NonZeroU16::get),
        avatar_url: user.face(),
        banner_url: user.banner_url(),
        created_at: to_utc(user.created_at()),
        bot: user.bot,
    }
}

/// Snapshot of a member; `roles` is the guild's role table.
#[must_use]
pub fn member_snapshot(
    member: &serenity::Member,
    roles: &HashMap<serenity::RoleId, serenity::Role>,
) -> MemberSnapshot {
    MemberSnapshot {
        nickname: member.nick.clone(),
        joined_at: member.joined_at.map(to_utc),
        roles: member
            .roles
            .iter()
            .filter_map(|id| roles.get(id))
            .map(|role| RoleSnapshot {
                name: role.name.clone(),
                color: role.colour.0,
                position: role.position,
            })
            .collect(),
        permissions: member.permissions.map(|permissions| {
            permissions
                .get_permission_names()
                .into_iter()
                .map(str::to_string)
                .collect()
        }),
        display_name: member.display_name().to_string(),
    }
}

/// Snapshot of a cached guild
#[must_use]
pub fn guild_snapshot(guild: &serenity::Guild) -> GuildSnapshot {
    GuildSnapshot {
        id: guild.id.get(),
        name: guild.name.clone(),
        member_count: guild.member_count,
        icon_url: guild.icon_url(),
        owner_id: guild.owner_id.get(),
        verification_level: format!("{:?}", guild.verification_level),
        created_at: to_utc(guild.id.created_at()),
        boost_count: guild.premium_subscription_count,
        boost_tier: u8::from(guild.premium_tier),
        description: guild.description.clone(),
        system_channel_id: guild.system_channel_id.map(serenity::ChannelId::get),
        vanity_url_code: guild.vanity_url_code.clone(),
        banner_url: guild.banner_url(),
    }
}

/// Snapshot of a guild channel
#[must_use]
pub fn channel_snapshot(channel: &serenity::GuildChannel) -> ChannelSnapshot {
    ChannelSnapshot {
        id: channel.id.get(),
        name: Some(channel.name.clone()),
        nsfw: Some(channel.nsfw),
        kind: channel.kind.name().to_string(),
        guild_id: Some(channel.guild_id.get()),
    }
}

/// Looks guild data up over the REST API
pub struct HttpDirectory {
    http: Arc<serenity::Http>,
}

impl HttpDirectory {
    #[must_use]
    pub const fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

impl GuildDirectory for HttpDirectory {
    fn fetch_owner<'a>(
        &'a self,
        _guild_id: u64,
        owner_id: u64,
    ) -> BoxFuture<'a, Result<UserSnapshot>> {
        Box::pin(async move {
            let owner = self
                .http
                .get_user(serenity::UserId::new(owner_id))
                .await
                .map_err(Error::from)?;
            Ok(user_snapshot(&owner))
        })
    }
}

/// Context for a gateway event about `user` in `guild_id`.
///
/// The guild part comes from the cache and is missing if the guild is not
/// cached. The member part is only filled in when a member is supplied.
#[must_use]
pub fn event_context(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    user: &serenity::User,
    member: Option<&serenity::Member>,
) -> RenderContext {
    let mut render = RenderContext::empty().with_user(user_snapshot(user));

    let cached = ctx.cache.guild(guild_id).map(|guild| {
        (
            guild_snapshot(&guild),
            member.map(|member| member_snapshot(member, &guild.roles)),
        )
    });
    if let Some((guild, member)) = cached {
        render = render.with_guild(guild);
        if let Some(member) = member {
            render = render.with_member(member);
        }
    }

    render.with_directory(Arc::new(HttpDirectory::new(Arc::clone(&ctx.http))))
}

/// Context for the author of a command, in the channel it was invoked in.
pub async fn invocation_context(ctx: poise::Context<'_, BotData, Error>) -> RenderContext {
    let mut render = RenderContext::empty().with_user(user_snapshot(ctx.author()));

    if let Some(channel) = ctx.guild_channel().await {
        render = render.with_channel(channel_snapshot(&channel));
    }

    let member = ctx.author_member().await.map(std::borrow::Cow::into_owned);
    let cached = ctx.guild().map(|guild| {
        (
            guild_snapshot(&guild),
            member
                .as_ref()
                .map(|member| member_snapshot(member, &guild.roles)),
        )
    });
    if let Some((guild, member)) = cached {
        render = render.with_guild(guild);
        if let Some(member) = member {
            render = render.with_member(member);
        }
    }

    render.with_directory(Arc::new(HttpDirectory::new(Arc::clone(
        &ctx.serenity_context().http,
    ))))
}
