//! The placeholder set every registry starts with.

use super::{
    Category, ChannelSnapshot, GuildSnapshot, MemberSnapshot, PlaceholderRegistry, RenderContext,
    Resolution, Resolve, UserSnapshot,
};
use chrono::{DateTime, Local, Utc};
use poise::BoxFuture;
use rand::Rng;

type SyncResolver = fn(&RenderContext) -> Resolution;

const DATE_FORMAT: &str = "%-m/%-d/%Y";
const TIME_FORMAT: &str = "%-I:%M:%S %p";

fn local_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(DATE_FORMAT).to_string()
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

fn user(ctx: &RenderContext, f: impl FnOnce(&UserSnapshot) -> Option<String>) -> Resolution {
    ctx.user.as_ref().and_then(f).into()
}

fn member(ctx: &RenderContext, f: impl FnOnce(&MemberSnapshot) -> Option<String>) -> Resolution {
    ctx.member.as_ref().and_then(f).into()
}

fn guild(ctx: &RenderContext, f: impl FnOnce(&GuildSnapshot) -> Option<String>) -> Resolution {
    ctx.guild.as_ref().and_then(f).into()
}

fn channel(ctx: &RenderContext, f: impl FnOnce(&ChannelSnapshot) -> Option<String>) -> Resolution {
    ctx.channel.as_ref().and_then(f).into()
}

/// `{guild.owner}`: asks the directory for the current owner when one is
/// attached, otherwise mentions the owner id from the snapshot.
struct GuildOwner;

impl Resolve for GuildOwner {
    fn resolve<'a>(&'a self, ctx: &'a RenderContext) -> BoxFuture<'a, Resolution> {
        Box::pin(async move {
            let Some(guild) = &ctx.guild else {
                return Resolution::Absent;
            };
            let Some(directory) = &ctx.directory else {
                return Resolution::Value(format!("<@{}>", guild.owner_id));
            };
            match directory.fetch_owner(guild.id, guild.owner_id).await {
                Ok(owner) => Resolution::Value(owner.mention()),
                Err(e) => Resolution::Failed(e.to_string()),
            }
        })
    }
}

type Entry = (Category, &'static str, &'static str, SyncResolver);

fn entry(
    category: Category,
    token: &'static str,
    description: &'static str,
    resolver: SyncResolver,
) -> Entry {
    (category, token, description, resolver)
}

#[allow(clippy::too_many_lines)] // one entry per placeholder
fn sync_placeholders() -> Vec<Entry> {
    vec![
        // user
        entry(Category::User, "{user}", "Mentions the user", |ctx| {
            user(ctx, |u| Some(u.mention()))
        }),
        entry(Category::User, "{user.displayName}", "The user's display name", |ctx| {
            user(ctx, |u| Some(u.display_name().to_string()))
        }),
        entry(Category::User, "{user.id}", "The user's ID", |ctx| {
            user(ctx, |u| Some(u.id.to_string()))
        }),
        entry(Category::User, "{user.username}", "The user's username", |ctx| {
            user(ctx, |u| Some(u.username.clone()))
        }),
        entry(Category::User, "{user.tag}", "The user's tag (username#0000 or username)", |ctx| {
            user(ctx, |u| Some(u.tag()))
        }),
        entry(Category::User, "{user.avatarUrl}", "URL of the user's avatar", |ctx| {
            user(ctx, |u| Some(u.avatar_url.clone()))
        }),
        entry(Category::User, "{user.bannerUrl}", "URL of the user's profile banner", |ctx| {
            user(ctx, |u| u.banner_url.clone())
        }),
        entry(Category::User, "{user.createdAt}", "Date the account was created", |ctx| {
            user(ctx, |u| Some(local_date(u.created_at)))
        }),
        entry(Category::User, "{user.bot}", "\"Yes\" if the user is a bot, \"No\" otherwise", |ctx| {
            user(ctx, |u| Some(yes_no(u.bot)))
        }),
        // member
        entry(Category::Member, "{member.nickname}", "The member's server nickname", |ctx| {
            member(ctx, |m| m.nickname.clone())
        }),
        entry(Category::Member, "{member.joinedAt}", "Date the member joined the server", |ctx| {
            member(ctx, |m| m.joined_at.map(local_date))
        }),
        entry(Category::Member, "{member.roles}", "Number of roles the member has", |ctx| {
            member(ctx, |m| Some(m.roles.len().to_string()))
        }),
        entry(Category::Member, "{member.permissions}", "The member's permissions", |ctx| {
            member(ctx, |m| m.permissions.as_ref().map(|names| names.join(", ")))
        }),
        entry(Category::Member, "{member.highestRole}", "Name of the member's highest role", |ctx| {
            member(ctx, |m| m.highest_role().map(|role| role.name.clone()))
        }),
        entry(Category::Member, "{member.color}", "The member's display color in hex", |ctx| {
            member(ctx, |m| Some(m.display_hex_color()))
        }),
        entry(Category::Member, "{member.displayName}", "Nickname, or username when unset", |ctx| {
            member(ctx, |m| Some(m.display_name.clone()))
        }),
        // guild
        entry(Category::Guild, "{guild}", "The server name", |ctx| {
            guild(ctx, |g| Some(g.name.clone()))
        }),
        entry(Category::Guild, "{guild.id}", "The server ID", |ctx| {
            guild(ctx, |g| Some(g.id.to_string()))
        }),
        entry(Category::Guild, "{guild.memberCount}", "Total member count", |ctx| {
            guild(ctx, |g| Some(g.member_count.to_string()))
        }),
        entry(Category::Guild, "{guild.icon}", "URL of the server icon", |ctx| {
            guild(ctx, |g| g.icon_url.clone())
        }),
        entry(Category::Guild, "{guild.ownerId}", "ID of the server owner", |ctx| {
            guild(ctx, |g| Some(g.owner_id.to_string()))
        }),
        entry(Category::Guild, "{guild.verificationLevel}", "The server's verification level", |ctx| {
            guild(ctx, |g| Some(g.verification_level.clone()))
        }),
        entry(Category::Guild, "{guild.createdAt}", "Date the server was created", |ctx| {
            guild(ctx, |g| Some(local_date(g.created_at)))
        }),
        entry(Category::Guild, "{guild.boostCount}", "Number of server boosts", |ctx| {
            guild(ctx, |g| g.boost_count.map(|count| count.to_string()))
        }),
        entry(Category::Guild, "{guild.boostLevel}", "Server boost tier (0-3)", |ctx| {
            guild(ctx, |g| Some(g.boost_tier.to_string()))
        }),
        entry(Category::Guild, "{guild.description}", "The server description", |ctx| {
            guild(ctx, |g| g.description.clone())
        }),
        entry(Category::Guild, "{guild.systemChannel}", "Mentions the system channel", |ctx| {
            guild(ctx, |g| g.system_channel_id.map(|id| format!("<#{id}>")))
        }),
        entry(Category::Guild, "{guild.vanityUrl}", "The server's vanity invite code", |ctx| {
            guild(ctx, |g| g.vanity_url_code.clone())
        }),
        entry(Category::Guild, "{guild.banner}", "URL of the server banner", |ctx| {
            guild(ctx, |g| g.banner_url.clone())
        }),
        // channel
        entry(Category::Channel, "{channel}", "Mentions the current channel", |ctx| {
            channel(ctx, |c| Some(c.mention()))
        }),
        entry(Category::Channel, "{channel.name}", "The channel name", |ctx| {
            channel(ctx, |c| c.name.clone())
        }),
        entry(Category::Channel, "{channel.id}", "The channel ID", |ctx| {
            channel(ctx, |c| Some(c.id.to_string()))
        }),
        entry(Category::Channel, "{channel.isNsfw}", "\"Yes\" if the channel is age-restricted", |ctx| {
            channel(ctx, |c| c.nsfw.map(yes_no))
        }),
        entry(Category::Channel, "{channel.type}", "The channel type", |ctx| {
            channel(ctx, |c| Some(c.kind.clone()))
        }),
        entry(Category::Channel, "{channel.url}", "Link to the channel", |ctx| {
            channel(ctx, |c| Some(c.url()))
        }),
        // datetime
        entry(Category::Datetime, "{date}", "Current date", |_| {
            Local::now().format(DATE_FORMAT).to_string().into()
        }),
        entry(Category::Datetime, "{time}", "Current time", |_| {
            Local::now().format(TIME_FORMAT).to_string().into()
        }),
        entry(Category::Datetime, "{timestamp}", "Current Unix timestamp", |_| {
            Utc::now().timestamp().to_string().into()
        }),
        entry(Category::Datetime, "{datetime}", "Current date and time", |_| {
            Local::now()
                .format(&format!("{DATE_FORMAT}, {TIME_FORMAT}"))
                .to_string()
                .into()
        }),
        entry(Category::Datetime, "{year}", "Current year", |_| {
            Local::now().format("%Y").to_string().into()
        }),
        entry(Category::Datetime, "{month}", "Current month name", |_| {
            Local::now().format("%B").to_string().into()
        }),
        entry(Category::Datetime, "{day}", "Current day of the month", |_| {
            Local::now().format("%-d").to_string().into()
        }),
        // utility
        entry(Category::Utility, "{random}", "Random number from 0 to 100", |_| {
            rand::rng().random_range(0..=100_u8).to_string().into()
        }),
        entry(Category::Utility, "{newline}", "Inserts a line break", |_| "\n".into()),
        entry(Category::Utility, "{space}", "Inserts a space", |_| " ".into()),
    ]
}

/// Registers the built-in placeholders into `registry`.
pub fn register_defaults(registry: &mut PlaceholderRegistry, secondary_prefix: &str) {
    for (category, token, description, resolver) in sync_placeholders() {
        registry.register(token, description, category, resolver);

        // keep the async owner lookup next to its guild siblings
        if token == "{guild.icon}" {
            registry.register(
                "{guild.owner}",
                "Mentions the server owner",
                Category::Guild,
                GuildOwner,
            );
        }
    }

    let prefix = secondary_prefix.to_string();
    registry.register(
        "{prefix}",
        format!("The bot's secondary prefix ({secondary_prefix})"),
        Category::Utility,
        move |_: &RenderContext| Resolution::Value(prefix.clone()),
    );
}
