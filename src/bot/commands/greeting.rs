//! Greeting Discord commands - `/welcome` and `/goodbye`.
//!
//! Both commands share one implementation parameterized by [`GreetingKind`].

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, context::invocation_context, embeds::reply_with_embeds},
        core::greeting::{self, GreetingKind},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    type Context<'a> = poise::Context<'a, BotData, Error>;

    fn guild_key(ctx: Context<'_>) -> Result<String> {
        ctx.guild_id()
            .map(|id| id.to_string())
            .ok_or_else(|| Error::InvalidInput {
                message: "This command can only be used in a server.".to_string(),
            })
    }

    async fn set(
        ctx: Context<'_>,
        kind: GreetingKind,
        channel: serenity::GuildChannel,
        embeds: Option<String>,
        message: Option<String>,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let settings = greeting::configure_greeting(
            &ctx.data().database,
            &guild_id,
            kind,
            channel.id.get(),
            embeds.as_deref().unwrap_or_default(),
            message,
        )
        .await?;

        let embeds = if settings.template_names.is_empty() {
            "none".to_string()
        } else {
            settings
                .template_names
                .iter()
                .map(|name| format!("`{name}`"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        ctx.say(format!(
            "✅ {kind} messages will be sent to <#{}>.\nEmbeds: {embeds}\nUse `/{kind} test` to preview.",
            channel.id
        ))
        .await?;
        Ok(())
    }

    async fn toggle(ctx: Context<'_>, kind: GreetingKind, enabled: Option<bool>) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let db = &ctx.data().database;

        let enabled = match enabled {
            Some(enabled) => enabled,
            None => !greeting::get_greeting(db, &guild_id, kind)
                .await?
                .is_some_and(|settings| settings.enabled),
        };
        greeting::set_greeting_enabled(db, &guild_id, kind, enabled).await?;

        let state = if enabled { "enabled" } else { "disabled" };
        ctx.say(format!("✅ {kind} messages {state}.")).await?;
        Ok(())
    }

    async fn test(ctx: Context<'_>, kind: GreetingKind) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let data = ctx.data();

        let Some(settings) = greeting::get_greeting(&data.database, &guild_id, kind)
            .await?
            .filter(|settings| settings.channel_id.is_some())
        else {
            ctx.say(format!(
                "The {kind} message is not configured yet. Use `/{kind} set` first."
            ))
            .await?;
            return Ok(());
        };

        let render_ctx = invocation_context(ctx).await;
        let rendered =
            greeting::render_greeting(&data.database, &data.registry, &guild_id, &settings, &render_ctx)
                .await?;

        if rendered.is_empty() {
            ctx.say(format!(
                "The {kind} message renders to nothing. Its embeds may have been deleted."
            ))
            .await?;
            return Ok(());
        }

        ctx.send(reply_with_embeds(rendered.content, &rendered.embeds))
            .await?;
        Ok(())
    }

    /// Configure the message sent when a member joins.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "MANAGE_GUILD",
        subcommands("welcome_set", "welcome_toggle", "welcome_test")
    )]
    pub async fn welcome(ctx: Context<'_>) -> Result<()> {
        ctx.say(
            "Welcome message command. Available subcommands:\n\
            `/welcome set` - Choose the channel, embeds and message\n\
            `/welcome toggle` - Turn welcome messages on or off\n\
            `/welcome test` - Preview the welcome message",
        )
        .await?;
        Ok(())
    }

    /// Sets the welcome channel, embeds and message, and enables it.
    #[poise::command(slash_command, prefix_command, rename = "set", guild_only)]
    pub async fn welcome_set(
        ctx: Context<'_>,
        #[description = "Channel to greet new members in"] channel: serenity::GuildChannel,
        #[description = "Comma-separated embed names, sent in order"] embeds: Option<String>,
        #[description = "Text sent above the embeds; placeholders allowed"] message: Option<String>,
    ) -> Result<()> {
        set(ctx, GreetingKind::Welcome, channel, embeds, message).await
    }

    /// Turns welcome messages on or off.
    #[poise::command(slash_command, prefix_command, rename = "toggle", guild_only)]
    pub async fn welcome_toggle(
        ctx: Context<'_>,
        #[description = "On or off (default: flip the current state)"] enabled: Option<bool>,
    ) -> Result<()> {
        toggle(ctx, GreetingKind::Welcome, enabled).await
    }

    /// Previews the welcome message as if you had just joined.
    #[poise::command(slash_command, prefix_command, rename = "test", guild_only)]
    pub async fn welcome_test(ctx: Context<'_>) -> Result<()> {
        test(ctx, GreetingKind::Welcome).await
    }

    /// Configure the message sent when a member leaves.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "MANAGE_GUILD",
        subcommands("goodbye_set", "goodbye_toggle", "goodbye_test")
    )]
    pub async fn goodbye(ctx: Context<'_>) -> Result<()> {
        ctx.say(
            "Goodbye message command. Available subcommands:\n\
            `/goodbye set` - Choose the channel, embeds and message\n\
            `/goodbye toggle` - Turn goodbye messages on or off\n\
            `/goodbye test` - Preview the goodbye message",
        )
        .await?;
        Ok(())
    }

    /// Sets the goodbye channel, embeds and message, and enables it.
    #[poise::command(slash_command, prefix_command, rename = "set", guild_only)]
    pub async fn goodbye_set(
        ctx: Context<'_>,
        #[description = "Channel to announce departures in"] channel: serenity::GuildChannel,
        #[description = "Comma-separated embed names, sent in order"] embeds: Option<String>,
        #[description = "Text sent above the embeds; placeholders allowed"] message: Option<String>,
    ) -> Result<()> {
        set(ctx, GreetingKind::Goodbye, channel, embeds, message).await
    }

    /// Turns goodbye messages on or off.
    #[poise::command(slash_command, prefix_command, rename = "toggle", guild_only)]
    pub async fn goodbye_toggle(
        ctx: Context<'_>,
        #[description = "On or off (default: flip the current state)"] enabled: Option<bool>,
    ) -> Result<()> {
        toggle(ctx, GreetingKind::Goodbye, enabled).await
    }

    /// Previews the goodbye message as if you had just left.
    #[poise::command(slash_command, prefix_command, rename = "test", guild_only)]
    pub async fn goodbye_test(ctx: Context<'_>) -> Result<()> {
        test(ctx, GreetingKind::Goodbye).await
    }
}

// Re-export all commands
pub use inner::*;
