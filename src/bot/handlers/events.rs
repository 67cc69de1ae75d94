//! Gateway event handlers.
//!
//! Member joins and leaves fire the guild's welcome and goodbye greetings.
//! Presses on role manager buttons toggle the button's role. Failures are
//! logged and never retried.

use crate::{
    bot::{BotData, context::event_context, embeds::message_with_embeds},
    core::{
        greeting::{self, GreetingKind},
        role_manager::{self, ButtonPress, RoleChange},
    },
    errors::{Error, Result},
    placeholder::RenderContext,
};
use poise::serenity_prelude as serenity;
use tracing::{debug, info, instrument, warn};

const ROLE_UPDATE_FAILED: &str = "An error occurred while updating your roles... \
     Maybe that role is higher than mine in the role hierarchy.";

/// Dispatches the gateway events the bot reacts to.
#[instrument(level = "debug", skip_all, fields(event = event.snake_case_name()))]
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            let render_ctx =
                event_context(ctx, new_member.guild_id, &new_member.user, Some(new_member));
            send_greeting(ctx, data, new_member.guild_id, GreetingKind::Welcome, render_ctx).await
        }
        serenity::FullEvent::GuildMemberRemoval {
            guild_id,
            user,
            member_data_if_available,
        } => {
            let render_ctx = event_context(ctx, *guild_id, user, member_data_if_available.as_ref());
            send_greeting(ctx, data, *guild_id, GreetingKind::Goodbye, render_ctx).await
        }
        serenity::FullEvent::InteractionCreate { interaction } => {
            match interaction.as_message_component() {
                Some(press) => toggle_role(ctx, data, press).await,
                None => Ok(()),
            }
        }
        _ => Ok(()),
    }
}

async fn send_greeting(
    ctx: &serenity::Context,
    data: &BotData,
    guild_id: serenity::GuildId,
    kind: GreetingKind,
    render_ctx: RenderContext,
) -> Result<()> {
    let guild_key = guild_id.to_string();
    let Some(settings) = greeting::get_greeting(&data.database, &guild_key, kind).await? else {
        return Ok(());
    };
    let Some(channel_id) = settings.channel_id.filter(|_| settings.enabled) else {
        debug!(%guild_id, %kind, "greeting disabled or unconfigured");
        return Ok(());
    };

    let message =
        greeting::render_greeting(&data.database, &data.registry, &guild_key, &settings, &render_ctx)
            .await?;
    if message.is_empty() {
        debug!(%guild_id, %kind, "greeting rendered empty, nothing sent");
        return Ok(());
    }

    let embeds = message.embeds.len();
    // Stored zero ids are dropped when the settings are read
    serenity::ChannelId::new(channel_id)
        .send_message(&ctx.http, message_with_embeds(message.content, &message.embeds))
        .await?;
    info!(%guild_id, %kind, channel_id, embeds, "sent greeting");
    Ok(())
}

async fn reply_ephemeral(
    ctx: &serenity::Context,
    press: &serenity::ComponentInteraction,
    content: impl Into<String>,
) -> Result<()> {
    let response = serenity::CreateInteractionResponse::Message(
        serenity::CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    );
    press.create_response(&ctx.http, response).await?;
    Ok(())
}

async fn toggle_role(
    ctx: &serenity::Context,
    data: &BotData,
    press: &serenity::ComponentInteraction,
) -> Result<()> {
    let Some(guild_id) = press.guild_id else {
        return Ok(());
    };
    let Some(outcome) = role_manager::resolve_button_press(
        &data.database,
        &guild_id.to_string(),
        press.message.id.get(),
        &press.data.custom_id,
    )
    .await?
    else {
        return Ok(());
    };

    let ButtonPress::Toggle { role_id } = outcome else {
        let reply = outcome.rejection().unwrap_or_default();
        return reply_ephemeral(ctx, press, reply).await;
    };

    // Parsed ids are never zero
    let role = serenity::RoleId::new(role_id);
    let user_id = press.user.id;
    let has_role = press
        .member
        .as_ref()
        .is_some_and(|member| member.roles.contains(&role));
    let change = RoleChange::for_member(has_role);
    let reason = Some("Role manager button");
    let result = match change {
        RoleChange::Added => {
            ctx.http
                .add_member_role(guild_id, user_id, role, reason)
                .await
        }
        RoleChange::Removed => {
            ctx.http
                .remove_member_role(guild_id, user_id, role, reason)
                .await
        }
    };

    match result {
        Ok(()) => {
            info!(%guild_id, %user_id, role_id, ?change, "toggled role");
            reply_ephemeral(ctx, press, change.reply(role_id)).await
        }
        Err(e) => {
            warn!(%guild_id, %user_id, role_id, "failed to toggle role: {e}");
            reply_ephemeral(ctx, press, ROLE_UPDATE_FAILED).await
        }
    }
}
