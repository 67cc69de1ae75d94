//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `GuildHerald` application,
//! including all slash commands, gateway event handlers, autocomplete handlers,
//! and bot context management.

/// Discord command implementations (embed builder, greetings, role manager, general)
pub mod commands;
/// Conversion of Discord models into rendering snapshots
pub mod context;
/// Conversion of rendered embeds into Discord builders
pub mod embeds;
/// Discord interaction and gateway event handlers
pub mod handlers;

use crate::{
    config::settings::Settings,
    errors::{Error, Result},
    placeholder::PlaceholderRegistry,
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands and event handlers.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Placeholder set used by every render
    pub registry: Arc<PlaceholderRegistry>,
    /// Settings loaded at startup
    pub settings: Settings,
}

impl BotData {
    /// Creates a new `BotData`, building the placeholder registry from the
    /// configured secondary prefix.
    #[must_use]
    pub fn new(database: DatabaseConnection, settings: Settings) -> Self {
        let registry = Arc::new(PlaceholderRegistry::with_defaults(
            &settings.command.secondary_prefix,
        ));
        Self {
            database,
            registry,
            settings,
        }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } if error.is_user_facing() => {
            let reply = poise::CreateReply::default()
                .content(format!("❌ {error}"))
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                error!("Failed to send error message: {e}");
            }
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {error:?}", ctx.command().name);
            if let Err(e) = ctx
                .say("❌ Something went wrong while running that command.")
                .await
            {
                error!("Failed to send error message: {e}");
            }
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            warn!("Error while handling {}: {error:?}", event.snake_case_name());
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the framework and runs the gateway client until it stops.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let prefix = data.settings.command.secondary_prefix.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::embed_builder(),
                commands::welcome(),
                commands::goodbye(),
                commands::role_manager(),
                commands::variables(),
                commands::ping(),
                commands::help(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::events::event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    // Member events need the privileged GUILD_MEMBERS intent
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}
