//! Welcome and goodbye greetings.
//!
//! Each guild has at most one configuration row holding both greetings. A
//! greeting names a channel, an optional message and an ordered list of embed
//! template names. Templates are resolved by name when the greeting fires, so
//! editing a template changes every greeting that uses it.

use super::template::{get_template, get_templates_by_names};
use crate::{
    entities::{GuildConfig, guild_config},
    errors::{Error, Result},
    placeholder::{PlaceholderRegistry, RenderContext},
    render::{RenderedEmbed, render_templates},
};
use sea_orm::{Set, prelude::*};
use std::fmt;
use tracing::info;

/// Which greeting an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreetingKind {
    /// Sent when a member joins
    Welcome,
    /// Sent when a member leaves
    Goodbye,
}

impl GreetingKind {
    /// Lowercase name, also the slash command name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Goodbye => "goodbye",
        }
    }
}

impl fmt::Display for GreetingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One greeting as stored for a guild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingSettings {
    pub kind: GreetingKind,
    pub channel_id: Option<u64>,
    pub enabled: bool,
    pub message: Option<String>,
    pub template_names: Vec<String>,
}

impl GreetingSettings {
    fn from_model(model: &guild_config::Model, kind: GreetingKind) -> Self {
        let (channel, enabled, message, templates) = match kind {
            GreetingKind::Welcome => (
                &model.welcome_channel_id,
                model.welcome_enabled,
                &model.welcome_message,
                &model.welcome_templates,
            ),
            GreetingKind::Goodbye => (
                &model.goodbye_channel_id,
                model.goodbye_enabled,
                &model.goodbye_message,
                &model.goodbye_templates,
            ),
        };

        Self {
            kind,
            // Discord ids are never zero, and serenity panics on one
            channel_id: channel
                .as_deref()
                .and_then(|id| id.parse().ok())
                .filter(|&id| id != 0),
            enabled,
            message: message.clone(),
            template_names: templates
                .as_deref()
                .map(parse_template_names)
                .unwrap_or_default(),
        }
    }

    /// Whether the greeting should fire: enabled and pointed at a channel
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.enabled && self.channel_id.is_some()
    }
}

/// Splits a comma-separated list of template names, dropping blanks.
#[must_use]
pub fn parse_template_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fetches the guild's configuration row, creating an empty one if needed.
pub async fn get_or_create_guild_config(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<guild_config::Model> {
    if let Some(config) = GuildConfig::find()
        .filter(guild_config::Column::GuildId.eq(guild_id))
        .one(db)
        .await?
    {
        return Ok(config);
    }

    let config = guild_config::ActiveModel {
        guild_id: Set(guild_id.to_string()),
        welcome_enabled: Set(false),
        goodbye_enabled: Set(false),
        updated_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    config.insert(db).await.map_err(Into::into)
}

/// Reads one greeting; `None` when the guild has never configured anything.
pub async fn get_greeting(
    db: &DatabaseConnection,
    guild_id: &str,
    kind: GreetingKind,
) -> Result<Option<GreetingSettings>> {
    let config = GuildConfig::find()
        .filter(guild_config::Column::GuildId.eq(guild_id))
        .one(db)
        .await?;
    Ok(config.map(|config| GreetingSettings::from_model(&config, kind)))
}

/// Points a greeting at a channel with the given templates and message, and
/// enables it.
///
/// # Errors
/// Returns an error if neither a template nor a message is given, if a named
/// template does not exist in the guild, or if the database update fails.
pub async fn configure_greeting(
    db: &DatabaseConnection,
    guild_id: &str,
    kind: GreetingKind,
    channel_id: u64,
    template_names: &str,
    message: Option<String>,
) -> Result<GreetingSettings> {
    let names = parse_template_names(template_names);
    let message = message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    if names.is_empty() && message.is_none() {
        return Err(Error::InvalidInput {
            message: "Provide at least one embed name or a message.".to_string(),
        });
    }

    for name in &names {
        if get_template(db, guild_id, name).await?.is_none() {
            return Err(Error::TemplateNotFound { name: name.clone() });
        }
    }

    let config = get_or_create_guild_config(db, guild_id).await?;
    let mut active: guild_config::ActiveModel = config.into();
    let channel = Some(channel_id.to_string());
    let templates = (!names.is_empty()).then(|| names.join(","));
    match kind {
        GreetingKind::Welcome => {
            active.welcome_channel_id = Set(channel);
            active.welcome_enabled = Set(true);
            active.welcome_message = Set(message);
            active.welcome_templates = Set(templates);
        }
        GreetingKind::Goodbye => {
            active.goodbye_channel_id = Set(channel);
            active.goodbye_enabled = Set(true);
            active.goodbye_message = Set(message);
            active.goodbye_templates = Set(templates);
        }
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let config = active.update(db).await?;
    info!(guild_id, %kind, channel_id, "configured greeting");
    Ok(GreetingSettings::from_model(&config, kind))
}

/// Turns a greeting on or off.
///
/// # Errors
/// Enabling a greeting that has no channel yet is rejected.
pub async fn set_greeting_enabled(
    db: &DatabaseConnection,
    guild_id: &str,
    kind: GreetingKind,
    enabled: bool,
) -> Result<GreetingSettings> {
    let config = get_or_create_guild_config(db, guild_id).await?;
    if enabled && GreetingSettings::from_model(&config, kind).channel_id.is_none() {
        return Err(Error::InvalidInput {
            message: format!("The {kind} message is not configured yet. Use `/{kind} set` first."),
        });
    }

    let mut active: guild_config::ActiveModel = config.into();
    match kind {
        GreetingKind::Welcome => active.welcome_enabled = Set(enabled),
        GreetingKind::Goodbye => active.goodbye_enabled = Set(enabled),
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let config = active.update(db).await?;
    Ok(GreetingSettings::from_model(&config, kind))
}

/// A greeting ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingMessage {
    pub content: Option<String>,
    pub embeds: Vec<RenderedEmbed>,
}

impl GreetingMessage {
    /// Nothing to send
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.embeds.is_empty()
    }
}

/// Renders a greeting's message and templates against `ctx`.
///
/// Templates deleted since configuration are skipped; the embed count is
/// capped at the per-message limit.
pub async fn render_greeting(
    db: &DatabaseConnection,
    registry: &PlaceholderRegistry,
    guild_id: &str,
    settings: &GreetingSettings,
    ctx: &RenderContext,
) -> Result<GreetingMessage> {
    let content = match &settings.message {
        Some(message) => Some(registry.parse(message, ctx).await).filter(|m| !m.is_empty()),
        None => None,
    };

    let templates = get_templates_by_names(db, guild_id, &settings.template_names).await?;
    let embeds = render_templates(registry, &templates, ctx).await;

    Ok(GreetingMessage { content, embeds })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::template::delete_template;
    use crate::render::MAX_EMBEDS_PER_MESSAGE;
    use crate::test_utils::{TEST_GUILD_ID, create_test_template, full_context, setup_test_db};

    #[test]
    fn test_parse_template_names() {
        assert_eq!(
            parse_template_names(" welcome, rules ,,  "),
            vec!["welcome", "rules"]
        );
        assert!(parse_template_names(" , ").is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_guild() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(
            get_greeting(&db, TEST_GUILD_ID, GreetingKind::Welcome)
                .await?
                .is_none()
        );

        let first = get_or_create_guild_config(&db, TEST_GUILD_ID).await?;
        let second = get_or_create_guild_config(&db, TEST_GUILD_ID).await?;
        assert_eq!(first.id, second.id);

        let welcome = get_greeting(&db, TEST_GUILD_ID, GreetingKind::Welcome)
            .await?
            .unwrap();
        assert!(!welcome.is_active());
        assert!(welcome.template_names.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_configure_greeting() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_template(&db, "hello", "Hello {user}").await?;
        create_test_template(&db, "rules", "Rules").await?;

        let welcome = configure_greeting(
            &db,
            TEST_GUILD_ID,
            GreetingKind::Welcome,
            77,
            "hello, rules",
            Some("Welcome to {guild}!".to_string()),
        )
        .await?;
        assert!(welcome.is_active());
        assert_eq!(welcome.channel_id, Some(77));
        assert_eq!(welcome.template_names, vec!["hello", "rules"]);

        // The goodbye side is untouched
        let goodbye = get_greeting(&db, TEST_GUILD_ID, GreetingKind::Goodbye)
            .await?
            .unwrap();
        assert!(!goodbye.enabled);
        assert!(goodbye.channel_id.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_configure_greeting_rejects_unknown_or_empty() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_template(&db, "hello", "Hello").await?;

        let result = configure_greeting(
            &db,
            TEST_GUILD_ID,
            GreetingKind::Goodbye,
            77,
            "hello,missing",
            None,
        )
        .await;
        assert!(matches!(result, Err(Error::TemplateNotFound { ref name }) if name == "missing"));

        let result =
            configure_greeting(&db, TEST_GUILD_ID, GreetingKind::Goodbye, 77, " , ", None).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        // A message alone is enough
        let goodbye = configure_greeting(
            &db,
            TEST_GUILD_ID,
            GreetingKind::Goodbye,
            77,
            "",
            Some("Bye {user.username}".to_string()),
        )
        .await?;
        assert!(goodbye.template_names.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_greeting() -> Result<()> {
        let db = setup_test_db().await?;

        let result = set_greeting_enabled(&db, TEST_GUILD_ID, GreetingKind::Welcome, true).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        create_test_template(&db, "hello", "Hello").await?;
        configure_greeting(&db, TEST_GUILD_ID, GreetingKind::Welcome, 77, "hello", None).await?;

        let off = set_greeting_enabled(&db, TEST_GUILD_ID, GreetingKind::Welcome, false).await?;
        assert!(!off.is_active());
        assert_eq!(off.template_names, vec!["hello"]);

        let on = set_greeting_enabled(&db, TEST_GUILD_ID, GreetingKind::Welcome, true).await?;
        assert!(on.is_active());
        Ok(())
    }

    #[tokio::test]
    async fn test_unusable_stored_channel_is_unset() -> Result<()> {
        let db = setup_test_db().await?;
        let config = get_or_create_guild_config(&db, TEST_GUILD_ID).await?;
        let mut active: guild_config::ActiveModel = config.into();
        active.welcome_channel_id = Set(Some("0".to_string()));
        active.welcome_enabled = Set(true);
        active.goodbye_channel_id = Set(Some("not-a-channel".to_string()));
        active.update(&db).await?;

        let welcome = get_greeting(&db, TEST_GUILD_ID, GreetingKind::Welcome)
            .await?
            .unwrap();
        assert_eq!(welcome.channel_id, None);
        assert!(!welcome.is_active());

        let goodbye = get_greeting(&db, TEST_GUILD_ID, GreetingKind::Goodbye)
            .await?
            .unwrap();
        assert_eq!(goodbye.channel_id, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_render_greeting() -> Result<()> {
        let db = setup_test_db().await?;
        let registry = PlaceholderRegistry::with_defaults("tx!");
        create_test_template(&db, "hello", "Hello {user.username}").await?;
        create_test_template(&db, "rules", "Rules of {guild}").await?;

        let settings = configure_greeting(
            &db,
            TEST_GUILD_ID,
            GreetingKind::Welcome,
            77,
            "rules,hello",
            Some("Welcome {user}!".to_string()),
        )
        .await?;
        delete_template(&db, TEST_GUILD_ID, "rules").await?;

        let message =
            render_greeting(&db, &registry, TEST_GUILD_ID, &settings, &full_context()).await?;
        assert_eq!(message.content.as_deref(), Some("Welcome <@1001>!"));
        assert_eq!(message.embeds.len(), 1);
        assert_eq!(message.embeds[0].title.as_deref(), Some("Hello herald_fan"));
        Ok(())
    }

    #[tokio::test]
    async fn test_render_greeting_caps_embeds() -> Result<()> {
        let db = setup_test_db().await?;
        let registry = PlaceholderRegistry::with_defaults("tx!");
        let mut names = Vec::new();
        for i in 0..12 {
            let name = format!("t{i}");
            create_test_template(&db, &name, "x").await?;
            names.push(name);
        }

        let settings = configure_greeting(
            &db,
            TEST_GUILD_ID,
            GreetingKind::Goodbye,
            77,
            &names.join(","),
            None,
        )
        .await?;
        let message =
            render_greeting(&db, &registry, TEST_GUILD_ID, &settings, &full_context()).await?;
        assert!(message.content.is_none());
        assert_eq!(message.embeds.len(), MAX_EMBEDS_PER_MESSAGE);
        assert!(!message.is_empty());
        Ok(())
    }
}
