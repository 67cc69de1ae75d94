//! Role manager - messages whose buttons toggle roles on the member who
//! presses them.
//!
//! A role message is posted once, built from optional text and embed
//! templates, and recorded here. Buttons are attached one role at a time and
//! stored in order so the bot can rebuild the message's button rows after
//! every change. A press is looked up again on arrival, so buttons left on a
//! forgotten message or pointing at a detached role do nothing.

use super::{
    greeting::parse_template_names,
    template::{get_template, get_templates_by_names},
};
use crate::{
    entities::{RoleButton, RoleMessage, role_button, role_message},
    errors::{Error, Result},
    placeholder::{PlaceholderRegistry, RenderContext},
    render::{RenderedEmbed, render_templates},
};
use sea_orm::{QueryOrder, Set, SqlErr, prelude::*};
use tracing::info;

/// Buttons Discord fits in one action row
pub const MAX_BUTTONS_PER_ROW: usize = 5;

/// Buttons a message can carry (five rows of five)
pub const MAX_BUTTONS_PER_MESSAGE: usize = 25;

/// Longest label Discord accepts on a button
pub const MAX_LABEL_LENGTH: usize = 80;

/// Prefix of every role button's custom id
pub const BUTTON_ID_PREFIX: &str = "role-mngr-";

/// Button colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonStyle {
    /// Blurple
    #[default]
    Primary,
    /// Grey
    Secondary,
    /// Green
    Success,
    /// Red
    Danger,
}

impl ButtonStyle {
    /// Lowercase name as stored
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }

    /// Reads a stored style. Unknown names fall back to primary.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "secondary" => Self::Secondary,
            "success" => Self::Success,
            "danger" => Self::Danger,
            _ => Self::Primary,
        }
    }
}

/// A button to attach, as supplied by a moderator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleButtonSpec {
    pub role_id: u64,
    pub label: String,
    pub style: ButtonStyle,
    pub emoji: Option<String>,
}

/// Parses a Discord snowflake. Zero is never a valid id.
#[must_use]
pub fn parse_discord_id(raw: &str) -> Option<u64> {
    raw.trim().parse().ok().filter(|&id| id != 0)
}

/// Custom id carried by the button for `role_id`
#[must_use]
pub fn button_custom_id(role_id: u64) -> String {
    format!("{BUTTON_ID_PREFIX}{role_id}")
}

/// Role id encoded in a role button's custom id, or `None` for any other
/// component.
#[must_use]
pub fn parse_button_custom_id(custom_id: &str) -> Option<u64> {
    custom_id
        .strip_prefix(BUTTON_ID_PREFIX)
        .and_then(parse_discord_id)
}

/// Splits buttons into action rows in display order.
#[must_use]
pub fn button_rows(buttons: &[role_button::Model]) -> Vec<&[role_button::Model]> {
    buttons.chunks(MAX_BUTTONS_PER_ROW).collect()
}

/// A role message ready to post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMessagePost {
    pub content: Option<String>,
    pub embeds: Vec<RenderedEmbed>,
}

/// Renders the text and embeds of a new role message.
///
/// Every named template must exist; at most ten embeds are rendered.
///
/// # Errors
/// Returns an error if neither text nor an embed name is given, if a named
/// template does not exist in the guild, or if the database lookup fails.
pub async fn render_role_message(
    db: &DatabaseConnection,
    registry: &PlaceholderRegistry,
    guild_id: &str,
    message: Option<String>,
    embed_names: &str,
    ctx: &RenderContext,
) -> Result<RoleMessagePost> {
    let names = parse_template_names(embed_names);
    let message = message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    if names.is_empty() && message.is_none() {
        return Err(Error::InvalidInput {
            message: "You must provide at least a message or embed names (or both).".to_string(),
        });
    }

    for name in &names {
        if get_template(db, guild_id, name).await?.is_none() {
            return Err(Error::TemplateNotFound { name: name.clone() });
        }
    }

    let content = match message {
        Some(message) => Some(registry.parse(&message, ctx).await).filter(|m| !m.is_empty()),
        None => None,
    };
    let templates = get_templates_by_names(db, guild_id, &names).await?;
    let embeds = render_templates(registry, &templates, ctx).await;

    Ok(RoleMessagePost { content, embeds })
}

/// Records a posted role message.
pub async fn register_role_message(
    db: &DatabaseConnection,
    guild_id: &str,
    channel_id: u64,
    message_id: u64,
) -> Result<role_message::Model> {
    let record = role_message::ActiveModel {
        guild_id: Set(guild_id.to_string()),
        channel_id: Set(channel_id.to_string()),
        message_id: Set(message_id.to_string()),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    let record = record.insert(db).await?;
    info!(guild_id, channel_id, message_id, "registered role manager message");
    Ok(record)
}

/// Finds a guild's role message by its Discord message id.
pub async fn find_role_message(
    db: &DatabaseConnection,
    guild_id: &str,
    message_id: u64,
) -> Result<Option<role_message::Model>> {
    RoleMessage::find()
        .filter(role_message::Column::GuildId.eq(guild_id))
        .filter(role_message::Column::MessageId.eq(message_id.to_string()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`find_role_message`], but a missing message is an error.
pub async fn require_role_message(
    db: &DatabaseConnection,
    guild_id: &str,
    message_id: u64,
) -> Result<role_message::Model> {
    find_role_message(db, guild_id, message_id)
        .await?
        .ok_or(Error::RoleMessageNotFound { message_id })
}

/// Buttons on a role message in display order.
pub async fn list_role_buttons(
    db: &DatabaseConnection,
    role_message_id: i64,
) -> Result<Vec<role_button::Model>> {
    RoleButton::find()
        .filter(role_button::Column::RoleMessageId.eq(role_message_id))
        .order_by_asc(role_button::Column::Position)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Attaches a role button to a role message and returns the message with
/// all of its buttons, the new one last.
///
/// # Errors
/// Returns an error if:
/// - The role id is zero or is the guild's `@everyone` role
/// - The label is blank or longer than [`MAX_LABEL_LENGTH`]
/// - The message is not a role message of this guild
/// - The role already has a button on the message
/// - The message already carries [`MAX_BUTTONS_PER_MESSAGE`] buttons
pub async fn attach_role(
    db: &DatabaseConnection,
    guild_id: &str,
    message_id: u64,
    spec: RoleButtonSpec,
) -> Result<(role_message::Model, Vec<role_button::Model>)> {
    if spec.role_id == 0 {
        return Err(Error::InvalidInput {
            message: "Invalid role provided.".to_string(),
        });
    }
    if spec.role_id.to_string() == guild_id {
        return Err(Error::InvalidInput {
            message: "You cannot use the @everyone role.".to_string(),
        });
    }
    let label = spec.label.trim();
    if label.is_empty() {
        return Err(Error::InvalidInput {
            message: "Button label cannot be empty.".to_string(),
        });
    }
    if label.chars().count() > MAX_LABEL_LENGTH {
        return Err(Error::InvalidInput {
            message: format!("Button label cannot be longer than {MAX_LABEL_LENGTH} characters."),
        });
    }

    let record = require_role_message(db, guild_id, message_id).await?;
    let mut buttons = list_role_buttons(db, record.id).await?;
    let role_key = spec.role_id.to_string();
    if buttons.iter().any(|button| button.role_id == role_key) {
        return Err(Error::RoleAlreadyAttached {
            role_id: spec.role_id,
        });
    }
    if buttons.len() >= MAX_BUTTONS_PER_MESSAGE {
        return Err(Error::TooManyButtons {
            limit: MAX_BUTTONS_PER_MESSAGE,
        });
    }

    let button = role_button::ActiveModel {
        role_message_id: Set(record.id),
        position: Set(buttons.last().map_or(0, |last| last.position + 1)),
        role_id: Set(role_key),
        label: Set(label.to_string()),
        style: Set(spec.style.as_str().to_string()),
        emoji: Set(spec
            .emoji
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())),
        ..Default::default()
    };
    let button = button.insert(db).await.map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::RoleAlreadyAttached {
            role_id: spec.role_id,
        },
        _ => err.into(),
    })?;

    info!(guild_id, message_id, role_id = spec.role_id, "attached role button");
    buttons.push(button);
    Ok((record, buttons))
}

/// Removes a role's button from a role message. Returns whether a button
/// was removed.
pub async fn detach_role(
    db: &DatabaseConnection,
    guild_id: &str,
    message_id: u64,
    role_id: u64,
) -> Result<bool> {
    let Some(record) = find_role_message(db, guild_id, message_id).await? else {
        return Ok(false);
    };
    let result = RoleButton::delete_many()
        .filter(role_button::Column::RoleMessageId.eq(record.id))
        .filter(role_button::Column::RoleId.eq(role_id.to_string()))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// What a role button press should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonPress {
    /// Give or take the role
    Toggle { role_id: u64 },
    /// The message is not (or no longer) a role message
    StaleMessage,
    /// The role has no button on this message
    UnattachedRole,
}

impl ButtonPress {
    /// Ephemeral reply for a press that changes nothing
    #[must_use]
    pub const fn rejection(self) -> Option<&'static str> {
        match self {
            Self::Toggle { .. } => None,
            Self::StaleMessage => Some("This role manager message is no longer valid."),
            Self::UnattachedRole => Some("This role is not configured for this button."),
        }
    }
}

/// Resolves a component press on `message_id`.
///
/// Returns `None` when `custom_id` is not a role button's.
pub async fn resolve_button_press(
    db: &DatabaseConnection,
    guild_id: &str,
    message_id: u64,
    custom_id: &str,
) -> Result<Option<ButtonPress>> {
    let Some(role_id) = parse_button_custom_id(custom_id) else {
        return Ok(None);
    };
    let Some(record) = find_role_message(db, guild_id, message_id).await? else {
        return Ok(Some(ButtonPress::StaleMessage));
    };

    let attached = RoleButton::find()
        .filter(role_button::Column::RoleMessageId.eq(record.id))
        .filter(role_button::Column::RoleId.eq(role_id.to_string()))
        .one(db)
        .await?
        .is_some();
    Ok(Some(if attached {
        ButtonPress::Toggle { role_id }
    } else {
        ButtonPress::UnattachedRole
    }))
}

/// Direction of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    /// The member gains the role
    Added,
    /// The member loses the role
    Removed,
}

impl RoleChange {
    /// Members holding the role lose it; everyone else gains it.
    #[must_use]
    pub const fn for_member(has_role: bool) -> Self {
        if has_role { Self::Removed } else { Self::Added }
    }

    /// Confirmation shown to the member
    #[must_use]
    pub fn reply(self, role_id: u64) -> String {
        match self {
            Self::Added => format!("You now have the <@&{role_id}> role."),
            Self::Removed => format!("Removed the <@&{role_id}> role."),
        }
    }
}
