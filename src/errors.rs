//! Unified error types for `GuildHerald`.
//!
//! Template rendering never produces these: placeholder failures degrade to
//! text inside the engine. Errors surface from configuration, persistence,
//! the Discord framework, and template authoring validation.

use thiserror::Error;

/// Every failure the bot can report
#[derive(Debug, Error)]
pub enum Error {
    /// Settings could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The ORM or the underlying database failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable is missing or invalid
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Error raised by serenity or poise
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),

    /// Writing into a response buffer failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// No template with this name exists in the guild
    #[error("Embed template `{name}` not found.")]
    TemplateNotFound {
        /// Requested template name
        name: String,
    },

    /// A template with this name already exists in the guild
    #[error("An embed with the name `{name}` already exists. Use `/embed-builder set` to update it.")]
    DuplicateTemplate {
        /// Conflicting template name
        name: String,
    },

    /// Color is not a `#RRGGBB` hex string
    #[error("Invalid color format `{value}`. Please use hex format like `#5865F2`.")]
    InvalidColor {
        /// Rejected input
        value: String,
    },

    /// A URL-valued property does not resolve to an http(s) URL
    #[error("Invalid {field} URL. Must start with http:// or https://, got `{value}`")]
    InvalidUrl {
        /// Human-readable property name
        field: &'static str,
        /// Raw input as supplied by the author
        value: String,
    },

    /// No renderable property was supplied
    #[error("You must provide at least one embed property (e.g. title, description). All fields cannot be empty.")]
    EmptyTemplate,

    /// Generic rejected input
    #[error("{message}")]
    InvalidInput {
        /// Explanation shown to the user
        message: String,
    },

    /// Field list is full
    #[error("An embed can hold at most {limit} fields.")]
    TooManyFields {
        /// Maximum field count
        limit: usize,
    },

    /// Field index is out of range
    #[error("Field #{index} does not exist on this embed.")]
    FieldNotFound {
        /// 1-based index requested
        index: usize,
    },

    /// No role manager message with this ID exists in the guild
    #[error("Role manager message with ID `{message_id}` not found.")]
    RoleMessageNotFound {
        /// Requested Discord message ID
        message_id: u64,
    },

    /// The role already has a button on the message
    #[error("Role <@&{role_id}> is already attached to this message.")]
    RoleAlreadyAttached {
        /// Discord role ID
        role_id: u64,
    },

    /// The message has no room for another button
    #[error("Cannot add more buttons to this message (max {limit} buttons).")]
    TooManyButtons {
        /// Maximum button count
        limit: usize,
    },
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Whether the error is the author's fault and should be shown as a
    /// reply rather than logged as a failure.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::TemplateNotFound { .. }
                | Self::DuplicateTemplate { .. }
                | Self::InvalidColor { .. }
                | Self::InvalidUrl { .. }
                | Self::EmptyTemplate
                | Self::InvalidInput { .. }
                | Self::TooManyFields { .. }
                | Self::FieldNotFound { .. }
                | Self::RoleMessageNotFound { .. }
                | Self::RoleAlreadyAttached { .. }
                | Self::TooManyButtons { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
