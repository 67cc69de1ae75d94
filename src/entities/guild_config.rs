//! Guild configuration entity - Per-guild welcome and goodbye settings.
//!
//! Greetings reference embed templates by name; the names are stored
//! comma-joined in the order they should be sent.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Guild configuration database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guild_configs")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord guild ID
    #[sea_orm(unique)]
    pub guild_id: String,
    /// Channel welcome messages are sent to
    pub welcome_channel_id: Option<String>,
    /// Whether welcome messages are sent
    pub welcome_enabled: bool,
    /// Text sent above the welcome embeds
    pub welcome_message: Option<String>,
    /// Comma-joined template names for the welcome message
    pub welcome_templates: Option<String>,
    /// Channel goodbye messages are sent to
    pub goodbye_channel_id: Option<String>,
    /// Whether goodbye messages are sent
    pub goodbye_enabled: bool,
    /// Text sent above the goodbye embeds
    pub goodbye_message: Option<String>,
    /// Comma-joined template names for the goodbye message
    pub goodbye_templates: Option<String>,
    /// When this configuration was last modified
    pub updated_at: DateTime,
}

/// `GuildConfig` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
