//! Role message entity - A message members press buttons on to pick roles.
//!
//! The message itself lives in Discord; this row records where it was posted
//! so button presses and `/role-manager attach-role` can find it again.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role manager message database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role_messages")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord guild ID the message was posted in
    pub guild_id: String,
    /// Channel holding the message
    pub channel_id: String,
    /// Discord message ID
    #[sea_orm(unique)]
    pub message_id: String,
    /// When the message was posted
    pub created_at: DateTime,
}

/// Defines relationships between `RoleMessage` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One message carries many role buttons
    #[sea_orm(has_many = "super::role_button::Entity")]
    Buttons,
}

impl Related<super::role_button::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Buttons.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
