//! Role button entity - One role toggle attached to a role message.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role button database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role_buttons")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the role message this button sits on
    pub role_message_id: i64,
    /// Zero-based order on the message
    pub position: i32,
    /// Discord role the button toggles
    pub role_id: String,
    /// Button text
    pub label: String,
    /// `primary`, `secondary`, `success` or `danger`
    pub style: String,
    /// Optional emoji shown before the label
    pub emoji: Option<String>,
}

/// Defines relationships between `RoleButton` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each button belongs to one role message
    #[sea_orm(
        belongs_to = "super::role_message::Entity",
        from = "Column::RoleMessageId",
        to = "super::role_message::Column::Id"
    )]
    RoleMessage,
}

impl Related<super::role_message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoleMessage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
