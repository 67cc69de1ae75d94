//! Embed field entity - One name/value pair of an embed template.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Embed field database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "embed_fields")]
pub struct Model {
    /// Unique identifier for the field
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the template this field belongs to
    pub template_id: i64,
    /// Zero-based display order within the template
    pub position: i32,
    /// Field title
    pub name: String,
    /// Field body
    pub value: String,
    /// Whether the field sits inline with its neighbours
    pub inline: bool,
}

/// Defines relationships between `EmbedField` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each field belongs to one template
    #[sea_orm(
        belongs_to = "super::embed_template::Entity",
        from = "Column::TemplateId",
        to = "super::embed_template::Column::Id"
    )]
    Template,
}

impl Related<super::embed_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Template.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
