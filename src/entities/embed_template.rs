//! Embed template entity - A named, guild-owned rich-message description.
//!
//! Templates are authored with `/embed-builder` and referenced by name from
//! greeting configuration. String columns may contain placeholders; they are
//! stored exactly as authored and substituted at render time.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Embed template database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "embed_templates")]
pub struct Model {
    /// Unique identifier for the template
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord guild ID that owns this template
    pub guild_id: String,
    /// Name, unique within the guild
    pub name: String,
    /// Embed title
    pub title: Option<String>,
    /// Embed description
    pub description: Option<String>,
    /// URL the title links to
    pub url: Option<String>,
    /// `#RRGGBB` accent color
    pub color: Option<String>,
    /// Thumbnail image URL
    pub thumbnail: Option<String>,
    /// Large image URL
    pub image: Option<String>,
    /// Footer text
    pub footer: Option<String>,
    /// Footer icon URL
    pub footer_icon_url: Option<String>,
    /// Whether renders carry the render time
    pub timestamp: bool,
    /// Author name; the author block is only shown when this renders non-empty
    pub author_name: Option<String>,
    /// Author icon URL
    pub author_icon_url: Option<String>,
    /// URL the author name links to
    pub author_url: Option<String>,
    /// When the template was created
    pub created_at: DateTime,
    /// When the template was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between `EmbedTemplate` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One template has many fields
    #[sea_orm(has_many = "super::embed_field::Entity")]
    Fields,
}

impl Related<super::embed_field::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fields.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
