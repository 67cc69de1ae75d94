//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod embed_field;
pub mod embed_template;
pub mod guild_config;
pub mod role_button;
pub mod role_message;

// Re-export specific types to avoid conflicts
pub use embed_field::{Column as EmbedFieldColumn, Entity as EmbedField, Model as EmbedFieldModel};
pub use embed_template::{
    Column as EmbedTemplateColumn, Entity as EmbedTemplate, Model as EmbedTemplateModel,
};
pub use guild_config::{
    Column as GuildConfigColumn, Entity as GuildConfig, Model as GuildConfigModel,
};
pub use role_button::{Column as RoleButtonColumn, Entity as RoleButton, Model as RoleButtonModel};
pub use role_message::{
    Column as RoleMessageColumn, Entity as RoleMessage, Model as RoleMessageModel,
};
