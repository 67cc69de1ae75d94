//! Database configuration module for `GuildHerald`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! models without hand-written SQL. Creation is idempotent, which lets the
//! bot call it on every start.

use crate::entities::{
    EmbedField, EmbedTemplate, EmbedTemplateColumn, GuildConfig, RoleButton, RoleButtonColumn,
    RoleMessage,
};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/guild_herald.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable,
/// falling back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Directory a file-backed `SQLite` URL points into, if any
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(':') {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}

/// Establishes a connection to the database named by [`get_database_url`].
///
/// `SQLite` creates the database file but not its directory, so a missing
/// directory is created first.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(dir) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(dir)?;
    }
    info!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

async fn create_index(db: &DatabaseConnection, statement: &IndexCreateStatement) -> Result<()> {
    let builder = db.get_database_backend();
    db.execute(builder.build(statement)).await?;
    Ok(())
}

/// Creates every table and index the bot uses, skipping ones that already
/// exist.
///
/// Template names are unique per guild and a role may appear once per role
/// message; both rules are backed by unique indexes.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, GuildConfig).await?;
    create_table(db, &schema, EmbedTemplate).await?;
    create_table(db, &schema, EmbedField).await?;
    create_table(db, &schema, RoleMessage).await?;
    create_table(db, &schema, RoleButton).await?;

    let template_name = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_embed_templates_guild_name")
        .table(EmbedTemplate)
        .col(EmbedTemplateColumn::GuildId)
        .col(EmbedTemplateColumn::Name)
        .to_owned();
    create_index(db, &template_name).await?;

    let button_role = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_role_buttons_message_role")
        .table(RoleButton)
        .col(RoleButtonColumn::RoleMessageId)
        .col(RoleButtonColumn::RoleId)
        .to_owned();
    create_index(db, &button_role).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{
        EmbedFieldModel, EmbedTemplateModel, GuildConfigModel, RoleButtonModel, RoleMessageModel,
        embed_template,
    };
    use sea_orm::{ActiveModelTrait, QuerySelect, Set, SqlErr};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<GuildConfigModel> = GuildConfig::find().limit(1).all(&db).await?;
        let _: Vec<EmbedTemplateModel> = EmbedTemplate::find().limit(1).all(&db).await?;
        let _: Vec<EmbedFieldModel> = EmbedField::find().limit(1).all(&db).await?;
        let _: Vec<RoleMessageModel> = RoleMessage::find().limit(1).all(&db).await?;
        let _: Vec<RoleButtonModel> = RoleButton::find().limit(1).all(&db).await?;

        Ok(())
    }

    fn bare_template(guild_id: &str, name: &str) -> embed_template::ActiveModel {
        let now = chrono::Utc::now().naive_utc();
        embed_template::ActiveModel {
            guild_id: Set(guild_id.to_string()),
            name: Set(name.to_string()),
            timestamp: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_template_names_are_unique_per_guild() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        bare_template("42", "rules").insert(&db).await?;
        bare_template("43", "rules").insert(&db).await?;

        let err = bare_template("42", "rules").insert(&db).await.unwrap_err();
        assert!(matches!(
            err.sql_err(),
            Some(SqlErr::UniqueConstraintViolation(_))
        ));
        Ok(())
    }

    #[test]
    fn test_sqlite_parent_dir() {
        assert_eq!(
            sqlite_parent_dir("sqlite://data/guild_herald.sqlite?mode=rwc"),
            Some(Path::new("data"))
        );
        assert_eq!(sqlite_parent_dir("sqlite://herald.sqlite"), None);
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
        assert_eq!(sqlite_parent_dir("postgres://localhost/db"), None);
    }

    #[tokio::test]
    async fn test_create_tables_twice_is_harmless() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
