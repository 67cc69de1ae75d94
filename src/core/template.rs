//! Embed template business logic - Handles all template-related operations.
//!
//! This module provides functions for creating, retrieving, updating, and deleting
//! embed templates and their fields. Templates are scoped to a guild and addressed
//! by name; names match exactly. String properties are stored as authored, with
//! placeholders left in place for the renderer. URL checks need a rendering
//! context and live in [`super::validation`]; callers run them before calling
//! [`create_template`] or [`update_template`].

use super::validation::validate_color;
use crate::{
    entities::{EmbedField, EmbedTemplate, embed_field, embed_template},
    errors::{Error, Result},
    render::{self, TemplateAuthor, TemplateField},
};
use sea_orm::{
    PaginatorTrait, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait, prelude::*,
};
use tracing::{info, warn};

/// Fields a single embed may carry
pub const MAX_FIELDS: usize = 25;

/// Template properties as supplied by an author.
///
/// `None` means "not supplied". For updates only supplied properties change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateProperties {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub color: Option<String>,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
    pub footer: Option<String>,
    pub footer_icon_url: Option<String>,
    pub author_name: Option<String>,
    pub author_icon_url: Option<String>,
    pub author_url: Option<String>,
    pub timestamp: Option<bool>,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TemplateProperties {
    /// Trims every string and treats blank ones as not supplied.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            title: clean(self.title),
            description: clean(self.description),
            url: clean(self.url),
            color: clean(self.color),
            thumbnail: clean(self.thumbnail),
            image: clean(self.image),
            footer: clean(self.footer),
            footer_icon_url: clean(self.footer_icon_url),
            author_name: clean(self.author_name),
            author_icon_url: clean(self.author_icon_url),
            author_url: clean(self.author_url),
            timestamp: self.timestamp,
        }
    }

    fn strings(&self) -> [Option<&str>; 11] {
        [
            self.title.as_deref(),
            self.description.as_deref(),
            self.url.as_deref(),
            self.color.as_deref(),
            self.thumbnail.as_deref(),
            self.image.as_deref(),
            self.footer.as_deref(),
            self.footer_icon_url.as_deref(),
            self.author_name.as_deref(),
            self.author_icon_url.as_deref(),
            self.author_url.as_deref(),
        ]
    }

    /// Whether a new template built from these would show anything
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.strings().iter().any(Option::is_some) || self.timestamp == Some(true)
    }

    /// Whether anything was supplied at all
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.strings().iter().any(Option::is_some) || self.timestamp.is_some()
    }

    /// URL-valued properties paired with the label used in error messages
    #[must_use]
    pub fn url_fields(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("title", self.url.as_deref()),
            ("author icon", self.author_icon_url.as_deref()),
            ("author", self.author_url.as_deref()),
            ("image", self.image.as_deref()),
            ("thumbnail", self.thumbnail.as_deref()),
            ("footer icon", self.footer_icon_url.as_deref()),
        ]
    }
}

/// Finds a template by exact name within a guild.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_template(
    db: &DatabaseConnection,
    guild_id: &str,
    name: &str,
) -> Result<Option<embed_template::Model>> {
    EmbedTemplate::find()
        .filter(embed_template::Column::GuildId.eq(guild_id))
        .filter(embed_template::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_template`], but a missing template is an error.
pub async fn require_template(
    db: &DatabaseConnection,
    guild_id: &str,
    name: &str,
) -> Result<embed_template::Model> {
    get_template(db, guild_id, name)
        .await?
        .ok_or_else(|| Error::TemplateNotFound {
            name: name.trim().to_string(),
        })
}

/// Lists a guild's templates alphabetically.
pub async fn list_templates(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<Vec<embed_template::Model>> {
    EmbedTemplate::find()
        .filter(embed_template::Column::GuildId.eq(guild_id))
        .order_by_asc(embed_template::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Template names containing `partial`, alphabetically, at most `limit`.
pub async fn search_template_names(
    db: &DatabaseConnection,
    guild_id: &str,
    partial: &str,
    limit: u64,
) -> Result<Vec<String>> {
    let templates = EmbedTemplate::find()
        .filter(embed_template::Column::GuildId.eq(guild_id))
        .filter(embed_template::Column::Name.contains(partial))
        .order_by_asc(embed_template::Column::Name)
        .limit(limit)
        .all(db)
        .await?;
    Ok(templates.into_iter().map(|t| t.name).collect())
}

/// Fields of a template in display order.
pub async fn get_template_fields(
    db: &DatabaseConnection,
    template_id: i64,
) -> Result<Vec<embed_field::Model>> {
    EmbedField::find()
        .filter(embed_field::Column::TemplateId.eq(template_id))
        .order_by_asc(embed_field::Column::Position)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a template, performing input validation.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - No property is supplied (a timestamp alone counts)
/// - The color is not `#RRGGBB`
/// - A template with the same name already exists in the guild
/// - The database insert fails
pub async fn create_template(
    db: &DatabaseConnection,
    guild_id: &str,
    name: &str,
    properties: TemplateProperties,
) -> Result<embed_template::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput {
            message: "Embed name cannot be empty.".to_string(),
        });
    }

    let properties = properties.normalized();
    if !properties.has_content() {
        return Err(Error::EmptyTemplate);
    }
    if let Some(color) = &properties.color {
        validate_color(color)?;
    }

    if get_template(db, guild_id, name).await?.is_some() {
        return Err(Error::DuplicateTemplate {
            name: name.to_string(),
        });
    }

    let now = chrono::Utc::now().naive_utc();
    let template = embed_template::ActiveModel {
        guild_id: Set(guild_id.to_string()),
        name: Set(name.to_string()),
        title: Set(properties.title),
        description: Set(properties.description),
        url: Set(properties.url),
        color: Set(properties.color),
        thumbnail: Set(properties.thumbnail),
        image: Set(properties.image),
        footer: Set(properties.footer),
        footer_icon_url: Set(properties.footer_icon_url),
        timestamp: Set(properties.timestamp.unwrap_or(false)),
        author_name: Set(properties.author_name),
        author_icon_url: Set(properties.author_icon_url),
        author_url: Set(properties.author_url),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    // The unique (guild_id, name) index catches a concurrent create that
    // passed the lookup above.
    let model = template.insert(db).await.map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::DuplicateTemplate {
            name: name.to_string(),
        },
        _ => err.into(),
    })?;
    info!(guild_id, template = %model.name, "created embed template");
    Ok(model)
}

/// Applies the supplied properties to an existing template.
///
/// # Errors
/// Returns an error if nothing was supplied, the color is invalid, the template
/// does not exist, or the update fails.
pub async fn update_template(
    db: &DatabaseConnection,
    guild_id: &str,
    name: &str,
    properties: TemplateProperties,
) -> Result<embed_template::Model> {
    let properties = properties.normalized();
    if !properties.has_changes() {
        return Err(Error::InvalidInput {
            message: "Nothing to update. Supply at least one property to change.".to_string(),
        });
    }
    if let Some(color) = &properties.color {
        validate_color(color)?;
    }

    let existing = require_template(db, guild_id, name).await?;
    let mut template: embed_template::ActiveModel = existing.into();

    macro_rules! apply {
        ($($field:ident),*) => {
            $(if let Some(value) = properties.$field {
                template.$field = Set(Some(value));
            })*
        };
    }
    apply!(
        title,
        description,
        url,
        color,
        thumbnail,
        image,
        footer,
        footer_icon_url,
        author_name,
        author_icon_url,
        author_url
    );
    if let Some(timestamp) = properties.timestamp {
        template.timestamp = Set(timestamp);
    }
    template.updated_at = Set(chrono::Utc::now().naive_utc());

    template.update(db).await.map_err(Into::into)
}

/// Deletes a template together with its fields.
pub async fn delete_template(db: &DatabaseConnection, guild_id: &str, name: &str) -> Result<()> {
    let template = require_template(db, guild_id, name).await?;

    let txn = db.begin().await?;
    EmbedField::delete_many()
        .filter(embed_field::Column::TemplateId.eq(template.id))
        .exec(&txn)
        .await?;
    EmbedTemplate::delete_by_id(template.id).exec(&txn).await?;
    txn.commit().await?;

    info!(guild_id, template = %template.name, "deleted embed template");
    Ok(())
}

async fn touch(db: &impl ConnectionTrait, template: embed_template::Model) -> Result<()> {
    let mut template: embed_template::ActiveModel = template.into();
    template.updated_at = Set(chrono::Utc::now().naive_utc());
    template.update(db).await?;
    Ok(())
}

/// Appends a field to a template.
///
/// # Errors
/// Returns an error if the template does not exist, the name or value is blank,
/// the template already has [`MAX_FIELDS`] fields, or the insert fails.
pub async fn add_field(
    db: &DatabaseConnection,
    guild_id: &str,
    template_name: &str,
    name: &str,
    value: &str,
    inline: bool,
) -> Result<embed_field::Model> {
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return Err(Error::InvalidInput {
            message: "Field name and value cannot be empty.".to_string(),
        });
    }

    let template = require_template(db, guild_id, template_name).await?;
    let count = EmbedField::find()
        .filter(embed_field::Column::TemplateId.eq(template.id))
        .count(db)
        .await?;
    let count = usize::try_from(count).unwrap_or(usize::MAX);
    if count >= MAX_FIELDS {
        return Err(Error::TooManyFields { limit: MAX_FIELDS });
    }

    let field = embed_field::ActiveModel {
        template_id: Set(template.id),
        position: Set(i32::try_from(count).unwrap_or(i32::MAX)),
        name: Set(name.to_string()),
        value: Set(value.to_string()),
        inline: Set(inline),
        ..Default::default()
    };

    let txn = db.begin().await?;
    let field = field.insert(&txn).await?;
    touch(&txn, template).await?;
    txn.commit().await?;
    Ok(field)
}

/// Removes the field at 1-based `index` and closes the gap in positions.
///
/// # Errors
/// Returns [`Error::FieldNotFound`] when `index` is out of range.
pub async fn remove_field(
    db: &DatabaseConnection,
    guild_id: &str,
    template_name: &str,
    index: usize,
) -> Result<embed_field::Model> {
    let template = require_template(db, guild_id, template_name).await?;
    let mut fields = get_template_fields(db, template.id).await?;
    if index == 0 || index > fields.len() {
        return Err(Error::FieldNotFound { index });
    }

    let removed = fields.remove(index - 1);
    let txn = db.begin().await?;
    EmbedField::delete_by_id(removed.id).exec(&txn).await?;
    for (position, field) in fields.into_iter().enumerate().skip(index - 1) {
        let mut field: embed_field::ActiveModel = field.into();
        field.position = Set(i32::try_from(position).unwrap_or(i32::MAX));
        field.update(&txn).await?;
    }
    touch(&txn, template).await?;
    txn.commit().await?;

    Ok(removed)
}

/// Converts stored rows into renderer input.
///
/// An author block is attached whenever any author column is set; the
/// renderer drops it again unless the name renders non-empty.
#[must_use]
pub fn to_render_template(
    template: embed_template::Model,
    fields: Vec<embed_field::Model>,
) -> render::EmbedTemplate {
    let author = (template.author_name.is_some()
        || template.author_icon_url.is_some()
        || template.author_url.is_some())
    .then(|| TemplateAuthor {
        name: template.author_name,
        icon_url: template.author_icon_url,
        url: template.author_url,
    });

    render::EmbedTemplate {
        id: Some(template.id),
        guild_id: Some(template.guild_id),
        name: template.name,
        title: template.title,
        description: template.description,
        url: template.url,
        color: template.color,
        thumbnail: template.thumbnail,
        image: template.image,
        footer: template.footer,
        footer_icon_url: template.footer_icon_url,
        timestamp: template.timestamp,
        author,
        fields: fields
            .into_iter()
            .map(|field| TemplateField {
                name: field.name,
                value: field.value,
                inline: field.inline,
            })
            .collect(),
    }
}

/// Loads a template and its fields ready for rendering.
pub async fn load_template(
    db: &DatabaseConnection,
    guild_id: &str,
    name: &str,
) -> Result<Option<render::EmbedTemplate>> {
    let Some(template) = get_template(db, guild_id, name).await? else {
        return Ok(None);
    };
    let fields = get_template_fields(db, template.id).await?;
    Ok(Some(to_render_template(template, fields)))
}

/// Loads templates by name, keeping the order of `names`.
///
/// Names with no matching template are skipped with a warning; a greeting
/// whose template was deleted still sends the rest.
pub async fn get_templates_by_names(
    db: &DatabaseConnection,
    guild_id: &str,
    names: &[String],
) -> Result<Vec<render::EmbedTemplate>> {
    let mut templates = Vec::with_capacity(names.len());
    for name in names {
        match load_template(db, guild_id, name).await? {
            Some(template) => templates.push(template),
            None => warn!(guild_id, template = %name, "referenced embed template no longer exists"),
        }
    }
    Ok(templates)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{TEST_GUILD_ID, create_test_template, setup_test_db};

    #[tokio::test]
    async fn test_create_and_get_template() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_template(
            &db,
            TEST_GUILD_ID,
            "  welcome  ",
            TemplateProperties {
                title: Some("Welcome {user}!".to_string()),
                color: Some("#5865F2".to_string()),
                description: Some("   ".to_string()),
                ..TemplateProperties::default()
            },
        )
        .await?;

        assert_eq!(created.name, "welcome");
        assert_eq!(created.title.as_deref(), Some("Welcome {user}!"));
        assert!(created.description.is_none());
        assert!(!created.timestamp);

        let fetched = get_template(&db, TEST_GUILD_ID, "welcome").await?.unwrap();
        assert_eq!(fetched.id, created.id);
        assert!(get_template(&db, TEST_GUILD_ID, "Welcome").await?.is_none());
        assert!(get_template(&db, "other-guild", "welcome").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_template_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_template(&db, TEST_GUILD_ID, " ", TemplateProperties::default()).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        let result = create_template(
            &db,
            TEST_GUILD_ID,
            "blank",
            TemplateProperties {
                title: Some(String::new()),
                timestamp: Some(false),
                ..TemplateProperties::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::EmptyTemplate)));

        let result = create_template(
            &db,
            TEST_GUILD_ID,
            "bad-color",
            TemplateProperties {
                color: Some("blue".to_string()),
                ..TemplateProperties::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidColor { .. })));

        // A timestamp alone is enough content
        let stamped = create_template(
            &db,
            TEST_GUILD_ID,
            "clock",
            TemplateProperties {
                timestamp: Some(true),
                ..TemplateProperties::default()
            },
        )
        .await?;
        assert!(stamped.timestamp);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_names_are_rejected_per_guild() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_template(&db, "rules", "Rules").await?;

        let result = create_test_template(&db, "rules", "Again").await;
        assert!(matches!(result, Err(Error::DuplicateTemplate { ref name }) if name == "rules"));

        // Same name in another guild is fine
        create_template(
            &db,
            "other-guild",
            "rules",
            TemplateProperties {
                title: Some("Elsewhere".to_string()),
                ..TemplateProperties::default()
            },
        )
        .await?;
        assert_eq!(list_templates(&db, TEST_GUILD_ID).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_creates_keep_one_template() -> Result<()> {
        let db = setup_test_db().await?;
        let properties = TemplateProperties {
            title: Some("Rules".to_string()),
            ..TemplateProperties::default()
        };

        let (first, second) = tokio::join!(
            create_template(&db, TEST_GUILD_ID, "rules", properties.clone()),
            create_template(&db, TEST_GUILD_ID, "rules", properties.clone()),
        );

        let created = [&first, &second].iter().filter(|r| r.is_ok()).count();
        assert_eq!(created, 1);
        assert!([first, second].into_iter().any(
            |r| matches!(r, Err(Error::DuplicateTemplate { ref name }) if name == "rules")
        ));
        assert_eq!(list_templates(&db, TEST_GUILD_ID).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_and_search_templates() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_template(&db, "welcome", "Hi").await?;
        create_test_template(&db, "goodbye", "Bye").await?;
        create_test_template(&db, "welcome-2", "Hi again").await?;

        let names: Vec<_> = list_templates(&db, TEST_GUILD_ID)
            .await?
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["goodbye", "welcome", "welcome-2"]);

        let found = search_template_names(&db, TEST_GUILD_ID, "wel", 25).await?;
        assert_eq!(found, vec!["welcome", "welcome-2"]);
        let limited = search_template_names(&db, TEST_GUILD_ID, "", 1).await?;
        assert_eq!(limited, vec!["goodbye"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_template_is_partial() -> Result<()> {
        let db = setup_test_db().await?;
        create_template(
            &db,
            TEST_GUILD_ID,
            "card",
            TemplateProperties {
                title: Some("Title".to_string()),
                description: Some("Body".to_string()),
                timestamp: Some(true),
                ..TemplateProperties::default()
            },
        )
        .await?;

        let updated = update_template(
            &db,
            TEST_GUILD_ID,
            "card",
            TemplateProperties {
                description: Some("New body".to_string()),
                author_icon_url: Some("https://x.test/a.png".to_string()),
                timestamp: Some(false),
                ..TemplateProperties::default()
            },
        )
        .await?;

        assert_eq!(updated.title.as_deref(), Some("Title"));
        assert_eq!(updated.description.as_deref(), Some("New body"));
        assert_eq!(updated.author_icon_url.as_deref(), Some("https://x.test/a.png"));
        assert!(updated.author_name.is_none());
        assert!(!updated.timestamp);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_template_errors() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_template(&db, "card", "Title").await?;

        let result = update_template(&db, TEST_GUILD_ID, "card", TemplateProperties::default()).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        let result = update_template(
            &db,
            TEST_GUILD_ID,
            "missing",
            TemplateProperties {
                title: Some("x".to_string()),
                ..TemplateProperties::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::TemplateNotFound { .. })));

        let result = update_template(
            &db,
            TEST_GUILD_ID,
            "card",
            TemplateProperties {
                color: Some("#12".to_string()),
                ..TemplateProperties::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidColor { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_fields_add_remove_and_renumber() -> Result<()> {
        let db = setup_test_db().await?;
        let template = create_test_template(&db, "card", "Title").await?;

        for name in ["a", "b", "c"] {
            add_field(&db, TEST_GUILD_ID, "card", name, "value", name == "b").await?;
        }

        let removed = remove_field(&db, TEST_GUILD_ID, "card", 2).await?;
        assert_eq!(removed.name, "b");

        let fields = get_template_fields(&db, template.id).await?;
        let layout: Vec<_> = fields.iter().map(|f| (f.name.as_str(), f.position)).collect();
        assert_eq!(layout, vec![("a", 0), ("c", 1)]);

        assert!(matches!(
            remove_field(&db, TEST_GUILD_ID, "card", 0).await,
            Err(Error::FieldNotFound { index: 0 })
        ));
        assert!(matches!(
            remove_field(&db, TEST_GUILD_ID, "card", 3).await,
            Err(Error::FieldNotFound { index: 3 })
        ));
        assert!(matches!(
            add_field(&db, TEST_GUILD_ID, "card", "", "v", false).await,
            Err(Error::InvalidInput { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_field_limit() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_template(&db, "full", "Title").await?;

        for i in 0..MAX_FIELDS {
            add_field(&db, TEST_GUILD_ID, "full", &format!("f{i}"), "v", false).await?;
        }
        let result = add_field(&db, TEST_GUILD_ID, "full", "extra", "v", false).await;
        assert!(matches!(result, Err(Error::TooManyFields { limit: 25 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_template_cascades() -> Result<()> {
        let db = setup_test_db().await?;
        let template = create_test_template(&db, "gone", "Title").await?;
        add_field(&db, TEST_GUILD_ID, "gone", "a", "b", false).await?;

        delete_template(&db, TEST_GUILD_ID, "gone").await?;

        assert!(get_template(&db, TEST_GUILD_ID, "gone").await?.is_none());
        assert!(get_template_fields(&db, template.id).await?.is_empty());
        assert!(matches!(
            delete_template(&db, TEST_GUILD_ID, "gone").await,
            Err(Error::TemplateNotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_keeps_author_and_fields() -> Result<()> {
        let db = setup_test_db().await?;
        create_template(
            &db,
            TEST_GUILD_ID,
            "profile",
            TemplateProperties {
                author_name: Some("{user.username}".to_string()),
                author_icon_url: Some("{user.avatarUrl}".to_string()),
                ..TemplateProperties::default()
            },
        )
        .await?;
        add_field(&db, TEST_GUILD_ID, "profile", "Joined", "{member.joinedAt}", true).await?;

        let loaded = load_template(&db, TEST_GUILD_ID, "profile").await?.unwrap();
        let author = loaded.author.unwrap();
        assert_eq!(author.name.as_deref(), Some("{user.username}"));
        assert!(author.url.is_none());
        assert_eq!(loaded.fields.len(), 1);
        assert!(loaded.fields[0].inline);
        assert!(loaded.title.is_none());

        assert!(load_template(&db, TEST_GUILD_ID, "nope").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_get_templates_by_names_keeps_order_and_skips_missing() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_template(&db, "one", "1").await?;
        create_test_template(&db, "two", "2").await?;

        let names = ["two", "deleted", "one"].map(String::from);
        let templates = get_templates_by_names(&db, TEST_GUILD_ID, &names).await?;
        let loaded: Vec<_> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(loaded, vec!["two", "one"]);
        Ok(())
    }
}
