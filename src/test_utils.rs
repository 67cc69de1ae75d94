//! Shared test utilities for `GuildHerald`.
//!
//! This module provides common helper functions for setting up test databases,
//! creating test templates, and building rendering contexts with known values.

use crate::{
    core::template::{self, TemplateProperties},
    entities,
    errors::Result,
    placeholder::{
        ChannelSnapshot, GuildSnapshot, MemberSnapshot, RenderContext, RoleSnapshot, UserSnapshot,
    },
};
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::DatabaseConnection;

/// Guild id used by every database helper
pub const TEST_GUILD_ID: &str = "42";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test template in [`TEST_GUILD_ID`] with only a title set.
pub async fn create_test_template(
    db: &DatabaseConnection,
    name: &str,
    title: &str,
) -> Result<entities::embed_template::Model> {
    template::create_template(
        db,
        TEST_GUILD_ID,
        name,
        TemplateProperties {
            title: Some(title.to_string()),
            ..TemplateProperties::default()
        },
    )
    .await
}

fn fixed_time(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// User `herald_fan` (id 1001), a migrated account that is not a bot.
pub fn sample_user() -> UserSnapshot {
    UserSnapshot {
        id: 1001,
        username: "herald_fan".to_string(),
        global_name: Some("Herald Fan".to_string()),
        discriminator: None,
        avatar_url: "https://cdn.discordapp.com/avatars/1001/abc.png".to_string(),
        banner_url: None,
        created_at: fixed_time(2020, 5, 17),
        bot: false,
    }
}

/// Member `Fanny` holding an uncolored `Moderator` role above a blue one.
pub fn sample_member() -> MemberSnapshot {
    MemberSnapshot {
        nickname: Some("Fanny".to_string()),
        joined_at: Some(fixed_time(2023, 1, 2)),
        roles: vec![
            RoleSnapshot {
                name: "Regular".to_string(),
                color: 0x0034_98db,
                position: 1,
            },
            RoleSnapshot {
                name: "Moderator".to_string(),
                color: 0,
                position: 5,
            },
        ],
        permissions: Some(vec!["Kick Members".to_string(), "Send Messages".to_string()]),
        display_name: "Fanny".to_string(),
    }
}

/// Guild `Herald Hall` (id 42) owned by user 9.
pub fn sample_guild() -> GuildSnapshot {
    GuildSnapshot {
        id: 42,
        name: "Herald Hall".to_string(),
        member_count: 1234,
        icon_url: Some("https://cdn.discordapp.com/icons/42/hall.png".to_string()),
        owner_id: 9,
        verification_level: "High".to_string(),
        created_at: fixed_time(2019, 3, 1),
        boost_count: Some(7),
        boost_tier: 2,
        description: Some("A hall for heralds".to_string()),
        system_channel_id: Some(77),
        vanity_url_code: None,
        banner_url: None,
    }
}

/// Text channel `#general` (id 77) in the sample guild.
pub fn sample_channel() -> ChannelSnapshot {
    ChannelSnapshot {
        id: 77,
        name: Some("general".to_string()),
        nsfw: Some(false),
        kind: "text".to_string(),
        guild_id: Some(42),
    }
}

/// Context with every sample part and no directory.
pub fn full_context() -> RenderContext {
    RenderContext::empty()
        .with_user(sample_user())
        .with_member(sample_member())
        .with_guild(sample_guild())
        .with_channel(sample_channel())
}
