//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggests embed template names from the invoking guild as the user types.

use crate::{bot::BotData, core::template, errors::Error};

/// Discord shows at most this many suggestions
const MAX_SUGGESTIONS: u64 = 25;

/// Provides autocomplete suggestions for embed template names.
///
/// Returns up to 25 names from the invoking guild containing `partial`, sorted
/// alphabetically. Lookup failures produce no suggestions.
pub async fn autocomplete_template_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Some(guild_id) = ctx.guild_id() else {
        return Vec::new();
    };

    template::search_template_names(
        &ctx.data().database,
        &guild_id.to_string(),
        partial.trim(),
        MAX_SUGGESTIONS,
    )
    .await
    .unwrap_or_default()
}
