//! General Discord commands - ping, help, and the placeholder reference.
//! These commands don't touch the database and provide basic bot functionality
//! and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
        placeholder::PlaceholderRegistry,
        render::DEFAULT_ACCENT_COLOR,
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let prefix = &ctx.data().settings.command.secondary_prefix;
        let help_text = format!(
            "**GuildHerald Help**\n\
            Design embeds once, then greet members with them.\n\n\
            **Embed Commands**\n\
            • `/embed-builder add <name> [properties]` - Creates an embed.\n\
            • `/embed-builder set <name> [properties]` - Changes an embed.\n\
            • `/embed-builder view <name>` - Previews an embed.\n\
            • `/embed-builder list` - Lists this server's embeds.\n\
            • `/embed-builder add-field` / `remove-field` - Edits an embed's fields.\n\
            • `/embed-builder delete <name>` - Deletes an embed.\n\n\
            **Greeting Commands**\n\
            • `/welcome set|toggle|test` - Message sent when a member joins.\n\
            • `/goodbye set|toggle|test` - Message sent when a member leaves.\n\n\
            **Role Commands**\n\
            • `/role-manager initialize` - Posts a message for role buttons.\n\
            • `/role-manager attach-role` - Adds a button that toggles a role.\n\n\
            **Utility Commands**\n\
            • `/variables` - Lists the placeholders you can use in embeds.\n\
            • `/ping` - Checks if the bot is responsive.\n\
            • `/help` - Shows this help message.\n\n\
            Every command also works with the `{prefix}` prefix."
        );

        ctx.say(help_text).await?;
        Ok(())
    }

    /// One embed field per category listing its placeholders
    pub(crate) fn placeholder_reference(
        registry: &PlaceholderRegistry,
    ) -> Result<Vec<(String, String)>> {
        let mut sections = Vec::new();
        for (category, definitions) in registry.list_by_category() {
            let mut body = String::new();
            for definition in definitions {
                writeln!(body, "`{}` - {}", definition.token, definition.description)?;
            }
            sections.push((category.label().to_string(), body));
        }
        Ok(sections)
    }

    /// Lists every placeholder usable in embeds and greeting messages.
    #[poise::command(slash_command, prefix_command)]
    pub async fn variables(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let sections = placeholder_reference(&ctx.data().registry)?;

        let embed = serenity::CreateEmbed::new()
            .title("Available Variables")
            .description(
                "Use these in any embed text or greeting message. \
                 Wrap one as `\\{user}\\` to show it literally.",
            )
            .colour(DEFAULT_ACCENT_COLOR)
            .fields(sections.into_iter().map(|(name, body)| (name, body, false)));

        ctx.send(poise::CreateReply::default().embed(embed))
            .await?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        #![allow(clippy::unwrap_used)]
        use super::*;

        #[test]
        fn test_placeholder_reference_fits_embed_fields() {
            let registry = PlaceholderRegistry::with_defaults("tx!");
            let sections = placeholder_reference(&registry).unwrap();

            let labels: Vec<_> = sections.iter().map(|(label, _)| label.as_str()).collect();
            assert_eq!(
                labels,
                vec!["User", "Member", "Guild", "Channel", "Datetime", "Utility"]
            );
            // Discord caps embed field values at 1024 characters
            assert!(sections.iter().all(|(_, body)| body.len() <= 1024));
            assert!(sections[0].1.starts_with("`{user}` - "));
        }
    }
}

// Re-export all commands
pub use inner::*;
