//! Role manager Discord commands - `/role-manager initialize` and
//! `/role-manager attach-role`.
//!
//! The message's button rows are rebuilt from storage after every attach, so
//! Discord always shows exactly the stored buttons.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, context::invocation_context, embeds::message_with_embeds},
        core::role_manager::{
            self as roles, ButtonStyle, RoleButtonSpec, button_custom_id, button_rows,
            parse_discord_id,
        },
        entities::role_button,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    type Context<'a> = poise::Context<'a, BotData, Error>;

    fn guild_key(ctx: Context<'_>) -> Result<String> {
        ctx.guild_id()
            .map(|id| id.to_string())
            .ok_or_else(|| Error::InvalidInput {
                message: "This command can only be used in a server.".to_string(),
            })
    }

    /// Button colours offered by `attach-role`
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum ButtonStyleChoice {
        #[name = "primary"]
        Primary,
        #[name = "secondary"]
        Secondary,
        #[name = "success"]
        Success,
        #[name = "danger"]
        Danger,
    }

    impl From<ButtonStyleChoice> for ButtonStyle {
        fn from(choice: ButtonStyleChoice) -> Self {
            match choice {
                ButtonStyleChoice::Primary => Self::Primary,
                ButtonStyleChoice::Secondary => Self::Secondary,
                ButtonStyleChoice::Success => Self::Success,
                ButtonStyleChoice::Danger => Self::Danger,
            }
        }
    }

    const fn serenity_style(style: ButtonStyle) -> serenity::ButtonStyle {
        match style {
            ButtonStyle::Primary => serenity::ButtonStyle::Primary,
            ButtonStyle::Secondary => serenity::ButtonStyle::Secondary,
            ButtonStyle::Success => serenity::ButtonStyle::Success,
            ButtonStyle::Danger => serenity::ButtonStyle::Danger,
        }
    }

    fn create_button(button: &role_button::Model) -> Option<serenity::CreateButton> {
        let role_id = parse_discord_id(&button.role_id)?;
        let mut builder = serenity::CreateButton::new(button_custom_id(role_id))
            .label(&button.label)
            .style(serenity_style(ButtonStyle::parse(&button.style)));
        if let Some(emoji) = button
            .emoji
            .as_deref()
            .and_then(|emoji| serenity::ReactionType::try_from(emoji).ok())
        {
            builder = builder.emoji(emoji);
        }
        Some(builder)
    }

    /// Action rows for a role message's buttons, five to a row
    pub(crate) fn action_rows(buttons: &[role_button::Model]) -> Vec<serenity::CreateActionRow> {
        button_rows(buttons)
            .into_iter()
            .map(|row| {
                serenity::CreateActionRow::Buttons(row.iter().filter_map(create_button).collect())
            })
            .collect()
    }

    /// Position of the bot's highest role, if the guild is cached
    fn bot_top_role_position(ctx: Context<'_>) -> Option<u16> {
        let bot_id = ctx.cache().current_user().id;
        let guild = ctx.guild()?;
        let member = guild.members.get(&bot_id)?;
        Some(
            member
                .roles
                .iter()
                .filter_map(|id| guild.roles.get(id))
                .map(|role| role.position)
                .max()
                .unwrap_or(0),
        )
    }

    /// Manage messages whose buttons give members roles.
    #[poise::command(
        slash_command,
        prefix_command,
        rename = "role-manager",
        guild_only,
        required_permissions = "MANAGE_ROLES",
        subcommands("role_manager_initialize", "role_manager_attach_role")
    )]
    pub async fn role_manager(ctx: Context<'_>) -> Result<()> {
        ctx.say(
            "Role manager command. Available subcommands:\n\
            `/role-manager initialize` - Post a message to hold role buttons\n\
            `/role-manager attach-role` - Add a role button to that message",
        )
        .await?;
        Ok(())
    }

    /// Posts a role manager message built from text and saved embeds.
    #[poise::command(slash_command, prefix_command, rename = "initialize", guild_only)]
    pub async fn role_manager_initialize(
        ctx: Context<'_>,
        #[description = "The channel where the message will be sent"] channel: serenity::GuildChannel,
        #[description = "Text shown above the embeds; placeholders allowed"] message: Option<String>,
        #[rename = "embed-name"]
        #[description = "Embed names from `/embed-builder`, comma-separated"]
        embed_names: Option<String>,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        if !channel.is_text_based() {
            return Err(Error::InvalidInput {
                message: "Please provide a valid text channel.".to_string(),
            });
        }
        ctx.defer().await?;

        let data = ctx.data();
        let render_ctx = invocation_context(ctx).await;
        let post = roles::render_role_message(
            &data.database,
            &data.registry,
            &guild_id,
            message,
            embed_names.as_deref().unwrap_or_default(),
            &render_ctx,
        )
        .await?;

        let sent = channel
            .id
            .send_message(ctx.http(), message_with_embeds(post.content, &post.embeds))
            .await?;
        roles::register_role_message(&data.database, &guild_id, channel.id.get(), sent.id.get())
            .await?;

        ctx.say(format!(
            "✅ Role manager message posted in <#{}>.\nMessage ID: `{}`",
            channel.id, sent.id
        ))
        .await?;
        Ok(())
    }

    /// Adds a button to a role manager message that toggles a role.
    #[poise::command(slash_command, prefix_command, rename = "attach-role", guild_only)]
    pub async fn role_manager_attach_role(
        ctx: Context<'_>,
        #[rename = "message-id"]
        #[description = "ID of the role manager message"]
        message_id: String,
        #[description = "The role the button gives"] role: serenity::Role,
        #[rename = "button-style"]
        #[description = "The colour of the button"]
        button_style: ButtonStyleChoice,
        #[rename = "button-label"]
        #[description = "Text shown on the button"]
        button_label: String,
        #[description = "Emoji shown before the label"] emoji: Option<String>,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let message_id = parse_discord_id(&message_id).ok_or_else(|| Error::InvalidInput {
            message: format!("`{message_id}` is not a valid message ID."),
        })?;

        if role.managed {
            return Err(Error::InvalidInput {
                message: format!(
                    "<@&{}> is a managed role (bot/integration role) and cannot be assigned manually.",
                    role.id
                ),
            });
        }
        if bot_top_role_position(ctx).is_some_and(|top| role.position >= top) {
            return Err(Error::InvalidInput {
                message: format!(
                    "I cannot manage <@&{}> because it is higher than or equal to my highest role.",
                    role.id
                ),
            });
        }
        let emoji = emoji.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());
        if let Some(invalid) = emoji
            .as_deref()
            .filter(|emoji| serenity::ReactionType::try_from(*emoji).is_err())
        {
            return Err(Error::InvalidInput {
                message: format!("`{invalid}` is not a valid emoji."),
            });
        }
        ctx.defer().await?;

        let db = &ctx.data().database;
        let role_id = role.id.get();
        let (record, buttons) = roles::attach_role(
            db,
            &guild_id,
            message_id,
            RoleButtonSpec {
                role_id,
                label: button_label,
                style: button_style.into(),
                emoji,
            },
        )
        .await?;

        let Some(channel_id) = parse_discord_id(&record.channel_id) else {
            roles::detach_role(db, &guild_id, message_id, role_id).await?;
            return Err(Error::InvalidInput {
                message: "Could not find the channel for this role manager message.".to_string(),
            });
        };
        let edit = serenity::EditMessage::new().components(action_rows(&buttons));
        if let Err(err) = serenity::ChannelId::new(channel_id)
            .edit_message(ctx.http(), serenity::MessageId::new(message_id), edit)
            .await
        {
            roles::detach_role(db, &guild_id, message_id, role_id).await?;
            return Err(err.into());
        }

        ctx.say(format!(
            "✅ Added the <@&{role_id}> button to the role manager message."
        ))
        .await?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        #![allow(clippy::unwrap_used)]
        use super::*;

        fn button(position: i32, role_id: &str, emoji: Option<&str>) -> role_button::Model {
            role_button::Model {
                id: i64::from(position) + 1,
                role_message_id: 1,
                position,
                role_id: role_id.to_string(),
                label: format!("Role {position}"),
                style: "danger".to_string(),
                emoji: emoji.map(str::to_string),
            }
        }

        fn row_sizes(rows: &[serenity::CreateActionRow]) -> Vec<usize> {
            rows.iter()
                .map(|row| match row {
                    serenity::CreateActionRow::Buttons(buttons) => buttons.len(),
                    _ => 0,
                })
                .collect()
        }

        #[test]
        fn test_action_rows_hold_five_buttons() {
            let buttons: Vec<_> = (0..7)
                .map(|i| button(i, &(500 + i).to_string(), Some("🔴")))
                .collect();
            assert_eq!(row_sizes(&action_rows(&buttons)), vec![5, 2]);
        }

        #[test]
        fn test_action_rows_skip_unusable_role_ids() {
            let buttons = vec![button(0, "0", None), button(1, "501", None)];
            assert_eq!(row_sizes(&action_rows(&buttons)), vec![1]);
        }

        #[test]
        fn test_style_choices_map_to_stored_styles() {
            assert_eq!(ButtonStyle::from(ButtonStyleChoice::Danger), ButtonStyle::Danger);
            assert_eq!(
                serenity_style(ButtonStyle::parse("success")),
                serenity::ButtonStyle::Success
            );
        }
    }
}

// Re-export all commands
pub use inner::*;
