//! Embed builder Discord commands - `/embed-builder` and its subcommands.
//!
//! Templates are authored here and previewed against the author's own context,
//! so a preview shows what a greeting for the author would look like.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            context::invocation_context,
            embeds::reply_with_embeds,
            handlers::autocomplete,
        },
        core::{
            template::{self, TemplateProperties},
            validation::validate_properties,
        },
        errors::{Error, Result},
        render::render_template,
    };
    use std::fmt::Write;

    type Context<'a> = poise::Context<'a, BotData, Error>;

    fn guild_key(ctx: Context<'_>) -> Result<String> {
        ctx.guild_id()
            .map(|id| id.to_string())
            .ok_or_else(|| Error::InvalidInput {
                message: "This command can only be used in a server.".to_string(),
            })
    }

    /// Renders `name` for the author and replies with it under `heading`.
    async fn send_preview(
        ctx: Context<'_>,
        guild_id: &str,
        name: &str,
        heading: String,
    ) -> Result<()> {
        let data = ctx.data();
        let template = template::load_template(&data.database, guild_id, name)
            .await?
            .ok_or_else(|| Error::TemplateNotFound {
                name: name.to_string(),
            })?;
        let render_ctx = invocation_context(ctx).await;
        let embed = render_template(&data.registry, &template, &render_ctx).await;

        ctx.send(reply_with_embeds(Some(heading), std::slice::from_ref(&embed)))
            .await?;
        Ok(())
    }

    /// Create, edit and preview embed templates.
    #[poise::command(
        slash_command,
        prefix_command,
        rename = "embed-builder",
        guild_only,
        required_permissions = "MANAGE_GUILD",
        subcommands(
            "embed_add",
            "embed_view",
            "embed_list",
            "embed_set",
            "embed_delete",
            "embed_add_field",
            "embed_remove_field"
        )
    )]
    pub async fn embed_builder(ctx: Context<'_>) -> Result<()> {
        let help_text = "Embed builder command. Available subcommands:\n\
            `/embed-builder add` - Create a new embed\n\
            `/embed-builder view` - Preview an embed\n\
            `/embed-builder list` - List this server's embeds\n\
            `/embed-builder set` - Change properties of an embed\n\
            `/embed-builder delete` - Delete an embed\n\
            `/embed-builder add-field` - Append a field to an embed\n\
            `/embed-builder remove-field` - Remove a field from an embed\n\n\
            Text properties may use placeholders; see `/variables`.";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Creates a new embed template.
    #[poise::command(slash_command, prefix_command, rename = "add", guild_only)]
    #[allow(clippy::too_many_arguments)]
    pub async fn embed_add(
        ctx: Context<'_>,
        #[description = "Unique name for this embed"] name: String,
        #[description = "Embed title"] title: Option<String>,
        #[description = "Embed description"] description: Option<String>,
        #[description = "Hex color, e.g. #5865F2"] color: Option<String>,
        #[description = "URL the title links to"] url: Option<String>,
        #[description = "Thumbnail image URL"] thumbnail: Option<String>,
        #[description = "Large image URL"] image: Option<String>,
        #[description = "Footer text"] footer: Option<String>,
        #[description = "Footer icon URL"] footer_icon: Option<String>,
        #[description = "Author name"] author_name: Option<String>,
        #[description = "Author icon URL"] author_icon: Option<String>,
        #[description = "URL the author name links to"] author_url: Option<String>,
        #[description = "Show the time the embed was sent"] timestamp: Option<bool>,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let properties = TemplateProperties {
            title,
            description,
            url,
            color,
            thumbnail,
            image,
            footer,
            footer_icon_url: footer_icon,
            author_name,
            author_icon_url: author_icon,
            author_url,
            timestamp,
        }
        .normalized();

        let data = ctx.data();
        let render_ctx = invocation_context(ctx).await;
        validate_properties(&data.registry, &render_ctx, &properties).await?;

        let created = template::create_template(&data.database, &guild_id, &name, properties).await?;
        send_preview(
            ctx,
            &guild_id,
            &created.name,
            format!("✅ Embed `{}` created. Preview:", created.name),
        )
        .await
    }

    /// Shows a rendered preview of an embed template.
    #[poise::command(slash_command, prefix_command, rename = "view", guild_only)]
    pub async fn embed_view(
        ctx: Context<'_>,
        #[description = "Embed to preview"]
        #[autocomplete = "autocomplete::autocomplete_template_name"]
        name: String,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        send_preview(ctx, &guild_id, &name, format!("Preview of `{}`:", name.trim())).await
    }

    /// Lists this server's embed templates.
    #[poise::command(slash_command, prefix_command, rename = "list", guild_only)]
    pub async fn embed_list(ctx: Context<'_>) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let templates = template::list_templates(&ctx.data().database, &guild_id).await?;

        if templates.is_empty() {
            ctx.say("No embeds yet. Create one with `/embed-builder add`.")
                .await?;
            return Ok(());
        }

        let mut response = format!("**Embeds ({})**\n", templates.len());
        for template in &templates {
            match &template.title {
                Some(title) => writeln!(response, "• `{}` - {title}", template.name)?,
                None => writeln!(response, "• `{}`", template.name)?,
            }
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Changes properties of an existing embed template. Only the options you
    /// supply are changed.
    #[poise::command(slash_command, prefix_command, rename = "set", guild_only)]
    #[allow(clippy::too_many_arguments)]
    pub async fn embed_set(
        ctx: Context<'_>,
        #[description = "Embed to change"]
        #[autocomplete = "autocomplete::autocomplete_template_name"]
        name: String,
        #[description = "Embed title"] title: Option<String>,
        #[description = "Embed description"] description: Option<String>,
        #[description = "Hex color, e.g. #5865F2"] color: Option<String>,
        #[description = "URL the title links to"] url: Option<String>,
        #[description = "Thumbnail image URL"] thumbnail: Option<String>,
        #[description = "Large image URL"] image: Option<String>,
        #[description = "Footer text"] footer: Option<String>,
        #[description = "Footer icon URL"] footer_icon: Option<String>,
        #[description = "Author name"] author_name: Option<String>,
        #[description = "Author icon URL"] author_icon: Option<String>,
        #[description = "URL the author name links to"] author_url: Option<String>,
        #[description = "Show the time the embed was sent"] timestamp: Option<bool>,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let properties = TemplateProperties {
            title,
            description,
            url,
            color,
            thumbnail,
            image,
            footer,
            footer_icon_url: footer_icon,
            author_name,
            author_icon_url: author_icon,
            author_url,
            timestamp,
        }
        .normalized();

        let data = ctx.data();
        let render_ctx = invocation_context(ctx).await;
        validate_properties(&data.registry, &render_ctx, &properties).await?;

        let updated = template::update_template(&data.database, &guild_id, &name, properties).await?;
        send_preview(
            ctx,
            &guild_id,
            &updated.name,
            format!("✅ Embed `{}` updated. Preview:", updated.name),
        )
        .await
    }

    /// Deletes an embed template and its fields.
    #[poise::command(slash_command, prefix_command, rename = "delete", guild_only)]
    pub async fn embed_delete(
        ctx: Context<'_>,
        #[description = "Embed to delete"]
        #[autocomplete = "autocomplete::autocomplete_template_name"]
        name: String,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        template::delete_template(&ctx.data().database, &guild_id, &name).await?;
        ctx.say(format!("🗑️ Embed `{}` deleted.", name.trim()))
            .await?;
        Ok(())
    }

    /// Appends a field to an embed template.
    #[poise::command(slash_command, prefix_command, rename = "add-field", guild_only)]
    pub async fn embed_add_field(
        ctx: Context<'_>,
        #[description = "Embed to add the field to"]
        #[autocomplete = "autocomplete::autocomplete_template_name"]
        name: String,
        #[description = "Field title"] field_name: String,
        #[description = "Field body"] value: String,
        #[description = "Show beside neighbouring fields (default: no)"] inline: Option<bool>,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let field = template::add_field(
            &ctx.data().database,
            &guild_id,
            &name,
            &field_name,
            &value,
            inline.unwrap_or(false),
        )
        .await?;

        send_preview(
            ctx,
            &guild_id,
            &name,
            format!("✅ Added field #{} to `{}`. Preview:", field.position + 1, name.trim()),
        )
        .await
    }

    /// Removes a field from an embed template by its number.
    #[poise::command(slash_command, prefix_command, rename = "remove-field", guild_only)]
    pub async fn embed_remove_field(
        ctx: Context<'_>,
        #[description = "Embed to remove the field from"]
        #[autocomplete = "autocomplete::autocomplete_template_name"]
        name: String,
        #[description = "Field number, starting at 1"]
        #[min = 1]
        index: u32,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let index = usize::try_from(index).unwrap_or(usize::MAX);
        let removed = template::remove_field(&ctx.data().database, &guild_id, &name, index).await?;

        ctx.say(format!(
            "🗑️ Removed field #{index} (`{}`) from `{}`.",
            removed.name,
            name.trim()
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
