//! Turns rendered embeds into serenity builders.

use crate::render::RenderedEmbed;
use poise::serenity_prelude as serenity;

/// Builds the serenity embed for a rendered template
#[must_use]
pub fn to_create_embed(embed: &RenderedEmbed) -> serenity::CreateEmbed {
    let mut builder = serenity::CreateEmbed::new().colour(embed.color);

    if let Some(title) = &embed.title {
        builder = builder.title(title);
    }
    if let Some(description) = &embed.description {
        builder = builder.description(description);
    }
    if let Some(url) = &embed.url {
        builder = builder.url(url);
    }
    if let Some(thumbnail) = &embed.thumbnail {
        builder = builder.thumbnail(thumbnail);
    }
    if let Some(image) = &embed.image {
        builder = builder.image(image);
    }

    if let Some(footer) = &embed.footer {
        let mut footer_builder = serenity::CreateEmbedFooter::new(&footer.text);
        if let Some(icon_url) = &footer.icon_url {
            footer_builder = footer_builder.icon_url(icon_url);
        }
        builder = builder.footer(footer_builder);
    }

    if let Some(author) = &embed.author {
        let mut author_builder = serenity::CreateEmbedAuthor::new(&author.name);
        if let Some(icon_url) = &author.icon_url {
            author_builder = author_builder.icon_url(icon_url);
        }
        if let Some(url) = &author.url {
            author_builder = author_builder.url(url);
        }
        builder = builder.author(author_builder);
    }

    builder = builder.fields(
        embed
            .fields
            .iter()
            .map(|field| (field.name.clone(), field.value.clone(), field.inline)),
    );

    if let Some(timestamp) = embed
        .timestamp
        .and_then(|at| serenity::Timestamp::from_unix_timestamp(at.timestamp()).ok())
    {
        builder = builder.timestamp(timestamp);
    }

    builder
}

/// Reply carrying `content` (if any) and the given embeds
#[must_use]
pub fn reply_with_embeds(content: Option<String>, embeds: &[RenderedEmbed]) -> poise::CreateReply {
    let reply = content.map_or_else(poise::CreateReply::default, |content| {
        poise::CreateReply::default().content(content)
    });
    embeds
        .iter()
        .fold(reply, |reply, embed| reply.embed(to_create_embed(embed)))
}

/// Channel message carrying `content` (if any) and the given embeds
#[must_use]
pub fn message_with_embeds(
    content: Option<String>,
    embeds: &[RenderedEmbed],
) -> serenity::CreateMessage {
    let message = content.map_or_else(serenity::CreateMessage::new, |content| {
        serenity::CreateMessage::new().content(content)
    });
    message.embeds(embeds.iter().map(to_create_embed).collect())
}
