//! Template renderer.
//!
//! Walks a template tree, substitutes every string leaf through the
//! [`PlaceholderRegistry`], and assembles the result into a
//! [`RenderedEmbed`]. Rendering cannot fail; a template whose placeholders
//! all fail still renders, with `"Unknown"` in their place.

/// Rendered embed structure
pub mod embed;
/// Template tree
pub mod node;
/// Renderer input
pub mod template;

pub use embed::{
    DEFAULT_ACCENT_COLOR, RenderedAuthor, RenderedEmbed, RenderedField, RenderedFooter,
    parse_hex_color,
};
pub use node::TemplateNode;
pub use template::{EmbedTemplate, TemplateAuthor, TemplateField};

use crate::placeholder::{PlaceholderRegistry, RenderContext};
use chrono::Utc;
use poise::BoxFuture;
use tracing::debug;

/// Embeds a single message may carry
pub const MAX_EMBEDS_PER_MESSAGE: usize = 10;

/// Record keys that belong to storage and are never rendered
const INTERNAL_KEYS: [&str; 4] = ["id", "guild_id", "template_id", "position"];

/// Renders a tree, resolving each string leaf one at a time.
///
/// Record members resolve in key order and list items in list order.
/// Records lose their internal keys. Null and scalars pass through unchanged.
pub fn render_node<'a>(
    registry: &'a PlaceholderRegistry,
    node: &'a TemplateNode,
    ctx: &'a RenderContext,
) -> BoxFuture<'a, TemplateNode> {
    Box::pin(async move {
        match node {
            TemplateNode::Text(text) => TemplateNode::Text(registry.parse(text, ctx).await),
            TemplateNode::List(items) => {
                let mut rendered = Vec::with_capacity(items.len());
                for item in items {
                    rendered.push(render_node(registry, item, ctx).await);
                }
                TemplateNode::List(rendered)
            }
            TemplateNode::Record(entries) => {
                let mut rendered = std::collections::BTreeMap::new();
                for (key, value) in entries {
                    if INTERNAL_KEYS.contains(&key.as_str()) {
                        continue;
                    }
                    rendered.insert(key.clone(), render_node(registry, value, ctx).await);
                }
                TemplateNode::Record(rendered)
            }
            TemplateNode::Null | TemplateNode::Bool(_) | TemplateNode::Number(_) => node.clone(),
        }
    })
}

/// Renders one template. Each call stamps its own timestamp.
pub async fn render_template(
    registry: &PlaceholderRegistry,
    template: &EmbedTemplate,
    ctx: &RenderContext,
) -> RenderedEmbed {
    debug!(template = %template.name, "rendering embed template");
    let tree = template.to_node();
    let rendered = render_node(registry, &tree, ctx).await;
    RenderedEmbed::assemble(&rendered, Utc::now())
}

/// Renders templates in order, stopping at [`MAX_EMBEDS_PER_MESSAGE`].
/// Templates past the cap are not rendered at all.
pub async fn render_templates(
    registry: &PlaceholderRegistry,
    templates: &[EmbedTemplate],
    ctx: &RenderContext,
) -> Vec<RenderedEmbed> {
    if templates.len() > MAX_EMBEDS_PER_MESSAGE {
        debug!(
            requested = templates.len(),
            "dropping embeds beyond the per-message limit"
        );
    }

    let mut embeds = Vec::with_capacity(templates.len().min(MAX_EMBEDS_PER_MESSAGE));
    for template in templates.iter().take(MAX_EMBEDS_PER_MESSAGE) {
        embeds.push(render_template(registry, template, ctx).await);
    }
    embeds
}
