//! Display-ready embed assembled from a rendered template tree.

use super::node::TemplateNode;
use chrono::{DateTime, Utc};

/// Accent color used when a template has none (or an unusable one)
pub const DEFAULT_ACCENT_COLOR: u32 = 0x0058_65F2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFooter {
    pub text: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAuthor {
    pub name: String,
    pub icon_url: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Fully substituted embed, independent of any chat SDK
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmbed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub color: u32,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
    pub footer: Option<RenderedFooter>,
    pub author: Option<RenderedAuthor>,
    pub fields: Vec<RenderedField>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Parses `#RRGGBB` (or `RRGGBB`) into an RGB value
#[must_use]
pub fn parse_hex_color(value: &str) -> Option<u32> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

fn owned(node: &TemplateNode, key: &str) -> Option<String> {
    node.text(key).map(str::to_string)
}

impl RenderedEmbed {
    /// Builds the embed from an already substituted template tree.
    ///
    /// Empty strings count as unset. The footer needs footer text and the
    /// author needs a name to be attached; fields missing a name or value
    /// are dropped since the platform rejects them.
    #[must_use]
    pub fn assemble(rendered: &TemplateNode, now: DateTime<Utc>) -> Self {
        let footer = owned(rendered, "footer").map(|text| RenderedFooter {
            text,
            icon_url: owned(rendered, "footer_icon_url"),
        });

        let author = rendered.get("author").and_then(|author| {
            owned(author, "name").map(|name| RenderedAuthor {
                name,
                icon_url: owned(author, "icon_url"),
                url: owned(author, "url"),
            })
        });

        let fields = rendered
            .items("fields")
            .iter()
            .filter_map(|field| {
                Some(RenderedField {
                    name: owned(field, "name")?,
                    value: owned(field, "value")?,
                    inline: field.flag("inline"),
                })
            })
            .collect();

        Self {
            title: owned(rendered, "title"),
            description: owned(rendered, "description"),
            url: owned(rendered, "url"),
            color: rendered
                .text("color")
                .and_then(parse_hex_color)
                .unwrap_or(DEFAULT_ACCENT_COLOR),
            thumbnail: owned(rendered, "thumbnail"),
            image: owned(rendered, "image"),
            footer,
            author,
            fields,
            timestamp: rendered.flag("timestamp").then_some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> TemplateNode {
        TemplateNode::Text(value.to_string())
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#5865F2"), Some(0x5865F2));
        assert_eq!(parse_hex_color("ffffff"), Some(0xFFFFFF));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
        assert_eq!(parse_hex_color(""), None);
    }

    #[test]
    fn test_footer_and_author_need_text() {
        let node = TemplateNode::record([
            ("footer", text("")),
            ("footer_icon_url", text("https://x.test/i.png")),
            (
                "author",
                TemplateNode::record([("name", text("")), ("url", text("https://x.test"))]),
            ),
        ]);
        let embed = RenderedEmbed::assemble(&node, Utc::now());
        assert!(embed.footer.is_none());
        assert!(embed.author.is_none());
    }

    #[test]
    fn test_fields_missing_value_are_dropped() {
        let node = TemplateNode::record([(
            "fields",
            TemplateNode::List(vec![
                TemplateNode::record([("name", text("kept")), ("value", text("v"))]),
                TemplateNode::record([("name", text("dropped")), ("value", text(""))]),
            ]),
        )]);
        let embed = RenderedEmbed::assemble(&node, Utc::now());
        assert_eq!(embed.fields.len(), 1);
        assert_eq!(embed.fields[0].name, "kept");
        assert!(!embed.fields[0].inline);
    }

    #[test]
    fn test_bad_color_falls_back() {
        let node = TemplateNode::record([("color", text("Unknown"))]);
        let embed = RenderedEmbed::assemble(&node, Utc::now());
        assert_eq!(embed.color, DEFAULT_ACCENT_COLOR);
        assert!(embed.timestamp.is_none());
    }
}
