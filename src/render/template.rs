//! Plain template data handed to the renderer.
//!
//! This mirrors what the template store persists, minus storage details.
//! [`EmbedTemplate::to_node`] converts it into the tree the renderer walks.

use super::node::TemplateNode;

/// Author block of a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateAuthor {
    pub name: Option<String>,
    pub icon_url: Option<String>,
    pub url: Option<String>,
}

/// One embed field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A named, renderable rich-message description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedTemplate {
    /// Storage id, if this came from the database
    pub id: Option<i64>,
    /// Owning guild, if this came from the database
    pub guild_id: Option<String>,
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Clickable-title URL
    pub url: Option<String>,
    /// `#RRGGBB`
    pub color: Option<String>,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
    pub footer: Option<String>,
    pub footer_icon_url: Option<String>,
    /// Stamp the render time on the embed
    pub timestamp: bool,
    pub author: Option<TemplateAuthor>,
    pub fields: Vec<TemplateField>,
}

impl EmbedTemplate {
    /// Template with only a name set
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Tree form of this template. Storage keys are included so the
    /// renderer's key filter stays the only place that knows about them.
    #[must_use]
    pub fn to_node(&self) -> TemplateNode {
        let author = self.author.as_ref().map_or(TemplateNode::Null, |author| {
            TemplateNode::record([
                ("name", author.name.clone().into()),
                ("icon_url", author.icon_url.clone().into()),
                ("url", author.url.clone().into()),
            ])
        });

        #[allow(clippy::cast_precision_loss)] // ids stay far below 2^52
        let id = self.id.map_or(TemplateNode::Null, |id| TemplateNode::Number(id as f64));

        let fields = self
            .fields
            .iter()
            .enumerate()
            .map(|(position, field)| {
                #[allow(clippy::cast_precision_loss)]
                let position = TemplateNode::Number(position as f64);
                TemplateNode::record([
                    ("position", position),
                    ("name", field.name.clone().into()),
                    ("value", field.value.clone().into()),
                    ("inline", field.inline.into()),
                ])
            })
            .collect();

        TemplateNode::record([
            ("id", id),
            ("guild_id", self.guild_id.clone().into()),
            ("name", self.name.clone().into()),
            ("title", self.title.clone().into()),
            ("description", self.description.clone().into()),
            ("url", self.url.clone().into()),
            ("color", self.color.clone().into()),
            ("thumbnail", self.thumbnail.clone().into()),
            ("image", self.image.clone().into()),
            ("footer", self.footer.clone().into()),
            ("footer_icon_url", self.footer_icon_url.clone().into()),
            ("timestamp", self.timestamp.into()),
            ("author", author),
            ("fields", TemplateNode::List(fields)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_node_shape() {
        let template = EmbedTemplate {
            id: Some(3),
            title: Some("Hi".to_string()),
            timestamp: true,
            author: Some(TemplateAuthor {
                name: Some("{user}".to_string()),
                ..TemplateAuthor::default()
            }),
            fields: vec![TemplateField {
                name: "a".to_string(),
                value: "b".to_string(),
                inline: true,
            }],
            ..EmbedTemplate::named("greet")
        };

        let node = template.to_node();
        assert_eq!(node.text("name"), Some("greet"));
        assert_eq!(node.text("title"), Some("Hi"));
        assert_eq!(node.get("id"), Some(&TemplateNode::Number(3.0)));
        assert!(node.flag("timestamp"));
        assert_eq!(node.get("author").and_then(|a| a.text("name")), Some("{user}"));
        assert_eq!(node.get("description"), Some(&TemplateNode::Null));

        let fields = node.items("fields");
        assert_eq!(fields.len(), 1);
        assert!(fields[0].flag("inline"));
    }

    #[test]
    fn test_missing_author_is_null() {
        let node = EmbedTemplate::named("x").to_node();
        assert_eq!(node.get("author"), Some(&TemplateNode::Null));
        assert!(node.items("fields").is_empty());
    }
}
