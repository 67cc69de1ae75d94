//! Tagged-variant tree that template data is rendered over.

use std::collections::BTreeMap;

/// One value in a template tree
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<TemplateNode>),
    Record(BTreeMap<String, TemplateNode>),
}

impl TemplateNode {
    /// Builds a record from `(key, value)` pairs
    pub fn record<const N: usize>(entries: [(&str, Self); N]) -> Self {
        Self::Record(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }

    /// Member of a record, `None` for other variants or missing keys
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Record(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Text content if non-empty
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    /// Non-empty text stored under `key`
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Self::as_text)
    }

    /// Boolean stored under `key`, false otherwise
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Self::Bool(true)))
    }

    /// Elements stored under `key`, empty otherwise
    #[must_use]
    pub fn items(&self, key: &str) -> &[Self] {
        match self.get(key) {
            Some(Self::List(items)) => items,
            _ => &[],
        }
    }
}

impl From<Option<String>> for TemplateNode {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::Text)
    }
}

impl From<String> for TemplateNode {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for TemplateNode {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let node = TemplateNode::record([
            ("title", TemplateNode::from("Hello".to_string())),
            ("empty", TemplateNode::from(String::new())),
            ("missing", TemplateNode::Null),
            ("timestamp", TemplateNode::Bool(true)),
            ("fields", TemplateNode::List(vec![TemplateNode::Null])),
        ]);

        assert_eq!(node.text("title"), Some("Hello"));
        assert_eq!(node.text("empty"), None);
        assert_eq!(node.text("missing"), None);
        assert_eq!(node.text("nope"), None);
        assert!(node.flag("timestamp"));
        assert!(!node.flag("title"));
        assert_eq!(node.items("fields").len(), 1);
        assert!(node.items("title").is_empty());
        assert!(TemplateNode::Null.get("title").is_none());
    }
}
