//! Placeholder registry and resolver.
//!
//! Templates embed `{category.field}` tokens that are substituted at render
//! time. A [`PlaceholderRegistry`] maps each token to a [`Resolve`]
//! implementation; [`PlaceholderRegistry::parse`] tokenizes a string and
//! substitutes every known token in order. Parsing never fails: unknown
//! tokens pass through as written, and known tokens whose resolver has
//! nothing to offer become [`UNKNOWN`].
//!
//! The registry is built once at startup and shared read-only between
//! renders; there is no global instance.

/// Built-in placeholder set
pub mod builtins;
/// Rendering context and Discord snapshots
pub mod context;
/// Brace tokenizer
pub mod tokenizer;

pub use context::{
    ChannelSnapshot, GuildDirectory, GuildSnapshot, MemberSnapshot, RenderContext, RoleSnapshot,
    UserSnapshot,
};

use poise::BoxFuture;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokenizer::Token;
use tracing::warn;

/// Text substituted for a known placeholder that could not be resolved
pub const UNKNOWN: &str = "Unknown";

/// Outcome of resolving one placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Resolved text
    Value(String),
    /// The context lacks what this placeholder needs
    Absent,
    /// The lookup was attempted and failed
    Failed(String),
}

impl Resolution {
    /// The text to splice into the output
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Value(text) => text,
            Self::Absent | Self::Failed(_) => UNKNOWN.to_string(),
        }
    }
}

impl From<Option<String>> for Resolution {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Absent, Self::Value)
    }
}

impl From<String> for Resolution {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for Resolution {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

/// Produces the value of one placeholder for a context.
///
/// Plain functions and closures taking `&RenderContext` and returning a
/// [`Resolution`] implement this automatically; implement it by hand for
/// resolvers that need to await something.
pub trait Resolve: Send + Sync {
    /// Resolves against `ctx`
    fn resolve<'a>(&'a self, ctx: &'a RenderContext) -> BoxFuture<'a, Resolution>;
}

impl<F> Resolve for F
where
    F: Fn(&RenderContext) -> Resolution + Send + Sync,
{
    fn resolve<'a>(&'a self, ctx: &'a RenderContext) -> BoxFuture<'a, Resolution> {
        let resolution = self(ctx);
        Box::pin(std::future::ready(resolution))
    }
}

/// Grouping used when listing placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    User,
    Member,
    Guild,
    Channel,
    Datetime,
    Utility,
}

impl Category {
    /// Every category in listing order
    pub const ALL: [Self; 6] = [
        Self::User,
        Self::Member,
        Self::Guild,
        Self::Channel,
        Self::Datetime,
        Self::Utility,
    ];

    /// Capitalized label for listings
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Member => "Member",
            Self::Guild => "Guild",
            Self::Channel => "Channel",
            Self::Datetime => "Datetime",
            Self::Utility => "Utility",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A registered placeholder
#[derive(Clone)]
pub struct PlaceholderDefinition {
    /// Literal token, braces included
    pub token: String,
    /// Help text
    pub description: String,
    /// Listing group
    pub category: Category,
    resolver: Arc<dyn Resolve>,
}

impl PlaceholderDefinition {
    /// Runs this placeholder's resolver
    pub async fn resolve(&self, ctx: &RenderContext) -> Resolution {
        self.resolver.resolve(ctx).await
    }
}

impl fmt::Debug for PlaceholderDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaceholderDefinition")
            .field("token", &self.token)
            .field("description", &self.description)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Token to resolver mapping
#[derive(Debug, Default, Clone)]
pub struct PlaceholderRegistry {
    placeholders: HashMap<String, PlaceholderDefinition>,
    // registration order, for stable listings
    order: Vec<String>,
}

impl PlaceholderRegistry {
    /// Registry with no placeholders
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in placeholder set.
    ///
    /// `secondary_prefix` is what `{prefix}` expands to.
    #[must_use]
    pub fn with_defaults(secondary_prefix: &str) -> Self {
        let mut registry = Self::new();
        builtins::register_defaults(&mut registry, secondary_prefix);
        registry
    }

    /// Inserts a placeholder, replacing any previous definition of `token`.
    /// A replaced token keeps its listing position.
    pub fn register<R>(
        &mut self,
        token: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        resolver: R,
    ) where
        R: Resolve + 'static,
    {
        let token = token.into();
        let definition = PlaceholderDefinition {
            token: token.clone(),
            description: description.into(),
            category,
            resolver: Arc::new(resolver),
        };
        if self.placeholders.insert(token.clone(), definition).is_none() {
            self.order.push(token);
        }
    }

    /// Looks up a token, braces included
    #[must_use]
    pub fn get(&self, token: &str) -> Option<&PlaceholderDefinition> {
        self.placeholders.get(token)
    }

    /// Number of registered placeholders
    #[must_use]
    pub fn len(&self) -> usize {
        self.placeholders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placeholders.is_empty()
    }

    /// Flat token to definition mapping
    #[must_use]
    pub const fn list(&self) -> &HashMap<String, PlaceholderDefinition> {
        &self.placeholders
    }

    /// Definitions grouped by category, in category then registration order.
    /// Categories without placeholders are left out.
    #[must_use]
    pub fn list_by_category(&self) -> Vec<(Category, Vec<&PlaceholderDefinition>)> {
        Category::ALL
            .iter()
            .filter_map(|&category| {
                let definitions: Vec<_> = self
                    .order
                    .iter()
                    .filter_map(|token| self.placeholders.get(token))
                    .filter(|definition| definition.category == category)
                    .collect();
                (!definitions.is_empty()).then_some((category, definitions))
            })
            .collect()
    }

    /// Substitutes every placeholder in `text`.
    ///
    /// Resolvers run one at a time in token order. Escaped tokens
    /// (`\{...}\`) are emitted without their backslashes and never looked
    /// up; unregistered tokens are emitted unchanged.
    pub async fn parse(&self, text: &str, ctx: &RenderContext) -> String {
        let mut parsed = String::with_capacity(text.len());

        for token in tokenizer::tokenize(text) {
            match token {
                Token::Literal(literal) | Token::Escaped(literal) => parsed.push_str(literal),
                Token::Placeholder(raw) => match self.placeholders.get(raw) {
                    Some(definition) => {
                        let resolution = definition.resolve(ctx).await;
                        if let Resolution::Failed(reason) = &resolution {
                            warn!(token = raw, %reason, "placeholder resolution failed");
                        }
                        parsed.push_str(&resolution.into_text());
                    }
                    None => parsed.push_str(raw),
                },
            }
        }

        parsed
    }
}
