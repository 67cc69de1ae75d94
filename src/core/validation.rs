//! Authoring-time validation for embed template properties.
//!
//! URL-valued properties may contain placeholders (for example
//! `{user.avatarUrl}`), so they are substituted against the author's own
//! context before being checked. Validation only runs when a template is
//! created or updated; renders for join/leave events do not repeat it.

use super::template::TemplateProperties;
use crate::errors::{Error, Result};
use crate::placeholder::{PlaceholderRegistry, RenderContext};
use regex::Regex;
use std::sync::LazyLock;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap()
});

static HTTP_URL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(?i)^https?://\S+$").unwrap()
});

/// Checks that `value` is a `#RRGGBB` hex color.
pub fn validate_color(value: &str) -> Result<()> {
    if HEX_COLOR.is_match(value.trim()) {
        Ok(())
    } else {
        Err(Error::InvalidColor {
            value: value.to_string(),
        })
    }
}

/// Whether `value` is an absolute http(s) URL
#[must_use]
pub fn is_http_url(value: &str) -> bool {
    HTTP_URL.is_match(value.trim())
}

/// Substitutes `raw` and checks the result is an http(s) URL.
pub async fn validate_url(
    registry: &PlaceholderRegistry,
    ctx: &RenderContext,
    field: &'static str,
    raw: &str,
) -> Result<()> {
    let rendered = registry.parse(raw, ctx).await;
    if is_http_url(&rendered) {
        Ok(())
    } else {
        Err(Error::InvalidUrl {
            field,
            value: raw.to_string(),
        })
    }
}

/// Validates the color and every supplied URL property, stopping at the
/// first failure.
pub async fn validate_properties(
    registry: &PlaceholderRegistry,
    ctx: &RenderContext,
    properties: &TemplateProperties,
) -> Result<()> {
    if let Some(color) = &properties.color {
        validate_color(color)?;
    }

    for (field, value) in properties.url_fields() {
        if let Some(raw) = value {
            validate_url(registry, ctx, field, raw).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::full_context;

    fn registry() -> PlaceholderRegistry {
        PlaceholderRegistry::with_defaults("tx!")
    }

    #[test]
    fn test_validate_color() {
        assert!(validate_color("#5865F2").is_ok());
        assert!(validate_color("#abcdef").is_ok());
        assert!(matches!(
            validate_color("5865F2"),
            Err(Error::InvalidColor { .. })
        ));
        assert!(validate_color("#12345").is_err());
        assert!(validate_color("#12345G").is_err());
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://example.com/a.png"));
        assert!(is_http_url("HTTP://EXAMPLE.COM"));
        assert!(is_http_url("  https://padded.test  "));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("https://has space.test"));
        assert!(!is_http_url(""));
    }

    #[tokio::test]
    async fn test_placeholder_urls_are_checked_after_substitution() {
        let registry = registry();
        let ctx = full_context();

        assert!(
            validate_url(&registry, &ctx, "thumbnail", "{user.avatarUrl}")
                .await
                .is_ok()
        );

        // No banner in the sample context, so this renders to "Unknown"
        let err = validate_url(&registry, &ctx, "image", "{user.bannerUrl}")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidUrl {
                field: "image",
                ref value
            } if value == "{user.bannerUrl}"
        ));
    }

    #[tokio::test]
    async fn test_validate_properties_stops_at_first_problem() {
        let registry = registry();
        let ctx = full_context();

        let properties = TemplateProperties {
            url: Some("https://ok.test".to_string()),
            footer_icon_url: Some("not a url".to_string()),
            ..TemplateProperties::default()
        };
        let err = validate_properties(&registry, &ctx, &properties)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { field: "footer icon", .. }));

        let properties = TemplateProperties {
            color: Some("red".to_string()),
            image: Some("nope".to_string()),
            ..TemplateProperties::default()
        };
        let err = validate_properties(&registry, &ctx, &properties)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidColor { .. }));

        assert!(
            validate_properties(&registry, &ctx, &TemplateProperties::default())
                .await
                .is_ok()
        );
    }
}
