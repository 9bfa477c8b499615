//! Defines the [`Sanitizer`] trait and its [`ammonia`]-backed implementation.

use thiserror::Error;

/// Strips unsafe markup from HTML before it is syndicated.
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, html: &str) -> Result<String, Error>;
}

/// A [`Sanitizer`] applying [`ammonia`]'s default allowlist: scripts,
/// styles, event handler attributes, and non-http(s)/mailto URLs are
/// removed. Unlike ammonia's default, no `rel` attribute is added to links.
pub struct AmmoniaSanitizer {
    builder: ammonia::Builder<'static>,
}

impl AmmoniaSanitizer {
    pub fn new() -> AmmoniaSanitizer {
        let mut builder = ammonia::Builder::default();
        builder.link_rel(None);
        AmmoniaSanitizer { builder }
    }
}

impl Default for AmmoniaSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sanitizer for AmmoniaSanitizer {
    fn sanitize(&self, html: &str) -> Result<String, Error> {
        Ok(self.builder.clean(html).to_string())
    }
}

/// Represents a failure to sanitize HTML. The bundled [`AmmoniaSanitizer`]
/// never fails; other implementations may reject their input.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when the sanitizer refuses its input.
    #[error("sanitizing html: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod test {
    use super::*;

    fn sanitize(html: &str) -> String {
        AmmoniaSanitizer::new().sanitize(html).unwrap()
    }

    #[test]
    fn test_sanitize_strips_scripts() {
        let clean = sanitize("<p>hi</p><script>alert('x')</script>");
        assert_eq!("<p>hi</p>", clean);
    }

    #[test]
    fn test_sanitize_strips_event_handlers() {
        let clean = sanitize(r#"<img src="a.png" onerror="alert(1)"><p onclick="x()">t</p>"#);
        assert!(!clean.contains("onerror"), "{}", clean);
        assert!(!clean.contains("onclick"), "{}", clean);
        assert!(clean.contains(r#"src="a.png""#), "{}", clean);
    }

    #[test]
    fn test_sanitize_strips_javascript_urls() {
        let clean = sanitize(r#"<a href="javascript:alert(1)">x</a>"#);
        assert!(!clean.contains("javascript"), "{}", clean);
    }

    #[test]
    fn test_sanitize_keeps_links_without_rel() {
        let clean = sanitize(r#"<a href="https://example.com/">Permalink</a><br>"#);
        assert_eq!(r#"<a href="https://example.com/">Permalink</a><br>"#, clean);
    }

    #[test]
    fn test_sanitize_keeps_rendered_markdown() {
        assert_eq!("<h1>Hi</h1>\n<p>World</p>\n", sanitize("<h1>Hi</h1>\n<p>World</p>\n"));
    }
}
