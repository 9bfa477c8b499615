//! Resolution of site-relative URLs into absolute ones. Anything syndicated
//! leaves the site, so URLs like `/blog/foo/` have to carry the site's
//! scheme and host.

use url::{ParseError, Url};

pub struct Resolver<'a> {
    site: &'a Url,
}

impl<'a> Resolver<'a> {
    /// Constructs a new `Resolver`
    ///
    /// # Arguments
    ///
    /// * `site` - the site's base URL (e.g., `https://example.org/`).
    pub fn new(site: &'a Url) -> Resolver<'a> {
        Resolver { site }
    }

    /// Resolves root-relative URLs (`/foo`) against the site, returning
    /// `None` for anything else: absolute URLs, fragments, protocol-relative
    /// URLs (`//host/foo`), and document-relative paths are left to the
    /// caller.
    pub fn resolve(&self, url: &str) -> Result<Option<String>> {
        if url.starts_with('/') && !url.starts_with("//") {
            Ok(Some(String::from(self.site.join(url)?)))
        } else {
            Ok(None)
        }
    }

    /// Resolves any URL against the site the way a browser would: absolute
    /// URLs pass through, everything else (root-relative, document-relative,
    /// empty) is joined onto the site.
    pub fn absolutize(&self, url: &str) -> Result<String> {
        match Url::parse(url) {
            Ok(absolute) => Ok(String::from(absolute)),
            Err(ParseError::RelativeUrlWithoutBase) => {
                Ok(String::from(self.site.join(url)?))
            }
            Err(e) => Err(e),
        }
    }
}

type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod test {
    use super::*;

    fn fixture(wanted: Option<&str>, site: &str, url: &str) -> Result<()> {
        let site = Url::parse(site)?;
        assert_eq!(
            wanted.map(str::to_owned),
            Resolver::new(&site).resolve(url)?
        );
        Ok(())
    }

    #[test]
    fn test_resolve_root_relative() -> Result<()> {
        fixture(
            Some("https://example.org/blog/hello/"),
            "https://example.org/",
            "/blog/hello/",
        )
    }

    #[test]
    fn test_resolve_root_relative_ignores_site_path() -> Result<()> {
        fixture(
            Some("https://example.org/blog/hello/"),
            "https://example.org/site/",
            "/blog/hello/",
        )
    }

    #[test]
    fn test_resolve_keeps_query_and_fragment() -> Result<()> {
        fixture(
            Some("https://example.org/a?b=c#d"),
            "https://example.org/",
            "/a?b=c#d",
        )
    }

    #[test]
    fn test_resolve_absolute() -> Result<()> {
        fixture(None, "https://example.org/", "https://example.com/x")
    }

    #[test]
    fn test_resolve_protocol_relative() -> Result<()> {
        fixture(None, "https://example.org/", "//cdn.example.com/x.js")
    }

    #[test]
    fn test_resolve_document_relative() -> Result<()> {
        fixture(None, "https://example.org/", "image.png")
    }

    #[test]
    fn test_resolve_fragment() -> Result<()> {
        fixture(None, "https://example.org/", "#fn1")
    }

    #[test]
    fn test_absolutize() -> Result<()> {
        let site = Url::parse("https://example.org/")?;
        let resolver = Resolver::new(&site);
        assert_eq!("https://example.org/x/", resolver.absolutize("/x/")?);
        assert_eq!("https://example.com/y", resolver.absolutize("https://example.com/y")?);
        Ok(())
    }

    #[test]
    fn test_absolutize_relative_and_empty() -> Result<()> {
        let site = Url::parse("https://example.org/")?;
        let resolver = Resolver::new(&site);
        assert_eq!("https://example.org/blog/other/", resolver.absolutize("blog/other/")?);
        assert_eq!("https://example.org/", resolver.absolutize("")?);
        assert_eq!("https://cdn.example.com/x", resolver.absolutize("//cdn.example.com/x")?);
        Ok(())
    }
}
