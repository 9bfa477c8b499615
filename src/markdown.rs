//! Defines the [`MarkupRenderer`] trait and [`CommonMarkRenderer`], which
//! converts Markdown document bodies into HTML for syndication.

use crate::url::Resolver;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use thiserror::Error;
use url::{ParseError as UrlParseError, Url};

/// Converts raw Markdown into an HTML string.
pub trait MarkupRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> Result<String, Error>;
}

/// A [`MarkupRenderer`] backed by [`pulldown_cmark`].
///
/// The renderer holds only its options and the site URL, and a fresh
/// [`Parser`] is created for every call, so a single instance is reentrant
/// and is shared by every item of a build.
pub struct CommonMarkRenderer {
    options: Options,
    site: Url,
}

impl CommonMarkRenderer {
    /// Constructs a renderer. Root-relative link and image destinations
    /// (e.g., `/blog/foo/`) are resolved against `site`. `footnotes` enables
    /// the footnote extension.
    pub fn new(site: Url, footnotes: bool) -> CommonMarkRenderer {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        if footnotes {
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        CommonMarkRenderer { options, site }
    }
}

impl MarkupRenderer for CommonMarkRenderer {
    fn render(&self, markdown: &str) -> Result<String, Error> {
        let event_converter = EventConverter {
            resolver: Resolver::new(&self.site),
        };
        let events = Parser::new_ext(markdown, self.options)
            .map(|ev| event_converter.convert(ev))
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        Ok(out)
    }
}

struct EventConverter<'a> {
    resolver: Resolver<'a>,
}

impl<'a> EventConverter<'a> {
    fn convert_tag<'b>(&self, tag: Tag<'b>) -> Result<Tag<'b>, UrlParseError> {
        Ok(match tag {
            // Feed readers have no base URL to resolve `/blog/foo/` against,
            // so root-relative destinations must become absolute.
            Tag::Link(link_type, url, title) => {
                Tag::Link(link_type, self.resolve(url)?, title)
            }
            Tag::Image(link_type, url, title) => {
                Tag::Image(link_type, self.resolve(url)?, title)
            }
            _ => tag,
        })
    }

    fn resolve<'b>(&self, url: CowStr<'b>) -> Result<CowStr<'b>, UrlParseError> {
        Ok(match self.resolver.resolve(&url)? {
            Some(absolute) => CowStr::Boxed(absolute.into_boxed_str()),
            None => url,
        })
    }

    fn convert<'b>(&self, ev: Event<'b>) -> Result<Event<'b>, UrlParseError> {
        Ok(match ev {
            Event::Start(tag) => Event::Start(self.convert_tag(tag)?),
            Event::End(tag) => Event::End(self.convert_tag(tag)?),
            _ => ev,
        })
    }
}

/// Represents an error converting Markdown to HTML.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when a link destination can't be resolved against the site
    /// URL.
    #[error("resolving link: {0}")]
    UrlParse(#[from] UrlParseError),
}
