//! Builds a [`FeedEnvelope`] from a collection of [`Document`]s: the newest
//! documents are rendered, sanitized, and mapped to [`FeedItem`]s. See
//! [`crate::write`] for turning the envelope into RSS or Atom.

use crate::document::{Document, IdError};
use crate::markdown::{Error as RenderError, MarkupRenderer};
use crate::sanitize::{Error as SanitizeError, Sanitizer};
use crate::url::Resolver;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// The most items a feed will carry.
pub const MAX_ITEMS: usize = 100;

/// Appended to the title of link posts.
pub const LINK_POST_MARKER: &str = " →";

/// Bundled configuration for building a feed.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    pub title: String,
    pub description: String,

    /// The site's base URL. Permalinks in item content are made absolute
    /// against it.
    pub site: Url,

    /// Locale tag, e.g. `en-us`.
    pub language: String,

    /// Path prefix for local permalinks; a document with slug `foo` is at
    /// `{blog_path}foo/`. Should begin and end with a slash.
    pub blog_path: String,

    /// When false, item content is the document preview plus a "Read more"
    /// link rather than the fully rendered body.
    pub full_render: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            title: "TJ Writes Software".to_owned(),
            description: "The writing and ramblings of a software engineering veteran"
                .to_owned(),
            site: Url::parse("https://www.tjdraper.com/").expect("static url"),
            language: "en-us".to_owned(),
            blog_path: "/blog/".to_owned(),
            full_render: true,
        }
    }
}

/// One syndication-ready entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedItem {
    /// The external link for link posts, the local permalink otherwise. May
    /// be relative to the site.
    pub link: String,
    pub title: String,

    /// Sanitized HTML.
    pub content: String,
    pub pub_date: DateTime<Utc>,

    /// The document preview, unmodified.
    pub description: String,
}

/// A complete feed: channel metadata plus items, newest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedEnvelope {
    pub title: String,
    pub description: String,
    pub site: Url,
    pub language: String,
    pub items: Vec<FeedItem>,
}

/// Maps documents to a [`FeedEnvelope`] using a [`MarkupRenderer`] and a
/// [`Sanitizer`]. Per-document work is independent, so by default items are
/// built in parallel; results are collected by position, so item order never
/// depends on scheduling.
pub struct FeedBuilder<'a, R, S> {
    config: &'a FeedConfig,
    renderer: R,
    sanitizer: S,
    parallel: bool,
}

impl<'a, R: MarkupRenderer, S: Sanitizer> FeedBuilder<'a, R, S> {
    pub fn new(config: &'a FeedConfig, renderer: R, sanitizer: S) -> Self {
        FeedBuilder {
            config,
            renderer,
            sanitizer,
            parallel: true,
        }
    }

    /// Toggles building items on the [`rayon`] thread pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builds the feed. `documents` must be in ascending id order; the feed
    /// holds the last [`MAX_ITEMS`] of them, newest first. Any document that
    /// fails to map aborts the whole build.
    pub fn build_feed(&self, documents: &[Document]) -> Result<FeedEnvelope> {
        let recent: Vec<&Document> = documents.iter().rev().take(MAX_ITEMS).collect();

        let items = if self.parallel {
            recent
                .par_iter()
                .map(|document| self.to_feed_item(document))
                .collect::<Result<Vec<_>>>()?
        } else {
            recent
                .iter()
                .map(|document| self.to_feed_item(document))
                .collect::<Result<Vec<_>>>()?
        };
        debug!(
            documents = documents.len(),
            items = items.len(),
            "built feed items"
        );

        Ok(FeedEnvelope {
            title: self.config.title.clone(),
            description: self.config.description.clone(),
            site: self.config.site.clone(),
            language: self.config.language.clone(),
            items,
        })
    }

    /// Maps a single document to a [`FeedItem`].
    pub fn to_feed_item(&self, document: &Document) -> Result<FeedItem> {
        let pub_date = document.publish_date()?;
        let permalink = self.permalink(document);
        let absolute_permalink = Resolver::new(&self.config.site)
            .absolutize(&permalink)
            .map_err(|err| Error::Url {
                id: document.id.clone(),
                err,
            })?;

        let mut body = if self.config.full_render {
            self.renderer
                .render(&document.body)
                .map_err(|err| Error::Render {
                    id: document.id.clone(),
                    err,
                })?
        } else {
            format!(
                "{}\n<p><a href=\"{}\">Read more…</a></p>",
                document.metadata.preview, absolute_permalink
            )
        };

        let mut title = document.metadata.title.clone();
        let link = match document.link() {
            Some(external) => {
                title.push_str(LINK_POST_MARKER);
                body = format!(
                    "<a href=\"{}\">Permalink</a>\n<br>\n{}",
                    absolute_permalink, body
                );
                external.to_owned()
            }
            None => permalink,
        };

        let content = self
            .sanitizer
            .sanitize(&body)
            .map_err(|err| Error::Sanitize {
                id: document.id.clone(),
                err,
            })?;

        Ok(FeedItem {
            link,
            title,
            content,
            pub_date,
            description: document.metadata.preview.clone(),
        })
    }

    fn permalink(&self, document: &Document) -> String {
        format!("{}{}/", self.config.blog_path, document.slug)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem building a feed. Every variant is fatal to the
/// build; no partial feed is produced.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when a document's id doesn't yield a publish date.
    #[error(transparent)]
    Id(#[from] IdError),

    /// Returned when the markup renderer fails on a document body.
    #[error("rendering document `{id}`")]
    Render {
        id: String,
        #[source]
        err: RenderError,
    },

    /// Returned when the sanitizer fails on a document's HTML.
    #[error("sanitizing document `{id}`")]
    Sanitize {
        id: String,
        #[source]
        err: SanitizeError,
    },

    /// Returned when a document's permalink can't be made absolute.
    #[error("building permalink for document `{id}`")]
    Url {
        id: String,
        #[source]
        err: url::ParseError,
    },
}
