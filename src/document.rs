//! Defines the [`Document`] and [`Metadata`] types, the read-only input to
//! the feed pipeline, along with the logic for deriving a document's publish
//! date from its `id`.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;

/// The hour (UTC) at which every document is considered published. Authored
/// content carries only a calendar date, so the time is pinned.
pub const PUBLISH_HOUR_UTC: u32 = 13;

/// The structured metadata of a [`Document`], as authored in its
/// frontmatter.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Metadata {
    /// The title of the document.
    pub title: String,

    /// A short summary of the document. Syndicated as-is.
    pub preview: String,

    /// When present, marks the document as a link post whose canonical
    /// destination is this external URL.
    #[serde(default)]
    pub link: Option<String>,
}

/// A single authored content item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Path-like identity, `<year>/<month>/<day>/<suffix>`.
    pub id: String,

    /// URL-safe name used to build the document's permalink.
    pub slug: String,

    /// Raw Markdown body. May be empty.
    pub body: String,

    pub metadata: Metadata,
}

impl Document {
    /// The external URL of a link post. A blank `link` doesn't make a link
    /// post.
    pub fn link(&self) -> Option<&str> {
        self.metadata
            .link
            .as_deref()
            .filter(|link| !link.trim().is_empty())
    }

    /// Returns true if the document syndicates to an external URL.
    pub fn is_link_post(&self) -> bool {
        self.link().is_some()
    }

    /// Derives the publish timestamp from the first three segments of the
    /// document's `id`: `<year>-<month>-<day> 13:00:00 UTC`.
    pub fn publish_date(&self) -> Result<DateTime<Utc>, IdError> {
        let mut segments = self.id.split('/');
        let (year, month, day) = match (segments.next(), segments.next(), segments.next()) {
            (Some(year), Some(month), Some(day)) => (year, month, day),
            _ => return Err(IdError::Malformed(self.id.clone())),
        };

        let invalid = || IdError::InvalidDate(self.id.clone());
        let year: i32 = parse_segment(year).ok_or_else(invalid)?;
        let month: u32 = parse_segment(month).ok_or_else(invalid)?;
        let day: u32 = parse_segment(day).ok_or_else(invalid)?;

        let naive = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(PUBLISH_HOUR_UTC, 0, 0))
            .ok_or_else(invalid)?;
        Ok(Utc.from_utc_datetime(&naive))
    }
}

// Date segments are plain zero-padded digits; `str::parse` alone would also
// accept a leading `+`.
fn parse_segment<T: std::str::FromStr>(segment: &str) -> Option<T> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Represents a document `id` that can't be turned into a publish date.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    /// Returned when the id doesn't have year, month, and day segments.
    #[error("document id `{0}` must start with `<year>/<month>/<day>`")]
    Malformed(String),

    /// Returned when the date segments aren't numeric or don't form a real
    /// calendar date.
    #[error("document id `{0}` does not start with a valid calendar date")]
    InvalidDate(String),
}
