//! Serializes a [`FeedEnvelope`] into a syndication format: RSS 2.0 via the
//! [`rss`] crate or Atom via [`atom_syndication`]. Item links are made
//! absolute against the envelope's site since feed readers have no base URL.

use crate::feed::{FeedEnvelope, FeedItem};
use crate::url::Resolver;
use atom_syndication::{
    ContentBuilder, EntryBuilder, FeedBuilder as AtomFeedBuilder, LinkBuilder, Text,
};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use rss::{validation::Validate, ChannelBuilder, GuidBuilder, ItemBuilder};
use serde::Deserialize;
use std::io::Write;
use thiserror::Error;

const GENERATOR: &str = concat!("feedsmith ", env!("CARGO_PKG_VERSION"));

/// The syndication formats a feed can be written as.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Rss,
    Atom,
}

impl Default for Format {
    fn default() -> Self {
        Format::Rss
    }
}

/// Serializes `envelope` as `format` and writes the result to `w`.
pub fn write_feed<W: Write>(envelope: &FeedEnvelope, format: Format, mut w: W) -> Result<()> {
    let document = match format {
        Format::Rss => to_rss(envelope)?,
        Format::Atom => to_atom(envelope)?,
    };
    w.write_all(document.as_bytes())?;
    w.flush()?;
    Ok(())
}

/// Serializes `envelope` as a validated RSS 2.0 document.
pub fn to_rss(envelope: &FeedEnvelope) -> Result<String> {
    let resolver = Resolver::new(&envelope.site);
    let items = envelope
        .items
        .iter()
        .map(|item| rss_item(&resolver, item))
        .collect::<Result<Vec<_>>>()?;

    let channel = ChannelBuilder::default()
        .title(envelope.title.as_str())
        .link(envelope.site.as_str())
        .description(envelope.description.as_str())
        .language(Some(envelope.language.clone()))
        .generator(Some(GENERATOR.to_owned()))
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| Error::Validation(e.to_string()))?;
    Ok(channel.to_string())
}

fn rss_item(resolver: &Resolver, item: &FeedItem) -> Result<rss::Item> {
    let link = resolver.absolutize(&item.link)?;
    Ok(ItemBuilder::default()
        .title(Some(item.title.clone()))
        .link(Some(link.clone()))
        .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
        .description(Some(item.description.clone()))
        .content(Some(item.content.clone()))
        .pub_date(Some(item.pub_date.to_rfc2822()))
        .build())
}

/// Serializes `envelope` as an Atom document. The feed's `updated` date is
/// that of its newest item, or the Unix epoch for an empty feed, so output
/// depends only on the envelope.
pub fn to_atom(envelope: &FeedEnvelope) -> Result<String> {
    let resolver = Resolver::new(&envelope.site);
    let entries = envelope
        .items
        .iter()
        .map(|item| atom_entry(&resolver, item))
        .collect::<Result<Vec<_>>>()?;

    let updated: DateTime<FixedOffset> = envelope
        .items
        .iter()
        .map(|item| item.pub_date)
        .max()
        .unwrap_or_else(|| Utc.from_utc_datetime(&NaiveDateTime::default()))
        .into();

    let feed = AtomFeedBuilder::default()
        .title(envelope.title.as_str())
        .subtitle(Some(Text::from(envelope.description.as_str())))
        .id(envelope.site.as_str())
        .updated(updated)
        .lang(Some(envelope.language.clone()))
        .generator(Some(
            atom_syndication::GeneratorBuilder::default()
                .value(GENERATOR)
                .build(),
        ))
        .links(vec![LinkBuilder::default()
            .href(envelope.site.as_str())
            .rel("alternate")
            .build()])
        .entries(entries)
        .build();

    let bytes = feed.write_to(Vec::new())?;
    String::from_utf8(bytes).map_err(|e| Error::Validation(e.to_string()))
}

fn atom_entry(resolver: &Resolver, item: &FeedItem) -> Result<atom_syndication::Entry> {
    let link = resolver.absolutize(&item.link)?;
    let date: DateTime<FixedOffset> = item.pub_date.into();
    Ok(EntryBuilder::default()
        .title(item.title.as_str())
        .id(link.as_str())
        .updated(date)
        .published(Some(date))
        .links(vec![LinkBuilder::default()
            .href(link.as_str())
            .rel("alternate")
            .build()])
        .summary(Some(Text::from(item.description.as_str())))
        .content(Some(
            ContentBuilder::default()
                .value(Some(item.content.clone()))
                .content_type(Some("html".to_owned()))
                .build(),
        ))
        .build())
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem serializing a feed.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when the serialized feed isn't valid for its format.
    #[error("invalid feed: {0}")]
    Validation(String),

    /// Returned when there is an Atom-related error.
    #[error(transparent)]
    Atom(#[from] atom_syndication::Error),

    /// Returned when an item link can't be made absolute.
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),

    /// Returned when there is a generic I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
