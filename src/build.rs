//! Exports the [`build_feed_file`] function which stitches together the
//! high-level steps of producing a feed: loading documents
//! ([`crate::source`]), mapping them into a feed ([`crate::feed`]), and
//! serializing the result to disk ([`crate::write`]).

use crate::config::Config;
use crate::feed::{Error as FeedError, FeedBuilder};
use crate::markdown::CommonMarkRenderer;
use crate::sanitize::AmmoniaSanitizer;
use crate::source::{ContentSource, DirectorySource, Error as SourceError};
use crate::write::{write_feed, Error as WriteError};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Builds the feed described by a [`Config`] and writes it to
/// `config.output_path`. The renderer and sanitizer are constructed per
/// invocation, so nothing is shared between builds.
pub fn build_feed_file(config: &Config) -> Result<()> {
    let documents = DirectorySource::new(&config.collection_directory).documents()?;
    info!(
        collection = %config.collection_directory.display(),
        documents = documents.len(),
        "loaded collection"
    );

    let envelope = FeedBuilder::new(
        &config.feed,
        CommonMarkRenderer::new(config.feed.site.clone(), config.footnotes),
        AmmoniaSanitizer::new(),
    )
    .parallel(config.parallel)
    .build_feed(&documents)?;

    if let Some(parent) = config.output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| Error::CreateOutput {
            path: parent.to_owned(),
            err,
        })?;
    }
    let file = File::create(&config.output_path).map_err(|err| Error::CreateOutput {
        path: config.output_path.clone(),
        err,
    })?;
    write_feed(&envelope, config.format, BufWriter::new(file))?;

    info!(
        path = %config.output_path.display(),
        items = envelope.items.len(),
        format = ?config.format,
        "wrote feed"
    );
    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a feed file.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned for errors loading documents.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Returned for errors mapping documents into feed items.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// Returned for errors serializing or writing the feed.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// Returned for I/O problems while creating the output file or its
    /// directory.
    #[error("creating output `{}`", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
}
