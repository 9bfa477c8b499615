//! The library code for `feedsmith`, which syndicates a blog's Markdown
//! posts as an RSS or Atom feed. The pipeline has three steps:
//!
//! 1. Loading documents from a content collection ([`crate::source`])
//! 2. Mapping the newest documents into feed items ([`crate::feed`])
//! 3. Serializing the feed ([`crate::write`])
//!
//! The second step is the interesting one. The collection is reversed so the
//! newest document comes first and capped at [`feed::MAX_ITEMS`]. Each
//! document's body is rendered ([`crate::markdown`]) and, for link posts,
//! prefixed with a permalink back to the local post. Whatever HTML results is
//! always passed through the sanitizer ([`crate::sanitize`]) before it can
//! reach the feed. Publish dates come from the document id
//! ([`crate::document`]).
//!
//! [`crate::build`] ties the steps together for the CLI, reading its settings
//! from a project file ([`crate::config`]).

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod document;
pub mod feed;
pub mod markdown;
pub mod sanitize;
pub mod source;
pub mod url;
pub mod write;
