//! Miniflux API integration.
//!
//! The export pipelines only ever need two remote operations, captured by the
//! [`FeedReader`] trait:
//!
//! - **OPML export**: `GET /v1/export`, returning the server's pre-formatted
//!   OPML document as raw bytes
//! - **Entry listing**: `GET /v1/entries`, returning a JSON collection of
//!   entry records
//!
//! [`MinifluxClient`] is the reqwest-backed implementation. Keeping the trait
//! this small means the server integration can be swapped or mocked without
//! touching pipeline logic.

mod client;
mod types;

pub use client::{ApiError, FeedReader, MinifluxClient};
pub use types::{Entry, EntryFilter, EntryList};
