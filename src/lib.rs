//! One-shot export tool for a Miniflux feed-reader server.
//!
//! Two independent pipelines share one API client: the OPML pipeline writes
//! the server's subscription export verbatim to disk, and the bookmark
//! pipeline turns starred entries into an RSS 2.0 feed file. Pipelines run
//! sequentially and never affect one another; see [`export::run`].

pub mod api;
pub mod config;
pub mod export;
