//! The two export pipelines and their top-level orchestration.
//!
//! Each pipeline is a straight fetch, transform, write sequence:
//!
//! - **OPML**: request the server's subscription export, write the returned
//!   bytes verbatim
//! - **Bookmarks**: request the full entry list, select starred entries,
//!   serialize them as RSS 2.0
//!
//! The pipelines share nothing but the read-only configuration and the API
//! client. They run sequentially, OPML first, and a failure in one never
//! affects the other.

mod rss;

pub use rss::{FeedDocument, FeedItem};

use chrono::Utc;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::{ApiError, EntryFilter, FeedReader};
use crate::config::ExportConfig;

const BOOKMARK_FEED_TITLE: &str = "Miniflux starred entries";
const BOOKMARK_FEED_DESCRIPTION: &str = "RSS feed from all starred entries in Miniflux";

/// Errors that can abort an export pipeline.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The remote request failed; the destination file was not touched.
    #[error("API request failed: {0}")]
    Api(#[from] ApiError),
    /// The destination file could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The feed document could not be serialized; no file is written.
    #[error("RSS serialization failed: {0}")]
    Serialize(String),
}

/// Outcome of a successful OPML export.
#[derive(Debug)]
pub struct OpmlSummary {
    pub bytes_written: usize,
    pub path: PathBuf,
}

/// Outcome of a successful bookmark export.
#[derive(Debug)]
pub struct BookmarkSummary {
    /// Number of starred entries exported as items.
    pub exported: usize,
    pub path: PathBuf,
}

/// Per-pipeline outcomes of one invocation.
///
/// `None` means the pipeline was not requested.
#[derive(Debug, Default)]
pub struct RunReport {
    pub opml: Option<Result<OpmlSummary, ExportError>>,
    pub bookmarks: Option<Result<BookmarkSummary, ExportError>>,
}

impl RunReport {
    /// True when any requested pipeline failed.
    pub fn failed(&self) -> bool {
        matches!(self.opml, Some(Err(_))) || matches!(self.bookmarks, Some(Err(_)))
    }
}

/// Runs the requested pipelines sequentially, OPML first.
///
/// Each outcome is logged at the point of return; the caller decides the
/// process exit status from the report.
pub async fn run(config: &ExportConfig, client: &impl FeedReader) -> RunReport {
    let mut report = RunReport::default();

    match &config.opml_path {
        Some(path) => {
            let result = export_opml(client, path).await;
            match &result {
                Ok(summary) => tracing::info!(
                    bytes = summary.bytes_written,
                    path = %summary.path.display(),
                    "OPML export written"
                ),
                Err(e) => tracing::error!(error = %e, "OPML export failed"),
            }
            report.opml = Some(result);
        }
        None => tracing::info!("Skipping OPML export (no --output-opml)"),
    }

    match &config.bookmark_path {
        Some(path) => {
            let result = export_bookmarks(client, &config.host, path).await;
            match &result {
                Ok(summary) => tracing::info!(
                    bookmarks = summary.exported,
                    path = %summary.path.display(),
                    "Bookmark export written"
                ),
                Err(e) => tracing::error!(error = %e, "Bookmark export failed"),
            }
            report.bookmarks = Some(result);
        }
        None => tracing::info!("Skipping bookmark export (no --output-bookmarks)"),
    }

    report
}

/// Fetches the server's OPML document and writes it verbatim.
///
/// The destination is only touched after a successful fetch, so a failed
/// request never leaves a partial file behind.
pub async fn export_opml(
    client: &impl FeedReader,
    path: &Path,
) -> Result<OpmlSummary, ExportError> {
    let opml = client.export_opml().await?;
    write_export(path, &opml)?;

    Ok(OpmlSummary {
        bytes_written: opml.len(),
        path: path.to_path_buf(),
    })
}

/// Exports starred entries as an RSS 2.0 feed.
///
/// Fetches the full entry list, selects starred entries in server order, and
/// serializes them into a channel linking back to the server. Zero starred
/// entries still produce a valid channel with no items.
pub async fn export_bookmarks(
    client: &impl FeedReader,
    host: &str,
    path: &Path,
) -> Result<BookmarkSummary, ExportError> {
    let started = Utc::now();
    let list = client.entries(&EntryFilter::default()).await?;

    let items: Vec<FeedItem> = list
        .entries
        .into_iter()
        .filter(|entry| entry.starred)
        .map(|entry| FeedItem {
            title: entry.title,
            link: entry.url,
            author: entry.author,
            description: entry.content,
            guid: entry.id.to_string(),
        })
        .collect();

    let feed = FeedDocument {
        title: BOOKMARK_FEED_TITLE.to_string(),
        link: host.to_string(),
        description: BOOKMARK_FEED_DESCRIPTION.to_string(),
        created: started,
        items,
    };

    let document = feed
        .to_rss()
        .map_err(|e| ExportError::Serialize(e.to_string()))?;
    write_export(path, document.as_bytes())?;

    Ok(BookmarkSummary {
        exported: feed.items.len(),
        path: path.to_path_buf(),
    })
}

/// Writes export output, creating or truncating the destination with owner
/// read/write and world-read permissions.
///
/// The write is not atomic; a crash mid-write can leave a truncated file.
fn write_export(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    std::fs::write(path, bytes).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o644);
        if let Err(e) = std::fs::set_permissions(path, perms) {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to set export file permissions"
            );
        }
    }

    Ok(())
}
