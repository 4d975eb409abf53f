//! Invocation configuration.
//!
//! All options arrive via command-line flags; there is no config file. The
//! configuration is built once at startup and passed by reference to the
//! export pipelines, which keeps both pipelines independently testable.

use std::path::PathBuf;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid host URL: {0}")]
    InvalidHost(#[from] url::ParseError),

    #[error("Unsupported host scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// Immutable export configuration.
///
/// Output paths are `None` when the corresponding pipeline was not requested;
/// an empty string on the command line counts as not requested.
#[derive(Clone)]
pub struct ExportConfig {
    /// Destination for the OPML subscription export.
    pub opml_path: Option<PathBuf>,
    /// Destination for the starred-entry RSS export.
    pub bookmark_path: Option<PathBuf>,
    /// Miniflux server address, validated and without a trailing slash.
    pub host: String,
    pub username: String,
    pub password: String,
    /// API token; takes precedence over username/password when set.
    pub api_key: Option<String>,
    /// Suppress non-error output.
    pub silent: bool,
}

/// Mask credentials in Debug output to prevent secret leakage in logs.
impl std::fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportConfig")
            .field("opml_path", &self.opml_path)
            .field("bookmark_path", &self.bookmark_path)
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"***")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("silent", &self.silent)
            .finish()
    }
}

/// Normalizes an output flag value: absent or empty means the pipeline is
/// not requested.
pub fn output_path(raw: Option<String>) -> Option<PathBuf> {
    raw.filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Validates the server address and strips any trailing slash.
///
/// Unlike feed URLs fetched from third parties, the host here is the user's
/// own server, so localhost and private addresses are fine; only the scheme
/// is checked.
pub fn validate_host(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(ConfigError::UnsupportedScheme(scheme.to_owned())),
    }

    Ok(raw.trim_end_matches('/').to_string())
}
