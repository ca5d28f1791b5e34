//! Unified error type hierarchy for the patch fetcher
//!
//! Every failure the fetcher can hit maps onto one `FetchError` variant.
//! Resolver and config errors abort a run; the per-artifact kinds
//! (`UnsafeFilename`, `UpstreamFetch`, `Extraction`, `Io`) are recorded
//! against a single download and never touch its siblings.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Which half of a patch/signature pair could not be found in a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Patch,
    Signature,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Patch => write!(f, "patch"),
            AssetKind::Signature => write!(f, "signature"),
        }
    }
}

/// Errors raised while resolving, downloading or extracting artifacts.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The last URL segment would escape the work directory
    #[error("Invalid filename {0}")]
    UnsafeFilename(String),

    /// Transport failure or non-success HTTP status
    #[error("Fetching {url} failed: {reason}")]
    UpstreamFetch { url: String, reason: String },

    /// Feed XML or release JSON could not be understood
    #[error("Malformed upstream response: {0}")]
    UpstreamParse(String),

    /// The latest release carries no asset matching the expected pattern
    #[error("No {kind} asset found in latest {source_name} release")]
    AssetNotFound {
        source_name: String,
        kind: AssetKind,
    },

    /// Decompression or write fault while extracting an archive
    #[error("Extracting {} failed: {reason}", .path.display())]
    Extraction { path: PathBuf, reason: String },

    /// Settings file missing, unreadable or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl FetchError {
    /// Short text used on the per-artifact failure line
    pub fn user_message(&self) -> String {
        match self {
            FetchError::UnsafeFilename(name) => format!("unsafe filename '{}'", name),
            FetchError::UpstreamFetch { reason, .. } => reason.clone(),
            FetchError::UpstreamParse(msg) => format!("could not parse upstream data: {}", msg),
            FetchError::AssetNotFound { source_name, kind } => {
                format!("{} has no {} asset", source_name, kind)
            }
            FetchError::Extraction { reason, .. } => format!("extraction failed: {}", reason),
            FetchError::Config(msg) => format!("bad configuration: {}", msg),
            FetchError::Io(e) => format!("file operation failed: {}", e),
        }
    }
}

/// Result type for all library operations.
pub type Result<T> = std::result::Result<T, FetchError>;
