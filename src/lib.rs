//! Kernel hardening patch fetcher
//!
//! Fetches the latest security-hardening kernel patch from one of several
//! upstreams, together with the matching mainline kernel tarball and both
//! detached signatures, and decompresses the tarball next to it.
//!
//! The crate is organized into functional modules:
//! - **error**: Unified error type
//! - **models**: Per-run data types (targets, plans, outcomes)
//! - **config**: Endpoint/worker settings and the settings-file loader
//! - **log_collector**: Console backend for the `log` facade
//! - **kernel**: Patch sources, release resolution, mirror URLs, filenames, extraction
//! - **orchestrator**: Concurrent download of the four artifacts
//!
//! Signatures are downloaded, never verified.

// Core foundational modules
pub mod error;
pub mod models;

pub mod config;

pub mod log_collector;

pub mod kernel;

pub mod orchestrator;

// Re-export the log crate for macro usage
pub use log;

// ============================================================================
// PUBLIC RE-EXPORTS FOR CONVENIENCE
// ============================================================================

pub use error::{AssetKind, FetchError, Result};

pub use models::{
    ArtifactOutcome, BatchReport, DownloadPlan, DownloadTarget, FetchResult, KernelVersion,
    ResolvedRelease,
};

pub use config::FetchConfig;

pub use kernel::extract::extract;
pub use kernel::filename::safe_filename;
pub use kernel::mirror::kernel_urls;
pub use kernel::resolver::resolve;
pub use kernel::sources::ReleaseSource;

pub use log_collector::{ConsoleLogger, LogLine};

pub use orchestrator::{fetch_release, DownloadOrchestrator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
