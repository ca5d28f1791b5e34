//! Core data types for the patch fetcher.
//!
//! Everything here lives for a single run: targets are produced by the
//! resolver and mirror builder, consumed by the orchestrator, and the
//! resulting report is printed and dropped.

use crate::error::FetchError;
use crate::kernel::filename::safe_filename;
use std::fmt;
use std::path::{Path, PathBuf};

/// Kernel version string lifted out of a patch filename.
///
/// Not checked against any version grammar; whatever the source-specific
/// parsing rule yields is used verbatim to build mirror URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelVersion(String);

impl KernelVersion {
    pub fn new(version: impl Into<String>) -> Self {
        KernelVersion(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KernelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One remote artifact and the local name it will be written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: String,
    pub safe_filename: String,
}

impl DownloadTarget {
    /// Build a target, sanitizing the filename from the URL's last segment
    pub fn from_url(url: &str) -> Result<Self, FetchError> {
        Ok(DownloadTarget {
            url: url.to_string(),
            safe_filename: safe_filename(url)?,
        })
    }
}

/// Output of a release resolver: the patch pair plus the kernel it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelease {
    pub patch_url: String,
    pub patch_sig_url: String,
    pub kernel_version: KernelVersion,
}

/// The four URLs a run downloads, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPlan {
    pub patch_url: String,
    pub patch_sig_url: String,
    pub kernel_url: String,
    pub kernel_sig_url: String,
}

impl DownloadPlan {
    pub fn urls(&self) -> [&str; 4] {
        [
            &self.patch_url,
            &self.patch_sig_url,
            &self.kernel_url,
            &self.kernel_sig_url,
        ]
    }

    /// Last path segment of the patch URL, for the "Downloading patch" banner
    pub fn patch_name(&self) -> &str {
        self.patch_url.rsplit('/').next().unwrap_or(&self.patch_url)
    }
}

/// What happened to one artifact.
#[derive(Debug)]
pub enum ArtifactOutcome {
    /// Written to disk; `extracted` is set when a compressed sibling was unpacked
    Saved {
        path: PathBuf,
        bytes: u64,
        extracted: Option<PathBuf>,
    },
    Failed(FetchError),
}

/// Result of a single download, independent of the others.
#[derive(Debug)]
pub struct FetchResult {
    /// Sanitized filename, or the raw URL when sanitizing itself failed
    pub filename: String,
    pub url: String,
    pub outcome: ArtifactOutcome,
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ArtifactOutcome::Saved { .. })
    }
}

/// Everything the orchestrator produced in one run.
#[derive(Debug)]
pub struct BatchReport {
    pub work_dir: PathBuf,
    /// Outcomes in completion order
    pub results: Vec<FetchResult>,
}

impl BatchReport {
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn successes(&self) -> impl Iterator<Item = &FetchResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &FetchResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}
