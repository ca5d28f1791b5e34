//! Download orchestration: patch, patch signature, kernel tarball and kernel signature.
//!
//! All artifacts are fetched concurrently on a bounded pool. Each one is
//! attempted exactly once; a failed download, write or extraction is
//! recorded against that artifact only and never cancels its siblings.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::kernel::extract::{extract, is_compressed};
use crate::kernel::sources::ReleaseSource;
use crate::kernel::{mirror, resolver};
use crate::models::{ArtifactOutcome, BatchReport, DownloadPlan, DownloadTarget, FetchResult};

/// Fans a fixed set of downloads out to a bounded worker pool.
#[derive(Clone)]
pub struct DownloadOrchestrator {
    client: reqwest::Client,
    semaphore: Arc<Semaphore>,
    work_dir_prefix: String,
}

impl DownloadOrchestrator {
    /// Create an orchestrator sharing `client` with the caller.
    ///
    /// `max_workers` is clamped to at least one.
    pub fn new(client: reqwest::Client, max_workers: usize, work_dir_prefix: &str) -> Self {
        DownloadOrchestrator {
            client,
            semaphore: Arc::new(Semaphore::new(max_workers.max(1))),
            work_dir_prefix: work_dir_prefix.to_string(),
        }
    }

    pub fn from_config(
        client: reqwest::Client,
        config: &FetchConfig,
        work_dir_prefix: &str,
    ) -> Self {
        Self::new(client, config.max_workers, work_dir_prefix)
    }

    /// Create the per-run work directory.
    ///
    /// The directory is kept after the process exits; cleaning it up is
    /// left to the caller.
    pub fn create_work_dir(&self) -> Result<PathBuf> {
        let dir = tempfile::Builder::new()
            .prefix(&self.work_dir_prefix)
            .tempdir()?;
        Ok(dir.keep())
    }

    /// Download every URL in `plan` into a fresh work directory.
    ///
    /// Only work-directory creation can fail the call; per-artifact
    /// failures are reported in the returned `BatchReport`.
    pub async fn run(&self, plan: &DownloadPlan) -> Result<BatchReport> {
        let work_dir = self.create_work_dir()?;
        crate::log_parsed!(
            "Downloading patch ({}) and kernel files to {}",
            plan.patch_name(),
            work_dir.display()
        );
        Ok(self.download_all(&plan.urls(), &work_dir).await)
    }

    /// Fetch `urls` into `work_dir`, collecting outcomes in completion order.
    pub async fn download_all(&self, urls: &[&str], work_dir: &Path) -> BatchReport {
        let mut pending = FuturesUnordered::new();

        for url in urls {
            let semaphore = self.semaphore.clone();
            let url = url.to_string();
            pending.push(async move {
                // The semaphore is never closed; a missing permit only loses the bound
                let _permit = semaphore.acquire().await.ok();
                self.fetch_one(&url, work_dir).await
            });
        }

        let mut results = Vec::with_capacity(urls.len());
        while let Some(result) = pending.next().await {
            report_result(&result);
            results.push(result);
        }

        let report = BatchReport {
            work_dir: work_dir.to_path_buf(),
            results,
        };
        log::info!(
            "[Orchestrator] Batch finished: {} saved, {} failed",
            report.successes().count(),
            report.failure_count()
        );
        report
    }

    async fn fetch_one(&self, url: &str, work_dir: &Path) -> FetchResult {
        let target = match DownloadTarget::from_url(url) {
            Ok(target) => target,
            Err(e) => {
                return FetchResult {
                    filename: url.to_string(),
                    url: url.to_string(),
                    outcome: ArtifactOutcome::Failed(e),
                }
            }
        };

        let path = work_dir.join(&target.safe_filename);
        let outcome = match self.download_to(&target.url, &path).await {
            Ok(outcome) => outcome,
            Err(e) => ArtifactOutcome::Failed(e),
        };

        FetchResult {
            filename: target.safe_filename,
            url: target.url,
            outcome,
        }
    }

    async fn download_to(&self, url: &str, path: &Path) -> Result<ArtifactOutcome> {
        log::debug!("[Orchestrator] GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::UpstreamFetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let body = response.bytes().await.map_err(|e| FetchError::UpstreamFetch {
            url: url.to_string(),
            reason: format!("Failed to read response body: {}", e),
        })?;

        tokio::fs::write(path, &body).await?;
        log::debug!(
            "[Orchestrator] Wrote {} bytes to {}",
            body.len(),
            path.display()
        );

        let is_archive = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(is_compressed)
            .unwrap_or(false);
        let extracted = if is_archive {
            Some(extract(path, None).await?)
        } else {
            None
        };

        Ok(ArtifactOutcome::Saved {
            path: path.to_path_buf(),
            bytes: body.len() as u64,
            extracted,
        })
    }
}

/// Resolve the latest patch for `source` and download it with its kernel.
///
/// Resolver failures abort before any download starts.
pub async fn fetch_release(
    client: &reqwest::Client,
    config: &FetchConfig,
    source: ReleaseSource,
) -> Result<BatchReport> {
    let release = resolver::resolve(client, config, source).await?;
    let (kernel_url, kernel_sig_url) = mirror::kernel_urls(config, &release.kernel_version);

    let plan = DownloadPlan {
        patch_url: release.patch_url,
        patch_sig_url: release.patch_sig_url,
        kernel_url,
        kernel_sig_url,
    };

    DownloadOrchestrator::from_config(client.clone(), config, source.work_dir_prefix())
        .run(&plan)
        .await
}

/// Print the per-artifact line as soon as a result arrives
fn report_result(result: &FetchResult) {
    match &result.outcome {
        ArtifactOutcome::Saved {
            bytes, extracted, ..
        } => {
            crate::log_parsed!("downloaded {} ({} bytes)", result.filename, bytes);
            if let Some(dest) = extracted {
                log::debug!("[Orchestrator] {} extracted to {}", result.filename, dest.display());
            }
        }
        ArtifactOutcome::Failed(e) => {
            crate::log_parsed!("downloading {} failed: {}", result.filename, e.user_message());
            log::warn!("[Orchestrator] {}: {}", result.url, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_dir_prefix() {
        let orchestrator = DownloadOrchestrator::new(reqwest::Client::new(), 4, "grsec-download");
        let dir = orchestrator.create_work_dir().unwrap();
        let name = dir.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("grsec-download"));
        assert!(dir.is_dir());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_work_dirs_are_unique() {
        let orchestrator =
            DownloadOrchestrator::new(reqwest::Client::new(), 4, "linux-security-download");
        let a = orchestrator.create_work_dir().unwrap();
        let b = orchestrator.create_work_dir().unwrap();
        assert_ne!(a, b);
        std::fs::remove_dir_all(&a).unwrap();
        std::fs::remove_dir_all(&b).unwrap();
    }

    #[tokio::test]
    async fn test_unsafe_url_fails_only_that_artifact() {
        let orchestrator = DownloadOrchestrator::new(reqwest::Client::new(), 4, "unit");
        let dir = tempfile::tempdir().unwrap();
        let report = orchestrator
            .download_all(&["http://127.0.0.1:9/..\\evil"], dir.path())
            .await;
        assert_eq!(report.results.len(), 1);
        assert!(matches!(
            report.results[0].outcome,
            ArtifactOutcome::Failed(FetchError::UnsafeFilename(_))
        ));
    }
}
