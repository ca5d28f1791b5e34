//! Latest patch resolution
//!
//! Queries the upstream of a `ReleaseSource` and extracts the patch URL,
//! its detached signature URL, and the kernel version the patch targets.
//!
//! Two upstream shapes exist:
//! - the grsecurity testing RSS feed, where the last `<guid>` is the patch
//! - GitHub "latest release" JSON, where the patch and signature are assets
//!
//! Fetching and parsing are kept apart so the parsers can be exercised
//! against fixed documents.

use crate::config::FetchConfig;
use crate::error::{AssetKind, FetchError, Result};
use crate::kernel::sources::{ReleaseSource, ResolverKind};
use crate::models::{KernelVersion, ResolvedRelease};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static HARDENED_VERSION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^linux-hardened-(?P<ver>[\d.]+)\..*").expect("Invalid linux-hardened version regex")
});

/// Signature URL suffix for feed-announced patches
pub const FEED_SIGNATURE_SUFFIX: &str = ".sig";

/// GitHub release metadata
#[derive(Deserialize, Debug, Clone)]
pub struct GithubRelease {
    #[serde(default)]
    pub tag_name: Option<String>,
    pub assets: Vec<GithubAsset>,
}

/// GitHub release asset
#[derive(Deserialize, Debug, Clone)]
pub struct GithubAsset {
    pub name: String,
    pub browser_download_url: String,
}

/// Resolve the latest patch for `source`.
///
/// Any failure here ends the run: without a patch URL there is nothing to
/// download.
pub async fn resolve(
    client: &reqwest::Client,
    config: &FetchConfig,
    source: ReleaseSource,
) -> Result<ResolvedRelease> {
    let endpoint = source.endpoint(config);
    log::info!("[Resolver] Querying {} upstream: {}", source, endpoint);

    let body = fetch_text(client, &endpoint).await?;
    log::debug!("[Resolver] Fetched {} bytes from {}", body.len(), endpoint);

    let (patch_url, patch_sig_url) = match source.resolver_kind() {
        ResolverKind::Feed => parse_feed(&body)?,
        ResolverKind::ReleaseApi => parse_release(source, &body)?,
    };
    let kernel_version = kernel_version_for(source, &patch_url)?;

    log::info!(
        "[Resolver] {} patch {} targets kernel {}",
        source,
        patch_url,
        kernel_version
    );

    Ok(ResolvedRelease {
        patch_url,
        patch_sig_url,
        kernel_version,
    })
}

/// GET `url` and return the body, mapping any non-success status to an error
async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::UpstreamFetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = response
        .error_for_status()
        .map_err(|e| FetchError::UpstreamFetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    response.text().await.map_err(|e| FetchError::UpstreamFetch {
        url: url.to_string(),
        reason: format!("Failed to read response body: {}", e),
    })
}

/// Extract `(patch_url, patch_sig_url)` from a syndication feed.
///
/// The last `<guid>` in document order is taken as the newest patch.
pub fn parse_feed(xml: &str) -> Result<(String, String)> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| FetchError::UpstreamParse(format!("invalid feed XML: {}", e)))?;

    let patch_url = doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "guid")
        .last()
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| FetchError::UpstreamParse("feed has no <guid> entries".to_string()))?
        .to_string();

    let sig_url = format!("{}{}", patch_url, FEED_SIGNATURE_SUFFIX);
    Ok((patch_url, sig_url))
}

/// Extract `(patch_url, sig_url)` from a GitHub latest-release document.
///
/// The first asset carrying the source marker and ending in the patch
/// extension wins; likewise for the signature. Missing either one is an
/// explicit `AssetNotFound`.
pub fn parse_release(source: ReleaseSource, json: &str) -> Result<(String, String)> {
    let release: GithubRelease = serde_json::from_str(json)
        .map_err(|e| FetchError::UpstreamParse(format!("invalid release JSON: {}", e)))?;

    if let Some(tag) = &release.tag_name {
        log::debug!("[Resolver] Latest {} release tag: {}", source, tag);
    }

    let marker = source.asset_marker();
    let find_asset = |extension: &str| {
        release
            .assets
            .iter()
            .find(|a| a.name.contains(marker) && a.name.ends_with(extension))
            .map(|a| a.browser_download_url.clone())
    };

    let patch_url = find_asset(source.patch_extension()).ok_or_else(|| FetchError::AssetNotFound {
        source_name: source.canonical_name().to_string(),
        kind: AssetKind::Patch,
    })?;
    let sig_url = find_asset(source.signature_extension()).ok_or_else(|| FetchError::AssetNotFound {
        source_name: source.canonical_name().to_string(),
        kind: AssetKind::Signature,
    })?;

    Ok((patch_url, sig_url))
}

/// Pull the targeted kernel version out of the patch URL's filename
pub fn kernel_version_for(source: ReleaseSource, patch_url: &str) -> Result<KernelVersion> {
    let filename = patch_url.rsplit('/').next().unwrap_or(patch_url);

    let version = match source {
        // grsecurity-3.1-4.9.24-201704252333.patch
        ReleaseSource::UnofficialGrsecTest => filename.split('-').nth(2),
        // v4.9.74-unofficial_grsec-20180101.diff
        ReleaseSource::UnofficialGrsecStable => {
            filename.split('-').next().map(|v| v.trim_matches('v'))
        }
        // linux-hardened-5.4.1.patch, linux-hardened-4.14.15.a.patch
        ReleaseSource::LinuxHardenedCopperhead | ReleaseSource::LinuxHardenedAnthraxx => {
            HARDENED_VERSION_REGEX
                .captures(filename)
                .and_then(|caps| caps.name("ver"))
                .map(|m| m.as_str())
        }
    };

    version
        .filter(|v| !v.is_empty())
        .map(KernelVersion::new)
        .ok_or_else(|| {
            FetchError::UpstreamParse(format!(
                "cannot find a kernel version in patch filename '{}'",
                filename
            ))
        })
}
