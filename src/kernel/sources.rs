//! Upstream patch source catalogue
//!
//! Maps each selectable patch source to the upstream endpoint it is
//! resolved from and the naming rules of its release assets.

use crate::config::FetchConfig;
use clap::ValueEnum;
use std::fmt;

/// Hardening patch source, selected once from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ReleaseSource {
    /// grsecurity test patch announced on the grsecurity.net testing RSS feed
    #[value(name = "grsec-test")]
    UnofficialGrsecTest,
    /// minipli/linux-unofficial_grsec latest GitHub release
    #[value(name = "unofficial-grsec")]
    UnofficialGrsecStable,
    /// copperhead/linux-hardened latest GitHub release
    #[value(name = "linux-hardened")]
    LinuxHardenedCopperhead,
    /// anthraxx/linux-hardened latest GitHub release
    #[value(name = "linux-hardened-anthraxx")]
    LinuxHardenedAnthraxx,
}

/// How a source publishes its latest patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverKind {
    /// XML syndication feed whose last `<guid>` is the patch URL
    Feed,
    /// GitHub "latest release" JSON with an asset list
    ReleaseApi,
}

impl ReleaseSource {
    /// Get the canonical command-line name for this source
    pub fn canonical_name(&self) -> &'static str {
        match self {
            ReleaseSource::UnofficialGrsecTest => "grsec-test",
            ReleaseSource::UnofficialGrsecStable => "unofficial-grsec",
            ReleaseSource::LinuxHardenedCopperhead => "linux-hardened",
            ReleaseSource::LinuxHardenedAnthraxx => "linux-hardened-anthraxx",
        }
    }

    pub fn resolver_kind(&self) -> ResolverKind {
        match self {
            ReleaseSource::UnofficialGrsecTest => ResolverKind::Feed,
            _ => ResolverKind::ReleaseApi,
        }
    }

    /// GitHub `owner/repo` for release-API sources
    pub fn github_repo(&self) -> Option<&'static str> {
        match self {
            ReleaseSource::UnofficialGrsecTest => None,
            ReleaseSource::UnofficialGrsecStable => Some("minipli/linux-unofficial_grsec"),
            ReleaseSource::LinuxHardenedCopperhead => Some("copperhead/linux-hardened"),
            ReleaseSource::LinuxHardenedAnthraxx => Some("anthraxx/linux-hardened"),
        }
    }

    /// Substring every matching asset name must contain
    pub fn asset_marker(&self) -> &'static str {
        match self {
            ReleaseSource::UnofficialGrsecTest | ReleaseSource::UnofficialGrsecStable => {
                "unofficial_grsec"
            }
            ReleaseSource::LinuxHardenedCopperhead | ReleaseSource::LinuxHardenedAnthraxx => {
                "linux-hardened"
            }
        }
    }

    pub fn patch_extension(&self) -> &'static str {
        match self {
            ReleaseSource::UnofficialGrsecStable => ".diff",
            _ => ".patch",
        }
    }

    pub fn signature_extension(&self) -> &'static str {
        match self {
            ReleaseSource::UnofficialGrsecStable => ".diff.sig",
            _ => ".patch.sig",
        }
    }

    /// Prefix for the per-run work directory
    pub fn work_dir_prefix(&self) -> &'static str {
        match self.resolver_kind() {
            ResolverKind::Feed => "grsec-download",
            ResolverKind::ReleaseApi => "linux-security-download",
        }
    }

    /// Upstream URL queried to find the latest patch
    pub fn endpoint(&self, config: &FetchConfig) -> String {
        match self.github_repo() {
            Some(repo) => format!(
                "{}/repos/{}/releases/latest",
                config.github_api_base.trim_end_matches('/'),
                repo
            ),
            None => config.grsec_feed_url.clone(),
        }
    }
}

impl Default for ReleaseSource {
    fn default() -> Self {
        ReleaseSource::LinuxHardenedAnthraxx
    }
}

impl fmt::Display for ReleaseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}
