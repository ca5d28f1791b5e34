//! Mainline kernel tarball and signature URLs
//!
//! Pure string formatting against the configured kernel.org mirror. The
//! version is trusted verbatim from the resolver.

use crate::config::FetchConfig;
use crate::models::KernelVersion;

/// Build `(tarball_url, signature_url)` for `version`.
///
/// kernel.org signs the uncompressed tarball, so the signature is
/// `linux-<v>.tar.sign` next to `linux-<v>.tar.xz`.
pub fn kernel_urls(config: &FetchConfig, version: &KernelVersion) -> (String, String) {
    let base = format!(
        "{}/{}",
        config.kernel_mirror_base.trim_end_matches('/'),
        config.kernel_series_dir.trim_matches('/')
    );
    (
        format!("{}/linux-{}.tar.xz", base, version),
        format!("{}/linux-{}.tar.sign", base, version),
    )
}
