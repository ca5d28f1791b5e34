//! Shared helpers for integration tests

#![allow(dead_code)]

use async_compression::tokio::bufread::XzEncoder;
use kernel_patch_fetch::FetchConfig;
use tokio::io::AsyncReadExt;

/// xz-compress `data` in memory
pub async fn xz_compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = XzEncoder::new(data);
    let mut out = Vec::new();
    encoder
        .read_to_end(&mut out)
        .await
        .expect("Failed to xz-compress fixture");
    out
}

/// A fake kernel tarball body, large enough to span several 4 KiB chunks
pub fn fake_tarball() -> Vec<u8> {
    (0..20_000u32).flat_map(|i| (i % 251).to_le_bytes()).collect()
}

/// Config with every upstream pointed at a mock server
pub fn config_for(server_url: &str) -> FetchConfig {
    FetchConfig {
        grsec_feed_url: format!("{}/testing_rss.php", server_url),
        github_api_base: server_url.to_string(),
        kernel_mirror_base: format!("{}/pub/linux/kernel", server_url),
        ..FetchConfig::default()
    }
}
