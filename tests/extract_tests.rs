//! Integration tests for streaming xz extraction

mod common;

use kernel_patch_fetch::{extract, FetchError};
use std::fs;
use tempfile::tempdir;

#[tokio::test]
async fn test_extract_round_trip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let original = common::fake_tarball();
    let compressed = common::xz_compress(&original).await;

    let archive = dir.path().join("linux-4.9.24.tar.xz");
    fs::write(&archive, &compressed).expect("Failed to write fixture");

    let dest = extract(&archive, None).await.expect("Extraction failed");

    assert_eq!(dest, dir.path().join("linux-4.9.24.tar"));
    assert_eq!(fs::read(&dest).expect("Failed to read output"), original);
    // The compressed artifact stays next to its extraction
    assert!(archive.exists());
}

#[tokio::test]
async fn test_extract_to_explicit_destination() {
    let dir = tempdir().expect("Failed to create temp dir");
    let compressed = common::xz_compress(b"hello kernel").await;

    let archive = dir.path().join("payload.xz");
    fs::write(&archive, &compressed).expect("Failed to write fixture");
    let target = dir.path().join("custom.out");

    let dest = extract(&archive, Some(&target)).await.expect("Extraction failed");

    assert_eq!(dest, target);
    assert_eq!(fs::read(&target).unwrap(), b"hello kernel");
}

#[tokio::test]
async fn test_extract_corrupt_input() {
    let dir = tempdir().expect("Failed to create temp dir");
    let archive = dir.path().join("broken.tar.xz");
    fs::write(&archive, b"this is definitely not an xz stream").unwrap();

    let err = extract(&archive, None).await.unwrap_err();

    assert!(matches!(err, FetchError::Extraction { .. }));
    // Partial output is left behind for the caller
    assert!(dir.path().join("broken.tar").exists());
}

#[tokio::test]
async fn test_extract_truncated_input() {
    let dir = tempdir().expect("Failed to create temp dir");
    let compressed = common::xz_compress(&common::fake_tarball()).await;

    let archive = dir.path().join("linux-4.9.24.tar.xz");
    fs::write(&archive, &compressed[..compressed.len() / 2]).expect("Failed to write fixture");

    let err = extract(&archive, None).await.unwrap_err();

    assert!(matches!(err, FetchError::Extraction { .. }));
}
