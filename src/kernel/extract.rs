//! Streaming xz decompression of the kernel tarball
//!
//! The archive is decoded in fixed 4 KiB chunks so memory stays flat no
//! matter how large the tarball is. On failure the partially written
//! destination is left in place.

use crate::error::FetchError;
use async_compression::tokio::bufread::XzDecoder;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

/// Suffix that marks an artifact as compressed
pub const COMPRESSED_SUFFIX: &str = ".xz";

/// Bytes decoded per read
pub const CHUNK_SIZE: usize = 4096;

pub fn is_compressed(filename: &str) -> bool {
    filename.ends_with(COMPRESSED_SUFFIX)
}

/// Default destination: the source path with `.xz` stripped
pub fn default_destination(compressed_path: &Path) -> Option<PathBuf> {
    let as_str = compressed_path.to_str()?;
    let stripped = as_str.strip_suffix(COMPRESSED_SUFFIX)?;
    if stripped.is_empty() {
        return None;
    }
    Some(PathBuf::from(stripped))
}

/// Decompress `compressed_path` into `dest_path` (or the adjacent default).
///
/// Returns the path that was written.
pub async fn extract(
    compressed_path: &Path,
    dest_path: Option<&Path>,
) -> Result<PathBuf, FetchError> {
    let dest = match dest_path {
        Some(p) => p.to_path_buf(),
        None => default_destination(compressed_path).ok_or_else(|| FetchError::Extraction {
            path: compressed_path.to_path_buf(),
            reason: format!("no {} suffix to strip", COMPRESSED_SUFFIX),
        })?,
    };

    crate::log_parsed!(
        "Extracting {} to {}",
        compressed_path.display(),
        dest.display()
    );

    let extraction_err = |reason: String| FetchError::Extraction {
        path: compressed_path.to_path_buf(),
        reason,
    };

    let input = File::open(compressed_path)
        .await
        .map_err(|e| extraction_err(format!("failed to open archive: {}", e)))?;

    let mut output = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&dest)
        .await
        .map_err(|e| extraction_err(format!("failed to create {}: {}", dest.display(), e)))?;

    let mut decoder = XzDecoder::new(BufReader::new(input));
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut total: u64 = 0;

    loop {
        let n = decoder
            .read(&mut buffer)
            .await
            .map_err(|e| extraction_err(format!("decompression failed: {}", e)))?;
        if n == 0 {
            break;
        }
        output
            .write_all(&buffer[..n])
            .await
            .map_err(|e| extraction_err(format!("failed to write decompressed data: {}", e)))?;
        total += n as u64;
    }

    output
        .flush()
        .await
        .map_err(|e| extraction_err(format!("failed to flush decompressed data: {}", e)))?;

    log::debug!(
        "[Extract] Wrote {} bytes to {}",
        total,
        dest.display()
    );

    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_compressed() {
        assert!(is_compressed("linux-4.9.24.tar.xz"));
        assert!(!is_compressed("linux-4.9.24.tar.sign"));
        assert!(!is_compressed("linux-hardened-5.4.1.patch"));
    }

    #[test]
    fn test_default_destination_strips_suffix() {
        assert_eq!(
            default_destination(Path::new("/tmp/d/linux-4.9.24.tar.xz")),
            Some(PathBuf::from("/tmp/d/linux-4.9.24.tar"))
        );
        assert_eq!(default_destination(Path::new("/tmp/d/linux.tar")), None);
    }

    #[tokio::test]
    async fn test_extract_without_suffix_needs_destination() {
        let err = extract(Path::new("/nonexistent/linux.tar"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Extraction { .. }));
    }

    #[tokio::test]
    async fn test_extract_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("missing.tar.xz");
        let err = extract(&src, None).await.unwrap_err();
        assert!(matches!(err, FetchError::Extraction { .. }));
    }
}
