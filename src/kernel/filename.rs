//! Local filename derivation for downloaded artifacts
//!
//! The local name is the URL's last `/`-delimited segment, capped at 255
//! bytes. Any name that could resolve outside the work directory once
//! joined to it is rejected with `FetchError::UnsafeFilename`.

use crate::error::FetchError;
use std::path::{Path, MAIN_SEPARATOR};

/// Longest filename most filesystems accept
pub const MAX_FILENAME_BYTES: usize = 255;

/// Derive a filename from `url` that is safe to join onto a directory.
///
/// Both separator characters are refused regardless of host platform, as
/// are percent-encoded separators and the `.`/`..` directory entries.
pub fn safe_filename(url: &str) -> Result<String, FetchError> {
    let file_part = url.rsplit('/').next().unwrap_or(url);
    let truncated = truncate_to_boundary(file_part, MAX_FILENAME_BYTES);

    // basename: anything a platform Path would treat as a directory part is dropped
    let name = Path::new(truncated)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if name.is_empty() || name != truncated {
        return Err(FetchError::UnsafeFilename(truncated.to_string()));
    }
    if contains_separator(name) || is_dot_entry(name) {
        return Err(FetchError::UnsafeFilename(name.to_string()));
    }

    Ok(name.to_string())
}

fn contains_separator(name: &str) -> bool {
    if name.contains('/') || name.contains('\\') || name.contains(MAIN_SEPARATOR) {
        return true;
    }
    let lower = name.to_ascii_lowercase();
    lower.contains("%2f") || lower.contains("%5c")
}

fn is_dot_entry(name: &str) -> bool {
    let decoded = name.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

/// Cut `s` to at most `max` bytes without splitting a UTF-8 sequence
fn truncate_to_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
