//! Utility functions for URL decoding, string previews, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Percent-decoding of Wikipedia URLs so non-ASCII titles read correctly
//! - Character-safe truncation for log lines and terminal previews
//! - File system validation for output directories

use crate::error::Result;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Percent-decode a URL for display and storage.
///
/// `https://ru.wikipedia.org/wiki/%D0%9F%D1%83%D1%82%D0%B8%D0%BD` becomes
/// `https://ru.wikipedia.org/wiki/Путин`. Byte sequences that don't decode
/// to valid UTF-8 are replaced with U+FFFD rather than rejected.
pub fn decode_url(url: &str) -> String {
    let bytes = urlencoding::decode_binary(url.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Truncate a string to at most `max` characters.
///
/// Long strings get an ellipsis and a count of the dropped characters, e.g.
/// `"aaaaaaaaaa…(+490 chars)"`. Truncation never splits a multi-byte
/// character.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => {
            let dropped = s[cut..].chars().count();
            format!("{}…(+{} chars)", &s[..cut], dropped)
        }
    }
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
