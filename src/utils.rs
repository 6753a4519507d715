//! Utility functions for file operations and path manipulation

use crate::error::Result;
use std::path::Path;

/// Maximum file name length in bytes on common filesystems
const MAX_FILENAME_BYTES: usize = 255;

/// Characters that are invalid in a file name on at least one major platform
const INVALID_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Device names Windows refuses as file names regardless of extension
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Make a string safe to use as a single path component
///
/// - Removes `\ / : * ? " < > |` and control characters
/// - Trims surrounding whitespace and trailing dots
/// - Truncates to 255 bytes on a character boundary
/// - Appends `_` to reserved Windows device names
///
/// The result is stable: sanitizing an already sanitized name returns it unchanged.
///
/// # Examples
///
/// ```
/// use qobuz_dl::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("AC/DC: Live?"), "ACDC Live");
/// assert_eq!(sanitize_filename("con"), "con_");
/// ```
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !INVALID_CHARS.contains(c) && !c.is_control())
        .collect();

    let mut sanitized = trim_edges(&cleaned).to_string();

    if sanitized.len() > MAX_FILENAME_BYTES {
        let mut cut = MAX_FILENAME_BYTES;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized = trim_edges(&sanitized).to_string();
    }

    if RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(&sanitized))
    {
        sanitized.push('_');
    }

    sanitized
}

fn trim_edges(name: &str) -> &str {
    name.trim().trim_end_matches(|c: char| c == '.' || c.is_whitespace())
}

/// Create a directory and all of its parents
///
/// Creating a directory that already exists is not an error.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

/// Remove a file, treating "already gone" as success
///
/// Returns whether a file was actually removed.
pub async fn remove_if_exists(path: &Path) -> Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
