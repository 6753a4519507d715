//! Directory, file and label naming
//!
//! Pure functions shared by the album and track orchestrators. Nothing here touches
//! the filesystem.

use crate::catalog::StreamDescriptor;
use crate::config::Quality;
use crate::types::DownloadCounter;
use crate::utils::sanitize_filename;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Bit depth of CD-quality sources
const BASELINE_BIT_DEPTH: u32 = 16;

/// Human-readable quality class shown in directory names
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatLabel {
    /// Lossy output
    #[serde(rename = "MP3")]
    Mp3,
    /// 16-bit lossless
    #[serde(rename = "FLAC")]
    Flac,
    /// Anything above CD quality
    #[serde(rename = "Hi-Res")]
    HiRes,
    /// The catalog did not report a bit depth
    #[serde(rename = "Unknown")]
    Unknown,
}

impl FormatLabel {
    /// Label text as it appears on disk
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatLabel::Mp3 => "MP3",
            FormatLabel::Flac => "FLAC",
            FormatLabel::HiRes => "Hi-Res",
            FormatLabel::Unknown => "Unknown",
        }
    }
}

impl Display for FormatLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a release for its directory name
///
/// The lossy tier always wins. Otherwise a missing bit depth yields
/// [`FormatLabel::Unknown`] instead of an error so the download can proceed.
///
/// # Examples
///
/// ```
/// use qobuz_dl::naming::{format_label, FormatLabel};
/// use qobuz_dl::Quality;
///
/// assert_eq!(format_label(Some(24), Quality::Mp3), FormatLabel::Mp3);
/// assert_eq!(format_label(Some(16), Quality::Lossless), FormatLabel::Flac);
/// assert_eq!(format_label(Some(24), Quality::HiRes), FormatLabel::HiRes);
/// assert_eq!(format_label(None, Quality::Lossless), FormatLabel::Unknown);
/// ```
pub fn format_label(max_bit_depth: Option<u32>, quality: Quality) -> FormatLabel {
    if quality.is_lossy() {
        return FormatLabel::Mp3;
    }
    match max_bit_depth {
        None => FormatLabel::Unknown,
        Some(BASELINE_BIT_DEPTH) if quality.is_below_hi_res() => FormatLabel::Flac,
        Some(_) => FormatLabel::HiRes,
    }
}

/// Title with a parenthesized version suffix when the version is non-empty
pub fn display_title(title: &str, version: Option<&str>) -> String {
    match version.map(str::trim).filter(|v| !v.is_empty()) {
        Some(version) => format!("{title} ({version})"),
        None => title.to_string(),
    }
}

/// Release directory name: `Artist - Title (Version) [Year] [Format]`, sanitized
pub fn directory_name(
    artist: &str,
    title: &str,
    version: Option<&str>,
    year: &str,
    format: FormatLabel,
) -> String {
    sanitize_filename(&format!(
        "{artist} - {} [{year}] [{format}]",
        display_title(title, version)
    ))
}

/// Final track file name: `NN. Title.ext`
///
/// `sanitized_title` must already be passed through
/// [`sanitize_filename`](crate::utils::sanitize_filename).
pub fn track_file_name(track_number: u32, sanitized_title: &str, extension: &str) -> String {
    format!("{track_number:02}. {sanitized_title}{extension}")
}

/// Temporary download name for the `counter`-th track of a run: `.NN.ext`
pub fn temp_file_name(counter: DownloadCounter, extension: &str) -> String {
    format!(".{:02}{extension}", counter.get())
}

/// Name of the per-disc subdirectory
pub fn disc_dir_name(disc: u32) -> String {
    format!("Disc {disc}")
}

/// Progress label: `Title [bit/rate]`, prefixed with `[Disc N]` on multi-disc albums
pub fn progress_label(stream: &StreamDescriptor, title: &str, disc: Option<u32>) -> String {
    let name = match disc {
        Some(disc) => format!("[Disc {disc}] {title}"),
        None => title.to_string(),
    };
    format!(
        "{name} [{}/{}]",
        or_unknown(stream.bit_depth),
        or_unknown(stream.sampling_rate)
    )
}

fn or_unknown<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}
