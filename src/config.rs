//! Configuration types for qobuz-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Audio quality requested from the catalog
///
/// Serialized as the catalog's integer quality code. Code 5 is the only lossy tier;
/// everything else is delivered as FLAC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quality {
    /// MP3 320 kbps (5)
    Mp3 = 5,
    /// FLAC 16-bit / 44.1 kHz (6)
    #[default]
    Lossless = 6,
    /// FLAC 24-bit up to 96 kHz (7)
    HiRes = 7,
    /// FLAC 24-bit above 96 kHz (27)
    HiResMax = 27,
}

/// Lowest quality code that always yields a hi-res label
const HI_RES_THRESHOLD: u8 = 7;

impl Quality {
    /// The integer code sent to the catalog
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Whether this quality produces lossy (MP3) output
    pub fn is_lossy(&self) -> bool {
        matches!(self, Quality::Mp3)
    }

    /// Whether this quality sits below the hi-res threshold
    pub fn is_below_hi_res(&self) -> bool {
        self.code() < HI_RES_THRESHOLD
    }

    /// Container format written to disk for this quality
    pub fn format(&self) -> AudioFormat {
        if self.is_lossy() {
            AudioFormat::Mp3
        } else {
            AudioFormat::Flac
        }
    }
}

impl TryFrom<u8> for Quality {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            5 => Ok(Quality::Mp3),
            6 => Ok(Quality::Lossless),
            7 => Ok(Quality::HiRes),
            27 => Ok(Quality::HiResMax),
            other => Err(Error::config(
                format!("unsupported quality code {other} (expected 5, 6, 7 or 27)"),
                "quality",
            )),
        }
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.code()
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Audio container written for a track
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// Free Lossless Audio Codec
    Flac,
    /// MPEG-1 Layer III
    Mp3,
}

impl AudioFormat {
    /// File extension including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Flac => ".flac",
            AudioFormat::Mp3 => ".mp3",
        }
    }
}

/// Main configuration for [`Downloader`](crate::Downloader)
///
/// Every field has a default, so an empty JSON object is a valid configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Root directory that album folders are created in (default: "Qobuz Downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Default quality used by [`DownloadTarget::from_config`](crate::DownloadTarget::from_config)
    #[serde(default)]
    pub quality: Quality,

    /// Embed `cover.jpg` into each tagged file (default: false)
    #[serde(default)]
    pub embed_art: bool,

    /// Fetch the album booklet PDF when the catalog advertises one (default: true)
    #[serde(default = "default_true")]
    pub download_booklet: bool,

    /// User-Agent header sent with stream and asset requests
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Capacity of the event broadcast channel (default: 1000)
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            quality: Quality::default(),
            embed_art: false,
            download_booklet: true,
            user_agent: None,
            event_capacity: default_event_capacity(),
        }
    }
}

impl Config {
    /// Check settings that serde defaults cannot rule out
    pub fn validate(&self) -> Result<()> {
        if self.download_dir.as_os_str().is_empty() {
            return Err(Error::config(
                "download_dir must not be empty",
                "download_dir",
            ));
        }
        if self.event_capacity == 0 {
            return Err(Error::config(
                "event_capacity must be greater than zero",
                "event_capacity",
            ));
        }
        Ok(())
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("Qobuz Downloads")
}

fn default_true() -> bool {
    true
}

fn default_event_capacity() -> usize {
    1000
}
