//! Core types for qobuz-dl

use crate::catalog::UnavailableReason;
use crate::config::{Config, Quality};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One item to fetch: an album or a single track
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadTarget {
    /// Catalog identifier of the album or track
    pub item_id: String,
    /// Whether `item_id` names an album
    pub is_album: bool,
    /// Requested quality
    pub quality: Quality,
    /// Directory the release folder is created in
    pub root_path: PathBuf,
}

impl DownloadTarget {
    /// Target an album at the default quality
    pub fn album(item_id: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            item_id: item_id.into(),
            is_album: true,
            quality: Quality::default(),
            root_path: root_path.into(),
        }
    }

    /// Target a single track at the default quality
    pub fn track(item_id: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            item_id: item_id.into(),
            is_album: false,
            quality: Quality::default(),
            root_path: root_path.into(),
        }
    }

    /// Target an item using the configured download directory and quality
    pub fn from_config(config: &Config, item_id: impl Into<String>, is_album: bool) -> Self {
        Self {
            item_id: item_id.into(),
            is_album,
            quality: config.quality,
            root_path: config.download_dir.clone(),
        }
    }

    /// Override the requested quality
    #[must_use]
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }
}

/// Per-run sequence number used only to name temporary files
///
/// It is owned by a single orchestration run and passed by value to each track job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DownloadCounter(u32);

impl DownloadCounter {
    /// Get the inner value
    pub fn get(&self) -> u32 {
        self.0
    }

    /// The counter for the following track
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Why a track was skipped without being downloaded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The catalog cannot serve the full track
    Unavailable(UnavailableReason),
    /// The final file is already on disk
    AlreadyDownloaded,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Unavailable(reason) => write!(f, "{reason}"),
            SkipReason::AlreadyDownloaded => write!(f, "already downloaded"),
        }
    }
}

/// Result of processing a single track
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrackOutcome {
    /// Fetched, tagged and moved to its final name
    Downloaded {
        /// Final file path
        path: PathBuf,
    },
    /// The final file already existed; nothing was fetched
    AlreadyDownloaded {
        /// Existing file path
        path: PathBuf,
    },
    /// The catalog cannot serve this track
    Unavailable {
        /// Why the track was skipped
        reason: UnavailableReason,
    },
    /// The audio was fetched but could not be tagged; the partial file was removed
    TagFailed {
        /// Error message
        error: String,
    },
    /// The stream could not be fetched
    FetchFailed {
        /// Error message
        error: String,
    },
}

impl TrackOutcome {
    /// Whether the track ended up on disk
    pub fn is_on_disk(&self) -> bool {
        matches!(
            self,
            TrackOutcome::Downloaded { .. } | TrackOutcome::AlreadyDownloaded { .. }
        )
    }
}

/// Outcome of one track within a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackReport {
    /// Track title (with version)
    pub title: String,
    /// What happened
    pub outcome: TrackOutcome,
}

/// Summary returned by a completed run
///
/// A run completes even when individual tracks fail; inspect `tracks` for details.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadReport {
    /// Release directory, when one was created
    pub directory: Option<PathBuf>,
    /// Per-track results in catalog order
    pub tracks: Vec<TrackReport>,
}

impl DownloadReport {
    /// Number of tracks that ended up on disk
    pub fn completed(&self) -> usize {
        self.tracks.iter().filter(|t| t.outcome.is_on_disk()).count()
    }

    /// Number of tracks that failed to fetch or tag
    pub fn failed(&self) -> usize {
        self.tracks
            .iter()
            .filter(|t| {
                matches!(
                    t.outcome,
                    TrackOutcome::TagFailed { .. } | TrackOutcome::FetchFailed { .. }
                )
            })
            .count()
    }
}

/// Event emitted by the downloader
///
/// Consumers subscribe via [`Downloader::subscribe`](crate::Downloader::subscribe).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A run resolved its item and is about to download
    Started {
        /// Catalog identifier
        item_id: String,
        /// Album or track title (with version)
        title: String,
    },

    /// Bytes written for the file currently being fetched
    Progress {
        /// Progress label (track title and stream quality, or the extra's name)
        label: String,
        /// Cumulative bytes written
        downloaded: u64,
        /// Advertised size in bytes (0 when unknown)
        total: u64,
    },

    /// A track was skipped
    TrackSkipped {
        /// Track title
        title: String,
        /// Why it was skipped
        reason: SkipReason,
    },

    /// A track was fetched and tagged
    TrackComplete {
        /// Track title
        title: String,
        /// Final file path
        path: PathBuf,
    },

    /// A track failed to fetch or tag
    TrackFailed {
        /// Track title
        title: String,
        /// Error message
        error: String,
    },

    /// A cover or booklet could not be fetched
    ExtraFailed {
        /// File name of the extra, e.g. "booklet.pdf"
        file_name: String,
        /// Error message
        error: String,
    },

    /// The run finished (individual tracks may still have failed)
    Complete {
        /// Catalog identifier
        item_id: String,
    },
}
