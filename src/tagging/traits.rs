//! Traits and types for tag writing

use crate::catalog::{AlbumMetadata, TrackMetadata};
use crate::config::AudioFormat;
use crate::error::TagError;
use async_trait::async_trait;
use std::path::Path;

/// Everything a tagger needs to finish one downloaded track
#[derive(Debug, Clone, Copy)]
pub struct TagRequest<'a> {
    /// Freshly downloaded file under its temporary name
    pub temp_path: &'a Path,
    /// Directory holding the release extras (`cover.jpg`)
    pub target_dir: &'a Path,
    /// Where the tagged file must end up
    pub final_path: &'a Path,
    /// Metadata of the track itself
    pub track: &'a TrackMetadata,
    /// Metadata of the release the track belongs to
    pub album: &'a AlbumMetadata,
    /// Whether the track was requested on its own rather than as part of an album
    pub is_single_track: bool,
    /// Embed `cover.jpg` from `target_dir` when the format supports pictures
    pub embed_art: bool,
    /// Container the downloaded stream must be in; a mismatch is a tagging failure
    pub format: AudioFormat,
}

/// Trait for writing embedded metadata into downloaded audio
///
/// On success the file must exist at `final_path` and no longer at `temp_path`.
/// On failure implementations leave cleanup to the caller: the track orchestrator
/// removes the temporary file so a half-tagged file never poses as a finished
/// download.
#[async_trait]
pub trait Tagger: Send + Sync {
    /// Tag `request.temp_path` and move it to `request.final_path`
    async fn tag(&self, request: &TagRequest<'_>) -> Result<(), TagError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
