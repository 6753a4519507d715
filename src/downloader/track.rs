//! Single-track download: skip-if-exists, temp download, tag, rollback.

use crate::catalog::{AlbumMetadata, StreamDescriptor, TrackMetadata, UnavailableReason};
use crate::config::AudioFormat;
use crate::error::Result;
use crate::naming::{disc_dir_name, progress_label, temp_file_name, track_file_name};
use crate::tagging::TagRequest;
use crate::types::{DownloadCounter, Event, SkipReason, TrackOutcome};
use crate::utils::{ensure_dir, remove_if_exists, sanitize_filename};
use std::path::Path;

use super::Downloader;

/// Parameters for downloading and tagging one track
#[derive(Debug, Clone, Copy)]
pub struct TrackJob<'a> {
    /// Release directory; the tagger looks for `cover.jpg` here even when the track
    /// is routed into a `Disc N` subdirectory
    pub root_dir: &'a Path,
    /// Position of this track in the run, used for the temporary file name
    pub counter: DownloadCounter,
    /// Resolved stream for the track
    pub stream: &'a StreamDescriptor,
    /// Track metadata
    pub track: &'a TrackMetadata,
    /// Release metadata
    pub album: &'a AlbumMetadata,
    /// Whether the track was requested on its own
    pub is_single_track: bool,
    /// Container format to write
    pub format: AudioFormat,
    /// Embed the release cover into the file
    pub embed_art: bool,
    /// Disc subdirectory to route the track into (multi-disc albums only)
    pub disc: Option<u32>,
}

impl Downloader {
    /// Download one track to a temporary name, tag it, and move it into place
    ///
    /// Expected absences (no URL, file already present) and tagging failures are
    /// reported as a [`TrackOutcome`]. A tagging failure removes the temporary file so
    /// nothing is left under a name that could be mistaken for a finished download.
    ///
    /// # Errors
    ///
    /// Transport and filesystem errors while fetching are returned to the caller
    /// unchanged; nothing is retried.
    pub async fn download_and_tag(&self, job: TrackJob<'_>) -> Result<TrackOutcome> {
        let title = job.track.display_title();
        let extension = job.format.extension();

        let Some(url) = job.stream.url() else {
            tracing::warn!(track = %title, "track not available for download");
            let reason = UnavailableReason::NoUrl;
            self.emit_event(Event::TrackSkipped {
                title,
                reason: SkipReason::Unavailable(reason),
            });
            return Ok(TrackOutcome::Unavailable { reason });
        };

        let track_dir = match job.disc {
            Some(disc) => {
                let dir = job.root_dir.join(disc_dir_name(disc));
                ensure_dir(&dir).await?;
                dir
            }
            None => job.root_dir.to_path_buf(),
        };

        let temp_path = track_dir.join(temp_file_name(job.counter, extension));
        let final_path = track_dir.join(track_file_name(
            job.track.track_number,
            &sanitize_filename(&job.track.title),
            extension,
        ));

        if is_file(&final_path).await {
            tracing::info!(track = %title, path = %final_path.display(), "already downloaded, skipping");
            self.emit_event(Event::TrackSkipped {
                title,
                reason: SkipReason::AlreadyDownloaded,
            });
            return Ok(TrackOutcome::AlreadyDownloaded { path: final_path });
        }

        let label = progress_label(job.stream, &job.track.title, job.disc);
        self.fetcher.fetch(url, &temp_path, &label).await?;

        let request = TagRequest {
            temp_path: &temp_path,
            target_dir: job.root_dir,
            final_path: &final_path,
            track: job.track,
            album: job.album,
            is_single_track: job.is_single_track,
            embed_art: job.embed_art,
            format: job.format,
        };

        match self.tagger.tag(&request).await {
            Ok(()) => {
                tracing::info!(track = %title, path = %final_path.display(), "track downloaded");
                self.emit_event(Event::TrackComplete {
                    title,
                    path: final_path.clone(),
                });
                Ok(TrackOutcome::Downloaded { path: final_path })
            }
            Err(e) => {
                tracing::error!(
                    track = %title,
                    tagger = self.tagger.name(),
                    error = %e,
                    "error tagging the file"
                );
                discard(&temp_path).await;
                discard(&final_path).await;

                let error = e.to_string();
                self.emit_event(Event::TrackFailed {
                    title,
                    error: error.clone(),
                });
                Ok(TrackOutcome::TagFailed { error })
            }
        }
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_file())
}

/// Best-effort removal of a file left behind by a failed track
async fn discard(path: &Path) {
    match remove_if_exists(path).await {
        Ok(true) => tracing::debug!(path = %path.display(), "removed partial file"),
        Ok(false) => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove partial file")
        }
    }
}
