//! Album and single-track runs: resolve, lay out, fetch extras, iterate.

use crate::catalog::{AlbumMetadata, Availability, TrackMetadata, UnavailableReason};
use crate::config::Quality;
use crate::error::{Error, Result};
use crate::naming::{directory_name, format_label};
use crate::tagging::COVER_FILE_NAME;
use crate::types::{
    DownloadCounter, DownloadReport, Event, SkipReason, TrackOutcome, TrackReport,
};
use crate::utils::ensure_dir;
use std::path::{Path, PathBuf};

use super::{Downloader, TrackJob};

/// File name the first album goody is saved under
const BOOKLET_FILE_NAME: &str = "booklet.pdf";

impl Downloader {
    /// Download every track of an album into `root/<Artist - Title [Year] [Format]>/`
    ///
    /// Multi-disc albums get one `Disc N` subdirectory per media number. Tracks that
    /// are unavailable, already on disk, or fail to fetch or tag are recorded in the
    /// report and the run moves on.
    ///
    /// # Errors
    ///
    /// Returns an error if album metadata or a track's stream cannot be resolved, or
    /// if the release directory cannot be created.
    pub async fn download_album(
        &self,
        album_id: &str,
        quality: Quality,
        root: &Path,
    ) -> Result<DownloadReport> {
        let album = self.catalog.get_album_meta(album_id).await?;
        let album_title = album.display_title();
        tracing::info!(album_id, title = %album_title, "downloading album");
        self.emit_event(Event::Started {
            item_id: album_id.to_string(),
            title: album_title,
        });

        let dir = root.join(directory_name(
            &album.artist.name,
            &album.title,
            album.version.as_deref(),
            &album.release_year(),
            format_label(album.maximum_bit_depth, quality),
        ));
        ensure_dir(&dir).await?;
        self.fetch_extras(&album, &dir).await;

        let multi_disc = album.is_multi_disc();
        let format = quality.format();
        let mut counter = DownloadCounter::default();
        let mut tracks = Vec::with_capacity(album.tracks.items.len());

        for track in &album.tracks.items {
            let stream = self
                .catalog
                .get_track_url(&track.id.to_string(), quality)
                .await?;

            let outcome = match stream.availability() {
                Availability::Unavailable(reason) => {
                    self.skip_unavailable(track.display_title(), reason)
                }
                Availability::Available { .. } => {
                    let job = TrackJob {
                        root_dir: &dir,
                        counter,
                        stream: &stream,
                        track,
                        album: &album,
                        is_single_track: false,
                        format,
                        embed_art: self.config.embed_art,
                        disc: multi_disc.then_some(track.media_number),
                    };
                    self.run_track(job).await
                }
            };

            tracks.push(TrackReport {
                title: track.display_title(),
                outcome,
            });
            counter = counter.next();
        }

        Ok(self.complete(album_id, Some(dir), tracks))
    }

    /// Download a single track into `root/<Artist - Title [Year] [Format]>/`
    ///
    /// The stream is resolved first; previews and demo streams are skipped before any
    /// metadata lookup or directory work.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream or metadata cannot be resolved, if the track's
    /// metadata lacks its parent album, or if the directory cannot be created.
    pub async fn download_track(
        &self,
        track_id: &str,
        quality: Quality,
        root: &Path,
    ) -> Result<DownloadReport> {
        let stream = self.catalog.get_track_url(track_id, quality).await?;
        if let Availability::Unavailable(reason) = stream.availability() {
            let title = format!("track {track_id}");
            let outcome = self.skip_unavailable(title.clone(), reason);
            return Ok(self.complete(track_id, None, vec![TrackReport { title, outcome }]));
        }

        let track = self.catalog.get_track_meta(track_id).await?;
        let album = parent_album(&track)?;
        let title = track.display_title();
        tracing::info!(track_id, title = %title, "downloading track");
        self.emit_event(Event::Started {
            item_id: track_id.to_string(),
            title: title.clone(),
        });

        let dir = root.join(directory_name(
            &album.artist.name,
            &track.title,
            track.version.as_deref(),
            &album.release_year(),
            format_label(track.maximum_bit_depth, quality),
        ));
        ensure_dir(&dir).await?;
        self.fetch_cover(album, &dir).await;

        let job = TrackJob {
            root_dir: &dir,
            counter: DownloadCounter::default(),
            stream: &stream,
            track: &track,
            album,
            is_single_track: true,
            format: quality.format(),
            embed_art: self.config.embed_art,
            disc: None,
        };
        let outcome = self.run_track(job).await;

        Ok(self.complete(track_id, Some(dir), vec![TrackReport { title, outcome }]))
    }

    /// Run one track job, recording a fetch failure instead of aborting the run
    async fn run_track(&self, job: TrackJob<'_>) -> TrackOutcome {
        match self.download_and_tag(job).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let title = job.track.display_title();
                tracing::error!(track = %title, error = %e, "failed to download track");
                let error = e.to_string();
                self.emit_event(Event::TrackFailed {
                    title,
                    error: error.clone(),
                });
                TrackOutcome::FetchFailed { error }
            }
        }
    }

    fn skip_unavailable(&self, title: String, reason: UnavailableReason) -> TrackOutcome {
        tracing::warn!(track = %title, %reason, "demo or unavailable stream, skipping");
        self.emit_event(Event::TrackSkipped {
            title,
            reason: SkipReason::Unavailable(reason),
        });
        TrackOutcome::Unavailable { reason }
    }

    /// Fetch the cover and, when advertised and enabled, the booklet
    async fn fetch_extras(&self, album: &AlbumMetadata, dir: &Path) {
        self.fetch_cover(album, dir).await;

        if !self.config.download_booklet {
            return;
        }
        if let Some(url) = album.booklet_url() {
            self.fetch_extra_logged(url, dir, BOOKLET_FILE_NAME).await;
        }
    }

    async fn fetch_cover(&self, album: &AlbumMetadata, dir: &Path) {
        self.fetch_extra_logged(&album.image.large, dir, COVER_FILE_NAME)
            .await;
    }

    /// Extras are best-effort: failures are logged and reported, never escalated
    async fn fetch_extra_logged(&self, url: &str, dir: &Path, file_name: &str) {
        match self.fetcher.fetch_extra(url, dir, file_name).await {
            Ok(bytes) => tracing::debug!(file_name, bytes, "fetched extra"),
            Err(e) => {
                tracing::warn!(file_name, error = %e, "failed to fetch extra");
                self.emit_event(Event::ExtraFailed {
                    file_name: file_name.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    fn complete(
        &self,
        item_id: &str,
        directory: Option<PathBuf>,
        tracks: Vec<TrackReport>,
    ) -> DownloadReport {
        let report = DownloadReport { directory, tracks };
        tracing::info!(
            item_id,
            completed = report.completed(),
            failed = report.failed(),
            "completed"
        );
        self.emit_event(Event::Complete {
            item_id: item_id.to_string(),
        });
        report
    }
}

fn parent_album(track: &TrackMetadata) -> Result<&AlbumMetadata> {
    track
        .album
        .as_deref()
        .ok_or_else(|| Error::Metadata(format!("track {} has no album metadata", track.id)))
}
