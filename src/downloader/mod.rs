//! Download orchestration split into focused submodules.
//!
//! The `Downloader` struct and its methods are organized by level:
//! - [`release`] - Album and single-track runs: layout, extras, iteration
//! - [`track`] - One track: skip-if-exists, temp download, tag, rollback

mod release;
mod track;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use track::TrackJob;

use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::StreamFetcher;
use crate::tagging::{LoftyTagger, Tagger};
use crate::types::{DownloadReport, DownloadTarget, Event};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Album and track downloader (cloneable - all fields are Arc-wrapped)
///
/// Runs are strictly sequential: one track is fetched and tagged before the next
/// one starts.
#[derive(Clone)]
pub struct Downloader {
    /// Catalog lookups (trait object for pluggable service clients)
    pub(crate) catalog: Arc<dyn CatalogClient>,
    /// Tag writer (trait object so tests and callers can swap it)
    pub(crate) tagger: Arc<dyn Tagger>,
    /// Chunked HTTP fetcher for streams, covers and booklets
    pub(crate) fetcher: StreamFetcher,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
    /// Configuration (wrapped in Arc for sharing across clones)
    pub(crate) config: Arc<Config>,
}

impl Downloader {
    /// Create a downloader that tags files with [`LoftyTagger`]
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client cannot be
    /// built.
    pub fn new(config: Config, catalog: Arc<dyn CatalogClient>) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder.build()?;

        let (event_tx, _rx) = broadcast::channel(config.event_capacity);
        let fetcher = StreamFetcher::new(client, event_tx.clone());

        Ok(Self {
            catalog,
            tagger: Arc::new(LoftyTagger),
            fetcher,
            event_tx,
            config: Arc::new(config),
        })
    }

    /// Replace the tag writer
    #[must_use]
    pub fn with_tagger(mut self, tagger: Arc<dyn Tagger>) -> Self {
        self.tagger = tagger;
        self
    }

    /// Subscribe to download events
    ///
    /// Events emitted before subscribing are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Download an album or a single track
    ///
    /// Individual track failures are recorded in the returned report and never abort
    /// the run. Catalog failures (metadata or stream resolution) are returned as errors.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use qobuz_dl::catalog::CatalogClient;
    /// use qobuz_dl::{Config, DownloadTarget, Downloader, Quality};
    ///
    /// # async fn example(catalog: Arc<dyn CatalogClient>) -> qobuz_dl::Result<()> {
    /// let downloader = Downloader::new(Config::default(), catalog)?;
    /// let target = DownloadTarget::album("0060254735180", "/music").with_quality(Quality::HiRes);
    ///
    /// let report = downloader.download(&target).await?;
    /// println!("{} tracks on disk, {} failed", report.completed(), report.failed());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn download(&self, target: &DownloadTarget) -> Result<DownloadReport> {
        if target.is_album {
            self.download_album(&target.item_id, target.quality, &target.root_path)
                .await
        } else {
            self.download_track(&target.item_id, target.quality, &target.root_path)
                .await
        }
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no active subscribers, the event is silently dropped.
    pub(crate) fn emit_event(&self, event: Event) {
        // send() returns Err if there are no receivers, which is fine - we just drop the event
        self.event_tx.send(event).ok();
    }
}
