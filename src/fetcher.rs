//! Streaming HTTP fetcher
//!
//! Downloads a URL to a file in fixed-size chunks and broadcasts an
//! [`Event::Progress`] after every chunk written.

use crate::error::Result;
use crate::types::Event;
use futures::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio::sync::broadcast;

/// Size of each write to the destination file
pub const CHUNK_SIZE: usize = 1024;

/// Chunked streaming downloader shared by tracks, covers and booklets
#[derive(Clone)]
pub struct StreamFetcher {
    client: reqwest::Client,
    event_tx: broadcast::Sender<Event>,
}

impl StreamFetcher {
    /// Create a fetcher that reports progress on `event_tx`
    pub fn new(client: reqwest::Client, event_tx: broadcast::Sender<Event>) -> Self {
        Self { client, event_tx }
    }

    /// Stream `url` into `destination`
    ///
    /// The destination is created or truncated. Redirects are followed. A non-success
    /// status is reported as an error, as is any transport failure mid-stream; nothing
    /// is retried and the partially written file is left for the caller to handle.
    ///
    /// Returns the number of bytes written.
    pub async fn fetch(&self, url: &str, destination: &Path, label: &str) -> Result<u64> {
        tracing::debug!(url, destination = %destination.display(), "starting stream fetch");

        let response = self.client.get(url).send().await?.error_for_status()?;
        let total = response.content_length().unwrap_or(0);

        let mut file = tokio::fs::File::create(destination).await?;
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            for piece in chunk.chunks(CHUNK_SIZE) {
                file.write_all(piece).await?;
                downloaded += piece.len() as u64;
                self.emit_progress(label, downloaded, total);
            }
        }

        file.flush().await?;

        tracing::debug!(
            destination = %destination.display(),
            bytes = downloaded,
            "stream fetch complete"
        );
        Ok(downloaded)
    }

    /// Fetch a release extra (cover, booklet) into `dir/file_name`
    pub async fn fetch_extra(&self, url: &str, dir: &Path, file_name: &str) -> Result<u64> {
        let stem = file_name.split('.').next().unwrap_or(file_name);
        self.fetch(url, &dir.join(file_name), &format!("Downloading {stem}"))
            .await
    }

    fn emit_progress(&self, label: &str, downloaded: u64, total: u64) {
        // No receivers is fine: progress is informational
        self.event_tx
            .send(Event::Progress {
                label: label.to_string(),
                downloaded,
                total,
            })
            .ok();
    }
}
