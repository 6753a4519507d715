//! # qobuz-dl
//!
//! Download pipeline for albums and tracks from a streaming music catalog.
//!
//! ## Design Philosophy
//!
//! qobuz-dl is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Pluggable** - Catalog lookups and tag writing sit behind traits
//! - **Resumable** - Re-running a download skips tracks already on disk
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! Authentication and the catalog's HTTP API are out of scope: callers provide a
//! [`CatalogClient`] that resolves metadata and signed stream URLs.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use qobuz_dl::{CatalogClient, Config, DownloadTarget, Downloader, Quality};
//!
//! async fn run(catalog: Arc<dyn CatalogClient>) -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         quality: Quality::HiRes,
//!         embed_art: true,
//!         ..Default::default()
//!     };
//!     let downloader = Downloader::new(config.clone(), catalog)?;
//!
//!     // Subscribe to events
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let target = DownloadTarget::from_config(&config, "0060254735180", true);
//!     let report = downloader.download(&target).await?;
//!     println!("{} of {} tracks on disk", report.completed(), report.tracks.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Catalog client trait and metadata models
pub mod catalog;
/// Configuration types
pub mod config;
/// Core downloader implementation (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
/// Chunked HTTP fetching with progress events
pub mod fetcher;
/// Directory and file naming rules
pub mod naming;
/// Embedded metadata writing
pub mod tagging;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use catalog::CatalogClient;
pub use config::{AudioFormat, Config, Quality};
pub use downloader::{Downloader, TrackJob};
pub use error::{Error, Result, TagError};
pub use naming::FormatLabel;
pub use tagging::{LoftyTagger, Tagger};
pub use types::{
    DownloadCounter, DownloadReport, DownloadTarget, Event, SkipReason, TrackOutcome, TrackReport,
};
