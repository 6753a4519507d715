//! Catalog client seam
//!
//! The music service client (authentication, catalog lookups, URL signing) lives
//! outside this crate. The pipeline only needs the three lookups described by
//! [`CatalogClient`], plus the metadata models in [`models`].
//!
//! ## Usage
//!
//! ```no_run
//! use async_trait::async_trait;
//! use qobuz_dl::catalog::{AlbumMetadata, CatalogClient, StreamDescriptor, TrackMetadata};
//! use qobuz_dl::{Quality, Result};
//!
//! struct MyClient;
//!
//! #[async_trait]
//! impl CatalogClient for MyClient {
//!     async fn get_album_meta(&self, id: &str) -> Result<AlbumMetadata> {
//!         todo!("GET album/get?album_id={id}")
//!     }
//!
//!     async fn get_track_meta(&self, id: &str) -> Result<TrackMetadata> {
//!         todo!("GET track/get?track_id={id}")
//!     }
//!
//!     async fn get_track_url(&self, id: &str, quality: Quality) -> Result<StreamDescriptor> {
//!         todo!("GET track/getFileUrl?track_id={id}&format_id={quality}")
//!     }
//! }
//! ```

pub mod models;

use crate::config::Quality;
use async_trait::async_trait;

pub use models::{
    AlbumImage, AlbumMetadata, Artist, Availability, Goody, Named, StreamDescriptor, TrackList,
    TrackMetadata, UnavailableReason,
};

/// Read-only access to the music catalog
///
/// Errors returned here are treated as fatal for the run: the orchestrator does not
/// retry them and propagates them to its caller.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch album metadata, including its track listing
    async fn get_album_meta(&self, id: &str) -> crate::Result<AlbumMetadata>;

    /// Fetch metadata for a single track, including its parent album
    async fn get_track_meta(&self, id: &str) -> crate::Result<TrackMetadata>;

    /// Resolve a track to a stream at the requested quality
    async fn get_track_url(&self, id: &str, quality: Quality) -> crate::Result<StreamDescriptor>;
}
