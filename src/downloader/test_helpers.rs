//! Shared test helpers for creating Downloader instances in tests.

use crate::catalog::{
    AlbumImage, AlbumMetadata, Artist, CatalogClient, Goody, StreamDescriptor, TrackList,
    TrackMetadata,
};
use crate::config::{AudioFormat, Config, Quality};
use crate::downloader::Downloader;
use crate::error::{Error, Result, TagError};
use crate::tagging::{TagRequest, Tagger};
use crate::types::Event;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// In-memory catalog keyed by item id
#[derive(Default)]
pub(crate) struct FakeCatalog {
    pub(crate) albums: HashMap<String, AlbumMetadata>,
    pub(crate) tracks: HashMap<String, TrackMetadata>,
    pub(crate) streams: HashMap<String, StreamDescriptor>,
    /// Track ids passed to `get_track_url`, in call order
    pub(crate) url_calls: Mutex<Vec<(String, Quality)>>,
    /// Track ids passed to `get_track_meta`, in call order
    pub(crate) meta_calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub(crate) fn with_album(mut self, album: AlbumMetadata) -> Self {
        self.albums.insert(album.id.clone(), album);
        self
    }

    pub(crate) fn with_track(mut self, track: TrackMetadata) -> Self {
        self.tracks.insert(track.id.to_string(), track);
        self
    }

    pub(crate) fn with_stream(mut self, track_id: u64, stream: StreamDescriptor) -> Self {
        self.streams.insert(track_id.to_string(), stream);
        self
    }

    pub(crate) fn url_call_count(&self) -> usize {
        self.url_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn get_album_meta(&self, id: &str) -> Result<AlbumMetadata> {
        self.albums
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Catalog(format!("album {id} not found")))
    }

    async fn get_track_meta(&self, id: &str) -> Result<TrackMetadata> {
        self.meta_calls.lock().unwrap().push(id.to_string());
        self.tracks
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Catalog(format!("track {id} not found")))
    }

    async fn get_track_url(&self, id: &str, quality: Quality) -> Result<StreamDescriptor> {
        self.url_calls
            .lock()
            .unwrap()
            .push((id.to_string(), quality));
        self.streams
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Catalog(format!("no stream for track {id}")))
    }
}

/// How [`RecordingTagger`] responds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TagMode {
    /// Move the temp file to its final name
    Rename,
    /// Fail without touching anything
    Fail,
    /// Write a truncated file at the final path, then fail
    FailAfterPartialWrite,
}

/// One call observed by [`RecordingTagger`]
#[derive(Clone, Debug)]
pub(crate) struct TagCall {
    pub(crate) temp_path: PathBuf,
    pub(crate) target_dir: PathBuf,
    pub(crate) final_path: PathBuf,
    pub(crate) is_single_track: bool,
    pub(crate) embed_art: bool,
    pub(crate) format: AudioFormat,
}

/// Tagger that records its requests instead of writing tags
pub(crate) struct RecordingTagger {
    mode: TagMode,
    pub(crate) calls: Mutex<Vec<TagCall>>,
}

impl RecordingTagger {
    pub(crate) fn new(mode: TagMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn calls(&self) -> Vec<TagCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn temp_names(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|call| {
                call.temp_path
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }
}

#[async_trait]
impl Tagger for RecordingTagger {
    async fn tag(&self, request: &TagRequest<'_>) -> std::result::Result<(), TagError> {
        self.calls.lock().unwrap().push(TagCall {
            temp_path: request.temp_path.to_path_buf(),
            target_dir: request.target_dir.to_path_buf(),
            final_path: request.final_path.to_path_buf(),
            is_single_track: request.is_single_track,
            embed_art: request.embed_art,
            format: request.format,
        });

        match self.mode {
            TagMode::Rename => {
                std::fs::rename(request.temp_path, request.final_path).map_err(|e| {
                    TagError::Rename {
                        source_path: request.temp_path.to_path_buf(),
                        dest_path: request.final_path.to_path_buf(),
                        reason: e.to_string(),
                    }
                })
            }
            TagMode::Fail => Err(TagError::Read {
                path: request.temp_path.to_path_buf(),
                reason: "no FLAC header".into(),
            }),
            TagMode::FailAfterPartialWrite => {
                std::fs::write(request.final_path, b"half").unwrap();
                Err(TagError::Write {
                    path: request.temp_path.to_path_buf(),
                    reason: "disk full".into(),
                })
            }
        }
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Track with the given id, title and position
pub(crate) fn track_fixture(id: u64, title: &str, track_number: u32, media_number: u32) -> TrackMetadata {
    TrackMetadata {
        id,
        title: title.to_string(),
        version: None,
        track_number,
        media_number,
        performer: None,
        composer: None,
        copyright: None,
        isrc: None,
        maximum_bit_depth: Some(16),
        album: None,
    }
}

/// Album "Test Artist - Test Album" with one track per entry in `media_numbers`
///
/// Track ids start at 1 and titles are "Track N"; track numbers restart on each disc.
pub(crate) fn album_fixture(id: &str, media_numbers: &[u32]) -> AlbumMetadata {
    let mut per_disc: HashMap<u32, u32> = HashMap::new();
    let items = media_numbers
        .iter()
        .enumerate()
        .map(|(i, &media)| {
            let position = per_disc.entry(media).or_insert(0);
            *position += 1;
            track_fixture(i as u64 + 1, &format!("Track {}", i + 1), *position, media)
        })
        .collect();

    AlbumMetadata {
        id: id.to_string(),
        title: "Test Album".to_string(),
        version: None,
        artist: Artist {
            name: "Test Artist".to_string(),
        },
        release_date_original: "2020-05-04".to_string(),
        maximum_bit_depth: Some(16),
        image: AlbumImage::default(),
        goodies: Vec::new(),
        tracks: TrackList { items },
        genre: None,
        label: None,
        copyright: None,
        tracks_count: None,
        media_count: None,
    }
}

/// Point the album's cover (and optionally booklet) at the mock server
pub(crate) fn serve_extras(mut album: AlbumMetadata, server: &MockServer, booklet: bool) -> AlbumMetadata {
    album.image.large = format!("{}/covers/{}.jpg", server.uri(), album.id);
    if booklet {
        album.goodies = vec![Goody {
            url: format!("{}/booklets/{}.pdf", server.uri(), album.id),
            name: Some("Digital booklet".into()),
        }];
    }
    album
}

/// Full-quality stream served by the mock server at `/stream/{id}`
pub(crate) fn stream_fixture(server: &MockServer, track_id: u64) -> StreamDescriptor {
    StreamDescriptor {
        url: Some(format!("{}/stream/{track_id}", server.uri())),
        bit_depth: Some(16),
        sampling_rate: Some(44.1),
        sample: None,
    }
}

/// Body served for `/stream/{id}`
pub(crate) fn stream_body(track_id: u64) -> Vec<u8> {
    format!("audio-bytes-for-{track_id}").into_bytes()
}

/// Mount a 200 response for `/stream/{id}`
pub(crate) async fn mount_stream(server: &MockServer, track_id: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/stream/{track_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(stream_body(track_id)))
        .mount(server)
        .await;
}

/// Mount 200 responses for cover and booklet paths of `album_id`
pub(crate) async fn mount_extras(server: &MockServer, album_id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/covers/{album_id}.jpg")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/booklets/{album_id}.pdf")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .mount(server)
        .await;
}

/// Build a downloader around `catalog` and `tagger`, returning a subscribed receiver
pub(crate) fn create_test_downloader(
    catalog: Arc<dyn CatalogClient>,
    tagger: Arc<dyn Tagger>,
    config: Config,
) -> (Downloader, broadcast::Receiver<Event>) {
    let downloader = Downloader::new(config, catalog).unwrap().with_tagger(tagger);
    let rx = downloader.subscribe();
    (downloader, rx)
}

/// Collect every event currently buffered on `rx`
pub(crate) fn drain_events(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Small FLAC stream `lofty` can rewrite: the magic, a single STREAMINFO block
/// (44.1 kHz, stereo, 16-bit) and 4 KiB of frame data
///
/// The writer needs audio after the metadata blocks; a file that ends right after
/// STREAMINFO makes `lofty` panic while saving.
pub(crate) fn minimal_flac() -> Vec<u8> {
    let mut bytes = b"fLaC".to_vec();
    // Last-metadata-block flag set, type 0 (STREAMINFO), length 34
    bytes.extend_from_slice(&[0x80, 0x00, 0x00, 0x22]);
    // Min/max block size 4096
    bytes.extend_from_slice(&[0x10, 0x00, 0x10, 0x00]);
    // Min/max frame size unknown
    bytes.extend_from_slice(&[0x00; 6]);
    // 44100 Hz (20 bits), 2 channels (3 bits), 16 bits per sample (5 bits), 0 samples (36 bits)
    bytes.extend_from_slice(&[0x0A, 0xC4, 0x42, 0xF0, 0x00, 0x00, 0x00, 0x00]);
    // MD5 of unencoded audio
    bytes.extend_from_slice(&[0x00; 16]);
    bytes.extend_from_slice(&flac_frame_data());
    bytes
}

/// Opaque frame bytes: a frame sync code followed by zeros
fn flac_frame_data() -> Vec<u8> {
    let mut frames = vec![0x00; 4096];
    frames[..4].copy_from_slice(&[0xFF, 0xF8, 0x69, 0x08]);
    frames
}

/// Three MPEG-1 Layer III frames (128 kbps, 44.1 kHz, joint stereo) of silence
pub(crate) fn minimal_mp3() -> Vec<u8> {
    // 144 * 128000 / 44100, no padding
    const FRAME_LEN: usize = 417;
    let mut frame = vec![0x00; FRAME_LEN];
    frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
    frame.repeat(3)
}
