//! Tag writer backed by the `lofty` crate

use super::traits::{TagRequest, Tagger};
use crate::config::AudioFormat;
use crate::error::TagError;
use async_trait::async_trait;
use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::{FileType, TaggedFileExt};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt};
use std::path::{Path, PathBuf};

/// File name of the cover fetched into every release directory
pub const COVER_FILE_NAME: &str = "cover.jpg";

/// Writes Vorbis comments (FLAC) or ID3v2 (MP3) via `lofty`
///
/// Cover art is embedded from `cover.jpg` in the release directory when requested and
/// present. A missing cover is not an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagger;

/// Owned tag values computed from catalog metadata
///
/// Built on the async side so the blocking write does not borrow the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    /// Track title with version
    pub title: String,
    /// Track artist (performer, or the album artist)
    pub artist: String,
    /// Album title with version
    pub album: String,
    /// Album artist
    pub album_artist: String,
    /// Track number
    pub track_number: u32,
    /// Number of tracks on the release
    pub track_total: Option<u32>,
    /// Disc number
    pub disc_number: u32,
    /// Number of discs on the release
    pub disc_total: Option<u32>,
    /// Release date
    pub date: Option<String>,
    /// Genre
    pub genre: Option<String>,
    /// Record label
    pub label: Option<String>,
    /// Copyright line
    pub copyright: Option<String>,
    /// Composer
    pub composer: Option<String>,
    /// ISRC
    pub isrc: Option<String>,
}

impl TrackTags {
    /// Derive tag values for the track in `request`
    ///
    /// Album metadata nested in a single-track lookup carries no track listing, so
    /// totals then come only from the release's advertised counts.
    pub fn from_request(request: &TagRequest<'_>) -> Self {
        let track = request.track;
        let album = request.album;

        let listed_tracks = (!request.is_single_track && !album.tracks.items.is_empty())
            .then(|| album.tracks.items.len() as u32);
        let listed_discs = (!request.is_single_track && !album.tracks.items.is_empty())
            .then(|| album.disc_numbers().len() as u32);

        Self {
            title: track.display_title(),
            artist: track
                .performer
                .as_ref()
                .map_or_else(|| album.artist.name.clone(), |p| p.name.clone()),
            album: album.display_title(),
            album_artist: album.artist.name.clone(),
            track_number: track.track_number,
            track_total: album.tracks_count.or(listed_tracks),
            disc_number: track.media_number,
            disc_total: album.media_count.or(listed_discs),
            date: non_empty(Some(album.release_date_original.as_str())),
            genre: non_empty(album.genre.as_ref().map(|g| g.name.as_str())),
            label: non_empty(album.label.as_ref().map(|l| l.name.as_str())),
            copyright: non_empty(track.copyright.as_deref().or(album.copyright.as_deref())),
            composer: non_empty(track.composer.as_ref().map(|c| c.name.as_str())),
            isrc: non_empty(track.isrc.as_deref()),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl Tagger for LoftyTagger {
    async fn tag(&self, request: &TagRequest<'_>) -> Result<(), TagError> {
        let tags = TrackTags::from_request(request);
        let cover = if request.embed_art {
            load_cover(request.target_dir).await?
        } else {
            None
        };

        let temp_path = request.temp_path.to_path_buf();
        let final_path = request.final_path.to_path_buf();
        let format = request.format;

        tokio::task::spawn_blocking(move || {
            write_tags(&temp_path, format, &tags, cover)?;
            std::fs::rename(&temp_path, &final_path).map_err(|e| TagError::Rename {
                source_path: temp_path.clone(),
                dest_path: final_path.clone(),
                reason: e.to_string(),
            })
        })
        .await
        .map_err(|e| TagError::Write {
            path: request.temp_path.to_path_buf(),
            reason: format!("tagging task failed: {e}"),
        })?
    }

    fn name(&self) -> &'static str {
        "lofty"
    }
}

/// Read `cover.jpg` from `dir`, if present
pub async fn load_cover(dir: &Path) -> Result<Option<Vec<u8>>, TagError> {
    let path = dir.join(COVER_FILE_NAME);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no cover to embed");
            Ok(None)
        }
        Err(e) => Err(TagError::Cover {
            path,
            reason: e.to_string(),
        }),
    }
}

fn cover_mime_type(data: &[u8]) -> MimeType {
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        MimeType::Png
    } else {
        MimeType::Jpeg
    }
}

fn container_type(format: AudioFormat) -> FileType {
    match format {
        AudioFormat::Flac => FileType::Flac,
        AudioFormat::Mp3 => FileType::Mpeg,
    }
}

fn write_tags(
    path: &Path,
    format: AudioFormat,
    tags: &TrackTags,
    cover: Option<Vec<u8>>,
) -> Result<(), TagError> {
    let read_error = |reason: String| TagError::Read {
        path: path.to_path_buf(),
        reason,
    };

    let mut tagged_file = Probe::open(path)
        .map_err(|e| read_error(e.to_string()))?
        .guess_file_type()
        .map_err(|e| read_error(e.to_string()))?
        .options(ParseOptions::new().read_properties(false))
        .read()
        .map_err(|e| read_error(e.to_string()))?;

    // A stream in the wrong container would end up behind a misleading extension
    let expected = container_type(format);
    if tagged_file.file_type() != expected {
        return Err(read_error(format!(
            "expected a {expected:?} stream, found {:?}",
            tagged_file.file_type()
        )));
    }

    if tagged_file.primary_tag().is_none() {
        let tag_type = tagged_file.primary_tag_type();
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let tag = tagged_file.primary_tag_mut().ok_or_else(|| TagError::Write {
        path: path.to_path_buf(),
        reason: "file format does not support tags".to_string(),
    })?;

    apply_tags(tag, tags);

    if let Some(data) = cover {
        let mime_type = cover_mime_type(&data);
        tag.push_picture(
            Picture::unchecked(data)
                .pic_type(PictureType::CoverFront)
                .mime_type(mime_type)
                .build(),
        );
    }

    tag.save_to_path(path, WriteOptions::default())
        .map_err(|e| TagError::Write {
            path: PathBuf::from(path),
            reason: e.to_string(),
        })
}

fn apply_tags(tag: &mut Tag, tags: &TrackTags) {
    tag.set_title(tags.title.clone());
    tag.set_artist(tags.artist.clone());
    tag.set_album(tags.album.clone());
    tag.insert_text(ItemKey::AlbumArtist, tags.album_artist.clone());
    tag.set_track(tags.track_number);
    if let Some(total) = tags.track_total {
        tag.set_track_total(total);
    }
    tag.set_disk(tags.disc_number);
    if let Some(total) = tags.disc_total {
        tag.set_disk_total(total);
    }
    if let Some(genre) = &tags.genre {
        tag.set_genre(genre.clone());
    }

    let optional_text = [
        (ItemKey::RecordingDate, &tags.date),
        (ItemKey::Label, &tags.label),
        (ItemKey::CopyrightMessage, &tags.copyright),
        (ItemKey::Composer, &tags.composer),
        (ItemKey::Isrc, &tags.isrc),
    ];
    for (key, value) in optional_text {
        if let Some(value) = value {
            tag.insert_text(key, value.clone());
        }
    }
}
