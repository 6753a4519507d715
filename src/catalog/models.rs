//! Catalog metadata as returned by the music service

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An artist, performer or composer reference
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    /// Display name
    pub name: String,
}

/// Album artwork URLs
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumImage {
    /// Largest available rendition, saved as `cover.jpg`
    pub large: String,
    /// Small rendition
    #[serde(default)]
    pub small: Option<String>,
    /// Thumbnail rendition
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Supplementary material attached to an album (digital booklet)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goody {
    /// Download URL
    pub url: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

/// Named catalog entity (genre, label)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Named {
    /// Display name
    pub name: String,
}

/// Paged track listing embedded in album metadata
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackList {
    /// Tracks in catalog order
    #[serde(default)]
    pub items: Vec<TrackMetadata>,
}

/// Album metadata
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlbumMetadata {
    /// Catalog identifier
    pub id: String,
    /// Album title
    pub title: String,
    /// Edition or version, e.g. "Remastered"
    #[serde(default)]
    pub version: Option<String>,
    /// Main artist
    pub artist: Artist,
    /// Original release date, `YYYY-MM-DD`
    #[serde(default)]
    pub release_date_original: String,
    /// Highest bit depth available for this album
    #[serde(default)]
    pub maximum_bit_depth: Option<u32>,
    /// Cover art URLs
    pub image: AlbumImage,
    /// Booklets and other extras
    #[serde(default)]
    pub goodies: Vec<Goody>,
    /// Track listing (absent when nested inside track metadata)
    #[serde(default)]
    pub tracks: TrackList,
    /// Genre
    #[serde(default)]
    pub genre: Option<Named>,
    /// Record label
    #[serde(default)]
    pub label: Option<Named>,
    /// Copyright line
    #[serde(default)]
    pub copyright: Option<String>,
    /// Number of tracks on the release
    #[serde(default)]
    pub tracks_count: Option<u32>,
    /// Number of discs on the release
    #[serde(default)]
    pub media_count: Option<u32>,
}

impl AlbumMetadata {
    /// Title with the version appended in parentheses when present
    pub fn display_title(&self) -> String {
        crate::naming::display_title(&self.title, self.version.as_deref())
    }

    /// Four-digit release year taken from `release_date_original`
    ///
    /// Falls back to whatever precedes the first `-` when the date is not a full
    /// calendar date.
    pub fn release_year(&self) -> String {
        release_year(&self.release_date_original)
    }

    /// Distinct media (disc) numbers across the track listing
    pub fn disc_numbers(&self) -> BTreeSet<u32> {
        self.tracks
            .items
            .iter()
            .map(|track| track.media_number)
            .collect()
    }

    /// Whether tracks must be routed into per-disc subdirectories
    pub fn is_multi_disc(&self) -> bool {
        self.disc_numbers().len() > 1
    }

    /// URL of the first advertised booklet
    pub fn booklet_url(&self) -> Option<&str> {
        self.goodies.first().map(|goody| goody.url.as_str())
    }
}

/// Track metadata
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Catalog identifier
    pub id: u64,
    /// Track title
    pub title: String,
    /// Version, e.g. "Live"
    #[serde(default)]
    pub version: Option<String>,
    /// Position on its disc
    pub track_number: u32,
    /// Disc the track belongs to
    #[serde(default = "default_media_number")]
    pub media_number: u32,
    /// Performing artist
    #[serde(default)]
    pub performer: Option<Artist>,
    /// Composer
    #[serde(default)]
    pub composer: Option<Artist>,
    /// Copyright line
    #[serde(default)]
    pub copyright: Option<String>,
    /// International Standard Recording Code
    #[serde(default)]
    pub isrc: Option<String>,
    /// Highest bit depth available for this track
    #[serde(default)]
    pub maximum_bit_depth: Option<u32>,
    /// Parent album; present when the track was looked up on its own
    #[serde(default)]
    pub album: Option<Box<AlbumMetadata>>,
}

impl TrackMetadata {
    /// Title with the version appended in parentheses when present
    pub fn display_title(&self) -> String {
        crate::naming::display_title(&self.title, self.version.as_deref())
    }
}

fn default_media_number() -> u32 {
    1
}

/// Resolved stream for one track at one quality
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Signed, time-limited download URL
    #[serde(default)]
    pub url: Option<String>,
    /// Bit depth of the stream
    #[serde(default)]
    pub bit_depth: Option<u32>,
    /// Sampling rate in kHz
    #[serde(default)]
    pub sampling_rate: Option<f64>,
    /// Present only when the catalog serves a preview
    #[serde(default)]
    pub sample: Option<bool>,
}

/// Why a track cannot be downloaded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The catalog only serves a preview
    Sample,
    /// The stream carries no sampling rate (demo content)
    NoSamplingRate,
    /// The catalog returned no URL
    NoUrl,
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::Sample => write!(f, "only a preview is available"),
            UnavailableReason::NoSamplingRate => write!(f, "stream has no sampling rate"),
            UnavailableReason::NoUrl => write!(f, "not available for download"),
        }
    }
}

/// Outcome of inspecting a [`StreamDescriptor`] before download
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Availability<'a> {
    /// Full content can be fetched from `url`
    Available {
        /// Stream URL
        url: &'a str,
    },
    /// The track must be skipped
    Unavailable(UnavailableReason),
}

impl StreamDescriptor {
    /// Whether the catalog flagged this stream as a preview
    ///
    /// The catalog only attaches `sample` to preview streams, so its presence marks a
    /// preview whatever its value.
    pub fn is_sample(&self) -> bool {
        self.sample.is_some()
    }

    /// Usable URL, if any
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }

    /// Classify the stream as downloadable or not
    pub fn availability(&self) -> Availability<'_> {
        if self.is_sample() {
            return Availability::Unavailable(UnavailableReason::Sample);
        }
        if !self.sampling_rate.is_some_and(|rate| rate > 0.0) {
            return Availability::Unavailable(UnavailableReason::NoSamplingRate);
        }
        match self.url() {
            Some(url) => Availability::Available { url },
            None => Availability::Unavailable(UnavailableReason::NoUrl),
        }
    }
}

fn release_year(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.year().to_string(),
        Err(_) => date.split('-').next().unwrap_or_default().to_string(),
    }
}
