//! Embedded metadata writing
//!
//! The pipeline talks to taggers through the [`Tagger`] trait so the tag library can
//! be swapped or faked. [`LoftyTagger`] is the implementation used by default.
//!
//! A tagger owns the last step of a track download: once tags are written it moves
//! the temporary file to its final name. If it fails, the caller deletes the
//! temporary file.

mod lofty_tagger;
mod traits;

pub use lofty_tagger::{COVER_FILE_NAME, LoftyTagger, TrackTags, load_cover};
pub use traits::{TagRequest, Tagger};
