use serde::Serialize;

use crate::audio::metadata::{MimeType, Tags};

/// One playable item within a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    /// Unique within the storage backend; derived from `location`.
    pub id: String,
    /// Path or URL within the storage backend.
    pub location: String,
    pub mime_type: MimeType,
    /// Size of the track data in bytes.
    pub data_len: u64,
    /// Tags read from the track data, if any.
    pub tags: Tags,

    // The following fields are computed by the annotator.
    /// Display name.
    pub name: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Differs from `artist` for compilations or orchestral performances.
    pub album_artist: String,
    pub album_id: String,
    pub genre: String,
    pub track_number: u32,
    /// Grouping key for the owning playlist. May be virtual, like
    /// `tags:/path` or `regex:/path`.
    pub playlist_location: String,
}

impl Track {
    /// A track with only its filesystem facts set, ready for annotation.
    pub fn new(id: String, location: String, mime_type: MimeType, data_len: u64, tags: Tags) -> Self {
        Self {
            id,
            location,
            mime_type,
            data_len,
            tags,
            name: String::new(),
            title: String::new(),
            artist: String::new(),
            album: String::new(),
            album_artist: String::new(),
            album_id: String::new(),
            genre: String::new(),
            track_number: 0,
            playlist_location: String::new(),
        }
    }
}

/// A named group of tracks sharing a playlist location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playlist {
    /// Derived from `location`.
    pub id: String,
    /// The shared `playlist_location` of the member tracks.
    pub location: String,
    pub name: String,
    /// Sorted by location.
    pub tracks: Vec<Track>,
}
