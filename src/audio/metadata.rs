use std::fmt;
use std::io;

use serde::{Serialize, Serializer};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::{MetadataOptions, MetadataRevision, StandardTagKey};
use symphonia::core::probe::Hint;

use crate::{CatalogError, Result};

/// Content type of a track, derived from its filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MimeType {
    Mp3,
    Ogg,
    Flac,
    Mp4,
    /// Anything we have no tag reader for. Files of this type are skipped.
    Binary,
}

impl MimeType {
    pub fn from_filename(filename: &str) -> Self {
        let filename = filename.to_lowercase();
        if filename.ends_with(".mp3") {
            MimeType::Mp3
        } else if filename.ends_with(".ogg") {
            MimeType::Ogg
        } else if filename.ends_with(".flac") {
            MimeType::Flac
        } else if filename.ends_with(".m4a") {
            MimeType::Mp4
        } else {
            MimeType::Binary
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Mp3 => "audio/mp3",
            MimeType::Ogg => "audio/ogg",
            MimeType::Flac => "audio/flac",
            MimeType::Mp4 => "audio/mp4",
            MimeType::Binary => "application/binary",
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, MimeType::Binary)
    }

    fn extension(&self) -> Option<&'static str> {
        match self {
            MimeType::Mp3 => Some("mp3"),
            MimeType::Ogg => Some("ogg"),
            MimeType::Flac => Some("flac"),
            MimeType::Mp4 => Some("m4a"),
            MimeType::Binary => None,
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for MimeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Raw metadata read from a media container.
///
/// Fields are only filled in when the container carries a tag for them;
/// otherwise they stay empty (or zero for the track number).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tags {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// E.g. for compilations, or orchestral performances.
    pub album_artist: String,
    /// E.g. a CDDB disc ID, or a similar release identifier.
    pub album_id: String,
    pub genre: String,
    /// 0 means unset.
    pub track_number: u32,
}

impl Tags {
    /// True when the tags alone are enough to name the track and its album.
    pub fn is_complete(&self) -> bool {
        !self.artist.is_empty() && !self.album.is_empty() && !self.title.is_empty()
    }

    // Fill in anything still unset from `other`.
    fn merge_missing(&mut self, other: Tags) {
        fn fill(slot: &mut String, value: String) {
            if slot.is_empty() {
                *slot = value;
            }
        }
        fill(&mut self.title, other.title);
        fill(&mut self.artist, other.artist);
        fill(&mut self.album, other.album);
        fill(&mut self.album_artist, other.album_artist);
        fill(&mut self.album_id, other.album_id);
        fill(&mut self.genre, other.genre);
        if self.track_number == 0 {
            self.track_number = other.track_number;
        }
    }
}

/// Reads tags out of a media byte stream.
///
/// Implementations must fail for formats they cannot parse; the storage
/// index treats any failure as fatal for the build.
pub trait TagReader: Send + Sync {
    fn read_tags(&self, stream: Box<dyn MediaSource>, mime_type: MimeType) -> Result<Tags>;
}

/// Tag reader backed by symphonia's format probes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaTagReader;

impl TagReader for SymphoniaTagReader {
    fn read_tags(&self, stream: Box<dyn MediaSource>, mime_type: MimeType) -> Result<Tags> {
        if mime_type.is_ignored() {
            return Err(CatalogError::UnsupportedFormat(format!(
                "unable to read tags for MIME type {}",
                mime_type
            )));
        }

        let mss = MediaSourceStream::new(stream, Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = mime_type.extension() {
            hint.with_extension(extension);
        }

        let mut probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(probe_error)?;

        let mut tags = Tags::default();

        // ID3 and friends are read by the probe, ahead of the container.
        if let Some(metadata) = probed.metadata.get() {
            if let Some(revision) = metadata.current() {
                tags.merge_missing(tags_from_revision(revision));
            }
        }

        // Vorbis comments (ogg, flac) and mp4 atoms live in the container.
        let metadata = probed.format.metadata();
        if let Some(revision) = metadata.current() {
            tags.merge_missing(tags_from_revision(revision));
        }

        Ok(tags)
    }
}

fn probe_error(err: SymphoniaError) -> CatalogError {
    match err {
        SymphoniaError::Unsupported(what) => CatalogError::UnsupportedFormat(what.to_string()),
        SymphoniaError::IoError(io) if io.kind() != io::ErrorKind::UnexpectedEof => {
            CatalogError::Io(io)
        }
        other => CatalogError::Parse(other.to_string()),
    }
}

fn tags_from_revision(revision: &MetadataRevision) -> Tags {
    let mut tags = Tags::default();
    let mut release_id = String::new();

    for tag in revision.tags() {
        let value = clean_value(&tag.value.to_string());
        // Repeated keys (multi-value vorbis comments) are appended.
        match tag.std_key {
            Some(StandardTagKey::TrackTitle) => tags.title.push_str(&value),
            Some(StandardTagKey::Artist) => tags.artist.push_str(&value),
            Some(StandardTagKey::Album) => tags.album.push_str(&value),
            Some(StandardTagKey::AlbumArtist) => tags.album_artist.push_str(&value),
            Some(StandardTagKey::Genre) => tags.genre.push_str(&value),
            Some(StandardTagKey::TrackNumber) => {
                if let Some(n) = parse_track_number(&value) {
                    tags.track_number = n;
                }
            }
            Some(StandardTagKey::MusicBrainzAlbumId) => release_id = value,
            None if tag.key.eq_ignore_ascii_case("CDDB") => tags.album_id.push_str(&value),
            _ => {}
        }
    }

    // A CDDB disc ID is preferred; fall back to a release ID.
    if tags.album_id.is_empty() {
        tags.album_id = release_id;
    }
    tags
}

// ID3 text frames may carry trailing NULs.
fn clean_value(value: &str) -> String {
    value.trim_end_matches('\0').to_string()
}

/// Parse "7" or "7/12" into 7.
fn parse_track_number(value: &str) -> Option<u32> {
    value.split('/').next()?.trim().parse().ok()
}
