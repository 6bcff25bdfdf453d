use std::path::{Component, Path, PathBuf};

use log::debug;
use regex::Regex;

use crate::storage::model::Track;
use crate::Result;

/// Fields pulled out of a filename by one of the configured patterns.
///
/// Patterns use the named groups `albumartist`, `album`, `trackno`,
/// `artist` and `title`; groups a pattern does not capture stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationMatch {
    pub album_artist: String,
    pub album: String,
    pub track_number: u32,
    pub artist: String,
    pub title: String,
}

/// Works out artist, album and title for tracks under one storage root,
/// and which playlist each track belongs to.
///
/// Strategies are tried in order and the first full match wins:
/// 1. tags, when they name the artist, album and title;
/// 2. filename patterns;
/// 3. the directory layout `<artist>/<album>/<title>.<ext>`.
#[derive(Debug, Clone)]
pub struct Annotator {
    base_path: PathBuf,
    patterns: Vec<Regex>,
}

impl Annotator {
    pub fn new<S: AsRef<str>>(base_path: impl Into<PathBuf>, patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            base_path: base_path.into(),
            patterns,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn annotate(&self, mut track: Track) -> Track {
        let strategy = if self.annotate_from_tags(&mut track) {
            "tags"
        } else if self.annotate_from_pattern(&mut track) {
            "pattern"
        } else {
            self.annotate_from_path(&mut track);
            "path"
        };
        debug!("Annotated {} using {}", track.location, strategy);

        track.name = if is_track_by_album_artist(&track.artist, &track.album_artist) {
            track.title.clone()
        } else {
            format!("{} :: {}", track.artist, track.title)
        };
        track
    }

    /// Match a filename against the configured patterns, extension stripped.
    /// The first matching pattern wins.
    pub fn match_location(&self, filename: &str) -> Option<LocationMatch> {
        let stem = Path::new(filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.patterns.iter().find_map(|pattern| {
            let caps = pattern.captures(&stem)?;
            let group = |name: &str| caps.name(name).map(|m| m.as_str().to_string()).unwrap_or_default();
            Some(LocationMatch {
                album_artist: group("albumartist"),
                album: group("album"),
                track_number: group("trackno").parse().unwrap_or(0),
                artist: group("artist"),
                title: group("title"),
            })
        })
    }

    fn annotate_from_tags(&self, track: &mut Track) -> bool {
        if !track.tags.is_complete() {
            return false;
        }
        let tags = track.tags.clone();

        track.title = tags.title;
        track.artist = tags.artist;
        track.album = tags.album;
        track.album_id = tags.album_id;
        track.genre = tags.genre;
        track.track_number = tags.track_number;

        track.album_artist = if !tags.album_artist.is_empty() {
            tags.album_artist
        } else if let Some(dir) = self.album_artist_dir(&track.location) {
            dir
        } else {
            track.artist.clone()
        };

        // The album ID is the most specific grouping, then the album artist.
        let group = [&track.album_id, &track.album_artist, &track.artist]
            .into_iter()
            .find(|s| !s.is_empty())
            .cloned()
            .unwrap_or_default();
        track.playlist_location = format!("tags:{}", self.join(&[group.as_str(), track.album.as_str()]));
        true
    }

    fn annotate_from_pattern(&self, track: &mut Track) -> bool {
        let filename = match Path::new(&track.location).file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => return false,
        };
        let Some(found) = self.match_location(&filename) else {
            return false;
        };

        track.title = found.title;
        track.artist = found.artist;
        track.album = found.album;
        track.track_number = found.track_number;
        track.album_id = track.tags.album_id.clone();
        track.genre = track.tags.genre.clone();
        track.album_artist = if found.album_artist.is_empty() {
            track.artist.clone()
        } else {
            found.album_artist
        };

        track.playlist_location = format!("regex:{}", self.join(&[track.album_artist.as_str(), track.album.as_str()]));
        true
    }

    fn annotate_from_path(&self, track: &mut Track) {
        let path = Path::new(&track.location);
        let parent = path.parent();

        track.title = file_name_of(path.file_stem());
        track.album = file_name_of(parent.and_then(Path::file_name));
        track.artist = file_name_of(parent.and_then(Path::parent).and_then(Path::file_name));
        track.album_artist = track.artist.clone();
        track.album_id = track.tags.album_id.clone();
        track.genre = track.tags.genre.clone();
        track.track_number = track.tags.track_number;

        track.playlist_location = self.join(&[track.album_artist.as_str(), track.album.as_str()]);
    }

    /// The grandparent directory name, for files laid out as
    /// `<base>/.../<album artist>/<album>/<file>`.
    fn album_artist_dir(&self, location: &str) -> Option<String> {
        let path = Path::new(location);
        let relative = path.strip_prefix(&self.base_path).ok()?;
        let depth = relative
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .count();
        if depth < 3 {
            return None;
        }
        let dir = path.parent()?.parent()?.file_name()?;
        Some(dir.to_string_lossy().into_owned())
    }

    // Join non-empty parts under the base path.
    fn join(&self, parts: &[&str]) -> String {
        let mut path = self.base_path.clone();
        for part in parts {
            // An absolute part would replace the base path.
            let part = part.trim_start_matches(|c: char| c == '/' || c == std::path::MAIN_SEPARATOR);
            if !part.is_empty() {
                path.push(part);
            }
        }
        path.to_string_lossy().into_owned()
    }
}

fn file_name_of(name: Option<&std::ffi::OsStr>) -> String {
    name.map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Whether a track's artist is really its album artist, ignoring case and
/// treating `_` and `-` as spaces.
pub fn is_track_by_album_artist(artist: &str, album_artist: &str) -> bool {
    fn normalize(s: &str) -> String {
        s.to_lowercase().replace(['_', '-'], " ")
    }
    normalize(artist) == normalize(album_artist)
}
