//! Storage backends: where tracks live, and how they are indexed.

use std::io::Read;

use crate::storage::model::{Playlist, Track};
use crate::Result;

pub mod annotate;
pub mod disk;
pub mod id;
pub mod model;
pub mod null;
pub mod playlist;
pub mod registry;

/// A source of tracks and playlists.
pub trait StorageService: Send + Sync {
    /// Stable ID of this storage backend.
    fn id(&self) -> &str;

    /// Tracks sorted by location and playlists sorted by name.
    ///
    /// The first call indexes the backend; later calls return the cached
    /// result.
    fn find_tracks(&mut self) -> Result<(&[Track], &[Playlist])>;

    /// Open a track's data for reading.
    fn read_track(&self, id: &str) -> Result<Box<dyn Read + Send>>;
}
