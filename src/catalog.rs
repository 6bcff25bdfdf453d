use std::collections::HashMap;
use std::io::Read;

use log::{info, warn};

use crate::config::Settings;
use crate::storage::id::IdDeriver;
use crate::storage::model::{Playlist, Track};
use crate::storage::registry::StorageRegistry;
use crate::storage::StorageService;
use crate::{CatalogError, RecordKind, Result};

/// Tracks and playlists from every storage backend, addressable by ID.
#[derive(Default)]
pub struct Catalog {
    storages: Vec<Box<dyn StorageService>>,
    tracks: HashMap<String, Track>,
    playlists: HashMap<String, Playlist>,
    owners: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and add every storage named in `settings`.
    pub fn from_settings(settings: &Settings, registry: &StorageRegistry) -> Result<Self> {
        let ids = IdDeriver::new(settings.secret.clone());
        let mut catalog = Self::new();
        for storage_settings in settings.storages() {
            catalog.add_storage(registry.create(&storage_settings, &ids)?)?;
        }
        Ok(catalog)
    }

    /// Index `storage` and take ownership of it.
    pub fn add_storage(&mut self, mut storage: Box<dyn StorageService>) -> Result<()> {
        let index = self.storages.len();
        let (tracks, playlists) = storage.find_tracks()?;

        let mut added = 0;
        for track in tracks {
            if self.tracks.contains_key(&track.id) {
                warn!("Ignoring duplicate track ID {} at {}", track.id, track.location);
                continue;
            }
            self.owners.insert(track.id.clone(), index);
            self.tracks.insert(track.id.clone(), track.clone());
            added += 1;
        }
        for playlist in playlists {
            if self.playlists.contains_key(&playlist.id) {
                warn!("Ignoring duplicate playlist ID {} ({})", playlist.id, playlist.name);
                continue;
            }
            self.playlists.insert(playlist.id.clone(), playlist.clone());
        }

        info!("Storage {} added {} tracks", storage.id(), added);
        self.storages.push(storage);
        Ok(())
    }

    /// All tracks, ordered by location.
    pub fn tracks(&self) -> Vec<&Track> {
        let mut tracks: Vec<&Track> = self.tracks.values().collect();
        tracks.sort_by(|a, b| a.location.cmp(&b.location));
        tracks
    }

    /// All playlists, ordered by name.
    pub fn playlists(&self) -> Vec<&Playlist> {
        let mut playlists: Vec<&Playlist> = self.playlists.values().collect();
        playlists.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.location.cmp(&b.location)));
        playlists
    }

    pub fn get_track(&self, id: &str) -> Result<&Track> {
        self.tracks
            .get(id)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Track, id))
    }

    pub fn get_playlist(&self, id: &str) -> Result<&Playlist> {
        self.playlists
            .get(id)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Playlist, id))
    }

    /// Open a track's data through the storage that indexed it.
    pub fn read_track(&self, id: &str) -> Result<Box<dyn Read + Send>> {
        let owner = self
            .owners
            .get(id)
            .and_then(|&i| self.storages.get(i))
            .ok_or_else(|| CatalogError::not_found(RecordKind::Track, id))?;
        owner.read_track(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::metadata::{MimeType, Tags};
    use crate::storage::null::NullStorage;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    /// Serves each track's ID back as its data.
    struct MemoryStorage {
        id: String,
        tracks: Vec<Track>,
        playlists: Vec<Playlist>,
    }

    impl MemoryStorage {
        fn new(id: &str, entries: &[(&str, &str, &str)]) -> Self {
            let tracks: Vec<Track> = entries
                .iter()
                .map(|(track_id, location, name)| {
                    let mut track = Track::new(
                        track_id.to_string(),
                        location.to_string(),
                        MimeType::Mp3,
                        track_id.len() as u64,
                        Tags::default(),
                    );
                    track.name = name.to_string();
                    track
                })
                .collect();
            let playlists = vec![Playlist {
                id: format!("{}-playlist", id),
                location: format!("/{}", id),
                name: format!("{} :: all", id),
                tracks: tracks.clone(),
            }];
            Self {
                id: id.to_string(),
                tracks,
                playlists,
            }
        }
    }

    impl StorageService for MemoryStorage {
        fn id(&self) -> &str {
            &self.id
        }

        fn find_tracks(&mut self) -> Result<(&[Track], &[Playlist])> {
            Ok((&self.tracks, &self.playlists))
        }

        fn read_track(&self, id: &str) -> Result<Box<dyn Read + Send>> {
            Ok(Box::new(Cursor::new(format!("{}@{}", id, self.id).into_bytes())))
        }
    }

    fn read_string(catalog: &Catalog, id: &str) -> String {
        let mut data = String::new();
        catalog.read_track(id).unwrap().read_to_string(&mut data).unwrap();
        data
    }

    #[test]
    fn routes_reads_to_owning_storage() {
        let mut catalog = Catalog::new();
        catalog
            .add_storage(Box::new(MemoryStorage::new("one", &[("a", "/one/a.mp3", "a")])))
            .unwrap();
        catalog
            .add_storage(Box::new(MemoryStorage::new("two", &[("b", "/two/b.mp3", "b")])))
            .unwrap();

        assert_eq!(read_string(&catalog, "a"), "a@one");
        assert_eq!(read_string(&catalog, "b"), "b@two");
        assert!(catalog.read_track("c").err().unwrap().is_not_found());
    }

    #[test]
    fn first_storage_wins_duplicate_ids() {
        let mut catalog = Catalog::new();
        catalog
            .add_storage(Box::new(MemoryStorage::new("one", &[("a", "/one/a.mp3", "first")])))
            .unwrap();
        catalog
            .add_storage(Box::new(MemoryStorage::new("two", &[("a", "/two/a.mp3", "second")])))
            .unwrap();

        assert_eq!(catalog.tracks().len(), 1);
        assert_eq!(catalog.get_track("a").unwrap().name, "first");
        assert_eq!(read_string(&catalog, "a"), "a@one");
    }

    #[test]
    fn listings_are_sorted() {
        let mut catalog = Catalog::new();
        catalog
            .add_storage(Box::new(MemoryStorage::new(
                "zed",
                &[("z", "/z/2.mp3", "z"), ("y", "/z/1.mp3", "y")],
            )))
            .unwrap();
        catalog
            .add_storage(Box::new(MemoryStorage::new("abe", &[("x", "/a/1.mp3", "x")])))
            .unwrap();

        let locations: Vec<&str> = catalog.tracks().iter().map(|t| t.location.as_str()).collect();
        assert_eq!(locations, vec!["/a/1.mp3", "/z/1.mp3", "/z/2.mp3"]);

        let names: Vec<&str> = catalog.playlists().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["abe :: all", "zed :: all"]);
        assert_eq!(catalog.get_playlist("zed-playlist").unwrap().tracks.len(), 2);
        assert!(catalog.get_playlist("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn null_storage_contributes_nothing() {
        let mut catalog = Catalog::new();
        catalog
            .add_storage(Box::new(NullStorage::new(&IdDeriver::new("s"))))
            .unwrap();
        assert!(catalog.tracks().is_empty());
        assert!(catalog.playlists().is_empty());
    }

    #[test]
    fn from_default_settings_uses_null_storage() {
        let catalog = Catalog::from_settings(&Settings::default(), &StorageRegistry::new()).unwrap();
        assert_eq!(catalog.storages.len(), 1);
        assert!(catalog.tracks().is_empty());
    }
}
