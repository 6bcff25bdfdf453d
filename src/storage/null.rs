use std::io::Read;

use crate::storage::id::IdDeriver;
use crate::storage::model::{Playlist, Track};
use crate::storage::StorageService;
use crate::{CatalogError, RecordKind, Result};

/// A backend with no tracks. Used when nothing else is configured.
#[derive(Debug, Clone)]
pub struct NullStorage {
    id: String,
}

impl NullStorage {
    pub fn new(ids: &IdDeriver) -> Self {
        Self { id: ids.derive("null:") }
    }
}

impl StorageService for NullStorage {
    fn id(&self) -> &str {
        &self.id
    }

    fn find_tracks(&mut self) -> Result<(&[Track], &[Playlist])> {
        Ok((&[], &[]))
    }

    fn read_track(&self, id: &str) -> Result<Box<dyn Read + Send>> {
        Err(CatalogError::not_found(RecordKind::Track, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_nothing() {
        let mut storage = NullStorage::new(&IdDeriver::new("s"));
        let (tracks, playlists) = storage.find_tracks().unwrap();
        assert!(tracks.is_empty());
        assert!(playlists.is_empty());
        assert!(storage.read_track("any").err().unwrap().is_not_found());
    }
}
