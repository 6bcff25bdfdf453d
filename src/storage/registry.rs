use std::collections::HashMap;

use log::debug;

use crate::config::StorageSettings;
use crate::storage::disk::DiskStorage;
use crate::storage::id::IdDeriver;
use crate::storage::null::NullStorage;
use crate::storage::StorageService;
use crate::{CatalogError, Result};

pub type StorageConstructor = fn(&StorageSettings, &IdDeriver) -> Result<Box<dyn StorageService>>;

/// Maps the `kind` tag of a storage setting to the backend that serves it.
pub struct StorageRegistry {
    constructors: HashMap<String, StorageConstructor>,
}

impl StorageRegistry {
    /// A registry with no backends.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("disk", create_disk);
        registry.register("null", create_null);
        registry
    }

    pub fn register(&mut self, kind: &str, constructor: StorageConstructor) {
        self.constructors.insert(kind.to_string(), constructor);
    }

    pub fn create(&self, settings: &StorageSettings, ids: &IdDeriver) -> Result<Box<dyn StorageService>> {
        let constructor = self
            .constructors
            .get(&settings.kind)
            .ok_or_else(|| CatalogError::Config(format!("unknown storage kind: {:?}", settings.kind)))?;
        debug!("Creating {} storage at {:?}", settings.kind, settings.path);
        constructor(settings, ids)
    }
}

impl Default for StorageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn create_disk(settings: &StorageSettings, ids: &IdDeriver) -> Result<Box<dyn StorageService>> {
    let storage = DiskStorage::new(settings.resolved_path(), &settings.patterns, ids.clone())?;
    Ok(Box::new(storage))
}

fn create_null(_settings: &StorageSettings, ids: &IdDeriver) -> Result<Box<dyn StorageService>> {
    Ok(Box::new(NullStorage::new(ids)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_known_kinds() {
        let ids = IdDeriver::new("s");
        let dir = tempdir().unwrap();
        let registry = StorageRegistry::new();

        let disk = registry
            .create(&StorageSettings::disk(dir.path().to_string_lossy(), vec![]), &ids)
            .unwrap();
        assert_eq!(disk.id(), ids.derive(&format!("disk:{}", dir.path().display())));

        let null = registry.create(&StorageSettings::null(), &ids).unwrap();
        assert_eq!(null.id(), ids.derive("null:"));
    }

    #[test]
    fn unknown_kind_is_a_config_error() {
        let settings = StorageSettings {
            kind: "s3".to_string(),
            ..StorageSettings::default()
        };
        let err = StorageRegistry::new().create(&settings, &IdDeriver::new("s")).err().unwrap();
        assert!(matches!(err, CatalogError::Config(msg) if msg.contains("s3")));
    }

    #[test]
    fn empty_registry_knows_nothing() {
        let err = StorageRegistry::empty()
            .create(&StorageSettings::null(), &IdDeriver::new("s"))
            .err()
            .unwrap();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn disk_storage_errors_propagate() {
        let settings = StorageSettings::disk("/__DOES__NOT__EXIST__/music", vec![]);
        let err = StorageRegistry::new().create(&settings, &IdDeriver::new("s")).err().unwrap();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
