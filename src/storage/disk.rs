use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::audio::metadata::{MimeType, SymphoniaTagReader, TagReader};
use crate::storage::annotate::Annotator;
use crate::storage::id::IdDeriver;
use crate::storage::model::{Playlist, Track};
use crate::storage::playlist::{group_tracks, sorted_playlists};
use crate::storage::StorageService;
use crate::utils::parallel::ParallelProcessor;
use crate::{CatalogError, RecordKind, Result};

/// The result of one full scan of a storage root.
#[derive(Debug, Clone)]
pub struct Index {
    tracks: Vec<Track>,
    playlists: Vec<Playlist>,
    tracks_by_id: HashMap<String, usize>,
    playlists_by_id: HashMap<String, usize>,
}

impl Index {
    fn new(mut tracks: Vec<Track>, ids: &IdDeriver) -> Self {
        tracks.sort_by(|a, b| a.location.cmp(&b.location));
        let playlists = sorted_playlists(group_tracks(&tracks, ids).into_values());

        let tracks_by_id = tracks.iter().enumerate().map(|(i, t)| (t.id.clone(), i)).collect();
        let playlists_by_id = playlists.iter().enumerate().map(|(i, p)| (p.id.clone(), i)).collect();

        Self {
            tracks,
            playlists,
            tracks_by_id,
            playlists_by_id,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks_by_id.get(id).map(|&i| &self.tracks[i])
    }

    pub fn playlist(&self, id: &str) -> Option<&Playlist> {
        self.playlists_by_id.get(id).map(|&i| &self.playlists[i])
    }
}

/// Whether a storage root has been indexed yet.
#[derive(Debug, Clone, Default)]
pub enum BuildState {
    #[default]
    NotBuilt,
    Built(Index),
}

impl BuildState {
    pub fn index(&self) -> Option<&Index> {
        match self {
            BuildState::NotBuilt => None,
            BuildState::Built(index) => Some(index),
        }
    }
}

/// Tracks stored as media files below a directory.
///
/// Building is not safe to run concurrently on one instance (it needs
/// `&mut self`); once built, lookups and reads only need `&self`.
pub struct DiskStorage {
    id: String,
    base_path: PathBuf,
    ids: IdDeriver,
    annotator: Annotator,
    tag_reader: Arc<dyn TagReader>,
    state: BuildState,
}

impl ParallelProcessor for DiskStorage {}

impl DiskStorage {
    pub fn new<S: AsRef<str>>(path: impl Into<PathBuf>, patterns: &[S], ids: IdDeriver) -> Result<Self> {
        Self::with_tag_reader(path, patterns, ids, Arc::new(SymphoniaTagReader))
    }

    /// The storage root must exist and be a directory; `patterns` are
    /// compiled up front, so a bad pattern fails here rather than mid-scan.
    pub fn with_tag_reader<S: AsRef<str>>(
        path: impl Into<PathBuf>,
        patterns: &[S],
        ids: IdDeriver,
        tag_reader: Arc<dyn TagReader>,
    ) -> Result<Self> {
        let base_path = path.into();
        let metadata = fs::metadata(&base_path)?;
        if !metadata.is_dir() {
            return Err(CatalogError::Config(format!(
                "storage root is not a directory: {}",
                base_path.display()
            )));
        }

        let annotator = Annotator::new(base_path.clone(), patterns)?;
        let id = ids.derive(&format!("disk:{}", base_path.display()));

        Ok(Self {
            id,
            base_path,
            ids,
            annotator,
            tag_reader,
            state: BuildState::NotBuilt,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn state(&self) -> &BuildState {
        &self.state
    }

    pub fn is_built(&self) -> bool {
        self.state.index().is_some()
    }

    /// Index the storage root unless that has already been done.
    pub fn build(&mut self) -> Result<&Index> {
        if let BuildState::NotBuilt = self.state {
            let index = self.scan()?;
            self.state = BuildState::Built(index);
        }
        self.built()
    }

    /// Index the storage root again. The previous index stays in place if
    /// the new scan fails.
    pub fn rebuild(&mut self) -> Result<&Index> {
        let index = self.scan()?;
        self.state = BuildState::Built(index);
        self.built()
    }

    pub fn lookup_track(&self, id: &str) -> Result<&Track> {
        self.state
            .index()
            .and_then(|index| index.track(id))
            .ok_or_else(|| CatalogError::not_found(RecordKind::Track, id))
    }

    pub fn lookup_playlist(&self, id: &str) -> Result<&Playlist> {
        self.state
            .index()
            .and_then(|index| index.playlist(id))
            .ok_or_else(|| CatalogError::not_found(RecordKind::Playlist, id))
    }

    fn built(&self) -> Result<&Index> {
        self.state
            .index()
            .ok_or_else(|| CatalogError::not_found(RecordKind::Storage, self.id.as_str()))
    }

    fn scan(&self) -> Result<Index> {
        info!("Scanning storage root: {}", self.base_path.display());

        let files = self.collect_media_files()?;
        debug!("Found {} media files", files.len());

        Self::init_parallel_processing();
        let tracks = Self::try_process(&files, "Reading tags", |(path, mime_type)| {
            self.resolve_track(path, *mime_type)
        })?;

        let index = Index::new(tracks, &self.ids);
        info!(
            "Indexed {} tracks in {} playlists under {}",
            index.tracks.len(),
            index.playlists.len(),
            self.base_path.display()
        );
        Ok(index)
    }

    fn collect_media_files(&self) -> Result<Vec<(PathBuf, MimeType)>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.base_path).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let mime_type = MimeType::from_filename(&entry.file_name().to_string_lossy());
            if mime_type.is_ignored() {
                warn!("Ignoring file due to MIME type: {}", entry.path().display());
                continue;
            }
            files.push((entry.into_path(), mime_type));
        }

        Ok(files)
    }

    // The file is closed when the tag reader drops its stream, on every path.
    fn resolve_track(&self, path: &Path, mime_type: MimeType) -> Result<Track> {
        let location = path.to_string_lossy().into_owned();
        let file = File::open(path)?;
        let data_len = file.metadata()?.len();

        let tags = self
            .tag_reader
            .read_tags(Box::new(file), mime_type)
            .map_err(|err| match err {
                CatalogError::UnsupportedFormat(msg) => {
                    CatalogError::UnsupportedFormat(format!("{}: {}", location, msg))
                }
                CatalogError::Parse(msg) => CatalogError::Parse(format!("{}: {}", location, msg)),
                other => other,
            })?;

        debug!("Read tags from {} ({} bytes)", location, data_len);
        let track = Track::new(self.ids.derive(&location), location, mime_type, data_len, tags);
        Ok(self.annotator.annotate(track))
    }
}

impl StorageService for DiskStorage {
    fn id(&self) -> &str {
        &self.id
    }

    fn find_tracks(&mut self) -> Result<(&[Track], &[Playlist])> {
        let index = self.build()?;
        Ok((index.tracks(), index.playlists()))
    }

    fn read_track(&self, id: &str) -> Result<Box<dyn Read + Send>> {
        let track = self.lookup_track(id)?;
        let file = File::open(&track.location)?;
        Ok(Box::new(BufReader::new(file)))
    }
}
