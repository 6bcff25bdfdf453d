use std::collections::HashMap;

use crate::storage::id::IdDeriver;
use crate::storage::model::{Playlist, Track};

/// Group annotated tracks into playlists by their playlist location.
///
/// The first track seen for a location names the playlist
/// (`"<album artist> :: <album>"`); the playlist ID is derived from the
/// location, so it is as stable as the tracks' own IDs.
pub fn group_tracks(tracks: &[Track], ids: &IdDeriver) -> HashMap<String, Playlist> {
    let mut playlists: HashMap<String, Playlist> = HashMap::new();

    for track in tracks {
        playlists
            .entry(track.playlist_location.clone())
            .or_insert_with(|| Playlist {
                id: ids.derive(&track.playlist_location),
                location: track.playlist_location.clone(),
                name: format!("{} :: {}", track.album_artist, track.album),
                tracks: Vec::new(),
            })
            .tracks
            .push(track.clone());
    }

    // TODO: order by track number once every strategy fills it in reliably.
    for playlist in playlists.values_mut() {
        playlist.tracks.sort_by(|a, b| a.location.cmp(&b.location));
    }
    playlists
}

/// Playlists ordered by name, then location for equal names.
pub fn sorted_playlists(playlists: impl IntoIterator<Item = Playlist>) -> Vec<Playlist> {
    let mut playlists: Vec<Playlist> = playlists.into_iter().collect();
    playlists.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.location.cmp(&b.location)));
    playlists
}
