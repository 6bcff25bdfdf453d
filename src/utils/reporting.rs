use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::catalog::Catalog;
use crate::Result;

pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    pub fn generate_catalog_report(&self, catalog: &Catalog, output_path: impl AsRef<Path>) -> Result<()> {
        let output_path_ref = output_path.as_ref();
        self.write_catalog(catalog, Writer::from_path(output_path_ref)?)?;
        println!("Catalog exported: {}", output_path_ref.display());
        Ok(())
    }

    /// One row per track, grouped by playlist in name order.
    pub fn write_catalog<W: Write>(&self, catalog: &Catalog, mut writer: Writer<W>) -> Result<()> {
        writer.write_record([
            "Playlist",
            "Track ID",
            "Name",
            "Artist",
            "Album",
            "Album Artist",
            "MIME Type",
            "Length (bytes)",
            "Location",
        ])?;

        for playlist in catalog.playlists() {
            for track in &playlist.tracks {
                writer.write_record([
                    playlist.name.as_str(),
                    track.id.as_str(),
                    track.name.as_str(),
                    track.artist.as_str(),
                    track.album.as_str(),
                    track.album_artist.as_str(),
                    track.mime_type.as_str(),
                    track.data_len.to_string().as_str(),
                    track.location.as_str(),
                ])?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}
