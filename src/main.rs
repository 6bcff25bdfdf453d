use std::fs::File;
use std::io::{self, Write};
use std::process;

use clap::Parser;
use log::info;
use media_catalog::cli::commands::{Cli, Commands};
use media_catalog::config::{Settings, StorageSettings};
use media_catalog::storage::registry::StorageRegistry;
use media_catalog::utils::http_range::{cache_control, open_range, parse_range_header, ServedRange};
use media_catalog::utils::reporting::Reporter;
use media_catalog::{Catalog, Result};

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load_from(cli.config.as_deref())?;
    settings.validate()?;
    for dir in &cli.dirs {
        settings
            .storage
            .push(StorageSettings::disk(dir.to_string_lossy(), cli.patterns.clone()));
    }

    let catalog = Catalog::from_settings(&settings, &StorageRegistry::new())?;

    match cli.command {
        Commands::Tracks => {
            let tracks = catalog.tracks();
            for track in &tracks {
                println!("{}  {:<18} {:>10}  {}", track.id, track.mime_type.as_str(), track.data_len, track.name);
            }
            println!("\n{} tracks", tracks.len());
        }

        Commands::Playlists => {
            let playlists = catalog.playlists();
            for playlist in &playlists {
                println!("{}  {} ({} tracks)", playlist.id, playlist.name, playlist.tracks.len());
                for track in &playlist.tracks {
                    println!("    {}  {}", track.id, track.name);
                }
            }
            println!("\n{} playlists", playlists.len());
        }

        Commands::Export { output } => {
            Reporter::new().generate_catalog_report(&catalog, &output)?;
        }

        Commands::Read { id, range, output } => {
            let track = catalog.get_track(&id)?;
            let ranges = match range.as_deref() {
                Some(value) => parse_range_header(value, track.data_len)?,
                None => Vec::new(),
            };

            let reader = catalog.read_track(&id)?;
            let mut out: Box<dyn Write> = match &output {
                Some(path) => Box::new(File::create(path)?),
                None => Box::new(io::stdout().lock()),
            };

            info!("Content-Type: {}", track.mime_type);
            info!("Accept-Ranges: bytes");
            info!("Cache-Control: {}", cache_control(settings.cache_max_age));

            let copied = match ServedRange::first(&ranges, track.data_len, settings.max_range_chunk) {
                Some(served) => {
                    info!("206 Partial Content");
                    info!("Content-Range: {}", served.content_range());
                    info!("Content-Length: {}", served.length);
                    io::copy(&mut open_range(reader, &served), &mut out)?
                }
                None => {
                    info!("200 OK");
                    let mut reader = reader;
                    io::copy(&mut reader, &mut out)?
                }
            };
            out.flush()?;
            info!("Sent {} bytes of {}", copied, track.location);
        }
    }

    Ok(())
}
