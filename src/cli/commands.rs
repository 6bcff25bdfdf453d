use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "media-catalog")]
#[command(version)]
#[command(about = "Index music storage into tracks and playlists, and serve track data by range", long_about = None)]
pub struct Cli {
    /// Settings file (default: $XDG_CONFIG_HOME/media-catalog/config.toml)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Extra music directory to index; may be repeated
    #[arg(short = 'd', long = "dir", global = true)]
    pub dirs: Vec<PathBuf>,

    /// Filename pattern with named groups for the --dir storages; may be repeated
    #[arg(short = 'p', long = "pattern", global = true)]
    pub patterns: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every track
    Tracks,

    /// List playlists and their tracks
    Playlists,

    /// Export the catalog as CSV
    Export {
        /// Output CSV file path
        #[arg(short = 'o', long)]
        output: PathBuf,
    },

    /// Stream a track's data
    Read {
        /// Track ID
        id: String,

        /// HTTP Range header value, e.g. "bytes=0-1023"
        #[arg(short = 'r', long)]
        range: Option<String>,

        /// Write to this file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_read_with_range() {
        let cli = Cli::parse_from([
            "media-catalog",
            "--dir",
            "/music",
            "read",
            "abc",
            "--range",
            "bytes=0-9",
        ]);
        assert_eq!(cli.dirs, vec![PathBuf::from("/music")]);
        match cli.command {
            Commands::Read { id, range, output } => {
                assert_eq!(id, "abc");
                assert_eq!(range.as_deref(), Some("bytes=0-9"));
                assert!(output.is_none());
            }
            _ => panic!("expected read"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["media-catalog", "tracks", "-d", "/a", "-d", "/b", "-p", "^(?P<title>.+)$"]);
        assert_eq!(cli.dirs.len(), 2);
        assert_eq!(cli.patterns, vec!["^(?P<title>.+)$".to_string()]);
        assert!(matches!(cli.command, Commands::Tracks));
    }
}
