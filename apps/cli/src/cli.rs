use clap::{Args, Parser, Subcommand};
use fetchtv_core::{FilterOptions, ListMode, SaveOptions};
use std::path::PathBuf;

/// List and save recordings from a Fetch TV box on the local network
#[derive(Debug, Parser)]
#[command(name = "fetchtv", version, about)]
pub struct Cli {
    /// Address of the Fetch TV server, skips auto-discovery
    #[arg(long, global = true)]
    pub ip: Option<String>,

    /// Port of the Fetch TV server when --ip is given (normally 49152)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to <config dir>/fetchtv/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Discover the server and print its details
    Info,
    /// List the names of shows with available recordings
    Shows(FilterArgs),
    /// List recordings, or save new ones with --save
    Recordings(RecordingsArgs),
    /// List items that are currently recording (probes every matching item)
    IsRecording(FilterArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Only folders containing the text (comma separated, repeatable)
    #[arg(long = "folder", value_name = "TEXT")]
    pub folders: Vec<String>,

    /// Skip folders containing the text (comma separated, repeatable)
    #[arg(long, value_name = "TEXT")]
    pub exclude: Vec<String>,

    /// Only items whose title contains the text (comma separated, repeatable)
    #[arg(long = "title", value_name = "TEXT")]
    pub titles: Vec<String>,
}

impl FilterArgs {
    pub fn to_options(&self, mode: ListMode) -> FilterOptions {
        FilterOptions::new(mode)
            .with_folders(&self.folders)
            .with_exclude(&self.exclude)
            .with_titles(&self.titles)
    }
}

#[derive(Debug, Clone, Args)]
pub struct RecordingsArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Save new recordings under this directory
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Save again even if already saved, replacing existing files
    #[arg(long)]
    pub overwrite: bool,
}

impl RecordingsArgs {
    pub fn save_options(&self) -> Option<SaveOptions> {
        self.save
            .as_ref()
            .map(|path| SaveOptions::new(path.clone(), self.overwrite))
    }
}
