//! CLI for csvplay, the contest-entry media player.

mod commands;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use csvplay_core::catalog::SortKey;
use csvplay_core::config::{self, PlayMode};
use std::path::PathBuf;

use commands::{
    run_cache, run_columns, run_download, run_list, run_open, run_play, run_reveal, run_show,
};

/// Top-level CLI for csvplay.
#[derive(Debug, Parser)]
#[command(name = "csvplay")]
#[command(about = "csvplay: browse and play media links from contest entry spreadsheets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List the entries of a file.
    List {
        /// CSV/TSV file with a header row.
        file: PathBuf,
        /// Only entries whose title, participant or organization contains this text.
        #[arg(long, short = 's', value_name = "TEXT")]
        search: Option<String>,
        /// Sort by title, participant, category, instructor, organization or status.
        #[arg(long, value_name = "KEY")]
        sort: Option<SortKey>,
    },

    /// Show every field of one entry.
    Show {
        file: PathBuf,
        /// Entry number as shown by `list`.
        index: usize,
    },

    /// Show how the file was decoded and which columns were recognized.
    Columns { file: PathBuf },

    /// Play an entry: download to the cache and open the player, or open the browser.
    Play {
        file: PathBuf,
        /// Entry number as shown by `list`.
        index: Option<usize>,
        /// Play the first entry matching this text instead of an index.
        #[arg(long, short = 's', value_name = "TEXT")]
        search: Option<String>,
        /// Override the configured play mode.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },

    /// Open an entry's link in the browser.
    Open {
        file: PathBuf,
        /// Entry number as shown by `list`.
        index: usize,
    },

    /// Download entries into the cache without playing them.
    Download {
        file: PathBuf,
        /// Entry numbers as shown by `list`.
        indices: Vec<usize>,
        /// Download every entry with a link.
        #[arg(long, conflicts_with = "indices")]
        all: bool,
    },

    /// Show an entry's cached file in the file manager.
    Reveal {
        file: PathBuf,
        /// Entry number as shown by `list`.
        index: usize,
    },

    /// Inspect or clear the media cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Print the cache directory.
    Dir,
    /// List cached URLs and their files.
    List,
    /// Open the cache directory in the file manager.
    Open,
    /// Delete every cached file.
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Browser,
    Download,
}

impl From<ModeArg> for PlayMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Browser => PlayMode::Browser,
            ModeArg::Download => PlayMode::Download,
        }
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::List { file, search, sort } => {
                run_list(&cfg, &file, search.as_deref(), sort)?
            }
            CliCommand::Show { file, index } => run_show(&cfg, &file, index)?,
            CliCommand::Columns { file } => run_columns(&cfg, &file)?,
            CliCommand::Play {
                file,
                index,
                search,
                mode,
            } => {
                let mode = mode.map(PlayMode::from).unwrap_or(cfg.play_mode);
                run_play(&cfg, &file, index, search.as_deref(), mode)?
            }
            CliCommand::Open { file, index } => run_open(&cfg, &file, index)?,
            CliCommand::Download { file, indices, all } => {
                run_download(&cfg, &file, &indices, all)?
            }
            CliCommand::Reveal { file, index } => run_reveal(&cfg, &file, index)?,
            CliCommand::Cache { action } => run_cache(&cfg, action)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
