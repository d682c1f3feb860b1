//! `csvplay play` and `csvplay open` – launch an entry.

use anyhow::{bail, Result};
use csvplay_core::catalog;
use csvplay_core::config::{PlayMode, PlayerConfig};
use csvplay_core::resolver::{Intent, Resolution};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use super::{describe, progress_line};
use crate::cli::session::Session;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

pub fn run_play(
    cfg: &PlayerConfig,
    file: &Path,
    index: Option<usize>,
    search: Option<&str>,
    mode: PlayMode,
) -> Result<()> {
    let mut session = Session::open(cfg, file)?;
    let pos = match (index, search) {
        (Some(index), _) => session.position(index)?,
        (None, Some(query)) => match catalog::first_match(&session.table.records, query) {
            Some(pos) => pos,
            None => bail!("no entry matches \"{query}\""),
        },
        (None, None) => bail!("give an entry number or --search TEXT"),
    };

    let record = &mut session.table.records[pos];
    let resolution = match mode {
        PlayMode::Browser => session.resolver.open_in_browser(record),
        PlayMode::Download => {
            let mut last_print = Instant::now();
            let resolution = session.resolver.resolve_with(record, Intent::Play, &mut |p| {
                if last_print.elapsed() >= PROGRESS_INTERVAL {
                    print!("\r  {}  ", progress_line(&p));
                    let _ = std::io::stdout().flush();
                    last_print = Instant::now();
                }
            });
            println!();
            resolution
        }
    };
    report(&record.title, resolution)
}

pub fn run_open(cfg: &PlayerConfig, file: &Path, index: usize) -> Result<()> {
    let session = Session::open(cfg, file)?;
    let record = session.record(index)?;
    report(&record.title, session.resolver.open_in_browser(record))
}

fn report(title: &str, resolution: Resolution) -> Result<()> {
    let line = describe(title, &resolution);
    match resolution {
        Resolution::Failed {
            browser_fallback: false,
            ..
        } => bail!(line),
        _ => {
            println!("{line}");
            Ok(())
        }
    }
}
