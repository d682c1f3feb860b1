//! `csvplay download` – fill the cache through the background queue.

use anyhow::{bail, Result};
use csvplay_core::config::PlayerConfig;
use csvplay_core::queue::{FetchEvent, FetchQueue};
use csvplay_core::resolver::{Intent, Step};
use std::path::Path;
use std::time::Duration;

use super::{describe, progress_line};
use crate::cli::session::{entry_number, Session};

const TICK: Duration = Duration::from_millis(200);

pub fn run_download(cfg: &PlayerConfig, file: &Path, indices: &[usize], all: bool) -> Result<()> {
    let mut session = Session::open(cfg, file)?;
    let positions: Vec<usize> = if all {
        session
            .table
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.url().is_some())
            .map(|(i, _)| i)
            .collect()
    } else if indices.is_empty() {
        bail!("give entry numbers or --all");
    } else {
        indices
            .iter()
            .map(|i| session.position(*i))
            .collect::<Result<_>>()?
    };

    let settings = session.resolver.settings().clone();
    let mut queue = FetchQueue::new();
    let mut failed = 0usize;
    for pos in positions {
        let record = &mut session.table.records[pos];
        match session.resolver.begin(record, Intent::DownloadOnly) {
            Step::Finished(resolution) => {
                failed += usize::from(resolution.is_failed());
                println!("[{}] {}", entry_number(record), describe(&record.title, &resolution));
            }
            Step::Download(job) => {
                println!("[{}] {}: downloading", entry_number(record), record.title);
                queue.submit(job, settings.clone());
            }
        }
    }

    while !queue.is_idle() {
        let ev = match queue.wait_next(TICK) {
            Some(ev) => ev,
            None => continue,
        };
        match ev {
            FetchEvent::Progress {
                record_id,
                progress,
            } => println!("[{}] {}", record_id + 1, progress_line(&progress)),
            FetchEvent::Finished { job, result } => {
                let resolution =
                    session
                        .resolver
                        .complete_in(&mut session.table.records, &job, result);
                failed += usize::from(resolution.is_failed());
                println!("[{}] {}", job.record_id + 1, describe(&job.title, &resolution));
            }
        }
    }

    if failed > 0 {
        bail!("{failed} download(s) failed");
    }
    Ok(())
}
