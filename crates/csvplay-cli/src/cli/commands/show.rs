//! `csvplay show <file> <index>` – details of one entry.

use anyhow::Result;
use csvplay_core::catalog;
use csvplay_core::config::PlayerConfig;
use std::path::Path;

use crate::cli::session::{entry_number, Session};

pub fn run_show(cfg: &PlayerConfig, file: &Path, index: usize) -> Result<()> {
    let session = Session::open(cfg, file)?;
    let r = session.record(index)?;
    println!("Entry #{}", entry_number(r));
    println!("{}", catalog::details(r));
    Ok(())
}
