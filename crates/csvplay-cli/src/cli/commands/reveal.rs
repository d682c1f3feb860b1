//! `csvplay reveal <file> <index>` – show a cached file in the file manager.

use anyhow::Result;
use csvplay_core::config::PlayerConfig;
use std::path::Path;

use crate::cli::session::Session;

pub fn run_reveal(cfg: &PlayerConfig, file: &Path, index: usize) -> Result<()> {
    let session = Session::open(cfg, file)?;
    let r = session.record(index)?;
    session.resolver.reveal(r)?;
    Ok(())
}
