//! One imported file plus the resolver that plays its entries.

use anyhow::{bail, Context, Result};
use csvplay_core::catalog;
use csvplay_core::config::PlayerConfig;
use csvplay_core::loader::{self, LoadedTable};
use csvplay_core::record::Record;
use csvplay_core::resolver::MediaResolver;
use std::path::Path;

pub struct Session {
    pub table: LoadedTable,
    pub resolver: MediaResolver,
}

impl Session {
    /// Imports `file` and marks entries that are already cached.
    pub fn open(cfg: &PlayerConfig, file: &Path) -> Result<Self> {
        let mut table = loader::load_records(file, &cfg.encodings)
            .with_context(|| format!("import {}", file.display()))?;
        if !table.has_url_column() {
            eprintln!(
                "warning: no link column found in {}; entries cannot be played",
                file.display()
            );
        }
        let resolver = MediaResolver::from_config(cfg);
        let cached = resolver.sync_cached(&mut table.records);
        tracing::debug!(
            file = %file.display(),
            entries = table.records.len(),
            cached,
            "session opened"
        );
        Ok(Self { table, resolver })
    }

    /// Position in `table.records` of the 1-based entry number shown by `list`.
    pub fn position(&self, index: usize) -> Result<usize> {
        match index
            .checked_sub(1)
            .and_then(|id| catalog::position_of(&self.table.records, id))
        {
            Some(pos) => Ok(pos),
            None => bail!(
                "no entry #{index} (file has {} entries)",
                self.table.records.len()
            ),
        }
    }

    pub fn record(&self, index: usize) -> Result<&Record> {
        let pos = self.position(index)?;
        Ok(&self.table.records[pos])
    }
}

/// Entry number as displayed to the user.
pub fn entry_number(record: &Record) -> usize {
    record.id + 1
}
