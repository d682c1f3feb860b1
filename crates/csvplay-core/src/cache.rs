//! URL → local file cache table.
//!
//! A flat JSON object (`cache_info.json`) in the cache directory. Entries are
//! added after successful downloads and never expire; `clear` deletes the
//! mapped files and leaves anything else in the directory alone. The table is
//! owned by the resolver and only touched from the consuming thread.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the persisted table inside the cache directory.
pub const CACHE_INFO_FILE: &str = "cache_info.json";

#[derive(Debug, Clone)]
pub struct CacheTable {
    dir: PathBuf,
    entries: BTreeMap<String, PathBuf>,
}

impl CacheTable {
    /// Opens the table in `dir`. A missing file gives an empty table; an unreadable
    /// or corrupt one is logged and also gives an empty table.
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(CACHE_INFO_FILE);
        let entries = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!("ignoring corrupt cache table {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("could not read cache table {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        tracing::debug!(dir = %dir.display(), entries = entries.len(), "cache table opened");
        Self {
            dir: dir.to_path_buf(),
            entries,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn info_path(&self) -> PathBuf {
        self.dir.join(CACHE_INFO_FILE)
    }

    /// Cached path for `url`, only if the file is still on disk.
    pub fn lookup(&self, url: &str) -> Option<&Path> {
        self.entries
            .get(url)
            .map(PathBuf::as_path)
            .filter(|p| p.is_file())
    }

    /// URL whose entry points at a file named `file_name`, if any. Missing
    /// files still count; the mapping alone reserves the name.
    pub fn owner_of(&self, file_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, p)| p.file_name().is_some_and(|n| n == file_name))
            .map(|(u, _)| u.as_str())
    }

    /// Records a mapping in memory; call `save` to persist it.
    pub fn insert(&mut self, url: &str, path: PathBuf) {
        self.entries.insert(url.to_string(), path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(u, p)| (u.as_str(), p.as_path()))
    }

    /// Writes the table as pretty JSON, creating the directory if needed.
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create dir: {}", self.dir.display()))?;
        let json = serde_json::to_string_pretty(&self.entries).context("serialize cache table")?;
        let path = self.info_path();
        fs::write(&path, json).with_context(|| format!("write cache table: {}", path.display()))?;
        Ok(())
    }

    /// Deletes the files the table maps, leftover download temp files and the
    /// table file. The directory itself goes only if nothing else is in it.
    pub fn clear(&mut self) -> Result<()> {
        let mut targets: Vec<PathBuf> = self.entries.values().cloned().collect();
        targets.extend(crate::fetch::partial_files(&self.dir));
        targets.push(self.info_path());
        for path in &targets {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("remove cached file: {}", path.display()))
                }
            }
        }
        self.entries.clear();
        match fs::remove_dir(&self.dir) {
            Ok(()) => tracing::info!("cache cleared, removed {}", self.dir.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::info!(
                "cache cleared; kept {} ({}), it holds other files",
                self.dir.display(),
                e
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_table_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let table = CacheTable::open(dir.path());
        assert!(table.is_empty());
    }

    #[test]
    fn save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.mp4");
        fs::write(&file, b"data").unwrap();

        let mut table = CacheTable::open(dir.path());
        table.insert("https://x/a.mp4", file.clone());
        table.save().unwrap();

        let reopened = CacheTable::open(dir.path());
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.lookup("https://x/a.mp4"), Some(file.as_path()));
    }

    #[test]
    fn table_file_is_a_flat_json_object() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = CacheTable::open(dir.path());
        table.insert("https://x/a.mp4", PathBuf::from("/c/a.mp4"));
        table.save().unwrap();
        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(table.info_path()).unwrap()).unwrap();
        assert_eq!(raw["https://x/a.mp4"], "/c/a.mp4");
    }

    #[test]
    fn lookup_ignores_vanished_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = CacheTable::open(dir.path());
        table.insert("https://x/gone.mp4", dir.path().join("gone.mp4"));
        assert!(table.lookup("https://x/gone.mp4").is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn corrupt_table_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CACHE_INFO_FILE), b"{ not json").unwrap();
        assert!(CacheTable::open(dir.path()).is_empty());
    }

    #[test]
    fn clear_removes_files_and_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("cache");
        fs::create_dir_all(&cache_dir).unwrap();
        let file = cache_dir.join("a.mp4");
        fs::write(&file, b"data").unwrap();
        fs::write(cache_dir.join(".fetch-x1.part"), b"half").unwrap();

        let mut table = CacheTable::open(&cache_dir);
        table.insert("https://x/a.mp4", file.clone());
        table.save().unwrap();
        table.clear().unwrap();

        assert!(table.is_empty());
        assert!(!file.exists());
        assert!(!cache_dir.exists());
        assert!(CacheTable::open(&cache_dir).is_empty());
    }

    #[test]
    fn clear_leaves_unrelated_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.mp4");
        let holiday = dir.path().join("holiday.mp4");
        fs::write(&file, b"data").unwrap();
        fs::write(&holiday, b"mine").unwrap();

        let mut table = CacheTable::open(dir.path());
        table.insert("https://x/a.mp4", file.clone());
        table.save().unwrap();
        table.clear().unwrap();

        assert!(!file.exists());
        assert!(!table.info_path().exists());
        assert_eq!(fs::read(&holiday).unwrap(), b"mine");
    }

    #[test]
    fn owner_of_finds_the_url_by_file_name() {
        let mut table = CacheTable::open(Path::new("/nonexistent/cache"));
        table.insert("https://x/a.mp4", PathBuf::from("/c/春天.mp4"));
        assert_eq!(table.owner_of("春天.mp4"), Some("https://x/a.mp4"));
        assert_eq!(table.owner_of("夏天.mp4"), None);
    }
}
