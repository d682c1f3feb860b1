//! Contest entry model.

use std::fmt;
use std::path::{Path, PathBuf};

/// Where an entry stands with respect to its media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResolutionStatus {
    /// No usable link in the source row.
    Unresolved,
    /// Has a link; nothing downloaded yet.
    Linked,
    /// Media file is in the local cache.
    Cached,
}

impl ResolutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStatus::Unresolved => "unresolved",
            ResolutionStatus::Linked => "linked",
            ResolutionStatus::Cached => "cached",
        }
    }
}

impl fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One imported contest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 0-based data-row index in the source file (blank rows excluded).
    pub id: usize,
    pub title: String,
    pub participant: String,
    pub category: String,
    pub instructor: String,
    pub organization: String,
    pub url: Option<String>,
    pub status: ResolutionStatus,
    pub cache_path: Option<PathBuf>,
    /// Raw `(column, value)` pairs of the source row, in source order.
    pub raw: Vec<(String, String)>,
}

impl Record {
    /// New record straight from import: `Linked` if it has a link, else `Unresolved`.
    pub fn new(id: usize, title: String, url: Option<String>) -> Self {
        let status = if url.is_some() {
            ResolutionStatus::Linked
        } else {
            ResolutionStatus::Unresolved
        };
        Self {
            id,
            title,
            participant: String::new(),
            category: String::new(),
            instructor: String::new(),
            organization: String::new(),
            url,
            status,
            cache_path: None,
            raw: Vec::new(),
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    pub fn mark_cached(&mut self, path: PathBuf) {
        self.cache_path = Some(path);
        self.status = ResolutionStatus::Cached;
    }

    /// Drops the cache association after the cache was cleared.
    pub fn forget_cache(&mut self) {
        if self.status == ResolutionStatus::Cached {
            self.status = ResolutionStatus::Linked;
        }
        self.cache_path = None;
    }
}
