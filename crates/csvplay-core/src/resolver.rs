//! Media resolution: decides how an entry's link gets played.
//!
//! `unresolved → (browser-opened | cached | failed)`, terminal on each. Platform
//! links short-circuit to the browser, cached URLs are reused without touching
//! the network, everything else is downloaded. Failures are logged and turned
//! into a `Resolution`; nothing here returns an error to the caller.

use crate::cache::CacheTable;
use crate::config::PlayerConfig;
use crate::error::FetchError;
use crate::fetch::{self, FetchProgress, FetchSettings, Fetched};
use crate::launcher::{Launcher, SystemLauncher};
use crate::platform::PlatformList;
use crate::record::Record;
use crate::url_model::{cache_filename, with_url_tag};
use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Play: download if needed, then open in the default player; browser on failure.
    Play,
    /// Only put the file in the cache; no player, no browser fallback.
    DownloadOnly,
}

/// Terminal outcome of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    BrowserOpened,
    Cached {
        path: PathBuf,
        /// Whether the default player was started.
        launched: bool,
    },
    Failed {
        reason: String,
        /// Whether the link was opened in the browser instead.
        browser_fallback: bool,
    },
}

impl Resolution {
    pub fn is_failed(&self) -> bool {
        matches!(self, Resolution::Failed { .. })
    }
}

/// One download to run, possibly on another thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchJob {
    pub record_id: usize,
    pub url: String,
    pub title: String,
    /// Cache file name chosen on the owner thread; never shared with another URL.
    pub file_name: String,
    pub intent: Intent,
}

impl FetchJob {
    /// Runs the download in the current thread.
    pub fn run(
        &self,
        settings: &FetchSettings,
        on_progress: &mut dyn FnMut(FetchProgress),
    ) -> Result<Fetched, FetchError> {
        fetch::download_as(&self.url, &self.file_name, settings, on_progress)
    }
}

/// Decision for a record, before anything is launched or fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    NoLink,
    Browser,
    UseCache(PathBuf),
    Download(FetchJob),
}

/// Result of `begin`: either already finished or a download to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Finished(Resolution),
    Download(FetchJob),
}

pub struct MediaResolver<L: Launcher = SystemLauncher> {
    cache: CacheTable,
    platforms: PlatformList,
    settings: FetchSettings,
    launcher: L,
    /// File names handed to jobs that have not completed yet, with their URL.
    pending: HashMap<String, String>,
}

impl MediaResolver<SystemLauncher> {
    /// Resolver with the desktop launcher, cache and limits taken from `cfg`.
    pub fn from_config(cfg: &PlayerConfig) -> Self {
        let settings = cfg.fetch_settings();
        let cache = CacheTable::open(&settings.cache_dir);
        MediaResolver::new(cache, cfg.platforms(), settings, SystemLauncher)
    }
}

impl<L: Launcher> MediaResolver<L> {
    pub fn new(cache: CacheTable, platforms: PlatformList, settings: FetchSettings, launcher: L) -> Self {
        Self {
            cache,
            platforms,
            settings,
            launcher,
            pending: HashMap::new(),
        }
    }

    pub fn cache(&self) -> &CacheTable {
        &self.cache
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Marks freshly imported records whose link already has a cached file.
    /// Returns how many were marked.
    pub fn sync_cached(&self, records: &mut [Record]) -> usize {
        let mut marked = 0;
        for r in records.iter_mut() {
            let cached = r.url().and_then(|u| self.cache.lookup(u)).map(Path::to_path_buf);
            if let Some(path) = cached {
                r.mark_cached(path);
                marked += 1;
            }
        }
        marked
    }

    /// Decides what to do with `record`. Platform links win over everything,
    /// then cached files, then a direct download.
    pub fn plan(&self, record: &Record, intent: Intent) -> Plan {
        let url = match record.url() {
            Some(u) => u,
            None => return Plan::NoLink,
        };
        if self.platforms.matches(url) {
            return Plan::Browser;
        }
        if let Some(path) = self.cache.lookup(url) {
            return Plan::UseCache(path.to_path_buf());
        }
        Plan::Download(FetchJob {
            record_id: record.id,
            url: url.to_string(),
            title: record.title.clone(),
            file_name: self.file_name_for(url, &record.title),
            intent,
        })
    }

    /// Cache file name for `url`. Same URL, same name; when another URL already
    /// owns the title-derived name, a tag derived from this URL is added.
    fn file_name_for(&self, url: &str, title: &str) -> String {
        let name = cache_filename(url, title, self.settings.max_title_chars);
        let taken = self.cache.owner_of(&name).is_some_and(|owner| owner != url)
            || self.pending.get(&name).is_some_and(|owner| owner != url);
        if taken {
            let tagged = with_url_tag(&name, url);
            tracing::debug!(url, name = %name, tagged = %tagged, "cache name taken by another link");
            tagged
        } else {
            name
        }
    }

    /// Carries out every plan that needs no download; hands back the job otherwise.
    pub fn begin(&mut self, record: &mut Record, intent: Intent) -> Step {
        match self.plan(record, intent) {
            Plan::NoLink => {
                tracing::debug!(title = %record.title, "entry has no media link");
                Step::Finished(Resolution::Failed {
                    reason: "entry has no media link".to_string(),
                    browser_fallback: false,
                })
            }
            Plan::Browser => {
                let url = record.url().unwrap_or_default().to_string();
                if intent == Intent::DownloadOnly {
                    tracing::debug!(url = %url, "streaming platform link, not downloaded");
                    return Step::Finished(Resolution::Failed {
                        reason: "streaming platform link; open it in the browser".to_string(),
                        browser_fallback: false,
                    });
                }
                tracing::debug!(url = %url, "streaming platform link, opening in browser");
                Step::Finished(self.browse(&url))
            }
            Plan::UseCache(path) => {
                tracing::info!("using cached file for {}: {}", record.title, path.display());
                record.mark_cached(path.clone());
                Step::Finished(self.finish_cached(path, intent))
            }
            Plan::Download(job) => {
                self.pending.insert(job.file_name.clone(), job.url.clone());
                Step::Download(job)
            }
        }
    }

    /// Applies a finished download to the cache table and the record.
    pub fn complete(
        &mut self,
        record: &mut Record,
        job: &FetchJob,
        result: Result<Fetched, FetchError>,
    ) -> Resolution {
        if self.pending.get(&job.file_name) == Some(&job.url) {
            self.pending.remove(&job.file_name);
        }
        match result {
            Ok(fetched) => {
                self.cache.insert(&job.url, fetched.path.clone());
                if let Err(e) = self.cache.save() {
                    tracing::warn!("could not persist cache table: {:#}", e);
                }
                record.mark_cached(fetched.path.clone());
                self.finish_cached(fetched.path, job.intent)
            }
            Err(e) => {
                tracing::warn!("download failed for {}: {}", job.title, e);
                let reason = e.to_string();
                match job.intent {
                    Intent::Play => {
                        let browser_fallback = self.launcher.open_url(&job.url).map_or_else(
                            |le| {
                                tracing::warn!("browser fallback failed for {}: {}", job.url, le);
                                false
                            },
                            |_| true,
                        );
                        Resolution::Failed {
                            reason,
                            browser_fallback,
                        }
                    }
                    Intent::DownloadOnly => Resolution::Failed {
                        reason,
                        browser_fallback: false,
                    },
                }
            }
        }
    }

    /// `complete` for the record with `job.record_id` in `records`. The cache
    /// is still updated if that record is gone.
    pub fn complete_in(
        &mut self,
        records: &mut [Record],
        job: &FetchJob,
        result: Result<Fetched, FetchError>,
    ) -> Resolution {
        match records.iter_mut().find(|r| r.id == job.record_id) {
            Some(record) => self.complete(record, job, result),
            None => {
                let mut detached = Record::new(job.record_id, job.title.clone(), Some(job.url.clone()));
                self.complete(&mut detached, job, result)
            }
        }
    }

    /// Resolves `record` for playback, downloading in the current thread if needed.
    pub fn resolve(&mut self, record: &mut Record) -> Resolution {
        self.resolve_with(record, Intent::Play, &mut |_| {})
    }

    /// Like `resolve` but with an explicit intent and a progress sink.
    pub fn resolve_with(
        &mut self,
        record: &mut Record,
        intent: Intent,
        on_progress: &mut dyn FnMut(FetchProgress),
    ) -> Resolution {
        match self.begin(record, intent) {
            Step::Finished(resolution) => resolution,
            Step::Download(job) => {
                let result = job.run(&self.settings, on_progress);
                self.complete(record, &job, result)
            }
        }
    }

    /// Opens the record's link in the browser, whatever the platform.
    pub fn open_in_browser(&self, record: &Record) -> Resolution {
        match record.url() {
            Some(url) => self.browse(url),
            None => Resolution::Failed {
                reason: "entry has no media link".to_string(),
                browser_fallback: false,
            },
        }
    }

    /// Shows the record's cached file in the file manager.
    pub fn reveal(&self, record: &Record) -> Result<()> {
        let path = record
            .url()
            .and_then(|u| self.cache.lookup(u))
            .or_else(|| record.cache_path().filter(|p| p.is_file()))
            .ok_or_else(|| anyhow::anyhow!("\"{}\" is not downloaded", record.title))?;
        self.launcher.reveal(path)?;
        Ok(())
    }

    /// Opens the cache directory in the file manager, creating it first.
    pub fn open_cache_dir(&self) -> Result<()> {
        std::fs::create_dir_all(self.cache.dir())?;
        self.launcher.open_dir(self.cache.dir())?;
        Ok(())
    }

    /// Empties the cache and reverts cached records to linked.
    pub fn clear_cache(&mut self, records: &mut [Record]) -> Result<()> {
        self.cache.clear()?;
        for r in records.iter_mut() {
            r.forget_cache();
        }
        Ok(())
    }

    fn browse(&self, url: &str) -> Resolution {
        match self.launcher.open_url(url) {
            Ok(()) => Resolution::BrowserOpened,
            Err(e) => {
                tracing::warn!("could not open browser for {}: {}", url, e);
                Resolution::Failed {
                    reason: format!("could not open browser: {e}"),
                    browser_fallback: false,
                }
            }
        }
    }

    fn finish_cached(&self, path: PathBuf, intent: Intent) -> Resolution {
        let launched = match intent {
            Intent::Play => match self.launcher.open_file(&path) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("could not start player for {}: {}", path.display(), e);
                    false
                }
            },
            Intent::DownloadOnly => false,
        };
        Resolution::Cached { path, launched }
    }
}
