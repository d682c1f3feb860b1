//! Direct media download into the cache directory.
//!
//! Uses the curl crate (libcurl) for a single streaming GET. The body goes to
//! a temp file in the cache dir; it is renamed to its final name only after
//! the status, content-type and size checks pass, and is deleted otherwise.

mod parse;

use crate::error::FetchError;
use crate::url_model::cache_filename;
use parse::ResponseHead;
use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str;
use std::time::Duration;

const PARTIAL_PREFIX: &str = ".fetch-";
const PARTIAL_SUFFIX: &str = ".part";

/// Knobs for a download, usually built from `PlayerConfig::fetch_settings`.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub cache_dir: PathBuf,
    /// Smaller downloads are treated as error pages and deleted.
    pub min_file_bytes: u64,
    pub connect_timeout: Duration,
    /// Abort when no data arrives for this long.
    pub stall_timeout: Duration,
    pub max_title_chars: usize,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        crate::config::PlayerConfig::default().fetch_settings()
    }
}

/// Bytes received so far and the declared total, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchProgress {
    pub received: u64,
    pub total: Option<u64>,
}

impl FetchProgress {
    /// Fraction complete in [0.0, 1.0]; `None` without a declared length.
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(0) => Some(1.0),
            Some(total) => Some((self.received as f64 / total as f64).min(1.0)),
            None => None,
        }
    }
}

/// A completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// Absolute path of the cache file.
    pub path: PathBuf,
    pub bytes: u64,
}

/// Downloads `url` into `settings.cache_dir` under a name derived from `title`.
///
/// Runs in the current thread; `FetchQueue` is the way to call it off the
/// interactive thread. Re-fetching the same URL and title overwrites the same path.
pub fn download_to_cache(
    url: &str,
    title: &str,
    settings: &FetchSettings,
    on_progress: &mut dyn FnMut(FetchProgress),
) -> Result<Fetched, FetchError> {
    let file_name = cache_filename(url, title, settings.max_title_chars);
    download_as(url, &file_name, settings, on_progress)
}

/// Downloads `url` into `settings.cache_dir` as `file_name`, replacing any
/// file of that name once the response passes every check.
pub fn download_as(
    url: &str,
    file_name: &str,
    settings: &FetchSettings,
    on_progress: &mut dyn FnMut(FetchProgress),
) -> Result<Fetched, FetchError> {
    url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

    fs::create_dir_all(&settings.cache_dir)?;
    let final_path = absolute(settings.cache_dir.join(file_name));
    let mut tmp = tempfile::Builder::new()
        .prefix(PARTIAL_PREFIX)
        .suffix(PARTIAL_SUFFIX)
        .tempfile_in(&settings.cache_dir)?;

    tracing::debug!(url, dest = %final_path.display(), "starting download");

    let head = RefCell::new(ResponseHead::default());
    let mut received = 0u64;
    let mut write_error: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(settings.connect_timeout)?;
    easy.low_speed_limit(1)?;
    easy.low_speed_time(settings.stall_timeout)?;
    easy.useragent(&settings.user_agent)?;
    let mut list = curl::easy::List::new();
    list.append(&format!("Referer: {url}"))?;
    easy.http_headers(list)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(line) = str::from_utf8(data) {
                head.borrow_mut().feed(line);
            }
            true
        })?;
        transfer.write_function(|data| {
            let total = {
                let h = head.borrow();
                if h.is_markup() || h.is_error_status() {
                    return Ok(0); // abort transfer
                }
                h.content_length
            };
            if let Err(e) = tmp.as_file_mut().write_all(data) {
                write_error = Some(e);
                return Ok(0);
            }
            received += data.len() as u64;
            on_progress(FetchProgress { received, total });
            Ok(data.len())
        })?;
        transfer.perform()
    };

    let head = head.into_inner();
    if head.is_markup() {
        return Err(FetchError::Markup {
            content_type: head.content_type.unwrap_or_default(),
        });
    }
    if let Some(code) = head.status.filter(|_| head.is_error_status()) {
        return Err(FetchError::Http(code));
    }
    if let Some(e) = write_error {
        return Err(FetchError::Storage(e));
    }
    performed?;

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }

    tmp.as_file().sync_all()?;
    let size = tmp.as_file().metadata()?.len();
    if size < settings.min_file_bytes {
        // Dropping the temp file deletes it.
        drop(tmp);
        tracing::warn!(url, size, "download below minimum size, discarded");
        return Err(FetchError::TooSmall {
            received: size,
            minimum: settings.min_file_bytes,
        });
    }

    tmp.persist(&final_path).map_err(|e| FetchError::Storage(e.error))?;
    tracing::info!("downloaded {} bytes to {}", size, final_path.display());
    Ok(Fetched {
        path: final_path,
        bytes: size,
    })
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}

/// In-progress (or orphaned) download temp files in `cache_dir`.
pub fn partial_files(cache_dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(cache_dir)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| {
                    e.file_name()
                        .to_str()
                        .is_some_and(|n| n.starts_with(PARTIAL_PREFIX) && n.ends_with(PARTIAL_SUFFIX))
                })
                .map(|e| e.path())
                .collect()
        })
        .unwrap_or_default()
}

/// True when `cache_dir` still holds in-progress (or orphaned) download temp files.
pub fn has_partial_files(cache_dir: &Path) -> bool {
    !partial_files(cache_dir).is_empty()
}
