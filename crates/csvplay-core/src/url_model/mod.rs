//! Cache filename derivation.
//!
//! Builds a safe local filename for a downloaded entry from its title, or from
//! the URL path when the title is empty, and makes sure it carries a media
//! extension.

mod path;
mod sanitize;

pub use path::{
    filename_from_url_path, guess_extension, has_media_extension, DEFAULT_EXTENSION,
    MEDIA_EXTENSIONS,
};
pub use sanitize::sanitize_title;

use sha2::{Digest, Sha256};

/// Derives the cache filename for `url` saved under `title`.
///
/// # Examples
///
/// - `cache_filename("https://x/v.mov", "春天", 50)` → `"春天.mov"`
/// - `cache_filename("https://x/clip.mp4", "", 50)` → `"clip.mp4"`
/// - `cache_filename("https://x/", "", 50)` → `"media_<url tag>.mp4"`
pub fn cache_filename(url: &str, title: &str, max_chars: usize) -> String {
    let mut stem = sanitize_title(title, max_chars);
    if stem.is_empty() {
        stem = filename_from_url_path(url)
            .map(|s| sanitize_title(&s, max_chars))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("media_{}", url_tag(url)));
    }

    if has_media_extension(&stem) {
        stem
    } else {
        stem + guess_extension(url)
    }
}

/// Hex digits of the URL digest used in tags.
const URL_TAG_LEN: usize = 8;

/// Short tag that is stable for a given URL: leading hex digits of its SHA-256.
pub fn url_tag(url: &str) -> String {
    let mut tag = hex::encode(Sha256::digest(url.as_bytes()));
    tag.truncate(URL_TAG_LEN);
    tag
}

/// `name` with `_<url tag>` inserted before its extension.
///
/// Used when another URL already owns `name` in the cache directory.
pub fn with_url_tag(name: &str, url: &str) -> String {
    let tag = url_tag(url);
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}_{}{}", &name[..dot], tag, &name[dot..]),
        _ => format!("{name}_{tag}"),
    }
}
