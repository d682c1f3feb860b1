//! Filename hints from the URL path.

/// Extracts the last path segment from a URL for use as a filename hint.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// Known media extensions, in the order they are looked for in a URL.
pub const MEDIA_EXTENSIONS: &[&str] = &[".mp4", ".avi", ".mov", ".wmv", ".mkv", ".flv", ".webm", ".m4v"];

/// Extension used when nothing better can be guessed.
pub const DEFAULT_EXTENSION: &str = ".mp4";

/// Guesses a media extension from anywhere in the URL (path or query),
/// falling back to `DEFAULT_EXTENSION`.
pub fn guess_extension(url: &str) -> &'static str {
    let lower = url.to_lowercase();
    MEDIA_EXTENSIONS
        .iter()
        .find(|ext| lower.contains(*ext))
        .copied()
        .unwrap_or(DEFAULT_EXTENSION)
}

/// True when `name` already ends in a known media extension.
pub fn has_media_extension(name: &str) -> bool {
    let lower = name.to_lowercase();
    MEDIA_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
