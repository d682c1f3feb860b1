//! Error types surfaced by the loader and the fetcher.

use std::path::PathBuf;

/// Import failures. Either one aborts the import; nothing partial is returned.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {}: {reason}", path.display())]
    UnreadableFile { path: PathBuf, reason: String },

    #[error("missing required column(s): {}", fields.join(", "))]
    MissingRequiredColumn { fields: Vec<String> },
}

/// Why a direct download did not produce a cache file.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Curl(#[from] curl::Error),

    #[error("HTTP {0}")]
    Http(u32),

    /// Server answered with a web page rather than a media file.
    #[error("response is a web page ({content_type}), not a media file")]
    Markup { content_type: String },

    #[error("download too small ({received} bytes, minimum {minimum}); likely an error page")]
    TooSmall { received: u64, minimum: u64 },

    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}
