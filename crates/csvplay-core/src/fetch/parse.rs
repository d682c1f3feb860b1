//! Response header tracking for a streaming GET.

/// Headers of the current response. Reset on every status line so that after
/// redirects only the final response is described.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResponseHead {
    pub status: Option<u32>,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
}

impl ResponseHead {
    /// Feeds one raw header line as delivered by libcurl's header callback.
    pub(crate) fn feed(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if line.starts_with("HTTP/") {
            *self = ResponseHead {
                status: line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|code| code.parse().ok()),
                ..Default::default()
            };
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-type") {
                self.content_type = Some(value.to_ascii_lowercase());
            }
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    self.content_length = Some(n);
                }
            }
        }
    }

    /// True for a declared markup content type (a web page rather than media).
    pub(crate) fn is_markup(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("text/html") || ct.contains("application/xhtml"))
    }

    /// True when the status is known and not 2xx.
    pub(crate) fn is_error_status(&self) -> bool {
        self.status.is_some_and(|code| !(200..300).contains(&code))
    }
}
