//! Streaming-platform detection.
//!
//! Links on these hosts are pages with embedded players, not media files, so
//! they are always opened in the browser and never downloaded.

/// Domain list matched against URL hosts (exact host or any subdomain).
#[derive(Debug, Clone)]
pub struct PlatformList {
    domains: Vec<String>,
}

impl PlatformList {
    pub fn default_domains() -> &'static [&'static str] {
        &[
            "bilibili.com",
            "b23.tv",
            "youtube.com",
            "youtu.be",
            "youku.com",
            "iqiyi.com",
            "v.qq.com",
            "weibo.com",
            "douyin.com",
        ]
    }

    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.into().trim().trim_start_matches('.').to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// True when the URL's host is one of the domains or a subdomain of one.
    /// Unparseable URLs never match.
    pub fn matches(&self, url: &str) -> bool {
        let host = match url::Url::parse(url.trim()) {
            Ok(u) => match u.host_str() {
                Some(h) => h.to_lowercase(),
                None => return false,
            },
            Err(_) => return false,
        };
        self.domains.iter().any(|d| {
            host == *d
                || host
                    .strip_suffix(d.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

impl Default for PlatformList {
    fn default() -> Self {
        Self::new(Self::default_domains().iter().copied())
    }
}
