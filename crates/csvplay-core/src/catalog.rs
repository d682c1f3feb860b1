//! Search, sort and detail views over imported records.

use crate::record::Record;
use std::cmp::Ordering;
use std::fmt::Write as _;
use std::str::FromStr;

/// URLs longer than this are shortened in `details`.
pub const DETAIL_URL_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Participant,
    Category,
    Instructor,
    Organization,
    Status,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Title,
        SortKey::Participant,
        SortKey::Category,
        SortKey::Instructor,
        SortKey::Organization,
        SortKey::Status,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Participant => "participant",
            SortKey::Category => "category",
            SortKey::Instructor => "instructor",
            SortKey::Organization => "organization",
            SortKey::Status => "status",
        }
    }

    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortKey::Title => a.title.cmp(&b.title),
            SortKey::Participant => a.participant.cmp(&b.participant),
            SortKey::Category => a.category.cmp(&b.category),
            SortKey::Instructor => a.instructor.cmp(&b.instructor),
            SortKey::Organization => a.organization.cmp(&b.organization),
            SortKey::Status => a.status.cmp(&b.status),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        SortKey::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = SortKey::ALL.iter().map(SortKey::name).collect();
                format!("unknown sort key '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// Indices of records whose title, participant or organization contains
/// `query` (case-insensitive). An empty query matches everything.
pub fn filter(records: &[Record], query: &str) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| needle.is_empty() || matches(r, &needle))
        .map(|(i, _)| i)
        .collect()
}

fn matches(record: &Record, needle: &str) -> bool {
    [&record.title, &record.participant, &record.organization]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Index of the first record `filter` would return.
pub fn first_match(records: &[Record], query: &str) -> Option<usize> {
    filter(records, query).into_iter().next()
}

/// Stable ascending sort.
pub fn sort_by(records: &mut [Record], key: SortKey) {
    records.sort_by(|a, b| key.compare(a, b));
}

/// Position of the record with the given id.
pub fn position_of(records: &[Record], id: usize) -> Option<usize> {
    records.iter().position(|r| r.id == id)
}

/// Multi-line summary for a details view.
pub fn details(record: &Record) -> String {
    let mut out = String::new();
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    let _ = writeln!(out, "Title:        {}", record.title);
    let _ = writeln!(out, "Participant:  {}", or_dash(&record.participant));
    let _ = writeln!(out, "Category:     {}", or_dash(&record.category));
    let _ = writeln!(out, "Instructor:   {}", or_dash(&record.instructor));
    let _ = writeln!(out, "Organization: {}", or_dash(&record.organization));
    let _ = writeln!(
        out,
        "Link:         {}",
        record.url().map_or_else(|| "-".to_string(), shorten_url)
    );
    let _ = write!(out, "Status:       {}", record.status);
    if let Some(path) = record.cache_path() {
        let _ = write!(out, "\nCached file:  {}", path.display());
    }
    out
}

fn shorten_url(url: &str) -> String {
    if url.chars().count() > DETAIL_URL_CHARS {
        let head: String = url.chars().take(DETAIL_URL_CHARS).collect();
        format!("{head}...")
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ResolutionStatus;
    use std::path::PathBuf;

    fn rec(id: usize, title: &str, participant: &str, org: &str) -> Record {
        let mut r = Record::new(id, title.into(), Some(format!("https://x/{id}.mp4")));
        r.participant = participant.into();
        r.organization = org.into();
        r
    }

    fn sample() -> Vec<Record> {
        vec![
            rec(0, "Spring Song", "李明", "第一中学"),
            rec(1, "冬日", "Alice", "Riverside School"),
            rec(2, "秋叶", "王芳", "第一中学"),
        ]
    }

    #[test]
    fn empty_query_matches_all() {
        assert_eq!(filter(&sample(), ""), [0, 1, 2]);
        assert_eq!(filter(&sample(), "   "), [0, 1, 2]);
    }

    #[test]
    fn search_covers_title_participant_and_organization() {
        let records = sample();
        assert_eq!(filter(&records, "spring"), [0]);
        assert_eq!(filter(&records, "alice"), [1]);
        assert_eq!(filter(&records, "第一中学"), [0, 2]);
        assert!(filter(&records, "nothing").is_empty());
    }

    #[test]
    fn first_match_is_first_in_current_order() {
        let mut records = sample();
        assert_eq!(first_match(&records, "第一"), Some(0));
        sort_by(&mut records, SortKey::Participant);
        let idx = first_match(&records, "第一").unwrap();
        assert_eq!(records[idx].participant, "李明");
    }

    #[test]
    fn sort_is_stable() {
        let mut records = sample();
        sort_by(&mut records, SortKey::Organization);
        let ids: Vec<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, [1, 0, 2]);
        assert_eq!(position_of(&records, 2), Some(2));
    }

    #[test]
    fn sort_by_status_puts_cached_last() {
        let mut records = sample();
        records[0].mark_cached(PathBuf::from("/c/a.mp4"));
        records[1].url = None;
        records[1].status = ResolutionStatus::Unresolved;
        sort_by(&mut records, SortKey::Status);
        let ids: Vec<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, [1, 2, 0]);
    }

    #[test]
    fn sort_key_parses_case_insensitively() {
        assert_eq!("Status".parse::<SortKey>(), Ok(SortKey::Status));
        assert!("size".parse::<SortKey>().unwrap_err().contains("title"));
    }

    #[test]
    fn details_shortens_long_links() {
        let mut r = rec(0, "春天", "", "");
        r.url = Some(format!("https://cdn.example.com/{}", "a".repeat(80)));
        let text = details(&r);
        let link = text.lines().find(|l| l.starts_with("Link:")).unwrap();
        assert!(link.ends_with("..."));
        assert_eq!(link.trim_start_matches("Link:").trim().chars().count(), 53);
        assert!(text.contains("Participant:  -"));
        assert!(!text.contains("Cached file"));
    }

    #[test]
    fn details_shows_cache_path() {
        let mut r = rec(0, "春天", "李明", "");
        r.mark_cached(PathBuf::from("/c/春天.mp4"));
        let text = details(&r);
        assert!(text.contains("Status:       cached"));
        assert!(text.contains("Cached file:  /c/春天.mp4"));
    }
}
