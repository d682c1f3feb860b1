//! `csvplay list <file>` – table of entries.

use anyhow::Result;
use csvplay_core::catalog::{self, SortKey};
use csvplay_core::config::PlayerConfig;
use std::path::Path;

use crate::cli::session::{entry_number, Session};

/// Display width of the title column.
const TITLE_WIDTH: usize = 28;

pub fn run_list(
    cfg: &PlayerConfig,
    file: &Path,
    search: Option<&str>,
    sort: Option<SortKey>,
) -> Result<()> {
    let mut session = Session::open(cfg, file)?;
    let records = &mut session.table.records;
    if let Some(key) = sort {
        catalog::sort_by(records, key);
    }
    let shown = catalog::filter(records, search.unwrap_or(""));
    if shown.is_empty() {
        println!("No matching entries.");
        return Ok(());
    }

    println!(
        "{:<5} {:<28} {:<12} {:<12} {:<12} {:<16} {}",
        "#", "TITLE", "PARTICIPANT", "CATEGORY", "INSTRUCTOR", "ORGANIZATION", "STATUS"
    );
    for i in &shown {
        let r = &records[*i];
        println!(
            "{:<5} {:<28} {:<12} {:<12} {:<12} {:<16} {}",
            entry_number(r),
            clip(&r.title, TITLE_WIDTH),
            clip(&r.participant, 12),
            clip(&r.category, 12),
            clip(&r.instructor, 12),
            clip(&r.organization, 16),
            r.status
        );
    }
    if shown.len() != records.len() {
        println!("{} of {} entries", shown.len(), records.len());
    }
    Ok(())
}

fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::clip;

    #[test]
    fn clip_keeps_short_text() {
        assert_eq!(clip("春天", 5), "春天");
    }

    #[test]
    fn clip_marks_cut_text() {
        assert_eq!(clip("abcdefgh", 5), "abcd…");
    }
}
