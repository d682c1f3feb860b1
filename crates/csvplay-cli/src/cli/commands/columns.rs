//! `csvplay columns <file>` – decoding and column mapping report.

use anyhow::{Context, Result};
use csvplay_core::config::PlayerConfig;
use csvplay_core::loader::{self, describe_delimiter, Field, LoadedTable};
use std::path::Path;

pub fn run_columns(cfg: &PlayerConfig, file: &Path) -> Result<()> {
    let table = loader::load_records(file, &cfg.encodings)
        .with_context(|| format!("import {}", file.display()))?;

    println!("File:      {}", table.source.display());
    println!("Encoding:  {}", table.encoding);
    println!("Delimiter: {}", describe_delimiter(table.delimiter));
    println!("Entries:   {}", table.records.len());
    println!();
    for line in mapping_report(&table) {
        println!("{line}");
    }
    if !table.has_url_column() {
        println!();
        println!("warning: no link column found; entries cannot be played");
    }
    Ok(())
}

fn field_of(table: &LoadedTable, idx: usize) -> Option<Field> {
    if table.mapping.url_columns().contains(&idx) {
        return Some(Field::MediaUrl);
    }
    Field::ASSIGNMENT_ORDER
        .into_iter()
        .find(|f| *f != Field::MediaUrl && table.mapping.column_for(*f) == Some(idx))
}

/// Column table followed by the recognized/ignored summary.
fn mapping_report(table: &LoadedTable) -> Vec<String> {
    let mut lines = vec![format!("{:<24} {}", "COLUMN", "FIELD")];
    for (idx, name) in table.columns.iter().enumerate() {
        let field = field_of(table, idx);
        lines.push(format!("{:<24} {}", name, field.map_or("-", |f| f.name())));
    }
    let recognized = table.recognized_columns();
    let ignored = table.columns.len().saturating_sub(recognized.len());
    lines.push(String::new());
    if recognized.is_empty() {
        lines.push("Recognized: none".to_string());
    } else {
        lines.push(format!("Recognized: {}", recognized.join(", ")));
    }
    lines.push(format!("Ignored:    {ignored}"));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvplay_core::loader::ColumnMap;
    use std::path::PathBuf;

    fn table(headers: &[&str]) -> LoadedTable {
        let columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        LoadedTable {
            source: PathBuf::from("e.csv"),
            records: Vec::new(),
            mapping: ColumnMap::detect(&columns),
            columns,
            encoding: "utf-8".into(),
            delimiter: b',',
        }
    }

    #[test]
    fn report_lists_recognized_columns_in_source_order() {
        let t = table(&["备注", "视频链接", "作品名称", "参赛者"]);
        let lines = mapping_report(&t);
        assert!(lines.iter().any(|l| l.starts_with("备注") && l.ends_with(" -")));
        assert!(lines.contains(&"Recognized: 视频链接, 作品名称, 参赛者".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("Ignored:    1"));
    }

    #[test]
    fn report_with_nothing_recognized() {
        let t = table(&["a", "b"]);
        let lines = mapping_report(&t);
        assert!(lines.contains(&"Recognized: none".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("Ignored:    2"));
        assert!(!t.has_url_column());
    }
}
