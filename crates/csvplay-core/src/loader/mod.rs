//! Record loader.
//!
//! Reads a delimited text file of unknown encoding and delimiter, maps its
//! header names onto the logical record fields and builds one `Record` per
//! non-blank data row. Nothing is returned unless the whole file imports.

mod columns;
mod delimiter;
mod encoding;

pub use columns::{ColumnMap, Field};
pub use delimiter::describe as describe_delimiter;
pub use encoding::Decoded;

use crate::error::LoadError;
use crate::record::Record;
use std::path::{Path, PathBuf};

/// Encodings tried when the config does not override them.
pub const DEFAULT_ENCODINGS: &[&str] = &["utf-8", "gbk", "gb18030"];

/// Placeholder prefix for rows without a title.
const UNTITLED_PREFIX: &str = "entry_";

/// Everything an import produced.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub source: PathBuf,
    pub records: Vec<Record>,
    /// All header names, in source order.
    pub columns: Vec<String>,
    pub mapping: ColumnMap,
    /// Encoding the file was decoded with.
    pub encoding: String,
    pub delimiter: u8,
}

impl LoadedTable {
    /// False when no column looked like a link column; playback will not work.
    pub fn has_url_column(&self) -> bool {
        !self.mapping.url_columns().is_empty()
    }

    /// Header names that mapped to a logical field.
    pub fn recognized_columns(&self) -> Vec<&str> {
        self.mapping.recognized_columns()
    }
}

/// Loads `path`, trying each encoding label in `encodings` in order.
pub fn load_records<S: AsRef<str>>(path: &Path, encodings: &[S]) -> Result<LoadedTable, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::UnreadableFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut last_reason = String::from("no candidate encodings configured");
    for label in encodings {
        let label = label.as_ref();
        let decoded = match encoding::decode(&bytes, label) {
            Some(d) => d,
            None => {
                tracing::debug!(label, "file does not decode");
                last_reason = format!("not valid {label}");
                continue;
            }
        };
        let delimiter = delimiter::detect(&decoded.text);
        match parse_rows(&decoded.text, delimiter) {
            Ok((headers, rows)) => {
                tracing::debug!(
                    encoding = %decoded.encoding,
                    delimiter = delimiter::describe(delimiter),
                    rows = rows.len(),
                    "parsed {}",
                    path.display()
                );
                return build_table(path, headers, rows, decoded.encoding, delimiter);
            }
            Err(e) => {
                tracing::debug!(label, "parse failed: {e}");
                last_reason = e.to_string();
            }
        }
    }

    Err(LoadError::UnreadableFile {
        path: path.to_path_buf(),
        reason: format!("no supported encoding parsed the file ({last_reason})"),
    })
}

fn parse_rows(text: &str, delimiter: u8) -> Result<(Vec<String>, Vec<Vec<String>>), csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let rec = result?;
        rows.push(rec.iter().map(str::to_string).collect());
    }
    Ok((headers, rows))
}

fn build_table(
    path: &Path,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    encoding: String,
    delimiter: u8,
) -> Result<LoadedTable, LoadError> {
    let mapping = ColumnMap::detect(&headers);
    let missing = mapping.missing_required();
    if !missing.is_empty() {
        return Err(LoadError::MissingRequiredColumn {
            fields: missing.iter().map(|f| f.name().to_string()).collect(),
        });
    }

    let records: Vec<Record> = rows
        .into_iter()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .enumerate()
        .map(|(id, row)| build_record(id, &headers, &mapping, row))
        .collect();

    tracing::info!(
        "imported {} record(s) from {} ({encoding})",
        records.len(),
        path.display()
    );

    Ok(LoadedTable {
        source: path.to_path_buf(),
        records,
        columns: headers,
        mapping,
        encoding,
        delimiter,
    })
}

fn build_record(id: usize, headers: &[String], mapping: &ColumnMap, row: Vec<String>) -> Record {
    let cell = |field: Field| -> String {
        mapping
            .column_for(field)
            .and_then(|idx| row.get(idx))
            .cloned()
            .unwrap_or_default()
    };

    let mut title = cell(Field::Title);
    if title.is_empty() {
        title = format!("{UNTITLED_PREFIX}{}", id + 1);
    }

    let url = mapping
        .url_columns()
        .iter()
        .filter_map(|idx| row.get(*idx))
        .find(|v| v.to_ascii_lowercase().starts_with("http"))
        .cloned();

    let mut record = Record::new(id, title, url);
    record.participant = cell(Field::Participant);
    record.category = cell(Field::Category);
    record.instructor = cell(Field::Instructor);
    record.organization = cell(Field::Organization);
    record.raw = headers
        .iter()
        .cloned()
        .zip(row.into_iter().chain(std::iter::repeat(String::new())))
        .collect();
    record
}
