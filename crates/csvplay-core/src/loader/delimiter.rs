//! Delimiter sniffing.

/// Candidate separators, in tie-break order.
pub const CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Number of leading characters inspected.
const SAMPLE_CHARS: usize = 1024;

/// Picks the candidate separator that occurs most often in the first
/// `SAMPLE_CHARS` characters. Ties and an empty sample resolve to `,`.
pub fn detect(text: &str) -> u8 {
    let end = text
        .char_indices()
        .nth(SAMPLE_CHARS)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let sample = &text.as_bytes()[..end];

    let mut best = CANDIDATES[0];
    let mut best_count = 0usize;
    for &candidate in &CANDIDATES {
        let count = sample.iter().filter(|&&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Printable name for a delimiter byte.
pub fn describe(delimiter: u8) -> &'static str {
    match delimiter {
        b',' => "comma",
        b';' => "semicolon",
        b'\t' => "tab",
        b'|' => "pipe",
        _ => "other",
    }
}
