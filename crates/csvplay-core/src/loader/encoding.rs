//! Candidate-encoding decoding.

use encoding_rs::{Encoding, UTF_8};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text decoded under one candidate encoding.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    /// Label reported to the user (`utf-8-sig` when a BOM was stripped).
    pub encoding: String,
}

/// Decodes `bytes` strictly under the encoding named by `label`.
///
/// Returns `None` for unknown labels and for input with malformed sequences;
/// nothing is replaced with U+FFFD. A UTF-8 byte-order mark is stripped when
/// the label names UTF-8.
pub fn decode(bytes: &[u8], label: &str) -> Option<Decoded> {
    let encoding = match Encoding::for_label(label.trim().as_bytes()) {
        Some(e) => e,
        None => {
            tracing::warn!(label, "unknown encoding label, skipping");
            return None;
        }
    };

    let (body, reported) = match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) if encoding == UTF_8 => (rest, "utf-8-sig".to_string()),
        _ => (bytes, label.trim().to_ascii_lowercase()),
    };

    let text = encoding.decode_without_bom_handling_and_without_replacement(body)?;
    Some(Decoded {
        text: text.into_owned(),
        encoding: reported,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::GBK;

    #[test]
    fn utf8_plain() {
        let d = decode("作品名称,链接".as_bytes(), "utf-8").unwrap();
        assert_eq!(d.text, "作品名称,链接");
        assert_eq!(d.encoding, "utf-8");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("title,url".as_bytes());
        let d = decode(&bytes, "utf-8").unwrap();
        assert_eq!(d.text, "title,url");
        assert_eq!(d.encoding, "utf-8-sig");
    }

    #[test]
    fn gbk_bytes_are_not_utf8() {
        let (bytes, _, _) = GBK.encode("作品名称,视频链接");
        assert!(decode(&bytes, "utf-8").is_none());
        let d = decode(&bytes, "gbk").unwrap();
        assert_eq!(d.text, "作品名称,视频链接");
        assert_eq!(d.encoding, "gbk");
    }

    #[test]
    fn unknown_label_is_skipped() {
        assert!(decode(b"abc", "no-such-encoding").is_none());
    }
}
