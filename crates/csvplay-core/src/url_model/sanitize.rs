//! Cross-platform filename sanitization for cache files.

/// Characters rejected by at least one common filesystem.
const UNSAFE: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Sanitizes an entry title for use as a cache filename stem.
///
/// - Replaces `<>:"/\|?*` and control characters with `_`
/// - Trims leading/trailing spaces and dots (Windows drops trailing dots)
/// - Keeps at most `max_chars` characters
pub fn sanitize_title(title: &str, max_chars: usize) -> String {
    let replaced: String = title
        .chars()
        .map(|c| if UNSAFE.contains(&c) || c.is_control() { '_' } else { c })
        .collect();
    let trimmed = replaced.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let cut: String = trimmed.chars().take(max_chars).collect();
    cut.trim_end_matches(|c: char| c == '.' || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_unsafe_chars() {
        assert_eq!(sanitize_title("a/b\\c:d*e?f\"g<h>i|j", 50), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn control_chars() {
        assert_eq!(sanitize_title("line\nbreak\ttab\0", 50), "line_break_tab_");
    }

    #[test]
    fn trims_dots_and_spaces() {
        assert_eq!(sanitize_title("  ..我的作品..  ", 50), "我的作品");
    }

    #[test]
    fn truncates_by_characters() {
        let long = "长".repeat(80);
        let out = sanitize_title(&long, 50);
        assert_eq!(out.chars().count(), 50);
    }

    #[test]
    fn truncation_does_not_leave_trailing_dot() {
        assert_eq!(sanitize_title("abcd. efgh", 5), "abcd");
    }
}
