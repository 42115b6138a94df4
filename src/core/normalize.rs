//! Output normalization for rendered text

use regex::Regex;
use std::sync::LazyLock;

static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Make rendered output independent of which optional branches fired.
///
/// Trailing whitespace is stripped from every line, runs of three or more
/// newlines become exactly two, and the end of the text is trimmed.
/// Applying it twice gives the same result as applying it once.
pub fn normalize(text: &str) -> String {
    let joined = text.split('\n').map(str::trim_end).collect::<Vec<_>>().join("\n");
    let collapsed = BLANK_RUN.replace_all(&joined, "\n\n");
    collapsed.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_trailing_whitespace_per_line() {
        assert_eq!(normalize("a  \nb\t\nc"), "a\nb\nc");
    }

    #[test]
    fn test_four_blank_lines_become_one() {
        let input = "first\n\n\n\n\nsecond";
        assert_eq!(normalize(input), "first\n\nsecond");
    }

    #[test]
    fn test_whitespace_only_lines_count_as_blank() {
        let input = "first\n   \n\t\n  \nsecond";
        assert_eq!(normalize(input), "first\n\nsecond");
    }

    #[test]
    fn test_trailing_blank_lines_removed() {
        assert_eq!(normalize("body\n\n\n"), "body");
        assert_eq!(normalize("body\n  \n \n"), "body");
    }

    #[test]
    fn test_single_blank_line_preserved() {
        assert_eq!(normalize("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_leading_whitespace_kept() {
        assert_eq!(normalize("  indented\n    more"), "  indented\n    more");
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(normalize("a\r\n\r\n\r\n\r\nb\r\n"), "a\n\nb");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "\n\n\n",
            "a \n\n\n\nb  \n\n",
            "  x\r\n\r\n\r\ny\t",
            "one\n\ntwo\n\n\nthree\n",
            " \n \n a",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }
}
