//! YAML error diagnostics for template metadata blocks

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// YAML syntax error inside a metadata block, pointing into the whole document
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid YAML in metadata block: {message}")]
#[diagnostic(code(playt::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    /// The underlying error message
    message: String,
}

impl YamlSyntaxError {
    /// Create a syntax error from a serde_yml error raised while parsing `block`.
    ///
    /// `block_offset` is the byte offset of the block within `document`.
    pub fn from_serde_error(
        err: &serde_yml::Error,
        document: &str,
        name: &str,
        block: &str,
        block_offset: usize,
    ) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = (block_offset + line_col_to_offset(block, line, column)).min(document.len());
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(name, document.to_string()),
            span: SourceSpan::new(offset.into(), char_len_at(document, offset)),
            help,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Byte length of the character starting at `offset`, or 0 at the end
fn char_len_at(text: &str, offset: usize) -> usize {
    text.get(offset..)
        .and_then(|rest| rest.chars().next())
        .map_or(0, char::len_utf8)
}

/// Convert a 1-based line/column to a byte offset.
///
/// Columns count characters. A column past the end of its line lands on the
/// line end, so the result is always a char boundary.
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start = match line {
        0 | 1 => 0,
        n => match source.match_indices('\n').nth(n - 2) {
            Some((i, _)) => i + 1,
            None => return source.len(),
        },
    };
    let line_end = source[line_start..]
        .find('\n')
        .map_or(source.len(), |i| line_start + i);

    source[line_start..line_end]
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(line_end, |(i, _)| line_start + i)
}

/// Generate a suggestion based on the error message
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("tab") {
        return Some(
            "YAML requires spaces for indentation, not tabs. Replace tabs with spaces.".to_string(),
        );
    }

    if msg_lower.contains("duplicate") {
        return Some("Each variable can only be declared once. Remove or rename the duplicate.".to_string());
    }

    if msg_lower.contains("expected block end") || msg_lower.contains("did not find expected key") {
        return Some("Check your indentation - variable definitions must be nested under their name.".to_string());
    }

    if msg_lower.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation.".to_string());
    }

    if msg_lower.contains("found character that cannot start any token") {
        return Some("Quote values that begin with special characters such as '@' or '`'.".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 3), 14);
    }

    #[test]
    fn test_offset_stays_on_char_boundary() {
        let source = "é: x\nnamé: [ü\nend";
        assert_eq!(line_col_to_offset(source, 1, 40), 5);
        assert_eq!(line_col_to_offset(source, 2, 5), 11);
        assert_eq!(line_col_to_offset(source, 2, 8), 14);
        assert_eq!(line_col_to_offset(source, 2, 9), 16);
        assert_eq!(line_col_to_offset(source, 9, 1), source.len());
        for (line, column) in [(1, 2), (2, 4), (2, 8), (3, 10)] {
            assert!(source.is_char_boundary(line_col_to_offset(source, line, column)));
        }
    }

    #[test]
    fn test_span_covers_whole_character() {
        assert_eq!(char_len_at("aü", 1), 2);
        assert_eq!(char_len_at("a", 1), 0);
    }

    #[test]
    fn test_help_generation() {
        assert!(generate_help("found a tab character").is_some());
        assert!(generate_help("duplicate entry with key \"name\"").is_some());
        assert!(generate_help("mapping values are not allowed in this context").is_some());
        assert!(generate_help("some random error").is_none());
    }

    #[test]
    fn test_error_points_into_document() {
        let document = "---\nvariables:\n  name: [unclosed\n---\nbody";
        let block = "variables:\n  name: [unclosed\n";
        let err = serde_yml::from_str::<serde_yml::Value>(block).unwrap_err();
        let diag = YamlSyntaxError::from_serde_error(&err, document, "t.md", block, 4);
        assert!(diag.span.offset() >= 4);
        assert!(diag.span.offset() <= document.len());
        assert!(!diag.message().is_empty());
    }
}
