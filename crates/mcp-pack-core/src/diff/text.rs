//! Line diff computation

use crate::diff::{Diff, DiffLine, LineTag};
use similar::{ChangeTag, TextDiff};

/// Compute a line diff between `before` and `after`.
///
/// Lines are compared including their line endings. Blank lines are left
/// out of the result.
#[must_use]
pub fn diff_lines(before: &str, after: &str) -> Diff {
    let diff = TextDiff::from_lines(before, after);
    let mut lines = Vec::new();

    for change in diff.iter_all_changes() {
        let tag = match change.tag() {
            ChangeTag::Delete => LineTag::Removed,
            ChangeTag::Insert => LineTag::Added,
            ChangeTag::Equal => LineTag::Context,
        };
        let text = change.value().trim_end_matches(['\n', '\r']);
        if text.is_empty() {
            continue;
        }
        lines.push(DiffLine::new(tag, text));
    }

    Diff { lines }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_text_has_no_changes() {
        let text = "alpha\nbeta\n";
        let diff = diff_lines(text, text);
        assert!(!diff.has_changes());
        assert_eq!(diff.lines.len(), 2);
    }

    #[test]
    fn test_added_line() {
        let diff = diff_lines("alpha\n", "alpha\nbeta\n");
        assert_eq!(
            diff.lines,
            vec![
                DiffLine::new(LineTag::Context, "alpha"),
                DiffLine::new(LineTag::Added, "beta"),
            ]
        );
    }

    #[test]
    fn test_removed_line() {
        let diff = diff_lines("alpha\nbeta\n", "alpha\n");
        assert_eq!(diff.removed(), 1);
        assert_eq!(diff.added(), 0);
        assert_eq!(diff.lines_tagged(LineTag::Removed).next().unwrap().text, "beta");
    }

    #[test]
    fn test_empty_before_is_all_added() {
        let diff = diff_lines("", "{\n  \"a\": 1\n}\n");
        assert_eq!(diff.added(), 3);
        assert_eq!(diff.removed(), 0);
    }

    #[test]
    fn test_missing_trailing_newline() {
        let diff = diff_lines("alpha", "alpha\nbeta\n");
        assert_eq!(diff.added(), 2);
        assert_eq!(diff.removed(), 1);
    }
}
