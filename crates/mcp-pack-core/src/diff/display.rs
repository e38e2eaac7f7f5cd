//! Diff formatting for user review

use crate::diff::{Diff, LineTag};
use std::fmt::Write;

/// Render a diff as `+ `, `- ` and two-space prefixed lines
#[must_use]
pub fn render_plain(diff: &Diff) -> String {
    let mut output = String::new();

    for line in &diff.lines {
        let prefix = match line.tag {
            LineTag::Added => "+ ",
            LineTag::Removed => "- ",
            LineTag::Context => "  ",
        };
        let _ = writeln!(output, "{prefix}{}", line.text);
    }

    output
}

/// Summary statistics for a diff
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffSummary {
    /// Lines added
    pub added: usize,
    /// Lines removed
    pub removed: usize,
    /// Unchanged lines shown for context
    pub context: usize,
}

impl DiffSummary {
    /// Generate summary from a diff
    #[must_use]
    pub fn from_diff(diff: &Diff) -> Self {
        let mut summary = Self::default();

        for line in &diff.lines {
            match line.tag {
                LineTag::Added => summary.added += 1,
                LineTag::Removed => summary.removed += 1,
                LineTag::Context => summary.context += 1,
            }
        }

        summary
    }

    /// Format as a one-line summary
    #[must_use]
    pub fn one_line(&self) -> String {
        format!("{} added, {} removed", self.added, self.removed)
    }
}
