//! Diff data types

use serde::{Deserialize, Serialize};

/// How a line differs between the before and after text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTag {
    /// Present only in the after text
    Added,
    /// Present only in the before text
    Removed,
    /// Present in both
    Context,
}

/// One tagged line of a diff, without its trailing newline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub tag: LineTag,
    pub text: String,
}

impl DiffLine {
    #[must_use]
    pub fn new(tag: LineTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }
}

/// A line-level diff between two serialized documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    pub lines: Vec<DiffLine>,
}

impl Diff {
    /// True when at least one line was added or removed
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(|l| l.tag != LineTag::Context)
    }

    /// Lines with the given tag
    pub fn lines_tagged(&self, tag: LineTag) -> impl Iterator<Item = &DiffLine> {
        self.lines.iter().filter(move |l| l.tag == tag)
    }

    /// Number of added lines
    #[must_use]
    pub fn added(&self) -> usize {
        self.lines_tagged(LineTag::Added).count()
    }

    /// Number of removed lines
    #[must_use]
    pub fn removed(&self) -> usize {
        self.lines_tagged(LineTag::Removed).count()
    }
}
