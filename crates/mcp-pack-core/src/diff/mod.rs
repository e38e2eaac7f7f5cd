//! Line diffs for config write previews

pub mod display;
pub mod text;
mod types;

pub use display::{render_plain, DiffSummary};
pub use text::diff_lines;
pub use types::*;
