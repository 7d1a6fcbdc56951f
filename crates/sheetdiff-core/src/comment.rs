//! Cell comments (notes)
//!
//! A comment is a list of rich-text runs plus the size of the note box that
//! pops up over the cell.
//!
//! ```rust
//! use sheetdiff_core::{CellComment, Color, CommentRun, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! let note = CellComment::new("reviewer")
//!     .with_run(CommentRun::bold("Note:\n").with_color(Color::RED))
//!     .with_run(CommentRun::plain("check this value"));
//! sheet.set_comment_at(0, 0, note).unwrap();
//!
//! assert_eq!(sheet.comment_at(0, 0).unwrap().text(), "Note:\ncheck this value");
//! ```

use crate::style::Color;

/// Default note box width in points
pub const DEFAULT_COMMENT_WIDTH: f64 = 108.0;
/// Default note box height in points
pub const DEFAULT_COMMENT_HEIGHT: f64 = 59.25;

/// A cell comment/note
#[derive(Debug, Clone, PartialEq)]
pub struct CellComment {
    /// Author of the comment
    pub author: String,
    /// Rich-text content
    pub runs: Vec<CommentRun>,
    /// Note box width in points
    pub width: f64,
    /// Note box height in points
    pub height: f64,
}

impl CellComment {
    /// Create an empty comment by `author`
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            runs: Vec::new(),
            width: DEFAULT_COMMENT_WIDTH,
            height: DEFAULT_COMMENT_HEIGHT,
        }
    }

    /// Create a comment holding a single plain run
    pub fn plain(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(author).with_run(CommentRun::plain(text))
    }

    /// Append a run
    pub fn with_run(mut self, run: CommentRun) -> Self {
        self.runs.push(run);
        self
    }

    /// Set the note box size in points
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// The comment's text with formatting removed
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A run of comment text sharing one format
#[derive(Debug, Clone, PartialEq)]
pub struct CommentRun {
    pub text: String,
    pub bold: bool,
    /// Font color; `None` uses the note's default
    pub color: Option<Color>,
}

impl CommentRun {
    /// Unformatted text
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            color: None,
        }
    }

    /// Bold text
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    /// Set the run's font color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// True when the run carries no formatting
    pub fn is_plain(&self) -> bool {
        !self.bold && self.color.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_comment() {
        let c = CellComment::plain("me", "hello");
        assert_eq!(c.author, "me");
        assert_eq!(c.text(), "hello");
        assert!(c.runs[0].is_plain());
        assert_eq!(c.width, DEFAULT_COMMENT_WIDTH);
    }

    #[test]
    fn test_rich_runs() {
        let c = CellComment::new("me")
            .with_run(CommentRun::bold("A").with_color(Color::RED))
            .with_run(CommentRun::plain("b"))
            .with_size(180.0, 40.0);
        assert_eq!(c.text(), "Ab");
        assert!(c.runs[0].bold);
        assert_eq!(c.runs[0].color, Some(Color::RED));
        assert_eq!((c.width, c.height), (180.0, 40.0));
    }
}
