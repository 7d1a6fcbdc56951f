//! # sheetdiff-core
//!
//! In-memory spreadsheet model shared by the sheetdiff codec and engine.
//!
//! - [`Workbook`] owns the sheets and a single document-wide [`StylePool`];
//!   cells refer to styles through a [`StyleHandle`], with [`NO_STYLE`]
//!   (handle 0) meaning "no explicit style".
//! - [`Worksheet`] holds sparse cells plus layout (column widths, row heights,
//!   merged ranges) and rich-text [`CellComment`]s.
//! - [`cell::display_text`] renders a cell to the text a user would see, which
//!   is what comparisons operate on.
//!
//! ## Example
//!
//! ```rust
//! use sheetdiff_core::{Color, Style, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let yellow = workbook.register_style(Style::new().fill_color(Color::rgb(255, 255, 0)));
//!
//! let sheet = workbook.worksheet_mut(0).unwrap();
//! sheet.set_value_at(0, 0, "Hello").unwrap();
//! sheet.set_style_at(0, 0, yellow).unwrap();
//! ```

pub mod cell;
pub mod comment;
pub mod error;
pub mod style;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{display_text, CellAddress, CellData, CellError, CellRange, CellValue};
pub use comment::{CellComment, CommentRun};
pub use error::{Error, Result};
pub use workbook::{Workbook, DEFAULT_SHEET_NAME};
pub use worksheet::Worksheet;

pub use style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    HorizontalAlignment, NumberFormat, PatternType, Protection, Style, StyleHandle, StylePool,
    Underline, VerticalAlignment, NO_STYLE,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
