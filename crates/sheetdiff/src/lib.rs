//! # sheetdiff
//!
//! Compare two spreadsheet documents cell by cell and produce a highlighted
//! copy plus a text change log.
//!
//! A comparison reads each selected sheet as a [`Grid`] of display texts,
//! walks both grids together and reports every cell whose text differs. The
//! differing cells are written into an output document with a highlight fill,
//! optionally keeping the cells' own formatting and noting the old value in a
//! cell comment.
//!
//! Three selections are supported, see [`SheetSelection`]:
//!
//! - one sheet of each document
//! - sheets matched by name
//! - explicit sheet pairs, each rendered into its own output sheet
//!
//! ## Example
//!
//! ```rust
//! use sheetdiff::prelude::*;
//!
//! let mut old = Workbook::new();
//! old.worksheet_mut(0).unwrap().set_value("A1", "10").unwrap();
//! let mut new = Workbook::new();
//! new.worksheet_mut(0).unwrap().set_value("A1", "12").unwrap();
//!
//! let mut storage = MemoryStorage::new();
//! storage.insert_workbook("old.xlsx", old);
//! storage.insert_workbook("new.xlsx", new);
//!
//! let options = CompareOptions::new("old.xlsx", "new.xlsx", "diff.xlsx", "diff.txt");
//! let selection = SheetSelection::Single {
//!     source_sheet: "Sheet1".into(),
//!     comparison_sheet: "Sheet1".into(),
//! };
//! let summary = compare(&mut storage, &options, &selection, &mut NoProgress).unwrap();
//!
//! assert_eq!(summary.total, 1);
//! assert_eq!(
//!     storage.log("diff.txt").unwrap(),
//!     "=== Sheet1 ===\nSheet1: A1: 10 → 12\n"
//! );
//! ```

pub mod copier;
pub mod differ;
pub mod error;
pub mod grid;
pub mod options;
pub mod orchestrator;
pub mod prelude;
pub mod progress;
pub mod report;
pub mod storage;
pub mod style;

pub use copier::{CopySummary, SheetCopier};
pub use differ::{diff_grids, CellVisit, CellWalk, DiffRecord, Differences};
pub use error::{ConfigError, DiffError, DocumentRole, Result};
pub use grid::Grid;
pub use options::{
    parse_mapping, CompareOptions, Job, SheetPair, SheetSelection, DEFAULT_COMMENT_AUTHOR,
    DEFAULT_HIGHLIGHT,
};
pub use orchestrator::{compare, old_value_note, DiffRunner};
pub use progress::{NoProgress, ProgressSink, TracingProgress};
pub use report::{ChangeLog, RunSummary, SectionSummary};
pub use storage::{FsStorage, MemoryStorage, Storage, StorageError};
pub use style::{highlight_style, FormatPolicy, StyleCache, StyleResolver};

// Re-export the document model
pub use sheetdiff_core::{
    CellAddress, CellComment, CellValue, Color, CommentRun, Style, StyleHandle, Workbook,
    Worksheet, NO_STYLE,
};
