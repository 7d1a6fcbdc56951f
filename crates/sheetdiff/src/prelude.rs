//! Common imports for sheetdiff users
//!
//! ```rust
//! use sheetdiff::prelude::*;
//! ```

pub use crate::{
    compare,
    // Model
    CellAddress,
    CellValue,
    ChangeLog,
    Color,
    // Options
    CompareOptions,
    DiffError,
    DiffRecord,
    DiffRunner,
    FsStorage,
    Grid,
    Job,
    MemoryStorage,
    NoProgress,
    ProgressSink,
    RunSummary,
    SheetPair,
    SheetSelection,
    Storage,
    TracingProgress,
    Workbook,
    Worksheet,
};
