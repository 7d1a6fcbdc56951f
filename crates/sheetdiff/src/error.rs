//! Error types for comparison runs

use std::fmt;
use std::path::PathBuf;

use sheetdiff_core::CellAddress;
use thiserror::Error;

use crate::storage::StorageError;

/// Result type for comparison runs
pub type Result<T> = std::result::Result<T, DiffError>;

/// Which document of a run an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    /// The old document
    Source,
    /// The new document
    Comparison,
    /// The highlighted document being produced
    Output,
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentRole::Source => "source",
            DocumentRole::Comparison => "comparison",
            DocumentRole::Output => "output",
        })
    }
}

/// Failures that abort a whole comparison run.
///
/// Per-sheet problems in mapped and paired runs are not errors; they are
/// reported through the progress sink and the run summary.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("failed to open {role} document '{}': {source}", path.display())]
    Open {
        role: DocumentRole,
        path: PathBuf,
        #[source]
        source: StorageError,
    },

    #[error("failed to read sheet '{sheet}' of the {role} document: {source}")]
    ReadSheet {
        role: DocumentRole,
        sheet: String,
        #[source]
        source: sheetdiff_core::Error,
    },

    #[error("failed to copy source document to '{}': {source}", path.display())]
    CopyBase {
        path: PathBuf,
        #[source]
        source: StorageError,
    },

    #[error("failed to create highlight style from '{spec}': {source}")]
    HighlightStyle {
        spec: String,
        #[source]
        source: sheetdiff_core::Error,
    },

    #[error("failed to write cell {address} of output sheet '{sheet}': {source}")]
    WriteCell {
        sheet: String,
        address: CellAddress,
        #[source]
        source: sheetdiff_core::Error,
    },

    #[error("failed to save output document '{}': {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: StorageError,
    },

    #[error("failed to write change log '{}': {source}", path.display())]
    WriteLog {
        path: PathBuf,
        #[source]
        source: StorageError,
    },

    #[error("no sheet pairs to compare")]
    NoSheetPairs,
}

/// Errors from reading job files and command-line sheet specifications
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read job file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid job file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid sheet pair '{0}': expected SOURCE:COMPARISON[:DISPLAY]")]
    InvalidPair(String),

    #[error("invalid sheet mapping '{0}': expected SOURCE=COMPARISON")]
    InvalidMapping(String),
}
