//! XLSX error types
//!
//! Errors raised while decoding a part are wrapped in [`XlsxError::Part`] so
//! the message names the part, e.g. `xl/worksheets/sheet2.xml: ...`.

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur during XLSX reading/writing
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid file format
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Model error raised while building the workbook
    #[error("Core error: {0}")]
    Core(#[from] sheetdiff_core::Error),

    /// Failure while reading or writing one part of the package
    #[error("{part}: {source}")]
    Part {
        part: String,
        #[source]
        source: Box<XlsxError>,
    },
}

impl XlsxError {
    /// Attach the package part being processed.
    ///
    /// Missing parts and errors that already name a part are returned as is.
    pub fn in_part(self, part: &str) -> Self {
        match self {
            XlsxError::Part { .. } | XlsxError::MissingPart(_) => self,
            source => XlsxError::Part {
                part: part.to_string(),
                source: Box::new(source),
            },
        }
    }

    /// The package part this error was raised in, if known
    pub fn part(&self) -> Option<&str> {
        match self {
            XlsxError::Part { part, .. } | XlsxError::MissingPart(part) => Some(part),
            _ => None,
        }
    }
}
