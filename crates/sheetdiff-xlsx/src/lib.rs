//! # sheetdiff-xlsx
//!
//! XLSX (Office Open XML) reader and writer for sheetdiff.
//!
//! Styles are mapped onto the workbook's document-wide style pool: style
//! handle `N` is written as `cellXfs` entry `N`, and every `cellXfs` entry
//! read from a file is registered in the pool on load.
//!
//! ```no_run
//! use sheetdiff_xlsx::{XlsxReader, XlsxWriter};
//!
//! let workbook = XlsxReader::read_file("input.xlsx")?;
//! XlsxWriter::write_file(&workbook, "copy.xlsx")?;
//! # Ok::<(), sheetdiff_xlsx::XlsxError>(())
//! ```

pub mod error;
pub mod reader;
pub mod writer;

mod styles;
mod xml;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
