//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A range of cells (e.g., "A1:B10")
//! - [`CellData`] - Complete cell data including value and style
//! - [`display_text`] - The text a spreadsheet application would show for a cell

mod address;
mod display;
mod storage;
mod value;

pub use address::{CellAddress, CellRange};
pub use display::{display_text, format_general};
pub use storage::{CellData, CellStorage};
pub use value::{CellError, CellValue, SharedString};
