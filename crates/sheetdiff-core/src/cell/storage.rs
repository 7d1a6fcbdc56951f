//! Cell storage implementation
//!
//! Sparse, row-based storage: only cells with a value or an explicit style
//! are kept, in a `BTreeMap<row, BTreeMap<col, CellData>>` so iteration is
//! always row-major.

use std::collections::BTreeMap;

use super::CellValue;
use crate::style::{StyleHandle, NO_STYLE};
use crate::CellRange;

/// Complete data for a single cell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellData {
    /// The cell's value
    pub value: CellValue,
    /// Handle into the workbook's style pool ([`NO_STYLE`] = default style)
    pub style: StyleHandle,
}

impl CellData {
    /// Create a new cell with a value and default style
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            style: NO_STYLE,
        }
    }

    /// Create a new cell with a value and style
    pub fn with_style(value: CellValue, style: StyleHandle) -> Self {
        Self { value, style }
    }

    /// A cell with no value and the default style carries no information
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.style == NO_STYLE
    }
}

/// Sparse storage for one worksheet's cells and layout
#[derive(Debug, Clone, Default)]
pub struct CellStorage {
    rows: BTreeMap<u32, BTreeMap<u16, CellData>>,
    row_heights: BTreeMap<u32, f64>,
    column_widths: BTreeMap<u16, f64>,
    merged_regions: Vec<CellRange>,
}

impl CellStorage {
    /// Create a new empty cell storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell
    pub fn get(&self, row: u32, col: u16) -> Option<&CellData> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Store a cell, dropping it if it carries no information
    pub fn set(&mut self, row: u32, col: u16, data: CellData) {
        if data.is_empty() {
            self.remove(row, col);
        } else {
            self.rows.entry(row).or_default().insert(col, data);
        }
    }

    /// Set just the cell value (preserving style)
    pub fn set_value(&mut self, row: u32, col: u16, value: CellValue) {
        let style = self.get(row, col).map_or(NO_STYLE, |c| c.style);
        self.set(row, col, CellData::with_style(value, style));
    }

    /// Set just the cell style (preserving value)
    pub fn set_style(&mut self, row: u32, col: u16, style: StyleHandle) {
        let value = self
            .get(row, col)
            .map(|c| c.value.clone())
            .unwrap_or_default();
        self.set(row, col, CellData::with_style(value, style));
    }

    /// Remove a cell, returning what was stored
    pub fn remove(&mut self, row: u32, col: u16) -> Option<CellData> {
        let row_map = self.rows.get_mut(&row)?;
        let removed = row_map.remove(&col);
        if row_map.is_empty() {
            self.rows.remove(&row);
        }
        removed
    }

    /// Number of stored cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Check if no cells are stored
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over all stored cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.rows
            .iter()
            .flat_map(|(row, cols)| {
                cols.iter().map(move |(col, data)| (*row, *col, data))
            })
    }

    /// Iterate over the stored cells of one row
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u16, &CellData)> {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cols| cols.iter().map(|(col, data)| (*col, data)))
    }

    /// Rows that hold at least one cell
    pub fn row_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.keys().copied()
    }

    /// Custom row height, if one is set
    pub fn row_height(&self, row: u32) -> Option<f64> {
        self.row_heights.get(&row).copied()
    }

    /// Set a custom row height in points
    pub fn set_row_height(&mut self, row: u32, height: f64) {
        self.row_heights.insert(row, height);
    }

    /// Custom column width, if one is set
    pub fn column_width(&self, col: u16) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    /// Set a custom column width in characters
    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.column_widths.insert(col, width);
    }

    /// All custom row heights
    pub fn custom_row_heights(&self) -> &BTreeMap<u32, f64> {
        &self.row_heights
    }

    /// All custom column widths
    pub fn custom_column_widths(&self) -> &BTreeMap<u16, f64> {
        &self.column_widths
    }

    /// Merged regions in insertion order
    pub fn merged_regions(&self) -> &[CellRange] {
        &self.merged_regions
    }

    pub(crate) fn add_merged_region(&mut self, range: CellRange) {
        self.merged_regions.push(range);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cells_not_stored() {
        let mut storage = CellStorage::new();
        storage.set_value(0, 0, CellValue::from("x"));
        assert_eq!(storage.cell_count(), 1);

        storage.set_value(0, 0, CellValue::Empty);
        assert_eq!(storage.cell_count(), 0);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_style_only_cell_is_kept() {
        let mut storage = CellStorage::new();
        storage.set_style(3, 2, 5);
        assert_eq!(storage.get(3, 2).map(|c| c.style), Some(5));
        assert!(storage.get(3, 2).unwrap().value.is_empty());

        storage.set_value(3, 2, CellValue::from(1.5));
        assert_eq!(storage.get(3, 2).unwrap().style, 5);

        storage.set_style(3, 2, NO_STYLE);
        assert_eq!(storage.get(3, 2).unwrap().value, CellValue::Number(1.5));
    }

    #[test]
    fn test_iteration_is_row_major() {
        let mut storage = CellStorage::new();
        storage.set_value(1, 0, CellValue::from("c"));
        storage.set_value(0, 1, CellValue::from("b"));
        storage.set_value(0, 0, CellValue::from("a"));

        let order: Vec<(u32, u16)> = storage.iter().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0)]);
        assert_eq!(storage.iter_row(0).count(), 2);
        assert_eq!(storage.row_indices().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_layout_properties() {
        let mut storage = CellStorage::new();
        assert_eq!(storage.row_height(4), None);
        storage.set_row_height(4, 30.0);
        storage.set_column_width(2, 18.5);
        assert_eq!(storage.row_height(4), Some(30.0));
        assert_eq!(storage.column_width(2), Some(18.5));
        assert_eq!(storage.custom_row_heights().len(), 1);
        assert_eq!(storage.custom_column_widths().len(), 1);
    }
}
