//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellData, CellRange, CellStorage, CellValue};
use crate::comment::CellComment;
use crate::error::{Error, Result};
use crate::style::{StyleHandle, NO_STYLE};
use crate::{MAX_COLS, MAX_ROWS};

/// A worksheet (single sheet in a workbook)
#[derive(Debug, Clone)]
pub struct Worksheet {
    name: String,
    cells: CellStorage,
    /// Cell comments, row-major
    comments: BTreeMap<(u32, u16), CellComment>,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
            comments: BTreeMap::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    ///
    /// Prefer [`Workbook::rename_worksheet`](crate::Workbook::rename_worksheet),
    /// which validates the name against the other sheets.
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // === Cells ===

    /// Get a cell by indices
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellData> {
        self.cells.get(row, col)
    }

    /// Get a cell value; missing cells read as [`CellValue::Empty`]
    pub fn value_at(&self, row: u32, col: u16) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells.get(row, col).map_or(&EMPTY, |c| &c.value)
    }

    /// Get the style handle applied to a cell ([`NO_STYLE`] if none)
    pub fn style_at(&self, row: u32, col: u16) -> StyleHandle {
        self.cells.get(row, col).map_or(NO_STYLE, |c| c.style)
    }

    /// Set a cell value by address string
    pub fn set_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value, keeping its style
    pub fn set_value_at<V: Into<CellValue>>(&mut self, row: u32, col: u16, value: V) -> Result<()> {
        check_bounds(row, col)?;
        self.cells.set_value(row, col, value.into());
        Ok(())
    }

    /// Apply a style handle to a cell, keeping its value
    ///
    /// The handle is not checked against the workbook's styles; use
    /// [`Workbook::set_cell_style`](crate::Workbook::set_cell_style) for that.
    pub fn set_style_at(&mut self, row: u32, col: u16, style: StyleHandle) -> Result<()> {
        check_bounds(row, col)?;
        self.cells.set_style(row, col, style);
        Ok(())
    }

    /// Store a cell's value and style together
    pub fn set_cell_at(&mut self, row: u32, col: u16, data: CellData) -> Result<()> {
        check_bounds(row, col)?;
        self.cells.set(row, col, data);
        Ok(())
    }

    /// Clear a cell's value and style
    pub fn clear_cell_at(&mut self, row: u32, col: u16) {
        self.cells.remove(row, col);
    }

    /// Number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// True when no cell is stored
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over stored cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter()
    }

    /// Iterate over the stored cells of one row
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u16, &CellData)> {
        self.cells.iter_row(row)
    }

    /// Rows holding at least one stored cell
    pub fn row_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.row_indices()
    }

    // === Rows and Columns ===

    /// Custom row height in points, if one is set
    pub fn row_height(&self, row: u32) -> Option<f64> {
        self.cells.row_height(row)
    }

    /// Set a custom row height in points
    pub fn set_row_height(&mut self, row: u32, height: f64) -> Result<()> {
        check_bounds(row, 0)?;
        if !(height.is_finite() && (0.0..=409.0).contains(&height)) {
            return Err(Error::other(format!(
                "row height {} outside 0..=409 points",
                height
            )));
        }
        self.cells.set_row_height(row, height);
        Ok(())
    }

    /// Custom column width in characters, if one is set
    pub fn column_width(&self, col: u16) -> Option<f64> {
        self.cells.column_width(col)
    }

    /// Set a custom column width in characters
    pub fn set_column_width(&mut self, col: u16, width: f64) -> Result<()> {
        check_bounds(0, col)?;
        if !(width.is_finite() && (0.0..=255.0).contains(&width)) {
            return Err(Error::other(format!(
                "column width {} outside 0..=255 characters",
                width
            )));
        }
        self.cells.set_column_width(col, width);
        Ok(())
    }

    /// All custom row heights
    pub fn custom_row_heights(&self) -> &BTreeMap<u32, f64> {
        self.cells.custom_row_heights()
    }

    /// All custom column widths
    pub fn custom_column_widths(&self) -> &BTreeMap<u16, f64> {
        self.cells.custom_column_widths()
    }

    // === Merged Cells ===

    /// Get merged regions
    pub fn merged_regions(&self) -> &[CellRange] {
        self.cells.merged_regions()
    }

    /// Merge cells; a range overlapping an existing merge is rejected
    pub fn merge_cells(&mut self, range: &CellRange) -> Result<()> {
        check_bounds(range.end.row, range.end.col)?;
        if range.start == range.end {
            return Err(Error::InvalidRange(format!(
                "cannot merge single cell {}",
                range
            )));
        }
        if self
            .cells
            .merged_regions()
            .iter()
            .any(|existing| range.overlaps(existing))
        {
            return Err(Error::MergedCellConflict(range.to_string()));
        }
        self.cells.add_merged_region(*range);
        Ok(())
    }

    // === Cell Comments ===

    /// Set a comment on a cell, replacing any existing one
    pub fn set_comment_at(&mut self, row: u32, col: u16, comment: CellComment) -> Result<()> {
        check_bounds(row, col)?;
        self.comments.insert((row, col), comment);
        Ok(())
    }

    /// Get a comment from a cell by row and column indices
    pub fn comment_at(&self, row: u32, col: u16) -> Option<&CellComment> {
        self.comments.get(&(row, col))
    }

    /// Remove a comment from a cell
    pub fn remove_comment_at(&mut self, row: u32, col: u16) -> Option<CellComment> {
        self.comments.remove(&(row, col))
    }

    /// Get the number of comments in this worksheet
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Iterate over all comments in row-major order
    pub fn comments(&self) -> impl Iterator<Item = (CellAddress, &CellComment)> {
        self.comments
            .iter()
            .map(|(&(row, col), c)| (CellAddress::new(row, col), c))
    }

    /// Distinct comment authors in order of first appearance
    pub fn comment_authors(&self) -> Vec<&str> {
        let mut authors: Vec<&str> = Vec::new();
        for comment in self.comments.values() {
            if !authors.contains(&comment.author.as_str()) {
                authors.push(&comment.author);
            }
        }
        authors
    }
}

fn check_bounds(row: u32, col: u16) -> Result<()> {
    if row >= MAX_ROWS {
        return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
    }
    if col >= MAX_COLS {
        return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::CommentRun;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_values_and_styles() {
        let mut ws = Worksheet::new("Data");
        ws.set_value("B2", "x").unwrap();
        ws.set_style_at(1, 1, 3).unwrap();
        ws.set_value_at(0, 0, 12.5).unwrap();

        assert_eq!(ws.value_at(1, 1), &CellValue::from("x"));
        assert_eq!(ws.style_at(1, 1), 3);
        assert_eq!(ws.style_at(9, 9), NO_STYLE);
        assert!(ws.value_at(9, 9).is_empty());
        assert_eq!(ws.cell_count(), 2);

        ws.clear_cell_at(1, 1);
        assert_eq!(ws.cell_count(), 1);
    }

    #[test]
    fn test_bounds_are_checked() {
        let mut ws = Worksheet::new("Data");
        assert!(ws.set_value_at(MAX_ROWS, 0, 1).is_err());
        assert!(ws.set_style_at(0, MAX_COLS, 1).is_err());
        assert!(ws.set_column_width(0, 300.0).is_err());
        assert!(ws.set_row_height(0, f64::NAN).is_err());
    }

    #[test]
    fn test_layout() {
        let mut ws = Worksheet::new("Data");
        ws.set_column_width(2, 20.0).unwrap();
        ws.set_row_height(0, 30.0).unwrap();

        assert_eq!(ws.column_width(2), Some(20.0));
        assert_eq!(ws.column_width(3), None);
        assert_eq!(ws.row_height(0), Some(30.0));
    }

    #[test]
    fn test_merge_overlap_rejected() {
        let mut ws = Worksheet::new("Data");
        ws.merge_cells(&CellRange::parse("A1:B2").unwrap()).unwrap();

        assert!(matches!(
            ws.merge_cells(&CellRange::parse("B2:C3").unwrap()),
            Err(Error::MergedCellConflict(_))
        ));
        assert!(ws.merge_cells(&CellRange::parse("D4").unwrap()).is_err());
        assert_eq!(ws.merged_regions().len(), 1);
    }

    #[test]
    fn test_comments_are_row_major() {
        let mut ws = Worksheet::new("Data");
        ws.set_comment_at(2, 0, CellComment::plain("bob", "later"))
            .unwrap();
        ws.set_comment_at(0, 3, CellComment::plain("amy", "first"))
            .unwrap();
        ws.set_comment_at(
            1,
            1,
            CellComment::new("bob").with_run(CommentRun::bold("mid")),
        )
        .unwrap();

        let cells: Vec<String> = ws.comments().map(|(a, _)| a.to_string()).collect();
        assert_eq!(cells, vec!["D1", "B2", "A3"]);
        assert_eq!(ws.comment_authors(), vec!["amy", "bob"]);
        assert_eq!(ws.comment_count(), 3);
        assert!(ws.remove_comment_at(1, 1).is_some());
        assert_eq!(ws.comment_at(1, 1), None);
    }
}
