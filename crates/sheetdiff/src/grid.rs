//! Read-only text view of a sheet

use sheetdiff_core::{display_text, NumberFormat, Workbook, Worksheet, MAX_COLS, MAX_ROWS};

/// A ragged grid of cell display texts.
///
/// Rows may have different lengths and reads outside the populated area
/// return `""`, so [`Grid::value_at`] never fails. Trailing empty cells of a
/// row and trailing empty rows are not part of the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
    max_columns: usize,
}

impl Grid {
    /// Build a grid from rows of text.
    ///
    /// Rows and columns past the sheet limits are dropped.
    pub fn from_rows<R, C, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .take(MAX_ROWS as usize)
            .map(|row| {
                row.into_iter()
                    .take(MAX_COLS as usize)
                    .map(Into::into)
                    .collect()
            })
            .collect();
        let max_columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, max_columns }
    }

    /// Render every stored cell of `sheet` with its number format.
    ///
    /// Cells whose text is empty (blank or style-only) leave no trace, which
    /// matches how rows read back from a spreadsheet application.
    pub fn from_worksheet(workbook: &Workbook, sheet: &Worksheet) -> Self {
        let general = NumberFormat::General;
        let mut rows: Vec<Vec<String>> = Vec::new();

        for (row, col, cell) in sheet.iter_cells() {
            let format = workbook
                .style(cell.style)
                .map_or(&general, |style| &style.number_format);
            let text = display_text(&cell.value, format);
            if text.is_empty() {
                continue;
            }

            let (row, col) = (row as usize, col as usize);
            if rows.len() <= row {
                rows.resize_with(row + 1, Vec::new);
            }
            let cells = &mut rows[row];
            if cells.len() <= col {
                cells.resize(col + 1, String::new());
            }
            cells[col] = text;
        }

        let max_columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, max_columns }
    }

    /// Text at (row, col), `""` outside the populated area
    pub fn value_at(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map_or("", String::as_str)
    }

    /// Number of rows, including empty rows before the last populated one
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of one row; 0 past the last row
    pub fn row_width(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    /// Width of the widest row
    pub fn max_column_count(&self) -> usize {
        self.max_columns
    }

    /// True when no row holds any text
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetdiff_core::{CellValue, Style};

    #[test]
    fn test_ragged_reads() {
        let grid = Grid::from_rows(vec![vec!["a", "b", "c"], vec![], vec!["d"]]);

        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.max_column_count(), 3);
        assert_eq!(grid.row_width(1), 0);
        assert_eq!(grid.row_width(7), 0);
        assert_eq!(grid.value_at(0, 2), "c");
        assert_eq!(grid.value_at(2, 1), "");
        assert_eq!(grid.value_at(100, 100), "");
    }

    #[test]
    fn test_from_worksheet_uses_display_text() {
        let mut wb = Workbook::new();
        let percent = wb.register_style(Style::new().number_format(NumberFormat::BuiltIn(9)));
        let ws = wb.worksheet_mut(0).unwrap();
        ws.set_value("A1", "name").unwrap();
        ws.set_value("C1", 2.0).unwrap();
        ws.set_value("B3", 0.25).unwrap();
        ws.set_style_at(2, 1, percent).unwrap();
        ws.set_value("A2", CellValue::Boolean(true)).unwrap();
        // Style-only cells are invisible
        ws.set_style_at(3, 5, percent).unwrap();

        let wb = wb;
        let grid = Grid::from_worksheet(&wb, wb.worksheet(0).unwrap());

        assert_eq!(
            grid.rows().map(<[String]>::to_vec).collect::<Vec<_>>(),
            vec![
                vec!["name".to_string(), String::new(), "2".to_string()],
                vec!["TRUE".to_string()],
                vec![String::new(), "25%".to_string()],
            ]
        );
        assert_eq!(grid.max_column_count(), 3);
    }

    #[test]
    fn test_empty_sheet() {
        let wb = Workbook::new();
        let grid = Grid::from_worksheet(&wb, wb.worksheet(0).unwrap());
        assert!(grid.is_empty());
        assert_eq!(grid.max_column_count(), 0);
    }
}
