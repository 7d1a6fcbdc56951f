//! Cell-by-cell comparison of two grids

use sheetdiff_core::{CellAddress, StyleHandle};

use crate::grid::Grid;

/// One cell whose text differs between the two grids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRecord {
    pub address: CellAddress,
    pub old_value: String,
    pub new_value: String,
    /// Style of the cell in the document highlight styles are derived from
    pub source_style: Option<StyleHandle>,
}

impl DiffRecord {
    pub fn with_source_style(mut self, style: StyleHandle) -> Self {
        self.source_style = Some(style);
        self
    }
}

/// A visited cell position with the text on both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellVisit<'a> {
    pub address: CellAddress,
    pub old_value: &'a str,
    pub new_value: &'a str,
}

impl<'a> CellVisit<'a> {
    /// Exact text comparison; no trimming or type coercion
    pub fn is_difference(&self) -> bool {
        self.old_value != self.new_value
    }

    pub fn to_record(&self) -> DiffRecord {
        DiffRecord {
            address: self.address,
            old_value: self.old_value.to_string(),
            new_value: self.new_value.to_string(),
            source_style: None,
        }
    }
}

/// Walks two grids in lock-step, row-major.
///
/// Rows run to the longer of the two grids. Within a row, columns run to the
/// wider of that row on either side, so the bound is per row, not per sheet.
#[derive(Debug, Clone)]
pub struct CellWalk<'a> {
    old: &'a Grid,
    new: &'a Grid,
    row_bound: usize,
    row: usize,
    col: usize,
    col_bound: usize,
}

impl<'a> CellWalk<'a> {
    pub fn new(old: &'a Grid, new: &'a Grid) -> Self {
        let mut walk = Self {
            old,
            new,
            row_bound: old.row_count().max(new.row_count()),
            row: 0,
            col: 0,
            col_bound: 0,
        };
        walk.col_bound = walk.width_of(0);
        walk
    }

    fn width_of(&self, row: usize) -> usize {
        self.old.row_width(row).max(self.new.row_width(row))
    }

    /// Only the visits whose texts differ
    pub fn differences(self) -> Differences<'a> {
        Differences { walk: self }
    }
}

impl<'a> Iterator for CellWalk<'a> {
    type Item = CellVisit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.row < self.row_bound {
            if self.col < self.col_bound {
                let (row, col) = (self.row, self.col);
                self.col += 1;
                return Some(CellVisit {
                    // Grids never exceed the sheet limits
                    address: CellAddress::new(row as u32, col as u16),
                    old_value: self.old.value_at(row, col),
                    new_value: self.new.value_at(row, col),
                });
            }
            self.row += 1;
            self.col = 0;
            self.col_bound = self.width_of(self.row);
        }
        None
    }
}

/// Lazy sequence of [`DiffRecord`]s between two grids
#[derive(Debug, Clone)]
pub struct Differences<'a> {
    walk: CellWalk<'a>,
}

impl Iterator for Differences<'_> {
    type Item = DiffRecord;

    fn next(&mut self) -> Option<DiffRecord> {
        self.walk
            .by_ref()
            .find(CellVisit::is_difference)
            .map(|visit| visit.to_record())
    }
}

/// Differences between `old` and `new`, in row-major order
pub fn diff_grids<'a>(old: &'a Grid, new: &'a Grid) -> Differences<'a> {
    CellWalk::new(old, new).differences()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addresses(records: &[DiffRecord]) -> Vec<String> {
        records.iter().map(|r| r.address.to_string()).collect()
    }

    #[test]
    fn test_single_changed_cell() {
        let a = Grid::from_rows(vec![vec!["x", "y"], vec!["1", "2"]]);
        let b = Grid::from_rows(vec![vec!["x", "z"], vec!["1", "2"]]);

        let diffs: Vec<_> = diff_grids(&a, &b).collect();
        assert_eq!(
            diffs,
            vec![DiffRecord {
                address: CellAddress::new(0, 1),
                old_value: "y".into(),
                new_value: "z".into(),
                source_style: None,
            }]
        );
    }

    #[test]
    fn test_extra_rows_and_columns_are_reported() {
        let a = Grid::from_rows(vec![vec!["a"], vec!["b"]]);
        let b = Grid::from_rows(vec![vec!["a", "new"], vec!["b"], vec!["c", "d"]]);

        let diffs: Vec<_> = diff_grids(&a, &b).collect();
        assert_eq!(addresses(&diffs), vec!["B1", "A3", "B3"]);
        assert!(diffs.iter().all(|d| d.old_value.is_empty()));
    }

    #[test]
    fn test_column_bound_is_per_row() {
        // Row 1 is narrow on both sides even though row 0 is wide
        let a = Grid::from_rows(vec![vec!["1", "2", "3", "4"], vec!["x"]]);
        let b = Grid::from_rows(vec![vec!["1", "2", "3", "4"], vec!["x"]]);

        let visited: Vec<String> = CellWalk::new(&a, &b)
            .map(|v| v.address.to_string())
            .collect();
        assert_eq!(visited, vec!["A1", "B1", "C1", "D1", "A2"]);
    }

    #[test]
    fn test_exact_string_equality() {
        let a = Grid::from_rows(vec![vec!["1.0", "abc", " x"]]);
        let b = Grid::from_rows(vec![vec!["1", "ABC", "x"]]);
        assert_eq!(diff_grids(&a, &b).count(), 3);
    }

    #[test]
    fn test_empty_rows_are_skipped() {
        let a = Grid::from_rows(vec![vec!["a"], vec![], vec![], vec!["b"]]);
        let b = Grid::from_rows(vec![vec!["a"]]);

        let visits: Vec<_> = CellWalk::new(&a, &b).collect();
        assert_eq!(visits.len(), 2);
        let diffs: Vec<_> = diff_grids(&a, &b).collect();
        assert_eq!(addresses(&diffs), vec!["A4"]);
        assert_eq!(diffs[0].new_value, "");
    }

    #[test]
    fn test_empty_grids() {
        let empty = Grid::default();
        assert_eq!(CellWalk::new(&empty, &empty).count(), 0);
    }
}
