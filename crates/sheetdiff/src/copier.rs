//! Copying a sheet's layout, styles and values into another document

use sheetdiff_core::{CellData, StyleHandle, Workbook, Worksheet, NO_STYLE};

use crate::grid::Grid;
use crate::progress::ProgressSink;
use crate::style::StyleCache;

/// What a copy carried over
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopySummary {
    pub column_widths: usize,
    pub row_heights: usize,
    pub merges: usize,
    pub cells: usize,
    /// Sub-steps that failed and were left out
    pub failures: Vec<String>,
}

/// Copies one sheet into a sheet of another document.
///
/// Styles are registered in the target document verbatim through a cache
/// local to the copier, separate from any highlight-style cache. Every step
/// is allowed to fail on its own: the failure is reported and the copy
/// carries on with the next step.
#[derive(Debug)]
pub struct SheetCopier<'a> {
    source_book: &'a Workbook,
    source: &'a Worksheet,
    cache: StyleCache,
}

impl<'a> SheetCopier<'a> {
    pub fn new(source_book: &'a Workbook, source: &'a Worksheet) -> Self {
        Self {
            source_book,
            source,
            cache: StyleCache::new(),
        }
    }

    /// Copy into sheet `target` of `output`.
    ///
    /// `grid` is the text view of the source sheet; widths are copied for its
    /// populated columns and heights for its populated rows.
    pub fn copy_into(
        &mut self,
        grid: &Grid,
        output: &mut Workbook,
        target: usize,
        progress: &mut dyn ProgressSink,
    ) -> CopySummary {
        let mut summary = CopySummary::default();
        let source = self.source;

        // Styles are registered before the target sheet is borrowed
        let cells: Vec<(u32, u16, CellData)> = source
            .iter_cells()
            .map(|(row, col, cell)| {
                let style = self.translate_style(cell.style, output);
                (row, col, CellData::with_style(cell.value.clone(), style))
            })
            .collect();

        let Some(sheet) = output.worksheet_mut(target) else {
            let message = format!("output sheet {} does not exist", target);
            tracing::warn!("{}", message);
            progress.status(&message);
            summary.failures.push(message);
            return summary;
        };
        let sheet_name = sheet.name().to_string();
        let mut fail = |summary: &mut CopySummary, message: String| {
            tracing::warn!(sheet = %sheet_name, "{}", message);
            progress.status(&message);
            summary.failures.push(message);
        };

        // Column widths
        for col in 0..grid.max_column_count() {
            let Some(width) = u16::try_from(col).ok().and_then(|c| source.column_width(c)) else {
                continue;
            };
            match sheet.set_column_width(col as u16, width) {
                Ok(()) => summary.column_widths += 1,
                Err(e) => fail(&mut summary, format!("copying column width failed: {}", e)),
            }
        }

        // Row heights
        let row_bound = u32::try_from(grid.row_count()).unwrap_or(u32::MAX);
        for (&row, &height) in source.custom_row_heights().range(..row_bound) {
            match sheet.set_row_height(row, height) {
                Ok(()) => summary.row_heights += 1,
                Err(e) => fail(&mut summary, format!("copying row height failed: {}", e)),
            }
        }

        // Merged ranges
        for range in source.merged_regions() {
            match sheet.merge_cells(range) {
                Ok(()) => summary.merges += 1,
                Err(e) => fail(&mut summary, format!("copying merge {range} failed: {e}")),
            }
        }

        // Values and styles
        for (row, col, data) in cells {
            match sheet.set_cell_at(row, col, data) {
                Ok(()) => summary.cells += 1,
                Err(e) => fail(&mut summary, format!("copying cell failed: {}", e)),
            }
        }

        tracing::debug!(
            sheet = %sheet_name,
            cells = summary.cells,
            merges = summary.merges,
            "sheet copied"
        );
        summary
    }

    fn translate_style(&mut self, handle: StyleHandle, output: &mut Workbook) -> StyleHandle {
        if handle == NO_STYLE {
            return NO_STYLE;
        }
        let source_book = self.source_book;
        self.cache
            .get_or_translate(handle, || {
                source_book
                    .style(handle)
                    .map(|style| output.register_style(style.clone()))
            })
            .unwrap_or(NO_STYLE)
    }
}
