//! Comparison runs: single sheet, name-mapped sheets and explicit sheet pairs
//!
//! Every run opens both documents, builds the output document, diffs each
//! selected pair of sheets into it, then saves the output and writes the
//! change log. Differences are collected for a whole sheet first and applied
//! afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use sheetdiff_core::{
    CellAddress, CellComment, CellData, CellValue, Color, CommentRun, Workbook, Worksheet,
};

use crate::copier::SheetCopier;
use crate::differ::{CellWalk, DiffRecord};
use crate::error::{DiffError, DocumentRole, Result};
use crate::grid::Grid;
use crate::options::{CompareOptions, SheetPair, SheetSelection};
use crate::progress::ProgressSink;
use crate::report::{ChangeLog, RunSummary, SectionSummary};
use crate::storage::Storage;
use crate::style::{FormatPolicy, StyleCache, StyleResolver};

/// Label of the bold first run of an old-value note
pub const OLD_VALUE_LABEL: &str = "Old value:\n";

/// Color of the old-value label
pub const OLD_VALUE_LABEL_COLOR: Color = Color::rgb(0x6C, 0x08, 0x08);

/// Size of an old-value note, in points
pub const OLD_VALUE_NOTE_SIZE: (f64, f64) = (180.0, 40.0);

/// Run a comparison described by `selection`
pub fn compare<S: Storage + ?Sized>(
    storage: &mut S,
    options: &CompareOptions,
    selection: &SheetSelection,
    progress: &mut dyn ProgressSink,
) -> Result<RunSummary> {
    DiffRunner::new(storage, progress).run(options, selection)
}

/// Drives comparison runs against a [`Storage`]
pub struct DiffRunner<'a, S: Storage + ?Sized> {
    storage: &'a mut S,
    progress: &'a mut dyn ProgressSink,
}

impl<'a, S: Storage + ?Sized> DiffRunner<'a, S> {
    pub fn new(storage: &'a mut S, progress: &'a mut dyn ProgressSink) -> Self {
        Self { storage, progress }
    }

    pub fn run(
        &mut self,
        options: &CompareOptions,
        selection: &SheetSelection,
    ) -> Result<RunSummary> {
        match selection {
            SheetSelection::Single {
                source_sheet,
                comparison_sheet,
            } => self.compare_single(options, source_sheet, comparison_sheet),
            SheetSelection::Mapped { mapping } => self.compare_mapped(options, mapping),
            SheetSelection::Paired { pairs } => self.compare_pairs(options, pairs),
        }
    }

    /// Compare one sheet of each document.
    ///
    /// With preserved formatting the output is a copy of the source document
    /// in which only differing cells are rewritten. Otherwise the output is a
    /// new document holding every visited cell of the comparison sheet.
    pub fn compare_single(
        &mut self,
        options: &CompareOptions,
        source_sheet: &str,
        comparison_sheet: &str,
    ) -> Result<RunSummary> {
        tracing::info!(
            source = %options.source.display(),
            comparison = %options.comparison.display(),
            source_sheet,
            comparison_sheet,
            "single-sheet comparison"
        );
        let preserve = options.preserve_formatting;

        let source = self.open(DocumentRole::Source, &options.source)?;
        let comparison = self.open(DocumentRole::Comparison, &options.comparison)?;
        let src_sheet = read_sheet(&source, DocumentRole::Source, source_sheet)?;
        let cmp_sheet = read_sheet(&comparison, DocumentRole::Comparison, comparison_sheet)?;
        let old = Grid::from_worksheet(&source, src_sheet);
        let new = Grid::from_worksheet(&comparison, cmp_sheet);

        let color = highlight_color(options)?;
        let mut output = self.output_base(options)?;
        let target = if preserve {
            output
                .sheet_index(src_sheet.name())
                .ok_or_else(|| DiffError::ReadSheet {
                    role: DocumentRole::Output,
                    sheet: src_sheet.name().to_string(),
                    source: sheetdiff_core::Error::SheetNotFound(src_sheet.name().to_string()),
                })?
        } else {
            0
        };

        let resolver = StyleResolver::new(
            FormatPolicy::from_preserve_flag(preserve),
            color,
            &source,
            &mut output,
        );
        let mut cache = StyleCache::new();

        self.status(&format!(
            "source sheet '{}': {} rows",
            src_sheet.name(),
            old.row_count()
        ));
        self.status(&format!(
            "comparison sheet '{}': {} rows",
            cmp_sheet.name(),
            new.row_count()
        ));

        let label = src_sheet.name();
        let mut log = ChangeLog::new();
        log.begin_section(label);
        let differences = apply_sheet_diff(
            &SheetDiff {
                label,
                old: &old,
                new: &new,
                style_sheet: preserve.then_some(src_sheet),
                target,
                write_all: !preserve,
            },
            &mut output,
            &resolver,
            &mut cache,
            options,
            &mut log,
        )?;
        self.status(&format!("{}: {} differences", label, differences));

        let mut summary = RunSummary::default();
        summary.push(SectionSummary::compared(label, differences));
        self.finish(options, &output, log, summary)
    }

    /// Compare sheets matched by name.
    ///
    /// Each mapped source sheet is written to the output sheet of the same
    /// name. A pair whose sheets cannot be read is reported and skipped.
    pub fn compare_mapped(
        &mut self,
        options: &CompareOptions,
        mapping: &BTreeMap<String, String>,
    ) -> Result<RunSummary> {
        tracing::info!(
            source = %options.source.display(),
            comparison = %options.comparison.display(),
            sheets = mapping.len(),
            "mapped comparison"
        );
        let preserve = options.preserve_formatting;

        let source = self.open(DocumentRole::Source, &options.source)?;
        let comparison = self.open(DocumentRole::Comparison, &options.comparison)?;
        let color = highlight_color(options)?;
        let mut output = self.output_base(options)?;

        let resolver = StyleResolver::new(
            FormatPolicy::from_preserve_flag(preserve),
            color,
            &source,
            &mut output,
        );
        let mut cache = StyleCache::new();
        let mut log = ChangeLog::new();
        let mut summary = RunSummary::default();
        // A fresh output's default sheet is taken over by the first pair
        let mut default_sheet_free = !preserve;

        self.status(&format!("comparing {} sheet(s)", mapping.len()));

        for (src_name, cmp_name) in mapping {
            self.status(&format!("comparing {} → {}", src_name, cmp_name));

            let src_sheet = match read_sheet(&source, DocumentRole::Source, src_name) {
                Ok(ws) => ws,
                Err(e) => {
                    self.skip(&mut summary, src_name, e.to_string());
                    continue;
                }
            };
            let cmp_sheet = match read_sheet(&comparison, DocumentRole::Comparison, cmp_name) {
                Ok(ws) => ws,
                Err(e) => {
                    self.skip(&mut summary, src_name, e.to_string());
                    continue;
                }
            };

            let target = if preserve {
                output.sheet_index(src_name).ok_or_else(|| {
                    format!("output document has no sheet '{}'", src_name)
                })
            } else {
                get_or_create_sheet(&mut output, src_name, &mut default_sheet_free)
                    .map_err(|e| format!("cannot create output sheet '{src_name}': {e}"))
            };
            let target = match target {
                Ok(index) => index,
                Err(reason) => {
                    self.skip(&mut summary, src_name, reason);
                    continue;
                }
            };

            let old = Grid::from_worksheet(&source, src_sheet);
            let new = Grid::from_worksheet(&comparison, cmp_sheet);
            log.begin_section(src_name);
            let differences = apply_sheet_diff(
                &SheetDiff {
                    label: src_name,
                    old: &old,
                    new: &new,
                    style_sheet: preserve.then_some(src_sheet),
                    target,
                    write_all: !preserve,
                },
                &mut output,
                &resolver,
                &mut cache,
                options,
                &mut log,
            )?;

            self.status(&format!("sheet '{src_name}': {differences} differences"));
            summary.push(SectionSummary::compared(src_name.as_str(), differences));
        }

        self.finish(options, &output, log, summary)
    }

    /// Compare explicit sheet pairs, each into its own output sheet.
    ///
    /// The output starts as a new document. With preserved formatting each
    /// output sheet is first a copy of its comparison sheet; otherwise it
    /// receives only the comparison sheet's text. One style cache serves all
    /// pairs since they share the output document.
    pub fn compare_pairs(
        &mut self,
        options: &CompareOptions,
        pairs: &[SheetPair],
    ) -> Result<RunSummary> {
        if pairs.is_empty() {
            return Err(DiffError::NoSheetPairs);
        }
        tracing::info!(
            source = %options.source.display(),
            comparison = %options.comparison.display(),
            pairs = pairs.len(),
            "paired comparison"
        );
        let preserve = options.preserve_formatting;

        let source = self.open(DocumentRole::Source, &options.source)?;
        let comparison = self.open(DocumentRole::Comparison, &options.comparison)?;
        let mut output = Workbook::new();

        let color = highlight_color(options)?;
        let resolver = StyleResolver::new(
            FormatPolicy::from_preserve_flag(preserve),
            color,
            &comparison,
            &mut output,
        );
        let mut cache = StyleCache::new();
        let mut log = ChangeLog::new();
        let mut summary = RunSummary::default();
        let mut default_sheet_free = true;

        self.status(&format!("comparing {} sheet pair(s)", pairs.len()));

        for pair in pairs {
            let label = pair.label();
            self.status(&format!(
                "comparing {} → {} as '{}'",
                pair.source_sheet, pair.comparison_sheet, label
            ));

            let src_sheet = match read_sheet(&source, DocumentRole::Source, &pair.source_sheet) {
                Ok(ws) => ws,
                Err(e) => {
                    self.skip(&mut summary, label, e.to_string());
                    continue;
                }
            };
            let cmp_sheet = match read_sheet(
                &comparison,
                DocumentRole::Comparison,
                &pair.comparison_sheet,
            ) {
                Ok(ws) => ws,
                Err(e) => {
                    self.skip(&mut summary, label, e.to_string());
                    continue;
                }
            };

            let created = if default_sheet_free {
                output.rename_worksheet(0, label).map(|()| 0)
            } else {
                output.add_worksheet_with_name(label)
            };
            let target = match created {
                Ok(index) => {
                    default_sheet_free = false;
                    index
                }
                Err(e) => {
                    let reason = format!("cannot create output sheet '{}': {}", label, e);
                    self.skip(&mut summary, label, reason);
                    continue;
                }
            };

            let old = Grid::from_worksheet(&source, src_sheet);
            let new = Grid::from_worksheet(&comparison, cmp_sheet);

            if preserve {
                let copy = SheetCopier::new(&comparison, cmp_sheet).copy_into(
                    &new,
                    &mut output,
                    target,
                    &mut *self.progress,
                );
                if !copy.failures.is_empty() {
                    self.status(&format!(
                        "'{}': {} copy step(s) skipped",
                        label,
                        copy.failures.len()
                    ));
                }
            } else {
                write_grid(&new, &mut output, target, label)?;
            }

            log.begin_section(label);
            let differences = apply_sheet_diff(
                &SheetDiff {
                    label,
                    old: &old,
                    new: &new,
                    style_sheet: preserve.then_some(cmp_sheet),
                    target,
                    write_all: false,
                },
                &mut output,
                &resolver,
                &mut cache,
                options,
                &mut log,
            )?;

            self.status(&format!("pair '{}': {} differences", label, differences));
            summary.push(SectionSummary::compared(label, differences));
        }

        self.finish(options, &output, log, summary)
    }

    fn status(&mut self, line: &str) {
        self.progress.status(line);
    }

    fn skip(&mut self, summary: &mut RunSummary, label: &str, reason: String) {
        tracing::warn!(sheet = label, "skipped: {}", reason);
        self.status(&format!("skipped '{}': {}", label, reason));
        summary.push(SectionSummary::skipped(label, reason));
    }

    fn open(&self, role: DocumentRole, path: &Path) -> Result<Workbook> {
        self.storage.open(path).map_err(|source| DiffError::Open {
            role,
            path: path.to_path_buf(),
            source,
        })
    }

    /// The document differences are written into
    fn output_base(&mut self, options: &CompareOptions) -> Result<Workbook> {
        if !options.preserve_formatting {
            return Ok(Workbook::new());
        }
        self.status("copying source document as output base");
        self.storage
            .copy(&options.source, &options.output)
            .map_err(|source| DiffError::CopyBase {
                path: options.output.clone(),
                source,
            })?;
        self.open(DocumentRole::Output, &options.output)
    }

    fn finish(
        &mut self,
        options: &CompareOptions,
        output: &Workbook,
        log: ChangeLog,
        summary: RunSummary,
    ) -> Result<RunSummary> {
        self.status(&format!("total differences: {}", summary.total));

        self.storage
            .save(output, &options.output)
            .map_err(|source| DiffError::Save {
                path: options.output.clone(),
                source,
            })?;
        tracing::info!(path = %options.output.display(), "output document saved");

        self.storage
            .write_log(&options.log, &log.into_bytes())
            .map_err(|source| DiffError::WriteLog {
                path: options.log.clone(),
                source,
            })?;
        tracing::debug!(path = %options.log.display(), "change log written");

        Ok(summary)
    }
}

/// One sheet pair being diffed into the output document
struct SheetDiff<'g> {
    label: &'g str,
    old: &'g Grid,
    new: &'g Grid,
    /// Sheet whose cell styles highlight styles are derived from
    style_sheet: Option<&'g Worksheet>,
    /// Output sheet index
    target: usize,
    /// Also write cells whose text did not change
    write_all: bool,
}

/// Diff one sheet pair into the output and log it; returns the number of
/// differences.
fn apply_sheet_diff(
    diff: &SheetDiff<'_>,
    output: &mut Workbook,
    resolver: &StyleResolver<'_>,
    cache: &mut StyleCache,
    options: &CompareOptions,
    log: &mut ChangeLog,
) -> Result<usize> {
    let sheet_name = output
        .worksheet(diff.target)
        .map(|ws| ws.name().to_string())
        .unwrap_or_default();

    // Collect
    let mut records: Vec<DiffRecord> = Vec::new();
    for visit in CellWalk::new(diff.old, diff.new) {
        if visit.is_difference() {
            let record = visit.to_record();
            records.push(match diff.style_sheet {
                Some(sheet) => {
                    let style = sheet.style_at(visit.address.row, visit.address.col);
                    record.with_source_style(style)
                }
                None => record,
            });
        } else if diff.write_all {
            let value = text_value(visit.new_value);
            set_value(output, diff.target, &sheet_name, visit.address, value)?;
        }
    }

    // Apply
    for record in &records {
        let style = resolver.resolve(record.source_style, output, cache);
        let address = record.address;
        let data = CellData::with_style(text_value(&record.new_value), style);
        let sheet = output_sheet(output, diff.target, &sheet_name, address)?;
        sheet
            .set_cell_at(address.row, address.col, data)
            .map_err(|source| write_error(&sheet_name, address, source))?;

        if options.show_old_in_comment && !record.old_value.is_empty() {
            let note = old_value_note(&options.comment_author, &record.old_value);
            sheet
                .set_comment_at(address.row, address.col, note)
                .map_err(|source| write_error(&sheet_name, address, source))?;
        }

        log.record(diff.label, record);
    }

    Ok(records.len())
}

/// The note attached to a differing cell when old values are shown
pub fn old_value_note(author: &str, old_value: &str) -> CellComment {
    let (width, height) = OLD_VALUE_NOTE_SIZE;
    CellComment::new(author)
        .with_run(
            CommentRun::bold(OLD_VALUE_LABEL).with_color(OLD_VALUE_LABEL_COLOR),
        )
        .with_run(CommentRun::plain(old_value))
        .with_size(width, height)
}

/// Write the non-empty texts of a grid
fn write_grid(grid: &Grid, output: &mut Workbook, target: usize, sheet_name: &str) -> Result<()> {
    for (row, cells) in grid.rows().enumerate() {
        for (col, text) in cells.iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            let address = CellAddress::new(row as u32, col as u16);
            let value = CellValue::string(text.as_str());
            set_value(output, target, sheet_name, address, value)?;
        }
    }
    Ok(())
}

/// Values are written as text; an empty text leaves an empty cell
fn text_value(text: &str) -> CellValue {
    if text.is_empty() {
        CellValue::Empty
    } else {
        CellValue::string(text)
    }
}

fn set_value(
    output: &mut Workbook,
    target: usize,
    sheet_name: &str,
    address: CellAddress,
    value: CellValue,
) -> Result<()> {
    output_sheet(output, target, sheet_name, address)?
        .set_value_at(address.row, address.col, value)
        .map_err(|source| write_error(sheet_name, address, source))
}

fn output_sheet<'w>(
    output: &'w mut Workbook,
    target: usize,
    sheet_name: &str,
    address: CellAddress,
) -> Result<&'w mut Worksheet> {
    let count = output.sheet_count();
    output.worksheet_mut(target).ok_or_else(|| {
        let source = sheetdiff_core::Error::SheetOutOfBounds(target, count);
        write_error(sheet_name, address, source)
    })
}

fn write_error(sheet: &str, address: CellAddress, source: sheetdiff_core::Error) -> DiffError {
    DiffError::WriteCell {
        sheet: sheet.to_string(),
        address,
        source,
    }
}

fn read_sheet<'w>(workbook: &'w Workbook, role: DocumentRole, name: &str) -> Result<&'w Worksheet> {
    workbook
        .require_worksheet(name)
        .map_err(|source| DiffError::ReadSheet {
            role,
            sheet: name.to_string(),
            source,
        })
}

fn highlight_color(options: &CompareOptions) -> Result<Color> {
    options
        .highlight()
        .map_err(|source| DiffError::HighlightStyle {
            spec: options.highlight_color.clone(),
            source,
        })
}

/// Index of the output sheet called `name`, creating it if needed.
///
/// While `default_free` is set, the document's untouched default sheet is
/// renamed instead of adding a new one.
fn get_or_create_sheet(
    output: &mut Workbook,
    name: &str,
    default_free: &mut bool,
) -> sheetdiff_core::Result<usize> {
    if *default_free {
        output.rename_worksheet(0, name)?;
        *default_free = false;
        return Ok(0);
    }
    match output.sheet_index(name) {
        Some(index) => Ok(index),
        None => output.add_worksheet_with_name(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;
    use sheetdiff_core::{FillStyle, Style, NO_STYLE};

    fn book(rows: &[&[&str]]) -> Workbook {
        let mut wb = Workbook::new();
        let ws = wb.worksheet_mut(0).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, text) in row.iter().enumerate() {
                if !text.is_empty() {
                    ws.set_value_at(r as u32, c as u16, *text).unwrap();
                }
            }
        }
        wb
    }

    fn storage_with(a: Workbook, b: Workbook) -> MemoryStorage {
        let mut storage = MemoryStorage::new();
        storage.insert_workbook("a.xlsx", a);
        storage.insert_workbook("b.xlsx", b);
        storage
    }

    fn options() -> CompareOptions {
        CompareOptions::new("a.xlsx", "b.xlsx", "out.xlsx", "out.txt")
    }

    #[test]
    fn test_fresh_single_writes_every_visited_cell() {
        let mut storage = storage_with(
            book(&[&["x", "y"], &["1", "2"]]),
            book(&[&["x", "z"], &["1", "2"], &["a", "b"]]),
        );

        let summary = DiffRunner::new(&mut storage, &mut NoProgress)
            .compare_single(&options(), "Sheet1", "Sheet1")
            .unwrap();
        assert_eq!(summary.total, 3);

        let out = storage.workbook("out.xlsx").unwrap();
        let ws = out.worksheet(0).unwrap();
        assert_eq!(ws.value_at(0, 0).as_string(), Some("x"));
        assert_eq!(ws.value_at(0, 1).as_string(), Some("z"));
        assert_eq!(ws.value_at(2, 1).as_string(), Some("b"));
        // Unchanged cells are written without highlight
        assert_eq!(ws.style_at(0, 0), NO_STYLE);
        let highlight = out.style(ws.style_at(0, 1)).unwrap();
        assert_eq!(highlight.fill, FillStyle::solid(Color::YELLOW));
        assert_eq!(ws.comment_count(), 0);

        assert_eq!(
            storage.log("out.txt").unwrap(),
            "=== Sheet1 ===\nSheet1: B1: y → z\nSheet1: A3:  → a\nSheet1: B3:  → b\n"
        );
    }

    #[test]
    fn test_preserve_single_keeps_source_and_styles() {
        let mut source = book(&[&["name", "qty"], &["bolts", "10"]]);
        let bold = source.register_style(Style::new().bold(true));
        let ws = source.worksheet_mut(0).unwrap();
        ws.set_style_at(1, 1, bold).unwrap();
        ws.set_value("D9", "only in source").unwrap();
        let comparison = book(&[&["name", "qty"], &["bolts", "12"]]);
        let mut storage = storage_with(source, comparison);

        let opts = options()
            .with_preserve_formatting(true)
            .with_show_old_in_comment(true);
        let mut lines: Vec<String> = Vec::new();
        let summary = DiffRunner::new(&mut storage, &mut lines)
            .compare_single(&opts, "Sheet1", "Sheet1")
            .unwrap();

        // D9 differs too: present in source only
        assert_eq!(summary.total, 2);
        assert_eq!(lines[0], "copying source document as output base");

        let out = storage.workbook("out.xlsx").unwrap();
        let ws = out.worksheet(0).unwrap();
        assert_eq!(ws.value_at(1, 1).as_string(), Some("12"));
        let style = out.style(ws.style_at(1, 1)).unwrap();
        assert!(style.font.bold);
        assert_eq!(style.fill, FillStyle::solid(Color::YELLOW));
        assert_eq!(ws.comment_at(1, 1).unwrap().text(), "Old value:\n10");

        // Cleared cell keeps the highlight, gets a note with the old text
        assert!(ws.value_at(8, 3).is_empty());
        assert_ne!(ws.style_at(8, 3), NO_STYLE);
        assert_eq!(ws.comment_at(8, 3).unwrap().runs[1].text, "only in source");
    }

    #[test]
    fn test_no_note_for_empty_old_value() {
        let mut storage = storage_with(book(&[&["a"]]), book(&[&["a", "new"]]));
        let opts = options().with_show_old_in_comment(true);

        DiffRunner::new(&mut storage, &mut NoProgress)
            .compare_single(&opts, "Sheet1", "Sheet1")
            .unwrap();

        let ws = storage.workbook("out.xlsx").unwrap().worksheet(0).unwrap();
        assert_eq!(ws.value_at(0, 1).as_string(), Some("new"));
        assert!(ws.comment_at(0, 1).is_none());
    }

    #[test]
    fn test_old_value_note() {
        let note = old_value_note("me", "42");
        assert_eq!(note.author, "me");
        assert_eq!(note.runs.len(), 2);
        assert!(note.runs[0].bold);
        assert_eq!(note.runs[0].color, Some(Color::rgb(0x6C, 0x08, 0x08)));
        assert!(note.runs[1].is_plain());
        assert_eq!((note.width, note.height), (180.0, 40.0));
    }

    #[test]
    fn test_fatal_errors() {
        let mut storage = storage_with(book(&[&["a"]]), book(&[&["a"]]));

        let missing = CompareOptions::new("nope.xlsx", "b.xlsx", "out.xlsx", "out.txt");
        let err = DiffRunner::new(&mut storage, &mut NoProgress)
            .compare_single(&missing, "Sheet1", "Sheet1")
            .unwrap_err();
        assert!(matches!(
            err,
            DiffError::Open {
                role: DocumentRole::Source,
                ..
            }
        ));

        let err = DiffRunner::new(&mut storage, &mut NoProgress)
            .compare_single(&options(), "Sheet1", "Missing")
            .unwrap_err();
        assert!(matches!(
            err,
            DiffError::ReadSheet {
                role: DocumentRole::Comparison,
                ..
            }
        ));

        let bad_color = options().with_highlight_color("#12");
        let err = DiffRunner::new(&mut storage, &mut NoProgress)
            .compare_single(&bad_color, "Sheet1", "Sheet1")
            .unwrap_err();
        assert!(matches!(err, DiffError::HighlightStyle { .. }));

        let err = DiffRunner::new(&mut storage, &mut NoProgress)
            .compare_pairs(&options(), &[])
            .unwrap_err();
        assert!(matches!(err, DiffError::NoSheetPairs));
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn test_bad_color_leaves_output_untouched() {
        let mut storage = storage_with(book(&[&["a"]]), book(&[&["b"]]));
        let opts = options()
            .with_preserve_formatting(true)
            .with_highlight_color("yellow");

        let err = DiffRunner::new(&mut storage, &mut NoProgress)
            .compare_single(&opts, "Sheet1", "Sheet1")
            .unwrap_err();
        assert!(matches!(err, DiffError::HighlightStyle { .. }));

        let mapping = BTreeMap::from([("Sheet1".to_string(), "Sheet1".to_string())]);
        let err = DiffRunner::new(&mut storage, &mut NoProgress)
            .compare_mapped(&opts, &mapping)
            .unwrap_err();
        assert!(matches!(err, DiffError::HighlightStyle { .. }));

        assert!(storage.workbook("out.xlsx").is_none());
    }

    #[test]
    fn test_get_or_create_sheet() {
        let mut wb = Workbook::new();
        let mut free = true;

        assert_eq!(get_or_create_sheet(&mut wb, "Jan", &mut free).unwrap(), 0);
        assert!(!free);
        assert_eq!(get_or_create_sheet(&mut wb, "Feb", &mut free).unwrap(), 1);
        assert_eq!(get_or_create_sheet(&mut wb, "jan", &mut free).unwrap(), 0);
        assert_eq!(wb.sheet_names(), vec!["Jan", "Feb"]);
    }
}
