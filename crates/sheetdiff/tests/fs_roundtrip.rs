//! Comparison runs on real files

use pretty_assertions::assert_eq;
use sheetdiff::prelude::*;
use sheetdiff::{DocumentRole, StorageError};
use sheetdiff_core::{CellRange, Style};
use sheetdiff_xlsx::{XlsxReader, XlsxWriter};

fn write_book(path: &std::path::Path, rows: &[&[&str]]) -> Workbook {
    let mut wb = Workbook::new();
    let ws = wb.worksheet_mut(0).unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, text) in row.iter().enumerate() {
            ws.set_value_at(r as u32, c as u16, *text).unwrap();
        }
    }
    XlsxWriter::write_file(&wb, path).unwrap();
    wb
}

#[test]
fn test_preserve_run_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("old.xlsx");
    let new = dir.path().join("new.xlsx");
    let out = dir.path().join("diff.xlsx");
    let log = dir.path().join("diff.txt");

    let mut source = Workbook::new();
    let header = source.register_style(Style::new().bold(true));
    {
        let ws = source.worksheet_mut(0).unwrap();
        ws.set_value("A1", "Item").unwrap();
        ws.set_value("B1", "Price").unwrap();
        ws.set_style_at(0, 1, header).unwrap();
        ws.set_value("A2", "bolts").unwrap();
        ws.set_value("B2", 1.5).unwrap();
        ws.set_column_width(0, 25.0).unwrap();
        ws.merge_cells(&CellRange::parse("D1:E1").unwrap()).unwrap();
    }
    XlsxWriter::write_file(&source, &old).unwrap();
    write_book(&new, &[&["Item", "Cost"], &["bolts", "1.5"]]);

    let options = CompareOptions::new(&old, &new, &out, &log)
        .with_preserve_formatting(true)
        .with_show_old_in_comment(true);
    let selection = SheetSelection::Single {
        source_sheet: "Sheet1".into(),
        comparison_sheet: "Sheet1".into(),
    };
    let summary = compare(&mut FsStorage::new(), &options, &selection, &mut NoProgress).unwrap();
    assert_eq!(summary.total, 1);

    assert_eq!(
        std::fs::read_to_string(&log).unwrap(),
        "=== Sheet1 ===\nSheet1: B1: Price → Cost\n"
    );

    let result = XlsxReader::read_file(&out).unwrap();
    let ws = result.worksheet(0).unwrap();
    assert_eq!(ws.value_at(0, 1).as_string(), Some("Cost"));
    assert_eq!(ws.value_at(1, 1).as_number(), Some(1.5));
    assert_eq!(ws.column_width(0), Some(25.0));
    assert_eq!(ws.merged_regions().len(), 1);

    let style = result.style(ws.style_at(0, 1)).unwrap();
    assert!(style.font.bold);
    assert_eq!(style.fill, sheetdiff_core::FillStyle::solid(Color::YELLOW));
    assert_eq!(ws.comment_at(0, 1).unwrap().text(), "Old value:\nPrice");
}

#[test]
fn test_missing_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let new = dir.path().join("new.xlsx");
    write_book(&new, &[&["a"]]);

    let options = CompareOptions::new(
        dir.path().join("absent.xlsx"),
        &new,
        dir.path().join("diff.xlsx"),
        dir.path().join("diff.txt"),
    );
    let selection = SheetSelection::Single {
        source_sheet: "Sheet1".into(),
        comparison_sheet: "Sheet1".into(),
    };
    let err = compare(&mut FsStorage::new(), &options, &selection, &mut NoProgress).unwrap_err();
    assert!(err.to_string().contains("absent.xlsx"));

    match err {
        DiffError::Open {
            role: DocumentRole::Source,
            source: StorageError::NotFound(_),
            ..
        } => {}
        other => panic!("unexpected error {:?}", other),
    }
    assert!(!dir.path().join("diff.txt").exists());
}
