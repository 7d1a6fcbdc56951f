//! End-to-end tests for XLSX roundtrip (create -> save -> read -> verify)

use std::io::Cursor;

use pretty_assertions::assert_eq;
use sheetdiff_core::{
    BorderLineStyle, BorderStyle, CellComment, CellError, CellRange, CellValue, Color, CommentRun,
    FillStyle, HorizontalAlignment, NumberFormat, Style, Workbook, NO_STYLE,
};
use sheetdiff_xlsx::{XlsxReader, XlsxWriter};

fn roundtrip(wb: &Workbook) -> Workbook {
    let mut buf = Vec::new();
    XlsxWriter::write(wb, Cursor::new(&mut buf)).unwrap();
    XlsxReader::read(Cursor::new(&buf)).unwrap()
}

#[test]
fn test_roundtrip_numbers() {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();

    sheet.set_value("A1", 42.0).unwrap();
    sheet.set_value("B1", 1.23456).unwrap();
    sheet.set_value("C1", -100.5).unwrap();
    sheet.set_value("A2", 0.0).unwrap();
    sheet.set_value("B2", 1e10).unwrap();

    let wb2 = roundtrip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();

    assert_eq!(sheet2.value_at(0, 0).as_number(), Some(42.0));
    let fraction = sheet2.value_at(0, 1).as_number().unwrap();
    assert!((fraction - 1.23456).abs() < 1e-10);
    assert_eq!(sheet2.value_at(0, 2).as_number(), Some(-100.5));
    assert_eq!(sheet2.value_at(1, 0).as_number(), Some(0.0));
    assert_eq!(sheet2.value_at(1, 1).as_number(), Some(1e10));
}

#[test]
fn test_roundtrip_strings() {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();

    sheet.set_value("A1", "Hello, World!").unwrap();
    sheet.set_value("B1", "").unwrap();
    sheet.set_value("C1", "Special: <>&\"'").unwrap();
    sheet.set_value("A2", "Multi\nLine").unwrap();
    sheet.set_value("B2", "Unicode: \u{1F600}").unwrap();
    sheet.set_value("C2", "  padded  ").unwrap();
    sheet.set_value("D2", "cr\r\nlf").unwrap();
    sheet.set_value("E2", "literal _x000D_").unwrap();

    let wb2 = roundtrip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();

    assert_eq!(sheet2.value_at(0, 0).as_string(), Some("Hello, World!"));
    assert_eq!(sheet2.value_at(0, 1).as_string(), Some(""));
    assert_eq!(sheet2.value_at(0, 2).as_string(), Some("Special: <>&\"'"));
    assert_eq!(sheet2.value_at(1, 0).as_string(), Some("Multi\nLine"));
    assert_eq!(
        sheet2.value_at(1, 1).as_string(),
        Some("Unicode: \u{1F600}")
    );
    assert_eq!(sheet2.value_at(1, 2).as_string(), Some("  padded  "));
    assert_eq!(sheet2.value_at(1, 3).as_string(), Some("cr\r\nlf"));
    assert_eq!(sheet2.value_at(1, 4).as_string(), Some("literal _x000D_"));
}

#[test]
fn test_roundtrip_mixed_types() {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();

    sheet.set_value("A1", true).unwrap();
    sheet.set_value("B1", false).unwrap();
    sheet.set_value("C1", CellError::Na).unwrap();
    let sum = CellValue::formula("SUM(A2:A3)", Some(CellValue::Number(3.0)));
    let now = CellValue::formula("NOW()", None);
    sheet.set_value("D1", sum.clone()).unwrap();
    sheet.set_value("E1", now.clone()).unwrap();

    let wb2 = roundtrip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();

    assert_eq!(sheet2.value_at(0, 0), &CellValue::Boolean(true));
    assert_eq!(sheet2.value_at(0, 1), &CellValue::Boolean(false));
    assert_eq!(sheet2.value_at(0, 2), &CellValue::Error(CellError::Na));
    assert_eq!(sheet2.value_at(0, 3), &sum);
    assert_eq!(sheet2.value_at(0, 4), &now);
}

#[test]
fn test_roundtrip_multiple_sheets() {
    let mut wb = Workbook::new();
    wb.rename_worksheet(0, "Q1 & Q2").unwrap();
    wb.add_worksheet_with_name("Data's").unwrap();
    wb.add_worksheet_with_name("Empty").unwrap();
    wb.worksheet_mut(1).unwrap().set_value("C3", "x").unwrap();

    let wb2 = roundtrip(&wb);

    assert_eq!(wb2.sheet_names(), vec!["Q1 & Q2", "Data's", "Empty"]);
    let data = wb2.worksheet(1).unwrap();
    assert_eq!(data.value_at(2, 2).as_string(), Some("x"));
    assert!(wb2.worksheet(2).unwrap().is_empty());
}

#[test]
fn test_roundtrip_large_indices() {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.set_value("XFD1048576", "corner").unwrap();
    sheet.set_value("AA100", 1.0).unwrap();

    let wb2 = roundtrip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();

    assert_eq!(
        sheet2.value_at(1_048_575, 16_383).as_string(),
        Some("corner")
    );
    assert_eq!(sheet2.value_at(99, 26).as_number(), Some(1.0));
    assert_eq!(sheet2.cell_count(), 2);
}

#[test]
fn test_roundtrip_styles() {
    let mut wb = Workbook::new();
    let highlight = wb.register_style(Style::new().fill_color(Color::YELLOW));
    let header = wb.register_style(
        Style::new()
            .bold(true)
            .font_size(14.0)
            .font_color(Color::theme(1, -250))
            .horizontal_alignment(HorizontalAlignment::Center)
            .border(BorderStyle::all(BorderLineStyle::Thin, Color::BLACK)),
    );
    let percent = wb.register_style(Style::new().number_format(NumberFormat::BuiltIn(10)));
    let custom = wb.register_style(
        Style::new().number_format(NumberFormat::Custom("0.000\" kg\"".into())),
    );

    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.set_value("A1", "Name").unwrap();
    sheet.set_style_at(0, 0, header).unwrap();
    sheet.set_value("B1", 0.25).unwrap();
    sheet.set_style_at(0, 1, percent).unwrap();
    sheet.set_value("C1", 1.5).unwrap();
    sheet.set_style_at(0, 2, custom).unwrap();
    sheet.set_style_at(1, 0, highlight).unwrap();
    sheet.set_value("D1", "plain").unwrap();

    let wb2 = roundtrip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();

    let style_of = |row, col| wb2.style(sheet2.style_at(row, col)).unwrap();

    assert_eq!(style_of(0, 0), wb.style(header).unwrap());
    assert_eq!(style_of(0, 1).number_format, NumberFormat::BuiltIn(10));
    assert_eq!(
        style_of(0, 2).number_format,
        NumberFormat::Custom("0.000\" kg\"".into())
    );
    assert_eq!(style_of(1, 0).fill, FillStyle::solid(Color::YELLOW));
    assert!(sheet2.value_at(1, 0).is_empty());
    assert_eq!(sheet2.style_at(0, 3), NO_STYLE);
}

#[test]
fn test_roundtrip_layout() {
    let mut wb = Workbook::new();
    {
        let sheet = wb.worksheet_mut(0).unwrap();
        sheet.set_value("A1", 1.0).unwrap();
        sheet.set_column_width(0, 25.5).unwrap();
        sheet.set_column_width(1, 25.5).unwrap();
        sheet.set_column_width(4, 8.0).unwrap();
        sheet.set_row_height(0, 30.0).unwrap();
        sheet.set_row_height(9, 12.75).unwrap();
        let merged = CellRange::parse("B2:D4").unwrap();
        sheet.merge_cells(&merged).unwrap();
    }

    let wb2 = roundtrip(&wb);
    let sheet = wb.worksheet(0).unwrap();
    let sheet2 = wb2.worksheet(0).unwrap();

    assert_eq!(sheet2.custom_column_widths(), sheet.custom_column_widths());
    assert_eq!(sheet2.custom_row_heights(), sheet.custom_row_heights());
    assert_eq!(sheet2.merged_regions(), sheet.merged_regions());
}

#[test]
fn test_roundtrip_comments() {
    let mut wb = Workbook::new();
    wb.add_worksheet_with_name("Notes").unwrap();
    let sheet = wb.worksheet_mut(1).unwrap();

    let dark_red = Color::rgb(0x6C, 0x08, 0x08);
    let old_value = CellComment::new("sheetdiff")
        .with_run(CommentRun::bold("Old value:\n").with_color(dark_red))
        .with_run(CommentRun::plain("42"))
        .with_size(180.0, 40.0);
    sheet.set_comment_at(0, 1, old_value.clone()).unwrap();
    sheet
        .set_comment_at(5, 0, CellComment::plain("reviewer", "check <this>"))
        .unwrap();

    let wb2 = roundtrip(&wb);
    let sheet2 = wb2.worksheet(1).unwrap();

    assert_eq!(wb2.worksheet(0).unwrap().comment_count(), 0);
    assert_eq!(sheet2.comment_at(0, 1), Some(&old_value));
    let plain = sheet2.comment_at(5, 0).unwrap();
    assert_eq!(plain.author, "reviewer");
    assert_eq!(plain.text(), "check <this>");
    assert_eq!(
        (plain.width, plain.height),
        (
            sheetdiff_core::comment::DEFAULT_COMMENT_WIDTH,
            sheetdiff_core::comment::DEFAULT_COMMENT_HEIGHT
        )
    );
}

#[test]
fn test_roundtrip_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.xlsx");

    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.set_value("A1", "on disk").unwrap();
    XlsxWriter::write_file(&wb, &path).unwrap();

    let wb2 = XlsxReader::read_file(&path).unwrap();
    let sheet2 = wb2.worksheet(0).unwrap();
    assert_eq!(sheet2.value_at(0, 0).as_string(), Some("on disk"));
    let missing = dir.path().join("missing.xlsx");
    assert!(XlsxReader::read_file(missing).is_err());
}
