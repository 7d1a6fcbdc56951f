//! Rendering cell values to the text a spreadsheet application displays.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::CellValue;
use crate::style::NumberFormat;

/// Render a cell value as display text under the given number format.
///
/// Empty cells (and formulas without a cached result) render as `""`.
/// Only the General format, the built-in integer/decimal/percent formats and
/// date/time formats are interpreted; any other format renders as General.
pub fn display_text(value: &CellValue, format: &NumberFormat) -> String {
    match value.effective_value() {
        CellValue::Empty | CellValue::Formula { .. } => String::new(),
        CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        CellValue::String(s) => s.to_string(),
        CellValue::Error(e) => e.to_string(),
        CellValue::Number(n) => format_number(*n, format),
    }
}

fn format_number(n: f64, format: &NumberFormat) -> String {
    match format {
        NumberFormat::BuiltIn(1) => format!("{:.0}", n),
        NumberFormat::BuiltIn(2) => format!("{:.2}", n),
        NumberFormat::BuiltIn(9) => format!("{:.0}%", n * 100.0),
        NumberFormat::BuiltIn(10) => format!("{:.2}%", n * 100.0),
        NumberFormat::BuiltIn(id @ 14..=22) => {
            format_serial(n, builtin_date_pattern(*id)).unwrap_or_else(|| format_general(n))
        }
        _ => format_general(n),
    }
}

/// General-format rendering: integers without a fraction, everything else in
/// the shortest form that reads back to the same value.
pub fn format_general(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn builtin_date_pattern(id: u32) -> &'static str {
    match id {
        14 => "%m-%d-%y",
        15 => "%-d-%b-%y",
        16 => "%-d-%b",
        17 => "%b-%y",
        18 => "%-I:%M %p",
        19 => "%-I:%M:%S %p",
        20 => "%-H:%M",
        21 => "%-H:%M:%S",
        _ => "%-m/%-d/%y %-H:%M",
    }
}

/// Convert a 1900-system serial to a timestamp and format it
fn format_serial(serial: f64, pattern: &str) -> Option<String> {
    serial_to_datetime(serial).map(|dt| dt.format(pattern).to_string())
}

fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || serial >= 2_958_466.0 {
        return None;
    }
    // Serial 60 is the phantom 1900-02-29; earlier serials are offset by one day.
    let epoch = if serial < 60.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let days = serial.trunc() as i64;
    let seconds = ((serial - serial.trunc()) * 86_400.0).round() as i64;
    epoch
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::seconds(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellError;

    fn general(value: CellValue) -> String {
        display_text(&value, &NumberFormat::General)
    }

    #[test]
    fn test_general_rendering() {
        assert_eq!(general(CellValue::Empty), "");
        assert_eq!(general(CellValue::from(42)), "42");
        assert_eq!(general(CellValue::from(-3.0)), "-3");
        assert_eq!(general(CellValue::from(0.1)), "0.1");
        assert_eq!(general(CellValue::from(true)), "TRUE");
        assert_eq!(general(CellValue::from(" padded ")), " padded ");
        assert_eq!(general(CellValue::Error(CellError::Div0)), "#DIV/0!");
    }

    #[test]
    fn test_formula_renders_cached_value() {
        let f = CellValue::formula("A1*2", Some(CellValue::from(8)));
        assert_eq!(general(f), "8");
        assert_eq!(general(CellValue::formula("A1*2", None)), "");
    }

    #[test]
    fn test_builtin_number_formats() {
        let v = CellValue::from(0.256);
        assert_eq!(display_text(&v, &NumberFormat::BuiltIn(9)), "26%");
        assert_eq!(display_text(&v, &NumberFormat::BuiltIn(10)), "25.60%");
        assert_eq!(display_text(&v, &NumberFormat::BuiltIn(2)), "0.26");
        assert_eq!(
            display_text(&v, &NumberFormat::Custom("0.0000".into())),
            "0.256"
        );
    }

    #[test]
    fn test_date_formats() {
        // 45000 is 2023-03-15
        let date = CellValue::from(45000.0);
        assert_eq!(display_text(&date, &NumberFormat::BuiltIn(14)), "03-15-23");
        assert_eq!(display_text(&date, &NumberFormat::BuiltIn(15)), "15-Mar-23");

        let noon = CellValue::from(45000.5);
        assert_eq!(display_text(&noon, &NumberFormat::BuiltIn(20)), "12:00");
        assert_eq!(
            display_text(&noon, &NumberFormat::BuiltIn(22)),
            "3/15/23 12:00"
        );

        let early = CellValue::from(1.0);
        assert_eq!(display_text(&early, &NumberFormat::BuiltIn(14)), "01-01-00");
    }

    #[test]
    fn test_out_of_range_date_falls_back() {
        let v = CellValue::from(-5.0);
        assert_eq!(display_text(&v, &NumberFormat::BuiltIn(14)), "-5");
    }
}
