//! XLSX reader

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::{parse_color_attrs, read_styles_xml};
use crate::xml::{attr_bool, attr_parse, attr_value, decode_excel_escapes};
use sheetdiff_core::comment::{CellComment, CommentRun};
use sheetdiff_core::style::{Style, StyleHandle, NO_STYLE};
use sheetdiff_core::{
    CellAddress, CellData, CellError, CellRange, CellValue, Workbook, Worksheet,
    DEFAULT_SHEET_NAME, MAX_COLS,
};

const REL_WORKSHEET: &str = "/worksheet";
const REL_COMMENTS: &str = "/comments";
const REL_VML_DRAWING: &str = "/vmlDrawing";

/// One entry of a `.rels` part, with its target resolved to an archive path
#[derive(Debug, Clone)]
struct Relationship {
    id: String,
    rel_type: String,
    target: String,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)
            .map_err(|e| e.in_part("xl/sharedStrings.xml"))?;

        // Register every cellXfs entry in the document pool; xf 0 is the
        // document default and always maps to the "no style" handle.
        let mut workbook = Workbook::empty();
        let xf_handles: Vec<StyleHandle> = Self::read_styles(&mut archive)
            .map_err(|e| e.in_part("xl/styles.xml"))?
            .into_iter()
            .enumerate()
            .map(|(xf, style)| {
                if xf == 0 {
                    NO_STYLE
                } else {
                    workbook.register_style(style)
                }
            })
            .collect();

        let workbook_rels = "xl/_rels/workbook.xml.rels";
        if !archive.file_names().any(|n| n == workbook_rels) {
            return Err(XlsxError::MissingPart(workbook_rels.into()));
        }
        let sheet_info = Self::read_workbook_xml(&mut archive)
            .map_err(|e| e.in_part("xl/workbook.xml"))?;
        let workbook_rels = Self::read_relationships(&mut archive, "xl/workbook.xml")?;

        for (name, r_id) in &sheet_info {
            let Some(rel) = workbook_rels
                .iter()
                .find(|r| &r.id == r_id && r.rel_type.ends_with(REL_WORKSHEET))
            else {
                log::warn!("sheet '{}' has no worksheet part; skipped", name);
                continue;
            };

            let mut worksheet = Worksheet::new(name.as_str());
            Self::read_worksheet(
                &mut archive,
                &rel.target,
                &mut worksheet,
                &shared_strings,
                &xf_handles,
            )
            .map_err(|e| e.in_part(&rel.target))?;

            let sheet_rels = Self::read_relationships(&mut archive, &rel.target)?;
            if let Some(comments) = sheet_rels
                .iter()
                .find(|r| r.rel_type.ends_with(REL_COMMENTS))
            {
                Self::read_worksheet_comments(&mut archive, &comments.target, &mut worksheet)
                    .map_err(|e| e.in_part(&comments.target))?;
            }
            if let Some(vml) = sheet_rels
                .iter()
                .find(|r| r.rel_type.ends_with(REL_VML_DRAWING))
            {
                if let Err(e) = Self::read_note_sizes(&mut archive, &vml.target, &mut worksheet) {
                    log::warn!("note shapes in '{}' not read: {}", vml.target, e);
                }
            }

            workbook.add_existing_worksheet(worksheet)?;
        }

        // Ensure at least one sheet exists
        if workbook.sheet_count() == 0 {
            workbook.add_worksheet_with_name(DEFAULT_SHEET_NAME)?;
        }

        Ok(workbook)
    }

    /// List the sheet names of a workbook without loading any cells
    pub fn sheet_names<R: Read + Seek>(reader: R) -> XlsxResult<Vec<String>> {
        let mut archive = zip::ZipArchive::new(reader)?;
        Ok(Self::read_workbook_xml(&mut archive)
            .map_err(|e| e.in_part("xl/workbook.xml"))?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    /// Read the shared strings table; rich-text runs are flattened to text
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        // Text is not trimmed: leading and trailing spaces are part of the value
        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Event::Empty(e) if e.name().as_ref() == b"si" => strings.push(String::new()),
                Event::End(e) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Event::Text(e) if in_t => current_string.push_str(&e.unescape()?),
                Event::CData(e) if in_t => {
                    current_string.push_str(&String::from_utf8_lossy(&e.into_inner()))
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    fn read_styles<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> XlsxResult<Vec<Style>> {
        match archive.by_name("xl/styles.xml") {
            Ok(file) => read_styles_xml(file),
            Err(_) => Ok(vec![Style::default()]),
        }
    }

    /// Read workbook.xml to get sheet names and rIds, in tab order
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"sheet" => {
                    if let (Some(name), Some(r_id)) =
                        (attr_value(&e, b"name"), attr_value(&e, b"r:id"))
                    {
                        sheets.push((name, r_id));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read the relationships of a part (`dir/_rels/name.rels`).
    ///
    /// A part without relationships yields an empty list.
    fn read_relationships<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        part: &str,
    ) -> XlsxResult<Vec<Relationship>> {
        let (dir, file_name) = match part.rfind('/') {
            Some(i) => (&part[..i], &part[i + 1..]),
            None => ("", part),
        };
        let rels_path = if dir.is_empty() {
            format!("_rels/{}.rels", file_name)
        } else {
            format!("{}/_rels/{}.rels", dir, file_name)
        };

        let file = match archive.by_name(&rels_path) {
            Ok(f) => f,
            Err(_) => return Ok(Vec::new()),
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = Vec::new();

        loop {
            let event = xml_reader
                .read_event_into(&mut buf)
                .map_err(|e| XlsxError::from(e).in_part(&rels_path))?;
            match event {
                Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"Relationship" => {
                    if let (Some(id), Some(rel_type), Some(target)) = (
                        attr_value(&e, b"Id"),
                        attr_value(&e, b"Type"),
                        attr_value(&e, b"Target"),
                    ) {
                        if attr_value(&e, b"TargetMode").as_deref() == Some("External") {
                            continue;
                        }
                        rels.push(Relationship {
                            id,
                            rel_type,
                            target: resolve_target(dir, &target),
                        });
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read a worksheet from the archive
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        worksheet: &mut Worksheet,
        shared_strings: &[String],
        xf_handles: &[StyleHandle],
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();

        // Position of the next cell when `r` attributes are omitted
        let mut next_row: u32 = 0;
        let mut next_col: u16 = 0;

        // Current cell state
        let mut cell = PendingCell::default();
        let mut in_cell = false;
        let mut in_value = false;
        let mut in_formula = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;
        let mut in_phonetic = false;

        loop {
            let event = xml_reader.read_event_into(&mut buf)?;
            let empty = matches!(event, Event::Empty(_));
            match event {
                Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                    b"row" => {
                        let row = attr_parse::<u32>(&e, b"r")
                            .map(|r| r.saturating_sub(1))
                            .unwrap_or(next_row);
                        next_row = row + 1;
                        next_col = 0;

                        if attr_bool(&e, b"customHeight").unwrap_or(false) {
                            if let Some(height) = attr_parse::<f64>(&e, b"ht") {
                                if let Err(err) = worksheet.set_row_height(row, height) {
                                    log::warn!("row {} height ignored: {}", row + 1, err);
                                }
                            }
                        }
                    }
                    b"col" => Self::read_column(&e, worksheet),
                    b"c" => {
                        let addr = match attr_value(&e, b"r") {
                            Some(r) => CellAddress::parse(&r).map_err(|err| {
                                XlsxError::Parse(format!("Invalid cell reference '{}': {}", r, err))
                            })?,
                            None => CellAddress::new(next_row.saturating_sub(1), next_col),
                        };
                        next_col = addr.col.saturating_add(1);

                        cell = PendingCell {
                            addr,
                            cell_type: attr_value(&e, b"t"),
                            style: attr_parse(&e, b"s"),
                            ..PendingCell::default()
                        };
                        in_cell = !empty;
                        if empty {
                            Self::process_cell(
                                worksheet,
                                std::mem::take(&mut cell),
                                shared_strings,
                                xf_handles,
                            )?;
                        }
                    }
                    b"v" if in_cell && !empty => in_value = true,
                    b"f" if in_cell => {
                        // Shared-formula followers have no text of their own
                        cell.formula.get_or_insert_with(String::new);
                        in_formula = !empty;
                    }
                    b"is" if in_cell && !empty => in_inline_str = true,
                    b"rPh" if in_inline_str && !empty => in_phonetic = true,
                    b"t" if in_inline_str && !in_phonetic && !empty => {
                        in_inline_text = true;
                        cell.value.get_or_insert_with(String::new);
                    }
                    b"mergeCell" => {
                        if let Some(reference) = attr_value(&e, b"ref") {
                            let merged = CellRange::parse(&reference)
                                .map_err(XlsxError::from)
                                .and_then(|range| Ok(worksheet.merge_cells(&range)?));
                            if let Err(err) = merged {
                                log::warn!("merge '{}' ignored: {}", reference, err);
                            }
                        }
                    }
                    _ => {}
                },
                Event::End(e) => match e.name().as_ref() {
                    b"c" => {
                        Self::process_cell(
                            worksheet,
                            std::mem::take(&mut cell),
                            shared_strings,
                            xf_handles,
                        )?;
                        in_cell = false;
                    }
                    b"v" => in_value = false,
                    b"f" => in_formula = false,
                    b"is" => in_inline_str = false,
                    b"rPh" => in_phonetic = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Event::Text(e) if in_value || in_formula || in_inline_text => {
                    let text = e.unescape()?;
                    let target = if in_formula {
                        cell.formula.get_or_insert_with(String::new)
                    } else {
                        cell.value.get_or_insert_with(String::new)
                    };
                    target.push_str(&text);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    /// Apply one `<col>` element: custom widths for every column in min..=max
    fn read_column(e: &BytesStart<'_>, worksheet: &mut Worksheet) {
        if !attr_bool(e, b"customWidth").unwrap_or(false) {
            return;
        }
        let (Some(min), Some(max), Some(width)) = (
            attr_parse::<u32>(e, b"min"),
            attr_parse::<u32>(e, b"max"),
            attr_parse::<f64>(e, b"width"),
        ) else {
            return;
        };

        let last = max.min(u32::from(MAX_COLS));
        for col in min.max(1)..=last {
            if let Err(err) = worksheet.set_column_width((col - 1) as u16, width) {
                log::warn!("column {} width ignored: {}", col, err);
                return;
            }
        }
    }

    /// Process a cell and add it to the worksheet
    fn process_cell(
        worksheet: &mut Worksheet,
        cell: PendingCell,
        shared_strings: &[String],
        xf_handles: &[StyleHandle],
    ) -> XlsxResult<()> {
        let style = match cell.style {
            None => NO_STYLE,
            Some(xf) => xf_handles.get(xf as usize).copied().unwrap_or_else(|| {
                log::warn!("cell {} refers to missing style {}", cell.addr, xf);
                NO_STYLE
            }),
        };

        let cell_type = cell.cell_type.as_deref();
        let value = match cell.value.as_deref() {
            Some(raw) => parse_value(cell_type, raw, shared_strings)
                .map_err(|msg| XlsxError::Parse(format!("cell {}: {msg}", cell.addr)))?,
            None => CellValue::Empty,
        };

        let value = match cell.formula {
            Some(text) if !text.is_empty() => {
                let cached = if value.is_empty() { None } else { Some(value) };
                CellValue::formula(text, cached)
            }
            _ => value,
        };

        let data = CellData::with_style(value, style);
        worksheet.set_cell_at(cell.addr.row, cell.addr.col, data)?;
        Ok(())
    }

    /// Read comments for a worksheet from its comments part
    fn read_worksheet_comments<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        worksheet: &mut Worksheet,
    ) -> XlsxResult<()> {
        let file = match archive.by_name(path) {
            Ok(f) => f,
            Err(_) => {
                log::warn!("comments part '{}' is missing", path);
                return Ok(());
            }
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut authors: Vec<String> = Vec::new();

        // Current comment parsing state
        let mut in_author = false;
        let mut in_text = false;
        let mut in_run = false;
        let mut in_t = false;
        let mut in_phonetic = false;
        let mut current_ref: Option<String> = None;
        let mut current_author_id: Option<usize> = None;
        let mut runs: Vec<CommentRun> = Vec::new();
        let mut run = CommentRun::plain("");

        loop {
            let event = xml_reader.read_event_into(&mut buf)?;
            let empty = matches!(event, Event::Empty(_));
            match event {
                Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                    b"author" if empty => authors.push(String::new()),
                    b"author" => {
                        in_author = true;
                        authors.push(String::new());
                    }
                    b"comment" => {
                        current_ref = attr_value(&e, b"ref");
                        current_author_id = attr_parse(&e, b"authorId");
                        runs.clear();
                    }
                    b"text" => in_text = !empty,
                    b"rPh" if in_text => in_phonetic = !empty,
                    b"r" if in_text => {
                        in_run = !empty;
                        run = CommentRun::plain("");
                    }
                    b"b" if in_run => run.bold = attr_bool(&e, b"val").unwrap_or(true),
                    b"color" if in_run => {
                        let color = parse_color_attrs(&e);
                        run.color = (!color.is_auto()).then_some(color);
                    }
                    b"t" if in_text && !in_phonetic && !empty => {
                        in_t = true;
                        if !in_run {
                            run = CommentRun::plain("");
                        }
                    }
                    _ => {}
                },
                Event::End(e) => match e.name().as_ref() {
                    b"author" => in_author = false,
                    b"comment" => {
                        match current_ref.take().map(|r| CellAddress::parse(&r)) {
                            Some(Ok(addr)) => {
                                let author = current_author_id
                                    .and_then(|id| authors.get(id))
                                    .cloned()
                                    .unwrap_or_default();
                                let mut comment = CellComment::new(author);
                                comment.runs = std::mem::take(&mut runs);
                                worksheet.set_comment_at(addr.row, addr.col, comment)?;
                            }
                            Some(Err(err)) => log::warn!("comment ignored: {}", err),
                            None => log::warn!("comment without a cell reference ignored"),
                        }
                    }
                    b"text" => in_text = false,
                    b"rPh" => in_phonetic = false,
                    b"r" if in_run => {
                        in_run = false;
                        runs.push(std::mem::replace(&mut run, CommentRun::plain("")));
                    }
                    b"t" if in_t => {
                        in_t = false;
                        if !in_run {
                            runs.push(std::mem::replace(&mut run, CommentRun::plain("")));
                        }
                    }
                    _ => {}
                },
                Event::Text(e) if in_author => {
                    if let Some(author) = authors.last_mut() {
                        author.push_str(&e.unescape()?);
                    }
                }
                Event::Text(e) if in_t => run.text.push_str(&decode_excel_escapes(&e.unescape()?)),
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    /// Read note box sizes from the legacy VML drawing that accompanies a
    /// comments part.
    fn read_note_sizes<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        worksheet: &mut Worksheet,
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);
        xml_reader.check_end_names(false);

        let mut buf = Vec::new();
        let mut size: Option<(f64, f64)> = None;
        let mut row: Option<u32> = None;
        let mut col: Option<u16> = None;
        let mut in_row = false;
        let mut in_col = false;

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().as_ref() {
                    b"v:shape" => {
                        size = attr_value(&e, b"style").and_then(|s| parse_shape_size(&s));
                        row = None;
                        col = None;
                    }
                    b"x:Row" => in_row = true,
                    b"x:Column" => in_col = true,
                    _ => {}
                },
                Event::End(e) => match e.name().as_ref() {
                    b"x:Row" => in_row = false,
                    b"x:Column" => in_col = false,
                    b"v:shape" => {
                        if let (Some((width, height)), Some(row), Some(col)) = (size, row, col) {
                            if let Some(comment) = worksheet.comment_at(row, col).cloned() {
                                let sized = comment.with_size(width, height);
                                worksheet.set_comment_at(row, col, sized)?;
                            }
                        }
                    }
                    _ => {}
                },
                Event::Text(e) if in_row => row = e.unescape()?.trim().parse().ok(),
                Event::Text(e) if in_col => col = e.unescape()?.trim().parse().ok(),
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }
}

/// Cell state collected between `<c>` and `</c>`
#[derive(Debug, Default)]
struct PendingCell {
    addr: CellAddress,
    cell_type: Option<String>,
    style: Option<u32>,
    value: Option<String>,
    formula: Option<String>,
}

/// Interpret the raw `<v>` (or inline string) text of a cell by its `t` type
fn parse_value(
    cell_type: Option<&str>,
    raw: &str,
    shared_strings: &[String],
) -> Result<CellValue, String> {
    Ok(match cell_type {
        // Shared string
        Some("s") => {
            let idx: usize = raw
                .trim()
                .parse()
                .map_err(|_| format!("invalid shared string index '{}'", raw))?;
            let s = shared_strings
                .get(idx)
                .ok_or_else(|| format!("shared string index {} out of bounds", idx))?;
            CellValue::string(s.as_str())
        }

        Some("b") => {
            let raw = raw.trim();
            CellValue::Boolean(raw == "1" || raw.eq_ignore_ascii_case("true"))
        }

        Some("e") => CellError::parse(raw.trim())
            .map(CellValue::Error)
            .unwrap_or_else(|| CellValue::string(raw)),

        // Inline and formula strings carry Excel escape sequences
        Some("inlineStr") | Some("str") => CellValue::string(decode_excel_escapes(raw)),

        // ISO 8601 dates are kept as written
        Some("d") => CellValue::string(raw),

        None | Some("n") => match raw.trim() {
            "" => CellValue::Empty,
            n => n
                .parse::<f64>()
                .map(CellValue::Number)
                .unwrap_or_else(|_| CellValue::string(raw)),
        },

        Some(_) => CellValue::string(raw),
    })
}

/// Resolve a relationship target against the directory of its source part
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// `width` and `height` of a VML shape style, in points
fn parse_shape_size(style: &str) -> Option<(f64, f64)> {
    let mut width = None;
    let mut height = None;
    for declaration in style.split(';') {
        let Some((key, value)) = declaration.split_once(':') else {
            continue;
        };
        let points = parse_length(value.trim());
        match key.trim() {
            "width" => width = points,
            "height" => height = points,
            _ => {}
        }
    }
    Some((width?, height?))
}

fn parse_length(value: &str) -> Option<f64> {
    let (number, factor) = if let Some(n) = value.strip_suffix("pt") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("px") {
        (n, 0.75)
    } else if let Some(n) = value.strip_suffix("in") {
        (n, 72.0)
    } else {
        (value, 1.0)
    };
    number.trim().parse::<f64>().ok().map(|n| n * factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetdiff_core::style::{Color, FillStyle, NumberFormat};
    use std::io::{Cursor, Write};

    const CONTENT_TYPES: &str = r#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#;
    const ROOT_RELS: &str = r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

    fn build_xlsx(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::SimpleFileOptions::default();
            for (name, content) in parts {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buf
    }

    fn single_sheet(sheet_xml: &str, extra: &[(&str, &str)]) -> Vec<u8> {
        let mut parts = vec![
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", ROOT_RELS),
            ("xl/workbook.xml", r#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Data" sheetId="1" r:id="rId1"/></sheets></workbook>"#),
            ("xl/_rels/workbook.xml.rels", r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#),
            ("xl/worksheets/sheet1.xml", sheet_xml),
        ];
        parts.extend_from_slice(extra);
        build_xlsx(&parts)
    }

    #[test]
    fn test_read_empty_xlsx() {
        let buf = single_sheet(
            r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData></sheetData></worksheet>"#,
            &[],
        );

        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Data"]);
        assert!(workbook.worksheet(0).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_sheet_error_names_part() {
        let buf = single_sheet(
            r#"<worksheet><sheetData><row r="1"></sheetData></worksheet>"#,
            &[],
        );

        let err = XlsxReader::read(Cursor::new(buf)).unwrap_err();
        assert_eq!(err.part(), Some("xl/worksheets/sheet1.xml"));
        let message = err.to_string();
        assert!(message.starts_with("xl/worksheets/sheet1.xml: XML error"));
        let XlsxError::Part { source, .. } = &err else {
            panic!("expected a part error, got {:?}", err);
        };
        assert!(matches!(**source, XlsxError::Xml(_)));
    }

    #[test]
    fn test_not_a_workbook() {
        let buf = build_xlsx(&[("hello.txt", "hi")]);
        assert!(matches!(
            XlsxReader::read(Cursor::new(buf)),
            Err(XlsxError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_cell_types() {
        let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1"><v>1.5</v></c><c r="D1" t="b"><v>1</v></c></row>
<row r="2"><c r="A2" t="e"><v>#DIV/0!</v></c><c r="B2" t="inlineStr"><is><t xml:space="preserve"> padded </t></is></c><c r="C2"><f>C1*2</f><v>3</v></c><c r="D2" t="str"><f>"a"&amp;"b"</f><v>ab</v></c></row>
<row r="3"><c t="n"><v>7</v></c><c><v>8</v></c></row>
</sheetData></worksheet>"#;
        let shared = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><t>plain</t></si><si><r><rPr><b/></rPr><t>rich </t></r><r><t>text</t></r><rPh><t>ignored</t></rPh></si></sst>"#;
        let buf = single_sheet(sheet, &[("xl/sharedStrings.xml", shared)]);

        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();
        let ws = workbook.worksheet(0).unwrap();

        assert_eq!(ws.value_at(0, 0), &CellValue::from("plain"));
        assert_eq!(ws.value_at(0, 1), &CellValue::from("rich text"));
        assert_eq!(ws.value_at(0, 2), &CellValue::Number(1.5));
        assert_eq!(ws.value_at(0, 3), &CellValue::Boolean(true));
        assert_eq!(ws.value_at(1, 0), &CellValue::Error(CellError::Div0));
        assert_eq!(ws.value_at(1, 1), &CellValue::from(" padded "));
        assert_eq!(
            ws.value_at(1, 2),
            &CellValue::formula("C1*2", Some(CellValue::Number(3.0)))
        );
        assert_eq!(
            ws.value_at(1, 3),
            &CellValue::formula("\"a\"&\"b\"", Some(CellValue::from("ab")))
        );
        // Cells without references continue from the row start
        assert_eq!(ws.value_at(2, 0), &CellValue::Number(7.0));
        assert_eq!(ws.value_at(2, 1), &CellValue::Number(8.0));
    }

    #[test]
    fn test_styles_become_pool_handles() {
        let styles = r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="3"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill><fill><patternFill patternType="solid"><fgColor rgb="FF00B050"/></patternFill></fill></fills>
<borders count="1"><border/></borders>
<cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/><xf numFmtId="0" fontId="0" fillId="2" borderId="0"/><xf numFmtId="9" fontId="0" fillId="0" borderId="0"/></cellXfs>
</styleSheet>"#;
        let sheet = r#"<worksheet><sheetData><row r="1"><c r="A1" s="1"><v>1</v></c><c r="B1" s="2"><v>0.5</v></c><c r="C1" s="0"><v>2</v></c><c r="D1" s="1"/></row></sheetData></worksheet>"#;
        let buf = single_sheet(sheet, &[("xl/styles.xml", styles)]);

        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();
        let ws = workbook.worksheet(0).unwrap();

        let green = ws.style_at(0, 0);
        assert_ne!(green, NO_STYLE);
        assert_eq!(
            workbook.style(green).unwrap().fill,
            FillStyle::solid(Color::rgb(0x00, 0xB0, 0x50))
        );
        assert_eq!(
            workbook.style(ws.style_at(0, 1)).unwrap().number_format,
            NumberFormat::BuiltIn(9)
        );
        assert_eq!(ws.style_at(0, 2), NO_STYLE);
        // Style-only cells are kept
        assert_eq!(ws.style_at(0, 3), green);
        assert!(ws.value_at(0, 3).is_empty());
    }

    #[test]
    fn test_layout_and_merges() {
        let sheet = r#"<worksheet><cols><col min="2" max="3" width="20.5" customWidth="1"/><col min="4" max="4" width="9"/></cols>
<sheetData><row r="2" ht="30" customHeight="1"><c r="A2"><v>1</v></c></row><row r="3" ht="15"/></sheetData>
<mergeCells count="2"><mergeCell ref="A5:C6"/><mergeCell ref="B6:D7"/></mergeCells></worksheet>"#;
        let buf = single_sheet(sheet, &[]);

        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();
        let ws = workbook.worksheet(0).unwrap();

        assert_eq!(ws.column_width(0), None);
        assert_eq!(ws.column_width(1), Some(20.5));
        assert_eq!(ws.column_width(2), Some(20.5));
        assert_eq!(ws.column_width(3), None);
        assert_eq!(ws.row_height(1), Some(30.0));
        assert_eq!(ws.row_height(2), None);
        // The overlapping second merge is dropped
        assert_eq!(ws.merged_regions(), &[CellRange::parse("A5:C6").unwrap()]);
    }

    #[test]
    fn test_comments_with_rich_runs() {
        let sheet = r#"<worksheet><sheetData><row r="1"><c r="B1"><v>1</v></c></row></sheetData><legacyDrawing r:id="rId2"/></worksheet>"#;
        let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments" Target="../comments1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/vmlDrawing" Target="../drawings/vmlDrawing1.vml"/></Relationships>"#;
        let comments = r#"<comments xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><authors><author>alice</author><author>bob</author></authors><commentList>
<comment ref="B1" authorId="1"><text><r><rPr><b/><color rgb="FF6C0808"/></rPr><t xml:space="preserve">Old value:
</t></r><r><t>42</t></r></text></comment>
<comment ref="C3" authorId="0"><text><t>just text</t></text></comment>
</commentList></comments>"#;
        let vml = r#"<xml xmlns:v="urn:schemas-microsoft-com:vml" xmlns:x="urn:schemas-microsoft-com:office:excel"><v:shape id="_x0000_s1025" style="position:absolute;width:180pt;height:40pt;visibility:hidden"><x:ClientData ObjectType="Note"><x:Row>0</x:Row><x:Column>1</x:Column></x:ClientData></v:shape></xml>"#;
        let buf = single_sheet(
            sheet,
            &[
                ("xl/worksheets/_rels/sheet1.xml.rels", rels),
                ("xl/comments1.xml", comments),
                ("xl/drawings/vmlDrawing1.vml", vml),
            ],
        );

        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();
        let ws = workbook.worksheet(0).unwrap();

        let note = ws.comment_at(0, 1).unwrap();
        assert_eq!(note.author, "bob");
        assert_eq!(
            note.runs,
            vec![
                CommentRun::bold("Old value:\n").with_color(Color::rgb(0x6C, 0x08, 0x08)),
                CommentRun::plain("42"),
            ]
        );
        assert_eq!((note.width, note.height), (180.0, 40.0));

        let plain = ws.comment_at(2, 2).unwrap();
        assert_eq!(plain.author, "alice");
        assert_eq!(plain.text(), "just text");
        assert_eq!(ws.comment_count(), 2);
    }

    #[test]
    fn test_sheet_names_only() {
        let buf = single_sheet("<worksheet/>", &[]);
        let names = XlsxReader::sheet_names(Cursor::new(buf)).unwrap();
        assert_eq!(names, vec!["Data"]);
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("xl", "worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            resolve_target("xl/worksheets", "../comments1.xml"),
            "xl/comments1.xml"
        );
        assert_eq!(
            resolve_target("xl", "/xl/worksheets/sheet2.xml"),
            "xl/worksheets/sheet2.xml"
        );
    }

    #[test]
    fn test_parse_shape_size() {
        let style = "position:absolute;margin-left:59.25pt;width:108pt;height:59.25pt";
        assert_eq!(parse_shape_size(style), Some((108.0, 59.25)));
        let pixels = "width:100px;height:40px";
        assert_eq!(parse_shape_size(pixels), Some((75.0, 30.0)));
        assert_eq!(parse_shape_size("width:100pt"), None);
    }
}
