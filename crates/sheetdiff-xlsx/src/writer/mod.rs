//! XLSX writer

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::{color_attrs, XlsxStyleTable};
use crate::xml::{encode_excel_escapes, escape_xml};
use sheetdiff_core::comment::CellComment;
use sheetdiff_core::style::{StyleHandle, NO_STYLE};
use sheetdiff_core::{CellAddress, CellValue, Workbook, Worksheet};

type Zip<W> = zip::ZipWriter<W>;

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(workbook, file)
    }

    /// Write a workbook to a writer
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);

        // Style handle N is written as cellXfs entry N
        let style_table = XlsxStyleTable::build(workbook.styles());

        // Determine which sheets have comments
        let sheets_with_comments: Vec<usize> = workbook
            .worksheets()
            .enumerate()
            .filter(|(_, sheet)| sheet.comment_count() > 0)
            .map(|(i, _)| i)
            .collect();

        Self::write_content_types(&mut zip, workbook, &sheets_with_comments)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_workbook_xml(&mut zip, workbook)?;
        Self::write_workbook_rels(&mut zip, workbook)?;
        Self::write_part(&mut zip, "xl/styles.xml", &style_table.to_styles_xml())?;

        for (i, sheet) in workbook.worksheets().enumerate() {
            let has_comments = sheet.comment_count() > 0;
            let xml = Self::worksheet_xml(sheet, style_table.xf_count(), has_comments);
            Self::write_part(&mut zip, &format!("xl/worksheets/sheet{}.xml", i + 1), &xml)?;

            if has_comments {
                Self::write_worksheet_rels(&mut zip, i)?;
                Self::write_part(
                    &mut zip,
                    &format!("xl/comments{}.xml", i + 1),
                    &Self::comments_xml(sheet),
                )?;
                Self::write_part(
                    &mut zip,
                    &format!("xl/drawings/vmlDrawing{}.vml", i + 1),
                    &Self::vml_drawing(sheet, i),
                )?;
            }
        }

        zip.finish()?;
        Ok(())
    }

    fn write_part<W: Write + Seek>(zip: &mut Zip<W>, name: &str, content: &str) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(name, options)
            .map_err(|e| XlsxError::from(e).in_part(name))?;
        zip.write_all(content.as_bytes())
            .map_err(|e| XlsxError::from(e).in_part(name))?;
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut Zip<W>,
        workbook: &Workbook,
        sheets_with_comments: &[usize],
    ) -> XlsxResult<()> {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>"#,
        );

        if !sheets_with_comments.is_empty() {
            content.push_str(
                r#"
    <Default Extension="vml" ContentType="application/vnd.openxmlformats-officedocument.vmlDrawing"/>"#,
            );
        }

        content.push_str(
            r#"
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        for &i in sheets_with_comments {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/comments{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.comments+xml"/>"#,
                i + 1
            ));
        }

        content.push_str("\n</Types>");
        Self::write_part(zip, "[Content_Types].xml", &content)
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut Zip<W>) -> XlsxResult<()> {
        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;
        Self::write_part(zip, "_rels/.rels", content)
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut Zip<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>"#,
        );

        for (i, sheet) in workbook.worksheets().enumerate() {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml(sheet.name()),
                i + 1,
                i + 1
            ));
        }

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );

        Self::write_part(zip, "xl/workbook.xml", &content)
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut Zip<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }

        // Styles relationship
        let styles_rid = workbook.sheet_count() + 1;
        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#,
            styles_rid
        ));

        Self::write_part(zip, "xl/_rels/workbook.xml.rels", &content)
    }

    fn worksheet_xml(sheet: &Worksheet, xf_count: usize, has_comments: bool) -> String {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );

        Self::write_columns(&mut content, sheet);

        content.push_str("\n    <sheetData>");

        // Rows holding cells plus rows that only carry a custom height
        let rows: BTreeSet<u32> = sheet
            .row_indices()
            .chain(sheet.custom_row_heights().keys().copied())
            .collect();

        for row in rows {
            match sheet.row_height(row) {
                Some(ht) => content.push_str(&format!(
                    "\n        <row r=\"{}\" ht=\"{}\" customHeight=\"1\">",
                    row + 1,
                    ht
                )),
                None => content.push_str(&format!("\n        <row r=\"{}\">", row + 1)),
            }

            for (col, cell) in sheet.iter_row(row) {
                let cell_ref = CellAddress::new(row, col).to_a1_string();
                let xf = Self::xf_for(cell.style, xf_count, &cell_ref);
                let style_attr = if xf != NO_STYLE {
                    format!(" s=\"{}\"", xf)
                } else {
                    String::new()
                };
                content.push_str("\n            ");
                Self::write_cell(&mut content, &cell_ref, &style_attr, &cell.value);
            }

            content.push_str("\n        </row>");
        }

        content.push_str("\n    </sheetData>");

        let merged_regions = sheet.merged_regions();
        if !merged_regions.is_empty() {
            content.push_str(&format!(
                "\n    <mergeCells count=\"{}\">",
                merged_regions.len()
            ));
            for range in merged_regions {
                content.push_str(&format!("\n        <mergeCell ref=\"{}\"/>", range));
            }
            content.push_str("\n    </mergeCells>");
        }

        if has_comments {
            content.push_str("\n    <legacyDrawing r:id=\"rId2\"/>");
        }

        content.push_str("\n</worksheet>");
        content
    }

    /// `<cols>`, with runs of adjacent columns of equal width coalesced
    fn write_columns(content: &mut String, sheet: &Worksheet) {
        let widths = sheet.custom_column_widths();
        if widths.is_empty() {
            return;
        }

        let mut spans: Vec<(u16, u16, f64)> = Vec::new();
        for (&col, &width) in widths {
            match spans.last_mut() {
                Some((_, last, w)) if *last + 1 == col && *w == width => *last = col,
                _ => spans.push((col, col, width)),
            }
        }

        content.push_str("\n    <cols>");
        for (first, last, width) in spans {
            content.push_str(&format!(
                "\n        <col min=\"{}\" max=\"{}\" width=\"{}\" customWidth=\"1\"/>",
                first + 1,
                last + 1,
                width
            ));
        }
        content.push_str("\n    </cols>");
    }

    fn xf_for(handle: StyleHandle, xf_count: usize, cell_ref: &str) -> StyleHandle {
        if (handle as usize) < xf_count {
            handle
        } else {
            log::warn!("cell {} has unknown style handle {}", cell_ref, handle);
            NO_STYLE
        }
    }

    fn write_cell(content: &mut String, cell_ref: &str, style_attr: &str, value: &CellValue) {
        match value {
            CellValue::Number(n) if n.is_finite() => {
                content.push_str(&format!("<c r=\"{cell_ref}\"{style_attr}><v>{n}</v></c>"));
            }
            CellValue::Number(_) => {
                content.push_str(&format!(
                    "<c r=\"{}\"{} t=\"e\"><v>#NUM!</v></c>",
                    cell_ref, style_attr
                ));
            }
            CellValue::String(s) => {
                content.push_str(&format!(
                    "<c r=\"{}\"{} t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                    cell_ref,
                    style_attr,
                    escape_xml(&encode_excel_escapes(s.as_str()))
                ));
            }
            CellValue::Boolean(b) => {
                content.push_str(&format!(
                    "<c r=\"{}\"{} t=\"b\"><v>{}</v></c>",
                    cell_ref,
                    style_attr,
                    u8::from(*b)
                ));
            }
            CellValue::Error(e) => {
                content.push_str(&format!(
                    "<c r=\"{}\"{} t=\"e\"><v>{}</v></c>",
                    cell_ref,
                    style_attr,
                    escape_xml(e.as_str())
                ));
            }
            CellValue::Formula { text, cached } => {
                let formula = text.strip_prefix('=').unwrap_or(text);
                let (type_attr, cached_xml) = match cached.as_deref() {
                    Some(CellValue::Number(n)) if n.is_finite() => ("", format!("<v>{}</v>", n)),
                    Some(CellValue::String(s)) => (
                        " t=\"str\"",
                        format!("<v>{}</v>", escape_xml(&encode_excel_escapes(s.as_str()))),
                    ),
                    Some(CellValue::Boolean(b)) => (" t=\"b\"", format!("<v>{}</v>", u8::from(*b))),
                    Some(CellValue::Error(e)) => (" t=\"e\"", format!("<v>{}</v>", e.as_str())),
                    _ => ("", String::new()),
                };
                content.push_str(&format!(
                    "<c r=\"{}\"{}{}><f>{}</f>{}</c>",
                    cell_ref,
                    style_attr,
                    type_attr,
                    escape_xml(formula),
                    cached_xml
                ));
            }
            CellValue::Empty => {
                // Style-only cell
                content.push_str(&format!("<c r=\"{}\"{}/>", cell_ref, style_attr));
            }
        }
    }

    fn write_worksheet_rels<W: Write + Seek>(
        zip: &mut Zip<W>,
        sheet_index: usize,
    ) -> XlsxResult<()> {
        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments" Target="../comments{n}.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/vmlDrawing" Target="../drawings/vmlDrawing{n}.vml"/>
</Relationships>"#,
            n = sheet_index + 1
        );
        Self::write_part(
            zip,
            &format!("xl/worksheets/_rels/sheet{}.xml.rels", sheet_index + 1),
            &content,
        )
    }

    /// The comments part of a worksheet: authors plus rich-text runs
    fn comments_xml(sheet: &Worksheet) -> String {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<comments xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <authors>"#,
        );

        let authors = sheet.comment_authors();
        for author in &authors {
            let author = escape_xml(author);
            content.push_str(&format!("\n        <author>{author}</author>"));
        }

        content.push_str(
            r#"
    </authors>
    <commentList>"#,
        );

        let author_index: HashMap<&str, usize> = authors
            .iter()
            .enumerate()
            .map(|(i, a)| (*a, i))
            .collect();

        for (addr, comment) in sheet.comments() {
            let author_id = author_index
                .get(comment.author.as_str())
                .copied()
                .unwrap_or(0);
            content.push_str(&format!(
                "\n        <comment ref=\"{}\" authorId=\"{}\">\n            <text>",
                addr, author_id
            ));
            Self::write_comment_runs(&mut content, comment);
            content.push_str("</text>\n        </comment>");
        }

        content.push_str(
            r#"
    </commentList>
</comments>"#,
        );
        content
    }

    fn write_comment_runs(content: &mut String, comment: &CellComment) {
        for run in &comment.runs {
            content.push_str("<r>");
            if !run.is_plain() {
                content.push_str("<rPr>");
                if run.bold {
                    content.push_str("<b/>");
                }
                if let Some(color) = &run.color {
                    content.push_str(&format!("<color{}/>", color_attrs(color)));
                }
                content.push_str("</rPr>");
            }
            content.push_str(&format!(
                "<t xml:space=\"preserve\">{}</t></r>",
                escape_xml(&encode_excel_escapes(&run.text))
            ));
        }
    }

    /// Legacy VML shapes that give each note its box size
    fn vml_drawing(sheet: &Worksheet, sheet_index: usize) -> String {
        let mut content = String::from(
            r##"<xml xmlns:v="urn:schemas-microsoft-com:vml" xmlns:o="urn:schemas-microsoft-com:office:office" xmlns:x="urn:schemas-microsoft-com:office:excel">
 <o:shapelayout v:ext="edit"><o:idmap v:ext="edit" data="1"/></o:shapelayout>
 <v:shapetype id="_x0000_t202" coordsize="21600,21600" o:spt="202" path="m,l,21600r21600,l21600,xe">
  <v:stroke joinstyle="miter"/>
  <v:path gradientshapeok="t" o:connecttype="rect"/>
 </v:shapetype>"##,
        );

        for (i, (addr, comment)) in sheet.comments().enumerate() {
            let shape_id = 1024 * (sheet_index + 1) + i + 1;
            content.push_str(&format!(
                r##"
 <v:shape id="_x0000_s{id}" type="#_x0000_t202" style="position:absolute;margin-left:59.25pt;margin-top:1.5pt;width:{w}pt;height:{h}pt;z-index:{z};visibility:hidden" fillcolor="#ffffe1" o:insetmode="auto">
  <v:fill color2="#ffffe1"/>
  <v:shadow on="t" color="black" obscured="t"/>
  <v:path o:connecttype="none"/>
  <v:textbox style="mso-direction-alt:auto"><div style="text-align:left"></div></v:textbox>
  <x:ClientData ObjectType="Note">
   <x:MoveWithCells/>
   <x:SizeWithCells/>
   <x:Anchor>{c1}, 15, {r1}, 10, {c2}, 15, {r2}, 4</x:Anchor>
   <x:AutoFill>False</x:AutoFill>
   <x:Row>{row}</x:Row>
   <x:Column>{col}</x:Column>
  </x:ClientData>
 </v:shape>"##,
                id = shape_id,
                w = comment.width,
                h = comment.height,
                z = i + 1,
                c1 = u32::from(addr.col) + 1,
                r1 = addr.row,
                c2 = u32::from(addr.col) + 3,
                r2 = addr.row + 4,
                row = addr.row,
                col = addr.col,
            ));
        }

        content.push_str("\n</xml>");
        content
    }
}
