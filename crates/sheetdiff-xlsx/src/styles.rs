//! XLSX styles (styles.xml) read/write helpers

use std::collections::HashMap;
use std::hash::Hash;
use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::XlsxResult;
use crate::xml::{attr_bool, attr_parse, attr_value, escape_xml};
use sheetdiff_core::style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    GradientStop, HorizontalAlignment, NumberFormat, PatternType, Protection, Style, StylePool,
    Underline, VerticalAlignment,
};

// === Writing ===

/// Component tables for `styles.xml`, built from a workbook's style pool.
///
/// Pool handle `N` becomes `cellXfs` entry `N`, so cells can be written with
/// their handle as the `s` attribute without any remapping.
#[derive(Debug)]
pub(crate) struct XlsxStyleTable<'a> {
    styles: Vec<&'a Style>,
    fonts: Vec<FontStyle>,
    fills: Vec<FillStyle>,
    borders: Vec<BorderStyle>,
    numfmts: Vec<(u32, String)>,
    xfs: Vec<ResolvedXfIds>,
}

#[derive(Debug, Clone, Copy)]
struct ResolvedXfIds {
    font_id: u32,
    fill_id: u32,
    border_id: u32,
    num_fmt_id: u32,
}

fn intern<T: Hash + Eq + Clone>(items: &mut Vec<T>, ids: &mut HashMap<T, u32>, item: &T) -> u32 {
    if let Some(&id) = ids.get(item) {
        return id;
    }
    let id = items.len() as u32;
    items.push(item.clone());
    ids.insert(item.clone(), id);
    id
}

impl<'a> XlsxStyleTable<'a> {
    pub(crate) fn build(pool: &'a StylePool) -> Self {
        let mut fonts = vec![FontStyle::default()];
        let mut font_ids: HashMap<FontStyle, u32> = HashMap::new();
        font_ids.insert(FontStyle::default(), 0);

        // The first two fills are reserved: none and gray125
        let gray125 = FillStyle::Pattern {
            pattern: PatternType::Gray125,
            foreground: Color::Auto,
            background: Color::Auto,
        };
        let mut fills = vec![FillStyle::None, gray125.clone()];
        let mut fill_ids: HashMap<FillStyle, u32> = HashMap::new();
        fill_ids.insert(FillStyle::None, 0);
        fill_ids.insert(gray125, 1);

        let mut borders = vec![BorderStyle::default()];
        let mut border_ids: HashMap<BorderStyle, u32> = HashMap::new();
        border_ids.insert(BorderStyle::default(), 0);

        let mut numfmts: Vec<(u32, String)> = Vec::new();
        let mut numfmt_ids: HashMap<String, u32> = HashMap::new();

        let mut styles = Vec::with_capacity(pool.len());
        let mut xfs = Vec::with_capacity(pool.len());

        for (_, style) in pool.iter() {
            let num_fmt_id = match &style.number_format {
                NumberFormat::General => 0,
                NumberFormat::BuiltIn(id) => *id,
                NumberFormat::Custom(code) => match numfmt_ids.get(code) {
                    Some(&id) => id,
                    None => {
                        let id = NumberFormat::FIRST_CUSTOM_ID + numfmts.len() as u32;
                        numfmt_ids.insert(code.clone(), id);
                        numfmts.push((id, code.clone()));
                        id
                    }
                },
            };

            xfs.push(ResolvedXfIds {
                font_id: intern(&mut fonts, &mut font_ids, &style.font),
                fill_id: intern(&mut fills, &mut fill_ids, &style.fill),
                border_id: intern(&mut borders, &mut border_ids, &style.border),
                num_fmt_id,
            });
            styles.push(style);
        }

        Self {
            styles,
            fonts,
            fills,
            borders,
            numfmts,
            xfs,
        }
    }

    /// Number of `cellXfs` entries (one per pool handle)
    pub(crate) fn xf_count(&self) -> usize {
        self.xfs.len()
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !self.numfmts.is_empty() {
            xml.push_str(&format!("\n  <numFmts count=\"{}\">", self.numfmts.len()));
            for (id, code) in &self.numfmts {
                xml.push_str(&format!(
                    "\n    <numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                    id,
                    escape_xml(code)
                ));
            }
            xml.push_str("\n  </numFmts>");
        }

        xml.push_str(&format!("\n  <fonts count=\"{}\">", self.fonts.len()));
        for font in &self.fonts {
            xml.push_str("\n    ");
            xml.push_str(&write_font(font));
        }
        xml.push_str("\n  </fonts>");

        xml.push_str(&format!("\n  <fills count=\"{}\">", self.fills.len()));
        for fill in &self.fills {
            xml.push_str("\n    ");
            xml.push_str(&write_fill(fill));
        }
        xml.push_str("\n  </fills>");

        xml.push_str(&format!("\n  <borders count=\"{}\">", self.borders.len()));
        for border in &self.borders {
            xml.push_str("\n    ");
            xml.push_str(&write_border(border));
        }
        xml.push_str("\n  </borders>");

        xml.push_str(
            r#"
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
        );

        xml.push_str(&format!("\n  <cellXfs count=\"{}\">", self.xfs.len()));
        for (style, ids) in self.styles.iter().zip(&self.xfs) {
            xml.push_str("\n    ");
            xml.push_str(&write_xf(style, *ids));
        }
        xml.push_str("\n  </cellXfs>");

        xml.push_str(
            r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
  <tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>
</styleSheet>"#,
        );
        xml
    }
}

/// Attributes of a color element (`rgb`, `theme`/`tint`, `indexed` or `auto`)
pub(crate) fn color_attrs(color: &Color) -> String {
    match color {
        Color::Auto => " auto=\"1\"".to_string(),
        Color::Indexed(i) => format!(" indexed=\"{}\"", i),
        Color::Theme { index, tint: 0 } => format!(" theme=\"{}\"", index),
        Color::Theme { index, tint } => {
            let tint = f64::from(*tint) / 1000.0;
            format!(" theme=\"{index}\" tint=\"{tint}\"")
        }
        Color::Rgb { .. } | Color::Argb { .. } => {
            format!(" rgb=\"{}\"", color.to_argb_hex().unwrap_or_default())
        }
    }
}

fn write_color(tag: &str, color: &Color) -> String {
    format!("<{}{}/>", tag, color_attrs(color))
}

fn write_font(font: &FontStyle) -> String {
    let mut s = String::from("<font>");
    if font.bold {
        s.push_str("<b/>");
    }
    if font.italic {
        s.push_str("<i/>");
    }
    if font.strikethrough {
        s.push_str("<strike/>");
    }
    match font.underline.as_str() {
        None => {}
        Some("single") => s.push_str("<u/>"),
        Some(val) => s.push_str(&format!("<u val=\"{}\"/>", val)),
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    if !font.color.is_auto() {
        s.push_str(&write_color("color", &font.color));
    }
    s.push_str(&format!("<name val=\"{}\"/>", escape_xml(&font.name)));
    s.push_str("</font>");
    s
}

fn write_fill(fill: &FillStyle) -> String {
    match fill {
        FillStyle::None => "<fill><patternFill patternType=\"none\"/></fill>".to_string(),
        FillStyle::Solid { color } => format!(
            "<fill><patternFill patternType=\"solid\">{}<bgColor indexed=\"64\"/></patternFill></fill>",
            write_color("fgColor", color)
        ),
        FillStyle::Pattern {
            pattern,
            foreground,
            background,
        } => format!(
            "<fill><patternFill patternType=\"{}\">{}{}</patternFill></fill>",
            pattern.as_str(),
            write_color("fgColor", foreground),
            write_color("bgColor", background)
        ),
        FillStyle::Gradient { degree, stops } => {
            let mut s = format!("<fill><gradientFill degree=\"{}\">", degree);
            for stop in stops {
                s.push_str(&format!(
                    "<stop position=\"{}\">{}</stop>",
                    stop.position,
                    write_color("color", &stop.color)
                ));
            }
            s.push_str("</gradientFill></fill>");
            s
        }
    }
}

fn write_border_edge(tag: &str, edge: &Option<BorderEdge>) -> String {
    match edge {
        Some(e) if e.style != BorderLineStyle::None => format!(
            "<{tag} style=\"{}\">{}</{tag}>",
            e.style.as_str(),
            write_color("color", &e.color)
        ),
        _ => format!("<{tag}/>"),
    }
}

fn write_border(border: &BorderStyle) -> String {
    let mut s = String::from("<border");
    if border.diagonal_up {
        s.push_str(" diagonalUp=\"1\"");
    }
    if border.diagonal_down {
        s.push_str(" diagonalDown=\"1\"");
    }
    s.push('>');
    s.push_str(&write_border_edge("left", &border.left));
    s.push_str(&write_border_edge("right", &border.right));
    s.push_str(&write_border_edge("top", &border.top));
    s.push_str(&write_border_edge("bottom", &border.bottom));
    s.push_str(&write_border_edge("diagonal", &border.diagonal));
    s.push_str("</border>");
    s
}

fn write_alignment(al: &Alignment) -> String {
    if al.is_default() {
        return String::new();
    }
    let default = Alignment::default();

    let mut s = String::from("<alignment");
    if al.horizontal != default.horizontal {
        s.push_str(&format!(" horizontal=\"{}\"", al.horizontal.as_str()));
    }
    if al.vertical != default.vertical {
        s.push_str(&format!(" vertical=\"{}\"", al.vertical.as_str()));
    }
    if al.wrap_text {
        s.push_str(" wrapText=\"1\"");
    }
    if al.shrink_to_fit {
        s.push_str(" shrinkToFit=\"1\"");
    }
    if al.indent != 0 {
        s.push_str(&format!(" indent=\"{}\"", al.indent));
    }
    if al.rotation != 0 {
        s.push_str(&format!(" textRotation=\"{}\"", al.rotation));
    }
    s.push_str("/>");
    s
}

fn write_protection(p: &Protection) -> String {
    let default = Protection::default();
    if p == &default {
        return String::new();
    }
    format!(
        "<protection locked=\"{}\" hidden=\"{}\"/>",
        u8::from(p.locked),
        u8::from(p.hidden)
    )
}

fn write_xf(style: &Style, ids: ResolvedXfIds) -> String {
    let mut attrs = String::new();
    if ids.num_fmt_id != 0 {
        attrs.push_str(" applyNumberFormat=\"1\"");
    }
    if ids.font_id != 0 {
        attrs.push_str(" applyFont=\"1\"");
    }
    if ids.fill_id != 0 {
        attrs.push_str(" applyFill=\"1\"");
    }
    if ids.border_id != 0 {
        attrs.push_str(" applyBorder=\"1\"");
    }
    if !style.alignment.is_default() {
        attrs.push_str(" applyAlignment=\"1\"");
    }
    if style.protection != Protection::default() {
        attrs.push_str(" applyProtection=\"1\"");
    }

    let mut s = format!(
        "<xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"{}",
        ids.num_fmt_id, ids.font_id, ids.fill_id, ids.border_id, attrs
    );

    let children = write_alignment(&style.alignment) + &write_protection(&style.protection);
    if children.is_empty() {
        s.push_str("/>");
    } else {
        s.push('>');
        s.push_str(&children);
        s.push_str("</xf>");
    }
    s
}

// === Reading ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Other,
    NumFmts,
    Fonts,
    Fills,
    Borders,
    CellXfs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
    Diagonal,
}

#[derive(Debug, Default)]
struct PendingFill {
    pattern: Option<PatternType>,
    fg: Color,
    bg: Color,
    gradient: Option<(f64, Vec<GradientStop>)>,
    stop_position: Option<f64>,
}

impl PendingFill {
    fn finish(self) -> FillStyle {
        if let Some((degree, stops)) = self.gradient {
            return FillStyle::Gradient { degree, stops };
        }
        match self.pattern.unwrap_or(PatternType::None) {
            PatternType::None => FillStyle::None,
            PatternType::Solid => FillStyle::Solid { color: self.fg },
            pattern => FillStyle::Pattern {
                pattern,
                foreground: self.fg,
                background: self.bg,
            },
        }
    }
}

#[derive(Debug, Default)]
struct PendingXf {
    num_fmt_id: u32,
    font_id: usize,
    fill_id: usize,
    border_id: usize,
    alignment: Alignment,
    protection: Protection,
}

/// Event-driven state for one pass over `styles.xml`
#[derive(Debug)]
struct StylesParser {
    section: Section,
    numfmts: HashMap<u32, String>,
    fonts: Vec<FontStyle>,
    fills: Vec<FillStyle>,
    borders: Vec<BorderStyle>,
    cell_xfs: Vec<Style>,

    font: Option<FontStyle>,
    fill: Option<PendingFill>,
    border: Option<BorderStyle>,
    edge: Option<Edge>,
    xf: Option<PendingXf>,
}

impl StylesParser {
    fn new() -> Self {
        Self {
            section: Section::Other,
            numfmts: HashMap::new(),
            fonts: Vec::new(),
            fills: Vec::new(),
            borders: Vec::new(),
            cell_xfs: Vec::new(),
            font: None,
            fill: None,
            border: None,
            edge: None,
            xf: None,
        }
    }

    fn open(&mut self, e: &BytesStart<'_>, empty: bool) {
        let name = e.name();
        match (self.section, name.as_ref()) {
            (_, b"numFmts") => self.section = Section::NumFmts,
            (_, b"fonts") => self.section = Section::Fonts,
            (_, b"fills") => self.section = Section::Fills,
            (_, b"borders") => self.section = Section::Borders,
            (_, b"cellXfs") => self.section = Section::CellXfs,
            (_, b"cellStyleXfs" | b"dxfs" | b"colors" | b"extLst") => {
                self.section = Section::Other
            }

            (Section::NumFmts, b"numFmt") => {
                if let (Some(id), Some(code)) =
                    (attr_parse(e, b"numFmtId"), attr_value(e, b"formatCode"))
                {
                    self.numfmts.insert(id, code);
                }
            }

            (Section::Fonts, b"font") => {
                self.font = Some(FontStyle::default());
                if empty {
                    self.close(b"font");
                }
            }
            (Section::Fonts, tag) => {
                if let Some(font) = self.font.as_mut() {
                    let on = attr_bool(e, b"val").unwrap_or(true);
                    match tag {
                        b"b" => font.bold = on,
                        b"i" => font.italic = on,
                        b"strike" => font.strikethrough = on,
                        b"u" => {
                            font.underline = Underline::from_name(attr_value(e, b"val").as_deref())
                        }
                        b"sz" => font.size = attr_parse(e, b"val").unwrap_or(font.size),
                        b"name" => {
                            if let Some(v) = attr_value(e, b"val") {
                                font.name = v;
                            }
                        }
                        b"color" => font.color = parse_color_attrs(e),
                        _ => {}
                    }
                }
            }

            (Section::Fills, b"fill") => {
                self.fill = Some(PendingFill::default());
                if empty {
                    self.close(b"fill");
                }
            }
            (Section::Fills, tag) => {
                if let Some(fill) = self.fill.as_mut() {
                    match tag {
                        b"patternFill" => {
                            fill.pattern = attr_value(e, b"patternType")
                                .map(|p| PatternType::from_name(&p))
                                .or(Some(PatternType::None));
                        }
                        b"fgColor" => fill.fg = parse_color_attrs(e),
                        b"bgColor" => fill.bg = parse_color_attrs(e),
                        b"gradientFill" => {
                            let degree = attr_parse(e, b"degree").unwrap_or(0.0);
                            fill.gradient = Some((degree, Vec::new()));
                        }
                        b"stop" => fill.stop_position = attr_parse(e, b"position"),
                        b"color" => {
                            if let (Some((_, stops)), Some(position)) =
                                (fill.gradient.as_mut(), fill.stop_position)
                            {
                                stops.push(GradientStop {
                                    position,
                                    color: parse_color_attrs(e),
                                });
                            }
                        }
                        _ => {}
                    }
                }
            }

            (Section::Borders, b"border") => {
                self.border = Some(BorderStyle {
                    diagonal_up: attr_bool(e, b"diagonalUp").unwrap_or(false),
                    diagonal_down: attr_bool(e, b"diagonalDown").unwrap_or(false),
                    ..BorderStyle::default()
                });
                if empty {
                    self.close(b"border");
                }
            }
            (Section::Borders, tag) => {
                let Some(border) = self.border.as_mut() else {
                    return;
                };
                let edge = match tag {
                    b"left" | b"start" => Some(Edge::Left),
                    b"right" | b"end" => Some(Edge::Right),
                    b"top" => Some(Edge::Top),
                    b"bottom" => Some(Edge::Bottom),
                    b"diagonal" => Some(Edge::Diagonal),
                    _ => None,
                };
                if let Some(edge) = edge {
                    let style = attr_value(e, b"style")
                        .map(|s| BorderLineStyle::from_name(&s))
                        .unwrap_or_default();
                    if style != BorderLineStyle::None {
                        *edge_slot(border, edge) = Some(BorderEdge {
                            style,
                            color: Color::Auto,
                        });
                    }
                    self.edge = if empty { None } else { Some(edge) };
                } else if tag == b"color" {
                    if let Some(edge) = self.edge {
                        if let Some(slot) = edge_slot(border, edge).as_mut() {
                            slot.color = parse_color_attrs(e);
                        }
                    }
                }
            }

            (Section::CellXfs, b"xf") => {
                self.xf = Some(PendingXf {
                    num_fmt_id: attr_parse(e, b"numFmtId").unwrap_or(0),
                    font_id: attr_parse(e, b"fontId").unwrap_or(0),
                    fill_id: attr_parse(e, b"fillId").unwrap_or(0),
                    border_id: attr_parse(e, b"borderId").unwrap_or(0),
                    ..PendingXf::default()
                });
                if empty {
                    self.close(b"xf");
                }
            }
            (Section::CellXfs, b"alignment") => {
                if let Some(xf) = self.xf.as_mut() {
                    let al = &mut xf.alignment;
                    if let Some(h) = attr_value(e, b"horizontal") {
                        al.horizontal = HorizontalAlignment::from_name(&h);
                    }
                    if let Some(v) = attr_value(e, b"vertical") {
                        al.vertical = VerticalAlignment::from_name(&v);
                    }
                    al.wrap_text = attr_bool(e, b"wrapText").unwrap_or(false);
                    al.shrink_to_fit = attr_bool(e, b"shrinkToFit").unwrap_or(false);
                    al.indent = attr_parse(e, b"indent").unwrap_or(0);
                    al.rotation = attr_parse(e, b"textRotation").unwrap_or(0);
                }
            }
            (Section::CellXfs, b"protection") => {
                if let Some(xf) = self.xf.as_mut() {
                    if let Some(locked) = attr_bool(e, b"locked") {
                        xf.protection.locked = locked;
                    }
                    if let Some(hidden) = attr_bool(e, b"hidden") {
                        xf.protection.hidden = hidden;
                    }
                }
            }

            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"numFmts" | b"fonts" | b"fills" | b"borders" | b"cellXfs" => {
                self.section = Section::Other
            }
            b"font" => {
                if let Some(font) = self.font.take() {
                    self.fonts.push(font);
                }
            }
            b"fill" => {
                if let Some(fill) = self.fill.take() {
                    self.fills.push(fill.finish());
                }
            }
            b"stop" => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.stop_position = None;
                }
            }
            b"border" => {
                if let Some(border) = self.border.take() {
                    self.borders.push(border);
                }
                self.edge = None;
            }
            b"left" | b"right" | b"start" | b"end" | b"top" | b"bottom" | b"diagonal" => {
                self.edge = None
            }
            b"xf" if self.section == Section::CellXfs => {
                if let Some(xf) = self.xf.take() {
                    let style = self.resolve(xf);
                    self.cell_xfs.push(style);
                }
            }
            _ => {}
        }
    }

    fn resolve(&self, xf: PendingXf) -> Style {
        let number_format = match self.numfmts.get(&xf.num_fmt_id) {
            Some(code) => NumberFormat::Custom(code.clone()),
            None => NumberFormat::from_id(xf.num_fmt_id),
        };
        Style {
            font: self.fonts.get(xf.font_id).cloned().unwrap_or_default(),
            fill: self.fills.get(xf.fill_id).cloned().unwrap_or_default(),
            border: self.borders.get(xf.border_id).cloned().unwrap_or_default(),
            alignment: xf.alignment,
            number_format,
            protection: xf.protection,
        }
    }
}

fn edge_slot(border: &mut BorderStyle, edge: Edge) -> &mut Option<BorderEdge> {
    match edge {
        Edge::Left => &mut border.left,
        Edge::Right => &mut border.right,
        Edge::Top => &mut border.top,
        Edge::Bottom => &mut border.bottom,
        Edge::Diagonal => &mut border.diagonal,
    }
}

/// Read the `cellXfs` table of a `styles.xml` part, resolved to full styles.
///
/// Entry `N` of the result is the style a cell with `s="N"` carries.
pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<Vec<Style>> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut parser = StylesParser::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) => parser.open(&e, false),
            Event::Empty(e) => parser.open(&e, true),
            Event::End(e) => parser.close(e.name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if parser.cell_xfs.is_empty() {
        parser.cell_xfs.push(Style::default());
    }
    Ok(parser.cell_xfs)
}

/// Parse the color attributes of an element.
///
/// Priority is `rgb`, then `theme` (with `tint`), then `indexed`; anything
/// else is automatic. Opaque ARGB values are normalized to plain RGB.
pub(crate) fn parse_color_attrs(e: &BytesStart<'_>) -> Color {
    if let Some(rgb) = attr_value(e, b"rgb") {
        match Color::from_hex(&rgb) {
            Ok(Color::Argb { a: 0xFF, r, g, b }) => return Color::rgb(r, g, b),
            Ok(color) => return color,
            Err(_) => log::warn!("ignoring malformed color '{}'", rgb),
        }
    }

    if let Some(index) = attr_parse::<u8>(e, b"theme") {
        let tint = attr_parse::<f64>(e, b"tint")
            .map(|t| (t.clamp(-1.0, 1.0) * 1000.0).round() as i16)
            .unwrap_or(0);
        return Color::Theme { index, tint };
    }

    if let Some(i) = attr_parse::<u8>(e, b"indexed") {
        return Color::Indexed(i);
    }

    Color::Auto
}
