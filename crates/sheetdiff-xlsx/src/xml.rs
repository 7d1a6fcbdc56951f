//! Small helpers shared by the XML parts of the reader and writer

use std::str::FromStr;

use quick_xml::events::BytesStart;

/// Escape text for use in element content or a quoted attribute
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Unescaped value of an attribute, if present
pub(crate) fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Attribute parsed with `FromStr`; missing or malformed values give `None`
pub(crate) fn attr_parse<T: FromStr>(e: &BytesStart<'_>, key: &[u8]) -> Option<T> {
    attr_value(e, key).and_then(|v| v.trim().parse().ok())
}

/// Boolean attribute (`1`/`true` or `0`/`false`)
pub(crate) fn attr_bool(e: &BytesStart<'_>, key: &[u8]) -> Option<bool> {
    attr_value(e, key).map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode characters XML cannot carry verbatim:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '_' {
            result.push(c);
            continue;
        }

        let mut hex_chars = String::new();
        let mut is_escape = false;
        let mut saw_x = false;

        if chars.peek() == Some(&'x') {
            chars.next();
            saw_x = true;

            for _ in 0..4 {
                match chars.peek() {
                    Some(&ch) if ch.is_ascii_hexdigit() => {
                        hex_chars.push(ch);
                        chars.next();
                    }
                    _ => break,
                }
            }

            if hex_chars.len() == 4 && chars.peek() == Some(&'_') {
                chars.next();
                let code = u32::from_str_radix(&hex_chars, 16).ok();
                if let Some(decoded) = code.and_then(char::from_u32) {
                    result.push(decoded);
                    is_escape = true;
                } else {
                    hex_chars.push('_');
                }
            }
        }

        if !is_escape {
            // Not a valid escape sequence, output what we consumed
            result.push('_');
            if saw_x {
                result.push('x');
            }
            result.push_str(&hex_chars);
        }
    }

    result
}

/// Inverse of [`decode_excel_escapes`]: control characters XML cannot
/// carry (and the CR that XML parsers normalize away) become `_xHHHH_`, and
/// literal text that would read back as an escape gets its underscore escaped.
pub(crate) fn encode_excel_escapes(s: &str) -> String {
    let needs_work = s
        .chars()
        .any(|c| (c < ' ' && c != '\t' && c != '\n') || c == '_');
    if !needs_work {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len() + 8);
    for (i, c) in s.char_indices() {
        match c {
            '\t' | '\n' => result.push(c),
            c if c < ' ' => result.push_str(&format!("_x{:04X}_", c as u32)),
            '_' if looks_like_escape(&s[i..]) => result.push_str("_x005F_"),
            c => result.push(c),
        }
    }
    result
}

fn looks_like_escape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 7
        && bytes[1] == b'x'
        && bytes[2..6].iter().all(u8::is_ascii_hexdigit)
        && bytes[6] == b'_'
}
