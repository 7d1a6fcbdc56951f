//! Color representation

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A color as stored in a spreadsheet style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Automatic/default color
    #[default]
    Auto,

    /// RGB color (no alpha)
    Rgb { r: u8, g: u8, b: u8 },

    /// ARGB color with alpha channel
    Argb { a: u8, r: u8, g: u8, b: u8 },

    /// Theme color index with a tint in thousandths (-1000..=1000)
    Theme { index: u8, tint: i16 },

    /// Indexed color (legacy palette)
    Indexed(u8),
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Create an ARGB color
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color::Argb { a, r, g, b }
    }

    /// Create a theme color
    pub const fn theme(index: u8, tint: i16) -> Self {
        Color::Theme { index, tint }
    }

    /// Parse a hex color specification: `RRGGBB` or `AARRGGBB`, with an
    /// optional leading `#`.
    ///
    /// ```
    /// use sheetdiff_core::Color;
    ///
    /// assert_eq!(Color::from_hex("#FFFF00").unwrap(), Color::YELLOW);
    /// assert!(Color::from_hex("yellow").is_err());
    /// ```
    pub fn from_hex(spec: &str) -> Result<Self> {
        let hex = spec.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || Error::InvalidColor(spec.to_string());

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        match hex.len() {
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => {
                let alpha = channel(0)?;
                Ok(Color::argb(alpha, channel(2)?, channel(4)?, channel(6)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Opaque ARGB hex for explicit colors (`FFRRGGBB`); `None` for colors
    /// that are written by reference (auto, theme, indexed).
    pub fn to_argb_hex(&self) -> Option<String> {
        match self {
            Color::Rgb { r, g, b } => Some(format!("FF{:02X}{:02X}{:02X}", r, g, b)),
            Color::Argb { a, r, g, b } => Some(format!("{:02X}{:02X}{:02X}{:02X}", a, r, g, b)),
            _ => None,
        }
    }

    /// `#RRGGBB` form used in VML and log output; alpha is dropped
    pub fn to_css_hex(&self) -> Option<String> {
        match self {
            Color::Rgb { r, g, b } | Color::Argb { r, g, b, .. } => {
                Some(format!("#{:02X}{:02X}{:02X}", r, g, b))
            }
            _ => None,
        }
    }

    /// Check if color is automatic/default
    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Auto => write!(f, "auto"),
            Color::Rgb { r, g, b } => write!(f, "#{:02X}{:02X}{:02X}", r, g, b),
            Color::Argb { a, r, g, b } => write!(f, "#{:02X}{:02X}{:02X}{:02X}", a, r, g, b),
            Color::Theme { index, tint } => write!(f, "theme({}, {})", index, tint),
            Color::Indexed(i) => write!(f, "indexed({})", i),
        }
    }
}
