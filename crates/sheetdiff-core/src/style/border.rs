//! Border style types

use super::Color;

/// Border style for a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BorderStyle {
    pub left: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
    pub top: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
    pub diagonal: Option<BorderEdge>,
    pub diagonal_up: bool,
    pub diagonal_down: bool,
}

impl BorderStyle {
    /// Same edge on all four sides
    pub fn all(style: BorderLineStyle, color: Color) -> Self {
        let edge = Some(BorderEdge { style, color });
        Self {
            left: edge.clone(),
            right: edge.clone(),
            top: edge.clone(),
            bottom: edge,
            ..Self::default()
        }
    }

    /// Check if all borders are empty
    pub fn is_empty(&self) -> bool {
        self.left.is_none()
            && self.right.is_none()
            && self.top.is_none()
            && self.bottom.is_none()
            && self.diagonal.is_none()
    }
}

/// A single border edge
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BorderEdge {
    pub style: BorderLineStyle,
    pub color: Color,
}

/// Border line styles, named as in the `style` attribute of a border edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderLineStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

impl BorderLineStyle {
    const NAMES: [(BorderLineStyle, &'static str); 14] = [
        (BorderLineStyle::None, "none"),
        (BorderLineStyle::Thin, "thin"),
        (BorderLineStyle::Medium, "medium"),
        (BorderLineStyle::Thick, "thick"),
        (BorderLineStyle::Dashed, "dashed"),
        (BorderLineStyle::Dotted, "dotted"),
        (BorderLineStyle::Double, "double"),
        (BorderLineStyle::Hair, "hair"),
        (BorderLineStyle::MediumDashed, "mediumDashed"),
        (BorderLineStyle::DashDot, "dashDot"),
        (BorderLineStyle::MediumDashDot, "mediumDashDot"),
        (BorderLineStyle::DashDotDot, "dashDotDot"),
        (BorderLineStyle::MediumDashDotDot, "mediumDashDotDot"),
        (BorderLineStyle::SlantDashDot, "slantDashDot"),
    ];

    pub fn as_str(&self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(s, _)| s == self)
            .map_or("none", |(_, name)| *name)
    }

    pub fn from_name(name: &str) -> Self {
        Self::NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map_or(BorderLineStyle::None, |(s, _)| *s)
    }
}
