//! Fill/background style types

use super::Color;

/// Fill style for cell background
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FillStyle {
    /// No fill (transparent)
    #[default]
    None,

    /// Solid color fill
    Solid { color: Color },

    /// Pattern fill
    Pattern {
        pattern: PatternType,
        foreground: Color,
        background: Color,
    },

    /// Linear gradient fill between stops
    Gradient {
        degree: f64,
        stops: Vec<GradientStop>,
    },
}

impl FillStyle {
    /// Create a solid fill with the given color
    pub fn solid(color: Color) -> Self {
        FillStyle::Solid { color }
    }

    /// Check if this is a "no fill"
    pub fn is_none(&self) -> bool {
        matches!(self, FillStyle::None)
    }
}

impl std::hash::Hash for FillStyle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FillStyle::None => {}
            FillStyle::Solid { color } => color.hash(state),
            FillStyle::Pattern {
                pattern,
                foreground,
                background,
            } => {
                pattern.hash(state);
                foreground.hash(state);
                background.hash(state);
            }
            FillStyle::Gradient { degree, stops } => {
                degree.to_bits().hash(state);
                for stop in stops {
                    stop.position.to_bits().hash(state);
                    stop.color.hash(state);
                }
            }
        }
    }
}

impl Eq for FillStyle {}

/// Gradient stop (position 0.0..=1.0 and color)
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub position: f64,
    pub color: Color,
}

/// Pattern fill types, named as in `patternFill/@patternType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PatternType {
    #[default]
    None,
    Solid,
    MediumGray,
    DarkGray,
    LightGray,
    DarkHorizontal,
    DarkVertical,
    DarkDown,
    DarkUp,
    DarkGrid,
    DarkTrellis,
    LightHorizontal,
    LightVertical,
    LightDown,
    LightUp,
    LightGrid,
    LightTrellis,
    Gray125,
    Gray0625,
}

impl PatternType {
    const NAMES: [(PatternType, &'static str); 19] = [
        (PatternType::None, "none"),
        (PatternType::Solid, "solid"),
        (PatternType::MediumGray, "mediumGray"),
        (PatternType::DarkGray, "darkGray"),
        (PatternType::LightGray, "lightGray"),
        (PatternType::DarkHorizontal, "darkHorizontal"),
        (PatternType::DarkVertical, "darkVertical"),
        (PatternType::DarkDown, "darkDown"),
        (PatternType::DarkUp, "darkUp"),
        (PatternType::DarkGrid, "darkGrid"),
        (PatternType::DarkTrellis, "darkTrellis"),
        (PatternType::LightHorizontal, "lightHorizontal"),
        (PatternType::LightVertical, "lightVertical"),
        (PatternType::LightDown, "lightDown"),
        (PatternType::LightUp, "lightUp"),
        (PatternType::LightGrid, "lightGrid"),
        (PatternType::LightTrellis, "lightTrellis"),
        (PatternType::Gray125, "gray125"),
        (PatternType::Gray0625, "gray0625"),
    ];

    /// Name used in the file format
    pub fn as_str(&self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(p, _)| p == self)
            .map_or("none", |(_, name)| *name)
    }

    /// Parse a file-format name; unknown names map to `None`
    pub fn from_name(name: &str) -> Self {
        Self::NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map_or(PatternType::None, |(p, _)| *p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_names() {
        assert_eq!(
            PatternType::from_name("darkTrellis"),
            PatternType::DarkTrellis
        );
        assert_eq!(PatternType::DarkTrellis.as_str(), "darkTrellis");
        assert_eq!(PatternType::from_name("sparkles"), PatternType::None);
    }
}
