//! Number format types

/// Number format attached to a style
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (id 0)
    #[default]
    General,

    /// Built-in format by id (1..=163)
    BuiltIn(u32),

    /// Custom format code, written to `numFmts` with an id >= 164
    Custom(String),
}

impl NumberFormat {
    /// First id available to custom formats
    pub const FIRST_CUSTOM_ID: u32 = 164;

    /// Resolve a `numFmtId` as found on a `cellXfs` entry
    pub fn from_id(id: u32) -> Self {
        if id == 0 {
            NumberFormat::General
        } else {
            NumberFormat::BuiltIn(id)
        }
    }

    /// Format code, when one is known
    pub fn format_code(&self) -> Option<&str> {
        match self {
            NumberFormat::General => Some("General"),
            NumberFormat::BuiltIn(id) => builtin_code(*id),
            NumberFormat::Custom(code) => Some(code),
        }
    }

    /// Check if this is a date/time format
    pub fn is_date_format(&self) -> bool {
        match self {
            NumberFormat::BuiltIn(id) => matches!(id, 14..=22 | 45..=47),
            NumberFormat::Custom(code) => {
                let mut in_quotes = false;
                let mut in_brackets = false;
                for c in code.chars() {
                    match c {
                        '"' => in_quotes = !in_quotes,
                        '[' if !in_quotes => in_brackets = true,
                        ']' if !in_quotes => in_brackets = false,
                        'y' | 'Y' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' | 'm' | 'M'
                            if !in_quotes && !in_brackets =>
                        {
                            return true
                        }
                        _ => {}
                    }
                }
                false
            }
            NumberFormat::General => false,
        }
    }
}

fn builtin_code(id: u32) -> Option<&'static str> {
    Some(match id {
        0 => "General",
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        12 => "# ?/?",
        13 => "# ??/??",
        14 => "mm-dd-yy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yy h:mm",
        45 => "mm:ss",
        46 => "[h]:mm:ss",
        47 => "mmss.0",
        49 => "@",
        _ => return None,
    })
}
