//! Run options and job files

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sheetdiff_core::Color;

use crate::error::ConfigError;

/// Author name put on old-value notes unless configured otherwise
pub const DEFAULT_COMMENT_AUTHOR: &str = "sheetdiff";

/// Highlight fill used unless configured otherwise
pub const DEFAULT_HIGHLIGHT: &str = "#FFFF00";

/// Files and formatting options of one comparison run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareOptions {
    /// The old document
    pub source: PathBuf,
    /// The new document
    pub comparison: PathBuf,
    /// Where the highlighted document is written
    pub output: PathBuf,
    /// Where the text change log is written
    pub log: PathBuf,
    /// Fill color of differing cells, `RRGGBB` or `AARRGGBB` with optional `#`
    #[serde(default = "default_highlight")]
    pub highlight_color: String,
    /// Base the output on an input document's formatting
    #[serde(default)]
    pub preserve_formatting: bool,
    /// Note the old value on each differing cell
    #[serde(default)]
    pub show_old_in_comment: bool,
    #[serde(default = "default_author")]
    pub comment_author: String,
}

fn default_highlight() -> String {
    DEFAULT_HIGHLIGHT.to_string()
}

fn default_author() -> String {
    DEFAULT_COMMENT_AUTHOR.to_string()
}

impl CompareOptions {
    /// Options with default formatting for the given files
    pub fn new(
        source: impl Into<PathBuf>,
        comparison: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        log: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            comparison: comparison.into(),
            output: output.into(),
            log: log.into(),
            highlight_color: default_highlight(),
            preserve_formatting: false,
            show_old_in_comment: false,
            comment_author: default_author(),
        }
    }

    pub fn with_highlight_color(mut self, color: impl Into<String>) -> Self {
        self.highlight_color = color.into();
        self
    }

    pub fn with_preserve_formatting(mut self, preserve: bool) -> Self {
        self.preserve_formatting = preserve;
        self
    }

    pub fn with_show_old_in_comment(mut self, show: bool) -> Self {
        self.show_old_in_comment = show;
        self
    }

    pub fn with_comment_author(mut self, author: impl Into<String>) -> Self {
        self.comment_author = author.into();
        self
    }

    /// The parsed highlight color
    pub fn highlight(&self) -> sheetdiff_core::Result<Color> {
        Color::from_hex(&self.highlight_color)
    }
}

/// One compared pair of sheets in a paired run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetPair {
    pub source_sheet: String,
    pub comparison_sheet: String,
    /// Name of the output sheet; empty means the comparison sheet's name
    #[serde(default)]
    pub display_name: String,
}

impl SheetPair {
    pub fn new(
        source_sheet: impl Into<String>,
        comparison_sheet: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            source_sheet: source_sheet.into(),
            comparison_sheet: comparison_sheet.into(),
            display_name: display_name.into(),
        }
    }

    /// Parse `SOURCE:COMPARISON[:DISPLAY]`
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let parts: Vec<&str> = spec.split(':').map(str::trim).collect();
        match parts.as_slice() {
            [source, comparison] if !source.is_empty() && !comparison.is_empty() => {
                Ok(Self::new(*source, *comparison, ""))
            }
            [source, comparison, display]
                if !source.is_empty() && !comparison.is_empty() && !display.is_empty() =>
            {
                Ok(Self::new(*source, *comparison, *display))
            }
            _ => Err(ConfigError::InvalidPair(spec.to_string())),
        }
    }

    /// Name of the output sheet and the log label of this pair
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.comparison_sheet
        } else {
            &self.display_name
        }
    }
}

/// Parse `SOURCE=COMPARISON` into a mapping entry
pub fn parse_mapping(spec: &str) -> Result<(String, String), ConfigError> {
    match spec.split_once('=') {
        Some((source, comparison))
            if !source.trim().is_empty() && !comparison.trim().is_empty() =>
        {
            Ok((source.trim().to_string(), comparison.trim().to_string()))
        }
        _ => Err(ConfigError::InvalidMapping(spec.to_string())),
    }
}

/// Which sheets a run compares
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SheetSelection {
    /// One sheet of each document
    Single {
        source_sheet: String,
        comparison_sheet: String,
    },
    /// Sheets matched by name, source name → comparison name
    Mapped { mapping: BTreeMap<String, String> },
    /// Explicit pairs, each with its own output sheet
    Paired { pairs: Vec<SheetPair> },
}

/// A complete run description, as stored in a TOML job file.
///
/// ```toml
/// [options]
/// source = "old.xlsx"
/// comparison = "new.xlsx"
/// output = "diff.xlsx"
/// log = "diff.txt"
/// preserve_formatting = true
///
/// [sheets]
/// mode = "paired"
/// pairs = [{ source_sheet = "Jan", comparison_sheet = "January", display_name = "Jan" }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    pub options: CompareOptions,
    pub sheets: SheetSelection,
}

impl Job {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a job file.
    ///
    /// Relative document paths are resolved against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut job = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            job.options.resolve_relative_to(base);
        }
        Ok(job)
    }
}

impl CompareOptions {
    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [
            &mut self.source,
            &mut self.comparison,
            &mut self.output,
            &mut self.log,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
