//! Workbook type - the main document structure

use crate::error::{Error, Result};
use crate::style::{Style, StyleHandle, StylePool};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// Name given to the only sheet of a new workbook
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// A workbook (spreadsheet document)
///
/// Holds the worksheets in tab order and the style registry shared by all of
/// them, so a [`StyleHandle`] means the same thing on every sheet.
#[derive(Debug, Clone)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
    styles: StylePool,
}

impl Workbook {
    /// Create a new workbook with one empty worksheet named `Sheet1`
    pub fn new() -> Self {
        Self {
            worksheets: vec![Worksheet::new(DEFAULT_SHEET_NAME)],
            styles: StylePool::new(),
        }
    }

    /// Create an empty workbook with no worksheets
    pub fn empty() -> Self {
        Self {
            worksheets: Vec::new(),
            styles: StylePool::new(),
        }
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Sheet names in tab order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.worksheets.iter().map(Worksheet::name).collect()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Get a worksheet by name (case-insensitive, as sheet names are unique
    /// regardless of case)
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.sheet_index(name).map(|i| &self.worksheets[i])
    }

    /// Get a mutable worksheet by name
    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.sheet_index(name).map(move |i| &mut self.worksheets[i])
    }

    /// Get a worksheet by name, failing with [`Error::SheetNotFound`]
    pub fn require_worksheet(&self, name: &str) -> Result<&Worksheet> {
        self.worksheet_by_name(name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }

    /// Get the index of a worksheet by name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.worksheets
            .iter()
            .position(|ws| ws.name() == name)
            .or_else(|| {
                self.worksheets
                    .iter()
                    .position(|ws| ws.name().eq_ignore_ascii_case(name))
            })
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Add a new worksheet with specified name, returning its index
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.validate_sheet_name(name, None)?;
        self.worksheets.push(Worksheet::new(name));
        Ok(self.worksheets.len() - 1)
    }

    /// Add an existing worksheet to the workbook
    ///
    /// The sheet's style handles must refer to this workbook's style pool.
    pub fn add_existing_worksheet(&mut self, worksheet: Worksheet) -> Result<usize> {
        self.validate_sheet_name(worksheet.name(), None)?;
        self.worksheets.push(worksheet);
        Ok(self.worksheets.len() - 1)
    }

    /// Remove a worksheet by index
    pub fn remove_worksheet(&mut self, index: usize) -> Result<Worksheet> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        Ok(self.worksheets.remove(index))
    }

    /// Rename a worksheet
    pub fn rename_worksheet(&mut self, index: usize, new_name: &str) -> Result<()> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.validate_sheet_name(new_name, Some(index))?;
        self.worksheets[index].set_name(new_name);
        Ok(())
    }

    // ==================== Styles ====================

    /// Register a style and return its handle
    ///
    /// Equal definitions share one handle, so registering twice is harmless.
    pub fn register_style(&mut self, style: Style) -> StyleHandle {
        self.styles.get_or_insert(style)
    }

    /// Look up a registered style
    pub fn style(&self, handle: StyleHandle) -> Option<&Style> {
        self.styles.get(handle)
    }

    /// Number of registered styles, including the default
    pub fn style_count(&self) -> usize {
        self.styles.len()
    }

    /// The style registry
    pub fn styles(&self) -> &StylePool {
        &self.styles
    }

    /// Apply a registered style to one cell of a sheet
    pub fn set_cell_style(
        &mut self,
        sheet: usize,
        row: u32,
        col: u16,
        handle: StyleHandle,
    ) -> Result<()> {
        if self.styles.get(handle).is_none() {
            return Err(Error::InvalidStyleHandle(handle));
        }
        let count = self.worksheets.len();
        self.worksheets
            .get_mut(sheet)
            .ok_or(Error::SheetOutOfBounds(sheet, count))?
            .set_style_at(row, col, handle)
    }

    fn validate_sheet_name(&self, name: &str, exclude_index: Option<usize>) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "'{}' is longer than {} characters",
                name, MAX_SHEET_NAME_LEN
            )));
        }

        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "'{}' contains '{}'",
                name, c
            )));
        }

        let clash = self
            .worksheets
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != exclude_index)
            .any(|(_, ws)| ws.name().eq_ignore_ascii_case(name));
        if clash {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        Ok(())
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}
