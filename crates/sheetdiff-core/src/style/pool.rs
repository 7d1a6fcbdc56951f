//! Document-wide style registry

use super::{Style, StyleHandle, NO_STYLE};
use ahash::AHashMap;

/// Deduplicating registry of styles.
///
/// Handle [`NO_STYLE`] is the default style and is always present. Registering
/// a style equal to one already present returns the existing handle, so
/// registration is idempotent and independent of cell content.
#[derive(Debug, Clone)]
pub struct StylePool {
    styles: Vec<Style>,
    handles: AHashMap<Style, StyleHandle>,
}

impl StylePool {
    /// Create a pool holding only the default style
    pub fn new() -> Self {
        let mut handles = AHashMap::with_capacity(64);
        handles.insert(Style::default(), NO_STYLE);
        Self {
            styles: vec![Style::default()],
            handles,
        }
    }

    /// Register a style, returning the handle of an equal existing style if any
    pub fn get_or_insert(&mut self, style: Style) -> StyleHandle {
        if let Some(&handle) = self.handles.get(&style) {
            return handle;
        }
        let handle = self.styles.len() as StyleHandle;
        self.styles.push(style.clone());
        self.handles.insert(style, handle);
        handle
    }

    /// Look up a style by handle
    pub fn get(&self, handle: StyleHandle) -> Option<&Style> {
        self.styles.get(handle as usize)
    }

    /// Number of registered styles, including the default
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// True when only the default style is present
    pub fn is_empty(&self) -> bool {
        self.styles.len() <= 1
    }

    /// Iterate over all styles in handle order
    pub fn iter(&self) -> impl Iterator<Item = (StyleHandle, &Style)> {
        self.styles
            .iter()
            .enumerate()
            .map(|(i, s)| (i as StyleHandle, s))
    }
}

impl Default for StylePool {
    fn default() -> Self {
        Self::new()
    }
}
