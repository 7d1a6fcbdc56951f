//! Highlight styles for differing cells

use ahash::AHashMap;
use sheetdiff_core::{Color, FillStyle, Style, StyleHandle, Workbook, NO_STYLE};

/// Translation of style handles from one document into another.
///
/// Each source handle is translated at most once per cache; later lookups
/// reuse the registered output handle.
#[derive(Debug, Clone, Default)]
pub struct StyleCache {
    map: AHashMap<StyleHandle, StyleHandle>,
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source: StyleHandle) -> Option<StyleHandle> {
        self.map.get(&source).copied()
    }

    pub fn insert(&mut self, source: StyleHandle, output: StyleHandle) {
        self.map.insert(source, output);
    }

    /// Cached handle for `source`, translating it with `translate` on a miss.
    ///
    /// A translation returning `None` is not cached.
    pub fn get_or_translate<F>(&mut self, source: StyleHandle, translate: F) -> Option<StyleHandle>
    where
        F: FnOnce() -> Option<StyleHandle>,
    {
        if let Some(handle) = self.get(source) {
            return Some(handle);
        }
        let handle = translate()?;
        self.insert(source, handle);
        Some(handle)
    }

    /// Number of translated handles
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// The style given to differing cells that have no style of their own
pub fn highlight_style(color: Color) -> Style {
    Style::new().with_fill(FillStyle::solid(color))
}

/// How differing cells are formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatPolicy {
    /// Keep each cell's own style and override only its fill
    Preserve,
    /// Give every differing cell the plain highlight style
    Fresh,
}

impl FormatPolicy {
    pub fn from_preserve_flag(preserve: bool) -> Self {
        if preserve {
            FormatPolicy::Preserve
        } else {
            FormatPolicy::Fresh
        }
    }
}

/// Computes output style handles for differing cells
#[derive(Debug)]
pub struct StyleResolver<'a> {
    policy: FormatPolicy,
    color: Color,
    fallback: StyleHandle,
    /// Document the per-cell styles are read from
    source: &'a Workbook,
}

impl<'a> StyleResolver<'a> {
    /// Create a resolver writing into `output`, registering the shared
    /// highlight style there.
    pub fn new(
        policy: FormatPolicy,
        color: Color,
        source: &'a Workbook,
        output: &mut Workbook,
    ) -> Self {
        let fallback = output.register_style(highlight_style(color));
        Self {
            policy,
            color,
            fallback,
            source,
        }
    }

    /// Handle of the shared highlight-only style
    pub fn fallback(&self) -> StyleHandle {
        self.fallback
    }

    /// Output style for a differing cell whose style in the source document
    /// is `source_style`.
    pub fn resolve(
        &self,
        source_style: Option<StyleHandle>,
        output: &mut Workbook,
        cache: &mut StyleCache,
    ) -> StyleHandle {
        let handle = match (self.policy, source_style) {
            (FormatPolicy::Fresh, _) | (_, None) | (_, Some(NO_STYLE)) => return self.fallback,
            (FormatPolicy::Preserve, Some(handle)) => handle,
        };

        cache
            .get_or_translate(handle, || {
                let style = self.source.style(handle)?;
                let highlighted = style.clone().with_fill(FillStyle::solid(self.color));
                Some(output.register_style(highlighted))
            })
            .unwrap_or_else(|| {
                tracing::debug!(handle, "source style missing, using highlight style");
                self.fallback
            })
    }
}
