//! Text change log and run summary

use crate::differ::DiffRecord;

/// The change log written next to the output document.
///
/// Each compared sheet gets a `=== <label> ===` header followed by one line
/// per difference: `<label>: <cell>: <old> → <new>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLog {
    text: String,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_section(&mut self, label: &str) {
        self.text.push_str("=== ");
        self.text.push_str(label);
        self.text.push_str(" ===\n");
    }

    pub fn record(&mut self, label: &str, diff: &DiffRecord) {
        self.text.push_str(&format_line(label, diff));
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.text.into_bytes()
    }
}

/// One log line, newline included
pub fn format_line(label: &str, diff: &DiffRecord) -> String {
    format!(
        "{}: {}: {} → {}\n",
        label, diff.address, diff.old_value, diff.new_value
    )
}

/// Outcome of one compared sheet or sheet pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    pub label: String,
    pub differences: usize,
    /// Why the pair was skipped, if it was
    pub skipped: Option<String>,
}

impl SectionSummary {
    pub fn compared(label: impl Into<String>, differences: usize) -> Self {
        Self {
            label: label.into(),
            differences,
            skipped: None,
        }
    }

    pub fn skipped(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            differences: 0,
            skipped: Some(reason.into()),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sections: Vec<SectionSummary>,
    pub total: usize,
}

impl RunSummary {
    pub fn push(&mut self, section: SectionSummary) {
        self.total += section.differences;
        self.sections.push(section);
    }

    /// Differences found for `label`, if it was compared
    pub fn differences_for(&self, label: &str) -> Option<usize> {
        self.sections
            .iter()
            .find(|s| s.label == label && !s.is_skipped())
            .map(|s| s.differences)
    }

    pub fn skipped_count(&self) -> usize {
        self.sections.iter().filter(|s| s.is_skipped()).count()
    }
}
