//! Span-based source code editing with format preservation

use crate::span::Span;
use thiserror::Error;

/// Errors that can occur during edit application
#[derive(Error, Debug)]
pub enum EditError {
    #[error("Overlapping edits detected at offset {0}")]
    OverlappingEdits(usize),

    #[error("Edit span {start}..{end} out of bounds for source length {len}")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },
}

/// Represents a single code edit: replace the bytes of `span` with
/// `replacement`.
#[derive(Debug, Clone)]
pub struct Edit {
    pub span: Span,
    pub replacement: String,
}

impl Edit {
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }
}

/// The edits correcting a single finding, applied or deferred as a unit.
///
/// Edits within a plan never overlap; `push` enforces the invariant.
#[derive(Debug, Clone, Default)]
pub struct EditPlan {
    edits: Vec<Edit>,
}

impl EditPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a plan from edits, validating that none overlap.
    pub fn from_edits(edits: Vec<Edit>) -> Result<Self, EditError> {
        let mut plan = Self::new();
        for edit in edits {
            plan.push(edit)?;
        }
        Ok(plan)
    }

    pub fn push(&mut self, edit: Edit) -> Result<(), EditError> {
        if self.edits.iter().any(|e| e.span.overlaps(edit.span)) {
            return Err(EditError::OverlappingEdits(edit.span.start));
        }
        self.edits.push(edit);
        Ok(())
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Whether any edit in this plan overlaps any edit in another plan.
    pub fn conflicts_with(&self, other: &EditPlan) -> bool {
        self.edits
            .iter()
            .any(|a| other.edits.iter().any(|b| a.span.overlaps(b.span)))
    }
}

/// Apply edits to source code, preserving all surrounding text.
///
/// Edits are applied in reverse offset order so earlier replacements do
/// not invalidate later spans.
pub fn apply_edits(source: &str, edits: &[Edit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    // Sort edits by start position (descending) for safe replacement
    let mut sorted_edits: Vec<&Edit> = edits.iter().collect();
    sorted_edits.sort_by(|a, b| b.span.start.cmp(&a.span.start));

    // Validate: check for overlapping edits and bounds
    let source_len = source.len();
    let mut prev_start: Option<usize> = None;

    for edit in &sorted_edits {
        if edit.span.end > source_len {
            return Err(EditError::SpanOutOfBounds {
                start: edit.span.start,
                end: edit.span.end,
                len: source_len,
            });
        }

        if let Some(prev) = prev_start {
            if edit.span.end > prev {
                return Err(EditError::OverlappingEdits(edit.span.start));
            }
        }

        prev_start = Some(edit.span.start);
    }

    // Apply edits from end to start
    let mut result = source.to_string();

    for edit in sorted_edits {
        result.replace_range(edit.span.start..edit.span.end, &edit.replacement);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_replacement() {
        let source = "a.present? ? a : nil";
        let edit = Edit::new(Span::new(0, 20), "a.presence");

        let result = apply_edits(source, &[edit]).unwrap();
        assert_eq!(result, "a.presence");
    }

    #[test]
    fn test_multiple_edits() {
        let source = "def show; end\ndef index; end";
        let edits = vec![
            Edit::new(Span::new(0, 13), "def index; end"),
            Edit::new(Span::new(14, 28), "def show; end"),
        ];

        let result = apply_edits(source, &edits).unwrap();
        assert_eq!(result, "def index; end\ndef show; end");
    }

    #[test]
    fn test_empty_edits() {
        let source = "unchanged";
        let result = apply_edits(source, &[]).unwrap();
        assert_eq!(result, "unchanged");
    }

    #[test]
    fn test_out_of_bounds() {
        let source = "short";
        let edit = Edit::new(Span::new(0, 100), "replacement");

        let result = apply_edits(source, &[edit]);
        assert!(matches!(result, Err(EditError::SpanOutOfBounds { .. })));
    }

    #[test]
    fn test_overlapping_edits_rejected() {
        let source = "abcdefgh";
        let edits = vec![
            Edit::new(Span::new(0, 4), "x"),
            Edit::new(Span::new(3, 6), "y"),
        ];

        let result = apply_edits(source, &edits);
        assert!(matches!(result, Err(EditError::OverlappingEdits(_))));
    }

    #[test]
    fn test_plan_rejects_overlap() {
        let mut plan = EditPlan::new();
        plan.push(Edit::new(Span::new(0, 4), "x")).unwrap();
        let err = plan.push(Edit::new(Span::new(2, 6), "y"));
        assert!(err.is_err());
        assert_eq!(plan.edits().len(), 1);
    }

    #[test]
    fn test_plan_conflicts() {
        let mut a = EditPlan::new();
        a.push(Edit::new(Span::new(0, 4), "x")).unwrap();
        let mut b = EditPlan::new();
        b.push(Edit::new(Span::new(3, 6), "y")).unwrap();
        let mut c = EditPlan::new();
        c.push(Edit::new(Span::new(10, 12), "z")).unwrap();

        assert!(a.conflicts_with(&b));
        assert!(!a.conflicts_with(&c));
    }
}
