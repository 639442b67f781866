//! Offense records reported by cops

use crate::span::Span;

/// A single style violation found by a cop.
#[derive(Debug, Clone)]
pub struct Offense {
    /// The cop that reported this offense (e.g. "rails/presence")
    pub cop_name: String,
    /// Human-readable message
    pub message: String,
    /// The exact source range reported to the user
    pub span: Span,
    /// Whether the offense was autocorrected
    pub corrected: bool,
}

impl Offense {
    pub fn new(cop_name: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self {
            cop_name: cop_name.into(),
            message: message.into(),
            span,
            corrected: false,
        }
    }

    pub fn mark_corrected(&mut self) {
        self.corrected = true;
    }
}

/// Sort offenses by source position, then cop name.
pub fn sort_offenses(offenses: &mut [Offense]) {
    offenses.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then_with(|| a.span.end.cmp(&b.span.end))
            .then_with(|| a.cop_name.cmp(&b.cop_name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offense_creation() {
        let mut offense = Offense::new("rails/presence", "Use a.presence", Span::new(4, 24));
        assert_eq!(offense.cop_name, "rails/presence");
        assert!(!offense.corrected);

        offense.mark_corrected();
        assert!(offense.corrected);
    }

    #[test]
    fn test_sort_offenses() {
        let mut offenses = vec![
            Offense::new("b", "second", Span::new(10, 20)),
            Offense::new("a", "first", Span::new(0, 5)),
        ];
        sort_offenses(&mut offenses);
        assert_eq!(offenses[0].message, "first");
    }
}
