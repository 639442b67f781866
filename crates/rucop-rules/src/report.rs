//! Diagnostic records for CLI and editor integrations

use rucop_core::{LineIndex, Offense};
use serde::Serialize;

/// One offense resolved to line/column positions for display.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub message: String,
    pub cop_name: String,
    pub corrected: bool,
}

/// Resolve offenses against the source they were reported on.
///
/// End positions are inclusive: they name the last character of the
/// offense range.
pub fn diagnostics(file: &str, source: &str, offenses: &[Offense]) -> Vec<Diagnostic> {
    let index = LineIndex::new(source);
    offenses
        .iter()
        .map(|offense| {
            let (start_line, start_column) = index.line_col(offense.span.start);
            let last = offense.span.end.saturating_sub(1).max(offense.span.start);
            let (end_line, end_column) = index.line_col(last);
            Diagnostic {
                file: file.to_string(),
                start_line,
                start_column,
                end_line,
                end_column,
                message: offense.message.clone(),
                cop_name: offense.cop_name.clone(),
                corrected: offense.corrected,
            }
        })
        .collect()
}

#[derive(Serialize)]
struct Totals {
    offenses: usize,
    corrected: usize,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    totals: Totals,
    diagnostics: &'a [Diagnostic],
}

/// Render diagnostics as pretty-printed JSON.
pub fn to_json(diagnostics: &[Diagnostic]) -> String {
    let output = JsonOutput {
        totals: Totals {
            offenses: diagnostics.len(),
            corrected: diagnostics.iter().filter(|d| d.corrected).count(),
        },
        diagnostics,
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rucop_core::Span;

    #[test]
    fn test_line_column_resolution() {
        let source = "class C\n  def show; end\nend\n";
        let offense = Offense::new("rails/action_order", "message", Span::new(10, 23));
        let diags = diagnostics("app.rb", source, &[offense]);

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].file, "app.rb");
        assert_eq!(diags[0].start_line, 2);
        assert_eq!(diags[0].start_column, 3);
        assert_eq!(diags[0].end_line, 2);
        assert_eq!(diags[0].end_column, 15);
    }

    #[test]
    fn test_multiline_offense() {
        let source = "if a.present?\n  a\nelse\n  b\nend\n";
        let offense = Offense::new("rails/presence", "message", Span::new(0, 30));
        let diags = diagnostics("app.rb", source, &[offense]);

        assert_eq!(diags[0].start_line, 1);
        assert_eq!(diags[0].end_line, 5);
        assert_eq!(diags[0].end_column, 3);
    }

    #[test]
    fn test_json_totals() {
        let source = "a.present? ? a : nil\n";
        let mut offense = Offense::new("rails/presence", "message", Span::new(0, 20));
        offense.mark_corrected();
        let diags = diagnostics("app.rb", source, &[offense]);

        let json = to_json(&diags);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["totals"]["offenses"], 1);
        assert_eq!(parsed["totals"]["corrected"], 1);
        assert_eq!(parsed["diagnostics"][0]["cop_name"], "rails/presence");
    }
}
