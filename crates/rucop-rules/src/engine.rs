//! Bounded autocorrect pass loop
//!
//! Each pass parses the current source, runs every cop, applies the
//! non-conflicting edit plans, and re-parses the result to verify the
//! rewrite. Passes repeat until a fixed point or the pass bound; a
//! deferred or unresolvable correction is still reported, just not
//! corrected.

use rucop_core::{apply_edits, sort_offenses, Edit, EditError, Offense};
use rucop_parser::{parse, ParseError};
use thiserror::Error;

use crate::logging;
use crate::registry::{CopRegistry, Detection};

/// Upper bound on correction passes. Two cops cannot cascade further
/// than this in practice; the bound guards against pathological
/// conflicts rather than expected workloads.
pub const MAX_PASSES: usize = 5;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The input (not a correction) failed to parse.
    #[error("Unparsable source: {0}")]
    Parse(#[from] ParseError),

    #[error("Edit application failed: {0}")]
    Edit(#[from] EditError),
}

/// The outcome of analyzing one file.
#[derive(Debug)]
pub struct Analysis {
    /// Source text after all verified corrections.
    pub source: String,
    /// All offenses found, sorted by position, deduplicated across
    /// passes.
    pub offenses: Vec<Offense>,
    /// Number of passes run.
    pub passes: usize,
}

/// Analyze and autocorrect a single file's source.
pub fn run(source: &str, registry: &CopRegistry) -> Result<Analysis, EngineError> {
    let mut current = source.to_string();
    let mut report: Vec<Offense> = Vec::new();
    let mut passes = 0;

    for pass in 1..=MAX_PASSES {
        passes = pass;
        logging::log_pass_start(pass);

        let program = parse(&current)?;
        let detections = registry.check_all(&program, &current);

        let accepted = accept_plans(&detections);
        let (next, verified) = apply_verified(&current, &detections, &accepted)?;

        // Entries pushed during this pass are never merge targets;
        // rediscoveries only fold into earlier passes' records.
        let mut matched = vec![false; report.len()];
        for (index, detection) in detections.iter().enumerate() {
            let corrected = verified.contains(&index);
            for offense in &detection.offenses {
                merge_offense(&mut report, &mut matched, offense, corrected);
            }
        }

        let changed = next != current;
        current = next;
        if !changed {
            break;
        }
    }

    sort_offenses(&mut report);
    Ok(Analysis {
        source: current,
        offenses: report,
        passes,
    })
}

/// Accept edit plans in discovery order, deferring any plan that
/// overlaps an already-accepted one. Deferred plans get another chance
/// on the next pass, against the rewritten tree.
fn accept_plans(detections: &[Detection]) -> Vec<usize> {
    let mut accepted: Vec<usize> = Vec::new();
    for (index, detection) in detections.iter().enumerate() {
        let plan = match &detection.plan {
            Some(plan) if !plan.is_empty() => plan,
            _ => continue,
        };
        let conflict = accepted.iter().any(|&earlier| {
            detections[earlier]
                .plan
                .as_ref()
                .is_some_and(|p| p.conflicts_with(plan))
        });
        if conflict {
            logging::log_conflict(detection_cop_name(detection));
            continue;
        }
        accepted.push(index);
    }
    accepted
}

/// Apply accepted plans and round-trip-check the result.
///
/// If the combined output fails to re-parse, each plan is retried
/// alone and only the survivors are kept; corrupting the source is
/// never an option.
fn apply_verified(
    current: &str,
    detections: &[Detection],
    accepted: &[usize],
) -> Result<(String, Vec<usize>), EngineError> {
    if accepted.is_empty() {
        return Ok((current.to_string(), Vec::new()));
    }

    let candidate = apply_edits(current, &collect_edits(detections, accepted))?;
    if parse(&candidate).is_ok() {
        return Ok((candidate, accepted.to_vec()));
    }

    let mut survivors = Vec::new();
    for &index in accepted {
        let plan = match &detections[index].plan {
            Some(plan) => plan,
            None => continue,
        };
        let alone = apply_edits(current, plan.edits())?;
        if parse(&alone).is_ok() {
            survivors.push(index);
        } else {
            logging::log_verify_failure(detection_cop_name(&detections[index]));
        }
    }
    if survivors.is_empty() {
        return Ok((current.to_string(), Vec::new()));
    }

    let candidate = apply_edits(current, &collect_edits(detections, &survivors))?;
    if parse(&candidate).is_ok() {
        Ok((candidate, survivors))
    } else {
        Ok((current.to_string(), Vec::new()))
    }
}

fn collect_edits(detections: &[Detection], indices: &[usize]) -> Vec<Edit> {
    let mut edits = Vec::new();
    for &index in indices {
        if let Some(plan) = &detections[index].plan {
            edits.extend(plan.edits().iter().cloned());
        }
    }
    edits
}

fn detection_cop_name(detection: &Detection) -> &str {
    detection
        .offenses
        .first()
        .map(|offense| offense.cop_name.as_str())
        .unwrap_or("unknown")
}

/// Merge an offense into the report, deduplicating rediscoveries of
/// the same finding across passes. The first-seen span is kept so the
/// report points at the original source location. Each earlier record
/// absorbs at most one rediscovery per pass, uncorrected records
/// first, so identical findings at different locations stay distinct.
fn merge_offense(
    report: &mut Vec<Offense>,
    matched: &mut [bool],
    offense: &Offense,
    corrected: bool,
) {
    let target = report
        .iter()
        .enumerate()
        .take(matched.len())
        .filter(|(i, o)| {
            !matched[*i] && o.cop_name == offense.cop_name && o.message == offense.message
        })
        .min_by_key(|(_, o)| o.corrected)
        .map(|(i, _)| i);

    if let Some(i) = target {
        matched[i] = true;
        if corrected {
            report[i].mark_corrected();
        }
        return;
    }
    let mut merged = offense.clone();
    if corrected {
        merged.mark_corrected();
    }
    report.push(merged);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(source: &str) -> Analysis {
        run(source, &CopRegistry::default()).unwrap()
    }

    #[test]
    fn test_clean_source_single_pass() {
        let analysis = analyze("class UserController\n  def index; end\n  def show; end\nend\n");
        assert_eq!(analysis.passes, 1);
        assert!(analysis.offenses.is_empty());
        assert!(analysis.source.contains("def index"));
    }

    #[test]
    fn test_corrects_action_order() {
        let source = "class UserController\n  def show; end\n  def index; end\nend\n";
        let analysis = analyze(source);
        assert_eq!(
            analysis.source,
            "class UserController\n  def index; end\n  def show; end\nend\n"
        );
        assert_eq!(analysis.offenses.len(), 1);
        assert!(analysis.offenses[0].corrected);
    }

    #[test]
    fn test_corrects_presence() {
        let analysis = analyze("x = a.present? ? a : nil\n");
        assert_eq!(analysis.source, "x = a.presence\n");
        assert_eq!(analysis.offenses.len(), 1);
        assert!(analysis.offenses[0].corrected);
    }

    #[test]
    fn test_conflicting_plans_resolve_across_passes() {
        let source = "class UserController\n  def show\n    a.present? ? a : nil\n  end\n  def index; end\nend\n";
        let analysis = analyze(source);

        assert!(analysis.source.contains("a.presence"));
        let index_pos = analysis.source.find("def index").unwrap();
        let show_pos = analysis.source.find("def show").unwrap();
        assert!(index_pos < show_pos);

        assert_eq!(analysis.offenses.len(), 2);
        assert!(analysis.offenses.iter().all(|o| o.corrected));
        assert!(analysis.passes > 2);
    }

    #[test]
    fn test_offenses_not_duplicated_across_passes() {
        let source = "class UserController\n  def show\n    a.present? ? a : nil\n  end\n  def index; end\nend\n";
        let analysis = analyze(source);
        let action_offenses = analysis
            .offenses
            .iter()
            .filter(|o| o.cop_name == "rails/action_order")
            .count();
        assert_eq!(action_offenses, 1);
    }

    #[test]
    fn test_identical_findings_stay_distinct() {
        let source = "x = a.present? ? a : nil\ny = a.present? ? a : nil\n";
        let analysis = analyze(source);
        assert_eq!(analysis.source, "x = a.presence\ny = a.presence\n");
        assert_eq!(analysis.offenses.len(), 2);
        assert!(analysis.offenses.iter().all(|o| o.corrected));
    }

    #[test]
    fn test_unparsable_source_is_an_error() {
        let result = run("class Unclosed", &CopRegistry::default());
        assert!(matches!(result, Err(EngineError::Parse(_))));
    }

    #[test]
    fn test_fixed_point_is_idempotent() {
        let source = "class UserController\n  def destroy; end\n  def index; end\nend\n";
        let first = analyze(source);
        let second = analyze(&first.source);
        assert_eq!(second.source, first.source);
        assert!(second.offenses.is_empty());
    }
}
