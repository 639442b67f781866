//! Cop: simplify presence tests to `.presence`
//!
//! Detects conditionals that test `receiver.present?` or
//! `receiver.blank?` and return the receiver unchanged in the present
//! branch, and rewrites them to `receiver.presence` or
//! `receiver.presence || other`.

use rucop_core::{visit, Edit, EditPlan, Node, NodeKind, Offense, Visitor};

use crate::matcher::{
    disqualified_branch, presence_predicate, single_expression, structural_eq,
};
use crate::registry::{Cop, Detection};

pub const COP_NAME: &str = "rails/presence";

pub struct PresenceCop;

impl Cop for PresenceCop {
    fn name(&self) -> &'static str {
        COP_NAME
    }

    fn description(&self) -> &'static str {
        "Replace conditionals on present?/blank? with .presence"
    }

    fn check(&self, program: &[Node], source: &str) -> Vec<Detection> {
        let mut visitor = PresenceVisitor {
            source,
            detections: Vec::new(),
        };
        visit(&mut visitor, program);
        visitor.detections
    }
}

struct PresenceVisitor<'s> {
    source: &'s str,
    detections: Vec<Detection>,
}

impl Visitor for PresenceVisitor<'_> {
    fn visit_node(&mut self, node: &Node) -> bool {
        if let Some(detection) = try_simplify(node, self.source) {
            self.detections.push(detection);
            return false;
        }
        true
    }
}

/// A conditional normalized to "value when present, otherwise other".
struct Candidate<'a> {
    receiver: &'a Node,
    present_branch: &'a Node,
    other: Option<&'a Node>,
}

fn try_simplify(node: &Node, source: &str) -> Option<Detection> {
    let candidate = normalize(node)?;

    if !structural_eq(candidate.present_branch, candidate.receiver) {
        return None;
    }
    if let Some(other) = candidate.other {
        if disqualified_branch(other) {
            return None;
        }
    }

    let receiver_text = candidate.receiver.text(source);
    let replacement = match candidate.other {
        None => format!("{}.presence", receiver_text),
        Some(other) if other.is_nil() => format!("{}.presence", receiver_text),
        Some(other) => format!(
            "{}.presence || {}",
            receiver_text,
            parenthesized_call_text(other, source)
        ),
    };

    let message = format!(
        "Use {} instead of {}.",
        replacement,
        node.text(source)
    );
    let offense = Offense::new(COP_NAME, message, node.span);
    let edit = Edit::new(node.span, replacement);

    match EditPlan::from_edits(vec![edit]) {
        Ok(plan) => Some(Detection::correctable(vec![offense], plan)),
        Err(_) => Some(Detection::report_only(vec![offense])),
    }
}

/// Reduce the four recognized shapes to a common candidate form.
///
/// Polarity is normalized so the present branch is always the one taken
/// when the receiver is present; `blank?` counts as negated `present?`
/// and `unless` flips once more. The modifier form has no alternative
/// branch, so it only matches with positive effective polarity.
fn normalize(node: &Node) -> Option<Candidate<'_>> {
    match &node.kind {
        NodeKind::Ternary {
            cond,
            then_branch,
            else_branch,
        } => {
            let predicate = presence_predicate(cond)?;
            let (present_branch, other) = if predicate.positive {
                (then_branch.as_ref(), else_branch.as_ref())
            } else {
                (else_branch.as_ref(), then_branch.as_ref())
            };
            Some(Candidate {
                receiver: predicate.receiver,
                present_branch,
                other: Some(other),
            })
        }
        NodeKind::If {
            unless,
            modifier: true,
            cond,
            then_body,
            ..
        } => {
            let predicate = presence_predicate(cond)?;
            if predicate.positive == *unless {
                return None;
            }
            Some(Candidate {
                receiver: predicate.receiver,
                present_branch: single_expression(then_body)?,
                other: None,
            })
        }
        NodeKind::If {
            unless,
            modifier: false,
            cond,
            then_body,
            elsif_clauses,
            else_body,
        } => {
            if !elsif_clauses.is_empty() {
                return None;
            }
            let predicate = presence_predicate(cond)?;
            let else_body = else_body.as_ref()?;

            let then_expr = single_expression(then_body)?;
            let else_expr = single_expression(else_body)?;
            let (present_branch, other) = if predicate.positive != *unless {
                (then_expr, else_expr)
            } else {
                (else_expr, then_expr)
            };
            Some(Candidate {
                receiver: predicate.receiver,
                present_branch,
                other: Some(other),
            })
        }
        _ => None,
    }
}

/// Source text of a branch expression, adding parentheses around the
/// argument list of a bare call so precedence survives inside `||`.
fn parenthesized_call_text(node: &Node, source: &str) -> String {
    if let NodeKind::Send {
        receiver,
        method,
        args,
        parens: false,
        block: None,
    } = &node.kind
    {
        if !args.is_empty() {
            let arg_texts: Vec<&str> = args.iter().map(|arg| arg.text(source)).collect();
            let prefix = match receiver {
                Some(receiver) => format!("{}.", receiver.text(source)),
                None => String::new(),
            };
            return format!("{}{}({})", prefix, method, arg_texts.join(", "));
        }
    }
    node.text(source).to_string()
}
