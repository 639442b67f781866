//! Cop: controller actions in the expected order
//!
//! Within the public prefix of a class body, methods named in the
//! configured expected order must appear in that relative order. Other
//! methods are unconstrained and never moved. The correction stably
//! sorts the ranked methods into the slots they already occupy, so
//! unranked methods and the surrounding formatting stay put.

use rucop_core::{visit, Edit, EditPlan, Node, NodeKind, Offense, Span, Visitor};

use crate::config::DEFAULT_EXPECTED_ORDER;
use crate::registry::{Cop, Detection};

pub const COP_NAME: &str = "rails/action_order";

pub struct ActionOrderCop {
    expected_order: Vec<String>,
}

impl ActionOrderCop {
    pub fn new(expected_order: Vec<String>) -> Self {
        Self { expected_order }
    }

    fn rank(&self, name: &str) -> Option<usize> {
        self.expected_order.iter().position(|n| n == name)
    }
}

impl Default for ActionOrderCop {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXPECTED_ORDER
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

impl Cop for ActionOrderCop {
    fn name(&self) -> &'static str {
        COP_NAME
    }

    fn description(&self) -> &'static str {
        "Order controller actions in the configured expected order"
    }

    fn check(&self, program: &[Node], source: &str) -> Vec<Detection> {
        let mut visitor = ClassVisitor {
            cop: self,
            source,
            detections: Vec::new(),
        };
        visit(&mut visitor, program);
        visitor.detections
    }
}

struct ClassVisitor<'c, 's> {
    cop: &'c ActionOrderCop,
    source: &'s str,
    detections: Vec<Detection>,
}

impl Visitor for ClassVisitor<'_, '_> {
    fn visit_node(&mut self, node: &Node) -> bool {
        if let NodeKind::Class { body, .. } = &node.kind {
            if let Some(detection) = check_class_body(self.cop, body, self.source) {
                self.detections.push(detection);
            }
        }
        true
    }
}

/// A method definition in the public prefix that carries a rank.
struct RankedDef<'a> {
    node: &'a Node,
    name: &'a str,
    rank: usize,
}

fn check_class_body(cop: &ActionOrderCop, body: &[Node], source: &str) -> Option<Detection> {
    let ranked = ranked_defs(cop, body);
    if ranked.len() < 2 {
        return None;
    }

    let mut offenses = Vec::new();
    for pair in ranked.windows(2) {
        if pair[1].rank < pair[0].rank {
            offenses.push(Offense::new(
                COP_NAME,
                format!(
                    "Action {} should appear before {}.",
                    pair[1].name, pair[0].name
                ),
                pair[1].node.span,
            ));
        }
    }
    if offenses.is_empty() {
        return None;
    }

    // Stable sort by rank, then write each method into the slot it
    // should occupy. Slots are the source ranges the ranked methods
    // already hold, so everything between them is untouched.
    let mut sorted: Vec<&RankedDef> = ranked.iter().collect();
    sorted.sort_by_key(|def| def.rank);

    let mut edits = Vec::new();
    for (slot, incoming) in ranked.iter().zip(&sorted) {
        if std::ptr::eq(slot.node, incoming.node) {
            continue;
        }
        let slot_span = span_with_trailing_comment(source, slot.node.span);
        let incoming_span = span_with_trailing_comment(source, incoming.node.span);
        edits.push(Edit::new(slot_span, incoming_span.text(source)));
    }

    match EditPlan::from_edits(edits) {
        Ok(plan) => Some(Detection::correctable(offenses, plan)),
        Err(_) => Some(Detection::report_only(offenses)),
    }
}

/// Collect the ranked method definitions in the public prefix.
///
/// A bare narrowing visibility marker ends the prefix. The inline form
/// (`private def x; end`) excludes that one method without ending the
/// prefix, and a bare `public` marker does not narrow.
fn ranked_defs<'a>(cop: &ActionOrderCop, body: &'a [Node]) -> Vec<RankedDef<'a>> {
    let mut defs = Vec::new();
    for stmt in body {
        match &stmt.kind {
            NodeKind::Visibility { scope, def: None } if scope.is_narrowing() => break,
            NodeKind::Def { name, .. } => {
                if let Some(rank) = cop.rank(name) {
                    defs.push(RankedDef {
                        node: stmt,
                        name,
                        rank,
                    });
                }
            }
            _ => {}
        }
    }
    defs
}

/// Extend a definition span through a same-line trailing comment, so a
/// moved method keeps its comment attached.
fn span_with_trailing_comment(source: &str, span: Span) -> Span {
    let bytes = source.as_bytes();
    let mut pos = span.end;
    while pos < bytes.len() && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
        pos += 1;
    }
    if pos < bytes.len() && bytes[pos] == b'#' {
        while pos < bytes.len() && bytes[pos] != b'\n' {
            pos += 1;
        }
        return Span::new(span.start, pos);
    }
    span
}
