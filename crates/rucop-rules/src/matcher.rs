//! Structural matching helpers shared by the cops
//!
//! Pattern mismatch is the normal negative outcome everywhere in this
//! module; nothing here is an error.

use rucop_core::ast::{Block, Node, NodeKind};

/// Pure recursive structural equality over node kind and children.
///
/// Ignores spans, parenthesisation of argument lists, and the
/// block/modifier spelling of conditionals - anything that is
/// formatting rather than structure.
pub fn structural_eq(a: &Node, b: &Node) -> bool {
    match (&a.kind, &b.kind) {
        (
            NodeKind::Class {
                name: an,
                superclass: asup,
                body: ab,
            },
            NodeKind::Class {
                name: bn,
                superclass: bsup,
                body: bb,
            },
        ) => an == bn && asup == bsup && all_eq(ab, bb),
        (
            NodeKind::Def {
                name: an,
                params: ap,
                body: ab,
            },
            NodeKind::Def {
                name: bn,
                params: bp,
                body: bb,
            },
        ) => an == bn && ap == bp && all_eq(ab, bb),
        (
            NodeKind::Visibility {
                scope: ascope,
                def: adef,
            },
            NodeKind::Visibility {
                scope: bscope,
                def: bdef,
            },
        ) => ascope == bscope && opt_eq(adef.as_deref(), bdef.as_deref()),
        (
            NodeKind::Send {
                receiver: ar,
                method: am,
                args: aa,
                block: ablk,
                ..
            },
            NodeKind::Send {
                receiver: br,
                method: bm,
                args: ba,
                block: bblk,
                ..
            },
        ) => {
            am == bm
                && opt_eq(ar.as_deref(), br.as_deref())
                && all_eq(aa, ba)
                && block_eq(ablk.as_ref(), bblk.as_ref())
        }
        (
            NodeKind::Ternary {
                cond: ac,
                then_branch: at,
                else_branch: ae,
            },
            NodeKind::Ternary {
                cond: bc,
                then_branch: bt,
                else_branch: be,
            },
        ) => structural_eq(ac, bc) && structural_eq(at, bt) && structural_eq(ae, be),
        (
            NodeKind::If {
                unless: au,
                cond: ac,
                then_body: at,
                elsif_clauses: ael,
                else_body: ae,
                ..
            },
            NodeKind::If {
                unless: bu,
                cond: bc,
                then_body: bt,
                elsif_clauses: bel,
                else_body: be,
                ..
            },
        ) => {
            au == bu
                && structural_eq(ac, bc)
                && all_eq(at, bt)
                && ael.len() == bel.len()
                && ael
                    .iter()
                    .zip(bel)
                    .all(|(x, y)| structural_eq(&x.cond, &y.cond) && all_eq(&x.body, &y.body))
                && match (ae, be) {
                    (Some(x), Some(y)) => all_eq(x, y),
                    (None, None) => true,
                    _ => false,
                }
        }
        (
            NodeKind::WhileMod { body: ab, cond: ac },
            NodeKind::WhileMod { body: bb, cond: bc },
        ) => structural_eq(ab, bb) && structural_eq(ac, bc),
        (
            NodeKind::RescueMod {
                body: ab,
                handler: ah,
            },
            NodeKind::RescueMod {
                body: bb,
                handler: bh,
            },
        ) => structural_eq(ab, bb) && structural_eq(ah, bh),
        (
            NodeKind::Assign {
                target: at,
                value: av,
            },
            NodeKind::Assign {
                target: bt,
                value: bv,
            },
        ) => structural_eq(at, bt) && structural_eq(av, bv),
        (NodeKind::Not { operand: ao }, NodeKind::Not { operand: bo }) => structural_eq(ao, bo),
        (
            NodeKind::BinaryOp {
                op: aop,
                lhs: al,
                rhs: ar,
            },
            NodeKind::BinaryOp {
                op: bop,
                lhs: bl,
                rhs: br,
            },
        ) => aop == bop && structural_eq(al, bl) && structural_eq(ar, br),
        (
            NodeKind::Index {
                receiver: ar,
                index: ai,
            },
            NodeKind::Index {
                receiver: br,
                index: bi,
            },
        ) => structural_eq(ar, br) && structural_eq(ai, bi),
        (NodeKind::Array { elements: ae }, NodeKind::Array { elements: be }) => all_eq(ae, be),
        (NodeKind::BlockPass { value: av }, NodeKind::BlockPass { value: bv }) => {
            structural_eq(av, bv)
        }
        (NodeKind::Ivar(an), NodeKind::Ivar(bn)) => an == bn,
        (NodeKind::Const(an), NodeKind::Const(bn)) => an == bn,
        (NodeKind::Symbol(an), NodeKind::Symbol(bn)) => an == bn,
        (NodeKind::Str(av), NodeKind::Str(bv)) => av == bv,
        (NodeKind::Int(av), NodeKind::Int(bv)) => av == bv,
        (NodeKind::Float(av), NodeKind::Float(bv)) => av == bv,
        (NodeKind::Nil, NodeKind::Nil) => true,
        (NodeKind::True, NodeKind::True) => true,
        (NodeKind::False, NodeKind::False) => true,
        _ => false,
    }
}

fn all_eq(a: &[Node], b: &[Node]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| structural_eq(x, y))
}

fn opt_eq(a: Option<&Node>, b: Option<&Node>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => structural_eq(x, y),
        (None, None) => true,
        _ => false,
    }
}

fn block_eq(a: Option<&Block>, b: Option<&Block>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => x.params == y.params && all_eq(&x.body, &y.body),
        (None, None) => true,
        _ => false,
    }
}

/// A recognized `receiver.present?` / `receiver.blank?` test.
///
/// `positive` is true when the condition is truthy exactly when the
/// receiver is present; `blank?` counts as negated `present?`, and
/// every `!` wrapper flips the polarity once more.
#[derive(Debug, Clone, Copy)]
pub struct PresencePredicate<'a> {
    pub receiver: &'a Node,
    pub positive: bool,
}

/// Match a condition against the presence-predicate pattern.
///
/// Receiverless `present?`/`blank?` calls never match: without a
/// receiver there is nothing to rewrite to `.presence`.
pub fn presence_predicate(node: &Node) -> Option<PresencePredicate<'_>> {
    match &node.kind {
        NodeKind::Not { operand } => {
            let inner = presence_predicate(operand)?;
            Some(PresencePredicate {
                receiver: inner.receiver,
                positive: !inner.positive,
            })
        }
        NodeKind::Send {
            receiver: Some(receiver),
            method,
            args,
            block: None,
            ..
        } if args.is_empty() => match method.as_str() {
            "present?" => Some(PresencePredicate {
                receiver,
                positive: true,
            }),
            "blank?" => Some(PresencePredicate {
                receiver,
                positive: false,
            }),
            _ => None,
        },
        _ => None,
    }
}

/// A branch body usable in a simplification: exactly one expression.
pub fn single_expression(body: &[Node]) -> Option<&Node> {
    match body {
        [only] => Some(only),
        _ => None,
    }
}

/// Branch shapes that disqualify a conditional from simplification:
/// nested conditionals and `while`/`rescue` modifiers change evaluation
/// in ways a plain `||` alternative cannot express.
pub fn disqualified_branch(node: &Node) -> bool {
    matches!(
        node.kind,
        NodeKind::If { .. } | NodeKind::WhileMod { .. } | NodeKind::RescueMod { .. }
    )
}
