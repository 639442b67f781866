//! Tree visitor for traversing the Ruby syntax tree
//!
//! Provides a trait-based visitor pattern that cops can implement.
//! Default implementations handle traversal; cops override `visit_node`
//! and return `false` to prune a subtree.

use crate::ast::{Node, NodeKind};

/// Trait for visiting syntax tree nodes
pub trait Visitor {
    /// Called for each node. Return `true` to continue into children.
    fn visit_node(&mut self, _node: &Node) -> bool {
        true
    }

    /// Visit a whole program (entry point)
    fn visit_program(&mut self, statements: &[Node]) {
        for stmt in statements {
            self.traverse(stmt);
        }
    }

    /// Traverse a node and its children
    fn traverse(&mut self, node: &Node) {
        if !self.visit_node(node) {
            return;
        }

        match &node.kind {
            NodeKind::Class { body, .. } | NodeKind::Def { body, .. } => {
                for inner in body {
                    self.traverse(inner);
                }
            }
            NodeKind::Visibility { def, .. } => {
                if let Some(def) = def {
                    self.traverse(def);
                }
            }
            NodeKind::Send {
                receiver,
                args,
                block,
                ..
            } => {
                if let Some(receiver) = receiver {
                    self.traverse(receiver);
                }
                for arg in args {
                    self.traverse(arg);
                }
                if let Some(block) = block {
                    for inner in &block.body {
                        self.traverse(inner);
                    }
                }
            }
            NodeKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                self.traverse(cond);
                self.traverse(then_branch);
                self.traverse(else_branch);
            }
            NodeKind::If {
                cond,
                then_body,
                elsif_clauses,
                else_body,
                ..
            } => {
                self.traverse(cond);
                for inner in then_body {
                    self.traverse(inner);
                }
                for clause in elsif_clauses {
                    self.traverse(&clause.cond);
                    for inner in &clause.body {
                        self.traverse(inner);
                    }
                }
                if let Some(else_body) = else_body {
                    for inner in else_body {
                        self.traverse(inner);
                    }
                }
            }
            NodeKind::WhileMod { body, cond } => {
                self.traverse(body);
                self.traverse(cond);
            }
            NodeKind::RescueMod { body, handler } => {
                self.traverse(body);
                self.traverse(handler);
            }
            NodeKind::Assign { target, value } => {
                self.traverse(target);
                self.traverse(value);
            }
            NodeKind::Not { operand } => {
                self.traverse(operand);
            }
            NodeKind::BinaryOp { lhs, rhs, .. } => {
                self.traverse(lhs);
                self.traverse(rhs);
            }
            NodeKind::Index { receiver, index } => {
                self.traverse(receiver);
                self.traverse(index);
            }
            NodeKind::Array { elements } => {
                for inner in elements {
                    self.traverse(inner);
                }
            }
            NodeKind::BlockPass { value } => {
                self.traverse(value);
            }
            NodeKind::Ivar(_)
            | NodeKind::Const(_)
            | NodeKind::Symbol(_)
            | NodeKind::Str(_)
            | NodeKind::Int(_)
            | NodeKind::Float(_)
            | NodeKind::Nil
            | NodeKind::True
            | NodeKind::False => {}
        }
    }
}

/// Helper function to run a visitor on a program
pub fn visit<V: Visitor>(visitor: &mut V, statements: &[Node]) {
    visitor.visit_program(statements);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::span::Span;

    struct CountingVisitor {
        count: usize,
        prune_ternaries: bool,
    }

    impl Visitor for CountingVisitor {
        fn visit_node(&mut self, node: &Node) -> bool {
            self.count += 1;
            !(self.prune_ternaries && matches!(node.kind, NodeKind::Ternary { .. }))
        }
    }

    fn ternary() -> Node {
        Node::new(
            NodeKind::Ternary {
                cond: Box::new(Node::new(NodeKind::Nil, Span::new(0, 3))),
                then_branch: Box::new(Node::new(NodeKind::Int(1), Span::new(6, 7))),
                else_branch: Box::new(Node::new(NodeKind::Int(2), Span::new(10, 11))),
            },
            Span::new(0, 11),
        )
    }

    #[test]
    fn test_traversal_reaches_children() {
        let mut visitor = CountingVisitor {
            count: 0,
            prune_ternaries: false,
        };
        visitor.visit_program(&[ternary()]);
        assert_eq!(visitor.count, 4);
    }

    #[test]
    fn test_prune_stops_descent() {
        let mut visitor = CountingVisitor {
            count: 0,
            prune_ternaries: true,
        };
        visitor.visit_program(&[ternary()]);
        assert_eq!(visitor.count, 1);
    }
}
