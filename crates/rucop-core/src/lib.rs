//! rucop-core: Core abstractions for Ruby style checking
//!
//! This crate provides:
//! - `Span` / `LineIndex`: byte ranges and line/column mapping
//! - `Node`: the closed syntax tree the cops analyze
//! - `Edit` / `EditPlan`: span-based code modifications
//! - `apply_edits()`: function to apply edits preserving formatting
//! - `Offense`: a reported style violation
//! - `Visitor`: trait for traversing the syntax tree

pub mod ast;
mod edit;
mod offense;
mod span;
pub mod visitor;

pub use ast::{BinOp, Block, ElsifClause, Node, NodeKind, Visibility};
pub use edit::{apply_edits, Edit, EditError, EditPlan};
pub use offense::{sort_offenses, Offense};
pub use span::{LineIndex, Span};
pub use visitor::{visit, Visitor};
