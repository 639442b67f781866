//! Syntax tree for the analyzed Ruby subset
//!
//! Nodes form a closed tagged variant over the kind set the cops need.
//! Every node carries the byte span of the source text it was parsed
//! from; child spans are contained in the parent span and ordered
//! left-to-right matching source order. Constructs outside this set are
//! rejected at parse time instead of being represented loosely.

use crate::span::Span;

/// A syntax tree node: a kind tag plus the source range it covers.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Source text of this node, straight from the original buffer.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.kind, NodeKind::Nil)
    }
}

/// Visibility scope introduced by `public`/`protected`/`private`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    /// Whether the marker narrows access below public.
    pub fn is_narrowing(&self) -> bool {
        !matches!(self, Visibility::Public)
    }
}

/// Binary operators the subset supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    Add,
    Sub,
    Mul,
    Div,
}

/// A brace block attached to a message send: `{ |x| x + 1 }`.
#[derive(Debug, Clone)]
pub struct Block {
    pub params: Vec<String>,
    pub body: Vec<Node>,
}

/// An `elsif` clause inside an `if` statement.
#[derive(Debug, Clone)]
pub struct ElsifClause {
    pub cond: Node,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    /// `class Name < Super ... end`
    Class {
        name: String,
        superclass: Option<String>,
        body: Vec<Node>,
    },
    /// `def name(params) ... end`
    Def {
        name: String,
        params: Vec<String>,
        body: Vec<Node>,
    },
    /// A visibility marker: bare (`private`) or inline-modifier form
    /// wrapping a single method definition (`private def x; end`).
    Visibility {
        scope: Visibility,
        def: Option<Box<Node>>,
    },
    /// A message send: `receiver.method(args) { |p| ... }`. Bare
    /// identifiers are receiverless sends with no arguments.
    Send {
        receiver: Option<Box<Node>>,
        method: String,
        args: Vec<Node>,
        /// Whether the argument list was written with parentheses.
        /// Formatting only; ignored by structural comparison.
        parens: bool,
        block: Option<Block>,
    },
    /// `cond ? then : else`
    Ternary {
        cond: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Box<Node>,
    },
    /// `if`/`unless` in block or statement-modifier form.
    If {
        /// True for `unless`: the then-branch runs when cond is falsy.
        unless: bool,
        /// True for the trailing form `expr if cond`.
        modifier: bool,
        cond: Box<Node>,
        then_body: Vec<Node>,
        elsif_clauses: Vec<ElsifClause>,
        else_body: Option<Vec<Node>>,
    },
    /// `expr while cond` (modifier form).
    WhileMod { body: Box<Node>, cond: Box<Node> },
    /// `expr rescue handler` (modifier form).
    RescueMod { body: Box<Node>, handler: Box<Node> },
    /// `target = value`
    Assign { target: Box<Node>, value: Box<Node> },
    /// `!operand`
    Not { operand: Box<Node> },
    BinaryOp {
        op: BinOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    /// `receiver[index]`
    Index { receiver: Box<Node>, index: Box<Node> },
    /// `[a, b, c]`
    Array { elements: Vec<Node> },
    /// `&expr` argument (block pass, e.g. `&:to_s`).
    BlockPass { value: Box<Node> },
    /// `@name`
    Ivar(String),
    /// `Name` (constant reference)
    Const(String),
    /// `:name`
    Symbol(String),
    Str(String),
    Int(i64),
    Float(f64),
    Nil,
    True,
    False,
}
