//! Abstract Syntax Tree types for predicates.

use std::fmt;

/// Byte range within the predicate text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// A variable slot: a factor name read at a trial offset.
///
/// `indexed` records whether the offset was written explicitly (`color[0]`)
/// or implied by a bare name (`color`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slot {
    pub name: String,
    pub offset: i64,
    pub indexed: bool,
}

/// Expression types.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal(Literal),
    /// Factor reference, optionally at a trial offset
    Var(Slot, Span),
    /// Binary operation (comparison or connective)
    BinaryOp(BinaryOp, Box<Expr>, Box<Expr>, Span),
    /// Unary operation
    UnaryOp(UnaryOp, Box<Expr>, Span),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(lit) => lit.span,
            Expr::Var(_, span) => *span,
            Expr::BinaryOp(_, _, _, span) => *span,
            Expr::UnaryOp(_, _, span) => *span,
        }
    }

    /// Visit every variable slot, left to right.
    pub fn for_each_slot<'a>(&'a self, f: &mut impl FnMut(&'a Slot)) {
        match self {
            Expr::Literal(_) => {}
            Expr::Var(slot, _) => f(slot),
            Expr::BinaryOp(_, left, right, _) => {
                left.for_each_slot(f);
                right.for_each_slot(f);
            }
            Expr::UnaryOp(_, operand, _) => operand.for_each_slot(f),
        }
    }
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralKind::None => write!(f, "None"),
            LiteralKind::Bool(true) => write!(f, "True"),
            LiteralKind::Bool(false) => write!(f, "False"),
            LiteralKind::Int(i) => write!(f, "{}", i),
            LiteralKind::Float(fl) => write!(f, "{:?}", fl),
            LiteralKind::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    // Logical
    And,
    Or,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        !matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Eq => write!(f, "=="),
            BinaryOp::NotEq => write!(f, "!="),
            BinaryOp::Lt => write!(f, "<"),
            BinaryOp::LtEq => write!(f, "<="),
            BinaryOp::Gt => write!(f, ">"),
            BinaryOp::GtEq => write!(f, ">="),
            BinaryOp::And => write!(f, "and"),
            BinaryOp::Or => write!(f, "or"),
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
}
