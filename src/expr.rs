use std::sync::atomic::{AtomicUsize, Ordering};

use crate::literal::Literal;
use crate::token::Token;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Returns a fresh identity for expressions that take part in resolution.
/// Identities are unique for the lifetime of the process so that a long
/// running prompt never maps two expressions to the same resolution entry.
pub fn next_id() -> usize {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, PartialEq, Clone)]
pub struct UnaryData {
    pub operator: Token,
    pub expr: Box<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct BinaryData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

/// `and`/`or`. Kept apart from `Binary` because evaluation short-circuits.
#[derive(Debug, PartialEq, Clone)]
pub struct LogicalData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct GroupingData {
    pub expr: Box<Expr>,
}

/// A variable read; `id` keys its entry in the resolution table.
#[derive(Debug, PartialEq, Clone)]
pub struct VariableData {
    pub id: usize,
    pub name: Token,
}

#[derive(Debug, PartialEq, Clone)]
pub struct AssignData {
    pub id: usize,
    pub name: Token,
    pub value: Box<Expr>,
}

/// A call; the closing paren token anchors runtime errors for it.
#[derive(Debug, PartialEq, Clone)]
pub struct CallData {
    pub callee: Box<Expr>,
    pub paren: Token,
    pub arguments: Vec<Expr>,
}

/// A property read.
#[derive(Debug, PartialEq, Clone)]
pub struct GetData {
    pub object: Box<Expr>,
    pub name: Token,
}

/// A property write.
#[derive(Debug, PartialEq, Clone)]
pub struct SetData {
    pub object: Box<Expr>,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ThisData {
    pub id: usize,
    pub keyword: Token,
}

/// A `super.method` access.
#[derive(Debug, PartialEq, Clone)]
pub struct SuperData {
    pub id: usize,
    pub keyword: Token,
    pub method: Token,
}

/// An expression of the language. Immutable once built by the parser.
#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Literal(Literal),
    Logical(LogicalData),
    Unary(UnaryData),
    Binary(BinaryData),
    Grouping(GroupingData),
    Variable(VariableData),
    Assign(AssignData),
    Call(CallData),
    Get(GetData),
    Set(SetData),
    This(ThisData),
    Super(SuperData),
}
