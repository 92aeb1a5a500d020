//! Syntax trees shared by the parser, the printer and the checker.
//!
//! Every node owns its children outright (`Box`/`Vec`); there is no sharing and
//! no back‑reference anywhere in the tree. A block is a plain `Vec<Stmt>`, so
//! "empty block" is just an empty vector.

use serde::Serialize;

use crate::token::{CallKind, Operator, Position};

/// **Expression tree** node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// No expression at this position.
    Empty,

    /// Variable reference.
    Name(String),

    /// Integer literal (also `true`/`false` and character literals).
    Number(i32),

    /// Non‑assignment infix operator: `a + b`, `x <= y`, …
    Binary {
        left: Box<Expr>,
        op: Operator,
        right: Box<Expr>,
    },

    /// `=` or a compound assignment. Same shape as `Binary`, different rules.
    Assign {
        left: Box<Expr>,
        op: Operator,
        right: Box<Expr>,
    },

    /// Prefix (`!x`, `++x`) or suffix (`x++`) operator.
    Unary {
        operand: Box<Expr>,
        op: Operator,
        prefix: bool,
    },

    /// One subscript level. `a[i][j]` nests as `ArrayRef{ArrayRef{a, i}, j}`.
    /// A missing index marks a declared dimension (`var a[];`) and only
    /// occurs in declarations.
    ArrayRef {
        name: Box<Expr>,
        index: Option<Box<Expr>>,
    },

    /// `{a, b, c}`; string literals are desugared into one of these.
    ArrayLiteral(Vec<Expr>),

    /// `print(e)`, `input()`, `break`.
    Call {
        key: CallKind,
        arg: Option<Box<Expr>>,
    },
}

impl Expr {
    pub fn is_empty(&self) -> bool {
        matches!(self, Expr::Empty)
    }

    /// A name or subscript chain, possibly under unary wrappers.
    pub fn is_assignable(&self) -> bool {
        match self {
            Expr::Name(_) | Expr::ArrayRef { .. } => true,
            Expr::Unary { operand, .. } => operand.is_assignable(),
            _ => false,
        }
    }

    /// Number of subscript levels on a `Name`/`ArrayRef` chain, plus the base
    /// name. `None` when the chain does not bottom out in a `Name`.
    pub fn array_chain(&self) -> Option<(&str, Vec<Option<&Expr>>)> {
        let mut indices = Vec::new();
        let mut node = self;

        loop {
            match node {
                Expr::Name(name) => {
                    indices.reverse();
                    return Some((name, indices));
                }

                Expr::ArrayRef { name, index } => {
                    indices.push(index.as_deref());
                    node = &**name;
                }

                _ => return None,
            }
        }
    }

    /// Nesting depth of literal array structure alone: names and operators
    /// count as scalars here since their shape is not known before checking.
    pub fn literal_depth(&self) -> usize {
        match self {
            Expr::ArrayLiteral(elems) => {
                1 + elems.iter().map(Expr::literal_depth).max().unwrap_or(0)
            }
            _ => 0,
        }
    }
}

/// **Statement** node plus the position of its first token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    /// A lone `;`.
    Empty,

    /// `var`/`val` declaration. `name` is a `Name` or an `ArrayRef` chain
    /// whose length gives the declared dimensionality.
    VarDecl {
        name: Expr,
        value: Option<Expr>,
        mutable: bool,
    },

    If {
        cond: Expr,
        then_branch: Block,
        else_branch: Option<Block>,
    },

    /// `while`, and the desugared form of `for`.
    Loop { cond: Expr, body: Block },

    Expr(Expr),
}

/// Ordered statement sequence.
pub type Block = Vec<Stmt>;

impl Stmt {
    pub fn new(kind: StmtKind, pos: Position) -> Self {
        Self { kind, pos }
    }
}
