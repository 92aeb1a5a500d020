//! Centralised error hierarchy for the **tinyc front end**.
//!
//! Every stage (reader, scanner, parser, checker) converts its failure modes
//! into one of the variants defined here. The pipeline is fail‑fast: the
//! first error produced aborts the pass and is returned to the caller as is.
//!
//! The module **does not** print diagnostics itself

use std::fmt;
use std::io;
use thiserror::Error;

use log::info;

use crate::token::Position;

/// Canonical error type used throughout the front end.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FrontError {
    /// Lexical (scanner) error.
    #[error("[{pos}] Lexical error in {origin}: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// Where the offending character sits.
        pos: Position,

        /// Name of the scanner function that gave up.
        origin: &'static str,
    },

    /// Syntactic (parser) error.
    #[error("[{pos}] Syntax error in {origin}: {message}")]
    Syntax {
        message: String,
        pos: Position,
        origin: &'static str,
    },

    /// Static rule violation found by the checker.
    #[error("[{pos}] Semantic error in {origin}: {kind} at `{node}` (scope depth {scope_depth})")]
    Semantic {
        kind: SemanticKind,

        /// Canonical rendering of the offending node.
        node: String,

        /// Position of the statement containing `node`.
        pos: Position,

        /// Number of scopes enclosing the program scope when the error fired.
        scope_depth: usize,

        origin: &'static str,
    },

    /// An invariant of the front end itself was broken.
    #[error("Internal error in {origin}: {message}")]
    Internal {
        message: String,
        origin: &'static str,
    },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The closed set of rules the checker enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticKind {
    /// Name used before any visible declaration.
    Undeclared(String),

    /// Name declared twice in the same scope.
    Redeclared(String),

    /// `val` binding written to.
    Immutable(String),

    /// Array depths on both sides of an assignment or declaration disagree.
    ShapeMismatch { expected: usize, found: usize },

    /// Array used where a scalar operand is required.
    NonScalarOperand,

    /// `if`/loop condition is an array.
    NonScalarCondition,

    /// Subscripted more times than the variable has dimensions.
    TooManySubscripts { name: String, depth: usize },

    /// Target of an assignment or mutating operator is not a variable.
    NotAssignable,

    /// `break` with no enclosing loop.
    BreakOutsideLoop,
}

impl fmt::Display for SemanticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticKind::Undeclared(name) => {
                write!(f, "'{}' used before declaration", name)
            }

            SemanticKind::Redeclared(name) => {
                write!(f, "'{}' already declared in this scope", name)
            }

            SemanticKind::Immutable(name) => {
                write!(f, "cannot modify immutable '{}'", name)
            }

            SemanticKind::ShapeMismatch { expected, found } => write!(
                f,
                "array depth mismatch: expected {}, found {}",
                expected, found
            ),

            SemanticKind::NonScalarOperand => write!(f, "array used as a scalar operand"),

            SemanticKind::NonScalarCondition => write!(f, "condition must be a scalar"),

            SemanticKind::TooManySubscripts { name, depth } => write!(
                f,
                "'{}' has only {} dimension(s) but is subscripted further",
                name, depth
            ),

            SemanticKind::NotAssignable => write!(f, "expression is not assignable"),

            SemanticKind::BreakOutsideLoop => write!(f, "'break' outside of a loop"),
        }
    }
}

impl FrontError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(pos: Position, origin: &'static str, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: pos={}, msg={}", pos, message);

        FrontError::Lex {
            message,
            pos,
            origin,
        }
    }

    /// Helper constructor for the **parser**.
    pub fn syntax<S: Into<String>>(pos: Position, origin: &'static str, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Syntax error: pos={}, msg={}", pos, message);

        FrontError::Syntax {
            message,
            pos,
            origin,
        }
    }

    /// Helper constructor for the **checker**.
    pub fn semantic(
        kind: SemanticKind,
        node: String,
        pos: Position,
        scope_depth: usize,
        origin: &'static str,
    ) -> Self {
        info!("Creating Semantic error: pos={}, kind={}", pos, kind);

        FrontError::Semantic {
            kind,
            node,
            pos,
            scope_depth,
            origin,
        }
    }

    pub fn internal<S: Into<String>>(origin: &'static str, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Internal error: origin={}, msg={}", origin, message);

        FrontError::Internal { message, origin }
    }

    /// Process exit status the CLI reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            FrontError::Lex { .. } | FrontError::Syntax { .. } | FrontError::Semantic { .. } => 65,
            FrontError::Internal { .. } => 70,
            FrontError::Io(_) => 74,
        }
    }

    /// The semantic rule that was violated, if this is a checker error.
    pub fn semantic_kind(&self) -> Option<&SemanticKind> {
        match self {
            FrontError::Semantic { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, FrontError>;
