//! Static checking pass for **tinyc** programs.
//!
//! The checker walks the finished statement tree once, left to right, keeping
//! an [`Environment`] chain rooted at the program scope. Every `if`/`else`
//! branch and every loop body gets a fresh child scope that is dropped when
//! the branch has been checked. It enforces, failing on the first violation:
//!
//! 1. declare‑before‑use, no redeclaration within one scope, `val` is read‑only;
//! 2. array depth: each expression has a remaining depth (0 = scalar); both
//!    sides of `=` must agree, operators and conditions want scalars;
//! 3. targets of assignment and of `++ -- -` must be mutable variables;
//! 4. a declaration's initializer may not be deeper than the declared name.
//!
//! The tree itself is never modified.

use std::mem;

use log::{debug, info};

use crate::ast::{Expr, Stmt, StmtKind};
use crate::ast_printer::AstPrinter;
use crate::environment::{Environment, VarData};
use crate::error::{FrontError, Result, SemanticKind};
use crate::token::{CallKind, Operator, Position};

pub struct Checker {
    env: Environment,
    loop_depth: usize,
    pos: Position, // statement currently being checked
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker {
    pub fn new() -> Self {
        info!("Checker instantiated");

        Checker {
            env: Environment::new(),
            loop_depth: 0,
            pos: Position::default(),
        }
    }

    /// Check a whole program in the program scope.
    pub fn check(&mut self, program: &[Stmt]) -> Result<()> {
        info!("Beginning check pass over {} statement(s)", program.len());

        for stmt in program {
            self.check_stmt(stmt)?;
        }

        info!("Check pass completed");

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────────

    fn check_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        self.pos = stmt.pos;

        debug!("Checking stmt at {}", stmt.pos);

        match &stmt.kind {
            StmtKind::Empty => {}

            StmtKind::Expr(expr) => {
                self.depth_of(expr)?;
            }

            StmtKind::VarDecl {
                name,
                value,
                mutable,
            } => self.check_declaration(name, value.as_ref(), *mutable)?,

            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.check_condition(cond)?;
                self.check_scoped(then_branch)?;

                if let Some(else_branch) = else_branch {
                    self.check_scoped(else_branch)?;
                }
            }

            StmtKind::Loop { cond, body } => {
                self.check_condition(cond)?;

                self.loop_depth += 1;
                self.check_scoped(body)?;
                self.loop_depth -= 1;
            }
        }

        Ok(())
    }

    fn check_declaration(&mut self, name: &Expr, value: Option<&Expr>, mutable: bool) -> Result<()> {
        let (base, dims) = name.array_chain().ok_or_else(|| {
            FrontError::internal(
                "check_declaration",
                format!("declared name is not a name: {}", AstPrinter::print(name)),
            )
        })?;

        for dim in dims.iter().flatten() {
            self.expect_scalar(dim, SemanticKind::NonScalarOperand, "check_declaration")?;
        }

        if let Some(value) = value {
            let found = self.depth_of(value)?;

            if found > dims.len() {
                return Err(self.error(
                    SemanticKind::ShapeMismatch {
                        expected: dims.len(),
                        found,
                    },
                    value,
                    "check_declaration",
                ));
            }
        }

        let var = VarData {
            name: base.to_string(),
            mutable,
            array_depth: dims.len(),
        };

        self.env.define(var).map_err(|var| {
            debug!(
                "Scope already binds: {}",
                self.env.names().collect::<Vec<_>>().join(", ")
            );

            self.error(SemanticKind::Redeclared(var.name), name, "check_declaration")
        })
    }

    fn check_condition(&self, cond: &Expr) -> Result<()> {
        self.expect_scalar(cond, SemanticKind::NonScalarCondition, "check_condition")
    }

    /// Check `block` inside a fresh child scope.
    fn check_scoped(&mut self, block: &[Stmt]) -> Result<()> {
        self.begin_scope();

        for stmt in block {
            self.check_stmt(stmt)?;
        }

        self.end_scope()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate `expr` and return its remaining array depth.
    fn depth_of(&self, expr: &Expr) -> Result<usize> {
        match expr {
            Expr::Empty | Expr::Number(_) => Ok(0),

            Expr::Name(name) => Ok(self.lookup(name, expr, "check_name")?.array_depth),

            Expr::Binary { left, right, .. } => {
                self.expect_scalar(left, SemanticKind::NonScalarOperand, "check_binary")?;
                self.expect_scalar(right, SemanticKind::NonScalarOperand, "check_binary")?;
                Ok(0)
            }

            Expr::Assign { left, op, right } => self.check_assign(left, *op, right, expr),

            Expr::Unary { operand, op, .. } => {
                if op.mutates_operand() {
                    self.mutable_target(operand, expr, "check_unary")?;
                }

                self.expect_scalar(operand, SemanticKind::NonScalarOperand, "check_unary")?;
                Ok(0)
            }

            Expr::ArrayRef { .. } => self.check_array_ref(expr),

            Expr::ArrayLiteral(elements) => {
                let mut deepest = 0;

                for element in elements {
                    deepest = deepest.max(self.depth_of(element)?);
                }

                Ok(deepest + 1)
            }

            Expr::Call { key, arg } => {
                if *key == CallKind::Break && self.loop_depth == 0 {
                    return Err(self.error(SemanticKind::BreakOutsideLoop, expr, "check_call"));
                }

                if let Some(arg) = arg {
                    self.expect_scalar(arg, SemanticKind::NonScalarOperand, "check_call")?;
                }

                Ok(0)
            }
        }
    }

    fn check_assign(&self, left: &Expr, op: Operator, right: &Expr, node: &Expr) -> Result<usize> {
        self.mutable_target(left, node, "check_assign")?;

        let target = self.depth_of(left)?;
        let value = self.depth_of(right)?;

        if op == Operator::Assign {
            if target != value {
                return Err(self.error(
                    SemanticKind::ShapeMismatch {
                        expected: target,
                        found: value,
                    },
                    node,
                    "check_assign",
                ));
            }
        } else if target != 0 || value != 0 {
            return Err(self.error(SemanticKind::NonScalarOperand, node, "check_assign"));
        }

        Ok(target)
    }

    /// Depth left after the subscripts on this chain.
    fn check_array_ref(&self, expr: &Expr) -> Result<usize> {
        let (base, indices) = expr.array_chain().ok_or_else(|| {
            FrontError::internal("check_array_ref", "subscript chain without a base name")
        })?;

        let var = self.lookup(base, expr, "check_array_ref")?;

        for index in &indices {
            match index {
                Some(index) => {
                    self.expect_scalar(index, SemanticKind::NonScalarOperand, "check_array_ref")?
                }
                None => {
                    return Err(FrontError::internal(
                        "check_array_ref",
                        "dimension marker outside a declaration",
                    ))
                }
            }
        }

        if indices.len() > var.array_depth {
            return Err(self.error(
                SemanticKind::TooManySubscripts {
                    name: var.name.clone(),
                    depth: var.array_depth,
                },
                expr,
                "check_array_ref",
            ));
        }

        Ok(var.array_depth - indices.len())
    }

    /// Walk through unary wrappers and subscripts to the variable being
    /// written and make sure it exists and is mutable.
    fn mutable_target(&self, target: &Expr, node: &Expr, origin: &'static str) -> Result<()> {
        let mut current = target;

        loop {
            match current {
                Expr::Unary { operand, .. } => current = &**operand,

                Expr::ArrayRef { name, .. } => current = &**name,

                Expr::Name(name) => {
                    let var = self.lookup(name, current, origin)?;

                    if !var.mutable {
                        return Err(self.error(SemanticKind::Immutable(name.clone()), node, origin));
                    }

                    return Ok(());
                }

                _ => return Err(self.error(SemanticKind::NotAssignable, node, origin)),
            }
        }
    }

    fn expect_scalar(&self, expr: &Expr, kind: SemanticKind, origin: &'static str) -> Result<()> {
        if self.depth_of(expr)? != 0 {
            return Err(self.error(kind, expr, origin));
        }

        Ok(())
    }

    fn lookup(&self, name: &str, node: &Expr, origin: &'static str) -> Result<&VarData> {
        self.env
            .get(name)
            .ok_or_else(|| self.error(SemanticKind::Undeclared(name.to_string()), node, origin))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scope management
    // ─────────────────────────────────────────────────────────────────────────

    fn begin_scope(&mut self) {
        let parent = mem::take(&mut self.env);
        self.env = Environment::with_enclosing(parent);
    }

    fn end_scope(&mut self) -> Result<()> {
        let scope = mem::take(&mut self.env);

        self.env = scope.into_enclosing().ok_or_else(|| {
            FrontError::internal("end_scope", "tried to leave the program scope")
        })?;

        Ok(())
    }

    fn error(&self, kind: SemanticKind, node: &Expr, origin: &'static str) -> FrontError {
        FrontError::semantic(
            kind,
            AstPrinter::print(node),
            self.pos,
            self.env.depth(),
            origin,
        )
    }
}
