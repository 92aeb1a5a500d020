use crate::ast::{Expr, Stmt, StmtKind};

/// Converts trees to the canonical text form used for conformance output:
///
/// `STR(x)`, `NUM(3)`, `OP(l, op, r)`, `UNARY(NULL, op, e)` / `UNARY(e, op, NULL)`,
/// `ARR(name, index)`, `{a, b}`, `CALL(print, e)`, `VAR(name, value);`,
/// `VAL(...);`, `IF(cond, then[, else]);`, `LOOP(cond, body);`.
/// An expression statement prints as the bare expression; missing pieces and
/// empty blocks print as `NULL`.
pub struct AstPrinter;

const NULL: &str = "NULL";

impl AstPrinter {
    pub fn print(expr: &Expr) -> String {
        match expr {
            Expr::Empty => NULL.into(),

            Expr::Name(name) => format!("STR({})", name),

            Expr::Number(n) => {
                let mut buf = itoa::Buffer::new();
                format!("NUM({})", buf.format(*n))
            }

            // ── binary / assignment ────────────────────────────────────
            Expr::Binary { left, op, right } | Expr::Assign { left, op, right } => format!(
                "OP({}, {}, {})",
                Self::print(left),
                op,
                Self::print(right)
            ),

            // ── unary: the empty slot shows prefix vs suffix ───────────
            Expr::Unary {
                operand,
                op,
                prefix: true,
            } => format!("UNARY({}, {}, {})", NULL, op, Self::print(operand)),

            Expr::Unary {
                operand,
                op,
                prefix: false,
            } => format!("UNARY({}, {}, {})", Self::print(operand), op, NULL),

            Expr::ArrayRef { name, index } => format!(
                "ARR({}, {})",
                Self::print(name),
                Self::print_opt(index.as_deref())
            ),

            Expr::ArrayLiteral(elems) => {
                let parts: Vec<String> = elems.iter().map(Self::print).collect();
                format!("{{{}}}", parts.join(", "))
            }

            Expr::Call { key, arg } => format!(
                "CALL({}, {})",
                key.as_str(),
                Self::print_opt(arg.as_deref())
            ),
        }
    }

    pub fn print_stmt(stmt: &Stmt) -> String {
        match &stmt.kind {
            StmtKind::Empty => ";".into(),

            StmtKind::Expr(expr) => Self::print(expr),

            StmtKind::VarDecl {
                name,
                value,
                mutable,
            } => format!(
                "{}({}, {});",
                if *mutable { "VAR" } else { "VAL" },
                Self::print(name),
                Self::print_opt(value.as_ref())
            ),

            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => format!(
                    "IF({}, {}, {});",
                    Self::print(cond),
                    Self::print_block(then_branch),
                    Self::print_block(else_branch)
                ),
                None => format!(
                    "IF({}, {});",
                    Self::print(cond),
                    Self::print_block(then_branch)
                ),
            },

            StmtKind::Loop { cond, body } => format!(
                "LOOP({}, {});",
                Self::print(cond),
                Self::print_block(body)
            ),
        }
    }

    /// Statements joined by single spaces; `NULL` for an empty block.
    pub fn print_block(block: &[Stmt]) -> String {
        if block.is_empty() {
            return NULL.into();
        }

        block
            .iter()
            .map(Self::print_stmt)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn print_opt(expr: Option<&Expr>) -> String {
        expr.map(Self::print).unwrap_or_else(|| NULL.into())
    }
}
