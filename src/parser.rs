/*!
Recursive‑descent statement parser and precedence‑climbing expression parser.

The parser pulls tokens from the [`Scanner`] on demand and keeps exactly one
token of lookahead (`current`). Consuming a token moves it out of the
lookahead slot, so a `Name`/`String` payload ends up owned by exactly one
tree node.

Grammar (condensed EBNF)
--------------------------

```text
program     → statement* EOF ;
statement   → ";"
            | ( "var" | "val" ) declName ( "=" expression )? ";"
            | "while" "(" expression ")" body
            | "if" "(" expression ")" block ( "else" ( ifStmt | block ) )?
            | "for" "(" forInit ";" expression ";" expression? ")" body
            | expression ";" ;
declName    → NAME ( "[" expression? "]" )* ;
block       → "{" statement* "}" ;
body        → block | ";" | statement ;
forInit     → ( "var" | "val" ) declName ( "=" expression )?
            | expression ;                        (assignment or assignable)
expression  → atom ( BINOP expression )* ;        (precedence climbing)
atom        → PREFIX atom
            | NAME ( "[" expression "]" )* SUFFIX?
            | NUMBER | STRING
            | "(" expression ")"
            | "{" ( expression ( "," expression )* )? "}"
            | "print" "(" expression ")" | "input" "(" ")" | "break" ;
```

The `;` after the final statement of the input may be left out.

Binary priorities, lowest first: assignment family (right‑assoc) < `||` <
`&&` < `|` < `^` < `&` < `== !=` < `< <= > >=` < `<< >>` < `+ -` < `* / %`.

Two bounds keep trees shallow enough for recursive walks: `max_depth` counts
nested constructs (parentheses, blocks, subscripts, operands), `max_chain`
counts operators folded into one flat chain.

### Logging Policy

| Location                       | Level  | Purpose                                   |
|--------------------------------|--------|-------------------------------------------|
| `Parser::new`, `parse`         | `info` | Lifecycle milestones.                     |
| statement dispatch             | `debug`| High‑level descent into grammar branches. |
*/

use std::io::{BufRead, Cursor};
use std::mem;

use log::{debug, info};

use crate::ast::{Block, Expr, Stmt, StmtKind};
use crate::ast_printer::AstPrinter;
use crate::error::{FrontError, Result};
use crate::scanner::Scanner;
use crate::token::{CallKind, Keyword, Operator, Token, TokenType};

/// Default bound on syntactic nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default bound on operators folded into one left spine (`a + b + c ...`).
pub const DEFAULT_MAX_CHAIN: usize = 1024;

/// Top‑level parser over a streaming scanner.
pub struct Parser<R> {
    scanner: Scanner<R>,
    current: Token,
    depth: usize,
    max_depth: usize,
    max_chain: usize,
}

impl Parser<Cursor<Vec<u8>>> {
    /// Parser over an in‑memory source text.
    pub fn from_source(src: &str) -> Result<Self> {
        Self::new(Scanner::from_source(src))
    }
}

impl<R: BufRead> Parser<R> {
    /// Construct a new parser and load the first token of lookahead.
    pub fn new(mut scanner: Scanner<R>) -> Result<Self> {
        info!("Parser created");

        let current = match scanner.next() {
            Some(token) => token?,
            None => {
                return Err(FrontError::internal(
                    "Parser::new",
                    "scanner produced no tokens",
                ))
            }
        };

        Ok(Self {
            scanner,
            current,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            max_chain: DEFAULT_MAX_CHAIN,
        })
    }

    /// Limit how deeply expressions and blocks may nest.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Limit how many operators one flat chain may fold.
    pub fn with_max_chain(mut self, max_chain: usize) -> Self {
        self.max_chain = max_chain;
        self
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program and return its statement sequence.
    pub fn parse(&mut self) -> Result<Block> {
        info!("Beginning parse phase");

        let program = self.parse_statement_sequence()?;

        if !self.current.is_empty() {
            return Err(self.unexpected("parse", "Unmatched '}'"));
        }

        info!("Parsed {} top-level statement(s)", program.len());

        Ok(program)
    }

    /// Precedence climbing: one atom, then every binary/assignment operator
    /// whose priority is at least `min_priority`.
    ///
    /// Returns [`Expr::Empty`] when no expression starts at the lookahead.
    pub fn parse_expression(&mut self, min_priority: u8) -> Result<Expr> {
        let saved = self.depth;
        self.enter("parse_expression")?;

        let mut left = self.parse_atom()?;
        let mut folds = 0;

        while let Some(op) = self.current.operator() {
            let priority = match op.priority() {
                Some(p) if p >= min_priority => p,
                _ => break,
            };

            let op_token = self.advance()?;

            // Each fold adds a level to the left spine.
            folds += 1;

            if folds > self.max_chain {
                return Err(FrontError::syntax(
                    op_token.pos,
                    "parse_expression",
                    format!("Operator chain exceeds the limit of {}", self.max_chain),
                ));
            }

            if op.is_assignment() {
                if !left.is_assignable() {
                    return Err(FrontError::syntax(
                        op_token.pos,
                        "parse_expression",
                        format!("Cannot assign to {}", AstPrinter::print(&left)),
                    ));
                }

                let right = self.parse_operand(priority, op)?;

                left = Expr::Assign {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                };
            } else {
                let right = self.parse_operand(priority + 1, op)?;

                left = Expr::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                };
            }
        }

        self.depth = saved;

        Ok(left)
    }

    // ──────────────────────── statement rules ─────────────────────

    fn parse_statement_sequence(&mut self) -> Result<Block> {
        let mut block: Block = Vec::new();

        while !self.current.is_empty() && !self.current.is_delimiter('}') {
            block.extend(self.parse_single_statement()?);
        }

        Ok(block)
    }

    /// One source statement. `for` yields two (initializer, loop).
    fn parse_single_statement(&mut self) -> Result<Block> {
        debug!("Entering statement at {}", self.current.pos);

        match self.current.token_type {
            TokenType::Keyword(Keyword::Var) => {
                let stmt = self.parse_declaration(true)?;
                self.end_statement("parse_declaration")?;
                Ok(vec![stmt])
            }

            TokenType::Keyword(Keyword::Val) => {
                let stmt = self.parse_declaration(false)?;
                self.end_statement("parse_declaration")?;
                Ok(vec![stmt])
            }

            TokenType::Keyword(Keyword::While) => Ok(vec![self.parse_while()?]),

            TokenType::Keyword(Keyword::If) => Ok(vec![self.parse_if()?]),

            TokenType::Keyword(Keyword::For) => self.parse_for(),

            TokenType::Delimiter(';') => {
                let token = self.advance()?;
                Ok(vec![Stmt::new(StmtKind::Empty, token.pos)])
            }

            _ => {
                let stmt = self.parse_expression_statement("parse_single_statement")?;
                self.end_statement("parse_single_statement")?;
                Ok(vec![stmt])
            }
        }
    }

    fn parse_expression_statement(&mut self, origin: &'static str) -> Result<Stmt> {
        let pos = self.current.pos;
        let expr = self.parse_expression(0)?;

        if expr.is_empty() {
            return Err(self.unexpected(origin, "Expected expression"));
        }

        Ok(Stmt::new(StmtKind::Expr(expr), pos))
    }

    /// `var`/`val` name, optional initializer. The trailing `;` is left to
    /// the caller so `for` headers can share this.
    fn parse_declaration(&mut self, mutable: bool) -> Result<Stmt> {
        let keyword = self.advance()?;
        let name = self.parse_declared_name()?;

        let value = if self.current.operator() == Some(Operator::Assign) {
            let equals = self.advance()?;
            let value = self.parse_expression(0)?;

            if value.is_empty() {
                return Err(self.unexpected("parse_declaration", "Expected initializer"));
            }

            let dims = name.array_chain().map_or(0, |(_, dims)| dims.len());

            if value.literal_depth() > dims {
                return Err(FrontError::syntax(
                    equals.pos,
                    "parse_declaration",
                    format!(
                        "Initializer has {} array level(s) but {} declares {}",
                        value.literal_depth(),
                        AstPrinter::print(&name),
                        dims
                    ),
                ));
            }

            Some(value)
        } else {
            None
        };

        debug!("Parsed declaration of {}", AstPrinter::print(&name));

        Ok(Stmt::new(
            StmtKind::VarDecl {
                name,
                value,
                mutable,
            },
            keyword.pos,
        ))
    }

    /// `NAME ( "[" expression? "]" )*`. Dimensions may be left open.
    fn parse_declared_name(&mut self) -> Result<Expr> {
        if !matches!(self.current.token_type, TokenType::Name(_)) {
            return Err(self.unexpected("parse_declared_name", "Expected variable name"));
        }

        let mut expr = Expr::Name(self.take_name()?);
        let saved = self.depth;

        while self.current.is_delimiter('[') {
            self.advance()?;
            self.enter("parse_declared_name")?;

            let index = if self.current.is_delimiter(']') {
                None
            } else {
                let index = self.parse_expression(0)?;

                if index.is_empty() {
                    return Err(self.unexpected("parse_declared_name", "Expected dimension"));
                }

                Some(Box::new(index))
            };

            self.consume(']', "parse_declared_name", "Expected ']' after dimension")?;

            expr = Expr::ArrayRef {
                name: Box::new(expr),
                index,
            };
        }

        self.depth = saved;

        Ok(expr)
    }

    fn parse_while(&mut self) -> Result<Stmt> {
        let keyword = self.advance()?;
        let cond = self.parse_condition("parse_while")?;
        let body = self.parse_loop_body("parse_while")?;

        Ok(Stmt::new(StmtKind::Loop { cond, body }, keyword.pos))
    }

    fn parse_if(&mut self) -> Result<Stmt> {
        let keyword = self.advance()?;
        let cond = self.parse_condition("parse_if")?;
        let then_branch = self.parse_braced_block("parse_if")?;

        let else_branch = if self.current.is_keyword(Keyword::Else) {
            self.advance()?;

            if self.current.is_keyword(Keyword::If) {
                let saved = self.depth;
                self.enter("parse_if")?;
                let nested = self.parse_if()?;
                self.depth = saved;

                Some(vec![nested])
            } else if self.current.is_delimiter('{') {
                Some(self.parse_braced_block("parse_if")?)
            } else {
                return Err(self.unexpected("parse_if", "Expected '{' or 'if' after 'else'"));
            }
        } else {
            None
        };

        Ok(Stmt::new(
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            },
            keyword.pos,
        ))
    }

    /// `for (init; cond; update) body` becomes `init; Loop{cond, body; update}`.
    fn parse_for(&mut self) -> Result<Block> {
        let keyword = self.advance()?;

        self.consume('(', "parse_for", "Expected '(' after 'for'")?;

        let init = self.parse_for_init()?;

        self.consume(';', "parse_for", "Expected ';' after loop initializer")?;

        let cond = self.parse_expression(0)?;

        if cond.is_empty() {
            return Err(self.unexpected("parse_for", "Expected loop condition"));
        }

        self.consume(';', "parse_for", "Expected ';' after loop condition")?;

        let update_pos = self.current.pos;
        let update = self.parse_expression(0)?;

        self.consume(')', "parse_for", "Expected ')' after for clauses")?;

        let mut body = self.parse_loop_body("parse_for")?;

        if !update.is_empty() {
            body.push(Stmt::new(StmtKind::Expr(update), update_pos));
        }

        debug!("Desugared for-loop into initializer + loop of {} statement(s)", body.len());

        Ok(vec![init, Stmt::new(StmtKind::Loop { cond, body }, keyword.pos)])
    }

    fn parse_for_init(&mut self) -> Result<Stmt> {
        if self.current.is_keyword(Keyword::Var) {
            return self.parse_declaration(true);
        }

        if self.current.is_keyword(Keyword::Val) {
            return self.parse_declaration(false);
        }

        let pos = self.current.pos;
        let expr = self.parse_expression(0)?;

        match expr {
            Expr::Assign { .. } => {}
            ref e if e.is_assignable() => {}
            _ => {
                return Err(FrontError::syntax(
                    pos,
                    "parse_for_init",
                    "Loop initializer must be a declaration or an assignment",
                ));
            }
        }

        Ok(Stmt::new(StmtKind::Expr(expr), pos))
    }

    /// `"(" expression ")"` with a non‑empty expression.
    fn parse_condition(&mut self, origin: &'static str) -> Result<Expr> {
        self.consume('(', origin, "Expected '(' before condition")?;

        let cond = self.parse_expression(0)?;

        if cond.is_empty() {
            return Err(self.unexpected(origin, "Expected condition"));
        }

        self.consume(')', origin, "Expected ')' after condition")?;

        Ok(cond)
    }

    /// Loop bodies: a braced block, `;` for nothing, or a single statement.
    fn parse_loop_body(&mut self, origin: &'static str) -> Result<Block> {
        if self.current.is_delimiter('{') {
            return self.parse_braced_block(origin);
        }

        if self.current.is_delimiter(';') {
            self.advance()?;
            return Ok(Vec::new());
        }

        let saved = self.depth;
        self.enter(origin)?;
        let body = self.parse_single_statement()?;
        self.depth = saved;

        Ok(body)
    }

    fn parse_braced_block(&mut self, origin: &'static str) -> Result<Block> {
        self.consume('{', origin, "Expected '{'")?;

        let saved = self.depth;
        self.enter(origin)?;

        let block = self.parse_statement_sequence()?;

        self.consume('}', origin, "Expected '}' after block")?;
        self.depth = saved;

        Ok(block)
    }

    // ─────────────────────── expression rules ─────────────────────

    /// Right operand of a binary/assignment operator; must be present.
    fn parse_operand(&mut self, min_priority: u8, op: Operator) -> Result<Expr> {
        let right = self.parse_expression(min_priority)?;

        if right.is_empty() {
            return Err(self.unexpected(
                "parse_expression",
                &format!("Expected expression after '{}'", op),
            ));
        }

        Ok(right)
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        match &self.current.token_type {
            TokenType::Operator(op) => {
                let op = *op;
                self.parse_prefix(op)
            }

            TokenType::Name(_) => {
                let chain = self.parse_subscripts()?;
                self.parse_suffix(chain)
            }

            TokenType::Number(n) => {
                let n = *n;
                self.advance()?;
                Ok(Expr::Number(n))
            }

            TokenType::String(_) => self.parse_string_literal(),

            TokenType::Delimiter('(') => {
                self.advance()?;

                let inner = self.parse_expression(0)?;

                if inner.is_empty() {
                    return Err(self.unexpected("parse_atom", "Expected expression after '('"));
                }

                self.consume(')', "parse_atom", "Expected ')' after expression")?;

                Ok(inner)
            }

            TokenType::Delimiter('{') => self.parse_array_literal(),

            TokenType::Keyword(kw) => {
                let kw = *kw;
                self.parse_call(kw)
            }

            _ => Ok(Expr::Empty),
        }
    }

    /// Prefix operator applied to an assignable atom.
    fn parse_prefix(&mut self, op: Operator) -> Result<Expr> {
        let op_token = self.advance()?;

        if !op.is_prefix() {
            return Err(FrontError::syntax(
                op_token.pos,
                "parse_prefix",
                format!("'{}' is not a unary operator", op),
            ));
        }

        let saved = self.depth;
        self.enter("parse_prefix")?;
        let operand = self.parse_atom()?;
        self.depth = saved;

        if !operand.is_assignable() {
            return Err(FrontError::syntax(
                op_token.pos,
                "parse_prefix",
                format!("Operand of prefix '{}' must be assignable", op),
            ));
        }

        Ok(Expr::Unary {
            operand: Box::new(operand),
            op,
            prefix: true,
        })
    }

    /// `NAME ( "[" expression "]" )*`
    fn parse_subscripts(&mut self) -> Result<Expr> {
        let mut expr = Expr::Name(self.take_name()?);
        let saved = self.depth;

        while self.current.is_delimiter('[') {
            self.advance()?;
            self.enter("parse_subscripts")?;

            let index = self.parse_expression(0)?;

            if index.is_empty() {
                return Err(self.unexpected("parse_subscripts", "Expected array index"));
            }

            self.consume(']', "parse_subscripts", "Expected ']' after index")?;

            expr = Expr::ArrayRef {
                name: Box::new(expr),
                index: Some(Box::new(index)),
            };
        }

        self.depth = saved;

        Ok(expr)
    }

    fn parse_suffix(&mut self, operand: Expr) -> Result<Expr> {
        match self.current.operator() {
            Some(op) if op.is_suffix() => {
                self.advance()?;

                Ok(Expr::Unary {
                    operand: Box::new(operand),
                    op,
                    prefix: false,
                })
            }

            _ => Ok(operand),
        }
    }

    /// `"ab"` → `{97, 98}`. The decoded text is consumed here.
    fn parse_string_literal(&mut self) -> Result<Expr> {
        let token = self.advance()?;

        match token.token_type {
            TokenType::String(text) => Ok(Expr::ArrayLiteral(
                text.chars().map(|c| Expr::Number(c as i32)).collect(),
            )),
            other => Err(FrontError::internal(
                "parse_string_literal",
                format!("expected string token, found {:?}", other),
            )),
        }
    }

    fn parse_array_literal(&mut self) -> Result<Expr> {
        self.advance()?; // '{'

        let saved = self.depth;
        self.enter("parse_array_literal")?;

        let mut elements: Vec<Expr> = Vec::new();

        if !self.current.is_delimiter('}') {
            loop {
                let element = self.parse_expression(0)?;

                if element.is_empty() {
                    return Err(self.unexpected("parse_array_literal", "Expected array element"));
                }

                elements.push(element);

                if !self.current.is_delimiter(',') {
                    break;
                }

                self.advance()?;
            }
        }

        self.consume('}', "parse_array_literal", "Expected '}' after array literal")?;
        self.depth = saved;

        elements.shrink_to_fit();

        Ok(Expr::ArrayLiteral(elements))
    }

    /// `print(e)`, `input()`, `break`; other keywords are not expressions.
    fn parse_call(&mut self, kw: Keyword) -> Result<Expr> {
        let keyword = self.advance()?;

        match kw {
            Keyword::Print => {
                self.consume('(', "parse_call", "Expected '(' after 'print'")?;

                let saved = self.depth;
                self.enter("parse_call")?;
                let arg = self.parse_expression(0)?;
                self.depth = saved;

                if arg.is_empty() {
                    return Err(self.unexpected("parse_call", "Expected argument to 'print'"));
                }

                self.consume(')', "parse_call", "Expected ')' after argument")?;

                Ok(Expr::Call {
                    key: CallKind::Print,
                    arg: Some(Box::new(arg)),
                })
            }

            Keyword::Input => {
                self.consume('(', "parse_call", "Expected '(' after 'input'")?;
                self.consume(')', "parse_call", "Expected ')' after 'input('")?;

                Ok(Expr::Call {
                    key: CallKind::Input,
                    arg: None,
                })
            }

            Keyword::Break => Ok(Expr::Call {
                key: CallKind::Break,
                arg: None,
            }),

            other => Err(FrontError::syntax(
                keyword.pos,
                "parse_call",
                format!("Unexpected keyword '{}' in expression", other.as_str()),
            )),
        }
    }

    // ────────────────────── utility helpers ───────────────────────

    /// Move the lookahead out and pull the next token into its place.
    fn advance(&mut self) -> Result<Token> {
        let next = match self.scanner.next() {
            Some(token) => token?,
            None => Token::new(TokenType::Empty, self.current.pos),
        };

        Ok(mem::replace(&mut self.current, next))
    }

    /// Consume a `Name` token and hand over its text.
    fn take_name(&mut self) -> Result<String> {
        let token = self.advance()?;

        match token.token_type {
            TokenType::Name(name) => Ok(name),
            other => Err(FrontError::internal(
                "take_name",
                format!("expected name token, found {:?}", other),
            )),
        }
    }

    fn consume(&mut self, c: char, origin: &'static str, message: &str) -> Result<Token> {
        if self.current.is_delimiter(c) {
            return self.advance();
        }

        debug!("consume('{}') failed on {:?}", c, self.current.token_type);

        Err(self.unexpected(origin, message))
    }

    /// `;` after a declaration or expression statement. The very last
    /// statement of the input may leave it out.
    fn end_statement(&mut self, origin: &'static str) -> Result<()> {
        if self.current.is_empty() {
            return Ok(());
        }

        self.consume(';', origin, "Expected ';' after statement")?;
        Ok(())
    }

    fn enter(&mut self, origin: &'static str) -> Result<()> {
        self.depth += 1;

        if self.depth > self.max_depth {
            return Err(FrontError::syntax(
                self.current.pos,
                origin,
                format!("Nesting exceeds the limit of {}", self.max_depth),
            ));
        }

        Ok(())
    }

    /// Syntax error at the lookahead, naming what was found.
    fn unexpected(&self, origin: &'static str, message: &str) -> FrontError {
        let found = match &self.current.token_type {
            TokenType::Empty => "end of input".to_string(),
            TokenType::Name(name) => format!("'{}'", name),
            TokenType::String(s) => format!("string {:?}", s),
            TokenType::Number(n) => format!("'{}'", n),
            TokenType::Operator(op) => format!("'{}'", op),
            TokenType::Delimiter(c) => format!("'{}'", c),
            TokenType::Keyword(kw) => format!("'{}'", kw.as_str()),
        };

        FrontError::syntax(
            self.current.pos,
            origin,
            format!("{}, found {}", message, found),
        )
    }
}
