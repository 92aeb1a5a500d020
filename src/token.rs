use log::debug;
use serde::Serialize;
use std::fmt;

/// 1‑based source coordinates, used only for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, col {}", self.line, self.column)
    }
}

/// Every operator spelling the scanner recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    ShlAssign,
    ShrAssign,
    AndAssign,
    XorAssign,
    OrAssign,
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Not,
    BitNot,
    Inc,
    Dec,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Assign => "=",
            Operator::AddAssign => "+=",
            Operator::SubAssign => "-=",
            Operator::MulAssign => "*=",
            Operator::DivAssign => "/=",
            Operator::ModAssign => "%=",
            Operator::ShlAssign => "<<=",
            Operator::ShrAssign => ">>=",
            Operator::AndAssign => "&=",
            Operator::XorAssign => "^=",
            Operator::OrAssign => "|=",
            Operator::Or => "||",
            Operator::And => "&&",
            Operator::BitOr => "|",
            Operator::BitXor => "^",
            Operator::BitAnd => "&",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Shl => "<<",
            Operator::Shr => ">>",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Not => "!",
            Operator::BitNot => "~",
            Operator::Inc => "++",
            Operator::Dec => "--",
        }
    }

    /// Priority in the binary table, lowest first. `None` for operators that
    /// only ever appear as unary prefix/suffix.
    pub fn priority(self) -> Option<u8> {
        let p = match self {
            Operator::Assign
            | Operator::AddAssign
            | Operator::SubAssign
            | Operator::MulAssign
            | Operator::DivAssign
            | Operator::ModAssign
            | Operator::ShlAssign
            | Operator::ShrAssign
            | Operator::AndAssign
            | Operator::XorAssign
            | Operator::OrAssign => 0,
            Operator::Or => 1,
            Operator::And => 2,
            Operator::BitOr => 3,
            Operator::BitXor => 4,
            Operator::BitAnd => 5,
            Operator::Eq | Operator::Ne => 6,
            Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => 7,
            Operator::Shl | Operator::Shr => 8,
            Operator::Add | Operator::Sub => 9,
            Operator::Mul | Operator::Div | Operator::Mod => 10,
            Operator::Not | Operator::BitNot | Operator::Inc | Operator::Dec => return None,
        };

        Some(p)
    }

    /// `=` and the compound assignments. Right‑associative.
    pub fn is_assignment(self) -> bool {
        self.priority() == Some(0)
    }

    pub fn is_prefix(self) -> bool {
        matches!(
            self,
            Operator::Not | Operator::BitNot | Operator::Inc | Operator::Dec | Operator::Sub
        )
    }

    pub fn is_suffix(self) -> bool {
        matches!(self, Operator::Inc | Operator::Dec)
    }

    /// Unary operators that write back to their operand.
    pub fn mutates_operand(self) -> bool {
        matches!(self, Operator::Inc | Operator::Dec | Operator::Sub)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reserved words. `true`/`false` never reach this enum: the scanner turns them
/// into numeric literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Keyword {
    Var,
    Val,
    While,
    For,
    If,
    Else,
    Print,
    Input,
    Break,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Var => "var",
            Keyword::Val => "val",
            Keyword::While => "while",
            Keyword::For => "for",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::Print => "print",
            Keyword::Input => "input",
            Keyword::Break => "break",
        }
    }
}

/// The built‑in call forms usable in expression position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CallKind {
    Print,
    Input,
    Break,
}

impl CallKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CallKind::Print => "print",
            CallKind::Input => "input",
            CallKind::Break => "break",
        }
    }
}

/// The classified payload of a token.
///
/// `Name` and `String` own their text; the parser takes the whole token by
/// value when it consumes it, so the payload moves into the tree exactly once.
/// `Empty` marks the end of input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TokenType {
    Empty,
    Name(String),
    String(String),
    Number(i32),
    Operator(Operator),
    Delimiter(char),
    Keyword(Keyword),
}

/// A scanned token plus where it started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub token_type: TokenType,
    pub pos: Position,
}

impl Token {
    pub fn new(token_type: TokenType, pos: Position) -> Self {
        debug!("Creating new token: type={:?}, pos={}", token_type, pos);

        Self { token_type, pos }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.token_type, TokenType::Empty)
    }

    pub fn is_delimiter(&self, c: char) -> bool {
        self.token_type == TokenType::Delimiter(c)
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.token_type == TokenType::Keyword(kw)
    }

    /// The operator carried by this token, if any.
    pub fn operator(&self) -> Option<Operator> {
        match self.token_type {
            TokenType::Operator(op) => Some(op),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token_type {
            TokenType::Empty => write!(f, "EMPTY"),
            TokenType::Name(name) => write!(f, "NAME {}", name),
            TokenType::String(s) => write!(f, "STRING {:?}", s),
            TokenType::Number(n) => {
                let mut buf = itoa::Buffer::new();
                write!(f, "NUMBER {}", buf.format(*n))
            }
            TokenType::Operator(op) => write!(f, "OPERATOR {}", op),
            TokenType::Delimiter(c) => write!(f, "DELIMITER {}", c),
            TokenType::Keyword(kw) => write!(f, "KEYWORD {}", kw.as_str()),
        }
    }
}
