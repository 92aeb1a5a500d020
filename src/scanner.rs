//! Module `scanner` implements a one‑pass, streaming lexer for the tinyc language.
//!
//! It pulls bytes from a [`LineReader`] and classifies them into [`Token`]s,
//! skipping whitespace and comments, and emitting exactly one `Empty` token at
//! the end. Designed as a `FusedIterator`: after the end marker, or after the
//! first lexical error, it only yields `None`.
//!
//! # Token Recognition (`scan_token`)
//!
//! Classification order for the first significant byte:
//!
//! 1. Identifiers/keywords: ASCII letter, then alphanumerics or `_`; resolved via
//!    a perfect‑hash `KEYWORDS` map (`true`/`false` become numbers).
//! 2. Operators: greedy longest match (3, 2, then 1 byte) against `OPERATORS`.
//! 3. Delimiters: `; ( ) [ ] { } ,`.
//! 4. Character literals `'x'` (`''` is 0) and string literals `"..."`, both
//!    with the escapes `\n \t \r \" \' \\`.
//! 5. Decimal literals, rejected once they pass `i32::MAX`.
//!
//! `//` and `/* */` comments are skipped before classification.

use std::io::{BufRead, Cursor};
use std::iter::FusedIterator;

use log::{debug, info};
use phf::phf_map;

use crate::error::{FrontError, Result};
use crate::reader::LineReader;
use crate::token::{Keyword, Operator, Position, Token, TokenType};

// ─────────────────────────────────────────────────────────────────────────────
// Static tables (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"var"   => TokenType::Keyword(Keyword::Var),
    b"val"   => TokenType::Keyword(Keyword::Val),
    b"while" => TokenType::Keyword(Keyword::While),
    b"for"   => TokenType::Keyword(Keyword::For),
    b"if"    => TokenType::Keyword(Keyword::If),
    b"else"  => TokenType::Keyword(Keyword::Else),
    b"print" => TokenType::Keyword(Keyword::Print),
    b"input" => TokenType::Keyword(Keyword::Input),
    b"break" => TokenType::Keyword(Keyword::Break),
    b"true"  => TokenType::Number(1),
    b"false" => TokenType::Number(0),
};

static OPERATORS: phf::Map<&'static [u8], Operator> = phf_map! {
    b"="   => Operator::Assign,
    b"+="  => Operator::AddAssign,
    b"-="  => Operator::SubAssign,
    b"*="  => Operator::MulAssign,
    b"/="  => Operator::DivAssign,
    b"%="  => Operator::ModAssign,
    b"<<=" => Operator::ShlAssign,
    b">>=" => Operator::ShrAssign,
    b"&="  => Operator::AndAssign,
    b"^="  => Operator::XorAssign,
    b"|="  => Operator::OrAssign,
    b"||"  => Operator::Or,
    b"&&"  => Operator::And,
    b"|"   => Operator::BitOr,
    b"^"   => Operator::BitXor,
    b"&"   => Operator::BitAnd,
    b"=="  => Operator::Eq,
    b"!="  => Operator::Ne,
    b"<"   => Operator::Lt,
    b"<="  => Operator::Le,
    b">"   => Operator::Gt,
    b">="  => Operator::Ge,
    b"<<"  => Operator::Shl,
    b">>"  => Operator::Shr,
    b"+"   => Operator::Add,
    b"-"   => Operator::Sub,
    b"*"   => Operator::Mul,
    b"/"   => Operator::Div,
    b"%"   => Operator::Mod,
    b"!"   => Operator::Not,
    b"~"   => Operator::BitNot,
    b"++"  => Operator::Inc,
    b"--"  => Operator::Dec,
};

const MAX_OPERATOR_LEN: usize = 3;

/// A single pass **scanner / lexer** over a [`LineReader`].
pub struct Scanner<R> {
    reader: LineReader<R>,
    done: bool, // end marker emitted or error reported
}

impl Scanner<Cursor<Vec<u8>>> {
    /// Scanner over an in‑memory source text.
    pub fn from_source(src: &str) -> Self {
        Self::new(LineReader::from_bytes(src.as_bytes().to_vec()))
    }
}

impl<R: BufRead> Scanner<R> {
    pub fn new(reader: LineReader<R>) -> Self {
        info!("Scanner created");

        Self {
            reader,
            done: false,
        }
    }

    // ───────────────────────────── trivia ──────────────────────────────────

    /// Skip whitespace and comments. Leaves the reader on the first byte of
    /// the next token (or at EOF).
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.reader.peek()? {
                Some(b' ' | b'\t' | b'\r' | b'\n' | b'\x0b' | b'\x0c') => {
                    self.reader.advance()?;
                }

                Some(b'/') => match self.reader.peek_at(1)? {
                    Some(b'/') => self.reader.skip_line(),

                    Some(b'*') => {
                        let pos = self.reader.position();

                        self.reader.advance()?;
                        self.reader.advance()?;

                        if !self.reader.skip_block_comment()? {
                            return Err(FrontError::lex(
                                pos,
                                "skip_trivia",
                                "Unterminated block comment.",
                            ));
                        }
                    }

                    _ => return Ok(()),
                },

                _ => return Ok(()),
            }
        }
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* token. Trivia must already be skipped.
    fn scan_token(&mut self) -> Result<Token> {
        let pos = self.reader.position();

        let b = match self.reader.peek()? {
            Some(b) => b,
            None => return Ok(Token::new(TokenType::Empty, pos)),
        };

        let tt = match b {
            b'a'..=b'z' | b'A'..=b'Z' => self.scan_word()?,

            b'0'..=b'9' => self.scan_number(pos)?,

            b'\'' => self.scan_char(pos)?,

            b'"' => self.scan_string(pos)?,

            b';' | b'(' | b')' | b'[' | b']' | b'{' | b'}' | b',' => {
                self.reader.advance()?;
                TokenType::Delimiter(b as char)
            }

            _ => match self.scan_operator()? {
                Some(op) => TokenType::Operator(op),
                None => {
                    return Err(FrontError::lex(
                        pos,
                        "scan_token",
                        format!("Unexpected character: {}", b as char),
                    ));
                }
            },
        };

        Ok(Token::new(tt, pos))
    }

    /// Identifier or keyword.
    fn scan_word(&mut self) -> Result<TokenType> {
        let mut word: Vec<u8> = Vec::new();

        while let Some(c) = self.reader.peek()? {
            if !(c.is_ascii_alphanumeric() || c == b'_') {
                break;
            }

            word.push(c);
            self.reader.advance()?;
        }

        if let Some(tt) = KEYWORDS.get(word.as_slice()) {
            return Ok(tt.clone());
        }

        // Only ASCII bytes were collected.
        Ok(TokenType::Name(String::from_utf8_lossy(&word).into_owned()))
    }

    /// Decimal literal, capped at `i32::MAX`.
    fn scan_number(&mut self, pos: Position) -> Result<TokenType> {
        let mut value: i32 = 0;

        while let Some(c) = self.reader.peek()? {
            if !c.is_ascii_digit() {
                break;
            }

            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(i32::from(c - b'0')))
                .ok_or_else(|| {
                    FrontError::lex(pos, "scan_number", "Number literal exceeds INT_MAX.")
                })?;

            self.reader.advance()?;
        }

        Ok(TokenType::Number(value))
    }

    /// Greedy longest match against the operator table.
    fn scan_operator(&mut self) -> Result<Option<Operator>> {
        let mut buf: Vec<u8> = Vec::with_capacity(MAX_OPERATOR_LEN);

        for i in 0..MAX_OPERATOR_LEN {
            match self.reader.peek_at(i)? {
                Some(c) => buf.push(c),
                None => break,
            }
        }

        for len in (1..=buf.len()).rev() {
            if let Some(op) = OPERATORS.get(&buf[..len]) {
                for _ in 0..len {
                    self.reader.advance()?;
                }

                return Ok(Some(*op));
            }
        }

        Ok(None)
    }

    /// The byte after a backslash, already consumed.
    fn unescape(&mut self, pos: Position, origin: &'static str) -> Result<u8> {
        match self.reader.advance()? {
            Some(b'n') => Ok(b'\n'),
            Some(b't') => Ok(b'\t'),
            Some(b'r') => Ok(b'\r'),
            Some(b'"') => Ok(b'"'),
            Some(b'\'') => Ok(b'\''),
            Some(b'\\') => Ok(b'\\'),
            Some(other) => Err(FrontError::lex(
                pos,
                origin,
                format!("Invalid escape sequence: \\{}", other as char),
            )),
            None => Err(FrontError::lex(pos, origin, "Unterminated escape sequence.")),
        }
    }

    /// `'x'` → ordinal of x, `''` → 0.
    fn scan_char(&mut self, pos: Position) -> Result<TokenType> {
        self.reader.advance()?; // opening quote

        let value = match self.reader.advance()? {
            Some(b'\'') => return Ok(TokenType::Number(0)),
            Some(b'\\') => self.unescape(pos, "scan_char")?,
            Some(b'\n') | None => {
                return Err(FrontError::lex(
                    pos,
                    "scan_char",
                    "Unterminated character literal.",
                ));
            }
            Some(c) => c,
        };

        if self.reader.advance()? != Some(b'\'') {
            return Err(FrontError::lex(
                pos,
                "scan_char",
                "Unterminated character literal.",
            ));
        }

        Ok(TokenType::Number(i32::from(value)))
    }

    /// Double‑quoted string; escapes decoded, newlines allowed.
    fn scan_string(&mut self, pos: Position) -> Result<TokenType> {
        self.reader.advance()?; // opening quote

        let mut bytes: Vec<u8> = Vec::new();

        loop {
            match self.reader.advance()? {
                Some(b'"') => break,
                Some(b'\\') => bytes.push(self.unescape(pos, "scan_string")?),
                Some(c) => bytes.push(c),
                None => {
                    return Err(FrontError::lex(pos, "scan_string", "Unterminated string."));
                }
            }
        }

        // Byte values are what the parser turns into character codes; keep
        // them intact even for non‑UTF‑8 input.
        let s: String = bytes.iter().map(|&b| b as char).collect();

        Ok(TokenType::String(s))
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<R: BufRead> Iterator for Scanner<R> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.skip_trivia().and_then(|_| self.scan_token());

        match &result {
            Ok(token) if token.is_empty() => {
                debug!("Reached end of input at {}", token.pos);
                self.done = true;
            }

            Ok(token) => debug!("Scanned token {:?} at {}", token.token_type, token.pos),

            Err(_) => self.done = true,
        }

        Some(result)
    }
}

impl<R: BufRead> FusedIterator for Scanner<R> {}
