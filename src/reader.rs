//! Line‑buffered byte source feeding the scanner.
//!
//! The reader pulls one line at a time (newline included) from any
//! [`BufRead`] and hands out bytes with no encoding conversion. End of input
//! is reported as `None`, which no byte value can collide with.

use std::io::{self, BufRead, Cursor};

use log::{debug, info};
use memchr::memchr;

use crate::token::Position;

pub struct LineReader<R> {
    inner: R,
    line: Vec<u8>, // current line, trailing '\n' kept
    col: usize,    // index of the next unread byte in `line`
    lineno: usize, // 1‑based number of `line`
    eof: bool,
}

impl LineReader<Cursor<Vec<u8>>> {
    /// Reader over an in‑memory buffer.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::new(Cursor::new(bytes))
    }
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        info!("LineReader created");

        Self {
            inner,
            line: Vec::new(),
            col: 0,
            lineno: 0,
            eof: false,
        }
    }

    /// Make sure at least one unread byte is buffered. Returns `false` at EOF.
    fn fill(&mut self) -> io::Result<bool> {
        while self.col >= self.line.len() {
            if self.eof {
                return Ok(false);
            }

            self.line.clear();
            self.col = 0;

            let n = self.inner.read_until(b'\n', &mut self.line)?;

            if n == 0 {
                self.eof = true;
                return Ok(false);
            }

            self.lineno += 1;
            debug!("Read line {} ({} bytes)", self.lineno, n);
        }

        Ok(true)
    }

    /// Current byte without consuming it.
    pub fn peek(&mut self) -> io::Result<Option<u8>> {
        if self.fill()? {
            Ok(Some(self.line[self.col]))
        } else {
            Ok(None)
        }
    }

    /// Byte `n` places after the current one, within the current line.
    /// Operators and comment openers never straddle a newline, so the scanner
    /// never needs to look further.
    pub fn peek_at(&mut self, n: usize) -> io::Result<Option<u8>> {
        if !self.fill()? {
            return Ok(None);
        }

        Ok(self.line.get(self.col + n).copied())
    }

    /// Consume and return the current byte.
    pub fn advance(&mut self) -> io::Result<Option<u8>> {
        let b = self.peek()?;

        if b.is_some() {
            self.col += 1;
        }

        Ok(b)
    }

    /// Position of the next unread byte.
    pub fn position(&self) -> Position {
        if self.col >= self.line.len() {
            // Sitting past the end of a line: next byte starts the next line.
            if self.line.last() == Some(&b'\n') {
                return Position::new(self.lineno + 1, 1);
            }
        }

        Position::new(self.lineno.max(1), self.col + 1)
    }

    /// Drop the remainder of the current line, newline included.
    pub fn skip_line(&mut self) {
        self.col = self.line.len();
    }

    /// Consume bytes up to and including the next `*/`.
    /// Returns `false` if input ended first.
    pub fn skip_block_comment(&mut self) -> io::Result<bool> {
        while self.fill()? {
            match memchr(b'*', &self.line[self.col..]) {
                Some(offset) => {
                    self.col += offset + 1;

                    if self.line.get(self.col) == Some(&b'/') {
                        self.col += 1;
                        return Ok(true);
                    }
                }

                None => self.col = self.line.len(),
            }
        }

        Ok(false)
    }
}
