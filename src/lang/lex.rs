use super::grammar::Grammar;
use super::{Error, ErrorCode};
use regex::{Captures, Regex};

/// Lexical context of a token inside a program line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Normal,
    Rem,
    Quoted,
}

/// Position in the source text.
///
/// Lines and columns are 0-based. Columns count bytes.
pub struct Cursor<'a> {
    text: &'a str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Cursor<'a> {
        Cursor {
            text,
            position: 0,
            line: 0,
            column: 0,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn rest(&self) -> &'a str {
        &self.text[self.position..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.text.len()
    }

    /// At a newline or at the end of the text.
    pub fn at_line_end(&self) -> bool {
        matches!(self.peek(), Some('\n') | None)
    }

    /// Consumes the newline ending a line, if there is one.
    pub fn end_line(&mut self) {
        if self.peek() == Some('\n') {
            self.advance(1);
        }
    }

    pub fn advance(&mut self, len: usize) {
        let consumed = &self.text[self.position..self.position + len];
        match consumed.rfind('\n') {
            Some(nl) => {
                self.line += consumed.matches('\n').count();
                self.column = len - nl - 1;
            }
            None => self.column += len,
        }
        self.position += len;
    }

    /// Consumes a match of `re` at the cursor.
    pub fn find(&mut self, re: &Regex) -> Option<&'a str> {
        let found = re.find(self.rest())?.as_str();
        if found.is_empty() {
            return None;
        }
        self.advance(found.len());
        Some(found)
    }

    /// Like `find` but keeps the capture groups.
    pub fn captures(&mut self, re: &Regex) -> Option<Captures<'a>> {
        let caps = re.captures(self.rest())?;
        let len = caps.get(0).map_or(0, |m| m.len());
        if len == 0 {
            return None;
        }
        self.advance(len);
        Some(caps)
    }

    /// Consumes one token of `grammar`.
    pub fn token(&mut self, grammar: &Grammar) -> Option<u8> {
        if self.peek() == Some('\n') {
            return None;
        }
        let (len, byte) = grammar.read(self.rest())?;
        self.advance(len);
        Some(byte)
    }

    /// An error at the cursor quoting the rest of the line.
    pub fn error<S: Into<String>>(&self, code: ErrorCode, message: S) -> Error {
        let mut message = message.into();
        let line = self.rest().split('\n').next().unwrap_or("");
        if !line.is_empty() {
            let snippet: String = line.chars().take(20).collect();
            let more = if snippet.len() < line.len() { "..." } else { "" };
            message = format!("{}: '{}{}'", message, snippet, more);
        }
        Error::new(code)
            .in_line(self.line)
            .in_column(self.column)
            .message(message)
    }
}
