use super::grammar::{
    BRACKETED, CONTINUATION, IDENTIFIER, IDENTIFIER_OR_ADDRESS, INTEGER, NORMAL, NUMBER, SKIP,
    SPACES, SPACES_CONT, SPECIAL,
};
use super::lex::Cursor;
use super::token::{self, DIM, LET, NEWLINE, NUMBER as NUMBER_MARKER, QUOTE, REM};
use super::{Error, ErrorCode};
use crate::mach::float;
use crate::mach::pfile::{self, Screen};
use crate::mach::sysvars::{self, SystemVariables, Value};
use byteorder::{ByteOrder, LittleEndian};
use log::{debug, trace, warn};
use std::io;
use std::path::PathBuf;

/// Supplies the bytes for `[!include path]`.
pub trait Include {
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Reads include files relative to a directory.
pub struct Directory(pub PathBuf);

impl Include for Directory {
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.0.join(path))
    }
}

/// Fails every include.
pub struct NoInclude;

impl Include for NoInclude {
    fn read(&self, _path: &str) -> io::Result<Vec<u8>> {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            "no include directory",
        ))
    }
}

impl<F> Include for F
where
    F: Fn(&str) -> io::Result<Vec<u8>>,
{
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        self(path)
    }
}

/// A successfully encoded P-file with the warnings raised on the way.
#[derive(Debug, Clone)]
pub struct Encoding {
    pub pfile: Vec<u8>,
    pub warnings: Vec<Error>,
}

impl Encoding {
    /// The P-file prefixed with a cassette name, as stored in `.p81` images.
    pub fn to_p81(&self, name: &str) -> Result<Vec<u8>, Error> {
        let mut bytes = name
            .chars()
            .map(|c| {
                token::from_char(c)
                    .ok_or_else(|| error!(SyntaxError; "'{}' can not be used in a cassette name", c))
            })
            .collect::<Result<Vec<u8>, Error>>()?;
        if bytes.is_empty() || bytes.len() > 127 {
            return Err(error!(SyntaxError; "cassette name must be 1 to 127 characters"));
        }
        if let Some(last) = bytes.last_mut() {
            *last |= 0x80;
        }
        bytes.extend_from_slice(&self.pfile);
        Ok(bytes)
    }
}

/// Encodes BASIC text into a P-file. Includes are not available.
pub fn encode(text: &str) -> Result<Encoding, Error> {
    encode_with(text, &NoInclude)
}

/// Encodes BASIC text into a P-file, reading includes through `include`.
pub fn encode_with(text: &str, include: &dyn Include) -> Result<Encoding, Error> {
    let text = normalize(text);
    let mut encoder = Encoder::new(&text, include);
    encoder.scan()?;
    let pfile = encoder.assemble()?;
    Ok(Encoding {
        pfile,
        warnings: encoder.warnings,
    })
}

/// Encodes BASIC text into the program area alone.
pub fn encode_program(text: &str) -> Result<Vec<u8>, Error> {
    let text = normalize(text);
    let mut encoder = Encoder::new(&text, &NoInclude);
    encoder.scan()?;
    Ok(encoder.program)
}

fn normalize(text: &str) -> String {
    let mut text = text.replace('\r', "");
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

struct Encoder<'a> {
    cursor: Cursor<'a>,
    include: &'a dyn Include,
    program: Vec<u8>,
    rows: Vec<Vec<u8>>,
    collapsed: bool,
    vars: Vec<u8>,
    sysvars: SystemVariables,
    start_line: Option<u16>,
    next_line: Option<usize>,
    last_line: Option<u16>,
    warnings: Vec<Error>,
}

impl<'a> Encoder<'a> {
    fn new(text: &'a str, include: &'a dyn Include) -> Encoder<'a> {
        Encoder {
            cursor: Cursor::new(text),
            include,
            program: vec![],
            rows: vec![],
            collapsed: false,
            vars: vec![],
            sysvars: SystemVariables::default(),
            start_line: None,
            next_line: None,
            last_line: None,
            warnings: vec![],
        }
    }

    fn scan(&mut self) -> Result<(), Error> {
        loop {
            self.cursor.find(&SKIP);
            if self.cursor.at_end() {
                break;
            }
            if self.cursor.rest().starts_with("#!") {
                self.directive()?;
            } else {
                self.line()?;
            }
        }
        if let Some(start) = self.start_line {
            return Err(self
                .cursor
                .error(ErrorCode::StartLine, format!("start line {} not found", start)));
        }
        debug!(
            "encoded {} program bytes, {} screen rows, {} variable bytes",
            self.program.len(),
            self.rows.len(),
            self.vars.len()
        );
        Ok(())
    }

    fn assemble(&mut self) -> Result<Vec<u8>, Error> {
        let screen = Screen::new(std::mem::take(&mut self.rows), self.collapsed);
        let mut vars = std::mem::take(&mut self.vars);
        vars.push(pfile::VARS_END);
        pfile::assemble(
            &mut self.sysvars,
            &self.program,
            self.next_line,
            &screen.to_bytes(),
            &vars,
        )
    }

    fn warn(&mut self, w: Error) {
        warn!("{}", w);
        self.warnings.push(w);
    }

    fn directive(&mut self) -> Result<(), Error> {
        let column = self.cursor.column();
        self.cursor.advance(2);
        self.cursor.find(&SPACES);
        let rest = self.cursor.rest();
        if starts_with_word(rest, "basic-start") {
            self.cursor.advance("basic-start".len());
            self.basic_start()?;
        } else if starts_with_word(rest, "dfile-collapsed") {
            self.cursor.advance("dfile-collapsed".len());
            self.collapsed = true;
        } else if starts_with_word(rest, "dfile:") {
            self.cursor.advance("dfile:".len());
            let mut row = vec![];
            while self.cursor.peek() != Some('\n') {
                row.extend(self.bracketed_token()?);
            }
            self.rows.push(row);
        } else if starts_with_word(rest, "basic-vars:") {
            self.cursor.advance("basic-vars:".len());
            self.cursor.find(&SPACES);
            let mut bytes = self.byte_list()?;
            self.vars.append(&mut bytes);
        } else if starts_with_word(rest, "system-vars:") {
            self.cursor.advance("system-vars:".len());
            self.system_vars()?;
        } else if self.cursor.peek() != Some('\n') {
            let word = rest.split_whitespace().next().unwrap_or("");
            return Err(error!(UnknownDirective, self.cursor.line(), ..column;
                "unknown command in header: {}", word));
        }
        self.cursor.find(&SPACES);
        if self.cursor.peek() != Some('\n') {
            return Err(self.cursor.error(ErrorCode::SyntaxError, "expected newline"));
        }
        Ok(())
    }

    fn basic_start(&mut self) -> Result<(), Error> {
        self.cursor.find(&SPACES);
        if self.cursor.peek() != Some('=') {
            return Err(self.cursor.error(ErrorCode::SyntaxError, "expected '='"));
        }
        self.cursor.advance(1);
        self.cursor.find(&SPACES);
        let column = self.cursor.column();
        let start = self.line_number()?;
        if let Some(last) = self.last_line {
            if start <= last {
                return Err(error!(StartLine, self.cursor.line(), ..column;
                    "start line {} must come before line {} is defined", start, last));
            }
        }
        self.start_line = Some(start);
        Ok(())
    }

    fn system_vars(&mut self) -> Result<(), Error> {
        let (line, column) = (self.cursor.line(), self.cursor.column());
        let name = self
            .cursor
            .captures(&IDENTIFIER_OR_ADDRESS)
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| self.cursor.error(ErrorCode::SystemVariable, "expected a name"))?;
        let var = sysvars::lookup(&name).ok_or_else(|| {
            error!(SystemVariable, line, ..column; "unknown system variable {}", name)
        })?;
        self.cursor.find(&SPACES);
        if self.cursor.peek() != Some('=') {
            return Err(self.cursor.error(ErrorCode::SyntaxError, "expected '='"));
        }
        self.cursor.advance(1);
        self.cursor.find(&SPACES);
        let value = if self.cursor.peek() == Some('[') {
            Value::Bytes(self.byte_list()?)
        } else {
            Value::Number(self.integer(0, 0xFFFF)? as u16)
        };
        if var.structural {
            self.warn(error!(DerivedSystemVariable, line, ..column;
                "{} is recomputed when the P-file is assembled", var.name));
        }
        self.sysvars
            .set_value(var, value)
            .map_err(|e| e.in_line(line).in_column(column))
    }

    fn byte_list(&mut self) -> Result<Vec<u8>, Error> {
        if self.cursor.peek() != Some('[') {
            return Err(self.cursor.error(ErrorCode::SyntaxError, "expected '['"));
        }
        self.cursor.advance(1);
        self.cursor.find(&SPACES);
        let mut bytes = vec![];
        while self.cursor.peek() != Some(']') {
            bytes.push(self.integer(0, 255)? as u8);
            self.cursor.find(&SPACES);
            match self.cursor.peek() {
                Some(',') => self.cursor.advance(1),
                Some('\n') | None => {
                    return Err(self.cursor.error(ErrorCode::SyntaxError, "expected ']'"))
                }
                _ => {}
            }
            self.cursor.find(&SPACES);
        }
        self.cursor.advance(1);
        Ok(bytes)
    }

    fn integer(&mut self, min: u32, max: u32) -> Result<u32, Error> {
        let (line, column) = (self.cursor.line(), self.cursor.column());
        let digits = self
            .cursor
            .find(&INTEGER)
            .ok_or_else(|| self.cursor.error(ErrorCode::SyntaxError, "expected a number"))?;
        match digits.parse::<u32>() {
            Ok(n) if n >= min && n <= max => Ok(n),
            _ => Err(error!(InvalidNumber, line, ..column;
                "number out of range [{}-{}]: {}", min, max, digits)),
        }
    }

    fn line_number(&mut self) -> Result<u16, Error> {
        let (line, column) = (self.cursor.line(), self.cursor.column());
        let digits = self
            .cursor
            .find(&INTEGER)
            .ok_or_else(|| self.cursor.error(ErrorCode::LineNumber, "expected a line number"))?;
        match digits.parse::<u16>() {
            Ok(n) if n <= 9999 => Ok(n),
            _ => Err(error!(LineNumber, line, ..column;
                "line number out of range [0-9999]: {}", digits)),
        }
    }

    fn line(&mut self) -> Result<(), Error> {
        let (line, column) = (self.cursor.line(), self.cursor.column());
        let number = self.line_number()?;
        if let Some(last) = self.last_line {
            if number <= last {
                return Err(error!(LineOrder, line, ..column;
                    "line number {} must be greater than {}", number, last));
            }
        }
        self.last_line = Some(number);
        let offset = self.program.len();
        if let Some(start) = self.start_line {
            if number >= start {
                self.next_line = Some(offset);
                self.start_line = None;
            }
        }
        self.program.extend_from_slice(&number.to_be_bytes());
        self.program.extend_from_slice(&[0, 0]);

        if self.cursor.find(&SPACES_CONT).is_none() {
            return Err(self.cursor.error(
                ErrorCode::SyntaxError,
                "expected a space after the line number",
            ));
        }
        let (line, column) = (self.cursor.line(), self.cursor.column());
        let found = self.cursor.rest().split('\n').next().unwrap_or("");
        let command = match self.cursor.token(&NORMAL) {
            Some(byte) if token::is_command(byte) => byte,
            _ => {
                return Err(error!(CommandExpected, line, ..column;
                    "command expected but got '{}'", found))
            }
        };
        self.program.push(command);
        if command == LET || command == DIM {
            self.check_name();
        }
        if command == REM {
            self.rem()?;
        } else {
            self.statement()?;
        }
        self.program.push(NEWLINE);

        let length = self.program.len() - offset - 4;
        if length > 0xFFFF {
            return Err(error!(Overflow, line, ..column; "line {} is too long", number));
        }
        LittleEndian::write_u16(&mut self.program[offset + 2..], length as u16);
        trace!("line {} is {} bytes", number, length);
        Ok(())
    }

    /// Warns when a variable name after LET or DIM is also a keyword.
    fn check_name(&mut self) {
        let caps = match IDENTIFIER.captures(self.cursor.rest()) {
            Some(caps) => caps,
            None => return,
        };
        let found = match caps.get(1) {
            Some(found) => found,
            None => return,
        };
        if token::keyword(found.as_str()).is_some() {
            let w = error!(KeywordName, self.cursor.line(), ..self.cursor.column() + found.start();
                "variable name '{}' is also a keyword", found.as_str());
            self.warn(w);
        }
    }

    fn rem(&mut self) -> Result<(), Error> {
        loop {
            self.cursor.find(&CONTINUATION);
            if self.cursor.at_line_end() {
                break;
            }
            let bytes = self.bracketed_token()?;
            self.program.extend(bytes);
        }
        self.cursor.end_line();
        Ok(())
    }

    /// Each position is tried as a string, a number, a special code and
    /// finally a token, in that order.
    fn statement(&mut self) -> Result<(), Error> {
        loop {
            self.cursor.find(&CONTINUATION);
            if self.cursor.at_line_end() {
                break;
            }
            if self.cursor.peek() == Some('"') {
                self.quoted()?;
                continue;
            }
            if self.number()? {
                continue;
            }
            if let Some(bytes) = self.special()? {
                self.program.extend(bytes);
                continue;
            }
            match self.cursor.token(&NORMAL) {
                Some(byte) => self.program.push(byte),
                None => return Err(self.cursor.error(ErrorCode::SyntaxError, "unknown token")),
            }
        }
        self.cursor.end_line();
        Ok(())
    }

    fn quoted(&mut self) -> Result<(), Error> {
        self.cursor.advance(1);
        self.program.push(QUOTE);
        loop {
            self.cursor.find(&CONTINUATION);
            match self.cursor.peek() {
                Some('\n') | None => {
                    return Err(self
                        .cursor
                        .error(ErrorCode::UnterminatedString, "unexpected end of line in string"))
                }
                Some('"') => {
                    self.cursor.advance(1);
                    self.program.push(QUOTE);
                    return Ok(());
                }
                Some(_) => {
                    let bytes = self.bracketed_token()?;
                    self.program.extend(bytes);
                }
            }
        }
    }

    fn number(&mut self) -> Result<bool, Error> {
        let (line, column) = (self.cursor.line(), self.cursor.column());
        let literal = match self.cursor.find(&NUMBER) {
            Some(literal) => literal,
            None => return Ok(false),
        };
        let value = literal.parse::<f64>().map_err(|_| {
            error!(InvalidNumber, line, ..column; "number expected but got '{}'", literal)
        })?;
        for c in literal.chars() {
            match token::from_char(c) {
                Some(byte) => self.program.push(byte),
                None => {
                    return Err(error!(InvalidNumber, line, ..column;
                        "number expected but got '{}'", literal))
                }
            }
        }
        self.program.push(NUMBER_MARKER);
        let bytes = float::encode(value).map_err(|e| e.in_line(line).in_column(column))?;
        self.program.extend_from_slice(&bytes);
        Ok(true)
    }

    /// A token of a REM line, string or screen row.
    fn bracketed_token(&mut self) -> Result<Vec<u8>, Error> {
        if let Some(byte) = self.cursor.token(&BRACKETED) {
            return Ok(vec![byte]);
        }
        match self.special()? {
            Some(bytes) => Ok(bytes),
            None => Err(self.cursor.error(ErrorCode::SyntaxError, "unknown token")),
        }
    }

    /// Reads `[#comment]`, `[N]`, `[!block=N]` or `[!include path]`.
    fn special(&mut self) -> Result<Option<Vec<u8>>, Error> {
        let caps = match SPECIAL.captures(self.cursor.rest()) {
            Some(caps) => caps,
            None => return Ok(None),
        };
        let bytes = if caps[1].starts_with('#') {
            vec![]
        } else if let Some(size) = caps.get(2) {
            match size.as_str().parse::<usize>() {
                Ok(n) if n < 0x8000 => vec![0; n],
                _ => {
                    return Err(self.cursor.error(
                        ErrorCode::SpecialCode,
                        format!("block size {} is too big", size.as_str()),
                    ))
                }
            }
        } else if let Some(path) = caps.get(3) {
            let path = path.as_str().trim();
            self.include.read(path).map_err(|e| {
                self.cursor.error(
                    ErrorCode::Include,
                    format!("failed to read file '{}': {}", path, e),
                )
            })?
        } else {
            match caps[1].parse::<u8>() {
                Ok(n) => vec![n],
                Err(_) => {
                    return Err(self.cursor.error(
                        ErrorCode::SpecialCode,
                        format!("code {} out of range 0-255", &caps[1]),
                    ))
                }
            }
        };
        self.cursor.advance(caps[0].len());
        Ok(Some(bytes))
    }
}

fn starts_with_word(text: &str, word: &str) -> bool {
    match text.get(..word.len()) {
        Some(head) if head.eq_ignore_ascii_case(word) => {
            word.ends_with(':')
                || !text[word.len()..].starts_with(|c: char| c.is_ascii_alphanumeric() || c == '-')
        }
        _ => false,
    }
}
