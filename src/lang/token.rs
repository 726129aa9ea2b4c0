//! The ZX81 character set and keyword tokens.
//!
//! Every byte value has exactly one canonical text. Block graphics and
//! inverse characters follow the ZXText2P conventions, codes without a
//! printable form are written as `[N]`.

use lazy_static::lazy_static;
use std::collections::HashMap;

pub const SPACE: u8 = 0x00;
pub const QUOTE: u8 = 0x0B;
pub const PLUS: u8 = 0x15;
pub const MINUS: u8 = 0x16;
pub const DOT: u8 = 0x1B;
pub const LETTER_E: u8 = 0x2A;
pub const NEWLINE: u8 = 0x76;
pub const NUMBER: u8 = 0x7E;
pub const ESCAPED_QUOTE: u8 = 0xC0;
pub const DIM: u8 = 0xE9;
pub const REM: u8 = 0xEA;
pub const LET: u8 = 0xF1;

/// Prefix marking an inverse character.
pub const INVERSE: char = '%';

#[rustfmt::skip]
static TOKENS: [&str; 256] = [
    // 0x00
    " ", "\\' ", "\\ '", "\\''", "\\. ", "\\: ", "\\.'", "\\:'", "\\##", "\\,,", "\\~~", "\"", "#", "$", ":", "?",
    // 0x10
    "(", ")", ">", "<", "=", "+", "-", "*", "/", ";", ",", ".", "0", "1", "2", "3",
    // 0x20
    "4", "5", "6", "7", "8", "9", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J",
    // 0x30
    "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z",
    // 0x40
    "RND", "INKEY$", "PI", "", "", "", "", "", "", "", "", "", "", "", "", "",
    // 0x50
    "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "",
    // 0x60
    "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "",
    // 0x70 cursor and control codes
    "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "",
    // 0x80 inverse graphics
    "\\::", "\\.:", "\\:.", "\\..", "\\':", "\\ :", "\\'.", "\\ .", "@@", "\\;;", "\\!!", "\"", "#", "$", ":", "?",
    // 0x90 inverse
    "(", ")", ">", "<", "=", "+", "-", "*", "/", ";", ",", ".", "0", "1", "2", "3",
    // 0xA0 inverse
    "4", "5", "6", "7", "8", "9", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J",
    // 0xB0 inverse
    "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z",
    // 0xC0
    "\\\"", "AT ", "TAB ", "", "CODE ", "VAL ", "LEN ", "SIN ", "COS ", "TAN ", "ASN ", "ACS ", "ATN ", "LN ", "EXP ", "INT ",
    // 0xD0
    "SQR ", "SGN ", "ABS ", "PEEK ", "USR ", "STR$ ", "CHR$ ", "NOT ", "**", " OR ", " AND ", "<=", ">=", "<>", " THEN ", " TO ",
    // 0xE0
    " STEP ", "LPRINT ", "LLIST ", "STOP ", "SLOW ", "FAST ", "NEW ", "SCROLL ", "CONT ", "DIM ", "REM ", "FOR ", "GOTO ", "GOSUB ", "INPUT ", "LOAD ",
    // 0xF0
    "LIST ", "LET ", "PAUSE ", "NEXT ", "POKE ", "PRINT ", "PLOT ", "RUN ", "SAVE ", "RAND ", "IF ", "CLS ", "UNPLOT ", "CLEAR ", "RETURN ", "COPY ",
];

/// Tokens that may be delimited by a newline instead of a space.
///
/// For the others a newline would make the keyword indistinguishable from
/// a variable name continuing on the next token.
static TRAILING_NEWLINE: [&str; 20] = [
    "\\' ", "\\. ", "\\: ", "LPRINT ", "LLIST ", "STOP ", "SLOW ", "FAST ", "NEW ", "SCROLL ",
    "CONT ", "REM ", "LIST ", "PRINT ", "RUN ", "RAND ", "CLS ", "CLEAR ", "RETURN ", "COPY ",
];

lazy_static! {
    static ref TEXT: Vec<String> = (0..=255u8).map(render).collect();
    static ref KEYWORDS: HashMap<String, u8> = (0..=255u8)
        .filter(|b| is_keyword(*b))
        .map(|b| (TOKENS[b as usize].trim().to_string(), b))
        .collect();
}

fn render(byte: u8) -> String {
    let base = TOKENS[byte as usize];
    if base.is_empty() {
        return format!("[{}]", byte);
    }
    if (0x8B..=0xBF).contains(&byte) {
        format!("{}{}", INVERSE, base)
    } else {
        base.to_string()
    }
}

/// Canonical text of any byte.
pub fn text_of(byte: u8) -> &'static str {
    &TEXT[byte as usize]
}

/// Text of a byte as written inside REM lines, strings and screen rows,
/// where keywords must be enclosed in square brackets.
pub fn bracketed_text_of(byte: u8) -> String {
    if is_keyword(byte) {
        format!("[{}]", text_of(byte).trim())
    } else {
        text_of(byte).to_string()
    }
}

/// Keywords are the tokens whose text can be confused with plain letters.
pub fn is_keyword(byte: u8) -> bool {
    (byte >= 0xC1 && byte != 0xC3) || (0x40..=0x42).contains(&byte)
}

/// Tokens that may start a program line.
pub fn is_command(byte: u8) -> bool {
    byte >= 0xE1
}

/// Plain digits 0-9.
pub fn is_digit(byte: u8) -> bool {
    (0x1C..=0x25).contains(&byte)
}

pub fn allows_trailing_newline(text: &str) -> bool {
    TRAILING_NEWLINE.contains(&text)
}

/// Looks up a keyword by its trimmed name, ignoring case.
pub fn keyword(name: &str) -> Option<u8> {
    KEYWORDS.get(&name.to_ascii_uppercase()).copied()
}

/// All canonical texts with their byte value.
pub fn all() -> impl Iterator<Item = (&'static str, u8)> {
    (0..=255u8).map(|b| (text_of(b), b))
}

/// Byte of a single printable character, ignoring case.
pub fn from_char(c: char) -> Option<u8> {
    let mut buf = [0u8; 4];
    let s: &str = c.to_ascii_uppercase().encode_utf8(&mut buf);
    (0..0x40u8).find(|b| TOKENS[*b as usize] == s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_of() {
        assert_eq!(text_of(0x00), " ");
        assert_eq!(text_of(0x26), "A");
        assert_eq!(text_of(0xA6), "%A");
        assert_eq!(text_of(0x8B), "%\"");
        assert_eq!(text_of(0x88), "@@");
        assert_eq!(text_of(0x61), "[97]");
        assert_eq!(text_of(NEWLINE), "[118]");
        assert_eq!(text_of(0xC3), "[195]");
        assert_eq!(text_of(0xF5), "PRINT ");
    }

    #[test]
    fn test_bracketed() {
        assert_eq!(bracketed_text_of(0xF5), "[PRINT]");
        assert_eq!(bracketed_text_of(0xDE), "[THEN]");
        assert_eq!(bracketed_text_of(0x41), "[INKEY$]");
        assert_eq!(bracketed_text_of(ESCAPED_QUOTE), "\\\"");
        assert_eq!(bracketed_text_of(0x26), "A");
    }

    #[test]
    fn test_keyword() {
        assert_eq!(keyword("poke"), Some(0xF4));
        assert_eq!(keyword("RND"), Some(0x40));
        assert_eq!(keyword("NOPROBLEM"), None);
        assert_eq!(keyword(""), None);
    }

    #[test]
    fn test_unique_text() {
        let mut seen = HashMap::new();
        for (text, byte) in all() {
            assert_eq!(seen.insert(text, byte), None, "duplicate {:?}", text);
        }
    }

    #[test]
    fn test_from_char() {
        assert_eq!(from_char('a'), Some(0x26));
        assert_eq!(from_char('0'), Some(0x1C));
        assert_eq!(from_char(' '), Some(SPACE));
        assert_eq!(from_char('.'), Some(DOT));
        assert_eq!(from_char('e'), Some(LETTER_E));
        assert_eq!(from_char('!'), None);
        assert_eq!(from_char('\\'), None);
    }
}
