//! Longest-match tokenizer grammars.
//!
//! Two grammars share the token table. The normal grammar accepts keyword
//! text as written (`PRINT `) and in its bracketed form (`[PRINT]`). The
//! bracketed grammar is used inside REM lines, strings and screen rows
//! where only the bracketed form names a keyword.

use super::token;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    pub static ref NORMAL: Grammar = Grammar::new(normal_entries());
    pub static ref BRACKETED: Grammar = Grammar::new(bracketed_entries());
    pub static ref NUMBER: Regex =
        Regex::new(r"(?i-u)^(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)(?:E[+-]?[0-9]+)?").unwrap();
    pub static ref SPECIAL: Regex = Regex::new(
        r"(?i)^\[(#.*?|[0-9]+|!block\s*=\s*([0-9]+)\s*|!include\s+([\w./ \-]+?)\s*)\]"
    )
    .unwrap();
    pub static ref INTEGER: Regex = Regex::new(r"^[0-9]+").unwrap();
    pub static ref CONTINUATION: Regex = Regex::new(r"^\\[ \t]*\n").unwrap();
    pub static ref SPACES: Regex = Regex::new(r"^[ \t]+").unwrap();
    pub static ref SPACES_CONT: Regex = Regex::new(r"^[ \t]+(?:\\[ \t]*\n)?").unwrap();
    pub static ref SKIP: Regex = Regex::new(r"^(?:\s+|\\[ \t]*\n|#(?:[^!\n].*)?\n)*").unwrap();
    pub static ref IDENTIFIER: Regex = Regex::new(r"(?i-u)^[ \t]*([A-Z][A-Z0-9]*)").unwrap();
    pub static ref IDENTIFIER_OR_ADDRESS: Regex =
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*|[0-9]+)").unwrap();
}

/// A compiled alternation of token texts with the byte each one maps to.
pub struct Grammar {
    regex: Regex,
    tokens: HashMap<String, u8>,
}

impl Grammar {
    fn new(entries: Vec<(String, u8)>) -> Grammar {
        let mut texts: Vec<&String> = entries.iter().map(|(t, _)| t).collect();
        texts.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let alternatives: Vec<String> = texts.iter().map(|t| pattern(t)).collect();
        let regex = Regex::new(&format!("(?i-u)^(?:{})", alternatives.join("|"))).unwrap();
        let tokens = entries.into_iter().collect();
        Grammar { regex, tokens }
    }

    /// Matches one token at the start of `text`.
    ///
    /// Returns the number of bytes consumed and the token byte. A newline
    /// standing in for the trailing space is matched but not consumed.
    pub fn read(&self, text: &str) -> Option<(usize, u8)> {
        let found = self.regex.find(text)?.as_str();
        let mut consumed = found.len();
        if found.ends_with('\n') {
            consumed -= 1;
        }
        let byte = *self.tokens.get(&normalize(found))?;
        Some((consumed, byte))
    }
}

fn normal_entries() -> Vec<(String, u8)> {
    let mut entries = vec![];
    for (text, byte) in token::all() {
        entries.push((text.to_string(), byte));
        if token::is_keyword(byte) {
            entries.push((token::bracketed_text_of(byte), byte));
        }
    }
    entries
}

fn bracketed_entries() -> Vec<(String, u8)> {
    (0..=255u8).map(|b| (token::bracketed_text_of(b), b)).collect()
}

fn pattern(text: &str) -> String {
    match text.strip_suffix(' ') {
        Some(stem) => {
            let delimiter = if token::allows_trailing_newline(text) {
                r"\s"
            } else {
                r"[ \t]"
            };
            format!("{}{}", regex::escape(stem), delimiter)
        }
        None if text == "RND" || text == "PI" => format!(r"{}\b", text),
        None => regex::escape(text),
    }
}

fn normalize(found: &str) -> String {
    let mut text = found.to_ascii_uppercase();
    if text.ends_with(|c: char| c.is_ascii_whitespace()) {
        text.pop();
        text.push(' ');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_match() {
        assert_eq!(NORMAL.read("PRINT X"), Some((6, 0xF5)));
        assert_eq!(NORMAL.read("print\tX"), Some((6, 0xF5)));
        assert_eq!(NORMAL.read("<=3"), Some((2, 0xDB)));
        assert_eq!(NORMAL.read("<3"), Some((1, 0x13)));
        assert_eq!(NORMAL.read("[GOTO]"), Some((6, 0xEC)));
        assert_eq!(NORMAL.read("%A"), Some((2, 0xA6)));
        assert_eq!(NORMAL.read("\\::"), Some((3, 0x80)));
    }

    #[test]
    fn test_trailing_newline() {
        assert_eq!(NORMAL.read("PRINT\n"), Some((5, 0xF5)));
        assert_eq!(NORMAL.read("POKE\n"), Some((1, 0x35)));
    }

    #[test]
    fn test_word_boundary() {
        assert_eq!(NORMAL.read("RND*2"), Some((3, 0x40)));
        assert_eq!(NORMAL.read("RNDVAR"), Some((1, 0x37)));
        assert_eq!(NORMAL.read("PIT"), Some((1, 0x35)));
    }

    #[test]
    fn test_bracketed() {
        assert_eq!(BRACKETED.read("PRINT "), Some((1, 0x35)));
        assert_eq!(BRACKETED.read("[print]"), Some((7, 0xF5)));
        assert_eq!(BRACKETED.read("<="), Some((1, 0x13)));
        assert_eq!(BRACKETED.read("\\\""), Some((2, 0xC0)));
        assert_eq!(BRACKETED.read("~"), None);
    }

    #[test]
    fn test_special() {
        let caps = SPECIAL.captures("[!block = 12 ]").unwrap();
        assert_eq!(&caps[2], "12");
        let caps = SPECIAL.captures("[!include bin/file-1.bin]").unwrap();
        assert_eq!(&caps[3], "bin/file-1.bin");
        assert!(SPECIAL.is_match("[# a comment]"));
        assert!(SPECIAL.is_match("[200]"));
        assert!(!SPECIAL.is_match("[PRINT]"));
    }

    fn m(s: &str) -> Option<&str> {
        NUMBER.find(s).map(|m| m.as_str())
    }

    #[test]
    fn test_number() {
        assert_eq!(m("00.04E+2,"), Some("00.04E+2"));
        assert_eq!(m(".3e-7"), Some(".3e-7"));
        assert_eq!(m("1.2.3"), Some("1.2"));
        assert_eq!(m("5E"), Some("5"));
        assert_eq!(m("E5"), None);
        assert_eq!(m("."), None);
    }
}
