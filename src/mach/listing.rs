//! Program area to BASIC text.
//!
//! Each byte is first given its canonical text. A second pass, run from the
//! end of the line backwards, replaces any text that the encoder would read
//! back differently with a bracketed keyword or a `[N]` code. This keeps the
//! listing readable while guaranteeing it re-encodes to the same bytes.

use super::float;
use crate::lang::grammar::{NORMAL, NUMBER as LITERAL};
use crate::lang::token::{self, DOT, LETTER_E, MINUS, NEWLINE, NUMBER, PLUS, QUOTE, REM, SPACE};
use crate::lang::Context;
use byteorder::{BigEndian, ByteOrder, LittleEndian};

const LOOKAHEAD: usize = 16;

/// Lists every line of a program area. Never fails; problems are reported
/// as comment lines.
pub fn decode_program(bytes: &[u8]) -> String {
    let mut text = String::new();
    let mut index = 0;
    while bytes.len() - index > 4 {
        let number = BigEndian::read_u16(&bytes[index..]);
        let length = LittleEndian::read_u16(&bytes[index + 2..]) as usize;
        index += 4;
        let remaining = bytes.len() - index;
        if length > remaining {
            text.push_str(&format!(
                "# Error: line {} is {} bytes long but only {} bytes remain\n",
                number, length, remaining
            ));
            return text;
        }
        let body = &bytes[index..index + length];
        index += length;
        let (tokens, end) = match body.split_last() {
            Some((end, tokens)) => (tokens, Some(*end)),
            None => (body, None),
        };
        text.push_str(&format!("{} {}\n", number, render(tokens)));
        match end {
            Some(NEWLINE) => {}
            Some(end) => text.push_str(&format!(
                "# Note: line {} ends with {} instead of {}\n",
                number, end, NEWLINE
            )),
            None => text.push_str(&format!("# Note: line {} has no end marker\n", number)),
        }
    }
    if index < bytes.len() {
        text.push_str(&format!(
            "# Warning: {} bytes after the last line could not be converted\n",
            bytes.len() - index
        ));
    }
    text
}

struct Piece {
    byte: Option<u8>,
    text: String,
    context: Context,
    /// Reads back as is, no check needed.
    fixed: bool,
}

impl Piece {
    fn new(byte: u8, text: String, context: Context) -> Piece {
        Piece {
            byte: Some(byte),
            text,
            context,
            fixed: context != Context::Normal,
        }
    }

    fn code(byte: u8) -> Piece {
        Piece {
            byte: Some(byte),
            text: format!("[{}]", byte),
            context: Context::Normal,
            fixed: true,
        }
    }
}

/// Renders the tokens of one line, without line number and end marker.
pub fn render(tokens: &[u8]) -> String {
    let rem = tokens.first() == Some(&REM);
    let mut pieces: Vec<Piece> = Vec::with_capacity(tokens.len());
    let mut quoted = false;
    let mut i = 0;
    while i < tokens.len() {
        let byte = tokens[i];
        if rem && i > 0 {
            pieces.push(Piece::new(byte, token::bracketed_text_of(byte), Context::Rem));
        } else if quoted {
            quoted = byte != QUOTE;
            pieces.push(Piece::new(byte, token::bracketed_text_of(byte), Context::Quoted));
        } else if byte == QUOTE {
            if tokens[i + 1..].contains(&QUOTE) {
                quoted = true;
                let mut piece = Piece::new(byte, "\"".to_string(), Context::Normal);
                piece.fixed = true;
                pieces.push(piece);
            } else {
                pieces.push(Piece::code(byte));
            }
        } else if byte == NUMBER {
            i += hidden_number(&tokens[i..], &mut pieces);
        } else {
            pieces.push(Piece::new(byte, token::text_of(byte).to_string(), Context::Normal));
        }
        i += 1;
    }
    settle(&mut pieces);
    pieces.into_iter().map(|p| p.text).collect()
}

/// Handles the number marker at `tokens[0]`. Returns how many bytes after
/// the marker were consumed.
fn hidden_number(tokens: &[u8], pieces: &mut Vec<Piece>) -> usize {
    let rest = &tokens[1..];
    if rest.len() < float::SIZE {
        pieces.extend(tokens.iter().map(|b| Piece::code(*b)));
        return rest.len();
    }
    let mut bytes = [0u8; float::SIZE];
    bytes.copy_from_slice(&rest[..float::SIZE]);
    match literal_start(pieces, &bytes, rest.get(float::SIZE).copied()) {
        Some(start) => {
            for piece in &mut pieces[start..] {
                piece.fixed = true;
            }
        }
        None => {
            pieces.extend(tokens[..=float::SIZE].iter().map(|b| Piece::code(*b)));
            pieces.push(Piece {
                byte: None,
                text: format!("[#={}]", float::decode(&bytes)),
                context: Context::Normal,
                fixed: true,
            });
        }
    }
    float::SIZE
}

fn is_literal_byte(byte: u8) -> bool {
    token::is_digit(byte) || byte == DOT || byte == LETTER_E || byte == PLUS || byte == MINUS
}

/// Finds the piece where the encoder would start reading the number whose
/// five bytes are `bytes`. `None` unless re-encoding that literal gives
/// exactly the same bytes.
fn literal_start(pieces: &[Piece], bytes: &[u8; float::SIZE], next: Option<u8>) -> Option<usize> {
    if let Some(next) = next {
        let text = token::text_of(next);
        if text.starts_with(|c: char| c.is_ascii_digit() || c == '.' || c == 'E') {
            return None;
        }
    }
    let run = pieces
        .iter()
        .rposition(|p| {
            p.fixed || p.context != Context::Normal || !p.byte.map_or(false, is_literal_byte)
        })
        .map_or(0, |k| k + 1);
    let text: String = pieces[run..].iter().map(|p| p.text.as_str()).collect();
    let mut pos = 0;
    while pos < text.len() {
        let k = run + pos;
        match LITERAL.find(&text[pos..]) {
            Some(m) if pos + m.end() == text.len() => {
                let value = text[pos..].parse::<f64>().ok()?;
                return match float::encode(value) {
                    Ok(encoded) if encoded == *bytes => Some(k),
                    _ => None,
                };
            }
            Some(m) => pos += m.end(),
            None => pos += 1,
        }
    }
    None
}

/// Rewrites, from the end of the line, every piece that would not read
/// back as itself.
fn settle(pieces: &mut [Piece]) {
    let mut after = String::from("\n");
    let last = pieces.len().checked_sub(1);
    for (idx, piece) in pieces.iter_mut().enumerate().rev() {
        if let Some(byte) = piece.byte {
            if Some(idx) == last && byte == SPACE {
                piece.text = "[0]".to_string();
            } else if !piece.fixed && !reads_back(byte, &piece.text, &after) {
                piece.text = escape(byte);
            }
        }
        after.insert_str(0, &piece.text);
        after.truncate(LOOKAHEAD);
    }
}

fn reads_back(byte: u8, text: &str, after: &str) -> bool {
    let ahead = format!("{}{}", text, after);
    if LITERAL.is_match(&ahead) {
        return false;
    }
    match NORMAL.read(&ahead) {
        Some((len, found)) => len == text.len() && found == byte,
        None => false,
    }
}

fn escape(byte: u8) -> String {
    if token::is_keyword(byte) {
        token::bracketed_text_of(byte)
    } else {
        format!("[{}]", byte)
    }
}
