#![allow(dead_code)]

use zx81::lang;
use zx81::mach;

pub const NEWLINE: u8 = 0x76;

/// Program area of the encoded text.
pub fn program(text: &str) -> Vec<u8> {
    match lang::encode_program(text) {
        Ok(bytes) => bytes,
        Err(error) => panic!("{}\n{}", error, text),
    }
}

/// A complete P-file from the encoded text.
pub fn pfile(text: &str) -> Vec<u8> {
    match lang::encode(text) {
        Ok(encoding) => encoding.pfile,
        Err(error) => panic!("{}\n{}", error, text),
    }
}

/// Line 1 holding `tokens`.
pub fn line(tokens: &[u8]) -> Vec<u8> {
    let length = tokens.len() + 1;
    let mut bytes = vec![0, 1, (length & 0xFF) as u8, (length >> 8) as u8];
    bytes.extend_from_slice(tokens);
    bytes.push(NEWLINE);
    bytes
}

/// Lists a program area and encodes the listing again.
pub fn relist(bytes: &[u8]) -> Vec<u8> {
    let text = mach::decode_program(bytes);
    match lang::encode_program(&text) {
        Ok(again) => again,
        Err(error) => panic!("{}\n{}", error, text),
    }
}

/// Decodes a P-file and encodes the text again.
pub fn redecode(bytes: &[u8]) -> Vec<u8> {
    pfile(&mach::decode(bytes))
}

pub fn assert_relists(bytes: &[u8]) {
    assert_eq!(relist(bytes), bytes, "{}", mach::decode_program(bytes));
}
