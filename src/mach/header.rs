//! P-file to BASIC text, including the directives that restore everything
//! outside the program area.

use super::listing::decode_program;
use super::pfile::{Regions, PROGRAM, VARS_END};
use super::sysvars::SystemVariables;
use crate::lang::token::{self, NEWLINE, SPACE};
use byteorder::{ByteOrder, LittleEndian};
use log::debug;

const VARS_PER_LINE: usize = 20;

/// Most characters a `.p81` file name may have.
const NAME_LIMIT: usize = 128;

/// Converts a P-file to text. Never fails; a file that cannot be split into
/// its regions produces a single error comment.
pub fn decode(bytes: &[u8]) -> String {
    let regions = match Regions::split(bytes) {
        Ok(regions) => regions,
        Err(e) => return format!("# Error: {}\n", e.text()),
    };
    debug!(
        "program {} bytes, display {} bytes, variables {} bytes",
        regions.program.len(),
        regions.dfile.len(),
        regions.vars.len()
    );
    let mut text = header(&regions);
    if !text.is_empty() {
        text.push('\n');
    }
    text.push_str(&decode_program(regions.program));
    text
}

/// Converts a `.p81` file: a name followed by a P-file.
pub fn decode_p81(bytes: &[u8]) -> String {
    let (len, name) = p81_filename(bytes);
    format!("# Filename: {}\n{}", name, decode(&bytes[len..]))
}

/// Reads the name at the start of a `.p81` file. The last character has
/// bit 7 set. Returns the number of bytes used and the name as text.
pub fn p81_filename(bytes: &[u8]) -> (usize, String) {
    let mut name = String::new();
    let mut len = 0;
    for &c in bytes.iter().take(NAME_LIMIT) {
        name.push_str(token::text_of(c & 0x7F));
        len += 1;
        if c & 0x80 != 0 {
            break;
        }
    }
    (len, name)
}

fn header(regions: &Regions) -> String {
    let mut text = String::new();
    basic_start(regions, &mut text);
    dfile(regions, &mut text);
    for chunk in regions.vars.chunks(VARS_PER_LINE) {
        text.push_str(&format!("#!basic-vars:{}\n", byte_list(chunk)));
    }
    if let Some(end) = regions.vars_end {
        if end != VARS_END {
            text.push_str(&format!(
                "# Warning: variables end with {} instead of {}\n",
                end, VARS_END
            ));
        }
    }
    for (var, _) in SystemVariables::default().compare(regions.sysvars.as_bytes()) {
        text.push_str(&format!(
            "#!system-vars:{}={}\n",
            var.name,
            regions.sysvars.value(var)
        ));
    }
    text
}

fn basic_start(regions: &Regions, text: &mut String) {
    let offset = match regions.next_line() {
        Some(offset) => offset,
        None => return,
    };
    let program = regions.program;
    let mut index = 0;
    while index + 4 <= program.len() {
        if index == offset {
            let number = u16::from_be_bytes([program[index], program[index + 1]]);
            text.push_str(&format!("#!basic-start={}\n", number));
            return;
        }
        index += 4 + LittleEndian::read_u16(&program[index + 2..]) as usize;
    }
    text.push_str(&format!(
        "# Warning: NXTLIN points to {}, which is not the start of a line\n",
        PROGRAM as usize + offset
    ));
}

fn dfile(regions: &Regions, text: &mut String) {
    let collapsed = regions.is_collapsed();
    if collapsed {
        text.push_str("#!dfile-collapsed\n");
    }
    let dfile = regions.dfile.get(1..).unwrap_or(&[]);
    let mut rows: Vec<&[u8]> = dfile.split(|b| *b == NEWLINE).collect();
    if dfile.last() == Some(&NEWLINE) || dfile.is_empty() {
        rows.pop();
    }
    if !collapsed {
        rows = rows.into_iter().map(trim_row).collect();
    }
    while rows.last().map_or(false, |r| r.is_empty()) {
        rows.pop();
    }
    for row in rows {
        let mut line: Vec<String> = row.iter().map(|b| token::bracketed_text_of(*b)).collect();
        if row.last() == Some(&SPACE) {
            line.pop();
            line.push("[0]".to_string());
        }
        text.push_str(&format!("#!dfile:{}\n", line.concat()));
    }
}

fn trim_row(row: &[u8]) -> &[u8] {
    let len = row.iter().rposition(|b| *b != SPACE).map_or(0, |k| k + 1);
    &row[..len]
}

fn byte_list(bytes: &[u8]) -> String {
    let list: Vec<String> = bytes.iter().map(|b| b.to_string()).collect();
    format!("[{}]", list.join(","))
}
