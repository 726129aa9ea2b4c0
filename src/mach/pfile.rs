//! Layout of a P-file in memory.
//!
//! A P-file is the memory image from the system variables up to `E_LINE`:
//! system variables, program, display file and variables, in that order.

use super::sysvars::{self, SystemVariables};
use crate::error;
use crate::lang::token::NEWLINE;
use crate::lang::Error;
use log::debug;

/// Address of the first program line.
pub const PROGRAM: u16 = 0x407D;

/// Marks the end of the variables area.
pub const VARS_END: u8 = 0x80;

pub const ROWS: usize = 24;
pub const COLUMNS: usize = 32;

/// Size of a display file with every row padded.
pub const EXPANDED_SIZE: usize = ROWS * (COLUMNS + 1) + 1;

/// The display file as rows of character codes.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    rows: Vec<Vec<u8>>,
    collapsed: bool,
}

impl Screen {
    pub fn new(rows: Vec<Vec<u8>>, collapsed: bool) -> Screen {
        Screen { rows, collapsed }
    }

    /// Lays out exactly 24 rows. Extra rows and columns are dropped.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![NEWLINE];
        for l in 0..ROWS {
            let row = self.rows.get(l).map_or(&[][..], |r| &r[..r.len().min(COLUMNS)]);
            bytes.extend_from_slice(row);
            if !self.collapsed {
                bytes.resize(bytes.len() + COLUMNS - row.len(), 0);
            }
            bytes.push(NEWLINE);
        }
        bytes
    }
}

/// Builds a P-file, setting the pointers in `sysvars` from the region sizes.
///
/// `next_line` is the offset of the line to continue at, `None` when the
/// program is stopped. `vars` includes the end marker.
pub fn assemble(
    sysvars: &mut SystemVariables,
    program: &[u8],
    next_line: Option<usize>,
    dfile: &[u8],
    vars: &[u8],
) -> Result<Vec<u8>, Error> {
    let d_file = PROGRAM as usize + program.len();
    let vars_address = d_file + dfile.len();
    let e_line = vars_address + vars.len();
    if e_line + 5 > 0xFFFF {
        return Err(error!(Overflow; "program does not fit in memory, E_LINE would be {}", e_line));
    }
    let nxtlin = match next_line {
        Some(offset) => PROGRAM as usize + offset,
        None => d_file,
    };
    sysvars.set_word("D_FILE", d_file as u16);
    sysvars.set_word("DF_CC", d_file as u16 + 1);
    sysvars.set_word("VARS", vars_address as u16);
    sysvars.set_word("E_LINE", e_line as u16);
    sysvars.set_word("CH_ADD", e_line as u16 + 4);
    sysvars.set_word("STKBOT", e_line as u16 + 5);
    sysvars.set_word("STKEND", e_line as u16 + 5);
    sysvars.set_word("NXTLIN", nxtlin as u16);
    debug!(
        "D_FILE={} VARS={} E_LINE={} NXTLIN={}",
        d_file, vars_address, e_line, nxtlin
    );

    let mut pfile = Vec::with_capacity(e_line - sysvars::BASE as usize);
    pfile.extend_from_slice(sysvars.as_bytes());
    pfile.extend_from_slice(program);
    pfile.extend_from_slice(dfile);
    pfile.extend_from_slice(vars);
    Ok(pfile)
}

/// The regions of an existing P-file.
#[derive(Debug)]
pub struct Regions<'a> {
    pub sysvars: SystemVariables,
    pub program: &'a [u8],
    pub dfile: &'a [u8],
    /// Variables without the end marker.
    pub vars: &'a [u8],
    /// The byte found where the end marker belongs.
    pub vars_end: Option<u8>,
}

impl<'a> Regions<'a> {
    pub fn split(bytes: &'a [u8]) -> Result<Regions<'a>, Error> {
        let sysvars = SystemVariables::from_bytes(bytes)?;
        let index = |name: &str| -> Result<usize, Error> {
            let var = sysvars::lookup(name).ok_or_else(|| error!(InvalidPFile))?;
            let address = sysvars.word(var);
            match address.checked_sub(sysvars::BASE) {
                Some(i) if (i as usize) <= bytes.len() => Ok(i as usize),
                _ => Err(error!(InvalidPFile; "{} points outside the file: {}", name, address)),
            }
        };
        let program = (PROGRAM - sysvars::BASE) as usize;
        let d_file = index("D_FILE")?;
        let vars = index("VARS")?;
        let e_line = index("E_LINE")?;
        if program > d_file || d_file > vars || vars > e_line {
            return Err(error!(InvalidPFile; "D_FILE, VARS and E_LINE are out of order"));
        }
        let (vars_bytes, vars_end) = match bytes[vars..e_line].split_last() {
            Some((last, rest)) => (rest, Some(*last)),
            None => (&[][..], None),
        };
        Ok(Regions {
            program: &bytes[program..d_file],
            dfile: &bytes[d_file..vars],
            vars: vars_bytes,
            vars_end,
            sysvars,
        })
    }

    /// Offset into the program of the line to continue at, `None` when stopped.
    pub fn next_line(&self) -> Option<usize> {
        let nxtlin = sysvars::lookup("NXTLIN").map(|v| self.sysvars.word(v))?;
        let d_file = sysvars::lookup("D_FILE").map(|v| self.sysvars.word(v))?;
        if nxtlin == d_file {
            return None;
        }
        Some((nxtlin as usize).saturating_sub(PROGRAM as usize))
    }

    pub fn is_collapsed(&self) -> bool {
        self.dfile.len() < EXPANDED_SIZE
    }
}
