//! # ZX81 BASIC
//!
//! Converts ZX81 BASIC programs between plain text and the P-file memory
//! images used by emulators and tape interfaces.
//!
//! Install with `cargo install zx81-basic`, then convert in either
//! direction. The direction follows the file extension.
//! ```text
//! zx81 life.bas          # writes life.p
//! zx81 life.p            # writes life.bas
//! zx81 --p81 life.bas    # writes life.p81 with a cassette name
//! ```
//!
//! Decoding never fails. Any program, including machine code in `REM`
//! lines or numbers whose hidden value was poked, decodes to text that
//! encodes back to the same program bytes.
//!
//! ```
//! let encoding = zx81::lang::encode("10 PRINT \"HELLO\"\n").unwrap();
//! let text = zx81::mach::decode(&encoding.pfile);
//! assert_eq!(text, "10 PRINT \"HELLO\"\n");
//! ```

#[path = "doc/text_format.rs"]
#[allow(non_snake_case)]
pub mod _Text_Format;

#[path = "doc/directives.rs"]
#[allow(non_snake_case)]
pub mod __Directives;

pub mod lang;
pub mod mach;
