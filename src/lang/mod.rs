/*!
# Rust Language Module

This Rust module converts BASIC text into ZX81 P-files. It holds the
character set and keyword tokens shared with the decoder.

*/

#[macro_use]
mod error;
mod encode;
pub(crate) mod grammar;
mod lex;
pub mod token;

pub use encode::{encode, encode_program, encode_with, Directory, Encoding, Include, NoInclude};
pub use error::Error;
pub use error::ErrorCode;
pub use lex::Context;
