/*!
## Rust Machine Module

This Rust module models the memory image of a ZX81 and turns P-files
back into BASIC text.

*/

pub mod float;
mod header;
mod listing;
pub mod pfile;
pub mod sysvars;

pub use header::decode;
pub use header::decode_p81;
pub use header::p81_filename;
pub use listing::decode_program;
pub use sysvars::SysVar;
pub use sysvars::SystemVariables;
pub use sysvars::Value;
