//! # ZX81 BASIC
//!
//! Command line converter between BASIC text and P-files.
//!

mod term;

fn main() {
    term::main();
}
