//! A parser and assembler for Timble, a toy 32-bit register-based
//! instruction set.
//!
//! The core of this crate is a four-stage pipeline, exposed in one call as
//! [`assemble`]: source text is tokenized, parsed into symbols, run through
//! two-pass label resolution, and encoded into 32-bit machine words that
//! are printed as 8-digit lowercase hex, one word per line.
//!
//! # Usage
//!
//! ```
//! let hex = timble::assemble("
//!     loop:
//!         addi $1, $1, 1
//!         beq $1, $2, done
//!         j loop
//!     done:
//!         add $3, $1, $2
//! ").unwrap();
//! assert_eq!(hex, "20210001\n10210001\n08000000\n00221820");
//! ```
//!
//! The stages are also usable on their own. To inspect a program's symbols
//! before encoding, parse and assemble separately:
//!
//! ```
//! use timble::parse::parse_symbols;
//! use timble::asm::assemble;
//!
//! let symbols = parse_symbols(".dw 5").unwrap();
//! let hex = assemble(symbols).unwrap();
//! assert_eq!(hex, "05000000");
//! ```
//!
//! Errors from any stage carry a printable message (and, via
//! [`err::Error::help`], an optional hint):
//!
//! ```
//! let result = timble::assemble("j nowhere");
//! assert_eq!(result.unwrap_err().to_string(), "label not found: nowhere");
//! ```
//!
//! Each call is independent; the pipeline holds no state between calls and
//! performs no I/O.
#![warn(missing_docs)]

pub mod parse;
pub mod ast;
pub mod asm;
pub mod err;

use err::AsmErr;

/// Translates assembly source text into machine code, rendered as
/// newline-joined 8-digit lowercase hex words (one per non-label symbol,
/// in program order).
///
/// This runs the full pipeline: [`parse::parse_symbols`], then
/// [`asm::assemble`]. It fails on the first error any stage raises, with
/// no partial output.
///
/// # Example
/// ```
/// assert_eq!(timble::assemble("add $1, $2, $3").unwrap(), "00430820");
/// assert!(timble::assemble("add $32, $0, $0").is_err());
/// ```
pub fn assemble(src: &str) -> Result<String, AsmErr> {
    let symbols = parse::parse_symbols(src)?;
    asm::assemble(symbols)
}
