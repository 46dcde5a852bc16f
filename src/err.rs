//! Error types for the assembler pipeline.
//!
//! The pipeline is fail-fast: every stage returns the first problem it finds
//! and no stage collects more than one diagnostic. The stage-specific error
//! enums live next to the code that raises them:
//! - [`LexErr`]: tokenizer invariant breaks (see [`parse::lex`]),
//! - [`SyntaxErr`]: malformed source syntax (see [`parse`]),
//! - [`ResolveErr`]: label resolution failures (see [`asm`]),
//! - [`RangeErr`]: operands outside their encodable range (see [`ast`]),
//! - [`InternalErr`]: symbols reaching the encoder that earlier stages
//!   should have excluded (see [`asm::encoding`]).
//!
//! [`AsmErr`] unifies all of them so that every stage can propagate with `?`
//! and callers receive a single error value carrying a printable message.
//!
//! [`parse::lex`]: crate::parse::lex
//! [`parse`]: crate::parse
//! [`asm`]: crate::asm
//! [`ast`]: crate::ast
//! [`asm::encoding`]: crate::asm::encoding

use std::borrow::Cow;

pub use crate::asm::encoding::InternalErr;
pub use crate::asm::ResolveErr;
pub use crate::ast::RangeErr;
pub use crate::parse::lex::LexErr;
pub use crate::parse::SyntaxErr;

/// Unified error interface for all of the error types of this crate.
pub trait Error: std::error::Error {
    /// A short hint to help a user resolve this error, if there is one.
    fn help(&self) -> Option<Cow<str>> {
        None
    }
}

/// Any error raised while translating assembly source text.
///
/// Each variant wraps the error type of the stage that raised it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AsmErr {
    /// The tokenizer broke one of its own scan invariants.
    Lex(LexErr),
    /// The source text is not well-formed assembly.
    Syntax(SyntaxErr),
    /// A label could not be resolved to a program-counter value.
    Resolve(ResolveErr),
    /// An operand does not fit its instruction field.
    Range(RangeErr),
    /// A symbol reached the code generator that should not have.
    Internal(InternalErr),
}

impl std::fmt::Display for AsmErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AsmErr::Lex(e)      => e.fmt(f),
            AsmErr::Syntax(e)   => e.fmt(f),
            AsmErr::Resolve(e)  => e.fmt(f),
            AsmErr::Range(e)    => e.fmt(f),
            AsmErr::Internal(e) => e.fmt(f),
        }
    }
}
impl std::error::Error for AsmErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AsmErr::Lex(e)      => Some(e),
            AsmErr::Syntax(e)   => Some(e),
            AsmErr::Resolve(e)  => Some(e),
            AsmErr::Range(e)    => Some(e),
            AsmErr::Internal(e) => Some(e),
        }
    }
}
impl Error for AsmErr {
    fn help(&self) -> Option<Cow<str>> {
        match self {
            AsmErr::Lex(e)      => e.help(),
            AsmErr::Syntax(e)   => e.help(),
            AsmErr::Resolve(e)  => e.help(),
            AsmErr::Range(e)    => e.help(),
            AsmErr::Internal(e) => e.help(),
        }
    }
}

impl From<LexErr> for AsmErr {
    fn from(value: LexErr) -> Self {
        AsmErr::Lex(value)
    }
}
impl From<SyntaxErr> for AsmErr {
    fn from(value: SyntaxErr) -> Self {
        AsmErr::Syntax(value)
    }
}
impl From<ResolveErr> for AsmErr {
    fn from(value: ResolveErr) -> Self {
        AsmErr::Resolve(value)
    }
}
impl From<RangeErr> for AsmErr {
    fn from(value: RangeErr) -> Self {
        AsmErr::Range(value)
    }
}
impl From<InternalErr> for AsmErr {
    fn from(value: InternalErr) -> Self {
        AsmErr::Internal(value)
    }
}
