//! The data model for Timble assembly programs.
//!
//! A parsed program is a sequence of [`Symbol`]s in source order. Labels are
//! interleaved with the rest of the stream but do not occupy an instruction
//! slot; [`crate::asm::resolve_labels`] strips them out and rewrites every
//! [`PCTarget::Label`] into a numeric [`PCTarget::Offset`].
//!
//! Operand ranges are mostly *not* enforced here: immediates and jump
//! targets are carried as `i64` and checked when the instruction word is
//! built (see [`crate::asm::encoding`]). The one exception is [`Reg`], which
//! can only be constructed in range.

use std::borrow::Cow;

/// A register. Must be between 0 and 31.
///
/// Written in source as `$` followed by the register number:
///
/// ```text
/// add $1, $2, $3
///     ~~  ~~  ~~
/// lb $4, 8($5)
///    ~~    ~~
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Reg(pub(crate) u8);

impl Reg {
    /// Gets the register number of this [`Reg`]. This is always between 0 and 31.
    pub fn reg_no(self) -> u8 {
        self.0
    }
}
impl std::fmt::Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.0)
    }
}
impl TryFrom<i64> for Reg {
    type Error = RangeErr;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0..=31 => Ok(Reg(value as u8)),
            _      => Err(RangeErr::Reg(value)),
        }
    }
}

/// Errors raised when an operand falls outside its encodable range.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum RangeErr {
    /// Register number outside [0, 32).
    Reg(i64),
    /// Immediate outside the 16-bit two's complement range [-2^15, 2^15).
    Imm(i64),
    /// Jump target outside the 26-bit unsigned range [0, 2^26).
    JumpTarget(i64),
    /// A `.dw` directive with a negative value.
    NegativeData(i64),
    /// A numeric literal too large to represent at all.
    LiteralOverflow(String),
}

impl std::fmt::Display for RangeErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeErr::Reg(n)             => write!(f, "expected register 0~31, found: \"{n}\""),
            RangeErr::Imm(n)             => write!(f, "expected immediate value between [-2^15, 2^15), found: \"{n}\""),
            RangeErr::JumpTarget(n)      => write!(f, "expected jump target to be between [0, 2^26), found: \"{n}\""),
            RangeErr::NegativeData(n)    => write!(f, ".dw directive unsupported for negative values: \"{n}\""),
            RangeErr::LiteralOverflow(s) => write!(f, "numeric literal too large: \"{s}\""),
        }
    }
}
impl std::error::Error for RangeErr {}
impl crate::err::Error for RangeErr {
    fn help(&self) -> Option<Cow<str>> {
        match self {
            RangeErr::Reg(_)             => Some("the register file has 32 registers, $0 through $31".into()),
            RangeErr::Imm(_)             => Some(format!("immediates are 16-bit two's complement, so the range is [{}, {}]", i16::MIN, i16::MAX).into()),
            RangeErr::JumpTarget(_)      => Some(format!("jump targets are 26-bit unsigned, so the range is [0, {}]", (1u32 << 26) - 1).into()),
            RangeErr::NegativeData(_)    => Some("data words must be non-negative".into()),
            RangeErr::LiteralOverflow(_) => None,
        }
    }
}

/// A label name, marking a program-counter position.
///
/// Declared in source by writing the name with a trailing colon; referenced
/// (without the colon) as the last operand of `beq` and `j`:
///
/// ```text
/// loop:
/// ~~~~
///     addi $1, $1, 1
///     beq $1, $2, done
///                 ~~~~
///     j loop
///       ~~~~
/// done:
/// ~~~~
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Label {
    /// The label's identifier.
    pub name: String,
}
impl Label {
    /// Creates a new label.
    pub fn new(name: impl Into<String>) -> Self {
        Label { name: name.into() }
    }
}
impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.name.fmt(f)
    }
}

/// A branch or jump target: a label before resolution, a numeric
/// program-counter value after.
///
/// The parser only ever produces the [`PCTarget::Label`] form. Label
/// resolution replaces it with [`PCTarget::Offset`], holding a PC-relative
/// offset for `beq` and an absolute instruction index for `j`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum PCTarget {
    #[allow(missing_docs)]
    Label(Label),
    #[allow(missing_docs)]
    Offset(i64),
}
impl std::fmt::Display for PCTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PCTarget::Label(label) => label.fmt(f),
            PCTarget::Offset(off)  => off.fmt(f),
        }
    }
}

/// An assembler directive.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Directive {
    /// `.dw n`: emit a raw data word instead of an operation encoding.
    ///
    /// The value is kept signed so that negative literals parse; they are
    /// rejected when the word is built.
    Dw(i64),
}
impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Directive::Dw(value) => write!(f, ".dw {value}"),
        }
    }
}

/// An operation, one variant per supported mnemonic.
///
/// Each variant carries exactly the operands its syntax allows, so an
/// unknown mnemonic or a malformed arity cannot be represented at all.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Op {
    /// `add $rd, $rs, $rt`
    Add(Reg, Reg, Reg),
    /// `sub $rd, $rs, $rt`
    Sub(Reg, Reg, Reg),
    /// `and $rd, $rs, $rt`
    And(Reg, Reg, Reg),
    /// `or $rd, $rs, $rt`
    Or(Reg, Reg, Reg),
    /// `slt $rd, $rs, $rt`
    Slt(Reg, Reg, Reg),
    /// `addi $rd, $rs, imm`
    Addi(Reg, Reg, i64),
    /// `beq $rs, $rt, label`
    ///
    /// The operands are stored as `(rt, rs, target)`, the *reverse* of their
    /// order in source. The encoder reads the duplicated register field out
    /// of the second slot, so this ordering is load-bearing.
    Beq(Reg, Reg, PCTarget),
    /// `j label`
    J(PCTarget),
    /// `lb $rd, offset($base)`, stored as `(rd, base, offset)`.
    Lb(Reg, Reg, i64),
    /// `sb $rd, offset($base)`, stored as `(rd, base, offset)`.
    Sb(Reg, Reg, i64),
}

impl Op {
    /// The text name of this operation.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::Add(..)  => "add",
            Op::Sub(..)  => "sub",
            Op::And(..)  => "and",
            Op::Or(..)   => "or",
            Op::Slt(..)  => "slt",
            Op::Addi(..) => "addi",
            Op::Beq(..)  => "beq",
            Op::J(..)    => "j",
            Op::Lb(..)   => "lb",
            Op::Sb(..)   => "sb",
        }
    }
}
impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Op::Add(rd, rs, rt)
            | Op::Sub(rd, rs, rt)
            | Op::And(rd, rs, rt)
            | Op::Or(rd, rs, rt)
            | Op::Slt(rd, rs, rt) => write!(f, "{} {rd}, {rs}, {rt}", self.mnemonic()),
            Op::Addi(rd, rs, imm) => write!(f, "addi {rd}, {rs}, {imm}"),
            // displayed in source order, not storage order
            Op::Beq(rt, rs, target) => write!(f, "beq {rs}, {rt}, {target}"),
            Op::J(target)           => write!(f, "j {target}"),
            Op::Lb(rd, base, off)   => write!(f, "lb {rd}, {off}({base})"),
            Op::Sb(rd, base, off)   => write!(f, "sb {rd}, {off}({base})"),
        }
    }
}

/// One element of a parsed program.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Symbol {
    /// A named program-counter marker. Does not occupy an instruction slot.
    Label(Label),
    /// A directive. Occupies one instruction slot.
    Directive(Directive),
    /// An operation. Occupies one instruction slot.
    Op(Op),
}
impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Label(label) => write!(f, "{label}:"),
            Symbol::Directive(d) => d.fmt(f),
            Symbol::Op(op)       => op.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Label, Op, PCTarget, RangeErr, Reg};

    #[test]
    fn test_reg_range() {
        assert_eq!(Reg::try_from(0).map(Reg::reg_no), Ok(0));
        assert_eq!(Reg::try_from(31).map(Reg::reg_no), Ok(31));
        assert_eq!(Reg::try_from(32), Err(RangeErr::Reg(32)));
        assert_eq!(Reg::try_from(-1), Err(RangeErr::Reg(-1)));
    }

    #[test]
    fn test_op_display_source_order() {
        // beq operands are stored reversed but display in source order
        let op = Op::Beq(Reg(5), Reg(4), PCTarget::Label(Label::new("next")));
        assert_eq!(op.to_string(), "beq $4, $5, next");

        let op = Op::Lb(Reg(1), Reg(2), -7);
        assert_eq!(op.to_string(), "lb $1, -7($2)");
    }
}
