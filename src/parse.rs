//! Parsing Timble assembly into symbols.
//!
//! This module is used to convert assembly source code into a [`Symbol`]
//! sequence which can be fed to the assembler (see [`crate::asm`]).
//!
//! The main function of this module is [`parse_symbols`]. Parsing works on a
//! flat token stream with an explicit cursor, consuming a variable number of
//! tokens per symbol; the per-mnemonic operand shapes live in the match arms
//! of [`Parser::symbol`].

pub mod lex;

use std::borrow::Cow;

use logos::Logos;

use crate::ast::{Directive, Label, Op, PCTarget, Reg, Symbol};
use crate::err::AsmErr;
use lex::Token;

/// Parses assembly source code into a sequence of symbols.
///
/// # Example
/// ```
/// use timble::ast::{Op, Symbol};
/// use timble::parse::parse_symbols;
///
/// let symbols = parse_symbols("add $1, $2, $3").unwrap();
/// assert!(matches!(symbols[..], [Symbol::Op(Op::Add(..))]));
/// ```
pub fn parse_symbols(src: &str) -> Result<Vec<Symbol>, AsmErr> {
    let tokens: Vec<_> = Token::lexer(src).collect::<Result<_, _>>()?;
    let tokens = tokens.into_iter()
        .filter(|t| !t.is_comment())
        .collect();

    Parser::new(tokens).run()
}

/// Any errors raised in attempting to parse a token stream.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SyntaxErr {
    /// A comma was expected at this operand position.
    ExpectedComma(String),
    /// A numeric literal was expected (optional `-`, then decimal digits).
    ExpectedNumber(String),
    /// A register was expected (`$` followed by a number).
    ExpectedRegister(String),
    /// A memory operand was expected (`offset(register)`).
    ExpectedOffsetAccess(String),
    /// A label may not start with a digit.
    LabelStartsWithDigit(String),
    /// A label may not contain a colon.
    LabelHasColon(String),
    /// The mnemonic is not one of the supported operations.
    UnknownMnemonic(String),
    /// The token stream ended in the middle of an instruction.
    UnexpectedEof,
}
impl std::fmt::Display for SyntaxErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxErr::ExpectedComma(s)        => write!(f, "expected comma, found: \"{s}\""),
            SyntaxErr::ExpectedNumber(s)       => write!(f, "expected number, found: \"{s}\""),
            SyntaxErr::ExpectedRegister(s)     => write!(f, "expected register, found: \"{s}\""),
            SyntaxErr::ExpectedOffsetAccess(s) => write!(f, "expected offset access, found: \"{s}\""),
            SyntaxErr::LabelStartsWithDigit(s) => write!(f, "labels can't start with a number; found: \"{s}\""),
            SyntaxErr::LabelHasColon(s)        => write!(f, "invalid character found in label: \"{s}\""),
            SyntaxErr::UnknownMnemonic(s)      => write!(f, "unknown token: \"{s}\""),
            SyntaxErr::UnexpectedEof           => f.write_str("unexpected end of input"),
        }
    }
}
impl std::error::Error for SyntaxErr {}
impl crate::err::Error for SyntaxErr {
    fn help(&self) -> Option<Cow<str>> {
        match self {
            SyntaxErr::ExpectedComma(_)        => None,
            SyntaxErr::ExpectedNumber(_)       => Some("numeric literals are decimal, with an optional leading '-'".into()),
            SyntaxErr::ExpectedRegister(_)     => Some("registers are written $0 through $31".into()),
            SyntaxErr::ExpectedOffsetAccess(_) => Some("memory operands are written offset(register), e.g. -4($3)".into()),
            SyntaxErr::LabelStartsWithDigit(_) => None,
            SyntaxErr::LabelHasColon(_)        => None,
            SyntaxErr::UnknownMnemonic(_)      => Some("supported operations are add, sub, and, or, slt, addi, beq, j, lb, sb, and the .dw directive".into()),
            SyntaxErr::UnexpectedEof           => Some("the last instruction is missing one or more operands".into()),
        }
    }
}

/// Cursor over the token stream.
struct Parser {
    tokens: Vec<Token>,
    index: usize,
}
impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, index: 0 }
    }

    fn run(mut self) -> Result<Vec<Symbol>, AsmErr> {
        let mut symbols = vec![];
        while self.index < self.tokens.len() {
            let token = self.operand()?;
            symbols.push(self.symbol(&token)?);
        }
        Ok(symbols)
    }

    /// Consumes the next token, rendering it as operand text.
    ///
    /// A comma here is not rejected; it renders as `","` and fails in
    /// whichever literal parser receives it, matching the errors a stray
    /// comma should produce.
    fn operand(&mut self) -> Result<String, AsmErr> {
        let token = self.tokens.get(self.index).ok_or(SyntaxErr::UnexpectedEof)?;
        self.index += 1;
        Ok(token.to_string())
    }

    /// Consumes the next token, which must be a comma.
    fn comma(&mut self) -> Result<(), AsmErr> {
        let token = self.tokens.get(self.index).ok_or(SyntaxErr::UnexpectedEof)?;
        self.index += 1;
        match token {
            Token::Comma => Ok(()),
            t => Err(SyntaxErr::ExpectedComma(t.to_string()).into()),
        }
    }

    fn reg(&mut self) -> Result<Reg, AsmErr> {
        parse_reg(&self.operand()?)
    }

    /// Parses one symbol, whose leading token has already been consumed.
    fn symbol(&mut self, token: &str) -> Result<Symbol, AsmErr> {
        if let Some(name) = token.strip_suffix(':') {
            return Ok(Symbol::Label(parse_label(name)?));
        }
        if token == ".dw" {
            let value = parse_num(&self.operand()?)?;
            return Ok(Symbol::Directive(Directive::Dw(value)));
        }

        let op = match token {
            "add" | "sub" | "and" | "or" | "slt" => {
                let rd = self.reg()?;
                self.comma()?;
                let rs = self.reg()?;
                self.comma()?;
                let rt = self.reg()?;
                match token {
                    "add" => Op::Add(rd, rs, rt),
                    "sub" => Op::Sub(rd, rs, rt),
                    "and" => Op::And(rd, rs, rt),
                    "or"  => Op::Or(rd, rs, rt),
                    _     => Op::Slt(rd, rs, rt),
                }
            },
            "addi" => {
                let rd = self.reg()?;
                self.comma()?;
                let rs = self.reg()?;
                self.comma()?;
                let imm = parse_num(&self.operand()?)?;
                Op::Addi(rd, rs, imm)
            },
            "beq" => {
                let rs = self.reg()?;
                self.comma()?;
                let rt = self.reg()?;
                self.comma()?;
                let target = PCTarget::Label(parse_label(&self.operand()?)?);
                // stored (rt, rs, target); see the Op::Beq docs
                Op::Beq(rt, rs, target)
            },
            "j" => Op::J(PCTarget::Label(parse_label(&self.operand()?)?)),
            "lb" | "sb" => {
                let rd = self.reg()?;
                self.comma()?;
                let (offset, base) = parse_offset_access(&self.operand()?)?;
                match token {
                    "lb" => Op::Lb(rd, base, offset),
                    _    => Op::Sb(rd, base, offset),
                }
            },
            _ => return Err(SyntaxErr::UnknownMnemonic(token.to_string()).into()),
        };

        Ok(Symbol::Op(op))
    }
}

/// Parses a signed decimal integer literal: an optional leading `-`,
/// then one or more digits. Nothing else is accepted.
fn parse_num(s: &str) -> Result<i64, AsmErr> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SyntaxErr::ExpectedNumber(s.to_string()).into());
    }

    // the digits are valid, so the only possible failure left is overflow
    s.parse::<i64>()
        .map_err(|_| crate::ast::RangeErr::LiteralOverflow(s.to_string()).into())
}

/// Parses a register literal: `$` followed by a number in [0, 32).
fn parse_reg(s: &str) -> Result<Reg, AsmErr> {
    let Some(digits) = s.strip_prefix('$') else {
        return Err(SyntaxErr::ExpectedRegister(s.to_string()).into());
    };

    let n = parse_num(digits)?;
    Reg::try_from(n).map_err(Into::into)
}

/// Validates a label name (either a declaration with its colon already
/// stripped, or a branch/jump operand).
fn parse_label(s: &str) -> Result<Label, AsmErr> {
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(SyntaxErr::LabelStartsWithDigit(s.to_string()).into());
    }
    if s.contains(':') {
        return Err(SyntaxErr::LabelHasColon(s.to_string()).into());
    }
    Ok(Label::new(s))
}

/// Parses an `offset(register)` memory operand, returning `(offset, register)`.
///
/// The offset is the text before `(`, the register the text between the
/// parentheses. Text after `)` is ignored.
fn parse_offset_access(s: &str) -> Result<(i64, Reg), AsmErr> {
    let operand = (s.find('('))
        .zip(s.find(')'))
        .and_then(|(open, close)| {
            let offset = s.get(..open)?;
            let register = s.get((open + 1)..close)?;
            Some((offset, register))
        });
    let Some((offset, register)) = operand else {
        return Err(SyntaxErr::ExpectedOffsetAccess(s.to_string()).into());
    };

    Ok((parse_num(offset)?, parse_reg(register)?))
}

#[cfg(test)]
mod tests {
    use crate::ast::{Directive, Label, Op, PCTarget, RangeErr, Reg, Symbol};
    use crate::err::{AsmErr, SyntaxErr};

    use super::parse_symbols;

    fn label(name: &str) -> Symbol {
        Symbol::Label(Label::new(name))
    }
    fn target(name: &str) -> PCTarget {
        PCTarget::Label(Label::new(name))
    }
    fn reg(n: u8) -> Reg {
        Reg::try_from(i64::from(n)).unwrap()
    }
    fn parse_err(src: &str) -> AsmErr {
        parse_symbols(src).unwrap_err()
    }

    #[test]
    fn test_three_reg_ops() {
        let symbols = parse_symbols("add $1, $2, $3\nsub $4,$5,$6").unwrap();
        assert_eq!(symbols, vec![
            Symbol::Op(Op::Add(reg(1), reg(2), reg(3))),
            Symbol::Op(Op::Sub(reg(4), reg(5), reg(6))),
        ]);

        let symbols = parse_symbols("and $0, $0, $0\nor $0, $0, $0\nslt $0, $0, $0").unwrap();
        assert!(matches!(symbols[..], [
            Symbol::Op(Op::And(..)),
            Symbol::Op(Op::Or(..)),
            Symbol::Op(Op::Slt(..)),
        ]));
    }

    #[test]
    fn test_addi() {
        let symbols = parse_symbols("addi $1, $2, -3").unwrap();
        assert_eq!(symbols, vec![Symbol::Op(Op::Addi(reg(1), reg(2), -3))]);
    }

    #[test]
    fn test_beq_operand_order() {
        // beq $4, $5, next stores its registers as (rt, rs) = ($5, $4)
        let symbols = parse_symbols("beq $4, $5, next").unwrap();
        assert_eq!(symbols, vec![Symbol::Op(Op::Beq(reg(5), reg(4), target("next")))]);
    }

    #[test]
    fn test_jump_and_labels() {
        let symbols = parse_symbols("loop:\n  j loop\ndone:").unwrap();
        assert_eq!(symbols, vec![
            label("loop"),
            Symbol::Op(Op::J(target("loop"))),
            label("done"),
        ]);
    }

    #[test]
    fn test_load_store() {
        let symbols = parse_symbols("lb $1, -7($9)\nsb $3, 12($31)").unwrap();
        assert_eq!(symbols, vec![
            Symbol::Op(Op::Lb(reg(1), reg(9), -7)),
            Symbol::Op(Op::Sb(reg(3), reg(31), 12)),
        ]);
    }

    #[test]
    fn test_dw() {
        let symbols = parse_symbols(".dw 5\n.dw -4").unwrap();
        assert_eq!(symbols, vec![
            Symbol::Directive(Directive::Dw(5)),
            // negative values parse; the encoder rejects them
            Symbol::Directive(Directive::Dw(-4)),
        ]);
    }

    #[test]
    fn test_unknown_mnemonic() {
        assert_eq!(
            parse_err("mul $1, $2, $3"),
            AsmErr::Syntax(SyntaxErr::UnknownMnemonic("mul".to_string())),
        );
        // a stray comma at statement position is also an unknown token
        assert_eq!(
            parse_err(", add $1, $2, $3"),
            AsmErr::Syntax(SyntaxErr::UnknownMnemonic(",".to_string())),
        );
    }

    #[test]
    fn test_missing_comma() {
        assert_eq!(
            parse_err("add $1 $2, $3"),
            AsmErr::Syntax(SyntaxErr::ExpectedComma("$2".to_string())),
        );
    }

    #[test]
    fn test_malformed_register() {
        assert_eq!(
            parse_err("add r1, $2, $3"),
            AsmErr::Syntax(SyntaxErr::ExpectedRegister("r1".to_string())),
        );
        // the number error reports the text after the '$'
        assert_eq!(
            parse_err("add $x, $2, $3"),
            AsmErr::Syntax(SyntaxErr::ExpectedNumber("x".to_string())),
        );
        // out-of-range registers are range errors, caught at parse time
        assert_eq!(
            parse_err("add $32, $0, $0"),
            AsmErr::Range(RangeErr::Reg(32)),
        );
        assert_eq!(
            parse_err("add $-1, $0, $0"),
            AsmErr::Range(RangeErr::Reg(-1)),
        );
    }

    #[test]
    fn test_malformed_number() {
        assert_eq!(
            parse_err(".dw -"),
            AsmErr::Syntax(SyntaxErr::ExpectedNumber("-".to_string())),
        );
        assert_eq!(
            parse_err("addi $1, $2, 3f"),
            AsmErr::Syntax(SyntaxErr::ExpectedNumber("3f".to_string())),
        );
        assert_eq!(
            parse_err("addi $1, $2, 0x10"),
            AsmErr::Syntax(SyntaxErr::ExpectedNumber("0x10".to_string())),
        );
    }

    #[test]
    fn test_malformed_label() {
        assert_eq!(
            parse_err("9lives:"),
            AsmErr::Syntax(SyntaxErr::LabelStartsWithDigit("9lives".to_string())),
        );
        assert_eq!(
            parse_err("a:b:"),
            AsmErr::Syntax(SyntaxErr::LabelHasColon("a:b".to_string())),
        );
        assert_eq!(
            parse_err("j 9lives"),
            AsmErr::Syntax(SyntaxErr::LabelStartsWithDigit("9lives".to_string())),
        );
    }

    #[test]
    fn test_malformed_offset_access() {
        assert_eq!(
            parse_err("lb $1, 4"),
            AsmErr::Syntax(SyntaxErr::ExpectedOffsetAccess("4".to_string())),
        );
        assert_eq!(
            parse_err("lb $1, 4($2"),
            AsmErr::Syntax(SyntaxErr::ExpectedOffsetAccess("4($2".to_string())),
        );
        assert_eq!(
            parse_err("lb $1, )4($2"),
            AsmErr::Syntax(SyntaxErr::ExpectedOffsetAccess(")4($2".to_string())),
        );
        assert_eq!(
            parse_err("lb $1, x($2)"),
            AsmErr::Syntax(SyntaxErr::ExpectedNumber("x".to_string())),
        );
    }

    #[test]
    fn test_unexpected_eof() {
        assert_eq!(parse_err("add $1, $2,"), AsmErr::Syntax(SyntaxErr::UnexpectedEof));
        assert_eq!(parse_err("j"), AsmErr::Syntax(SyntaxErr::UnexpectedEof));
        assert_eq!(parse_err(".dw"), AsmErr::Syntax(SyntaxErr::UnexpectedEof));
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(parse_symbols("").unwrap(), vec![]);
        assert_eq!(parse_symbols("# only a comment\n").unwrap(), vec![]);
    }
}
