//! Assembling parsed symbols into hexadecimal machine code.
//!
//! This module is used to convert symbol sequences (`Vec<`[`Symbol`]`>`)
//! into the newline-joined hex text that the pipeline outputs.
//!
//! The assembler module notably consists of:
//! - [`assemble`]: the main function, which resolves labels and encodes every symbol
//! - [`SymbolTable`]: a struct holding the label table built by the first assembler pass
//! - [`resolve_labels`]: the two-pass transform that strips labels and rewrites
//!   branch/jump targets into numeric program-counter values

pub mod encoding;

use std::borrow::Cow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::ast::{Op, PCTarget, Symbol};
use crate::err::AsmErr;

/// Assembles a symbol sequence into newline-joined hexadecimal machine words.
///
/// # Example
/// ```
/// use timble::parse::parse_symbols;
/// use timble::asm::assemble;
///
/// let symbols = parse_symbols("
///     start:
///         addi $1, $1, 1
///         j start
/// ").unwrap();
/// assert_eq!(assemble(symbols).unwrap(), "20210001\n08000000");
/// ```
pub fn assemble(symbols: Vec<Symbol>) -> Result<String, AsmErr> {
    let resolved = resolve_labels(symbols)?;

    let mut words = Vec::with_capacity(resolved.len());
    for symbol in &resolved {
        let bits = encoding::emit(symbol)?;
        words.push(encoding::to_hex(&bits)?);
    }
    Ok(words.join("\n"))
}

/// Errors that can occur while resolving labels.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ResolveErr {
    /// The same label was declared at more than one position (pass 1).
    DuplicateLabel(String),
    /// A branch or jump referenced a label that was never declared (pass 2).
    LabelNotFound(String),
}
impl std::fmt::Display for ResolveErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveErr::DuplicateLabel(name) => write!(f, "multiple declarations of label: {name}"),
            ResolveErr::LabelNotFound(name)  => write!(f, "label not found: {name}"),
        }
    }
}
impl std::error::Error for ResolveErr {}
impl crate::err::Error for ResolveErr {
    fn help(&self) -> Option<Cow<str>> {
        match self {
            ResolveErr::DuplicateLabel(_) => Some("labels must be unique within a program; try renaming one of them".into()),
            ResolveErr::LabelNotFound(_)  => Some("declare the label by writing its name with a trailing colon before an instruction".into()),
        }
    }
}

/// The label table created in the first assembler pass, mapping each label
/// name to the program-counter value of the instruction it marks.
///
/// Labels do not occupy an instruction slot themselves; a label's PC is the
/// index the *next* non-label symbol will have once labels are stripped.
/// Directives occupy one slot like operations do.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SymbolTable {
    label_map: HashMap<String, usize>,
}

impl SymbolTable {
    /// Builds the label table for a symbol sequence.
    ///
    /// This performs the first assembler pass, recording the program-counter
    /// value of every label and failing on a duplicate declaration.
    ///
    /// # Example
    /// ```
    /// use timble::parse::parse_symbols;
    /// use timble::asm::SymbolTable;
    ///
    /// let symbols = parse_symbols("
    ///     first:
    ///         add $0, $0, $0
    ///         .dw 9
    ///     last:
    ///         add $0, $0, $0
    /// ").unwrap();
    ///
    /// let sym = SymbolTable::new(&symbols).unwrap();
    /// assert_eq!(sym.lookup_label("first"), Some(0));
    /// assert_eq!(sym.lookup_label("last"), Some(2));
    /// assert_eq!(sym.lookup_label("missing"), None);
    /// ```
    pub fn new(symbols: &[Symbol]) -> Result<Self, AsmErr> {
        let mut label_map = HashMap::new();
        let mut pc = 0usize;

        for symbol in symbols {
            match symbol {
                Symbol::Label(label) => match label_map.entry(label.name.clone()) {
                    Entry::Occupied(_) => return Err(ResolveErr::DuplicateLabel(label.name.clone()).into()),
                    Entry::Vacant(e) => { e.insert(pc); },
                },
                _ => pc += 1,
            }
        }

        Ok(SymbolTable { label_map })
    }

    /// Gets the program-counter value of a given label (if it exists).
    pub fn lookup_label(&self, label: &str) -> Option<usize> {
        self.label_map.get(label).copied()
    }

    /// Gets an iterable of the mapping from labels to program-counter values.
    pub fn label_iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.label_map.iter()
            .map(|(label, &pc)| (&**label, pc))
    }

    fn resolve(&self, name: &str) -> Result<usize, AsmErr> {
        self.lookup_label(name)
            .ok_or_else(|| ResolveErr::LabelNotFound(name.to_string()).into())
    }
}

/// Resolves every label in a symbol sequence.
///
/// Pass 1 builds the [`SymbolTable`] and strips the label symbols out of the
/// stream. Pass 2 rewrites every remaining [`PCTarget::Label`]:
/// - a `beq` target becomes `label_pc - pc - 1`, a PC-relative offset
///   adjusted for the delay slot (so a branch to its own label is `-1`),
/// - a `j` target becomes the label's absolute instruction index.
///
/// Whether the offset fits its instruction field is *not* checked here;
/// that is deferred to encoding.
pub fn resolve_labels(symbols: Vec<Symbol>) -> Result<Vec<Symbol>, AsmErr> {
    let sym = SymbolTable::new(&symbols)?;

    let mut resolved: Vec<Symbol> = symbols.into_iter()
        .filter(|s| !matches!(s, Symbol::Label(_)))
        .collect();

    for (pc, symbol) in resolved.iter_mut().enumerate() {
        let Symbol::Op(op) = symbol else { continue };
        match op {
            Op::Beq(_, _, target) => {
                if let PCTarget::Label(label) = target {
                    let dest = sym.resolve(&label.name)?;
                    *target = PCTarget::Offset(dest as i64 - pc as i64 - 1);
                }
            },
            Op::J(target) => {
                if let PCTarget::Label(label) = target {
                    let dest = sym.resolve(&label.name)?;
                    *target = PCTarget::Offset(dest as i64);
                }
            },
            _ => {},
        }
    }

    Ok(resolved)
}
