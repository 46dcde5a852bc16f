//! Tokenizing Timble assembly.
//!
//! Timble's lexical grammar is deliberately flat: the only token with any
//! structure of its own is the comma, which separates instruction operands.
//! Everything else is an opaque run of characters ([`Token::Word`]) whose
//! interpretation is left entirely to the parser.
//!
//! Whitespace is skipped. A `#` at the start of a token begins a comment
//! that runs to the end of the line; a `#` in the middle of a word stays
//! part of the word.

use logos::Logos;

/// A unit of Timble source code.
#[derive(Debug, Logos, PartialEq, Eq, Clone)]
#[logos(skip r"[ \t\r\n]+", error = LexErr)]
pub enum Token {
    /// Any run of non-whitespace, non-comma characters.
    ///
    /// This covers mnemonics (`add`), registers (`$3`), numbers (`-17`),
    /// directives (`.dw`), label declarations (`loop:`), label references
    /// (`loop`), and memory operands (`-4($3)`). No interpretation happens
    /// here; the parser decides what each word means from its position.
    #[regex(r"[^,\s#][^,\s]*", |lx| lx.slice().to_string())]
    Word(String),

    /// A comma, which separates operands of an instruction.
    #[token(",")]
    Comma,

    /// A comment, which starts with `#` and spans the remaining part of the line.
    #[regex(r"#[^\n]*")]
    Comment,
}

impl Token {
    pub(crate) fn is_comment(&self) -> bool {
        matches!(self, Token::Comment)
    }
}
impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Word(w) => f.write_str(w),
            Token::Comma   => f.write_str(","),
            Token::Comment => f.write_str("#"),
        }
    }
}

/// Any errors raised in attempting to tokenize an input stream.
///
/// Every character of the input is covered by some token or skip pattern,
/// so this error signals a broken scan invariant rather than bad input.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum LexErr {
    /// The scanner stopped without producing a token.
    #[default]
    EmptyToken,
}
impl std::fmt::Display for LexErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexErr::EmptyToken => f.write_str("internal error: empty token"),
        }
    }
}
impl std::error::Error for LexErr {}
impl crate::err::Error for LexErr {}

#[cfg(test)]
mod tests {
    use logos::Logos;

    use super::Token;

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }
    fn lex(src: &str) -> Vec<Token> {
        Token::lexer(src).collect::<Result<_, _>>().unwrap()
    }

    #[test]
    fn test_words_and_commas() {
        assert_eq!(
            lex("add $1, $2, $3"),
            vec![word("add"), word("$1"), Token::Comma, word("$2"), Token::Comma, word("$3")],
        );

        // commas split words even without surrounding whitespace
        assert_eq!(
            lex("beq $4,$5,next"),
            vec![word("beq"), word("$4"), Token::Comma, word("$5"), Token::Comma, word("next")],
        );

        // leading, trailing, and doubled commas are all emitted as-is
        assert_eq!(
            lex(",a,,b,"),
            vec![Token::Comma, word("a"), Token::Comma, Token::Comma, word("b"), Token::Comma],
        );
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(lex(""), vec![]);
        assert_eq!(lex(" \t\r\n"), vec![]);
        assert_eq!(
            lex("  j\t\tstart \r\n  done:\n"),
            vec![word("j"), word("start"), word("done:")],
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            lex("add $1, $2, $3 # increment\nj loop"),
            vec![
                word("add"), word("$1"), Token::Comma, word("$2"), Token::Comma, word("$3"),
                Token::Comment,
                word("j"), word("loop"),
            ],
        );

        // comment at EOF without a trailing newline
        assert_eq!(lex("# just a comment"), vec![Token::Comment]);
        assert_eq!(lex("j loop #"), vec![word("j"), word("loop"), Token::Comment]);
    }

    #[test]
    fn test_hash_inside_word() {
        // only a token-initial # starts a comment
        assert_eq!(lex("ab#cd"), vec![word("ab#cd")]);
        assert_eq!(lex("ab #cd"), vec![word("ab"), Token::Comment]);
    }

    #[test]
    fn test_offset_access_is_one_word() {
        assert_eq!(
            lex("lb $1, -4($3)"),
            vec![word("lb"), word("$1"), Token::Comma, word("-4($3)")],
        );
    }
}
