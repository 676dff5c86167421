//! Tokens

use std::fmt;

use crate::symtab::AttrIndex;

/// One classified token.
///
/// The attribute index is the handle into the symbol table entry that
/// owns the lexeme; only the EOF token carries none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub class: TokenClass,
    pub attr: Option<AttrIndex>,
    /// Line the lexeme started on, 1-based.
    pub line: u32,
}

impl Token {
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.class == TokenClass::Eof
    }
}

/// Token classification.
///
/// Declaration order matters: [`TokenClass::is_keyword`] and
/// [`TokenClass::is_operator`] test block membership by discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[rustfmt::skip]
pub enum TokenClass {
    // ------------------------------------------------------------------------
    // Keywords
    Begin,
    Call,
    Declare,
    Do,
    Else,
    End,
    Endif,
    Enduntil,
    Endwhile,
    If,
    Integer,
    Parameters,
    Procedure,
    Program,
    Read,
    Real,
    Set,
    Then,
    Until,
    While,
    Write,

    // ------------------------------------------------------------------------
    // Operators
    Star,       // *
    Plus,       // +
    Minus,      // -
    Slash,      // /
    Equals,     // =
    Semicolon,  // ;
    Comma,      // ,
    Period,     // .
    Greater,    // >
    Less,       // <
    NotEqual,   // !
    OpenParen,  // (
    CloseParen, // )

    // ------------------------------------------------------------------------
    // Complex
    /// The `_FLOAT` conversion builtin.
    Float,
    Identifier,
    /// Integer or real literal.
    Constant,

    // ------------------------------------------------------------------------
    // Special
    /// End-of-file
    Eof,
    /// Classification of an attribute entry that has not been
    /// assigned one yet.
    Unknown,
}

impl TokenClass {
    #[inline]
    pub fn is_keyword(&self) -> bool {
        (*self as u8) <= (TokenClass::Write as u8)
    }

    #[inline]
    pub fn is_operator(&self) -> bool {
        (*self as u8) >= (TokenClass::Star as u8) && (*self as u8) <= (TokenClass::CloseParen as u8)
    }

    #[rustfmt::skip]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Begin      => "begin",
            Self::Call       => "call",
            Self::Declare    => "declare",
            Self::Do         => "do",
            Self::Else       => "else",
            Self::End        => "end",
            Self::Endif      => "endif",
            Self::Enduntil   => "enduntil",
            Self::Endwhile   => "endwhile",
            Self::If         => "if",
            Self::Integer    => "integer",
            Self::Parameters => "parameters",
            Self::Procedure  => "procedure",
            Self::Program    => "program",
            Self::Read       => "read",
            Self::Real       => "real",
            Self::Set        => "set",
            Self::Then       => "then",
            Self::Until      => "until",
            Self::While      => "while",
            Self::Write      => "write",
            // ----------------------------------------------------------------
            Self::Star       => "star",
            Self::Plus       => "plus",
            Self::Minus      => "minus",
            Self::Slash      => "slash",
            Self::Equals     => "equals",
            Self::Semicolon  => "semicolon",
            Self::Comma      => "comma",
            Self::Period     => "period",
            Self::Greater    => "greater",
            Self::Less       => "less",
            Self::NotEqual   => "notequal",
            Self::OpenParen  => "openparen",
            Self::CloseParen => "closeparen",
            // ----------------------------------------------------------------
            Self::Float      => "float",
            Self::Identifier => "identifier",
            Self::Constant   => "constant",
            Self::Eof        => "eof",
            Self::Unknown    => "unknown",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Keyword spellings, seeded into the symbol table at construction.
///
/// Sorted by spelling, matching the declaration order of the keyword
/// block in [`TokenClass`].
#[rustfmt::skip]
pub const KEYWORDS: &[(&str, TokenClass)] = &[
    ("BEGIN",      TokenClass::Begin),
    ("CALL",       TokenClass::Call),
    ("DECLARE",    TokenClass::Declare),
    ("DO",         TokenClass::Do),
    ("ELSE",       TokenClass::Else),
    ("END",        TokenClass::End),
    ("ENDIF",      TokenClass::Endif),
    ("ENDUNTIL",   TokenClass::Enduntil),
    ("ENDWHILE",   TokenClass::Endwhile),
    ("IF",         TokenClass::If),
    ("INTEGER",    TokenClass::Integer),
    ("PARAMETERS", TokenClass::Parameters),
    ("PROCEDURE",  TokenClass::Procedure),
    ("PROGRAM",    TokenClass::Program),
    ("READ",       TokenClass::Read),
    ("REAL",       TokenClass::Real),
    ("SET",        TokenClass::Set),
    ("THEN",       TokenClass::Then),
    ("UNTIL",      TokenClass::Until),
    ("WHILE",      TokenClass::While),
    ("WRITE",      TokenClass::Write),
];

/// Operator spellings, seeded into the symbol table at construction.
///
/// The scanner never installs operators; a single character lexeme
/// that is not in this table is a lexical error.
#[rustfmt::skip]
pub const OPERATORS: &[(&str, TokenClass)] = &[
    ("*", TokenClass::Star),
    ("+", TokenClass::Plus),
    ("-", TokenClass::Minus),
    ("/", TokenClass::Slash),
    ("=", TokenClass::Equals),
    (";", TokenClass::Semicolon),
    (",", TokenClass::Comma),
    (".", TokenClass::Period),
    (">", TokenClass::Greater),
    ("<", TokenClass::Less),
    ("!", TokenClass::NotEqual),
    ("(", TokenClass::OpenParen),
    (")", TokenClass::CloseParen),
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_keyword_block() {
        for (_, class) in KEYWORDS {
            assert!(class.is_keyword(), "{} not in keyword block", class);
            assert!(!class.is_operator());
        }
    }

    #[test]
    fn test_operator_block() {
        for (_, class) in OPERATORS {
            assert!(class.is_operator(), "{} not in operator block", class);
            assert!(!class.is_keyword());
        }
    }

    #[test]
    fn test_complex_classes_in_neither_block() {
        for class in [
            TokenClass::Float,
            TokenClass::Identifier,
            TokenClass::Constant,
            TokenClass::Eof,
            TokenClass::Unknown,
        ] {
            assert!(!class.is_keyword());
            assert!(!class.is_operator());
        }
    }

    #[test]
    fn test_display_pads() {
        assert_eq!(format!("{:<12}|", TokenClass::Begin), "begin       |");
    }
}
