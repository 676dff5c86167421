//! Scanner
mod cursor;
mod lexer;
mod token_stream;
mod tokens;

use crate::{error::MiniPasResult, symtab::SymbolTable};

/// Scan a whole compilation unit, returning its tokens in order with
/// the terminating EOF token last.
pub fn scan(source: impl AsRef<str>, symbols: &mut SymbolTable) -> MiniPasResult<Vec<Token>> {
    let scanner = Scanner::new(source.as_ref(), symbols);
    scanner.into_iter().collect()
}

pub use self::{
    cursor::{Cursor, EOF_CHAR},
    lexer::{Scanner, ScannerIter},
    token_stream::{TokenError, TokenStream},
    tokens::{Token, TokenClass, KEYWORDS, OPERATORS},
};
