//! Buffered stream of tokens for look ahead.
use std::{error, fmt};

use itertools::{multipeek, MultiPeek};

use crate::error::{MiniPasError, MiniPasResult};

use super::{
    lexer::{Scanner, ScannerIter},
    tokens::{Token, TokenClass},
};

/// Buffered stream of tokens that allows arbitrary look ahead.
///
/// Tokens are lazily scanned. Peeking or consuming the next token
/// triggers the internal scanner.
///
/// The peek semantics are determined by the internal `MultiPeek`.
/// Calling `TokenStream::peek` is not idempotent, advancing a peek
/// cursor forward by one token for each `peek()` call. The cursor
/// can be reset explicitly using `TokenStream::reset_peek` or
/// implicitly by calling one of the consuming methods.
pub struct TokenStream<'a> {
    tokens: MultiPeek<ScannerIter<'a>>,
}

impl<'a> TokenStream<'a> {
    #[inline]
    pub fn new(scanner: Scanner<'a>) -> Self {
        Self {
            tokens: multipeek(scanner),
        }
    }

    /// Consumes the current token regardless of class.
    ///
    /// Returns `None` once the EOF token has been taken.
    #[inline]
    pub fn next_token(&mut self) -> Option<MiniPasResult<Token>> {
        self.tokens.next()
    }

    /// Consumes the current token if it matches the given class.
    ///
    /// Returns true when matched. Returns false when the classes do
    /// not match, or the token stream is at the end.
    ///
    /// Does not consume the token if the classes do not match.
    pub fn match_class(&mut self, class: TokenClass) -> bool {
        // Ensure clean peek state.
        self.tokens.reset_peek();

        match self.tokens.peek() {
            Some(Ok(token)) => {
                let is_match = token.class == class;
                if is_match {
                    self.tokens.next();
                }
                self.tokens.reset_peek();
                is_match
            }
            _ => {
                self.tokens.reset_peek();
                false
            }
        }
    }

    /// Return the current token and advance the cursor.
    ///
    /// The consumed token must match the given class, otherwise a
    /// mismatch error is returned and the token stays put.
    pub fn consume(&mut self, class: TokenClass) -> Result<Token, TokenError> {
        // Ensure clean peek state.
        self.tokens.reset_peek();

        if let Some(Ok(token)) = self.tokens.peek() {
            if token.class != class {
                let encountered = token.class;
                self.tokens.reset_peek();
                return Err(TokenError::Mismatch {
                    expected: class,
                    encountered,
                });
            }
        }

        // Either a match or a scan error; take ownership either way.
        match self.tokens.next() {
            Some(Ok(token)) => Ok(token),
            Some(Err(err)) => Err(TokenError::Scan(err)),
            None => Err(TokenError::EndOfSource),
        }
    }

    /// Return the current token without advancing the cursor.
    ///
    /// Each call peeks one token further; scan errors surface on the
    /// consuming methods.
    #[inline]
    pub fn peek(&mut self) -> Option<&MiniPasResult<Token>> {
        self.tokens.peek()
    }

    /// Set peek cursor back to the current cursor.
    pub fn reset_peek(&mut self) {
        self.tokens.reset_peek()
    }
}

/// Error returned when an unexpected token class is encountered.
#[derive(Debug)]
pub enum TokenError {
    Mismatch {
        expected: TokenClass,
        encountered: TokenClass,
    },
    EndOfSource,
    Scan(MiniPasError),
}

impl error::Error for TokenError {}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use TokenError as E;
        match self {
            E::Mismatch {
                expected,
                encountered,
            } => write!(
                f,
                "encountered unexpected token '{}', expected '{}'",
                encountered, expected
            ),
            E::EndOfSource => write!(f, "unexpected end of source code"),
            E::Scan(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl From<MiniPasError> for TokenError {
    fn from(err: MiniPasError) -> Self {
        TokenError::Scan(err)
    }
}
