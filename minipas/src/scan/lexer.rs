//! Lexical analysis
use crate::{
    error::{MiniPasError, MiniPasResult},
    symtab::{AttrIndex, DataType, SemanticType, SymbolTable},
};

use super::{
    cursor::{Cursor, EOF_CHAR},
    tokens::{Token, TokenClass},
};

/// Scanner for one compilation unit.
///
/// Holds the exclusive borrow of the symbol table for as long as the
/// unit is being scanned. Words and number literals are installed
/// into the table the moment they are first read, so by the time the
/// EOF token comes out every lexeme of the unit is interned.
pub struct Scanner<'a> {
    /// Character reader
    cursor: Cursor<'a>,
    symbols: &'a mut SymbolTable,
    /// One pre-fetched significant character.
    lookahead: char,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, symbols: &'a mut SymbolTable) -> Self {
        let mut cursor = Cursor::new(source);

        // Prime the lookahead so the first next_token call starts on
        // the character that begins the first token.
        let lookahead = cursor.skip_to_significant();

        Self {
            cursor,
            symbols,
            lookahead,
        }
    }

    /// Read-only view of the symbol table, for resolving lexemes
    /// while the scanner still holds the mutable borrow.
    pub fn symbols(&self) -> &SymbolTable {
        self.symbols
    }

    /// Current line number, 1-based.
    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    /// Scan and classify the next token.
    ///
    /// ## Implementation
    ///
    /// Each call starts with `lookahead` holding the significant
    /// character that begins the token, and must finish by leaving
    /// the next token's first significant character there. Once the
    /// source is exhausted the lookahead pins to [`EOF_CHAR`] and
    /// every further call returns the EOF token.
    ///
    /// Operator spellings must already be seeded in the symbol
    /// table; an unknown one is a lexical error carrying the line it
    /// appeared on. The error leaves the scanner in a usable state,
    /// pointing past the rejected character.
    pub fn next_token(&mut self) -> MiniPasResult<Token> {
        let first = self.lookahead;
        let line = self.cursor.line();

        if first == EOF_CHAR {
            return Ok(Token {
                class: TokenClass::Eof,
                attr: None,
                line,
            });
        }

        let (class, attr) = if is_letter(first) {
            self.scan_word(first)?
        } else if is_digit(first) {
            self.scan_number(first)?
        } else {
            self.scan_operator(first)?
        };

        Ok(Token {
            class,
            attr: Some(attr),
            line,
        })
    }
}

/// Specialised scans.
impl<'a> Scanner<'a> {
    /// Scan a word: a keyword or an identifier.
    ///
    /// The symbol table decides which. A spelling already present
    /// keeps its installed token class, which is how the seeded
    /// keywords are recognized; a fresh spelling is installed as an
    /// identifier.
    fn scan_word(&mut self, first: char) -> MiniPasResult<(TokenClass, AttrIndex)> {
        debug_assert!(is_letter(first));

        let mut lexeme = String::from(first);
        let mut c = self.cursor.next();
        while is_letter_or_digit(c) {
            lexeme.push(c);
            c = self.cursor.next();
        }
        // Give back the character that ended the word, then find the
        // start of the next token.
        self.cursor.pushback(c);
        self.lookahead = self.cursor.skip_to_significant();

        let (attr, existed) = self.symbols.install_name(&lexeme)?;
        if existed {
            Ok((self.symbols.token_class(attr), attr))
        } else {
            self.symbols
                .set_attrib(attr, SemanticType::Unknown, TokenClass::Identifier);
            Ok((TokenClass::Identifier, attr))
        }
    }

    /// Scan a number literal.
    ///
    /// A bare digit run is an integer. A `.` or `E` suffix switches
    /// to a real: the fraction or exponent digits are pulled in, an
    /// exponent's `-` sign is kept and an explicit `+` is dropped, so
    /// `1E+5` and `1E5` intern to the same spelling.
    fn scan_number(&mut self, first: char) -> MiniPasResult<(TokenClass, AttrIndex)> {
        debug_assert!(is_digit(first));

        let mut lexeme = String::from(first);
        let mut is_real = false;

        let mut c = self.cursor.next();
        while is_digit(c) {
            lexeme.push(c);
            c = self.cursor.next();
        }

        if c == '.' || c == 'E' {
            is_real = true;
            lexeme.push(c);
            if c == 'E' {
                c = self.cursor.next();
                if c == '-' {
                    lexeme.push(c);
                } else if c != '+' {
                    // No sign at all; the character belongs to the
                    // digit run below.
                    self.cursor.pushback(c);
                }
            }
            c = self.cursor.next();
            while is_digit(c) {
                lexeme.push(c);
                c = self.cursor.next();
            }
        }

        self.cursor.pushback(c);
        self.lookahead = self.cursor.skip_to_significant();

        let (attr, existed) = self.symbols.install_name(&lexeme)?;
        if existed {
            return Ok((self.symbols.token_class(attr), attr));
        }

        self.symbols
            .set_attrib(attr, SemanticType::Unknown, TokenClass::Constant);
        if is_real {
            // A malformed tail like `1E` parses to zero, matching the
            // table's fresh-value default.
            let value = lexeme.parse::<f64>().unwrap_or(0.0);
            self.symbols
                .set_data_type(attr, SemanticType::Literal, DataType::Real);
            self.symbols.set_real_value(attr, value);
        } else {
            // A digit run past the i64 range parses to zero as well.
            let value = lexeme.parse::<i64>().unwrap_or(0);
            self.symbols
                .set_data_type(attr, SemanticType::Literal, DataType::Integer);
            self.symbols.set_integer_value(attr, value);
        }
        Ok((TokenClass::Constant, attr))
    }

    /// Classify a single character operator by table lookup.
    ///
    /// Nothing is ever installed on this path.
    fn scan_operator(&mut self, first: char) -> MiniPasResult<(TokenClass, AttrIndex)> {
        let lexeme = String::from(first);
        let line = self.cursor.line();

        // The cursor moves on even when the spelling is rejected.
        self.lookahead = self.cursor.skip_to_significant();

        match self.symbols.is_present(&lexeme) {
            Some(attr) => Ok((self.symbols.token_class(attr), attr)),
            None => Err(MiniPasError::Lexical { lexeme, line }),
        }
    }
}

fn is_letter(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z')
}

#[allow(clippy::manual_is_ascii_check)] // consistency with other functions
fn is_digit(c: char) -> bool {
    matches!(c, '0'..='9')
}

fn is_letter_or_digit(c: char) -> bool {
    is_letter(c) || is_digit(c)
}

impl<'a> IntoIterator for Scanner<'a> {
    type Item = MiniPasResult<Token>;
    type IntoIter = ScannerIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        ScannerIter {
            scanner: self,
            done: false,
        }
    }
}

/// Convenience iterator that wraps the scanner.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ScannerIter<'a> {
    // Track end so the EOF token is emitted once. A scan error also
    // ends the stream.
    done: bool,
    scanner: Scanner<'a>,
}

impl<'a> Iterator for ScannerIter<'a> {
    type Item = MiniPasResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.scanner.next_token();
        match &result {
            Ok(token) if token.is_eof() => self.done = true,
            Err(_) => self.done = true,
            Ok(_) => {}
        }
        Some(result)
    }
}
