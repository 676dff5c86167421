//! Character stream reader.
use std::str::Chars;

/// Sentinel returned once the source text is exhausted. The scanner
/// treats it as a terminator, so a stray NUL inside the source ends
/// the stream early.
pub const EOF_CHAR: char = '\0';

/// Reader that hands the scanner one significant character at a time.
///
/// Characters are folded to uppercase on the way out, so the rest of
/// the pipeline only ever sees one spelling per lexeme. A single
/// character of pushback is supported, which is all the scanner's
/// one-token lookahead needs.
pub struct Cursor<'a> {
    chars: Chars<'a>,
    /// One character of pushback. Drained before the underlying
    /// iterator is touched again.
    pushback: Option<char>,
    line: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars(),
            pushback: None,
            line: 1,
        }
    }

    /// Current line number, 1-based.
    ///
    /// A newline counts as soon as it is read, and is given back if
    /// it is pushed back.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Read the next character, folded to uppercase, or [`EOF_CHAR`]
    /// once the stream is exhausted.
    #[allow(clippy::should_implement_trait)] // end-of-stream is in-band, not `None`
    pub fn next(&mut self) -> char {
        let c = match self.pushback.take() {
            Some(c) => c,
            None => self.chars.next().unwrap_or(EOF_CHAR),
        };
        if c == '\n' {
            self.line += 1;
        }
        c.to_ascii_uppercase()
    }

    /// Give back the last character read. Depth is exactly one.
    pub fn pushback(&mut self, c: char) {
        debug_assert!(self.pushback.is_none(), "pushback slot already occupied");
        if c == '\n' {
            self.line -= 1;
        }
        self.pushback = Some(c);
    }

    /// One character of lookahead: a read immediately undone.
    pub fn peek(&mut self) -> char {
        let c = self.next();
        self.pushback(c);
        c
    }

    /// Skip whitespace and `{ ... }` comment spans, returning the
    /// first significant character or [`EOF_CHAR`].
    ///
    /// Comments do not nest; the first `}` closes the span. A comment
    /// still open at end of stream simply ends the stream.
    pub fn skip_to_significant(&mut self) -> char {
        loop {
            let c = self.next();
            if c == EOF_CHAR {
                return EOF_CHAR;
            } else if c == '{' {
                let mut inner = self.next();
                while inner != EOF_CHAR && inner != '}' {
                    inner = self.next();
                }
            } else if !c.is_whitespace() {
                return c;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_case_fold() {
        let mut cursor = Cursor::new("aB9z");
        assert_eq!(cursor.next(), 'A');
        assert_eq!(cursor.next(), 'B');
        assert_eq!(cursor.next(), '9');
        assert_eq!(cursor.next(), 'Z');
        assert_eq!(cursor.next(), EOF_CHAR);
        // The sentinel is sticky.
        assert_eq!(cursor.next(), EOF_CHAR);
    }

    #[test]
    fn test_pushback_roundtrip() {
        let mut cursor = Cursor::new("xy");
        let c = cursor.next();
        assert_eq!(c, 'X');
        cursor.pushback(c);
        assert_eq!(cursor.next(), 'X');
        assert_eq!(cursor.next(), 'Y');
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut cursor = Cursor::new("ab");
        assert_eq!(cursor.peek(), 'A');
        assert_eq!(cursor.next(), 'A');
        assert_eq!(cursor.peek(), 'B');
        assert_eq!(cursor.next(), 'B');
        assert_eq!(cursor.peek(), EOF_CHAR);
    }

    #[test]
    fn test_line_count() {
        let mut cursor = Cursor::new("a\nb\nc");
        assert_eq!(cursor.line(), 1);
        cursor.next(); // a
        cursor.next(); // newline
        assert_eq!(cursor.line(), 2);
        cursor.next(); // b

        // Pushing a newline back gives the line back too.
        assert_eq!(cursor.next(), '\n');
        assert_eq!(cursor.line(), 3);
        cursor.pushback('\n');
        assert_eq!(cursor.line(), 2);
        assert_eq!(cursor.next(), '\n');
        assert_eq!(cursor.line(), 3);
    }

    #[test]
    fn test_skip_whitespace_and_comments() {
        let mut cursor = Cursor::new("   { elided \n comment } \t x");
        assert_eq!(cursor.skip_to_significant(), 'X');
        // The comment's newline still counted.
        assert_eq!(cursor.line(), 2);
    }

    #[test]
    fn test_comment_does_not_nest() {
        let mut cursor = Cursor::new("{ outer { inner } y");
        // First `}` closes the span, so `y` is significant.
        assert_eq!(cursor.skip_to_significant(), 'Y');
    }

    #[test]
    fn test_unterminated_comment_ends_stream() {
        let mut cursor = Cursor::new("x { runs off the end");
        assert_eq!(cursor.skip_to_significant(), 'X');
        assert_eq!(cursor.skip_to_significant(), EOF_CHAR);
    }
}
