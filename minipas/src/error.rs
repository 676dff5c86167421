//! Result and errors.
use std::fmt::{self, Display, Formatter};
use std::io;

pub type MiniPasResult<T> = std::result::Result<T, MiniPasError>;

#[derive(Debug)]
pub enum MiniPasError {
    /// Source file rejected before scanning begins.
    Config(String),
    /// Operator spelling that was never seeded into the symbol table.
    Lexical { lexeme: String, line: u32 },
    /// One of the symbol tables ran out of room.
    Capacity { table: &'static str, limit: usize },
    Io(io::Error),
    Fmt(fmt::Error),
}

impl Display for MiniPasError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Lexical { lexeme, line } => {
                write!(f, "'{}' is an illegal operator on line {}", lexeme, line)
            }
            Self::Capacity { table, limit } => {
                write!(f, "{} table overflow (limit {})", table, limit)
            }
            Self::Io(err) => write!(f, "{}", err),
            Self::Fmt(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for MiniPasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Fmt(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for MiniPasError {
    fn from(err: io::Error) -> Self {
        MiniPasError::Io(err)
    }
}

impl From<fmt::Error> for MiniPasError {
    fn from(err: fmt::Error) -> Self {
        MiniPasError::Fmt(err)
    }
}
