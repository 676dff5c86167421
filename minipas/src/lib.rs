mod error;
pub mod scan;
pub mod symtab;

pub use self::error::{MiniPasError, MiniPasResult};

/// Version string reported by the command line frontend.
pub const IMPL_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod prelude {
    pub use super::{
        error::{MiniPasError, MiniPasResult},
        scan::{scan, Scanner, Token, TokenClass, TokenStream},
        symtab::{AttrIndex, DataType, SemanticType, SymbolTable, TableLimits, Value},
    };
}
