//! Scope-aware symbol table: lexeme interning, attribute entries,
//! procedure scopes and code generator labels.
mod dump;
mod label;
mod table;
mod types;

pub use self::{
    table::SymbolTable,
    types::{AttrIndex, DataType, NameIndex, SemanticType, TableLimits, Value},
};
