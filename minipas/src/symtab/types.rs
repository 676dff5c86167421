//! Symbol table records and handles.

use std::fmt;

use smol_str::SmolStr;

use crate::scan::TokenClass;

/// Index of a name table entry, one per distinct spelling.
///
/// Deliberately a different type from [`AttrIndex`] so the two index
/// spaces cannot be mixed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameIndex(pub(crate) u32);

impl NameIndex {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Index of an attribute table entry, one per scope-visible binding.
///
/// This is the handle the scanner returns with each token and the one
/// later compiler passes use to read and write attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttrIndex(pub(crate) u32);

impl AttrIndex {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AttrIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Delegate so width and alignment flags apply.
        fmt::Display::fmt(&self.0, f)
    }
}

/// Role a binding plays in the program.
///
/// The scanner only ever assigns `Keyword`, `Operator`, `Literal` and
/// `Unknown`; the rest are stamped on by later passes once the
/// declaration context is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[rustfmt::skip]
pub enum SemanticType {
    Unknown,
    Keyword,
    Program,
    Parameter,
    Variable,
    /// Compiler generated temporary.
    TempVar,
    Procedure,
    Function,
    /// Jump target for loop code.
    Label,
    Literal,
    Operator,
}

impl SemanticType {
    #[rustfmt::skip]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown   => "unknown",
            Self::Keyword   => "keyword",
            Self::Program   => "program",
            Self::Parameter => "param",
            Self::Variable  => "var",
            Self::TempVar   => "tempvar",
            Self::Procedure => "proc",
            Self::Function  => "func",
            Self::Label     => "label",
            Self::Literal   => "literal",
            Self::Operator  => "operator",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Data types the language subset distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DataType {
    /// Not resolved yet.
    Unknown,
    /// Keywords and operators never carry a data type.
    None,
    Integer,
    Real,
}

impl DataType {
    #[rustfmt::skip]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::None    => "none",
            Self::Integer => "integer",
            Self::Real    => "real",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Literal value attached to a constant entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
}

impl Default for Value {
    fn default() -> Self {
        Value::Integer(0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{:1.4E}", v),
        }
    }
}

/// Capacity limits for the symbol tables.
///
/// The tables grow on demand but refuse to grow past these limits, so
/// a runaway input fails with a capacity error instead of exhausting
/// memory.
#[derive(Debug, Clone, Copy)]
pub struct TableLimits {
    /// Total interned characters.
    pub strings: usize,
    /// Distinct spellings.
    pub names: usize,
    /// Hash buckets. Fixed at construction, never rehashed.
    pub buckets: usize,
    /// Attribute entries.
    pub attrs: usize,
}

impl Default for TableLimits {
    fn default() -> Self {
        Self {
            strings: 1200,
            names: 200,
            buckets: 100,
            attrs: 200,
        }
    }
}

/// One distinct spelling: where its text lives in the string table,
/// which attribute entry is currently visible under the name, and the
/// next name in the same hash bucket.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NameEntry {
    pub start: usize,
    pub len: usize,
    /// Visible binding. `None` when every binding of this name has
    /// gone out of scope.
    pub attr: Option<AttrIndex>,
    pub next: Option<NameIndex>,
}

/// One scope-visible binding of a name.
#[derive(Debug, Clone)]
pub(crate) struct AttrEntry {
    pub semantic: SemanticType,
    pub token_class: TokenClass,
    pub data_type: DataType,
    /// Procedure whose scope declared this symbol. `None` for
    /// globals and the seeded entries.
    pub owning_proc: Option<AttrIndex>,
    pub name: NameIndex,
    /// Binding this entry shadowed, restored on scope close.
    pub outer_scope: Option<AttrIndex>,
    /// Next symbol declared in the same procedure scope.
    pub scope_next: Option<AttrIndex>,
    pub value: Value,
    /// Code generator label, derived lazily and cached.
    pub label: Option<SmolStr>,
}

/// One procedure scope on the stack: the procedure's own attribute
/// entry and the chain of symbols declared while it was open.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProcFrame {
    /// `None` marks the global sentinel frame at the bottom.
    pub proc: Option<AttrIndex>,
    pub first: Option<AttrIndex>,
    pub last: Option<AttrIndex>,
}

impl ProcFrame {
    pub fn global() -> Self {
        Self {
            proc: None,
            first: None,
            last: None,
        }
    }

    pub fn new(proc: AttrIndex) -> Self {
        Self {
            proc: Some(proc),
            first: None,
            last: None,
        }
    }
}
