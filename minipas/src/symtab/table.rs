//! The symbol table proper.
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

use crate::{
    error::{MiniPasError, MiniPasResult},
    scan::{TokenClass, KEYWORDS, OPERATORS},
};

use super::types::{
    AttrEntry, AttrIndex, DataType, NameEntry, NameIndex, ProcFrame, SemanticType, TableLimits,
    Value,
};

/// Scope-aware symbol table shared by the whole compiler.
///
/// Lexemes are interned once into an append-only string table. Each
/// distinct spelling owns one name table entry, which points at the
/// attribute entry currently visible under that name. Opening a scope
/// for a name swings the pointer to a fresh attribute entry; closing
/// the scope swings it back. Attribute entries are never reclaimed,
/// so handles held by earlier passes stay valid for the table's whole
/// lifetime.
#[derive(Debug)]
pub struct SymbolTable {
    /// Interned lexeme text, back to back. Append-only, so name
    /// entry offsets stay valid.
    strings: String,
    names: Vec<NameEntry>,
    /// Head of the name chain per hash bucket. Fixed size; chains
    /// absorb collisions.
    buckets: Vec<Option<NameIndex>>,
    attrs: Vec<AttrEntry>,
    /// Procedure scope stack. The bottom frame is the global
    /// sentinel and is never popped.
    frames: Vec<ProcFrame>,
    limits: TableLimits,
}

impl SymbolTable {
    /// Construct a table with default limits, pre-seeded with the
    /// language's keywords, operators and the `_FLOAT` builtin.
    pub fn new() -> MiniPasResult<Self> {
        Self::with_limits(TableLimits::default())
    }

    pub fn with_limits(limits: TableLimits) -> MiniPasResult<Self> {
        // Every interned name hashes into a bucket; seeding starts
        // immediately, so the check cannot wait for the first install.
        if limits.buckets == 0 {
            return Err(MiniPasError::Capacity {
                table: "bucket",
                limit: limits.buckets,
            });
        }

        let mut table = Self {
            strings: String::new(),
            names: Vec::new(),
            buckets: vec![None; limits.buckets],
            attrs: Vec::new(),
            frames: vec![ProcFrame::global()],
            limits,
        };
        table.seed()?;
        Ok(table)
    }

    /// Install the reserved words so the scanner can classify them by
    /// plain lookup, then the integer-to-real conversion builtin.
    fn seed(&mut self) -> MiniPasResult<()> {
        for &(spelling, class) in KEYWORDS {
            let (idx, _) = self.install_name(spelling)?;
            self.set_attrib(idx, SemanticType::Keyword, class);
        }
        for &(spelling, class) in OPERATORS {
            let (idx, _) = self.install_name(spelling)?;
            self.set_attrib(idx, SemanticType::Operator, class);
        }
        let (idx, _) = self.install_name("_FLOAT")?;
        self.set_attrib(idx, SemanticType::Function, TokenClass::Float);
        self.set_data_type(idx, SemanticType::Function, DataType::Real);
        Ok(())
    }

    /// Intern a spelling and hand out its visible binding.
    ///
    /// Returns the attribute index and whether the name was already
    /// bound. A known spelling whose binding was unlinked by a scope
    /// close gets a fresh attribute entry and reports `false`, the
    /// same as a never-seen spelling.
    pub fn install_name(&mut self, name: &str) -> MiniPasResult<(AttrIndex, bool)> {
        let folded = name.to_ascii_uppercase();

        if let Some(name_idx) = self.find_name(&folded) {
            return match self.names[name_idx.as_usize()].attr {
                Some(attr) => Ok((attr, true)),
                None => Ok((self.install_attrib(name_idx)?, false)),
            };
        }

        if self.names.len() >= self.limits.names {
            return Err(MiniPasError::Capacity {
                table: "name",
                limit: self.limits.names,
            });
        }
        if self.strings.len() + folded.len() > self.limits.strings {
            return Err(MiniPasError::Capacity {
                table: "string",
                limit: self.limits.strings,
            });
        }

        let name_idx = NameIndex(self.names.len() as u32);
        let start = self.strings.len();
        self.strings.push_str(&folded);

        // Prepend to the bucket chain, so the newest name is found
        // first.
        let code = self.bucket(&folded);
        self.names.push(NameEntry {
            start,
            len: folded.len(),
            attr: None,
            next: self.buckets[code],
        });
        self.buckets[code] = Some(name_idx);

        Ok((self.install_attrib(name_idx)?, false))
    }

    /// Read-only lookup: the visible binding for a spelling, if any.
    ///
    /// Never creates entries. The scanner uses this to reject
    /// operator lexemes that were not seeded.
    pub fn is_present(&self, name: &str) -> Option<AttrIndex> {
        let folded = name.to_ascii_uppercase();
        self.find_name(&folded)
            .and_then(|idx| self.names[idx.as_usize()].attr)
    }

    /// Assign semantic type and token class.
    ///
    /// Keywords and operators carry no data type; everything else
    /// starts out unresolved. An identifier classified while a
    /// procedure scope is open is chained to that scope and stamped
    /// with its owning procedure.
    pub fn set_attrib(&mut self, idx: AttrIndex, semantic: SemanticType, class: TokenClass) {
        let entry = &mut self.attrs[idx.as_usize()];
        entry.semantic = semantic;
        entry.token_class = class;
        entry.data_type = match semantic {
            SemanticType::Keyword | SemanticType::Operator => DataType::None,
            _ => DataType::Unknown,
        };

        if class == TokenClass::Identifier {
            self.link_into_scope(idx);
        }
    }

    /// Install resolved type information, e.g. once a declaration's
    /// `INTEGER` or `REAL` clause has been seen.
    pub fn set_data_type(&mut self, idx: AttrIndex, semantic: SemanticType, data_type: DataType) {
        let entry = &mut self.attrs[idx.as_usize()];
        entry.semantic = semantic;
        entry.data_type = data_type;
    }

    pub fn set_integer_value(&mut self, idx: AttrIndex, value: i64) {
        self.attrs[idx.as_usize()].value = Value::Integer(value);
    }

    pub fn set_real_value(&mut self, idx: AttrIndex, value: f64) {
        self.attrs[idx.as_usize()].value = Value::Real(value);
    }

    /// Shadow an existing binding with a fresh one for the scope
    /// being declared. The new entry remembers what it shadowed so
    /// [`SymbolTable::close_scope`] can restore it.
    pub fn open_scope(&mut self, idx: AttrIndex) -> MiniPasResult<AttrIndex> {
        let name_idx = self.attrs[idx.as_usize()].name;
        let shadow = self.install_attrib(name_idx)?;
        self.set_attrib(shadow, SemanticType::Unknown, TokenClass::Identifier);
        self.attrs[shadow.as_usize()].outer_scope = Some(idx);
        Ok(shadow)
    }

    /// Push a scope frame for a procedure. Identifiers classified
    /// while the frame is open are chained to it and unwound together
    /// by [`SymbolTable::close_scope`].
    pub fn open_proc(&mut self, proc_idx: AttrIndex) {
        self.frames.push(ProcFrame::new(proc_idx));
    }

    /// Close the innermost procedure scope.
    ///
    /// Every identifier chained to the frame has its name's visible
    /// binding rewound to the entry it shadowed, or unbound if it
    /// shadowed nothing. The entries themselves stay allocated;
    /// visibility is what unwinds, not storage.
    pub fn close_scope(&mut self) {
        let frame = match self.frames.pop() {
            Some(frame) if frame.proc.is_some() => frame,
            Some(sentinel) => {
                // The global sentinel stays put.
                self.frames.push(sentinel);
                return;
            }
            None => return,
        };

        let mut cursor = frame.first;
        while let Some(idx) = cursor {
            let (name, outer, next) = {
                let entry = &self.attrs[idx.as_usize()];
                (entry.name, entry.outer_scope, entry.scope_next)
            };
            self.names[name.as_usize()].attr = outer;
            cursor = next;
        }
    }

    // ------------------------------------------------------------------------
    // Accessors

    /// Interned spelling of the entry's name.
    pub fn lexeme(&self, idx: AttrIndex) -> &str {
        self.name_text(self.attrs[idx.as_usize()].name)
    }

    pub fn token_class(&self, idx: AttrIndex) -> TokenClass {
        self.attrs[idx.as_usize()].token_class
    }

    pub fn semantic_type(&self, idx: AttrIndex) -> SemanticType {
        self.attrs[idx.as_usize()].semantic
    }

    pub fn data_type(&self, idx: AttrIndex) -> DataType {
        self.attrs[idx.as_usize()].data_type
    }

    /// True once the entry has resolved to a usable operand type.
    pub fn is_valid_type(&self, idx: AttrIndex) -> bool {
        matches!(self.data_type(idx), DataType::Integer | DataType::Real)
    }

    pub fn integer_value(&self, idx: AttrIndex) -> Option<i64> {
        match self.attrs[idx.as_usize()].value {
            Value::Integer(v) => Some(v),
            Value::Real(_) => None,
        }
    }

    pub fn real_value(&self, idx: AttrIndex) -> Option<f64> {
        match self.attrs[idx.as_usize()].value {
            Value::Real(v) => Some(v),
            Value::Integer(_) => None,
        }
    }

    /// Procedure whose scope declared this symbol, if any.
    pub fn owning_proc(&self, idx: AttrIndex) -> Option<AttrIndex> {
        self.attrs[idx.as_usize()].owning_proc
    }

    pub fn set_proc(&mut self, idx: AttrIndex, proc_idx: AttrIndex) {
        self.attrs[idx.as_usize()].owning_proc = Some(proc_idx);
    }

    /// Number of attribute entries, the seeded ones included.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    // ------------------------------------------------------------------------
    // Internals

    /// Create a fresh attribute entry and make it the name's visible
    /// binding.
    fn install_attrib(&mut self, name_idx: NameIndex) -> MiniPasResult<AttrIndex> {
        if self.attrs.len() >= self.limits.attrs {
            return Err(MiniPasError::Capacity {
                table: "attribute",
                limit: self.limits.attrs,
            });
        }
        let attr = AttrIndex(self.attrs.len() as u32);
        self.attrs.push(AttrEntry {
            semantic: SemanticType::Unknown,
            token_class: TokenClass::Unknown,
            data_type: DataType::Unknown,
            owning_proc: None,
            name: name_idx,
            outer_scope: None,
            scope_next: None,
            value: Value::default(),
            label: None,
        });
        self.names[name_idx.as_usize()].attr = Some(attr);
        Ok(attr)
    }

    /// Append an identifier to the open procedure frame's symbol
    /// chain. Globals are not chained; the sentinel frame keeps no
    /// chain.
    fn link_into_scope(&mut self, idx: AttrIndex) {
        let top = self.frames.len() - 1;
        let proc = match self.frames[top].proc {
            Some(proc) => proc,
            None => return,
        };

        self.attrs[idx.as_usize()].owning_proc = Some(proc);
        match self.frames[top].last {
            None => {
                self.frames[top].first = Some(idx);
                self.frames[top].last = Some(idx);
            }
            Some(last) => {
                self.attrs[last.as_usize()].scope_next = Some(idx);
                self.frames[top].last = Some(idx);
            }
        }
    }

    /// Walk the bucket chain for an exact spelling match.
    fn find_name(&self, folded: &str) -> Option<NameIndex> {
        let mut cursor = self.buckets[self.bucket(folded)];
        while let Some(idx) = cursor {
            if self.name_text(idx) == folded {
                return Some(idx);
            }
            cursor = self.names[idx.as_usize()].next;
        }
        None
    }

    /// Bucket for a case-folded spelling. Chains preserve insertion
    /// order whatever the hash function, so a standard whole-string
    /// hash serves.
    fn bucket(&self, folded: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        hasher.write(folded.as_bytes());
        (hasher.finish() % self.buckets.len() as u64) as usize
    }

    pub(super) fn name_text(&self, idx: NameIndex) -> &str {
        let NameEntry { start, len, .. } = self.names[idx.as_usize()];
        &self.strings[start..start + len]
    }

    pub(super) fn entry(&self, idx: AttrIndex) -> &AttrEntry {
        &self.attrs[idx.as_usize()]
    }

    pub(super) fn entry_mut(&mut self, idx: AttrIndex) -> &mut AttrEntry {
        &mut self.attrs[idx.as_usize()]
    }

    pub(super) fn entries(&self) -> impl Iterator<Item = (AttrIndex, &AttrEntry)> {
        self.attrs
            .iter()
            .enumerate()
            .map(|(i, entry)| (AttrIndex(i as u32), entry))
    }

    pub(super) fn bucket_heads(&self) -> &[Option<NameIndex>] {
        &self.buckets
    }

    /// Name entries along one bucket chain, newest first.
    pub(super) fn chain(&self, head: Option<NameIndex>) -> impl Iterator<Item = NameIndex> + '_ {
        std::iter::successors(head, move |idx| self.names[idx.as_usize()].next)
    }
}
