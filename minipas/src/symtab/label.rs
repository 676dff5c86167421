//! Code generator labels and stack offsets.
use smol_str::SmolStr;

use super::{
    table::SymbolTable,
    types::{AttrIndex, DataType, SemanticType},
};

/// Identifier labels shorter than this get the attribute index
/// appended, keeping them distinct in the generated assembly.
const MIN_LABEL_WIDTH: usize = 5;

/// Bytes an operand occupies on the runtime stack.
fn operand_size(data_type: DataType) -> i32 {
    match data_type {
        DataType::Integer => 2,
        _ => 4,
    }
}

fn bp_label(offset: i32) -> SmolStr {
    if offset >= 0 {
        SmolStr::new(format!("[bp+{}]", offset))
    } else {
        SmolStr::new(format!("[bp{}]", offset))
    }
}

impl SymbolTable {
    /// Label used by the final code generator, derived on first
    /// request and cached on the entry.
    pub fn label(&mut self, idx: AttrIndex) -> SmolStr {
        if let Some(label) = &self.entry(idx).label {
            return label.clone();
        }
        let label = self.make_label(idx);
        self.entry_mut(idx).label = Some(label.clone());
        label
    }

    fn make_label(&self, idx: AttrIndex) -> SmolStr {
        match self.semantic_type(idx) {
            // An integer literal is its own label. A real literal
            // lives in a memory slot like a compiler temporary.
            SemanticType::Literal if self.data_type(idx) == DataType::Integer => {
                SmolStr::new(self.lexeme(idx))
            }
            SemanticType::Literal | SemanticType::TempVar => {
                SmolStr::new(format!("_t{}", idx.as_usize()))
            }
            SemanticType::Label => SmolStr::new(format!("_loop{}", idx.as_usize())),
            SemanticType::Program
            | SemanticType::Variable
            | SemanticType::Parameter
            | SemanticType::Procedure => {
                let text = self.lexeme(idx);
                if text.len() < MIN_LABEL_WIDTH {
                    SmolStr::new(format!("{}{}", text, idx.as_usize()))
                } else {
                    SmolStr::new(text)
                }
            }
            // Keywords, operators and unclassified entries carry no
            // code generator label.
            _ => SmolStr::default(),
        }
    }

    /// Assign base pointer relative stack offsets to a procedure's
    /// parameters and locals, in declaration order.
    ///
    /// Parameters sit above the saved base pointer and return address
    /// (2 bytes each), so the first lands at `[bp+4]`. Locals grow
    /// downward from `[bp-2]`. Each offset is cached as the symbol's
    /// label. Returns the byte count the procedure prologue must
    /// reserve for locals.
    pub fn assign_param_offsets(&mut self, proc_idx: AttrIndex) -> u32 {
        let mut param_offset: i32 = 4;
        let mut local_offset: i32 = 0;
        let mut frame_bytes: u32 = 0;

        for idx in self.owned_by(proc_idx) {
            let size = operand_size(self.data_type(idx));
            match self.semantic_type(idx) {
                SemanticType::Parameter => {
                    self.entry_mut(idx).label = Some(bp_label(param_offset));
                    param_offset += size;
                }
                SemanticType::Variable => {
                    local_offset -= size;
                    frame_bytes += size as u32;
                    self.entry_mut(idx).label = Some(bp_label(local_offset));
                }
                // Nested procedures and other symbols hold no frame
                // slot.
                _ => {}
            }
        }

        frame_bytes
    }

    /// Attribute entries owned by a procedure, in declaration order.
    fn owned_by(&self, proc_idx: AttrIndex) -> Vec<AttrIndex> {
        self.entries()
            .filter(|(_, entry)| entry.owning_proc == Some(proc_idx))
            .map(|(idx, _)| idx)
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scan::TokenClass;

    fn identifier(table: &mut SymbolTable, name: &str) -> AttrIndex {
        let (idx, _) = table.install_name(name).unwrap();
        table.set_attrib(idx, SemanticType::Unknown, TokenClass::Identifier);
        idx
    }

    #[test]
    fn test_integer_literal_is_its_own_label() {
        let mut table = SymbolTable::new().unwrap();

        let (idx, _) = table.install_name("123").unwrap();
        table.set_attrib(idx, SemanticType::Unknown, TokenClass::Constant);
        table.set_data_type(idx, SemanticType::Literal, DataType::Integer);
        table.set_integer_value(idx, 123);

        assert_eq!(table.label(idx), "123");
    }

    #[test]
    fn test_real_literal_takes_temp_slot() {
        let mut table = SymbolTable::new().unwrap();

        let (idx, _) = table.install_name("12.5").unwrap();
        table.set_attrib(idx, SemanticType::Unknown, TokenClass::Constant);
        table.set_data_type(idx, SemanticType::Literal, DataType::Real);
        table.set_real_value(idx, 12.5);

        assert_eq!(table.label(idx), format!("_t{}", idx.as_usize()).as_str());
    }

    #[test]
    fn test_temp_var_and_loop_labels() {
        let mut table = SymbolTable::new().unwrap();

        let temp = identifier(&mut table, "t0");
        table.set_data_type(temp, SemanticType::TempVar, DataType::Integer);
        assert_eq!(table.label(temp), format!("_t{}", temp.as_usize()).as_str());

        let target = identifier(&mut table, "top");
        table.set_data_type(target, SemanticType::Label, DataType::None);
        assert_eq!(
            table.label(target),
            format!("_loop{}", target.as_usize()).as_str()
        );
    }

    #[test]
    fn test_short_identifier_gets_index_suffix() {
        let mut table = SymbolTable::new().unwrap();

        let x = identifier(&mut table, "x");
        table.set_data_type(x, SemanticType::Variable, DataType::Integer);
        assert_eq!(table.label(x), format!("X{}", x.as_usize()).as_str());

        let wages = identifier(&mut table, "wages");
        table.set_data_type(wages, SemanticType::Variable, DataType::Integer);
        assert_eq!(table.label(wages), "WAGES");
    }

    #[test]
    fn test_label_is_cached() {
        let mut table = SymbolTable::new().unwrap();

        let x = identifier(&mut table, "x");
        table.set_data_type(x, SemanticType::Variable, DataType::Integer);

        let first = table.label(x);
        // Widening the name later must not change the cached label.
        table.set_data_type(x, SemanticType::Variable, DataType::Real);
        assert_eq!(table.label(x), first);
    }

    #[test]
    fn test_keyword_has_no_label() {
        let mut table = SymbolTable::new().unwrap();

        let begin = table.is_present("BEGIN").unwrap();
        assert_eq!(table.label(begin), "");
    }

    #[test]
    fn test_param_offsets() {
        let mut table = SymbolTable::new().unwrap();

        let calc = identifier(&mut table, "calc");
        table.set_data_type(calc, SemanticType::Procedure, DataType::None);
        table.open_proc(calc);

        let hours = identifier(&mut table, "hours");
        table.set_data_type(hours, SemanticType::Parameter, DataType::Integer);
        let rate = identifier(&mut table, "rate");
        table.set_data_type(rate, SemanticType::Parameter, DataType::Real);
        let gross = identifier(&mut table, "gross");
        table.set_data_type(gross, SemanticType::Variable, DataType::Integer);
        let net = identifier(&mut table, "net");
        table.set_data_type(net, SemanticType::Variable, DataType::Real);

        table.close_scope();
        let frame_bytes = table.assign_param_offsets(calc);

        // First parameter above the saved bp and return address.
        assert_eq!(table.label(hours), "[bp+4]");
        assert_eq!(table.label(rate), "[bp+6]");
        assert_eq!(table.label(gross), "[bp-2]");
        assert_eq!(table.label(net), "[bp-6]");
        assert_eq!(frame_bytes, 6);
    }

    #[test]
    fn test_offsets_skip_nested_procedures() {
        let mut table = SymbolTable::new().unwrap();

        let outer = identifier(&mut table, "outer");
        table.set_data_type(outer, SemanticType::Procedure, DataType::None);
        table.open_proc(outer);

        let local = identifier(&mut table, "total");
        table.set_data_type(local, SemanticType::Variable, DataType::Integer);
        let inner = identifier(&mut table, "inner");
        table.set_data_type(inner, SemanticType::Procedure, DataType::None);

        table.close_scope();
        let frame_bytes = table.assign_param_offsets(outer);

        assert_eq!(frame_bytes, 2);
        assert_eq!(table.label(local), "[bp-2]");
        // The nested procedure keeps its identifier label.
        assert_eq!(table.label(inner), "INNER");
    }
}
