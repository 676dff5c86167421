//! Diagnostic report of the table contents.
use std::fmt::Write;

use itertools::Itertools;

use crate::error::MiniPasResult;

use super::table::SymbolTable;

impl SymbolTable {
    /// Render the whole table as a debugging report: one row per
    /// attribute entry, then the name table's hash chains.
    pub fn dump(&self) -> MiniPasResult<String> {
        let mut out = String::new();

        writeln!(out, "SYMBOL TABLE")?;
        writeln!(
            out,
            "{:>5}  {:<12} {:<10} {:<8} {:<8} {:>12}  {:<10} {}",
            "index", "lexeme", "class", "semantic", "type", "value", "proc", "label"
        )?;

        for (idx, entry) in self.entries() {
            let proc = match entry.owning_proc {
                Some(p) => self.lexeme(p),
                None => "-",
            };
            let label = entry.label.as_deref().unwrap_or("");
            writeln!(
                out,
                "{:>5}  {:<12} {:<10} {:<8} {:<8} {:>12}  {:<10} {}",
                idx,
                self.lexeme(idx),
                entry.token_class,
                entry.semantic,
                entry.data_type,
                entry.value.to_string(),
                proc,
                label,
            )?;
        }

        writeln!(out)?;
        writeln!(out, "NAME CHAINS")?;
        for (code, head) in self.bucket_heads().iter().enumerate() {
            if head.is_none() {
                continue;
            }
            let chain = self
                .chain(*head)
                .map(|idx| self.name_text(idx))
                .join(" -> ");
            writeln!(out, "{:>5}  {}", code, chain)?;
        }

        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scan::TokenClass;
    use crate::symtab::{DataType, SemanticType};

    #[test]
    fn test_dump_lists_seeded_and_installed_entries() {
        let mut table = SymbolTable::new().unwrap();

        let (idx, _) = table.install_name("gross").unwrap();
        table.set_attrib(idx, SemanticType::Unknown, TokenClass::Identifier);
        table.set_data_type(idx, SemanticType::Variable, DataType::Integer);
        table.set_integer_value(idx, 250);

        let report = table.dump().unwrap();
        assert!(report.contains("SYMBOL TABLE"));
        assert!(report.contains("BEGIN"));
        assert!(report.contains("GROSS"));
        assert!(report.contains("250"));
        assert!(report.contains("NAME CHAINS"));
    }

    #[test]
    fn test_dump_shows_owning_procedure() {
        let mut table = SymbolTable::new().unwrap();

        let (calc, _) = table.install_name("calc").unwrap();
        table.set_attrib(calc, SemanticType::Unknown, TokenClass::Identifier);
        table.set_data_type(calc, SemanticType::Procedure, DataType::None);

        table.open_proc(calc);
        let (local, _) = table.install_name("step").unwrap();
        table.set_attrib(local, SemanticType::Unknown, TokenClass::Identifier);
        table.close_scope();

        let report = table.dump().unwrap();
        let row = report
            .lines()
            .find(|line| line.contains("STEP"))
            .expect("row for STEP");
        assert!(row.contains("CALC"));
    }
}
