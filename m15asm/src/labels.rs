use log::warn;
use strum::Display;

use crate::error::AsmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SymbolKind {
    Code,
    Data,
    External,
    Entry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub address: usize,
    pub kind: SymbolKind,
}

/// Symbols in definition order. Lookups return the first definition of a name.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: String, kind: SymbolKind, address: usize) {
        if self.find(&name).is_some() {
            warn!("Symbol {} is defined more than once", name);
        }
        self.symbols.push(Symbol {
            name,
            address,
            kind,
        });
    }

    pub fn find(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    /// Data symbols are numbered from zero during the first pass and live
    /// after the code once the final IC is known.
    pub fn rebase_data_addresses(&mut self, offset: usize) {
        self.symbols
            .iter_mut()
            .filter(|s| s.kind == SymbolKind::Data)
            .for_each(|s| s.address += offset);
    }

    pub fn promote_to_entry(&mut self, name: &str) -> Result<(), AsmError> {
        let symbol = self
            .symbols
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| AsmError::EntrySymbolNotFound(name.to_owned()))?;
        symbol.kind = SymbolKind::Entry;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn entries(&self) -> impl Iterator<Item = &Symbol> {
        self.iter().filter(|s| s.kind == SymbolKind::Entry)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
