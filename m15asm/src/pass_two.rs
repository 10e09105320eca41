use libm15::op::{symbol_word, Are};
use log::debug;

use crate::{
    constants::INITIAL_IC,
    directive::Directive,
    error::{AsmError, Diagnostics},
    labels::{SymbolKind, SymbolTable},
    line::{parse_symbol_list, ParsedLine, Statement},
    pass_one::{CodeWord, DataWord, PassOne},
};

/// A code word that refers to an external symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalUse {
    pub name: String,
    pub address: usize,
}

/// Everything produced for one source file.
#[derive(Debug)]
pub struct Assembly {
    pub code: Vec<CodeWord>,
    pub data: Vec<DataWord>,
    pub symbols: SymbolTable,
    pub externals: Vec<ExternalUse>,
    pub ic: usize,
    pub dc: usize,
    pub diagnostics: Diagnostics,
}

impl Assembly {
    pub fn code_length(&self) -> usize {
        self.ic - INITIAL_IC
    }

    pub fn data_length(&self) -> usize {
        self.dc
    }

    /// Final address of a data word, placed right after the code.
    pub fn data_address(&self, data: &DataWord) -> usize {
        data.address + self.ic
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

fn mark_entries(
    parsed_lines: &[ParsedLine],
    symbols: &mut SymbolTable,
    diagnostics: &mut Diagnostics,
) {
    for line in parsed_lines {
        let Statement::Directive(Directive::Entry, args) = &line.statement else {
            continue;
        };
        let names = match parse_symbol_list(args) {
            Ok(names) => names,
            Err(error) => {
                diagnostics.record(line.line_no, error);
                continue;
            }
        };
        for name in names {
            if let Err(error) = symbols.promote_to_entry(&name) {
                diagnostics.record(line.line_no, error);
            }
        }
    }
}

fn resolve_symbols(
    code: &mut [CodeWord],
    symbols: &SymbolTable,
    diagnostics: &mut Diagnostics,
) -> Vec<ExternalUse> {
    let mut externals = vec![];

    for word in code.iter_mut() {
        let Some(name) = word.symbol.as_deref() else {
            continue;
        };
        let Some(symbol) = symbols.find(name) else {
            diagnostics.record(word.line_no, AsmError::UnresolvedSymbol(name.to_owned()));
            continue;
        };

        let are = if symbol.kind == SymbolKind::External {
            externals.push(ExternalUse {
                name: symbol.name.clone(),
                address: word.address,
            });
            Are::External
        } else {
            Are::Relocatable
        };
        word.word = symbol_word(symbol.address, are);
        word.symbol = None;
    }

    externals
}

pub fn pass_two(pass_one: PassOne) -> Assembly {
    let PassOne {
        parsed_lines,
        mut symbols,
        mut code,
        data,
        ic,
        dc,
        mut diagnostics,
    } = pass_one;

    mark_entries(&parsed_lines, &mut symbols, &mut diagnostics);
    let externals = resolve_symbols(&mut code, &symbols, &mut diagnostics);
    debug!(
        "Pass two done: {} external reference(s), {} error(s)",
        externals.len(),
        diagnostics.count()
    );

    Assembly {
        code,
        data,
        symbols,
        externals,
        ic,
        dc,
        diagnostics,
    }
}
