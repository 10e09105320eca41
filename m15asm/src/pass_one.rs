use libm15::{
    op::Instruction,
    word::{Word, WordExt},
};
use log::{debug, warn};

use crate::{
    constants::{INITIAL_DC, INITIAL_IC},
    directive::Directive,
    error::{AsmError, Diagnostics},
    labels::{SymbolKind, SymbolTable},
    line::{
        self, parse_data, parse_operands, parse_string, parse_symbol_list, ParsedLine, Statement,
    },
};

/// An instruction word. `symbol` names the label still to be filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeWord {
    pub address: usize,
    pub word: Word,
    pub symbol: Option<String>,
    pub line_no: usize,
}

/// A data word. The address is relative to the start of the data image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataWord {
    pub address: usize,
    pub word: Word,
}

pub struct FirstPass {
    ic: usize,
    dc: usize,
    symbols: SymbolTable,
    code: Vec<CodeWord>,
    data: Vec<DataWord>,
    diagnostics: Diagnostics,
}

#[derive(Debug)]
pub struct PassOne {
    pub parsed_lines: Vec<ParsedLine>,
    pub symbols: SymbolTable,
    pub code: Vec<CodeWord>,
    pub data: Vec<DataWord>,
    pub ic: usize,
    pub dc: usize,
    pub diagnostics: Diagnostics,
}

impl FirstPass {
    fn new() -> Self {
        Self {
            ic: INITIAL_IC,
            dc: INITIAL_DC,
            symbols: SymbolTable::new(),
            code: vec![],
            data: vec![],
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> PassOne {
        let mut pass = Self::new();

        let mut parsed_lines = vec![];
        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;
            match pass.parse_line(line_no, line.as_ref()) {
                Ok(Some(parsed)) => parsed_lines.push(parsed),
                Ok(None) => {}
                Err(error) => pass.diagnostics.record(line_no, error),
            }
        }

        pass.symbols.rebase_data_addresses(pass.ic);
        debug!(
            "Pass one done: IC {}, DC {}, {} symbol(s), {} error(s)",
            pass.ic,
            pass.dc,
            pass.symbols.len(),
            pass.diagnostics.count()
        );

        PassOne {
            parsed_lines,
            symbols: pass.symbols,
            code: pass.code,
            data: pass.data,
            ic: pass.ic,
            dc: pass.dc,
            diagnostics: pass.diagnostics,
        }
    }

    fn parse_line(&mut self, line_no: usize, text: &str) -> Result<Option<ParsedLine>, AsmError> {
        let Some(parsed) = line::parse_line(line_no, text)? else {
            return Ok(None);
        };

        match &parsed.statement {
            Statement::Directive(directive @ (Directive::Extern | Directive::Entry), args) => {
                if let Some(label) = &parsed.label {
                    warn!("line {}: label {} on {} is ignored", line_no, label, directive);
                }
                if *directive == Directive::Extern {
                    for name in parse_symbol_list(args)? {
                        self.symbols.add(name, SymbolKind::External, 0);
                    }
                }
            }
            Statement::Directive(directive, args) => {
                if let Some(label) = &parsed.label {
                    self.symbols.add(label.clone(), SymbolKind::Data, self.dc);
                }
                let values = if *directive == Directive::Data {
                    parse_data(args)?
                } else {
                    parse_string(args)?
                };
                self.add_data(&values);
            }
            Statement::Instruction(opcode, args) => {
                if let Some(label) = &parsed.label {
                    self.symbols.add(label.clone(), SymbolKind::Code, self.ic);
                }
                let instruction = Instruction::new(*opcode, parse_operands(args)?)?;
                self.add_instruction(line_no, &instruction);
            }
        }

        Ok(Some(parsed))
    }

    fn add_data(&mut self, values: &[Word]) {
        for value in values {
            self.data.push(DataWord {
                address: self.dc,
                word: value.masked(),
            });
            self.dc += 1;
        }
    }

    fn add_instruction(&mut self, line_no: usize, instruction: &Instruction) {
        for encoded in instruction.encode() {
            self.code.push(CodeWord {
                address: self.ic,
                word: encoded.word,
                symbol: encoded.symbol,
                line_no,
            });
            self.ic += 1;
        }
    }
}
