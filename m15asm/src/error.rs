use libm15::op::OpError;
use log::error;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("invalid macro name `{0}`")]
    InvalidMacroName(String),

    #[error("macro `{0}` is never closed with `endmacr`")]
    UnterminatedMacro(String),

    #[error("line is {length} characters long, the limit is {max}")]
    LineTooLong { length: usize, max: usize },

    #[error("invalid label `{0}`")]
    InvalidLabel(String),

    #[error("unrecognized line `{0}`")]
    UnrecognizedLine(String),

    #[error("invalid .data format: {0}")]
    InvalidDataFormat(String),

    #[error("invalid .string format: {0}")]
    InvalidStringFormat(String),

    #[error("invalid operands: {0}")]
    InvalidOperands(String),

    #[error("symbol `{0}` is not defined")]
    UnresolvedSymbol(String),

    #[error("entry symbol `{0}` is not defined")]
    EntrySymbolNotFound(String),
}

impl From<OpError> for AsmError {
    fn from(e: OpError) -> Self {
        AsmError::InvalidOperands(e.to_string())
    }
}

/// An error tied to the line it was found on. Line numbers are 1-based and
/// count raw source lines for macro errors, expanded lines for everything else.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {error}")]
pub struct Diagnostic {
    pub line: usize,
    pub error: AsmError,
}

impl Diagnostic {
    pub fn new(line: usize, error: AsmError) -> Self {
        Self { line, error }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, line: usize, error: AsmError) {
        let diagnostic = Diagnostic::new(line, error);
        error!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libm15::op::Opcode;

    #[test]
    fn display() {
        let d = Diagnostic::new(7, AsmError::UnresolvedSymbol("LOOP".into()));
        assert_eq!(d.to_string(), "line 7: symbol `LOOP` is not defined");

        let e: AsmError = OpError::OperandCount {
            opcode: Opcode::Mov,
            expected: 2,
            found: 3,
        }
        .into();
        assert_eq!(
            e.to_string(),
            "invalid operands: `mov` takes 2 operand(s), found 3"
        );
    }

    #[test]
    fn accumulates() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        diagnostics.record(1, AsmError::InvalidLabel("mov".into()));
        diagnostics.record(4, AsmError::UnrecognizedLine("foo".into()));
        assert_eq!(diagnostics.count(), 2);
        let lines: Vec<usize> = diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![1, 4]);
    }
}
