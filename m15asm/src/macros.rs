use indexmap::IndexMap;
use log::debug;

use crate::constants::{MACRO_END, MACRO_START, MAX_LINE_LENGTH};
use crate::directive::{is_macro_keyword, is_reserved};
use crate::error::{AsmError, Diagnostic};

#[derive(Debug, Default)]
pub struct MacroTable {
    macros: IndexMap<String, Vec<String>>,
}

#[allow(clippy::len_without_is_empty)]
impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later definitions replace earlier ones with the same name.
    pub fn define(&mut self, name: String, body: Vec<String>) {
        self.macros.insert(name, body);
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.macros.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }
}

pub fn is_valid_macro_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(char::is_whitespace)
        && !is_reserved(name)
        && !is_macro_keyword(name)
}

fn check_length(line_no: usize, line: &str) -> Result<(), Diagnostic> {
    let length = line.chars().count();
    if length > MAX_LINE_LENGTH {
        return Err(Diagnostic::new(
            line_no,
            AsmError::LineTooLong {
                length,
                max: MAX_LINE_LENGTH,
            },
        ));
    }
    Ok(())
}

/// Expand every macro in `source`, returning the flattened line stream.
/// Any error here stops processing of the whole file.
pub fn expand_macros(source: &str) -> Result<Vec<String>, Diagnostic> {
    let mut table = MacroTable::new();
    let mut expanded = Vec::new();
    let mut lines = source.lines().enumerate().map(|(idx, line)| (idx + 1, line));

    while let Some((line_no, line)) = lines.next() {
        check_length(line_no, line)?;

        let first = line.split_whitespace().next();
        if first == Some(MACRO_START) {
            let name = line.trim_start()[MACRO_START.len()..].trim();
            if !is_valid_macro_name(name) {
                return Err(Diagnostic::new(
                    line_no,
                    AsmError::InvalidMacroName(name.to_owned()),
                ));
            }

            let mut body = Vec::new();
            let mut closed = false;
            for (body_no, body_line) in lines.by_ref() {
                check_length(body_no, body_line)?;
                if body_line.trim() == MACRO_END {
                    closed = true;
                    break;
                }
                body.push(body_line.to_owned());
            }
            if !closed {
                return Err(Diagnostic::new(
                    line_no,
                    AsmError::UnterminatedMacro(name.to_owned()),
                ));
            }

            debug!("Defined macro {} with {} line(s)", name, body.len());
            table.define(name.to_owned(), body);
        } else if let Some(body) = first.and_then(|token| table.get(token)) {
            expanded.extend(body.iter().cloned());
        } else {
            expanded.push(line.to_owned());
        }
    }

    debug!(
        "Expanded {} macro(s) into {} line(s)",
        table.len(),
        expanded.len()
    );
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: &str = "\
macr m_inc
 inc r2
 prn r2
endmacr
MAIN: mov r1, r2
 m_inc
 m_inc
 stop
";

    #[test]
    fn expands_bodies() -> anyhow::Result<()> {
        let lines = expand_macros(PROGRAM)?;
        assert_eq!(
            lines,
            vec![
                "MAIN: mov r1, r2",
                " inc r2",
                " prn r2",
                " inc r2",
                " prn r2",
                " stop"
            ]
        );
        Ok(())
    }

    #[test]
    fn idempotent() -> anyhow::Result<()> {
        let once = expand_macros(PROGRAM)?;
        let twice = expand_macros(&once.join("\n"))?;
        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn redefinition_replaces() -> anyhow::Result<()> {
        let source = "macr m\n inc r1\nendmacr\nmacr m\n dec r1\nendmacr\nm\n";
        assert_eq!(expand_macros(source)?, vec![" dec r1"]);
        Ok(())
    }

    #[test]
    fn use_before_definition_passes_through() -> anyhow::Result<()> {
        let source = "m\nmacr m\n inc r1\nendmacr\n";
        assert_eq!(expand_macros(source)?, vec!["m"]);
        Ok(())
    }

    #[test]
    fn bad_names() {
        for name in ["mov", ".data", "macr", "endmacr", "", "a b"] {
            assert!(!is_valid_macro_name(name), "{:?}", name);
        }
        assert!(is_valid_macro_name("m_macr"));

        let err = expand_macros("x\nmacr stop\nendmacr\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.error, AsmError::InvalidMacroName("stop".into()));
    }

    #[test]
    fn unterminated() {
        let err = expand_macros("macr m\n inc r1\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.error, AsmError::UnterminatedMacro("m".into()));
    }

    #[test]
    fn long_lines() {
        let source = format!("; {}\n", "x".repeat(MAX_LINE_LENGTH));
        let err = expand_macros(&source).unwrap_err();
        assert_eq!(
            err.error,
            AsmError::LineTooLong {
                length: MAX_LINE_LENGTH + 2,
                max: MAX_LINE_LENGTH
            }
        );

        let source = format!("; {}\n", "x".repeat(MAX_LINE_LENGTH - 2));
        assert!(expand_macros(&source).is_ok());
    }
}
