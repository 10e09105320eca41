use std::{iter, str::FromStr};

use libm15::{
    op::{Opcode, Operand, Register},
    word::{char_to_word, i32_to_word, Word},
};

use crate::{
    constants::{line_regex, number_regex, symbol_regex, MAX_LABEL_LENGTH},
    directive::{is_reserved, Directive},
    error::AsmError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Directive(Directive, String),
    Instruction(Opcode, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub line_no: usize,
    pub label: Option<String>,
    pub statement: Statement,
}

pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with(';')
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Labels follow the same naming rule as the operands that refer to them.
pub fn validate_label(label: &str) -> Result<String, AsmError> {
    if label.len() > MAX_LABEL_LENGTH
        || !symbol_regex().is_match(label)
        || is_reserved(label)
        || Register::from_str(label).is_ok()
    {
        return Err(AsmError::InvalidLabel(label.to_owned()));
    }
    Ok(label.to_owned())
}

/// Classify one expanded line. Comments and blank lines give `Ok(None)`.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<ParsedLine>, AsmError> {
    if is_comment(line) || is_blank(line) {
        return Ok(None);
    }

    let unrecognized = || AsmError::UnrecognizedLine(line.trim().to_owned());
    let captures = line_regex().captures(line).ok_or_else(unrecognized)?;

    let label = captures
        .name("label")
        .map(|m| validate_label(m.as_str()))
        .transpose()?;
    let head = captures.name("head").ok_or_else(unrecognized)?.as_str();
    let rest = captures
        .name("rest")
        .map_or("", |m| m.as_str())
        .to_owned();

    let statement = if let Some(directive) = Directive::from_name(head) {
        Statement::Directive(directive, rest)
    } else if let Some(opcode) = Opcode::from_mnemonic(head) {
        Statement::Instruction(opcode, rest)
    } else {
        return Err(unrecognized());
    };

    Ok(Some(ParsedLine {
        line_no,
        label,
        statement,
    }))
}

/// Split an instruction's operand text on commas. The count is checked
/// against the operation later, when the instruction is built.
pub fn parse_operands(text: &str) -> Result<Vec<Operand>, AsmError> {
    if text.trim().is_empty() {
        return Ok(vec![]);
    }

    text.split(',')
        .map(str::trim)
        .map(|piece| {
            if piece.is_empty() || piece.contains(char::is_whitespace) {
                Err(AsmError::InvalidOperands(format!(
                    "malformed operand list `{}`",
                    text
                )))
            } else {
                piece.parse::<Operand>().map_err(AsmError::from)
            }
        })
        .collect()
}

pub fn parse_data(text: &str) -> Result<Vec<Word>, AsmError> {
    text.split(',')
        .map(str::trim)
        .map(|piece| {
            let invalid = || AsmError::InvalidDataFormat(format!("`{}` is not an integer", piece));
            if !number_regex().is_match(piece) {
                return Err(invalid());
            }
            piece.parse::<i32>().map(i32_to_word).map_err(|_| invalid())
        })
        .collect()
}

/// A quoted run of letters becomes one word per character plus a zero.
pub fn parse_string(text: &str) -> Result<Vec<Word>, AsmError> {
    let text = text.trim();
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .ok_or_else(|| {
            AsmError::InvalidStringFormat(format!("expected a quoted string, found `{}`", text))
        })?;

    if let Some(c) = inner.chars().find(|c| !c.is_ascii_alphabetic()) {
        return Err(AsmError::InvalidStringFormat(format!(
            "`{}` is not a letter",
            c
        )));
    }

    Ok(inner.chars().map(char_to_word).chain(iter::once(0)).collect())
}

/// Symbol names for `.extern` and `.entry`, separated by whitespace.
pub fn parse_symbol_list(text: &str) -> Result<Vec<String>, AsmError> {
    text.split_whitespace()
        .map(|name| {
            if symbol_regex().is_match(name) {
                Ok(name.to_owned())
            } else {
                Err(AsmError::InvalidOperands(format!(
                    "`{}` is not a symbol name",
                    name
                )))
            }
        })
        .collect()
}
