use anyhow::{Context, Result};
use pass_one::FirstPass;
use pass_two::pass_two;

pub mod constants;
pub mod directive;
pub mod error;
pub mod labels;
pub mod line;
pub mod macros;
pub mod pass_one;
pub mod pass_two;
pub mod record;

pub use pass_two::Assembly;

/// Assemble an M15 program from its source text.
///
/// # Errors
///
/// If a macro can't be expanded. Every other problem is collected in
/// [`Assembly::diagnostics`] and assembly carries on.
pub fn assemble_program(program_text: &str) -> Result<Assembly> {
    let lines = macros::expand_macros(program_text).context("Couldn't expand macros")?;
    Ok(assemble_lines(&lines))
}

/// Run both passes over lines that have already been through the macro
/// preprocessor.
pub fn assemble_lines<S: AsRef<str>>(lines: &[S]) -> Assembly {
    let pass_one = FirstPass::parse_lines(lines);
    pass_two(pass_one)
}
