use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use log::{error, info, warn};
use m15asm::{assemble_lines, macros::expand_macros};

/// Assemble M15 source files into object, entries and externals files.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Source files. The `.as` extension may be left off.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Write output files even when errors were reported
    #[arg(short, long)]
    force: bool,

    /// Don't keep the macro-expanded `.am` file
    #[arg(long)]
    no_expanded: bool,

    /// Directory for output files, next to the source by default
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Log more, may be repeated
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn source_path(file: &Path) -> PathBuf {
    if file.extension().is_some() {
        file.to_owned()
    } else {
        file.with_extension("as")
    }
}

fn output_base(source: &Path, out_dir: Option<&Path>) -> PathBuf {
    match (out_dir, source.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => source.to_owned(),
    }
}

fn write_output(path: PathBuf, contents: &str) -> Result<()> {
    fs::write(&path, contents).with_context(|| format!("Couldn't write {}", path.display()))
}

/// Returns whether the file assembled without errors.
fn assemble_file(file: &Path, args: &Args) -> Result<bool> {
    let source = source_path(file);
    let program_text = fs::read_to_string(&source)
        .with_context(|| format!("Couldn't read {}", source.display()))?;
    let lines = expand_macros(&program_text)
        .with_context(|| format!("Couldn't expand macros in {}", source.display()))?;

    let base = output_base(&source, args.out_dir.as_deref());
    if !args.no_expanded {
        let mut expanded = lines.join("\n");
        expanded.push('\n');
        write_output(base.with_extension("am"), &expanded)?;
    }

    let assembly = assemble_lines(&lines);
    info!(
        "{}: {} code word(s), {} data word(s), {} error(s)",
        source.display(),
        assembly.code_length(),
        assembly.data_length(),
        assembly.diagnostics.count()
    );

    if assembly.has_errors() && !args.force {
        warn!(
            "{}: not writing output because of {} error(s)",
            source.display(),
            assembly.diagnostics.count()
        );
        return Ok(false);
    }

    write_output(base.with_extension("ob"), &assembly.object_file())?;
    if let Some(entries) = assembly.entries_file() {
        write_output(base.with_extension("ent"), &entries)?;
    }
    if let Some(externals) = assembly.externals_file() {
        write_output(base.with_extension("ext"), &externals)?;
    }

    Ok(!assembly.has_errors())
}

/// Assemble every file in turn and return how many failed.
fn assemble_files(args: &Args) -> usize {
    let mut failed = 0;
    for file in &args.files {
        match assemble_file(file, args) {
            Ok(true) => {}
            Ok(false) => failed += 1,
            Err(e) => {
                error!("{:#}", e);
                failed += 1;
            }
        }
    }
    failed
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level(args.verbose)),
    )
    .init();

    let failed = assemble_files(&args);
    if failed > 0 {
        bail!("{} of {} file(s) failed to assemble", failed, args.files.len());
    }

    Ok(())
}
