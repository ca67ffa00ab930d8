use std::io::{self as stdio, BufReader, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;

use water_bridge::Structure;
use water_bridge::io::{IoContext, read_pdb_file, read_pdb_structure};

pub mod bridges;

/// Initializes `env_logger`, defaulting to `warn` and shifted by `-v`/`-q` counts.
pub fn init_logging(verbose: u8, quiet: u8) {
    let level = match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-2 => "off",
        -1 => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Reads the PDB input from a file or from piped stdin.
///
/// Residue names in `water_aliases` are treated as water on top of the built-in aliases.
pub fn load_input(
    input: Option<&Path>,
    name: Option<&str>,
    water_aliases: &[String],
) -> Result<Structure> {
    let mut context = IoContext::new_default();
    for alias in water_aliases {
        context.add_alias(alias.trim().to_ascii_uppercase(), "HOH");
    }

    let mut structure = match input {
        Some(path) => read_pdb_file(path, &context)
            .with_context(|| format!("Failed to read PDB input from {}", path.display()))?,
        None => {
            let stdin = stdio::stdin();
            if stdin.is_terminal() {
                bail!(
                    "No --input provided and stdin is a TTY. Provide -i/--input or pipe a PDB file into waterbridge."
                );
            }
            read_pdb_structure(BufReader::new(stdin.lock()), &context)
                .context("Failed to read PDB input from stdin")?
        }
    };

    if let Some(name) = name {
        structure.name = name.to_string();
    }
    log::info!(
        "loaded '{}': {} chains, {} residues, {} atoms",
        structure.name,
        structure.chain_count(),
        structure.residue_count(),
        structure.atom_count()
    );
    Ok(structure)
}

/// Wraps long-running operations with a spinner rendered to stderr.
///
/// The spinner is hidden when stderr is not a terminal.
pub fn run_with_spinner<T, F>(message: &str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let spinner = if stdio::stderr().is_terminal() {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    let result = work();

    match &result {
        Ok(_) => spinner.finish_with_message(format!("{message} ✓")),
        Err(_) => spinner.abandon_with_message(format!("{message} ✗")),
    }

    result
}

pub fn print_boxed_label<W: Write>(writer: &mut W, title: &str) -> stdio::Result<()> {
    let inner = format!(" {title} ");
    let width = inner.chars().count();
    writeln!(writer, "╭{}╮", "─".repeat(width))?;
    writeln!(writer, "│{inner}│")?;
    writeln!(writer, "╰{}╯", "─".repeat(width))?;
    Ok(())
}
