//! Canonical error type for structure input.
//!
//! Wraps filesystem failures and malformed records into a single `Error` enum so the CLI can
//! attach context without inspecting parser internals.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a structure.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper around operating-system level I/O failures.
    #[error(
        "I/O error for {path_desc}: {source}",
        path_desc = PathDisplay(path)
    )]
    Io {
        /// Path to the file involved in the failed operation, if any.
        path: Option<PathBuf>,
        /// Underlying error emitted by the standard library.
        #[source]
        source: std::io::Error,
    },

    /// Indicates that an input line could not be parsed into the expected record.
    #[error(
        "failed to parse {format} {path_desc}: {details} (line {line_number})",
        path_desc = PathDisplay(path)
    )]
    Parse {
        /// Name of the textual format (e.g., `"PDB"`).
        format: &'static str,
        /// Path to the offending file, if known.
        path: Option<PathBuf>,
        /// One-based line number where parsing failed.
        line_number: usize,
        /// Human-readable description of what went wrong.
        details: String,
    },

    /// The input contained no atom records at all.
    #[error("no atoms found in {format} {path_desc}", path_desc = PathDisplay(path))]
    NoAtoms {
        format: &'static str,
        path: Option<PathBuf>,
    },
}

impl Error {
    pub fn from_io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { path, source }
    }

    pub fn parse(
        format: &'static str,
        path: Option<PathBuf>,
        line_number: usize,
        details: impl Into<String>,
    ) -> Self {
        Self::Parse {
            format,
            path,
            line_number,
            details: details.into(),
        }
    }

    pub fn no_atoms(format: &'static str, path: Option<PathBuf>) -> Self {
        Self::NoAtoms { format, path }
    }
}

struct PathDisplay<'a>(&'a Option<PathBuf>);

impl<'a> fmt::Display for PathDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "file '{}'", p.display()),
            None => write!(f, "stream source"),
        }
    }
}
