//! In-memory structure storage backing the toolkit.
//!
//! Atoms, residues, chains, and structures are populated by the PDB reader and then flattened
//! into the toolkit's atom table. The [`grid::Grid`] spatial index answers every distance query
//! the analysis issues.

pub mod atom;
pub mod chain;
pub mod grid;
pub mod residue;
pub mod structure;
pub mod types;
