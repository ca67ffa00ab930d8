//! Structure input for the in-memory toolkit.
//!
//! Only the PDB format is supported. [`IoContext`] decides which residues count as solvent,
//! ions, or standard polymer residues so selection keywords behave consistently.

mod context;
mod error;
mod pdb;

pub use pdb::reader::read as read_pdb_structure;
pub use pdb::reader::read_path as read_pdb_file;

pub use context::IoContext;

pub use error::Error;
