//! # water-bridge
//!
//! **water-bridge** finds residue pairs of two molecular domains that interact through a single
//! bridging water. Each water close to both domains is checked for hydrogen bonds on either
//! side, with a plain polar-contact fallback, and every surviving residue-water-residue path is
//! reported with its per-leg and total distances.
//!
//! ## Features
//!
//! - **Toolkit boundary** – The analysis only talks to a [`toolkit::Toolkit`]; the bundled
//!   [`toolkit::StructureToolkit`] answers selections, proximity, and hydrogen-bond geometry
//!   from a parsed PDB file through a spatial grid.
//! - **Typed selections** – Domains are [`select::Query`] values, with a small text language
//!   (`chain A and resi 10-40`, `within 5 of resn LIG`) parsed at the edges.
//! - **Deterministic reports** – Interactions come back sorted by category, residues, and
//!   water, ready for the plain-text report or a summary table.
//! - **Viewer scripts** – [`annotate::PmlScript`] replays the highlights and labelled distances
//!   as a PyMOL script.
//!
//! ## Example
//!
//! ```
//! use std::io::Cursor;
//! use water_bridge::io::{IoContext, read_pdb_structure};
//! use water_bridge::toolkit::StructureToolkit;
//! use water_bridge::{BridgeConfig, InteractionCategory, analyze_expressions};
//!
//! let pdb = "\
//! ATOM      1  N   SER A  10       0.000   0.000   0.000  1.00 20.00           N
//! HETATM    2  O   HOH W 301       3.000   0.000   0.000  1.00 20.00           O
//! ATOM      3  OD1 ASP B  40       6.000   0.000   0.000  1.00 20.00           O
//! END
//! ";
//! let structure = read_pdb_structure(Cursor::new(pdb), &IoContext::default()).unwrap();
//! let toolkit = StructureToolkit::new(&structure);
//!
//! let report =
//!     analyze_expressions(&toolkit, "chain A", "chain B", &BridgeConfig::default()).unwrap();
//!
//! assert_eq!(report.bridging, 1);
//! assert_eq!(report.interactions[0].category, InteractionCategory::PolarContact);
//! assert_eq!(report.interactions[0].total_distance, 6.0);
//! ```

mod model;

pub mod analysis;
pub mod annotate;
pub mod io;
pub mod select;
pub mod toolkit;

pub use analysis::{
    BridgeConfig, BridgeReport, Error, InteractionCategory, InteractionRecord, analyze,
    analyze_expressions,
};
pub use model::atom::Atom;
pub use model::chain::Chain;
pub use model::residue::Residue;
pub use model::structure::Structure;
pub use model::types::{Element, Point, ResidueCategory, StandardResidue};
