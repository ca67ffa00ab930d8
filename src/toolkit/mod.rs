//! Molecular-modeling toolkit boundary.
//!
//! The bridge analysis never touches coordinates or files directly. It asks a [`Toolkit`] to
//! evaluate selections, answer proximity questions, and resolve atom identity.
//! [`StructureToolkit`] is the in-memory implementation backed by a parsed
//! [`Structure`](crate::Structure); tests are free to substitute their own.

mod error;
mod hbond;
mod record;
mod structure;

pub use crate::select::AtomRef;
pub use error::Error;
pub use record::{AtomRecord, AtomSite, ResidueKey};
pub use structure::StructureToolkit;

use crate::model::types::Point;
use crate::select::{Query, Selection};

/// Pair-search criterion for [`Toolkit::find_pairs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairMode {
    /// Distance only.
    Any,
    /// Donor in the first selection, acceptor in the second, with the donor's hydrogen
    /// geometry checked against the angle cutoff where it can be determined.
    HydrogenBond,
}

pub trait Toolkit {
    /// Evaluates a query into an explicit selection.
    fn select(&self, query: &Query) -> Result<Selection, Error>;

    fn count_atoms(&self, selection: &Selection) -> usize {
        selection.len()
    }

    /// Returns every atom within `radius` Å (inclusive) of any atom in `selection`, including
    /// the selection's own atoms.
    fn within(&self, radius: f64, selection: &Selection) -> Selection;

    /// Finds `(first, second)` atom pairs no farther apart than `cutoff` Å.
    ///
    /// In [`PairMode::HydrogenBond`] the first atom must be able to donate, the second to
    /// accept, and the donor-hydrogen-acceptor angle must be at least `angle` degrees.
    fn find_pairs(
        &self,
        first: &Selection,
        second: &Selection,
        mode: PairMode,
        cutoff: f64,
        angle: f64,
    ) -> Vec<(AtomRef, AtomRef)>;

    /// Coordinates of the single atom in `selection`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousAtom`] unless the selection holds exactly one atom.
    fn atom_coordinates(&self, selection: &Selection) -> Result<Point, Error>;

    /// Full records for the atoms of `selection`, in ascending index order.
    fn list_atoms(&self, selection: &Selection) -> Vec<AtomRecord>;
}
