//! Bridging-water detection.
//!
//! A water oxygen bridges two domains when it lies within the residue-water cutoff of some
//! atom of each. Only primary-conformer oxygens take part in the analysis, but the
//! informational counts include every water oxygen.

use super::Error;
use crate::select::{AtomRef, Query, Selection};
use crate::toolkit::Toolkit;

/// Water oxygens near each domain and the primary-conformer oxygens near both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BridgeSet {
    pub near_a: usize,
    pub near_b: usize,
    pub bridging: usize,
    /// Primary-conformer bridging oxygens in ascending atom order.
    pub waters: Vec<AtomRef>,
}

impl BridgeSet {
    pub fn is_empty(&self) -> bool {
        self.waters.is_empty()
    }
}

fn water_oxygens() -> Query {
    Query::Solvent.and(Query::names(["O"]))
}

fn near(domain: &Selection, cutoff: f64) -> Query {
    water_oxygens().and(Query::within(cutoff, Query::Atoms(domain.clone())))
}

/// Finds the water oxygens within `cutoff` Å of both domains.
///
/// Every atom of a domain selection is a proximity reference, including any waters it holds.
/// Those waters are dropped later, when contacts are searched.
pub fn locate_bridging_waters<T: Toolkit + ?Sized>(
    toolkit: &T,
    domain_a: &Selection,
    domain_b: &Selection,
    cutoff: f64,
) -> Result<BridgeSet, Error> {
    let near_a = toolkit.select(&near(domain_a, cutoff))?;
    let near_b = toolkit.select(&near(domain_b, cutoff))?;
    let bridging = near_a.intersection(&near_b);

    let primary = toolkit.select(&Query::Atoms(bridging.clone()).and(Query::primary_conformer()))?;

    Ok(BridgeSet {
        near_a: toolkit.count_atoms(&near_a),
        near_b: toolkit.count_atoms(&near_b),
        bridging: toolkit.count_atoms(&bridging),
        waters: primary.iter().cloned().collect(),
    })
}
