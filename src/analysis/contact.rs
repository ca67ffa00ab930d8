//! Atom-level contacts between one domain and one water oxygen.

use super::config::BridgeConfig;
use super::geometry;
use super::Error;
use crate::model::types::Point;
use crate::select::{AtomRef, Query, Selection};
use crate::toolkit::{PairMode, Toolkit};
use std::collections::BTreeMap;

/// A domain atom close to a water oxygen, always oriented domain atom first.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomPairContact {
    pub domain_atom: AtomRef,
    pub water: AtomRef,
    pub distance: f64,
}

/// What one domain side offers a water: hydrogen bonds win over polar contacts.
#[derive(Debug, Clone, PartialEq)]
pub enum SideContacts {
    HydrogenBonds(Vec<AtomPairContact>),
    PolarContacts(Vec<AtomPairContact>),
    None,
}

impl SideContacts {
    pub fn contacts(&self) -> &[AtomPairContact] {
        match self {
            SideContacts::HydrogenBonds(contacts) | SideContacts::PolarContacts(contacts) => {
                contacts
            }
            SideContacts::None => &[],
        }
    }

    pub fn is_hydrogen_bonded(&self) -> bool {
        matches!(self, SideContacts::HydrogenBonds(_))
    }
}

/// The candidate atoms of one domain, selected once per analysis.
#[derive(Debug, Clone)]
pub struct PreparedDomain {
    /// Atoms named exactly `N` or `O` outside solvent.
    hbond_atoms: Selection,
    /// Primary-conformer `N*`/`O*` atoms outside solvent.
    polar_atoms: Selection,
}

impl PreparedDomain {
    pub fn new<T: Toolkit + ?Sized>(toolkit: &T, domain: &Selection) -> Result<Self, Error> {
        let base = || Query::Atoms(domain.clone()).and(Query::Solvent.negate());

        let hbond_atoms = toolkit.select(&base().and(Query::names(["N", "O"])))?;
        let polar_atoms = toolkit.select(
            &base()
                .and(Query::names(["N*", "O*"]))
                .and(Query::primary_conformer()),
        )?;

        Ok(Self {
            hbond_atoms,
            polar_atoms,
        })
    }

    pub fn hbond_candidates(&self) -> usize {
        self.hbond_atoms.len()
    }

    pub fn polar_candidates(&self) -> usize {
        self.polar_atoms.len()
    }
}

pub struct ContactFinder<'a, T: ?Sized> {
    toolkit: &'a T,
    config: &'a BridgeConfig,
}

impl<'a, T: Toolkit + ?Sized> ContactFinder<'a, T> {
    pub fn new(toolkit: &'a T, config: &'a BridgeConfig) -> Self {
        Self { toolkit, config }
    }

    /// Hydrogen bonds between the domain and the water, searched in both donor directions.
    ///
    /// Each domain atom appears at most once even when it bonds in both directions.
    pub fn hydrogen_bonds(
        &self,
        domain: &PreparedDomain,
        water: &AtomRef,
    ) -> Result<Vec<AtomPairContact>, Error> {
        let water_selection = Selection::single(water.clone());
        let (cutoff, angle) = (
            self.config.hbond_distance_cutoff,
            self.config.hbond_angle_cutoff,
        );

        let donated = self.toolkit.find_pairs(
            &domain.hbond_atoms,
            &water_selection,
            PairMode::HydrogenBond,
            cutoff,
            angle,
        );
        let accepted = self.toolkit.find_pairs(
            &water_selection,
            &domain.hbond_atoms,
            PairMode::HydrogenBond,
            cutoff,
            angle,
        );

        let partners: Selection = donated
            .into_iter()
            .map(|(domain_atom, _)| domain_atom)
            .chain(accepted.into_iter().map(|(_, domain_atom)| domain_atom))
            .collect();

        self.measure(&partners, water)
    }

    /// Hydrogen bonds of the side, or its polar contacts when it has none.
    pub fn side(&self, domain: &PreparedDomain, water: &AtomRef) -> Result<SideContacts, Error> {
        let bonds = self.hydrogen_bonds(domain, water)?;
        if !bonds.is_empty() {
            return Ok(SideContacts::HydrogenBonds(bonds));
        }
        let polar = self.polar_contacts(domain, water)?;
        if polar.is_empty() {
            Ok(SideContacts::None)
        } else {
            Ok(SideContacts::PolarContacts(polar))
        }
    }

    /// Polar atoms of the domain within the residue-water cutoff of the water, by distance only.
    pub fn polar_contacts(
        &self,
        domain: &PreparedDomain,
        water: &AtomRef,
    ) -> Result<Vec<AtomPairContact>, Error> {
        let cutoff = self.config.residue_water_distance();
        let around = self
            .toolkit
            .within(cutoff, &Selection::single(water.clone()));
        let candidates = around.intersection(&domain.polar_atoms);

        let contacts = self
            .measure(&candidates, water)?
            .into_iter()
            .filter(|contact| contact.distance <= cutoff)
            .collect();
        Ok(contacts)
    }

    fn measure(
        &self,
        partners: &Selection,
        water: &AtomRef,
    ) -> Result<Vec<AtomPairContact>, Error> {
        if partners.is_empty() {
            return Ok(Vec::new());
        }
        let water_pos = self
            .toolkit
            .atom_coordinates(&Selection::single(water.clone()))?;

        let positions: BTreeMap<AtomRef, Point> = self
            .toolkit
            .list_atoms(partners)
            .into_iter()
            .map(|record| (record.atom, record.pos))
            .collect();

        Ok(positions
            .into_iter()
            .map(|(domain_atom, pos)| AtomPairContact {
                domain_atom,
                water: water.clone(),
                distance: geometry::distance(&pos, &water_pos),
            })
            .collect())
    }
}
