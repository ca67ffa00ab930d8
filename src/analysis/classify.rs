//! Water-level classification and residue-level aggregation of contacts.

use super::contact::{AtomPairContact, SideContacts};
use crate::select::Selection;
use crate::toolkit::{AtomRecord, AtomSite, ResidueKey, Toolkit};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of bridge a water forms, ordered by strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InteractionCategory {
    HydrogenBond,
    PolarContact,
}

impl InteractionCategory {
    /// Prefix of the distance objects drawn for this category.
    pub fn label_prefix(&self) -> &'static str {
        match self {
            InteractionCategory::HydrogenBond => "hbond",
            InteractionCategory::PolarContact => "polar_contact",
        }
    }
}

impl fmt::Display for InteractionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionCategory::HydrogenBond => f.write_str("Hydrogen Bond"),
            InteractionCategory::PolarContact => f.write_str("Polar Contact"),
        }
    }
}

/// Decides the category of a water from what each side offers.
///
/// A water hydrogen bonded on one side only is still reported, as a polar contact, when the
/// other side reaches it with a polar contact.
pub fn classify(side_a: &SideContacts, side_b: &SideContacts) -> Option<InteractionCategory> {
    match (side_a, side_b) {
        (SideContacts::HydrogenBonds(_), SideContacts::HydrogenBonds(_)) => {
            Some(InteractionCategory::HydrogenBond)
        }
        (SideContacts::HydrogenBonds(_), SideContacts::PolarContacts(_))
        | (SideContacts::PolarContacts(_), SideContacts::HydrogenBonds(_)) => {
            log::debug!("one-sided hydrogen bond downgraded to polar contact");
            Some(InteractionCategory::PolarContact)
        }
        (SideContacts::PolarContacts(_), SideContacts::PolarContacts(_)) => {
            Some(InteractionCategory::PolarContact)
        }
        _ => None,
    }
}

/// One residue-water-residue path.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRecord {
    pub id: usize,
    pub category: InteractionCategory,
    pub atom_a: AtomSite,
    pub water: AtomSite,
    pub atom_b: AtomSite,
    pub distance_a: f64,
    pub distance_b: f64,
    /// Always `distance_a + distance_b`.
    pub total_distance: f64,
}

impl InteractionRecord {
    pub fn residue_a(&self) -> &ResidueKey {
        &self.atom_a.residue
    }

    pub fn residue_b(&self) -> &ResidueKey {
        &self.atom_b.residue
    }

    /// Distance object name shared by both legs, e.g. `hbond_3`.
    pub fn label(&self) -> String {
        format!("{}_{}", self.category.label_prefix(), self.id)
    }
}

/// A contact with its domain atom resolved to a full record.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContact {
    pub record: AtomRecord,
    pub distance: f64,
}

/// Looks up the domain atoms of `contacts`; atoms the toolkit does not know are dropped.
pub fn resolve_contacts<T: Toolkit + ?Sized>(
    toolkit: &T,
    contacts: &[AtomPairContact],
) -> Vec<ResolvedContact> {
    let selection: Selection = contacts.iter().map(|c| c.domain_atom.clone()).collect();
    let records: BTreeMap<_, _> = toolkit
        .list_atoms(&selection)
        .into_iter()
        .map(|record| (record.atom.clone(), record))
        .collect();

    contacts
        .iter()
        .filter_map(|contact| {
            records.get(&contact.domain_atom).map(|record| ResolvedContact {
                record: record.clone(),
                distance: contact.distance,
            })
        })
        .collect()
}

/// Keeps the closest atom of every residue; ties keep the first contact.
fn reduce_to_residues(contacts: Vec<ResolvedContact>) -> BTreeMap<ResidueKey, (AtomSite, f64)> {
    let mut closest: BTreeMap<ResidueKey, (AtomSite, f64)> = BTreeMap::new();

    for contact in contacts {
        if contact.record.is_solvent() {
            log::warn!(
                "skipping solvent atom {} in a domain contact",
                contact.record.site()
            );
            continue;
        }
        let site = contact.record.site();
        match closest.get_mut(&site.residue) {
            Some(best) if best.1 <= contact.distance => {}
            Some(best) => *best = (site, contact.distance),
            None => {
                closest.insert(site.residue.clone(), (site, contact.distance));
            }
        }
    }

    closest
}

/// Accumulates interaction records water by water.
#[derive(Debug)]
pub struct Aggregator {
    max_total_distance: f64,
    next_ids: BTreeMap<InteractionCategory, usize>,
    records: Vec<InteractionRecord>,
}

impl Aggregator {
    pub fn new(max_total_distance: f64) -> Self {
        Self {
            max_total_distance,
            next_ids: BTreeMap::new(),
            records: Vec::new(),
        }
    }

    /// Adds every residue pair bridged by `water` whose path fits the total-distance budget.
    ///
    /// The category's id advances once for the water as soon as both sides keep a residue,
    /// even if no pair survives the budget. Returns the number of records added.
    pub fn add_water(
        &mut self,
        category: InteractionCategory,
        water: AtomSite,
        side_a: Vec<ResolvedContact>,
        side_b: Vec<ResolvedContact>,
    ) -> usize {
        let residues_a = reduce_to_residues(side_a);
        let residues_b = reduce_to_residues(side_b);
        if residues_a.is_empty() || residues_b.is_empty() {
            return 0;
        }

        let counter = self.next_ids.entry(category).or_insert(0);
        *counter += 1;
        let id = *counter;

        let before = self.records.len();
        for (atom_a, distance_a) in residues_a.values() {
            for (atom_b, distance_b) in residues_b.values() {
                let total_distance = distance_a + distance_b;
                if total_distance > self.max_total_distance {
                    continue;
                }
                self.records.push(InteractionRecord {
                    id,
                    category,
                    atom_a: atom_a.clone(),
                    water: water.clone(),
                    atom_b: atom_b.clone(),
                    distance_a: *distance_a,
                    distance_b: *distance_b,
                    total_distance,
                });
            }
        }

        let added = self.records.len() - before;
        log::debug!(
            "water {} ({category}): {} x {} residues, {added} within {:.2} Å",
            water,
            residues_a.len(),
            residues_b.len(),
            self.max_total_distance
        );
        added
    }

    pub fn into_records(self) -> Vec<InteractionRecord> {
        self.records
    }
}
