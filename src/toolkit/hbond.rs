//! Donor/acceptor typing and hydrogen placement for directional pair searches.

use super::AtomRecord;
use crate::analysis::geometry;
use crate::model::types::{Element, Point, ResidueCategory, StandardResidue};

/// Longest donor-hydrogen distance treated as a covalent bond.
pub(super) const MAX_HYDROGEN_BOND_LENGTH: f64 = 1.3;
/// Longest heavy-atom distance treated as a covalent bond.
pub(super) const MAX_HEAVY_BOND_LENGTH: f64 = 1.9;
const VIRTUAL_HYDROGEN_LENGTH: f64 = 1.0;

const HYDROXYL_OXYGENS: [&str; 3] = ["OG", "OG1", "OH"];
const HISTIDINE_RING_NITROGENS: [&str; 2] = ["ND1", "NE2"];

pub(super) fn is_donor(record: &AtomRecord, standard: Option<StandardResidue>) -> bool {
    match record.element {
        Element::N => !(standard == Some(StandardResidue::PRO) && record.name == "N"),
        Element::O => match record.category {
            ResidueCategory::Solvent | ResidueCategory::Hetero | ResidueCategory::Ion => true,
            ResidueCategory::Standard => HYDROXYL_OXYGENS.contains(&record.name.as_str()),
        },
        _ => false,
    }
}

pub(super) fn is_acceptor(record: &AtomRecord, standard: Option<StandardResidue>) -> bool {
    match record.element {
        Element::O => true,
        Element::N => match record.category {
            ResidueCategory::Standard => {
                standard == Some(StandardResidue::HIS)
                    && HISTIDINE_RING_NITROGENS.contains(&record.name.as_str())
            }
            _ => true,
        },
        _ => false,
    }
}

/// Alternate conformers only see atoms of their own conformer or of the shared primary one.
pub(super) fn conformers_compatible(a: Option<char>, b: Option<char>) -> bool {
    a.is_none() || b.is_none() || a == b
}

/// Where the hydrogens of a donor are, as far as the structure tells.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum DonorHydrogens {
    Explicit(Vec<Point>),
    Virtual(Point),
    /// No hydrogens and too few bonded heavy atoms to orient one.
    Undetermined,
}

impl DonorHydrogens {
    /// Prefers explicit hydrogens; otherwise places one hydrogen opposite the mean bond
    /// direction when at least two heavy atoms are bonded to the donor. A single heavy
    /// neighbor leaves the hydrogen free to rotate, so it stays undetermined.
    pub(super) fn resolve(donor: &Point, hydrogens: Vec<Point>, heavy_neighbors: &[Point]) -> Self {
        if !hydrogens.is_empty() {
            return DonorHydrogens::Explicit(hydrogens);
        }
        if heavy_neighbors.len() < 2 {
            return DonorHydrogens::Undetermined;
        }

        let direction = heavy_neighbors
            .iter()
            .filter_map(|n| (donor - n).try_normalize(f64::EPSILON))
            .sum::<nalgebra::Vector3<f64>>();

        match direction.try_normalize(1e-6) {
            Some(unit) => DonorHydrogens::Virtual(donor + unit * VIRTUAL_HYDROGEN_LENGTH),
            None => DonorHydrogens::Undetermined,
        }
    }

    /// Checks the donor-hydrogen-acceptor angle against `min_angle` degrees.
    pub(super) fn admits(&self, donor: &Point, acceptor: &Point, min_angle: f64) -> bool {
        match self {
            DonorHydrogens::Explicit(hydrogens) => hydrogens
                .iter()
                .any(|h| geometry::angle(donor, h, acceptor) >= min_angle),
            DonorHydrogens::Virtual(h) => geometry::angle(donor, h, acceptor) >= min_angle,
            DonorHydrogens::Undetermined => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::AtomRef;

    fn record(name: &str, element: Element, resn: &str, category: ResidueCategory) -> AtomRecord {
        AtomRecord {
            atom: AtomRef::new("obj", 0),
            chain: "A".into(),
            residue_number: 1,
            insertion_code: None,
            residue_name: resn.into(),
            name: name.into(),
            element,
            alt_loc: None,
            pos: Point::origin(),
            category,
        }
    }

    #[test]
    fn backbone_nitrogen_donates_except_in_proline() {
        let gly_n = record("N", Element::N, "GLY", ResidueCategory::Standard);
        let pro_n = record("N", Element::N, "PRO", ResidueCategory::Standard);

        assert!(is_donor(&gly_n, Some(StandardResidue::GLY)));
        assert!(!is_donor(&pro_n, Some(StandardResidue::PRO)));
        assert!(!is_acceptor(&gly_n, Some(StandardResidue::GLY)));
    }

    #[test]
    fn water_and_hydroxyl_oxygens_donate_and_accept() {
        let water = record("O", Element::O, "HOH", ResidueCategory::Solvent);
        let serine = record("OG", Element::O, "SER", ResidueCategory::Standard);

        assert!(is_donor(&water, Some(StandardResidue::HOH)));
        assert!(is_acceptor(&water, Some(StandardResidue::HOH)));
        assert!(is_donor(&serine, Some(StandardResidue::SER)));
        assert!(is_acceptor(&serine, Some(StandardResidue::SER)));
    }

    #[test]
    fn carbonyl_oxygen_only_accepts() {
        let carbonyl = record("O", Element::O, "ALA", ResidueCategory::Standard);

        assert!(!is_donor(&carbonyl, Some(StandardResidue::ALA)));
        assert!(is_acceptor(&carbonyl, Some(StandardResidue::ALA)));
    }

    #[test]
    fn histidine_ring_nitrogens_accept() {
        let ne2 = record("NE2", Element::N, "HIS", ResidueCategory::Standard);
        let nz = record("NZ", Element::N, "LYS", ResidueCategory::Standard);

        assert!(is_acceptor(&ne2, Some(StandardResidue::HIS)));
        assert!(is_donor(&ne2, Some(StandardResidue::HIS)));
        assert!(!is_acceptor(&nz, Some(StandardResidue::LYS)));
    }

    #[test]
    fn conformers_compatible_allows_primary_with_any() {
        assert!(conformers_compatible(None, Some('A')));
        assert!(conformers_compatible(Some('B'), Some('B')));
        assert!(!conformers_compatible(Some('A'), Some('B')));
    }

    #[test]
    fn resolve_prefers_explicit_hydrogens() {
        let donor = Point::origin();
        let hydrogens = vec![Point::new(1.0, 0.0, 0.0)];

        let resolved = DonorHydrogens::resolve(&donor, hydrogens.clone(), &[]);

        assert_eq!(resolved, DonorHydrogens::Explicit(hydrogens));
    }

    #[test]
    fn resolve_places_virtual_hydrogen_on_bisector() {
        let donor = Point::origin();
        let neighbors = [Point::new(-1.0, 1.0, 0.0), Point::new(-1.0, -1.0, 0.0)];

        let resolved = DonorHydrogens::resolve(&donor, Vec::new(), &neighbors);

        match resolved {
            DonorHydrogens::Virtual(h) => {
                assert!((h - Point::new(1.0, 0.0, 0.0)).norm() < 1e-9);
            }
            other => panic!("expected virtual hydrogen, got {other:?}"),
        }
    }

    #[test]
    fn resolve_leaves_single_neighbor_undetermined() {
        let resolved =
            DonorHydrogens::resolve(&Point::origin(), Vec::new(), &[Point::new(-1.5, 0.0, 0.0)]);

        assert_eq!(resolved, DonorHydrogens::Undetermined);
    }

    #[test]
    fn admits_checks_angle_at_hydrogen() {
        let donor = Point::origin();
        let toward = DonorHydrogens::Explicit(vec![Point::new(1.0, 0.0, 0.0)]);
        let away = DonorHydrogens::Explicit(vec![Point::new(-1.0, 0.0, 0.0)]);
        let acceptor = Point::new(2.9, 0.0, 0.0);

        assert!(toward.admits(&donor, &acceptor, 120.0));
        assert!(!away.admits(&donor, &acceptor, 120.0));
        assert!(DonorHydrogens::Undetermined.admits(&donor, &acceptor, 120.0));
    }
}
