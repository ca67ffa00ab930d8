use super::hbond::{self, DonorHydrogens};
use super::{AtomRecord, Error, PairMode, Toolkit};
use crate::analysis::geometry;
use crate::model::grid::Grid;
use crate::model::structure::Structure;
use crate::model::types::{Element, Point, ResidueCategory, StandardResidue};
use crate::select::{AtomRef, Query, Selection};
use smol_str::SmolStr;

const GRID_CELL_SIZE: f64 = 4.0;
const BACKBONE_ATOMS: [&str; 5] = ["N", "CA", "C", "O", "OXT"];

/// In-memory toolkit over a single loaded structure.
///
/// Atoms are flattened in chain, residue, atom order; that order fixes the [`AtomRef`]
/// indices handed out by every query.
#[derive(Debug, Clone)]
pub struct StructureToolkit {
    object: SmolStr,
    records: Vec<AtomRecord>,
    standards: Vec<Option<StandardResidue>>,
    grid: Grid<usize>,
}

impl StructureToolkit {
    pub fn new(structure: &Structure) -> Self {
        let object = SmolStr::new(&structure.name);
        let mut records = Vec::with_capacity(structure.atom_count());
        let mut standards = Vec::with_capacity(structure.atom_count());

        for (index, (chain, residue, atom)) in structure.iter_atoms_with_context().enumerate() {
            records.push(AtomRecord {
                atom: AtomRef::new(object.clone(), index),
                chain: SmolStr::new(&chain.id),
                residue_number: residue.id,
                insertion_code: residue.insertion_code,
                residue_name: SmolStr::new(&residue.name),
                name: atom.name.clone(),
                element: atom.element,
                alt_loc: atom.alt_loc,
                pos: atom.pos,
                category: residue.category,
            });
            standards.push(residue.standard_name);
        }

        let grid = Grid::new(records.iter().map(|r| (r.pos, r.atom.index)), GRID_CELL_SIZE);

        log::debug!(
            "indexed {} atoms of object '{}' ({} chains)",
            grid.len(),
            object,
            structure.chain_count()
        );

        Self {
            object,
            records,
            standards,
            grid,
        }
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn atom_count(&self) -> usize {
        self.records.len()
    }

    pub fn record(&self, atom: &AtomRef) -> Option<&AtomRecord> {
        self.slot(atom).map(|i| &self.records[i])
    }

    fn slot(&self, atom: &AtomRef) -> Option<usize> {
        (atom.object == self.object && atom.index < self.records.len()).then_some(atom.index)
    }

    fn filter<F>(&self, predicate: F) -> Vec<bool>
    where
        F: Fn(&AtomRecord, Option<StandardResidue>) -> bool,
    {
        self.records
            .iter()
            .zip(&self.standards)
            .map(|(record, standard)| predicate(record, *standard))
            .collect()
    }

    fn evaluate(&self, query: &Query) -> Result<Vec<bool>, Error> {
        let mask = match query {
            Query::All => vec![true; self.records.len()],
            Query::None => vec![false; self.records.len()],
            Query::Chain(ids) => self.filter(|r, _| ids.iter().any(|id| id == r.chain.as_str())),
            Query::ResidueName(names) => self.filter(|r, _| {
                names
                    .iter()
                    .any(|name| name.eq_ignore_ascii_case(&r.residue_name))
            }),
            Query::ResidueNumber(ranges) => self.filter(|r, _| {
                ranges
                    .iter()
                    .any(|(start, end)| (*start..=*end).contains(&r.residue_number))
            }),
            Query::AtomName(patterns) => {
                self.filter(|r, _| patterns.iter().any(|p| p.matches(&r.name)))
            }
            Query::Element(elements) => self.filter(|r, _| elements.contains(&r.element)),
            Query::AltLoc(alt) => self.filter(|r, _| r.alt_loc == *alt),
            Query::Solvent => self.filter(|r, _| r.category == ResidueCategory::Solvent),
            Query::Polymer => self.filter(|r, _| r.category == ResidueCategory::Standard),
            Query::Hetero => self.filter(|r, _| {
                matches!(r.category, ResidueCategory::Hetero | ResidueCategory::Ion)
            }),
            Query::Backbone => self.filter(|r, standard| {
                standard.is_some_and(|s| s.is_protein())
                    && BACKBONE_ATOMS.contains(&r.name.as_str())
            }),
            Query::Within(radius, inner) => {
                if !radius.is_finite() || *radius < 0.0 {
                    return Err(Error::InvalidDistance { value: *radius });
                }
                let target = self.evaluate(inner)?;
                self.expand(&target, *radius)
            }
            Query::Atoms(selection) => {
                let mut mask = vec![false; self.records.len()];
                for atom in selection {
                    let slot = self
                        .slot(atom)
                        .ok_or_else(|| Error::UnknownAtom { atom: atom.clone() })?;
                    mask[slot] = true;
                }
                mask
            }
            Query::And(left, right) => {
                let mut mask = self.evaluate(left)?;
                for (m, r) in mask.iter_mut().zip(self.evaluate(right)?) {
                    *m &= r;
                }
                mask
            }
            Query::Or(left, right) => {
                let mut mask = self.evaluate(left)?;
                for (m, r) in mask.iter_mut().zip(self.evaluate(right)?) {
                    *m |= r;
                }
                mask
            }
            Query::Not(inner) => self.evaluate(inner)?.into_iter().map(|m| !m).collect(),
        };
        Ok(mask)
    }

    /// Marks every atom lying within `radius` of a marked atom.
    fn expand(&self, target: &[bool], radius: f64) -> Vec<bool> {
        if !target.iter().any(|&t| t) {
            return vec![false; self.records.len()];
        }
        self.records
            .iter()
            .map(|r| self.grid.any_within(&r.pos, radius, |&j| target[j]))
            .collect()
    }

    /// Mask of the atoms of `selection` held by this toolkit; foreign atoms are ignored.
    fn known_mask(&self, selection: &Selection) -> Vec<bool> {
        let mut mask = vec![false; self.records.len()];
        for slot in selection.iter().filter_map(|a| self.slot(a)) {
            mask[slot] = true;
        }
        mask
    }

    fn to_selection(&self, mask: &[bool]) -> Selection {
        mask.iter()
            .zip(&self.records)
            .filter(|(selected, _)| **selected)
            .map(|(_, record)| record.atom.clone())
            .collect()
    }

    fn donor_hydrogens(&self, donor: usize) -> DonorHydrogens {
        let record = &self.records[donor];
        let mut hydrogens: Vec<Point> = Vec::new();
        let mut heavy: Vec<Point> = Vec::new();

        for (pos, &j) in self.grid.within(&record.pos, hbond::MAX_HEAVY_BOND_LENGTH) {
            if j == donor {
                continue;
            }
            let other = &self.records[j];
            if !hbond::conformers_compatible(record.alt_loc, other.alt_loc) {
                continue;
            }
            if other.same_residue(record) && other.name == record.name {
                continue;
            }
            if other.element == Element::H {
                if geometry::distance(pos, &record.pos) <= hbond::MAX_HYDROGEN_BOND_LENGTH {
                    hydrogens.push(*pos);
                }
            } else if other.element.is_heavy_atom() {
                heavy.push(*pos);
            }
        }

        DonorHydrogens::resolve(&record.pos, hydrogens, &heavy)
    }

    fn is_hydrogen_bond(
        &self,
        donor: usize,
        acceptor: usize,
        hydrogens: &DonorHydrogens,
        angle: f64,
    ) -> bool {
        let (d, a) = (&self.records[donor], &self.records[acceptor]);
        if !hbond::is_acceptor(a, self.standards[acceptor]) {
            return false;
        }
        // Covalently bonded partners never form a hydrogen bond.
        if geometry::distance(&d.pos, &a.pos) <= hbond::MAX_HEAVY_BOND_LENGTH {
            return false;
        }
        hydrogens.admits(&d.pos, &a.pos, angle)
    }
}

impl Toolkit for StructureToolkit {
    fn select(&self, query: &Query) -> Result<Selection, Error> {
        let mask = self.evaluate(query)?;
        Ok(self.to_selection(&mask))
    }

    fn count_atoms(&self, selection: &Selection) -> usize {
        selection.iter().filter(|a| self.slot(a).is_some()).count()
    }

    fn within(&self, radius: f64, selection: &Selection) -> Selection {
        let target = self.known_mask(selection);
        self.to_selection(&self.expand(&target, radius))
    }

    fn find_pairs(
        &self,
        first: &Selection,
        second: &Selection,
        mode: PairMode,
        cutoff: f64,
        angle: f64,
    ) -> Vec<(AtomRef, AtomRef)> {
        let partners_allowed = self.known_mask(second);
        let mut pairs = Vec::new();

        for i in first.iter().filter_map(|a| self.slot(a)) {
            let record = &self.records[i];
            let hydrogens = match mode {
                PairMode::Any => None,
                PairMode::HydrogenBond => {
                    if !hbond::is_donor(record, self.standards[i]) {
                        continue;
                    }
                    Some(self.donor_hydrogens(i))
                }
            };

            let mut partners: Vec<usize> = self
                .grid
                .within(&record.pos, cutoff)
                .map(|(_, &j)| j)
                .filter(|&j| j != i && partners_allowed[j])
                .collect();
            partners.sort_unstable();

            for j in partners {
                if let Some(hydrogens) = &hydrogens {
                    if !self.is_hydrogen_bond(i, j, hydrogens, angle) {
                        continue;
                    }
                }
                pairs.push((record.atom.clone(), self.records[j].atom.clone()));
            }
        }

        pairs
    }

    fn atom_coordinates(&self, selection: &Selection) -> Result<Point, Error> {
        let mut atoms = selection.iter();
        match (atoms.next(), atoms.next()) {
            (Some(atom), None) => self
                .record(atom)
                .map(|r| r.pos)
                .ok_or_else(|| Error::UnknownAtom { atom: atom.clone() }),
            _ => Err(Error::ambiguous(selection.len())),
        }
    }

    fn list_atoms(&self, selection: &Selection) -> Vec<AtomRecord> {
        selection
            .iter()
            .filter_map(|a| self.record(a))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::chain::Chain;
    use crate::model::residue::Residue;

    fn residue(
        id: i32,
        name: &str,
        standard: Option<StandardResidue>,
        category: ResidueCategory,
        atoms: &[(&str, Element, [f64; 3])],
    ) -> Residue {
        let mut residue = Residue::new(id, None, name, standard, category);
        for (atom_name, element, [x, y, z]) in atoms {
            residue.add_atom(Atom::new(atom_name, *element, Point::new(*x, *y, *z)));
        }
        residue
    }

    fn water(id: i32, pos: [f64; 3]) -> Residue {
        residue(
            id,
            "HOH",
            Some(StandardResidue::HOH),
            ResidueCategory::Solvent,
            &[("O", Element::O, pos)],
        )
    }

    /// Chain A glycine whose amide N sits at the origin, chain B alanine carbonyl, and waters.
    fn toolkit() -> StructureToolkit {
        let mut structure = Structure::new("test");

        let mut chain_a = Chain::new("A");
        chain_a.add_residue(residue(
            1,
            "GLY",
            Some(StandardResidue::GLY),
            ResidueCategory::Standard,
            &[
                ("N", Element::N, [0.0, 0.0, 0.0]),
                ("CA", Element::C, [-1.0, 1.0, 0.0]),
                ("C", Element::C, [-2.4, 1.0, 0.0]),
            ],
        ));
        chain_a.add_residue(residue(
            2,
            "ALA",
            Some(StandardResidue::ALA),
            ResidueCategory::Standard,
            &[("N", Element::N, [-1.0, -1.0, 0.0])],
        ));
        chain_a.add_residue(water(301, [2.9, 0.0, 0.0]));
        chain_a.add_residue(water(302, [-2.9, 0.0, 0.0]));
        structure.add_chain(chain_a);

        let mut chain_b = Chain::new("B");
        chain_b.add_residue(residue(
            5,
            "ALA",
            Some(StandardResidue::ALA),
            ResidueCategory::Standard,
            &[
                ("C", Element::C, [6.1, 0.0, 0.0]),
                ("O", Element::O, [5.0, 0.0, 0.0]),
            ],
        ));
        structure.add_chain(chain_b);

        StructureToolkit::new(&structure)
    }

    fn select(toolkit: &StructureToolkit, expression: &str) -> Selection {
        toolkit.select(&expression.parse().unwrap()).unwrap()
    }

    fn indices(selection: &Selection) -> Vec<usize> {
        selection.iter().map(|a| a.index).collect()
    }

    #[test]
    fn new_flattens_atoms_in_structure_order() {
        let toolkit = toolkit();

        assert_eq!(toolkit.object(), "test");
        assert_eq!(toolkit.atom_count(), 8);
        let names: Vec<_> = toolkit
            .list_atoms(&select(&toolkit, "all"))
            .iter()
            .map(|r| format!("{}{}{}", r.chain, r.residue_number, r.name))
            .collect();
        assert_eq!(
            names,
            vec!["A1N", "A1CA", "A1C", "A2N", "A301O", "A302O", "B5C", "B5O"]
        );
    }

    #[test]
    fn select_evaluates_keywords_and_boolean_operators() {
        let toolkit = toolkit();

        assert_eq!(indices(&select(&toolkit, "solvent")), vec![4, 5]);
        assert_eq!(indices(&select(&toolkit, "chain A and not solvent")), vec![0, 1, 2, 3]);
        assert_eq!(indices(&select(&toolkit, "name N,O and polymer")), vec![0, 3, 7]);
        assert_eq!(indices(&select(&toolkit, "resi 2-5")), vec![3, 6, 7]);
        assert_eq!(indices(&select(&toolkit, "backbone and chain B")), vec![6, 7]);
        assert!(select(&toolkit, "hetatm").is_empty());
    }

    #[test]
    fn select_within_is_inclusive_and_contains_target() {
        let toolkit = toolkit();

        let near = select(&toolkit, "solvent within 2.9 of (chain A and resi 1 and name N)");
        assert_eq!(indices(&near), vec![4, 5]);

        let around = select(&toolkit, "within 0 of chain B");
        assert_eq!(indices(&around), vec![6, 7]);
    }

    #[test]
    fn select_rejects_foreign_atoms() {
        let toolkit = toolkit();
        let foreign = Selection::single(AtomRef::new("other", 0));

        assert_eq!(
            toolkit.select(&Query::Atoms(foreign)).unwrap_err(),
            Error::UnknownAtom {
                atom: AtomRef::new("other", 0)
            }
        );
    }

    #[test]
    fn select_rejects_negative_within_distance() {
        let toolkit = toolkit();

        assert_eq!(
            toolkit
                .select(&Query::within(-1.0, Query::All))
                .unwrap_err(),
            Error::InvalidDistance { value: -1.0 }
        );
    }

    #[test]
    fn within_expands_selection_by_radius() {
        let toolkit = toolkit();
        let carbonyl = select(&toolkit, "chain B and name O");

        let near = toolkit.within(2.1, &carbonyl);

        assert_eq!(indices(&near), vec![4, 6, 7]);
    }

    #[test]
    fn find_pairs_any_mode_uses_distance_only() {
        let toolkit = toolkit();
        let waters = select(&toolkit, "solvent");
        let nitrogens = select(&toolkit, "name N");

        let pairs = toolkit.find_pairs(&nitrogens, &waters, PairMode::Any, 3.0, 120.0);

        let idx: Vec<_> = pairs.iter().map(|(a, b)| (a.index, b.index)).collect();
        assert_eq!(idx, vec![(0, 4), (0, 5), (3, 5)]);
    }

    #[test]
    fn find_pairs_hbond_accepts_water_along_virtual_hydrogen() {
        let toolkit = toolkit();
        let donor = select(&toolkit, "chain A and resi 1 and name N");
        let water = select(&toolkit, "resi 301");

        let pairs = toolkit.find_pairs(&donor, &water, PairMode::HydrogenBond, 3.5, 120.0);

        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn find_pairs_hbond_rejects_water_behind_donor() {
        let toolkit = toolkit();
        let donor = select(&toolkit, "chain A and resi 1 and name N");
        let water = select(&toolkit, "resi 302");

        let pairs = toolkit.find_pairs(&donor, &water, PairMode::HydrogenBond, 3.5, 120.0);

        assert!(pairs.is_empty());
    }

    #[test]
    fn find_pairs_hbond_requires_donor_in_first_selection() {
        let toolkit = toolkit();
        let carbonyl = select(&toolkit, "chain B and name O");
        let water = select(&toolkit, "resi 301");

        let forward = toolkit.find_pairs(&carbonyl, &water, PairMode::HydrogenBond, 3.5, 120.0);
        let reverse = toolkit.find_pairs(&water, &carbonyl, PairMode::HydrogenBond, 3.5, 120.0);

        assert!(forward.is_empty());
        assert_eq!(reverse.len(), 1);
    }

    #[test]
    fn atom_coordinates_requires_single_atom() {
        let toolkit = toolkit();

        let pos = toolkit
            .atom_coordinates(&select(&toolkit, "resi 301"))
            .unwrap();
        assert_eq!(pos, Point::new(2.9, 0.0, 0.0));

        assert_eq!(
            toolkit
                .atom_coordinates(&select(&toolkit, "solvent"))
                .unwrap_err(),
            Error::ambiguous(2)
        );
        assert_eq!(
            toolkit.atom_coordinates(&Selection::new()).unwrap_err(),
            Error::ambiguous(0)
        );
    }

    #[test]
    fn count_atoms_ignores_foreign_atoms() {
        let toolkit = toolkit();
        let mut selection = select(&toolkit, "solvent");
        selection.insert(AtomRef::new("other", 1));

        assert_eq!(toolkit.count_atoms(&selection), 2);
        assert_eq!(toolkit.list_atoms(&selection).len(), 2);
    }

    #[test]
    fn alt_loc_query_separates_conformers() {
        let mut structure = Structure::new("alt");
        let mut chain = Chain::new("A");
        let mut serine = Residue::new(
            7,
            None,
            "SER",
            Some(StandardResidue::SER),
            ResidueCategory::Standard,
        );
        serine.add_atom(Atom::new("N", Element::N, Point::origin()));
        serine.add_atom(Atom::new("OG", Element::O, Point::new(2.0, 0.0, 0.0)).with_alt_loc('A'));
        serine.add_atom(Atom::new("OG", Element::O, Point::new(2.0, 1.0, 0.0)).with_alt_loc('B'));
        chain.add_residue(serine);
        structure.add_chain(chain);
        let toolkit = StructureToolkit::new(&structure);

        assert_eq!(indices(&select(&toolkit, "alt \"\"")), vec![0]);
        assert_eq!(indices(&select(&toolkit, "alt B")), vec![2]);
    }
}
