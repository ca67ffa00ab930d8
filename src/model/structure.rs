use super::atom::Atom;
use super::chain::Chain;
use super::residue::Residue;
use std::fmt;

/// Default object name given to structures read without a header or file name.
pub const DEFAULT_STRUCTURE_NAME: &str = "structure";

#[derive(Debug, Clone)]
pub struct Structure {
    /// Object name used as the structure id in residue keys and reports.
    pub name: String,
    chains: Vec<Chain>,
}

impl Default for Structure {
    fn default() -> Self {
        Self::new(DEFAULT_STRUCTURE_NAME)
    }
}

impl Structure {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            chains: Vec::new(),
        }
    }

    pub fn add_chain(&mut self, chain: Chain) {
        debug_assert!(
            self.chain(&chain.id).is_none(),
            "Attempted to add a duplicate chain ID '{}'",
            chain.id
        );
        self.chains.push(chain);
    }

    pub fn chain(&self, id: &str) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }

    pub fn find_residue(
        &self,
        chain_id: &str,
        residue_id: i32,
        insertion_code: Option<char>,
    ) -> Option<&Residue> {
        self.chain(chain_id)
            .and_then(|c| c.residue(residue_id, insertion_code))
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(|c| c.residue_count()).sum()
    }

    pub fn atom_count(&self) -> usize {
        self.chains.iter().map(|c| c.iter_atoms().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn iter_chains(&self) -> std::slice::Iter<'_, Chain> {
        self.chains.iter()
    }

    pub fn iter_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.chains.iter().flat_map(|c| c.iter_atoms())
    }

    /// Walks every atom together with its owning chain and residue.
    ///
    /// The traversal order (chain, then residue, then atom) defines the atom indices used by
    /// the toolkit, so it must stay stable for a given structure.
    pub fn iter_atoms_with_context(&self) -> impl Iterator<Item = (&Chain, &Residue, &Atom)> {
        self.iter_chains().flat_map(|chain| {
            chain.iter_residues().flat_map(move |residue| {
                residue.iter_atoms().map(move |atom| (chain, residue, atom))
            })
        })
    }

    pub fn solvent_residue_count(&self) -> usize {
        self.chains
            .iter()
            .flat_map(|c| c.iter_residues())
            .filter(|r| r.is_solvent())
            .count()
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Structure {{ name: \"{}\", chains: {}, residues: {}, atoms: {} }}",
            self.name,
            self.chain_count(),
            self.residue_count(),
            self.atom_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{Element, Point, ResidueCategory, StandardResidue};

    fn build_structure() -> Structure {
        let mut structure = Structure::new("1abc");

        let mut chain_a = Chain::new("A");
        let mut gly = Residue::new(
            1,
            None,
            "GLY",
            Some(StandardResidue::GLY),
            ResidueCategory::Standard,
        );
        gly.add_atom(Atom::new("N", Element::N, Point::new(0.0, 0.0, 0.0)));
        gly.add_atom(Atom::new("CA", Element::C, Point::new(1.4, 0.0, 0.0)));
        chain_a.add_residue(gly);

        let mut water = Residue::new(
            201,
            None,
            "HOH",
            Some(StandardResidue::HOH),
            ResidueCategory::Solvent,
        );
        water.add_atom(Atom::new("O", Element::O, Point::new(3.0, 0.0, 0.0)));
        chain_a.add_residue(water);

        structure.add_chain(chain_a);
        structure
    }

    #[test]
    fn structure_default_uses_placeholder_name() {
        let structure = Structure::default();

        assert_eq!(structure.name, DEFAULT_STRUCTURE_NAME);
        assert!(structure.is_empty());
    }

    #[test]
    fn structure_counts_chains_residues_and_atoms() {
        let structure = build_structure();

        assert_eq!(structure.chain_count(), 1);
        assert_eq!(structure.residue_count(), 2);
        assert_eq!(structure.atom_count(), 3);
        assert_eq!(structure.solvent_residue_count(), 1);
    }

    #[test]
    fn structure_find_residue_resolves_by_chain_and_number() {
        let structure = build_structure();

        let residue = structure.find_residue("A", 201, None);
        assert!(residue.is_some());
        assert_eq!(residue.unwrap().name, "HOH");
        assert!(structure.find_residue("B", 1, None).is_none());
    }

    #[test]
    fn structure_iter_atoms_with_context_preserves_order() {
        let structure = build_structure();

        let labels: Vec<_> = structure
            .iter_atoms_with_context()
            .map(|(c, r, a)| format!("{}/{}/{}", c.id, r.id, a.name))
            .collect();

        assert_eq!(labels, vec!["A/1/N", "A/1/CA", "A/201/O"]);
    }

    #[test]
    fn structure_display_formats_correctly() {
        let structure = build_structure();

        assert_eq!(
            structure.to_string(),
            "Structure { name: \"1abc\", chains: 1, residues: 2, atoms: 3 }"
        );
    }
}
