use super::atom::Atom;
use super::types::{ResidueCategory, StandardResidue};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub id: i32,
    pub insertion_code: Option<char>,
    pub name: String,
    pub standard_name: Option<StandardResidue>,
    pub category: ResidueCategory,
    atoms: Vec<Atom>,
}

impl Residue {
    pub fn new(
        id: i32,
        insertion_code: Option<char>,
        name: &str,
        standard_name: Option<StandardResidue>,
        category: ResidueCategory,
    ) -> Self {
        Self {
            id,
            insertion_code,
            name: name.to_string(),
            standard_name,
            category,
            atoms: Vec::new(),
        }
    }

    pub fn is_solvent(&self) -> bool {
        self.category == ResidueCategory::Solvent
    }

    /// Adds an atom; alternate conformers may share a name but not an alt-loc label.
    pub fn add_atom(&mut self, atom: Atom) {
        debug_assert!(
            self.atom_conformer(&atom.name, atom.alt_loc).is_none(),
            "Attempted to add a duplicate atom '{}' (alt {:?}) to residue '{}'",
            atom.name,
            atom.alt_loc,
            self.name
        );
        self.atoms.push(atom);
    }

    /// Returns the first atom with the given name, whatever its conformer.
    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    pub fn atom_conformer(&self, name: &str, alt_loc: Option<char>) -> Option<&Atom> {
        self.atoms
            .iter()
            .find(|a| a.name == name && a.alt_loc == alt_loc)
    }

    pub fn has_atom(&self, name: &str) -> bool {
        self.atom(name).is_some()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter_atoms(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icode = self.insertion_code.map(String::from).unwrap_or_default();
        write!(
            f,
            "Residue {{ id: {}{}, name: \"{}\", category: {}, atoms: {} }}",
            self.id,
            icode,
            self.name,
            self.category,
            self.atom_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{Element, Point};

    fn serine() -> Residue {
        Residue::new(
            12,
            None,
            "SER",
            Some(StandardResidue::SER),
            ResidueCategory::Standard,
        )
    }

    #[test]
    fn residue_add_atom_keeps_alternate_conformers() {
        let mut residue = serine();
        residue.add_atom(Atom::new("OG", Element::O, Point::origin()).with_alt_loc('A'));
        residue.add_atom(Atom::new("OG", Element::O, Point::new(0.4, 0.0, 0.0)).with_alt_loc('B'));

        assert_eq!(residue.atom_count(), 2);
        assert!(residue.atom_conformer("OG", Some('B')).is_some());
        assert!(residue.atom_conformer("OG", None).is_none());
    }

    #[test]
    fn residue_atom_returns_first_match_by_name() {
        let mut residue = serine();
        residue.add_atom(Atom::new("N", Element::N, Point::new(1.0, 0.0, 0.0)));

        assert!(residue.has_atom("N"));
        assert!(!residue.has_atom("CA"));
        assert_eq!(residue.atom("N").unwrap().pos.x, 1.0);
    }

    #[test]
    fn residue_is_solvent_follows_category() {
        let water = Residue::new(
            301,
            None,
            "HOH",
            Some(StandardResidue::HOH),
            ResidueCategory::Solvent,
        );

        assert!(water.is_solvent());
        assert!(!serine().is_solvent());
    }

    #[test]
    fn residue_display_includes_insertion_code() {
        let residue = Residue::new(
            52,
            Some('A'),
            "GLY",
            Some(StandardResidue::GLY),
            ResidueCategory::Standard,
        );

        assert_eq!(
            residue.to_string(),
            "Residue { id: 52A, name: \"GLY\", category: Standard Residue, atoms: 0 }"
        );
    }
}
