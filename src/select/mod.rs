//! Typed atom selections.
//!
//! A [`Query`] is a predicate over atoms, built either programmatically or by parsing the
//! PyMOL-style text language at the CLI boundary. Evaluating a query against a toolkit yields a
//! [`Selection`], an explicit set of [`AtomRef`]s that is passed around by value instead of being
//! registered under a global name.

mod error;
mod parser;

pub use error::SelectionError;
pub use parser::parse;

use crate::model::types::Element;
use smol_str::SmolStr;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Stable handle to one atom of a loaded object.
///
/// `index` is the zero-based position of the atom in the owning object's atom table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AtomRef {
    pub object: SmolStr,
    pub index: usize,
}

impl AtomRef {
    pub fn new(object: impl Into<SmolStr>, index: usize) -> Self {
        Self {
            object: object.into(),
            index,
        }
    }
}

impl fmt::Display for AtomRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}`{}", self.object, self.index + 1)
    }
}

/// An ordered, duplicate-free set of atoms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    atoms: BTreeSet<AtomRef>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(atom: AtomRef) -> Self {
        Self {
            atoms: BTreeSet::from([atom]),
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains(&self, atom: &AtomRef) -> bool {
        self.atoms.contains(atom)
    }

    pub fn insert(&mut self, atom: AtomRef) -> bool {
        self.atoms.insert(atom)
    }

    /// Iterates in ascending `(object, index)` order.
    pub fn iter(&self) -> impl Iterator<Item = &AtomRef> {
        self.atoms.iter()
    }

    pub fn union(&self, other: &Selection) -> Selection {
        self.atoms.union(&other.atoms).cloned().collect()
    }

    pub fn intersection(&self, other: &Selection) -> Selection {
        self.atoms.intersection(&other.atoms).cloned().collect()
    }

    pub fn difference(&self, other: &Selection) -> Selection {
        self.atoms.difference(&other.atoms).cloned().collect()
    }
}

impl FromIterator<AtomRef> for Selection {
    fn from_iter<I: IntoIterator<Item = AtomRef>>(iter: I) -> Self {
        Self {
            atoms: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a AtomRef;
    type IntoIter = std::collections::btree_set::Iter<'a, AtomRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}

/// Atom-name matcher; a trailing `*` in the text form makes a prefix match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePattern {
    Exact(String),
    Prefix(String),
}

impl NamePattern {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Exact(expected) => name.eq_ignore_ascii_case(expected),
            NamePattern::Prefix(prefix) => name
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix)),
        }
    }
}

impl From<&str> for NamePattern {
    fn from(text: &str) -> Self {
        match text.strip_suffix('*') {
            Some(prefix) => NamePattern::Prefix(prefix.to_string()),
            None => NamePattern::Exact(text.to_string()),
        }
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamePattern::Exact(name) => write!(f, "{name}"),
            NamePattern::Prefix(prefix) => write!(f, "{prefix}*"),
        }
    }
}

/// Atom predicate evaluated by a [`Toolkit`](crate::toolkit::Toolkit).
///
/// Residue names and atom names compare case-insensitively; chain identifiers compare exactly.
/// Residue-number ranges are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    All,
    None,
    Chain(Vec<String>),
    ResidueName(Vec<String>),
    ResidueNumber(Vec<(i32, i32)>),
    AtomName(Vec<NamePattern>),
    Element(Vec<Element>),
    /// `None` selects the primary conformer (blank alternate-location indicator).
    AltLoc(Option<char>),
    /// Water residues.
    Solvent,
    /// Standard amino-acid and nucleotide residues.
    Polymer,
    /// Everything that is neither polymer nor solvent.
    Hetero,
    /// Protein backbone atoms `N`, `CA`, `C`, `O`, `OXT`.
    Backbone,
    /// Atoms within the given distance (Å, inclusive) of any atom matched by the inner query.
    Within(f64, Box<Query>),
    /// A previously evaluated selection.
    Atoms(Selection),
    And(Box<Query>, Box<Query>),
    Or(Box<Query>, Box<Query>),
    Not(Box<Query>),
}

impl Query {
    pub fn chain(id: &str) -> Self {
        Query::Chain(vec![id.to_string()])
    }

    pub fn residue_name(name: &str) -> Self {
        Query::ResidueName(vec![name.to_string()])
    }

    pub fn residue_number(number: i32) -> Self {
        Query::ResidueNumber(vec![(number, number)])
    }

    pub fn names<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Self {
        Query::AtomName(patterns.into_iter().map(NamePattern::from).collect())
    }

    pub fn primary_conformer() -> Self {
        Query::AltLoc(None)
    }

    pub fn within(distance: f64, target: Query) -> Self {
        Query::Within(distance, Box::new(target))
    }

    pub fn and(self, other: Query) -> Self {
        Query::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Query) -> Self {
        Query::Or(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Self {
        Query::Not(Box::new(self))
    }
}

impl From<Selection> for Query {
    fn from(selection: Selection) -> Self {
        Query::Atoms(selection)
    }
}

impl FromStr for Query {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(indices: &[usize]) -> Selection {
        indices.iter().map(|&i| AtomRef::new("obj", i)).collect()
    }

    #[test]
    fn selection_set_operations_follow_set_semantics() {
        let a = refs(&[0, 1, 2]);
        let b = refs(&[2, 3]);

        assert_eq!(a.union(&b), refs(&[0, 1, 2, 3]));
        assert_eq!(a.intersection(&b), refs(&[2]));
        assert_eq!(a.difference(&b), refs(&[0, 1]));
    }

    #[test]
    fn selection_iterates_in_ascending_order() {
        let selection = refs(&[9, 3, 5, 3]);

        let order: Vec<_> = selection.iter().map(|a| a.index).collect();
        assert_eq!(order, vec![3, 5, 9]);
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn selection_single_holds_exactly_one_atom() {
        let atom = AtomRef::new("obj", 4);
        let selection = Selection::single(atom.clone());

        assert_eq!(selection.len(), 1);
        assert!(selection.contains(&atom));
    }

    #[test]
    fn name_pattern_prefix_matches_family() {
        let pattern = NamePattern::from("O*");

        assert!(pattern.matches("O"));
        assert!(pattern.matches("OD1"));
        assert!(!pattern.matches("NZ"));
        assert_eq!(pattern.to_string(), "O*");
    }

    #[test]
    fn name_pattern_exact_is_case_insensitive() {
        let pattern = NamePattern::from("OG1");

        assert!(pattern.matches("og1"));
        assert!(!pattern.matches("OG"));
    }

    #[test]
    fn query_builders_compose_boolean_trees() {
        let query = Query::chain("A")
            .and(Query::names(["N", "O"]))
            .and(Query::Solvent.negate());

        assert_eq!(
            query,
            Query::And(
                Box::new(Query::And(
                    Box::new(Query::Chain(vec!["A".into()])),
                    Box::new(Query::AtomName(vec![
                        NamePattern::Exact("N".into()),
                        NamePattern::Exact("O".into())
                    ])),
                )),
                Box::new(Query::Not(Box::new(Query::Solvent))),
            )
        );
    }

    #[test]
    fn atom_ref_display_uses_one_based_index() {
        assert_eq!(AtomRef::new("1abc", 0).to_string(), "1abc`1");
    }
}
