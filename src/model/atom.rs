//! Fundamental atom representation comprising name, chemical element, alternate location,
//! and Cartesian position.
//!
//! Atoms are instantiated by the PDB reader and flattened into the toolkit's atom table. The
//! alternate-location indicator is kept verbatim so that selections can restrict themselves to
//! the primary conformer instead of silently collapsing disordered sites.

use super::types::{Element, Point};
use smol_str::SmolStr;
use std::fmt;

/// Labeled atom with element identity, optional alternate location, and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Atom name as it appears in crystallographic files (e.g., `OD1`).
    pub name: SmolStr,
    /// Chemical element derived from the element column or the atom name.
    pub element: Element,
    /// Alternate-location indicator; `None` marks the primary conformer.
    pub alt_loc: Option<char>,
    /// Cartesian coordinates measured in ångströms.
    pub pos: Point,
}

impl Atom {
    /// Creates a primary-conformer atom from a name, element, and position.
    ///
    /// # Arguments
    ///
    /// * `name` - Atom label such as `"N"` or `"OG1"`.
    /// * `element` - `Element` variant describing the chemical identity.
    /// * `pos` - `Point` describing the Cartesian coordinates in ångströms.
    pub fn new(name: &str, element: Element, pos: Point) -> Self {
        Self {
            name: SmolStr::new(name),
            element,
            alt_loc: None,
            pos,
        }
    }

    /// Returns the same atom tagged with an alternate-location indicator.
    ///
    /// A blank indicator (`' '`) is normalized to the primary conformer.
    pub fn with_alt_loc(mut self, alt_loc: char) -> Self {
        self.alt_loc = if alt_loc == ' ' { None } else { Some(alt_loc) };
        self
    }

    /// Reports whether the atom belongs to the primary (unlabeled) conformer.
    pub fn is_primary_conformer(&self) -> bool {
        self.alt_loc.is_none()
    }

    /// Computes the squared Euclidean distance to another atom.
    pub fn distance_squared(&self, other: &Atom) -> f64 {
        nalgebra::distance_squared(&self.pos, &other.pos)
    }

    /// Computes the Euclidean distance to another atom in ångströms.
    pub fn distance(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.pos, &other.pos)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alt_loc {
            Some(alt) => write!(
                f,
                "Atom {{ name: \"{}\", alt: {}, element: {}, pos: [{:.3}, {:.3}, {:.3}] }}",
                self.name, alt, self.element, self.pos.x, self.pos.y, self.pos.z
            ),
            None => write!(
                f,
                "Atom {{ name: \"{}\", element: {}, pos: [{:.3}, {:.3}, {:.3}] }}",
                self.name, self.element, self.pos.x, self.pos.y, self.pos.z
            ),
        }
    }
}
