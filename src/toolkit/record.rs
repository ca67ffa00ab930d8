use crate::model::types::{Element, Point, ResidueCategory};
use crate::select::AtomRef;
use smol_str::SmolStr;
use std::fmt;

/// Identity of a residue across the whole analysis.
///
/// Ordering follows the field order, so sorted collections group residues by object, then
/// chain, then sequence position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResidueKey {
    pub object: SmolStr,
    pub chain: SmolStr,
    pub residue_number: i32,
    pub insertion_code: Option<char>,
    pub residue_name: SmolStr,
}

impl fmt::Display for ResidueKey {
    /// Formats as `object/chain`number[icode]/name`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}`{}", self.object, self.chain, self.residue_number)?;
        if let Some(icode) = self.insertion_code {
            write!(f, "{icode}")?;
        }
        write!(f, "/{}", self.residue_name)
    }
}

/// An atom together with the residue it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AtomSite {
    pub atom: AtomRef,
    pub residue: ResidueKey,
    pub name: SmolStr,
    pub alt_loc: Option<char>,
}

impl fmt::Display for AtomSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.residue, self.name)?;
        if let Some(alt) = self.alt_loc {
            write!(f, "`{alt}")?;
        }
        Ok(())
    }
}

/// Everything the toolkit knows about one atom.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    pub atom: AtomRef,
    pub chain: SmolStr,
    pub residue_number: i32,
    pub insertion_code: Option<char>,
    pub residue_name: SmolStr,
    pub name: SmolStr,
    pub element: Element,
    pub alt_loc: Option<char>,
    pub pos: Point,
    pub category: ResidueCategory,
}

impl AtomRecord {
    pub fn is_solvent(&self) -> bool {
        self.category == ResidueCategory::Solvent
    }

    pub fn residue_key(&self) -> ResidueKey {
        ResidueKey {
            object: self.atom.object.clone(),
            chain: self.chain.clone(),
            residue_number: self.residue_number,
            insertion_code: self.insertion_code,
            residue_name: self.residue_name.clone(),
        }
    }

    pub fn site(&self) -> AtomSite {
        AtomSite {
            atom: self.atom.clone(),
            residue: self.residue_key(),
            name: self.name.clone(),
            alt_loc: self.alt_loc,
        }
    }

    /// Reports whether two atoms belong to the same residue instance.
    pub fn same_residue(&self, other: &AtomRecord) -> bool {
        self.atom.object == other.atom.object
            && self.chain == other.chain
            && self.residue_number == other.residue_number
            && self.insertion_code == other.insertion_code
    }
}
