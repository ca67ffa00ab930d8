use crate::select::AtomRef;
use thiserror::Error;

/// Errors reported by a [`Toolkit`](super::Toolkit) implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A single-atom lookup received a selection of a different size.
    #[error("expected exactly {expected} atom in selection, found {found}")]
    AmbiguousAtom { expected: usize, found: usize },

    /// A selection referenced an atom the toolkit does not hold.
    #[error("atom {atom} is not part of any loaded object")]
    UnknownAtom { atom: AtomRef },

    /// A distance argument was negative or not finite.
    #[error("invalid distance {value} in selection")]
    InvalidDistance { value: f64 },
}

impl Error {
    pub fn ambiguous(found: usize) -> Self {
        Self::AmbiguousAtom { expected: 1, found }
    }
}
