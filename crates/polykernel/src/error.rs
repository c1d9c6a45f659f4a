//! Error taxonomy shared by every kernel operation.
//!
//! An empty Minkowski difference is not an error; it is `Ok(None)`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeomError {
    /// Operands or points of incompatible ambient dimension.
    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        expected: usize,
        found: usize,
        context: &'static str,
    },
    /// Not enough affinely independent points, or an orientation that cannot
    /// be resolved because every test point lies on the plane.
    #[error("degenerate configuration: {reason}")]
    DegenerateConfiguration { reason: String },
    /// Normalizing a near-zero vector or pivoting on a near-zero entry.
    #[error("numeric instability: {reason}")]
    NumericInstability { reason: String },
    #[error("invalid tolerance: epsilon must be positive, got {eps}")]
    InvalidTolerance { eps: String },
    #[error("empty input: {context}")]
    EmptyInput { context: &'static str },
    /// Face sets that do not form a face lattice: a face that is not the union
    /// of its sub-faces, a missing top face, a ridge outside two facets.
    #[error("invalid face lattice: {reason}")]
    InvalidLattice { reason: String },
}

impl GeomError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateConfiguration {
            reason: reason.into(),
        }
    }

    pub(crate) fn unstable(reason: impl Into<String>) -> Self {
        Self::NumericInstability {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_lattice(reason: impl Into<String>) -> Self {
        Self::InvalidLattice {
            reason: reason.into(),
        }
    }

    pub(crate) fn mismatch(expected: usize, found: usize, context: &'static str) -> Self {
        Self::DimensionMismatch {
            expected,
            found,
            context,
        }
    }
}

pub type GeomResult<T> = Result<T, GeomError>;
