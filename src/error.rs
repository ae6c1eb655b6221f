//! Errors reported by the checked geometry operations.

use crate::Real;

/// Ways in which geometry can be too degenerate for an operation to produce a finite result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Degeneracy {
    /// Projecting onto, or normalizing, a vector of (near) zero length.
    ZeroLengthVector,
    /// A ray which never meets the plane it was cast at.
    ParallelRay,
    /// A triangle whose corners are (nearly) collinear.
    ZeroAreaTriangle,
    /// A transform whose linear part has no inverse.
    SingularTransform,
}

/// Errors from building, welding, and measuring meshes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The input was too degenerate for a finite result.
    #[error("degenerate geometry: {0:?}")]
    DegenerateGeometry(Degeneracy),
    /// A position buffer whose length isn't a multiple of 3.
    #[error("position buffer of length {0} is not a whole number of 3D points")]
    PositionStride(usize),
    /// An index buffer whose length isn't a multiple of 3.
    #[error("index buffer of length {0} is not a whole number of triangles")]
    TriangleStride(usize),
    /// An index past the end of the position buffer.
    #[error("index {index} addresses a vertex outside of 0..{vertices}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of vertices actually present.
        vertices: usize,
    },
    /// More vertices than the index type can address.
    #[error("vertex ordinal {0} does not fit in the requested index type")]
    IndexOverflow(usize),
    /// A weld tolerance that is zero, negative, or NaN.
    #[error("weld tolerance must be positive, got {0}")]
    NonPositiveTolerance(Real),
}

impl From<Degeneracy> for Error {
    #[inline]
    fn from(d: Degeneracy) -> Self {
        Self::DegenerateGeometry(d)
    }
}
