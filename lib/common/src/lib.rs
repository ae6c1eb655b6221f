//! Types shared between facet crates.

use std::hash::Hash;

use num_traits::{AsPrimitive, NumCast, PrimInt};

/// Scalar type of all vertex attribute data.
///
/// Attribute buffers are handed to the rendering boundary as-is, so this matches what a GPU
/// vertex buffer expects.
pub type Real = f32;

/// Below this magnitude, a length or determinant is treated as zero by the checked geometry
/// operations.
pub const DEGENERATE_EPSILON: Real = 1.0e-6;

/// Trait for types which can act as indices within an array (or an array-like structure), such as
/// the elements of a triangle index buffer.
pub trait ArrayIndex:
    PrimInt + AsPrimitive<usize> + Hash + std::fmt::Debug + Send + Sync + 'static
{
    /// Convert a vertex ordinal into this index type, if it fits.
    #[inline]
    fn from_ordinal(ordinal: usize) -> Option<Self> {
        <Self as NumCast>::from(ordinal)
    }

    /// This index as a vertex ordinal.
    #[inline]
    fn ordinal(self) -> usize {
        self.as_()
    }
}
impl<P> ArrayIndex for P where
    P: PrimInt + AsPrimitive<usize> + Hash + std::fmt::Debug + Send + Sync + 'static
{
}
