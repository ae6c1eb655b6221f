//! Attribute buffers and the primitives assembled from them.
//!
//! # See Also
//!
//! * [visibility](crate::visibility) and [ray](crate::ray), which read a [MeshView].

mod attributes;
pub use attributes::*;

mod hull;
pub use hull::*;

mod quad;
pub use quad::*;

mod view;
pub use view::*;

mod voxel;
pub use voxel::*;
