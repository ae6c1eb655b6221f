//! Composable quad/voxel meshes, plus the facing and ray utilities that operate on them.
//!
//! * [Quad]: a flat two-triangle patch whose attribute data can be baked with a transform.
//! * [Voxel]: six quads merged into one 24-vertex cube sharing a single rigid transform.
//! * [visibility]: per-triangle facing classification and silhouette vertex sets.
//! * [ray]: ray/plane intersection in a triangle's own planar basis.
//!
//! Rendering goes through [facet_pipeline]; nothing here owns a graphics context.
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

pub mod error;
pub mod mesh;
pub mod ray;
mod scene;
pub mod transform;
pub mod vec;
pub mod visibility;

pub use error::{Degeneracy, Error};
pub use facet_common::{ArrayIndex, Real};
pub use facet_pipeline as pipeline;
pub use mesh::*;
pub use ray::{Ray, RayHit};
pub use scene::*;
pub use transform::Spin;

use nalgebra::{Point3, Vector3};

/// A point in mesh-local or world space.
pub type WorldPoint = Point3<Real>;

/// A vector in mesh-local or world space.
pub type WorldVector = Vector3<Real>;

/// RGBA color, each channel in `0..=1`.
pub type Rgba = [Real; 4];
