use std::collections::BTreeSet;

use facet_common::ArrayIndex;
use nalgebra::{Matrix4, Point3};

use crate::{
    ray::{self, Ray, RayHit},
    transform::apply_homogeneous,
    visibility::{self, Silhouette},
    Error, Real,
};

/// Mesh-local vertex `i` of a flat `xyz` buffer.
///
/// # Panics
///
/// * `3i + 2 >= positions.len()`
#[inline]
pub(crate) fn local_vertex(positions: &[Real], i: usize) -> Point3<Real> {
    Point3::from_slice(&positions[i * 3..i * 3 + 3])
}

/// Read-only access to a triangle mesh placed in the world: a flat position buffer, a flat
/// triangle index buffer, and a world transform.
///
/// The mesh data is borrowed, never modified.
#[derive(Debug, Clone, Copy)]
pub struct MeshView<'data, Idx: ArrayIndex = u32> {
    positions: &'data [Real],
    indices: &'data [Idx],
    transform: Matrix4<Real>,
}

impl<'data, Idx: ArrayIndex> MeshView<'data, Idx> {
    /// # Errors
    ///
    /// * [`PositionStride`](Error::PositionStride) if `positions` isn't made of whole 3D points
    /// * [`TriangleStride`](Error::TriangleStride) if `indices` isn't made of whole triangles
    /// * [`IndexOutOfRange`](Error::IndexOutOfRange) if any index doesn't address a vertex
    pub fn new(
        positions: &'data [Real],
        indices: &'data [Idx],
        transform: Matrix4<Real>,
    ) -> Result<Self, Error> {
        if positions.len() % 3 != 0 {
            return Err(Error::PositionStride(positions.len()));
        }
        if indices.len() % 3 != 0 {
            return Err(Error::TriangleStride(indices.len()));
        }
        let vertices = positions.len() / 3;
        if let Some(bad) = indices.iter().find(|i| i.ordinal() >= vertices) {
            return Err(Error::IndexOutOfRange {
                index: bad.ordinal(),
                vertices,
            });
        }
        Ok(Self::new_unchecked(positions, indices, transform))
    }

    /// As [new](MeshView::new), without validation. Queries on malformed data may panic.
    #[inline]
    pub fn new_unchecked(
        positions: &'data [Real],
        indices: &'data [Idx],
        transform: Matrix4<Real>,
    ) -> Self {
        Self {
            positions,
            indices,
            transform,
        }
    }

    /// Flat local-space positions.
    #[inline]
    pub fn positions(&self) -> &'data [Real] {
        self.positions
    }

    /// Triangle indices.
    #[inline]
    pub fn indices(&self) -> &'data [Idx] {
        self.indices
    }

    /// Local-to-world transform.
    #[inline]
    pub fn transform(&self) -> &Matrix4<Real> {
        &self.transform
    }

    /// The same mesh, placed by `transform` instead.
    #[inline]
    pub fn with_transform(self, transform: Matrix4<Real>) -> Self {
        Self { transform, ..self }
    }

    /// Number of vertices in the position buffer.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles in the index buffer.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Index triples, in buffer order.
    pub fn triangles(&self) -> impl Iterator<Item = [Idx; 3]> + 'data {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Vertex `i`, in world space.
    #[inline]
    pub fn world_vertex(&self, i: Idx) -> Point3<Real> {
        apply_homogeneous(&self.transform, &local_vertex(self.positions, i.ordinal()))
    }

    /// Corners of `tri`, in world space.
    #[inline]
    pub fn world_triangle(&self, tri: [Idx; 3]) -> [Point3<Real>; 3] {
        tri.map(|i| self.world_vertex(i))
    }

    /// See [visibility::classify_facing].
    pub fn classify_facing(
        &self,
        condition: impl Fn(Real) -> bool,
        viewpoint: &Point3<Real>,
    ) -> BTreeSet<Idx> {
        visibility::classify_facing(
            condition,
            viewpoint,
            self.positions,
            self.indices,
            &self.transform,
        )
    }

    /// See [visibility::silhouette].
    pub fn silhouette(&self, viewpoint: &Point3<Real>) -> Silhouette<Idx> {
        visibility::silhouette(viewpoint, self.positions, self.indices, &self.transform)
    }

    /// See [visibility::find_edges].
    pub fn find_edges(&self, viewpoint: &Point3<Real>) -> BTreeSet<Idx> {
        visibility::find_edges(viewpoint, self.positions, self.indices, &self.transform)
    }

    /// See [ray::ray_cast_mesh].
    pub fn ray_cast(&self, ray: &Ray) -> Option<RayHit> {
        ray::ray_cast_mesh(ray, self.positions, self.indices, &self.transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRI: [Real; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

    #[test]
    fn validation() {
        let id = Matrix4::identity();
        assert!(MeshView::new(&TRI, &[0u16, 1, 2], id).is_ok());
        assert_eq!(
            MeshView::new(&TRI[..8], &[0u16, 1, 2], id).unwrap_err(),
            Error::PositionStride(8)
        );
        assert_eq!(
            MeshView::new(&TRI, &[0u16, 1], id).unwrap_err(),
            Error::TriangleStride(2)
        );
        assert_eq!(
            MeshView::new(&TRI, &[0u16, 1, 3], id).unwrap_err(),
            Error::IndexOutOfRange {
                index: 3,
                vertices: 3
            }
        );
    }

    #[test]
    fn world_vertices_follow_transform() {
        let t = Matrix4::new_translation(&nalgebra::vector![0.0, 0.0, -5.0]);
        let view = MeshView::new(&TRI, &[0u32, 1, 2], t).unwrap();
        assert_eq!(view.world_vertex(1), Point3::new(1.0, 0.0, -5.0));
        assert_eq!(view.triangles().collect::<Vec<_>>(), vec![[0, 1, 2]]);
        let moved = view.with_transform(Matrix4::identity());
        assert_eq!(moved.world_vertex(1), Point3::new(1.0, 0.0, 0.0));
    }
}
