//! Facing classification of triangles, and the silhouette vertex sets derived from it.
//!
//! Every query here is a brute-force pass over all triangles of a mesh: O(triangles) per pass,
//! with no spatial acceleration and no caching between calls. That's fine for primitives and small
//! composites; it won't scale to large meshes.
//!
//! Triangles are assumed to be wound counter-clockwise when seen from outside. Nothing checks
//! this; clockwise triangles are classified as facing the other way.

use std::collections::BTreeSet;

use facet_common::ArrayIndex;
use nalgebra::{Matrix4, Point3};

use crate::{MeshView, Real};

/// Which side of a triangle a viewpoint is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    /// The viewpoint is strictly in front: `d > 0`.
    Toward,
    /// Edge-on or behind: `d <= 0`. NaN lands here as well.
    Away,
}

impl Facing {
    /// Classify a [facing_dot].
    #[inline]
    pub fn of(d: Real) -> Self {
        if d > 0.0 {
            Self::Toward
        } else {
            Self::Away
        }
    }

    /// Whether `d` classifies as `self`; usable as a [classify_facing] condition.
    #[inline]
    pub fn matches(self, d: Real) -> bool {
        Self::of(d) == self
    }
}

/// `((v1 - v0) × (v2 - v0)) · (viewpoint - v0)` for a world-space triangle.
///
/// Positive when `viewpoint` is in front of the triangle's counter-clockwise side.
#[inline]
pub fn facing_dot(viewpoint: &Point3<Real>, [v0, v1, v2]: &[Point3<Real>; 3]) -> Real {
    let n = (v1 - v0).cross(&(v2 - v0));
    n.dot(&(viewpoint - v0))
}

fn triangle_dots<'data, Idx: ArrayIndex>(
    viewpoint: Point3<Real>,
    view: MeshView<'data, Idx>,
) -> impl Iterator<Item = ([Idx; 3], Real)> + 'data {
    view.triangles()
        .map(move |tri| (tri, facing_dot(&viewpoint, &view.world_triangle(tri))))
}

/// Every vertex index used by a triangle whose [facing_dot] satisfies `condition`.
///
/// Each triangle's vertices are placed in world space by `world` first. `d > 0` selects the
/// triangles facing `viewpoint`, `d <= 0` the rest; see [Facing::matches].
///
/// # Panics
///
/// * `indices` addresses a vertex outside of `positions`; use [MeshView::new] to validate first
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "trace", skip_all, fields(triangles = indices.len() / 3))
)]
pub fn classify_facing<Idx: ArrayIndex>(
    condition: impl Fn(Real) -> bool,
    viewpoint: &Point3<Real>,
    positions: &[Real],
    indices: &[Idx],
    world: &Matrix4<Real>,
) -> BTreeSet<Idx> {
    let view = MeshView::new_unchecked(positions, indices, *world);
    triangle_dots(*viewpoint, view)
        .filter(|(_, d)| condition(*d))
        .flat_map(|(tri, _)| tri)
        .collect()
}

/// The [Facing] of every triangle, in index buffer order.
pub fn classify_triangles<Idx: ArrayIndex>(
    viewpoint: &Point3<Real>,
    positions: &[Real],
    indices: &[Idx],
    world: &Matrix4<Real>,
) -> Vec<Facing> {
    let view = MeshView::new_unchecked(positions, indices, *world);
    triangle_dots(*viewpoint, view)
        .map(|(_, d)| Facing::of(d))
        .collect()
}

/// Both facing passes over a mesh, and their intersection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Silhouette<Idx: ArrayIndex> {
    /// Vertices of triangles facing the viewpoint.
    pub facing: BTreeSet<Idx>,
    /// Vertices of triangles facing away from (or edge-on to) the viewpoint.
    pub away: BTreeSet<Idx>,
    /// Vertices shared by both.
    pub edges: BTreeSet<Idx>,
}

impl<Idx: ArrayIndex> Silhouette<Idx> {
    /// Whether `i` lies on the boundary between facing and non-facing triangles.
    #[inline]
    pub fn is_edge(&self, i: Idx) -> bool {
        self.edges.contains(&i)
    }
}

/// Run [classify_facing] once for each [Facing] and intersect the results.
///
/// A mesh whose triangles share no vertices (such as a [Voxel](crate::Voxel)) has an empty
/// silhouette; [weld](crate::Welded) it first.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(positions, indices, world)))]
pub fn silhouette<Idx: ArrayIndex>(
    viewpoint: &Point3<Real>,
    positions: &[Real],
    indices: &[Idx],
    world: &Matrix4<Real>,
) -> Silhouette<Idx> {
    let facing = classify_facing(
        |d| Facing::Toward.matches(d),
        viewpoint,
        positions,
        indices,
        world,
    );
    let away = classify_facing(|d| Facing::Away.matches(d), viewpoint, positions, indices, world);
    let edges: BTreeSet<Idx> = facing.intersection(&away).copied().collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        facing = facing.len(),
        away = away.len(),
        edges = edges.len(),
        "silhouette"
    );

    Silhouette {
        facing,
        away,
        edges,
    }
}

/// Vertices lying on the silhouette of a mesh, as seen from `viewpoint`.
///
/// Equivalent to [silhouette]`(..).edges`.
#[inline]
pub fn find_edges<Idx: ArrayIndex>(
    viewpoint: &Point3<Real>,
    positions: &[Real],
    indices: &[Idx],
    world: &Matrix4<Real>,
) -> BTreeSet<Idx> {
    silhouette(viewpoint, positions, indices, world).edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Face, IndexedMesh, Voxel};
    use nalgebra::{point, Vector3};

    const FRONT_VIEW: Point3<Real> = Point3::new(0.0, 0.0, 5.0);

    #[test]
    fn ties_and_nan_face_away() {
        assert_eq!(Facing::of(1e-9), Facing::Toward);
        assert_eq!(Facing::of(0.0), Facing::Away);
        assert_eq!(Facing::of(-0.0), Facing::Away);
        assert_eq!(Facing::of(Real::NAN), Facing::Away);
        assert!(Facing::Away.matches(0.0));
    }

    #[test]
    fn voxel_front_and_back() {
        let voxel = Voxel::new(1.0, Vector3::zeros());
        let view = voxel.view();
        let facing = view.classify_facing(|d| d > 0.0, &FRONT_VIEW);
        let away = view.classify_facing(|d| d <= 0.0, &FRONT_VIEW);

        let front: BTreeSet<u32> = voxel.face_vertices(Face::Front).map(|i| i as u32).collect();
        let back: BTreeSet<u32> = voxel.face_vertices(Face::Back).map(|i| i as u32).collect();
        assert_eq!(facing, front);
        assert!(back.is_subset(&away));
        assert!(facing.is_disjoint(&away));
        assert_eq!(facing.len() + away.len(), 24);
        // independent face vertices leave nothing shared
        assert!(view.find_edges(&FRONT_VIEW).is_empty());
    }

    #[test]
    fn hull_silhouette_from_front() {
        let hull = IndexedMesh::cube(1.0);
        let s = hull.view(Matrix4::identity()).silhouette(&FRONT_VIEW);
        assert_eq!(s.facing, BTreeSet::from([0, 1, 2, 3]));
        assert!([4, 5, 6, 7].iter().all(|i| !s.facing.contains(i)));
        assert_eq!(s.away.len(), 8);
        assert_eq!(s.edges, BTreeSet::from([0, 1, 2, 3]));
        assert!(s.is_edge(2));
    }

    #[test]
    fn hull_silhouette_from_corner() {
        let hull = IndexedMesh::cube(1.0);
        let edges = hull
            .view(Matrix4::identity())
            .find_edges(&point![5.0, 5.0, 5.0]);
        // the nearest and farthest corners are inside the outline
        assert_eq!(edges, BTreeSet::from([0, 1, 3, 4, 6, 7]));
    }

    #[test]
    fn world_transform_moves_the_mesh() {
        let hull = IndexedMesh::cube(1.0);
        // pushed behind the viewpoint, the back face is the one facing it
        let world = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 10.0));
        let facing = hull.view(world).classify_facing(|d| d > 0.0, &FRONT_VIEW);
        assert_eq!(facing, BTreeSet::from([4, 5, 6, 7]));
    }

    #[test]
    fn welded_voxel_has_a_silhouette() {
        let voxel = Voxel::new(1.0, Vector3::zeros());
        let welded = voxel.welded(1e-4).unwrap();
        let edges = welded.view(*voxel.transform()).find_edges(&FRONT_VIEW);
        assert_eq!(edges.len(), 4);
        for i in welded.expand(&edges) {
            assert!((voxel.attributes().position(i).z - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn triangles_partition() {
        let hull = IndexedMesh::cube(2.0);
        // on the front plane: front triangles are edge-on
        let eye = point![0.0, 0.0, 1.0];
        let per_triangle = classify_triangles(&eye, &hull.positions, &hull.indices, &Matrix4::identity());
        assert_eq!(per_triangle.len(), 12);
        assert_eq!(&per_triangle[..2], &[Facing::Away, Facing::Away]);
        assert!(per_triangle.iter().all(|f| *f == Facing::Away));
    }
}
