//! Ray/triangle intersection, done in the plane of the triangle.
//!
//! The plane is described by a [PlanarBasis]; the hit point is flattened into it and tested
//! against the flattened triangle with [point_in_triangle].

mod basis;
pub use basis::*;

mod triangle;
pub use triangle::*;

use facet_common::{ArrayIndex, DEGENERATE_EPSILON};
use nalgebra::{Matrix4, Point2, Point3, Vector3};

use crate::{
    vec::{project_scalar, try_normalize},
    Degeneracy, Error, MeshView, Real,
};

/// A half-line, `origin + t·direction` for `t >= 0`.
///
/// `direction` need not be unit length; hit distances are in multiples of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Where the ray starts.
    pub origin: Point3<Real>,
    /// Not necessarily unit length.
    pub direction: Vector3<Real>,
}

impl Ray {
    /// A ray from `origin` along `direction`.
    #[inline]
    pub fn new(origin: Point3<Real>, direction: Vector3<Real>) -> Self {
        Self { origin, direction }
    }

    /// A ray cast from the world origin, as a camera at the origin would.
    #[inline]
    pub fn from_origin(direction: Vector3<Real>) -> Self {
        Self::new(Point3::origin(), direction)
    }

    /// The point `t` directions along the ray.
    #[inline]
    pub fn at(&self, t: Real) -> Point3<Real> {
        self.origin + self.direction * t
    }

    /// Parameter at which this ray meets the plane through `point` with normal `normal`.
    #[inline]
    fn plane_parameter(&self, point: &Point3<Real>, normal: &Vector3<Real>) -> Real {
        project_scalar(&(point - self.origin), normal) / project_scalar(&self.direction, normal)
    }
}

/// Where `ray`'s line meets the plane of `triangle`.
///
/// The hit may lie outside the triangle, or behind the ray origin. A ray parallel to the plane
/// gives non-finite components; see [try_ray_plane_intersect].
pub fn ray_plane_intersect(ray: &Ray, triangle: &[Point3<Real>; 3]) -> Point3<Real> {
    let [t0, v1, v2] = triangle;
    let normal = (v1 - t0).cross(&(v2 - t0));
    ray.at(ray.plane_parameter(t0, &normal))
}

/// [ray_plane_intersect], reporting when there is no single intersection.
///
/// # Errors
///
/// * [`ZeroLengthVector`](Degeneracy::ZeroLengthVector) for a zero `ray.direction`
/// * [`ZeroAreaTriangle`](Degeneracy::ZeroAreaTriangle) when `triangle` spans no plane
/// * [`ParallelRay`](Degeneracy::ParallelRay) when `ray` runs along the plane
pub fn try_ray_plane_intersect(ray: &Ray, triangle: &[Point3<Real>; 3]) -> Result<Point3<Real>, Error> {
    let dir = try_normalize(&ray.direction)?;
    let basis = PlanarBasis::try_new(triangle)?;
    if dir.dot(&basis.normal.normalize()).abs() <= DEGENERATE_EPSILON {
        return Err(Degeneracy::ParallelRay.into());
    }
    Ok(ray.at(ray.plane_parameter(&basis.origin, &basis.normal)))
}

/// A ray meeting the interior of a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Ray parameter of the hit; see [Ray::at].
    pub t: Real,
    /// The hit, in world space.
    pub point: Point3<Real>,
    /// The hit, in the [PlanarBasis] of the triangle.
    pub uv: Point2<Real>,
    /// Ordinal of the triangle within its index buffer; 0 for single-triangle casts.
    pub triangle: usize,
}

/// Cast `ray` at a single triangle.
///
/// Hits behind the origin, on the triangle's boundary, or off a degenerate triangle are misses.
/// Either winding is hit.
pub fn ray_cast(ray: &Ray, triangle: &[Point3<Real>; 3]) -> Option<RayHit> {
    let basis = PlanarBasis::try_new(triangle).ok()?;
    let t = ray.plane_parameter(&basis.origin, &basis.normal);
    if !(t.is_finite() && t >= 0.0) {
        return None;
    }
    let point = ray.at(t);
    let uv = basis.to_plane(&point);
    point_in_triangle(&uv, &basis.corners).then_some(RayHit {
        t,
        point,
        uv,
        triangle: 0,
    })
}

/// The nearest [ray_cast] hit over every triangle of a mesh placed by `world`.
///
/// Brute force: O(triangles).
///
/// # Panics
///
/// * `indices` addresses a vertex outside of `positions`
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "trace", skip(positions, indices, world), fields(triangles = indices.len() / 3))
)]
pub fn ray_cast_mesh<Idx: ArrayIndex>(
    ray: &Ray,
    positions: &[Real],
    indices: &[Idx],
    world: &Matrix4<Real>,
) -> Option<RayHit> {
    let view = MeshView::new_unchecked(positions, indices, *world);
    view.triangles()
        .enumerate()
        .filter_map(|(i, tri)| {
            ray_cast(ray, &view.world_triangle(tri)).map(|hit| RayHit {
                triangle: i,
                ..hit
            })
        })
        .min_by(|a, b| a.t.total_cmp(&b.t))
}
