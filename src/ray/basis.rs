use facet_common::DEGENERATE_EPSILON;
use nalgebra::{Point2, Point3, Vector3};

use crate::{vec::reject, Degeneracy, Error, Real};

/// An orthonormal frame spanning the plane of a triangle, with its origin at the triangle's first
/// corner.
///
/// `base0` runs along the first edge; `base1` is the part of the second edge orthogonal to it.
/// Triangles are assumed to be wound counter-clockwise when seen from the side `normal` points to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarBasis {
    /// The triangle's first corner.
    pub origin: Point3<Real>,
    /// Unit axis along the first edge.
    pub base0: Vector3<Real>,
    /// Unit axis orthogonal to `base0`, within the plane.
    pub base1: Vector3<Real>,
    /// `(v1 - t0) × (v2 - t0)`; not normalized.
    pub normal: Vector3<Real>,
    /// The triangle's corners, in basis coordinates. The first is always the origin.
    pub corners: [Point2<Real>; 3],
}

impl PlanarBasis {
    /// A basis for `triangle`.
    ///
    /// A zero-area triangle yields non-finite axes.
    pub fn new(triangle: &[Point3<Real>; 3]) -> Self {
        let [t0, v1, v2] = triangle;
        let (v1, v2) = (v1 - t0, v2 - t0);
        let base0 = v1.normalize();
        let base1 = reject(&v2, &v1).normalize();
        Self::from_axes(*t0, base0, base1, v1.cross(&v2), &v1, &v2)
    }

    /// [new](Self::new), reporting degenerate triangles.
    ///
    /// # Errors
    ///
    /// * [`ZeroAreaTriangle`](Degeneracy::ZeroAreaTriangle) if the corners are (nearly) collinear
    ///   or coincide
    ///
    /// Collinearity is judged by the angle between the edges, so the size of the triangle doesn't
    /// matter.
    pub fn try_new(triangle: &[Point3<Real>; 3]) -> Result<Self, Error> {
        let [t0, v1, v2] = triangle;
        let (v1, v2) = (v1 - t0, v2 - t0);
        let normal = v1.cross(&v2);
        // |v1 × v2| = |v1|·|v2|·sin θ; also false for NaN and for zero edges
        if !(normal.norm() > DEGENERATE_EPSILON * v1.norm() * v2.norm()) {
            return Err(Degeneracy::ZeroAreaTriangle.into());
        }
        let base0 = v1.normalize();
        let base1 = reject(&v2, &v1).normalize();
        Ok(Self::from_axes(*t0, base0, base1, normal, &v1, &v2))
    }

    fn from_axes(
        origin: Point3<Real>,
        base0: Vector3<Real>,
        base1: Vector3<Real>,
        normal: Vector3<Real>,
        v1: &Vector3<Real>,
        v2: &Vector3<Real>,
    ) -> Self {
        let flatten = |v: &Vector3<Real>| Point2::new(v.dot(&base0), v.dot(&base1));
        Self {
            origin,
            base0,
            base1,
            normal,
            corners: [Point2::origin(), flatten(v1), flatten(v2)],
        }
    }

    /// `point`, in basis coordinates.
    ///
    /// The component along [normal](Self::normal) is dropped, so this is also the orthogonal
    /// projection of `point` onto the plane.
    #[inline]
    pub fn to_plane(&self, point: &Point3<Real>) -> Point2<Real> {
        let d = point - self.origin;
        Point2::new(d.dot(&self.base0), d.dot(&self.base1))
    }

    /// The world point at basis coordinates `uv`.
    #[inline]
    pub fn to_world(&self, uv: &Point2<Real>) -> Point3<Real> {
        self.origin + self.base0 * uv.x + self.base1 * uv.y
    }

    /// Signed distance of `point` from the plane, in units of its own length.
    #[inline]
    pub fn distance(&self, point: &Point3<Real>) -> Real {
        crate::vec::project_scalar(&(point - self.origin), &self.normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::point;

    fn close(a: Real, b: Real) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn axes_are_orthonormal() {
        let basis = PlanarBasis::new(&[
            point![1.0, 2.0, 3.0],
            point![4.0, 2.0, 7.0],
            point![0.0, 5.0, 3.0],
        ]);
        assert!(close(basis.base0.norm(), 1.0));
        assert!(close(basis.base1.norm(), 1.0));
        assert!(close(basis.base0.dot(&basis.base1), 0.0));
        assert!(close(basis.base0.dot(&basis.normal), 0.0));
        assert!(close(basis.base1.dot(&basis.normal), 0.0));
        // first edge is (3, 0, 4)
        assert!((basis.corners[1] - Point2::new(5.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn plane_round_trip() {
        let tri = [
            point![0.0, 0.0, 1.0],
            point![2.0, 0.0, 1.0],
            point![0.0, 3.0, 1.0],
        ];
        let basis = PlanarBasis::new(&tri);
        for (corner, flat) in tri.iter().zip(&basis.corners) {
            assert!((basis.to_world(flat) - corner).norm() < 1e-5);
            assert!((basis.to_plane(corner) - flat).norm() < 1e-5);
        }
        // off-plane points flatten onto the plane
        assert_eq!(basis.to_plane(&point![1.0, 1.0, 9.0]), Point2::new(1.0, 1.0));
        assert_eq!(basis.distance(&point![1.0, 1.0, 9.0]), 8.0);
    }

    #[test]
    fn degenerate_triangles() {
        let line = [
            point![0.0, 0.0, 0.0],
            point![1.0, 1.0, 1.0],
            point![2.0, 2.0, 2.0],
        ];
        assert_eq!(
            PlanarBasis::try_new(&line),
            Err(Error::DegenerateGeometry(Degeneracy::ZeroAreaTriangle))
        );
        assert!(!PlanarBasis::new(&line).base1.x.is_finite());
        let dot = [Point3::origin(); 3];
        assert!(PlanarBasis::try_new(&dot).is_err());
        // collinear to within float error, at a large scale
        let long = [
            point![0.0, 0.0, 0.0],
            point![1000.0, 1000.0, 0.0],
            point![3000.0, 3000.0, 0.0001],
        ];
        assert!(PlanarBasis::try_new(&long).is_err());
    }

    #[test]
    fn small_triangles_are_not_degenerate() {
        let tri = [
            point![0.0, 0.0, -1.0],
            point![5.0e-4, 0.0, -1.0],
            point![0.0, 5.0e-4, -1.0],
        ];
        let basis = PlanarBasis::try_new(&tri).unwrap();
        assert!(close(basis.base0.norm(), 1.0));
        assert!(close(basis.base1.norm(), 1.0));
        assert!((basis.corners[2] - Point2::new(0.0, 5.0e-4)).norm() < 1e-8);
    }
}
