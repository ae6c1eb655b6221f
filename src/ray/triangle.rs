use facet_common::DEGENERATE_EPSILON;
use nalgebra::{Point2, Vector2};

use crate::{Degeneracy, Error, Real};

#[inline]
fn perp_dot(a: &Vector2<Real>, b: &Vector2<Real>) -> Real {
    a.x * b.y - b.x * a.y
}

/// Coordinates `(a, b)` of `p` such that `p = v0 + a·(v1 - v0) + b·(v2 - v0)`.
///
/// A zero-area triangle yields non-finite coordinates.
pub fn triangle_coordinates(p: &Point2<Real>, [v0, v1, v2]: &[Point2<Real>; 3]) -> Vector2<Real> {
    let (e1, e2) = (v1 - v0, v2 - v0);
    let det12 = perp_dot(&e1, &e2);
    let a = (perp_dot(&p.coords, &e2) - perp_dot(&v0.coords, &e2)) / det12;
    let b = -(perp_dot(&p.coords, &e1) - perp_dot(&v0.coords, &e1)) / det12;
    Vector2::new(a, b)
}

/// Whether `p` lies strictly inside `triangle`.
///
/// Points on an edge or a corner are outside. Either winding works. A zero-area triangle contains
/// nothing.
#[inline]
pub fn point_in_triangle(p: &Point2<Real>, triangle: &[Point2<Real>; 3]) -> bool {
    let ab = triangle_coordinates(p, triangle);
    ab.x > 0.0 && ab.y > 0.0 && ab.x + ab.y < 1.0
}

/// [point_in_triangle], reporting zero-area triangles.
///
/// # Errors
///
/// * [`ZeroAreaTriangle`](Degeneracy::ZeroAreaTriangle) if `triangle`'s corners are collinear,
///   judged by the angle between its edges
pub fn try_point_in_triangle(p: &Point2<Real>, triangle: &[Point2<Real>; 3]) -> Result<bool, Error> {
    let [v0, v1, v2] = triangle;
    let (e1, e2) = (v1 - v0, v2 - v0);
    if !(perp_dot(&e1, &e2).abs() > DEGENERATE_EPSILON * e1.norm() * e2.norm()) {
        return Err(Degeneracy::ZeroAreaTriangle.into());
    }
    Ok(point_in_triangle(p, triangle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::point;

    const TRI: [Point2<Real>; 3] = [
        Point2::new(1.0, 1.0),
        Point2::new(4.0, 1.0),
        Point2::new(1.0, 5.0),
    ];

    #[test]
    fn centroid_inside_vertices_outside() {
        let centroid = Point2::from((TRI[0].coords + TRI[1].coords + TRI[2].coords) / 3.0);
        assert!(point_in_triangle(&centroid, &TRI));
        for v in &TRI {
            assert!(!point_in_triangle(v, &TRI));
        }
    }

    #[test]
    fn edges_are_outside() {
        // midpoint of v0-v1
        assert!(!point_in_triangle(&point![2.5, 1.0], &TRI));
        // midpoint of v1-v2
        assert!(!point_in_triangle(&point![2.5, 3.0], &TRI));
        assert!(!point_in_triangle(&point![-1.0, 2.0], &TRI));
    }

    #[test]
    fn coordinates_follow_edges() {
        let ab = triangle_coordinates(&point![2.5, 3.0], &TRI);
        assert!((ab - Vector2::new(0.5, 0.5)).norm() < 1e-6);
        let reversed = [TRI[0], TRI[2], TRI[1]];
        assert!(point_in_triangle(&point![2.0, 2.0], &reversed));
    }

    #[test]
    fn zero_area() {
        let flat = [point![0.0, 0.0], point![1.0, 1.0], point![2.0, 2.0]];
        assert!(!point_in_triangle(&point![1.0, 1.0], &flat));
        assert_eq!(
            try_point_in_triangle(&point![1.0, 1.0], &flat),
            Err(Error::DegenerateGeometry(Degeneracy::ZeroAreaTriangle))
        );
        assert_eq!(try_point_in_triangle(&point![1.5, 1.5], &TRI), Ok(true));
    }

    #[test]
    fn small_triangles_still_contain_points() {
        let tiny = TRI.map(|v| Point2::from(v.coords * 1.0e-4));
        assert_eq!(try_point_in_triangle(&point![1.5e-4, 1.5e-4], &tiny), Ok(true));
        assert_eq!(try_point_in_triangle(&point![5.0e-4, 5.0e-4], &tiny), Ok(false));
    }
}
