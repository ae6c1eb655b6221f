//! Homogeneous transforms of flat attribute buffers.

use nalgebra::{Matrix3, Matrix4, Point3, Unit, Vector3};

use crate::{Degeneracy, Error, Real};

/// Apply `m` to `p` as the homogeneous point `(x, y, z, 1)`, keeping `xyz` of the result.
///
/// There's no division by `w`; for the affine transforms used here it stays 1.
#[inline]
pub fn apply_homogeneous(m: &Matrix4<Real>, p: &Point3<Real>) -> Point3<Real> {
    let h = m * p.to_homogeneous();
    Point3::new(h.x, h.y, h.z)
}

/// [apply_homogeneous] to every point of a flat `xyz` buffer, in place.
///
/// # Panics
///
/// * `data.len() % 3 != 0` in debug builds
pub fn bake_points(m: &Matrix4<Real>, data: &mut [Real]) {
    debug_assert_eq!(data.len() % 3, 0);
    for chunk in data.chunks_exact_mut(3) {
        let p = apply_homogeneous(m, &Point3::new(chunk[0], chunk[1], chunk[2]));
        chunk.copy_from_slice(p.coords.as_slice());
    }
}

/// Add `offset` to every point of a flat `xyz` buffer, in place.
pub fn translate_points(offset: &Vector3<Real>, data: &mut [Real]) {
    for chunk in data.chunks_exact_mut(3) {
        chunk[0] += offset.x;
        chunk[1] += offset.y;
        chunk[2] += offset.z;
    }
}

/// The inverse-transpose of the linear part of `m`, which keeps normals perpendicular to their
/// surfaces under non-uniform scale and shear.
pub fn normal_matrix(m: &Matrix4<Real>) -> Result<Matrix3<Real>, Error> {
    let linear: Matrix3<Real> = m.fixed_view::<3, 3>(0, 0).into_owned();
    linear
        .try_inverse()
        .map(|inv| inv.transpose())
        .ok_or(Error::DegenerateGeometry(Degeneracy::SingularTransform))
}

/// Transform every direction of a flat `xyz` buffer by `n` and re-normalize it, in place.
pub fn bake_normals(n: &Matrix3<Real>, data: &mut [Real]) {
    for chunk in data.chunks_exact_mut(3) {
        let v = n * Vector3::new(chunk[0], chunk[1], chunk[2]);
        let v = v.try_normalize(Real::EPSILON).unwrap_or(v);
        chunk.copy_from_slice(v.as_slice());
    }
}

/// Rotation about `axis` by `degrees`.
#[inline]
pub fn rotation(axis: &Unit<Vector3<Real>>, degrees: Real) -> Matrix4<Real> {
    Matrix4::from_axis_angle(axis, degrees.to_radians())
}

/// Incremental rotation composed into a rigid transform on every animation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Degrees about the local x axis, per step.
    pub x: Real,
    /// Degrees about the local y axis, per step.
    pub y: Real,
}

impl Default for Spin {
    fn default() -> Self {
        Self { x: 2.0, y: 3.0 }
    }
}

impl Spin {
    /// No rotation at all.
    pub const NONE: Self = Self { x: 0.0, y: 0.0 };

    /// `m`, followed (in local space) by one step of rotation: `m · Rx · Ry`.
    pub fn apply(&self, m: &Matrix4<Real>) -> Matrix4<Real> {
        m * rotation(&Vector3::x_axis(), self.x) * rotation(&Vector3::y_axis(), self.y)
    }
}
