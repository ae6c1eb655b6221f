//! Vector projection and rejection.
//!
//! The plain functions follow float semantics: a zero-length `b` yields NaN or infinite
//! components. The `try_` variants report that as [Degeneracy::ZeroLengthVector] instead.

use facet_common::DEGENERATE_EPSILON;
use nalgebra::Vector3;

use crate::{Degeneracy, Error, Real};

/// Vector projection of `a` onto `b`.
#[inline]
pub fn project(a: &Vector3<Real>, b: &Vector3<Real>) -> Vector3<Real> {
    b * (a.dot(b) / b.norm_squared())
}

/// Scalar projection of `a` onto `b`; the signed length of [project]`(a, b)`.
#[inline]
pub fn project_scalar(a: &Vector3<Real>, b: &Vector3<Real>) -> Real {
    a.dot(b) / b.norm()
}

/// Vector rejection of `a` from `b`; the part of `a` orthogonal to `b`.
#[inline]
pub fn reject(a: &Vector3<Real>, b: &Vector3<Real>) -> Vector3<Real> {
    a - project(a, b)
}

#[inline]
fn nonzero(b: &Vector3<Real>) -> Result<(), Error> {
    if b.norm_squared() <= DEGENERATE_EPSILON * DEGENERATE_EPSILON {
        return Err(Degeneracy::ZeroLengthVector.into());
    }
    Ok(())
}

/// [project], failing on a zero-length `b`.
pub fn try_project(a: &Vector3<Real>, b: &Vector3<Real>) -> Result<Vector3<Real>, Error> {
    nonzero(b)?;
    Ok(project(a, b))
}

/// [project_scalar], failing on a zero-length `b`.
pub fn try_project_scalar(a: &Vector3<Real>, b: &Vector3<Real>) -> Result<Real, Error> {
    nonzero(b)?;
    Ok(project_scalar(a, b))
}

/// [reject], failing on a zero-length `b`.
pub fn try_reject(a: &Vector3<Real>, b: &Vector3<Real>) -> Result<Vector3<Real>, Error> {
    nonzero(b)?;
    Ok(reject(a, b))
}

/// `v` scaled to unit length, failing when it has (near) zero length.
pub fn try_normalize(v: &Vector3<Real>) -> Result<Vector3<Real>, Error> {
    nonzero(v)?;
    Ok(v.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn projection_splits_vector() {
        let a = vector![3.0, 4.0, 0.0];
        let b = vector![2.0, 0.0, 0.0];
        assert_eq!(project(&a, &b), vector![3.0, 0.0, 0.0]);
        assert_eq!(reject(&a, &b), vector![0.0, 4.0, 0.0]);
        assert_eq!(project_scalar(&a, &b), 3.0);
        assert_eq!(project(&a, &b) + reject(&a, &b), a);
    }

    #[test]
    fn scalar_projection_is_signed() {
        let a = vector![-5.0, 1.0, 0.0];
        let b = vector![0.5, 0.0, 0.0];
        assert_eq!(project_scalar(&a, &b), -5.0);
    }

    #[test]
    fn zero_length_reference() {
        let a = vector![1.0, 2.0, 3.0];
        let zero = Vector3::zeros();
        assert!(project(&a, &zero).iter().all(|c| !c.is_finite()));
        assert!(!project_scalar(&a, &zero).is_finite());
        assert_eq!(
            try_project(&a, &zero),
            Err(Error::DegenerateGeometry(Degeneracy::ZeroLengthVector))
        );
        assert_eq!(
            try_project_scalar(&a, &zero),
            Err(Error::DegenerateGeometry(Degeneracy::ZeroLengthVector))
        );
        assert!(try_normalize(&zero).is_err());
        assert_eq!(try_reject(&a, &a).map(|r| r.norm() < 1e-6), Ok(true));
    }
}
