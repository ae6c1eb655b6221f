use facet_common::Real;
use nalgebra::{Matrix4, Perspective3};

/// Perspective projection parameters, uploaded once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view, in radians.
    pub fov_y: Real,
    pub aspect: Real,
    pub near: Real,
    pub far: Real,
}

impl Default for Projection {
    fn default() -> Self {
        Self::for_viewport(640, 480)
    }
}

impl Projection {
    /// 45° field of view over a `width`×`height` viewport, with depth in `0.1..100`.
    ///
    /// A zero height is treated as 1.
    pub fn for_viewport(width: u32, height: u32) -> Self {
        Self {
            fov_y: Real::to_radians(45.0),
            aspect: width as Real / height.max(1) as Real,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn matrix(&self) -> Matrix4<Real> {
        Perspective3::new(self.aspect, self.fov_y, self.near, self.far).to_homogeneous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_aspect() {
        let p = Projection::for_viewport(800, 400);
        assert_eq!(p.aspect, 2.0);
        assert_eq!(Projection::for_viewport(10, 0).aspect, 10.0);
    }

    #[test]
    fn perspective_divides_by_depth() {
        let m = Projection::default().matrix();
        // w' = -z for a right-handed perspective
        assert_eq!(m[(3, 2)], -1.0);
        assert_eq!(m[(3, 3)], 0.0);
    }
}
