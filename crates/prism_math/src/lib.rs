//! Math primitives for the Prism ray tracer.
//!
//! Vectors are glam's double precision `DVec3`; points and colors share the
//! same representation.

pub use glam;

mod interval;
mod ray;
pub mod vec;

pub use interval::Interval;
pub use ray::Ray;
pub use vec::{
    random_f64, random_in_hemisphere, random_in_unit_disk, random_in_unit_sphere,
    random_range, random_unit_vector, random_vec, reflect, refract, unit_vector,
};

/// A 3-component vector of `f64`.
pub type Vec3 = glam::DVec3;

/// A position in world space.
pub type Point3 = Vec3;

/// Linear RGB color, one channel per component.
pub type Color = Vec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(2.0 * a, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(b / 2.0, Vec3::new(2.0, 2.5, 3.0));
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(a.cross(b), Vec3::new(-3.0, 6.0, -3.0));
        assert_eq!(a.length_squared(), 14.0);
    }

    #[test]
    fn test_compound_assign_mutates() {
        let mut c = Color::new(0.5, 0.5, 0.5);
        c += Color::new(0.25, 0.0, 0.5);
        c *= 2.0;
        assert_eq!(c, Color::new(1.5, 1.0, 2.0));
        c /= 4.0;
        assert_eq!(c, Color::new(0.375, 0.25, 0.5));
    }
}
