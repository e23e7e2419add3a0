//! Sphere primitive for ray tracing.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, SceneError,
};
use prism_math::{Interval, Point3, Ray};

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    material: Arc<Material>,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// `radius` must be positive; use [`Sphere::try_new`] for unchecked input.
    pub fn new(center: Point3, radius: f64, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    /// Create a sphere, rejecting non-positive or NaN radii.
    pub fn try_new(
        center: Point3,
        radius: f64,
        material: Arc<Material>,
    ) -> Result<Self, SceneError> {
        if radius.is_nan() || radius <= 0.0 {
            return Err(SceneError::InvalidRadius(radius));
        }
        Ok(Self::new(center, radius, material))
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let half_b = oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Prefer the near surface; the far one only counts when the near
        // root is out of range (e.g. the ray starts inside the sphere).
        let mut root = (-half_b - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (-half_b + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = ray.at(root);
        let outward_normal = (p - self.center) / self.radius;
        Some(HitRecord::with_face_normal(
            ray,
            root,
            p,
            outward_normal,
            &self.material,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_math::{unit_vector, Color, Vec3};

    fn unit_sphere_ahead() -> Sphere {
        Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Material::lambertian(Color::splat(0.5))),
        )
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = unit_sphere_ahead();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = sphere
            .hit(&ray, Interval::new(0.001, f64::INFINITY))
            .expect("ray should hit the sphere");
        assert!((rec.t - 0.5).abs() < 1e-12);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-12);
        assert!((rec.p - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-12);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = unit_sphere_ahead();
        let ray = Ray::new(Vec3::ZERO, unit_vector(Vec3::new(1.0, 0.0, -0.0001)));
        assert!(sphere.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_none());

        // Pointing away from the sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_none());
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let sphere = unit_sphere_ahead();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, -1.0));

        let rec = sphere
            .hit(&ray, Interval::new(0.001, f64::INFINITY))
            .expect("ray from the center should hit the shell");
        assert!((rec.t - 0.5).abs() < 1e-12);
        assert!(!rec.front_face);
        // Normal faces back toward the ray origin
        assert!((rec.normal - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_sphere_unnormalized_direction() {
        let sphere = unit_sphere_ahead();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0));

        let rec = sphere
            .hit(&ray, Interval::new(0.001, f64::INFINITY))
            .expect("hit");
        assert!((rec.t - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_sphere_interval_is_exclusive() {
        let sphere = unit_sphere_ahead();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        // Near root sits exactly on t_max, far root beyond it
        assert!(sphere.hit(&ray, Interval::new(0.001, 0.5)).is_none());
        // Near root before t_min, far root inside
        let rec = sphere.hit(&ray, Interval::new(0.6, 10.0)).expect("far hit");
        assert!((rec.t - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_try_new_rejects_bad_radius() {
        let material = Arc::new(Material::lambertian(Color::ONE));
        assert!(matches!(
            Sphere::try_new(Vec3::ZERO, 0.0, material.clone()),
            Err(SceneError::InvalidRadius(_))
        ));
        assert!(Sphere::try_new(Vec3::ZERO, f64::NAN, material.clone()).is_err());
        assert!(Sphere::try_new(Vec3::ZERO, 2.0, material).is_ok());
    }
}
