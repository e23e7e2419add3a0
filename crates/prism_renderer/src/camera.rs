//! Camera for ray generation.

use prism_math::{random_in_unit_disk, unit_vector, Point3, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::SceneError;

/// Relative tolerance below which `vup` counts as parallel to the view axis.
const PARALLEL_EPS: f64 = 1e-12;

/// Placement and lens parameters from which a [`Camera`] is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub look_from: Point3,
    pub look_at: Point3,
    /// Hint for the camera's up direction; need not be orthogonal to the view
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f64,
    /// Viewport width over height
    pub aspect_ratio: f64,
    /// Lens diameter; zero gives a pinhole camera
    pub aperture: f64,
    /// Distance from the lens to the plane in perfect focus
    pub focus_dist: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
        }
    }
}

impl CameraSettings {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set field of view and aspect ratio.
    pub fn with_view(mut self, vfov: f64, aspect_ratio: f64) -> Self {
        self.vfov = vfov;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, aperture: f64, focus_dist: f64) -> Self {
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the aspect ratio, typically from the output image size.
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Reject settings that would give the camera a NaN basis or viewport.
    pub fn validate(&self) -> Result<(), SceneError> {
        let invalid = |reason: String| -> Result<(), SceneError> {
            Err(SceneError::InvalidCamera(reason))
        };

        if !(self.look_from.is_finite() && self.look_at.is_finite() && self.vup.is_finite()) {
            return invalid("look_from, look_at and vup must be finite".into());
        }

        let view = self.look_from - self.look_at;
        if view.length_squared() == 0.0 {
            return invalid(format!("look_from and look_at coincide at {}", self.look_at));
        }

        let alignment = PARALLEL_EPS * self.vup.length_squared() * view.length_squared();
        if !(self.vup.cross(view).length_squared() > alignment) {
            return invalid(format!(
                "vup {} is zero or parallel to the view direction",
                self.vup
            ));
        }

        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return invalid(format!("vfov must be within (0, 180), got {}", self.vfov));
        }
        if !(self.aspect_ratio > 0.0 && self.aspect_ratio.is_finite()) {
            return invalid(format!(
                "aspect_ratio must be positive, got {}",
                self.aspect_ratio
            ));
        }
        if !(self.aperture >= 0.0 && self.aperture.is_finite()) {
            return invalid(format!("aperture must not be negative, got {}", self.aperture));
        }
        if !(self.focus_dist > 0.0 && self.focus_dist.is_finite()) {
            return invalid(format!(
                "focus_dist must be positive, got {}",
                self.focus_dist
            ));
        }

        Ok(())
    }

    /// Derive the viewport and lens basis.
    ///
    /// Settings are assumed valid; see [`CameraSettings::validate`].
    pub fn build(&self) -> Camera {
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = self.aspect_ratio * viewport_height;

        // Orthonormal camera basis; w points backwards out of the lens
        let w = unit_vector(self.look_from - self.look_at);
        let u = unit_vector(self.vup.cross(w));
        let v = w.cross(u);

        let origin = self.look_from;
        let horizontal = self.focus_dist * viewport_width * u;
        let vertical = self.focus_dist * viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - self.focus_dist * w;

        Camera {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: self.aperture / 2.0,
        }
    }
}

/// A thin-lens camera. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    origin: Point3,
    lower_left_corner: Point3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f64,
}

impl Camera {
    /// Ray through normalized viewport coordinates `(s, t)`, both in [0, 1]
    /// with `(0, 0)` at the lower left.
    ///
    /// Only draws from `rng` when the lens has a non-zero radius.
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical
                - self.origin
                - offset,
        )
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Unit vector pointing from the scene back toward the camera.
    pub fn backward(&self) -> Vec3 {
        self.w
    }
}

impl Default for Camera {
    fn default() -> Self {
        CameraSettings::default().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_camera_basis() {
        let camera = CameraSettings::default()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_view(90.0, 2.0)
            .build();

        assert_eq!(camera.origin(), Vec3::ZERO);
        assert!((camera.backward() - Vec3::Z).length() < EPS);
        assert!((camera.u - Vec3::X).length() < EPS);
        assert!((camera.v - Vec3::Y).length() < EPS);

        // 90 degrees: viewport is 2 high, 4 wide at distance 1
        assert!((camera.vertical - Vec3::new(0.0, 2.0, 0.0)).length() < EPS);
        assert!((camera.horizontal - Vec3::new(4.0, 0.0, 0.0)).length() < EPS);
        assert!((camera.lower_left_corner - Vec3::new(-2.0, -1.0, -1.0)).length() < EPS);
    }

    #[test]
    fn test_pinhole_ray_directions() {
        let camera = CameraSettings::default().with_view(90.0, 2.0).build();
        let mut rng = StdRng::seed_from_u64(42);

        let center = camera.get_ray(0.5, 0.5, &mut rng);
        assert_eq!(center.origin(), Vec3::ZERO);
        assert!((center.direction() - Vec3::new(0.0, 0.0, -1.0)).length() < EPS);

        let corner = camera.get_ray(0.0, 0.0, &mut rng);
        assert!((corner.direction() - Vec3::new(-2.0, -1.0, -1.0)).length() < EPS);

        let top_right = camera.get_ray(1.0, 1.0, &mut rng);
        assert!((top_right.direction() - Vec3::new(2.0, 1.0, -1.0)).length() < EPS);
    }

    #[test]
    fn test_pinhole_does_not_consume_randomness() {
        let camera = Camera::default();
        let mut a = StdRng::seed_from_u64(3);
        let mut b = StdRng::seed_from_u64(3);

        camera.get_ray(0.25, 0.75, &mut a);
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_validate_accepts_defaults_and_cover_framing() {
        assert!(CameraSettings::default().validate().is_ok());
        assert!(crate::scene::cover_camera(1.5).validate().is_ok());

        // A tilted up hint is fine as long as it is not along the view axis
        let tilted = CameraSettings::default().with_position(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 1.0, 0.0),
        );
        assert!(tilted.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_degenerate_settings() {
        let base = CameraSettings::default();
        let rejected = [
            base.clone()
                .with_position(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y),
            base.clone()
                .with_position(Vec3::ZERO, Vec3::new(0.0, -5.0, 0.0), Vec3::Y),
            base.clone()
                .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::ZERO),
            base.clone()
                .with_position(Vec3::new(f64::NAN, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y),
            base.clone().with_view(0.0, 1.0),
            base.clone().with_view(180.0, 1.0),
            base.clone().with_view(-30.0, 1.0),
            base.clone().with_view(f64::NAN, 1.0),
            base.clone().with_aspect_ratio(0.0),
            base.clone().with_aspect_ratio(f64::INFINITY),
            base.clone().with_lens(-0.1, 1.0),
            base.clone().with_lens(0.1, 0.0),
            base.clone().with_lens(0.1, -2.0),
        ];

        for settings in &rejected {
            assert!(
                matches!(settings.validate(), Err(SceneError::InvalidCamera(_))),
                "accepted {settings:?}"
            );
        }
    }

    #[test]
    fn test_lens_keeps_focus_plane_sharp() {
        let look_from = Vec3::new(3.0, 3.0, 2.0);
        let look_at = Vec3::new(0.0, 0.0, -1.0);
        let focus_dist = (look_from - look_at).length();
        let camera = CameraSettings::default()
            .with_position(look_from, look_at, Vec3::Y)
            .with_view(20.0, 16.0 / 9.0)
            .with_lens(2.0, focus_dist)
            .build();
        let mut rng = StdRng::seed_from_u64(17);

        let mut origins_differ = false;
        for _ in 0..100 {
            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            // Origin stays on the lens disk
            let offset = ray.origin() - look_from;
            assert!(offset.length() <= 1.0 + EPS);
            assert!(offset.dot(camera.backward()).abs() < 1e-9);
            origins_differ |= offset.length() > 1e-6;

            // Every ray through the center reaches the look-at point at t = 1
            assert!((ray.at(1.0) - look_at).length() < 1e-9);
        }
        assert!(origins_differ);
    }
}
