//! Surface materials and their scattering laws.

use prism_math::{
    random_in_hemisphere, random_in_unit_sphere, reflect, refract, unit_vector, Color,
    Ray,
};
use rand::RngCore;

use crate::{hittable::HitRecord, SceneError};

/// Outcome of a ray scattering off a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    /// Per-channel factor applied to the light carried back along `scattered`
    pub attenuation: Color,
    /// The ray that replaces the incident one
    pub scattered: Ray,
}

/// How light interacts with a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Ideal diffuse surface.
    Lambertian { albedo: Color },
    /// Specular reflector; `fuzz` in [0, 1] blurs the reflection.
    Metal { albedo: Color, fuzz: f64 },
    /// Clear refractive material such as glass or water.
    Dielectric { refractive_index: f64 },
}

impl Material {
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian { albedo }
    }

    /// Metal with `fuzz` clamped into [0, 1].
    pub fn metal(albedo: Color, fuzz: f64) -> Self {
        Material::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Dielectric with the given index of refraction (1.0 = air, 1.5 = glass).
    ///
    /// The index must be positive; see [`Material::try_dielectric`].
    pub fn dielectric(refractive_index: f64) -> Self {
        Material::Dielectric { refractive_index }
    }

    pub fn try_dielectric(refractive_index: f64) -> Result<Self, SceneError> {
        if refractive_index.is_nan() || refractive_index <= 0.0 {
            return Err(SceneError::InvalidRefractiveIndex(refractive_index));
        }
        Ok(Self::dielectric(refractive_index))
    }

    /// Scatter an incoming ray at `rec`.
    ///
    /// `None` means the ray was absorbed.
    pub fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        match *self {
            Material::Lambertian { albedo } => {
                // Unit length, so never degenerate
                let scatter_direction = random_in_hemisphere(rng, rec.normal);

                Some(Scatter {
                    attenuation: albedo,
                    scattered: Ray::new(rec.p, scatter_direction),
                })
            }
            Material::Metal { albedo, fuzz } => {
                let reflected = reflect(unit_vector(ray_in.direction()), rec.normal);
                let direction = reflected + fuzz * random_in_unit_sphere(rng);

                // Fuzz pushed the reflection below the surface
                if direction.dot(rec.normal) <= 0.0 {
                    return None;
                }

                Some(Scatter {
                    attenuation: albedo,
                    scattered: Ray::new(rec.p, direction),
                })
            }
            Material::Dielectric { refractive_index } => {
                let refraction_ratio = if rec.front_face {
                    1.0 / refractive_index
                } else {
                    refractive_index
                };

                let unit_direction = unit_vector(ray_in.direction());
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                // Total internal reflection
                let cannot_refract = refraction_ratio * sin_theta > 1.0;

                let direction = if cannot_refract {
                    reflect(unit_direction, rec.normal)
                } else {
                    refract(unit_direction, rec.normal, refraction_ratio)
                };

                Some(Scatter {
                    attenuation: Color::ONE,
                    scattered: Ray::new(rec.p, direction),
                })
            }
        }
    }
}
