//! Scene construction: the built-in cover scene and JSON scene descriptions.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use prism_math::{random_f64, random_range, random_vec, Color, Interval, Point3, Vec3};
use rand::RngCore;
use serde::Deserialize;

use crate::{CameraSettings, HittableList, Material, SceneError, Sky, Sphere};

/// The cover scene: a field of small random spheres around
/// three large ones on a huge ground sphere.
pub fn random_scene(rng: &mut dyn RngCore) -> HittableList {
    let mut world = HittableList::new();

    let ground = Arc::new(Material::lambertian(Color::new(0.5, 0.5, 0.5)));
    world.add(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0, ground));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = random_f64(rng);
            let center = Point3::new(
                a as f64 + 0.9 * random_f64(rng),
                0.2,
                b as f64 + 0.9 * random_f64(rng),
            );

            // Keep the metal sphere unobstructed
            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material = if choose_mat < 0.8 {
                let albedo = random_vec(rng, 0.0, 1.0) * random_vec(rng, 0.0, 1.0);
                Material::lambertian(albedo)
            } else if choose_mat < 0.95 {
                let albedo = random_vec(rng, 0.5, 1.0);
                let fuzz = random_range(rng, 0.0, 0.5);
                Material::metal(albedo, fuzz)
            } else {
                Material::dielectric(1.5)
            };
            world.add(Sphere::new(center, 0.2, Arc::new(material)));
        }
    }

    let metal = Arc::new(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0));
    let glass = Arc::new(Material::dielectric(1.5));
    let matte = Arc::new(Material::lambertian(Color::new(0.4, 0.2, 0.1)));

    world.add(Sphere::new(Point3::new(4.0, 1.0, 0.0), 1.0, metal));
    world.add(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, glass));
    world.add(Sphere::new(Point3::new(-4.0, 1.0, 0.0), 1.0, matte));

    world
}

/// Camera framing [`random_scene`].
pub fn cover_camera(aspect_ratio: f64) -> CameraSettings {
    CameraSettings::default()
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_view(20.0, aspect_ratio)
        .with_lens(0.1, 10.0)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum MaterialDesc {
    Lambertian {
        albedo: Color,
    },
    Metal {
        albedo: Color,
        #[serde(default)]
        fuzz: f64,
    },
    Dielectric {
        refractive_index: f64,
    },
}

impl MaterialDesc {
    fn build(&self) -> Result<Material, SceneError> {
        match *self {
            MaterialDesc::Lambertian { albedo } => Ok(Material::lambertian(albedo)),
            MaterialDesc::Metal { albedo, fuzz } => {
                if !Interval::new(0.0, 1.0).contains(fuzz) {
                    return Err(SceneError::InvalidFuzz(fuzz));
                }
                Ok(Material::metal(albedo, fuzz))
            }
            MaterialDesc::Dielectric { refractive_index } => {
                Material::try_dielectric(refractive_index)
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SphereDesc {
    center: Point3,
    radius: f64,
    material: String,
}

/// A scene read from JSON.
///
/// ```json
/// {
///   "camera": { "look_from": [0, 0, 0], "look_at": [0, 0, -1], "vfov": 90 },
///   "sky": { "horizon": [1, 1, 1], "zenith": [0.5, 0.7, 1.0] },
///   "materials": {
///     "ground": { "type": "lambertian", "albedo": [0.8, 0.8, 0.0] },
///     "glass": { "type": "dielectric", "refractive_index": 1.5 }
///   },
///   "spheres": [
///     { "center": [0, -100.5, -1], "radius": 100, "material": "ground" },
///     { "center": [0, 0, -1], "radius": 0.5, "material": "glass" }
///   ]
/// }
/// ```
///
/// The camera's aspect ratio is normally replaced by the output image's.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub sky: Sky,
    #[serde(default)]
    materials: HashMap<String, MaterialDesc>,
    #[serde(default)]
    spheres: Vec<SphereDesc>,
}

impl SceneDescription {
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Check the camera, then build the spheres, sharing each named material
    /// between its users.
    pub fn build(&self) -> Result<HittableList, SceneError> {
        self.camera.validate()?;

        let materials = self
            .materials
            .iter()
            .map(|(name, desc)| Ok((name.as_str(), Arc::new(desc.build()?))))
            .collect::<Result<HashMap<_, _>, SceneError>>()?;

        let world = self
            .spheres
            .iter()
            .map(|desc| {
                let material = materials
                    .get(desc.material.as_str())
                    .ok_or_else(|| SceneError::UnknownMaterial(desc.material.clone()))?;
                Sphere::try_new(desc.center, desc.radius, Arc::clone(material))
            })
            .collect::<Result<HittableList, SceneError>>()?;

        log::debug!(
            "Built scene: {} materials, {} spheres",
            materials.len(),
            world.len()
        );
        Ok(world)
    }
}
