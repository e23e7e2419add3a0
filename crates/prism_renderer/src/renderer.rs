//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Depth-bounded bounce loop with a sky gradient as the only light
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma correction and 8-bit quantization

use std::io::{self, Write};
use std::time::Instant;

use prism_math::{random_f64, unit_vector, Color, Interval, Ray};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::{Camera, Hittable};

/// Smallest ray parameter accepted as a hit; keeps scattered rays from
/// re-hitting the surface they left because of rounding.
const T_MIN: f64 = 0.001;

/// Channel range before quantization.
const INTENSITY: Interval = Interval { min: 0.0, max: 0.999 };

/// Background gradient seen by rays that escape the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sky {
    /// Color toward the horizon and below
    pub horizon: Color,
    /// Color straight up
    pub zenith: Color,
}

impl Default for Sky {
    fn default() -> Self {
        Self {
            horizon: Color::ONE,
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }
}

impl Sky {
    /// Linear blend on the height of the unit direction.
    pub fn color(&self, ray: &Ray) -> Color {
        let unit_direction = unit_vector(ray.direction());
        let a = 0.5 * (unit_direction.y + 1.0);
        (1.0 - a) * self.horizon + a * self.zenith
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Background gradient
    pub sky: Sky,
    /// Seed for every random draw of a parallel render
    pub seed: u64,
    /// Edge length of the square tiles handed to worker threads
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            sky: Sky::default(),
            seed: 0,
            bucket_size: 32,
        }
    }
}

impl RenderConfig {
    /// Samples per pixel that keep total work roughly constant across
    /// resolutions: 90M samples per image, between 1 and 500 per pixel.
    pub fn auto_samples(width: u32, height: u32) -> u32 {
        let pixels = (u64::from(width) * u64::from(height)).max(1);
        (90_000_000 / pixels).clamp(1, 500) as u32
    }
}

/// Compute the color seen by a ray.
///
/// Follows the ray through at most `depth` surface interactions. Running out
/// of bounces or being absorbed yields black; escaping yields the sky color
/// weighted by every attenuation collected along the way.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    sky: &Sky,
    rng: &mut dyn RngCore,
) -> Color {
    let mut ray = *ray;
    let mut attenuation = Color::ONE;

    for _ in 0..depth {
        let Some(rec) = world.hit(&ray, Interval::new(T_MIN, f64::INFINITY)) else {
            return attenuation * sky.color(&ray);
        };

        match rec.material.scatter(&ray, &rec, rng) {
            Some(scatter) => {
                attenuation *= scatter.attenuation;
                ray = scatter.scattered;
            }
            None => return Color::ZERO,
        }
    }

    Color::ZERO
}

/// Average `samples_per_pixel` jittered samples of pixel `(i, j)`.
///
/// `j` counts rows from the bottom of the image.
#[allow(clippy::too_many_arguments)]
pub fn sample_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    i: u32,
    j: u32,
    width: u32,
    height: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = config.samples_per_pixel.max(1);
    let u_scale = f64::from(width.saturating_sub(1).max(1));
    let v_scale = f64::from(height.saturating_sub(1).max(1));

    let mut pixel_color = Color::ZERO;
    for _ in 0..samples {
        let u = (f64::from(i) + random_f64(rng)) / u_scale;
        let v = (f64::from(j) + random_f64(rng)) / v_scale;
        let ray = camera.get_ray(u, v, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, &config.sky, rng);
    }

    pixel_color / f64::from(samples)
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert an averaged color to 8-bit RGB: gamma 2, clamp to [0, 0.999],
/// scale by 256 and truncate.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let to_byte = |c: f64| (256.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}

/// 8-bit RGB image, rows stored top to bottom, pixels left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y), with y = 0 the top row.
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let index = self.index(x, y);
        self.pixels[index] = rgb;
    }

    /// Write the image as plain-text PPM (P3): the header, then one
    /// `r g b` line per pixel, top row first.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P3\n{} {}\n255\n", self.width, self.height)?;
        for [r, g, b] in &self.pixels {
            writeln!(out, "{} {} {}", r, g, b)?;
        }
        out.flush()
    }

    /// Tightly packed RGB bytes in output order.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Whether `done` of `total` work items is a point worth reporting at info
/// level: roughly every tenth of the work, and at the end.
pub(crate) fn progress_due(done: usize, total: usize) -> bool {
    let step = (total / 10).max(1);
    done == total || done % step == 0
}

/// Render the entire scene on the calling thread.
///
/// Random numbers are drawn from `rng` in output order, so a seeded
/// generator reproduces the image exactly.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    width: u32,
    height: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> ImageBuffer {
    let start = Instant::now();
    log::info!(
        "Rendering {}x{} @ {} spp, max depth {} (single-threaded)",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth
    );

    let mut image = ImageBuffer::new(width, height);
    for y in 0..height {
        let j = height - 1 - y;
        for x in 0..width {
            let color = sample_pixel(camera, world, x, j, width, height, config, rng);
            image.set(x, y, color_to_rgb(color));
        }

        let done = y as usize + 1;
        if progress_due(done, height as usize) {
            log::info!("Scanlines remaining: {}", height as usize - done);
        }
    }

    log::info!("Rendered in {:?}", start.elapsed());
    image
}
