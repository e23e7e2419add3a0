//! Prism renderer - CPU Monte Carlo ray tracing of sphere scenes.
//!
//! Camera rays are traced through a list of spheres, scattered by their
//! materials until they escape to the sky or run out of bounces, and the
//! jittered samples of each pixel are averaged into 8-bit RGB.

mod bucket;
mod camera;
mod error;
mod hittable;
mod material;
mod renderer;
pub mod scene;
mod sphere;

pub use bucket::{bucket_rng, generate_buckets, render_bucket, render_parallel, Bucket, BucketResult};
pub use camera::{Camera, CameraSettings};
pub use error::SceneError;
pub use hittable::{HitRecord, Hittable, HittableList, Primitive};
pub use material::{Material, Scatter};
pub use renderer::{
    color_to_rgb, ray_color, render, sample_pixel, ImageBuffer, RenderConfig, Sky,
};
pub use sphere::Sphere;

/// Re-export the math types the renderer API is expressed in.
pub use prism_math::{Color, Interval, Point3, Ray, Vec3};
