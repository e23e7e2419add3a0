//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! and in parallel using rayon. Each bucket owns a generator seeded from the
//! render seed and the bucket's grid position, so the image does not depend
//! on how many threads ran or in which order buckets finished.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::renderer::{color_to_rgb, progress_due, sample_pixel};
use crate::{Camera, Hittable, ImageBuffer, RenderConfig};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner (0 = top row)
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Row-major position of this bucket in the grid
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Generate buckets covering an image, ordered from the center outward.
///
/// Edge buckets are cropped to the image. `index` keeps the row-major grid
/// position and is what seeds the bucket's generator.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);
    buckets
}

/// Sort buckets by distance from image center so the middle of the frame
/// finishes first.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| {
        distance(a)
            .partial_cmp(&distance(b))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.index.cmp(&b.index))
    });
}

/// Private generator for one bucket of a render.
pub fn bucket_rng(seed: u64, index: usize) -> StdRng {
    let stream = (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    StdRng::seed_from_u64(seed ^ stream)
}

/// Result of rendering a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order within the bucket
    pub pixels: Vec<[u8; 3]>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<[u8; 3]>) -> Self {
        Self { bucket, pixels }
    }

    /// Copy this bucket's pixels into their place in `image`.
    pub fn write_into(&self, image: &mut ImageBuffer) {
        let bucket = &self.bucket;
        for (row, chunk) in self.pixels.chunks(bucket.width as usize).enumerate() {
            for (col, rgb) in chunk.iter().enumerate() {
                image.set(bucket.x + col as u32, bucket.y + row as u32, *rgb);
            }
        }
    }
}

/// Render a single bucket of a `width` x `height` image.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    width: u32,
    height: u32,
    config: &RenderConfig,
) -> BucketResult {
    let mut rng = bucket_rng(config.seed, bucket.index);
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        // Image rows run top-down, viewport rows bottom-up
        let j = height - 1 - (bucket.y + local_y);
        for local_x in 0..bucket.width {
            let i = bucket.x + local_x;
            let color = sample_pixel(camera, world, i, j, width, height, config, &mut rng);
            pixels.push(color_to_rgb(color));
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Render the scene across the current rayon thread pool.
pub fn render_parallel(
    camera: &Camera,
    world: &dyn Hittable,
    width: u32,
    height: u32,
    config: &RenderConfig,
) -> ImageBuffer {
    let start = Instant::now();
    let buckets = generate_buckets(width, height, config.bucket_size);
    let total = buckets.len();
    log::info!(
        "Rendering {}x{} @ {} spp, max depth {} ({} buckets on {} threads)",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth,
        total,
        rayon::current_num_threads()
    );

    let finished = AtomicUsize::new(0);
    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, camera, world, width, height, config);
            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!(
                "Bucket {} at ({}, {}) done, {}/{}",
                bucket.index,
                bucket.x,
                bucket.y,
                done,
                total
            );
            if progress_due(done, total) {
                log::info!("Buckets done: {}/{}", done, total);
            }
            result
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        result.write_into(&mut image);
    }

    log::info!("Rendered in {:?}", start.elapsed());
    image
}
