//! Prism - render sphere scenes from the command line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use argh::FromArgs;
use prism_renderer::scene::{cover_camera, random_scene, SceneDescription};
use prism_renderer::{render, render_parallel, CameraSettings, HittableList, RenderConfig, Sky};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod output;

/// Monte Carlo ray tracer for scenes made of spheres
#[derive(FromArgs)]
struct Options {
    /// width of the output image in pixels
    #[argh(option, short = 'w', default = "400")]
    width: u32,

    /// width over height, as `16:9` or `1.7778`
    #[argh(option, default = "16.0 / 9.0", from_str_fn(parse_aspect))]
    aspect: f64,

    /// samples per pixel (default: scaled to the image size)
    #[argh(option, short = 's')]
    samples: Option<u32>,

    /// maximum number of bounces per ray
    #[argh(option, default = "50")]
    max_depth: u32,

    /// seed for the scene and the sampler
    #[argh(option, default = "0")]
    seed: u64,

    /// path to a JSON scene; renders the random cover scene when omitted
    #[argh(option)]
    scene: Option<PathBuf>,

    /// worker threads (0 = one per core)
    #[argh(option, short = 'j', default = "0")]
    threads: usize,

    /// trace every pixel on the main thread, in scanline order
    #[argh(switch)]
    single_threaded: bool,

    /// output path; `-` writes PPM to stdout, `.png` writes PNG
    #[argh(option, short = 'o', default = "PathBuf::from(\"-\")")]
    output: PathBuf,
}

/// Parse `W:H` or a plain positive number.
fn parse_aspect(value: &str) -> Result<f64, String> {
    let ratio = match value.split_once(':') {
        Some((w, h)) => {
            let w: f64 = w.trim().parse().map_err(|e| format!("bad aspect width: {e}"))?;
            let h: f64 = h.trim().parse().map_err(|e| format!("bad aspect height: {e}"))?;
            w / h
        }
        None => value
            .trim()
            .parse()
            .map_err(|e| format!("bad aspect ratio: {e}"))?,
    };

    if ratio.is_finite() && ratio > 0.0 {
        Ok(ratio)
    } else {
        Err(format!("aspect ratio must be positive, got {value}"))
    }
}

fn image_height(width: u32, aspect: f64) -> u32 {
    ((f64::from(width) / aspect) as u32).max(1)
}

fn load_scene(options: &Options) -> Result<(CameraSettings, HittableList, Sky)> {
    match &options.scene {
        Some(path) => {
            let description = SceneDescription::from_file(path)
                .with_context(|| format!("Failed to load scene {}", path.display()))?;
            let world = description
                .build()
                .with_context(|| format!("Invalid scene {}", path.display()))?;
            log::info!("Loaded {} spheres from {}", world.len(), path.display());
            Ok((description.camera.clone(), world, description.sky))
        }
        None => {
            let mut rng = StdRng::seed_from_u64(options.seed);
            let world = random_scene(&mut rng);
            log::info!("Generated cover scene with {} spheres", world.len());
            Ok((cover_camera(options.aspect), world, Sky::default()))
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Stderr)
        .init();

    let options: Options = argh::from_env();

    if options.width == 0 {
        anyhow::bail!("image width must be at least 1");
    }
    let width = options.width;
    let height = image_height(width, options.aspect);

    let samples_per_pixel = match options.samples {
        Some(0) => {
            log::warn!("Zero samples per pixel requested, using 1");
            1
        }
        Some(samples) => samples,
        None => RenderConfig::auto_samples(width, height),
    };

    let (settings, world, sky) = load_scene(&options)?;
    let camera = settings.with_aspect_ratio(options.aspect).build();

    let config = RenderConfig {
        samples_per_pixel,
        max_depth: options.max_depth,
        sky,
        seed: options.seed,
        ..RenderConfig::default()
    };

    let image = if options.single_threaded {
        let mut rng = StdRng::seed_from_u64(options.seed);
        render(&camera, &world, width, height, &config, &mut rng)
    } else {
        if options.threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(options.threads)
                .build_global()
                .context("Failed to configure worker threads")?;
        }
        render_parallel(&camera, &world, width, height, &config)
    };

    output::save(&image, &options.output)
}
