//! Renders the classic three-sphere scene built through the library API and
//! writes it as PPM.
//!
//! Run with `cargo run --release --example three_spheres > spheres.ppm`.

use std::io::{self, BufWriter};
use std::sync::Arc;

use prism_renderer::{
    render_parallel, CameraSettings, Color, HittableList, Material, Point3, RenderConfig, Sphere,
    Vec3,
};

fn main() -> io::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let ground = Arc::new(Material::lambertian(Color::new(0.8, 0.8, 0.0)));
    let center = Arc::new(Material::lambertian(Color::new(0.1, 0.2, 0.5)));
    let glass = Arc::new(Material::dielectric(1.5));
    let gold = Arc::new(Material::metal(Color::new(0.8, 0.6, 0.2), 0.0));

    let mut world = HittableList::new();
    world.add(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0, ground));
    world.add(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, center));
    world.add(Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.5, glass));
    world.add(Sphere::new(Point3::new(1.0, 0.0, -1.0), 0.5, gold));

    let (width, height) = (400, 225);
    let camera = CameraSettings::default()
        .with_position(Point3::new(-2.0, 2.0, 1.0), Point3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_view(30.0, f64::from(width) / f64::from(height))
        .build();

    let config = RenderConfig {
        samples_per_pixel: 100,
        ..RenderConfig::default()
    };
    let image = render_parallel(&camera, &world, width, height, &config);

    image.write_ppm(BufWriter::new(io::stdout().lock()))
}
