//! Writing rendered images to disk or stdout.
//!
//! PPM comes from [`ImageBuffer::write_ppm`]; PNG goes through the `image` crate.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use prism_renderer::ImageBuffer;

/// Save `image` to `path`, or to stdout when `path` is `-`.
///
/// A `.png` extension selects PNG; anything else gets PPM.
pub fn save(image: &ImageBuffer, path: &Path) -> Result<()> {
    if path == Path::new("-") {
        let stdout = io::stdout();
        return image
            .write_ppm(BufWriter::new(stdout.lock()))
            .context("Failed to write to stdout");
    }

    let is_png = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false);

    if is_png {
        image::save_buffer(
            path,
            image.as_bytes(),
            image.width,
            image.height,
            image::ColorType::Rgb8,
        )
        .with_context(|| format!("Failed to write PNG to {}", path.display()))?;
    } else {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        image
            .write_ppm(BufWriter::new(file))
            .with_context(|| format!("Failed to write PPM to {}", path.display()))?;
    }

    log::info!("Wrote {}", path.display());
    Ok(())
}
