use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a scene from a description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Sphere refers to unknown material '{0}'")]
    UnknownMaterial(String),

    #[error("Sphere radius must be positive, got {0}")]
    InvalidRadius(f64),

    #[error("Refractive index must be positive, got {0}")]
    InvalidRefractiveIndex(f64),

    #[error("Metal fuzz must be within [0, 1], got {0}")]
    InvalidFuzz(f64),

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),
}
