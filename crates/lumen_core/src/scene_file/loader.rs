//! High-level scene loading.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::scene::SceneDescription;
use crate::scene_file::parser::{parse_scene, ParseError};

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load a scene file from disk.
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<SceneDescription> {
    let path = path.as_ref();
    log::info!("Loading scene file: {}", path.display());

    let content = fs::read_to_string(path)?;
    load_scene_from_string(&content)
}

/// Load a scene from an in-memory string.
pub fn load_scene_from_string(content: &str) -> LoadResult<SceneDescription> {
    let scene = parse_scene(content)?;

    log::info!(
        "Loaded scene: {}x{} ({} pixels), {} spheres, {} quads, {} lights",
        scene.camera.width,
        scene.camera.height,
        scene.camera.pixel_count(),
        scene.spheres.len(),
        scene.quads.len(),
        scene.lights.len()
    );
    if scene.lights.is_empty() {
        log::warn!("Scene has no lights, the image will be black");
    }

    Ok(scene)
}
