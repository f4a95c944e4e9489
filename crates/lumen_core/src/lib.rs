//! Lumen Core - scene description types and the scene text format.
//!
//! This crate provides:
//!
//! - **Scene description types**: `SceneDescription`, `CameraSettings`,
//!   `SphereRecord`, `QuadRecord`, `Material`
//! - **Scene files**: parsing and loading of the tagged-record text format
//!
//! Nothing here knows how to render; `lumen_renderer` builds its own
//! immutable scene from a `SceneDescription`.
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::load_scene;
//!
//! let description = load_scene("scenes/cornell.txt")?;
//! println!("Loaded {} quads, {} lights",
//!     description.quads.len(),
//!     description.lights.len());
//! ```

pub mod scene;
pub mod scene_file;

// Re-export commonly used types
pub use scene::{CameraSettings, Material, QuadRecord, SceneDescription, SphereRecord};
pub use scene_file::{load_scene, load_scene_from_string, LoadError, ParseError};
