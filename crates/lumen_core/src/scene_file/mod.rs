//! Scene text format support.
//!
//! A scene file is a stream of whitespace-separated tokens. Each record
//! starts with a single-letter tag followed by its numbers; `#` starts a
//! comment that runs to the end of the line.
//!
//! | Tag | Payload |
//! |-----|---------|
//! | `E` | eye position `x y z` |
//! | `V` | view direction `x y z`, view up `x y z` |
//! | `F` | vertical field of view in radians |
//! | `R` | image `width height` |
//! | `S` | sphere center `x y z`, radius |
//! | `T` | quad: four corners `x y z`, then normal `x y z` |
//! | `L` | area light, same layout as `T` |
//! | `M` | material `r g b ambient diffuse specular shininess reflection` |
//!
//! Each quad corner may be followed by one non-numeric separator token
//! (for example `,`), which is skipped.
//!
//! A material applies to every geometric record that follows it until the
//! next `M`.
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::scene_file::load_scene;
//!
//! let scene = load_scene("scenes/box.txt")?;
//! println!("{}x{}", scene.camera.width, scene.camera.height);
//! ```

mod loader;
mod parser;

pub use loader::*;
pub use parser::*;
