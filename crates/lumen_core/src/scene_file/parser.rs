//! Tokenizer and record parser for scene files.

use std::collections::VecDeque;
use std::f32::consts::PI;

use lumen_math::Vec3;
use thiserror::Error;

use crate::scene::{Material, QuadRecord, SceneDescription, SphereRecord};

/// Errors that can occur while parsing a scene file.
#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Unknown record '{tag}' at line {line}")]
    UnknownRecord { line: usize, tag: String },

    #[error("Unexpected end of file inside '{0}' record")]
    UnexpectedEof(&'static str),

    #[error("Invalid number '{token}' at line {line}")]
    InvalidNumber { line: usize, token: String },

    #[error("Invalid sphere radius {radius} at line {line}")]
    InvalidRadius { line: usize, radius: f32 },

    #[error("Invalid resolution {width}x{height} at line {line}")]
    InvalidResolution { line: usize, width: u32, height: u32 },

    #[error("Invalid field of view {fov} at line {line} (expected radians in (0, pi))")]
    InvalidFov { line: usize, fov: f32 },

    #[error("Scene has no resolution ('R') record")]
    MissingResolution,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Scene file parser.
pub struct SceneParser<'a> {
    tokens: VecDeque<(usize, &'a str)>,
    material: Option<Material>,
}

impl<'a> SceneParser<'a> {
    /// Create a new parser from file contents.
    pub fn new(content: &'a str) -> Self {
        let tokens: VecDeque<_> = content
            .lines()
            .enumerate()
            .flat_map(|(i, line)| {
                let code = line.split('#').next().unwrap_or("");
                code.split_whitespace().map(move |token| (i + 1, token))
            })
            .collect();

        Self {
            tokens,
            material: None,
        }
    }

    /// Parse every record and return the scene description.
    pub fn parse(&mut self) -> ParseResult<SceneDescription> {
        let mut scene = SceneDescription::default();
        let mut has_resolution = false;

        while let Some((line, tag)) = self.tokens.pop_front() {
            match tag {
                "E" => scene.camera.eye = self.parse_vec3("E")?,
                "V" => {
                    scene.camera.view_direction = self.parse_vec3("V")?;
                    scene.camera.view_up = self.parse_vec3("V")?;
                }
                "F" => {
                    let fov = self.parse_f32("F")?;
                    if !(fov > 0.0 && fov < PI) {
                        return Err(ParseError::InvalidFov { line, fov });
                    }
                    scene.camera.fov = fov;
                }
                "R" => {
                    let width = self.parse_u32("R")?;
                    let height = self.parse_u32("R")?;
                    if width == 0 || height == 0 {
                        return Err(ParseError::InvalidResolution { line, width, height });
                    }
                    scene.camera.width = width;
                    scene.camera.height = height;
                    has_resolution = true;
                }
                "S" => {
                    let center = self.parse_vec3("S")?;
                    let radius = self.parse_f32("S")?;
                    if radius <= 0.0 {
                        return Err(ParseError::InvalidRadius { line, radius });
                    }
                    let material = self.current_material("S", line);
                    scene.spheres.push(SphereRecord {
                        center,
                        radius,
                        material,
                    });
                }
                "T" => {
                    let quad = self.parse_quad("T", line)?;
                    scene.quads.push(quad);
                }
                "L" => {
                    let light = self.parse_quad("L", line)?;
                    scene.lights.push(light);
                }
                "M" => {
                    let mut values = [0.0; 8];
                    for value in &mut values {
                        *value = self.parse_f32("M")?;
                    }
                    self.material = Some(Material::from_values(values));
                }
                other => {
                    return Err(ParseError::UnknownRecord {
                        line,
                        tag: other.to_string(),
                    })
                }
            }
        }

        if !has_resolution {
            return Err(ParseError::MissingResolution);
        }

        Ok(scene)
    }

    /// Parse the corners and normal of a `T` or `L` record.
    fn parse_quad(&mut self, record: &'static str, line: usize) -> ParseResult<QuadRecord> {
        let mut corners = [Vec3::ZERO; 4];
        for corner in &mut corners {
            *corner = self.parse_vec3(record)?;
            self.skip_separator();
        }
        let normal = self.parse_vec3(record)?;
        let material = self.current_material(record, line);

        Ok(QuadRecord {
            corners,
            normal,
            material,
        })
    }

    /// Consume one non-numeric token between quad corners, if present.
    fn skip_separator(&mut self) {
        if let Some((_, token)) = self.tokens.front() {
            if token.parse::<f32>().is_err() {
                self.tokens.pop_front();
            }
        }
    }

    fn current_material(&self, record: &str, line: usize) -> Material {
        match self.material {
            Some(material) => material,
            None => {
                log::warn!(
                    "'{}' record at line {} has no preceding material, using default",
                    record,
                    line
                );
                Material::default()
            }
        }
    }

    fn next_token(&mut self, record: &'static str) -> ParseResult<(usize, &'a str)> {
        self.tokens
            .pop_front()
            .ok_or(ParseError::UnexpectedEof(record))
    }

    fn parse_f32(&mut self, record: &'static str) -> ParseResult<f32> {
        let (line, token) = self.next_token(record)?;
        match token.parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ParseError::InvalidNumber {
                line,
                token: token.to_string(),
            }),
        }
    }

    fn parse_u32(&mut self, record: &'static str) -> ParseResult<u32> {
        let (line, token) = self.next_token(record)?;
        token.parse::<u32>().map_err(|_| ParseError::InvalidNumber {
            line,
            token: token.to_string(),
        })
    }

    fn parse_vec3(&mut self, record: &'static str) -> ParseResult<Vec3> {
        let x = self.parse_f32(record)?;
        let y = self.parse_f32(record)?;
        let z = self.parse_f32(record)?;
        Ok(Vec3::new(x, y, z))
    }
}

/// Parse scene file contents into a scene description.
pub fn parse_scene(content: &str) -> ParseResult<SceneDescription> {
    SceneParser::new(content).parse()
}
