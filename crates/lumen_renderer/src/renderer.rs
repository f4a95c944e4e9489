//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive diffuse bounces with uniform hemisphere sampling
//! - A fixed bounce-depth cutoff (optionally Russian roulette on top)
//! - Reinhard tone mapping and gamma correction

use std::path::Path;
use std::time::Instant;

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::hittable::Hit;
use crate::sampling::{cosine_falloff, gen_f32, uniform_hemisphere, UNIFORM_HEMISPHERE_PDF};
use crate::{Color, PinholeCamera, Ray, RenderConfig, Scene};
use rand::RngCore;
use rayon::prelude::*;

/// Display gamma applied after tone mapping.
pub const GAMMA: f32 = 2.2;

/// Estimate the radiance arriving along a ray.
///
/// `depth` counts diffuse bounces taken so far; once it exceeds
/// `config.max_bounces` the path contributes nothing.
pub fn trace(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if depth > config.max_bounces {
        return Color::ZERO;
    }

    match scene.resolve(ray) {
        Hit::Light { light, .. } => light.color(),
        Hit::Patch {
            patch, position, ..
        } => {
            let depth = depth + 1;

            let mut survival = 1.0;
            if let Some(p) = config.russian_roulette {
                if depth > 1 {
                    if gen_f32(rng) >= p {
                        return Color::ZERO;
                    }
                    survival = p;
                }
            }

            let normal = patch.normal();
            let direction = uniform_hemisphere(normal, rng);
            let bounce = Ray::new(position, direction);

            let incoming = trace(&bounce, scene, depth, config, rng);
            let cosine = cosine_falloff(normal, direction);

            incoming * patch.color() * cosine / (UNIFORM_HEMISPHERE_PDF * survival)
        }
        // Spheres are occluders only
        Hit::Sphere { .. } | Hit::None => Color::ZERO,
    }
}

/// Average `samples_per_pixel` path estimates through pixel (x, y).
pub fn render_pixel(
    camera: &PinholeCamera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if config.samples_per_pixel == 0 {
        return Color::ZERO;
    }

    let ray = camera.get_ray(x, y);
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        pixel_color += trace(&ray, scene, 0, config, rng);
    }

    pixel_color / config.samples_per_pixel as f32
}

/// Reinhard operator `c / (c + 1)`. Non-positive and NaN inputs map to 0.
#[inline]
pub fn reinhard(c: f32) -> f32 {
    if c.is_nan() || c <= 0.0 {
        0.0
    } else if c.is_infinite() {
        1.0
    } else {
        c / (c + 1.0)
    }
}

/// Apply gamma correction (gamma = 2.2).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    linear.powf(1.0 / GAMMA)
}

/// Tone-mapped, gamma-corrected channel scaled to [0, 255], before quantizing.
#[inline]
fn display_value(c: f32) -> f32 {
    255.0 * linear_to_gamma(reinhard(c))
}

/// Tone map, gamma correct and quantize one channel (truncating).
#[inline]
pub fn tone_map(c: f32) -> u8 {
    display_value(c) as u8
}

/// Convert a linear radiance estimate to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    [tone_map(color.x), tone_map(color.y), tone_map(color.z)]
}

/// Linear radiance image produced by a render.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Copy a rendered bucket into the pixels it covers.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for local_y in 0..bucket.height {
            for local_x in 0..bucket.width {
                let color = result.pixels[(local_y * bucket.width + local_x) as usize];
                self.set(bucket.x + local_x, bucket.y + local_y, color);
            }
        }
    }

    /// Convert to tightly packed RGB8 bytes, row-major from the top.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color));
        }
        bytes
    }

    /// Tone map and write the image; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> image::ImageResult<()> {
        let path = path.as_ref();
        image::save_buffer(
            path,
            &self.to_rgb8(),
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )?;
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Render the entire scene in parallel, one rayon task per bucket.
pub fn render(camera: &PinholeCamera, scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let (width, height) = (camera.image_width, camera.image_height);
    let buckets = generate_buckets(width, height, config.bucket_size);

    log::info!(
        "Rendering {}x{} @ {} spp, max {} bounces, {} primitives, {} buckets",
        width,
        height,
        config.samples_per_pixel,
        config.max_bounces,
        scene.len(),
        buckets.len()
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let pixels = render_bucket(bucket, camera, scene, config);
            log::debug!("Bucket at ({}, {}) done", bucket.x, bucket.y);
            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Rendered in {:?}", start.elapsed());
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Patch, Sphere, Vec3};
    use lumen_core::CameraSettings;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f32::consts::FRAC_PI_2;

    /// Axis-aligned square in the plane z = `z`, half extent `h`.
    fn square(z: f32, h: f32) -> [Vec3; 4] {
        [
            Vec3::new(-h, -h, z),
            Vec3::new(h, -h, z),
            Vec3::new(h, h, z),
            Vec3::new(-h, h, z),
        ]
    }

    fn camera(width: u32, height: u32) -> PinholeCamera {
        PinholeCamera::new(&CameraSettings {
            eye: Vec3::ZERO,
            view_direction: Vec3::NEG_Z,
            view_up: Vec3::Y,
            fov: FRAC_PI_2,
            width,
            height,
        })
    }

    /// Diffuse floor facing +Y below a light facing -Y.
    fn floor_and_light() -> Scene {
        let floor = Patch::surface(
            [
                Vec3::new(-10.0, -1.0, 10.0),
                Vec3::new(10.0, -1.0, 10.0),
                Vec3::new(10.0, -1.0, -10.0),
                Vec3::new(-10.0, -1.0, -10.0),
            ],
            Vec3::Y,
            Material::diffuse(Color::splat(0.8)),
        );
        let light = Patch::light(
            [
                Vec3::new(-10.0, 5.0, 10.0),
                Vec3::new(10.0, 5.0, 10.0),
                Vec3::new(10.0, 5.0, -10.0),
                Vec3::new(-10.0, 5.0, -10.0),
            ],
            Vec3::NEG_Y,
            Material::emissive(Color::ONE),
        );
        Scene::new(Vec::new(), vec![floor], vec![light])
    }

    fn config(samples: u32, max_bounces: u32) -> RenderConfig {
        RenderConfig {
            samples_per_pixel: samples,
            max_bounces,
            bucket_size: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_trace_past_max_depth_is_black() {
        let scene = Scene::new(
            Vec::new(),
            Vec::new(),
            vec![Patch::light(square(-1.0, 10.0), Vec3::Z, Material::emissive(Color::ONE))],
        );
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let too_deep = config.max_bounces + 1;
        assert_eq!(trace(&ray, &scene, too_deep, &config, &mut rng), Color::ZERO);
        assert_eq!(trace(&ray, &scene, config.max_bounces, &config, &mut rng), Color::ONE);

        let scene = floor_and_light();
        let down = Ray::new(Vec3::ZERO, Vec3::NEG_Y);
        for _ in 0..100 {
            assert_eq!(trace(&down, &scene, too_deep, &config, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_trace_light_returns_emission() {
        let scene = Scene::new(
            Vec::new(),
            Vec::new(),
            vec![Patch::light(
                square(-2.0, 1.0),
                Vec3::Z,
                Material::emissive(Color::new(3.0, 2.0, 1.0)),
            )],
        );
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let color = trace(&ray, &scene, 0, &RenderConfig::default(), &mut rng);
        assert_eq!(color, Color::new(3.0, 2.0, 1.0));
    }

    #[test]
    fn test_trace_sphere_and_miss_are_black() {
        let scene = Scene::new(
            vec![Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, Material::diffuse(Color::ONE))],
            Vec::new(),
            vec![Patch::light(square(-5.0, 10.0), Vec3::Z, Material::emissive(Color::ONE))],
        );
        let mut rng = StdRng::seed_from_u64(1);
        let config = RenderConfig::default();

        // Sphere blocks the light behind it
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(trace(&ray, &scene, 0, &config, &mut rng), Color::ZERO);

        let away = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(trace(&away, &scene, 0, &config, &mut rng), Color::ZERO);
    }

    /// Projected solid angle of a `2a x 2b` rectangle seen from a point
    /// at height `h` below its center, facing it.
    fn projected_solid_angle(a: f32, b: f32, h: f32) -> f32 {
        let (x, y) = (a / h, b / h);
        let sx = (1.0 + x * x).sqrt();
        let sy = (1.0 + y * y).sqrt();
        let corner = (x / sx * (y / sx).atan() + y / sy * (x / sy).atan())
            / (2.0 * std::f32::consts::PI);
        std::f32::consts::PI * 4.0 * corner
    }

    #[test]
    fn test_trace_diffuse_bounce_converges() {
        // One bounce off the floor: radiance tends to
        // albedo * emission * (projected solid angle of the light)
        let scene = floor_and_light();
        let config = config(1, 1);
        let mut rng = StdRng::seed_from_u64(99);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Y);

        let n = 20_000;
        let mut sum = Color::ZERO;
        for _ in 0..n {
            sum += trace(&ray, &scene, 0, &config, &mut rng);
        }
        let mean = sum / n as f32;
        let expected = 0.8 * projected_solid_angle(10.0, 10.0, 6.0);

        assert!((mean.x - expected).abs() < 0.08, "mean {:?}, expected {}", mean, expected);
        assert_eq!(mean.x, mean.y);
        assert_eq!(mean.y, mean.z);
    }

    #[test]
    fn test_trace_zero_bounces_hides_indirect_light() {
        let scene = floor_and_light();
        let config = config(1, 0);
        let mut rng = StdRng::seed_from_u64(5);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Y);

        // The bounce off the floor happens at depth 1 > max_bounces
        for _ in 0..100 {
            assert_eq!(trace(&ray, &scene, 0, &config, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_russian_roulette_stays_unbiased() {
        // Floor and diffuse ceiling facing each other, small light just
        // under the ceiling: paths bounce several times before escaping
        let floor = Patch::surface(
            [
                Vec3::new(-10.0, -1.0, 10.0),
                Vec3::new(10.0, -1.0, 10.0),
                Vec3::new(10.0, -1.0, -10.0),
                Vec3::new(-10.0, -1.0, -10.0),
            ],
            Vec3::Y,
            Material::diffuse(Color::splat(0.5)),
        );
        let ceiling = Patch::surface(
            [
                Vec3::new(-10.0, 5.0, 10.0),
                Vec3::new(10.0, 5.0, 10.0),
                Vec3::new(10.0, 5.0, -10.0),
                Vec3::new(-10.0, 5.0, -10.0),
            ],
            Vec3::NEG_Y,
            Material::diffuse(Color::splat(0.5)),
        );
        let light = Patch::light(
            [
                Vec3::new(-2.0, 4.9, 2.0),
                Vec3::new(2.0, 4.9, 2.0),
                Vec3::new(2.0, 4.9, -2.0),
                Vec3::new(-2.0, 4.9, -2.0),
            ],
            Vec3::NEG_Y,
            Material::emissive(Color::ONE),
        );
        let scene = Scene::new(Vec::new(), vec![floor, ceiling], vec![light]);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Y);
        let n = 200_000;

        let estimate = |config: &RenderConfig, seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut sum = 0.0f64;
            for _ in 0..n {
                sum += f64::from(trace(&ray, &scene, 0, config, &mut rng).x);
            }
            sum / n as f64
        };

        let fixed = estimate(&config(1, 3), 11);
        let roulette = estimate(
            &RenderConfig {
                russian_roulette: Some(0.5),
                ..config(1, 3)
            },
            12,
        );

        assert!(fixed > 0.0);
        assert!(
            (fixed - roulette).abs() < 0.1 * fixed,
            "fixed {} vs roulette {}",
            fixed,
            roulette
        );
    }

    #[test]
    fn test_tone_map_values() {
        assert_eq!(tone_map(0.0), 0);
        assert_eq!(tone_map(-1.0), 0);
        assert_eq!(tone_map(f32::NAN), 0);
        assert_eq!(tone_map(f32::INFINITY), 255);
        assert_eq!(tone_map(1e30), 255);

        let expected = (255.0 * 0.5f32.powf(1.0 / 2.2)) as u8;
        assert_eq!(expected, 186);
        assert_eq!(tone_map(1.0), expected);
    }

    #[test]
    fn test_tone_map_monotonic() {
        let mut previous = 0u8;
        let mut c = 0.0f32;
        while c < 1000.0 {
            let value = tone_map(c);
            assert!(value >= previous, "tone_map({}) = {} < {}", c, value, previous);
            previous = value;
            c += 0.01 + c * 0.01;
        }
    }

    #[test]
    fn test_display_value_stays_in_byte_range() {
        // Checked before the cast, which would saturate an overflow
        let mut inputs = vec![0.0, 1e-30, 0.5, 1.0, 1e6, 1e20, 1e30, f32::MAX, f32::INFINITY];
        let mut c = 1e-3f32;
        while c < 1e30 {
            inputs.push(c);
            c *= 1.7;
        }

        for c in inputs {
            let value = display_value(c);
            assert!(value >= 0.0, "display_value({}) = {} is negative", c, value);
            assert!(value <= 255.0, "display_value({}) = {} exceeds 255", c, value);
        }
        assert_eq!(display_value(f32::MAX), 255.0);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-6);
        assert!((linear_to_gamma(0.5) - 0.72974).abs() < 1e-4);
    }

    #[test]
    fn test_full_view_light_renders_uniform_gray() {
        // A white light filling the whole view: every primary ray sees
        // radiance 1, which maps to 255 * 0.5^(1/2.2)
        let scene = Scene::new(
            Vec::new(),
            Vec::new(),
            vec![Patch::light(square(-1.0, 100.0), Vec3::Z, Material::emissive(Color::ONE))],
        );
        let image = render(&camera(6, 5), &scene, &config(1, 1));

        for y in 0..image.height {
            for x in 0..image.width {
                let rgb = color_to_rgb(image.get(x, y));
                assert_eq!(rgb, [186, 186, 186], "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_empty_scene_renders_black() {
        let image = render(&camera(5, 3), &Scene::default(), &config(2, 3));
        assert_eq!(image.pixels.len(), 15);
        assert!(image.to_rgb8().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_render_is_reproducible() {
        let scene = Scene::new(
            Vec::new(),
            vec![Patch::surface(square(-2.0, 1.0), Vec3::Z, Material::diffuse(Color::splat(0.7)))],
            vec![Patch::light(
                [
                    Vec3::new(-5.0, 2.0, 4.0),
                    Vec3::new(5.0, 2.0, 4.0),
                    Vec3::new(5.0, 2.0, -2.0),
                    Vec3::new(-5.0, 2.0, -2.0),
                ],
                Vec3::NEG_Y,
                Material::emissive(Color::splat(4.0)),
            )],
        );
        let cam = camera(9, 7);
        let config = RenderConfig {
            seed: 17,
            ..config(64, 3)
        };

        let a = render(&cam, &scene, &config);
        let b = render(&cam, &scene, &config);
        assert_eq!(a.pixels, b.pixels);

        // The lit quad shows up in the middle of the frame
        assert!(a.get(4, 3).length() > 0.0);
    }

    #[test]
    fn test_render_independent_of_bucket_size() {
        let scene = floor_and_light();
        let cam = PinholeCamera::new(&CameraSettings {
            view_direction: Vec3::new(0.0, -1.0, -1.0),
            width: 13,
            height: 9,
            ..CameraSettings::default()
        });

        let small = render(&cam, &scene, &RenderConfig { bucket_size: 4, ..config(4, 3) });
        let large = render(&cam, &scene, &RenderConfig { bucket_size: 5, ..config(4, 3) });
        let whole = render(&cam, &scene, &RenderConfig { bucket_size: 64, ..config(4, 3) });

        assert_eq!(small.pixels, large.pixels);
        assert_eq!(small.pixels, whole.pixels);
    }

    #[test]
    fn test_render_pixel_average() {
        let scene = Scene::new(
            Vec::new(),
            Vec::new(),
            vec![Patch::light(square(-1.0, 100.0), Vec3::Z, Material::emissive(Color::splat(2.0)))],
        );
        let mut rng = StdRng::seed_from_u64(42);
        let color = render_pixel(&camera(3, 3), &scene, 1, 1, &config(16, 3), &mut rng);
        assert!((color - Color::splat(2.0)).length() < 1e-5);
    }

    #[test]
    fn test_image_buffer_write_bucket() {
        use crate::Bucket;

        let mut image = ImageBuffer::new(4, 4);
        let bucket = Bucket::new(2, 1, 2, 2);
        let pixels = vec![Color::X, Color::Y, Color::Z, Color::ONE];
        image.write_bucket(&BucketResult::new(bucket, pixels));

        assert_eq!(image.get(2, 1), Color::X);
        assert_eq!(image.get(3, 1), Color::Y);
        assert_eq!(image.get(2, 2), Color::Z);
        assert_eq!(image.get(3, 2), Color::ONE);
        assert_eq!(image.get(0, 0), Color::ZERO);
        assert_eq!(image.to_rgb8().len(), 4 * 4 * 3);
    }

    #[test]
    fn test_save_ppm() {
        let mut image = ImageBuffer::new(2, 1);
        image.set(1, 0, Color::ONE);

        let path = std::env::temp_dir().join(format!("lumen_save_test_{}.ppm", std::process::id()));
        image.save(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert!(bytes.starts_with(b"P6"));
        assert!(bytes.ends_with(&[0, 0, 0, 186, 186, 186]));
    }
}
