//! Lumen command-line renderer.
//!
//! Usage: `lumen <scene.txt> [-o out.ppm] [--samples N] [--bounces M] [--seed S]
//! [--config render.json]`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use lumen_core::load_scene;
use lumen_renderer::{render, PinholeCamera, RenderConfig, Scene};

const USAGE: &str = "\
Usage: lumen <scene.txt> [options]

Options:
  -o, --output <file>   Output image (.ppm, .png); default N=<samples>,Mb=<bounces>.ppm
  -n, --samples <N>     Samples per pixel (default 4096)
  -b, --bounces <M>     Maximum bounce depth (default 3)
  -s, --seed <S>        Base random seed (default 0)
  -c, --config <file>   JSON render settings; flags override it
  -h, --help            Show this message";

/// Parsed command-line arguments.
#[derive(Debug, Default, PartialEq)]
struct Args {
    scene: PathBuf,
    output: Option<PathBuf>,
    samples: Option<u32>,
    bounces: Option<u32>,
    seed: Option<u64>,
    config: Option<PathBuf>,
}

/// Parse arguments (without the program name). `Ok(None)` means help was requested.
fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Option<Args>> {
    let mut args = args.into_iter();
    let mut parsed = Args::default();
    let mut scene = None;

    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .with_context(|| format!("Missing value for {}", name))
        };

        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "-o" | "--output" => parsed.output = Some(PathBuf::from(value("--output")?)),
            "-n" | "--samples" => {
                let v = value("--samples")?;
                let samples = v
                    .parse()
                    .with_context(|| format!("Invalid sample count '{}'", v))?;
                parsed.samples = Some(samples);
            }
            "-b" | "--bounces" => {
                let v = value("--bounces")?;
                let bounces = v
                    .parse()
                    .with_context(|| format!("Invalid bounce depth '{}'", v))?;
                parsed.bounces = Some(bounces);
            }
            "-s" | "--seed" => {
                let v = value("--seed")?;
                let seed = v.parse().with_context(|| format!("Invalid seed '{}'", v))?;
                parsed.seed = Some(seed);
            }
            "-c" | "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
            flag if flag.starts_with('-') => bail!("Unknown option '{}'", flag),
            path => {
                if scene.is_some() {
                    bail!("Unexpected extra argument '{}'", path);
                }
                scene = Some(PathBuf::from(path));
            }
        }
    }

    parsed.scene = scene.context("No scene file given")?;
    Ok(Some(parsed))
}

/// Merge defaults, the optional config file and command-line flags.
fn build_config(args: &Args) -> Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("Failed to load render config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    if let Some(samples) = args.samples {
        config.samples_per_pixel = samples;
    }
    if let Some(bounces) = args.bounces {
        config.max_bounces = bounces;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    config.validate()?;
    Ok(config)
}

/// Output name encoding the sample count and bounce depth.
fn default_output(config: &RenderConfig) -> PathBuf {
    PathBuf::from(format!(
        "N={},Mb={}.ppm",
        config.samples_per_pixel, config.max_bounces
    ))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!("{}", USAGE);
        return Ok(());
    };

    let config = build_config(&args)?;

    // All I/O happens before and after the parallel render
    let description = load_scene(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;
    let scene = Scene::from_description(&description);
    let camera = PinholeCamera::new(&description.camera);

    let image = render(&camera, &scene, &config);

    let output = args.output.clone().unwrap_or_else(|| default_output(&config));
    image
        .save(&output)
        .with_context(|| format!("Failed to write image {}", output.display()))?;

    Ok(())
}
