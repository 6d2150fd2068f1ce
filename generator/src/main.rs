use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use colorgrad::Gradient;
use image::{Rgb, RgbImage};
use log::info;
use thiserror::Error;

use realm_client::{ClientEnvironment, ClientError, ClientTerrain, ViewConfig};
use realm_server::{ConfigError, ServerConfig, SessionError, StreamingSession};
use terrain::coords::{CHUNK_HEIGHT, CHUNK_WIDTH};
use terrain::TerrainError;

const VIEWER_ID: &str = "realm-generator";

#[derive(Debug, Error)]
enum GeneratorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Terrain(#[from] TerrainError),
    #[error("failed to build color gradient: {0}")]
    Gradient(#[from] colorgrad::CustomGradientError),
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Parser)]
#[command(author, version, about = "Streams a terrain region in-process and renders its surface", long_about = None)]
struct Args {
    /// The seed for terrain generation, overrides the config file
    #[arg(short, long)]
    seed: Option<u32>,

    /// The radius of chunks to stream around the origin
    #[arg(short, long, default_value_t = 2)]
    radius: i32,

    /// The output PNG file path
    #[arg(short, long, default_value = "target/terrain.png")]
    output: PathBuf,

    /// Server config (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pixels per cell when rendering the image
    #[arg(long, default_value_t = 4)]
    scale: u32,

    /// Also write the environmentState message received by the client
    #[arg(long)]
    dump_json: Option<PathBuf>,
}

struct TerrainVisualizer {
    gradient: Gradient,
    amplitude: f64,
}

impl TerrainVisualizer {
    fn new(amplitude: f64) -> Result<Self, GeneratorError> {
        let gradient = colorgrad::CustomGradient::new()
            .colors(&[
                colorgrad::Color::new(0.0, 0.0, 0.5, 1.0), // Deep water
                colorgrad::Color::new(0.0, 0.0, 1.0, 1.0), // Shallow water
                colorgrad::Color::new(0.9, 0.9, 0.2, 1.0), // Beach
                colorgrad::Color::new(0.0, 0.6, 0.0, 1.0), // Grass
                colorgrad::Color::new(0.5, 0.3, 0.0, 1.0), // Mountain
                colorgrad::Color::new(1.0, 1.0, 1.0, 1.0), // Snow
            ])
            .domain(&[0.0, 0.3, 0.35, 0.4, 0.8, 1.0])
            .build()?;

        Ok(Self { gradient, amplitude })
    }

    fn color(&self, surface: Option<i32>) -> Rgb<u8> {
        match surface {
            Some(h) => {
                let normalized = (h as f64 + self.amplitude) / (2.0 * self.amplitude);
                let c = self.gradient.at(normalized.clamp(0.0, 1.0));
                Rgb([(c.r * 255.0) as u8, (c.g * 255.0) as u8, (c.b * 255.0) as u8])
            }
            None => Rgb([0, 0, 0]),
        }
    }

    /// Renders `heights` (row-major, `width` cells per row) with `scale` pixels per cell.
    fn save_terrain_image(
        &self,
        heights: &[Option<i32>],
        width: usize,
        scale: u32,
        output_path: &Path,
    ) -> Result<(), GeneratorError> {
        let depth = heights.len() / width.max(1);
        let mut img = RgbImage::new(width as u32 * scale, depth as u32 * scale);
        for z in 0..depth {
            for x in 0..width {
                let color = self.color(heights[z * width + x]);
                for dy in 0..scale {
                    for dx in 0..scale {
                        img.put_pixel(x as u32 * scale + dx, z as u32 * scale + dy, color);
                    }
                }
            }
        }
        img.save(output_path)?;
        Ok(())
    }
}

/// Surface heights of the square region, probing down from `top_y`.
fn sample_surface(terrain: &ClientTerrain, min_x: i32, min_z: i32, width: usize, top_y: i32) -> Vec<Option<i32>> {
    let mut heights = Vec::with_capacity(width * width);
    for z in 0..width as i32 {
        for x in 0..width as i32 {
            heights.push(terrain.surface_height(min_x + x, top_y, min_z + z, false));
        }
    }
    heights
}

fn run(args: Args) -> Result<(), GeneratorError> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;

    let radius = args.radius.max(0);
    let span = (radius * 2 + 1) * CHUNK_WIDTH;
    let mut session = StreamingSession::from_config(&config);
    session.register_viewer(VIEWER_ID)?;

    let mut client = ClientEnvironment::new(ViewConfig {
        view_size: [span as f64, (CHUNK_HEIGHT * 2) as f64, span as f64],
        ..ViewConfig::default()
    });

    // a camera with no direction centres the view on the middle of chunk 0
    let camera = [CHUNK_WIDTH as f64 / 2.0, 0.0, CHUNK_WIDTH as f64 / 2.0];
    let started = Instant::now();
    if let Some(request) = client.update_camera(camera, [0.0, 0.0, 0.0], started) {
        for (_, reply) in session.handle_json(VIEWER_ID, &request.to_json()?)? {
            if let Some(path) = &args.dump_json {
                fs::write(path, &reply)?;
                info!("Wrote environment state to {}", path.display());
            }
            let changed = client.handle_json(&reply)?;
            info!("Client applied {} chunks", changed.len());
        }
    }
    info!(
        "Streamed {} chunks in {:?} (server generated {})",
        client.terrain().len(),
        started.elapsed(),
        session.store().len()
    );

    let extent = client.view().current();
    let heights = sample_surface(
        client.terrain(),
        -radius * CHUNK_WIDTH,
        -radius * CHUNK_WIDTH,
        span as usize,
        extent.max_y - 1,
    );

    let visualizer = TerrainVisualizer::new(config.heightmap.amplitude)?;
    visualizer.save_terrain_image(&heights, span as usize, args.scale.max(1), &args.output)?;
    info!("Saved terrain preview to {}", args.output.display());
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        log::error!("{}", e);
        eprintln!("realm-generator: {}", e);
        std::process::exit(1);
    }
}
