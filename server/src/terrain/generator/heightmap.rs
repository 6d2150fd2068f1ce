use noise::{NoiseFn, Perlin};

use crate::config::HeightmapConfig;

/// Ground height, in cells, for each horizontal world position.
pub trait Heightmap {
    fn height(&self, x: i32, z: i32) -> f64;
}

impl<F> Heightmap for F
where
    F: Fn(i32, i32) -> f64,
{
    fn height(&self, x: i32, z: i32) -> f64 {
        self(x, z)
    }
}

/// Fractal Perlin noise scaled to a height range. Seeded once on construction
/// and never reseeded, so a given `(x, z)` always yields the same height.
pub struct HeightmapGenerator {
    noise: Perlin,
    base_frequency: f64,
    octaves: usize,
    persistence: f64,
    lacunarity: f64,
    amplitude: f64,
    offset_x: f64,
    offset_z: f64,
}

impl HeightmapGenerator {
    pub fn new(seed: u32) -> Self {
        Self::with_config(seed, &HeightmapConfig::default())
    }

    pub fn with_config(seed: u32, config: &HeightmapConfig) -> Self {
        Self {
            noise: Perlin::new(seed),
            base_frequency: config.frequency,
            octaves: config.octaves,
            persistence: config.persistence,
            lacunarity: config.lacunarity,
            amplitude: config.amplitude,
            offset_x: config.offset_x,
            offset_z: config.offset_z,
        }
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    fn sample_height(&self, x: f64, z: f64) -> f64 {
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut noise_height = 0.0;
        let mut max_value = 0.0;

        // shifted off the integer lattice, where Perlin is always zero
        let base_x = x * self.base_frequency + self.offset_x;
        let base_z = z * self.base_frequency + self.offset_z;

        for _ in 0..self.octaves {
            let perlin_value = self.noise.get([base_x * frequency, base_z * frequency]);
            noise_height += perlin_value * amplitude;

            max_value += amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        if max_value == 0.0 {
            return 0.0;
        }
        noise_height / max_value * self.amplitude
    }
}

impl Heightmap for HeightmapGenerator {
    fn height(&self, x: i32, z: i32) -> f64 {
        self.sample_height(x as f64, z as f64)
    }
}
