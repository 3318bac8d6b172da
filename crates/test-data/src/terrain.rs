//! Perlin noise-based elevation generation.

use noise::{NoiseFn, Perlin};

/// Generates realistic elevation data using Perlin noise.
///
/// Multiple octaves of noise give terrain both large-scale features and
/// small-scale variation, so generated runs pick up believable climbing.
#[derive(Debug, Clone)]
pub struct ElevationGenerator {
    perlin: Perlin,
    /// Base elevation in meters (e.g., valley floor).
    base_elevation: f64,
    /// Scale factor for terrain height variation.
    height_scale: f64,
    /// Spatial frequency (controls terrain "wavelength").
    frequency: f64,
    /// Number of noise octaves for detail.
    octaves: u32,
}

impl ElevationGenerator {
    /// Creates a new elevation generator with default settings.
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 1500.0,
            height_scale: 500.0,
            frequency: 0.0001,
            octaves: 4,
        }
    }

    /// Generator configured for the Reno/Tahoe region: higher base elevation
    /// and larger height scale for Sierra Nevada terrain.
    pub fn reno_tahoe(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 1900.0,
            height_scale: 800.0,
            frequency: 0.00008,
            octaves: 5,
        }
    }

    /// Generator configured for the Boulder, CO region.
    pub fn boulder(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 1650.0,
            height_scale: 600.0,
            frequency: 0.0001,
            octaves: 4,
        }
    }

    /// Generator for relatively flat terrain (rolling hills).
    pub fn flat(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 300.0,
            height_scale: 50.0,
            frequency: 0.0002,
            octaves: 2,
        }
    }

    /// Gets elevation at a lat/lon coordinate.
    ///
    /// Uses fractal Brownian motion (fBm) for natural terrain appearance.
    pub fn elevation_at(&self, lat: f64, lon: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        let mut max_amplitude = 0.0;

        for _ in 0..self.octaves {
            let noise_val = self.perlin.get([lat * frequency, lon * frequency]);
            total += noise_val * amplitude;
            max_amplitude += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        let normalized = total / max_amplitude; // Range: -1 to 1
        self.base_elevation + (normalized * self.height_scale)
    }
}
