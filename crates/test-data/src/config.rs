//! Configuration types for test data generation.

use serde::{Deserialize, Serialize};

/// Geographic bounding box defined by southwest and northeast corners.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum latitude (south)
    pub min_lat: f64,
    /// Minimum longitude (west)
    pub min_lon: f64,
    /// Maximum latitude (north)
    pub max_lat: f64,
    /// Maximum longitude (east)
    pub max_lon: f64,
}

impl BoundingBox {
    pub const fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Returns a random point within the bounding box.
    pub fn random_point(&self, rng: &mut impl rand::Rng) -> (f64, f64) {
        let lat = rng.gen_range(self.min_lat..self.max_lat);
        let lon = rng.gen_range(self.min_lon..self.max_lon);
        (lat, lon)
    }

    /// Returns the center of the bounding box.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// Pre-defined geographic regions for test data generation.
#[derive(Debug, Clone, Copy)]
pub struct Region;

impl Region {
    /// Reno/Tahoe area - mountain running with significant elevation changes.
    pub const RENO_TAHOE: BoundingBox = BoundingBox::new(39.0, -120.5, 39.6, -119.5);

    /// Boulder, CO area - popular running trails with varied terrain.
    pub const BOULDER: BoundingBox = BoundingBox::new(39.9, -105.5, 40.1, -105.2);
}

/// Configuration for the GPX seeding binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Number of runs to generate.
    pub run_count: usize,

    /// Run distance range in meters (min, max).
    pub distance_range: (f64, f64),

    /// Target region for track generation.
    pub region: BoundingBox,

    /// RNG seed for reproducible output.
    pub seed: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            run_count: 12,
            distance_range: (3_000.0, 12_000.0),
            region: Region::BOULDER,
            seed: 12345,
        }
    }
}
