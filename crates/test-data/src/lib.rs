//! Test data generation for runlog.
//!
//! This crate provides tools for generating realistic GPS running tracks and
//! GPX files to support manual verification and integration testing.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use test_data::prelude::*;
//!
//! let mut rng = rand::thread_rng();
//! let points = TrackGenerator::for_region(Region::BOULDER, 42)
//!     .with_distance(5000.0)
//!     .generate(&RunnerProfile::recreational(), &mut rng);
//! let gpx = generate_gpx(&points, "Morning 5K");
//! ```

pub mod config;
pub mod gpx;
pub mod profiles;
pub mod scenarios;
pub mod terrain;
pub mod track;

// Re-export the raw point type from runlog
pub use runlog::models::TrackPointData;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{BoundingBox, Region, SeedConfig};
    pub use crate::gpx::generate_gpx;
    pub use crate::profiles::RunnerProfile;
    pub use crate::scenarios;
    pub use crate::terrain::ElevationGenerator;
    pub use crate::track::{TrackConfig, TrackGenerator};
    pub use crate::TrackPointData;
}
