//! Procedural track generation.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use runlog::ingest::haversine_distance;
use runlog::models::TrackPointData;
use time::{Duration, OffsetDateTime};

use crate::config::BoundingBox;
use crate::profiles::RunnerProfile;
use crate::terrain::ElevationGenerator;

/// Configuration for procedural track generation.
#[derive(Debug, Clone)]
pub struct TrackConfig {
    /// Target distance in meters.
    pub distance_meters: f64,
    /// Starting point (lat, lon). If None, random within bounds.
    pub start_point: Option<(f64, f64)>,
    /// Run start time. If None, the current time is used.
    pub start_time: Option<OffsetDateTime>,
    /// Geographic bounds for the track.
    pub bounds: BoundingBox,
    /// GPS position jitter standard deviation in meters.
    pub gps_jitter_m: f64,
    /// GPS elevation jitter standard deviation in meters.
    pub elevation_jitter_m: f64,
    /// Approximate distance between track points in meters.
    pub point_spacing_m: f64,
    /// Probability of inserting a pause (0.0 - 1.0).
    pub pause_probability: f64,
    /// Duration range for pauses (min, max) in seconds.
    pub pause_duration_range: (f64, f64),
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            distance_meters: 5000.0,
            start_point: None,
            start_time: None,
            bounds: crate::config::Region::BOULDER,
            gps_jitter_m: 3.0,
            elevation_jitter_m: 5.0,
            point_spacing_m: 10.0,
            pause_probability: 0.02,
            pause_duration_range: (10.0, 60.0),
        }
    }
}

/// Generates synthetic GPS running tracks with realistic characteristics.
pub struct TrackGenerator {
    config: TrackConfig,
    elevation: ElevationGenerator,
}

impl TrackGenerator {
    /// Creates a new generator with default configuration.
    pub fn new(seed: u32) -> Self {
        Self {
            config: TrackConfig::default(),
            elevation: ElevationGenerator::boulder(seed),
        }
    }

    /// Creates a generator for a specific region.
    pub fn for_region(bounds: BoundingBox, seed: u32) -> Self {
        let elevation = if bounds.center().0 < 39.7 {
            ElevationGenerator::reno_tahoe(seed)
        } else {
            ElevationGenerator::boulder(seed)
        };

        Self {
            config: TrackConfig {
                bounds,
                ..Default::default()
            },
            elevation,
        }
    }

    /// Sets the target distance.
    pub fn with_distance(mut self, meters: f64) -> Self {
        self.config.distance_meters = meters;
        self
    }

    /// Sets the starting point.
    pub fn with_start(mut self, lat: f64, lon: f64) -> Self {
        self.config.start_point = Some((lat, lon));
        self
    }

    /// Sets the run start time.
    pub fn with_start_time(mut self, start: OffsetDateTime) -> Self {
        self.config.start_time = Some(start);
        self
    }

    /// Sets GPS jitter amount.
    pub fn with_gps_jitter(mut self, meters: f64) -> Self {
        self.config.gps_jitter_m = meters;
        self
    }

    /// Sets pause parameters.
    pub fn with_pauses(mut self, probability: f64, min_sec: f64, max_sec: f64) -> Self {
        self.config.pause_probability = probability;
        self.config.pause_duration_range = (min_sec, max_sec);
        self
    }

    /// Generates a track using the given runner profile.
    ///
    /// The profile determines speeds based on terrain grade.
    pub fn generate(&self, profile: &RunnerProfile, rng: &mut impl Rng) -> Vec<TrackPointData> {
        let start = self
            .config
            .start_point
            .unwrap_or_else(|| self.config.bounds.random_point(rng));

        let path = self.generate_path(start, rng);
        self.apply_timing(&path, profile, rng)
    }

    /// Generates a coordinate path (no timing).
    fn generate_path(&self, start: (f64, f64), rng: &mut impl Rng) -> Vec<(f64, f64)> {
        let mut path = vec![start];
        let mut current = start;
        let mut total_distance = 0.0;

        // Random walk with momentum to keep the route natural-looking
        let mut heading = rng.gen_range(0.0..std::f64::consts::TAU);

        while total_distance < self.config.distance_meters {
            heading += rng.gen_range(-0.3..0.3);

            let step = self.config.point_spacing_m * rng.gen_range(0.8..1.2);

            // 1 degree of latitude is ~111 km; longitude shrinks with latitude
            let lat_delta = (step * heading.cos()) / 111_000.0;
            let lon_delta = (step * heading.sin()) / (111_000.0 * current.0.to_radians().cos());

            let (next_lat, next_lon, bounced_heading) =
                self.apply_bounds(current.0 + lat_delta, current.1 + lon_delta, heading);
            heading = bounced_heading;

            current = (next_lat, next_lon);
            path.push(current);
            total_distance += step;
        }

        path
    }

    /// Clamps a step to the bounding box, reversing the heading on contact.
    fn apply_bounds(&self, lat: f64, lon: f64, heading: f64) -> (f64, f64, f64) {
        let b = &self.config.bounds;
        let mut new_heading = heading;

        let lat = if lat < b.min_lat {
            new_heading = std::f64::consts::PI - heading;
            b.min_lat + (b.min_lat - lat).min(0.001)
        } else if lat > b.max_lat {
            new_heading = std::f64::consts::PI - heading;
            b.max_lat - (lat - b.max_lat).min(0.001)
        } else {
            lat
        };

        let lon = if lon < b.min_lon {
            new_heading = -heading;
            b.min_lon + (b.min_lon - lon).min(0.001)
        } else if lon > b.max_lon {
            new_heading = -heading;
            b.max_lon - (lon - b.max_lon).min(0.001)
        } else {
            lon
        };

        (lat, lon, new_heading)
    }

    /// Applies timing and elevation to a path using the runner profile.
    fn apply_timing(
        &self,
        path: &[(f64, f64)],
        profile: &RunnerProfile,
        rng: &mut impl Rng,
    ) -> Vec<TrackPointData> {
        if path.is_empty() {
            return Vec::new();
        }

        let jitter = Normal::new(0.0, self.config.gps_jitter_m / 111_000.0).unwrap();
        let elev_jitter = Normal::new(0.0, self.config.elevation_jitter_m).unwrap();

        let mut result = Vec::with_capacity(path.len());
        let mut timestamp = self.config.start_time.unwrap_or_else(OffsetDateTime::now_utc);

        let (lat, lon) = path[0];
        let elevation = self.elevation.elevation_at(lat, lon) + elev_jitter.sample(rng);
        result.push(TrackPointData {
            lat: lat + jitter.sample(rng),
            lon: lon + jitter.sample(rng),
            elevation: Some(elevation),
            timestamp: Some(timestamp),
        });

        for pair in path.windows(2) {
            let (prev_lat, prev_lon) = pair[0];
            let (lat, lon) = pair[1];

            let distance = haversine_distance(prev_lat, prev_lon, lat, lon);
            let prev_elev = self.elevation.elevation_at(prev_lat, prev_lon);
            let curr_elev = self.elevation.elevation_at(lat, lon);
            let grade = if distance > 0.0 {
                (curr_elev - prev_elev) / distance
            } else {
                0.0
            };

            let variance = profile.sample_variance(rng);
            let speed = profile.speed_at_grade(grade, variance);
            let time_seconds = distance / speed;

            let pause_seconds = if rng.r#gen::<f64>() < self.config.pause_probability {
                rng.gen_range(self.config.pause_duration_range.0..self.config.pause_duration_range.1)
            } else {
                0.0
            };

            timestamp += Duration::seconds_f64(time_seconds + pause_seconds);

            let elevation = curr_elev + elev_jitter.sample(rng);
            result.push(TrackPointData {
                lat: lat + jitter.sample(rng),
                lon: lon + jitter.sample(rng),
                elevation: Some(elevation),
                timestamp: Some(timestamp),
            });
        }

        result
    }
}
