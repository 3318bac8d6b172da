//! Runner performance profiles.
//!
//! Profiles define realistic speeds and grade response for generated runs;
//! track generators use them to produce believable timestamps.

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Performance profile for a runner.
///
/// Based on typical recreational to competitive performance:
/// - Base pace: ~5:00/km (3.5 m/s)
/// - Uphill: ~15% slower per 1% grade
/// - Downhill: ~8% faster per 1% grade (limited by safety)
#[derive(Debug, Clone)]
pub struct RunnerProfile {
    /// Base speed in m/s on flat terrain.
    base_speed: f64,
    /// Performance variance (coefficient of variation).
    variance: f64,
}

impl Default for RunnerProfile {
    fn default() -> Self {
        Self {
            base_speed: 3.5, // ~5:00/km
            variance: 0.08,
        }
    }
}

impl RunnerProfile {
    /// Creates a profile with the specified base pace.
    ///
    /// # Arguments
    /// * `pace_min_per_km` - Base pace in minutes per kilometer (e.g., 5.0 for 5:00/km)
    pub fn with_pace(pace_min_per_km: f64) -> Self {
        let base_speed = 1000.0 / (pace_min_per_km * 60.0);
        Self {
            base_speed,
            ..Default::default()
        }
    }

    /// Elite runner (~3:30/km base pace).
    pub fn elite() -> Self {
        Self::with_pace(3.5)
    }

    /// Recreational runner (~6:00/km base pace).
    pub fn recreational() -> Self {
        Self::with_pace(6.0)
    }

    /// Base speed on flat terrain in meters per second.
    pub fn base_speed_mps(&self) -> f64 {
        self.base_speed
    }

    /// Speed multiplier for a grade (a fraction, e.g. 0.05 = 5% uphill).
    pub fn grade_factor(&self, grade: f64) -> f64 {
        // Empirical grade adjustment for running:
        // uphill loses ~15% per 1% grade, downhill gains ~8% per 1% grade.
        if grade >= 0.0 {
            let factor = 1.0 - (grade * 15.0);
            factor.max(0.2) // Minimum 20% of base speed on steep climbs
        } else {
            let factor = 1.0 - (grade * 8.0); // grade is negative, so this adds
            factor.min(1.5) // Cap at 150% of base speed for safety
        }
    }

    /// Speed in m/s at a grade, scaled by a sampled variance factor.
    pub fn speed_at_grade(&self, grade: f64, variance_factor: f64) -> f64 {
        let target = self.base_speed * self.grade_factor(grade);
        (target * variance_factor).max(0.5) // Minimum 0.5 m/s to avoid division issues
    }

    /// Samples a day-to-day variance multiplier around 1.0.
    pub fn sample_variance(&self, rng: &mut impl Rng) -> f64 {
        if self.variance > 0.0 {
            let normal = Normal::new(1.0, self.variance).unwrap();
            let sample: f64 = normal.sample(rng);
            sample.clamp(0.7, 1.4)
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = RunnerProfile::default();
        assert!((profile.base_speed_mps() - 3.5).abs() < 0.01);
    }

    #[test]
    fn test_grade_factors() {
        let profile = RunnerProfile::default();

        // Flat
        assert!((profile.grade_factor(0.0) - 1.0).abs() < 0.01);

        // 5% uphill should be slower
        assert!(profile.grade_factor(0.05) < 1.0);

        // 5% downhill should be faster
        assert!(profile.grade_factor(-0.05) > 1.0);
    }

    #[test]
    fn test_speed_never_below_floor() {
        let profile = RunnerProfile::recreational();
        // 40% grade wall at a bad-day variance factor.
        assert!(profile.speed_at_grade(0.4, 0.7) >= 0.5);
    }

    #[test]
    fn test_variance_sample_clamped() {
        let profile = RunnerProfile::default();
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let v = profile.sample_variance(&mut rng);
            assert!((0.7..=1.4).contains(&v));
        }
    }
}
