//! Seed script - writes a reproducible set of GPX files for manual testing.
//!
//! Run with:
//! ```
//! cargo run -p test-data --bin seed [output-dir]
//! ```

use std::fs;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use time::{Duration, OffsetDateTime};
use tracing_subscriber::EnvFilter;

use test_data::config::SeedConfig;
use test_data::gpx::generate_gpx;
use test_data::profiles::RunnerProfile;
use test_data::track::TrackGenerator;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let out_dir: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "seed-data".to_string())
        .into();
    fs::create_dir_all(&out_dir)?;

    let config = SeedConfig::default();
    let mut rng = StdRng::seed_from_u64(config.seed);

    let profiles = [
        ("easy", RunnerProfile::recreational()),
        ("steady", RunnerProfile::default()),
        ("hard", RunnerProfile::elite()),
    ];

    let now = OffsetDateTime::now_utc();

    for i in 0..config.run_count {
        let (label, profile) = &profiles[i % profiles.len()];
        let distance = rng.gen_range(config.distance_range.0..config.distance_range.1);
        // Spread runs over the past weeks, with a mix of start hours.
        let start = now - Duration::days(i as i64) - Duration::hours((i % 3) as i64 * 7);

        let points = TrackGenerator::for_region(config.region, config.seed as u32 + i as u32)
            .with_distance(distance)
            .with_start_time(start)
            .generate(profile, &mut rng);

        let name = format!("{label} run {}", i + 1);
        let gpx = generate_gpx(&points, &name);
        let file = out_dir.join(format!("run_{:02}_{label}.gpx", i + 1));
        fs::write(&file, &gpx)?;
        tracing::info!(
            "Wrote {} ({} points, {:.1} km target)",
            file.display(),
            points.len(),
            distance / 1000.0
        );
    }

    tracing::info!(
        "Seed completed: {} GPX files in {}",
        config.run_count,
        out_dir.display()
    );
    Ok(())
}
