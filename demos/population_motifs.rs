//! Example of motif discovery over a synthetic population.
//!
//! Run with: cargo run --example population_motifs --features parallel

use chrono::{Duration, NaiveDate};
use mobility_motifs::{
    discover_motifs_parallel, motif_distribution, motif_proportion, LocationId, MotifConfig,
    VisitRecord,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// Daily itineraries as indices into a user's personal places (0 = home).
const ITINERARIES: [&[LocationId]; 8] = [
    &[0],
    &[0, 1, 0],
    &[0, 1, 2, 0],
    &[0, 1, 0, 2, 0],
    &[0, 1, 2, 1, 0],
    &[0, 1, 2, 3, 0],
    &[0, 1, 0, 2, 3, 0],
    &[0, 1, 2],
];

fn main() {
    env_logger::init();

    let users = 200;
    let days = 60;
    let start_date = NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date");

    let mut records = Vec::new();
    let mut rng = StdRng::seed_from_u64(42);
    for user in 0..users {
        let user_id = format!("user-{}", user);
        for day in 0..days {
            let date = start_date + Duration::days(day);
            let itinerary = ITINERARIES[rng.random_range(0..ITINERARIES.len())];
            for (i, place) in itinerary.iter().enumerate() {
                // personal places get globally unique location ids
                let loc = user as LocationId * 100 + place;
                records.push(VisitRecord::new(&user_id, loc, date, i as u32));
            }
        }
    }

    println!("Created {} visits for {} users over {} days\n", records.len(), users, days);

    let start = Instant::now();
    let result = match discover_motifs_parallel(&records, &MotifConfig::default()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Motif discovery failed: {}", e);
            return;
        }
    };
    let elapsed = start.elapsed();

    println!("Discovery completed in {:?}\n", elapsed);
    println!("Motif proportion across user-days: {:.3}\n", motif_proportion(&result.labels));

    println!("Motif distribution:");
    for share in motif_distribution(&result.labels) {
        println!("  {:>4}: {:>6} days ({:.3})", share.label, share.days, share.proportion);
    }

    println!("\nStats: {:?}", result.stats);
}
