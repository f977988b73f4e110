//! Basic example of labeling a handful of user-days with motifs.
//!
//! Run with: cargo run --example basic_motifs

use chrono::NaiveDate;
use mobility_motifs::{discover_motifs_detailed, LocationId, MotifConfig, VisitRecord};

fn main() {
    env_logger::init();

    let days: Vec<(&str, u32, Vec<LocationId>)> = vec![
        // home -> work -> home
        ("alice", 2, vec![1, 2, 1]),
        // home -> work -> gym -> home
        ("alice", 3, vec![1, 2, 3, 1]),
        // stayed home all day
        ("alice", 4, vec![1, 1, 1]),
        // home -> shop, never came back
        ("bob", 2, vec![10, 11]),
        // home -> school -> home -> park -> home
        ("bob", 3, vec![10, 12, 10, 13, 10]),
        // home -> office -> cafe -> home, different places, same shape as alice's day 3
        ("bob", 4, vec![10, 14, 15, 10]),
    ];

    let mut records = Vec::new();
    for (user, day, locations) in &days {
        let date = NaiveDate::from_ymd_opt(2023, 1, *day).expect("valid date");
        for (i, loc) in locations.iter().enumerate() {
            records.push(VisitRecord::new(user, *loc, date, i as u32));
        }
    }

    let config = MotifConfig::default();
    let result = match discover_motifs_detailed(&records, &config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Motif discovery failed: {}", e);
            return;
        }
    };

    println!("Mobility Motif Example\n");
    println!(
        "Config: proportion_filter={}, max_uniq_visits={}\n",
        config.proportion_filter, config.max_uniq_visits
    );

    for label in &result.labels {
        let motif = label
            .motif
            .map_or_else(|| "-".to_string(), |m| m.to_string());
        println!(
            "  {:<6} {}  visits={}  motif={}",
            label.user_id, label.date, label.visits, motif
        );
    }

    println!("\nStats: {:?}", result.stats);
}
