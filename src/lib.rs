//! # Mobility Motifs
//!
//! Daily mobility motif discovery from per-user location visit histories.
//!
//! This library provides:
//! - Day sequence construction from day-segmented visit records
//! - Directed transition graphs per user-day, with a degree precondition
//! - Exact isomorphism classes of day-graphs (motif types)
//! - A population-level frequency filter for recurring motifs
//! - Parallel processing across `uniq_visits` buckets
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel processing with rayon (default)
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use mobility_motifs::{discover_motifs, MotifConfig, VisitRecord};
//!
//! let day = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//!
//! // home -> work -> gym -> home
//! let records: Vec<VisitRecord> = [1, 2, 3, 1]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &loc)| VisitRecord::new("alice", loc, day, i as u32))
//!     .collect();
//!
//! let labels = discover_motifs(&records, &MotifConfig::default()).unwrap();
//! assert_eq!(labels.len(), 1);
//! assert_eq!(labels[0].uniq_visits(), Some(3));
//! assert_eq!(labels[0].class(), Some(0));
//! ```

use std::fmt;

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{MotifError, Result};

// Columnar input with column validation
pub mod table;
pub use table::VisitTable;

// Day sequence builder
pub mod sequence;
pub use sequence::{build_day_sequences, DaySequence};

// Transition graphs and isomorphism
pub mod graph;
pub use graph::{transition_graph, GraphOutcome, GraphSignature, TransitionGraph, MAX_SUPPORTED_NODES};

// Equivalence classes within a bucket
pub mod classify;
#[cfg(feature = "parallel")]
pub use classify::assign_classes_parallel;
pub use classify::assign_classes;

// Population frequency filter
pub mod filter;
pub use filter::{apply_frequency_filter, motif_frequencies, MotifFrequency};

// Reporting summaries over labeled days
pub mod summary;
pub use summary::{
    motif_distribution, motif_proportion, user_motif_proportions, MotifShare, UserMotifProportion,
};

#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

// ============================================================================
// Core Types
// ============================================================================

/// Location identifier, as assigned by the upstream location clustering.
pub type LocationId = u64;

/// Default cap on distinct locations per classified day.
pub const DEFAULT_MAX_UNIQ_VISITS: u32 = 6;

/// Default minimum population share a motif must exceed.
pub const DEFAULT_PROPORTION_FILTER: f64 = 0.005;

/// One staypoint visit, already split so it lies within a single calendar day.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use mobility_motifs::VisitRecord;
///
/// let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
/// let visit = VisitRecord::new("user-1", 42, date, 0);
/// assert_eq!(visit.location_id, 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub user_id: String,
    pub location_id: LocationId,
    pub date: NaiveDate,
    /// Chronological position of the visit within its user-day
    pub order_index: u32,
}

impl VisitRecord {
    /// Create a new visit record.
    pub fn new(user_id: &str, location_id: LocationId, date: NaiveDate, order_index: u32) -> Self {
        Self {
            user_id: user_id.to_string(),
            location_id,
            date,
            order_index,
        }
    }
}

/// Identity of a motif: the class index is only meaningful within its
/// `uniq_visits` bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct MotifId {
    pub uniq_visits: u32,
    pub class: u32,
}

impl MotifId {
    pub fn new(uniq_visits: u32, class: u32) -> Self {
        Self { uniq_visits, class }
    }
}

impl fmt::Display for MotifId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.uniq_visits, self.class)
    }
}

/// Final per-day output: one label per `(user_id, date)`.
///
/// Serialized as a flat row with nullable `uniq_visits` and `class` columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "MotifRow", try_from = "MotifRow")]
pub struct MotifLabel {
    pub user_id: String,
    pub date: NaiveDate,
    /// Number of visit records of the day, before deduplication
    pub visits: u32,
    /// Retained motif, or `None` for a non-motif day
    pub motif: Option<MotifId>,
}

impl MotifLabel {
    pub fn uniq_visits(&self) -> Option<u32> {
        self.motif.map(|m| m.uniq_visits)
    }

    pub fn class(&self) -> Option<u32> {
        self.motif.map(|m| m.class)
    }

    pub fn is_motif(&self) -> bool {
        self.motif.is_some()
    }
}

/// Flat tabular form of a [`MotifLabel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotifRow {
    pub user_id: String,
    pub date: NaiveDate,
    pub visits: u32,
    pub uniq_visits: Option<u32>,
    pub class: Option<u32>,
}

impl From<MotifLabel> for MotifRow {
    fn from(label: MotifLabel) -> Self {
        Self {
            uniq_visits: label.uniq_visits(),
            class: label.class(),
            user_id: label.user_id,
            date: label.date,
            visits: label.visits,
        }
    }
}

impl TryFrom<MotifRow> for MotifLabel {
    type Error = String;

    fn try_from(row: MotifRow) -> std::result::Result<Self, Self::Error> {
        let motif = match (row.uniq_visits, row.class) {
            (Some(uniq_visits), Some(class)) => Some(MotifId::new(uniq_visits, class)),
            (None, None) => None,
            _ => {
                return Err(format!(
                    "{} {}: uniq_visits and class must both be set or both be null",
                    row.user_id, row.date
                ))
            }
        };
        Ok(Self {
            user_id: row.user_id,
            date: row.date,
            visits: row.visits,
            motif,
        })
    }
}

/// Configuration for motif discovery.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct MotifConfig {
    /// A motif is kept only if its share of all classified day-graphs is
    /// strictly greater than this. Must lie in (0, 1).
    /// Default: 0.005 (0.5%)
    pub proportion_filter: f64,

    /// Days with more distinct locations than this are never classified.
    /// Must lie in 1..=MAX_SUPPORTED_NODES.
    /// Default: 6
    pub max_uniq_visits: u32,
}

impl Default for MotifConfig {
    fn default() -> Self {
        Self {
            proportion_filter: DEFAULT_PROPORTION_FILTER,
            max_uniq_visits: DEFAULT_MAX_UNIQ_VISITS,
        }
    }
}

impl MotifConfig {
    /// Check every value is in its supported range.
    pub fn validate(&self) -> Result<()> {
        if !(self.proportion_filter > 0.0 && self.proportion_filter < 1.0) {
            return Err(MotifError::invalid_argument(
                "proportion_filter",
                format!("must be in (0, 1), got {}", self.proportion_filter),
            ));
        }
        if self.max_uniq_visits == 0 || self.max_uniq_visits as usize > MAX_SUPPORTED_NODES {
            return Err(MotifError::invalid_argument(
                "max_uniq_visits",
                format!(
                    "must be in 1..={}, got {}",
                    MAX_SUPPORTED_NODES, self.max_uniq_visits
                ),
            ));
        }
        Ok(())
    }
}

/// Counts describing one discovery run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct MotifStats {
    /// User-days in the input
    pub total_days: u32,
    /// Days with more distinct locations than `max_uniq_visits`
    pub over_cap_days: u32,
    /// Days whose graph failed the transition-count or degree check
    pub invalid_days: u32,
    /// Days whose graph was classified (denominator of the frequency filter)
    pub classified_days: u32,
    /// Days that kept a motif after filtering
    pub motif_days: u32,
    /// Distinct motif classes found before filtering
    pub motif_classes: u32,
    /// Distinct motif classes kept after filtering
    pub retained_motifs: u32,
}

/// Labels together with run statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotifDiscovery {
    pub labels: Vec<MotifLabel>,
    /// Every motif class found, retained or not, ordered by `(uniq_visits, class)`
    pub frequencies: Vec<MotifFrequency>,
    pub stats: MotifStats,
}

// ============================================================================
// Core Functions
// ============================================================================

/// Label every user-day with its motif.
///
/// Returns one [`MotifLabel`] per `(user_id, date)`, ordered by user and
/// date. Days that are over the cap, have an invalid graph, or belong to a
/// motif not frequent enough get `motif: None`.
///
/// Fails only on an invalid configuration; an empty input yields an empty
/// table.
pub fn discover_motifs(records: &[VisitRecord], config: &MotifConfig) -> Result<Vec<MotifLabel>> {
    Ok(discover_motifs_detailed(records, config)?.labels)
}

/// Same as [`discover_motifs`], also returning run statistics.
pub fn discover_motifs_detailed(records: &[VisitRecord], config: &MotifConfig) -> Result<MotifDiscovery> {
    run_discovery(records, config, |buckets| {
        buckets.iter().map(|b| classify_bucket(b, assign_classes)).collect()
    })
}

/// Label user-days using parallel processing.
///
/// Buckets are classified on separate rayon tasks and each bucket's
/// candidate scan is sharded. The output is identical to
/// [`discover_motifs_detailed`].
#[cfg(feature = "parallel")]
pub fn discover_motifs_parallel(records: &[VisitRecord], config: &MotifConfig) -> Result<MotifDiscovery> {
    use rayon::prelude::*;

    run_discovery(records, config, |buckets| {
        buckets
            .par_iter()
            .map(|b| classify_bucket(b, assign_classes_parallel))
            .collect()
    })
}

/// Validate a columnar table and label its user-days.
pub fn discover_motifs_from_table(table: VisitTable, config: &MotifConfig) -> Result<Vec<MotifLabel>> {
    config.validate()?;
    let records = table.into_records()?;
    discover_motifs(&records, config)
}

/// Valid graphs sharing one `uniq_visits` value, in day order.
struct Bucket {
    uniq_visits: u32,
    day_indices: Vec<usize>,
    graphs: Vec<TransitionGraph>,
}

/// Days with one or two distinct locations have a single possible valid
/// shape, so they are all class 0 without comparison.
fn classify_bucket(bucket: &Bucket, assign: fn(&[TransitionGraph]) -> Vec<u32>) -> Vec<u32> {
    if bucket.uniq_visits <= 2 {
        return vec![0; bucket.graphs.len()];
    }
    assign(&bucket.graphs)
}

fn run_discovery<F>(records: &[VisitRecord], config: &MotifConfig, classify_buckets: F) -> Result<MotifDiscovery>
where
    F: FnOnce(&[Bucket]) -> Vec<Vec<u32>>,
{
    config.validate()?;

    let start = std::time::Instant::now();
    let days = build_day_sequences(records);
    if days.is_empty() {
        info!("[MobilityMotifs] No user-days in input");
        return Ok(MotifDiscovery::default());
    }
    info!(
        "[MobilityMotifs] Built {} user-days from {} visits",
        days.len(),
        records.len()
    );

    let mut stats = MotifStats {
        total_days: days.len() as u32,
        ..MotifStats::default()
    };

    let mut buckets: Vec<Bucket> = (1..=config.max_uniq_visits)
        .map(|uniq_visits| Bucket {
            uniq_visits,
            day_indices: Vec::new(),
            graphs: Vec::new(),
        })
        .collect();

    for (idx, day) in days.iter().enumerate() {
        match transition_graph(day, config.max_uniq_visits) {
            GraphOutcome::OverCap => stats.over_cap_days += 1,
            GraphOutcome::Invalid => stats.invalid_days += 1,
            GraphOutcome::Valid(graph) => {
                let bucket = &mut buckets[day.uniq_visits as usize - 1];
                bucket.day_indices.push(idx);
                bucket.graphs.push(graph);
            }
        }
    }

    let bucket_classes = classify_buckets(&buckets);

    let mut classified: Vec<Option<MotifId>> = vec![None; days.len()];
    for (bucket, classes) in buckets.iter().zip(&bucket_classes) {
        let count = classify::class_count(classes);
        debug!(
            "[MobilityMotifs] uniq_visits={}: {} graphs in {} classes",
            bucket.uniq_visits,
            bucket.graphs.len(),
            count
        );
        for (&idx, &class) in bucket.day_indices.iter().zip(classes) {
            classified[idx] = Some(MotifId::new(bucket.uniq_visits, class));
        }
    }

    let assigned: Vec<MotifId> = classified.iter().flatten().copied().collect();
    let frequencies = motif_frequencies(&assigned, config.proportion_filter);
    let labels = apply_frequency_filter(&days, &classified, &frequencies);

    stats.classified_days = assigned.len() as u32;
    stats.motif_classes = frequencies.len() as u32;
    stats.retained_motifs = frequencies.iter().filter(|f| f.retained).count() as u32;
    stats.motif_days = labels.iter().filter(|l| l.is_motif()).count() as u32;

    info!(
        "[MobilityMotifs] {} classified days ({} over cap, {} invalid), {} of {} motifs retained, {} motif days in {:?}",
        stats.classified_days,
        stats.over_cap_days,
        stats.invalid_days,
        stats.retained_motifs,
        stats.motif_classes,
        stats.motif_days,
        start.elapsed()
    );

    Ok(MotifDiscovery {
        labels,
        frequencies,
        stats,
    })
}

// ============================================================================
// Tests
// ============================================================================
