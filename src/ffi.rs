//! FFI bindings for mobile platforms (iOS/Android).
//!
//! Dates cross the boundary as `YYYY-MM-DD` strings and motif fields as
//! nullable integers, matching the flat output table.

use log::info;

use crate::{
    discover_motifs_parallel, motif_distribution, user_motif_proportions, MotifConfig, MotifError,
    MotifFrequency, MotifLabel, MotifShare, MotifStats, UserMotifProportion, VisitRecord,
};

/// Initialize logging for Android
#[cfg(target_os = "android")]
fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("MobilityMotifsRust"),
    );
}

#[cfg(not(target_os = "android"))]
fn init_logging() {
    // No-op on non-Android platforms
}

/// Error surfaced to Kotlin/Swift.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiMotifError {
    #[error("{message}")]
    InvalidArgument { message: String },
    #[error("{message}")]
    InvalidInput { message: String },
}

impl From<MotifError> for FfiMotifError {
    fn from(err: MotifError) -> Self {
        match err {
            MotifError::InvalidArgument { .. } => FfiMotifError::InvalidArgument {
                message: err.to_string(),
            },
            _ => FfiMotifError::InvalidInput {
                message: err.to_string(),
            },
        }
    }
}

/// One visit record with a string date.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisit {
    pub user_id: String,
    pub location_id: u64,
    /// `YYYY-MM-DD`
    pub date: String,
    pub order_index: u32,
}

/// One output row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMotifLabel {
    pub user_id: String,
    pub date: String,
    pub visits: u32,
    pub uniq_visits: Option<u32>,
    pub class: Option<u32>,
}

impl From<&MotifLabel> for FfiMotifLabel {
    fn from(label: &MotifLabel) -> Self {
        Self {
            user_id: label.user_id.clone(),
            date: label.date.to_string(),
            visits: label.visits,
            uniq_visits: label.uniq_visits(),
            class: label.class(),
        }
    }
}

/// Full result of a discovery run.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMotifDiscovery {
    pub labels: Vec<FfiMotifLabel>,
    pub stats: MotifStats,
    pub frequencies: Vec<MotifFrequency>,
    pub distribution: Vec<MotifShare>,
    pub user_proportions: Vec<UserMotifProportion>,
}

fn to_records(visits: Vec<FfiVisit>) -> Result<Vec<VisitRecord>, MotifError> {
    visits
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            let date = chrono::NaiveDate::parse_from_str(&v.date, "%Y-%m-%d")
                .map_err(|_| MotifError::InvalidDate {
                    row,
                    value: v.date.clone(),
                })?;
            Ok(VisitRecord {
                user_id: v.user_id,
                location_id: v.location_id,
                date,
                order_index: v.order_index,
            })
        })
        .collect()
}

/// Label every user-day with its motif.
#[uniffi::export]
pub fn ffi_discover_motifs(
    visits: Vec<FfiVisit>,
    config: MotifConfig,
) -> Result<Vec<FfiMotifLabel>, FfiMotifError> {
    init_logging();
    info!("[MobilityMotifsRust] discover_motifs called with {} visits", visits.len());

    config.validate()?;
    let records = to_records(visits)?;
    let discovery = discover_motifs_parallel(&records, &config)?;

    Ok(discovery.labels.iter().map(FfiMotifLabel::from).collect())
}

/// Label user-days and compute every summary in one call.
#[uniffi::export]
pub fn ffi_discover_motifs_detailed(
    visits: Vec<FfiVisit>,
    config: MotifConfig,
) -> Result<FfiMotifDiscovery, FfiMotifError> {
    init_logging();
    info!(
        "[MobilityMotifsRust] discover_motifs_detailed called with {} visits",
        visits.len()
    );

    let start = std::time::Instant::now();

    config.validate()?;
    let records = to_records(visits)?;
    let discovery = discover_motifs_parallel(&records, &config)?;

    let result = FfiMotifDiscovery {
        labels: discovery.labels.iter().map(FfiMotifLabel::from).collect(),
        stats: discovery.stats.clone(),
        frequencies: discovery.frequencies.clone(),
        distribution: motif_distribution(&discovery.labels),
        user_proportions: user_motif_proportions(&discovery.labels),
    };

    info!(
        "[MobilityMotifsRust] {} days, {} motif days in {:?}",
        result.stats.total_days,
        result.stats.motif_days,
        start.elapsed()
    );

    Ok(result)
}

/// Get default configuration.
#[uniffi::export]
pub fn default_motif_config() -> MotifConfig {
    init_logging();
    MotifConfig::default()
}
