//! Population-level frequency filter.
//!
//! A motif class survives only if its share of all classified day-graphs
//! (every bucket combined) is strictly greater than the configured
//! `proportion_filter`. Days of rejected classes become non-motif days.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::sequence::DaySequence;
use crate::{MotifId, MotifLabel};

/// How often one motif class occurs among classified day-graphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct MotifFrequency {
    pub motif: MotifId,
    /// Number of days classified into this motif
    pub count: u32,
    /// `count / total classified days`
    pub proportion: f64,
    /// True if `proportion > proportion_filter`
    pub retained: bool,
}

/// Count every classified motif and decide which ones are kept.
///
/// `classified` holds one entry per classified day-graph. The result is
/// ordered by `(uniq_visits, class)`. An empty input yields an empty result.
pub fn motif_frequencies(classified: &[MotifId], proportion_filter: f64) -> Vec<MotifFrequency> {
    if classified.is_empty() {
        return vec![];
    }

    let mut counts: BTreeMap<MotifId, u32> = BTreeMap::new();
    for motif in classified {
        *counts.entry(*motif).or_default() += 1;
    }

    let total = classified.len() as f64;
    counts
        .into_iter()
        .map(|(motif, count)| {
            let proportion = count as f64 / total;
            MotifFrequency {
                motif,
                count,
                proportion,
                retained: proportion > proportion_filter,
            }
        })
        .collect()
}

/// Apply the frequency filter and merge labels back onto every day.
///
/// `classified[i]` is the motif assigned to `days[i]`, or `None` for days
/// that were over the cap or whose graph was invalid. `frequencies` comes
/// from [`motif_frequencies`] over the same classified days. Every day
/// produces exactly one label, in the order of `days`.
pub fn apply_frequency_filter(
    days: &[DaySequence],
    classified: &[Option<MotifId>],
    frequencies: &[MotifFrequency],
) -> Vec<MotifLabel> {
    debug_assert_eq!(days.len(), classified.len());

    let retained: HashSet<MotifId> = frequencies
        .iter()
        .filter(|f| f.retained)
        .map(|f| f.motif)
        .collect();

    days.iter()
        .zip(classified)
        .map(|(day, motif)| MotifLabel {
            user_id: day.user_id.clone(),
            date: day.date,
            visits: day.visits,
            motif: motif.filter(|m| retained.contains(m)),
        })
        .collect()
}
