//! Summaries over labeled user-days.
//!
//! These are the figures usually reported alongside motif labels: how many
//! days carry a motif overall and per user, and how the motif days split
//! across motif types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{MotifId, MotifLabel};

/// Share of one user's days that carry a motif.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct UserMotifProportion {
    pub user_id: String,
    pub days: u32,
    pub motif_days: u32,
    pub proportion: f64,
}

/// Share of all user-days labeled with one motif.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct MotifShare {
    pub motif: MotifId,
    /// Display label, `"{uniq_visits}_{class}"`
    pub label: String,
    pub days: u32,
    pub proportion: f64,
}

/// Fraction of user-days with a motif. Zero for an empty table.
pub fn motif_proportion(labels: &[MotifLabel]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let motif_days = labels.iter().filter(|l| l.motif.is_some()).count();
    motif_days as f64 / labels.len() as f64
}

/// Per-user motif proportion, ordered by user id.
pub fn user_motif_proportions(labels: &[MotifLabel]) -> Vec<UserMotifProportion> {
    let mut per_user: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
    for label in labels {
        let entry = per_user.entry(label.user_id.as_str()).or_default();
        entry.0 += 1;
        if label.motif.is_some() {
            entry.1 += 1;
        }
    }

    per_user
        .into_iter()
        .map(|(user_id, (days, motif_days))| UserMotifProportion {
            user_id: user_id.to_string(),
            days,
            motif_days,
            proportion: motif_days as f64 / days as f64,
        })
        .collect()
}

/// Share of each motif among ALL user-days (motif or not), ordered by
/// `(uniq_visits, class)`.
pub fn motif_distribution(labels: &[MotifLabel]) -> Vec<MotifShare> {
    let mut counts: BTreeMap<MotifId, u32> = BTreeMap::new();
    for motif in labels.iter().filter_map(|l| l.motif) {
        *counts.entry(motif).or_default() += 1;
    }

    let total = labels.len() as f64;
    counts
        .into_iter()
        .map(|(motif, days)| MotifShare {
            motif,
            label: motif.to_string(),
            days,
            proportion: days as f64 / total,
        })
        .collect()
}
