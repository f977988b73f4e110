//! Day sequence construction.
//!
//! Groups day-segmented visit records by `(user_id, date)`, orders each group
//! chronologically and collapses consecutive repeats of the same location.
//! Self-transitions carry no structural information for motifs.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{LocationId, VisitRecord};

/// The ordered locations one user visited on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySequence {
    pub user_id: String,
    pub date: NaiveDate,
    /// Visited locations in order, consecutive duplicates removed
    pub locations: Vec<LocationId>,
    /// Number of visit records for the day before deduplication
    pub visits: u32,
    /// Number of distinct locations visited during the day
    pub uniq_visits: u32,
}

impl DaySequence {
    /// Number of transitions between consecutive (deduplicated) locations.
    pub fn transitions(&self) -> usize {
        self.locations.len().saturating_sub(1)
    }
}

/// Build one [`DaySequence`] per `(user_id, date)`.
///
/// Records inside a day are ordered by `order_index`; records sharing an
/// index keep their input order. The output is sorted by `(user_id, date)`,
/// which is also the scan order later used to number motif classes, so the
/// result does not depend on how the input rows were shuffled across days.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use mobility_motifs::{VisitRecord, sequence::build_day_sequences};
///
/// let day = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
/// let records: Vec<VisitRecord> = [1, 1, 2, 1]
///     .iter()
///     .enumerate()
///     .map(|(i, &loc)| VisitRecord::new("u1", loc, day, i as u32))
///     .collect();
///
/// let days = build_day_sequences(&records);
/// assert_eq!(days.len(), 1);
/// assert_eq!(days[0].locations, vec![1, 2, 1]);
/// assert_eq!(days[0].visits, 4);
/// assert_eq!(days[0].uniq_visits, 2);
/// ```
pub fn build_day_sequences(records: &[VisitRecord]) -> Vec<DaySequence> {
    let mut grouped: BTreeMap<(&str, NaiveDate), Vec<(u32, usize, LocationId)>> = BTreeMap::new();
    for (row, record) in records.iter().enumerate() {
        grouped
            .entry((record.user_id.as_str(), record.date))
            .or_default()
            .push((record.order_index, row, record.location_id));
    }

    grouped
        .into_iter()
        .map(|((user_id, date), mut visits)| {
            visits.sort_unstable_by_key(|&(order, row, _)| (order, row));

            let mut locations: Vec<LocationId> = visits.iter().map(|&(_, _, loc)| loc).collect();
            locations.dedup();

            let uniq_visits = locations.iter().collect::<HashSet<_>>().len() as u32;

            DaySequence {
                user_id: user_id.to_string(),
                date,
                locations,
                visits: visits.len() as u32,
                uniq_visits,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
    }

    fn records(user: &str, date: NaiveDate, locations: &[LocationId]) -> Vec<VisitRecord> {
        locations
            .iter()
            .enumerate()
            .map(|(i, &loc)| VisitRecord::new(user, loc, date, i as u32))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(build_day_sequences(&[]).is_empty());
    }

    #[test]
    fn test_consecutive_repeats_removed() {
        let days = build_day_sequences(&records("u1", day(1), &[5, 5, 7, 7, 7, 5]));
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].locations, vec![5, 7, 5]);
        assert_eq!(days[0].visits, 6);
        assert_eq!(days[0].uniq_visits, 2);
        assert_eq!(days[0].transitions(), 2);
    }

    #[test]
    fn test_non_consecutive_repeats_kept() {
        let days = build_day_sequences(&records("u1", day(1), &[1, 2, 3, 1]));
        assert_eq!(days[0].locations, vec![1, 2, 3, 1]);
        assert_eq!(days[0].uniq_visits, 3);
    }

    #[test]
    fn test_ordered_by_order_index() {
        let mut input = records("u1", day(1), &[1, 2, 3]);
        input.reverse();
        let days = build_day_sequences(&input);
        assert_eq!(days[0].locations, vec![1, 2, 3]);
    }

    #[test]
    fn test_days_grouped_and_sorted() {
        let mut input = records("u2", day(2), &[1, 2]);
        input.extend(records("u1", day(3), &[4]));
        input.extend(records("u1", day(1), &[9, 8]));

        let days = build_day_sequences(&input);
        let keys: Vec<(&str, NaiveDate)> = days.iter().map(|d| (d.user_id.as_str(), d.date)).collect();
        assert_eq!(keys, vec![("u1", day(1)), ("u1", day(3)), ("u2", day(2))]);
    }

    #[test]
    fn test_repeat_across_days_not_merged() {
        let mut input = records("u1", day(1), &[1, 2]);
        input.extend(records("u1", day(2), &[2, 3]));
        let days = build_day_sequences(&input);
        assert_eq!(days[0].locations, vec![1, 2]);
        assert_eq!(days[1].locations, vec![2, 3]);
    }
}
