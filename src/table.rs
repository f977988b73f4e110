//! Columnar visit table input.
//!
//! Loosely-typed sources (dataframes, JSON, FFI buffers) hand over columns
//! that may be absent. Columns are checked once, before any day is built.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{MotifError, Result};
use crate::{LocationId, VisitRecord};

/// Day-segmented visits as parallel columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitTable {
    #[serde(default)]
    pub user_id: Option<Vec<String>>,
    #[serde(default)]
    pub date: Option<Vec<NaiveDate>>,
    #[serde(default)]
    pub location_id: Option<Vec<LocationId>>,
    #[serde(default)]
    pub order_index: Option<Vec<u32>>,
}

impl VisitTable {
    /// Columns from existing records.
    pub fn from_records(records: &[VisitRecord]) -> Self {
        Self {
            user_id: Some(records.iter().map(|r| r.user_id.clone()).collect()),
            date: Some(records.iter().map(|r| r.date).collect()),
            location_id: Some(records.iter().map(|r| r.location_id).collect()),
            order_index: Some(records.iter().map(|r| r.order_index).collect()),
        }
    }

    /// Number of rows, taken from the `user_id` column.
    pub fn len(&self) -> usize {
        self.user_id.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that every required column is present and all columns agree
    /// on the row count.
    pub fn validate(&self) -> Result<()> {
        let rows = required("user_id", &self.user_id)?.len();
        check_len("date", required("date", &self.date)?.len(), rows)?;
        check_len("location_id", required("location_id", &self.location_id)?.len(), rows)?;
        check_len("order_index", required("order_index", &self.order_index)?.len(), rows)?;
        Ok(())
    }

    /// Convert into row records after validation.
    ///
    /// # Example
    /// ```
    /// use mobility_motifs::{MotifError, table::VisitTable};
    ///
    /// let table = VisitTable {
    ///     user_id: Some(vec!["u1".to_string()]),
    ///     date: None,
    ///     location_id: Some(vec![7]),
    ///     order_index: Some(vec![0]),
    /// };
    /// assert_eq!(
    ///     table.into_records(),
    ///     Err(MotifError::MissingColumn { column: "date" })
    /// );
    /// ```
    pub fn into_records(self) -> Result<Vec<VisitRecord>> {
        self.validate()?;

        Ok(self
            .user_id
            .unwrap_or_default()
            .into_iter()
            .zip(self.date.unwrap_or_default())
            .zip(self.location_id.unwrap_or_default())
            .zip(self.order_index.unwrap_or_default())
            .map(|(((user_id, date), location_id), order_index)| VisitRecord {
                user_id,
                location_id,
                date,
                order_index,
            })
            .collect())
    }
}

fn required<'a, T>(column: &'static str, values: &'a Option<Vec<T>>) -> Result<&'a Vec<T>> {
    values.as_ref().ok_or(MotifError::MissingColumn { column })
}

fn check_len(column: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(MotifError::ColumnLengthMismatch {
            column,
            expected,
            actual,
        });
    }
    Ok(())
}
