//! Calendar helpers for the change schedule.

use chrono::NaiveDate;

use crate::types::ChangeRecord;

/// Day bucket key for the change's start: "YYYY-MM-DD".
pub fn day_bucket(record: &ChangeRecord) -> String {
  record.start_time().format("%Y-%m-%d").to_string()
}

/// Changes whose window starts on `date` (UTC).
pub fn changes_on<'a>(records: &'a [ChangeRecord], date: NaiveDate) -> Vec<&'a ChangeRecord> {
  records
    .iter()
    .filter(|r| r.start_time().date_naive() == date)
    .collect()
}

pub fn duration_minutes(record: &ChangeRecord) -> i64 {
  (record.end_time() - record.start_time()).num_minutes()
}
