//! Change repository. Evaluators never read from here directly; callers take
//! a `snapshot()` and pass it in.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::EngineError;
use crate::types::ChangeRecord;

pub trait ChangeStore {
  /// Adds a new change. Ids must be unique.
  fn insert(&mut self, record: ChangeRecord) -> Result<(), EngineError>;

  fn get(&self, id: &str) -> Option<&ChangeRecord>;

  /// Replaces the stored change with its next version and returns it.
  fn reschedule(
    &mut self,
    id: &str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
  ) -> Result<ChangeRecord, EngineError>;

  /// Current versions of every change, ordered by id.
  fn snapshot(&self) -> Vec<ChangeRecord>;
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
  records: BTreeMap<String, ChangeRecord>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }
}

impl ChangeStore for InMemoryStore {
  fn insert(&mut self, record: ChangeRecord) -> Result<(), EngineError> {
    if self.records.contains_key(record.id()) {
      return Err(EngineError::invalid(
        "id",
        &format!("duplicate change id {}", record.id()),
      ));
    }
    self.records.insert(record.id().to_string(), record);
    Ok(())
  }

  fn get(&self, id: &str) -> Option<&ChangeRecord> {
    self.records.get(id)
  }

  fn reschedule(
    &mut self,
    id: &str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
  ) -> Result<ChangeRecord, EngineError> {
    let current = self
      .records
      .get(id)
      .ok_or_else(|| EngineError::invalid("id", &format!("unknown change id {}", id)))?;
    let next = current.rescheduled(start_time, end_time)?;
    self.records.insert(id.to_string(), next.clone());
    Ok(next)
  }

  fn snapshot(&self) -> Vec<ChangeRecord> {
    self.records.values().cloned().collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::conflict::has_conflict;
  use chrono::TimeZone;

  fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, hour, 0, 0).unwrap()
  }

  #[test]
  fn rejects_duplicate_ids() {
    let mut store = InMemoryStore::new();
    store
      .insert(ChangeRecord::new("C1", at(2), at(4), ["DB"]).unwrap())
      .unwrap();
    let err = store
      .insert(ChangeRecord::new("C1", at(5), at(6), ["LB"]).unwrap())
      .unwrap_err();
    assert!(err.to_string().contains("duplicate"));
    assert_eq!(store.len(), 1);
  }

  #[test]
  fn reschedule_clears_conflict() {
    let mut store = InMemoryStore::new();
    store
      .insert(ChangeRecord::new("C1", at(2), at(4), ["DB"]).unwrap())
      .unwrap();
    store
      .insert(ChangeRecord::new("C2", at(3), at(5), ["DB", "LB"]).unwrap())
      .unwrap();

    let snap = store.snapshot();
    assert!(has_conflict(&snap[0], &snap));

    let moved = store.reschedule("C2", at(4), at(6)).unwrap();
    assert_eq!(moved.version(), 2);
    assert_eq!(store.get("C2").map(|r| r.version()), Some(2));

    let snap = store.snapshot();
    assert!(!has_conflict(&snap[0], &snap));
  }

  #[test]
  fn reschedule_validates_window_and_id() {
    let mut store = InMemoryStore::new();
    store
      .insert(ChangeRecord::new("C1", at(2), at(4), ["DB"]).unwrap())
      .unwrap();
    assert!(store.reschedule("C1", at(6), at(5)).is_err());
    assert_eq!(store.get("C1").map(|r| r.version()), Some(1));
    assert!(store.reschedule("missing", at(1), at(2)).is_err());
  }
}
