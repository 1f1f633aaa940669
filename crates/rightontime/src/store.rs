//! In-memory attendance record store.
//!
//! Records are kept in insertion order and indexed by [`RecordKey`], which
//! guarantees at most one record per employee per calendar day. Check-in
//! and check-out events upsert into that slot: a repeat event for the same
//! day overwrites the matching field instead of adding a record.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::identity::IdentityProfile;
use crate::record::{AttendanceRecord, RecordKey, Timestamp};

/// How many records the attendance page lists for one employee.
pub const HISTORY_LIMIT: usize = 6;

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// A new record was appended.
    Inserted,
    /// An existing record for the same day was updated in place.
    Updated,
}

/// The collection of attendance records.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<AttendanceRecord>,
    index: HashMap<RecordKey, usize>,
}

impl RecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an initial record set.
    ///
    /// Records sharing a key collapse into the last one given, keeping the
    /// position of the first.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = AttendanceRecord>) -> Self {
        let mut store = Self::new();
        store.extend(records);
        store
    }

    /// Merge records into the store, replacing any with the same key.
    pub fn extend(&mut self, records: impl IntoIterator<Item = AttendanceRecord>) {
        for record in records {
            let key = record.key();
            if let Some(&slot) = self.index.get(&key) {
                warn!(record_id = %record.record_id, "Replacing record with duplicate day key");
                self.records[slot] = record;
            } else {
                self.index.insert(key, self.records.len());
                self.records.push(record);
            }
        }
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up the record for a key.
    #[must_use]
    pub fn get(&self, key: &RecordKey) -> Option<&AttendanceRecord> {
        self.index.get(key).map(|&slot| &self.records[slot])
    }

    /// Records belonging to one employee, in insertion order.
    pub fn for_employee<'s>(
        &'s self,
        employee_id: &str,
    ) -> impl Iterator<Item = &'s AttendanceRecord> + 's {
        let employee_id = employee_id.to_owned();
        self.records
            .iter()
            .filter(move |record| record.employee_id == employee_id)
    }

    /// Up to `limit` records of one employee, newest check-in first.
    ///
    /// Check-ins compare as raw strings, so ISO timestamps order by time.
    /// Records with equal check-ins keep their insertion order.
    #[must_use]
    pub fn history(&self, employee_id: &str, limit: usize) -> Vec<&AttendanceRecord> {
        let mut records: Vec<_> = self.for_employee(employee_id).collect();
        records.sort_by(|a, b| b.check_in.as_str().cmp(a.check_in.as_str()));
        records.truncate(limit);
        records
    }

    /// The record of one employee with the newest check-in.
    #[must_use]
    pub fn latest_for(&self, employee_id: &str) -> Option<&AttendanceRecord> {
        self.history(employee_id, 1).into_iter().next()
    }

    /// Record an arrival for `profile`.
    ///
    /// Overwrites the day's check-in if a record exists, leaving its
    /// check-out alone; otherwise opens a new record.
    pub fn check_in(&mut self, profile: &IdentityProfile, at: Timestamp) -> Upsert {
        let key = RecordKey::new(profile.id.clone(), &at);
        if let Some(record) = self.slot_mut(&key) {
            record.check_in = at;
            record.name.clone_from(&profile.name);
            debug!(record_id = %record.record_id, "Check-in overwrote existing record");
            return Upsert::Updated;
        }
        self.insert(key, AttendanceRecord::opened(profile, at))
    }

    /// Record a departure for `profile`.
    ///
    /// Overwrites the day's check-out if a record exists, leaving its
    /// check-in alone; otherwise records a zero-length interval.
    pub fn check_out(&mut self, profile: &IdentityProfile, at: Timestamp) -> Upsert {
        let key = RecordKey::new(profile.id.clone(), &at);
        if let Some(record) = self.slot_mut(&key) {
            record.check_out = Some(at);
            record.name.clone_from(&profile.name);
            debug!(record_id = %record.record_id, "Check-out closed existing record");
            return Upsert::Updated;
        }
        self.insert(key, AttendanceRecord::instantaneous(profile, at))
    }

    fn slot_mut(&mut self, key: &RecordKey) -> Option<&mut AttendanceRecord> {
        let slot = *self.index.get(key)?;
        self.records.get_mut(slot)
    }

    fn insert(&mut self, key: RecordKey, record: AttendanceRecord) -> Upsert {
        debug!(record_id = %record.record_id, "Inserted record");
        self.index.insert(key, self.records.len());
        self.records.push(record);
        Upsert::Inserted
    }
}
