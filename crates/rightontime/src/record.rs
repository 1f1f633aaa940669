//! Attendance records and the timestamps they carry.
//!
//! Timestamps arrive as ISO-8601 strings from the caller's clock. The raw
//! text is kept verbatim: its first ten characters name the calendar day,
//! and it is what gets serialized back out. A parsed local date-time is
//! kept alongside for the metrics.

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::identity::IdentityProfile;
use crate::metrics;

/// Characters of a timestamp that make up its calendar day (`YYYY-MM-DD`).
const DAY_LEN: usize = 10;

/// Offset-free layouts accepted after RFC 3339 fails.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// An ISO-8601 timestamp as supplied by the caller.
///
/// Construction never fails. Text that is not a recognisable timestamp is
/// kept but contributes nothing to time arithmetic.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Timestamp {
    raw: String,
    local: Option<NaiveDateTime>,
}

impl Timestamp {
    /// Wrap a timestamp string.
    ///
    /// Offset-bearing values (`Z`, `+02:00`) are converted to local time;
    /// offset-free values are taken as already local.
    #[must_use]
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let local = parse_local(&raw);
        Self { raw, local }
    }

    /// The timestamp exactly as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The local wall-clock date-time, if the text could be parsed.
    #[must_use]
    pub fn local(&self) -> Option<NaiveDateTime> {
        self.local
    }

    /// The calendar-day portion: the first ten characters of the raw text.
    #[must_use]
    pub fn calendar_day(&self) -> &str {
        self.raw
            .char_indices()
            .nth(DAY_LEN)
            .map_or(self.raw.as_str(), |(end, _)| &self.raw[..end])
    }
}

fn parse_local(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Local).naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

impl From<String> for Timestamp {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

impl From<&str> for Timestamp {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Timestamp> for String {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.raw
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({:?})", self.raw)
    }
}

/// Identity of a record: one employee on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    /// Employee id the record belongs to.
    pub employee_id: String,
    /// Calendar day, `YYYY-MM-DD`.
    pub day: String,
}

impl RecordKey {
    /// Key for an employee and the day a timestamp falls on.
    #[must_use]
    pub fn new(employee_id: impl Into<String>, timestamp: &Timestamp) -> Self {
        Self {
            employee_id: employee_id.into(),
            day: timestamp.calendar_day().to_string(),
        }
    }

    /// The display form, `<employee id>-<day>`.
    #[must_use]
    pub fn record_id(&self) -> String {
        format!("{}-{}", self.employee_id, self.day)
    }
}

/// One employee's attendance on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// `<employee id>-<YYYY-MM-DD>`.
    pub record_id: String,
    /// Id of the employee this record belongs to.
    pub employee_id: String,
    /// Employee display name at the time of the last write.
    pub name: String,
    /// Arrival time.
    pub check_in: Timestamp,
    /// Departure time, absent while the record is open.
    #[serde(default)]
    pub check_out: Option<Timestamp>,
}

impl AttendanceRecord {
    /// A record opened by a check-in.
    #[must_use]
    pub fn opened(profile: &IdentityProfile, check_in: Timestamp) -> Self {
        let key = RecordKey::new(profile.id.clone(), &check_in);
        Self {
            record_id: key.record_id(),
            employee_id: key.employee_id,
            name: profile.name.clone(),
            check_in,
            check_out: None,
        }
    }

    /// A record created by a check-out with no check-in that day.
    ///
    /// Both ends are set to the same moment.
    #[must_use]
    pub fn instantaneous(profile: &IdentityProfile, at: Timestamp) -> Self {
        let mut record = Self::opened(profile, at.clone());
        record.check_out = Some(at);
        record
    }

    /// The store key for this record.
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.employee_id.clone(), &self.check_in)
    }

    /// Whether the record is still waiting for a check-out.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }

    /// Whole minutes between check-in and check-out.
    ///
    /// `None` while open, or when the interval is not positive.
    #[must_use]
    pub fn worked_minutes(&self) -> Option<i64> {
        metrics::worked_minutes(&self.check_in, self.check_out.as_ref())
    }
}
