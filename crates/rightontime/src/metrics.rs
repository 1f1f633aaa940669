//! Punctuality metrics over a set of attendance records.
//!
//! Everything here is a pure function of its inputs. Missing or unparseable
//! timestamps are skipped rather than reported, so a partially filled
//! record set still produces whatever averages it can support.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::record::{AttendanceRecord, Timestamp};

/// Shown for a clock time that cannot be computed.
pub const NO_CLOCK_TIME: &str = "--:--";

/// Shown for a duration that cannot be computed.
pub const NO_DURATION: &str = "--";

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Dashboard figures for a record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Mean arrival time, `HH:MM`.
    pub average_entry: String,
    /// Mean departure time over closed records, `HH:MM`.
    pub average_exit: String,
    /// Mean worked time, `<hours>.<tenths> h`.
    pub average_worked: String,
    /// Records still waiting for a check-out.
    pub pending_check_outs: usize,
}

/// Minutes since local midnight, or `None` for an absent or unparseable
/// timestamp.
#[must_use]
pub fn minutes_from_timestamp(timestamp: Option<&Timestamp>) -> Option<i64> {
    let local = timestamp?.local()?;
    Some(i64::from(local.hour() * 60 + local.minute()))
}

/// Arithmetic mean of the present values, rounded half-up to a whole minute.
#[must_use]
pub fn average_of<I>(values: I) -> Option<i64>
where
    I: IntoIterator<Item = Option<i64>>,
{
    let (total, count) = values
        .into_iter()
        .flatten()
        .fold((0_i64, 0_i64), |(total, count), value| {
            (total + value, count + 1)
        });
    if count == 0 {
        return None;
    }
    Some((2 * total + count).div_euclid(2 * count))
}

/// Whole minutes from `check_in` to `check_out`.
///
/// `None` when there is no check-out, either end is unparseable, or the
/// interval is not positive (clock skew, check-out before check-in).
#[must_use]
pub fn worked_minutes(check_in: &Timestamp, check_out: Option<&Timestamp>) -> Option<i64> {
    let start = check_in.local()?;
    let end = check_out?.local()?;
    let millis = (end - start).num_milliseconds();
    if millis <= 0 {
        return None;
    }
    Some((millis + MILLIS_PER_MINUTE / 2) / MILLIS_PER_MINUTE)
}

/// Format minutes since midnight as `HH:MM`, or `--:--`.
#[must_use]
pub fn format_clock(minutes: Option<i64>) -> String {
    match minutes {
        Some(minutes) => format!("{:02}:{:02}", minutes / 60, minutes % 60),
        None => NO_CLOCK_TIME.to_string(),
    }
}

/// Format minutes as decimal hours with one place, e.g. `8.5 h`, or `--`.
///
/// Rounds the binary value of `minutes / 60` to tenths, with exact ties
/// going away from zero. `507` is `8.4 h` because `8.45` is stored just
/// below the tie; `15` is an exact `0.25` and becomes `0.3 h`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_hours(minutes: Option<i64>) -> String {
    match minutes {
        Some(minutes) => format!("{} h", hours_to_tenths(minutes as f64 / 60.0)),
        None => NO_DURATION.to_string(),
    }
}

fn hours_to_tenths(hours: f64) -> String {
    // `x.x5` is exactly representable only as `.25` or `.75`, and `{:.1}`
    // sends those to even.
    let is_tie = (hours * 4.0).fract() == 0.0 && (hours * 2.0).fract() != 0.0;
    if is_tie {
        let tenths = (hours.abs() * 10.0).ceil().copysign(hours);
        return format!("{:.1}", tenths / 10.0);
    }
    format!("{hours:.1}")
}

/// Format a single record's duration as `<h>h <mm>m`, or `--`.
#[must_use]
pub fn format_duration(minutes: Option<i64>) -> String {
    match minutes {
        Some(minutes) => format!("{}h {:02}m", minutes / 60, minutes % 60),
        None => NO_DURATION.to_string(),
    }
}

/// Wall-clock time of a timestamp as `HH:MM`, or `--:--`.
#[must_use]
pub fn format_time(timestamp: Option<&Timestamp>) -> String {
    format_clock(minutes_from_timestamp(timestamp))
}

/// Short day label such as `Mon, 03 Nov`, or `--` when unparseable.
#[must_use]
pub fn format_date(timestamp: &Timestamp) -> String {
    timestamp.local().map_or_else(
        || NO_DURATION.to_string(),
        |local| local.format("%a, %d %b").to_string(),
    )
}

/// Compute the dashboard figures for a record set.
#[must_use]
pub fn compute_stats(records: &[AttendanceRecord]) -> DashboardStats {
    let average_entry = average_of(
        records
            .iter()
            .map(|record| minutes_from_timestamp(Some(&record.check_in))),
    );
    let average_exit = average_of(
        records
            .iter()
            .map(|record| minutes_from_timestamp(record.check_out.as_ref())),
    );
    let average_worked = average_of(records.iter().map(AttendanceRecord::worked_minutes));
    let pending_check_outs = records.iter().filter(|record| record.is_open()).count();

    DashboardStats {
        average_entry: format_clock(average_entry),
        average_exit: format_clock(average_exit),
        average_worked: format_hours(average_worked),
        pending_check_outs,
    }
}
