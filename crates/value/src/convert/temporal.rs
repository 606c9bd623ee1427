//! Instant projections: day counts, epoch milliseconds, time of day.
//!
//! Day counts are whole days since 1970-01-01 over calendar fields, so two
//! instants on the same calendar day project to the same number no matter
//! their time of day. Everything here reads UTC fields except
//! [`LocalDateOnlyConverter`], which asks the host's local time zone.

use chrono::{Local, NaiveDate, Timelike};

use crate::lookup::{keys, LookupKey};
use crate::Value;

use super::ValueConverter;

/// Whole days between `date` and 1970-01-01. Negative before the epoch.
fn days_from_epoch(date: NaiveDate) -> i64 {
    (date - NaiveDate::default()).num_days()
}

/// The pre-registered default projection: an instant reduces to its UTC day
/// count, claiming both keyless lookups and the explicit date key.
#[derive(Debug, Default, Clone, Copy)]
pub struct UtcDateOnlyConverter;

impl ValueConverter for UtcDateOnlyConverter {
    fn name(&self) -> &'static str {
        "UtcDateOnly"
    }

    fn result_key(&self) -> &LookupKey {
        &keys::TOTAL_DAYS
    }

    fn supports(&self, value: &Value, source_key: Option<&LookupKey>) -> bool {
        matches!(value, Value::DateTime(_)) && source_key.is_none_or(|k| *k == keys::DATE)
    }

    fn convert(&self, value: &Value, _source_key: Option<&LookupKey>) -> Option<Value> {
        let Value::DateTime(dt) = value else {
            return None;
        };
        Some(Value::Integer(days_from_epoch(dt.date_naive())))
    }
}

/// Identical math to [`UtcDateOnlyConverter`] under its own opt-in key, for
/// hosts that spell the intent explicitly.
#[derive(Debug, Default, Clone, Copy)]
pub struct TotalDaysConverter;

impl ValueConverter for TotalDaysConverter {
    fn name(&self) -> &'static str {
        "TotalDays"
    }

    fn result_key(&self) -> &LookupKey {
        &keys::TOTAL_DAYS
    }

    fn supports(&self, value: &Value, source_key: Option<&LookupKey>) -> bool {
        matches!(value, Value::DateTime(_))
            && source_key.is_some_and(|k| *k == keys::TOTAL_DAYS)
    }

    fn convert(&self, value: &Value, _source_key: Option<&LookupKey>) -> Option<Value> {
        let Value::DateTime(dt) = value else {
            return None;
        };
        Some(Value::Integer(days_from_epoch(dt.date_naive())))
    }
}

/// Epoch milliseconds, for comparing instants at full precision.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTimeConverter;

impl ValueConverter for DateTimeConverter {
    fn name(&self) -> &'static str {
        "DateTime"
    }

    fn result_key(&self) -> &LookupKey {
        &keys::MILLISECONDS
    }

    fn supports(&self, value: &Value, source_key: Option<&LookupKey>) -> bool {
        matches!(value, Value::DateTime(_))
            && source_key.is_some_and(|k| *k == keys::DATE_TIME)
    }

    fn convert(&self, value: &Value, _source_key: Option<&LookupKey>) -> Option<Value> {
        let Value::DateTime(dt) = value else {
            return None;
        };
        Some(Value::Integer(dt.timestamp_millis()))
    }
}

/// Day count over the host's local calendar, for "same day where the user
/// sits" comparisons.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalDateOnlyConverter;

impl ValueConverter for LocalDateOnlyConverter {
    fn name(&self) -> &'static str {
        "LocalDateOnly"
    }

    fn result_key(&self) -> &LookupKey {
        &keys::TOTAL_DAYS
    }

    fn supports(&self, value: &Value, source_key: Option<&LookupKey>) -> bool {
        matches!(value, Value::DateTime(_))
            && source_key.is_some_and(|k| *k == keys::LOCAL_DATE)
    }

    fn convert(&self, value: &Value, _source_key: Option<&LookupKey>) -> Option<Value> {
        let Value::DateTime(dt) = value else {
            return None;
        };
        Some(Value::Integer(days_from_epoch(
            dt.with_timezone(&Local).date_naive(),
        )))
    }
}

/// Minutes since midnight, UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeOfDayConverter;

impl ValueConverter for TimeOfDayConverter {
    fn name(&self) -> &'static str {
        "TimeOfDay"
    }

    fn result_key(&self) -> &LookupKey {
        &keys::MINUTES
    }

    fn supports(&self, value: &Value, source_key: Option<&LookupKey>) -> bool {
        matches!(value, Value::DateTime(_))
            && source_key.is_some_and(|k| *k == keys::TIME_OF_DAY)
    }

    fn convert(&self, value: &Value, _source_key: Option<&LookupKey>) -> Option<Value> {
        let Value::DateTime(dt) = value else {
            return None;
        };
        Some(Value::Integer(
            i64::from(dt.hour()) * 60 + i64::from(dt.minute()),
        ))
    }
}

/// Seconds since midnight, UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeOfDayHmsConverter;

impl ValueConverter for TimeOfDayHmsConverter {
    fn name(&self) -> &'static str {
        "TimeOfDayHMS"
    }

    fn result_key(&self) -> &LookupKey {
        &keys::SECONDS
    }

    fn supports(&self, value: &Value, source_key: Option<&LookupKey>) -> bool {
        matches!(value, Value::DateTime(_))
            && source_key.is_some_and(|k| *k == keys::TIME_OF_DAY_HMS)
    }

    fn convert(&self, value: &Value, _source_key: Option<&LookupKey>) -> Option<Value> {
        let Value::DateTime(dt) = value else {
            return None;
        };
        Some(Value::Integer(
            i64::from(dt.hour()) * 3600 + i64::from(dt.minute()) * 60 + i64::from(dt.second()),
        ))
    }
}
