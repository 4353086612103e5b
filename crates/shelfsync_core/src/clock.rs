//! Wall-clock source and calendar-day classification.
//!
//! # Responsibility
//! - Provide "now" in local calendar semantics for inbox day views.
//! - Parse service timestamps into local calendar dates.
//!
//! # Invariants
//! - Day comparisons are done in the offset of the clock's `now`.

use log::warn;
use once_cell::sync::OnceCell;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

static LOCAL_OFFSET_FALLBACK_LOGGED: OnceCell<()> = OnceCell::new();

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

/// Host clock in the host's local offset.
///
/// Falls back to UTC when the local offset cannot be determined (for
/// example on multi-threaded Unix processes).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        match OffsetDateTime::now_local() {
            Ok(now) => now,
            Err(err) => {
                if LOCAL_OFFSET_FALLBACK_LOGGED.set(()).is_ok() {
                    warn!("event=clock_offset module=clock status=fallback reason={err}");
                }
                OffsetDateTime::now_utc()
            }
        }
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Parses a service timestamp into a calendar date in `offset`.
///
/// Accepts RFC 3339 instants (`2024-05-01T08:30:00.000Z`) plus the
/// offset-less forms `2024-05-01T08:30:00[.fff]` and `2024-05-01`, which are
/// taken as already local. Returns `None` for anything else.
pub fn local_date_of(raw: &str, offset: UtcOffset) -> Option<Date> {
    let raw = raw.trim();
    if let Ok(instant) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(instant.to_offset(offset).date());
    }
    let naive_with_fraction =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
    let naive = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    if let Ok(local) = PrimitiveDateTime::parse(raw, naive_with_fraction)
        .or_else(|_| PrimitiveDateTime::parse(raw, naive))
    {
        return Some(local.date());
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
}
