//! Previous-business-day window resolution.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Weekday};
use chrono_tz::Tz;
use tracing::debug;

use crate::calendar::holiday::HolidayCalendar;
use crate::error::{DigestError, Result};

/// Default lookback limit in days.
pub const DEFAULT_MAX_LOOKBACK_DAYS: u32 = 30;

/// Default cutoff wall-clock time on the window start date (17:30).
pub fn default_cutoff_time() -> NaiveTime {
    NaiveTime::from_hms_opt(17, 30, 0).unwrap_or(NaiveTime::MIN)
}

/// How the window start date is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    /// Treat Saturdays and Sundays as non-business days.
    pub skip_weekends: bool,
    /// Wall-clock time on the start date from which items are eligible.
    pub cutoff_time: NaiveTime,
    /// Maximum number of candidate dates examined before giving up.
    pub max_lookback_days: u32,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            skip_weekends: true,
            cutoff_time: default_cutoff_time(),
            max_lookback_days: DEFAULT_MAX_LOOKBACK_DAYS,
        }
    }
}

impl WindowPolicy {
    /// Policy that only skips holidays and keeps weekends as business days.
    pub fn holidays_only() -> Self {
        Self {
            skip_weekends: false,
            ..Self::default()
        }
    }
}

/// The resolved digest window.
///
/// Computed once per run from the current instant and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// The most recent prior business day.
    pub start_date: NaiveDate,
    /// Earliest publication instant (inclusive) eligible for the digest.
    pub start_cutoff: DateTime<Tz>,
    /// The instant the window was resolved at.
    pub end: DateTime<Tz>,
}

/// Whether `date` is a weekend day.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether `date` counts as a business day under the given rules.
pub fn is_business_day(
    date: NaiveDate,
    holidays: &dyn HolidayCalendar,
    skip_weekends: bool,
) -> bool {
    !(holidays.is_holiday(date) || (skip_weekends && is_weekend(date)))
}

/// Resolve the digest window for `now`.
///
/// Starts from the day before `now` and walks backwards until a business day
/// is found. Fails if none is found within `policy.max_lookback_days`
/// candidates, which only happens with a misconfigured holiday calendar.
pub fn resolve_window(
    now: DateTime<Tz>,
    holidays: &dyn HolidayCalendar,
    policy: &WindowPolicy,
) -> Result<DateWindow> {
    let tz = now.timezone();
    let mut candidate = now
        .date_naive()
        .pred_opt()
        .ok_or_else(|| DigestError::Calendar(format!("no date before {}", now.date_naive())))?;

    for _ in 0..policy.max_lookback_days {
        if is_business_day(candidate, holidays, policy.skip_weekends) {
            let start_cutoff = localize(&tz, candidate, policy.cutoff_time)?;
            debug!(
                start_date = %candidate,
                cutoff = %start_cutoff,
                "Resolved digest window"
            );
            return Ok(DateWindow {
                start_date: candidate,
                start_cutoff,
                end: now,
            });
        }
        candidate = candidate
            .pred_opt()
            .ok_or_else(|| DigestError::Calendar(format!("no date before {}", candidate)))?;
    }

    Err(DigestError::Calendar(format!(
        "no business day within {} days before {}",
        policy.max_lookback_days,
        now.date_naive()
    )))
}

/// Attach a wall-clock time on `date` to the zone `tz`.
///
/// Ambiguous local times resolve to the earlier instant.
fn localize(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or_else(|| {
            DigestError::Calendar(format!("{} {} does not exist in {}", date, time, tz.name()))
        })
}
