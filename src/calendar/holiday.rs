//! Public holiday lookup.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use crate::calendar::window::is_weekend;

/// Fixed-date public holidays of the Republic of Korea as (month, day).
const KOREAN_FIXED_HOLIDAYS: [(u32, u32); 8] = [
    (1, 1),   // New Year's Day
    (3, 1),   // Independence Movement Day
    (5, 5),   // Children's Day
    (6, 6),   // Memorial Day
    (8, 15),  // Liberation Day
    (10, 3),  // National Foundation Day
    (10, 9),  // Hangul Day
    (12, 25), // Christmas
];

/// Fixed-date holidays that move to a weekday when they fall on a weekend,
/// as (month, day, first year the rule applies).
const SUBSTITUTABLE_HOLIDAYS: [(u32, u32, i32); 6] = [
    (3, 1, 2021),
    (5, 5, 2014),
    (8, 15, 2021),
    (10, 3, 2021),
    (10, 9, 2021),
    (12, 25, 2023),
];

/// A source of truth for whether a calendar date is a public holiday.
///
/// Implementations must be pure: the same date always yields the same answer.
pub trait HolidayCalendar: Send + Sync {
    /// Whether `date` is a public holiday.
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

impl<F> HolidayCalendar for F
where
    F: Fn(NaiveDate) -> bool + Send + Sync,
{
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self(date)
    }
}

/// A calendar with no holidays at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn is_holiday(&self, _date: NaiveDate) -> bool {
        false
    }
}

/// Korean public holidays.
///
/// The solar fixed-date holidays are built in, together with their
/// substitute days: a substitutable holiday on a Saturday or Sunday moves to
/// the next weekday that is not already a holiday. Lunar holidays (Seollal,
/// Chuseok, Buddha's Birthday), their substitutes and election days move
/// every year and are supplied through [`KoreanHolidays::with_extra`].
/// Substitute days computed here skip over those extra dates.
#[derive(Debug, Clone, Default)]
pub struct KoreanHolidays {
    extra: BTreeSet<NaiveDate>,
}

impl KoreanHolidays {
    /// Create a calendar with only the fixed-date holidays.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add movable holidays on top of the fixed-date ones.
    pub fn with_extra<I>(mut self, dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.extra.extend(dates);
        self
    }

    /// Number of configured movable holidays.
    pub fn extra_count(&self) -> usize {
        self.extra.len()
    }

    fn is_fixed_holiday(date: NaiveDate) -> bool {
        KOREAN_FIXED_HOLIDAYS.contains(&(date.month(), date.day()))
    }

    /// Substitute days granted in `year`, in calendar order.
    pub fn substitute_days(&self, year: i32) -> Vec<NaiveDate> {
        let mut granted: Vec<NaiveDate> = Vec::new();
        for (month, day, since) in SUBSTITUTABLE_HOLIDAYS {
            if year < since {
                continue;
            }
            let Some(holiday) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            if !is_weekend(holiday) {
                continue;
            }
            let substitute = holiday.iter_days().skip(1).find(|candidate| {
                !is_weekend(*candidate)
                    && !Self::is_fixed_holiday(*candidate)
                    && !self.extra.contains(candidate)
                    && !granted.contains(candidate)
            });
            if let Some(substitute) = substitute {
                granted.push(substitute);
            }
        }
        granted
    }
}

impl HolidayCalendar for KoreanHolidays {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        Self::is_fixed_holiday(date)
            || self.extra.contains(&date)
            || (!is_weekend(date) && self.substitute_days(date.year()).contains(&date))
    }
}
