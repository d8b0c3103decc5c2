//! Business-day calendar for pressdigest.
//!
//! Resolves the "previous business day" window a digest covers, skipping
//! weekends (optionally) and public holidays in a fixed timezone.

pub mod holiday;
pub mod window;

pub use holiday::{HolidayCalendar, KoreanHolidays, NoHolidays};
pub use window::{
    default_cutoff_time, is_business_day, is_weekend, resolve_window, DateWindow, WindowPolicy,
    DEFAULT_MAX_LOOKBACK_DAYS,
};
