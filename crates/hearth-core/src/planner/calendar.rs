//! Week arithmetic in the generator's reference time zone.

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Utc};

/// 0 for Monday through 6 for Sunday.
pub fn day_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// The Monday on or before `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// Monday through Sunday starting at `monday`.
pub fn week_dates(monday: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|i| monday + Days::new(i as u64))
}

/// The calendar date at instant `now` in the reference offset.
pub fn today_in(offset: FixedOffset, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// This week's Monday and next week's, relative to `today`.
pub fn target_mondays(today: NaiveDate) -> [NaiveDate; 2] {
    let current = monday_of(today);
    [current, current + Days::new(7)]
}
