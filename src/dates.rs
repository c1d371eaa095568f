use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::CalendarError;
use crate::types::CalendarMonth;

/// Longest wall-clock gap searched past a nonexistent local time.
const MAX_GAP_MINUTES: i64 = 4 * 60;
const GAP_STEP_MINUTES: i64 = 15;

pub fn leap_year(year: i32) -> bool {
    (year % 400 == 0) || (year % 4 == 0 && year % 100 != 0)
}

pub fn days_in_months(year: i32) -> [u32; 12] {
    [
        31,
        if leap_year(year) { 29 } else { 28 },
        31, 30, 31, 30, 31, 31, 30, 31, 30, 31,
    ]
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let index = month.checked_sub(1)? as usize;
    days_in_months(year).get(index).copied()
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(CalendarError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    pub fn of<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1 = January.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn days(&self) -> u32 {
        days_in_months(self.year)[self.month as usize - 1]
    }

    pub fn first_day(&self) -> Result<NaiveDate, CalendarError> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or(CalendarError::InvalidMonth {
            year: self.year,
            month: self.month,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn plus_months(&self, count: u32) -> Self {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) + count as i64;
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }
}

pub fn local_date<Tz: TimeZone>(tz: &Tz, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Earliest instant showing `wall` on the clock of `tz`, or the first valid
/// instant after it when `wall` falls in a transition gap.
pub fn resolve_local<Tz: TimeZone>(
    tz: &Tz,
    wall: NaiveDateTime,
) -> Result<DateTime<Utc>, CalendarError> {
    let mut offset = 0;
    while offset <= MAX_GAP_MINUTES {
        let candidate = wall + Duration::minutes(offset);
        if let Some(dt) = tz.from_local_datetime(&candidate).earliest() {
            return Ok(dt.with_timezone(&Utc));
        }
        offset += GAP_STEP_MINUTES;
    }
    Err(CalendarError::NonexistentLocalTime { date: wall.date() })
}

pub fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Utc>, CalendarError> {
    resolve_local(tz, date.and_time(chrono::NaiveTime::MIN))
}

pub fn local_noon<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Utc>, CalendarError> {
    let wall = date
        .and_hms_opt(12, 0, 0)
        .ok_or(CalendarError::NonexistentLocalTime { date })?;
    resolve_local(tz, wall)
}

/// Whole days between the local noons of two dates, rounded so that 23 h and
/// 25 h transition days still count as one.
pub fn noon_days_between<Tz: TimeZone>(
    tz: &Tz,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<i64, CalendarError> {
    let elapsed = local_noon(tz, to)? - local_noon(tz, from)?;
    Ok((elapsed.num_seconds() as f64 / 86_400.0).round() as i64)
}
