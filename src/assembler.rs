use chrono::{Datelike, NaiveDate, TimeZone};
use tracing::trace;

use crate::dates::{local_date, local_noon, noon_days_between, start_of_day};
use crate::ephemeris::Ephemeris;
use crate::error::CalendarError;
use crate::tilt::tilt;
use crate::types::{Body, CalendarMonth, DayRecord, ObserverPosition, QuarterEvent};

/// Per-day records for the local dates in `[quarter, next_quarter)` that fall
/// inside `month`. Every day is evaluated at its local noon, except the tilt,
/// which is taken at the Moon's meridian crossing on that day.
pub fn days_in_month<Tz: TimeZone, E: Ephemeris + ?Sized>(
    quarter: &QuarterEvent,
    next_quarter: &QuarterEvent,
    last_new_moon: &QuarterEvent,
    month: CalendarMonth,
    tz: &Tz,
    observer: &ObserverPosition,
    ephemeris: &E,
) -> Result<Vec<DayRecord>, CalendarError> {
    let quarter_date = local_date(tz, quarter.time);
    let end_date = local_date(tz, next_quarter.time);
    let new_moon_date = local_date(tz, last_new_moon.time);

    let mut days = Vec::new();
    for date in quarter_date.iter_days().take_while(|d| *d < end_date) {
        if !month.contains(date) {
            continue;
        }
        let is_quarter = date == quarter_date;
        days.push(assemble_day(
            date,
            is_quarter,
            is_quarter && quarter.quarter.is_half(),
            new_moon_date,
            tz,
            observer,
            ephemeris,
        )?);
    }
    Ok(days)
}

fn assemble_day<Tz: TimeZone, E: Ephemeris + ?Sized>(
    date: NaiveDate,
    is_quarter: bool,
    is_half: bool,
    new_moon_date: NaiveDate,
    tz: &Tz,
    observer: &ObserverPosition,
    ephemeris: &E,
) -> Result<DayRecord, CalendarError> {
    let noon = local_noon(tz, date)?;
    let day_of_cycle = noon_days_between(tz, new_moon_date, date)?.max(0) as u32;
    let percent_fullness = (ephemeris.illuminated_fraction(noon) * 100.0).clamp(0.0, 100.0);
    let ecliptic_longitude = ephemeris.ecliptic_phase_angle(noon);

    let day_start = start_of_day(tz, date)?;
    let culmination = ephemeris
        .local_meridian_crossing(Body::Moon, observer, day_start)
        .ok_or(CalendarError::EphemerisUnresolved {
            query: "moon culmination",
            near: day_start,
        })?;
    let tilt = tilt(culmination, observer, ephemeris);

    trace!(
        %date,
        day_of_cycle,
        percent_fullness,
        ecliptic_longitude,
        tilt,
        %culmination,
        "assembled day"
    );
    Ok(DayRecord {
        date,
        day_of_week: date.weekday().num_days_from_sunday(),
        day_of_month: date.day(),
        day_of_cycle,
        percent_fullness,
        ecliptic_longitude,
        is_quarter,
        is_half,
        tilt,
        culmination,
    })
}
