use chrono::{DateTime, TimeZone};
use rayon::prelude::*;
use tracing::debug;

use crate::assembler::days_in_month;
use crate::config::SearchConfig;
use crate::dates::{local_date, start_of_day};
use crate::ephemeris::Ephemeris;
use crate::error::CalendarError;
use crate::types::{CalendarMonth, MonthResult, ObserverPosition, Phase, PhaseSegment, Quarter};
use crate::walker::{new_moon_at_or_before, quarters_for_month};

pub fn compile<Tz: TimeZone, E: Ephemeris + ?Sized>(
    zoned_month: &DateTime<Tz>,
    observer: &ObserverPosition,
    ephemeris: &E,
    config: &SearchConfig,
) -> Result<MonthResult, CalendarError> {
    let month = CalendarMonth::of(&zoned_month.date_naive());
    compile_month(month, &zoned_month.timezone(), observer, ephemeris, config)
}

pub fn compile_month<Tz: TimeZone, E: Ephemeris + ?Sized>(
    month: CalendarMonth,
    tz: &Tz,
    observer: &ObserverPosition,
    ephemeris: &E,
    config: &SearchConfig,
) -> Result<MonthResult, CalendarError> {
    let start = start_of_day(tz, month.first_day()?)?;
    let quarters = quarters_for_month(start, month, tz, ephemeris, config)?;

    let mut last_new_moon = match quarters.events.first() {
        Some(first) => new_moon_at_or_before(first, ephemeris)?,
        None => new_moon_at_or_before(&quarters.bound, ephemeris)?,
    };
    let mut after_first_new = false;
    let mut segments = Vec::with_capacity(quarters.events.len());

    for (opening, closing) in quarters.intervals() {
        if opening.quarter == Quarter::NewMoon {
            last_new_moon = *opening;
            if month.contains(local_date(tz, opening.time)) {
                after_first_new = true;
            }
        }
        let days = days_in_month(
            opening,
            closing,
            &last_new_moon,
            month,
            tz,
            observer,
            ephemeris,
        )?;
        if days.is_empty() {
            debug!(opening = %opening.time, "interval has no days in month");
            continue;
        }
        debug!(
            phase = Phase::opened_by(opening.quarter).label(),
            first_day = days[0].day_of_month,
            len = days.len(),
            after_first_new,
            "segment"
        );
        segments.push(PhaseSegment {
            phase: Phase::opened_by(opening.quarter),
            opened_by: *opening,
            after_first_new_of_month: after_first_new,
            days,
        });
    }

    Ok(MonthResult { month, segments })
}

/// Compiles `count` consecutive months starting with the one containing
/// `zoned_start`. Months are independent and run in parallel; results come
/// back in calendar order and any failure fails the whole call.
pub fn compile_months<Tz, E>(
    zoned_start: &DateTime<Tz>,
    count: u32,
    observer: &ObserverPosition,
    ephemeris: &E,
    config: &SearchConfig,
) -> Result<Vec<MonthResult>, CalendarError>
where
    Tz: TimeZone + Sync,
    E: Ephemeris + Sync + ?Sized,
{
    let tz = zoned_start.timezone();
    let first = CalendarMonth::of(&zoned_start.date_naive());
    (0..count)
        .into_par_iter()
        .map(|offset| compile_month(first.plus_months(offset), &tz, observer, ephemeris, config))
        .collect()
}
