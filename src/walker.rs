use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::debug;

use crate::config::SearchConfig;
use crate::dates::local_date;
use crate::ephemeris::Ephemeris;
use crate::error::CalendarError;
use crate::types::{CalendarMonth, Quarter, QuarterEvent};

/// A New Moon is never more than one lunation behind any quarter.
const NEW_MOON_LOOKBACK_DAYS: f64 = 31.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthQuarters {
    pub events: Vec<QuarterEvent>,
    /// First quarter whose local date falls after the month. Bounds the final
    /// segment and is never emitted as a segment of its own.
    pub bound: QuarterEvent,
    /// True when `events[0]` was reconstructed before the month start.
    pub opens_mid_phase: bool,
}

impl MonthQuarters {
    pub fn intervals(&self) -> impl Iterator<Item = (&QuarterEvent, &QuarterEvent)> {
        self.events
            .iter()
            .zip(self.events.iter().skip(1).chain(std::iter::once(&self.bound)))
    }
}

fn duration_days(days: f64) -> Duration {
    Duration::milliseconds((days * 86_400_000.0).round() as i64)
}

fn first_quarter_at_or_after<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    instant: DateTime<Utc>,
) -> Result<QuarterEvent, CalendarError> {
    ephemeris
        .search_quarter_at_or_after(instant)
        .ok_or(CalendarError::EphemerisUnresolved {
            query: "lunar quarter",
            near: instant,
        })
}

pub fn next_quarter<E: Ephemeris + ?Sized>(
    event: &QuarterEvent,
    ephemeris: &E,
    config: &SearchConfig,
) -> Result<QuarterEvent, CalendarError> {
    let from = event.time + duration_days(config.quarter_stride_days);
    let next = first_quarter_at_or_after(ephemeris, from)?;
    if next.time <= event.time {
        return Err(CalendarError::QuarterSearchInconsistency {
            found: next.time,
            reference: event.time,
        });
    }
    Ok(next)
}

/// The quarter immediately before `event`, found by a bounded backward
/// phase-angle search. Must be strictly earlier.
pub fn previous_quarter<E: Ephemeris + ?Sized>(
    event: &QuarterEvent,
    ephemeris: &E,
    config: &SearchConfig,
) -> Result<QuarterEvent, CalendarError> {
    let quarter = event.quarter.previous();
    let near = event.time - duration_days(config.preceding_backstep_days);
    let time = ephemeris
        .search_phase_angle(quarter.phase_angle(), near, -config.preceding_window_days)
        .ok_or(CalendarError::EphemerisUnresolved {
            query: "preceding lunar quarter",
            near,
        })?;
    if time >= event.time {
        return Err(CalendarError::QuarterSearchInconsistency {
            found: time,
            reference: event.time,
        });
    }
    Ok(QuarterEvent { time, quarter })
}

pub fn new_moon_at_or_before<E: Ephemeris + ?Sized>(
    event: &QuarterEvent,
    ephemeris: &E,
) -> Result<QuarterEvent, CalendarError> {
    if event.quarter == Quarter::NewMoon {
        return Ok(*event);
    }
    let time = ephemeris
        .search_phase_angle(0.0, event.time, -NEW_MOON_LOOKBACK_DAYS)
        .ok_or(CalendarError::EphemerisUnresolved {
            query: "previous new moon",
            near: event.time,
        })?;
    if time > event.time {
        return Err(CalendarError::QuarterSearchInconsistency {
            found: time,
            reference: event.time,
        });
    }
    Ok(QuarterEvent {
        time,
        quarter: Quarter::NewMoon,
    })
}

pub fn quarters_for_month<Tz: TimeZone, E: Ephemeris + ?Sized>(
    start_of_month: DateTime<Utc>,
    month: CalendarMonth,
    tz: &Tz,
    ephemeris: &E,
    config: &SearchConfig,
) -> Result<MonthQuarters, CalendarError> {
    let first = first_quarter_at_or_after(ephemeris, start_of_month)?;
    let mut events = Vec::new();

    let opens_mid_phase = local_date(tz, first.time) != month.first_day()?;
    if opens_mid_phase {
        let preceding = previous_quarter(&first, ephemeris, config)?;
        debug!(
            first = %first.time,
            preceding = %preceding.time,
            quarter = preceding.quarter.label(),
            "month opens mid-phase"
        );
        events.push(preceding);
    }

    let mut current = first;
    let mut in_month = 0;
    while month.contains(local_date(tz, current.time)) {
        in_month += 1;
        if in_month > config.max_quarters_per_month {
            return Err(CalendarError::QuarterSearchInconsistency {
                found: current.time,
                reference: start_of_month,
            });
        }
        events.push(current);
        current = next_quarter(&current, ephemeris, config)?;
    }

    debug!(
        year = month.year,
        month = month.month,
        quarters = in_month,
        bound = %current.time,
        "walked month quarters"
    );
    Ok(MonthQuarters {
        events,
        bound: current,
        opens_mid_phase,
    })
}
