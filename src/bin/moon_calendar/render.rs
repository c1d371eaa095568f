use std::fmt::Write;

use chrono::Month;
use chrono_tz::Tz;

use lunar_calendar::{DayRecord, MonthResult, PhaseSegment};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn month(out: &mut String, result: &MonthResult, tz: &Tz, with_days: bool) -> std::fmt::Result {
    let name = u8::try_from(result.month.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("?");
    writeln!(out, "{name} {} ({tz})", result.month.year())?;
    for segment in &result.segments {
        self::segment(out, segment, tz)?;
        if with_days {
            for day in &segment.days {
                self::day(out, day)?;
            }
        }
    }
    writeln!(out)
}

fn segment(out: &mut String, segment: &PhaseSegment, tz: &Tz) -> std::fmt::Result {
    let first = segment.days.first().map_or(0, |d| d.day_of_month);
    let last = segment.days.last().map_or(0, |d| d.day_of_month);
    let label = if segment.is_labelled() {
        segment.phase.label()
    } else {
        ""
    };
    writeln!(
        out,
        "  {first:>2}-{last:<2} {label:<16} {} {}{}",
        segment.opened_by.quarter.label(),
        segment.opened_by.time.with_timezone(tz).format("%Y-%m-%d %H:%M"),
        if segment.after_first_new_of_month { "" } else { "  (before first new moon)" },
    )
}

fn day(out: &mut String, day: &DayRecord) -> std::fmt::Result {
    let marker = match (day.is_quarter, day.is_half) {
        (true, true) => "●",
        (true, false) => "◐",
        _ => " ",
    };
    writeln!(
        out,
        "      {} {:>2} {marker} cycle {:>2}  {:>3}%  phase {:>6.2}°  tilt {:>7.2}°",
        WEEKDAYS[day.day_of_week as usize % 7],
        day.day_of_month,
        day.day_of_cycle,
        day.rounded_percent(),
        day.ecliptic_longitude,
        day.tilt,
    )
}
