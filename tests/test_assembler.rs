use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use lunar_calendar::{
    compile, days_in_month, local_noon, start_of_day, tilt, CalendarMonth, Ephemeris,
    ObserverPosition, Quarter, QuarterEvent, SearchConfig, UniformMoon,
};

macro_rules! assert_approx {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $tol,
            "assert_approx failed: left={}, right={}, diff={}, tol={}",
            l, r, (l - r).abs(), $tol
        );
    };
}

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn observer() -> ObserverPosition {
    ObserverPosition::new(51.5, -0.1, 20.0)
}

fn nm_moon() -> UniformMoon {
    UniformMoon::new(utc(2026, 3, 1, 6, 0))
}

fn march() -> CalendarMonth {
    CalendarMonth::new(2026, 3).unwrap()
}

// ── Interval enumeration ──

#[test]
fn test_interval_is_half_open() {
    let moon = nm_moon();
    let (q, next) = (moon.quarter_instant(1), moon.quarter_instant(2));
    let days = days_in_month(&q, &next, &moon.quarter_instant(0), march(), &Utc, &observer(), &moon)
        .unwrap();
    let numbers: Vec<u32> = days.iter().map(|d| d.day_of_month).collect();
    // First Quarter on the 8th, Full Moon on the 16th
    assert_eq!(numbers, (8..=15).collect::<Vec<_>>());
    assert!(days[0].is_quarter);
    assert!(!days[0].is_half);
    assert!(days[1..].iter().all(|d| !d.is_quarter && !d.is_half));
}

#[test]
fn test_days_outside_month_are_dropped() {
    let moon = nm_moon();
    // New Moon of March 30 through the First Quarter of April 7
    let q = moon.quarter_instant(4);
    let next = moon.quarter_instant(5);
    let days = days_in_month(&q, &next, &q, march(), &Utc, &observer(), &moon).unwrap();
    let numbers: Vec<u32> = days.iter().map(|d| d.day_of_month).collect();
    assert_eq!(numbers, vec![30, 31]);
    assert!(days[0].is_quarter && days[0].is_half);

    let april = CalendarMonth::new(2026, 4).unwrap();
    let days = days_in_month(&q, &next, &q, april, &Utc, &observer(), &moon).unwrap();
    assert_eq!(days.first().map(|d| d.day_of_month), Some(1));
    assert_eq!(days.last().map(|d| d.day_of_month), Some(6));
    assert!(days.iter().all(|d| !d.is_quarter));
}

#[test]
fn test_interval_entirely_outside_month_is_empty() {
    let moon = nm_moon();
    let days = days_in_month(
        &moon.quarter_instant(5),
        &moon.quarter_instant(6),
        &moon.quarter_instant(4),
        march(),
        &Utc,
        &observer(),
        &moon,
    )
    .unwrap();
    assert!(days.is_empty());
}

// ── Per-day values ──

#[test]
fn test_weekday_and_cycle_count() {
    let moon = nm_moon();
    let days = days_in_month(
        &moon.quarter_instant(0),
        &moon.quarter_instant(1),
        &moon.quarter_instant(0),
        march(),
        &Utc,
        &observer(),
        &moon,
    )
    .unwrap();
    // 2026-03-01 is a Sunday
    assert_eq!(days[0].day_of_week, 0);
    assert_eq!(days[6].day_of_week, 6);
    let cycle: Vec<u32> = days.iter().map(|d| d.day_of_cycle).collect();
    assert_eq!(cycle, (0..=6).collect::<Vec<_>>());
}

#[test]
fn test_illumination_and_longitude_at_noon() {
    let moon = nm_moon();
    let days = days_in_month(
        &moon.quarter_instant(1),
        &moon.quarter_instant(2),
        &moon.quarter_instant(0),
        march(),
        &Utc,
        &observer(),
        &moon,
    )
    .unwrap();
    for day in &days {
        let noon = local_noon(&Utc, day.date).unwrap();
        assert_approx!(day.percent_fullness, moon.illuminated_fraction(noon) * 100.0, 1e-9);
        assert_approx!(day.ecliptic_longitude, moon.ecliptic_phase_angle(noon), 1e-9);
        assert!(day.ecliptic_longitude > 80.0 && day.ecliptic_longitude < 185.0);
    }
    // Unrounded: not an integer in general
    assert!(days.iter().any(|d| d.percent_fullness.fract() != 0.0));
    assert!(days.windows(2).all(|w| w[0].percent_fullness < w[1].percent_fullness));
}

#[test]
fn test_tilt_taken_at_culmination() {
    let moon = nm_moon();
    let obs = observer();
    let days = days_in_month(
        &moon.quarter_instant(1),
        &moon.quarter_instant(2),
        &moon.quarter_instant(0),
        march(),
        &Utc,
        &obs,
        &moon,
    )
    .unwrap();
    for day in &days {
        let day_start = start_of_day(&Utc, day.date).unwrap();
        assert!(day.culmination >= day_start);
        assert!(day.culmination < day_start + Duration::hours(25));
        assert_approx!(day.tilt, tilt(day.culmination, &obs, &moon), 1e-12);
    }
}

#[test]
fn test_cycle_count_across_dst_change() {
    let tz: Tz = "America/New_York".parse().unwrap();
    // New Moon on March 1 local; clocks spring forward on March 8
    let moon = UniformMoon::new(utc(2026, 3, 1, 17, 0));
    let nm = QuarterEvent {
        time: utc(2026, 3, 1, 17, 0),
        quarter: Quarter::NewMoon,
    };
    let days = days_in_month(
        &moon.quarter_instant(1),
        &moon.quarter_instant(2),
        &nm,
        march(),
        &tz,
        &observer(),
        &moon,
    )
    .unwrap();
    assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());
    let cycle: Vec<u32> = days.iter().map(|d| d.day_of_cycle).collect();
    assert_eq!(cycle, (7..7 + days.len() as u32).collect::<Vec<_>>());
}

#[test]
fn test_culmination_not_before_local_midnight_across_dst() {
    let tz: Tz = "America/New_York".parse().unwrap();
    let obs = ObserverPosition::new(40.7, -74.0, 10.0);
    let start = tz.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let epoch = utc(2026, 2, 10, 0, 0);
    for hour in 0..720 {
        let moon = UniformMoon::new(epoch + Duration::hours(hour));
        let result = compile(&start, &obs, &moon, &SearchConfig::default()).unwrap();
        for day in result.days() {
            let day_start = start_of_day(&tz, day.date).unwrap();
            assert!(
                day.culmination >= day_start,
                "epoch+{}h: {} culminates at {} before {}",
                hour, day.date, day.culmination, day_start
            );
            assert!(day.culmination < day_start + Duration::hours(26));
        }
    }
}

// ── Display helpers ──

#[test]
fn test_rounded_percent_and_disk_rotation() {
    let moon = nm_moon();
    let days = days_in_month(
        &moon.quarter_instant(1),
        &moon.quarter_instant(2),
        &moon.quarter_instant(0),
        march(),
        &Utc,
        &observer(),
        &moon,
    )
    .unwrap();
    for day in &days {
        assert_eq!(day.rounded_percent() as f64, day.percent_fullness.round());
        let rotation = day.disk_rotation();
        assert_approx!(rotation.lambda, 180.0 - day.ecliptic_longitude, 1e-12);
        assert_eq!(rotation.phi, 0.0);
        assert!(rotation.gamma >= 0.0 && rotation.gamma < 360.0);
        if day.ecliptic_longitude < 180.0 {
            assert_approx!(rotation.gamma, lunar_calendar::normalize_angle(day.tilt + 90.0), 1e-9);
        }
    }
}
