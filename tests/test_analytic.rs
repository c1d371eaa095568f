use chrono::{DateTime, Duration, TimeZone, Utc};

use lunar_calendar::{
    compile, AnalyticEphemeris, Body, Ephemeris, EphemerisConfig, ObserverPosition, Phase,
    Quarter, SearchConfig,
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

fn minutes_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    (a - b).num_seconds().abs() as f64 / 60.0
}

// ── Quarter instants ──

#[test]
fn test_new_moon_january_2024() {
    let eph = AnalyticEphemeris::default();
    let q = eph.search_quarter_at_or_after(utc(2024, 1, 5, 0, 0)).unwrap();
    assert_eq!(q.quarter, Quarter::NewMoon);
    // Published: 2024-01-11 11:57 UTC
    assert_approx!(minutes_between(q.time, utc(2024, 1, 11, 11, 57)), 0.0, 15.0);
}

#[test]
fn test_full_moon_january_2024() {
    let eph = AnalyticEphemeris::default();
    let q = eph.search_quarter_at_or_after(utc(2024, 1, 22, 0, 0)).unwrap();
    assert_eq!(q.quarter, Quarter::FullMoon);
    // Published: 2024-01-25 17:54 UTC
    assert_approx!(minutes_between(q.time, utc(2024, 1, 25, 17, 54)), 0.0, 15.0);
}

#[test]
fn test_new_moon_february_2026() {
    let eph = AnalyticEphemeris::default();
    let q = eph.search_quarter_at_or_after(utc(2026, 2, 12, 0, 0)).unwrap();
    assert_eq!(q.quarter, Quarter::NewMoon);
    // Published: 2026-02-17 12:01 UTC
    assert_approx!(minutes_between(q.time, utc(2026, 2, 17, 12, 1)), 0.0, 15.0);
}

#[test]
fn test_backward_phase_search_finds_last_quarter() {
    let eph = AnalyticEphemeris::default();
    let t = eph
        .search_phase_angle(270.0, utc(2024, 2, 5, 0, 0), -10.0)
        .unwrap();
    // Published: 2024-02-02 23:18 UTC
    assert_approx!(minutes_between(t, utc(2024, 2, 2, 23, 18)), 0.0, 15.0);
}

#[test]
fn test_phase_search_respects_window() {
    let eph = AnalyticEphemeris::default();
    assert_eq!(eph.search_phase_angle(180.0, utc(2024, 1, 11, 12, 0), 3.0), None);
}

// ── Illumination and phase angle ──

#[test]
fn test_illumination_extremes() {
    let eph = AnalyticEphemeris::default();
    let new_moon = utc(2024, 1, 11, 11, 57);
    let full_moon = utc(2024, 1, 25, 17, 54);
    assert!(eph.illuminated_fraction(new_moon) < 0.01);
    assert!(eph.illuminated_fraction(full_moon) > 0.99);
    assert_approx!(lunar_calendar::normalize_pm180(eph.ecliptic_phase_angle(new_moon)), 0.0, 0.5);
    assert_approx!(eph.ecliptic_phase_angle(full_moon), 180.0, 0.5);
}

#[test]
fn test_illumination_near_half_at_quarter() {
    let eph = AnalyticEphemeris::default();
    // First Quarter 2024-01-18 03:53 UTC
    assert_approx!(eph.illuminated_fraction(utc(2024, 1, 18, 3, 53)), 0.5, 0.02);
}

// ── Topocentric coordinates ──

#[test]
fn test_moon_parallax_shifts_declination() {
    let eph = AnalyticEphemeris::default();
    let t = utc(2024, 1, 18, 0, 0);
    let equator = ObserverPosition::new(0.0, 0.0, 0.0);
    let north = ObserverPosition::new(60.0, 0.0, 0.0);
    let a = eph.equatorial_coordinates(Body::Moon, t, &equator);
    let b = eph.equatorial_coordinates(Body::Moon, t, &north);
    // Horizontal parallax is close to one degree
    let shift = (a.declination_deg - b.declination_deg).abs();
    assert!(shift > 0.1 && shift < 1.1, "shift = {}", shift);
    // Sun parallax is under 9 arcseconds
    let sa = eph.equatorial_coordinates(Body::Sun, t, &equator);
    let sb = eph.equatorial_coordinates(Body::Sun, t, &north);
    assert_approx!(sa.declination_deg, sb.declination_deg, 0.003);
}

#[test]
fn test_sun_near_winter_solstice_declination() {
    let eph = AnalyticEphemeris::default();
    let sun = eph.equatorial_coordinates(Body::Sun, utc(2024, 12, 21, 9, 20), &ObserverPosition::default());
    assert_approx!(sun.declination_deg, -23.44, 0.02);
}

#[test]
fn test_moon_transit_is_due_south() {
    let eph = AnalyticEphemeris::default();
    let obs = ObserverPosition::new(40.0, -105.0, 1600.0);
    let start = utc(2024, 3, 10, 0, 0);
    let transit = eph.local_meridian_crossing(Body::Moon, &obs, start).unwrap();
    assert!(transit >= start && transit - start < Duration::hours(25));
    let moon = eph.equatorial_coordinates(Body::Moon, transit, &obs);
    let hz = eph.horizontal_coordinates(transit, &obs, moon.right_ascension_deg, moon.declination_deg);
    assert_approx!(hz.azimuth, 180.0, 0.5);
}

#[test]
fn test_sun_transit_near_local_noon() {
    let eph = AnalyticEphemeris::default();
    let obs = ObserverPosition::new(51.48, 0.0, 0.0);
    let transit = eph
        .local_meridian_crossing(Body::Sun, &obs, utc(2024, 11, 3, 0, 0))
        .unwrap();
    // Equation of time ≈ +16.4 min in early November
    assert_approx!(minutes_between(transit, utc(2024, 11, 3, 11, 44)), 0.0, 2.0);
}

// ── Whole month ──

#[test]
fn test_february_2026_month() {
    let eph = AnalyticEphemeris::new(EphemerisConfig::default());
    let result = compile(
        &utc(2026, 2, 1, 0, 0),
        &ObserverPosition::new(51.5, -0.1, 20.0),
        &eph,
        &SearchConfig::default(),
    )
    .unwrap();
    let days: Vec<u32> = result.days().map(|d| d.day_of_month).collect();
    assert_eq!(days, (1..=28).collect::<Vec<_>>());

    // Full Moon 2026-02-01 22:09 UTC opens the month
    let first = &result.segments[0];
    assert_eq!(first.phase, Phase::WaningGibbous);
    assert!(first.days[0].is_quarter && first.days[0].is_half);
    assert!(!first.after_first_new_of_month);

    let crescent = result
        .segments
        .iter()
        .find(|s| s.phase == Phase::WaxingCrescent)
        .unwrap();
    assert_eq!(crescent.days[0].day_of_month, 17);
    assert_eq!(crescent.days[0].day_of_cycle, 0);
    assert!(crescent.after_first_new_of_month);

    for day in result.days() {
        assert!(day.percent_fullness >= 0.0 && day.percent_fullness <= 100.0);
    }
}
