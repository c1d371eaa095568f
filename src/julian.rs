use chrono::{DateTime, Datelike, Utc};

use crate::angles::normalize_angle;

pub const J2000_JD: f64 = 2_451_545.0;
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

pub fn jd_from_instant(instant: DateTime<Utc>) -> f64 {
    UNIX_EPOCH_JD + instant.timestamp_millis() as f64 / (SECONDS_PER_DAY * 1000.0)
}

pub fn instant_from_jd(jd: f64) -> Option<DateTime<Utc>> {
    if !jd.is_finite() {
        return None;
    }
    let millis = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1000.0).round();
    DateTime::from_timestamp_millis(millis as i64)
}

/// ΔT = TT − UT in seconds.
pub fn delta_t_seconds(year: f64) -> f64 {
    if year < 1900.0 || year >= 2150.0 {
        let u = (year - 1820.0) / 100.0;
        return -20.0 + 32.0 * u * u;
    }
    if year < 1920.0 {
        let t = year - 1900.0;
        -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3)
            - 0.000197 * t.powi(4)
    } else if year < 1941.0 {
        let t = year - 1920.0;
        21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3)
    } else if year < 1961.0 {
        let t = year - 1950.0;
        29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
    } else if year < 1986.0 {
        let t = year - 1975.0;
        45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
    } else if year < 2005.0 {
        let t = year - 2000.0;
        63.86 + 0.3345 * t - 0.060374 * t.powi(2)
            + 0.0017275 * t.powi(3)
            + 0.000651814 * t.powi(4)
            + 0.00002373599 * t.powi(5)
    } else if year < 2050.0 {
        let t = year - 2000.0;
        62.92 + 0.32217 * t + 0.005589 * t.powi(2)
    } else {
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - year)
    }
}

pub fn decimal_year(jd_ut: f64) -> f64 {
    match instant_from_jd(jd_ut) {
        Some(dt) => dt.year() as f64 + (dt.ordinal0() as f64 + 0.5) / 365.25,
        None => 2000.0 + (jd_ut - J2000_JD) / 365.25,
    }
}

pub fn jd_tt(jd_ut: f64) -> f64 {
    jd_ut + delta_t_seconds(decimal_year(jd_ut)) / SECONDS_PER_DAY
}

pub fn centuries_since_j2000(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}

/// Greenwich mean sidereal time in degrees [0, 360), Meeus eq. 12.4.
pub fn gmst_deg(jd_ut: f64) -> f64 {
    let t = centuries_since_j2000(jd_ut);
    let theta = 280.460_618_37 + 360.985_647_366_29 * (jd_ut - J2000_JD) + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    normalize_angle(theta)
}

/// Local sidereal time in degrees from a Greenwich value and east longitude.
pub fn local_sidereal_deg(greenwich_deg: f64, longitude_east_deg: f64) -> f64 {
    normalize_angle(greenwich_deg + longitude_east_deg)
}
