use chrono::{DateTime, Duration, Utc};

use super::search::{find_crossing, ScanSpec};
use super::Ephemeris;
use crate::angles::{cos_deg, normalize_angle, normalize_pm180};
use crate::frames::{self, RotationMatrix};
use crate::julian::{self, J2000_JD, SECONDS_PER_DAY};
use crate::types::{Body, EquatorialCoordinates, ObserverPosition, Quarter, QuarterEvent};

/// Mean synodic month, days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_853;

const MILLIS_PER_DAY: f64 = SECONDS_PER_DAY * 1000.0;
const QUARTER_MILLIS: f64 = SYNODIC_MONTH_DAYS * MILLIS_PER_DAY / 4.0;
const MOON_DISTANCE_KM: f64 = 384_400.0;
const SUN_DISTANCE_KM: f64 = 149_597_870.0;

const TRANSIT_SCAN: ScanSpec = ScanSpec {
    step_days: 1.0 / 24.0,
    window_days: 1.5,
    convergence_days: 1.0 / SECONDS_PER_DAY,
    max_iterations: 60,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformMoon {
    new_moon: DateTime<Utc>,
}

impl UniformMoon {
    pub fn new(new_moon: DateTime<Utc>) -> Self {
        Self { new_moon }
    }

    /// Lunations arranged so that `quarter` occurs at `instant`.
    pub fn from_quarter(quarter: Quarter, instant: DateTime<Utc>) -> Self {
        let offset = (quarter.ordinal() as f64 * QUARTER_MILLIS).round() as i64;
        Self::new(instant - Duration::milliseconds(offset))
    }

    pub fn new_moon_epoch(&self) -> DateTime<Utc> {
        self.new_moon
    }

    /// Instant of the `n`-th quarter counted from the epoch New Moon.
    pub fn quarter_instant(&self, n: i64) -> QuarterEvent {
        let offset = (n as f64 * QUARTER_MILLIS).round() as i64;
        QuarterEvent {
            time: self.new_moon + Duration::milliseconds(offset),
            quarter: Quarter::from_ordinal(n),
        }
    }

    fn elapsed_days(&self, instant: DateTime<Utc>) -> f64 {
        (instant - self.new_moon).num_milliseconds() as f64 / MILLIS_PER_DAY
    }

    fn phase_at(&self, instant: DateTime<Utc>) -> f64 {
        normalize_angle(360.0 * self.elapsed_days(instant) / SYNODIC_MONTH_DAYS)
    }

    fn sun_right_ascension(jd_ut: f64) -> f64 {
        normalize_angle(280.46 + 0.985_647_4 * (jd_ut - J2000_JD))
    }

    fn right_ascension(&self, body: Body, instant: DateTime<Utc>) -> f64 {
        let sun = Self::sun_right_ascension(julian::jd_from_instant(instant));
        match body {
            Body::Sun => sun,
            Body::Moon => normalize_angle(sun + self.phase_at(instant)),
        }
    }

    fn offset_days(instant: DateTime<Utc>, days: f64) -> DateTime<Utc> {
        instant + Duration::milliseconds((days * MILLIS_PER_DAY).round() as i64)
    }
}

impl Ephemeris for UniformMoon {
    fn search_quarter_at_or_after(&self, instant: DateTime<Utc>) -> Option<QuarterEvent> {
        let elapsed = (instant - self.new_moon).num_milliseconds() as f64;
        let mut n = (elapsed / QUARTER_MILLIS).ceil() as i64;
        // Millisecond rounding can land a hair before `instant`.
        while self.quarter_instant(n).time < instant {
            n += 1;
        }
        while self.quarter_instant(n - 1).time >= instant {
            n -= 1;
        }
        Some(self.quarter_instant(n))
    }

    fn search_phase_angle(
        &self,
        target_deg: f64,
        near: DateTime<Utc>,
        window_days: f64,
    ) -> Option<DateTime<Utc>> {
        let phase = self.phase_at(near);
        let delta_deg = if window_days >= 0.0 {
            normalize_angle(target_deg - phase)
        } else {
            normalize_angle(phase - target_deg)
        };
        let delta_days = delta_deg / 360.0 * SYNODIC_MONTH_DAYS;
        if delta_days > window_days.abs() {
            return None;
        }
        Some(Self::offset_days(near, delta_days * window_days.signum()))
    }

    fn illuminated_fraction(&self, instant: DateTime<Utc>) -> f64 {
        (1.0 - cos_deg(self.phase_at(instant))) / 2.0
    }

    fn ecliptic_phase_angle(&self, instant: DateTime<Utc>) -> f64 {
        self.phase_at(instant)
    }

    fn equatorial_coordinates(
        &self,
        body: Body,
        instant: DateTime<Utc>,
        _observer: &ObserverPosition,
    ) -> EquatorialCoordinates {
        let right_ascension_deg = self.right_ascension(body, instant);
        let distance = match body {
            Body::Sun => SUN_DISTANCE_KM,
            Body::Moon => MOON_DISTANCE_KM,
        };
        EquatorialCoordinates {
            right_ascension_deg,
            declination_deg: 0.0,
            vector: frames::from_spherical(right_ascension_deg, 0.0, distance),
        }
    }

    fn equatorial_to_horizontal(
        &self,
        instant: DateTime<Utc>,
        observer: &ObserverPosition,
    ) -> RotationMatrix {
        let gmst = julian::gmst_deg(julian::jd_from_instant(instant));
        frames::equatorial_to_horizontal(
            julian::local_sidereal_deg(gmst, observer.longitude),
            observer.latitude,
        )
    }

    fn local_meridian_crossing(
        &self,
        body: Body,
        observer: &ObserverPosition,
        start: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let start_jd = julian::jd_from_instant(start);
        let hour_angle = |t: f64| {
            let instant = Self::offset_days(start, t - start_jd);
            let lst = julian::local_sidereal_deg(julian::gmst_deg(t), observer.longitude);
            normalize_pm180(lst - self.right_ascension(body, instant))
        };
        find_crossing(hour_angle, start_jd, &TRANSIT_SCAN).and_then(julian::instant_from_jd)
    }
}
