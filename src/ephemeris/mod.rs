pub mod analytic;
pub mod fixture;
pub(crate) mod search;

use chrono::{DateTime, Utc};

use crate::frames::{self, RotationMatrix};
use crate::types::{Body, EquatorialCoordinates, HorizontalCoordinates, ObserverPosition, QuarterEvent};

pub use analytic::AnalyticEphemeris;
pub use fixture::UniformMoon;

pub trait Ephemeris {
    fn search_quarter_at_or_after(&self, instant: DateTime<Utc>) -> Option<QuarterEvent>;

    /// First instant the phase angle equals `target_deg`, searching from `near`
    /// over `window_days`. A negative window searches backward.
    fn search_phase_angle(
        &self,
        target_deg: f64,
        near: DateTime<Utc>,
        window_days: f64,
    ) -> Option<DateTime<Utc>>;

    /// Illuminated fraction of the lunar disk, [0, 1].
    fn illuminated_fraction(&self, instant: DateTime<Utc>) -> f64;

    /// Moon minus Sun geocentric ecliptic longitude, [0, 360).
    fn ecliptic_phase_angle(&self, instant: DateTime<Utc>) -> f64;

    fn equatorial_coordinates(
        &self,
        body: Body,
        instant: DateTime<Utc>,
        observer: &ObserverPosition,
    ) -> EquatorialCoordinates;

    fn equatorial_to_horizontal(
        &self,
        instant: DateTime<Utc>,
        observer: &ObserverPosition,
    ) -> RotationMatrix;

    fn horizontal_coordinates(
        &self,
        instant: DateTime<Utc>,
        observer: &ObserverPosition,
        right_ascension_deg: f64,
        declination_deg: f64,
    ) -> HorizontalCoordinates {
        let direction = frames::from_spherical(right_ascension_deg, declination_deg, 1.0);
        let local = self.equatorial_to_horizontal(instant, observer).rotate(&direction);
        let (azimuth, altitude) = frames::horizontal_angles(&local);
        HorizontalCoordinates { azimuth, altitude }
    }

    fn local_meridian_crossing(
        &self,
        body: Body,
        observer: &ObserverPosition,
        start: DateTime<Utc>,
    ) -> Option<DateTime<Utc>>;
}
