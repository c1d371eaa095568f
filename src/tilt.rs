use chrono::{DateTime, Utc};

use crate::angles::rad_to_deg;
use crate::ephemeris::Ephemeris;
use crate::frames::Axis;
use crate::types::{Body, ObserverPosition};

/// Position angle of the sunlit limb, degrees counter-clockwise from the
/// observer's "up", as seen when looking straight at the Moon.
pub fn tilt<E: Ephemeris + ?Sized>(
    instant: DateTime<Utc>,
    observer: &ObserverPosition,
    ephemeris: &E,
) -> f64 {
    let moon = ephemeris.equatorial_coordinates(Body::Moon, instant, observer);
    let sun = ephemeris.equatorial_coordinates(Body::Sun, instant, observer);
    let rotation = ephemeris.equatorial_to_horizontal(instant, observer);
    let horizontal = ephemeris.horizontal_coordinates(
        instant,
        observer,
        moon.right_ascension_deg,
        moon.declination_deg,
    );

    let camera = rotation
        .pivot(Axis::Z, horizontal.azimuth)
        .pivot(Axis::Y, horizontal.altitude);
    let sun_in_view = camera.rotate(&sun.vector);
    rad_to_deg(sun_in_view[1].atan2(sun_in_view[2]))
}
