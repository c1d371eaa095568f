use chrono::{DateTime, Utc};
use tracing::trace;

use super::search::{find_crossing, ScanSpec};
use super::Ephemeris;
use crate::angles::{cos_deg, normalize_angle, normalize_pm180, rad_to_deg, sin_deg};
use crate::config::EphemerisConfig;
use crate::frames::{self, RotationMatrix, Vector3};
use crate::julian::{self, SECONDS_PER_DAY};
use crate::types::{Body, EquatorialCoordinates, ObserverPosition, Quarter, QuarterEvent};

const AU_KM: f64 = 149_597_870.7;
const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.14;
/// Polar over equatorial radius of the reference ellipsoid.
const EARTH_AXIS_RATIO: f64 = 0.996_647_19;

// Multiples of D, M, M', F and the Σl / Σr coefficients (1e-6 deg, 1e-3 km).
#[rustfmt::skip]
const LONGITUDE_DISTANCE_TERMS: [(i8, i8, i8, i8, f64, f64); 32] = [
    (0,  0,  1,  0, 6_288_774.0, -20_905_355.0),
    (2,  0, -1,  0, 1_274_027.0,  -3_699_111.0),
    (2,  0,  0,  0,   658_314.0,  -2_955_968.0),
    (0,  0,  2,  0,   213_618.0,    -569_925.0),
    (0,  1,  0,  0,  -185_116.0,      48_888.0),
    (0,  0,  0,  2,  -114_332.0,      -3_149.0),
    (2,  0, -2,  0,    58_793.0,     246_158.0),
    (2, -1, -1,  0,    57_066.0,    -152_138.0),
    (2,  0,  1,  0,    53_322.0,    -170_733.0),
    (2, -1,  0,  0,    45_758.0,    -204_586.0),
    (0,  1, -1,  0,   -40_923.0,    -129_620.0),
    (1,  0,  0,  0,   -34_720.0,     108_743.0),
    (0,  1,  1,  0,   -30_383.0,     104_755.0),
    (2,  0,  0, -2,    15_327.0,      10_321.0),
    (0,  0,  1,  2,   -12_528.0,           0.0),
    (0,  0,  1, -2,    10_980.0,      79_661.0),
    (4,  0, -1,  0,    10_675.0,     -34_782.0),
    (0,  0,  3,  0,    10_034.0,     -23_210.0),
    (4,  0, -2,  0,     8_548.0,     -21_636.0),
    (2,  1, -1,  0,    -7_888.0,      24_208.0),
    (2,  1,  0,  0,    -6_766.0,      30_824.0),
    (1,  0, -1,  0,    -5_163.0,      -8_379.0),
    (1,  1,  0,  0,     4_987.0,     -16_675.0),
    (2, -1,  1,  0,     4_036.0,     -12_831.0),
    (2,  0,  2,  0,     3_994.0,     -10_445.0),
    (4,  0,  0,  0,     3_861.0,     -11_650.0),
    (2,  0, -3,  0,     3_665.0,      14_403.0),
    (0,  1, -2,  0,    -2_689.0,      -7_003.0),
    (2,  0, -1,  2,    -2_602.0,           0.0),
    (2, -1, -2,  0,     2_390.0,      10_056.0),
    (1,  0,  1,  0,    -2_348.0,       6_322.0),
    (2, -2,  0,  0,     2_236.0,      -9_884.0),
];

// Multiples of D, M, M', F and the Σb coefficient (1e-6 deg).
#[rustfmt::skip]
const LATITUDE_TERMS: [(i8, i8, i8, i8, f64); 20] = [
    (0,  0,  0,  1, 5_128_122.0),
    (0,  0,  1,  1,   280_602.0),
    (0,  0,  1, -1,   277_693.0),
    (2,  0,  0, -1,   173_237.0),
    (2,  0, -1,  1,    55_413.0),
    (2,  0, -1, -1,    46_271.0),
    (2,  0,  0,  1,    32_573.0),
    (0,  0,  2,  1,    17_198.0),
    (2,  0,  1, -1,     9_266.0),
    (0,  0,  2, -1,     8_822.0),
    (2, -1,  0, -1,     8_216.0),
    (2,  0, -2, -1,     4_324.0),
    (2,  0,  1,  1,     4_200.0),
    (2,  1,  0, -1,    -3_359.0),
    (2, -1, -1,  1,     2_463.0),
    (2, -1,  0,  1,     2_211.0),
    (2, -1, -1, -1,     2_065.0),
    (0,  1, -1, -1,    -1_870.0),
    (4,  0, -1, -1,     1_828.0),
    (0,  1,  0,  1,    -1_794.0),
];

#[derive(Debug, Clone, Copy)]
struct Positions {
    moon_longitude: f64,
    moon_latitude: f64,
    moon_distance_km: f64,
    sun_longitude: f64,
    sun_distance_km: f64,
    obliquity: f64,
    /// Nutation in longitude, degrees.
    nutation_longitude: f64,
}

/// Nutation in longitude and obliquity, degrees (Meeus ch. 22, 0.5" level).
fn nutation(t: f64) -> (f64, f64) {
    let omega = 125.044_52 - 1934.136_261 * t;
    let l_sun = 280.4665 + 36_000.7698 * t;
    let l_moon = 218.3165 + 481_267.8813 * t;
    let d_psi = -17.20 * sin_deg(omega) - 1.32 * sin_deg(2.0 * l_sun) - 0.23 * sin_deg(2.0 * l_moon)
        + 0.21 * sin_deg(2.0 * omega);
    let d_eps = 9.20 * cos_deg(omega) + 0.57 * cos_deg(2.0 * l_sun) + 0.10 * cos_deg(2.0 * l_moon)
        - 0.09 * cos_deg(2.0 * omega);
    (d_psi / 3600.0, d_eps / 3600.0)
}

fn mean_obliquity(t: f64) -> f64 {
    23.439_291_1 - 0.013_004_2 * t - 1.64e-7 * t * t + 5.04e-7 * t * t * t
}

/// Geometric longitude (degrees) and distance (AU) of the Sun.
fn sun_geometric(t: f64) -> (f64, f64) {
    let l0 = 280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t;
    let m = 357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t;
    let e = 0.016_708_634 - 0.000_042_037 * t - 0.000_000_126_7 * t * t;
    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * sin_deg(m)
        + (0.019_993 - 0.000_101 * t) * sin_deg(2.0 * m)
        + 0.000_289 * sin_deg(3.0 * m);
    let true_anomaly = m + c;
    let r = 1.000_001_018 * (1.0 - e * e) / (1.0 + e * cos_deg(true_anomaly));
    (normalize_angle(l0 + c), r)
}

/// Geometric longitude, latitude (degrees) and distance (km) of the Moon.
fn moon_geometric(t: f64) -> (f64, f64, f64) {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let l_prime = 218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t2 + t3 / 538_841.0
        - t4 / 65_194_000.0;
    let d = 297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t2 + t3 / 545_868.0
        - t4 / 113_065_000.0;
    let m = 357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t2 + t3 / 24_490_000.0;
    let m_prime = 134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t2 + t3 / 69_699.0
        - t4 / 14_712_000.0;
    let f = 93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2 - t3 / 3_526_000.0
        + t4 / 863_310_000.0;
    let a1 = 119.75 + 131.849 * t;
    let a2 = 53.09 + 479_264.290 * t;
    let a3 = 313.45 + 481_266.484 * t;
    let ecc = 1.0 - 0.002_516 * t - 0.000_007_4 * t2;

    let eccentricity_factor = |multiple: i8| match multiple.abs() {
        1 => ecc,
        2 => ecc * ecc,
        _ => 1.0,
    };
    let argument = |cd: i8, cm: i8, cmp: i8, cf: i8| {
        cd as f64 * d + cm as f64 * m + cmp as f64 * m_prime + cf as f64 * f
    };

    let mut sum_l = 0.0;
    let mut sum_r = 0.0;
    for &(cd, cm, cmp, cf, sl, sr) in LONGITUDE_DISTANCE_TERMS.iter() {
        let arg = argument(cd, cm, cmp, cf);
        let scale = eccentricity_factor(cm);
        sum_l += sl * scale * sin_deg(arg);
        sum_r += sr * scale * cos_deg(arg);
    }
    let mut sum_b = 0.0;
    for &(cd, cm, cmp, cf, sb) in LATITUDE_TERMS.iter() {
        sum_b += sb * eccentricity_factor(cm) * sin_deg(argument(cd, cm, cmp, cf));
    }

    sum_l += 3958.0 * sin_deg(a1) + 1962.0 * sin_deg(l_prime - f) + 318.0 * sin_deg(a2);
    sum_b += -2235.0 * sin_deg(l_prime)
        + 382.0 * sin_deg(a3)
        + 175.0 * sin_deg(a1 - f)
        + 175.0 * sin_deg(a1 + f)
        + 127.0 * sin_deg(l_prime - m_prime)
        - 115.0 * sin_deg(l_prime + m_prime);

    (
        normalize_angle(l_prime + sum_l / 1e6),
        sum_b / 1e6,
        385_000.56 + sum_r / 1000.0,
    )
}

fn positions_at(jd_ut: f64) -> Positions {
    let t = julian::centuries_since_j2000(julian::jd_tt(jd_ut));
    let (d_psi, d_eps) = nutation(t);
    let (sun_lon, sun_au) = sun_geometric(t);
    let (moon_lon, moon_lat, moon_km) = moon_geometric(t);
    // Annual aberration, 20.4898" / R
    let aberration = -20.4898 / 3600.0 / sun_au;
    Positions {
        moon_longitude: normalize_angle(moon_lon + d_psi),
        moon_latitude: moon_lat,
        moon_distance_km: moon_km,
        sun_longitude: normalize_angle(sun_lon + d_psi + aberration),
        sun_distance_km: sun_au * AU_KM,
        obliquity: mean_obliquity(t) + d_eps,
        nutation_longitude: d_psi,
    }
}

/// Greenwich apparent sidereal time, degrees.
fn apparent_sidereal_deg(jd_ut: f64, p: &Positions) -> f64 {
    normalize_angle(julian::gmst_deg(jd_ut) + p.nutation_longitude * cos_deg(p.obliquity))
}

/// Geocentric observer position in km, equator of date.
fn observer_vector(observer: &ObserverPosition, local_sidereal_deg: f64) -> Vector3 {
    let lat = observer.latitude;
    let u = rad_to_deg((EARTH_AXIS_RATIO * sin_deg(lat)).atan2(cos_deg(lat)));
    let height = observer.elevation / (EARTH_EQUATORIAL_RADIUS_KM * 1000.0);
    let rho_sin = EARTH_AXIS_RATIO * sin_deg(u) + height * sin_deg(lat);
    let rho_cos = cos_deg(u) + height * cos_deg(lat);
    [
        EARTH_EQUATORIAL_RADIUS_KM * rho_cos * cos_deg(local_sidereal_deg),
        EARTH_EQUATORIAL_RADIUS_KM * rho_cos * sin_deg(local_sidereal_deg),
        EARTH_EQUATORIAL_RADIUS_KM * rho_sin,
    ]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEphemeris {
    config: EphemerisConfig,
}

impl AnalyticEphemeris {
    pub fn new(config: EphemerisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EphemerisConfig {
        &self.config
    }

    fn phase_scan(&self, window_days: f64) -> ScanSpec {
        ScanSpec {
            step_days: self.config.scan_step_days,
            window_days,
            convergence_days: self.config.convergence_seconds / SECONDS_PER_DAY,
            max_iterations: self.config.max_iterations,
        }
    }

    fn phase_angle_jd(jd_ut: f64) -> f64 {
        let p = positions_at(jd_ut);
        normalize_angle(p.moon_longitude - p.sun_longitude)
    }

    fn topocentric(&self, body: Body, jd_ut: f64, observer: &ObserverPosition) -> EquatorialCoordinates {
        let p = positions_at(jd_ut);
        let ecliptic = match body {
            Body::Sun => frames::from_spherical(p.sun_longitude, 0.0, p.sun_distance_km),
            Body::Moon => {
                frames::from_spherical(p.moon_longitude, p.moon_latitude, p.moon_distance_km)
            }
        };
        let geocentric = frames::ecliptic_to_equatorial(p.obliquity).rotate(&ecliptic);
        let lst = julian::local_sidereal_deg(apparent_sidereal_deg(jd_ut, &p), observer.longitude);
        let vector = frames::subtract(&geocentric, &observer_vector(observer, lst));
        let (ra, dec, _) = frames::to_spherical(&vector);
        EquatorialCoordinates {
            right_ascension_deg: ra,
            declination_deg: dec,
            vector,
        }
    }
}

impl Ephemeris for AnalyticEphemeris {
    fn search_quarter_at_or_after(&self, instant: DateTime<Utc>) -> Option<QuarterEvent> {
        let jd = julian::jd_from_instant(instant);
        let phase = Self::phase_angle_jd(jd);
        let current = (phase / 90.0).floor();
        if phase - current * 90.0 == 0.0 {
            return Some(QuarterEvent {
                time: instant,
                quarter: Quarter::from_ordinal(current as i64),
            });
        }
        let quarter = Quarter::from_ordinal(current as i64 + 1);
        let target = quarter.phase_angle();
        let f = |t: f64| normalize_pm180(Self::phase_angle_jd(t) - target);
        let found = find_crossing(f, jd, &self.phase_scan(self.config.quarter_window_days));
        match found.and_then(julian::instant_from_jd) {
            Some(time) => Some(QuarterEvent { time, quarter }),
            None => {
                trace!(%instant, ?quarter, "quarter search exhausted its window");
                None
            }
        }
    }

    fn search_phase_angle(
        &self,
        target_deg: f64,
        near: DateTime<Utc>,
        window_days: f64,
    ) -> Option<DateTime<Utc>> {
        let f = |t: f64| normalize_pm180(Self::phase_angle_jd(t) - target_deg);
        find_crossing(f, julian::jd_from_instant(near), &self.phase_scan(window_days))
            .and_then(julian::instant_from_jd)
    }

    fn illuminated_fraction(&self, instant: DateTime<Utc>) -> f64 {
        let p = positions_at(julian::jd_from_instant(instant));
        let cos_elongation =
            cos_deg(p.moon_latitude) * cos_deg(p.moon_longitude - p.sun_longitude);
        let elongation = cos_elongation.clamp(-1.0, 1.0).acos();
        let phase_angle = (p.sun_distance_km * elongation.sin())
            .atan2(p.moon_distance_km - p.sun_distance_km * elongation.cos());
        ((1.0 + phase_angle.cos()) / 2.0).clamp(0.0, 1.0)
    }

    fn ecliptic_phase_angle(&self, instant: DateTime<Utc>) -> f64 {
        Self::phase_angle_jd(julian::jd_from_instant(instant))
    }

    fn equatorial_coordinates(
        &self,
        body: Body,
        instant: DateTime<Utc>,
        observer: &ObserverPosition,
    ) -> EquatorialCoordinates {
        self.topocentric(body, julian::jd_from_instant(instant), observer)
    }

    fn equatorial_to_horizontal(
        &self,
        instant: DateTime<Utc>,
        observer: &ObserverPosition,
    ) -> RotationMatrix {
        let jd = julian::jd_from_instant(instant);
        let p = positions_at(jd);
        let lst = julian::local_sidereal_deg(apparent_sidereal_deg(jd, &p), observer.longitude);
        frames::equatorial_to_horizontal(lst, observer.latitude)
    }

    fn local_meridian_crossing(
        &self,
        body: Body,
        observer: &ObserverPosition,
        start: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let hour_angle = |t: f64| {
            let p = positions_at(t);
            let lst = julian::local_sidereal_deg(apparent_sidereal_deg(t, &p), observer.longitude);
            normalize_pm180(lst - self.topocentric(body, t, observer).right_ascension_deg)
        };
        let spec = ScanSpec {
            step_days: self.config.transit_step_hours / 24.0,
            window_days: self.config.transit_window_days,
            convergence_days: self.config.convergence_seconds / SECONDS_PER_DAY,
            max_iterations: self.config.max_iterations,
        };
        find_crossing(hour_angle, julian::jd_from_instant(start), &spec)
            .and_then(julian::instant_from_jd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moon_position_meeus_example_47a() {
        // 1992 April 12, 0h TD: λ = 133.162655, β = -3.229126, Δ = 368409.7 km
        let t = julian::centuries_since_j2000(2_448_724.5);
        let (lon, lat, dist) = moon_geometric(t);
        assert!((lon - 133.162_655).abs() < 0.02, "lon = {lon}");
        assert!((lat + 3.229_126).abs() < 0.02, "lat = {lat}");
        assert!((dist - 368_409.7).abs() < 100.0, "dist = {dist}");
    }

    #[test]
    fn sun_position_meeus_example_25a() {
        // 1992 October 13, 0h TD: true longitude 199.90988, R = 0.99766
        let t = julian::centuries_since_j2000(2_448_908.5);
        let (lon, r) = sun_geometric(t);
        assert!((lon - 199.909_88).abs() < 0.001, "lon = {lon}");
        assert!((r - 0.997_66).abs() < 1e-4, "r = {r}");
    }

    #[test]
    fn nutation_meeus_example_22a() {
        // 1987 April 10, 0h TD: Δψ = -3.788", Δε = +9.443"
        let t = julian::centuries_since_j2000(2_446_895.5);
        let (d_psi, d_eps) = nutation(t);
        assert!((d_psi * 3600.0 + 3.788).abs() < 0.6, "d_psi = {}", d_psi * 3600.0);
        assert!((d_eps * 3600.0 - 9.443).abs() < 0.2, "d_eps = {}", d_eps * 3600.0);
    }

    #[test]
    fn observer_on_equator_sits_on_equatorial_radius() {
        let v = observer_vector(&ObserverPosition::default(), 0.0);
        assert!((v[0] - EARTH_EQUATORIAL_RADIUS_KM).abs() < 1e-9);
        assert!(v[1].abs() < 1e-9 && v[2].abs() < 1e-9);
    }

    #[test]
    fn observer_at_pole_sits_on_polar_axis() {
        let v = observer_vector(&ObserverPosition::new(90.0, 0.0, 0.0), 123.0);
        assert!(v[0].abs() < 1e-9 && v[1].abs() < 1e-9);
        assert!((v[2] - EARTH_EQUATORIAL_RADIUS_KM * EARTH_AXIS_RATIO).abs() < 1e-6);
    }
}
