use chrono::{DateTime, NaiveDate, Utc};

use crate::angles::normalize_angle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quarter {
    NewMoon,
    FirstQuarter,
    FullMoon,
    LastQuarter,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [
        Quarter::NewMoon,
        Quarter::FirstQuarter,
        Quarter::FullMoon,
        Quarter::LastQuarter,
    ];

    /// Wraps modulo 4, so any integer maps onto a quarter.
    pub fn from_ordinal(ordinal: i64) -> Self {
        Self::ALL[ordinal.rem_euclid(4) as usize]
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn previous(self) -> Self {
        let q = self.ordinal();
        Self::ALL[(((q + 4) - 1) % 4) as usize]
    }

    pub fn next(self) -> Self {
        Self::ALL[((self.ordinal() + 1) % 4) as usize]
    }

    /// Phase angle (Moon minus Sun ecliptic longitude) at which this quarter occurs.
    pub fn phase_angle(self) -> f64 {
        self.ordinal() as f64 * 90.0
    }

    pub fn is_half(self) -> bool {
        self.ordinal() % 2 == 0
    }

    pub fn label(self) -> &'static str {
        match self {
            Quarter::NewMoon => "NEW MOON",
            Quarter::FirstQuarter => "FIRST QUARTER",
            Quarter::FullMoon => "FULL MOON",
            Quarter::LastQuarter => "LAST QUARTER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    WaxingCrescent,
    WaxingGibbous,
    WaningGibbous,
    WaningCrescent,
}

impl Phase {
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn opened_by(quarter: Quarter) -> Self {
        match quarter {
            Quarter::NewMoon => Phase::WaxingCrescent,
            Quarter::FirstQuarter => Phase::WaxingGibbous,
            Quarter::FullMoon => Phase::WaningGibbous,
            Quarter::LastQuarter => Phase::WaningCrescent,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::WaxingCrescent => "WAXING CRESCENT",
            Phase::WaxingGibbous => "WAXING GIBBOUS",
            Phase::WaningGibbous => "WANING GIBBOUS",
            Phase::WaningCrescent => "WANING CRESCENT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuarterEvent {
    pub time: DateTime<Utc>,
    pub quarter: Quarter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Moon,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl ObserverPosition {
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }
}

impl Default for ObserverPosition {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquatorialCoordinates {
    pub right_ascension_deg: f64,
    pub declination_deg: f64,
    /// Observer-to-body vector in km, true equator and equinox of date.
    pub vector: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalCoordinates {
    /// Degrees from north through east, [0, 360).
    pub azimuth: f64,
    pub altitude: f64,
}

/// Rotation angles `[lambda, phi, gamma]` of an orthographic moon-disk projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskRotation {
    pub lambda: f64,
    pub phi: f64,
    pub gamma: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayRecord {
    pub date: NaiveDate,
    /// 0 = Sunday.
    pub day_of_week: u32,
    pub day_of_month: u32,
    pub day_of_cycle: u32,
    /// Unrounded, 0..=100.
    pub percent_fullness: f64,
    pub ecliptic_longitude: f64,
    pub is_quarter: bool,
    pub is_half: bool,
    pub tilt: f64,
    pub culmination: DateTime<Utc>,
}

impl DayRecord {
    pub fn rounded_percent(&self) -> u8 {
        self.percent_fullness.round().clamp(0.0, 100.0) as u8
    }

    pub fn disk_rotation(&self) -> DiskRotation {
        let correction = if self.ecliptic_longitude < 180.0 {
            90.0
        } else {
            -90.0
        };
        DiskRotation {
            lambda: 180.0 - self.ecliptic_longitude,
            phi: 0.0,
            gamma: normalize_angle(self.tilt + correction),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSegment {
    pub phase: Phase,
    pub opened_by: QuarterEvent,
    pub after_first_new_of_month: bool,
    pub days: Vec<DayRecord>,
}

impl PhaseSegment {
    /// Segments of one or two days are too narrow to carry a phase name.
    pub fn is_labelled(&self) -> bool {
        self.days.len() > 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarMonth {
    pub(crate) year: i32,
    pub(crate) month: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthResult {
    pub month: CalendarMonth,
    pub segments: Vec<PhaseSegment>,
}

impl MonthResult {
    pub fn days(&self) -> impl Iterator<Item = &DayRecord> {
        self.segments.iter().flat_map(|s| s.days.iter())
    }
}
