pub mod angles;
pub mod assembler;
pub mod compiler;
pub mod config;
pub mod dates;
pub mod ephemeris;
pub mod error;
pub mod frames;
pub mod julian;
pub mod tilt;
pub mod types;
pub mod walker;

pub use angles::{
    angle_difference, cos_deg, deg_to_rad, normalize_angle, normalize_pm180, rad_to_deg, sin_deg,
};

pub use assembler::days_in_month;

pub use compiler::{compile, compile_month, compile_months};

pub use config::{CalendarConfig, EphemerisConfig, SearchConfig};

pub use dates::{days_in_months, leap_year, local_date, local_noon, noon_days_between, start_of_day};

pub use ephemeris::{AnalyticEphemeris, Ephemeris, UniformMoon};

pub use error::{CalendarError, ConfigError};

pub use frames::{Axis, RotationMatrix, Vector3};

pub use tilt::tilt;

pub use types::{
    Body, CalendarMonth, DayRecord, DiskRotation, EquatorialCoordinates, HorizontalCoordinates,
    MonthResult, ObserverPosition, Phase, PhaseSegment, Quarter, QuarterEvent,
};

pub use walker::{
    new_moon_at_or_before, next_quarter, previous_quarter, quarters_for_month, MonthQuarters,
};
