use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum CalendarError {
    #[error("ephemeris could not resolve {query} near {near}")]
    EphemerisUnresolved {
        query: &'static str,
        near: DateTime<Utc>,
    },

    #[error("quarter search inconsistency: event at {found} is out of order relative to {reference}")]
    QuarterSearchInconsistency {
        found: DateTime<Utc>,
        reference: DateTime<Utc>,
    },

    #[error("no valid local time could be resolved on {date}")]
    NonexistentLocalTime { date: NaiveDate },

    #[error("invalid calendar month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn error_ephemeris_unresolved() {
        let near = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let e = CalendarError::EphemerisUnresolved {
            query: "moon culmination",
            near,
        };
        assert_eq!(
            e.to_string(),
            "ephemeris could not resolve moon culmination near 2026-02-01 00:00:00 UTC"
        );
    }

    #[test]
    fn error_invalid_month() {
        let e = CalendarError::InvalidMonth {
            year: 2026,
            month: 13,
        };
        assert_eq!(e.to_string(), "invalid calendar month 2026-13");
    }

    #[test]
    fn error_config_invalid() {
        let e = ConfigError::Invalid("scan_step_days must be positive");
        assert_eq!(e.to_string(), "invalid config: scan_step_days must be positive");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<CalendarError>();
        assert_impl::<ConfigError>();
    }
}
