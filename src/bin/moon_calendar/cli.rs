use std::path::PathBuf;

use clap::Parser;

/// Print lunar phase calendars for an observer.
#[derive(Parser)]
#[command(
    name = "moon_calendar",
    version,
    about = "Monthly lunar phase calendar"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Year of the first month. Defaults to the current year in `--tz`.
    #[arg(long)]
    pub year: Option<i32>,

    /// First month, 1-12. Defaults to the current month in `--tz`.
    #[arg(long)]
    pub month: Option<u32>,

    /// Number of consecutive months to print.
    #[arg(short = 'n', long, default_value_t = 1)]
    pub months: u32,

    /// IANA time zone the calendar is laid out in.
    #[arg(long, default_value = "UTC")]
    pub tz: String,

    /// Observer latitude, degrees north.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub lat: f64,

    /// Observer longitude, degrees east.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub lon: f64,

    /// Observer elevation, metres.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub elevation: f64,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print one line per day instead of segment summaries only.
    #[arg(long)]
    pub days: bool,
}
