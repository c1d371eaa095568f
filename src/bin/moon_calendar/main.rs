mod cli;
mod logging;
mod render;

use std::process;

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Utc};
use chrono_tz::Tz;
use clap::Parser;
use tracing::info;

use lunar_calendar::{
    compile_months, local_noon, AnalyticEphemeris, CalendarConfig, CalendarMonth,
    ObserverPosition,
};

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => CalendarConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CalendarConfig::default(),
    };

    let tz: Tz = cli
        .tz
        .parse()
        .map_err(|e| anyhow!("unknown time zone {:?}: {e}", cli.tz))?;

    let today = Utc::now().with_timezone(&tz).date_naive();
    let month = CalendarMonth::new(
        cli.year.unwrap_or(today.year()),
        cli.month.unwrap_or(today.month()),
    )?;
    let observer = ObserverPosition::new(cli.lat, cli.lon, cli.elevation);
    let start = local_noon(&tz, month.first_day()?)?.with_timezone(&tz);

    info!(
        year = month.year(),
        month = month.month(),
        count = cli.months,
        tz = %tz,
        "compiling calendar"
    );

    let ephemeris = AnalyticEphemeris::new(config.ephemeris);
    let results = compile_months(&start, cli.months, &observer, &ephemeris, &config.search)?;

    let mut out = String::new();
    for result in &results {
        render::month(&mut out, result, &tz, cli.days)?;
    }
    print!("{out}");
    Ok(())
}
