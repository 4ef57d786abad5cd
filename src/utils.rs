use std::{env, io::Write, path::PathBuf};

use chrono::{Datelike, Local, Utc};
use env_logger::Builder;
use log::LevelFilter;

use crate::{DATA_FILE, HOME, Year};

pub fn init_logger(debug: bool) {
    let mut builder = Builder::new();

    builder.format(|formatter, record| {
        writeln!(
            formatter,
            "{} [{}] ({}): {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S %z"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Ok(var) = env::var("RUST_LOG") {
        builder.parse_filters(&var);
    } else if debug {
        builder.filter(None, LevelFilter::Debug);
    } else {
        // if no RUST_LOG provided, default to logging at the Info level
        builder.filter(None, LevelFilter::Info);
    }

    builder.init();
}

/// Where the pool data lives unless `--data-file` says otherwise.
///
/// # Errors
///
/// If the platform has no data directory.
pub fn data_file() -> anyhow::Result<PathBuf> {
    let Some(dir) = dirs::data_dir() else {
        return Err(anyhow::Error::msg("no data directory found"));
    };

    Ok(dir.join(HOME).join(DATA_FILE))
}

#[must_use]
pub fn current_year() -> Year {
    Year::try_from(Local::now().year()).unwrap_or(2000)
}

#[must_use]
pub fn today() -> chrono::NaiveDate {
    Local::now().date_naive()
}
