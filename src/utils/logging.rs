//! Logger setup for the binary.
//!
//! Everything logs through the `log` facade; this installs `env_logger` as the
//! backend. `RUST_LOG` still applies on top of the defaults chosen here.

use std::{fs::OpenOptions, io::Write, path::Path};

use anyhow::{Context, Result};
use chrono::Local;
use log::LevelFilter;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Info by default, Debug for this crate when `debug` is set. With `log_file`
/// the output is appended to that file instead of stderr.
pub fn init(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(LevelFilter::Info);

    if debug {
        // Library and binary targets.
        for module in ["radio_alarm_lib", "radio_alarm"] {
            builder.filter_module(module, LevelFilter::Debug);
        }
    }

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {}:{}",
            Local::now().format(TIMESTAMP_FORMAT),
            record.level(),
            record.args()
        )
    });

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("logger already initialised")
}
