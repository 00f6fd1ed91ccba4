use std::env as stdenv;
use std::io::Write;
use std::path::Path;

use chrono::Local;
use colored::*;
use env_logger::{Builder, Env};
use log::info;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Installs the colored `env_logger` used by binaries built on this crate.
///
/// `RUST_LOG` picks the filter (default `info`). With `RUST_LOG=trace` the
/// program/time prefix is dropped in favour of `file:line`. Calling it more
/// than once is a no-op.
pub fn setup_logger() {
    let this_script_name = Path::new(&stdenv::args().next().unwrap_or_default())
        .file_name()
        .unwrap_or_default()
        .to_str()
        .unwrap_or_default()
        .to_owned();
    let compact = matches!(stdenv::var("RUST_LOG"), Ok(val) if val.to_lowercase() == "trace");
    let name_with_version = format!("{}_{}", this_script_name, VERSION);

    let installed = Builder::from_env(Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            let level = match record.level() {
                log::Level::Error => format!("{}", record.level()).red(),
                log::Level::Warn => format!(" {}", record.level()).yellow(),
                log::Level::Info => format!(" {}", record.level()).green(),
                log::Level::Debug => format!("{}", record.level()).blue(),
                log::Level::Trace => format!("{}", record.level()).purple(),
            };

            if compact {
                let file = record.file().unwrap_or("unknown");
                let line = record.line().unwrap_or(0);
                writeln!(buf, "{}:{} {}: {}", file, line, level, record.args())
            } else {
                writeln!(
                    buf,
                    "[{} {}]{}: {}",
                    name_with_version.as_str().dimmed(),
                    Local::now().format("%Y%m%d %H:%M:%S").to_string().dimmed(),
                    level,
                    record.args()
                )
            }
        })
        .try_init()
        .is_ok();

    if installed {
        info!("Logger initialized");
    }
}
