//! Logging setup for msxpack binaries
//!
//! Thin wrapper over `env_logger` with a timestamped single-line format.
//! Level selection order: explicit CLI level, then the `MSXPACK_LOG`
//! environment variable, then `info`.

use chrono::Local;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize logging at the default level (or `MSXPACK_LOG`)
pub fn init() {
    let level = env::var("MSXPACK_LOG").unwrap_or_else(|_| "info".to_string());
    init_with_level(&level);
}

/// Initialize logging with an explicit level string
pub fn init_with_level(level_str: &str) {
    let level_filter = parse_level(level_str);

    env_logger::Builder::new()
        .filter_level(level_filter)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

fn parse_level(level_str: &str) -> LevelFilter {
    match level_str {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_known_names() {
        assert_eq!(parse_level("trace"), LevelFilter::Trace);
        assert_eq!(parse_level("off"), LevelFilter::Off);
    }

    #[test]
    fn test_parse_level_falls_back_to_info() {
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }
}
