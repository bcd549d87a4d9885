//! Log sink.
//!
//! Produces the single-line, three-letter-tag records the original tool's
//! `internal/log` package wrote (`ERR`/`WRN`/`INF`/`DBG`), on top of the
//! `log` facade so the rest of the crate just uses `log::{error,warn,info,debug,trace}!`.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct LineLogger;

impl Log for LineLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!("{} {}", level_tag(record.level()), record.args());
    }

    fn flush(&self) {}
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERR",
        Level::Warn => "WRN",
        Level::Info => "INF",
        Level::Debug | Level::Trace => "DBG",
    }
}

static LOGGER: LineLogger = LineLogger;

/// Install the line logger and set the minimum level to output.
///
/// Idempotent enough for tests: a second call after the logger is already
/// installed just adjusts the level.
pub fn init(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// Recognized `log.level` config values, per the external interface spec.
/// Anything else, including the key being absent, means `INFO`.
pub fn level_from_config_value(value: Option<&str>) -> LevelFilter {
    match value {
        Some("ERROR") => LevelFilter::Error,
        Some("WARN") => LevelFilter::Warn,
        Some("DEBUG") => LevelFilter::Debug,
        _ => LevelFilter::Info,
    }
}

/// One step more verbose than `level`, saturating at `Trace`. Backs the
/// CLI's repeatable `-v` override.
pub fn bump_level(level: LevelFilter) -> LevelFilter {
    match level {
        LevelFilter::Off => LevelFilter::Error,
        LevelFilter::Error => LevelFilter::Warn,
        LevelFilter::Warn => LevelFilter::Info,
        LevelFilter::Info => LevelFilter::Debug,
        LevelFilter::Debug | LevelFilter::Trace => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_levels() {
        assert_eq!(level_from_config_value(Some("ERROR")), LevelFilter::Error);
        assert_eq!(level_from_config_value(Some("WARN")), LevelFilter::Warn);
        assert_eq!(level_from_config_value(Some("DEBUG")), LevelFilter::Debug);
        assert_eq!(level_from_config_value(Some("INFO")), LevelFilter::Info);
        assert_eq!(level_from_config_value(Some("garbage")), LevelFilter::Info);
        assert_eq!(level_from_config_value(None), LevelFilter::Info);
    }

    #[test]
    fn bump_level_steps_up_one_notch() {
        assert_eq!(bump_level(LevelFilter::Info), LevelFilter::Debug);
        assert_eq!(bump_level(LevelFilter::Trace), LevelFilter::Trace);
    }

    #[test]
    fn level_tags_match_spec() {
        assert_eq!(level_tag(Level::Error), "ERR");
        assert_eq!(level_tag(Level::Warn), "WRN");
        assert_eq!(level_tag(Level::Info), "INF");
        assert_eq!(level_tag(Level::Debug), "DBG");
        assert_eq!(level_tag(Level::Trace), "DBG");
    }
}
