//! Configuration file loading.
//!
//! Per the external interface spec, the file carries exactly one recognized
//! key, `log.level`. A missing file is not fatal (the caller gets defaults);
//! a present-but-malformed file is.

use std::path::Path;

use log::LevelFilter;
use serde::Deserialize;

use crate::error::{FatalError, FatalResult};
use crate::logging;

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    log: Option<RawLog>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLog {
    level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    /// Load config from `path`. A missing file yields the default config;
    /// any other I/O error, or a file that fails to parse as JSON, is fatal.
    pub fn load(path: &Path) -> FatalResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(FatalError::ReadConfig {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        let raw: RawConfig = serde_json::from_str(&text).map_err(|source| FatalError::ParseConfig {
            path: path.display().to_string(),
            source,
        })?;
        let level_str = raw.log.as_ref().and_then(|l| l.level.as_deref());
        Ok(Self {
            log_level: logging::level_from_config_value(level_str),
        })
    }
}
