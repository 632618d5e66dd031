use serde::{Deserialize, Serialize};

use crate::{Error, Result, logger::LogLevel};

/// Logger settings. Disabled by default; a disabled config yields no logger
/// at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub enabled: bool,
    pub log_file: bool,
    pub log_level: LogLevel,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            enabled: false,
            log_file: false,
            log_level: LogLevel::Warn,
        }
    }
}

/// BlueFringe search knobs. `max_steps` bounds the number of scored merge
/// rounds; once reached, the remaining fringe is promoted unmerged, which
/// keeps the result correct on the sample but possibly larger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BlueFringeConfig {
    pub max_steps: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InductionConfig {
    pub logger: LoggerConfig,
    pub blue_fringe: BlueFringeConfig,
}

impl InductionConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| Error::Parse {
            line: e.span().map_or(1, |span| {
                input[..span.start].chars().filter(|&c| c == '\n').count() + 1
            }),
            message: e.message().to_string(),
        })
    }
}
