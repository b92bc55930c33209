//! Reader configuration.
//!
//! All user-tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back
//! to sensible defaults so a reading session can always start.

use crate::pacing::PaceOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Slowest supported reading rate (words per minute).
pub const MIN_WPM: u32 = 100;
/// Fastest supported reading rate.
pub const MAX_WPM: u32 = 1500;
/// Largest number of tokens advanced together.
pub const MAX_CHUNK_SIZE: usize = 5;

/// Reader settings; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReaderConfig {
    #[serde(default = "default_wpm")]
    pub wpm: u32,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default)]
    pub context_mode: bool,
    #[serde(default = "default_context_speed_multiplier")]
    pub context_speed_multiplier: f64,
    #[serde(default = "default_preview_words")]
    pub preview_words: usize,
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            wpm: default_wpm(),
            chunk_size: default_chunk_size(),
            context_mode: false,
            context_speed_multiplier: default_context_speed_multiplier(),
            preview_words: default_preview_words(),
            log_level: default_log_level(),
        }
    }
}

impl ReaderConfig {
    /// Clamp out-of-range values instead of rejecting the file.
    fn sanitized(mut self) -> Self {
        self.wpm = self.wpm.clamp(MIN_WPM, MAX_WPM);
        self.chunk_size = self.chunk_size.clamp(1, MAX_CHUNK_SIZE);
        if !self.context_speed_multiplier.is_finite() || self.context_speed_multiplier <= 0.0 {
            warn!(
                value = self.context_speed_multiplier,
                "Ignoring non-positive context speed multiplier"
            );
            self.context_speed_multiplier = default_context_speed_multiplier();
        }
        self
    }

    /// The session-level pacing knobs this configuration implies.
    pub fn pace_options(&self) -> PaceOptions {
        PaceOptions {
            context_mode: self.context_mode,
            speed_multiplier: self.context_speed_multiplier,
            chunk_size: self.chunk_size,
        }
    }
}

/// Load configuration from the given path, falling back to defaults on
/// error.
pub fn load_config(path: &Path) -> ReaderConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded reader config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default reader config: {err}"
            );
            return ReaderConfig::default();
        }
    };

    match toml::from_str::<ReaderConfig>(&contents) {
        Ok(config) => {
            debug!("Parsed configuration from disk");
            config.sanitized()
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err}");
            ReaderConfig::default()
        }
    }
}

fn default_wpm() -> u32 {
    300
}

fn default_chunk_size() -> usize {
    1
}

fn default_context_speed_multiplier() -> f64 {
    1.0
}

fn default_preview_words() -> usize {
    12
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
