//! External configuration loader.
//!
//! Reads `snekgrid.toml` from the executable's directory, then the working
//! directory. Missing files and missing keys fall back to defaults; values
//! that parse but make no sense are rejected.

use log::{info, warn};
use serde::Deserialize;
use simplelog::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::board::Size;
use crate::engine::{Boundary, Rules};
use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "snekgrid.toml";
pub const MAX_SIDE: u16 = 255;
/// One food may grow the snake by at most a full board.
pub const MAX_GROWTH: u32 = MAX_SIDE as u32 * MAX_SIDE as u32;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub board: Size,
    pub start_length: u32,
    pub rules: Rules,
    pub tick_interval: Duration,
    pub frame_interval: Duration,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            board: Size {
                width: default_width(),
                height: default_height(),
            },
            start_length: default_start_length(),
            rules: Rules::default(),
            tick_interval: Duration::from_millis(default_tick_ms()),
            frame_interval: Duration::from_millis(default_frame_ms()),
            log_level: LevelFilter::Info,
        }
    }
}

// ── TOML schema ──

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default = "default_width")]
    width: u16,
    #[serde(default = "default_height")]
    height: u16,
    #[serde(default = "default_start_length")]
    start_length: u32,
    #[serde(default = "default_growth")]
    growth: u32,
    #[serde(default = "default_tick_ms")]
    tick_ms: u64,
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default)]
    boundary: Boundary,
    #[serde(default = "default_log_level")]
    log_level: String,
}

fn default_width() -> u16 { 20 }
fn default_height() -> u16 { 15 }
fn default_start_length() -> u32 { 2 }
fn default_growth() -> u32 { 1 }
fn default_tick_ms() -> u64 { 150 }
fn default_frame_ms() -> u64 { 16 } // ~60 frames a second
fn default_log_level() -> String { "info".into() }

impl Default for TomlConfig {
    fn default() -> Self {
        TomlConfig {
            width: default_width(),
            height: default_height(),
            start_length: default_start_length(),
            growth: default_growth(),
            tick_ms: default_tick_ms(),
            frame_ms: default_frame_ms(),
            boundary: Boundary::default(),
            log_level: default_log_level(),
        }
    }
}

impl TryFrom<TomlConfig> for Config {
    type Error = ConfigError;

    fn try_from(raw: TomlConfig) -> Result<Self, Self::Error> {
        if raw.width == 0 || raw.height == 0 || raw.width > MAX_SIDE || raw.height > MAX_SIDE {
            return Err(ConfigError::BoardSize {
                width: raw.width,
                height: raw.height,
                max: MAX_SIDE,
            });
        }
        // The body is laid out westward from the centre column.
        if raw.start_length == 0 || raw.start_length > raw.width as u32 / 2 + 1 {
            return Err(ConfigError::StartLength {
                length: raw.start_length,
                width: raw.width,
            });
        }
        if raw.growth == 0 || raw.growth > MAX_GROWTH {
            return Err(ConfigError::Growth {
                growth: raw.growth,
                max: MAX_GROWTH,
            });
        }
        if raw.tick_ms == 0 {
            return Err(ConfigError::ZeroInterval { name: "tick_ms" });
        }
        if raw.frame_ms == 0 {
            return Err(ConfigError::ZeroInterval { name: "frame_ms" });
        }
        let log_level = LevelFilter::from_str(&raw.log_level)
            .map_err(|_| ConfigError::LogLevel(raw.log_level.clone()))?;

        Ok(Config {
            board: Size {
                width: raw.width,
                height: raw.height,
            },
            start_length: raw.start_length,
            rules: Rules {
                boundary: raw.boundary,
                growth: raw.growth,
            },
            tick_interval: Duration::from_millis(raw.tick_ms),
            frame_interval: Duration::from_millis(raw.frame_ms),
            log_level,
        })
    }
}

// ── Loading ──

impl Config {
    /// Load the first config file found; defaults when there is none or it
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        for path in candidate_paths() {
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    info!("Loading configuration from {}", path.display());
                    return Config::from_toml(&text);
                }
                Err(e) => warn!("Could not read {}: {}", path.display(), e),
            }
        }
        Ok(Config::default())
    }

    /// Parse and validate `text`.
    ///
    /// A file that is not valid TOML for the schema (wrong types, integers
    /// out of range for their key, unknown keys) is discarded as a whole
    /// with a warning and the defaults are used, including for keys that
    /// were fine. Values that deserialize but fail validation are an error.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let raw = match toml::from_str::<TomlConfig>(text) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("{} parse error, using default settings: {}", CONFIG_FILE, e);
                TomlConfig::default()
            }
        };
        Config::try_from(raw)
    }
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = vec![];

    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            dirs.push(parent.to_path_buf());
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.contains(&cwd) {
            dirs.push(cwd);
        }
    }

    dirs.into_iter().map(|d| d.join(CONFIG_FILE)).collect()
}
