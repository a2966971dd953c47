//! Configuration management with environment variable support.
//!
//! Every tunable of a QA run can be set from the environment; CLI flags
//! take precedence over these values.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `ACTIVITY_QA_BASE_URL` | Activity URL prefix | `http://localhost:4200/children/study/task` |
//! | `ACTIVITY_QA_ACTIVITIES_FILE` | JSON array of activity IDs | `activities.json` |
//! | `ACTIVITY_QA_SCREENSHOTS_DIR` | Root for failure screenshots | `screenshots` |
//! | `ACTIVITY_QA_REPORTS_DIR` | Directory for text reports | `reports` |
//! | `ACTIVITY_QA_TOLERANCE` | Margin around the reference box (px) | `2` |
//! | `ACTIVITY_QA_SIGNIFICANCE` | Minimum overflow share to report (%) | `2` |
//! | `ACTIVITY_QA_MIN_DIMENSION` | Ignore elements smaller than this (px) | `2` |
//! | `ACTIVITY_QA_HEADLESS` | Run Chromium without a window | `false` |
//! | `ACTIVITY_QA_DEVICES` | Comma-separated device presets | `iphone-7-adjusted` |
//!
//! # Example
//!
//! ```bash
//! export ACTIVITY_QA_BASE_URL="https://staging.example.com/children/study/task"
//! export ACTIVITY_QA_DEVICES="iphone-7-adjusted,ipad,desktop"
//! export ACTIVITY_QA_HEADLESS=1
//! ```

use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::detector::types::{
    DEFAULT_MIN_DIMENSION, DEFAULT_SIGNIFICANCE_THRESHOLD, DEFAULT_TOLERANCE,
};

// ============================================================================
// Default Values
// ============================================================================

/// Default activity URL prefix
pub const DEFAULT_BASE_URL: &str = "http://localhost:4200/children/study/task";

/// Default activity list
pub const DEFAULT_ACTIVITIES_FILE: &str = "activities.json";

/// Default screenshot root
pub const DEFAULT_SCREENSHOTS_DIR: &str = "screenshots";

/// Default report directory
pub const DEFAULT_REPORTS_DIR: &str = "reports";

/// Default device preset
pub const DEFAULT_DEVICE: &str = "iphone-7-adjusted";

// ============================================================================
// Environment Variable Names
// ============================================================================

pub const ENV_BASE_URL: &str = "ACTIVITY_QA_BASE_URL";
pub const ENV_ACTIVITIES_FILE: &str = "ACTIVITY_QA_ACTIVITIES_FILE";
pub const ENV_SCREENSHOTS_DIR: &str = "ACTIVITY_QA_SCREENSHOTS_DIR";
pub const ENV_REPORTS_DIR: &str = "ACTIVITY_QA_REPORTS_DIR";
pub const ENV_TOLERANCE: &str = "ACTIVITY_QA_TOLERANCE";
pub const ENV_SIGNIFICANCE: &str = "ACTIVITY_QA_SIGNIFICANCE";
pub const ENV_MIN_DIMENSION: &str = "ACTIVITY_QA_MIN_DIMENSION";
pub const ENV_HEADLESS: &str = "ACTIVITY_QA_HEADLESS";
pub const ENV_DEVICES: &str = "ACTIVITY_QA_DEVICES";

// ============================================================================
// Configuration Getters (with caching)
// ============================================================================

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized configuration for a QA run
#[derive(Debug, Clone)]
pub struct Config {
    pub browser: BrowserSettings,
    pub paths: PathSettings,
    pub detector: DetectorSettings,
}

/// Where and how activities are opened
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub base_url: String,
    pub headless: bool,
    /// Device preset names, in run order
    pub devices: Vec<String>,
}

/// Input and output locations
#[derive(Debug, Clone)]
pub struct PathSettings {
    pub activities_file: String,
    pub screenshots_dir: String,
    pub reports_dir: String,
}

/// Overflow policy tunables
#[derive(Debug, Clone)]
pub struct DetectorSettings {
    pub tolerance: f64,
    pub significance_threshold: f64,
    pub min_dimension: f64,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            browser: BrowserSettings::from_env(),
            paths: PathSettings::from_env(),
            detector: DetectorSettings::from_env(),
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            browser: BrowserSettings::defaults(),
            paths: PathSettings::defaults(),
            detector: DetectorSettings::defaults(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl BrowserSettings {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            headless: env::var(ENV_HEADLESS)
                .ok()
                .and_then(|s| parse_flag(&s))
                .unwrap_or(false),
            devices: env::var(ENV_DEVICES)
                .ok()
                .map(|s| parse_list(&s))
                .filter(|list| !list.is_empty())
                .unwrap_or_else(|| vec![DEFAULT_DEVICE.to_string()]),
        }
    }

    pub fn defaults() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: false,
            devices: vec![DEFAULT_DEVICE.to_string()],
        }
    }
}

impl PathSettings {
    pub fn from_env() -> Self {
        Self {
            activities_file: env::var(ENV_ACTIVITIES_FILE)
                .unwrap_or_else(|_| DEFAULT_ACTIVITIES_FILE.to_string()),
            screenshots_dir: env::var(ENV_SCREENSHOTS_DIR)
                .unwrap_or_else(|_| DEFAULT_SCREENSHOTS_DIR.to_string()),
            reports_dir: env::var(ENV_REPORTS_DIR)
                .unwrap_or_else(|_| DEFAULT_REPORTS_DIR.to_string()),
        }
    }

    pub fn defaults() -> Self {
        Self {
            activities_file: DEFAULT_ACTIVITIES_FILE.to_string(),
            screenshots_dir: DEFAULT_SCREENSHOTS_DIR.to_string(),
            reports_dir: DEFAULT_REPORTS_DIR.to_string(),
        }
    }
}

impl DetectorSettings {
    pub fn from_env() -> Self {
        Self {
            tolerance: env_number(ENV_TOLERANCE).unwrap_or(DEFAULT_TOLERANCE),
            significance_threshold: env_number(ENV_SIGNIFICANCE)
                .unwrap_or(DEFAULT_SIGNIFICANCE_THRESHOLD),
            min_dimension: env_number(ENV_MIN_DIMENSION).unwrap_or(DEFAULT_MIN_DIMENSION),
        }
    }

    pub fn defaults() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            significance_threshold: DEFAULT_SIGNIFICANCE_THRESHOLD,
            min_dimension: DEFAULT_MIN_DIMENSION,
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn env_number<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

/// Parse a boolean flag: 1/true/yes/on and 0/false/no/off
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Split a comma-separated list, dropping blanks
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Get the activity list path (convenience function)
pub fn activities_file() -> String {
    get().paths.activities_file.clone()
}
