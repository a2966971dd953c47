use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::activities::SelectionError;
use crate::config::Config;
use crate::detector::{DetectorConfig, PageSelectors};
use crate::device::DeviceProfile;
use crate::inspector::InspectError;

/// Bounded waits used while driving a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverTimings {
    /// Page load budget
    pub navigation: Duration,

    /// Wait for the reference container after navigation
    pub ready: Duration,

    /// Wait for the slide navigation list
    pub navigation_wait: Duration,

    /// Wait for the active-slide marker after advancing
    pub slide_ready: Duration,

    /// Fixed delay after advancing, once the marker is present
    pub settle: Duration,

    /// Lifetime of the debug highlight overlay
    pub highlight: Duration,
}

impl Default for DriverTimings {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(30),
            ready: Duration::from_secs(10),
            navigation_wait: Duration::from_secs(5),
            slide_ready: Duration::from_secs(5),
            settle: Duration::from_secs(2),
            highlight: Duration::from_secs(5),
        }
    }
}

impl DriverTimings {
    /// No waiting at all; for scripted backends
    pub fn instant() -> Self {
        Self {
            navigation: Duration::ZERO,
            ready: Duration::ZERO,
            navigation_wait: Duration::ZERO,
            slide_ready: Duration::ZERO,
            settle: Duration::ZERO,
            highlight: Duration::ZERO,
        }
    }
}

/// Configuration for a QA run
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Activities are loaded from `{base_url}/{activity_id}`
    pub base_url: String,

    /// Devices each activity is checked under, in order
    pub devices: Vec<DeviceProfile>,

    /// Root for failure screenshots
    pub screenshots_dir: PathBuf,

    /// Directory for the timestamped text report
    pub reports_dir: PathBuf,

    pub selectors: PageSelectors,

    pub detector: DetectorConfig,

    pub timings: DriverTimings,

    /// Draw the reference outline on every slide
    pub highlight: bool,
}

impl HarnessConfig {
    /// Build from environment-level settings. Any unknown device name is an error.
    pub fn from_config(cfg: &Config) -> HarnessResult<Self> {
        Ok(Self {
            base_url: cfg.browser.base_url.clone(),
            devices: parse_devices(&cfg.browser.devices)?,
            screenshots_dir: PathBuf::from(&cfg.paths.screenshots_dir),
            reports_dir: PathBuf::from(&cfg.paths.reports_dir),
            selectors: PageSelectors::default(),
            detector: DetectorConfig {
                tolerance: cfg.detector.tolerance,
                min_dimension: cfg.detector.min_dimension,
                significance_threshold: cfg.detector.significance_threshold,
            },
            timings: DriverTimings::default(),
            highlight: true,
        })
    }

    /// Navigation target for an activity
    pub fn activity_url(&self, activity_id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), activity_id)
    }

    /// Whether results are labelled per device
    pub fn is_multi_device(&self) -> bool {
        self.devices.len() > 1
    }
}

/// Resolve device names in order; an empty list means the default device
pub fn parse_devices(names: &[String]) -> HarnessResult<Vec<DeviceProfile>> {
    if names.is_empty() {
        return Ok(vec![DeviceProfile::default()]);
    }
    names
        .iter()
        .map(|name| {
            DeviceProfile::from_str(name).ok_or_else(|| HarnessError::UnknownDevice(name.clone()))
        })
        .collect()
}

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Run-level failures
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Browser error: {0}")]
    Inspect(#[from] InspectError),

    #[error("Timed out after {after:?} waiting for {selector}")]
    NotReady { selector: String, after: Duration },

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Unknown device '{0}'. Use: iphone-7-adjusted, pixel-5, ipad, desktop, or WxH")]
    UnknownDevice(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_url_joins_with_single_slash() {
        let mut config = HarnessConfig::from_config(&Config::defaults()).unwrap();
        config.base_url = "http://localhost:4200/children/study/task/".to_string();
        assert_eq!(
            config.activity_url("ESARCEN000359"),
            "http://localhost:4200/children/study/task/ESARCEN000359"
        );
    }

    #[test]
    fn test_unknown_device_name_is_an_error() {
        let mut cfg = Config::defaults();
        cfg.browser.devices = vec!["ipda".to_string(), "desktop".to_string()];
        let err = HarnessConfig::from_config(&cfg).unwrap_err();
        assert!(matches!(err, HarnessError::UnknownDevice(ref name) if name == "ipda"));
    }

    #[test]
    fn test_device_list_keeps_order_and_multi_device() {
        let mut cfg = Config::defaults();
        cfg.browser.devices = vec!["ipad".to_string(), "desktop".to_string()];
        let config = HarnessConfig::from_config(&cfg).unwrap();
        assert_eq!(config.devices, vec![DeviceProfile::ipad(), DeviceProfile::desktop()]);
        assert!(config.is_multi_device());
    }

    #[test]
    fn test_empty_device_list_uses_default() {
        assert_eq!(parse_devices(&[]).unwrap(), vec![DeviceProfile::default()]);
    }
}
