//! Activity QA - visual-regression checks for activity slides.
//!
//! This crate provides:
//! - A pure overflow detector over element rectangles
//! - A slide driver that walks every slide of an activity in a real browser
//! - Device emulation presets, run once per (activity, device) pair
//! - Per-activity aggregation and a timestamped plain-text report
//! - A scripted mock browser for testing without Chromium
//!
//! # Example
//!
//! ```rust,no_run
//! use activity_qa::config;
//! use activity_qa::harness::{HarnessConfig, run_harness};
//! use activity_qa::inspector::BrowserSession;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = HarnessConfig::from_config(config::get())?;
//! let browser = BrowserSession::launch(true).await?;
//! let outcome = run_harness(&browser, &config, &["ESARCEN000359".to_string()]).await?;
//! println!("report written to {}", outcome.report_path.display());
//! browser.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod activities;
pub mod config;
pub mod detector;
pub mod device;
pub mod geometry;
pub mod harness;
pub mod inspector;
pub mod report;
pub mod runner;
pub mod session;

// Re-export runner types
pub use runner::{ActivityResult, QaStatus, SlideResult};

// Re-export harness types
pub use harness::{
    DriverTimings, HarnessConfig, HarnessError, HarnessResult, RunOutcome, run_harness, select,
};

// Re-export detection types
pub use detector::{
    Candidate, DetectionReport, DetectorConfig, OverflowFinding, PageSelectors, detect_overflow,
};
pub use geometry::Rect;

// Re-export browser boundary
pub use inspector::{
    BrowserBackend, BrowserSession, CaptureResult, InspectError, InspectResult, MockBrowser,
    PageInspector,
};

pub use activities::{Selection, SelectionError};
pub use device::DeviceProfile;
pub use report::{ResultAggregator, RunSummary};
pub use session::Session;
