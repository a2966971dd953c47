pub mod cli;
pub mod slides;
pub mod types;

pub use cli::{RunOutcome, run_harness, select};
pub use slides::{SlidePass, format_slide_error, run_activity};
pub use types::{DriverTimings, HarnessConfig, HarnessError, HarnessResult, parse_devices};
