pub mod overflow;
pub mod selectors;
pub mod types;

pub use overflow::{crossed_edges, detect_overflow, overflow_percentage};
pub use selectors::{PageSelectors, SIGNIFICANT_CONTENT};
pub use types::{
    Candidate, DetectionReport, DetectorConfig, Edge, OverflowFinding, MISSING_CONTENT_SELECTOR,
    MISSING_REFERENCE_SELECTOR,
};
