// Core types for overflow detection

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::Rect;

/// Selector reported when the reference container cannot be resolved
pub const MISSING_REFERENCE_SELECTOR: &str = "reference-container";

/// Selector reported when the container holding the content cannot be resolved
pub const MISSING_CONTENT_SELECTOR: &str = "elements-container";

/// Default tolerance margin around the reference rect (px)
pub const DEFAULT_TOLERANCE: f64 = 2.0;

/// Default minimum width/height for a candidate to count as a rendered box (px)
pub const DEFAULT_MIN_DIMENSION: f64 = 2.0;

/// Default share of a candidate's area that must fall outside before it is reported (%).
///
/// Kept near zero so nearly any crossing beyond the tolerance is reported.
/// Raising it (e.g. to 20) trades recall for fewer reports on small spills.
pub const DEFAULT_SIGNIFICANCE_THRESHOLD: f64 = 2.0;

/// A content element discovered on the active slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Human-readable selector (`tag#id.class1.class2`)
    pub selector: String,

    /// Bounding box in viewport coordinates
    pub rect: Rect,

    /// False when computed style hides the element
    /// (`display:none`, `visibility:hidden`, `opacity:0`)
    pub visible: bool,
}

impl Candidate {
    pub fn new(selector: impl Into<String>, rect: Rect, visible: bool) -> Self {
        Self {
            selector: selector.into(),
            rect,
            visible,
        }
    }
}

/// Edge of the reference rect crossed by a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Edge::Left => "left",
            Edge::Right => "right",
            Edge::Top => "top",
            Edge::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

/// One element reported as escaping the reference container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverflowFinding {
    pub element_selector: String,

    pub issue_description: String,

    /// Share of the element's area outside the reference rect (0-100)
    pub overflow_percentage: f64,

    /// Edges crossed beyond the tolerance
    pub edges: Vec<Edge>,

    /// None for synthetic findings
    pub element_rect: Option<Rect>,

    pub reference_rect: Option<Rect>,
}

impl OverflowFinding {
    /// Synthetic finding for a container that could not be resolved
    pub fn missing(selector: &str, issue: impl Into<String>) -> Self {
        Self {
            element_selector: selector.to_string(),
            issue_description: issue.into(),
            overflow_percentage: 100.0,
            edges: Vec::new(),
            element_rect: None,
            reference_rect: None,
        }
    }

    /// Whether this finding stands in for a missing container rather than an element
    pub fn is_synthetic(&self) -> bool {
        self.element_rect.is_none()
    }
}

/// Outcome of inspecting one slide
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub has_overflow: bool,

    /// Findings in candidate discovery order
    pub findings: Vec<OverflowFinding>,
}

impl DetectionReport {
    pub fn from_findings(findings: Vec<OverflowFinding>) -> Self {
        Self {
            has_overflow: !findings.is_empty(),
            findings,
        }
    }

    /// Report for a slide whose reference container is absent
    pub fn missing_reference() -> Self {
        Self::from_findings(vec![OverflowFinding::missing(
            MISSING_REFERENCE_SELECTOR,
            "Reference container not found",
        )])
    }

    /// Report for a slide whose content container is absent
    pub fn missing_content() -> Self {
        Self::from_findings(vec![OverflowFinding::missing(
            MISSING_CONTENT_SELECTOR,
            "Elements container not found",
        )])
    }
}

/// Tunables for the overflow policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Margin added around the reference rect before comparing edges (px)
    pub tolerance: f64,

    /// Candidates narrower or shorter than this are ignored (px)
    pub min_dimension: f64,

    /// A violator is reported only when its overflow percentage exceeds this
    pub significance_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            min_dimension: DEFAULT_MIN_DIMENSION,
            significance_threshold: DEFAULT_SIGNIFICANCE_THRESHOLD,
        }
    }
}

impl DetectorConfig {
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn min_dimension(mut self, min_dimension: f64) -> Self {
        self.min_dimension = min_dimension;
        self
    }

    pub fn significance_threshold(mut self, threshold: f64) -> Self {
        self.significance_threshold = threshold;
        self
    }
}
