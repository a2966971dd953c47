//! Types for QA run results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::detector::OverflowFinding;

/// Verdict for a slide, a device pass or a whole activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QaStatus {
    Pass,
    Fail,
}

impl QaStatus {
    /// FAIL if either side failed
    pub fn worst(self, other: QaStatus) -> QaStatus {
        if self == QaStatus::Fail || other == QaStatus::Fail {
            QaStatus::Fail
        } else {
            QaStatus::Pass
        }
    }

    pub fn is_pass(self) -> bool {
        self == QaStatus::Pass
    }
}

impl fmt::Display for QaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QaStatus::Pass => f.write_str("PASS"),
            QaStatus::Fail => f.write_str("FAIL"),
        }
    }
}

/// Result of checking a single slide
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideResult {
    /// Zero-based position in the slide sequence
    pub slide_index: usize,

    pub status: QaStatus,

    /// Findings in discovery order
    pub findings: Vec<OverflowFinding>,

    /// Error text recorded for this slide, if any
    pub error: Option<String>,

    /// Screenshot taken when the slide failed detection
    pub screenshot_path: Option<PathBuf>,
}

impl SlideResult {
    pub fn passed(slide_index: usize) -> Self {
        Self {
            slide_index,
            status: QaStatus::Pass,
            findings: Vec::new(),
            error: None,
            screenshot_path: None,
        }
    }

    /// Slide aborted by an unexpected error
    pub fn errored(slide_index: usize, message: impl Into<String>) -> Self {
        Self {
            slide_index,
            status: QaStatus::Fail,
            findings: Vec::new(),
            error: Some(message.into()),
            screenshot_path: None,
        }
    }

    /// 1-based number used in file names and messages
    pub fn slide_number(&self) -> usize {
        self.slide_index + 1
    }
}

/// Outcome of one (activity, device) pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityResult {
    pub activity_id: String,

    /// None in single-device runs
    pub device_name: Option<String>,

    pub status: QaStatus,

    pub errors: Vec<String>,

    /// Slides inspected before the pass finished
    pub slides_checked: usize,
}

impl ActivityResult {
    pub fn new(activity_id: impl Into<String>, device_name: Option<String>) -> Self {
        Self {
            activity_id: activity_id.into(),
            device_name,
            status: QaStatus::Pass,
            errors: Vec::new(),
            slides_checked: 0,
        }
    }

    /// Mark the whole pass failed with a general error
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = QaStatus::Fail;
        self.errors.push(message.into());
    }

    /// Fold a slide outcome into this pass
    pub fn fold(&mut self, slide: SlideResult) {
        self.slides_checked += 1;
        self.status = self.status.worst(slide.status);
        if let Some(error) = slide.error {
            self.errors.push(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worst_status() {
        assert_eq!(QaStatus::Pass.worst(QaStatus::Pass), QaStatus::Pass);
        assert_eq!(QaStatus::Pass.worst(QaStatus::Fail), QaStatus::Fail);
        assert_eq!(QaStatus::Fail.worst(QaStatus::Pass), QaStatus::Fail);
    }

    #[test]
    fn test_fold_keeps_failure_sticky() {
        let mut result = ActivityResult::new("ESARCEN000001", None);
        result.fold(SlideResult::passed(0));
        result.fold(SlideResult::errored(1, "Error on slide 2: boom"));
        result.fold(SlideResult::passed(2));

        assert_eq!(result.status, QaStatus::Fail);
        assert_eq!(result.slides_checked, 3);
        assert_eq!(result.errors, vec!["Error on slide 2: boom".to_string()]);
    }

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&QaStatus::Fail).unwrap(), "\"FAIL\"");
    }
}
