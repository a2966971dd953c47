//! Folds per-device results into one verdict per activity.
//!
//! Devices of an activity are recorded back to back. The activity is counted
//! once, at its first device; its verdict is final after the last device and
//! is FAIL if any device failed.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::runner::{ActivityResult, QaStatus};

/// Run-wide counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_activities: usize,
    pub passed_activities: usize,
    pub failed_activities: usize,
}

/// One line group in the report, per (activity, device) pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub activity_id: String,
    pub device_name: Option<String>,
    pub status: QaStatus,
    pub errors: Vec<String>,
}

impl From<&ActivityResult> for ReportEntry {
    fn from(result: &ActivityResult) -> Self {
        Self {
            activity_id: result.activity_id.clone(),
            device_name: result.device_name.clone(),
            status: result.status,
            errors: result.errors.clone(),
        }
    }
}

/// Final verdict once every device of an activity has reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityVerdict {
    pub activity_id: String,
    pub status: QaStatus,
}

/// What recording one pass produced
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub entry: ReportEntry,
    /// Set when this pass completed its activity
    pub verdict: Option<ActivityVerdict>,
}

#[derive(Debug, Clone)]
struct Pending {
    activity_id: String,
    reported: usize,
    status: QaStatus,
}

/// Accumulates results across a run
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    devices_per_activity: usize,
    summary: RunSummary,
    pending: Option<Pending>,
}

impl ResultAggregator {
    pub fn new(devices_per_activity: usize) -> Self {
        Self {
            devices_per_activity: devices_per_activity.max(1),
            summary: RunSummary::default(),
            pending: None,
        }
    }

    /// Record one (activity, device) pass
    pub fn record(&mut self, result: &ActivityResult) -> Recorded {
        let entry = ReportEntry::from(result);

        let switched = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.activity_id != result.activity_id);
        if switched {
            if let Some(stale) = self.pending.take() {
                warn!(
                    activity = %stale.activity_id,
                    reported = stale.reported,
                    expected = self.devices_per_activity,
                    "activity finished with devices missing"
                );
                self.finalize(stale);
            }
        }

        let pending = self.pending.get_or_insert_with(|| {
            self.summary.total_activities += 1;
            Pending {
                activity_id: result.activity_id.clone(),
                reported: 0,
                status: QaStatus::Pass,
            }
        });
        pending.reported += 1;
        pending.status = pending.status.worst(result.status);

        let complete = pending.reported >= self.devices_per_activity;
        let verdict = if complete {
            self.pending.take().map(|done| self.finalize(done))
        } else {
            None
        };

        Recorded { entry, verdict }
    }

    fn finalize(&mut self, done: Pending) -> ActivityVerdict {
        match done.status {
            QaStatus::Pass => self.summary.passed_activities += 1,
            QaStatus::Fail => self.summary.failed_activities += 1,
        }
        ActivityVerdict {
            activity_id: done.activity_id,
            status: done.status,
        }
    }

    /// Counters so far; activities still waiting on devices count in the total only
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Close out any partially reported activity and return the final counters
    pub fn finish(mut self) -> RunSummary {
        if let Some(stale) = self.pending.take() {
            self.finalize(stale);
        }
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pass(id: &str, device: &str, status: QaStatus) -> ActivityResult {
        let mut result = ActivityResult::new(id, Some(device.to_string()));
        if status == QaStatus::Fail {
            result.fail("Slide 1: elements outside the container: p.text [right, 50.0% outside]");
        }
        result
    }

    #[test]
    fn test_single_device_counts_each_activity() {
        let mut aggregator = ResultAggregator::new(1);
        let first = aggregator.record(&ActivityResult::new("ESARCEN000001", None));
        assert_eq!(
            first.verdict,
            Some(ActivityVerdict {
                activity_id: "ESARCEN000001".to_string(),
                status: QaStatus::Pass,
            })
        );

        let mut failed = ActivityResult::new("ESARCEN000002", None);
        failed.fail("General error in activity: timeout");
        aggregator.record(&failed);

        assert_eq!(
            aggregator.finish(),
            RunSummary {
                total_activities: 2,
                passed_activities: 1,
                failed_activities: 1,
            }
        );
    }

    #[test]
    fn test_any_failing_device_fails_activity() {
        let mut aggregator = ResultAggregator::new(3);
        let a = aggregator.record(&pass("ESARCEN000001", "iPhone 7 Adjusted", QaStatus::Pass));
        let b = aggregator.record(&pass("ESARCEN000001", "iPad", QaStatus::Fail));
        let c = aggregator.record(&pass("ESARCEN000001", "Desktop", QaStatus::Pass));

        assert_eq!(a.verdict, None);
        assert_eq!(b.verdict, None);
        assert_eq!(c.verdict.map(|v| v.status), Some(QaStatus::Fail));
        assert_eq!(b.entry.device_name.as_deref(), Some("iPad"));
        assert_eq!(
            aggregator.summary(),
            RunSummary {
                total_activities: 1,
                passed_activities: 0,
                failed_activities: 1,
            }
        );
    }

    #[test]
    fn test_total_counted_at_first_device() {
        let mut aggregator = ResultAggregator::new(2);
        aggregator.record(&pass("ESARCEN000001", "iPad", QaStatus::Fail));
        let partial = aggregator.summary();
        assert_eq!(partial.total_activities, 1);
        assert_eq!(partial.failed_activities, 0);
    }

    #[test]
    fn test_switching_activity_finalizes_partial_one() {
        let mut aggregator = ResultAggregator::new(2);
        aggregator.record(&pass("ESARCEN000001", "iPad", QaStatus::Pass));
        aggregator.record(&pass("ESARCEN000002", "iPad", QaStatus::Pass));
        aggregator.record(&pass("ESARCEN000002", "Desktop", QaStatus::Pass));

        assert_eq!(
            aggregator.finish(),
            RunSummary {
                total_activities: 2,
                passed_activities: 2,
                failed_activities: 0,
            }
        );
    }
}
