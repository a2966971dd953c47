use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::activities::{self, Selection};
use crate::device::DeviceProfile;
use crate::harness::slides::{SlidePass, run_activity};
use crate::harness::types::{HarnessConfig, HarnessResult};
use crate::inspector::BrowserBackend;
use crate::report::{ActivityVerdict, ReportWriter, ResultAggregator, RunSummary};
use crate::runner::{ActivityResult, QaStatus};
use crate::session::Session;

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub verdicts: Vec<ActivityVerdict>,
    /// One per (activity, device) pass, in run order
    pub results: Vec<ActivityResult>,
    pub report_path: PathBuf,
}

/// Resolve `selection` against `ids` into the activity IDs to run.
///
/// Called before the browser is launched and before any report file exists,
/// so an unknown activity leaves nothing behind.
pub fn select(selection: &Selection, ids: &[String]) -> HarnessResult<Vec<String>> {
    let selected = activities::resolve(selection, ids)?;
    Ok(selected.into_iter().map(|(_, id)| id).collect())
}

/// Runs every activity under every configured device, strictly one page at a time.
pub async fn run_harness<B: BrowserBackend>(
    backend: &B,
    config: &HarnessConfig,
    activity_ids: &[String],
) -> HarnessResult<RunOutcome> {
    let device_names = config
        .devices
        .iter()
        .map(|d| d.name.clone())
        .collect::<Vec<_>>();

    let session = Session::in_dir(&config.screenshots_dir);
    session.init(&device_names)?;
    let writer = ReportWriter::create(&config.reports_dir)?;

    info!(
        backend = backend.source_type(),
        activities = activity_ids.len(),
        devices = ?device_names,
        report = %writer.path().display(),
        "starting QA run"
    );

    let mut aggregator = ResultAggregator::new(config.devices.len());
    let mut verdicts = Vec::new();
    let mut results = Vec::new();

    for (position, activity_id) in activity_ids.iter().enumerate() {
        info!("Testing activity {}/{}: {}", position + 1, activity_ids.len(), activity_id);

        for device in &config.devices {
            let result = run_pair(backend, config, &session, activity_id, device).await;

            let recorded = aggregator.record(&result);
            writer.append(&recorded.entry)?;
            if let Some(verdict) = recorded.verdict {
                match verdict.status {
                    QaStatus::Pass => info!(activity = %verdict.activity_id, "QA PASS"),
                    QaStatus::Fail => warn!(activity = %verdict.activity_id, "QA FAIL"),
                }
                verdicts.push(verdict);
            }
            results.push(result);
        }
    }

    let summary = aggregator.finish();
    writer.finish(&summary)?;
    info!(
        total = summary.total_activities,
        passed = summary.passed_activities,
        failed = summary.failed_activities,
        report = %writer.path().display(),
        "QA run complete"
    );

    Ok(RunOutcome {
        summary,
        verdicts,
        results,
        report_path: writer.path().to_path_buf(),
    })
}

/// One (activity, device) pass. The page is closed on every path.
async fn run_pair<B: BrowserBackend>(
    backend: &B,
    config: &HarnessConfig,
    session: &Session,
    activity_id: &str,
    device: &DeviceProfile,
) -> ActivityResult {
    let device_label = config.is_multi_device().then_some(device.name.as_str());

    let page = match backend.open_page(device).await {
        Ok(page) => page,
        Err(err) => {
            error!(activity = activity_id, device = %device.name, error = %err, "could not open page");
            let mut result = ActivityResult::new(activity_id, device_label.map(str::to_string));
            result.fail(format!("General error in activity: {}", err));
            return result;
        }
    };

    let pass = SlidePass {
        config,
        session,
        activity_id,
        device_label,
    };
    let result = run_activity(&page, pass).await;

    if let Err(err) = backend.close_page(page).await {
        warn!(activity = activity_id, device = %device.name, error = %err, "failed to close page");
    }

    result
}
