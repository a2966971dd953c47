//! Integration tests for the QA run loop, driven through the scripted browser

use std::fs;
use std::path::Path;

use activity_qa::activities::{Selection, SelectionError};
use activity_qa::config::Config;
use activity_qa::device::DeviceProfile;
use activity_qa::harness::{DriverTimings, HarnessConfig, HarnessError, run_harness, select};
use activity_qa::inspector::{MockActivity, MockBrowser, MockSlide};
use activity_qa::report::RunSummary;
use activity_qa::runner::QaStatus;
use activity_qa::session::Session;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn test_config(root: &Path, devices: Vec<DeviceProfile>) -> HarnessConfig {
    let mut config = HarnessConfig::from_config(&Config::defaults()).unwrap();
    config.devices = devices;
    config.timings = DriverTimings::instant();
    config.screenshots_dir = root.join("screenshots");
    config.reports_dir = root.join("reports");
    config
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|id| id.to_string()).collect()
}

fn report_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("report readable")
        .lines()
        .filter(|line| line.contains("--> QA"))
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_multi_device_activity_fails_if_any_device_fails() {
    let temp = TempDir::new().unwrap();
    let config = test_config(
        temp.path(),
        vec![DeviceProfile::iphone_7_adjusted(), DeviceProfile::ipad(), DeviceProfile::desktop()],
    );
    let browser = MockBrowser::new().with_activity(
        "ESARCEN000001",
        MockActivity::new(vec![MockSlide::clean()]).on_device("iPad", vec![MockSlide::overflowing()]),
    );

    let outcome = run_harness(&browser, &config, &ids(&["ESARCEN000001"]))
        .await
        .expect("run completes");

    assert_eq!(
        outcome.summary,
        RunSummary {
            total_activities: 1,
            passed_activities: 0,
            failed_activities: 1,
        }
    );
    assert_eq!(
        report_lines(&outcome.report_path),
        vec![
            "ESARCEN000001 (iPhone 7 Adjusted) --> QA PASS",
            "ESARCEN000001 (iPad) --> QA FAIL",
            "ESARCEN000001 (Desktop) --> QA PASS",
        ]
    );

    let session = Session::in_dir(&config.screenshots_dir);
    let captures = session.list_captures("ESARCEN000001", Some("iPad")).unwrap();
    assert_eq!(captures.len(), 1);
    assert!(captures[0].ends_with("slide1_fail.png"));
}

#[tokio::test]
async fn test_single_device_report_has_no_device_label() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path(), vec![DeviceProfile::default()]);
    let browser = MockBrowser::new()
        .with_activity("ESARCEN000001", MockActivity::new(vec![MockSlide::clean(), MockSlide::clean()]))
        .with_activity("ESARCEN000002", MockActivity::new(vec![MockSlide::overflowing()]));

    let outcome = run_harness(&browser, &config, &ids(&["ESARCEN000001", "ESARCEN000002"]))
        .await
        .unwrap();

    assert_eq!(
        report_lines(&outcome.report_path),
        vec!["ESARCEN000001 --> QA PASS", "ESARCEN000002 --> QA FAIL"]
    );
    let text = fs::read_to_string(&outcome.report_path).unwrap();
    assert!(text.contains("  - Slide 1: elements outside the container: p.text.long"));
    assert!(text.contains("Total activities: 2\nPassed activities: 1\nFailed activities: 1"));
    assert!(config.screenshots_dir.join("ESARCEN000002").join("slide1_fail.png").exists());
}

#[tokio::test]
async fn test_unreachable_activity_does_not_stop_the_run() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path(), vec![DeviceProfile::default()]);
    let browser = MockBrowser::new()
        .with_activity("ESARCEN000001", MockActivity::unreachable())
        .with_activity("ESARCEN000002", MockActivity::new(vec![MockSlide::clean()]));

    let outcome = run_harness(&browser, &config, &ids(&["ESARCEN000001", "ESARCEN000002"]))
        .await
        .unwrap();

    let statuses = outcome
        .verdicts
        .iter()
        .map(|v| (v.activity_id.as_str(), v.status))
        .collect::<Vec<_>>();
    assert_eq!(
        statuses,
        vec![("ESARCEN000001", QaStatus::Fail), ("ESARCEN000002", QaStatus::Pass)]
    );
    assert!(outcome.results[0].errors[0].starts_with("General error in activity:"));
}

#[tokio::test]
async fn test_every_opened_page_is_closed() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path(), vec![DeviceProfile::pixel_5(), DeviceProfile::desktop()]);
    let browser = MockBrowser::new()
        .with_activity("ESARCEN000001", MockActivity::unreachable())
        .with_activity(
            "ESARCEN000002",
            MockActivity::new(vec![MockSlide::clean(), MockSlide::failing("detached frame")]),
        );

    run_harness(&browser, &config, &ids(&["ESARCEN000001", "ESARCEN000002"]))
        .await
        .unwrap();

    let log = browser.log();
    assert_eq!(log.opened, 4);
    assert_eq!(log.closed, 4);
    assert_eq!(log.devices, vec!["Pixel 5", "Desktop", "Pixel 5", "Desktop"]);
}

#[tokio::test]
async fn test_index_selection_runs_only_that_activity() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path(), vec![DeviceProfile::default()]);
    let browser = MockBrowser::new()
        .with_activity("ESARCEN000001", MockActivity::new(vec![MockSlide::clean()]))
        .with_activity("ESARCEN000002", MockActivity::new(vec![MockSlide::clean()]));

    let selected = select(
        &"1".parse::<Selection>().unwrap(),
        &ids(&["ESARCEN000001", "ESARCEN000002"]),
    )
    .unwrap();
    assert_eq!(selected, ids(&["ESARCEN000002"]));

    let outcome = run_harness(&browser, &config, &selected).await.unwrap();

    assert_eq!(outcome.summary.total_activities, 1);
    assert_eq!(
        browser.log().navigations,
        vec![config.activity_url("ESARCEN000002")]
    );
}

#[tokio::test]
async fn test_unknown_id_fails_without_writing_a_report() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path(), vec![DeviceProfile::default()]);

    let err = select(
        &Selection::Id("ESARCEN000099".to_string()),
        &ids(&["ESARCEN000001", "ESARCEN000002"]),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        HarnessError::Selection(SelectionError::NotFound(ref id)) if id == "ESARCEN000099"
    ));
    assert!(!config.reports_dir.exists());
    assert!(!config.screenshots_dir.exists());
}

#[tokio::test]
async fn test_missing_reference_on_later_slide_is_reported() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path(), vec![DeviceProfile::default()]);
    let browser = MockBrowser::new().with_activity(
        "ESARCEN000001",
        MockActivity::new(vec![MockSlide::clean(), MockSlide::without_reference()]),
    );

    let outcome = run_harness(&browser, &config, &ids(&["ESARCEN000001"]))
        .await
        .unwrap();

    let result = &outcome.results[0];
    assert_eq!(result.status, QaStatus::Fail);
    assert_eq!(result.slides_checked, 2);
    assert!(result.errors[0].starts_with("Slide 2:"));
    assert!(result.errors[0].contains("reference-container"));
}
