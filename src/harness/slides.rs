//! Slide driver: walks one activity on one device, slide by slide.
//!
//! ```text
//! Init -> Navigating -> Ready -> SlideLoop(i) -> Done
//!              |          |
//!              +----------+--> Failed (general error, no slides checked)
//! ```
//!
//! A slide that errors is recorded as FAIL and the loop moves on. Advance
//! failures are only logged: the next slide is still inspected even if the
//! page did not move.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::detector::{DetectionReport, OverflowFinding, detect_overflow};
use crate::harness::types::{HarnessConfig, HarnessError, HarnessResult};
use crate::inspector::PageInspector;
use crate::runner::{ActivityResult, QaStatus, SlideResult};
use crate::session::Session;

/// What the driver needs to know about the pass it is running
#[derive(Debug, Clone, Copy)]
pub struct SlidePass<'a> {
    pub config: &'a HarnessConfig,
    pub session: &'a Session,
    pub activity_id: &'a str,
    /// Device label used in results and paths; None in single-device runs
    pub device_label: Option<&'a str>,
}

/// Drive every slide of an activity. Never fails: problems end up in the result.
pub async fn run_activity<P>(page: &P, pass: SlidePass<'_>) -> ActivityResult
where
    P: PageInspector + ?Sized,
{
    let mut result = ActivityResult::new(pass.activity_id, pass.device_label.map(str::to_string));

    let slide_count = match prepare(page, &pass).await {
        Ok(count) => count,
        Err(err) => {
            warn!(activity = pass.activity_id, error = %err, "activity could not be prepared");
            result.fail(format!("General error in activity: {}", err));
            return result;
        }
    };
    info!(activity = pass.activity_id, device = ?pass.device_label, slides = slide_count, "activity ready");

    for index in 0..slide_count {
        info!(activity = pass.activity_id, slide = index + 1, total = slide_count, "testing slide");
        let slide = match run_slide(page, &pass, index).await {
            Ok(slide) => slide,
            Err(err) => {
                warn!(activity = pass.activity_id, slide = index + 1, error = %err, "slide errored");
                SlideResult::errored(index, format!("Error on slide {}: {}", index + 1, err))
            }
        };
        result.fold(slide);
    }

    result
}

/// Navigate, wait for the reference container and count the slides
async fn prepare<P>(page: &P, pass: &SlidePass<'_>) -> HarnessResult<usize>
where
    P: PageInspector + ?Sized,
{
    let config = pass.config;
    let timings = &config.timings;
    let selectors = &config.selectors;

    page.navigate(&config.activity_url(pass.activity_id), timings.navigation)
        .await?;

    if !page
        .wait_for_selector(&selectors.reference_container, timings.ready)
        .await?
    {
        return Err(HarnessError::NotReady {
            selector: selectors.reference_container.clone(),
            after: timings.ready,
        });
    }

    let has_navigation = page
        .wait_for_selector(&selectors.navigation_items, timings.navigation_wait)
        .await?;
    if !has_navigation {
        debug!(activity = pass.activity_id, "no slide navigation, treating as single slide");
        return Ok(1);
    }

    let count = page.count_elements(&selectors.navigation_items).await?;
    Ok(count.max(1))
}

/// Advance (for every slide but the first), inspect and record one slide
async fn run_slide<P>(page: &P, pass: &SlidePass<'_>, index: usize) -> HarnessResult<SlideResult>
where
    P: PageInspector + ?Sized,
{
    let config = pass.config;
    let selectors = &config.selectors;
    let slide_number = index + 1;

    if index > 0 {
        match page.advance_slide(&selectors.advance_component).await {
            Ok(true) => {}
            Ok(false) => warn!(slide = slide_number, "could not advance, inspecting current slide"),
            Err(err) => warn!(slide = slide_number, error = %err, "advance failed, inspecting current slide"),
        }

        if !page
            .wait_for_selector(&selectors.active_slide, config.timings.slide_ready)
            .await?
        {
            return Err(HarnessError::NotReady {
                selector: selectors.active_slide.clone(),
                after: config.timings.slide_ready,
            });
        }
        settle(config.timings.settle).await;
    }

    if config.highlight {
        if let Err(err) = page
            .highlight(&selectors.reference_container, config.timings.highlight)
            .await
        {
            debug!(slide = slide_number, error = %err, "highlight failed");
        }
    }

    let report = inspect(page, pass).await?;
    if !report.has_overflow {
        info!(activity = pass.activity_id, slide = slide_number, "slide PASS");
        return Ok(SlideResult::passed(index));
    }

    for finding in &report.findings {
        warn!(
            activity = pass.activity_id,
            slide = slide_number,
            element = %finding.element_selector,
            "{}",
            finding.issue_description
        );
    }

    warn!(
        activity = pass.activity_id,
        slide = slide_number,
        findings = report.findings.len(),
        "slide FAIL"
    );

    let path = pass
        .session
        .slide_failure_path(pass.activity_id, pass.device_label, slide_number);
    let capture = page.capture().await?;
    pass.session.save_capture(&path, &capture.image_data)?;
    info!(path = %path.display(), "saved failure screenshot");

    Ok(SlideResult {
        slide_index: index,
        status: QaStatus::Fail,
        error: Some(format_slide_error(slide_number, &report.findings)),
        findings: report.findings,
        screenshot_path: Some(path),
    })
}

/// Resolve both containers and run the overflow policy
async fn inspect<P>(page: &P, pass: &SlidePass<'_>) -> HarnessResult<DetectionReport>
where
    P: PageInspector + ?Sized,
{
    let selectors = &pass.config.selectors;

    let Some(reference) = page.resolve_rect(&selectors.reference_container).await? else {
        return Ok(DetectionReport::missing_reference());
    };

    let candidates = page
        .query_content_elements(&selectors.elements_container, &selectors.significant_content)
        .await?;
    let Some(candidates) = candidates else {
        return Ok(DetectionReport::missing_content());
    };

    Ok(detect_overflow(Some(&reference), &candidates, &pass.config.detector))
}

async fn settle(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// "Slide N: elements outside the container: ..." with one entry per finding
pub fn format_slide_error(slide_number: usize, findings: &[OverflowFinding]) -> String {
    let details = findings
        .iter()
        .map(|finding| {
            if finding.is_synthetic() {
                format!("{} ({})", finding.element_selector, finding.issue_description)
            } else {
                let edges = finding
                    .edges
                    .iter()
                    .map(|edge| edge.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "{} [{}, {:.1}% outside]",
                    finding.element_selector, edges, finding.overflow_percentage
                )
            }
        })
        .collect::<Vec<_>>()
        .join("; ");
    format!("Slide {}: elements outside the container: {}", slide_number, details)
}
