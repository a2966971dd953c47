//! Overflow policy: which candidates escape the reference container, and by how much.
//!
//! The detector is a pure function of the rectangles and visibility flags it is
//! handed. Page access lives behind [`crate::inspector::PageInspector`].

use crate::geometry::{Rect, area, intersection_area};

use super::types::{Candidate, DetectionReport, DetectorConfig, Edge, OverflowFinding};

/// Inspect the candidates of one slide against its reference rect.
///
/// Candidates are evaluated in discovery order and are not de-duplicated: an
/// element matched by two selector patterns shows up twice in the findings.
pub fn detect_overflow(
    reference: Option<&Rect>,
    candidates: &[Candidate],
    config: &DetectorConfig,
) -> DetectionReport {
    let Some(reference) = reference else {
        return DetectionReport::missing_reference();
    };

    let findings = candidates
        .iter()
        .filter(|candidate| is_rendered_box(candidate, config))
        .filter_map(|candidate| evaluate_candidate(reference, candidate, config))
        .collect();

    DetectionReport::from_findings(findings)
}

/// Share of `candidate` lying outside `reference`, in percent.
///
/// Returns None for degenerate candidates.
pub fn overflow_percentage(candidate: &Rect, reference: &Rect) -> Option<f64> {
    let candidate_area = area(candidate);
    if candidate_area <= 0.0 {
        return None;
    }
    let inside = intersection_area(candidate, reference) / candidate_area;
    Some(100.0 * (1.0 - inside))
}

/// Edges of `reference` (grown by `tolerance`) that `rect` crosses
pub fn crossed_edges(rect: &Rect, reference: &Rect, tolerance: f64) -> Vec<Edge> {
    let mut edges = Vec::new();
    if rect.left < reference.left - tolerance {
        edges.push(Edge::Left);
    }
    if rect.right > reference.right + tolerance {
        edges.push(Edge::Right);
    }
    if rect.top < reference.top - tolerance {
        edges.push(Edge::Top);
    }
    if rect.bottom > reference.bottom + tolerance {
        edges.push(Edge::Bottom);
    }
    edges
}

fn is_rendered_box(candidate: &Candidate, config: &DetectorConfig) -> bool {
    candidate.visible
        && candidate.rect.width >= config.min_dimension
        && candidate.rect.height >= config.min_dimension
        && candidate.rect.width > 0.0
        && candidate.rect.height > 0.0
}

fn evaluate_candidate(
    reference: &Rect,
    candidate: &Candidate,
    config: &DetectorConfig,
) -> Option<OverflowFinding> {
    let edges = crossed_edges(&candidate.rect, reference, config.tolerance);
    if edges.is_empty() {
        return None;
    }

    let percentage = overflow_percentage(&candidate.rect, reference)?;
    if percentage <= config.significance_threshold {
        return None;
    }

    Some(OverflowFinding {
        element_selector: candidate.selector.clone(),
        issue_description: describe_issue(&edges, percentage),
        overflow_percentage: percentage,
        edges,
        element_rect: Some(candidate.rect),
        reference_rect: Some(*reference),
    })
}

fn describe_issue(edges: &[Edge], percentage: f64) -> String {
    let sides: Vec<String> = edges.iter().map(|e| e.to_string()).collect();
    format!(
        "Element outside the container: {} ({:.1}% outside)",
        sides.join(", "),
        percentage
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::types::MISSING_REFERENCE_SELECTOR;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn reference() -> Rect {
        Rect::new(0.0, 0.0, 300.0, 500.0)
    }

    fn visible(selector: &str, rect: Rect) -> Candidate {
        Candidate::new(selector, rect, true)
    }

    #[test]
    fn test_contained_candidates_pass() {
        let candidates = vec![
            visible("h1.title", Rect::new(10.0, 10.0, 200.0, 40.0)),
            visible("p.text", Rect::new(0.0, 60.0, 300.0, 100.0)),
        ];
        let report = detect_overflow(Some(&reference()), &candidates, &DetectorConfig::default());
        assert!(!report.has_overflow);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_crossing_within_tolerance_is_ignored() {
        // 1.5px past the right edge, under the 2px tolerance
        let candidates = vec![visible("img", Rect::new(100.0, 10.0, 201.5, 50.0))];
        let report = detect_overflow(Some(&reference()), &candidates, &DetectorConfig::default());
        assert!(!report.has_overflow);
    }

    #[test]
    fn test_right_and_bottom_overflow_reported() {
        let candidates = vec![visible("p.text", Rect::new(200.0, 450.0, 200.0, 100.0))];
        let report = detect_overflow(Some(&reference()), &candidates, &DetectorConfig::default());

        assert!(report.has_overflow);
        assert_eq!(report.findings.len(), 1);
        let finding = &report.findings[0];
        assert_eq!(finding.element_selector, "p.text");
        assert_eq!(finding.edges, vec![Edge::Right, Edge::Bottom]);
        // 100x50 of 200x100 is inside
        assert_eq!(finding.overflow_percentage, 75.0);
        assert!(finding.issue_description.contains("right, bottom"));
        assert_eq!(finding.reference_rect, Some(reference()));
    }

    #[test]
    fn test_significance_threshold_filters_small_spills() {
        // 10px of a 300px wide element past the left edge, about 3.3% outside
        let candidates = vec![visible("div.content", Rect::new(-10.0, 10.0, 300.0, 20.0))];

        let lenient = DetectorConfig::default();
        let report = detect_overflow(Some(&reference()), &candidates, &lenient);
        assert_eq!(report.findings.len(), 1);

        let strict = DetectorConfig::default().significance_threshold(20.0);
        let report = detect_overflow(Some(&reference()), &candidates, &strict);
        assert!(!report.has_overflow);
    }

    #[test]
    fn test_hidden_candidates_skipped() {
        let candidates = vec![Candidate::new("span.tooltip", Rect::new(400.0, 0.0, 50.0, 50.0), false)];
        let report = detect_overflow(Some(&reference()), &candidates, &DetectorConfig::default());
        assert!(!report.has_overflow);
    }

    #[test]
    fn test_missing_reference_is_a_finding() {
        let candidates = vec![visible("p", Rect::new(0.0, 0.0, 10.0, 10.0))];
        let report = detect_overflow(None, &candidates, &DetectorConfig::default());
        assert!(report.has_overflow);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].element_selector, MISSING_REFERENCE_SELECTOR);
        assert!(report.findings[0].is_synthetic());
    }

    #[test]
    fn test_duplicate_matches_reported_twice() {
        // Same element matched by `p` and `.text`
        let rect = Rect::new(250.0, 10.0, 100.0, 20.0);
        let candidates = vec![visible("p.text", rect), visible("p.text", rect)];
        let report = detect_overflow(Some(&reference()), &candidates, &DetectorConfig::default());
        assert_eq!(report.findings.len(), 2);
        assert_eq!(report.findings[0], report.findings[1]);
    }

    #[test]
    fn test_findings_keep_discovery_order() {
        let candidates = vec![
            visible("h2", Rect::new(-50.0, 0.0, 100.0, 20.0)),
            visible("p", Rect::new(10.0, 10.0, 20.0, 20.0)),
            visible("button", Rect::new(280.0, 480.0, 60.0, 60.0)),
        ];
        let report = detect_overflow(Some(&reference()), &candidates, &DetectorConfig::default());
        let selectors: Vec<&str> = report.findings.iter().map(|f| f.element_selector.as_str()).collect();
        assert_eq!(selectors, vec!["h2", "button"]);
    }

    #[test]
    fn test_overflow_percentage_degenerate_is_none() {
        assert_eq!(overflow_percentage(&Rect::new(5.0, 5.0, 0.0, 0.0), &reference()), None);
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-500.0..500.0f64, -500.0..500.0f64, 0.0..400.0f64, 0.0..400.0f64)
            .prop_map(|(l, t, w, h)| Rect::new(l, t, w, h))
    }

    proptest! {
        #[test]
        fn prop_contained_in_tolerance_bounds_never_reported(
            fx in 0.0..0.99f64, fy in 0.0..0.99f64, fw in 0.0..0.99f64, fh in 0.0..0.99f64,
        ) {
            let config = DetectorConfig::default();
            let bounds = reference().expand(config.tolerance);
            let left = bounds.left + fx * bounds.width;
            let top = bounds.top + fy * bounds.height;
            let width = fw * (bounds.right - left);
            let height = fh * (bounds.bottom - top);
            let candidate = visible("p", Rect::new(left, top, width, height));

            let report = detect_overflow(Some(&reference()), &[candidate], &config);
            prop_assert!(!report.has_overflow);
        }

        #[test]
        fn prop_disjoint_candidate_is_fully_outside(dx in 1.0..500.0f64, w in 2.0..300.0f64, h in 2.0..300.0f64) {
            let candidate = Rect::new(reference().right + dx, 0.0, w, h);
            prop_assert_eq!(overflow_percentage(&candidate, &reference()), Some(100.0));
        }

        #[test]
        fn prop_detection_is_idempotent(rects in proptest::collection::vec(arb_rect(), 0..20)) {
            let candidates: Vec<Candidate> = rects
                .into_iter()
                .enumerate()
                .map(|(i, r)| visible(&format!("div#c{}", i), r))
                .collect();
            let config = DetectorConfig::default();
            let first = detect_overflow(Some(&reference()), &candidates, &config);
            let second = detect_overflow(Some(&reference()), &candidates, &config);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_tiny_candidates_never_reported(
            left in -1000.0..1000.0f64, top in -1000.0..1000.0f64,
            small in 0.0..2.0f64, other in 0.0..500.0f64, vertical in any::<bool>(),
        ) {
            let rect = if vertical {
                Rect::new(left, top, other, small)
            } else {
                Rect::new(left, top, small, other)
            };
            let report = detect_overflow(Some(&reference()), &[visible("i", rect)], &DetectorConfig::default());
            prop_assert!(report.findings.is_empty());
        }

        #[test]
        fn prop_degenerate_candidates_do_not_divide_by_zero(left in -1000.0..1000.0f64, top in -1000.0..1000.0f64) {
            // Bypass the dimension filter so the area guard itself is exercised
            let config = DetectorConfig::default().min_dimension(0.0);
            let report = detect_overflow(
                Some(&reference()),
                &[visible("hr", Rect::new(left, top, 0.0, 0.0))],
                &config,
            );
            prop_assert!(report.findings.iter().all(|f| f.overflow_percentage.is_finite()));
            prop_assert!(report.findings.is_empty());
        }
    }
}
