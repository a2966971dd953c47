//! Capability boundary between the QA core and a browser binding.
//!
//! The slide driver only ever talks to these traits:
//! - `BrowserSession` drives Chromium over the DevTools protocol
//! - `MockBrowser` replays scripted slides for tests

use async_trait::async_trait;
use std::time::Duration;

use super::types::{CaptureResult, InspectResult};
use crate::detector::Candidate;
use crate::device::DeviceProfile;
use crate::geometry::Rect;

/// One live page, scoped to a single (activity, device) pair
#[async_trait]
pub trait PageInspector: Send + Sync {
    /// Navigate to `url`, failing if the load does not settle within `timeout`
    async fn navigate(&self, url: &str, timeout: Duration) -> InspectResult<()>;

    /// Poll until `selector` matches something. `Ok(false)` on timeout.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> InspectResult<bool>;

    /// Number of elements matching `selector`
    async fn count_elements(&self, selector: &str) -> InspectResult<usize>;

    /// Ask the slide component to move forward. `Ok(false)` when the page refused.
    async fn advance_slide(&self, component: &str) -> InspectResult<bool>;

    /// Draw a temporary outline over `selector`, removed after `lifetime`
    async fn highlight(&self, selector: &str, lifetime: Duration) -> InspectResult<()>;

    /// Bounding box of the first match, None if nothing matches
    async fn resolve_rect(&self, selector: &str) -> InspectResult<Option<Rect>>;

    /// Elements matching each of `patterns` inside `container`, pattern by pattern.
    /// None if `container` itself is absent.
    async fn query_content_elements(
        &self,
        container: &str,
        patterns: &[String],
    ) -> InspectResult<Option<Vec<Candidate>>>;

    /// Full-page PNG screenshot
    async fn capture(&self) -> InspectResult<CaptureResult>;
}

/// Source of isolated pages, one per (activity, device) pair
#[async_trait]
pub trait BrowserBackend: Send + Sync {
    type Page: PageInspector;

    /// Open a fresh browsing context emulating `device`
    async fn open_page(&self, device: &DeviceProfile) -> InspectResult<Self::Page>;

    /// Tear down the page and its browsing context
    async fn close_page(&self, page: Self::Page) -> InspectResult<()>;

    /// Identifier for logs (e.g. "chromium", "mock")
    fn source_type(&self) -> &str;
}
