//! Scripted in-memory browser for exercising the QA loop without Chromium.
//!
//! Each activity is a list of [`MockSlide`]s. Slide geometry, advance
//! behaviour and reachability are set up front; every call made against the
//! pages is recorded in a shared [`MockLog`].

use async_trait::async_trait;
use image::{ImageBuffer, Rgb};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::backend::{BrowserBackend, PageInspector};
use super::types::{CaptureResult, InspectError, InspectResult};
use crate::detector::{Candidate, PageSelectors};
use crate::device::DeviceProfile;
use crate::geometry::Rect;

/// Geometry of one scripted slide
#[derive(Debug, Clone, Default)]
pub struct MockSlide {
    pub reference: Option<Rect>,
    /// None when the elements container is absent
    pub content: Option<Vec<Candidate>>,
    /// Raised by `query_content_elements` when set
    pub detection_error: Option<String>,
}

impl MockSlide {
    /// Reference box used by the canned slides
    pub fn reference_rect() -> Rect {
        Rect::new(0.0, 0.0, 300.0, 500.0)
    }

    /// All content inside the reference box
    pub fn clean() -> Self {
        Self {
            reference: Some(Self::reference_rect()),
            content: Some(vec![
                Candidate::new("h1.title", Rect::new(10.0, 10.0, 280.0, 40.0), true),
                Candidate::new("p.text", Rect::new(10.0, 60.0, 280.0, 120.0), true),
            ]),
            detection_error: None,
        }
    }

    /// One paragraph spilling past the right edge
    pub fn overflowing() -> Self {
        let mut slide = Self::clean();
        if let Some(content) = slide.content.as_mut() {
            content.push(Candidate::new(
                "p.text.long",
                Rect::new(200.0, 200.0, 200.0, 50.0),
                true,
            ));
        }
        slide
    }

    pub fn without_reference() -> Self {
        Self {
            reference: None,
            ..Self::clean()
        }
    }

    pub fn without_content() -> Self {
        Self {
            content: None,
            ..Self::clean()
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            detection_error: Some(message.into()),
            ..Self::clean()
        }
    }
}

/// A scripted activity page
#[derive(Debug, Clone)]
pub struct MockActivity {
    pub slides: Vec<MockSlide>,
    /// Whether the slide navigation list is rendered
    pub has_navigation: bool,
    /// False makes navigation fail
    pub reachable: bool,
    /// Slide numbers (1-based) whose advance call returns false
    pub advance_refusals: Vec<usize>,
    /// Slide numbers (1-based) whose advance call raises an error
    pub advance_errors: Vec<usize>,
    /// Per-device slide overrides, keyed by device name
    pub device_slides: HashMap<String, Vec<MockSlide>>,
}

impl MockActivity {
    pub fn new(slides: Vec<MockSlide>) -> Self {
        Self {
            slides,
            has_navigation: true,
            reachable: true,
            advance_refusals: Vec::new(),
            advance_errors: Vec::new(),
            device_slides: HashMap::new(),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::new(vec![MockSlide::clean()])
        }
    }

    pub fn without_navigation(mut self) -> Self {
        self.has_navigation = false;
        self
    }

    pub fn refuse_advance_to(mut self, slide_number: usize) -> Self {
        self.advance_refusals.push(slide_number);
        self
    }

    pub fn error_on_advance_to(mut self, slide_number: usize) -> Self {
        self.advance_errors.push(slide_number);
        self
    }

    pub fn on_device(mut self, device: &str, slides: Vec<MockSlide>) -> Self {
        self.device_slides.insert(device.to_string(), slides);
        self
    }
}

/// Calls observed across all mock pages
#[derive(Debug, Clone, Default)]
pub struct MockLog {
    pub opened: usize,
    pub closed: usize,
    pub navigations: Vec<String>,
    pub advance_calls: usize,
    pub highlights: usize,
    pub captures: usize,
    /// Device names in page-open order
    pub devices: Vec<String>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory [`BrowserBackend`]
#[derive(Debug, Default)]
pub struct MockBrowser {
    activities: Arc<HashMap<String, MockActivity>>,
    selectors: PageSelectors,
    log: Arc<Mutex<MockLog>>,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_activity(mut self, id: &str, activity: MockActivity) -> Self {
        Arc::make_mut(&mut self.activities).insert(id.to_string(), activity);
        self
    }

    pub fn with_selectors(mut self, selectors: PageSelectors) -> Self {
        self.selectors = selectors;
        self
    }

    /// Snapshot of the calls made so far
    pub fn log(&self) -> MockLog {
        lock(&self.log).clone()
    }
}

#[derive(Debug, Default)]
struct PageState {
    slides: Vec<MockSlide>,
    activity: Option<MockActivity>,
    current: usize,
}

impl PageState {
    fn slide(&self) -> Option<&MockSlide> {
        self.slides.get(self.current)
    }
}

/// Page handed out by [`MockBrowser`]
#[derive(Debug)]
pub struct MockPage {
    device: DeviceProfile,
    activities: Arc<HashMap<String, MockActivity>>,
    selectors: PageSelectors,
    state: Mutex<PageState>,
    log: Arc<Mutex<MockLog>>,
}

impl MockPage {
    fn matches(&self, selector: &str) -> usize {
        let state = lock(&self.state);
        let Some(activity) = state.activity.as_ref() else {
            return 0;
        };
        if selector == self.selectors.navigation_items {
            return if activity.has_navigation { state.slides.len() } else { 0 };
        }
        if selector == self.selectors.active_slide {
            return usize::from(state.slide().is_some());
        }
        if selector == self.selectors.reference_container {
            return usize::from(state.slide().is_some_and(|s| s.reference.is_some()));
        }
        if selector == self.selectors.elements_container {
            return usize::from(state.slide().is_some_and(|s| s.content.is_some()));
        }
        0
    }
}

#[async_trait]
impl BrowserBackend for MockBrowser {
    type Page = MockPage;

    async fn open_page(&self, device: &DeviceProfile) -> InspectResult<MockPage> {
        {
            let mut log = lock(&self.log);
            log.opened += 1;
            log.devices.push(device.name.clone());
        }
        Ok(MockPage {
            device: device.clone(),
            activities: Arc::clone(&self.activities),
            selectors: self.selectors.clone(),
            state: Mutex::new(PageState::default()),
            log: Arc::clone(&self.log),
        })
    }

    async fn close_page(&self, _page: MockPage) -> InspectResult<()> {
        lock(&self.log).closed += 1;
        Ok(())
    }

    fn source_type(&self) -> &str {
        "mock"
    }
}

#[async_trait]
impl PageInspector for MockPage {
    async fn navigate(&self, url: &str, _timeout: Duration) -> InspectResult<()> {
        lock(&self.log).navigations.push(url.to_string());

        let id = url.rsplit('/').next().unwrap_or_default();
        let activity = self
            .activities
            .get(id)
            .filter(|activity| activity.reachable)
            .ok_or_else(|| InspectError::Page(format!("net::ERR_CONNECTION_REFUSED at {}", url)))?;

        let mut state = lock(&self.state);
        state.slides = activity
            .device_slides
            .get(&self.device.name)
            .cloned()
            .unwrap_or_else(|| activity.slides.clone());
        state.activity = Some(activity.clone());
        state.current = 0;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, _timeout: Duration) -> InspectResult<bool> {
        Ok(self.matches(selector) > 0)
    }

    async fn count_elements(&self, selector: &str) -> InspectResult<usize> {
        Ok(self.matches(selector))
    }

    async fn advance_slide(&self, _component: &str) -> InspectResult<bool> {
        lock(&self.log).advance_calls += 1;

        let mut state = lock(&self.state);
        let target = state.current + 2;
        let (refused, raised) = match state.activity.as_ref() {
            Some(activity) => (
                activity.advance_refusals.contains(&target),
                activity.advance_errors.contains(&target),
            ),
            None => return Ok(false),
        };
        if raised {
            return Err(InspectError::Page(format!(
                "TypeError: cannot advance to slide {}",
                target
            )));
        }
        if refused {
            return Ok(false);
        }
        if state.current + 1 < state.slides.len() {
            state.current += 1;
        }
        Ok(true)
    }

    async fn highlight(&self, _selector: &str, _lifetime: Duration) -> InspectResult<()> {
        lock(&self.log).highlights += 1;
        Ok(())
    }

    async fn resolve_rect(&self, selector: &str) -> InspectResult<Option<Rect>> {
        if selector != self.selectors.reference_container {
            return Ok(None);
        }
        let state = lock(&self.state);
        Ok(state.slide().and_then(|s| s.reference))
    }

    async fn query_content_elements(
        &self,
        container: &str,
        _patterns: &[String],
    ) -> InspectResult<Option<Vec<Candidate>>> {
        let state = lock(&self.state);
        let Some(slide) = state.slide() else {
            return Ok(None);
        };
        if let Some(message) = &slide.detection_error {
            return Err(InspectError::Page(message.clone()));
        }
        if container != self.selectors.elements_container {
            return Ok(None);
        }
        Ok(slide.content.clone())
    }

    async fn capture(&self) -> InspectResult<CaptureResult> {
        lock(&self.log).captures += 1;

        let width = self.device.viewport.width;
        let height = self.device.viewport.height;
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(width, height, Rgb([255, 255, 255]));
        let mut image_data = Vec::new();
        img.write_to(&mut Cursor::new(&mut image_data), image::ImageFormat::Png)?;
        Ok(CaptureResult {
            image_data,
            width,
            height,
        })
    }
}
