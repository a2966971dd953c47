//! Chromium binding over the DevTools protocol.
//!
//! One `BrowserSession` is launched for the whole run. Each (activity, device)
//! pair gets its own browser context so cookies and storage never leak between
//! passes.

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::cdp::browser_protocol::target::{CreateBrowserContextParams, CreateTargetParams};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use image::GenericImageView;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::backend::{BrowserBackend, PageInspector};
use super::scripts::{self, AdvanceResult, ContentResult, CountResult, RectResult};
use super::types::{CaptureResult, InspectError, InspectResult};
use crate::detector::Candidate;
use crate::device::DeviceProfile;
use crate::geometry::Rect;

/// Interval between selector polls
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A launched Chromium process and its protocol event loop
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch Chromium. Headed sessions start maximized.
    pub async fn launch(headless: bool) -> InspectResult<Self> {
        let mut builder = BrowserConfig::builder().viewport(None);
        if !headless {
            builder = builder.with_head().arg("--start-maximized");
        }
        let config = builder.build().map_err(InspectError::Launch)?;

        let (browser, mut handler) = Browser::launch(config).await?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!(error = %err, "browser handler stopped");
                    break;
                }
            }
        });

        Ok(Self { browser, handler })
    }

    /// Close the browser and wait for the event loop to drain
    pub async fn shutdown(mut self) -> InspectResult<()> {
        self.browser.close().await?;
        let _ = self.handler.await;
        Ok(())
    }
}

/// A page living in its own browser context
pub struct ChromiumPage {
    page: Page,
    context_id: BrowserContextId,
    /// Re-applied after every full-page screenshot, which clears the override
    device: DeviceProfile,
}

impl ChromiumPage {
    async fn eval<T: DeserializeOwned>(&self, script: String) -> InspectResult<T> {
        let result = self.page.evaluate(script).await?;
        Ok(result.into_value::<T>()?)
    }
}

async fn emulate_device(page: &Page, device: &DeviceProfile) -> InspectResult<()> {
    let metrics = SetDeviceMetricsOverrideParams::builder()
        .width(i64::from(device.viewport.width))
        .height(i64::from(device.viewport.height))
        .device_scale_factor(device.device_scale_factor)
        .mobile(device.is_mobile)
        .build()
        .map_err(InspectError::Page)?;
    page.execute(metrics).await?;
    page.set_user_agent(device.user_agent.as_str()).await?;
    Ok(())
}

/// Run `capture`, then `restore` whether or not the capture succeeded.
/// A capture error takes precedence over a restore error.
async fn with_restore<T, C, R>(capture: C, restore: R) -> InspectResult<T>
where
    C: Future<Output = InspectResult<T>>,
    R: Future<Output = InspectResult<()>>,
{
    let captured = capture.await;
    let restored = restore.await;
    let value = captured?;
    restored?;
    Ok(value)
}

#[async_trait]
impl BrowserBackend for BrowserSession {
    type Page = ChromiumPage;

    async fn open_page(&self, device: &DeviceProfile) -> InspectResult<ChromiumPage> {
        let context_id = self
            .browser
            .create_browser_context(CreateBrowserContextParams::default())
            .await?;

        let target = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context_id.clone())
            .build()
            .map_err(InspectError::Page)?;

        let page = match self.browser.new_page(target).await {
            Ok(page) => page,
            Err(err) => {
                let _ = self.browser.dispose_browser_context(context_id).await;
                return Err(err.into());
            }
        };

        if let Err(err) = emulate_device(&page, device).await {
            let _ = page.close().await;
            let _ = self.browser.dispose_browser_context(context_id).await;
            return Err(err);
        }

        Ok(ChromiumPage {
            page,
            context_id,
            device: device.clone(),
        })
    }

    async fn close_page(&self, page: ChromiumPage) -> InspectResult<()> {
        let ChromiumPage {
            page, context_id, ..
        } = page;
        let closed = page.close().await;
        self.browser.dispose_browser_context(context_id).await?;
        closed?;
        Ok(())
    }

    fn source_type(&self) -> &str {
        "chromium"
    }
}

#[async_trait]
impl PageInspector for ChromiumPage {
    async fn navigate(&self, url: &str, timeout: Duration) -> InspectResult<()> {
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(result) => {
                result?;
                Ok(())
            }
            Err(_) => Err(InspectError::Timeout {
                what: format!("navigation to {}", url),
                after: timeout,
            }),
        }
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> InspectResult<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.count_elements(selector).await? > 0 {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn count_elements(&self, selector: &str) -> InspectResult<usize> {
        let result: CountResult = self.eval(scripts::count(selector)).await?;
        Ok(result.count)
    }

    async fn advance_slide(&self, component: &str) -> InspectResult<bool> {
        let result: AdvanceResult = self.eval(scripts::advance(component)).await?;
        if let Some(error) = &result.error {
            warn!(error = %error, "slide component rejected advance");
        }
        Ok(result.advanced)
    }

    async fn highlight(&self, selector: &str, lifetime: Duration) -> InspectResult<()> {
        let _: CountResult = self
            .eval(scripts::highlight(selector, lifetime.as_millis()))
            .await?;
        Ok(())
    }

    async fn resolve_rect(&self, selector: &str) -> InspectResult<Option<Rect>> {
        let result: RectResult = self.eval(scripts::resolve_rect(selector)).await?;
        Ok(if result.found { result.rect } else { None })
    }

    async fn query_content_elements(
        &self,
        container: &str,
        patterns: &[String],
    ) -> InspectResult<Option<Vec<Candidate>>> {
        let result: ContentResult = self
            .eval(scripts::content_elements(container, patterns))
            .await?;
        Ok(result.found.then_some(result.elements))
    }

    async fn capture(&self) -> InspectResult<CaptureResult> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        let image_data = with_restore(
            async { self.page.screenshot(params).await.map_err(InspectError::from) },
            emulate_device(&self.page, &self.device),
        )
        .await?;
        let (width, height) = image::load_from_memory(&image_data)?.dimensions();
        Ok(CaptureResult {
            image_data,
            width,
            height,
        })
    }
}
