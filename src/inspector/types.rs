use std::time::Duration;
use thiserror::Error;

/// Result of a screenshot capture
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// PNG-encoded image data
    pub image_data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Result type for page capability calls
pub type InspectResult<T> = Result<T, InspectError>;

/// Failures raised by the browser capability
#[derive(Error, Debug)]
pub enum InspectError {
    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("DevTools protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("Page error: {0}")]
    Page(String),

    #[error("Timeout after {after:?} waiting for {what}")]
    Timeout { what: String, after: Duration },

    #[error("Script result could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
