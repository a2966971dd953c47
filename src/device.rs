//! Device profiles the activities are rendered under.

use serde::{Deserialize, Serialize};

const IOS_SAFARI_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 14.6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1";
const IPAD_SAFARI_UA: &str = "Mozilla/5.0 (iPad; CPU OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1";
const ANDROID_CHROME_UA: &str = "Mozilla/5.0 (Linux; Android 11; Pixel 5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.91 Mobile Safari/537.36";
const DESKTOP_CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Emulated device for one pass over an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub name: String,
    pub viewport: Viewport,
    pub device_scale_factor: f64,
    pub is_mobile: bool,
    pub user_agent: String,
}

impl DeviceProfile {
    /// 355x647 @2x, the phone layout the activities are authored against
    pub fn iphone_7_adjusted() -> Self {
        Self::preset("iPhone 7 Adjusted", 355, 647, 2.0, true, IOS_SAFARI_UA)
    }

    /// 393x851 @2.75x
    pub fn pixel_5() -> Self {
        Self::preset("Pixel 5", 393, 851, 2.75, true, ANDROID_CHROME_UA)
    }

    /// 768x1024 @2x
    pub fn ipad() -> Self {
        Self::preset("iPad", 768, 1024, 2.0, true, IPAD_SAFARI_UA)
    }

    /// 1366x768 @1x
    pub fn desktop() -> Self {
        Self::preset("Desktop", 1366, 768, 1.0, false, DESKTOP_CHROME_UA)
    }

    /// Custom desktop-class viewport
    pub fn custom(width: u32, height: u32) -> Self {
        Self::preset(
            &format!("{}x{}", width, height),
            width,
            height,
            1.0,
            false,
            DESKTOP_CHROME_UA,
        )
    }

    /// Parse a preset name or a `WxH` viewport
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "iphone-7-adjusted" | "iphone7" | "iphone" => Some(Self::iphone_7_adjusted()),
            "pixel-5" | "pixel5" | "android" => Some(Self::pixel_5()),
            "ipad" | "tablet" => Some(Self::ipad()),
            "desktop" => Some(Self::desktop()),
            custom => {
                let (w, h) = custom.split_once('x')?;
                let width = w.parse().ok()?;
                let height = h.parse().ok()?;
                if width == 0 || height == 0 {
                    return None;
                }
                Some(Self::custom(width, height))
            }
        }
    }

    /// Every named preset, in matrix order
    pub fn all_presets() -> Vec<DeviceProfile> {
        vec![
            Self::iphone_7_adjusted(),
            Self::pixel_5(),
            Self::ipad(),
            Self::desktop(),
        ]
    }

    fn preset(
        name: &str,
        width: u32,
        height: u32,
        device_scale_factor: f64,
        is_mobile: bool,
        user_agent: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            viewport: Viewport { width, height },
            device_scale_factor,
            is_mobile,
            user_agent: user_agent.to_string(),
        }
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::iphone_7_adjusted()
    }
}
