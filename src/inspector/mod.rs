pub mod backend;
pub mod chromium;
pub mod mock;
pub mod scripts;
pub mod types;

pub use backend::{BrowserBackend, PageInspector};
pub use chromium::{BrowserSession, ChromiumPage};
pub use mock::{MockActivity, MockBrowser, MockLog, MockPage, MockSlide};
pub use types::{CaptureResult, InspectError, InspectResult};
