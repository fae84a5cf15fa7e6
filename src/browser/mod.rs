//! Browser session lifecycle, navigation, decluttering, and capture

pub mod capture;
pub mod declutter;
pub mod navigation;
pub mod session;

pub use capture::{png_dimensions, write_artifact, ClipRegion, PageCapture};
pub use declutter::{Declutter, DeclutterSummary, HiddenPanel};
pub use navigation::{PageNavigator, UrlValidator};
pub use session::{BrowserConfig, BrowserConfigBuilder, BrowserSession};
