//! The capture job: one fixed linear sequence from browser launch to
//! artifact write.
//!
//! Every hard-coded constant of the flow lives here. The sequence is
//! `launch → navigate to login → wait for the operator to reach the
//! dashboard → wait for network idle → settle → declutter → clipped
//! screenshot → write artifact → close`. No retries, no branching; the
//! first error aborts the run and the session still closes on the way out.

use crate::browser::{
    png_dimensions, write_artifact, BrowserConfig, BrowserSession, ClipRegion, Declutter,
    PageCapture, PageNavigator,
};
use crate::error::Result;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Login page the operator authenticates on
pub const LOGIN_URL: &str = "http://localhost:3000/login";

/// URL glob the page must reach before capture proceeds
pub const DASHBOARD_URL_PATTERN: &str = "**/home";

/// Upper bound on the manual login step
pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// How often the login wait re-reads the page URL
pub const LOGIN_POLL: Duration = Duration::from_millis(500);

/// Quiet period with no new resource-timing entries that counts as idle
pub const NETWORK_IDLE_QUIET: Duration = Duration::from_millis(500);

/// Sample interval of the in-page idle poll
pub const NETWORK_IDLE_POLL: Duration = Duration::from_millis(250);

/// Extra delay after network idle for client-side rendering to finish
pub const RENDER_SETTLE: Duration = Duration::from_millis(3000);

/// Viewport width, CSS pixels
pub const VIEWPORT_WIDTH: u32 = 1400;

/// Viewport height, CSS pixels
pub const VIEWPORT_HEIGHT: u32 = 900;

/// Device scale factor for retina output
pub const DEVICE_SCALE_FACTOR: f64 = 2.0;

/// Default artifact path: `../public/dashboard.png` next to the executable's
/// directory, mirroring a script writing relative to its own location.
pub fn default_output_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("..").join("public").join("dashboard.png")
}

/// Configuration for one capture run. Defaults reproduce the fixed flow;
/// only ambient knobs (paths, head mode) are meant to vary.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Login page URL
    pub login_url: String,
    /// Dashboard URL glob the login wait blocks on
    pub dashboard_pattern: String,
    /// Artifact destination
    pub output_path: PathBuf,
    /// Chromium executable override
    pub chrome_path: Option<String>,
    /// Run headless (default true)
    pub headless: bool,
    /// Disable the Chromium sandbox
    pub no_sandbox: bool,
    /// Region of the page the screenshot is clipped to
    pub clip: ClipRegion,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            login_url: LOGIN_URL.to_string(),
            dashboard_pattern: DASHBOARD_URL_PATTERN.to_string(),
            output_path: default_output_path(),
            chrome_path: None,
            headless: true,
            no_sandbox: false,
            clip: ClipRegion::default(),
        }
    }
}

/// Summary of a completed run, for the final log line
#[derive(Debug, Clone, Serialize)]
pub struct CaptureReport {
    /// Where the artifact was written
    pub output_path: PathBuf,
    /// Artifact size in bytes
    pub bytes: usize,
    /// Decoded pixel width of the artifact
    pub width: u32,
    /// Decoded pixel height of the artifact
    pub height: u32,
    /// How many floating panels the declutter pass hid
    pub panels_hidden: usize,
    /// Wall-clock duration of the whole run in milliseconds
    pub elapsed_ms: u64,
}

/// One capture run
pub struct CaptureJob {
    config: JobConfig,
}

impl CaptureJob {
    /// Create a job with the given config
    pub fn new(config: JobConfig) -> Self {
        Self { config }
    }

    /// Access the job config
    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Run the full capture sequence. The browser session closes on every
    /// exit path; if both the drive sequence and the close fail, the drive
    /// error wins.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<CaptureReport> {
        let start = Instant::now();

        let mut browser_config = BrowserConfig::builder()
            .headless(self.config.headless)
            .viewport(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
            .device_scale_factor(DEVICE_SCALE_FACTOR)
            .sandbox(!self.config.no_sandbox);
        if let Some(ref path) = self.config.chrome_path {
            browser_config = browser_config.chrome_path(path.clone());
        }

        let session = BrowserSession::launch(browser_config.build()).await?;

        let drive_result = self.drive(&session).await;
        let close_result = session.close().await;

        let (panels_hidden, bytes, width, height) = drive_result?;
        close_result?;

        let report = CaptureReport {
            output_path: self.config.output_path.clone(),
            bytes,
            width,
            height,
            panels_hidden,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Capture complete: {} ({} bytes, {}x{}) in {}ms",
            report.output_path.display(),
            report.bytes,
            report.width,
            report.height,
            report.elapsed_ms
        );

        Ok(report)
    }

    /// Steps between launch and close. Returns the panel count and the
    /// artifact's byte size and pixel dimensions.
    async fn drive(&self, session: &BrowserSession) -> Result<(usize, usize, u32, u32)> {
        let page = session.new_page().await?;

        info!("Opening login page - please log in...");
        PageNavigator::goto(&page, &self.config.login_url).await?;

        info!(
            "Waiting up to {}s for the page to reach {}...",
            LOGIN_TIMEOUT.as_secs(),
            self.config.dashboard_pattern
        );
        PageNavigator::wait_for_url_match(
            &page,
            &self.config.dashboard_pattern,
            LOGIN_TIMEOUT,
            LOGIN_POLL,
        )
        .await?;

        info!("Logged in! Waiting for the dashboard to load...");
        PageNavigator::wait_for_network_idle(&page, NETWORK_IDLE_QUIET, NETWORK_IDLE_POLL).await?;
        PageNavigator::settle(RENDER_SETTLE).await;

        let summary = Declutter::hide_bottom_panels(&page).await?;

        let png = PageCapture::clipped_png(&page, self.config.clip).await?;

        let (width, height) = png_dimensions(&png)?;
        let (expected_w, expected_h) = self.config.clip.physical_size(DEVICE_SCALE_FACTOR);
        if (width, height) != (expected_w, expected_h) {
            warn!(
                "Artifact is {}x{}, expected {}x{}",
                width, height, expected_w, expected_h
            );
        }

        write_artifact(&self.config.output_path, &png).await?;

        Ok((summary.hidden_count(), png.len(), width, height))
    }
}
