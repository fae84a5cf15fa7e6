//! dashshot - dashboard screenshot capture over CDP
//!
//! Drives a headless Chromium session through one fixed sequence: open the
//! login page, wait for a human operator to log in and reach the dashboard,
//! wait for the page to finish loading, hide floating bottom panels, and
//! write a cropped retina-scale PNG for the landing-page hero image.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dashshot::job::{CaptureJob, JobConfig};
//!
//! # async fn run() -> dashshot::error::Result<()> {
//! let report = CaptureJob::new(JobConfig::default()).run().await?;
//! println!("wrote {} ({}x{})", report.output_path.display(), report.width, report.height);
//! # Ok(())
//! # }
//! ```
//!
//! The sequence is deliberately linear with no retries: any failure aborts
//! the run (the browser still closes) and surfaces as a typed [`error::Error`].

#![warn(missing_docs)]

pub mod browser;
pub mod error;
pub mod job;

pub use browser::{BrowserConfig, BrowserSession, ClipRegion};
pub use error::{Error, Result};
pub use job::{CaptureJob, CaptureReport, JobConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
