//! dashshot CLI
//!
//! Zero-argument invocation reproduces the fixed capture flow; the flags
//! only adjust ambient knobs (output path, Chrome binary, head mode).

use clap::Parser;
use dashshot::job::{CaptureJob, JobConfig};
use std::path::PathBuf;

/// Capture a logged-in dashboard screenshot
#[derive(Parser, Debug)]
#[command(name = "dashshot")]
#[command(version)]
#[command(about = "Waits for a manual dashboard login, hides floating panels, and writes a cropped retina PNG")]
struct Args {
    /// Artifact path (default: <exe-dir>/../public/dashboard.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to Chrome/Chromium executable
    #[arg(long)]
    chrome_path: Option<String>,

    /// Show the browser window so the operator can log in
    #[arg(long)]
    headful: bool,

    /// Disable the Chromium sandbox (needed in some containers)
    #[arg(long)]
    no_sandbox: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = JobConfig {
        headless: !args.headful,
        no_sandbox: args.no_sandbox,
        chrome_path: args.chrome_path,
        ..JobConfig::default()
    };
    if let Some(output) = args.output {
        config.output_path = output;
    }

    let report = CaptureJob::new(config).run().await?;

    tracing::info!(
        "Dashboard screenshot saved to {}",
        report.output_path.display()
    );

    Ok(())
}
