//! Clipped screenshot capture and artifact write

use crate::error::{CaptureError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams, Viewport,
};
use chromiumoxide::Page;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Region of the page to capture, in CSS pixels. The session's device scale
/// factor multiplies these into physical pixels in the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRegion {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Default for ClipRegion {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1400.0,
            height: 800.0,
        }
    }
}

impl ClipRegion {
    /// Expected physical pixel dimensions at the given device scale factor
    pub fn physical_size(&self, device_scale_factor: f64) -> (u32, u32) {
        (
            (self.width * device_scale_factor).round() as u32,
            (self.height * device_scale_factor).round() as u32,
        )
    }
}

/// Screenshot capture over raw CDP
pub struct PageCapture;

impl PageCapture {
    /// Capture a clipped PNG of the page
    #[instrument(skip(page))]
    pub async fn clipped_png(page: &Page, clip: ClipRegion) -> Result<Vec<u8>> {
        info!(
            "Capturing screenshot: {}x{} at ({}, {})",
            clip.width, clip.height, clip.x, clip.y
        );

        // Clip scale stays 1.0; the session's device scale factor already
        // multiplies the output resolution.
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .from_surface(true)
            .clip(Viewport {
                x: clip.x,
                y: clip.y,
                width: clip.width,
                height: clip.height,
                scale: 1.0,
            })
            .build();

        let resp = page
            .execute(params)
            .await
            .map_err(|e| CaptureError::ScreenshotFailed(e.to_string()))?;

        let data_b64: &str = resp.data.as_ref();
        let data = BASE64
            .decode(data_b64.as_bytes())
            .map_err(|e| CaptureError::PayloadDecodeFailed(e.to_string()))?;

        debug!("Screenshot captured: {} bytes", data.len());
        Ok(data)
    }
}

/// Decode the pixel dimensions of a PNG payload
pub fn png_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map_err(|e| CaptureError::InvalidImage(e.to_string()))?;
    Ok((img.width(), img.height()))
}

/// Write the artifact, creating parent directories and overwriting any
/// existing file.
#[instrument(skip(bytes))]
pub async fn write_artifact(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| CaptureError::WriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| CaptureError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_clip_region_default() {
        let clip = ClipRegion::default();
        assert_eq!(clip.x, 0.0);
        assert_eq!(clip.y, 0.0);
        assert_eq!(clip.width, 1400.0);
        assert_eq!(clip.height, 800.0);
    }

    #[test]
    fn test_physical_size_at_2x() {
        let clip = ClipRegion::default();
        assert_eq!(clip.physical_size(2.0), (2800, 1600));
    }

    #[test]
    fn test_physical_size_at_1x() {
        let clip = ClipRegion::default();
        assert_eq!(clip.physical_size(1.0), (1400, 800));
    }

    #[test]
    fn test_png_dimensions_roundtrip() {
        let mut bytes = Vec::new();
        let img = image::RgbaImage::new(12, 7);
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();

        assert_eq!(png_dimensions(&bytes).unwrap(), (12, 7));
    }

    #[test]
    fn test_png_dimensions_rejects_garbage() {
        let err = png_dimensions(b"definitely not a png").unwrap_err();
        assert!(matches!(
            err,
            Error::Capture(CaptureError::InvalidImage(_))
        ));
    }

    #[tokio::test]
    async fn test_write_artifact_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public").join("dashboard.png");

        write_artifact(&path, b"first").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        write_artifact(&path, b"second").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }
}
