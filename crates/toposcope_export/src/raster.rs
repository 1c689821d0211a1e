//! PNG export.
//!
//! Captures the view at `supersample` times the base resolution and
//! encodes the pixels as PNG. The capture wait is bounded by the
//! configured deadline; a slow backend yields [`Error::CaptureTimeout`]
//! and nothing is written.

use crate::error::{Error, Result};
use crate::{artifact_name, ExportConfig};
use log::{debug, info};
use tiny_skia::{IntSize, Pixmap};
use tokio::time::timeout;
use toposcope_view::{Pixels, ViewCapture};

/// A finished PNG export.
#[derive(Debug, Clone)]
pub struct RasterArtifact {
    /// Canonical file name, e.g. `topology-network-2025-03-07.png`.
    pub file_name: String,
    /// Encoded PNG bytes.
    pub png: Vec<u8>,
    /// Output width in pixels (base width times supersample).
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

/// Captures pixel content under the configured deadline. Shared by the
/// PNG and PDF exporters.
pub(crate) async fn capture_pixels(
    view: &dyn ViewCapture,
    config: &ExportConfig,
) -> Result<Pixels> {
    debug!(
        "capturing '{}' at {}x supersample, deadline {:?}",
        view.kind_name(),
        config.supersample,
        config.capture_timeout
    );
    timeout(config.capture_timeout, view.to_pixels(config.supersample))
        .await
        .map_err(|_| Error::CaptureTimeout(config.capture_timeout))?
        .map_err(|e| Error::from_capture(view.kind_name(), e))
}

/// Exports the captured view as a supersampled PNG.
pub async fn export_raster(
    view: &dyn ViewCapture,
    config: &ExportConfig,
) -> Result<RasterArtifact> {
    let pixels = capture_pixels(view, config).await?;

    let size = IntSize::from_wh(pixels.width, pixels.height)
        .ok_or_else(|| Error::Raster("captured view has zero dimensions".to_string()))?;
    let pixmap = Pixmap::from_vec(pixels.rgba, size)
        .ok_or_else(|| Error::Raster("pixel buffer does not match dimensions".to_string()))?;
    let png = pixmap
        .encode_png()
        .map_err(|e| Error::Raster(format!("PNG encoding failed: {}", e)))?;

    let file_name = artifact_name(
        view.kind_name(),
        chrono::Local::now().date_naive(),
        "png",
    );
    info!(
        "raster export: {} ({}x{}, {} bytes)",
        file_name,
        pixels.width,
        pixels.height,
        png.len()
    );

    Ok(RasterArtifact {
        file_name,
        png,
        width: pixels.width,
        height: pixels.height,
    })
}
