//! The capture interface between rendered views and the export pipeline.
//!
//! The export pipeline depends only on [`ViewCapture`], never on a
//! specific rendering surface or layout adapter, so it stays portable
//! across rendering backends. The SVG-backed [`RenderedView`]
//! (crate::RenderedView) is the production implementation; tests model
//! raster-only or slow backends with their own impls.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a capture backend.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The view has no vector markup (raster-only backend).
    #[error("no vector content available")]
    NoVectorContent,

    /// Pixel capture failed (decode error, invalid markup, ...).
    #[error("raster capture failed: {0}")]
    Raster(String),
}

/// Raw pixel content of a captured view.
///
/// `rgba` is premultiplied RGBA8888, row-major, `width * height * 4`
/// bytes. Views rendered over an opaque background carry alpha 255
/// everywhere, which downstream encoders rely on when flattening to RGB.
#[derive(Debug, Clone)]
pub struct Pixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// An opaque handle over "whatever is currently on screen".
#[async_trait]
pub trait ViewCapture: Send + Sync {
    /// Stable name of the active adapter, used for artifact naming.
    fn kind_name(&self) -> &str;

    /// Base (unsupersampled) view width in pixels.
    fn width(&self) -> u32;

    /// Base view height in pixels.
    fn height(&self) -> u32;

    /// The view's vector markup, verbatim, if the backend is
    /// vector-based.
    fn to_vector_markup(&self) -> Option<&str>;

    /// Captures pixel content at `scale` times the base resolution.
    ///
    /// This is the pipeline's one true suspension point: backends may
    /// need to wait for image decoding before pixel data is readable.
    async fn to_pixels(&self, scale: f32) -> Result<Pixels, CaptureError>;
}
