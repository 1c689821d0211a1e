//! The SVG-backed rendered view handle.

use crate::capture::{CaptureError, Pixels, ViewCapture};
use async_trait::async_trait;
use resvg::{tiny_skia, usvg};
use toposcope_layout::LayoutKind;

/// An opaque snapshot of what the controller last rendered.
///
/// Holds the complete SVG markup of the view; implements [`ViewCapture`]
/// so the export pipeline can serialize it without knowing anything about
/// layout adapters or the rendering surface.
#[derive(Debug, Clone)]
pub struct RenderedView {
    kind: LayoutKind,
    width: u32,
    height: u32,
    svg: String,
    placeholder: bool,
}

impl RenderedView {
    pub(crate) fn new(
        kind: LayoutKind,
        width: u32,
        height: u32,
        svg: String,
        placeholder: bool,
    ) -> Self {
        Self {
            kind,
            width,
            height,
            svg,
            placeholder,
        }
    }

    /// Which adapter produced this view.
    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    /// True when the adapter had no renderable content and the view shows
    /// a placeholder message instead of a diagram.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// The rendered SVG markup.
    pub fn svg(&self) -> &str {
        &self.svg
    }
}

#[async_trait]
impl ViewCapture for RenderedView {
    fn kind_name(&self) -> &str {
        self.kind.as_str()
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn to_vector_markup(&self) -> Option<&str> {
        Some(&self.svg)
    }

    async fn to_pixels(&self, scale: f32) -> Result<Pixels, CaptureError> {
        let options = usvg::Options::default();
        let tree = usvg::Tree::from_str(&self.svg, &options)
            .map_err(|e| CaptureError::Raster(format!("invalid markup: {}", e)))?;

        let width = ((self.width as f32) * scale).round().max(1.0) as u32;
        let height = ((self.height as f32) * scale).round().max(1.0) as u32;
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| CaptureError::Raster("zero-sized pixmap".into()))?;

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        Ok(Pixels {
            width,
            height,
            rgba: pixmap.take(),
        })
    }
}
