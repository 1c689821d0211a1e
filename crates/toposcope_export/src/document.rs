//! Paginated PDF report.
//!
//! Composes title, generation timestamp, the rasterized view and a
//! summary table into an A4 document. Text content is described in the
//! report grammar (`crate::report`) and interpreted block by block; a
//! page break is inserted whenever the remaining vertical space cannot
//! hold the next block.

use crate::error::{Error, Result};
use crate::raster::capture_pixels;
use crate::report::{parse_blocks, Block};
use crate::{artifact_name, ExportConfig};
use log::info;
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef, Mm,
    PdfDocument, PdfDocumentReference, PdfLayerReference, Px,
};
use toposcope_view::{Pixels, ViewCapture};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const TABLE_COLUMN_MM: f32 = 45.0;
const MM_PER_INCH: f32 = 25.4;

/// Descriptive fields rendered into the report.
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub title: String,
    pub system_count: usize,
    pub connection_count: usize,
}

impl Default for DocumentMeta {
    fn default() -> Self {
        Self {
            title: "Topology report".to_string(),
            system_count: 0,
            connection_count: 0,
        }
    }
}

/// A finished PDF export.
#[derive(Debug)]
pub struct DocumentArtifact {
    /// Canonical file name, e.g. `topology-network-2025-03-07.pdf`.
    pub file_name: String,
    /// Serialized PDF bytes.
    pub pdf: Vec<u8>,
}

/// Exports the view as a paginated PDF report.
pub async fn export_document(
    view: &dyn ViewCapture,
    meta: &DocumentMeta,
    config: &ExportConfig,
) -> Result<DocumentArtifact> {
    let pixels = capture_pixels(view, config).await?;

    let mut composer = PageComposer::new(&meta.title)?;

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M");
    let header = format!("# {}\n**Generated: {}**", meta.title, timestamp);
    for block in parse_blocks(&header) {
        composer.push(&block)?;
    }

    composer.image(&pixels)?;

    let summary = format!(
        "## Summary\n|View|{}|\n|Systems|{}|\n|Connections|{}|",
        view.kind_name(),
        meta.system_count,
        meta.connection_count
    );
    for block in parse_blocks(&summary) {
        composer.push(&block)?;
    }

    let pdf = composer.finish()?;
    let file_name = artifact_name(view.kind_name(), chrono::Local::now().date_naive(), "pdf");
    info!("document export: {} ({} bytes)", file_name, pdf.len());

    Ok(DocumentArtifact { file_name, pdf })
}

/// Cursor-driven page layout over a growing PDF document.
struct PageComposer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Distance from the page bottom to the next free baseline, in mm.
    cursor_y: f32,
}

impl PageComposer {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer_index) = PdfDocument::new(
            title,
            Mm(PAGE_WIDTH_MM.into()),
            Mm(PAGE_HEIGHT_MM.into()),
            "content",
        );
        let layer = doc.get_page(page).get_layer(layer_index);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| Error::Document(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| Error::Document(e.to_string()))?;

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor_y: PAGE_HEIGHT_MM - MARGIN_MM,
        })
    }

    fn new_page(&mut self) {
        let (page, layer_index) = self.doc.add_page(
            Mm(PAGE_WIDTH_MM.into()),
            Mm(PAGE_HEIGHT_MM.into()),
            "content",
        );
        self.layer = self.doc.get_page(page).get_layer(layer_index);
        self.cursor_y = PAGE_HEIGHT_MM - MARGIN_MM;
    }

    /// Breaks the page when the next block would cross the bottom margin.
    fn ensure_room(&mut self, height_mm: f32) {
        if self.cursor_y - height_mm < MARGIN_MM {
            self.new_page();
        }
    }

    fn push(&mut self, block: &Block) -> Result<()> {
        if matches!(block, Block::PageBreak) {
            self.new_page();
            return Ok(());
        }

        self.ensure_room(block.height_mm());
        self.cursor_y -= block.height_mm();
        let font = if block.is_bold() { &self.bold } else { &self.regular };

        match block {
            Block::Heading(text)
            | Block::Subheading(text)
            | Block::Bold(text)
            | Block::Paragraph(text) => {
                self.layer.use_text(
                    text.as_str(),
                    block.font_size(),
                    Mm(MARGIN_MM.into()),
                    Mm(self.cursor_y.into()),
                    font,
                );
            }
            Block::Bullet(text) => {
                self.layer.use_text(
                    format!("\u{2022} {}", text),
                    block.font_size(),
                    Mm((MARGIN_MM + 3.0).into()),
                    Mm(self.cursor_y.into()),
                    font,
                );
            }
            Block::TableRow(cells) => {
                for (i, cell) in cells.iter().enumerate() {
                    let x = MARGIN_MM + i as f32 * TABLE_COLUMN_MM;
                    // The first column doubles as the row label.
                    let font = if i == 0 { &self.bold } else { &self.regular };
                    self.layer.use_text(
                        cell.as_str(),
                        block.font_size(),
                        Mm(x.into()),
                        Mm(self.cursor_y.into()),
                        font,
                    );
                }
            }
            Block::PageBreak => unreachable!("handled above"),
        }
        Ok(())
    }

    /// Embeds the captured pixels, scaled to fit the content area.
    fn image(&mut self, pixels: &Pixels) -> Result<()> {
        if pixels.width == 0 || pixels.height == 0 {
            return Err(Error::Document("captured view has zero dimensions".to_string()));
        }

        let usable_w = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
        let usable_h = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM;
        let mut dpi = pixels.width as f32 * MM_PER_INCH / usable_w;
        if pixels.height as f32 * MM_PER_INCH / dpi > usable_h {
            dpi = pixels.height as f32 * MM_PER_INCH / usable_h;
        }
        let height_mm = pixels.height as f32 * MM_PER_INCH / dpi;

        self.ensure_room(height_mm + 4.0);
        self.cursor_y -= height_mm + 2.0;

        let image = Image::from(ImageXObject {
            width: Px(pixels.width as usize),
            height: Px(pixels.height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: flatten_rgb(pixels),
            image_filter: None,
            smask: None,
            clipping_bbox: None,
        });
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN_MM.into())),
                translate_y: Some(Mm(self.cursor_y.into())),
                dpi: Some(dpi.into()),
                ..Default::default()
            },
        );

        self.cursor_y -= 2.0;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| Error::Document(e.to_string()))
    }
}

/// Drops the alpha channel. Views render over an opaque background, so
/// the premultiplied RGBA carries alpha 255 everywhere.
fn flatten_rgb(pixels: &Pixels) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(pixels.rgba.len() / 4 * 3);
    for px in pixels.rgba.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
    }
    rgb
}
