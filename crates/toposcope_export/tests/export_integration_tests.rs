//! Integration tests driving the full export pipeline over rendered
//! views, plus stub capture backends for the failure paths.

use async_trait::async_trait;
use std::time::Duration;
use toposcope_export::{
    export_document, export_raster, export_vector, DocumentMeta, Error, ExportConfig,
};
use toposcope_layout::LayoutKind;
use toposcope_model::{Direction, Quality, Topology};
use toposcope_view::{CaptureError, Pixels, ViewCapture, ViewConfig, ViewController};

fn sample_topology() -> Topology {
    let mut topology = Topology::new();
    let a = topology.add_system("Billing").id;
    let b = topology.add_system("CRM").id;
    let c = topology.add_system("Warehouse").id;
    topology
        .add_connection(&a, &b, Direction::Bidirectional, Quality::Automated, Some(20.0))
        .unwrap();
    topology
        .add_connection(&a, &c, Direction::OneWay, Quality::Manual, Some(5.0))
        .unwrap();
    topology
}

/// A backend whose pixel capture never finishes in time.
struct SlowCapture;

#[async_trait]
impl ViewCapture for SlowCapture {
    fn kind_name(&self) -> &str {
        "network"
    }
    fn width(&self) -> u32 {
        100
    }
    fn height(&self) -> u32 {
        100
    }
    fn to_vector_markup(&self) -> Option<&str> {
        None
    }
    async fn to_pixels(&self, _scale: f32) -> Result<Pixels, CaptureError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        unreachable!("the deadline fires first")
    }
}

#[tokio::test]
async fn test_raster_export_round_trip() {
    let mut controller = ViewController::new(sample_topology(), ViewConfig::default());
    let view = controller.render();

    let artifact = export_raster(&view, &ExportConfig::default()).await.unwrap();

    // Supersampled to twice the 800x600 canvas.
    assert_eq!(artifact.width, 1600);
    assert_eq!(artifact.height, 1200);
    assert!(artifact.file_name.starts_with("topology-network-"));
    assert!(artifact.file_name.ends_with(".png"));

    // PNG magic plus decoded dimensions in the IHDR chunk.
    assert_eq!(&artifact.png[..8], b"\x89PNG\r\n\x1a\n");
    let decoded = tiny_skia::Pixmap::decode_png(&artifact.png).unwrap();
    assert_eq!(decoded.width(), 1600);
    assert_eq!(decoded.height(), 1200);
}

#[tokio::test]
async fn test_capture_timeout_yields_no_artifact() {
    let config = ExportConfig {
        capture_timeout: Duration::from_millis(20),
        ..ExportConfig::default()
    };
    let err = export_raster(&SlowCapture, &config).await.unwrap_err();
    assert!(matches!(err, Error::CaptureTimeout(d) if d == Duration::from_millis(20)));
}

#[tokio::test]
async fn test_cancelled_export_is_discarded() {
    let config = ExportConfig {
        capture_timeout: Duration::from_secs(60),
        ..ExportConfig::default()
    };
    let export = export_raster(&SlowCapture, &config);
    // Dropping the future before polling it to completion abandons the
    // capture; nothing observable happens afterwards.
    drop(export);
}

#[test]
fn test_vector_export_is_standalone_svg() {
    let mut controller = ViewController::new(sample_topology(), ViewConfig::default());
    controller.select_adapter(LayoutKind::Matrix);
    let view = controller.render();

    let artifact = export_vector(&view).unwrap();
    assert!(artifact.svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg"));
    assert!(artifact.svg.ends_with("</svg>"));
    assert!(artifact.file_name.starts_with("topology-matrix-"));
    assert!(artifact.file_name.ends_with(".svg"));
}

#[test]
fn test_vector_export_rejects_raster_only_backend() {
    let err = export_vector(&SlowCapture).unwrap_err();
    assert!(matches!(err, Error::NoVectorContent(kind) if kind == "network"));
}

#[tokio::test]
async fn test_document_export_produces_pdf() {
    let topology = sample_topology();
    let mut controller = ViewController::new(topology, ViewConfig::default());
    controller.select_adapter(LayoutKind::Flow);
    let view = controller.render();

    let stats = controller.stats();
    let meta = DocumentMeta {
        title: "Integration landscape".to_string(),
        system_count: stats.total_systems,
        connection_count: stats.total_connections,
    };

    let artifact = export_document(&view, &meta, &ExportConfig::default())
        .await
        .unwrap();

    assert!(artifact.pdf.starts_with(b"%PDF"));
    assert!(artifact.file_name.starts_with("topology-flow-"));
    assert!(artifact.file_name.ends_with(".pdf"));
}

#[tokio::test]
async fn test_document_export_respects_the_deadline() {
    let config = ExportConfig {
        capture_timeout: Duration::from_millis(20),
        ..ExportConfig::default()
    };
    let err = export_document(&SlowCapture, &DocumentMeta::default(), &config)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CaptureTimeout(_)));
}

#[tokio::test]
async fn test_artifacts_can_be_written_to_disk() {
    let mut controller = ViewController::new(sample_topology(), ViewConfig::default());
    let view = controller.render();
    let artifact = export_raster(&view, &ExportConfig::default()).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(&artifact.file_name);
    std::fs::write(&path, &artifact.png).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), artifact.png);
}
