//! End-to-end demo: build (or load) a topology, render one of the four
//! views, and write PNG, SVG and PDF artifacts next to each other.
//!
//! ```text
//! cargo run -p topology_export -- --view flow --out /tmp/exports
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use toposcope_export::{export_document, export_raster, export_vector, DocumentMeta, ExportConfig};
use toposcope_layout::LayoutKind;
use toposcope_model::{Direction, Quality, Topology};
use toposcope_view::{ViewConfig, ViewController};

#[derive(Parser, Debug)]
#[command(name = "topology_export", about = "Render a topology view and export it")]
struct Args {
    /// View to render: network, matrix, flow or transition
    #[arg(long, default_value = "network")]
    view: String,

    /// Directory the artifacts are written into
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Optional topology JSON file; a built-in sample is used otherwise
    #[arg(long)]
    input: Option<PathBuf>,

    /// Report title
    #[arg(long, default_value = "Topology report")]
    title: String,

    /// Zoom factor, clamped to the controller's bounds
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    /// Hide the legend overlay
    #[arg(long)]
    no_legend: bool,
}

/// A small integration landscape with every quality and both directions.
fn sample_topology() -> Topology {
    let mut topology = Topology::new();
    let crm = topology.add_system("CRM").id;
    let billing = topology.add_system("Billing").id;
    let warehouse = topology.add_system("Warehouse").id;
    let reporting = topology.add_system("Reporting").id;

    let mut add = |src, dst, dir, quality, volume| {
        topology
            .add_connection(src, dst, dir, quality, Some(volume))
            .expect("sample topology is well-formed");
    };
    add(&crm, &billing, Direction::Bidirectional, Quality::Automated, 40.0);
    add(&billing, &warehouse, Direction::OneWay, Quality::SemiAutomated, 15.0);
    add(&crm, &reporting, Direction::OneWay, Quality::Manual, 5.0);
    add(&warehouse, &reporting, Direction::OneWay, Quality::Automated, 25.0);
    topology
}

fn load_topology(args: &Args) -> Result<Topology> {
    match &args.input {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok(sample_topology()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let Some(kind) = LayoutKind::ALL.into_iter().find(|k| k.as_str() == args.view) else {
        bail!("unknown view '{}'; expected one of network, matrix, flow, transition", args.view);
    };

    let topology = load_topology(&args)?;
    let mut controller = ViewController::new(topology, ViewConfig::default());
    controller.select_adapter(kind);
    controller.set_zoom(args.zoom);
    if args.no_legend {
        controller.toggle_legend();
    }

    let view = controller.render();
    let stats = controller.stats();
    info!(
        "rendered {} view: {} systems, {} connections ({} after filtering)",
        kind.as_str(),
        stats.total_systems,
        stats.total_connections,
        stats.filtered_connections
    );

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    let config = ExportConfig::default();

    let raster = export_raster(&view, &config).await?;
    let raster_path = args.out.join(&raster.file_name);
    std::fs::write(&raster_path, &raster.png)?;
    println!("wrote {} ({}x{})", raster_path.display(), raster.width, raster.height);

    let vector = export_vector(&view)?;
    let vector_path = args.out.join(&vector.file_name);
    std::fs::write(&vector_path, &vector.svg)?;
    println!("wrote {}", vector_path.display());

    let meta = DocumentMeta {
        title: args.title.clone(),
        system_count: stats.total_systems,
        connection_count: stats.total_connections,
    };
    let document = export_document(&view, &meta, &config).await?;
    let document_path = args.out.join(&document.file_name);
    std::fs::write(&document_path, &document.pdf)?;
    println!("wrote {}", document_path.display());

    Ok(())
}
