//! SVG rendering of layout geometry.
//!
//! Each adapter gets its own renderer; all share the same document
//! skeleton (background, arrowhead defs, a zoom/pan transform group and
//! an optional legend overlay). The markup is self-contained so the
//! export pipeline can serialize it verbatim as a standalone SVG.

use crate::controller::LayoutGeometry;
use toposcope_layout::{
    format_volume, FlowLayout, ForceLayout, MatrixCellKind, MatrixLayout, Point, TransitionMatrix,
};
use toposcope_model::Quality;

const BACKGROUND: &str = "#FFFFFF";
const NODE_FILL: &str = "#2196F3";
const SELF_FILL: &str = "#CFD8DC";
const EMPTY_FILL: &str = "#ECEFF1";
const HEAT_FILL: &str = "#1565C0";
const FLOW_EDGE: &str = "#90A4AE";
const TEXT_DARK: &str = "#263238";
const TEXT_LIGHT: &str = "#FFFFFF";
const ARROW_FILL: &str = "#666666";
const FONT: &str = "Helvetica, Arial, sans-serif";

const NODE_RADIUS: f64 = 16.0;
const MATRIX_GUTTER: f64 = 90.0;
const MATRIX_MARGIN: f64 = 20.0;

/// Ambient view state threaded into every renderer.
pub(crate) struct RenderContext {
    pub zoom: f64,
    pub pan: Point,
    pub legend: bool,
    pub width: f64,
    pub height: f64,
}

/// Renders the geometry into a complete standalone SVG document.
pub(crate) fn render_svg(geometry: &LayoutGeometry, ctx: &RenderContext) -> String {
    let mut svg = String::with_capacity(4096);
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = ctx.width,
        h = ctx.height
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        BACKGROUND
    ));
    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        ARROW_FILL
    ));
    svg.push_str("</defs>");

    // Zoom and pan apply to the diagram, not to the legend overlay.
    svg.push_str(&format!(
        "<g transform=\"translate({:.2} {:.2}) scale({:.3})\">",
        ctx.pan.x, ctx.pan.y, ctx.zoom
    ));

    match geometry {
        LayoutGeometry::Network(layout) => render_network(layout, &mut svg),
        LayoutGeometry::Matrix(layout) => render_matrix(layout, ctx, &mut svg),
        LayoutGeometry::Flow(layout) => render_flow(layout, &mut svg),
        LayoutGeometry::Transition(matrix) => render_transition(matrix, ctx, &mut svg),
        LayoutGeometry::Placeholder(message) => render_placeholder(message, ctx, &mut svg),
    }

    svg.push_str("</g>");

    if ctx.legend && !matches!(geometry, LayoutGeometry::Placeholder(_)) {
        render_legend(ctx, &mut svg);
    }

    svg.push_str("</svg>");
    svg
}

fn render_network(layout: &ForceLayout, svg: &mut String) {
    for curve in layout.edge_curves() {
        // Trim the end so the arrowhead meets the node rim, not its center.
        let trim = (curve.end - curve.control).normalized() * NODE_RADIUS;
        let end = curve.end - trim;
        svg.push_str(&format!(
            "<path d=\"M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" marker-end=\"url(#arrow)\"/>",
            curve.start.x, curve.start.y, curve.control.x, curve.control.y, end.x, end.y,
            curve.quality.color()
        ));
    }

    for node in layout.nodes() {
        svg.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.5\"/>",
            node.position.x, node.position.y, NODE_RADIUS, NODE_FILL, TEXT_DARK
        ));
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"12\" fill=\"{}\">{}</text>",
            node.position.x,
            node.position.y + NODE_RADIUS + 14.0,
            FONT,
            TEXT_DARK,
            escape_xml(&node.name)
        ));
    }
}

fn render_matrix(layout: &MatrixLayout, ctx: &RenderContext, svg: &mut String) {
    let n = layout.size();
    let cell = cell_size(ctx, n);

    draw_axis_labels(&layout.systems, cell, svg);

    for matrix_cell in &layout.cells {
        let x = MATRIX_GUTTER + matrix_cell.col as f64 * cell;
        let y = MATRIX_GUTTER + matrix_cell.row as f64 * cell;
        let fill = match matrix_cell.kind {
            MatrixCellKind::SelfCell => SELF_FILL,
            MatrixCellKind::Empty => EMPTY_FILL,
            MatrixCellKind::Link { quality, .. } => quality.color(),
        };
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"0.5\"/>",
            x, y, cell, cell, fill, BACKGROUND
        ));

        let glyph = matrix_cell.kind.glyph();
        if !glyph.is_empty() {
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{:.0}\" fill=\"{}\">{}</text>",
                x + cell / 2.0,
                y + cell / 2.0,
                FONT,
                (cell * 0.45).min(16.0),
                TEXT_LIGHT,
                glyph
            ));
        }
    }
}

fn render_flow(layout: &FlowLayout, svg: &mut String) {
    for edge in &layout.edges {
        let (Some(source), Some(target)) = (layout.node(&edge.source), layout.node(&edge.target))
        else {
            continue;
        };
        let x1 = source.x + FlowLayout::NODE_WIDTH;
        let y1 = source.y + source.height / 2.0;
        let x2 = target.x;
        let y2 = target.y + target.height / 2.0;
        let bend = (x2 - x1) / 2.0;
        svg.push_str(&format!(
            "<path d=\"M {:.2} {:.2} C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\" stroke-opacity=\"0.55\"><title>{}</title></path>",
            x1, y1, x1 + bend, y1, x2 - bend, y2, x2, y2,
            FLOW_EDGE, edge.thickness, escape_xml(&edge.tooltip)
        ));
    }

    for node in &layout.nodes {
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{}\" height=\"{:.2}\" fill=\"{}\"/>",
            node.x, node.y, FlowLayout::NODE_WIDTH, node.height, NODE_FILL
        ));
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"12\" fill=\"{}\">{} ({})</text>",
            node.x + FlowLayout::NODE_WIDTH + 6.0,
            node.y + node.height / 2.0 + 4.0,
            FONT,
            TEXT_DARK,
            escape_xml(&node.name),
            format_volume(node.throughput)
        ));
    }
}

fn render_transition(matrix: &TransitionMatrix, ctx: &RenderContext, svg: &mut String) {
    let n = matrix.size();
    let cell = cell_size(ctx, n);

    draw_axis_labels(&matrix.systems, cell, svg);

    for (row, cells) in matrix.rows.iter().enumerate() {
        for (col, transition) in cells.iter().enumerate() {
            let x = MATRIX_GUTTER + col as f64 * cell;
            let y = MATRIX_GUTTER + row as f64 * cell;
            svg.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" fill-opacity=\"{:.3}\" stroke=\"{}\" stroke-width=\"0.5\"/>",
                x, y, cell, cell, HEAT_FILL, transition.probability, TEXT_DARK
            ));
            if transition.show_text {
                let color = if transition.light_text { TEXT_LIGHT } else { TEXT_DARK };
                svg.push_str(&format!(
                    "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{:.0}\" fill=\"{}\">{:.0}%</text>",
                    x + cell / 2.0,
                    y + cell / 2.0,
                    FONT,
                    (cell * 0.3).min(12.0),
                    color,
                    transition.probability * 100.0
                ));
            }
        }
    }
}

fn render_placeholder(message: &str, ctx: &RenderContext, svg: &mut String) {
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"16\" fill=\"{}\">{}</text>",
        ctx.width / 2.0,
        ctx.height / 2.0,
        FONT,
        TEXT_DARK,
        escape_xml(message)
    ));
}

fn render_legend(ctx: &RenderContext, svg: &mut String) {
    let x = ctx.width - 170.0;
    let mut y = 24.0;
    svg.push_str("<g id=\"legend\">");
    for quality in [Quality::Automated, Quality::SemiAutomated, Quality::Manual] {
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"12\" height=\"12\" fill=\"{}\"/>",
            x,
            y - 10.0,
            quality.color()
        ));
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"12\" fill=\"{}\">{}</text>",
            x + 18.0,
            y,
            FONT,
            TEXT_DARK,
            quality.label()
        ));
        y += 20.0;
    }
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"12\" fill=\"{}\">→ one-way &#160; ↔ bidirectional</text>",
        x, y, FONT, TEXT_DARK
    ));
    svg.push_str("</g>");
}

fn cell_size(ctx: &RenderContext, n: usize) -> f64 {
    let usable = ctx.width.min(ctx.height) - MATRIX_GUTTER - MATRIX_MARGIN;
    (usable / n.max(1) as f64).min(60.0)
}

fn draw_axis_labels(
    systems: &[toposcope_model::System],
    cell: f64,
    svg: &mut String,
) {
    for (i, system) in systems.iter().enumerate() {
        let center = MATRIX_GUTTER + i as f64 * cell + cell / 2.0;
        // Column header, rotated to fit.
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"start\" font-family=\"{}\" font-size=\"11\" fill=\"{}\" transform=\"rotate(-45 {:.2} {:.2})\">{}</text>",
            center,
            MATRIX_GUTTER - 8.0,
            FONT,
            TEXT_DARK,
            center,
            MATRIX_GUTTER - 8.0,
            escape_xml(&system.name)
        ));
        // Row label.
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" font-family=\"{}\" font-size=\"11\" fill=\"{}\">{}</text>",
            MATRIX_GUTTER - 8.0,
            center + 4.0,
            FONT,
            TEXT_DARK,
            escape_xml(&system.name)
        ));
    }
}

pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
