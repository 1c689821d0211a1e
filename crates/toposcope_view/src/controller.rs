//! The view controller.
//!
//! Owns the active adapter selection, zoom/pan state, legend visibility
//! and the active filter. Geometry is computed lazily: a topology or
//! filter change invalidates every cached layout, but only the active
//! adapter is recomputed, and only when the next render is requested.
//! Switching adapters never resets zoom, pan or filter.

use crate::error::Result;
use crate::render::{render_svg, RenderContext};
use crate::RenderedView;
use log::debug;
use std::collections::HashMap;
use toposcope_layout::{
    FlowLayout, ForceConfig, ForceLayout, LayoutKind, MatrixLayout, Point, TransitionMatrix,
};
use toposcope_model::{ConnectionFilter, SystemId, Topology, TopologyStats};

/// Zoom factor bounds.
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;

/// Canvas dimensions for rendering and export.
#[derive(Debug, Clone, Copy)]
pub struct ViewConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Computed geometry for one adapter, cached until invalidated.
#[derive(Debug, Clone)]
pub enum LayoutGeometry {
    Network(ForceLayout),
    Matrix(MatrixLayout),
    Flow(FlowLayout),
    Transition(TransitionMatrix),
    /// The adapter had nothing to draw; the message is rendered centered.
    Placeholder(String),
}

/// Controller over the four layout adapters and the shared view state.
#[derive(Debug, Clone)]
pub struct ViewController {
    topology: Topology,
    filter: ConnectionFilter,
    active: LayoutKind,
    zoom: f64,
    pan: Point,
    legend_visible: bool,
    config: ViewConfig,
    cache: HashMap<LayoutKind, LayoutGeometry>,
}

impl ViewController {
    /// Creates a controller over a topology snapshot, starting on the
    /// network view with an identity filter.
    pub fn new(topology: Topology, config: ViewConfig) -> Self {
        Self {
            topology,
            filter: ConnectionFilter::default(),
            active: LayoutKind::Network,
            zoom: 1.0,
            pan: Point::ZERO,
            legend_visible: true,
            config,
            cache: HashMap::new(),
        }
    }

    // ========== State changes ==========

    /// Replaces the topology snapshot, invalidating all cached geometry.
    pub fn update_topology(&mut self, topology: Topology) {
        self.topology = topology;
        self.invalidate();
    }

    /// Replaces the filter, invalidating all cached geometry.
    pub fn set_filter(&mut self, filter: ConnectionFilter) {
        if filter != self.filter {
            self.filter = filter;
            self.invalidate();
        }
    }

    /// Switches the active adapter. Cached geometry for other adapters is
    /// kept; zoom, pan and filter state carry over.
    pub fn select_adapter(&mut self, kind: LayoutKind) {
        self.active = kind;
    }

    /// Sets the zoom factor, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Offsets the pan by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan = self.pan + Point::new(dx, dy);
    }

    /// Toggles the legend overlay.
    pub fn toggle_legend(&mut self) {
        self.legend_visible = !self.legend_visible;
    }

    fn invalidate(&mut self) {
        debug!("invalidating cached geometry for all adapters");
        self.cache.clear();
    }

    // ========== Accessors ==========

    pub fn active(&self) -> LayoutKind {
        self.active
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn legend_visible(&self) -> bool {
        self.legend_visible
    }

    pub fn filter(&self) -> &ConnectionFilter {
        &self.filter
    }

    /// Summary counters for the surrounding UI.
    pub fn stats(&self) -> TopologyStats {
        self.topology.stats(&self.filter)
    }

    /// Whether geometry for the given adapter is currently cached.
    /// Exposed for lazy-evaluation checks.
    pub fn is_cached(&self, kind: LayoutKind) -> bool {
        self.cache.contains_key(&kind)
    }

    // ========== Interaction ==========

    /// Pins a node of the network layout for a drag interaction
    /// (pointer-down). No-op unless the network geometry is cached.
    pub fn pin_node(&mut self, id: &SystemId, x: f64, y: f64) -> bool {
        match self.cache.get_mut(&LayoutKind::Network) {
            Some(LayoutGeometry::Network(layout)) => layout.pin(id, Point::new(x, y)),
            _ => false,
        }
    }

    /// Releases a pinned node (pointer-up), resuming free simulation.
    pub fn release_node(&mut self, id: &SystemId) -> bool {
        match self.cache.get_mut(&LayoutKind::Network) {
            Some(LayoutGeometry::Network(layout)) => layout.unpin(id),
            _ => false,
        }
    }

    /// Advances the network simulation by one frame, if it is the active
    /// cached geometry. Used by the frame loop during drags.
    pub fn tick_network(&mut self, dt: f64) {
        if let Some(LayoutGeometry::Network(layout)) = self.cache.get_mut(&LayoutKind::Network) {
            layout.tick(dt);
        }
    }

    // ========== Rendering ==========

    fn ensure_geometry(&mut self) {
        if !self.cache.contains_key(&self.active) {
            let filtered = self.topology.filter(&self.filter);
            let geometry = self.compute(self.active, &filtered);
            self.cache.insert(self.active, geometry);
        }
    }

    /// Renders the active adapter, computing its geometry first if the
    /// cache was invalidated. Inactive adapters are left uncomputed.
    pub fn render(&mut self) -> RenderedView {
        self.ensure_geometry();

        let geometry = &self.cache[&self.active];
        let ctx = RenderContext {
            zoom: self.zoom,
            pan: self.pan,
            legend: self.legend_visible,
            width: self.config.width,
            height: self.config.height,
        };
        let svg = render_svg(geometry, &ctx);
        let placeholder = matches!(geometry, LayoutGeometry::Placeholder(_));

        RenderedView::new(
            self.active,
            self.config.width as u32,
            self.config.height as u32,
            svg,
            placeholder,
        )
    }

    /// Serializes the active adapter's geometry to JSON for external
    /// consumers, computing it first if needed. Network geometry
    /// serializes as node states plus edge curves; placeholders as a
    /// message object.
    pub fn geometry_json(&mut self) -> Result<String> {
        self.ensure_geometry();
        let value = match &self.cache[&self.active] {
            LayoutGeometry::Network(layout) => serde_json::json!({
                "nodes": layout.nodes(),
                "curves": layout.edge_curves(),
            }),
            LayoutGeometry::Matrix(layout) => serde_json::to_value(layout)?,
            LayoutGeometry::Flow(layout) => serde_json::to_value(layout)?,
            LayoutGeometry::Transition(matrix) => serde_json::to_value(matrix)?,
            LayoutGeometry::Placeholder(message) => serde_json::json!({
                "placeholder": message,
            }),
        };
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn compute(&self, kind: LayoutKind, filtered: &Topology) -> LayoutGeometry {
        debug!("computing {} geometry", kind.as_str());
        match kind {
            LayoutKind::Network => {
                match ForceLayout::new(
                    filtered,
                    ForceConfig::default(),
                    self.config.width,
                    self.config.height,
                ) {
                    Ok(mut layout) => {
                        layout.run();
                        LayoutGeometry::Network(layout)
                    }
                    Err(e) => LayoutGeometry::Placeholder(placeholder_message(&e)),
                }
            }
            LayoutKind::Matrix => match MatrixLayout::build(filtered) {
                Ok(layout) => LayoutGeometry::Matrix(layout),
                Err(e) => LayoutGeometry::Placeholder(placeholder_message(&e)),
            },
            LayoutKind::Flow => {
                match FlowLayout::build(filtered, self.config.width, self.config.height) {
                    Ok(layout) => LayoutGeometry::Flow(layout),
                    Err(e) => LayoutGeometry::Placeholder(placeholder_message(&e)),
                }
            }
            LayoutKind::Transition => match TransitionMatrix::build(filtered) {
                Ok(matrix) => LayoutGeometry::Transition(matrix),
                Err(e) => LayoutGeometry::Placeholder(placeholder_message(&e)),
            },
        }
    }
}

fn placeholder_message(error: &toposcope_layout::Error) -> String {
    let toposcope_layout::Error::NoRenderableContent(detail) = error;
    format!("Nothing to display: {}", detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use toposcope_model::{Direction, Quality};

    fn sample_topology() -> Topology {
        let mut topology = Topology::new();
        let a = topology.add_system("A").id;
        let b = topology.add_system("B").id;
        topology
            .add_connection(&a, &b, Direction::Bidirectional, Quality::Automated, Some(20.0))
            .unwrap();
        topology
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut controller = ViewController::new(sample_topology(), ViewConfig::default());
        controller.set_zoom(10.0);
        assert_eq!(controller.zoom(), MAX_ZOOM);
        controller.set_zoom(0.01);
        assert_eq!(controller.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_lazy_evaluation_computes_active_only() {
        let mut controller = ViewController::new(sample_topology(), ViewConfig::default());
        controller.select_adapter(LayoutKind::Matrix);
        let _ = controller.render();

        assert!(controller.is_cached(LayoutKind::Matrix));
        assert!(!controller.is_cached(LayoutKind::Network));
        assert!(!controller.is_cached(LayoutKind::Flow));
        assert!(!controller.is_cached(LayoutKind::Transition));
    }

    #[test]
    fn test_filter_change_invalidates_cache() {
        let mut controller = ViewController::new(sample_topology(), ViewConfig::default());
        let _ = controller.render();
        assert!(controller.is_cached(LayoutKind::Network));

        controller.set_filter(ConnectionFilter {
            automated: false,
            ..ConnectionFilter::default()
        });
        assert!(!controller.is_cached(LayoutKind::Network));
    }

    #[test]
    fn test_identical_filter_keeps_cache() {
        let mut controller = ViewController::new(sample_topology(), ViewConfig::default());
        let _ = controller.render();
        controller.set_filter(ConnectionFilter::default());
        assert!(controller.is_cached(LayoutKind::Network));
    }

    #[test]
    fn test_adapter_switch_preserves_view_state() {
        let mut controller = ViewController::new(sample_topology(), ViewConfig::default());
        controller.set_zoom(2.0);
        controller.pan_by(30.0, -10.0);
        let filter = ConnectionFilter {
            manual: false,
            ..ConnectionFilter::default()
        };
        controller.set_filter(filter);

        controller.select_adapter(LayoutKind::Flow);
        assert_eq!(controller.zoom(), 2.0);
        assert_eq!(controller.pan(), Point::new(30.0, -10.0));
        assert_eq!(controller.filter(), &filter);
    }

    #[test]
    fn test_empty_filter_renders_placeholder_for_network() {
        let mut controller = ViewController::new(sample_topology(), ViewConfig::default());
        controller.set_filter(ConnectionFilter {
            automated: false,
            semi_automated: false,
            manual: false,
            ..ConnectionFilter::default()
        });

        let view = controller.render();
        assert!(view.is_placeholder());
        assert!(view.svg().contains("Nothing to display"));
    }

    #[test]
    fn test_matrix_renders_even_with_empty_edge_set() {
        let mut controller = ViewController::new(sample_topology(), ViewConfig::default());
        controller.set_filter(ConnectionFilter {
            automated: false,
            semi_automated: false,
            manual: false,
            ..ConnectionFilter::default()
        });
        controller.select_adapter(LayoutKind::Matrix);

        let view = controller.render();
        assert!(!view.is_placeholder());
    }

    #[test]
    fn test_drag_pins_and_releases() {
        let mut controller = ViewController::new(sample_topology(), ViewConfig::default());
        let id = controller.topology.systems().next().unwrap().id.clone();

        // Not cached yet: the pin has nothing to act on.
        assert!(!controller.pin_node(&id, 100.0, 100.0));

        let _ = controller.render();
        assert!(controller.pin_node(&id, 100.0, 100.0));
        controller.tick_network(1.0 / 60.0);
        assert!(controller.release_node(&id));
    }

    #[test]
    fn test_geometry_json_round_trips() {
        let mut controller = ViewController::new(sample_topology(), ViewConfig::default());
        controller.select_adapter(LayoutKind::Matrix);
        let json = controller.geometry_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("systems").is_some() || value.get("cells").is_some());
    }

    #[test]
    fn test_geometry_json_reports_placeholders() {
        let mut controller = ViewController::new(sample_topology(), ViewConfig::default());
        controller.set_filter(ConnectionFilter {
            automated: false,
            semi_automated: false,
            manual: false,
            ..ConnectionFilter::default()
        });
        let json = controller.geometry_json().unwrap();
        assert!(json.contains("placeholder"));
    }

    #[test]
    fn test_stats_follow_the_filter() {
        let controller = ViewController::new(sample_topology(), ViewConfig::default());
        let stats = controller.stats();
        assert_eq!(stats.total_systems, 2);
        assert_eq!(stats.total_connections, 2);
        assert_eq!(stats.filtered_connections, 2);
    }
}
