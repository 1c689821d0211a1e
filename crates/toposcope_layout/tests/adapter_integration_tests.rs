//! Integration tests driving all four adapters from shared topologies,
//! including the cross-adapter consistency scenarios.

use toposcope_layout::{
    ForceConfig, ForceLayout, FlowLayout, MatrixCellKind, MatrixLayout, TransitionMatrix,
};
use toposcope_model::{ConnectionFilter, Direction, Quality, SystemId, Topology};

const EPSILON: f64 = 1e-9;

/// Scenario: two systems, one bidirectional automated connection, volume 20.
fn bidirectional_pair() -> (Topology, SystemId, SystemId) {
    let mut topology = Topology::new();
    let a = topology.add_system("A").id;
    let b = topology.add_system("B").id;
    topology
        .add_connection(&a, &b, Direction::Bidirectional, Quality::Automated, Some(20.0))
        .unwrap();
    (topology, a, b)
}

#[test]
fn test_bidirectional_pair_across_adapters() {
    let (topology, a, b) = bidirectional_pair();

    // Matrix: ↔ glyph in the automated color class on both cells.
    let matrix = MatrixLayout::build(&topology).unwrap();
    let i = matrix.systems.iter().position(|s| s.id == a).unwrap();
    let j = matrix.systems.iter().position(|s| s.id == b).unwrap();
    for (row, col) in [(i, j), (j, i)] {
        let cell = matrix.cell(row, col).unwrap();
        assert_eq!(cell.kind.glyph(), "↔");
        assert!(matches!(
            cell.kind,
            MatrixCellKind::Link { quality: Quality::Automated, .. }
        ));
    }

    // Transition: row for A is {A: 0, B: 1.0}.
    let transition = TransitionMatrix::build(&topology).unwrap();
    assert!(transition.probability(i, i).unwrap().abs() < EPSILON);
    assert!((transition.probability(i, j).unwrap() - 1.0).abs() < EPSILON);

    // Force: two directed entries become two curves.
    let force = ForceLayout::new(&topology, ForceConfig::default(), 800.0, 600.0).unwrap();
    assert_eq!(force.edge_curves().len(), 2);
}

#[test]
fn test_filtered_out_edges_leave_matrix_renderable_only() {
    // One manual bidirectional connection, filtered to automated one-way.
    let mut topology = Topology::new();
    let a = topology.add_system("A").id;
    let b = topology.add_system("B").id;
    topology
        .add_connection(&a, &b, Direction::Bidirectional, Quality::Manual, None)
        .unwrap();

    let filter = ConnectionFilter {
        automated: true,
        semi_automated: false,
        manual: false,
        one_way: true,
        bidirectional: false,
    };
    let filtered = topology.filter(&filter);
    assert_eq!(filtered.connection_count(), 0);

    assert!(ForceLayout::new(&filtered, ForceConfig::default(), 800.0, 600.0).is_err());
    assert!(FlowLayout::build(&filtered, 800.0, 600.0).is_err());

    // Matrix still renders: every system pair, all neutral.
    let matrix = MatrixLayout::build(&filtered).unwrap();
    assert_eq!(matrix.size(), 2);
    assert!(matrix
        .cells
        .iter()
        .all(|cell| matches!(cell.kind, MatrixCellKind::SelfCell | MatrixCellKind::Empty)));

    // Transition is matrix-shaped and renders too, with all-zero rows.
    let transition = TransitionMatrix::build(&filtered).unwrap();
    for row in 0..transition.size() {
        assert!(transition.row_sum(row).unwrap().abs() < EPSILON);
    }
}

#[test]
fn test_matrix_and_transition_share_axis_order() {
    let mut topology = Topology::new();
    for name in ["Billing", "CRM", "Warehouse", "Reporting"] {
        topology.add_system(name);
    }
    let matrix = MatrixLayout::build(&topology).unwrap();
    let transition = TransitionMatrix::build(&topology).unwrap();

    let matrix_order: Vec<&str> = matrix.systems.iter().map(|s| s.name.as_str()).collect();
    let transition_order: Vec<&str> =
        transition.systems.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(matrix_order, transition_order);
}

#[test]
fn test_system_removal_flows_through_adapters() {
    let mut topology = Topology::new();
    let a = topology.add_system("A").id;
    let b = topology.add_system("B").id;
    let c = topology.add_system("C").id;
    topology
        .add_connection(&a, &b, Direction::OneWay, Quality::Automated, Some(30.0))
        .unwrap();
    topology
        .add_connection(&a, &c, Direction::OneWay, Quality::Automated, Some(10.0))
        .unwrap();

    topology.remove_system(&b).unwrap();

    let matrix = MatrixLayout::build(&topology).unwrap();
    assert_eq!(matrix.size(), 2);

    let transition = TransitionMatrix::build(&topology).unwrap();
    let i = transition.systems.iter().position(|s| s.id == a).unwrap();
    // A's only remaining target is C, so the transition is certain.
    assert!((transition.row_sum(i).unwrap() - 1.0).abs() < EPSILON);

    let flow = FlowLayout::build(&topology, 800.0, 600.0).unwrap();
    assert_eq!(flow.nodes.len(), 2);
    assert_eq!(flow.edges.len(), 1);
}

#[test]
fn test_layouts_are_pure_functions_of_the_snapshot() {
    let (topology, _, _) = bidirectional_pair();
    let before = topology.connection_count();

    let _ = MatrixLayout::build(&topology).unwrap();
    let _ = TransitionMatrix::build(&topology).unwrap();
    let _ = FlowLayout::build(&topology, 800.0, 600.0).unwrap();
    let mut force = ForceLayout::new(&topology, ForceConfig::default(), 800.0, 600.0).unwrap();
    force.run();

    // Building and running layouts never mutates the model.
    assert_eq!(topology.connection_count(), before);
    assert_eq!(topology.system_count(), 2);
}
