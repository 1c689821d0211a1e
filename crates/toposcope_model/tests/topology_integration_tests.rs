//! Integration tests for the topology model.
//!
//! Exercises editing sessions end to end: cascades, bidirectional pairs,
//! and filter monotonicity across every predicate combination.

use toposcope_model::{ConnectionFilter, Direction, Quality, Topology};

#[test]
fn test_bidirectional_pair_is_two_identical_legs() {
    let mut topology = Topology::new();
    let a = topology.add_system("A").id;
    let b = topology.add_system("B").id;

    let created = topology
        .add_connection(&a, &b, Direction::Bidirectional, Quality::Automated, Some(20.0))
        .unwrap();

    assert_eq!(created.len(), 2);
    assert_eq!(created[0].source, a);
    assert_eq!(created[0].target, b);
    assert_eq!(created[1].source, b);
    assert_eq!(created[1].target, a);
    for conn in &created {
        assert_eq!(conn.quality, Quality::Automated);
        assert_eq!(conn.volume, 20.0);
    }
}

#[test]
fn test_cascade_removal_after_edits() {
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
    topology
        .add_connection(&b, &c, Direction::Bidirectional, Quality::Manual, None)
        .unwrap();

    topology.remove_system(&b).unwrap();

    assert_eq!(topology.system_count(), 2);
    assert_eq!(topology.connection_count(), 1);
    assert!(topology.connection(&a, &c).is_some());
}

#[test]
fn test_filter_monotonicity_for_every_predicate() {
    let mut topology = Topology::new();
    let a = topology.add_system("A").id;
    let b = topology.add_system("B").id;
    let c = topology.add_system("C").id;
    topology
        .add_connection(&a, &b, Direction::OneWay, Quality::Automated, None)
        .unwrap();
    topology
        .add_connection(&b, &c, Direction::Bidirectional, Quality::SemiAutomated, None)
        .unwrap();
    topology
        .add_connection(&c, &a, Direction::OneWay, Quality::Manual, None)
        .unwrap();

    let total = topology.connection_count();

    // All 32 combinations of the five booleans.
    for bits in 0..32u8 {
        let filter = ConnectionFilter {
            automated: bits & 1 != 0,
            semi_automated: bits & 2 != 0,
            manual: bits & 4 != 0,
            one_way: bits & 8 != 0,
            bidirectional: bits & 16 != 0,
        };
        let filtered = topology.filter(&filter);
        assert!(filtered.connection_count() <= total);
        assert_eq!(filtered.system_count(), topology.system_count());

        // Filtering never fabricates edges: every survivor exists upstream.
        for conn in filtered.connections() {
            assert!(topology.connection(&conn.source, &conn.target).is_some());
        }
    }
}

#[test]
fn test_empty_filter_result_still_renders_systems() {
    let mut topology = Topology::new();
    let a = topology.add_system("A").id;
    let b = topology.add_system("B").id;
    topology
        .add_connection(&a, &b, Direction::Bidirectional, Quality::Manual, None)
        .unwrap();

    // Automated-only, one-way-only against a manual bidirectional edge.
    let filter = ConnectionFilter {
        automated: true,
        semi_automated: false,
        manual: false,
        one_way: true,
        bidirectional: false,
    };
    let filtered = topology.filter(&filter);
    assert_eq!(filtered.connection_count(), 0);
    assert_eq!(filtered.system_count(), 2);
}
