//! Navigation invariants checked over every node of the sample tour.

use shared::NodeIndex;
use walkthrough_lib::fixtures;
use walkthrough_lib::harness::TestHarness;

#[test]
fn test_next_cycles_back_to_start() {
    let node_count = fixtures::sample_files().len();
    for start in 1..=node_count as NodeIndex {
        let mut h = TestHarness::with_sample_tour();
        assert!(h.tour.enter_panorama(start));
        for _ in 0..node_count {
            assert!(h.tour.navigate_next());
        }
        assert_eq!(h.tour.active_node(), Some(start));
    }
}

#[test]
fn test_prev_undoes_next() {
    for start in 1..=4 {
        let mut h = TestHarness::with_sample_tour();
        h.tour.enter_panorama(start);
        h.tour.navigate_next();
        h.tour.navigate_prev();
        assert_eq!(h.tour.active_node(), Some(start));
    }
}

#[test]
fn test_floor_markers_match_graph_neighbors() {
    let graph = fixtures::sample_graph();
    for node in graph.nodes() {
        let mut h = TestHarness::with_sample_tour();
        h.tour.enter_panorama(node.index);
        assert_eq!(h.floor_targets(), graph.neighbors_of(node.index));
        assert!(!h.floor_targets().contains(&node.index));
    }
}

#[test]
fn test_exit_restores_camera_after_any_route() {
    let mut h = TestHarness::with_sample_tour();
    h.complete_pending_loads();
    let before = h.tour.renderer().camera;

    h.tour.enter_panorama(1);
    h.tour.navigate_to(2);
    h.tour.navigate_to(4);
    h.tour.navigate_prev();
    h.tour.exit_panorama();

    assert_eq!(h.tour.renderer().camera, before);
    assert_eq!(h.hotspot_count(), 4);
}
