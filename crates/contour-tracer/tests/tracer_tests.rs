//! Integration tests for contour tracing, sampling and label validation.

use std::collections::HashSet;

use contour_tracer::{
    ContourLineProcessor, ContourNodeStorage, ContourPixel, Direction, GridPosition, NodeHandle,
    TracerError,
};
use test_utils::{
    assert_approx_eq, assert_position_approx_eq, create_concentric_loops, create_empty_raster,
    create_noisy_raster, draw_horizontal_line, draw_rectangle_loop, raster_from_ascii,
    rectangle_loop_len, BLOCKED_SINGLE_PIXEL, DOWN_LEFT_RETRY, MERGING_CHAINS, SQUARE_LOOP,
    STRAIGHT_ROW,
};

fn traced(grid: &str, level: u8) -> (ContourLineProcessor, Vec<i32>) {
    let mut raster = raster_from_ascii(grid, level);
    let mut processor = ContourLineProcessor::new();
    processor
        .build_graph(&mut raster.codes, raster.width, raster.height)
        .unwrap();
    (processor, raster.codes)
}

fn chain_positions(processor: &ContourLineProcessor, root: NodeHandle) -> Vec<(usize, usize)> {
    let graph = processor.graph();
    graph
        .chain(root)
        .map(|h| {
            let p = graph.node(h).grid_position;
            (p.x, p.y)
        })
        .collect()
}

// ============================================================================
// build_graph tests
// ============================================================================

#[test]
fn test_empty_raster_has_no_chains() {
    let mut raster = create_empty_raster(16, 8);
    let mut processor = ContourLineProcessor::new();
    let graph = processor.build_graph(&mut raster, 16, 8).unwrap();

    assert_eq!(graph.node_count(), 0);
    assert!(graph.storage().is_empty());
    assert!(processor.sample_label_positions(1).is_empty());
}

#[test]
fn test_isolated_pixel_is_single_node_chain() {
    let mut raster = create_empty_raster(3, 3);
    raster[4] = ContourPixel::on_contour(2, Direction::East).encode();
    let mut processor = ContourLineProcessor::new();
    processor.build_graph(&mut raster, 3, 3).unwrap();

    let roots = processor.graph().roots(2);
    assert_eq!(roots.len(), 1);
    assert_eq!(processor.graph().chain_len(roots[0]), 1);

    assert_eq!(processor.sample_label_positions(1).edge_at(2).len(), 1);
    assert!(processor.sample_label_positions(2).edge_at(2).is_empty());
}

#[test]
fn test_straight_row_end_to_end() {
    let (mut processor, codes) = traced(STRAIGHT_ROW, 5);

    let roots = processor.graph().roots(5).to_vec();
    assert_eq!(roots.len(), 1);
    assert_eq!(processor.graph().storage().total_roots(), 1);
    assert_eq!(
        chain_positions(&processor, roots[0]),
        vec![(0, 2), (1, 2), (2, 2), (3, 2)]
    );
    for x in 0..4 {
        assert_eq!(processor.level_at(x, 2), Some(5));
    }

    // Flags are written back into the raster.
    let head = ContourPixel::decode(codes[8]);
    assert!(head.starting_pixel && head.processed && !head.has_parent);
    let tail = ContourPixel::decode(codes[11]);
    assert!(tail.processed && tail.has_parent && !tail.starting_pixel);

    let candidates = processor.sample_label_positions(2);
    let anchors = candidates.edge_at(5);
    assert_eq!(anchors.len(), 2);
    assert!(anchors.iter().all(|a| a.depth == 5));
    assert_position_approx_eq!(anchors[0].normalised_position, (1.0 / 6.0, 2.0 / 3.0), 1e-5);
    assert_position_approx_eq!(anchors[1].normalised_position, (5.0 / 6.0, 2.0 / 3.0), 1e-5);
}

#[test]
fn test_level_query_outside_raster() {
    let (processor, _) = traced(STRAIGHT_ROW, 5);
    assert_eq!(processor.level_at(4, 0), None);
    assert_eq!(processor.level_at(0, 4), None);
    assert_eq!(processor.level_at(0, 0), Some(0));
}

#[test]
fn test_square_loop_is_circular() {
    let (mut processor, _) = traced(SQUARE_LOOP, 9);
    assert_eq!(processor.last_stats().closed_loops, 1);

    let roots = processor.graph().roots(9).to_vec();
    assert_eq!(roots.len(), 1);
    assert_eq!(processor.graph().chain_len(roots[0]), 8);

    let candidates = processor.sample_label_positions(100);
    let centre = candidates.centre_at(9);
    assert_eq!(centre.len(), 1);
    assert!(centre[0].circular);
    assert_eq!(centre[0].pixel_count, 8);
    assert_eq!(centre[0].label.grid_position, GridPosition::new(2, 2));
    assert_position_approx_eq!(centre[0].label.normalised_position, (0.5, 0.5), 1e-5);
}

#[test]
fn test_rectangle_loop_sampling_visits_each_node_once() {
    let (width, height) = (12, 10);
    let mut raster = create_empty_raster(width, height);
    draw_rectangle_loop(&mut raster, width, (2, 1), (9, 7), 12);
    let expected = rectangle_loop_len((2, 1), (9, 7));

    let mut processor = ContourLineProcessor::new();
    processor.build_graph(&mut raster, width, height).unwrap();

    let candidates = processor.sample_label_positions(2);
    let centre = candidates.centre_at(12);
    assert_eq!(centre.len(), 1);
    assert_eq!(centre[0].pixel_count, expected);
    assert!(centre[0].circular);
    assert_eq!(candidates.edge_at(12).len(), expected / 2);
}

#[test]
fn test_open_line_is_not_circular() {
    let (mut processor, _) = traced(STRAIGHT_ROW, 1);
    let candidates = processor.sample_label_positions(10);
    assert!(!candidates.centre_at(1)[0].circular);
    assert_eq!(candidates.centre_at(1)[0].pixel_count, 4);
}

#[test]
fn test_merging_chains_keep_one_root() {
    let (processor, codes) = traced(MERGING_CHAINS, 1);
    let stats = processor.last_stats();
    assert_eq!(stats.chains_started, 2);
    assert_eq!(stats.chains_merged, 1);

    let roots = processor.graph().roots(1).to_vec();
    assert_eq!(roots.len(), 1);
    assert_eq!(
        chain_positions(&processor, roots[0]),
        vec![(0, 1), (1, 1), (2, 1), (3, 1), (3, 0), (4, 0), (5, 0)]
    );

    // The absorbed head keeps its starting flag and gains a parent.
    let absorbed = ContourPixel::decode(codes[3]);
    assert!(absorbed.starting_pixel && absorbed.has_parent);
}

#[test]
fn test_down_left_step_retries_straight_down() {
    let (processor, _) = traced(DOWN_LEFT_RETRY, 4);
    let roots = processor.graph().roots(4).to_vec();

    assert_eq!(roots.len(), 1);
    assert_eq!(
        chain_positions(&processor, roots[0]),
        vec![(2, 1), (2, 0), (1, 0)]
    );
    assert_eq!(processor.last_stats().chains_merged, 2);
    assert_eq!(processor.last_stats().chains_pruned, 0);
}

#[test]
fn test_blocked_single_pixel_is_pruned() {
    let (processor, codes) = traced(BLOCKED_SINGLE_PIXEL, 4);
    let roots = processor.graph().roots(4).to_vec();

    assert_eq!(roots.len(), 1);
    assert_eq!(chain_positions(&processor, roots[0]), vec![(2, 0), (1, 0)]);
    assert_eq!(processor.last_stats().chains_pruned, 1);

    let pruned = ContourPixel::decode(codes[4]);
    assert!(pruned.processed && pruned.has_parent);
}

#[test]
fn test_chain_stops_at_level_change() {
    let mut raster = create_empty_raster(6, 1);
    draw_horizontal_line(&mut raster, 6, 0, 0, 2, 3);
    draw_horizontal_line(&mut raster, 6, 0, 3, 5, 4);

    let mut processor = ContourLineProcessor::new();
    processor.build_graph(&mut raster, 6, 1).unwrap();

    let graph = processor.graph();
    assert_eq!(graph.roots(3).len(), 1);
    assert_eq!(graph.roots(4).len(), 1);
    assert_eq!(graph.chain_len(graph.roots(3)[0]), 3);
    assert_eq!(graph.chain_len(graph.roots(4)[0]), 3);
}

#[test]
fn test_out_of_range_level_is_dropped() {
    let mut raster = create_empty_raster(4, 1);
    let mut px = ContourPixel::on_contour(0, Direction::East);
    px.contour_level = 200;
    raster[1] = px.encode();

    let mut processor = ContourLineProcessor::new();
    processor.build_graph(&mut raster, 4, 1).unwrap();

    assert_eq!(processor.graph().node_count(), 0);
    assert!(processor.graph().storage().is_empty());
    assert_eq!(processor.last_stats().invalid_levels, 1);
    assert!(ContourPixel::decode(raster[1]).processed);
    assert_eq!(processor.level_at(1, 0), Some(200));
}

#[test]
fn test_direction_error_pixels_are_skipped() {
    let (processor, codes) = traced("0x0.", 2);
    let graph = processor.graph();

    // The error pixel splits the row into two single-node chains.
    assert_eq!(graph.roots(2).len(), 2);
    assert_eq!(graph.node_at(1, 0), None);
    assert!(ContourPixel::decode(codes[1]).processed);
}

#[test]
fn test_already_processed_pixels_are_skipped() {
    let mut raster = raster_from_ascii(STRAIGHT_ROW, 5);
    let mut processor = ContourLineProcessor::new();
    processor
        .build_graph(&mut raster.codes, raster.width, raster.height)
        .unwrap();

    // Feeding the written-back raster again finds nothing left to trace.
    processor
        .build_graph(&mut raster.codes, raster.width, raster.height)
        .unwrap();
    assert_eq!(processor.graph().node_count(), 0);
}

#[test]
fn test_rejects_size_mismatch() {
    let mut raster = vec![0; 10];
    let mut processor = ContourLineProcessor::new();
    let err = processor.build_graph(&mut raster, 4, 4).unwrap_err();
    assert_eq!(
        err,
        TracerError::RasterSizeMismatch {
            width: 4,
            height: 4,
            expected: 16,
            actual: 10
        }
    );
}

#[test]
fn test_rejects_zero_dimension() {
    let mut raster = Vec::new();
    let mut processor = ContourLineProcessor::new();
    assert!(matches!(
        processor.build_graph(&mut raster, 0, 4),
        Err(TracerError::InvalidDimensions { width: 0, height: 4 })
    ));
}

#[test]
fn test_new_frame_discards_previous_graph() {
    let mut processor = ContourLineProcessor::new();

    let mut first = raster_from_ascii(SQUARE_LOOP, 9);
    processor
        .build_graph(&mut first.codes, first.width, first.height)
        .unwrap();
    assert_eq!(processor.graph().roots(9).len(), 1);

    let mut second = create_empty_raster(3, 2);
    draw_horizontal_line(&mut second, 3, 1, 0, 2, 1);
    processor.build_graph(&mut second, 3, 2).unwrap();

    assert!(processor.graph().roots(9).is_empty());
    assert_eq!(processor.graph().roots(1).len(), 1);
    assert_eq!(processor.graph().width(), 3);
}

#[test]
fn test_noisy_raster_chains_are_disjoint() {
    let (width, height) = (64, 48);
    let mut raster = create_noisy_raster(width, height, 2, 6, 7);
    let mut processor = ContourLineProcessor::new();
    processor.build_graph(&mut raster, width, height).unwrap();

    let graph = processor.graph();
    let mut seen = HashSet::new();
    for (level, roots) in graph.storage().iter_levels() {
        for &root in roots {
            assert_eq!(graph.node(root).level as usize, level);
            for handle in graph.chain(root) {
                assert!(seen.insert(handle), "node {:?} reached twice", handle);
                assert_eq!(graph.node(handle).level as usize, level);
            }
        }
    }
    assert!(seen.len() <= graph.node_count());

    // Every pixel is processed once tracing is done.
    assert!(raster.iter().all(|&c| c == 0 || ContourPixel::decode(c).processed));
}

#[test]
fn test_concentric_loops_one_root_per_ring() {
    let raster_size = (40, 30);
    let mut raster = create_concentric_loops(raster_size.0, raster_size.1, 4);
    let mut processor = ContourLineProcessor::new();
    processor
        .build_graph(&mut raster, raster_size.0, raster_size.1)
        .unwrap();

    let stats = processor.last_stats();
    assert!(stats.closed_loops > 1);
    assert_eq!(processor.graph().storage().total_roots(), stats.closed_loops);
}

// ============================================================================
// sampling tests
// ============================================================================

#[test]
fn test_spacing_gives_floor_of_chain_length() {
    let width = 23;
    for spacing in [1usize, 2, 3, 5, 7, 23, 24] {
        let mut raster = create_empty_raster(width, 1);
        draw_horizontal_line(&mut raster, width, 0, 0, width - 1, 0);
        let mut processor = ContourLineProcessor::new();
        processor.build_graph(&mut raster, width, 1).unwrap();

        let candidates = processor.sample_label_positions(spacing);
        assert_eq!(candidates.edge_at(0).len(), width / spacing, "spacing {}", spacing);
    }
}

#[test]
fn test_resampling_same_frame_is_stable() {
    let (mut processor, _) = traced(SQUARE_LOOP, 9);
    let first = processor.sample_label_positions(3);
    let second = processor.sample_label_positions(3);

    assert_eq!(first.edge_count(), second.edge_count());
    assert_eq!(first.centre_at(9)[0].pixel_count, second.centre_at(9)[0].pixel_count);
    assert_eq!(processor.generation(), 2);
}

#[test]
fn test_anchor_rotation_uses_pixel_angle() {
    let mut raster = create_empty_raster(8, 1);
    for x in 0..8 {
        raster[x] = ContourPixel::on_contour(1, Direction::East)
            .with_angle(64)
            .encode();
    }
    let mut processor = ContourLineProcessor::new();
    processor.build_graph(&mut raster, 8, 1).unwrap();

    let candidates = processor.sample_label_positions(8);
    assert_eq!(candidates.edge_at(1).len(), 1);
    assert_approx_eq!(candidates.edge_at(1)[0].rotation, 90.0, 1e-4);
    assert_eq!(candidates.edge_at(1)[0].grid_position, GridPosition::new(2, 0));
}

// ============================================================================
// validation tests
// ============================================================================

#[test]
fn test_sampled_labels_validate_on_same_frame() {
    let (mut processor, _) = traced(STRAIGHT_ROW, 5);
    let candidates = processor.sample_label_positions(2);

    for old in candidates.edge_at(5) {
        let new = processor.validate_label(old, 1).expect("label should stay valid");
        assert_eq!(new.depth, old.depth);
        assert_eq!(new.grid_position, old.grid_position);
        assert_approx_eq!(new.rotation, old.rotation, 1e-6);
    }
}

#[test]
fn test_validation_follows_shifted_contour() {
    let mut processor = ContourLineProcessor::new();

    let mut raster = create_empty_raster(8, 6);
    draw_horizontal_line(&mut raster, 8, 2, 0, 7, 3);
    processor.build_graph(&mut raster, 8, 6).unwrap();
    let old = processor.sample_label_positions(8).edge_at(3)[0];

    // One row down: still inside the window.
    let mut raster = create_empty_raster(8, 6);
    draw_horizontal_line(&mut raster, 8, 3, 0, 7, 3);
    processor.build_graph(&mut raster, 8, 6).unwrap();
    let moved = processor.validate_label(&old, 1).expect("still near");
    assert_position_approx_eq!(moved.normalised_position, (2.0 / 7.0, 3.0 / 5.0), 1e-5);

    // Three rows down: gone.
    let mut raster = create_empty_raster(8, 6);
    draw_horizontal_line(&mut raster, 8, 5, 0, 7, 3);
    processor.build_graph(&mut raster, 8, 6).unwrap();
    assert!(processor.validate_label(&old, 1).is_none());
    assert!(processor.validate_label(&old, 3).is_some());
}

#[test]
fn test_validation_requires_same_level() {
    let (mut processor, _) = traced(STRAIGHT_ROW, 5);
    let mut old = processor.sample_label_positions(2).edge_at(5)[0];
    old.depth = 6;
    assert!(processor.validate_label(&old, 1).is_none());
}

#[test]
fn test_validated_label_blocks_new_anchors() {
    let mut raster = create_empty_raster(8, 1);
    draw_horizontal_line(&mut raster, 8, 0, 0, 7, 0);
    let mut processor = ContourLineProcessor::new();
    processor.build_graph(&mut raster, 8, 1).unwrap();

    let anchors = processor.sample_label_positions(4).edge_at(0).to_vec();
    assert_eq!(anchors.len(), 2);
    for old in &anchors {
        processor.validate_label(old, 1).unwrap();
    }
    assert!(processor.sample_label_positions(4).edge_at(0).is_empty());
}

// ============================================================================
// storage tests
// ============================================================================

#[test]
fn test_storage_add_is_idempotent() {
    let mut storage = ContourNodeStorage::new();
    assert!(storage.add_node(3, NodeHandle(0)));
    assert!(!storage.add_node(3, NodeHandle(0)));
    assert_eq!(storage.len(3), 1);

    assert!(storage.remove_node(3, NodeHandle(0)));
    assert!(!storage.remove_node(3, NodeHandle(0)));
    assert!(storage.is_empty());
}
