//! Even-spaced label anchors along traced chains.

use crate::graph::ContourGraph;
use crate::labels::{ContourCentreLabelProps, ContourLabelProps, LabelCandidates};
use crate::node::{GridPosition, NodeHandle, NormalisedPosition};
use crate::pixel::MAX_DEPTH_LEVEL;

/// Nodes averaged into one anchor position.
pub const SMOOTHING_WINDOW: i64 = 5;

/// Node within the window whose angle and grid position the anchor takes.
const SNAPSHOT_SAMPLE: i64 = 2;

/// Anchor being accumulated along a chain.
#[derive(Debug, Clone, Copy)]
struct OpenCandidate {
    sum_x: f32,
    sum_y: f32,
    samples: u32,
    rotation: f32,
    grid_position: GridPosition,
}

impl OpenCandidate {
    fn finish(&self, depth: u8) -> ContourLabelProps {
        let n = self.samples.max(1) as f32;
        ContourLabelProps::new(
            NormalisedPosition::new(self.sum_x / n, self.sum_y / n),
            self.rotation,
            self.grid_position,
            depth,
        )
    }
}

/// Running centroid of a chain.
#[derive(Debug, Clone, Copy, Default)]
struct Centroid {
    sum_x: f32,
    sum_y: f32,
    sum_gx: usize,
    sum_gy: usize,
    count: usize,
}

impl Centroid {
    fn add(&mut self, p: NormalisedPosition, g: GridPosition) {
        self.sum_x += p.x;
        self.sum_y += p.y;
        self.sum_gx += g.x;
        self.sum_gy += g.y;
        self.count += 1;
    }

    fn finish(&self, depth: u8, circular: bool) -> ContourCentreLabelProps {
        let n = self.count.max(1);
        let grid_position = GridPosition::new(
            (self.sum_gx + n / 2) / n,
            (self.sum_gy + n / 2) / n,
        );
        let normalised = NormalisedPosition::new(self.sum_x / n as f32, self.sum_y / n as f32);
        ContourCentreLabelProps {
            label: ContourLabelProps::new(normalised, 0.0, grid_position, depth),
            pixel_count: self.count,
            circular,
        }
    }
}

/// Walk every registered chain and emit label candidates.
///
/// `generation` must differ from every value stamped on the graph's nodes by
/// earlier passes; nodes carrying it are treated as already visited, which is
/// what stops a circular chain. A `spacing` of 0 is treated as 1.
pub fn sample_positions(
    graph: &mut ContourGraph,
    spacing: usize,
    generation: u64,
) -> LabelCandidates {
    let spacing = spacing.max(1) as i64;
    let mut out = LabelCandidates::with_levels(MAX_DEPTH_LEVEL);

    for level in 0..MAX_DEPTH_LEVEL {
        // Roots are copied out so nodes can be stamped while walking.
        let roots: Vec<NodeHandle> = graph.roots(level).to_vec();
        for root in roots {
            let (edge, centre) = sample_chain(graph, root, level as u8, spacing, generation);
            out.edge[level].extend(edge);
            out.centre[level].push(centre);
        }
    }

    out
}

fn sample_chain(
    graph: &mut ContourGraph,
    root: NodeHandle,
    depth: u8,
    spacing: i64,
    generation: u64,
) -> (Vec<ContourLabelProps>, ContourCentreLabelProps) {
    let mut anchors = Vec::new();
    let mut centroid = Centroid::default();
    let mut circular = false;

    let mut creation_count: i64 = 0;
    let mut open: Option<OpenCandidate> = None;

    let mut cursor = Some(root);
    while let Some(handle) = cursor {
        let node = graph.node_mut(handle);
        if node.last_visited_generation == generation {
            circular = true;
            break;
        }
        node.last_visited_generation = generation;
        centroid.add(node.normalised_position, node.grid_position);

        // An existing label anchors here; keep new ones a full spacing away.
        if node.label_placed {
            creation_count = -spacing;
            open = None;
        }

        if creation_count == 0 {
            open = Some(OpenCandidate {
                sum_x: node.normalised_position.x,
                sum_y: node.normalised_position.y,
                samples: 1,
                rotation: node.angle,
                grid_position: node.grid_position,
            });
        } else if creation_count > 0 && creation_count < SMOOTHING_WINDOW {
            if let Some(acc) = open.as_mut() {
                acc.sum_x += node.normalised_position.x;
                acc.sum_y += node.normalised_position.y;
                acc.samples += 1;
                if creation_count == SNAPSHOT_SAMPLE {
                    acc.rotation = node.angle;
                    acc.grid_position = node.grid_position;
                }
            }
        }

        creation_count += 1;
        if creation_count == spacing {
            if let Some(acc) = open.take() {
                anchors.push(acc.finish(depth));
            }
            creation_count = 0;
        }

        cursor = node.child;
    }

    (anchors, centroid.finish(depth, circular))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_chain(graph: &mut ContourGraph, len: usize, level: u8) -> NodeHandle {
        let root = graph.insert_node(0, level, 0.0);
        graph.storage_mut().add_node(level as usize, root);
        let mut prev = root;
        for i in 1..len {
            let h = graph.insert_node(i, level, 0.0);
            graph.link(prev, h);
            prev = h;
        }
        root
    }

    #[test]
    fn test_straight_chain_spacing() {
        for (len, spacing, expected) in [(10, 3, 3), (10, 5, 2), (10, 1, 10), (4, 2, 2), (3, 4, 0)] {
            let mut graph = ContourGraph::new(16, 1);
            straight_chain(&mut graph, len, 7);
            let out = sample_positions(&mut graph, spacing, 1);
            assert_eq!(out.edge_at(7).len(), expected, "len {len} spacing {spacing}");
        }
    }

    #[test]
    fn test_anchor_is_window_mean() {
        let mut graph = ContourGraph::new(11, 1);
        straight_chain(&mut graph, 11, 0);
        let out = sample_positions(&mut graph, 10, 1);
        let anchors = out.edge_at(0);
        assert_eq!(anchors.len(), 1);
        // Mean of x = 0..=4 over a width of 11 pixels.
        assert!((anchors[0].normalised_position.x - 0.2).abs() < 1e-5);
        assert_eq!(anchors[0].grid_position, GridPosition::new(2, 0));
    }

    #[test]
    fn test_circular_chain_visits_each_node_once() {
        let mut graph = ContourGraph::new(4, 1);
        let root = straight_chain(&mut graph, 4, 3);
        let last = NodeHandle(3);
        graph.link(last, root);

        let out = sample_positions(&mut graph, 100, 1);
        let centre = out.centre_at(3)[0];
        assert!(centre.circular);
        assert_eq!(centre.pixel_count, 4);
    }

    #[test]
    fn test_new_generation_revisits() {
        let mut graph = ContourGraph::new(6, 1);
        straight_chain(&mut graph, 6, 1);
        let first = sample_positions(&mut graph, 2, 1);
        let second = sample_positions(&mut graph, 2, 2);
        assert_eq!(first.edge_at(1).len(), 3);
        assert_eq!(second.edge_at(1).len(), 3);
        assert!(!second.centre_at(1)[0].circular);
    }

    #[test]
    fn test_placed_label_delays_next_anchor() {
        let mut graph = ContourGraph::new(12, 1);
        straight_chain(&mut graph, 12, 2);
        graph.node_mut(NodeHandle(0)).label_placed = true;

        let out = sample_positions(&mut graph, 4, 1);
        let anchors = out.edge_at(2);
        // Nodes 0..4 are reserved for the existing label, anchors start at 4 and 8.
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0].grid_position, GridPosition::new(6, 0));
    }

    #[test]
    fn test_centroid() {
        let mut graph = ContourGraph::new(5, 1);
        straight_chain(&mut graph, 5, 0);
        let out = sample_positions(&mut graph, 100, 1);
        let centre = out.centre_at(0)[0];
        assert_eq!(centre.pixel_count, 5);
        assert!(!centre.circular);
        assert_eq!(centre.label.grid_position, GridPosition::new(2, 0));
        assert!((centre.label.normalised_position.x - 0.5).abs() < 1e-5);
    }
}
