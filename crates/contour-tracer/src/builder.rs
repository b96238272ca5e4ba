//! Raster walk that turns contour pixels into linked chains.
//!
//! Every pixel is visited once in row-major order. An unprocessed on-contour
//! pixel becomes the root of a new chain, which is then extended by following
//! each pixel's direction code until the walk runs off the contour, changes
//! level, or runs into another chain.

use tracing::trace;

use crate::graph::ContourGraph;
use crate::pixel::{ContourPixel, Direction};

/// Counters collected while tracing one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    /// Roots created, including those later merged or pruned.
    pub chains_started: usize,
    /// Chains that ran into the root of an earlier chain and absorbed it.
    pub chains_merged: usize,
    /// Single-pixel roots dropped because they already lead into another chain.
    pub chains_pruned: usize,
    /// Chains whose walk returned to their own root.
    pub closed_loops: usize,
    /// On-contour pixels dropped for carrying a level outside the tracked bands.
    pub invalid_levels: usize,
}

/// Trace every chain in `pixels` into `graph`.
///
/// `graph` must already be reset to the raster dimensions. Pixel flags are
/// updated in place.
pub(crate) fn trace_raster(pixels: &mut [ContourPixel], graph: &mut ContourGraph) -> TraceStats {
    let mut stats = TraceStats::default();

    for index in 0..pixels.len() {
        let px = pixels[index];
        if px.processed || !px.is_traceable() {
            pixels[index].processed = true;
            continue;
        }
        if !px.has_valid_level() {
            stats.invalid_levels += 1;
            pixels[index].processed = true;
            continue;
        }

        trace_chain(index, pixels, graph, &mut stats);
        pixels[index].processed = true;
    }

    stats
}

/// Why a chain walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkEnd {
    /// Ran off the raster, off the contour, or into another level.
    Open,
    /// Absorbed the root of an earlier chain.
    Merged,
    /// Returned to its own root.
    Closed,
    /// Hit a chain start that already belongs to another chain.
    Blocked,
    /// Hit the middle of an existing chain.
    Joined,
}

fn trace_chain(
    root_index: usize,
    pixels: &mut [ContourPixel],
    graph: &mut ContourGraph,
    stats: &mut TraceStats,
) {
    let width = graph.width();
    let len = pixels.len();
    let root_px = pixels[root_index];
    let level = root_px.contour_level;

    let root = graph.insert_node(root_index, level, root_px.angle_degrees());
    graph.storage_mut().add_node(level as usize, root);
    pixels[root_index].starting_pixel = true;
    stats.chains_started += 1;

    let mut prev = root;
    let mut index = root_index;
    let mut direction = root_px.direction();
    let mut chain_len = 1usize;

    let end = loop {
        let Some(next) = direction.step(index, width, len) else {
            break WalkEnd::Open;
        };

        let target = pixels[next];
        if !target.is_traceable() || target.contour_level != level {
            break WalkEnd::Open;
        }

        if target.starting_pixel {
            let Some(target_node) = graph.node_at_index(next) else {
                break WalkEnd::Open;
            };

            if !target.has_parent {
                graph.link(prev, target_node);
                pixels[next].has_parent = true;
                if target_node == root {
                    break WalkEnd::Closed;
                }
                graph.storage_mut().remove_node(level as usize, target_node);
                break WalkEnd::Merged;
            }

            // A down-left step can clip the corner of a chain whose start sits
            // directly below; step straight down instead before giving up.
            if direction == Direction::SouthWest && (next % width) + 1 != width {
                direction = Direction::South;
                continue;
            }

            pixels[root_index].has_parent = true;
            break WalkEnd::Blocked;
        }

        if target.has_parent || target.processed {
            break WalkEnd::Joined;
        }

        let node = graph.insert_node(next, level, target.angle_degrees());
        graph.link(prev, node);
        pixels[next].processed = true;
        pixels[next].has_parent = true;
        chain_len += 1;

        prev = node;
        index = next;
        direction = target.direction();
    };

    match end {
        WalkEnd::Merged => stats.chains_merged += 1,
        WalkEnd::Closed => stats.closed_loops += 1,
        WalkEnd::Blocked if chain_len < 2 => {
            trace!(
                level,
                x = root_index % width,
                y = root_index / width,
                "pruning single-pixel chain"
            );
            graph.storage_mut().remove_node(level as usize, root);
            stats.chains_pruned += 1;
        }
        _ => {}
    }
}
