//! Re-anchoring of placed labels against a freshly traced frame.

use crate::graph::ContourGraph;
use crate::labels::ContourLabelProps;
use crate::node::NormalisedPosition;

/// Default half-size of the search window around a placed label.
pub const DEFAULT_NEIGHBOURHOOD_RADIUS: usize = 1;

/// Check that a contour at `old.depth` still passes near `old.grid_position`.
///
/// Scans the `(2 * radius + 1)²` window around the label, clamped to the
/// raster. Every matching node is flagged `label_placed` so the sampler keeps
/// new anchors away from it. Returns the label moved to the mean position of
/// the matches, with depth, grid position and rotation unchanged, or `None`
/// when no node of that level is left in the window.
pub fn validate(
    graph: &mut ContourGraph,
    old: &ContourLabelProps,
    radius: usize,
) -> Option<ContourLabelProps> {
    let (width, height) = (graph.width(), graph.height());
    if width == 0 || height == 0 {
        return None;
    }

    let centre = old.grid_position;
    let x0 = centre.x.saturating_sub(radius);
    let y0 = centre.y.saturating_sub(radius);
    let x1 = centre.x.saturating_add(radius).min(width - 1);
    let y1 = centre.y.saturating_add(radius).min(height - 1);
    if x0 > x1 || y0 > y1 {
        return None;
    }

    let mut sum_x = 0.0f32;
    let mut sum_y = 0.0f32;
    let mut matches = 0u32;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let Some(handle) = graph.node_at(x, y) else {
                continue;
            };
            let node = graph.node_mut(handle);
            if node.level != old.depth {
                continue;
            }
            node.label_placed = true;
            sum_x += node.normalised_position.x;
            sum_y += node.normalised_position.y;
            matches += 1;
        }
    }

    if matches == 0 {
        return None;
    }

    let n = matches as f32;
    Some(ContourLabelProps {
        normalised_position: NormalisedPosition::new(sum_x / n, sum_y / n),
        ..*old
    })
}
