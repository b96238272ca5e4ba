//! Frame-level driver for contour tracing.

use tracing::debug;

use crate::builder::{trace_raster, TraceStats};
use crate::error::{Result, TracerError};
use crate::graph::ContourGraph;
use crate::labels::{ContourLabelProps, LabelCandidates};
use crate::pixel::ContourPixel;
use crate::sampler::sample_positions;
use crate::validator::validate;

/// Traces contour rasters and answers label queries against the latest frame.
///
/// Construct once and feed every frame through [`build_graph`]. Buffers are
/// kept between frames and only reallocated when the raster size changes.
///
/// [`build_graph`]: ContourLineProcessor::build_graph
#[derive(Debug, Default)]
pub struct ContourLineProcessor {
    pixels: Vec<ContourPixel>,
    graph: ContourGraph,
    generation: u64,
    last_stats: TraceStats,
}

impl ContourLineProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trace a new frame.
    ///
    /// `raster` holds one packed contour code per pixel in row-major order.
    /// The codes are written back with their processed, has-parent and
    /// starting-pixel flags updated. The previous frame's graph is discarded.
    pub fn build_graph(
        &mut self,
        raster: &mut [i32],
        width: usize,
        height: usize,
    ) -> Result<&ContourGraph> {
        let expected = width
            .checked_mul(height)
            .filter(|&n| n > 0)
            .ok_or(TracerError::InvalidDimensions { width, height })?;
        if raster.len() != expected {
            return Err(TracerError::RasterSizeMismatch {
                width,
                height,
                expected,
                actual: raster.len(),
            });
        }
        if expected > u32::MAX as usize {
            return Err(TracerError::InvalidDimensions { width, height });
        }

        self.pixels.clear();
        self.pixels
            .extend(raster.iter().map(|&code| ContourPixel::decode(code)));
        self.graph.reset(width, height);

        let stats = trace_raster(&mut self.pixels, &mut self.graph);

        for (code, px) in raster.iter_mut().zip(&self.pixels) {
            *code = px.encode();
        }

        debug!(
            width,
            height,
            nodes = self.graph.node_count(),
            roots = self.graph.storage().total_roots(),
            chains_started = stats.chains_started,
            chains_merged = stats.chains_merged,
            chains_pruned = stats.chains_pruned,
            closed_loops = stats.closed_loops,
            invalid_levels = stats.invalid_levels,
            "Traced contour frame"
        );

        self.last_stats = stats;
        Ok(&self.graph)
    }

    /// Emit label candidates for every chain of the current frame.
    ///
    /// Each call starts a new traversal generation, so it may be repeated on
    /// the same frame.
    pub fn sample_label_positions(&mut self, spacing: usize) -> LabelCandidates {
        self.generation += 1;
        let candidates = sample_positions(&mut self.graph, spacing, self.generation);
        debug!(
            generation = self.generation,
            spacing,
            edge = candidates.edge_count(),
            centre = candidates.centre_count(),
            "Sampled label positions"
        );
        candidates
    }

    /// Re-anchor a label placed on an earlier frame.
    ///
    /// Returns `None` when no contour of the label's level is left within
    /// `radius` pixels. Matching nodes are reserved so the next sampling pass
    /// keeps new labels away from this one.
    pub fn validate_label(
        &mut self,
        old: &ContourLabelProps,
        radius: usize,
    ) -> Option<ContourLabelProps> {
        validate(&mut self.graph, old, radius)
    }

    /// Elevation level stored for pixel `(x, y)` of the latest frame.
    pub fn level_at(&self, x: usize, y: usize) -> Option<u8> {
        let width = self.graph.width();
        if x >= width || y >= self.graph.height() {
            return None;
        }
        self.level_at_index(y * width + x)
    }

    /// Elevation level stored at raster `index` of the latest frame.
    pub fn level_at_index(&self, index: usize) -> Option<u8> {
        self.pixels.get(index).map(|px| px.contour_level)
    }

    /// Decoded pixel at raster `index` of the latest frame.
    pub fn pixel(&self, index: usize) -> Option<&ContourPixel> {
        self.pixels.get(index)
    }

    pub fn graph(&self) -> &ContourGraph {
        &self.graph
    }

    pub fn last_stats(&self) -> TraceStats {
        self.last_stats
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
