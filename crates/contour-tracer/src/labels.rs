//! Label placement values exchanged with the renderer.

use serde::{Deserialize, Serialize};

use crate::node::{GridPosition, NormalisedPosition};

/// Where a label sits on a contour line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContourLabelProps {
    pub normalised_position: NormalisedPosition,
    /// Degrees.
    pub rotation: f32,
    pub grid_position: GridPosition,
    /// Elevation level of the contour the label follows.
    pub depth: u8,
}

impl ContourLabelProps {
    pub fn new(
        normalised_position: NormalisedPosition,
        rotation: f32,
        grid_position: GridPosition,
        depth: u8,
    ) -> Self {
        Self {
            normalised_position,
            rotation,
            grid_position,
            depth,
        }
    }
}

/// Label anchored at the centroid of a whole chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContourCentreLabelProps {
    #[serde(flatten)]
    pub label: ContourLabelProps,
    /// Nodes visited along the chain.
    pub pixel_count: usize,
    /// The chain loops back on itself.
    pub circular: bool,
}

/// Candidates produced by one sampling pass, indexed by elevation level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelCandidates {
    pub edge: Vec<Vec<ContourLabelProps>>,
    pub centre: Vec<Vec<ContourCentreLabelProps>>,
}

impl LabelCandidates {
    pub fn with_levels(levels: usize) -> Self {
        Self {
            edge: vec![Vec::new(); levels],
            centre: vec![Vec::new(); levels],
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edge.iter().map(Vec::len).sum()
    }

    pub fn centre_count(&self) -> usize {
        self.centre.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0 && self.centre_count() == 0
    }

    /// Edge candidates on `level`; empty when the level is out of range.
    pub fn edge_at(&self, level: usize) -> &[ContourLabelProps] {
        self.edge.get(level).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn centre_at(&self, level: usize) -> &[ContourCentreLabelProps] {
        self.centre.get(level).map(Vec::as_slice).unwrap_or(&[])
    }
}
