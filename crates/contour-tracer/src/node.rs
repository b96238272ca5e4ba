//! Contour nodes and their arena handles.

use serde::{Deserialize, Serialize};

/// Index of a node in the per-frame arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeHandle(pub u32);

impl NodeHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Integer raster position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: usize,
    pub y: usize,
}

impl GridPosition {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn from_index(index: usize, width: usize) -> Self {
        Self {
            x: index % width,
            y: index / width,
        }
    }

    pub fn to_index(self, width: usize) -> usize {
        self.y * width + self.x
    }
}

/// Position scaled into `[0, 1]` along both raster axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalisedPosition {
    pub x: f32,
    pub y: f32,
}

impl NormalisedPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Map a grid position onto the unit square. A one-pixel axis maps to 0.
    pub fn from_grid(pos: GridPosition, width: usize, height: usize) -> Self {
        let sx = width.saturating_sub(1).max(1) as f32;
        let sy = height.saturating_sub(1).max(1) as f32;
        Self {
            x: pos.x as f32 / sx,
            y: pos.y as f32 / sy,
        }
    }

    pub fn distance_squared(&self, other: &NormalisedPosition) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// A traced contour pixel.
///
/// Nodes form singly linked chains through `child`. A chain may loop back on
/// itself, so walkers must use `last_visited_generation` to stop.
#[derive(Debug, Clone)]
pub struct ContourNode {
    pub grid_position: GridPosition,
    pub normalised_position: NormalisedPosition,
    pub level: u8,
    /// Degrees in `[0, 360)`.
    pub angle: f32,
    /// Set by the label validator when a placed label still sits on this node.
    pub label_placed: bool,
    pub last_visited_generation: u64,
    pub child: Option<NodeHandle>,
}

impl ContourNode {
    pub fn new(
        grid_position: GridPosition,
        normalised_position: NormalisedPosition,
        level: u8,
        angle: f32,
    ) -> Self {
        Self {
            grid_position,
            normalised_position,
            level,
            angle,
            label_placed: false,
            last_visited_generation: 0,
            child: None,
        }
    }
}
