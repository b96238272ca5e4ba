//! Per-frame contour node graph.

use crate::node::{ContourNode, GridPosition, NodeHandle, NormalisedPosition};
use crate::storage::ContourNodeStorage;

/// Arena of contour nodes for one frame, with a per-pixel lookup and the root
/// registry.
///
/// The graph is rebuilt every frame. [`ContourGraph::reset`] clears it while
/// keeping allocations when the raster size is unchanged.
#[derive(Debug, Clone, Default)]
pub struct ContourGraph {
    width: usize,
    height: usize,
    nodes: Vec<ContourNode>,
    grid: Vec<Option<NodeHandle>>,
    storage: ContourNodeStorage,
}

impl ContourGraph {
    pub fn new(width: usize, height: usize) -> Self {
        let mut graph = Self::default();
        graph.reset(width, height);
        graph
    }

    pub fn reset(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.nodes.clear();
        self.storage.clear();
        let len = width * height;
        if self.grid.len() == len {
            self.grid.fill(None);
        } else {
            self.grid.clear();
            self.grid.resize(len, None);
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Allocate a node for the pixel at raster `index` and record it in the
    /// pixel lookup.
    pub(crate) fn insert_node(&mut self, index: usize, level: u8, angle: f32) -> NodeHandle {
        let grid_position = GridPosition::from_index(index, self.width);
        let normalised = NormalisedPosition::from_grid(grid_position, self.width, self.height);
        let handle = NodeHandle(self.nodes.len() as u32);
        self.nodes
            .push(ContourNode::new(grid_position, normalised, level, angle));
        self.grid[index] = Some(handle);
        handle
    }

    pub(crate) fn link(&mut self, parent: NodeHandle, child: NodeHandle) {
        self.nodes[parent.index()].child = Some(child);
    }

    pub fn node(&self, handle: NodeHandle) -> &ContourNode {
        &self.nodes[handle.index()]
    }

    pub fn node_mut(&mut self, handle: NodeHandle) -> &mut ContourNode {
        &mut self.nodes[handle.index()]
    }

    /// Node traced at raster cell `(x, y)`, if any.
    pub fn node_at(&self, x: usize, y: usize) -> Option<NodeHandle> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.grid[y * self.width + x]
    }

    pub(crate) fn node_at_index(&self, index: usize) -> Option<NodeHandle> {
        self.grid.get(index).copied().flatten()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[ContourNode] {
        &self.nodes
    }

    pub fn storage(&self) -> &ContourNodeStorage {
        &self.storage
    }

    pub(crate) fn storage_mut(&mut self) -> &mut ContourNodeStorage {
        &mut self.storage
    }

    /// Roots of the chains traced on `level`.
    pub fn roots(&self, level: usize) -> &[NodeHandle] {
        self.storage.roots(level)
    }

    /// Walk a chain from `root`, following child links.
    ///
    /// Stops after a node repeats, so a circular chain yields each node once.
    pub fn chain(&self, root: NodeHandle) -> ChainIter<'_> {
        ChainIter {
            graph: self,
            next: Some(root),
            root,
            remaining: self.nodes.len(),
        }
    }

    /// Number of nodes reachable from `root` before the chain ends or loops.
    pub fn chain_len(&self, root: NodeHandle) -> usize {
        self.chain(root).count()
    }
}

/// Iterator over the nodes of one chain.
pub struct ChainIter<'a> {
    graph: &'a ContourGraph,
    next: Option<NodeHandle>,
    root: NodeHandle,
    remaining: usize,
}

impl Iterator for ChainIter<'_> {
    type Item = NodeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.next = self
            .graph
            .node(current)
            .child
            .filter(|&child| child != self.root);
        Some(current)
    }
}
