//! Per-level registry of chain roots.

use tracing::trace;

use crate::node::NodeHandle;
use crate::pixel::MAX_DEPTH_LEVEL;

/// Where a registered root currently lives.
#[derive(Debug, Clone, Copy)]
struct Slot {
    level: u8,
    position: u32,
}

/// Root nodes of not-yet-merged chains, one registry per elevation level.
///
/// Membership is tracked in a slot table indexed by node handle, so add,
/// remove and lookup are O(1). Removal swaps the last root into the freed
/// position; iteration order is deterministic for a given sequence of calls
/// but carries no meaning.
#[derive(Debug, Clone)]
pub struct ContourNodeStorage {
    levels: Vec<Vec<NodeHandle>>,
    slots: Vec<Option<Slot>>,
}

impl Default for ContourNodeStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl ContourNodeStorage {
    pub fn new() -> Self {
        Self {
            levels: vec![Vec::new(); MAX_DEPTH_LEVEL],
            slots: Vec::new(),
        }
    }

    /// Register `node` as a root on `level`.
    ///
    /// Returns `false` without touching the registry when the level is out of
    /// range or the node is already registered.
    pub fn add_node(&mut self, level: usize, node: NodeHandle) -> bool {
        if level >= MAX_DEPTH_LEVEL {
            trace!(level, node = node.0, "add_node: level out of range");
            return false;
        }

        let idx = node.index();
        if idx >= self.slots.len() {
            self.slots.resize(idx + 1, None);
        }
        if let Some(slot) = self.slots[idx] {
            trace!(
                level,
                registered_level = slot.level,
                node = node.0,
                "add_node: node already registered"
            );
            return false;
        }

        let roots = &mut self.levels[level];
        self.slots[idx] = Some(Slot {
            level: level as u8,
            position: roots.len() as u32,
        });
        roots.push(node);
        true
    }

    /// Remove `node` from the `level` registry. Returns `false` if it was not
    /// registered there.
    pub fn remove_node(&mut self, level: usize, node: NodeHandle) -> bool {
        let slot = match self.slots.get(node.index()).copied().flatten() {
            Some(slot) if slot.level as usize == level => slot,
            _ => {
                trace!(level, node = node.0, "remove_node: node not registered");
                return false;
            }
        };

        let roots = &mut self.levels[level];
        let position = slot.position as usize;
        roots.swap_remove(position);
        if let Some(&moved) = roots.get(position) {
            self.slots[moved.index()] = Some(Slot {
                level: slot.level,
                position: position as u32,
            });
        }
        self.slots[node.index()] = None;
        true
    }

    pub fn contains(&self, level: usize, node: NodeHandle) -> bool {
        matches!(
            self.slots.get(node.index()).copied().flatten(),
            Some(slot) if slot.level as usize == level
        )
    }

    /// Roots registered on `level`; empty for out-of-range levels.
    pub fn roots(&self, level: usize) -> &[NodeHandle] {
        self.levels.get(level).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, level: usize) -> usize {
        self.roots(level).len()
    }

    pub fn total_roots(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(Vec::is_empty)
    }

    /// Non-empty levels with their roots, in ascending level order.
    pub fn iter_levels(&self) -> impl Iterator<Item = (usize, &[NodeHandle])> {
        self.levels
            .iter()
            .enumerate()
            .filter(|(_, roots)| !roots.is_empty())
            .map(|(level, roots)| (level, roots.as_slice()))
    }

    /// Drop every registration, keeping allocations for the next frame.
    pub fn clear(&mut self) {
        for roots in &mut self.levels {
            roots.clear();
        }
        self.slots.clear();
    }
}
