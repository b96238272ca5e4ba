//! Persistent topography labels across frames.
//!
//! Each frame the manager re-traces the raster, keeps every placed label that
//! still sits on its contour, drops the rest, and fills gaps with new labels
//! from the sampler. Centre labels for closed blobs are rebuilt every frame.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TracerConfig;
use crate::error::Result;
use crate::labels::{ContourCentreLabelProps, ContourLabelProps};
use crate::processor::ContourLineProcessor;

/// Stable identity of a placed label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LabelId(pub u64);

/// A label that follows a contour line from frame to frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedLabel {
    pub id: LabelId,
    pub props: ContourLabelProps,
    pub text: String,
}

/// A label at the centre of a closed contour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentreLabel {
    pub props: ContourCentreLabelProps,
    pub text: String,
}

/// What changed during one [`TopographyLabelManager::update`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelFrame {
    pub added: Vec<LabelId>,
    /// Labels still valid whose position changed.
    pub moved: Vec<LabelId>,
    pub removed: Vec<LabelId>,
    pub centre_labels: usize,
}

impl LabelFrame {
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.moved.is_empty() && self.removed.is_empty()
    }
}

/// Owns the tracer and the set of labels shown on the sand.
#[derive(Debug)]
pub struct TopographyLabelManager {
    config: TracerConfig,
    processor: ContourLineProcessor,
    labels: Vec<PlacedLabel>,
    centre_labels: Vec<CentreLabel>,
    next_id: u64,
}

impl TopographyLabelManager {
    pub fn new(config: TracerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            processor: ContourLineProcessor::new(),
            labels: Vec::new(),
            centre_labels: Vec::new(),
            next_id: 0,
        })
    }

    /// Process one raster frame and update the placed labels.
    pub fn update(&mut self, raster: &mut [i32], width: usize, height: usize) -> Result<LabelFrame> {
        self.processor.build_graph(raster, width, height)?;

        let mut frame = LabelFrame::default();
        self.refresh_placed(&mut frame);

        let candidates = self
            .processor
            .sample_label_positions(self.config.label_spacing);

        for (level, level_candidates) in candidates.edge.iter().enumerate() {
            for candidate in level_candidates {
                if self.labels.len() >= self.config.max_labels {
                    break;
                }
                if self.crowded(candidate) {
                    continue;
                }
                let id = self.spawn(*candidate);
                frame.added.push(id);
                debug!(id = id.0, level, "Placed contour label");
            }
        }

        let text = &self.config.label_text;
        let min_pixels = self.config.min_centre_pixels;
        self.centre_labels = candidates
            .centre
            .iter()
            .flatten()
            .filter(|c| c.circular && c.pixel_count >= min_pixels)
            .map(|c| CentreLabel {
                props: *c,
                text: text.format_level(c.label.depth),
            })
            .collect();
        frame.centre_labels = self.centre_labels.len();

        debug!(
            placed = self.labels.len(),
            added = frame.added.len(),
            moved = frame.moved.len(),
            removed = frame.removed.len(),
            centre = frame.centre_labels,
            "Updated topography labels"
        );

        Ok(frame)
    }

    /// Re-anchor every placed label, dropping the ones whose contour is gone.
    fn refresh_placed(&mut self, frame: &mut LabelFrame) {
        let radius = self.config.neighbourhood_radius;
        let processor = &mut self.processor;
        self.labels.retain_mut(|label| {
            match processor.validate_label(&label.props, radius) {
                Some(props) => {
                    if props.normalised_position != label.props.normalised_position {
                        frame.moved.push(label.id);
                    }
                    label.props = props;
                    true
                }
                None => {
                    frame.removed.push(label.id);
                    false
                }
            }
        });
    }

    /// Whether a candidate sits too close to a label already on its level.
    fn crowded(&self, candidate: &ContourLabelProps) -> bool {
        let min = self.config.min_label_distance;
        let min_sq = min * min;
        self.labels.iter().any(|label| {
            label.props.depth == candidate.depth
                && label
                    .props
                    .normalised_position
                    .distance_squared(&candidate.normalised_position)
                    < min_sq
        })
    }

    fn spawn(&mut self, props: ContourLabelProps) -> LabelId {
        let id = LabelId(self.next_id);
        self.next_id += 1;
        self.labels.push(PlacedLabel {
            id,
            props,
            text: self.config.label_text.format_level(props.depth),
        });
        id
    }

    pub fn labels(&self) -> &[PlacedLabel] {
        &self.labels
    }

    pub fn label(&self, id: LabelId) -> Option<&PlacedLabel> {
        self.labels.iter().find(|l| l.id == id)
    }

    pub fn centre_labels(&self) -> &[CentreLabel] {
        &self.centre_labels
    }

    /// Elevation level at a pixel of the latest frame, for occlusion checks.
    pub fn level_at(&self, x: usize, y: usize) -> Option<u8> {
        self.processor.level_at(x, y)
    }

    pub fn processor(&self) -> &ContourLineProcessor {
        &self.processor
    }

    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    /// Forget every placed label. Ids keep increasing.
    pub fn clear(&mut self) {
        self.labels.clear();
        self.centre_labels.clear();
    }
}
