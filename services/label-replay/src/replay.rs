//! Recorded raster frames and their replay through the label manager.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use contour_tracer::{CentreLabel, LabelFrame, PlacedLabel, TopographyLabelManager, TracerConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A recording of contour rasters, all sharing one size.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Recording {
    pub width: usize,
    pub height: usize,
    pub frames: Vec<Vec<i32>>,
}

impl Recording {
    /// Load a recording from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read recording {}", path.display()))?;
        let recording: Recording = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse recording {}", path.display()))?;
        recording.check()?;
        Ok(recording)
    }

    fn check(&self) -> Result<()> {
        ensure!(
            self.width > 0 && self.height > 0,
            "recording has zero dimension {}x{}",
            self.width,
            self.height
        );
        let expected = self.width * self.height;
        for (i, frame) in self.frames.iter().enumerate() {
            ensure!(
                frame.len() == expected,
                "frame {} has {} pixels, expected {}",
                i,
                frame.len(),
                expected
            );
        }
        Ok(())
    }
}

/// Label state after one replayed frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub frame: usize,
    pub changes: LabelFrame,
    pub labels: Vec<PlacedLabel>,
    pub centre_labels: Vec<CentreLabel>,
}

/// Totals over a whole replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub frames: usize,
    pub added: usize,
    pub moved: usize,
    pub removed: usize,
    pub final_labels: usize,
    pub final_centre_labels: usize,
}

impl ReplaySummary {
    fn record(&mut self, changes: &LabelFrame) {
        self.frames += 1;
        self.added += changes.added.len();
        self.moved += changes.moved.len();
        self.removed += changes.removed.len();
    }
}

/// Feed every frame of `recording` through a fresh label manager.
pub fn replay(recording: Recording, config: TracerConfig) -> Result<(Vec<FrameReport>, ReplaySummary)> {
    let mut manager = TopographyLabelManager::new(config).context("Invalid tracer configuration")?;
    let mut reports = Vec::with_capacity(recording.frames.len());
    let mut summary = ReplaySummary::default();

    for (i, mut raster) in recording.frames.into_iter().enumerate() {
        let changes = manager
            .update(&mut raster, recording.width, recording.height)
            .with_context(|| format!("Failed to process frame {}", i))?;
        debug!(
            frame = i,
            added = changes.added.len(),
            removed = changes.removed.len(),
            "Replayed frame"
        );
        summary.record(&changes);
        reports.push(FrameReport {
            frame: i,
            changes,
            labels: manager.labels().to_vec(),
            centre_labels: manager.centre_labels().to_vec(),
        });
    }

    summary.final_labels = manager.labels().len();
    summary.final_centre_labels = manager.centre_labels().len();
    info!(
        frames = summary.frames,
        labels = summary.final_labels,
        centre_labels = summary.final_centre_labels,
        "Replay complete"
    );

    Ok((reports, summary))
}
