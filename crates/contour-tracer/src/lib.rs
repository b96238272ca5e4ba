//! Contour line tracing and label placement for an AR sandbox.
//!
//! Upstream edge-detection passes hand over one packed contour code per depth
//! pixel every frame. This crate turns that raster into labelled contour
//! lines:
//!
//! - Tracing: pixels are walked along their direction codes into singly
//!   linked chains, one registry of chain roots per elevation level
//! - Sampling: evenly spaced label anchors along each chain, plus a centroid
//!   per chain for blob labels
//! - Validation: labels placed on earlier frames are re-anchored to the moving
//!   contour instead of being recreated
//! - Level queries: O(1) elevation level per pixel
//!
//! # Architecture
//!
//! ```text
//! raster (i32 per pixel)
//!      │
//!      ▼
//! ContourLineProcessor::build_graph
//!      │  decode ─► trace chains ─► encode flags back
//!      ▼
//! ContourGraph (node arena + per-level roots)
//!      │
//!      ├─► validate_label (labels from the last frame)
//!      │
//!      └─► sample_label_positions
//!               │
//!               ▼
//!          LabelCandidates ─► TopographyLabelManager ─► renderer
//! ```
//!
//! # Example
//!
//! ```
//! use contour_tracer::{ContourPixel, Direction, TopographyLabelManager, TracerConfig};
//!
//! let (width, height) = (8, 4);
//! let mut raster = vec![0i32; width * height];
//! for x in 0..width {
//!     raster[2 * width + x] = ContourPixel::on_contour(5, Direction::East).encode();
//! }
//!
//! let config = TracerConfig { label_spacing: 4, min_label_distance: 0.0, ..TracerConfig::default() };
//! let mut manager = TopographyLabelManager::new(config).unwrap();
//! let frame = manager.update(&mut raster, width, height).unwrap();
//! assert_eq!(frame.added.len(), 2);
//! assert_eq!(manager.level_at(3, 2), Some(5));
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod graph;
pub mod labels;
pub mod manager;
pub mod node;
pub mod pixel;
pub mod processor;
pub mod sampler;
pub mod storage;
pub mod validator;

// Re-export commonly used types at crate root
pub use builder::TraceStats;
pub use config::{LabelTextConfig, TracerConfig};
pub use error::{Result, TracerError};
pub use graph::{ChainIter, ContourGraph};
pub use labels::{ContourCentreLabelProps, ContourLabelProps, LabelCandidates};
pub use manager::{CentreLabel, LabelFrame, LabelId, PlacedLabel, TopographyLabelManager};
pub use node::{ContourNode, GridPosition, NodeHandle, NormalisedPosition};
pub use pixel::{ContourPixel, Direction, MAX_DEPTH_LEVEL};
pub use processor::ContourLineProcessor;
pub use sampler::sample_positions;
pub use storage::ContourNodeStorage;
pub use validator::{validate, DEFAULT_NEIGHBOURHOOD_RADIUS};
