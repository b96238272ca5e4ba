//! Configuration for contour tracing and label placement.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TracerError};
use crate::validator::DEFAULT_NEIGHBOURHOOD_RADIUS;

/// Configuration for the tracer and the label manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerConfig {
    /// Nodes between consecutive labels along a chain.
    pub label_spacing: usize,

    /// Half-size of the window a placed label is re-anchored in.
    pub neighbourhood_radius: usize,

    /// Minimum distance between two labels on one level, in normalised units.
    pub min_label_distance: f32,

    /// Smallest closed chain that gets a centre label.
    pub min_centre_pixels: usize,

    /// Upper bound on placed edge labels.
    pub max_labels: usize,

    /// How label text is derived from a level.
    pub label_text: LabelTextConfig,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            label_spacing: 40,
            neighbourhood_radius: DEFAULT_NEIGHBOURHOOD_RADIUS,
            min_label_distance: 0.05,
            min_centre_pixels: 20,
            max_labels: 256,
            label_text: LabelTextConfig::default(),
        }
    }
}

impl TracerConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_parse("LABEL_SPACING") {
            config.label_spacing = v;
        }
        if let Some(v) = env_parse("LABEL_NEIGHBOURHOOD_RADIUS") {
            config.neighbourhood_radius = v;
        }
        if let Some(v) = env_parse("MIN_LABEL_DISTANCE") {
            config.min_label_distance = v;
        }
        if let Some(v) = env_parse("MIN_CENTRE_PIXELS") {
            config.min_centre_pixels = v;
        }
        if let Some(v) = env_parse("MAX_LABELS") {
            config.max_labels = v;
        }
        if let Some(v) = env_parse("LABEL_BASE_ELEVATION") {
            config.label_text.base_elevation = v;
        }
        if let Some(v) = env_parse("LABEL_LEVEL_INTERVAL") {
            config.label_text.level_interval = v;
        }
        if let Ok(unit) = std::env::var("LABEL_UNIT") {
            config.label_text.unit = unit;
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.label_spacing == 0 {
            return Err(TracerError::config("label_spacing must be > 0"));
        }

        if !self.min_label_distance.is_finite() || self.min_label_distance < 0.0 {
            return Err(TracerError::config(
                "min_label_distance must be a finite value >= 0",
            ));
        }

        if !self.label_text.level_interval.is_finite() || self.label_text.level_interval == 0.0 {
            return Err(TracerError::config("level_interval must be finite and non-zero"));
        }

        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let val = std::env::var(key).ok()?;
    match val.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %val, "ignoring unparsable environment override");
            None
        }
    }
}

/// Mapping from elevation level to the text shown on a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelTextConfig {
    /// Elevation of level 0.
    pub base_elevation: f32,
    /// Elevation difference between adjacent levels.
    pub level_interval: f32,
    /// Suffix appended after the value, e.g. "m".
    pub unit: String,
}

impl Default for LabelTextConfig {
    fn default() -> Self {
        Self {
            base_elevation: 0.0,
            level_interval: 10.0,
            unit: "m".to_string(),
        }
    }
}

impl LabelTextConfig {
    pub fn elevation(&self, level: u8) -> f32 {
        self.base_elevation + level as f32 * self.level_interval
    }

    /// Label text for a level
    pub fn format_level(&self, level: u8) -> String {
        let value = self.elevation(level);
        let number = if value.fract().abs() < 0.01 {
            format!("{:.0}", value)
        } else {
            format!("{:.1}", value)
        };
        if self.unit.is_empty() {
            number
        } else {
            format!("{} {}", number, self.unit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(TracerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_spacing_rejected() {
        let config = TracerConfig {
            label_spacing: 0,
            ..TracerConfig::default()
        };
        assert!(matches!(config.validate(), Err(TracerError::Config(_))));
    }

    #[test]
    fn test_negative_distance_rejected() {
        let config = TracerConfig {
            min_label_distance: -1.0,
            ..TracerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_format_level() {
        let text = LabelTextConfig::default();
        assert_eq!(text.format_level(0), "0 m");
        assert_eq!(text.format_level(12), "120 m");

        let text = LabelTextConfig {
            base_elevation: -2.5,
            level_interval: 0.5,
            unit: String::new(),
        };
        assert_eq!(text.format_level(2), "-1.5");
        assert_eq!(text.format_level(5), "0");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TracerConfig = serde_json::from_str(r#"{"label_spacing": 12}"#).unwrap();
        assert_eq!(config.label_spacing, 12);
        assert_eq!(config.neighbourhood_radius, 1);
        assert_eq!(config.label_text.unit, "m");
    }
}
