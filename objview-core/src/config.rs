//! Viewer tuning knobs
//!
//! Defaults reproduce the classic viewer, including its drag quirks. The core
//! never reads files; hosts hand over TOML text or build the struct directly.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::obj::ParseOptions;
use crate::projection::ProjectorKind;
use crate::view::DEFAULT_SCALE;

/// Radians added to each angle per tick
pub const DEFAULT_ROTATION_STEP: f64 = 0.01;
/// Tick cadence the rotation step was tuned for (~60 Hz)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 16;
/// Multiplier applied to vertical pan deltas
pub const DEFAULT_Y_PAN_FACTOR: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub rotation_step: f64,
    pub tick_interval_ms: u64,
    pub default_scale: f64,
    /// Vertical pan is multiplied by this after the pixel-to-model conversion.
    /// The classic viewer uses 100, which makes vertical pans far larger than
    /// horizontal ones; set 1.0 for symmetric panning.
    pub y_pan_factor: f64,
    /// Move the drag anchor to each new pointer position. When false, every
    /// move is measured from where the drag began.
    pub refresh_anchor_on_move: bool,
    pub projector: ProjectorKind,
    pub parse: ParseOptions,
}

impl ViewerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.default_scale.is_finite() && self.default_scale > 0.0) {
            return Err(ConfigError::Invalid {
                field: "default_scale",
                reason: format!("must be finite and positive, got {}", self.default_scale),
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "tick_interval_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.rotation_step.is_finite() {
            return Err(ConfigError::Invalid {
                field: "rotation_step",
                reason: format!("must be finite, got {}", self.rotation_step),
            });
        }
        if !self.y_pan_factor.is_finite() {
            return Err(ConfigError::Invalid {
                field: "y_pan_factor",
                reason: format!("must be finite, got {}", self.y_pan_factor),
            });
        }
        Ok(())
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            rotation_step: DEFAULT_ROTATION_STEP,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            default_scale: DEFAULT_SCALE,
            y_pan_factor: DEFAULT_Y_PAN_FACTOR,
            refresh_anchor_on_move: false,
            projector: ProjectorKind::Orthographic,
            parse: ParseOptions::default(),
        }
    }
}
