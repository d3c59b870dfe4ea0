use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::region_order::BlendOrder;
use crate::shared::constants::{DEFAULT_AMOUNT, DEFAULT_RADIUS_SCALE, REFERENCE_WIDTH};
use crate::smoothing::domain::feather_mask::MaskGeometry;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("amount must be between 0.0 and 1.0, got {0}")]
    InvalidAmount(f64),
    #[error("radius scale must be a finite non-negative number, got {0}")]
    InvalidRadiusScale(f64),
    #[error("reference width must be a positive number, got {0}")]
    InvalidReferenceWidth(f64),
    #[error("mask {field} must be a finite number >= {min}, got {value}")]
    InvalidMask {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownOption {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Which pixels the smoothing filter sees for each face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmoothingScope {
    /// Only the mask's bounding box, cropped from the accumulator.
    #[default]
    Region,
    /// The whole accumulator frame.
    Frame,
}

impl SmoothingScope {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "region" => Ok(SmoothingScope::Region),
            "frame" => Ok(SmoothingScope::Frame),
            _ => Err(ConfigError::UnknownOption {
                kind: "scope",
                value: value.to_string(),
                expected: "region, frame",
            }),
        }
    }
}

/// Per-call settings for [`FrameSmoothingPipeline`](super::frame_smoothing_pipeline::FrameSmoothingPipeline).
///
/// Passed with every frame rather than held by the pipeline, so toggling
/// the effect never races with frame processing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub enabled: bool,
    pub amount: f64,
    pub radius_scale: f64,
    pub reference_width: f64,
    pub mask: MaskGeometry,
    pub scope: SmoothingScope,
    pub order: BlendOrder,
    /// Keep eyes and lips sharp by cutting landmark outlines out of the mask.
    pub preserve_features: bool,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            amount: DEFAULT_AMOUNT,
            radius_scale: DEFAULT_RADIUS_SCALE,
            reference_width: REFERENCE_WIDTH,
            mask: MaskGeometry::default(),
            scope: SmoothingScope::default(),
            order: BlendOrder::default(),
            preserve_features: false,
        }
    }
}

impl SmoothingConfig {
    /// Reads a JSON config file. Missing fields take their defaults.
    ///
    /// Values are not validated here so that overrides can still replace
    /// them; call [`SmoothingConfig::validate`] on the final config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SmoothingConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.amount) {
            return Err(ConfigError::InvalidAmount(self.amount));
        }
        if !self.radius_scale.is_finite() || self.radius_scale < 0.0 {
            return Err(ConfigError::InvalidRadiusScale(self.radius_scale));
        }
        if !self.reference_width.is_finite() || self.reference_width <= 0.0 {
            return Err(ConfigError::InvalidReferenceWidth(self.reference_width));
        }
        check_mask_field("width_scale", self.mask.width_scale, 1.0)?;
        check_mask_field("height_scale", self.mask.height_scale, 1.0)?;
        check_mask_field("center_shift", self.mask.center_shift, -0.5)?;
        Ok(())
    }
}

fn check_mask_field(field: &'static str, value: f64, min: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(ConfigError::InvalidMask { field, min, value })
    }
}
