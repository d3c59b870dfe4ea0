use serde::{Deserialize, Serialize};

use crate::pipeline::smoothing_config::ConfigError;
use crate::shared::face_region::FaceRegion;

/// Order in which overlapping faces are composited. Later faces win in
/// overlap zones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendOrder {
    /// As returned by the detector.
    #[default]
    Detector,
    /// Top-to-bottom, then left-to-right; stable across detector runs.
    Position,
}

impl BlendOrder {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "detector" => Ok(BlendOrder::Detector),
            "position" => Ok(BlendOrder::Position),
            _ => Err(ConfigError::UnknownOption {
                kind: "order",
                value: value.to_string(),
                expected: "detector, position",
            }),
        }
    }
}

pub fn order_regions(regions: &[FaceRegion], order: BlendOrder) -> Vec<&FaceRegion> {
    let mut ordered: Vec<&FaceRegion> = regions.iter().collect();
    if order == BlendOrder::Position {
        ordered.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    }
    ordered
}
