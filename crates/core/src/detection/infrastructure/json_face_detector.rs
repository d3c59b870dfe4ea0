use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::face_region::FaceRegion;
use crate::shared::frame::Frame;

#[derive(Debug, Error)]
pub enum DetectionsError {
    #[error("failed to read detections from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse detections: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("detections key {0:?} is not a frame index")]
    InvalidFrameKey(String),
}

/// Accepted layouts of a detections file.
#[derive(Deserialize)]
#[serde(untagged)]
enum DetectionsFile {
    /// The same faces for every frame (e.g. a still image).
    Static(Vec<FaceRegion>),
    /// Faces keyed by frame index; missing indices have no faces.
    PerFrame(HashMap<String, Vec<FaceRegion>>),
}

enum Detections {
    Static(Vec<FaceRegion>),
    PerFrame(HashMap<usize, Vec<FaceRegion>>),
}

/// Replays face detections produced by an external detector.
///
/// ```json
/// [{"x": 0.4, "y": 0.3, "width": 0.2, "height": 0.25}]
/// ```
/// or, per frame:
/// ```json
/// {"0": [{"x": 0.4, "y": 0.3, "width": 0.2, "height": 0.25}], "3": []}
/// ```
pub struct JsonFaceDetector {
    detections: Detections,
}

impl JsonFaceDetector {
    pub fn from_path(path: &Path) -> Result<Self, DetectionsError> {
        let text = std::fs::read_to_string(path).map_err(|source| DetectionsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let detector = Self::from_json(&text)?;
        log::info!(
            "Loaded detections for {} from {}",
            detector.describe(),
            path.display()
        );
        Ok(detector)
    }

    pub fn from_json(text: &str) -> Result<Self, DetectionsError> {
        let detections = match serde_json::from_str::<DetectionsFile>(text)? {
            DetectionsFile::Static(regions) => Detections::Static(regions),
            DetectionsFile::PerFrame(map) => Detections::PerFrame(
                map.into_iter()
                    .map(|(key, regions)| {
                        let index = key
                            .trim()
                            .parse::<usize>()
                            .map_err(|_| DetectionsError::InvalidFrameKey(key.clone()))?;
                        Ok((index, regions))
                    })
                    .collect::<Result<_, DetectionsError>>()?,
            ),
        };
        Ok(Self { detections })
    }

    fn describe(&self) -> String {
        match &self.detections {
            Detections::Static(regions) => format!("{} face(s) on every frame", regions.len()),
            Detections::PerFrame(map) => format!("{} frame(s)", map.len()),
        }
    }
}

impl FaceDetector for JsonFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
        let regions = match &self.detections {
            Detections::Static(regions) => regions.clone(),
            Detections::PerFrame(map) => map.get(&frame.index()).cloned().unwrap_or_default(),
        };
        Ok(regions)
    }
}
