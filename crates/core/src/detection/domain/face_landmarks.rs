//! Per-feature landmark outlines (eyes, lips) attached to a detected face.
//!
//! Points are normalized to the face bounding box, not to the frame:
//! `(0, 0)` is the box's top-left corner and `(1, 1)` its bottom-right.

use serde::{Deserialize, Serialize};

use crate::shared::face_region::PixelRect;

pub type NormalizedPoint = (f64, f64);

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceLandmarks {
    pub left_eye: Vec<NormalizedPoint>,
    pub right_eye: Vec<NormalizedPoint>,
    pub outer_lips: Vec<NormalizedPoint>,
    pub inner_lips: Vec<NormalizedPoint>,
}

impl FaceLandmarks {
    pub fn features(&self) -> [&[NormalizedPoint]; 4] {
        [
            self.left_eye.as_slice(),
            self.right_eye.as_slice(),
            self.outer_lips.as_slice(),
            self.inner_lips.as_slice(),
        ]
    }

    /// Feature outlines mapped into frame pixels through the face box.
    ///
    /// Outlines with fewer than three points cannot enclose an area and are
    /// dropped.
    pub fn to_pixel_polygons(&self, face: &PixelRect) -> Vec<Vec<(f64, f64)>> {
        self.features()
            .iter()
            .filter(|points| points.len() >= 3)
            .map(|points| {
                points
                    .iter()
                    .map(|&(px, py)| {
                        (
                            face.x as f64 + px * face.width as f64,
                            face.y as f64 + py * face.height as f64,
                        )
                    })
                    .collect()
            })
            .collect()
    }
}

/// Even-odd point-in-polygon test. The polygon is implicitly closed.
pub fn point_in_polygon(polygon: &[(f64, f64)], x: f64, y: f64) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Even-odd fill across several polygons: a point is covered when an odd
/// number of polygons contain it, so a polygon nested in another cuts a hole.
pub fn covered_even_odd(polygons: &[Vec<(f64, f64)>], x: f64, y: f64) -> bool {
    polygons
        .iter()
        .filter(|p| point_in_polygon(p, x, y))
        .count()
        % 2
        == 1
}
