use serde::{Deserialize, Serialize};

use crate::detection::domain::face_landmarks::covered_even_odd;
use crate::shared::constants::{MASK_CENTER_SHIFT, MASK_HEIGHT_SCALE, MASK_WIDTH_SCALE};
use crate::shared::face_region::PixelRect;

use super::region_error::RegionError;

/// How the feather oval is derived from a face box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskGeometry {
    pub width_scale: f64,
    pub height_scale: f64,
    /// Downward center shift as a fraction of face height.
    pub center_shift: f64,
}

impl Default for MaskGeometry {
    fn default() -> Self {
        Self {
            width_scale: MASK_WIDTH_SCALE,
            height_scale: MASK_HEIGHT_SCALE,
            center_shift: MASK_CENTER_SHIFT,
        }
    }
}

/// Radial alpha gradient around a face: opaque inside `inner_radius`,
/// transparent beyond `outer_radius`, linear in between.
///
/// The inner radius is the circle inscribed in the face box; the outer
/// radius circumscribes the enlarged oval. Optional holes (landmark
/// outlines, even-odd filled) force alpha to zero.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatherMask {
    center: (f64, f64),
    inner_radius: f64,
    outer_radius: f64,
    holes: Vec<Vec<(f64, f64)>>,
}

impl FeatherMask {
    pub fn new(center: (f64, f64), inner_radius: f64, outer_radius: f64) -> Result<Self, RegionError> {
        let finite = center.0.is_finite()
            && center.1.is_finite()
            && inner_radius.is_finite()
            && outer_radius.is_finite();
        if !finite || inner_radius < 0.0 || outer_radius <= inner_radius {
            return Err(RegionError::DegenerateMask {
                inner: inner_radius,
                outer: outer_radius,
            });
        }
        Ok(Self {
            center,
            inner_radius,
            outer_radius,
            holes: Vec::new(),
        })
    }

    pub fn for_face(face: &PixelRect, geometry: &MaskGeometry) -> Result<Self, RegionError> {
        let w = face.width as f64;
        let h = face.height as f64;
        let (cx, cy) = face.center();

        let inner = w.min(h) / 2.0;
        let outer = (w * geometry.width_scale).max(h * geometry.height_scale) / 2.0;

        Self::new((cx, cy + geometry.center_shift * h), inner, outer)
    }

    pub fn with_holes(mut self, holes: Vec<Vec<(f64, f64)>>) -> Self {
        self.holes = holes;
        self
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    pub fn alpha_at(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.center.0;
        let dy = y - self.center.1;
        let d = (dx * dx + dy * dy).sqrt();

        if d >= self.outer_radius {
            return 0.0;
        }
        if !self.holes.is_empty() && covered_even_odd(&self.holes, x, y) {
            return 0.0;
        }
        if d <= self.inner_radius {
            1.0
        } else {
            (self.outer_radius - d) / (self.outer_radius - self.inner_radius)
        }
    }

    /// Alpha sampled at the center of pixel `(px, py)`.
    pub fn alpha_at_pixel(&self, px: i32, py: i32) -> f64 {
        self.alpha_at(px as f64 + 0.5, py as f64 + 0.5)
    }

    /// Pixel box covering every non-zero alpha, clamped to the frame.
    pub fn bounds(&self, frame_w: u32, frame_h: u32) -> Option<PixelRect> {
        let (cx, cy) = self.center;
        let r = self.outer_radius;
        let (fw, fh) = (frame_w as f64, frame_h as f64);
        let x1 = (cx - r).floor().clamp(0.0, fw);
        let y1 = (cy - r).floor().clamp(0.0, fh);
        let x2 = (cx + r).ceil().clamp(0.0, fw);
        let y2 = (cy + r).ceil().clamp(0.0, fh);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(PixelRect::new(
            x1 as i32,
            y1 as i32,
            (x2 - x1) as i32,
            (y2 - y1) as i32,
        ))
    }
}
