use serde::{Deserialize, Serialize};

use crate::detection::domain::face_landmarks::FaceLandmarks;
use crate::shared::constants::MAX_NORMALIZED_COORDINATE;

/// An axis-aligned rectangle in absolute pixel coordinates.
///
/// May extend past the frame; use [`PixelRect::clamp_to`] before indexing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Intersection with a `frame_w` x `frame_h` canvas, or `None` if the
    /// rectangle lies entirely outside it.
    pub fn clamp_to(&self, frame_w: u32, frame_h: u32) -> Option<PixelRect> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = self.right().min(frame_w as i32);
        let y2 = self.bottom().min(frame_h as i32);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(PixelRect::new(x1, y1, x2 - x1, y2 - y1))
    }
}

/// A detected face in normalized `[0, 1]` coordinates, origin at the
/// top-left corner of the frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<FaceLandmarks>,
}

impl FaceRegion {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            landmarks: None,
        }
    }

    pub fn with_landmarks(mut self, landmarks: FaceLandmarks) -> Self {
        self.landmarks = Some(landmarks);
        self
    }

    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Every component lies within `±MAX_NORMALIZED_COORDINATE`, so the
    /// box maps to pixel coordinates without overflow on any real frame.
    pub fn is_in_range(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.abs() <= MAX_NORMALIZED_COORDINATE)
    }

    /// Scales the normalized box against a frame extent, rounding each
    /// component to the nearest pixel. The result is not clamped.
    pub fn to_pixel_rect(&self, frame_w: u32, frame_h: u32) -> PixelRect {
        let fw = frame_w as f64;
        let fh = frame_h as f64;
        PixelRect::new(
            (self.x * fw).round() as i32,
            (self.y * fh).round() as i32,
            (self.width * fw).round() as i32,
            (self.height * fh).round() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_to_pixel_rect_reference_scenario() {
        let region = FaceRegion::new(0.4, 0.3, 0.2, 0.25);
        assert_eq!(region.to_pixel_rect(640, 480), PixelRect::new(256, 144, 128, 120));
    }

    #[test]
    fn test_to_pixel_rect_full_frame() {
        let region = FaceRegion::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(region.to_pixel_rect(1920, 1080), PixelRect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn test_center() {
        let (cx, cy) = PixelRect::new(256, 144, 128, 120).center();
        assert_relative_eq!(cx, 320.0);
        assert_relative_eq!(cy, 204.0);
    }

    #[rstest]
    #[case::inside(PixelRect::new(10, 10, 20, 20), Some(PixelRect::new(10, 10, 20, 20)))]
    #[case::left_edge(PixelRect::new(-5, 10, 20, 20), Some(PixelRect::new(0, 10, 15, 20)))]
    #[case::bottom_right(PixelRect::new(90, 90, 20, 20), Some(PixelRect::new(90, 90, 10, 10)))]
    #[case::outside(PixelRect::new(150, 10, 20, 20), None)]
    #[case::zero_width(PixelRect::new(10, 10, 0, 20), None)]
    fn test_clamp_to(#[case] rect: PixelRect, #[case] expected: Option<PixelRect>) {
        assert_eq!(rect.clamp_to(100, 100), expected);
    }

    #[rstest]
    #[case::nan_x(f64::NAN, 0.1)]
    #[case::infinite_width(0.1, f64::INFINITY)]
    fn test_non_finite_detected(#[case] x: f64, #[case] width: f64) {
        assert!(!FaceRegion::new(x, 0.1, width, 0.1).is_finite());
    }

    #[rstest]
    #[case::huge_width(FaceRegion::new(0.5, 0.5, 1.0e7, 0.2), false)]
    #[case::far_left(FaceRegion::new(-5.0, 0.5, 0.2, 0.2), false)]
    #[case::partly_outside(FaceRegion::new(-0.1, 0.9, 0.3, 0.3), true)]
    #[case::nan(FaceRegion::new(f64::NAN, 0.5, 0.2, 0.2), false)]
    fn test_is_in_range(#[case] region: FaceRegion, #[case] expected: bool) {
        assert_eq!(region.is_in_range(), expected);
    }

    #[test]
    fn test_edges_saturate_instead_of_overflowing() {
        let rect = PixelRect::new(320, 240, i32::MAX, 96);
        assert_eq!(rect.right(), i32::MAX);
        assert_eq!(rect.clamp_to(640, 480), Some(PixelRect::new(320, 240, 320, 96)));
    }

    #[test]
    fn test_deserializes_without_landmarks() {
        let region: FaceRegion =
            serde_json::from_str(r#"{"x":0.1,"y":0.2,"width":0.3,"height":0.4}"#).unwrap();
        assert_eq!(region, FaceRegion::new(0.1, 0.2, 0.3, 0.4));
    }
}
