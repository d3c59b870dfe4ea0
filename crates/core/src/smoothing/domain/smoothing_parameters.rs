/// Strength and spatial extent handed to a [`SmoothingFilter`](super::smoothing_filter::SmoothingFilter).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothingParameters {
    /// Blend strength in `[0, 1]`; 0 leaves the image untouched.
    pub amount: f64,
    /// Kernel extent in pixels.
    pub radius: f64,
}

impl SmoothingParameters {
    pub fn new(amount: f64, radius: f64) -> Self {
        Self { amount, radius }
    }

    /// Scales the radius with face size: `radius_scale * (face_width / reference_width)`.
    pub fn for_face_width(
        face_width: f64,
        amount: f64,
        radius_scale: f64,
        reference_width: f64,
    ) -> Self {
        Self {
            amount,
            radius: radius_scale * (face_width / reference_width),
        }
    }
}
