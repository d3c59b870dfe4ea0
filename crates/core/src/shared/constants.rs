/// Face width (in pixels) at which the smoothing radius equals the radius scale.
pub const REFERENCE_WIDTH: f64 = 750.0;

/// Smoothing radius per reference width of face.
pub const DEFAULT_RADIUS_SCALE: f64 = 7.0;

pub const DEFAULT_AMOUNT: f64 = 0.9;

/// The feather oval is the face box enlarged by these factors.
pub const MASK_WIDTH_SCALE: f64 = 1.2;
pub const MASK_HEIGHT_SCALE: f64 = 1.4;

/// Downward shift of the mask center, as a fraction of face height, so the
/// feather covers chin and jaw.
pub const MASK_CENTER_SHIFT: f64 = 0.1;

/// Normalized face coordinates beyond this magnitude are rejected before
/// any pixel arithmetic.
pub const MAX_NORMALIZED_COORDINATE: f64 = 4.0;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
