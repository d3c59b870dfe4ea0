mod gaussian;
pub mod gaussian_smoothing_filter;
