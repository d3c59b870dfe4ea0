pub mod feather_mask;
pub mod mask_blend;
pub mod region_error;
pub mod smoothing_filter;
pub mod smoothing_parameters;
