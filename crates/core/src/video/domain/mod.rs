pub mod display_surface;
pub mod frame_source;
