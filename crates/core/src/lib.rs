pub mod detection;
pub mod pipeline;
pub mod shared;
pub mod smoothing;
pub mod video;
