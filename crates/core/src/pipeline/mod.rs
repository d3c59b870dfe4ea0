pub mod frame_processor;
pub mod frame_smoothing_pipeline;
pub mod infrastructure;
pub mod pipeline_logger;
pub mod region_order;
pub mod smooth_image_use_case;
pub mod smoothing_config;
