pub mod threaded_frame_processor;
