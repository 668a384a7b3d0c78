pub mod class_index;
pub mod dataset;
pub mod dataset_builder;
pub mod directory_scanner;
pub mod image_codec;
pub mod numeric;
pub mod paired_ranker;
pub mod parallel_builder;
pub mod pixel_buffer;
pub mod resampler;
