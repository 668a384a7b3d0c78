// THEORY:
// This file is the entry point for the `hina` library crate. It exposes the
// small surface a nearest-neighbor classifier needs from its data layer: build
// a labeled `Dataset` from a directory-per-class tree, reshape buffers to a
// common size, shuffle and split, rank neighbor candidates, and write buffers
// back out as PNGs for inspection.
//
// The building blocks live in `core_modules`; the most common types are
// re-exported here so consumers rarely need to reach into the module tree.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod logging;

pub use crate::config::{BuildConfig, ScanErrorPolicy};
pub use crate::core_modules::class_index::ClassIndex;
pub use crate::core_modules::dataset::Dataset;
pub use crate::core_modules::dataset_builder::{BuildOutput, DatasetBuilder};
pub use crate::core_modules::directory_scanner::{ScanEntry, ScanOptions, ScanOutcome, scan_dir};
pub use crate::core_modules::image_codec::{DecodedImage, decode, encode_png, encode_png_as};
pub use crate::core_modules::numeric::{abs_sub, inverse_lerp, lerp, percent_of};
pub use crate::core_modules::paired_ranker::paired_ranker::{nearest_k, sort_paired};
pub use crate::core_modules::parallel_builder::build_parallel;
pub use crate::core_modules::pixel_buffer::pixel_buffer::{ColorMode, ImageShape, Label, PixelBuffer};
pub use crate::core_modules::resampler::resampler::{resize_nearest, resize_shape};
pub use crate::error::{HinaError, Result, ScanError};
