// THEORY:
// Build-time knobs for the dataset pipeline, collected into one plain struct the
// same way the rest of the crate passes configuration around: public fields, a
// sensible `Default`, and a few chainable setters for call sites that only
// change one or two things.

use crate::core_modules::pixel_buffer::pixel_buffer::ColorMode;

/// What to do with directory listing failures met during a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanErrorPolicy {
    /// Keep going with the partial listing and return the errors in the build output.
    #[default]
    Collect,
    /// Abort the build on the first listing failure.
    Fail,
}

/// Configuration for `DatasetBuilder` and `build_parallel`.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Sample layout every image is decoded into.
    pub color_mode: ColorMode,
    /// Sort class folders and files by name, making labels reproducible.
    pub sorted: bool,
    /// Descend into directories nested inside a class folder.
    pub recursive: bool,
    /// Resample every image to `(width, height)` after decoding. `None` keeps
    /// native resolutions, so the dataset may mix shapes.
    pub resize_to: Option<(u32, u32)>,
    pub scan_errors: ScanErrorPolicy,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Grayscale,
            sorted: true,
            recursive: false,
            resize_to: None,
            scan_errors: ScanErrorPolicy::Collect,
        }
    }
}

impl BuildConfig {
    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    pub fn sorted(mut self, yes: bool) -> Self {
        self.sorted = yes;
        self
    }

    pub fn recursive(mut self, yes: bool) -> Self {
        self.recursive = yes;
        self
    }

    pub fn resize_to(mut self, width: u32, height: u32) -> Self {
        self.resize_to = Some((width, height));
        self
    }

    pub fn scan_errors(mut self, policy: ScanErrorPolicy) -> Self {
        self.scan_errors = policy;
        self
    }
}
