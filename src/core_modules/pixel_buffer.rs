// THEORY:
// A `PixelBuffer` is the most fundamental unit of the toolkit: a flat, row-major
// run of 8-bit samples. It is a "dumb" data container: it does not know its own
// width or height. That geometry lives beside it in an `ImageShape` and must be
// handed to every consumer (resampler, encoder) alongside the bytes.
//
// Layout: pixel `(x, y)` starts at sample `(y * width + x) * channels`. With
// `ColorMode::Grayscale` there is one luma sample per pixel; with
// `ColorMode::Color` there are four, in R, G, B, A order, with straight alpha.

pub mod pixel_buffer {
    pub type Sample = u8;
    pub type PixelBuffer = Vec<Sample>;
    pub type Label = u32;

    /// Which sample layout a decoded image is converted into.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum ColorMode {
        /// One 8-bit luma sample per pixel.
        #[default]
        Grayscale,
        /// Four 8-bit samples per pixel: R, G, B, A.
        Color,
    }

    impl ColorMode {
        pub fn channels(self) -> usize {
            match self {
                ColorMode::Grayscale => 1,
                ColorMode::Color => 4,
            }
        }
    }

    /// The external geometry of a `PixelBuffer`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ImageShape {
        pub width: u32,
        pub height: u32,
        pub channels: usize,
    }

    impl ImageShape {
        pub fn new(width: u32, height: u32, channels: usize) -> Self {
            Self {
                width,
                height,
                channels,
            }
        }

        /// Number of samples a buffer of this shape must hold.
        pub fn sample_count(&self) -> usize {
            self.width as usize * self.height as usize * self.channels
        }

        pub fn matches(&self, buffer: &[Sample]) -> bool {
            buffer.len() == self.sample_count()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel_buffer::*;

    #[test]
    fn channel_counts_follow_color_mode() {
        assert_eq!(ColorMode::Grayscale.channels(), 1);
        assert_eq!(ColorMode::Color.channels(), 4);
        assert_eq!(ColorMode::default(), ColorMode::Grayscale);
    }

    #[test]
    fn shape_validates_buffer_length() {
        let shape = ImageShape::new(3, 2, 4);
        assert_eq!(shape.sample_count(), 24);
        assert!(shape.matches(&vec![0u8; 24]));
        assert!(!shape.matches(&vec![0u8; 23]));
    }
}
