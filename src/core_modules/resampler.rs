// THEORY:
// The `Resampler` brings images of different native resolutions to one common
// shape so that a distance between two buffers is a sample-by-sample comparison.
// It uses nearest-neighbor sampling and nothing else: every destination pixel is
// an exact copy of one source pixel, so no new sample values are ever invented.
//
// Coordinate mapping, per destination pixel `(x, y)`:
//
//     src_x = trunc(x * (in_w / out_w))
//     src_y = trunc(y * (in_h / out_h))
//
// The ratio is computed once in `f64` and the product truncated, not rounded.
// This biases sampling toward the top-left of each source cell, and buffers
// produced elsewhere with the same arithmetic are bit-identical to ours only if
// this is kept exactly as is.

pub mod resampler {
    use crate::core_modules::pixel_buffer::pixel_buffer::{ImageShape, PixelBuffer};
    use crate::error::{HinaError, Result};

    /// Nearest-neighbor resize of a flat buffer with `channels` samples per pixel.
    pub fn resize_nearest(
        input: &[u8],
        in_w: u32,
        in_h: u32,
        out_w: u32,
        out_h: u32,
        channels: usize,
    ) -> Result<PixelBuffer> {
        if in_w == 0 || in_h == 0 {
            return Err(HinaError::Geometry(format!(
                "cannot resample from an empty {}x{} source",
                in_w, in_h
            )));
        }
        if channels == 0 {
            return Err(HinaError::Geometry("channel count must be at least 1".to_string()));
        }
        let source_shape = ImageShape::new(in_w, in_h, channels);
        if !source_shape.matches(input) {
            return Err(HinaError::Geometry(format!(
                "source buffer has {} samples, {}x{}x{} needs {}",
                input.len(),
                in_w,
                in_h,
                channels,
                source_shape.sample_count()
            )));
        }

        let (in_w, out_w, out_h) = (in_w as usize, out_w as usize, out_h as usize);
        let mut output = vec![0u8; out_w * out_h * channels];
        if output.is_empty() {
            return Ok(output);
        }

        let x_ratio = in_w as f64 / out_w as f64;
        let y_ratio = in_h as f64 / out_h as f64;

        for y in 0..out_h {
            let src_y = (y as f64 * y_ratio) as usize;
            for x in 0..out_w {
                let src_x = (x as f64 * x_ratio) as usize;

                let src_index = (src_y * in_w + src_x) * channels;
                let dst_index = (y * out_w + x) * channels;

                output[dst_index..dst_index + channels]
                    .copy_from_slice(&input[src_index..src_index + channels]);
            }
        }

        Ok(output)
    }

    /// Same as `resize_nearest`, taking the source geometry as an `ImageShape`.
    pub fn resize_shape(
        input: &[u8],
        shape: ImageShape,
        out_w: u32,
        out_h: u32,
    ) -> Result<(PixelBuffer, ImageShape)> {
        let output = resize_nearest(input, shape.width, shape.height, out_w, out_h, shape.channels)?;
        Ok((output, ImageShape::new(out_w, out_h, shape.channels)))
    }
}
