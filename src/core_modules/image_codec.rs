// THEORY:
// The `ImageCodec` is the bridge between files on disk and `PixelBuffer`s in
// memory. Container formats are the `image` crate's business; this module only
// decides which sample layout comes out (luma or RGBA) and which one goes back in.
//
// Key architectural principles:
// 1.  **Fail Loud**: A file that cannot be opened or decoded is a hard error,
//     and the builder propagates it instead of skipping the file.
// 2.  **Straight Alpha**: Color decodes are converted to RGBA8 with unassociated
//     alpha, so an encode/decode round trip through PNG is lossless.
// 3.  **Validated Geometry**: The encoder checks the buffer length against
//     `width * height * channels` before touching the filesystem.

use crate::core_modules::pixel_buffer::pixel_buffer::{ColorMode, ImageShape, PixelBuffer};
use crate::error::{HinaError, Result};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GenericImageView, ImageEncoder, ImageError, ImageReader};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A decoded image together with the geometry its buffer was produced with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub pixels: PixelBuffer,
    pub width: u32,
    pub height: u32,
    pub mode: ColorMode,
}

impl DecodedImage {
    pub fn shape(&self) -> ImageShape {
        ImageShape::new(self.width, self.height, self.mode.channels())
    }
}

/// Decodes the image at `path` into a flat buffer in the requested color mode.
pub fn decode(path: &Path, mode: ColorMode) -> Result<DecodedImage> {
    let decode_error = |source: ImageError| HinaError::Decode {
        path: path.to_path_buf(),
        source,
    };
    // Sniff the format from the content so files without a known extension still decode.
    let img = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_error(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_error)?;
    let (width, height) = img.dimensions();

    let pixels = match mode {
        ColorMode::Grayscale => img.to_luma8().into_raw(),
        ColorMode::Color => img.to_rgba8().into_raw(),
    };

    Ok(DecodedImage {
        pixels,
        width,
        height,
        mode,
    })
}

/// Writes an RGBA buffer as a PNG at `path`, replacing any existing file.
pub fn encode_png(pixels: &[u8], width: u32, height: u32, path: &Path) -> Result<()> {
    encode_png_as(pixels, width, height, ColorMode::Color, path)
}

/// Writes a buffer in the given color mode as a PNG (RGBA8 or L8).
pub fn encode_png_as(
    pixels: &[u8],
    width: u32,
    height: u32,
    mode: ColorMode,
    path: &Path,
) -> Result<()> {
    let shape = ImageShape::new(width, height, mode.channels());
    if !shape.matches(pixels) {
        return Err(HinaError::Geometry(format!(
            "buffer of {} samples cannot hold a {}x{} image with {} channel(s) ({} expected)",
            pixels.len(),
            width,
            height,
            shape.channels,
            shape.sample_count()
        )));
    }

    let color_type = match mode {
        ColorMode::Grayscale => ExtendedColorType::L8,
        ColorMode::Color => ExtendedColorType::Rgba8,
    };

    let mut writer = BufWriter::new(File::create(path)?);
    PngEncoder::new(&mut writer)
        .write_image(pixels, width, height, color_type)
        .map_err(|source| HinaError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    writer.flush()?;

    Ok(())
}
