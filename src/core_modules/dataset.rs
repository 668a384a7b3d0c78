// THEORY:
// The `Dataset` is the in-memory product of a build: parallel arrays of pixel
// buffers, labels and shapes. Everything about it revolves around one invariant:
// index `i` of every array describes the same sample. Appending pushes to all
// arrays at once, and every reorder applies the identical permutation to all of
// them. There is no removal API.
//
// Randomness is injected. `shuffle` takes any `rand::Rng`, so tests (and
// reproducible experiments) pass a seeded generator instead of relying on a
// hidden process-wide source.

use crate::core_modules::pixel_buffer::pixel_buffer::{ImageShape, Label, PixelBuffer};
use crate::error::{HinaError, Result};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Label-aligned collection of decoded images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    images: Vec<PixelBuffer>,
    labels: Vec<Label>,
    shapes: Vec<ImageShape>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            images: Vec::with_capacity(capacity),
            labels: Vec::with_capacity(capacity),
            shapes: Vec::with_capacity(capacity),
        }
    }

    /// Appends one sample. The buffer is moved in; the dataset owns it from here on.
    pub fn push(&mut self, image: PixelBuffer, label: Label, shape: ImageShape) {
        self.images.push(image);
        self.labels.push(label);
        self.shapes.push(shape);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[PixelBuffer] {
        &self.images
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn shapes(&self) -> &[ImageShape] {
        &self.shapes
    }

    pub fn get(&self, index: usize) -> Option<(&[u8], Label, ImageShape)> {
        Some((
            self.images.get(index)?.as_slice(),
            self.labels[index],
            self.shapes[index],
        ))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], Label, ImageShape)> {
        self.images
            .iter()
            .zip(self.labels.iter())
            .zip(self.shapes.iter())
            .map(|((image, &label), &shape)| (image.as_slice(), label, shape))
    }

    /// The shape shared by every sample, or `None` if the dataset is empty or
    /// holds images of different shapes.
    pub fn uniform_shape(&self) -> Option<ImageShape> {
        let first = *self.shapes.first()?;
        self.shapes.iter().all(|s| *s == first).then_some(first)
    }

    /// Number of samples per label, indexed by label.
    pub fn class_counts(&self, num_classes: usize) -> Vec<usize> {
        let mut counts = vec![0usize; num_classes];
        for &label in &self.labels {
            if let Some(count) = counts.get_mut(label as usize) {
                *count += 1;
            }
        }
        counts
    }

    /// Unbiased in-place Fisher-Yates shuffle applied to all parallel arrays.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in (1..self.len()).rev() {
            let j = rng.gen_range(0..=i);
            self.images.swap(i, j);
            self.labels.swap(i, j);
            self.shapes.swap(i, j);
        }
    }

    /// Reproducible shuffle driven by a ChaCha8 generator seeded with `seed`.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.shuffle(&mut rng);
    }

    /// Splits into `(train, eval)` at `floor(len * train_fraction)`, keeping order.
    /// Shuffle first for a random split.
    pub fn split(mut self, train_fraction: f64) -> Result<(Dataset, Dataset)> {
        if !(0.0..=1.0).contains(&train_fraction) {
            return Err(HinaError::Config(format!(
                "train fraction must be within [0, 1], got {}",
                train_fraction
            )));
        }
        let at = (self.len() as f64 * train_fraction).floor() as usize;

        let eval = Dataset {
            images: self.images.split_off(at),
            labels: self.labels.split_off(at),
            shapes: self.shapes.split_off(at),
        };
        Ok((self, eval))
    }
}
