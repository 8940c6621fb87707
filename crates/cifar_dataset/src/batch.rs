//! Burn-compatible batch iteration over an in-memory YUV dataset.

use crate::types::{YuvImage, IMAGE_DIM, PLANE_LEN};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// One training batch: luma inputs and chroma targets.
pub struct BurnBatch<B: burn::tensor::backend::Backend> {
    /// Luminance inputs, `[B, 1, 32, 32]`.
    pub luma: burn::tensor::Tensor<B, 4>,
    /// Chrominance targets (U then V), `[B, 2, 32, 32]`.
    pub chroma: burn::tensor::Tensor<B, 4>,
}

pub struct BatchIter<'a> {
    images: &'a [YuvImage],
    order: Vec<usize>,
    cursor: usize,
    luma_buf: Vec<f32>,
    chroma_buf: Vec<f32>,
}

impl<'a> BatchIter<'a> {
    /// Iterate the dataset in its stored order.
    pub fn new(images: &'a [YuvImage]) -> Self {
        Self {
            images,
            order: (0..images.len()).collect(),
            cursor: 0,
            luma_buf: Vec::new(),
            chroma_buf: Vec::new(),
        }
    }

    /// Iterate in a freshly shuffled order (one epoch's batch order).
    pub fn shuffled(images: &'a [YuvImage], rng: &mut StdRng) -> Self {
        let mut iter = Self::new(images);
        iter.order.shuffle(rng);
        iter
    }

    pub fn next_batch<B: burn::tensor::backend::Backend>(
        &mut self,
        batch_size: usize,
        device: &B::Device,
    ) -> Option<BurnBatch<B>> {
        if self.cursor >= self.order.len() {
            return None;
        }
        let end = (self.cursor + batch_size).min(self.order.len());
        let slice = &self.order[self.cursor..end];
        self.cursor = end;

        self.luma_buf.clear();
        self.chroma_buf.clear();
        self.luma_buf.reserve(slice.len() * PLANE_LEN);
        self.chroma_buf.reserve(slice.len() * 2 * PLANE_LEN);
        for &idx in slice {
            let img = &self.images[idx];
            self.luma_buf.extend_from_slice(img.luma());
            self.chroma_buf.extend_from_slice(img.chroma());
        }

        let batch_len = slice.len();
        let luma = burn::tensor::Tensor::<B, 1>::from_floats(self.luma_buf.as_slice(), device)
            .reshape([batch_len, 1, IMAGE_DIM, IMAGE_DIM]);
        let chroma = burn::tensor::Tensor::<B, 1>::from_floats(self.chroma_buf.as_slice(), device)
            .reshape([batch_len, 2, IMAGE_DIM, IMAGE_DIM]);

        Some(BurnBatch { luma, chroma })
    }
}
