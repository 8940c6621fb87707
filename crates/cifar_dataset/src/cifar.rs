//! Loading CIFAR-10 binary batch files into YUV images.

use crate::colorspace::rgb_planes_to_yuv;
use crate::types::{
    CifarDatasetError, DatasetConfig, DatasetResult, YuvImage, RECORDS_PER_FILE, RECORD_LEN,
    TRAIN_FILES,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fs;
use std::path::Path;

/// Load one binary batch file (10,000 records of `RECORD_LEN` bytes).
///
/// Each record is one label byte followed by channel-planar RGB bytes; the
/// label is dropped and the pixels are converted to YUV planes.
pub fn load_batch_file(path: &Path) -> DatasetResult<Vec<YuvImage>> {
    let raw = fs::read(path).map_err(|e| CifarDatasetError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    if raw.is_empty() || raw.len() % RECORD_LEN != 0 {
        return Err(CifarDatasetError::Truncated {
            path: path.to_path_buf(),
            len: raw.len(),
            record_len: RECORD_LEN,
        });
    }

    let mut images = Vec::with_capacity(raw.len() / RECORD_LEN);
    for record in raw.chunks_exact(RECORD_LEN) {
        images.push(YuvImage {
            planes: rgb_planes_to_yuv(&record[1..]),
        });
    }
    Ok(images)
}

/// Load the five training batches under `root` (50,000 images).
pub fn load_training_set(root: &Path) -> DatasetResult<Vec<YuvImage>> {
    let mut images = Vec::with_capacity(TRAIN_FILES.len() * RECORDS_PER_FILE);
    for name in TRAIN_FILES {
        images.extend(load_batch_file(&root.join(name))?);
    }
    if images.is_empty() {
        return Err(CifarDatasetError::Empty {
            root: root.to_path_buf(),
        });
    }
    Ok(images)
}

/// Shuffle the dataset in place. With a seed the order is reproducible.
pub fn shuffle_images(images: &mut [YuvImage], cfg: &DatasetConfig) {
    if !cfg.shuffle {
        return;
    }
    let mut rng = match cfg.seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_rng(&mut rand::rng()),
    };
    images.shuffle(&mut rng);
}
