//! Core types and error definitions for cifar_dataset.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Width and height of every CIFAR-10 image.
pub const IMAGE_DIM: usize = 32;
/// Values per channel plane.
pub const PLANE_LEN: usize = IMAGE_DIM * IMAGE_DIM;
/// Channel planes per image.
pub const CHANNELS: usize = 3;
/// On-disk record length: one label byte plus three channel planes.
pub const RECORD_LEN: usize = 1 + CHANNELS * PLANE_LEN;
/// Records per CIFAR-10 binary batch file.
pub const RECORDS_PER_FILE: usize = 10_000;
/// The five training batch files of the standard binary distribution.
pub const TRAIN_FILES: [&str; 5] = [
    "data_batch_1.bin",
    "data_batch_2.bin",
    "data_batch_3.bin",
    "data_batch_4.bin",
    "data_batch_5.bin",
];

pub type DatasetResult<T> = Result<T, CifarDatasetError>;

#[derive(Debug, Error)]
pub enum CifarDatasetError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("truncated batch file {path}: {len} bytes is not a multiple of the {record_len}-byte record")]
    Truncated {
        path: PathBuf,
        len: usize,
        record_len: usize,
    },
    #[error("no images loaded from {root}")]
    Empty { root: PathBuf },
    #[error("{0}")]
    Other(String),
}

/// One image as three 32x32 planes in Y,U,V order.
///
/// Luma is normalized to [0, 1]; the chroma planes keep the signed ranges of
/// full-range BT.601 (U in [-0.436, 0.436], V in [-0.615, 0.615]).
#[derive(Debug, Clone)]
pub struct YuvImage {
    /// Plane-major storage: `[Y | U | V]`, `CHANNELS * PLANE_LEN` values.
    pub planes: Vec<f32>,
}

impl YuvImage {
    /// The luminance plane.
    pub fn luma(&self) -> &[f32] {
        &self.planes[..PLANE_LEN]
    }

    /// Both chrominance planes, U then V.
    pub fn chroma(&self) -> &[f32] {
        &self.planes[PLANE_LEN..]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub shuffle: bool,
    pub seed: Option<u64>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            shuffle: true,
            seed: None,
        }
    }
}
