//! CIFAR-10 YUV dataset loading and Burn-compatible batching.
//!
//! This crate provides utilities for:
//! - Loading the CIFAR-10 binary batch files from the filesystem
//! - RGB <-> full-range BT.601 YUV conversion
//! - Seedable in-place shuffling and train/val splitting
//! - Burn-compatible batch iteration over luma inputs and chroma targets

pub mod batch;
pub mod cifar;
pub mod colorspace;
pub mod splits;
pub mod types;

pub use batch::{BatchIter, BurnBatch};
pub use cifar::{load_batch_file, load_training_set, shuffle_images};
pub use colorspace::{rgb_to_yuv, yuv_planes_to_rgb8, yuv_to_rgb};
pub use splits::split_train_val;
pub use types::*;
