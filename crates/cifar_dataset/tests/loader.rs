use cifar_dataset::types::{CifarDatasetError, IMAGE_DIM, PLANE_LEN, RECORD_LEN};
use cifar_dataset::{
    load_batch_file, rgb_to_yuv, shuffle_images, BatchIter, DatasetConfig,
};
use std::fs;

/// Build one on-disk record: label byte + R/G/B planes filled with constants.
fn record(label: u8, r: u8, g: u8, b: u8) -> Vec<u8> {
    let mut rec = Vec::with_capacity(RECORD_LEN);
    rec.push(label);
    rec.extend(std::iter::repeat(r).take(PLANE_LEN));
    rec.extend(std::iter::repeat(g).take(PLANE_LEN));
    rec.extend(std::iter::repeat(b).take(PLANE_LEN));
    rec
}

#[test]
fn batch_file_parses_records_and_drops_labels() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("data_batch_1.bin");
    let mut raw = record(3, 255, 0, 0);
    raw.extend(record(7, 128, 128, 128));
    fs::write(&path, &raw).unwrap();

    let images = load_batch_file(&path).expect("batch file should load");
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].planes.len(), 3 * PLANE_LEN);

    // Pure red: luma matches the BT.601 red coefficient.
    let (y, u, v) = rgb_to_yuv(1.0, 0.0, 0.0);
    assert!((images[0].luma()[0] - y).abs() < 1e-6);
    assert!((images[0].chroma()[0] - u).abs() < 1e-6);
    assert!((images[0].chroma()[PLANE_LEN] - v).abs() < 1e-6);

    // Gray image: chroma planes are zero.
    assert!(images[1].chroma().iter().all(|c| c.abs() < 1e-5));
}

#[test]
fn truncated_batch_file_is_a_typed_error() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("data_batch_1.bin");
    fs::write(&path, vec![0u8; RECORD_LEN - 1]).unwrap();

    match load_batch_file(&path) {
        Err(CifarDatasetError::Truncated { len, .. }) => assert_eq!(len, RECORD_LEN - 1),
        other => panic!("expected Truncated error, got {other:?}"),
    }
}

#[test]
fn missing_batch_file_is_an_io_error() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("does_not_exist.bin");
    assert!(matches!(
        load_batch_file(&path),
        Err(CifarDatasetError::Io { .. })
    ));
}

#[test]
fn shuffle_is_deterministic_for_same_seed() {
    let images: Vec<_> = (0..32u8)
        .map(|i| {
            let mut img = cifar_dataset::YuvImage {
                planes: vec![0.0; 3 * PLANE_LEN],
            };
            img.planes[0] = i as f32;
            img
        })
        .collect();

    let cfg = DatasetConfig {
        shuffle: true,
        seed: Some(42),
    };
    let mut a = images.clone();
    let mut b = images;
    shuffle_images(&mut a, &cfg);
    shuffle_images(&mut b, &cfg);

    let order_a: Vec<f32> = a.iter().map(|img| img.planes[0]).collect();
    let order_b: Vec<f32> = b.iter().map(|img| img.planes[0]).collect();
    assert_eq!(order_a, order_b, "same seed should yield identical order");
}

#[test]
fn batches_have_documented_shapes() {
    type Backend = burn_ndarray::NdArray<f32>;

    let images: Vec<_> = (0..6)
        .map(|_| cifar_dataset::YuvImage {
            planes: vec![0.5; 3 * PLANE_LEN],
        })
        .collect();
    let device = Default::default();

    let mut iter = BatchIter::new(&images);
    let batch = iter.next_batch::<Backend>(4, &device).expect("first batch");
    assert_eq!(batch.luma.dims(), [4, 1, IMAGE_DIM, IMAGE_DIM]);
    assert_eq!(batch.chroma.dims(), [4, 2, IMAGE_DIM, IMAGE_DIM]);

    // Remainder batch keeps the same layout with fewer rows.
    let batch = iter.next_batch::<Backend>(4, &device).expect("tail batch");
    assert_eq!(batch.luma.dims(), [2, 1, IMAGE_DIM, IMAGE_DIM]);
    assert!(iter.next_batch::<Backend>(4, &device).is_none());
}
