use burn::tensor::backend::Backend;
use cifar_dataset::types::{IMAGE_DIM, PLANE_LEN};
use cifar_dataset::{
    load_training_set, shuffle_images, split_train_val, yuv_planes_to_rgb8, BatchIter,
    DatasetConfig, YuvImage,
};
use clap::Parser;
use models::{UNet, UNetConfig};
use std::fs;
use std::path::Path;
use training::util::{evaluate, load_unet_from_checkpoint, validate_backend_choice, BackendKind};
use training::TrainBackend;

#[derive(Parser, Debug)]
#[command(
    name = "eval",
    about = "Evaluate a chroma-prediction checkpoint on the held-out split (MSE/accuracy/PSNR)"
)]
struct Args {
    /// Directory containing the CIFAR-10 binary batch files.
    #[arg(long, default_value = "data/cifar-10-batches-bin")]
    data_dir: String,
    /// Backend to use (ndarray or wgpu if enabled).
    #[arg(long, value_enum, default_value_t = BackendKind::NdArray)]
    backend: BackendKind,
    /// Shuffle seed; pass the training seed to reproduce its held-out split.
    #[arg(long)]
    seed: Option<u64>,
    /// Fraction of images held out for validation.
    #[arg(long, default_value_t = 0.1)]
    val_ratio: f32,
    /// Batch size.
    #[arg(long, default_value_t = 128)]
    batch_size: usize,
    /// Checkpoint path to load.
    #[arg(long, default_value = "model2.bin")]
    checkpoint: String,
    /// Optional cap on loaded images (smoke runs).
    #[arg(long)]
    max_images: Option<usize>,
    /// Directory for side-by-side PNG dumps (input | prediction | truth).
    #[arg(long)]
    dump_dir: Option<String>,
    /// How many validation images to dump.
    #[arg(long, default_value_t = 16)]
    dump_count: usize,
    /// Optional path for a JSON metrics summary.
    #[arg(long)]
    metrics_out: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    validate_backend_choice(args.backend)?;

    let root = Path::new(&args.data_dir);
    let mut images = load_training_set(root)?;
    if let Some(cap) = args.max_images {
        images.truncate(cap);
    }
    shuffle_images(
        &mut images,
        &DatasetConfig {
            shuffle: true,
            seed: args.seed,
        },
    );
    let (_, val_images) = split_train_val(images, args.val_ratio);
    if val_images.is_empty() {
        println!("No validation images under {}", root.display());
        return Ok(());
    }

    let device = <TrainBackend as Backend>::Device::default();
    let model = match load_unet_from_checkpoint(&args.checkpoint, &device) {
        Ok(model) => {
            println!("loaded checkpoint {}", args.checkpoint);
            model
        }
        Err(e) => {
            println!(
                "Failed to load checkpoint {}; using fresh model ({e})",
                args.checkpoint
            );
            UNet::<TrainBackend>::new(UNetConfig::default(), &device)
        }
    };

    let (mse, accuracy) = evaluate(&model, &val_images, args.batch_size, &device);
    let psnr_db = mean_psnr(&model, &val_images, args.batch_size, &device);
    println!(
        "Eval complete: mse={mse:.5}, accuracy={accuracy:.5}, psnr={psnr_db:.2} dB ({} validation images)",
        val_images.len()
    );

    if let Some(dir) = &args.dump_dir {
        let written = dump_colorizations(&model, &val_images, args.dump_count, dir, &device)?;
        println!("wrote {written} comparison images to {dir}");
    }

    if let Some(path) = &args.metrics_out {
        let record = serde_json::json!({
            "checkpoint": args.checkpoint,
            "validation_images": val_images.len(),
            "mse": mse,
            "accuracy": accuracy,
            "psnr_db": psnr_db,
        });
        fs::write(path, serde_json::to_string_pretty(&record)?)?;
        println!("wrote metrics to {path}");
    }

    Ok(())
}

/// Mean PSNR (dB) of the colorized reconstruction against the ground-truth
/// image, both rendered to 8-bit RGB with the shared luma plane.
fn mean_psnr(
    model: &UNet<TrainBackend>,
    images: &[YuvImage],
    batch_size: usize,
    device: &<TrainBackend as Backend>::Device,
) -> f32 {
    let mut total = 0.0f64;
    let mut count = 0usize;
    let mut offset = 0usize;
    let mut iter = BatchIter::new(images);
    while let Some(batch) = iter.next_batch::<TrainBackend>(batch_size, device) {
        let preds = model.forward(batch.luma);
        let pred_vec = preds.into_data().to_vec::<f32>().unwrap_or_default();
        let batch_len = pred_vec.len() / (2 * PLANE_LEN);
        for b in 0..batch_len {
            let img = &images[offset + b];
            let base = b * 2 * PLANE_LEN;
            let pred_u = &pred_vec[base..base + PLANE_LEN];
            let pred_v = &pred_vec[base + PLANE_LEN..base + 2 * PLANE_LEN];
            let predicted = yuv_planes_to_rgb8(img.luma(), pred_u, pred_v);
            let truth = yuv_planes_to_rgb8(
                img.luma(),
                &img.chroma()[..PLANE_LEN],
                &img.chroma()[PLANE_LEN..],
            );
            total += psnr(&predicted, &truth) as f64;
            count += 1;
        }
        offset += batch_len;
    }
    if count == 0 {
        0.0
    } else {
        (total / count as f64) as f32
    }
}

/// PSNR between two 8-bit RGB buffers (255 peak).
fn psnr(a: &[u8], b: &[u8]) -> f32 {
    let mut err = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let d = *x as f64 - *y as f64;
        err += d * d;
    }
    // Floor keeps identical buffers at a finite ceiling value.
    let mse = (err / a.len() as f64).max(1e-10);
    (10.0 * (255.0f64 * 255.0 / mse).log10()) as f32
}

/// Write side-by-side PNGs: grayscale input | prediction | ground truth.
fn dump_colorizations(
    model: &UNet<TrainBackend>,
    images: &[YuvImage],
    count: usize,
    dir: &str,
    device: &<TrainBackend as Backend>::Device,
) -> anyhow::Result<usize> {
    fs::create_dir_all(dir)?;
    let subset = &images[..count.min(images.len())];
    let zeros = vec![0.0f32; PLANE_LEN];

    let mut written = 0usize;
    let mut offset = 0usize;
    let mut iter = BatchIter::new(subset);
    while let Some(batch) = iter.next_batch::<TrainBackend>(16, device) {
        let preds = model.forward(batch.luma);
        let pred_vec = preds.into_data().to_vec::<f32>().unwrap_or_default();
        let batch_len = pred_vec.len() / (2 * PLANE_LEN);
        for b in 0..batch_len {
            let img = &subset[offset + b];
            let base = b * 2 * PLANE_LEN;
            let gray = yuv_planes_to_rgb8(img.luma(), &zeros, &zeros);
            let predicted = yuv_planes_to_rgb8(
                img.luma(),
                &pred_vec[base..base + PLANE_LEN],
                &pred_vec[base + PLANE_LEN..base + 2 * PLANE_LEN],
            );
            let truth = yuv_planes_to_rgb8(
                img.luma(),
                &img.chroma()[..PLANE_LEN],
                &img.chroma()[PLANE_LEN..],
            );

            let mut canvas =
                image::RgbImage::new((IMAGE_DIM * 3) as u32, IMAGE_DIM as u32);
            for (panel, rgb) in [&gray, &predicted, &truth].iter().enumerate() {
                for y in 0..IMAGE_DIM {
                    for x in 0..IMAGE_DIM {
                        let i = (y * IMAGE_DIM + x) * 3;
                        canvas.put_pixel(
                            (panel * IMAGE_DIM + x) as u32,
                            y as u32,
                            image::Rgb([rgb[i], rgb[i + 1], rgb[i + 2]]),
                        );
                    }
                }
            }
            canvas.save(Path::new(dir).join(format!("val_{:04}.png", offset + b)))?;
            written += 1;
        }
        offset += batch_len;
    }
    Ok(written)
}
