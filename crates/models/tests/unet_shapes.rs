use burn::tensor::Tensor;
use models::{UNet, UNetConfig};

type Backend = burn_ndarray::NdArray<f32>;

#[test]
fn unet_maps_luma_to_two_chroma_planes() {
    let device = Default::default();
    // A narrow net keeps the test fast; the topology is identical.
    let config = UNetConfig {
        base_width: 4,
        ..Default::default()
    };
    let model = UNet::<Backend>::new(config, &device);

    let input = Tensor::<Backend, 4>::zeros([2, 1, 32, 32], &device);
    let output = model.forward(input);
    assert_eq!(output.dims(), [2, 2, 32, 32]);
}

#[test]
fn unet_handles_batch_of_one() {
    let device = Default::default();
    let config = UNetConfig {
        base_width: 4,
        ..Default::default()
    };
    let model = UNet::<Backend>::new(config, &device);

    let input = Tensor::<Backend, 4>::ones([1, 1, 32, 32], &device);
    let output = model.forward(input);
    assert_eq!(output.dims(), [1, 2, 32, 32]);
    let values = output.into_data().to_vec::<f32>().unwrap();
    assert!(values.iter().all(|v| v.is_finite()));
}
