use burn::module::Module;
use burn::record::{BinFileRecorder, FullPrecisionSettings};
use burn::tensor::Tensor;
use models::{UNet, UNetConfig};
use training::TrainBackend;

#[test]
fn checkpoint_round_trip_reproduces_outputs() {
    let device = Default::default();
    let config = UNetConfig {
        base_width: 4,
        ..Default::default()
    };
    let model = UNet::<TrainBackend>::new(config, &device);

    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("model2.bin");
    let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
    model.clone().save_file(&path, &recorder).expect("save");

    // Identically configured fresh model picks the weights back up.
    let reloaded = UNet::<TrainBackend>::new(config, &device)
        .load_file(&path, &recorder, &device)
        .expect("load");

    let input = Tensor::<TrainBackend, 4>::ones([1, 1, 32, 32], &device);
    let before = model.forward(input.clone()).into_data().to_vec::<f32>().unwrap();
    let after = reloaded.forward(input).into_data().to_vec::<f32>().unwrap();
    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(after.iter()) {
        assert!((a - b).abs() < 1e-6, "outputs differ after reload: {a} vs {b}");
    }
}
