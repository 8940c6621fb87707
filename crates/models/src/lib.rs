//! Burn ML models for chroma prediction.
//!
//! This crate defines the colorization architecture:
//! - `UNet`: symmetric convolutional encoder-decoder with skip connections,
//!   mapping one luminance plane to two chrominance planes.
//!
//! These are pure Burn Modules with no awareness of dataset or training
//! concerns; the `training` crate drives them.

use burn::module::{Ignored, Module};
use burn::nn;
use burn::tensor::activation::{leaky_relu, relu};
use burn::tensor::module::interpolate;
use burn::tensor::ops::{InterpolateMode, InterpolateOptions};
use burn::tensor::Tensor;

/// Negative slope of the encoder's leaky rectifier.
const LEAKY_SLOPE: f64 = 0.3;

#[derive(Debug, Clone, Copy)]
pub struct UNetConfig {
    /// Input channels (the luminance plane).
    pub luma_channels: usize,
    /// Output channels (the two chrominance planes).
    pub chroma_channels: usize,
    /// Channel depth of the first encoder stage; doubled at each stage below.
    pub base_width: usize,
}

impl Default for UNetConfig {
    fn default() -> Self {
        Self {
            luma_channels: 1,
            chroma_channels: 2,
            base_width: 64,
        }
    }
}

/// Which rectifier a conv block applies after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockActivation {
    Relu,
    LeakyRelu,
}

fn conv3x3<B: burn::tensor::backend::Backend>(
    channels: [usize; 2],
    device: &B::Device,
) -> nn::conv::Conv2d<B> {
    nn::conv::Conv2dConfig::new(channels, [3, 3])
        .with_padding(nn::PaddingConfig2d::Same)
        .with_initializer(nn::Initializer::KaimingNormal {
            gain: std::f64::consts::SQRT_2,
            fan_out_only: false,
        })
        .init(device)
}

/// Two conv + batch-norm + activation blocks at a fixed channel width.
#[derive(Debug, Module)]
pub struct DoubleConv<B: burn::tensor::backend::Backend> {
    conv1: nn::conv::Conv2d<B>,
    norm1: nn::BatchNorm<B, 2>,
    conv2: nn::conv::Conv2d<B>,
    norm2: nn::BatchNorm<B, 2>,
    activation: Ignored<BlockActivation>,
}

impl<B: burn::tensor::backend::Backend> DoubleConv<B> {
    pub fn new(
        input_channels: usize,
        width: usize,
        activation: BlockActivation,
        device: &B::Device,
    ) -> Self {
        Self {
            conv1: conv3x3([input_channels, width], device),
            norm1: nn::BatchNormConfig::new(width).init(device),
            conv2: conv3x3([width, width], device),
            norm2: nn::BatchNormConfig::new(width).init(device),
            activation: Ignored(activation),
        }
    }

    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.activate(self.norm1.forward(self.conv1.forward(input)));
        self.activate(self.norm2.forward(self.conv2.forward(x)))
    }

    fn activate(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        match self.activation.0 {
            BlockActivation::Relu => relu(x),
            BlockActivation::LeakyRelu => leaky_relu(x, LEAKY_SLOPE),
        }
    }
}

/// Nearest-neighbor x2 upsampling followed by a channel-reducing conv block.
#[derive(Debug, Module)]
pub struct UpBlock<B: burn::tensor::backend::Backend> {
    conv: nn::conv::Conv2d<B>,
    norm: nn::BatchNorm<B, 2>,
}

impl<B: burn::tensor::backend::Backend> UpBlock<B> {
    pub fn new(input_channels: usize, width: usize, device: &B::Device) -> Self {
        Self {
            conv: conv3x3([input_channels, width], device),
            norm: nn::BatchNormConfig::new(width).init(device),
        }
    }

    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let [_, _, height, width] = input.dims();
        let x = interpolate(
            input,
            [height * 2, width * 2],
            InterpolateOptions::new(InterpolateMode::Nearest),
        );
        relu(self.norm.forward(self.conv.forward(x)))
    }
}

/// U-Net encoder-decoder predicting chroma planes from a luma plane.
///
/// Shapes:
/// - Input: `[B, 1, H, W]` (H, W divisible by 16)
/// - Output: `[B, 2, H, W]`, linear (regression output)
///
/// Encoder blocks use a leaky rectifier, decoder blocks a plain rectifier;
/// the asymmetry is deliberate.
#[derive(Debug, Module)]
pub struct UNet<B: burn::tensor::backend::Backend> {
    enc1: DoubleConv<B>,
    enc2: DoubleConv<B>,
    enc3: DoubleConv<B>,
    enc4: DoubleConv<B>,
    pool: nn::pool::MaxPool2d,
    bottleneck: DoubleConv<B>,
    up1: UpBlock<B>,
    dec1: DoubleConv<B>,
    up2: UpBlock<B>,
    dec2: DoubleConv<B>,
    up3: UpBlock<B>,
    dec3: DoubleConv<B>,
    up4: UpBlock<B>,
    dec4: DoubleConv<B>,
    head: nn::conv::Conv2d<B>,
    pub config: Ignored<UNetConfig>,
}

impl<B: burn::tensor::backend::Backend> UNet<B> {
    pub fn new(config: UNetConfig, device: &B::Device) -> Self {
        let w = config.base_width;
        let leaky = BlockActivation::LeakyRelu;
        let plain = BlockActivation::Relu;

        Self {
            enc1: DoubleConv::new(config.luma_channels, w, leaky, device),
            enc2: DoubleConv::new(w, w * 2, leaky, device),
            enc3: DoubleConv::new(w * 2, w * 4, leaky, device),
            enc4: DoubleConv::new(w * 4, w * 8, leaky, device),
            pool: nn::pool::MaxPool2dConfig::new([2, 2])
                .with_strides([2, 2])
                .init(),
            bottleneck: DoubleConv::new(w * 8, w * 16, leaky, device),
            up1: UpBlock::new(w * 16, w * 8, device),
            dec1: DoubleConv::new(w * 16, w * 8, plain, device),
            up2: UpBlock::new(w * 8, w * 4, device),
            dec2: DoubleConv::new(w * 8, w * 4, plain, device),
            up3: UpBlock::new(w * 4, w * 2, device),
            dec3: DoubleConv::new(w * 4, w * 2, plain, device),
            up4: UpBlock::new(w * 2, w, device),
            dec4: DoubleConv::new(w * 2, w, plain, device),
            head: nn::conv::Conv2dConfig::new([w, config.chroma_channels], [1, 1])
                .with_padding(nn::PaddingConfig2d::Valid)
                .init(device),
            config: Ignored(config),
        }
    }

    pub fn forward(&self, luma: Tensor<B, 4>) -> Tensor<B, 4> {
        let skip1 = self.enc1.forward(luma);
        let skip2 = self.enc2.forward(self.pool.forward(skip1.clone()));
        let skip3 = self.enc3.forward(self.pool.forward(skip2.clone()));
        let skip4 = self.enc4.forward(self.pool.forward(skip3.clone()));
        let x = self.bottleneck.forward(self.pool.forward(skip4.clone()));

        // Skip connections concatenate encoder features ahead of the
        // upsampled decoder features along the channel axis.
        let x = self.dec1.forward(Tensor::cat(vec![skip4, self.up1.forward(x)], 1));
        let x = self.dec2.forward(Tensor::cat(vec![skip3, self.up2.forward(x)], 1));
        let x = self.dec3.forward(Tensor::cat(vec![skip2, self.up3.forward(x)], 1));
        let x = self.dec4.forward(Tensor::cat(vec![skip1, self.up4.forward(x)], 1));
        self.head.forward(x)
    }
}

pub mod prelude {
    pub use super::{BlockActivation, DoubleConv, UNet, UNetConfig, UpBlock};
}
