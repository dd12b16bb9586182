use candle_core::{Result, Tensor};
use candle_nn::{conv2d, linear, Conv2d, Conv2dConfig, Linear, Module, VarBuilder};

pub const IMAGE_SIZE: usize = 64;
pub const NUM_CLASSES: usize = super::labels::LABELS.len();

/// Two conv+pool stages into two fully-connected layers, logits out.
///
/// 3x64x64 -> conv(3->8, k3, pad 1) -> relu -> pool/2
///         -> conv(8->16, k3, pad 1) -> relu -> pool/2
///         -> flatten 16*16*16 -> linear 64 -> relu -> linear NUM_CLASSES
#[derive(Debug)]
pub struct TinyCnn {
    conv1: Conv2d,
    conv2: Conv2d,
    fc1: Linear,
    fc2: Linear,
}

impl TinyCnn {
    pub fn new(vb: VarBuilder) -> Result<Self> {
        let conv_cfg = Conv2dConfig {
            padding: 1,
            ..Default::default()
        };
        let conv1 = conv2d(3, 8, 3, conv_cfg, vb.pp("conv1"))?;
        let conv2 = conv2d(8, 16, 3, conv_cfg, vb.pp("conv2"))?;
        let fc1 = linear(16 * 16 * 16, 64, vb.pp("fc1"))?;
        let fc2 = linear(64, NUM_CLASSES, vb.pp("fc2"))?;
        Ok(Self {
            conv1,
            conv2,
            fc1,
            fc2,
        })
    }
}

impl Module for TinyCnn {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let xs = self.conv1.forward(xs)?.relu()?.max_pool2d(2)?;
        let xs = self.conv2.forward(&xs)?.relu()?.max_pool2d(2)?;
        let xs = xs.flatten_from(1)?;
        let xs = self.fc1.forward(&xs)?.relu()?;
        // raw logits, argmax happens at the call site
        self.fc2.forward(&xs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    #[test]
    fn forward_produces_one_logit_per_class() {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let model = TinyCnn::new(vb).unwrap();

        let input = Tensor::zeros((2, 3, IMAGE_SIZE, IMAGE_SIZE), DType::F32, &device).unwrap();
        let logits = model.forward(&input).unwrap();
        assert_eq!(logits.dims(), &[2, NUM_CLASSES]);
    }
}
