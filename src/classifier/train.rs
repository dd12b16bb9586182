use candle_core::{DType, Device, Result, Tensor};
use candle_nn::{loss, AdamW, Module, Optimizer, ParamsAdamW, VarBuilder, VarMap};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use super::model::{TinyCnn, IMAGE_SIZE, NUM_CLASSES};
use super::Classifier;

const DATASET_SIZE: usize = 100;
const BATCH_SIZE: usize = 16;
const EPOCHS: usize = 2;
const LEARNING_RATE: f64 = 0.001;

/// Trains a fresh model on synthetic data and freezes it. Runs once at
/// startup, before the server accepts traffic. The images are random noise,
/// so predictions carry no semantic meaning; the service contract only
/// requires a fixed, deterministic label set.
pub fn train() -> anyhow::Result<Classifier> {
    let device = Device::Cpu;
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
    let model = TinyCnn::new(vb)?;

    let (images, labels) = synthetic_dataset(DATASET_SIZE, &device)?;
    let mut optimizer = AdamW::new(
        varmap.all_vars(),
        ParamsAdamW {
            lr: LEARNING_RATE,
            weight_decay: 0.0,
            ..Default::default()
        },
    )?;

    let mut order: Vec<u32> = (0..DATASET_SIZE as u32).collect();
    let mut rng = rand::thread_rng();

    info!(
        samples = DATASET_SIZE,
        epochs = EPOCHS,
        batch_size = BATCH_SIZE,
        "training classifier on synthetic data"
    );
    for epoch in 0..EPOCHS {
        order.shuffle(&mut rng);
        let mut epoch_loss = 0f32;
        let mut batches = 0usize;
        for chunk in order.chunks(BATCH_SIZE) {
            let idx = Tensor::new(chunk, &device)?;
            let xs = images.index_select(&idx, 0)?;
            let ys = labels.index_select(&idx, 0)?;
            let logits = model.forward(&xs)?;
            let batch_loss = loss::cross_entropy(&logits, &ys)?;
            optimizer.backward_step(&batch_loss)?;
            epoch_loss += batch_loss.to_scalar::<f32>()?;
            batches += 1;
        }
        debug!(epoch, avg_loss = epoch_loss / batches as f32, "epoch done");
    }

    Ok(Classifier { model, device })
}

/// Random [0,1] pixels normalized to [-1,1], with labels cycling through the
/// classes so every class is equally represented.
fn synthetic_dataset(n: usize, device: &Device) -> Result<(Tensor, Tensor)> {
    let mut rng = rand::thread_rng();
    let pixels: Vec<f32> = (0..n * 3 * IMAGE_SIZE * IMAGE_SIZE)
        .map(|_| (rng.gen::<f32>() - 0.5) / 0.5)
        .collect();
    let images = Tensor::from_vec(pixels, (n, 3, IMAGE_SIZE, IMAGE_SIZE), device)?;

    let classes: Vec<u32> = (0..n).map(|i| (i % NUM_CLASSES) as u32).collect();
    let labels = Tensor::from_vec(classes, n, device)?;
    Ok((images, labels))
}
