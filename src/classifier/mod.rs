//! Image classifier trained at startup.
//!
//! The network architecture and training procedure are fixed: two conv+pool
//! stages into two fully-connected layers, trained for two epochs on 100
//! synthetic images. The weights never change after startup, so the model is
//! safe to share between request handlers.

use candle_core::{Device, Tensor, D};
use candle_nn::Module;
use image::{imageops::FilterType, DynamicImage};

mod labels;
mod model;
mod train;

pub use labels::{disease_info, DiseaseInfo, HealthStatus, LABELS};
pub use model::{IMAGE_SIZE, NUM_CLASSES};

use model::TinyCnn;

pub struct Classifier {
    model: TinyCnn,
    device: Device,
}

impl Classifier {
    /// Trains a fresh model on synthetic data. See [`train`].
    pub fn train() -> anyhow::Result<Self> {
        train::train()
    }

    /// Maps a decoded image to one of the fixed labels: preprocess, forward
    /// pass, argmax over the logits. Deterministic for frozen weights.
    pub fn classify(&self, img: &DynamicImage) -> anyhow::Result<&'static str> {
        let input = self.preprocess(img)?;
        let logits = self.model.forward(&input)?;
        let predicted = logits.argmax(D::Minus1)?.squeeze(0)?.to_scalar::<u32>()?;
        Ok(LABELS[predicted as usize])
    }

    /// Resize to 64x64, scale RGB to [0,1], then normalize each channel with
    /// mean 0.5 and std 0.5, yielding a (1, 3, 64, 64) tensor in [-1,1].
    fn preprocess(&self, img: &DynamicImage) -> candle_core::Result<Tensor> {
        let resized = img
            .resize_exact(IMAGE_SIZE as u32, IMAGE_SIZE as u32, FilterType::Triangle)
            .to_rgb8();

        let mut data = vec![0f32; 3 * IMAGE_SIZE * IMAGE_SIZE];
        for (x, y, pixel) in resized.enumerate_pixels() {
            for channel in 0..3 {
                let value = pixel[channel] as f32 / 255.0;
                data[channel * IMAGE_SIZE * IMAGE_SIZE + y as usize * IMAGE_SIZE + x as usize] =
                    (value - 0.5) / 0.5;
            }
        }
        Tensor::from_vec(data, (1, 3, IMAGE_SIZE, IMAGE_SIZE), &self.device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn noise_image(width: u32, height: u32) -> DynamicImage {
        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let v = ((x * 31 + y * 17) % 256) as u8;
            *pixel = image::Rgb([v, v.wrapping_mul(3), v.wrapping_add(64)]);
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn preprocess_shape_and_range() {
        let classifier = Classifier::train().unwrap();
        let tensor = classifier.preprocess(&noise_image(120, 90)).unwrap();
        assert_eq!(tensor.dims(), &[1, 3, IMAGE_SIZE, IMAGE_SIZE]);

        let flat = tensor.flatten_all().unwrap().to_vec1::<f32>().unwrap();
        assert!(flat.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn classify_returns_a_known_label_and_is_deterministic() {
        let classifier = Classifier::train().unwrap();
        let img = noise_image(200, 200);
        let label = classifier.classify(&img).unwrap();
        assert!(LABELS.contains(&label));
        // frozen weights: same input, same label
        assert_eq!(classifier.classify(&img).unwrap(), label);
    }
}
