#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tract_onnx::prelude::*;

use crate::classify::backend::ColorClassifier;
use crate::crop::{Crop, CROP_SIZE};

/// Tract-based color classifier for an ONNX export of the crop classifier.
///
/// The model takes an `f32` tensor shaped `[1, 50, 50, 3]` holding raw 0..255
/// channel values (any normalization lives inside the model) and outputs a
/// probability vector over the color classes. Crops are run one at a time.
pub struct TractClassifier {
    model: TypedRunnableModel<TypedModel>,
}

impl TractClassifier {
    /// Load an ONNX model from disk and prepare it for inference.
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        let side = CROP_SIZE as usize;
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| {
                format!("failed to load ONNX classifier from {}", model_path.display())
            })?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, side, side, 3)),
            )
            .context("failed to set classifier input fact")?
            .into_optimized()
            .context("failed to optimize ONNX classifier")?
            .into_runnable()
            .context("failed to build runnable ONNX classifier")?;
        log::info!("loaded classifier {}", model_path.display());

        Ok(Self { model })
    }

    fn build_input(crop: &Crop) -> Tensor {
        let side = CROP_SIZE as usize;
        let pixels = crop.pixels();
        tract_ndarray::Array4::from_shape_fn((1, side, side, 3), |(_, y, x, channel)| {
            pixels[(y * side + x) * 3 + channel] as f32
        })
        .into_tensor()
    }

    fn predict_one(&self, crop: &Crop) -> Result<Vec<f32>> {
        let outputs = self
            .model
            .run(tvec!(Self::build_input(crop).into()))
            .context("ONNX classifier inference failed")?;
        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("classifier produced no outputs"))?;
        let scores = output
            .to_array_view::<f32>()
            .context("classifier output tensor was not f32")?;
        Ok(scores.iter().copied().collect())
    }
}

impl ColorClassifier for TractClassifier {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn predict(&mut self, crops: &[Crop]) -> Result<Vec<Vec<f32>>> {
        crops.iter().map(|crop| self.predict_one(crop)).collect()
    }
}
