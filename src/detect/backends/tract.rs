#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::imageops::{self, FilterType};
use tract_onnx::prelude::*;

use crate::detect::backend::TrafficLightDetector;
use crate::detect::result::{class_id_from_raw, BoundingBox, DetectorOutput};
use crate::frame::Frame;

/// Tract-based detector for an ONNX export of a COCO object detection graph.
///
/// The model takes a `u8` tensor shaped `[1, height, width, 3]` and produces,
/// in order: boxes `[1, N, 4]`, scores `[1, N]`, classes `[1, N]` and
/// `num_detections` `[1]`. Boxes are normalized, so frames of any size are
/// resized to the model input before inference.
pub struct TractDetector {
    model: TypedRunnableModel<TypedModel>,
    width: u32,
    height: u32,
}

impl TractDetector {
    /// Load an ONNX model from disk and prepare it for inference.
    pub fn new<P: AsRef<Path>>(model_path: P, width: u32, height: u32) -> Result<Self> {
        let model_path = model_path.as_ref();
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| format!("failed to load ONNX detector from {}", model_path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    u8::datum_type(),
                    tvec!(1, height as usize, width as usize, 3),
                ),
            )
            .context("failed to set detector input fact")?
            .into_optimized()
            .context("failed to optimize ONNX detector")?
            .into_runnable()
            .context("failed to build runnable ONNX detector")?;
        log::info!(
            "loaded detector {} (input {}x{})",
            model_path.display(),
            width,
            height
        );

        Ok(Self {
            model,
            width,
            height,
        })
    }

    fn build_input(&self, frame: &Frame) -> Result<Tensor> {
        let pixels = if frame.width() == self.width && frame.height() == self.height {
            frame.pixels().to_vec()
        } else {
            imageops::resize(frame.as_image(), self.width, self.height, FilterType::Triangle)
                .into_raw()
        };
        let input = tract_ndarray::Array4::from_shape_vec(
            (1, self.height as usize, self.width as usize, 3),
            pixels,
        )
        .context("detector input does not match model shape")?;
        Ok(input.into_tensor())
    }
}

fn flatten_output(outputs: &TVec<TValue>, index: usize, what: &str) -> Result<Vec<f32>> {
    let output = outputs
        .get(index)
        .ok_or_else(|| anyhow!("detector produced no {} output", what))?;
    let view = output
        .to_array_view::<f32>()
        .with_context(|| format!("detector {} tensor was not f32", what))?;
    Ok(view.iter().copied().collect())
}

fn parse_outputs(outputs: &TVec<TValue>) -> Result<DetectorOutput> {
    let boxes = flatten_output(outputs, 0, "boxes")?;
    let scores = flatten_output(outputs, 1, "scores")?;
    let classes = flatten_output(outputs, 2, "classes")?;
    let num_detections = flatten_output(outputs, 3, "num_detections")?;

    if boxes.len() % 4 != 0 {
        return Err(anyhow!(
            "detector boxes tensor has {} values, expected a multiple of 4",
            boxes.len()
        ));
    }

    let output = DetectorOutput {
        boxes: boxes
            .chunks_exact(4)
            .map(|row| BoundingBox::from_row([row[0], row[1], row[2], row[3]]))
            .collect(),
        scores,
        classes: classes.into_iter().map(class_id_from_raw).collect(),
        num_detections: num_detections.first().map(|n| n.max(0.0) as usize).unwrap_or(0),
    };
    output.validate()?;
    Ok(output)
}

impl TrafficLightDetector for TractDetector {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn detect(&mut self, frame: &Frame) -> Result<DetectorOutput> {
        let input = self.build_input(frame)?;
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("ONNX detector inference failed")?;
        parse_outputs(&outputs)
    }

    fn warm_up(&mut self) -> Result<()> {
        let blank = Frame::from_interleaved(
            vec![0u8; (self.width * self.height * 3) as usize],
            self.width,
            self.height,
        )?;
        self.detect(&blank).map(|_| ())
    }
}
