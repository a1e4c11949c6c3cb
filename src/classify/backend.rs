use anyhow::{anyhow, Result};

use crate::classify::vote::fuse_votes;
use crate::crop::Crop;

/// Color classifier backend.
///
/// `predict` returns one probability vector per crop, in batch order, over the
/// color classes RED, YELLOW and GREEN (indices 0, 1, 2).
pub trait ColorClassifier: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run the classifier on a batch of crops.
    fn predict(&mut self, crops: &[Crop]) -> Result<Vec<Vec<f32>>>;

    /// Classify a batch and fuse the per-crop votes into one class index.
    ///
    /// `Ok(None)` means no confident, unambiguous answer.
    fn classify(&mut self, crops: &[Crop]) -> Result<Option<usize>> {
        let predictions = self.predict(crops)?;
        if predictions.len() != crops.len() {
            return Err(anyhow!(
                "classifier {} returned {} predictions for {} crops",
                self.name(),
                predictions.len(),
                crops.len()
            ));
        }
        Ok(fuse_votes(&predictions))
    }
}

impl<C: ColorClassifier + ?Sized> ColorClassifier for Box<C> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn predict(&mut self, crops: &[Crop]) -> Result<Vec<Vec<f32>>> {
        (**self).predict(crops)
    }

    fn classify(&mut self, crops: &[Crop]) -> Result<Option<usize>> {
        (**self).classify(crops)
    }
}
