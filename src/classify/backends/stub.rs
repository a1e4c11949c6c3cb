use std::collections::VecDeque;

use anyhow::{anyhow, Result};

use crate::classify::backend::ColorClassifier;
use crate::crop::Crop;

/// Stub classifier for testing.
///
/// Hands out scripted probability vectors one per crop, in order. Running out
/// of script is an error, which is how tests notice unexpected crops.
#[derive(Default)]
pub struct StubClassifier {
    script: VecDeque<Vec<f32>>,
    calls: usize,
    crops_seen: usize,
}

impl StubClassifier {
    pub fn new<I, P>(predictions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Vec<f32>>,
    {
        Self {
            script: predictions.into_iter().map(Into::into).collect(),
            calls: 0,
            crops_seen: 0,
        }
    }

    /// Number of batches classified.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Total crops received across all batches.
    pub fn crops_seen(&self) -> usize {
        self.crops_seen
    }
}

impl ColorClassifier for StubClassifier {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn predict(&mut self, crops: &[Crop]) -> Result<Vec<Vec<f32>>> {
        self.calls += 1;
        self.crops_seen += crops.len();
        crops
            .iter()
            .map(|_| {
                self.script
                    .pop_front()
                    .ok_or_else(|| anyhow!("stub classifier script exhausted"))
            })
            .collect()
    }
}
