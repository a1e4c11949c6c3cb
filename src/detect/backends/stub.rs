use anyhow::Result;

use crate::detect::backend::TrafficLightDetector;
use crate::detect::result::DetectorOutput;
use crate::frame::Frame;

/// Stub detector for testing. Returns the same output for every frame.
pub struct StubDetector {
    output: DetectorOutput,
    calls: usize,
}

impl StubDetector {
    pub fn new(output: DetectorOutput) -> Self {
        Self { output, calls: 0 }
    }

    /// Number of frames seen so far.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Default for StubDetector {
    fn default() -> Self {
        Self::new(DetectorOutput::empty())
    }
}

impl TrafficLightDetector for StubDetector {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&mut self, _frame: &Frame) -> Result<DetectorOutput> {
        self.calls += 1;
        Ok(self.output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::result::{BoundingBox, Detection};

    #[test]
    fn stub_detector_replays_output() {
        let output: DetectorOutput = [Detection {
            bbox: BoundingBox::new(0.1, 0.1, 0.5, 0.2),
            class_id: 10,
            score: 0.9,
        }]
        .into_iter()
        .collect();
        let mut detector = StubDetector::new(output);
        let frame = Frame::from_interleaved(vec![0u8; 12], 2, 2).unwrap();

        let r1 = detector.detect(&frame).unwrap();
        let r2 = detector.detect(&frame).unwrap();
        assert_eq!(r1.len(), 1);
        assert_eq!(r2.scores, vec![0.9]);
        assert_eq!(detector.calls(), 2);
    }
}
