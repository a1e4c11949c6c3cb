//! Double-stage traffic light classification.
//!
//! One frame in, one `ColorLabel` out:
//!
//! 1. the detector proposes boxes over the whole frame,
//! 2. confident traffic-light boxes are kept,
//! 3. each kept box that is traffic-light shaped becomes a 50x50 crop,
//! 4. the color classifier votes per crop and the votes are fused.
//!
//! Every soft failure along the way (nothing detected, no usable crop, no
//! confident or unambiguous vote) yields `ColorLabel::Unknown`. Backend
//! errors are returned to the caller untouched.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::classify::ColorClassifier;
use crate::color::ColorLabel;
use crate::crop::{extract_crop, Crop};
use crate::detect::{select_traffic_lights, TrafficLightDetector};
use crate::frame::Frame;

/// What happened while classifying one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FrameReport {
    /// Rows returned by the detector.
    pub detections: usize,
    /// Rows that passed the class and score filter.
    pub candidates: usize,
    /// Candidates that produced a crop.
    pub crops: usize,
    /// Fused class index, when the classifier reached a decision.
    pub class_index: Option<usize>,
    pub label: ColorLabel,
}

/// Detector + color classifier, constructed once and reused for every frame.
pub struct DoubleStageClassifier<D, C> {
    detector: D,
    classifier: C,
}

impl<D, C> DoubleStageClassifier<D, C>
where
    D: TrafficLightDetector,
    C: ColorClassifier,
{
    pub fn new(detector: D, classifier: C) -> Self {
        Self {
            detector,
            classifier,
        }
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn into_parts(self) -> (D, C) {
        (self.detector, self.classifier)
    }

    /// Run the backends' warm-up hooks.
    pub fn warm_up(&mut self) -> Result<()> {
        self.detector
            .warm_up()
            .with_context(|| format!("detector {} warm-up failed", self.detector.name()))?;
        Ok(())
    }

    /// Classify the traffic light state visible in `frame`.
    pub fn classify(&mut self, frame: &Frame) -> Result<ColorLabel> {
        Ok(self.classify_with_report(frame)?.label)
    }

    /// Like `classify`, also returning per-stage counts.
    pub fn classify_with_report(&mut self, frame: &Frame) -> Result<FrameReport> {
        let output = self
            .detector
            .detect(frame)
            .with_context(|| format!("detector {} failed", self.detector.name()))?;
        output.validate()?;

        let mut report = FrameReport {
            detections: output.len(),
            ..FrameReport::default()
        };

        let candidates = select_traffic_lights(&output);
        report.candidates = candidates.len();
        if candidates.is_empty() {
            log::debug!("no traffic light detected");
            return Ok(report);
        }
        log::debug!("detected {} possible traffic lights", candidates.len());

        let crops: Vec<Crop> = candidates
            .iter()
            .filter_map(|d| extract_crop(frame, &d.bbox))
            .collect();
        report.crops = crops.len();
        if crops.is_empty() {
            log::warn!(
                "none of {} traffic light candidates had a usable shape",
                candidates.len()
            );
            return Ok(report);
        }

        report.class_index = self
            .classifier
            .classify(&crops)
            .with_context(|| format!("classifier {} failed", self.classifier.name()))?;
        report.label = ColorLabel::from_class_index(report.class_index);
        log::debug!(
            "classified {} crops -> {} ({:?})",
            crops.len(),
            report.label,
            report.class_index
        );
        Ok(report)
    }
}
