use anyhow::{anyhow, Result};

/// Box edges normalized to 0..1 of the frame height (top/bottom) and width (left/right).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl BoundingBox {
    pub fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Build from the detector's `[ymin, xmin, ymax, xmax]` row layout.
    pub fn from_row(row: [f32; 4]) -> Self {
        Self::new(row[0], row[1], row[2], row[3])
    }
}

/// Class id for raw detector class values that name no label.
pub const UNLABELED_CLASS_ID: u32 = u32::MAX;

/// Convert a detector's float class value to a label id.
///
/// Only exact non-negative integers name a label; anything else maps to
/// `UNLABELED_CLASS_ID` so it can never match a real class.
pub fn class_id_from_raw(value: f32) -> u32 {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < u32::MAX as f32 {
        value as u32
    } else {
        UNLABELED_CLASS_ID
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub class_id: u32,
    pub score: f32,
}

/// Raw detector output for a single frame (batch of one).
///
/// `boxes`, `scores` and `classes` are parallel; `num_detections` is what the
/// model reports as valid and is informational only. Every row is scanned.
#[derive(Clone, Debug, Default)]
pub struct DetectorOutput {
    pub boxes: Vec<BoundingBox>,
    pub scores: Vec<f32>,
    pub classes: Vec<u32>,
    pub num_detections: usize,
}

impl DetectorOutput {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Rejects outputs whose parallel vectors disagree in length.
    pub fn validate(&self) -> Result<()> {
        if self.scores.len() != self.boxes.len() || self.classes.len() != self.boxes.len() {
            return Err(anyhow!(
                "detector output is inconsistent: {} boxes, {} scores, {} classes",
                self.boxes.len(),
                self.scores.len(),
                self.classes.len()
            ));
        }
        Ok(())
    }

    pub fn detections(&self) -> impl Iterator<Item = Detection> + '_ {
        self.boxes
            .iter()
            .zip(&self.scores)
            .zip(&self.classes)
            .map(|((bbox, score), class_id)| Detection {
                bbox: *bbox,
                class_id: *class_id,
                score: *score,
            })
    }

    pub fn push(&mut self, detection: Detection) {
        self.boxes.push(detection.bbox);
        self.scores.push(detection.score);
        self.classes.push(detection.class_id);
        self.num_detections = self.boxes.len();
    }
}

impl FromIterator<Detection> for DetectorOutput {
    fn from_iter<I: IntoIterator<Item = Detection>>(iter: I) -> Self {
        let mut output = DetectorOutput::empty();
        for detection in iter {
            output.push(detection);
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_lengths_fail_validation() {
        let output = DetectorOutput {
            boxes: vec![BoundingBox::new(0.0, 0.0, 1.0, 1.0)],
            scores: vec![0.9, 0.1],
            classes: vec![10],
            num_detections: 1,
        };
        assert!(output.validate().is_err());
    }

    #[test]
    fn only_integral_class_values_name_a_label() {
        assert_eq!(class_id_from_raw(10.0), 10);
        assert_eq!(class_id_from_raw(0.0), 0);
        assert_eq!(class_id_from_raw(9.6), UNLABELED_CLASS_ID);
        assert_eq!(class_id_from_raw(10.4), UNLABELED_CLASS_ID);
        assert_eq!(class_id_from_raw(-1.0), UNLABELED_CLASS_ID);
        assert_eq!(class_id_from_raw(f32::NAN), UNLABELED_CLASS_ID);
    }

    #[test]
    fn collects_detections_in_order() {
        let a = Detection {
            bbox: BoundingBox::from_row([0.1, 0.2, 0.3, 0.4]),
            class_id: 10,
            score: 0.95,
        };
        let b = Detection {
            bbox: BoundingBox::from_row([0.5, 0.5, 0.6, 0.6]),
            class_id: 3,
            score: 0.4,
        };
        let output: DetectorOutput = [a, b].into_iter().collect();
        assert!(output.validate().is_ok());
        assert_eq!(output.num_detections, 2);
        assert_eq!(output.detections().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(output.boxes[0].left, 0.2);
    }
}
