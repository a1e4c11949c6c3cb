use super::result::{Detection, DetectorOutput};

/// COCO label id of "traffic light".
pub const TRAFFIC_LIGHT_CLASS_ID: u32 = 10;

/// Detections must score strictly above this to be considered.
pub const DETECTION_SCORE_THRESHOLD: f32 = 0.8;

/// Keep traffic-light detections scoring above the threshold, in detector order.
pub fn select_traffic_lights(output: &DetectorOutput) -> Vec<Detection> {
    output
        .detections()
        .filter(|d| d.score > DETECTION_SCORE_THRESHOLD && d.class_id == TRAFFIC_LIGHT_CLASS_ID)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::result::BoundingBox;

    fn det(class_id: u32, score: f32) -> Detection {
        Detection {
            bbox: BoundingBox::new(0.1, 0.1, 0.4, 0.2),
            class_id,
            score,
        }
    }

    #[test]
    fn keeps_only_confident_traffic_lights() {
        let output: DetectorOutput = [det(10, 0.95), det(3, 0.99), det(10, 0.5), det(10, 0.81)]
            .into_iter()
            .collect();
        let selected = select_traffic_lights(&output);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].score, 0.95);
        assert_eq!(selected[1].score, 0.81);
    }

    #[test]
    fn threshold_is_strict() {
        let output: DetectorOutput = [det(10, DETECTION_SCORE_THRESHOLD)].into_iter().collect();
        assert!(select_traffic_lights(&output).is_empty());
    }

    #[test]
    fn empty_output_selects_nothing() {
        assert!(select_traffic_lights(&DetectorOutput::empty()).is_empty());
    }
}
