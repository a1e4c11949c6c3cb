mod backend;
mod backends;
mod filter;
mod result;

pub use backend::TrafficLightDetector;
pub use backends::StubDetector;
#[cfg(feature = "backend-tract")]
pub use backends::TractDetector;
pub use filter::{select_traffic_lights, DETECTION_SCORE_THRESHOLD, TRAFFIC_LIGHT_CLASS_ID};
pub use result::{
    class_id_from_raw, BoundingBox, Detection, DetectorOutput, UNLABELED_CLASS_ID,
};
