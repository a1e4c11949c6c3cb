//! Double-stage traffic light classifier.
//!
//! Classifies the traffic light state (RED / YELLOW / GREEN / UNKNOWN) visible
//! in one camera frame by composing two pretrained models:
//!
//! 1. an object detector that proposes traffic-light boxes over the frame, and
//! 2. a color classifier that labels 50x50 crops of those boxes.
//!
//! The crate owns the decision logic between the two: score/class filtering,
//! the traffic-light-shaped crop heuristic, and strict-majority vote fusion.
//! Anything short of a confident, unambiguous answer is `ColorLabel::Unknown`.
//!
//! # Module Structure
//!
//! - `frame`: decoded input frames
//! - `detect`: detector trait, outputs, class/score filter, backends
//! - `crop`: aspect-ratio gate and square crop extraction
//! - `classify`: classifier trait, vote fusion, backends
//! - `pipeline`: `DoubleStageClassifier`, the per-frame routine
//! - `models`: checksum-pinned model artifacts
//! - `config`: file + env configuration

pub mod classify;
pub mod color;
pub mod config;
pub mod crop;
pub mod detect;
pub mod frame;
pub mod models;
pub mod pipeline;

pub use classify::{fuse_votes, ColorClassifier, StubClassifier, VOTE_CONFIDENCE_THRESHOLD};
#[cfg(feature = "backend-tract")]
pub use classify::TractClassifier;
pub use color::ColorLabel;
pub use config::ClassifierConfig;
pub use crop::{crop_window, extract_crop, Crop, CropWindow, CROP_SIZE};
pub use detect::{
    select_traffic_lights, BoundingBox, Detection, DetectorOutput, StubDetector,
    TrafficLightDetector, DETECTION_SCORE_THRESHOLD, TRAFFIC_LIGHT_CLASS_ID,
};
#[cfg(feature = "backend-tract")]
pub use detect::TractDetector;
pub use frame::Frame;
pub use models::{Checksum, ModelArtifact};
pub use pipeline::{DoubleStageClassifier, FrameReport};
