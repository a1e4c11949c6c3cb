use anyhow::Result;

use crate::detect::result::DetectorOutput;
use crate::frame::Frame;

/// Object detector backend.
///
/// Implementations wrap a pretrained detection network. They are loaded once
/// and then only run; `detect` takes `&mut self` because inference engines are
/// not assumed re-entrant. Share a backend across threads by giving each
/// worker its own instance.
pub trait TrafficLightDetector: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run detection on a frame.
    ///
    /// Errors mean the model could not run and are not recoverable per frame.
    fn detect(&mut self, frame: &Frame) -> Result<DetectorOutput>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<D: TrafficLightDetector + ?Sized> TrafficLightDetector for Box<D> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn detect(&mut self, frame: &Frame) -> Result<DetectorOutput> {
        (**self).detect(frame)
    }

    fn warm_up(&mut self) -> Result<()> {
        (**self).warm_up()
    }
}
