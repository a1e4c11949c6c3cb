//! Decoded camera frames.
//!
//! A `Frame` is the single input of a classification call: one 8-bit image
//! with three interleaved channels. The channel order is whatever the
//! detector was trained on; crops handed to the color classifier are
//! produced in the reverse order (see `crop`).

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::RgbImage;

/// One decoded frame, conceptually shaped `(1, height, width, 3)`.
#[derive(Clone, Debug)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Build a frame from interleaved 3-channel bytes.
    pub fn from_interleaved(pixels: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(anyhow!("frame must be non-empty, got {}x{}", width, height));
        }
        let expected = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))? as usize;
        if pixels.len() != expected {
            return Err(anyhow!(
                "frame length mismatch: expected {}, got {}",
                expected,
                pixels.len()
            ));
        }
        let image = RgbImage::from_raw(width, height, pixels)
            .ok_or_else(|| anyhow!("frame buffer does not fit {}x{}", width, height))?;
        Ok(Self { image })
    }

    pub fn from_image(image: RgbImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(anyhow!("frame must be non-empty"));
        }
        Ok(Self { image })
    }

    /// Decode an image file (JPEG/PNG) into a frame.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path)
            .with_context(|| format!("failed to decode image {}", path.display()))?;
        Self::from_image(decoded.to_rgb8())
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    /// Interleaved pixel bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaved_frame_validates_length() {
        let frame = Frame::from_interleaved(vec![7u8; 4 * 2 * 3], 4, 2).unwrap();
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.pixels().len(), 24);

        assert!(Frame::from_interleaved(vec![0u8; 10], 4, 2).is_err());
    }

    #[test]
    fn empty_frames_are_rejected() {
        assert!(Frame::from_interleaved(Vec::new(), 0, 0).is_err());
        assert!(Frame::from_image(RgbImage::new(0, 5)).is_err());
    }
}
