//! Square crops around candidate traffic lights.
//!
//! Traffic lights are assumed to be taller than wide. A detection is only
//! cropped when its pixel height lies strictly between 1.5x and 3.5x its
//! width; the crop is then a square of side `crop_height`, centered
//! horizontally on the box and clamped to the frame, resized to 50x50 with
//! cubic interpolation and with its channel order reversed for the color
//! classifier.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::detect::BoundingBox;
use crate::frame::Frame;

/// Side of every crop fed to the classifier.
pub const CROP_SIZE: u32 = 50;

/// Lower bound (exclusive) of the accepted `crop_height / crop_width` band.
pub const MIN_ASPECT: f64 = 1.5;
/// Upper bound (exclusive) of the accepted `crop_height / crop_width` band.
pub const MAX_ASPECT: f64 = 3.5;

/// A 50x50, 3-channel classifier input. Only produced by `extract_crop`.
#[derive(Clone, Debug)]
pub struct Crop {
    image: RgbImage,
}

impl Crop {
    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    /// Interleaved bytes, `CROP_SIZE * CROP_SIZE * 3` long.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn dimensions(&self) -> (u32, u32, u32) {
        (self.image.width(), self.image.height(), 3)
    }
}

/// Pixel region of the frame a crop is taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Compute the crop region for a box, or `None` if the box is not
/// traffic-light shaped or degenerates to nothing inside the frame.
pub fn crop_window(
    bbox: &BoundingBox,
    frame_width: u32,
    frame_height: u32,
) -> Option<CropWindow> {
    let w = frame_width as f64;
    let h = frame_height as f64;
    let left = bbox.left as f64 * w;
    let right = bbox.right as f64 * w;
    let top = bbox.top as f64 * h;
    let bottom = bbox.bottom as f64 * h;

    let crop_height = (bottom - top) as i64;
    let crop_width = (right - left) as i64;

    let ch = crop_height as f64;
    let cw = crop_width as f64;
    if !(MIN_ASPECT * cw < ch && ch < MAX_ASPECT * cw) {
        return None;
    }

    let frame_width = frame_width as i64;
    let center = (left as i64 + right as i64).div_euclid(2);
    let centered = center - crop_height.div_euclid(2);
    let x = if centered < 0 {
        0
    } else if centered + crop_height > frame_width {
        (frame_width - crop_height).max(0)
    } else {
        centered
    };
    let x_end = (x + crop_height).min(frame_width);

    let y = (top as i64).max(0);
    let y_end = (bottom as i64).min(frame_height as i64);
    if x_end <= x || y_end <= y {
        return None;
    }

    Some(CropWindow {
        x: x as u32,
        y: y as u32,
        width: (x_end - x) as u32,
        height: (y_end - y) as u32,
    })
}

/// Extract the classifier crop for a box, if the box qualifies.
pub fn extract_crop(frame: &Frame, bbox: &BoundingBox) -> Option<Crop> {
    let window = crop_window(bbox, frame.width(), frame.height())?;
    let region = imageops::crop_imm(
        frame.as_image(),
        window.x,
        window.y,
        window.width,
        window.height,
    )
    .to_image();
    let mut image = imageops::resize(&region, CROP_SIZE, CROP_SIZE, FilterType::CatmullRom);
    for pixel in image.pixels_mut() {
        let Rgb([a, b, c]) = *pixel;
        *pixel = Rgb([c, b, a]);
    }
    Some(Crop { image })
}
