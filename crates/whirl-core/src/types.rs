//! Core types shared by the frame generator and the palette encoder.

use serde::{Deserialize, Serialize};

use crate::error::{WhirlError, WhirlResult};

/// Bytes per RGBA8 sample.
pub const CHANNELS: usize = 4;

/// A true-color image with straight-alpha RGBA8 pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Create a new RasterImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create an image of the given size filled with a single color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a RasterImage from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbaImage for further processing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// The RGBA sample at (x, y). Callers guarantee the coordinate is in bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Reject zero-area images and buffers that disagree with the bounds.
    pub fn validate(&self) -> WhirlResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(WhirlError::invalid_input(format!(
                "image must have non-zero area, got {}x{}",
                self.width, self.height
            )));
        }
        let expected = self.pixel_count() * CHANNELS;
        if self.pixels.len() != expected {
            return Err(WhirlError::invalid_input(format!(
                "pixel buffer holds {} bytes, expected {} for {}x{} RGBA",
                self.pixels.len(),
                expected,
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

/// An integer coordinate in image space. Origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rotation applied to one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationSpec {
    /// Clockwise angle in degrees.
    pub angle: f64,
    pub pivot: Point,
}

/// Rotated frames in playback order.
pub type FrameSequence = Vec<RasterImage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_image_creation() {
        let img = RasterImage::new(100, 50, vec![0u8; 100 * 50 * 4]);

        assert_eq!(img.width, 100);
        assert_eq!(img.height, 50);
        assert_eq!(img.pixel_count(), 5000);
        assert!(!img.is_empty());
        assert!(img.validate().is_ok());
    }

    #[test]
    fn test_raster_image_empty() {
        let img = RasterImage::new(0, 0, vec![]);
        assert!(img.is_empty());
        assert!(matches!(img.validate(), Err(WhirlError::InvalidInput(_))));
    }

    #[test]
    fn test_zero_width_rejected() {
        let img = RasterImage {
            width: 0,
            height: 10,
            pixels: vec![],
        };
        assert!(matches!(img.validate(), Err(WhirlError::InvalidInput(_))));
    }

    #[test]
    fn test_buffer_mismatch_rejected() {
        let img = RasterImage {
            width: 2,
            height: 2,
            pixels: vec![0; 15],
        };
        let err = img.validate().unwrap_err();
        assert!(err.to_string().contains("expected 16"));
    }

    #[test]
    fn test_filled_and_pixel_lookup() {
        let img = RasterImage::filled(3, 2, [10, 20, 30, 255]);
        assert_eq!(img.pixels.len(), 24);
        assert_eq!(img.pixel(2, 1), [10, 20, 30, 255]);
    }

    #[test]
    fn test_rgba_image_conversion() {
        let img = RasterImage::filled(4, 4, [1, 2, 3, 4]);
        let rgba = img.to_rgba_image().unwrap();
        assert_eq!(rgba.dimensions(), (4, 4));
        assert_eq!(RasterImage::from_rgba_image(rgba), img);
    }
}
