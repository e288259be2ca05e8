//! PNG decoding into RGBA rasters.

use image::ImageFormat;

use crate::error::{WhirlError, WhirlResult};
use crate::types::RasterImage;

/// Decode a PNG image from bytes.
///
/// Every PNG color type is converted to straight-alpha RGBA8; images without
/// an alpha channel come out fully opaque.
///
/// # Errors
///
/// Returns `WhirlError::DecodeFailure` if the bytes are not a valid PNG.
pub fn decode_png(bytes: &[u8]) -> WhirlResult<RasterImage> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|e| WhirlError::decode(e.to_string()))?;

    let raster = RasterImage::from_rgba_image(img.into_rgba8());
    tracing::debug!(width = raster.width, height = raster.height, "decoded png");
    Ok(raster)
}
