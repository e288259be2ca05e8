//! Source image decoding and format dispatch.
//!
//! This module provides functionality for:
//! - Mapping a file path to a [`SourceFormat`] by extension
//! - Decoding PNG bytes into a [`RasterImage`](crate::RasterImage)
//!
//! Reading the bytes off disk is left to the caller.

mod format;
mod png;

pub use format::SourceFormat;
pub use png::decode_png;
