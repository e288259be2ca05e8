//! Floyd–Steinberg error diffusion onto a fixed palette.
//!
//! Pixels are visited left to right, top to bottom. The quantization error of
//! each pixel is spread to its unvisited neighbors:
//!
//! ```text
//!          *    7/16
//!   3/16  5/16  1/16
//! ```
//!
//! All arithmetic is integer, so the same input always produces the same
//! indices regardless of which thread runs it.

use std::sync::Arc;

use super::{premultiply, IndexedFrame, Palette};
use crate::error::WhirlResult;
use crate::types::{RasterImage, CHANNELS};

/// Quantize a true-color frame against `palette` with Floyd–Steinberg dithering.
///
/// # Errors
///
/// Returns `WhirlError::InvalidInput` if the frame is zero-area or its pixel
/// buffer does not match its bounds.
pub fn quantize_frame(frame: &RasterImage, palette: &Arc<Palette>) -> WhirlResult<IndexedFrame> {
    frame.validate()?;

    let width = frame.width as usize;
    let height = frame.height as usize;
    let mut indices = vec![0u8; width * height];

    // Error rows carry one pixel of padding on each side, scaled by 16.
    let mut err_curr = vec![[0i32; 4]; width + 2];
    let mut err_next = vec![[0i32; 4]; width + 2];

    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) * CHANNELS;
            let mut px = [0u8; 4];
            px.copy_from_slice(&frame.pixels[idx..idx + CHANNELS]);
            let source = premultiply(px);

            let carried = err_curr[x + 1];
            let mut wanted = [0i32; 4];
            for c in 0..4 {
                wanted[c] = (source[c] + carried[c] / 16).clamp(0, 255);
            }

            let (best, chosen) = palette.nearest(wanted, px);
            indices[y * width + x] = best;

            for c in 0..4 {
                let e = wanted[c] - chosen[c];
                err_curr[x + 2][c] += e * 7;
                err_next[x][c] += e * 3;
                err_next[x + 1][c] += e * 5;
                err_next[x + 2][c] += e;
            }
        }

        std::mem::swap(&mut err_curr, &mut err_next);
        err_next.iter_mut().for_each(|e| *e = [0; 4]);
    }

    Ok(IndexedFrame {
        width: frame.width,
        height: frame.height,
        indices,
        palette: Arc::clone(palette),
    })
}
