//! Frame generation: one rotated copy of the source per animation step.
//!
//! A full revolution is split into `frame_count` equal steps. Frame `i` is the
//! source rotated clockwise by `i * 360 / frame_count` degrees about the pivot.
//! Every frame keeps the source bounds so later stages can rely on uniform
//! geometry.
//!
//! Frames are rendered on the current rayon pool. Results are collected in
//! index order, so playback order never depends on which worker finished
//! first.

mod rotation;

use std::time::Instant;

use rayon::prelude::*;

use crate::error::{WhirlError, WhirlResult};
use crate::types::{FrameSequence, Point, RasterImage, RotationSpec};

pub(crate) use rotation::rotate_about;
pub use rotation::InterpolationFilter;

/// Largest supported number of frames per revolution (a 0.01 degree step).
pub const MAX_FRAME_COUNT: usize = 36_000;

/// Angle in degrees between consecutive frames.
pub fn angle_step(frame_count: usize) -> f64 {
    360.0 / frame_count as f64
}

/// The rotation applied to each frame, in playback order.
pub fn rotation_specs(frame_count: usize, pivot: Point) -> Vec<RotationSpec> {
    let step = angle_step(frame_count);
    (0..frame_count)
        .map(|i| RotationSpec {
            angle: i as f64 * step,
            pivot,
        })
        .collect()
}

/// Render `frame_count` rotated frames covering one full revolution.
///
/// # Errors
///
/// Returns `WhirlError::InvalidInput` for a frame count of zero or above
/// [`MAX_FRAME_COUNT`], or for a zero-area / malformed source. Both checks run
/// before any work is scheduled.
#[tracing::instrument(skip(image), fields(width = image.width, height = image.height))]
pub fn generate_frames(
    image: &RasterImage,
    frame_count: usize,
    pivot: Point,
    filter: InterpolationFilter,
) -> WhirlResult<FrameSequence> {
    if frame_count == 0 {
        return Err(WhirlError::invalid_input("frame count must be at least 1"));
    }
    if frame_count > MAX_FRAME_COUNT {
        return Err(WhirlError::invalid_input(format!(
            "frame count {frame_count} exceeds the limit of {MAX_FRAME_COUNT}"
        )));
    }
    image.validate()?;

    tracing::info!(frames = frame_count, "rotating frames");

    let frames = rotation_specs(frame_count, pivot)
        .par_iter()
        .enumerate()
        .map(|(index, spec)| {
            let start = Instant::now();
            let frame = rotate_about(image, spec, filter);
            tracing::debug!(
                index,
                angle = spec.angle,
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "rotated frame"
            );
            frame
        })
        .collect::<Vec<_>>();

    Ok(frames)
}
