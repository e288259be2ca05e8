//! End-to-end spin pipeline: source image in, animation record out.
//!
//! ```text
//! validate → frame count → pivot → rotate frames → dither + assemble
//! ```
//!
//! Both parallel stages run inside one rayon pool sized by
//! [`SpinOptions::threads`].

use std::sync::Arc;

use crate::assemble::{encode_and_assemble, AnimationRecord, FrameDelay};
use crate::error::{WhirlError, WhirlResult};
use crate::frames::generate_frames;
use crate::options::SpinOptions;
use crate::palette::Palette;
use crate::pivot::resolve_pivot;
use crate::types::RasterImage;

/// Spin `image` into a looping animation using the web-safe palette.
pub fn spin(image: &RasterImage, options: &SpinOptions) -> WhirlResult<AnimationRecord> {
    spin_with_palette(image, options, Arc::new(Palette::web_safe()))
}

/// Spin `image` into a looping animation quantized to `palette`.
///
/// # Errors
///
/// Returns `WhirlError::InvalidInput` for bad options or a zero-area source,
/// before any frame is rendered, and `WhirlError::FrameTaskFailure` if any
/// frame fails.
#[tracing::instrument(skip_all, fields(width = image.width, height = image.height))]
pub fn spin_with_palette(
    image: &RasterImage,
    options: &SpinOptions,
    palette: Arc<Palette>,
) -> WhirlResult<AnimationRecord> {
    options.validate()?;
    image.validate()?;

    let frame_count = options.frame_count()?;
    let delay = FrameDelay::from_frame_rate(options.frame_rate)?;
    let pivot = resolve_pivot(image, &options.center);

    tracing::info!(
        frames = frame_count,
        delay_centis = delay.centis(),
        pivot_x = pivot.x,
        pivot_y = pivot.y,
        "making a gif"
    );

    let pool = build_thread_pool(options.threads)?;
    pool.install(|| {
        let frames = generate_frames(image, frame_count, pivot, options.filter)?;
        encode_and_assemble(&frames, delay, palette)
    })
}

fn build_thread_pool(threads: Option<usize>) -> WhirlResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(WhirlError::invalid_input("thread count must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| WhirlError::invalid_input(format!("failed to build thread pool: {e}")))
}
