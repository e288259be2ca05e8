//! Palette encoding and animation assembly.
//!
//! Every rotated frame is dithered onto the shared palette in parallel, then
//! packed with its timing and disposal metadata into an [`AnimationRecord`].
//! The record is format-agnostic; [`crate::encode`] turns it into GIF bytes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::error::{WhirlError, WhirlResult};
use crate::palette::{quantize_frame, IndexedFrame, Palette};
use crate::types::RasterImage;

/// Loop count meaning "repeat forever".
pub const LOOP_FOREVER: u16 = 0;

/// How a player treats the current frame before drawing the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisposalMethod {
    /// No disposal specified.
    #[default]
    Any,
    /// Leave the frame in place.
    Keep,
    /// Clear the frame area to the background.
    Background,
    /// Restore whatever was on screen before the frame was drawn.
    Previous,
}

/// Per-frame display time in hundredths of a second, the native GIF unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameDelay(u16);

impl FrameDelay {
    /// A delay of `centis` hundredths of a second. Zero is raised to one.
    pub fn from_centis(centis: u16) -> Self {
        Self(centis.max(1))
    }

    /// The delay that plays `frame_rate` frames per second, rounded to the
    /// nearest hundredth.
    ///
    /// # Errors
    ///
    /// Returns `WhirlError::InvalidInput` for a non-positive or non-finite rate.
    pub fn from_frame_rate(frame_rate: f64) -> WhirlResult<Self> {
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(WhirlError::invalid_input(format!(
                "frame rate must be a positive number, got {frame_rate}"
            )));
        }
        let centis = (100.0 / frame_rate).round().clamp(1.0, u16::MAX as f64);
        Ok(Self(centis as u16))
    }

    /// Round a duration to the nearest hundredth of a second.
    pub fn from_duration(duration: Duration) -> Self {
        let centis = (duration.as_secs_f64() * 100.0)
            .round()
            .clamp(1.0, u16::MAX as f64);
        Self(centis as u16)
    }

    pub fn centis(self) -> u16 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0 as u64 * 10)
    }
}

/// A complete, timed, looping indexed-color animation.
///
/// `frames`, `delays` and `disposal_methods` always have the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationRecord {
    pub frames: Vec<IndexedFrame>,
    pub delays: Vec<FrameDelay>,
    pub disposal_methods: Vec<DisposalMethod>,
    /// Number of repeats; [`LOOP_FOREVER`] plays indefinitely.
    pub loop_count: u16,
}

impl AnimationRecord {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Width and height shared by every frame.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.frames.first().map(|f| (f.width, f.height))
    }

    /// Total playback time of one loop.
    pub fn duration(&self) -> Duration {
        self.delays.iter().map(|d| d.as_duration()).sum()
    }
}

/// Quantize every frame and assemble the animation.
///
/// Each frame gets the same `delay`, disposal [`DisposalMethod::Previous`]
/// and the record loops forever. Output order matches input order.
///
/// # Errors
///
/// Returns `WhirlError::InvalidInput` for an empty sequence or frames whose
/// bounds differ, and `WhirlError::FrameTaskFailure` if any frame fails to
/// quantize. No partial record is ever returned.
#[tracing::instrument(skip(frames, palette), fields(frames = frames.len(), colors = palette.len()))]
pub fn encode_and_assemble(
    frames: &[RasterImage],
    delay: FrameDelay,
    palette: Arc<Palette>,
) -> WhirlResult<AnimationRecord> {
    let first = frames
        .first()
        .ok_or_else(|| WhirlError::invalid_input("cannot assemble an animation with no frames"))?;
    let bounds = (first.width, first.height);
    if let Some((index, frame)) = frames
        .iter()
        .enumerate()
        .find(|(_, f)| (f.width, f.height) != bounds)
    {
        return Err(WhirlError::invalid_input(format!(
            "frame {index} is {}x{}, expected {}x{}",
            frame.width, frame.height, bounds.0, bounds.1
        )));
    }

    tracing::info!(frames = frames.len(), "quantizing frames");

    let quantized = frames
        .par_iter()
        .enumerate()
        .map(|(index, frame)| -> WhirlResult<IndexedFrame> {
            let start = Instant::now();
            let indexed = quantize_frame(frame, &palette)
                .map_err(|e| WhirlError::frame_task(index, e.to_string()))?;
            tracing::debug!(
                index,
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "rendered frame"
            );
            Ok(indexed)
        })
        .collect::<Vec<WhirlResult<IndexedFrame>>>();

    // Report the lowest failing index so errors are reproducible
    let mut indexed_frames = Vec::with_capacity(quantized.len());
    for item in quantized {
        indexed_frames.push(item?);
    }

    let count = indexed_frames.len();
    Ok(AnimationRecord {
        frames: indexed_frames,
        delays: vec![delay; count],
        disposal_methods: vec![DisposalMethod::Previous; count],
        loop_count: LOOP_FOREVER,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: a failure at any index fails the batch instead of shortening it.
        #[test]
        fn prop_any_failure_fails_batch(count in 1usize..=16, bad in 0usize..16) {
            let bad = bad % count;
            let mut input: Vec<RasterImage> =
                (0..count).map(|_| RasterImage::filled(3, 3, [0, 0, 0, 255])).collect();
            input[bad].pixels.pop();

            let result = encode_and_assemble(&input, FrameDelay::from_centis(2), Arc::new(Palette::web_safe()));
            let failed_at_bad = matches!(result, Err(WhirlError::FrameTaskFailure { index, .. }) if index == bad);
            prop_assert!(failed_at_bad);
        }

        /// Property: record lengths always equal the frame count.
        #[test]
        fn prop_lengths_consistent(count in 1usize..=20) {
            let input: Vec<RasterImage> =
                (0..count).map(|_| RasterImage::filled(2, 2, [255, 255, 255, 255])).collect();
            let record = encode_and_assemble(&input, FrameDelay::from_centis(2), Arc::new(Palette::web_safe())).unwrap();
            prop_assert_eq!(record.frames.len(), count);
            prop_assert_eq!(record.delays.len(), count);
            prop_assert_eq!(record.disposal_methods.len(), count);
        }
    }
}
