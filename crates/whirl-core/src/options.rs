//! Run configuration.

use serde::{Deserialize, Serialize};

use crate::error::{WhirlError, WhirlResult};
use crate::frames::{InterpolationFilter, MAX_FRAME_COUNT};
use crate::pivot::PivotOverride;

/// Playback rate of the generated animation, in frames per second.
pub const DEFAULT_FRAME_RATE: f64 = 50.0;

/// Settings for one spin run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinOptions {
    /// Full revolutions per second of playback.
    pub rotations_per_second: f64,
    /// Playback frames per second.
    pub frame_rate: f64,
    /// Optional pivot override; missing axes use the image center.
    pub center: PivotOverride,
    pub filter: InterpolationFilter,
    /// Worker threads for the parallel stages; `None` uses all cores.
    pub threads: Option<usize>,
}

impl Default for SpinOptions {
    fn default() -> Self {
        Self {
            rotations_per_second: 1.0,
            frame_rate: DEFAULT_FRAME_RATE,
            center: PivotOverride::default(),
            filter: InterpolationFilter::default(),
            threads: None,
        }
    }
}

impl SpinOptions {
    /// Check every field, reporting the first problem.
    pub fn validate(&self) -> WhirlResult<()> {
        positive("rotations per second", self.rotations_per_second)?;
        positive("frame rate", self.frame_rate)?;
        if self.threads == Some(0) {
            return Err(WhirlError::invalid_input("thread count must be >= 1 when set"));
        }
        Ok(())
    }

    /// Number of frames in one revolution at these settings.
    pub fn frame_count(&self) -> WhirlResult<usize> {
        frame_count(self.rotations_per_second, self.frame_rate)
    }
}

fn positive(name: &str, value: f64) -> WhirlResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(WhirlError::invalid_input(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

/// Frames needed for one revolution: `round(frame_rate / rotations_per_second)`.
///
/// Rates faster than one revolution per frame clamp to a single frame.
///
/// # Errors
///
/// Returns `WhirlError::InvalidInput` if either rate is non-positive or not
/// finite, or if the result exceeds [`MAX_FRAME_COUNT`].
pub fn frame_count(rotations_per_second: f64, frame_rate: f64) -> WhirlResult<usize> {
    positive("rotations per second", rotations_per_second)?;
    positive("frame rate", frame_rate)?;

    let frames = (frame_rate / rotations_per_second).round();
    if !frames.is_finite() || frames > MAX_FRAME_COUNT as f64 {
        return Err(WhirlError::invalid_input(format!(
            "{rotations_per_second} rotations per second needs more than {MAX_FRAME_COUNT} frames"
        )));
    }
    Ok((frames as usize).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_rotation_per_second_at_50_fps() {
        assert_eq!(frame_count(1.0, 50.0).unwrap(), 50);
    }

    #[test]
    fn test_frame_count_rounds() {
        assert_eq!(frame_count(3.0, 50.0).unwrap(), 17);
        assert_eq!(frame_count(0.5, 50.0).unwrap(), 100);
        assert_eq!(frame_count(0.3, 50.0).unwrap(), 167);
    }

    #[test]
    fn test_fast_rates_clamp_to_one_frame() {
        assert_eq!(frame_count(200.0, 50.0).unwrap(), 1);
    }

    #[test]
    fn test_invalid_rates_rejected() {
        for rps in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(frame_count(rps, 50.0), Err(WhirlError::InvalidInput(_))),
                "rps {rps} accepted"
            );
        }
        assert!(frame_count(1.0, 0.0).is_err());
        assert!(frame_count(1e-300, 50.0).is_err());
    }

    #[test]
    fn test_frame_count_limit() {
        assert_eq!(frame_count(50.0 / MAX_FRAME_COUNT as f64, 50.0).unwrap(), MAX_FRAME_COUNT);
        assert!(matches!(frame_count(1e-7, 50.0), Err(WhirlError::InvalidInput(_))));
        assert!(frame_count(0.001, 50.0).is_err());
    }

    #[test]
    fn test_defaults() {
        let opts = SpinOptions::default();
        assert_eq!(opts.rotations_per_second, 1.0);
        assert_eq!(opts.frame_rate, DEFAULT_FRAME_RATE);
        assert!(opts.center.is_empty());
        assert_eq!(opts.filter, InterpolationFilter::Bilinear);
        assert!(opts.validate().is_ok());
        assert_eq!(opts.frame_count().unwrap(), 50);
    }

    #[test]
    fn test_validate_rejects_zero_threads() {
        let mut opts = SpinOptions::default();
        opts.threads = Some(0);
        assert!(matches!(opts.validate(), Err(WhirlError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_bad_rate() {
        let mut opts = SpinOptions::default();
        opts.rotations_per_second = -2.0;
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let opts: SpinOptions =
            serde_json::from_str(r#"{"rotations_per_second": 2.0, "center": {"y": 4}, "filter": "lanczos3"}"#)
                .unwrap();
        assert_eq!(opts.rotations_per_second, 2.0);
        assert_eq!(opts.frame_rate, DEFAULT_FRAME_RATE);
        assert_eq!(opts.center, PivotOverride::new(None, Some(4)));
        assert_eq!(opts.filter, InterpolationFilter::Lanczos3);
    }
}
