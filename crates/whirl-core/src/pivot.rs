//! Rotation pivot resolution.
//!
//! The pivot defaults to the geometric center of the source image. Each axis
//! can be overridden independently; an explicit `0` is a real coordinate, not
//! a request for the default.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WhirlError;
use crate::types::{Point, RasterImage};

/// Optional per-axis pivot override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PivotOverride {
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl PivotOverride {
    pub fn new(x: Option<i32>, y: Option<i32>) -> Self {
        Self { x, y }
    }

    /// Check if neither axis is overridden
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none()
    }
}

/// Parses `x=10,y=20`. Either key may be omitted; an empty string overrides nothing.
impl FromStr for PivotOverride {
    type Err = WhirlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut result = PivotOverride::default();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                WhirlError::invalid_input(format!("center entry '{part}' is not key=value"))
            })?;
            let value: i32 = value.trim().parse().map_err(|_| {
                WhirlError::invalid_input(format!("center value '{}' is not an integer", value.trim()))
            })?;
            match key.trim() {
                "x" => result.x = Some(value),
                "y" => result.y = Some(value),
                other => {
                    return Err(WhirlError::invalid_input(format!(
                        "unknown center key '{other}', expected x or y"
                    )))
                }
            }
        }
        Ok(result)
    }
}

/// Resolve the rotation pivot for `image`.
///
/// Axes without an override fall back to `width / 2` and `height / 2`
/// (integer division).
pub fn resolve_pivot(image: &RasterImage, center: &PivotOverride) -> Point {
    let x = center.x.unwrap_or((image.width / 2) as i32);
    let y = center.y.unwrap_or((image.height / 2) as i32);
    Point::new(x, y)
}
