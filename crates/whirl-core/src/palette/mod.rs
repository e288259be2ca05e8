//! Fixed color palettes and indexed frames.
//!
//! A [`Palette`] is built once per run and shared read-only (behind an `Arc`)
//! by every quantization task. Colors are matched in premultiplied RGBA so a
//! fully transparent pixel always lands on the palette's transparent entry,
//! whatever its stored RGB happens to be.

mod dither;

use std::sync::Arc;

use crate::error::{WhirlError, WhirlResult};

pub use dither::quantize_frame;

/// Upper bound imposed by 8-bit GIF color tables.
pub const MAX_PALETTE_COLORS: usize = 256;

/// Channel steps of the 6x6x6 web-safe color cube.
const WEB_SAFE_LEVELS: [u8; 6] = [0x00, 0x33, 0x66, 0x99, 0xCC, 0xFF];

/// An ordered set of at most 256 RGBA colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<[u8; 4]>,
    premultiplied: Vec<[i32; 4]>,
    transparent_index: Option<u8>,
}

impl Palette {
    /// Build a palette from straight-alpha RGBA colors.
    ///
    /// The first fully transparent entry, if any, becomes the transparent index.
    ///
    /// # Errors
    ///
    /// Returns `WhirlError::InvalidInput` for an empty palette or one with
    /// more than [`MAX_PALETTE_COLORS`] entries.
    pub fn new(colors: Vec<[u8; 4]>) -> WhirlResult<Self> {
        if colors.is_empty() {
            return Err(WhirlError::invalid_input("palette must contain at least one color"));
        }
        if colors.len() > MAX_PALETTE_COLORS {
            return Err(WhirlError::invalid_input(format!(
                "palette has {} colors, at most {} are allowed",
                colors.len(),
                MAX_PALETTE_COLORS
            )));
        }

        let premultiplied = colors.iter().map(|&c| premultiply(c)).collect();
        let transparent_index = colors.iter().position(|c| c[3] == 0).map(|i| i as u8);

        Ok(Self {
            colors,
            premultiplied,
            transparent_index,
        })
    }

    /// The 216-color web-safe cube followed by one transparent entry (index 216).
    pub fn web_safe() -> Self {
        let mut colors = Vec::with_capacity(WEB_SAFE_LEVELS.len().pow(3) + 1);
        for r in WEB_SAFE_LEVELS {
            for g in WEB_SAFE_LEVELS {
                for b in WEB_SAFE_LEVELS {
                    colors.push([r, g, b, 0xFF]);
                }
            }
        }
        colors.push([0, 0, 0, 0]);

        let premultiplied = colors.iter().map(|&c| premultiply(c)).collect();
        Self {
            transparent_index: Some((colors.len() - 1) as u8),
            colors,
            premultiplied,
        }
    }

    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn transparent_index(&self) -> Option<u8> {
        self.transparent_index
    }

    pub fn get(&self, index: u8) -> Option<[u8; 4]> {
        self.colors.get(index as usize).copied()
    }

    /// Index of the entry closest to a premultiplied color.
    ///
    /// Distance is squared Euclidean over all four channels. Low-alpha colors
    /// can collapse onto the same premultiplied value, so equal distances are
    /// broken by distance to `straight`, the pixel's unpremultiplied color,
    /// and then by the lower index. Fully transparent pixels skip that
    /// tie-break and land on the first transparent entry.
    pub(crate) fn nearest(&self, premul: [i32; 4], straight: [u8; 4]) -> (u8, [i32; 4]) {
        let mut best_index = 0;
        let mut best = (i64::MAX, i64::MAX);
        for (index, candidate) in self.premultiplied.iter().enumerate() {
            let distance = squared_distance(premul, *candidate);
            let tie_break = if straight[3] == 0 {
                0
            } else {
                squared_distance(straight.map(i32::from), self.colors[index].map(i32::from))
            };
            if (distance, tie_break) < best {
                best_index = index;
                best = (distance, tie_break);
                if best == (0, 0) {
                    break;
                }
            }
        }
        (best_index as u8, self.premultiplied[best_index])
    }
}

fn squared_distance(a: [i32; 4], b: [i32; 4]) -> i64 {
    (0..4)
        .map(|c| {
            let d = (a[c] - b[c]) as i64;
            d * d
        })
        .sum()
}

impl Default for Palette {
    fn default() -> Self {
        Self::web_safe()
    }
}

/// Convert straight alpha to premultiplied, rounding to nearest.
#[inline]
pub(crate) fn premultiply([r, g, b, a]: [u8; 4]) -> [i32; 4] {
    let a = a as i32;
    [
        (r as i32 * a + 127) / 255,
        (g as i32 * a + 127) / 255,
        (b as i32 * a + 127) / 255,
        a,
    ]
}

/// A frame quantized against a shared palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFrame {
    pub width: u32,
    pub height: u32,
    /// One palette index per pixel, row-major.
    pub indices: Vec<u8>,
    pub palette: Arc<Palette>,
}

impl IndexedFrame {
    /// The palette color stored at (x, y).
    pub fn color_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let index = *self.indices.get(y as usize * self.width as usize + x as usize)?;
        self.palette.get(index)
    }
}
