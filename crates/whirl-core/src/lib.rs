//! Whirl Core - rotation animation library
//!
//! This crate turns a still image into a looping GIF by rotating it about a
//! pivot through one full revolution. It covers frame synthesis, palette
//! quantization with Floyd–Steinberg dithering, animation assembly, and GIF
//! serialization. File I/O is left to the caller.
//!
//! # Pipeline
//!
//! 1. [`resolve_pivot`] picks the rotation center
//! 2. [`generate_frames`] renders evenly spaced rotations in parallel
//! 3. [`encode_and_assemble`] dithers each frame onto a shared [`Palette`]
//!    and packs the result into an [`AnimationRecord`]
//! 4. [`encode_gif`] writes the record to any `std::io::Write`
//!
//! [`spin`] runs steps 1-3 from a [`SpinOptions`].

pub mod assemble;
pub mod decode;
pub mod encode;
pub mod error;
pub mod frames;
pub mod options;
pub mod palette;
pub mod pipeline;
pub mod pivot;
pub mod types;

pub use assemble::{encode_and_assemble, AnimationRecord, DisposalMethod, FrameDelay, LOOP_FOREVER};
pub use decode::{decode_png, SourceFormat};
pub use encode::encode_gif;
pub use error::{WhirlError, WhirlResult};
pub use frames::{generate_frames, InterpolationFilter, MAX_FRAME_COUNT};
pub use options::{frame_count, SpinOptions, DEFAULT_FRAME_RATE};
pub use palette::{quantize_frame, IndexedFrame, Palette, MAX_PALETTE_COLORS};
pub use pipeline::{spin, spin_with_palette};
pub use pivot::{resolve_pivot, PivotOverride};
pub use types::{FrameSequence, Point, RasterImage, RotationSpec};
