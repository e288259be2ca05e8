//! Animation serialization.
//!
//! This module provides functionality for:
//! - Encoding an [`AnimationRecord`](crate::AnimationRecord) as an animated GIF
//!
//! The encoder writes to any `std::io::Write`; opening files is left to the
//! caller.

mod gif89a;

pub use gif89a::encode_gif;
