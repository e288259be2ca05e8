//! GIF89a encoding for assembled animations.
//!
//! The palette shared by every frame becomes the global color table. Each
//! frame carries its own delay, disposal method and transparent index in a
//! graphic control extension, and the loop count is written as a NETSCAPE2.0
//! application extension.

use std::borrow::Cow;
use std::io::Write;
use std::sync::Arc;

use gif::{Encoder, Frame, Repeat};

use crate::assemble::{AnimationRecord, DisposalMethod};
use crate::error::{WhirlError, WhirlResult};

impl From<DisposalMethod> for gif::DisposalMethod {
    fn from(method: DisposalMethod) -> Self {
        match method {
            DisposalMethod::Any => gif::DisposalMethod::Any,
            DisposalMethod::Keep => gif::DisposalMethod::Keep,
            DisposalMethod::Background => gif::DisposalMethod::Background,
            DisposalMethod::Previous => gif::DisposalMethod::Previous,
        }
    }
}

/// Serialize an animation as GIF bytes into `writer`.
///
/// # Errors
///
/// Returns `WhirlError::InvalidInput` for an empty record, inconsistent
/// metadata lengths, frames that do not share one palette or frames larger
/// than 65535 pixels on a side, and
/// `WhirlError::EncodeFailure` if writing fails.
pub fn encode_gif<W: Write>(record: &AnimationRecord, writer: W) -> WhirlResult<()> {
    let (width, height) = record
        .dimensions()
        .ok_or_else(|| WhirlError::invalid_input("cannot encode an animation with no frames"))?;

    if record.delays.len() != record.len() || record.disposal_methods.len() != record.len() {
        return Err(WhirlError::invalid_input(format!(
            "record has {} frames but {} delays and {} disposal methods",
            record.len(),
            record.delays.len(),
            record.disposal_methods.len()
        )));
    }

    let to_u16 = |value: u32, axis: &str| {
        u16::try_from(value).map_err(|_| {
            WhirlError::invalid_input(format!("{axis} {value} exceeds the GIF limit of 65535"))
        })
    };
    let width = to_u16(width, "width")?;
    let height = to_u16(height, "height")?;

    // Every frame shares one palette; use the first as the global table.
    let palette = &record.frames[0].palette;
    if let Some(index) = record
        .frames
        .iter()
        .position(|f| !Arc::ptr_eq(&f.palette, palette) && f.palette != *palette)
    {
        return Err(WhirlError::invalid_input(format!(
            "frame {index} uses a different palette than frame 0"
        )));
    }
    let color_table: Vec<u8> = palette
        .colors()
        .iter()
        .flat_map(|&[r, g, b, _]| [r, g, b])
        .collect();

    let mut encoder = Encoder::new(writer, width, height, &color_table)
        .map_err(|e| WhirlError::encode(e.to_string()))?;

    let repeat = match record.loop_count {
        0 => Repeat::Infinite,
        n => Repeat::Finite(n),
    };
    encoder
        .set_repeat(repeat)
        .map_err(|e| WhirlError::encode(e.to_string()))?;

    for (index, indexed) in record.frames.iter().enumerate() {
        if (indexed.width, indexed.height) != (width as u32, height as u32) {
            return Err(WhirlError::invalid_input(format!(
                "frame {index} is {}x{}, expected {width}x{height}",
                indexed.width, indexed.height
            )));
        }

        let frame = Frame {
            width,
            height,
            delay: record.delays[index].centis(),
            dispose: record.disposal_methods[index].into(),
            transparent: indexed.palette.transparent_index(),
            buffer: Cow::Borrowed(&indexed.indices),
            ..Frame::default()
        };
        encoder
            .write_frame(&frame)
            .map_err(|e| WhirlError::encode(format!("frame {index}: {e}")))?;
    }

    let mut writer = encoder
        .into_inner()
        .map_err(|e| WhirlError::encode(e.to_string()))?;
    writer
        .flush()
        .map_err(|e| WhirlError::encode(e.to_string()))?;

    tracing::debug!(frames = record.len(), "encoded gif");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::{encode_and_assemble, FrameDelay, LOOP_FOREVER};
    use crate::palette::Palette;
    use crate::types::RasterImage;

    fn record(count: usize) -> AnimationRecord {
        let frames: Vec<RasterImage> = (0..count)
            .map(|i| {
                let mut img = RasterImage::filled(4, 3, [0xFF, 0x66, 0x00, 0xFF]);
                // Leave one transparent pixel per frame
                let idx = (i % 12) * 4;
                img.pixels[idx..idx + 4].copy_from_slice(&[0, 0, 0, 0]);
                img
            })
            .collect();
        encode_and_assemble(&frames, FrameDelay::from_centis(2), Arc::new(Palette::web_safe())).unwrap()
    }

    fn decode_frames(bytes: &[u8]) -> Vec<gif::Frame<'static>> {
        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::Indexed);
        let mut decoder = options.read_info(bytes).unwrap();
        let mut frames = Vec::new();
        while let Some(frame) = decoder.read_next_frame().unwrap() {
            frames.push(frame.clone());
        }
        frames
    }

    #[test]
    fn test_header_and_loop_extension() {
        let mut bytes = Vec::new();
        encode_gif(&record(3), &mut bytes).unwrap();

        assert_eq!(&bytes[0..6], b"GIF89a");
        assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 4);
        assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), 3);
        assert!(bytes.windows(11).any(|w| w == b"NETSCAPE2.0"));
        assert_eq!(*bytes.last().unwrap(), 0x3B);
    }

    #[test]
    fn test_frames_round_trip_metadata() {
        let source = record(5);
        let mut bytes = Vec::new();
        encode_gif(&source, &mut bytes).unwrap();

        let frames = decode_frames(&bytes);
        assert_eq!(frames.len(), 5);
        for (decoded, original) in frames.iter().zip(&source.frames) {
            assert_eq!(decoded.delay, 2);
            assert_eq!(decoded.dispose, gif::DisposalMethod::Previous);
            assert_eq!(decoded.transparent, Some(216));
            assert_eq!(decoded.buffer.as_ref(), original.indices.as_slice());
        }
    }

    fn loop_count_in(bytes: &[u8]) -> u16 {
        let at = bytes
            .windows(11)
            .position(|w| w == b"NETSCAPE2.0")
            .expect("loop extension present");
        // Sub-block: size 3, id 1, then the count little-endian
        let sub = &bytes[at + 11..at + 15];
        assert_eq!(&sub[..2], &[3, 1]);
        u16::from_le_bytes([sub[2], sub[3]])
    }

    #[test]
    fn test_infinite_loop_count() {
        let mut bytes = Vec::new();
        encode_gif(&record(2), &mut bytes).unwrap();
        assert_eq!(loop_count_in(&bytes), LOOP_FOREVER);
    }

    #[test]
    fn test_finite_loop_count() {
        let mut source = record(2);
        source.loop_count = 3;
        let mut bytes = Vec::new();
        encode_gif(&source, &mut bytes).unwrap();
        assert_eq!(loop_count_in(&bytes), 3);
    }

    #[test]
    fn test_empty_record_rejected() {
        let empty = AnimationRecord {
            frames: vec![],
            delays: vec![],
            disposal_methods: vec![],
            loop_count: LOOP_FOREVER,
        };
        let result = encode_gif(&empty, Vec::new());
        assert!(matches!(result, Err(WhirlError::InvalidInput(_))));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut source = record(3);
        source.delays.pop();
        let result = encode_gif(&source, Vec::new());
        assert!(matches!(result, Err(WhirlError::InvalidInput(_))));
    }

    #[test]
    fn test_mixed_palettes_rejected() {
        let red = Arc::new(Palette::new(vec![[255, 0, 0, 255]]).unwrap());
        let blue = Arc::new(Palette::new(vec![[0, 0, 255, 255]]).unwrap());
        let frame = RasterImage::filled(2, 2, [255, 0, 0, 255]);
        let mut source = encode_and_assemble(&[frame.clone(), frame], FrameDelay::from_centis(2), red).unwrap();
        source.frames[1].palette = blue;

        let result = encode_gif(&source, Vec::new());
        assert!(matches!(result, Err(WhirlError::InvalidInput(_))));
    }

    #[test]
    fn test_equal_palettes_in_separate_arcs_accepted() {
        let mut source = record(2);
        source.frames[1].palette = Arc::new(Palette::web_safe());
        let mut bytes = Vec::new();
        encode_gif(&source, &mut bytes).unwrap();
        assert_eq!(decode_frames(&bytes).len(), 2);
    }

    #[test]
    fn test_write_failure_is_encode_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let result = encode_gif(&record(2), Broken);
        assert!(matches!(result, Err(WhirlError::EncodeFailure(_))));
    }
}
