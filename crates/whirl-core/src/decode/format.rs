//! Extension-based source format detection.

use std::path::Path;

use crate::error::{WhirlError, WhirlResult};
use crate::types::RasterImage;

/// Image formats recognized on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Png,
    /// Recognized so the error can say so, but not decoded.
    Jpeg,
}

impl SourceFormat {
    /// Detect the format from a path's extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `WhirlError::InvalidInput` for a missing or unknown extension.
    pub fn from_path(path: &Path) -> WhirlResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| {
                WhirlError::invalid_input(format!("'{}' has no file extension", path.display()))
            })?;

        match ext.as_str() {
            "png" => Ok(SourceFormat::Png),
            "jpg" | "jpeg" => Ok(SourceFormat::Jpeg),
            other => Err(WhirlError::invalid_input(format!(
                "unknown image type '.{other}' for '{}'",
                path.display()
            ))),
        }
    }

    /// Whether the pipeline can decode this format.
    pub fn is_supported(self) -> bool {
        matches!(self, SourceFormat::Png)
    }

    /// Fail unless the format is supported.
    pub fn ensure_supported(self) -> WhirlResult<Self> {
        if self.is_supported() {
            Ok(self)
        } else {
            Err(self.unsupported())
        }
    }

    /// Decode `bytes` as this format.
    pub fn decode(self, bytes: &[u8]) -> WhirlResult<RasterImage> {
        match self {
            SourceFormat::Png => super::decode_png(bytes),
            SourceFormat::Jpeg => Err(self.unsupported()),
        }
    }

    fn unsupported(self) -> WhirlError {
        WhirlError::invalid_input(format!("{self:?} sources are not supported, only PNG is"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_detected() {
        assert_eq!(SourceFormat::from_path(Path::new("a/b.png")).unwrap(), SourceFormat::Png);
        assert_eq!(SourceFormat::from_path(Path::new("B.PNG")).unwrap(), SourceFormat::Png);
    }

    #[test]
    fn test_jpeg_recognized_but_unsupported() {
        let format = SourceFormat::from_path(Path::new("photo.jpeg")).unwrap();
        assert_eq!(format, SourceFormat::Jpeg);
        assert!(!format.is_supported());
        assert!(matches!(format.ensure_supported(), Err(WhirlError::InvalidInput(_))));
        assert!(matches!(format.decode(&[]), Err(WhirlError::InvalidInput(_))));
        assert_eq!(SourceFormat::from_path(Path::new("x.jpg")).unwrap(), SourceFormat::Jpeg);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = SourceFormat::from_path(Path::new("anim.gif")).unwrap_err();
        assert!(err.to_string().contains("unknown image type '.gif'"));
    }

    #[test]
    fn test_missing_extension_rejected() {
        assert!(matches!(
            SourceFormat::from_path(Path::new("README")),
            Err(WhirlError::InvalidInput(_))
        ));
    }
}
