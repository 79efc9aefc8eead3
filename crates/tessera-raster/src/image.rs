#![forbid(unsafe_code)]

//! PNG encoding and decoding for [`PixelBuffer`].
//!
//! The image payload handed to presentation consumers is a lossless PNG;
//! lossless matters because reconstruction matches colors against a
//! narrow tolerance band.

use std::io::Cursor;

use image::{ExtendedColorType, ImageFormat};

use crate::buffer::PixelBuffer;

impl PixelBuffer {
    /// Encode the buffer as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, RasterError> {
        let mut out = Cursor::new(Vec::new());
        image::write_buffer_with_format(
            &mut out,
            self.as_bytes(),
            self.width(),
            self.height(),
            ExtendedColorType::Rgba8,
            ImageFormat::Png,
        )
        .map_err(RasterError::Encode)?;
        Ok(out.into_inner())
    }

    /// Decode PNG bytes into a buffer, converting to RGBA.
    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self, RasterError> {
        let decoded = image::load_from_memory(bytes).map_err(RasterError::Decode)?;
        let rgba = decoded.into_rgba8();
        let (width, height) = rgba.dimensions();
        PixelBuffer::from_raw(width, height, rgba.into_raw()).ok_or(RasterError::EmptyImage)
    }
}

/// Errors raised by image encoding or decoding.
#[derive(Debug)]
pub enum RasterError {
    Decode(image::ImageError),
    Encode(image::ImageError),
    /// The payload decoded to an image with no pixels.
    EmptyImage,
}

impl std::fmt::Display for RasterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "image decode error: {err}"),
            Self::Encode(err) => write!(f, "image encode error: {err}"),
            Self::EmptyImage => write!(f, "decoded image has no pixels"),
        }
    }
}

impl std::error::Error for RasterError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{Rect, Rgba};

    #[test]
    fn png_roundtrip_preserves_pixels() {
        let mut buf = PixelBuffer::new(12, 9, Rgba::rgb(5, 6, 7));
        buf.fill_rect(Rect::new(2, 2, 4, 4), Rgba::rgb(250, 128, 30));
        buf.set(11, 8, Rgba::rgb(1, 2, 3));

        let bytes = buf.to_png_bytes().unwrap();
        let back = PixelBuffer::from_png_bytes(&bytes).unwrap();

        assert_eq!((back.width(), back.height()), (12, 9));
        assert_eq!(back, buf);
    }

    #[test]
    fn truncated_payload_fails_to_decode() {
        let buf = PixelBuffer::new(8, 8, Rgba::rgb(0, 0, 0));
        let mut bytes = buf.to_png_bytes().unwrap();
        bytes.truncate(bytes.len() / 2);
        assert!(matches!(
            PixelBuffer::from_png_bytes(&bytes),
            Err(RasterError::Decode(_))
        ));
    }

    #[test]
    fn garbage_payload_fails_to_decode() {
        assert!(PixelBuffer::from_png_bytes(b"\x89PNG but not really").is_err());
    }

    #[test]
    fn errors_format_for_diagnostics() {
        let err = PixelBuffer::from_png_bytes(b"nope").unwrap_err();
        assert!(err.to_string().contains("decode"));
    }
}
