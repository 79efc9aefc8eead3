#![forbid(unsafe_code)]

//! Pixel buffer storage.
//!
//! # Layout
//!
//! Pixels are stored in row-major RGBA byte order:
//! `index = (y * width + x) * 4`.
//!
//! # Invariants
//!
//! 1. `pixels.len() == width * height * 4`
//! 2. Width and height never change after creation

use tessera_core::{Rect, Rgba};

/// A 2D grid of RGBA pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a new buffer filled with the given background color.
    ///
    /// # Panics
    ///
    /// Panics if width or height is 0.
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        assert!(width > 0, "buffer width must be > 0");
        assert!(height > 0, "buffer height must be > 0");

        let size = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(size * 4);
        for _ in 0..size {
            pixels.extend_from_slice(&background.to_array());
        }

        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wrap raw row-major RGBA bytes.
    ///
    /// Returns `None` when the byte length does not match the dimensions.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        if pixels.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Buffer width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len() / 4
    }

    /// Check if the buffer is empty (never true for valid buffers).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Bounding rect of the entire buffer.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Raw row-major RGBA bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Convert (x, y) coordinates to a byte offset.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize * self.width as usize + x as usize) * 4)
        } else {
            None
        }
    }

    /// Get the pixel at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.offset(x, y).map(|i| {
            Rgba::from_array([
                self.pixels[i],
                self.pixels[i + 1],
                self.pixels[i + 2],
                self.pixels[i + 3],
            ])
        })
    }

    /// Set the pixel at (x, y). Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&color.to_array());
        }
    }

    /// Fill a rectangle, clipped to the buffer bounds.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let clipped = rect.intersection(&self.bounds());
        let bytes = color.to_array();
        for y in clipped.y..clipped.bottom() {
            let base = y as usize * self.width as usize;
            for x in clipped.x..clipped.right() {
                let i = (base + x as usize) * 4;
                self.pixels[i..i + 4].copy_from_slice(&bytes);
            }
        }
    }
}
