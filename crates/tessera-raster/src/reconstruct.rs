#![forbid(unsafe_code)]

//! Connected-component reconstruction.
//!
//! Scans a pixel buffer in row-major order and recovers the bounding box
//! of every 4-connected component of tile-colored pixels via an iterative
//! explicit-stack flood fill. Two hard caps bound the work on pathological
//! input: a component-count cap and a per-component pixel cap. Hitting a
//! cap truncates the result and raises a [`TruncationFlags`] bit; it is
//! never an error, the engine always returns what it found.

use bitflags::bitflags;
use tessera_core::ColorBand;

use crate::buffer::PixelBuffer;

/// Hard cap on recovered components per buffer.
///
/// Far above any plausible item count for this domain; a safety valve,
/// not an expected limit.
pub const MAX_COMPONENTS: usize = 10_000;

/// Hard cap on pixels visited within a single component.
///
/// Guards against near-fully-colored buffers; a capped component keeps
/// the bounding box accumulated so far.
pub const MAX_COMPONENT_PIXELS: usize = 1_000_000;

/// Extruded height per pixel of the larger footprint edge.
const EXTRUDE_FACTOR: f32 = 0.5;

/// Extruded height floor, so minimal tiles still get nonzero volume.
const EXTRUDE_BASE: f32 = 4.0;

bitflags! {
    /// Which degradations a reconstruction went through.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TruncationFlags: u8 {
        /// Component scan stopped at [`MAX_COMPONENTS`].
        const COMPONENT_CAP = 1 << 0;
        /// At least one flood fill stopped at [`MAX_COMPONENT_PIXELS`].
        const PIXEL_CAP = 1 << 1;
        /// The image payload failed to decode; the result is empty.
        const DECODE_FAILED = 1 << 2;
    }
}

/// One recovered tile footprint, ready for 3D extrusion.
///
/// Coordinates are pixel-space, relative to the buffer center; `width`
/// runs along x and `depth` along z (the buffer's y axis).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconstructedSquare {
    pub center_x: f32,
    pub center_z: f32,
    pub width: u32,
    pub depth: u32,
    pub extruded_height: f32,
    /// Discovery order: row-major scan position of the component's first
    /// pixel. Lines up with placement order only when the renderer drew
    /// tiles unreordered; treat correlation back to input items as
    /// positional approximation, not a verified mapping.
    pub sequence_index: usize,
}

/// Reconstruction output: recovered squares plus degradation flags.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reconstruction {
    pub squares: Vec<ReconstructedSquare>,
    pub truncation: TruncationFlags,
}

impl Reconstruction {
    /// Whether any cap or decode degradation applied.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        !self.truncation.is_empty()
    }
}

/// Running bounding box of one flood fill.
struct BoundingBox {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl BoundingBox {
    fn seed(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn extend(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn into_square(self, buffer: &PixelBuffer, sequence_index: usize) -> ReconstructedSquare {
        let width = self.max_x - self.min_x + 1;
        let depth = self.max_y - self.min_y + 1;
        let center_x = (self.min_x + self.max_x + 1) as f32 / 2.0 - buffer.width() as f32 / 2.0;
        let center_z = (self.min_y + self.max_y + 1) as f32 / 2.0 - buffer.height() as f32 / 2.0;
        let extruded_height = width.max(depth) as f32 * EXTRUDE_FACTOR + EXTRUDE_BASE;

        ReconstructedSquare {
            center_x,
            center_z,
            width,
            depth,
            extruded_height,
            sequence_index,
        }
    }
}

/// Recover every tile-colored connected component of the buffer.
///
/// Components are emitted in discovery order: the row-major scan position
/// of each component's first pixel. The fill is iterative (explicit
/// stack); input depth can never overflow the call stack.
pub fn reconstruct(buffer: &PixelBuffer, band: &ColorBand) -> Reconstruction {
    let width = buffer.width();
    let height = buffer.height();
    let mut visited = vec![false; width as usize * height as usize];
    let mut stack: Vec<(u32, u32)> = Vec::new();
    let mut squares = Vec::new();
    let mut truncation = TruncationFlags::empty();

    'scan: for y in 0..height {
        for x in 0..width {
            let seed_index = y as usize * width as usize + x as usize;
            if visited[seed_index] {
                continue;
            }
            let Some(color) = buffer.get(x, y) else {
                continue;
            };
            if !band.matches(color) {
                continue;
            }

            if squares.len() == MAX_COMPONENTS {
                truncation |= TruncationFlags::COMPONENT_CAP;
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    cap = MAX_COMPONENTS,
                    "component cap reached, returning partial reconstruction"
                );
                break 'scan;
            }

            let mut bbox = BoundingBox::seed(x, y);
            let mut filled = 0usize;
            stack.clear();
            stack.push((x, y));

            while let Some((cx, cy)) = stack.pop() {
                let index = cy as usize * width as usize + cx as usize;
                if visited[index] {
                    continue;
                }
                let Some(color) = buffer.get(cx, cy) else {
                    continue;
                };
                if !band.matches(color) {
                    continue;
                }

                visited[index] = true;
                bbox.extend(cx, cy);
                filled += 1;
                if filled == MAX_COMPONENT_PIXELS {
                    truncation |= TruncationFlags::PIXEL_CAP;
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        cap = MAX_COMPONENT_PIXELS,
                        component = squares.len(),
                        "pixel cap reached, component bounding box is partial"
                    );
                    break;
                }

                if cx > 0 {
                    stack.push((cx - 1, cy));
                }
                if cx + 1 < width {
                    stack.push((cx + 1, cy));
                }
                if cy > 0 {
                    stack.push((cx, cy - 1));
                }
                if cy + 1 < height {
                    stack.push((cx, cy + 1));
                }
            }

            let sequence_index = squares.len();
            squares.push(bbox.into_square(buffer, sequence_index));
        }
    }

    Reconstruction {
        squares,
        truncation,
    }
}

/// Decode a PNG payload and reconstruct it.
///
/// A payload that fails to decode yields an *empty* reconstruction
/// carrying [`TruncationFlags::DECODE_FAILED`]; the caller always gets a
/// renderable (if degraded) result, never an error.
pub fn reconstruct_png(bytes: &[u8], band: &ColorBand) -> Reconstruction {
    match PixelBuffer::from_png_bytes(bytes) {
        Ok(buffer) => reconstruct(&buffer, band),
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_err, "image decode failed, returning empty reconstruction");
            Reconstruction {
                squares: Vec::new(),
                truncation: TruncationFlags::DECODE_FAILED,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{Rect, Rgba};

    const BG: Rgba = Rgba::rgb(0, 0, 0);
    const TILE: Rgba = Rgba::rgb(64, 160, 255);

    fn band() -> ColorBand {
        ColorBand::new(TILE, 8)
    }

    // --- Basic extraction ---

    #[test]
    fn background_only_buffer_has_no_components() {
        let buf = PixelBuffer::new(16, 16, BG);
        let rec = reconstruct(&buf, &band());
        assert!(rec.squares.is_empty());
        assert!(!rec.is_truncated());
    }

    #[test]
    fn single_rectangle_is_recovered_exactly() {
        let mut buf = PixelBuffer::new(20, 20, BG);
        buf.fill_rect(Rect::new(4, 6, 5, 3), TILE);
        let rec = reconstruct(&buf, &band());

        assert_eq!(rec.squares.len(), 1);
        let sq = &rec.squares[0];
        assert_eq!((sq.width, sq.depth), (5, 3));
        // Bounding box [4,9) x [6,9) centered against the 20x20 buffer.
        assert_eq!(sq.center_x, 6.5 - 10.0);
        assert_eq!(sq.center_z, 7.5 - 10.0);
        assert!(sq.extruded_height > 0.0);
        assert_eq!(sq.sequence_index, 0);
    }

    #[test]
    fn components_appear_in_scan_order() {
        let mut buf = PixelBuffer::new(20, 20, BG);
        buf.fill_rect(Rect::new(10, 2, 3, 3), TILE);
        buf.fill_rect(Rect::new(1, 5, 3, 3), TILE);
        let rec = reconstruct(&buf, &band());

        assert_eq!(rec.squares.len(), 2);
        // The component whose first pixel scans earlier comes first.
        assert!(rec.squares[0].center_z < rec.squares[1].center_z);
        assert_eq!(rec.squares[0].sequence_index, 0);
        assert_eq!(rec.squares[1].sequence_index, 1);
    }

    #[test]
    fn diagonal_touch_is_two_components() {
        let mut buf = PixelBuffer::new(8, 8, BG);
        buf.set(2, 2, TILE);
        buf.set(3, 3, TILE);
        let rec = reconstruct(&buf, &band());
        assert_eq!(rec.squares.len(), 2);
    }

    #[test]
    fn l_shape_reports_its_bounding_box() {
        let mut buf = PixelBuffer::new(16, 16, BG);
        buf.fill_rect(Rect::new(2, 2, 2, 6), TILE);
        buf.fill_rect(Rect::new(2, 6, 6, 2), TILE);
        let rec = reconstruct(&buf, &band());

        assert_eq!(rec.squares.len(), 1);
        assert_eq!((rec.squares[0].width, rec.squares[0].depth), (6, 6));
    }

    #[test]
    fn tolerance_band_absorbs_jitter() {
        let mut buf = PixelBuffer::new(8, 8, BG);
        buf.set(1, 1, TILE);
        buf.set(2, 1, Rgba::rgb(70, 155, 250));
        let rec = reconstruct(&buf, &band());
        assert_eq!(rec.squares.len(), 1);
        assert_eq!(rec.squares[0].width, 2);
    }

    #[test]
    fn minimal_tile_still_has_height() {
        let mut buf = PixelBuffer::new(8, 8, BG);
        buf.set(0, 0, TILE);
        let rec = reconstruct(&buf, &band());
        assert_eq!(rec.squares[0].extruded_height, 0.5 + 4.0);
    }

    // --- Degraded payloads ---

    #[test]
    fn garbage_payload_reconstructs_empty_with_flag() {
        let rec = reconstruct_png(b"not a png at all", &band());
        assert!(rec.squares.is_empty());
        assert!(rec.truncation.contains(TruncationFlags::DECODE_FAILED));
    }

    // ====== Property tests (proptest) ======

    mod property {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn disjoint_rects_are_each_recovered(
                count_x in 1u32..5,
                count_y in 1u32..5,
                side in 1u32..4,
            ) {
                // Rects laid on a coarse lattice with 2px gaps.
                let pitch = side + 2;
                let mut buf = PixelBuffer::new(count_x * pitch + 2, count_y * pitch + 2, BG);
                for gy in 0..count_y {
                    for gx in 0..count_x {
                        buf.fill_rect(Rect::new(gx * pitch, gy * pitch, side, side), TILE);
                    }
                }

                let rec = reconstruct(&buf, &band());
                prop_assert_eq!(rec.squares.len(), (count_x * count_y) as usize);
                prop_assert!(!rec.is_truncated());
                for sq in &rec.squares {
                    prop_assert_eq!(sq.width, side);
                    prop_assert_eq!(sq.depth, side);
                }
            }
        }
    }
}
