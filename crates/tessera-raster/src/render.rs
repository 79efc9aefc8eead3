#![forbid(unsafe_code)]

//! Tile rasterization.
//!
//! Turns placed tiles (grid units) into solid pixel rectangles on a
//! background-filled buffer. Every tile is inset by a fixed padding so
//! adjacent tiles stay separated by a visible gutter; the gutter is what
//! lets the reconstruction engine see each tile as its own 4-connected
//! component.

use tessera_core::{Rect, Rgba};
use tessera_pack::PlacedTile;

use crate::buffer::PixelBuffer;

/// Rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Pixels per grid unit.
    pub scale: u32,
    /// Pixels of canvas kept past the furthest tile edge.
    pub margin: u32,
    /// Inset per tile side, in pixels. Creates the inter-tile gutters.
    pub padding: u32,
    /// Lower bound on canvas width and height, in pixels.
    pub min_canvas: u32,
    /// Canvas fill color.
    pub background: Rgba,
    /// Tile fill color.
    pub tile: Rgba,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 16,
            margin: 16,
            padding: 2,
            min_canvas: 256,
            background: Rgba::rgb(12, 14, 20),
            tile: Rgba::rgb(64, 160, 255),
        }
    }
}

impl RenderOptions {
    /// Set the pixels-per-grid-unit scale.
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the canvas margin in pixels.
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the per-side tile inset in pixels.
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Set the minimum canvas edge in pixels.
    pub fn with_min_canvas(mut self, min_canvas: u32) -> Self {
        self.min_canvas = min_canvas;
        self
    }

    /// Set background and tile colors.
    pub fn with_colors(mut self, background: Rgba, tile: Rgba) -> Self {
        self.background = background;
        self.tile = tile;
        self
    }
}

/// Rasterize placed tiles onto a fresh buffer.
///
/// The canvas is sized from the furthest tile edge on each axis plus the
/// margin, floored at `min_canvas` (collisions during packing can push
/// rows past any naive estimate, so the extent is measured, not derived).
/// An empty tile list produces a background-only `min_canvas` square.
pub fn render_tiles(tiles: &[PlacedTile], opts: &RenderOptions) -> PixelBuffer {
    let scale = opts.scale.max(1);

    let mut extent_x = 0u32;
    let mut extent_y = 0u32;
    for tile in tiles {
        extent_x = extent_x.max(tile.right() * scale);
        extent_y = extent_y.max(tile.bottom() * scale);
    }

    let width = opts.min_canvas.max(extent_x + opts.margin).max(1);
    let height = opts.min_canvas.max(extent_y + opts.margin).max(1);
    let mut buffer = PixelBuffer::new(width, height, opts.background);

    for tile in tiles {
        if tile.side == 0 {
            continue;
        }
        let side_px = tile.side * scale;
        // Cap the inset so at least one pixel paints at small scales.
        let inset = opts.padding.min((side_px - 1) / 2);
        let rect = Rect::new(tile.x * scale, tile.y * scale, side_px, side_px);
        buffer.fill_rect(rect.inset(inset), opts.tile);
    }

    buffer
}
