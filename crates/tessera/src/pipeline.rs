#![forbid(unsafe_code)]

//! The item-to-geometry pipeline.
//!
//! Weighted items flow through classification, packing, and rasterization
//! into a [`Scene`]; reconstruction walks the scene's pixels back into
//! extrusion geometry, memoized through a host-owned [`SceneCache`].
//! Every stage is synchronous and total: degenerate input produces a
//! trivial scene, never an error.

use tessera_core::{ColorBand, classify};
use tessera_pack::{Layout, PlacedTile};
use tessera_raster::{PixelBuffer, ReconstructedSquare, RenderOptions, reconstruct, render_tiles};

use crate::cache::{CacheKey, SceneCache};

/// One weighted input item.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Caller-stable identifier; carried through untouched.
    pub id: String,
    /// Non-negative weight driving the item's size tier.
    pub raw_weight: f64,
}

impl Item {
    pub fn new(id: impl Into<String>, raw_weight: f64) -> Self {
        Self {
            id: id.into(),
            raw_weight,
        }
    }
}

/// Pipeline parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    /// Packing grid width in columns.
    pub layout_width: u32,
    /// Optional upper bound on classified tiers.
    pub max_tier: Option<u32>,
    /// Per-channel tolerance when matching tile pixels back out.
    pub band_tolerance: u8,
    /// Rasterization parameters.
    pub render: RenderOptions,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            layout_width: 24,
            max_tier: None,
            band_tolerance: 8,
            render: RenderOptions::default(),
        }
    }
}

/// A packed and rendered item set.
#[derive(Debug, Clone)]
pub struct Scene {
    pub tiles: Vec<PlacedTile>,
    pub buffer: PixelBuffer,
}

/// Classify and pack items in their given order.
///
/// Each item's weight maps to a size tier (always ≥ 1, so every item
/// places); tiles come back in placement order carrying the originating
/// item index.
pub fn pack_items(items: &[Item], opts: &SceneOptions) -> Vec<PlacedTile> {
    let mut layout = Layout::new(opts.layout_width.max(1));
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let tier = classify(item.raw_weight, opts.max_tier);
            layout.place(index, tier)
        })
        .collect()
}

/// Pack and rasterize items into a [`Scene`].
///
/// An empty item list yields an empty tile list over a background-only
/// minimum-size buffer.
pub fn build_scene(items: &[Item], opts: &SceneOptions) -> Scene {
    let tiles = pack_items(items, opts);
    let buffer = render_tiles(&tiles, &opts.render);
    Scene { tiles, buffer }
}

/// Reconstruct extrusion geometry for a dataset, memoized by identity.
///
/// `dataset` is the caller's stable identity for this item set; together
/// with the item count it forms the cache key, so a repeat call for the
/// same dataset returns the cached sequence without re-rendering.
pub fn reconstruct_scene(
    cache: &SceneCache,
    dataset: impl Into<String>,
    items: &[Item],
    opts: &SceneOptions,
) -> Vec<ReconstructedSquare> {
    let key = CacheKey::new(dataset, items.len());
    cache.get_or_compute(key, || {
        let scene = build_scene(items, opts);
        let band = ColorBand::new(opts.render.tile, opts.band_tolerance);
        reconstruct(&scene.buffer, &band).squares
    })
}
