#![forbid(unsafe_code)]

//! Tessera public facade crate.
//!
//! Packs weighted items into a dense square grid, renders the grid to a
//! flat raster image, and reconstructs per-tile geometry from that image
//! for a 3D extrusion view. This crate re-exports the common types from
//! the internal crates and offers a lightweight prelude.

pub mod cache;
pub mod pipeline;

// --- Core re-exports -------------------------------------------------------

pub use tessera_core::{ColorBand, Rect, Rgba, TIER_LOG_OFFSET, classify};

// --- Packing re-exports ----------------------------------------------------

pub use tessera_pack::{Layout, OccupancyGrid, PlacedTile};

// --- Raster re-exports -----------------------------------------------------

pub use tessera_raster::{
    MAX_COMPONENT_PIXELS, MAX_COMPONENTS, PixelBuffer, RasterError, ReconstructedSquare,
    Reconstruction, RenderOptions, TruncationFlags, reconstruct, reconstruct_png, render_tiles,
};

// --- Pipeline --------------------------------------------------------------

pub use cache::{CacheKey, CacheStats, SceneCache};
pub use pipeline::{Item, Scene, SceneOptions, build_scene, pack_items, reconstruct_scene};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CacheKey, ColorBand, Item, Layout, PixelBuffer, PlacedTile, ReconstructedSquare,
        Reconstruction, RenderOptions, Rgba, Scene, SceneCache, SceneOptions, TruncationFlags,
        build_scene, pack_items, reconstruct, reconstruct_png, reconstruct_scene,
    };

    pub use crate::{core, pack, raster};
}

pub use tessera_core as core;
pub use tessera_pack as pack;
pub use tessera_raster as raster;
