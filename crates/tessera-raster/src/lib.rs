#![forbid(unsafe_code)]

//! Raster kernel: pixel buffers, tile rendering, and geometry
//! reconstruction.
//!
//! The renderer turns a packed tile list into a flat RGBA image with
//! visible gutters between tiles; the reconstruction engine walks such an
//! image and recovers one bounding box per connected tile-colored
//! component, bounded by hard caps so adversarial input degrades to a
//! partial result instead of unbounded work.

pub mod buffer;
pub mod image;
pub mod reconstruct;
pub mod render;

pub use buffer::PixelBuffer;
pub use image::RasterError;
pub use reconstruct::{
    MAX_COMPONENT_PIXELS, MAX_COMPONENTS, ReconstructedSquare, Reconstruction, TruncationFlags,
    reconstruct, reconstruct_png,
};
pub use render::{RenderOptions, render_tiles};
