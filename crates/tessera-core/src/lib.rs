#![forbid(unsafe_code)]

//! Core primitives: rectangles, RGBA color, and weight classification.

pub mod color;
pub mod geometry;
pub mod tier;

pub use color::{ColorBand, Rgba};
pub use geometry::Rect;
pub use tier::{TIER_LOG_OFFSET, classify};
