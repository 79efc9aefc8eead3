#![forbid(unsafe_code)]

//! First-fit square packing into a fixed-width grid.
//!
//! [`Layout`] places square tiles row by row into the leftmost free slot
//! that is wide enough, growing downward as rows fill up. The output is a
//! sequence of [`PlacedTile`]s with non-overlapping grid rectangles,
//! mirrored into an [`OccupancyGrid`] for point queries.

pub mod layout;
pub mod occupancy;

pub use layout::{Layout, PlacedTile};
pub use occupancy::OccupancyGrid;
