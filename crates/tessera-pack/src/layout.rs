#![forbid(unsafe_code)]

//! The first-fit row/slot packer.
//!
//! A [`Layout`] tracks free space as per-row *slots*. A slot at `(x, y)`
//! with width `w` records that columns `[x, x+w)` of row `y` are free, and
//! additionally guarantees that the whole square `[x, x+w) × [y, y+w)` is
//! free of placed tiles. That square capacity is what makes the width-only
//! first-fit test sufficient: any slot wide enough for a tile is also deep
//! enough for it.
//!
//! # Invariants
//!
//! 1. Within a row, slots are disjoint and exactly cover the row's
//!    unoccupied columns (no gaps, no duplicate x).
//! 2. No slot's column range overlaps a placed tile.
//! 3. No slot's capacity square overlaps a placed tile.
//! 4. Placement is deterministic: the same width and the same ordered
//!    tier sequence always produce the same tiles.
//!
//! Rows are created lazily, top-down, and never removed. Each row's free
//! slots live in a single ordered map keyed by x, so ascending-x scan
//! order and x-uniqueness are structural rather than maintained by hand.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::occupancy::OccupancyGrid;

/// A square tile placed by the packer, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedTile {
    /// Index of the originating item in the caller's input order.
    pub item_index: usize,
    /// Left column of the tile.
    pub x: u32,
    /// Top row of the tile.
    pub y: u32,
    /// Edge length in grid units.
    pub side: u32,
}

impl PlacedTile {
    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x + self.side
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y + self.side
    }

    /// Whether two tiles overlap in at least one grid cell.
    #[inline]
    pub const fn overlaps(&self, other: &PlacedTile) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// One horizontal strip of grid space: free slots keyed by left column.
#[derive(Debug, Clone, Default)]
struct Row {
    free: BTreeMap<u32, u32>,
}

impl Row {
    fn full(width: u32) -> Self {
        let mut free = BTreeMap::new();
        free.insert(0, width);
        Self { free }
    }
}

/// A fixed-width packing grid that grows downward.
#[derive(Debug, Clone)]
pub struct Layout {
    width: u32,
    rows: Vec<Row>,
    occupancy: OccupancyGrid,
}

impl Layout {
    /// Create an empty layout of the given column count.
    ///
    /// # Panics
    ///
    /// Panics if width is 0.
    pub fn new(width: u32) -> Self {
        assert!(width > 0, "layout width must be > 0");
        Self {
            width,
            rows: Vec::new(),
            occupancy: OccupancyGrid::new(width),
        }
    }

    /// Layout width in columns.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows placement has grown the layout to.
    #[inline]
    pub fn rows_used(&self) -> u32 {
        self.rows.len() as u32
    }

    /// The occupancy mirror of all placements so far.
    #[inline]
    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }

    /// Free slots of one row as `(x, width)` pairs in ascending x.
    ///
    /// Rows that have not been created yet report a single full-width span.
    pub fn free_spans(&self, row: u32) -> Vec<(u32, u32)> {
        match self.rows.get(row as usize) {
            Some(r) => r.free.iter().map(|(&x, &w)| (x, w)).collect(),
            None => vec![(0, self.width)],
        }
    }

    /// Place the next tile.
    ///
    /// Scans rows top-to-bottom and slots left-to-right, and places the
    /// tile in the first slot wide enough for it, appending a fresh row
    /// when nothing fits. Returns `None` for a zero tier (degenerate
    /// classifier output is dropped rather than reported); a tier wider
    /// than the layout is clamped to the layout width.
    pub fn place(&mut self, item_index: usize, size_tier: u32) -> Option<PlacedTile> {
        if size_tier == 0 {
            return None;
        }
        let side = size_tier.min(self.width);

        let (x, y) = match self.find_slot(side) {
            Some(at) => at,
            None => self.append_row(),
        };

        self.carve(x, y, side);
        self.clip_shadow(x, y, side);
        self.occupancy.mark(x, y, side);

        #[cfg(feature = "tracing")]
        tracing::trace!(item_index, x, y, side, "tile placed");

        Some(PlacedTile {
            item_index,
            x,
            y,
            side,
        })
    }

    /// First slot (row-major, ascending x) at least `side` wide.
    fn find_slot(&self, side: u32) -> Option<(u32, u32)> {
        for (y, row) in self.rows.iter().enumerate() {
            for (&x, &w) in &row.free {
                if w >= side {
                    return Some((x, y as u32));
                }
            }
        }
        None
    }

    /// Append a fresh full-width row and return its single slot origin.
    fn append_row(&mut self) -> (u32, u32) {
        let y = self.rows.len() as u32;
        self.rows.push(Row::full(self.width));

        #[cfg(feature = "tracing")]
        tracing::debug!(rows = self.rows.len(), "layout grew a row");

        (0, y)
    }

    fn ensure_row(&mut self, row: u32) {
        while self.rows.len() <= row as usize {
            self.rows.push(Row::full(self.width));
        }
    }

    /// Remove the tile's footprint from the free slots of every row it
    /// covers, preserving the exact-cover invariant.
    ///
    /// For each covered row: slots intersecting the tile's columns are
    /// removed, the part left of the tile is re-inserted, and the widest
    /// overhang past the tile's right edge becomes a new slot there.
    fn carve(&mut self, x: u32, y: u32, side: u32) {
        let right = x + side;

        for r in y..y + side {
            self.ensure_row(r);
            let row = &mut self.rows[r as usize];

            let colliding: SmallVec<[(u32, u32); 4]> = row
                .free
                .range(..right)
                .filter(|&(&sx, &sw)| sx + sw > x)
                .map(|(&sx, &sw)| (sx, sw))
                .collect();

            let mut max_excess = 0u32;
            for &(sx, sw) in &colliding {
                row.free.remove(&sx);
                if sx < x {
                    row.free.insert(sx, x - sx);
                }
                let end = sx + sw;
                if end > right {
                    max_excess = max_excess.max(end - right);
                }
            }

            if max_excess > 0 && right < self.width && !row.free.contains_key(&right) {
                row.free.insert(right, max_excess);
            }
        }
    }

    /// Shrink slots in the rows above the tile whose capacity square would
    /// reach into it.
    ///
    /// Only rows within `side` of the tile's top can hold such slots: on
    /// the first-fit path every slot above the chosen row is narrower than
    /// the tile, so its capacity square is shallower than the tile's edge.
    /// A clipped slot is re-covered by spans no wider than the remaining
    /// head-room, so every replacement capacity square still ends above
    /// the tile.
    fn clip_shadow(&mut self, x: u32, y: u32, side: u32) {
        let right = x + side;
        let top = y.saturating_sub(side);

        for r in top..y {
            let head_room = y - r;
            let row = &mut self.rows[r as usize];

            let overhanging: SmallVec<[(u32, u32); 4]> = row
                .free
                .range(..right)
                .filter(|&(&sx, &sw)| sx + sw > x && sw > head_room)
                .map(|(&sx, &sw)| (sx, sw))
                .collect();

            for &(sx, sw) in &overhanging {
                row.free.remove(&sx);
                row.free.insert(sx, head_room);

                let end = sx + sw;
                let mut cur = sx + head_room;
                while cur < end {
                    let span = (end - cur).min(head_room);
                    row.free.insert(cur, span);
                    cur += span;
                }
            }
        }
    }
}
