// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid backend.
//!
//! Boxes are bucketed into fixed-size square cells; queries only touch the
//! cells overlapping the query. This suits large line sets spread over a
//! map where the visible region is small compared to the data extent.
//!
//! Work stays bounded by the number of stored boxes whatever the cell size:
//!
//! - Boxes spanning more than 64 cells go to an overflow
//!   list instead of being linked into every cell.
//! - Queries spanning more cells than are occupied scan the slots directly.

use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::backend::Backend;
use crate::types::Aabb2D;

type CellId = (i32, i32);

/// Map a coordinate to its cell along one axis, rounding toward -∞ and
/// saturating outside the `i32` range.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Grid cell indices are intentionally i32; out-of-range values saturate."
)]
#[inline]
fn cell_coord(value: f64, cell_size: f64) -> i32 {
    let t = value / cell_size;
    let coord = t as i32;
    if t < 0.0 && f64::from(coord) > t {
        coord.saturating_sub(1)
    } else {
        coord
    }
}

/// Largest number of cells a single box is linked into.
const MAX_LINKED_CELLS: u64 = 64;

/// Number of cells in the inclusive span `lo..=hi`, saturating.
fn span_len(lo: CellId, hi: CellId) -> u64 {
    let w = u64::from(hi.0.abs_diff(lo.0)) + 1;
    let h = u64::from(hi.1.abs_diff(lo.1)) + 1;
    w.saturating_mul(h)
}

/// Uniform grid backend with fixed cell size.
pub struct Grid {
    cell_size: f64,
    cells: HashMap<CellId, SmallVec<[usize; 8]>>,
    oversized: Vec<usize>,
    slots: Vec<Option<SlotEntry>>,
}

#[derive(Clone, Debug)]
struct SlotEntry {
    aabb: Aabb2D,
    // Empty when the box lives in the overflow list.
    cells: SmallVec<[CellId; 4]>,
}

impl Debug for Grid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let live_slots = self.slots.iter().filter(|s| s.is_some()).count();
        f.debug_struct("Grid")
            .field("cell_size", &self.cell_size)
            .field("live_slots", &live_slots)
            .field("cells", &self.cells.len())
            .field("oversized", &self.oversized.len())
            .finish_non_exhaustive()
    }
}

impl Grid {
    /// Create a grid with the given cell size, with cell (0, 0) at the origin.
    ///
    /// `cell_size` must be strictly positive.
    pub fn new(cell_size: f64) -> Self {
        debug_assert!(cell_size > 0.0, "grid cell_size must be strictly positive");
        Self {
            cell_size,
            cells: HashMap::new(),
            oversized: Vec::new(),
            slots: Vec::new(),
        }
    }

    fn cell_span(&self, rect: &Aabb2D) -> (CellId, CellId) {
        let x0 = cell_coord(rect.min_x, self.cell_size);
        let x1 = cell_coord(rect.max_x, self.cell_size);
        let y0 = cell_coord(rect.min_y, self.cell_size);
        let y1 = cell_coord(rect.max_y, self.cell_size);
        ((x0.min(x1), y0.min(y1)), (x0.max(x1), y0.max(y1)))
    }

    fn link(&mut self, slot: usize, aabb: Aabb2D) {
        let (lo, hi) = self.cell_span(&aabb);
        let mut cells = SmallVec::new();
        if span_len(lo, hi) > MAX_LINKED_CELLS {
            self.oversized.push(slot);
        } else {
            for ix in lo.0..=hi.0 {
                for iy in lo.1..=hi.1 {
                    self.cells.entry((ix, iy)).or_default().push(slot);
                    cells.push((ix, iy));
                }
            }
        }
        self.slots[slot] = Some(SlotEntry { aabb, cells });
    }

    fn unlink(&mut self, slot: usize) {
        let Some(entry) = self.slots.get_mut(slot).and_then(Option::take) else {
            return;
        };
        if entry.cells.is_empty() {
            self.oversized.retain(|s| *s != slot);
        }
        for id in entry.cells {
            if let Some(members) = self.cells.get_mut(&id) {
                members.retain(|s| *s != slot);
                if members.is_empty() {
                    self.cells.remove(&id);
                }
            }
        }
    }

    fn aabb_of(&self, slot: usize) -> Option<&Aabb2D> {
        self.slots.get(slot)?.as_ref().map(|e| &e.aabb)
    }
}

impl Backend for Grid {
    fn insert(&mut self, slot: usize, aabb: Aabb2D) {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        self.unlink(slot);
        self.link(slot, aabb);
    }

    fn update(&mut self, slot: usize, aabb: Aabb2D) {
        if self.aabb_of(slot) == Some(&aabb) {
            return;
        }
        self.insert(slot, aabb);
    }

    fn remove(&mut self, slot: usize) {
        self.unlink(slot);
    }

    fn visit_rect<F: FnMut(usize)>(&self, rect: Aabb2D, mut f: F) {
        let (lo, hi) = self.cell_span(&rect);
        if span_len(lo, hi) > self.cells.len() as u64 {
            for (slot, entry) in self.slots.iter().enumerate() {
                if entry.as_ref().is_some_and(|e| e.aabb.overlaps(&rect)) {
                    f(slot);
                }
            }
            return;
        }

        let mut seen: HashSet<usize> = HashSet::new();
        for ix in lo.0..=hi.0 {
            for iy in lo.1..=hi.1 {
                let Some(members) = self.cells.get(&(ix, iy)) else {
                    continue;
                };
                for &slot in members {
                    if seen.insert(slot) && self.aabb_of(slot).is_some_and(|a| a.overlaps(&rect)) {
                        f(slot);
                    }
                }
            }
        }
        for &slot in &self.oversized {
            if self.aabb_of(slot).is_some_and(|a| a.overlaps(&rect)) {
                f(slot);
            }
        }
    }
}
