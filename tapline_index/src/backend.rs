// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial indexing implementations.

use crate::types::Aabb2D;

/// Spatial backend abstraction used by [`IndexGeneric`][crate::IndexGeneric].
///
/// Slots are dense `usize` handles owned by the index; a backend only has to
/// remember which box belongs to which slot.
pub trait Backend {
    /// Insert a new slot into the spatial structure.
    fn insert(&mut self, slot: usize, aabb: Aabb2D);

    /// Update an existing slot's AABB.
    fn update(&mut self, slot: usize, aabb: Aabb2D);

    /// Remove a slot from the spatial structure.
    fn remove(&mut self, slot: usize);

    /// Visit slots whose AABB intersects the rectangle. Each slot is visited
    /// at most once.
    fn visit_rect<F: FnMut(usize)>(&self, rect: Aabb2D, f: F);
}
