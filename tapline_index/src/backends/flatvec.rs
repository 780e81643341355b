// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend: one optional box per slot, linear scans.

use alloc::vec::Vec;

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Linear-scan backend.
///
/// Queries visit slots in ascending order, which makes results reproducible
/// without any sorting at the call site.
#[derive(Clone, Debug, Default)]
pub struct FlatVec {
    slots: Vec<Option<Aabb2D>>,
}

impl Backend for FlatVec {
    fn insert(&mut self, slot: usize, aabb: Aabb2D) {
        if self.slots.len() <= slot {
            self.slots.resize(slot + 1, None);
        }
        self.slots[slot] = Some(aabb);
    }

    fn update(&mut self, slot: usize, aabb: Aabb2D) {
        self.insert(slot, aabb);
    }

    fn remove(&mut self, slot: usize) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = None;
        }
    }

    fn visit_rect<F: FnMut(usize)>(&self, rect: Aabb2D, mut f: F) {
        for (i, aabb) in self.slots.iter().enumerate() {
            if aabb.is_some_and(|a| a.overlaps(&rect)) {
                f(i);
            }
        }
    }
}
