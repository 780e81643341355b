// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use crate::types::Aabb2D;

/// Boxes that changed during one [`commit`](crate::IndexGeneric::commit).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Damage {
    /// Boxes inserted since the previous commit.
    pub added: Vec<Aabb2D>,
    /// Boxes removed since the previous commit.
    pub removed: Vec<Aabb2D>,
    /// `(before, after)` pairs for boxes that moved.
    pub moved: Vec<(Aabb2D, Aabb2D)>,
}

impl Damage {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.moved.is_empty()
    }

    /// Number of individual changes.
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.moved.len()
    }
}
