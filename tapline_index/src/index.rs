// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Index` API and generic implementation over a pluggable backend.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::backends::FlatVec;
use crate::damage::Damage;
use crate::types::Aabb2D;

/// Generational handle for entries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key(u32, u32);

impl Key {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Index keys are 32-bit; an index never holds more than u32::MAX entries."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Pending {
    Insert,
    Move,
    Remove,
}

#[derive(Clone, Debug)]
struct Entry<P> {
    aabb: Aabb2D,
    payload: P,
    pending: Option<Pending>,
    // Box as of the last commit, for moved/removed damage.
    committed: Option<Aabb2D>,
}

#[derive(Clone, Debug)]
struct Slot<P> {
    generation: u32,
    entry: Option<Entry<P>>,
}

/// An AABB index parameterized by a spatial backend.
///
/// Mutations are staged and only reach the backend on [`commit`](Self::commit),
/// so queries always see the last committed state.
#[derive(Debug)]
pub struct IndexGeneric<P: Copy + Debug, B: Backend> {
    slots: Vec<Slot<P>>,
    free_list: Vec<usize>,
    live: usize,
    backend: B,
}

impl<P: Copy + Debug, B: Backend + Default> IndexGeneric<P, B> {
    /// Create an empty index using the backend's default constructor.
    pub fn new() -> Self {
        Self::with_backend(B::default())
    }
}

impl<P: Copy + Debug, B: Backend> IndexGeneric<P, B> {
    /// Create an empty index using an explicit backend instance.
    pub fn with_backend(backend: B) -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
            backend,
        }
    }

    /// Number of live entries, including staged inserts.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the index holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Insert a new AABB with payload. Returns a stable handle `Key`.
    pub fn insert(&mut self, aabb: Aabb2D, payload: P) -> Key {
        self.live += 1;
        let entry = Some(Entry {
            aabb,
            payload,
            pending: Some(Pending::Insert),
            committed: None,
        });
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx];
            slot.generation = slot.generation.wrapping_add(1);
            slot.entry = entry;
            Key::new(idx, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 1,
                entry,
            });
            Key::new(self.slots.len() - 1, 1)
        }
    }

    /// Update an existing AABB. Stale keys are ignored.
    pub fn update(&mut self, key: Key, aabb: Aabb2D) {
        if let Some(e) = self.entry_mut(key)
            && e.pending != Some(Pending::Remove)
        {
            e.aabb = aabb;
            if e.pending.is_none() {
                e.pending = Some(Pending::Move);
            }
        }
    }

    /// Remove an existing AABB. Stale keys are ignored.
    pub fn remove(&mut self, key: Key) {
        let Some(e) = self.entry_mut(key) else {
            return;
        };
        if e.pending == Some(Pending::Remove) {
            return;
        }
        e.pending = Some(Pending::Remove);
        self.live -= 1;
    }

    /// Apply staged changes to the backend and report what changed.
    pub fn commit(&mut self) -> Damage {
        let mut dmg = Damage::default();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let Some(entry) = slot.entry.as_mut() else {
                continue;
            };
            match entry.pending.take() {
                Some(Pending::Insert) => {
                    self.backend.insert(i, entry.aabb);
                    entry.committed = Some(entry.aabb);
                    dmg.added.push(entry.aabb);
                }
                Some(Pending::Move) => {
                    self.backend.update(i, entry.aabb);
                    if let Some(prev) = entry.committed.replace(entry.aabb)
                        && prev != entry.aabb
                    {
                        dmg.moved.push((prev, entry.aabb));
                    }
                }
                Some(Pending::Remove) => {
                    // Entries removed before their first commit never reached
                    // the backend and produce no damage.
                    if let Some(prev) = entry.committed {
                        self.backend.remove(i);
                        dmg.removed.push(prev);
                    }
                    slot.entry = None;
                    self.free_list.push(i);
                }
                None => {}
            }
        }
        dmg
    }

    /// Visit committed entries whose AABB intersects `rect`.
    ///
    /// Calls `f(key, payload)` for each match. The order is backend-dependent.
    pub fn visit_rect<F: FnMut(Key, P)>(&self, rect: Aabb2D, mut f: F) {
        self.backend.visit_rect(rect, |i| self.emit(i, &mut f));
    }

    /// Collect committed entries whose AABB intersects `rect`.
    pub fn query_rect(&self, rect: Aabb2D) -> impl Iterator<Item = (Key, P)> + '_ {
        let mut out = Vec::new();
        self.visit_rect(rect, |k, p| out.push((k, p)));
        out.into_iter()
    }

    fn emit<F: FnMut(Key, P)>(&self, i: usize, f: &mut F) {
        if let Some(slot) = self.slots.get(i)
            && let Some(e) = &slot.entry
        {
            f(Key::new(i, slot.generation), e.payload);
        }
    }

    fn entry_mut(&mut self, key: Key) -> Option<&mut Entry<P>> {
        let slot = self.slots.get_mut(key.idx())?;
        if slot.generation != key.1 {
            return None;
        }
        slot.entry.as_mut()
    }
}

/// Default index using a flat vector backend.
pub type Index<P> = IndexGeneric<P, FlatVec>;

impl<P: Copy + Debug> Default for Index<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "backend_grid")]
impl<P: Copy + Debug> Index<P> {
    /// Create an index over a uniform grid with the given cell size.
    pub fn with_grid(cell_size: f64) -> IndexGeneric<P, crate::backends::Grid> {
        IndexGeneric::with_backend(crate::backends::Grid::new(cell_size))
    }
}
