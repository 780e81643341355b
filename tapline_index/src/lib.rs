// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tapline Index: a broad-phase 2D AABB index.
//!
//! Hit testing every polyline on every tap is linear in the total vertex
//! count. When most lines are off screen, a cheap bounding-box pass removes
//! them before any projection happens. This crate is that pass:
//!
//! - Insert, update, and remove axis-aligned bounding boxes (AABBs) with user payloads.
//! - Query by intersecting rectangle.
//! - Batch updates with [`Index::commit`] and receive coarse [`Damage`]
//!   (added/removed/moved boxes).
//!
//! Coordinates are plain `f64` and carry no unit. `tapline_layer` stores
//! polyline bounds in degrees (x = longitude, y = latitude) and queries them
//! with the camera's visible bounds.
//!
//! ## Features
//!
//! - `backend_grid` *(default)*: enables a uniform grid backend backed by
//!   `hashbrown` and `smallvec`.
//!
//! # Example
//!
//! ```rust
//! use tapline_index::{Aabb2D, Index};
//!
//! let mut idx: Index<usize> = Index::new();
//! let k = idx.insert(Aabb2D::new(16.9, 48.1, 17.2, 48.2), 0);
//! idx.insert(Aabb2D::new(-0.2, 51.4, 0.1, 51.6), 1);
//! let damage = idx.commit();
//! assert_eq!(damage.added.len(), 2);
//!
//! let visible = Aabb2D::new(16.0, 47.5, 18.0, 48.5);
//! let hits: Vec<_> = idx.query_rect(visible).map(|(_, p)| p).collect();
//! assert_eq!(hits, [0]);
//!
//! idx.remove(k);
//! let _ = idx.commit();
//! assert_eq!(idx.query_rect(visible).count(), 0);
//! ```
//!
//! With the `backend_grid` feature enabled (default), a uniform grid can
//! replace the flat vector:
//!
//! ```rust
//! # #[cfg(feature = "backend_grid")]
//! # {
//! use tapline_index::{Aabb2D, Index};
//!
//! // One-degree cells.
//! let mut idx = Index::<usize>::with_grid(1.0);
//! idx.insert(Aabb2D::new(16.9, 48.1, 17.2, 48.2), 0);
//! let _ = idx.commit();
//! assert_eq!(idx.query_rect(Aabb2D::new(17.0, 48.0, 17.1, 48.15)).count(), 1);
//! # }
//! ```
//!
//! ## Choosing a backend
//!
//! - `FlatVec` (default): linear scans in insertion-slot order. Good for the
//!   tens-to-hundreds of lines a typical overlay carries.
//! - `Grid` *(feature `backend_grid`)*: uniform grid; better once thousands
//!   of lines spread over a large area. Query order is unspecified. Very
//!   large boxes and very large queries fall back to scanning, so a poorly
//!   chosen cell size costs speed, never a stall.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs in coordinates.

#![no_std]

extern crate alloc;

mod backend;
pub mod backends;
mod damage;
mod index;
mod types;

pub use backend::Backend;
pub use damage::Damage;
pub use index::{Index, IndexGeneric, Key};
pub use types::Aabb2D;
