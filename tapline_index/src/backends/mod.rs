// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different spatial strategies.
//!
//! - `flatvec`: flat vector with linear scans (small, simple, the default).
//! - `grid` (feature `backend_grid`): uniform grid with configurable cell size.

pub(crate) mod flatvec;
#[cfg(feature = "backend_grid")]
pub(crate) mod grid;

pub use flatvec::FlatVec;
#[cfg(feature = "backend_grid")]
pub use grid::Grid;
