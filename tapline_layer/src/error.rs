// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Configuration rejected by a [`TapLayer`](crate::TapLayer).
///
/// Hit testing itself cannot fail; only the values fed into the layer are
/// checked.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LayerError {
    /// Pointer distance tolerance is negative, NaN or infinite.
    #[error("pointer distance tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),
    /// A polyline's stroke or border width is negative, NaN or infinite.
    #[error("polyline {index} has an invalid stroke width {width}")]
    InvalidStrokeWidth {
        /// Position of the offending polyline.
        index: usize,
        /// The rejected width.
        width: f64,
    },
    /// Grid culling cell size is not strictly positive and finite.
    #[error("culling grid cell size must be finite and positive, got {0}")]
    InvalidCellSize(f64),
    /// Double-tap zoom delta is NaN or infinite.
    #[error("double-tap zoom delta must be finite, got {0}")]
    InvalidZoomDelta(f64),
}

pub(crate) fn check_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
