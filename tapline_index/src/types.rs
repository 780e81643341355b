// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding boxes.

/// Axis-aligned bounding box in 2D.
///
/// Edges are inclusive, and a box may be degenerate (zero width or height):
/// the bounds of a perfectly horizontal polyline are still a valid box that
/// overlaps anything crossing its line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2D {
    /// Minimum x (left)
    pub min_x: f64,
    /// Minimum y (top)
    pub min_y: f64,
    /// Maximum x (right)
    pub max_x: f64,
    /// Maximum y (bottom)
    pub max_y: f64,
}

impl Aabb2D {
    /// Create a new AABB from min/max corners.
    #[inline(always)]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The smallest AABB containing every point, or `None` for an empty input.
    pub fn from_points<I: IntoIterator<Item = (f64, f64)>>(points: I) -> Option<Self> {
        let mut it = points.into_iter();
        let (x, y) = it.next()?;
        let mut out = Self::new(x, y, x, y);
        for (x, y) in it {
            out.min_x = out.min_x.min(x);
            out.min_y = out.min_y.min(y);
            out.max_x = out.max_x.max(x);
            out.max_y = out.max_y.max(y);
        }
        Some(out)
    }

    /// Whether this AABB touches another one. Shared edges count as overlap.
    ///
    /// ```
    /// use tapline_index::Aabb2D;
    ///
    /// let a = Aabb2D::new(0.0, 0.0, 10.0, 10.0);
    /// assert!(a.overlaps(&Aabb2D::new(10.0, 0.0, 20.0, 10.0)));
    /// assert!(!a.overlaps(&Aabb2D::new(11.0, 0.0, 20.0, 10.0)));
    /// // Degenerate boxes still overlap what they cross.
    /// assert!(a.overlaps(&Aabb2D::new(-5.0, 3.0, 5.0, 3.0)));
    /// ```
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }
}
