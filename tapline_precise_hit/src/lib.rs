// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Narrow-phase stroke hit testing.
//!
//! This crate answers "how far is this screen point from that stroked line,
//! and does it count as a hit?" in plain 2D pixel space, built on top of
//! [`kurbo`]. It knows nothing about maps, projections or callbacks; the
//! `tapline_layer` crate projects geographic polylines into screen space and
//! feeds the resulting vertices here.
//!
//! # Typical usage
//!
//! - Project your polyline into the same space as the query point.
//! - Wrap the vertices in a [`stroke::StrokedPolyline`] together with the
//!   stroke's half-width.
//! - Call [`PreciseHitTest::hit_test_local`] and rank the returned
//!   [`HitScore`]s by distance.
//!
//! # Key types
//!
//! - [`HitParams`] – per-query parameters. The stroke tolerance acts as a
//!   *minimum* pick radius, so thin lines stay tappable.
//! - [`HitScore`] – `{ distance, segment }` for the closest segment of a hit.
//! - [`PreciseHitTest`] – a trait implemented by shapes that can answer
//!   “does this local-space point hit me?” queries.
//!
//! ```
//! use kurbo::Point;
//! use tapline_precise_hit::stroke::StrokedPolyline;
//! use tapline_precise_hit::{HitParams, PreciseHitTest};
//!
//! let pts = [Point::new(0.0, 0.0), Point::new(0.0, 10.0)];
//! let line = StrokedPolyline::new(&pts, 0.5);
//! let params = HitParams { stroke_tolerance: 2.0 };
//!
//! let score = line.hit_test_local(Point::new(1.0, 5.0), &params).unwrap();
//! assert_eq!(score.distance, 1.0);
//! assert!(line.hit_test_local(Point::new(5.0, 5.0), &params).is_none());
//! ```

#![no_std]

use kurbo::{Line, Point};

pub mod stroke;

/// Parameters controlling precise stroke hit tests.
#[derive(Clone, Copy, Debug)]
pub struct HitParams {
    /// Minimum pick radius in local units for stroked outlines.
    ///
    /// A stroke is hit when the query point is within
    /// `max(half_width, stroke_tolerance)` of its centerline. Touch input
    /// usually wants this well above the rendered width of thin lines.
    pub stroke_tolerance: f64,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            stroke_tolerance: 0.0,
        }
    }
}

/// Score returned from a precise hit.
///
/// Lower distance is considered a better (closer) hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitScore {
    /// Distance from the query point to the stroke centerline, in local units.
    pub distance: f64,
    /// Index of the segment (its start vertex) that produced `distance`.
    pub segment: usize,
}

/// Trait for precise 2D hit testing in local coordinates.
///
/// Implementors should treat the tolerance in [`HitParams`] as an inclusive
/// radius.
pub trait PreciseHitTest {
    /// Perform a precise hit test against `pt` in the shape's local
    /// coordinate space.
    ///
    /// Returns `Some(HitScore)` when the point is considered a hit.
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore>;
}

/// Squared distance from `pt` to the closed segment `segment`.
///
/// The segment is parametrized as `p0 + t * (p1 - p0)` and the projection
/// parameter `t` of `pt` decides which feature is closest:
///
/// - degenerate segment (`p0 == p1`): `p0`,
/// - `t > 1`: `p1`,
/// - `0 < t <= 1`: the projected point,
/// - `t <= 0`: `p0`.
///
/// The result stays squared; take the root once before comparing against a
/// linear threshold.
pub fn segment_distance_sq(pt: Point, segment: Line) -> f64 {
    let Line { p0, p1 } = segment;
    let d = p1 - p0;
    let len2 = d.hypot2();
    if len2 == 0.0 {
        return (pt - p0).hypot2();
    }
    let t = (pt - p0).dot(d) / len2;
    if t > 1.0 {
        (pt - p1).hypot2()
    } else if t > 0.0 {
        (pt - (p0 + d * t)).hypot2()
    } else {
        (pt - p0).hypot2()
    }
}
