// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroked polylines for precise hit testing.
//!
//! A [`StrokedPolyline`] borrows a vertex buffer that the caller projected
//! for the current query. It never owns or caches projected vertices, so a
//! camera move between two queries cannot leave stale geometry behind.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, Point};

use crate::{HitParams, HitScore, PreciseHitTest, segment_distance_sq};

/// An open polyline (centerline vertices + half-width) in local coordinates.
///
/// Joins and caps are not modelled: the pick region is the union of the
/// capsules around each segment. A polyline with fewer than two vertices has
/// no segments and never hits.
#[derive(Clone, Copy, Debug)]
pub struct StrokedPolyline<'a> {
    /// Centerline vertices in local coordinates.
    pub points: &'a [Point],
    /// Half of the stroke width in local units.
    pub half_width: f64,
}

impl<'a> StrokedPolyline<'a> {
    /// Create a stroked polyline over `points`.
    pub const fn new(points: &'a [Point], half_width: f64) -> Self {
        Self { points, half_width }
    }

    /// Iterate the segments of the polyline in order.
    pub fn segments(&self) -> impl Iterator<Item = Line> + 'a {
        let points: &'a [Point] = self.points;
        points.windows(2).map(|w| Line::new(w[0], w[1]))
    }

    /// Closest segment to `pt`, regardless of any tolerance.
    ///
    /// When several segments are equally close the first one wins.
    pub fn nearest(&self, pt: Point) -> Option<HitScore> {
        let mut best: Option<(f64, usize)> = None;
        for (segment, line) in self.segments().enumerate() {
            let d2 = segment_distance_sq(pt, line);
            if best.is_none_or(|(b, _)| d2 < b) {
                best = Some((d2, segment));
            }
        }
        best.map(|(d2, segment)| HitScore {
            distance: d2.sqrt(),
            segment,
        })
    }
}

impl PreciseHitTest for StrokedPolyline<'_> {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let limit = self.half_width.max(params.stroke_tolerance);
        self.nearest(pt).filter(|score| score.distance <= limit)
    }
}
