// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-polyline pick radius.

use geo::{Destination, Haversine};
use kurbo::Point;

use crate::camera::Camera;
use crate::coords::GeoPoint;
use crate::polyline::Polyline;
use crate::projector::project;

/// Bearing of the geodesic offset used to measure meter widths: due south.
const MEASURE_BEARING: f64 = 180.0;

/// Stroke width of `line` in viewport pixels at the camera's current zoom.
///
/// Pixel widths are returned unchanged. Meter widths are measured at the
/// first vertex as the screen distance to the point `stroke_width` meters
/// south of it, so they grow with zoom and vary with latitude.
pub fn effective_stroke_width<C: Camera + ?Sized>(
    line: &Polyline,
    origin: Point,
    camera: &C,
) -> f64 {
    if !line.use_stroke_width_in_meter {
        return line.stroke_width;
    }
    let Some(&anchor) = line.points.first() else {
        return line.stroke_width;
    };
    let offset: GeoPoint = Haversine
        .destination(anchor.into(), MEASURE_BEARING, line.stroke_width)
        .into();
    let a = project(origin, anchor, camera);
    let b = project(origin, offset, camera);
    a.distance(b)
}

/// Half of the painted extent: stroke plus border, halved.
pub fn half_extent(effective_width: f64, border_stroke_width: f64) -> f64 {
    effective_width / 2.0 + border_stroke_width / 2.0
}

/// Pick radius for `line`: the painted half extent, but never less than
/// `tolerance`.
pub fn hit_threshold<C: Camera + ?Sized>(
    line: &Polyline,
    origin: Point,
    camera: &C,
    tolerance: f64,
) -> f64 {
    let width = effective_stroke_width(line, origin, camera);
    half_extent(width, line.border_stroke_width).max(tolerance)
}
