// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geographic ↔ viewport pixel conversions for a single camera state.

use kurbo::{Point, Vec2};

use crate::camera::Camera;
use crate::coords::GeoPoint;

/// Project `point` into viewport-local pixels.
///
/// `origin` is [`Camera::pixel_origin`]; compute it once per query and pass
/// it to every call.
pub fn project<C: Camera + ?Sized>(origin: Point, point: GeoPoint, camera: &C) -> Point {
    let p = camera.project(point, camera.zoom());
    Point::new(p.x - origin.x, p.y - origin.y)
}

/// Geographic position under a viewport-local `offset`.
///
/// `width` and `height` are the size of the surface the offset was measured
/// on, which is normally the camera's viewport.
pub fn screen_to_geo<C: Camera + ?Sized>(
    offset: Point,
    width: f64,
    height: f64,
    camera: &C,
) -> GeoPoint {
    let zoom = camera.zoom();
    let from_center = Vec2::new(width / 2.0 - offset.x, height / 2.0 - offset.y);
    let center = camera.project(camera.center(), zoom);
    camera.unproject(center - from_center, zoom)
}
