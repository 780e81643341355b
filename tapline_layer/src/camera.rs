// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The camera capability consumed by hit testing, and a plain implementation.

use kurbo::{Point, Size, Vec2};

use crate::coords::{GeoBounds, GeoPoint};
use crate::crs::Crs;

/// What the hit tester needs to know about the map's current view.
///
/// Hosts usually implement this on top of their own map state. The trait is
/// object safe, so `&dyn Camera` works wherever a generic camera does.
pub trait Camera {
    /// Current zoom level.
    fn zoom(&self) -> f64;

    /// Geographic point at the center of the viewport.
    fn center(&self) -> GeoPoint;

    /// Viewport size in pixels.
    fn size(&self) -> Size;

    /// Project a geographic point into absolute pixel space at `zoom`.
    fn project(&self, point: GeoPoint, zoom: f64) -> Point;

    /// Inverse of [`project`](Self::project).
    fn unproject(&self, point: Point, zoom: f64) -> GeoPoint;

    /// Request that the map move to `center` at `zoom`.
    fn move_to(&mut self, center: GeoPoint, zoom: f64);

    /// Absolute pixel position of the viewport's top-left corner.
    ///
    /// Subtracting this from a projected point yields viewport-local pixels.
    fn pixel_origin(&self) -> Point {
        let zoom = self.zoom();
        self.project(self.center(), zoom) - self.size().to_vec2() / 2.0
    }

    /// Geographic bounds of the viewport.
    fn visible_bounds(&self) -> GeoBounds {
        self.visible_bounds_padded(0.0)
    }

    /// Geographic bounds of the viewport grown by `padding` pixels per side.
    fn visible_bounds_padded(&self, padding: f64) -> GeoBounds {
        let zoom = self.zoom();
        let origin = self.pixel_origin();
        let Size { width, height } = self.size();
        let (lo_x, lo_y) = (-padding, -padding);
        let (hi_x, hi_y) = (width + padding, height + padding);
        let corners = [
            Vec2::new(lo_x, lo_y),
            Vec2::new(hi_x, lo_y),
            Vec2::new(lo_x, hi_y),
            Vec2::new(hi_x, hi_y),
        ];
        let bounds = GeoBounds::from_points(corners.map(|c| self.unproject(origin + c, zoom)));
        // Four corners always produce bounds.
        bounds.unwrap_or(GeoBounds {
            south_west: self.center(),
            north_east: self.center(),
        })
    }
}

/// A value-type camera over a [`Crs`].
///
/// This is enough for tests, tools, and hosts that keep their view state as a
/// plain struct. Zoom requests are clamped to the configured limits.
#[derive(Clone, Debug, PartialEq)]
pub struct MapCamera<C: Crs> {
    crs: C,
    center: GeoPoint,
    zoom: f64,
    size: Size,
    min_zoom: f64,
    max_zoom: f64,
}

impl<C: Crs> MapCamera<C> {
    /// Create a camera without zoom limits.
    pub fn new(crs: C, center: GeoPoint, zoom: f64, size: Size) -> Self {
        Self {
            crs,
            center,
            zoom,
            size,
            min_zoom: f64::NEG_INFINITY,
            max_zoom: f64::INFINITY,
        }
    }

    /// Set zoom limits and clamp the current zoom into them.
    ///
    /// The range is normalized so that `min_zoom <= max_zoom`.
    #[must_use]
    pub fn with_zoom_limits(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        let (lo, hi) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        self.min_zoom = lo;
        self.max_zoom = hi;
        self.zoom = self.zoom.clamp(lo, hi);
        self
    }

    /// The coordinate reference system.
    pub fn crs(&self) -> &C {
        &self.crs
    }

    /// Change the viewport size.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }
}

impl<C: Crs> Camera for MapCamera<C> {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn center(&self) -> GeoPoint {
        self.center
    }

    fn size(&self) -> Size {
        self.size
    }

    fn project(&self, point: GeoPoint, zoom: f64) -> Point {
        self.crs.project(point, zoom)
    }

    fn unproject(&self, point: Point, zoom: f64) -> GeoPoint {
        self.crs.unproject(point, zoom)
    }

    fn move_to(&mut self, center: GeoPoint, zoom: f64) {
        self.center = center;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::{Epsg3857, Simple};

    #[test]
    fn pixel_origin_is_top_left() {
        let cam = MapCamera::new(Simple, GeoPoint::new(-50.0, 50.0), 0.0, Size::new(100.0, 80.0));
        assert_eq!(cam.pixel_origin(), Point::new(0.0, 10.0));
    }

    #[test]
    fn visible_bounds_simple() {
        let cam = MapCamera::new(Simple, GeoPoint::new(0.0, 0.0), 1.0, Size::new(100.0, 60.0));
        let b = cam.visible_bounds();
        // 2 px per unit at zoom 1.
        assert_eq!(b.south_west, GeoPoint::new(-15.0, -25.0));
        assert_eq!(b.north_east, GeoPoint::new(15.0, 25.0));

        let padded = cam.visible_bounds_padded(10.0);
        assert_eq!(padded.south_west, GeoPoint::new(-20.0, -30.0));
        assert_eq!(padded.north_east, GeoPoint::new(20.0, 30.0));
    }

    #[test]
    fn visible_bounds_mercator_contains_center() {
        let center = GeoPoint::new(48.1486, 17.1077);
        let cam = MapCamera::new(Epsg3857, center, 12.0, Size::new(800.0, 600.0));
        let b = cam.visible_bounds();
        assert!(b.contains(center));
        assert!(b.north_east.lat > center.lat && b.south_west.lat < center.lat);
    }

    #[test]
    fn move_to_clamps_zoom() {
        let mut cam = MapCamera::new(Epsg3857, GeoPoint::default(), 3.0, Size::new(10.0, 10.0))
            .with_zoom_limits(18.0, 2.0);
        assert_eq!(cam.zoom(), 3.0);
        cam.move_to(GeoPoint::new(1.0, 2.0), 25.0);
        assert_eq!(cam.zoom(), 18.0);
        assert_eq!(cam.center(), GeoPoint::new(1.0, 2.0));
        cam.move_to(GeoPoint::new(1.0, 2.0), -1.0);
        assert_eq!(cam.zoom(), 2.0);
    }
}
