// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate reference systems.
//!
//! A [`Crs`] maps geographic coordinates onto an unscaled plane and defines
//! how that plane grows with zoom. [`MapCamera`](crate::MapCamera) combines a
//! CRS with a center, zoom and viewport size.

use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use kurbo::Point;

use crate::coords::GeoPoint;

/// Pixel size of one tile at zoom 0 in the slippy-map tiling scheme.
pub const TILE_SIZE: f64 = 256.0;

/// A coordinate reference system: geographic ↔ pixel space at a zoom level.
pub trait Crs {
    /// Project onto the zoom-independent plane.
    fn project_unscaled(&self, point: GeoPoint) -> Point;

    /// Inverse of [`project_unscaled`](Self::project_unscaled).
    fn unproject_unscaled(&self, point: Point) -> GeoPoint;

    /// Pixels per plane unit at `zoom`.
    fn scale(&self, zoom: f64) -> f64 {
        TILE_SIZE * zoom.exp2()
    }

    /// Project to pixel space at `zoom`.
    fn project(&self, point: GeoPoint, zoom: f64) -> Point {
        let p = self.project_unscaled(point);
        let s = self.scale(zoom);
        Point::new(p.x * s, p.y * s)
    }

    /// Unproject from pixel space at `zoom`.
    fn unproject(&self, point: Point, zoom: f64) -> GeoPoint {
        let s = self.scale(zoom);
        self.unproject_unscaled(Point::new(point.x / s, point.y / s))
    }
}

/// Spherical Web Mercator (EPSG:3857), the CRS of nearly every tiled web map.
///
/// The unscaled plane is the unit square with (0, 0) at the north-west corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Epsg3857;

impl Epsg3857 {
    /// Latitude beyond which the projection is cut off, in degrees.
    pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;
}

impl Crs for Epsg3857 {
    fn project_unscaled(&self, point: GeoPoint) -> Point {
        let lat = point
            .lat
            .clamp(-Self::MAX_LATITUDE, Self::MAX_LATITUDE)
            .to_radians();
        let x = 0.5 + point.lng / 360.0;
        let y = 0.5 - (FRAC_PI_4 + lat / 2.0).tan().ln() / TAU;
        Point::new(x, y)
    }

    fn unproject_unscaled(&self, point: Point) -> GeoPoint {
        let lng = (point.x - 0.5) * 360.0;
        let lat = 2.0 * ((0.5 - point.y) * TAU).exp().atan() - FRAC_PI_2;
        GeoPoint::new(lat.to_degrees(), lng)
    }
}

/// Flat CRS for non-geographic maps (floor plans, game worlds, images).
///
/// `x = lng`, `y = -lat`, and one unit is one pixel at zoom 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Simple;

impl Crs for Simple {
    fn project_unscaled(&self, point: GeoPoint) -> Point {
        Point::new(point.lng, -point.lat)
    }

    fn unproject_unscaled(&self, point: Point) -> GeoPoint {
        GeoPoint::new(-point.y, point.x)
    }

    fn scale(&self, zoom: f64) -> f64 {
        zoom.exp2()
    }
}
