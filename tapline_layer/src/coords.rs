// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geographic coordinates and bounds.

use tapline_index::Aabb2D;

/// A geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoPoint {
    /// Latitude, positive north.
    pub lat: f64,
    /// Longitude, positive east.
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude in degrees.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Self::new(p.lng, p.lat)
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    fn from(p: geo::Point<f64>) -> Self {
        Self::new(p.y(), p.x())
    }
}

/// A latitude/longitude rectangle.
///
/// Bounds never wrap the antimeridian: `south_west.lng <= north_east.lng`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    /// Corner with the smallest latitude and longitude.
    pub south_west: GeoPoint,
    /// Corner with the largest latitude and longitude.
    pub north_east: GeoPoint,
}

impl GeoBounds {
    /// The smallest bounds containing every point, or `None` when empty.
    pub fn from_points<I: IntoIterator<Item = GeoPoint>>(points: I) -> Option<Self> {
        Aabb2D::from_points(points.into_iter().map(|p| (p.lng, p.lat))).map(Self::from_aabb)
    }

    /// Whether `point` lies inside or on the edge of the bounds.
    pub fn contains(&self, point: GeoPoint) -> bool {
        let (sw, ne) = (self.south_west, self.north_east);
        (sw.lat..=ne.lat).contains(&point.lat) && (sw.lng..=ne.lng).contains(&point.lng)
    }

    /// Index box with x = longitude, y = latitude.
    pub fn to_aabb(&self) -> Aabb2D {
        Aabb2D::new(
            self.south_west.lng,
            self.south_west.lat,
            self.north_east.lng,
            self.north_east.lat,
        )
    }

    /// Inverse of [`to_aabb`](Self::to_aabb).
    pub fn from_aabb(aabb: Aabb2D) -> Self {
        Self {
            south_west: GeoPoint::new(aabb.min_y, aabb.min_x),
            north_east: GeoPoint::new(aabb.max_y, aabb.max_x),
        }
    }
}
