// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tapline Layer: tap hit testing for polylines drawn on a map.
//!
//! ## Overview
//!
//! Given a tap on a rendered map, find the polylines within a tolerance of
//! the tap and report them to a hit callback, or call a miss callback. A
//! double tap zooms in around the tapped position.
//!
//! This crate does not draw, animate, or recognize gestures. The host owns
//! the map view and exposes it through the [`Camera`] trait; [`MapCamera`]
//! is a ready-made value-type camera over a [`Crs`].
//!
//! ## Pipeline
//!
//! 1) Origin: the viewport's top-left in absolute pixels,
//!    [`Camera::pixel_origin`], computed once per tap.
//! 2) Projection: every vertex goes through [`project`] into a buffer that
//!    lives for one call. Nothing projected is stored on a polyline.
//! 3) Threshold: [`hit_threshold`] is half the painted width plus half the
//!    border, floored at the pointer tolerance. Widths in meters are turned
//!    into pixels through a geodesic offset at the first vertex.
//! 4) Distance: the closest segment of each polyline, via
//!    [`tapline_precise_hit`].
//! 5) Ties: every polyline at exactly the smallest distance is returned, in
//!    input order, each at most once.
//!
//! With culling enabled, polylines whose geographic bounds miss the visible
//! bounds are dropped before step 2 using [`tapline_index`]. The visible
//! bounds are padded by the largest pick radius, so culling never changes
//! the result of a tap inside the viewport.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use tapline_layer::{
//!     Camera, GeoPoint, MapCamera, Polyline, Simple, TaggedPolyline, TapLayer, TapLayerOptions,
//!     TapPosition,
//! };
//!
//! // Flat map at zoom 0: screen (x, y) shows GeoPoint(-y, x).
//! let center = GeoPoint::new(-50.0, 50.0);
//! let mut camera = MapCamera::new(Simple, center, 0.0, Size::new(100.0, 100.0));
//! let a = Polyline::new(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 40.0)]);
//! let b = Polyline::new(vec![GeoPoint::new(-10.0, 0.0), GeoPoint::new(-10.0, 40.0)]);
//! let mut layer = TapLayer::new(
//!     vec![TaggedPolyline::new(a, 'a'), TaggedPolyline::new(b, 'b')],
//!     TapLayerOptions::default(),
//! )
//! .unwrap();
//!
//! // Equidistant from both lines: both are reported.
//! let tie = layer.on_tap_up(&TapPosition::at(Point::new(20.0, 5.0)), &camera);
//! assert_eq!(tie.indices(), &[0, 1]);
//!
//! // Double tap zooms in by half a level around the tap.
//! layer.on_double_tap_down(&TapPosition::at(Point::new(75.0, 50.0)), &mut camera);
//! assert_eq!(camera.zoom(), 0.5);
//! assert_eq!(camera.center(), GeoPoint::new(-50.0, 75.0));
//! ```
//!
//! ## Logging
//!
//! Hit tests, culling and double-tap zooms emit `tracing` events at `debug`
//! and `trace` level. No subscriber is installed.

mod camera;
mod coords;
mod crs;
mod error;
mod layer;
mod polyline;
mod projector;
mod threshold;

pub use camera::{Camera, MapCamera};
pub use coords::{GeoBounds, GeoPoint};
pub use crs::{Crs, Epsg3857, Simple, TILE_SIZE};
pub use error::LayerError;
pub use hit_test::{HitResult, hit_test, hit_test_indexed};
pub use layer::{
    CullingBackend, OnHit, OnMiss, OnTap, TapLayer, TapLayerOptions, TapPosition,
};
pub use polyline::{Polyline, TaggedPolyline};
pub use projector::{project, screen_to_geo};
pub use threshold::{effective_stroke_width, half_extent, hit_threshold};
