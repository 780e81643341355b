// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tap layer: polylines, configuration, and gesture entry points.
//!
//! ## Overview
//!
//! [`TapLayer`] sits between a gesture recognizer and the hit tester. The
//! host forwards recognized taps and double taps together with its
//! [`Camera`]; the layer answers with callbacks.
//!
//! - [`TapLayer::on_tap_up`] reports the tap's geographic position to the
//!   host hook, runs the hit test, then calls exactly one of the hit or miss
//!   callbacks.
//! - [`TapLayer::on_double_tap_down`] zooms in around the tapped position.
//!
//! ## Culling
//!
//! With [`TapLayerOptions::polyline_culling`] set, polylines whose bounds do
//! not touch the camera's visible bounds are skipped before projection. The
//! visible bounds are padded by the largest pick radius of any polyline, so a
//! line whose centerline is off screen but whose painted edge or tolerance
//! reaches the viewport stays tappable. Meter widths are converted at the
//! current zoom on every query. The bounds live in a [`tapline_index`] index
//! that is kept in sync with the polyline set.

use core::fmt;

use kurbo::Point;
use tapline_index::backends::{FlatVec, Grid};
use tapline_index::{Backend, IndexGeneric, Key};
use tracing::debug;

use crate::camera::Camera;
use crate::coords::GeoPoint;
use crate::error::{LayerError, check_non_negative};
use crate::hit_test::{HitResult, hit_test_indexed};
use crate::polyline::TaggedPolyline;
use crate::projector::screen_to_geo;
use crate::threshold::{half_extent, hit_threshold};

/// Where a tap landed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TapPosition {
    /// Position relative to the map surface, in pixels.
    pub local: Point,
    /// Position relative to the window, in pixels.
    pub global: Point,
}

impl TapPosition {
    /// A tap at `local`, with the same global position.
    pub fn at(local: Point) -> Self {
        Self {
            local,
            global: local,
        }
    }
}

/// Called with every polyline at the smallest distance to a tap.
pub type OnHit<T> = Box<dyn FnMut(&[&TaggedPolyline<T>], &TapPosition)>;

/// Called when a tap matches no polyline.
pub type OnMiss = Box<dyn FnMut(&TapPosition)>;

/// Called for every tap with its geographic position, before hit testing.
pub type OnTap = Box<dyn FnMut(&TapPosition, GeoPoint)>;

/// Spatial structure used for culling.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum CullingBackend {
    /// Linear scan over every polyline's bounds.
    #[default]
    Flat,
    /// Uniform grid with square cells, sized in degrees.
    Grid {
        /// Cell edge length in degrees.
        cell_size: f64,
    },
}

/// Layer configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapLayerOptions {
    /// Minimum pick radius in pixels, however thin a line is drawn.
    pub pointer_distance_tolerance: f64,
    /// Skip polylines outside the visible bounds before hit testing.
    pub polyline_culling: bool,
    /// Index used when culling.
    pub culling_backend: CullingBackend,
    /// Zoom levels added by a double tap.
    pub double_tap_zoom_delta: f64,
}

impl Default for TapLayerOptions {
    fn default() -> Self {
        Self {
            pointer_distance_tolerance: 15.0,
            polyline_culling: false,
            culling_backend: CullingBackend::Flat,
            double_tap_zoom_delta: 0.5,
        }
    }
}

impl TapLayerOptions {
    /// Check every field.
    pub fn validate(&self) -> Result<(), LayerError> {
        if !check_non_negative(self.pointer_distance_tolerance) {
            return Err(LayerError::InvalidTolerance(
                self.pointer_distance_tolerance,
            ));
        }
        if let CullingBackend::Grid { cell_size } = self.culling_backend
            && !(cell_size.is_finite() && cell_size > 0.0)
        {
            return Err(LayerError::InvalidCellSize(cell_size));
        }
        if !self.double_tap_zoom_delta.is_finite() {
            return Err(LayerError::InvalidZoomDelta(self.double_tap_zoom_delta));
        }
        Ok(())
    }
}

/// Polyline bounds kept in a broad-phase index.
///
/// `keys[i]` is the entry for polyline `i`, or `None` when it has no
/// vertices. Payloads are polyline positions.
#[derive(Debug)]
struct Culler<B: Backend> {
    index: IndexGeneric<usize, B>,
    keys: Vec<Option<Key>>,
    /// Largest half extent among indexed lines with pixel widths.
    pixel_extent: f64,
    /// Indexed lines with meter widths; their extent depends on the zoom.
    meter_lines: Vec<usize>,
}

impl<B: Backend> Culler<B> {
    fn new(backend: B) -> Self {
        Self {
            index: IndexGeneric::with_backend(backend),
            keys: Vec::new(),
            pixel_extent: 0.0,
            meter_lines: Vec::new(),
        }
    }

    /// Bring the index in line with `polylines`, reusing entries by position.
    fn sync<T>(&mut self, polylines: &[TaggedPolyline<T>]) {
        self.pixel_extent = 0.0;
        self.meter_lines.clear();
        for (i, p) in polylines.iter().enumerate() {
            let bounds = p.line.bounds().map(|b| b.to_aabb());
            if bounds.is_some() {
                if p.line.use_stroke_width_in_meter {
                    self.meter_lines.push(i);
                } else {
                    let extent = half_extent(p.line.stroke_width, p.line.border_stroke_width);
                    self.pixel_extent = self.pixel_extent.max(extent);
                }
            }
            let key = self.keys.get(i).copied().flatten();
            let next = match (key, bounds) {
                (Some(k), Some(aabb)) => {
                    self.index.update(k, aabb);
                    Some(k)
                }
                (Some(k), None) => {
                    self.index.remove(k);
                    None
                }
                (None, Some(aabb)) => Some(self.index.insert(aabb, i)),
                (None, None) => None,
            };
            if i < self.keys.len() {
                self.keys[i] = next;
            } else {
                self.keys.push(next);
            }
        }
        for k in self.keys.drain(polylines.len()..).flatten() {
            self.index.remove(k);
        }
        let damage = self.index.commit();
        debug!(
            changes = damage.len(),
            added = damage.added.len(),
            removed = damage.removed.len(),
            moved = damage.moved.len(),
            meter_lines = self.meter_lines.len(),
            "culling index synced"
        );
    }

    /// Pixels to grow the viewport by: the largest pick radius of any indexed
    /// line at the camera's current zoom.
    fn padding<T, C: Camera + ?Sized>(
        &self,
        polylines: &[TaggedPolyline<T>],
        camera: &C,
        tolerance: f64,
    ) -> f64 {
        let origin = camera.pixel_origin();
        self.meter_lines
            .iter()
            .filter_map(|&i| polylines.get(i))
            .map(|p| hit_threshold(&p.line, origin, camera, tolerance))
            .fold(self.pixel_extent.max(tolerance), f64::max)
    }

    fn candidates<T, C: Camera + ?Sized>(
        &self,
        polylines: &[TaggedPolyline<T>],
        camera: &C,
        tolerance: f64,
    ) -> Vec<usize> {
        let padding = self.padding(polylines, camera, tolerance);
        let visible = camera.visible_bounds_padded(padding).to_aabb();
        let mut out: Vec<usize> = self.index.query_rect(visible).map(|(_, i)| i).collect();
        out.sort_unstable();
        out
    }
}

#[derive(Debug)]
enum CullIndex {
    Flat(Culler<FlatVec>),
    Grid(Culler<Grid>),
}

impl CullIndex {
    fn new(backend: CullingBackend) -> Self {
        match backend {
            CullingBackend::Flat => Self::Flat(Culler::new(FlatVec::default())),
            CullingBackend::Grid { cell_size } => Self::Grid(Culler::new(Grid::new(cell_size))),
        }
    }

    fn sync<T>(&mut self, polylines: &[TaggedPolyline<T>]) {
        match self {
            Self::Flat(c) => c.sync(polylines),
            Self::Grid(c) => c.sync(polylines),
        }
    }

    fn candidates<T, C: Camera + ?Sized>(
        &self,
        polylines: &[TaggedPolyline<T>],
        camera: &C,
        tolerance: f64,
    ) -> Vec<usize> {
        match self {
            Self::Flat(c) => c.candidates(polylines, camera, tolerance),
            Self::Grid(c) => c.candidates(polylines, camera, tolerance),
        }
    }
}

/// Tap handling for a set of polylines drawn on a map.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use kurbo::{Point, Size};
/// use tapline_layer::{
///     GeoPoint, MapCamera, Polyline, Simple, TaggedPolyline, TapLayer, TapLayerOptions,
///     TapPosition,
/// };
///
/// let camera = MapCamera::new(Simple, GeoPoint::new(-50.0, 50.0), 0.0, Size::new(100.0, 100.0));
/// let road = Polyline::new(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(-10.0, 0.0)]);
///
/// let tapped = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&tapped);
/// let lines = vec![TaggedPolyline::new(road, "road")];
/// let mut layer = TapLayer::new(lines, TapLayerOptions::default())
///     .unwrap()
///     .with_on_hit(move |lines, _tap| {
///         sink.borrow_mut().extend(lines.iter().filter_map(|l| l.tag));
///     });
///
/// let result = layer.on_tap_up(&TapPosition::at(Point::new(3.0, 5.0)), &camera);
/// assert!(result.is_hit());
/// assert_eq!(*tapped.borrow(), ["road"]);
/// ```
pub struct TapLayer<T> {
    polylines: Vec<TaggedPolyline<T>>,
    options: TapLayerOptions,
    culler: Option<CullIndex>,
    on_hit: Option<OnHit<T>>,
    on_miss: Option<OnMiss>,
    on_tap: Option<OnTap>,
}

impl<T: fmt::Debug> fmt::Debug for TapLayer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TapLayer")
            .field("polylines", &self.polylines)
            .field("options", &self.options)
            .field("culler", &self.culler)
            .field("on_hit", &self.on_hit.is_some())
            .field("on_miss", &self.on_miss.is_some())
            .field("on_tap", &self.on_tap.is_some())
            .finish()
    }
}

impl<T> TapLayer<T> {
    /// Create a layer over `polylines`.
    ///
    /// Fails when the options or any polyline's widths are invalid.
    pub fn new(
        polylines: Vec<TaggedPolyline<T>>,
        options: TapLayerOptions,
    ) -> Result<Self, LayerError> {
        options.validate()?;
        validate_polylines(&polylines)?;
        let mut layer = Self {
            polylines,
            options,
            culler: None,
            on_hit: None,
            on_miss: None,
            on_tap: None,
        };
        layer.rebuild_culler();
        Ok(layer)
    }

    /// Set the hit callback.
    #[must_use]
    pub fn with_on_hit(
        mut self,
        f: impl FnMut(&[&TaggedPolyline<T>], &TapPosition) + 'static,
    ) -> Self {
        self.on_hit = Some(Box::new(f));
        self
    }

    /// Set the miss callback.
    #[must_use]
    pub fn with_on_miss(mut self, f: impl FnMut(&TapPosition) + 'static) -> Self {
        self.on_miss = Some(Box::new(f));
        self
    }

    /// Set the host hook that sees every tap.
    #[must_use]
    pub fn with_on_tap(mut self, f: impl FnMut(&TapPosition, GeoPoint) + 'static) -> Self {
        self.on_tap = Some(Box::new(f));
        self
    }

    /// The polylines, in hit-test order.
    pub fn polylines(&self) -> &[TaggedPolyline<T>] {
        &self.polylines
    }

    /// Current configuration.
    pub fn options(&self) -> &TapLayerOptions {
        &self.options
    }

    /// Replace every polyline.
    ///
    /// On error the layer keeps its previous polylines.
    pub fn set_polylines(&mut self, polylines: Vec<TaggedPolyline<T>>) -> Result<(), LayerError> {
        validate_polylines(&polylines)?;
        self.polylines = polylines;
        if let Some(culler) = &mut self.culler {
            culler.sync(&self.polylines);
        }
        Ok(())
    }

    /// Replace the polyline at `index`, returning the old one.
    ///
    /// Returns `Ok(None)` and leaves the layer untouched when `index` is out of
    /// range.
    pub fn replace_polyline(
        &mut self,
        index: usize,
        polyline: TaggedPolyline<T>,
    ) -> Result<Option<TaggedPolyline<T>>, LayerError> {
        polyline.line.validate(index)?;
        let Some(slot) = self.polylines.get_mut(index) else {
            return Ok(None);
        };
        let old = core::mem::replace(slot, polyline);
        if let Some(culler) = &mut self.culler {
            culler.sync(&self.polylines);
        }
        Ok(Some(old))
    }

    /// Change the minimum pick radius.
    pub fn set_pointer_distance_tolerance(&mut self, tolerance: f64) -> Result<(), LayerError> {
        if !check_non_negative(tolerance) {
            return Err(LayerError::InvalidTolerance(tolerance));
        }
        self.options.pointer_distance_tolerance = tolerance;
        Ok(())
    }

    /// Turn culling on or off.
    pub fn set_polyline_culling(&mut self, enabled: bool) {
        if self.options.polyline_culling != enabled {
            self.options.polyline_culling = enabled;
            self.rebuild_culler();
        }
    }

    /// Replace the whole configuration.
    pub fn set_options(&mut self, options: TapLayerOptions) -> Result<(), LayerError> {
        options.validate()?;
        let rebuild = options.polyline_culling != self.options.polyline_culling
            || options.culling_backend != self.options.culling_backend;
        self.options = options;
        if rebuild {
            self.rebuild_culler();
        }
        Ok(())
    }

    /// Positions of the polylines that reach the narrow phase, ascending.
    ///
    /// Without culling this is every position.
    pub fn visible_polylines<C: Camera + ?Sized>(&self, camera: &C) -> Vec<usize> {
        let tolerance = self.options.pointer_distance_tolerance;
        match &self.culler {
            Some(culler) => culler.candidates(&self.polylines, camera, tolerance),
            None => (0..self.polylines.len()).collect(),
        }
    }

    /// Hit test `point` (map-local pixels) without invoking callbacks.
    pub fn hit_test<C: Camera + ?Sized>(&self, point: Point, camera: &C) -> HitResult {
        let tolerance = self.options.pointer_distance_tolerance;
        match &self.culler {
            Some(culler) => {
                let candidates = culler.candidates(&self.polylines, camera, tolerance);
                debug!(
                    total = self.polylines.len(),
                    visible = candidates.len(),
                    "culled polylines"
                );
                let lines = candidates.into_iter().map(|i| (i, &self.polylines[i].line));
                hit_test_indexed(point, lines, camera, tolerance)
            }
            None => {
                let lines = self.polylines.iter().map(|p| &p.line).enumerate();
                hit_test_indexed(point, lines, camera, tolerance)
            }
        }
    }

    /// Handle a completed single tap.
    ///
    /// The host hook runs first with the tap's geographic position, then
    /// exactly one of the hit or miss callbacks.
    pub fn on_tap_up<C: Camera + ?Sized>(&mut self, tap: &TapPosition, camera: &C) -> HitResult {
        if let Some(on_tap) = self.on_tap.as_mut() {
            let size = camera.size();
            let geo = screen_to_geo(tap.local, size.width, size.height, camera);
            on_tap(tap, geo);
        }

        let result = self.hit_test(tap.local, camera);
        match &result {
            HitResult::Hit { indices, .. } => {
                if let Some(on_hit) = self.on_hit.as_mut() {
                    let matched: Vec<&TaggedPolyline<T>> =
                        indices.iter().map(|&i| &self.polylines[i]).collect();
                    on_hit(&matched, tap);
                }
            }
            HitResult::Miss => {
                if let Some(on_miss) = self.on_miss.as_mut() {
                    on_miss(tap);
                }
            }
        }
        result
    }

    /// Handle the down event of a double tap: zoom in around the tap.
    ///
    /// Returns the new map center.
    pub fn on_double_tap_down<C: Camera + ?Sized>(
        &self,
        tap: &TapPosition,
        camera: &mut C,
    ) -> GeoPoint {
        let size = camera.size();
        let center = screen_to_geo(tap.local, size.width, size.height, camera);
        let zoom = camera.zoom() + self.options.double_tap_zoom_delta;
        debug!(lat = center.lat, lng = center.lng, zoom, "double tap zoom");
        camera.move_to(center, zoom);
        center
    }

    fn rebuild_culler(&mut self) {
        self.culler = self.options.polyline_culling.then(|| {
            let mut culler = CullIndex::new(self.options.culling_backend);
            culler.sync(&self.polylines);
            culler
        });
    }
}

fn validate_polylines<T>(polylines: &[TaggedPolyline<T>]) -> Result<(), LayerError> {
    polylines
        .iter()
        .enumerate()
        .try_for_each(|(i, p)| p.line.validate(i))
}
