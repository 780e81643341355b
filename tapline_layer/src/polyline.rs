// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polyline data as supplied by the host.

use crate::coords::{GeoBounds, GeoPoint};
use crate::error::{LayerError, check_non_negative};

/// A rendered polyline: geographic vertices plus stroke metrics.
///
/// Only the data that affects hit testing lives here. Colors, dash patterns
/// and the like belong to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    /// Vertices in drawing order.
    pub points: Vec<GeoPoint>,
    /// Stroke width in pixels, or in meters when
    /// [`use_stroke_width_in_meter`](Self::use_stroke_width_in_meter) is set.
    pub stroke_width: f64,
    /// Border width in pixels, drawn around the stroke.
    pub border_stroke_width: f64,
    /// Interpret `stroke_width` as meters on the ground.
    pub use_stroke_width_in_meter: bool,
}

impl Default for Polyline {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            stroke_width: 1.0,
            border_stroke_width: 0.0,
            use_stroke_width_in_meter: false,
        }
    }
}

impl Polyline {
    /// A 1 px polyline through `points`.
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Set the stroke width in pixels.
    #[must_use]
    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self.use_stroke_width_in_meter = false;
        self
    }

    /// Set the stroke width in meters.
    #[must_use]
    pub fn with_stroke_width_in_meters(mut self, meters: f64) -> Self {
        self.stroke_width = meters;
        self.use_stroke_width_in_meter = true;
        self
    }

    /// Set the border width in pixels.
    #[must_use]
    pub fn with_border_stroke_width(mut self, width: f64) -> Self {
        self.border_stroke_width = width;
        self
    }

    /// Whether the polyline has at least one segment.
    pub fn is_hittable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Geographic bounds of the vertices, or `None` without vertices.
    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_points(self.points.iter().copied())
    }

    pub(crate) fn validate(&self, index: usize) -> Result<(), LayerError> {
        for width in [self.stroke_width, self.border_stroke_width] {
            if !check_non_negative(width) {
                return Err(LayerError::InvalidStrokeWidth { index, width });
            }
        }
        Ok(())
    }
}

/// A [`Polyline`] carrying an opaque caller tag.
///
/// Tags come back through the hit callback so the host can tell which of its
/// objects was tapped.
#[derive(Clone, Debug, PartialEq)]
pub struct TaggedPolyline<T> {
    /// The line itself.
    pub line: Polyline,
    /// Caller metadata.
    pub tag: Option<T>,
}

impl<T> TaggedPolyline<T> {
    /// Wrap `line` with `tag`.
    pub fn new(line: Polyline, tag: T) -> Self {
        Self {
            line,
            tag: Some(tag),
        }
    }

    /// Wrap `line` without a tag.
    pub fn untagged(line: Polyline) -> Self {
        Self { line, tag: None }
    }
}

impl<T> From<Polyline> for TaggedPolyline<T> {
    fn from(line: Polyline) -> Self {
        Self::untagged(line)
    }
}
