// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behavior of the tap layer against host-style cameras.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size};
use tapline_layer::{
    Camera, CullingBackend, Epsg3857, GeoPoint, HitResult, LayerError, MapCamera, Polyline,
    TaggedPolyline, TapLayer, TapLayerOptions, TapPosition, hit_test, hit_threshold,
    screen_to_geo,
};

/// Host camera where a geographic point is drawn at pixel `(lng, lat)`.
#[derive(Debug)]
struct PixelCamera {
    size: Size,
    center: GeoPoint,
    zoom: f64,
}

impl PixelCamera {
    fn new() -> Self {
        Self {
            size: Size::new(100.0, 100.0),
            center: GeoPoint::new(50.0, 50.0),
            zoom: 0.0,
        }
    }
}

impl Camera for PixelCamera {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn center(&self) -> GeoPoint {
        self.center
    }

    fn size(&self) -> Size {
        self.size
    }

    fn project(&self, point: GeoPoint, _zoom: f64) -> Point {
        Point::new(point.lng, point.lat)
    }

    fn unproject(&self, point: Point, _zoom: f64) -> GeoPoint {
        GeoPoint::new(point.y, point.x)
    }

    fn move_to(&mut self, center: GeoPoint, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }
}

/// Geographic point drawn at screen `(x, y)` by [`PixelCamera`].
fn at(x: f64, y: f64) -> GeoPoint {
    GeoPoint::new(y, x)
}

fn line(points: &[(f64, f64)]) -> Polyline {
    Polyline::new(points.iter().map(|&(x, y)| at(x, y)).collect())
}

fn options(tolerance: f64) -> TapLayerOptions {
    TapLayerOptions {
        pointer_distance_tolerance: tolerance,
        ..TapLayerOptions::default()
    }
}

fn tap(x: f64, y: f64) -> TapPosition {
    TapPosition::at(Point::new(x, y))
}

#[derive(Debug, Default)]
struct Log {
    hits: Vec<Vec<&'static str>>,
    misses: usize,
    taps: Vec<GeoPoint>,
}

fn recording_layer(
    polylines: Vec<TaggedPolyline<&'static str>>,
    options: TapLayerOptions,
) -> (TapLayer<&'static str>, Rc<RefCell<Log>>) {
    let log = Rc::new(RefCell::new(Log::default()));
    let (hit_log, miss_log, tap_log) = (Rc::clone(&log), Rc::clone(&log), Rc::clone(&log));
    let layer = TapLayer::new(polylines, options)
        .unwrap()
        .with_on_hit(move |lines, _| {
            let tags: Vec<_> = lines.iter().filter_map(|l| l.tag).collect();
            hit_log.borrow_mut().hits.push(tags);
        })
        .with_on_miss(move |_| miss_log.borrow_mut().misses += 1)
        .with_on_tap(move |_, geo| tap_log.borrow_mut().taps.push(geo));
    (layer, log)
}

#[test]
fn tap_next_to_segment_hits() {
    let cam = PixelCamera::new();
    let lines = [TaggedPolyline::new(line(&[(0.0, 0.0), (0.0, 10.0)]), "a")];
    assert_eq!(
        hit_test(Point::new(1.0, 5.0), &lines, &cam, 2.0),
        HitResult::Hit {
            indices: vec![0],
            distance: 1.0
        }
    );
}

#[test]
fn tap_beyond_threshold_misses_once() {
    let cam = PixelCamera::new();
    let (mut layer, log) = recording_layer(
        vec![TaggedPolyline::new(line(&[(0.0, 0.0), (0.0, 10.0)]), "a")],
        options(2.0),
    );
    let result = layer.on_tap_up(&tap(5.0, 5.0), &cam);
    assert_eq!(result, HitResult::Miss);
    let log = log.borrow();
    assert_eq!(log.misses, 1);
    assert!(log.hits.is_empty());
}

#[test]
fn overlapping_lines_both_match() {
    let cam = PixelCamera::new();
    let (mut layer, log) = recording_layer(
        vec![
            TaggedPolyline::new(line(&[(0.0, 0.0), (10.0, 10.0)]), "a"),
            TaggedPolyline::new(line(&[(0.0, 10.0), (0.0, 0.0), (10.0, 0.0)]), "b"),
        ],
        options(2.0),
    );
    let result = layer.on_tap_up(&tap(0.0, 0.0), &cam);
    assert_eq!(result.indices(), &[0, 1]);
    assert_eq!(result.distance(), Some(0.0));
    assert_eq!(log.borrow().hits, [vec!["a", "b"]]);
    assert_eq!(log.borrow().misses, 0);
}

#[test]
fn equidistant_parallel_lines_tie() {
    let cam = PixelCamera::new();
    let lines = [
        TaggedPolyline::new(line(&[(10.0, 0.0), (10.0, 40.0)]), "left"),
        TaggedPolyline::new(line(&[(20.0, 0.0), (20.0, 40.0)]), "right"),
        TaggedPolyline::new(line(&[(40.0, 0.0), (40.0, 40.0)]), "far"),
    ];
    let result = hit_test(Point::new(15.0, 20.0), &lines, &cam, 15.0);
    assert_eq!(result.indices(), &[0, 1]);
    assert_eq!(result.distance(), Some(5.0));
}

#[test]
fn each_polyline_reported_once() {
    let cam = PixelCamera::new();
    // Two segments of the same line are equally close to the tap.
    let lines = [TaggedPolyline::new(
        line(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]),
        "a",
    )];
    let result = hit_test(Point::new(10.0, 1.0), &lines, &cam, 5.0);
    assert_eq!(result.indices(), &[0]);
}

#[test]
fn single_point_never_hits() {
    let cam = PixelCamera::new();
    let lines = [
        TaggedPolyline::new(line(&[(5.0, 5.0)]), "dot"),
        TaggedPolyline::new(Polyline::default(), "empty"),
    ];
    for (x, y) in [(5.0, 5.0), (0.0, 0.0), (6.0, 5.0)] {
        assert_eq!(
            hit_test(Point::new(x, y), &lines, &cam, 1000.0),
            HitResult::Miss
        );
    }
}

#[test]
fn midpoint_always_hits() {
    let cam = PixelCamera::new();
    for &(a, b) in &[
        ((0.0, 0.0), (10.0, 0.0)),
        ((3.0, 7.0), (3.0, 21.0)),
        ((-4.0, -4.0), (4.0, 4.0)),
    ] {
        let lines = [TaggedPolyline::new(line(&[a, b]), "seg")];
        let mid = Point::new((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
        let result = hit_test(mid, &lines, &cam, 0.0);
        assert_eq!(result.indices(), &[0]);
        assert_eq!(result.distance(), Some(0.0));
    }
}

#[test]
fn raising_tolerance_never_drops_matches() {
    let cam = PixelCamera::new();
    let lines = [
        TaggedPolyline::new(line(&[(0.0, 0.0), (0.0, 40.0)]), "a"),
        TaggedPolyline::new(line(&[(30.0, 0.0), (30.0, 40.0), (60.0, 40.0)]), "b"),
        TaggedPolyline::new(line(&[(0.0, 80.0), (80.0, 80.0)]), "c"),
    ];
    let tolerances = [0.0, 2.0, 5.0, 15.0, 40.0, 100.0];
    for x in (0..10).map(|i| f64::from(i) * 9.0) {
        for y in (0..10).map(|i| f64::from(i) * 9.0) {
            let p = Point::new(x, y);
            let mut previous: Option<HitResult> = None;
            for &t in &tolerances {
                let current = hit_test(p, &lines, &cam, t);
                if let Some(HitResult::Hit { indices, .. }) = &previous {
                    for i in indices {
                        assert!(
                            current.indices().contains(i),
                            "{p:?}: tolerance {t} dropped {i}"
                        );
                    }
                }
                previous = Some(current);
            }
        }
    }
}

#[test]
fn host_hook_sees_every_tap() {
    let cam = PixelCamera::new();
    let (mut layer, log) = recording_layer(
        vec![TaggedPolyline::new(line(&[(0.0, 0.0), (0.0, 10.0)]), "a")],
        options(2.0),
    );
    layer.on_tap_up(&tap(1.0, 5.0), &cam);
    layer.on_tap_up(&tap(75.0, 50.0), &cam);
    let log = log.borrow();
    assert_eq!(log.taps, [at(1.0, 5.0), at(75.0, 50.0)]);
    assert_eq!(log.hits, [vec!["a"]]);
    assert_eq!(log.misses, 1);
}

#[test]
fn double_tap_zooms_around_tap() {
    let mut cam = PixelCamera::new();
    let layer: TapLayer<()> = TapLayer::new(Vec::new(), TapLayerOptions::default()).unwrap();
    let center = layer.on_double_tap_down(&tap(75.0, 50.0), &mut cam);
    assert_eq!(center, at(75.0, 50.0));
    assert_eq!(cam.center, center);
    assert_eq!(cam.zoom, 0.5);

    let layer: TapLayer<()> = TapLayer::new(
        Vec::new(),
        TapLayerOptions {
            double_tap_zoom_delta: 1.0,
            ..TapLayerOptions::default()
        },
    )
    .unwrap();
    layer.on_double_tap_down(&tap(50.0, 50.0), &mut cam);
    assert_eq!(cam.zoom, 1.5);
}

#[test]
fn culling_matches_unculled_results() {
    let cam = PixelCamera::new();
    let polylines = vec![
        TaggedPolyline::new(line(&[(500.0, 500.0), (510.0, 500.0)]), "off"),
        TaggedPolyline::new(line(&[(10.0, 0.0), (10.0, 40.0)]), "left"),
        TaggedPolyline::new(line(&[(20.0, 0.0), (20.0, 40.0)]), "right"),
        TaggedPolyline::new(line(&[(-30.0, 50.0), (30.0, 50.0)]), "edge"),
    ];
    let plain = TapLayer::new(polylines.clone(), options(15.0)).unwrap();
    for backend in [CullingBackend::Flat, CullingBackend::Grid { cell_size: 16.0 }] {
        let culled = TapLayer::new(
            polylines.clone(),
            TapLayerOptions {
                polyline_culling: true,
                culling_backend: backend,
                ..options(15.0)
            },
        )
        .unwrap();
        assert_eq!(culled.visible_polylines(&cam), [1, 2, 3]);
        for p in [
            Point::new(15.0, 20.0),
            Point::new(2.0, 48.0),
            Point::new(90.0, 90.0),
        ] {
            assert_eq!(culled.hit_test(p, &cam), plain.hit_test(p, &cam), "{backend:?} {p:?}");
        }
    }
}

fn culled(
    polylines: Vec<TaggedPolyline<&'static str>>,
    backend: CullingBackend,
) -> TapLayer<&'static str> {
    let options = TapLayerOptions {
        polyline_culling: true,
        culling_backend: backend,
        ..options(15.0)
    };
    TapLayer::new(polylines, options).unwrap()
}

#[test]
fn wide_stroke_off_screen_is_not_culled() {
    let cam = PixelCamera::new();
    // Centerline 30 px left of the viewport, painted 40 px to either side.
    let wide = line(&[(-30.0, 0.0), (-30.0, 100.0)]).with_stroke_width(80.0);
    let polylines = vec![TaggedPolyline::new(wide, "wide")];
    let plain = TapLayer::new(polylines.clone(), options(15.0)).unwrap();
    let expected = HitResult::Hit {
        indices: vec![0],
        distance: 35.0,
    };
    assert_eq!(plain.hit_test(Point::new(5.0, 50.0), &cam), expected);
    for backend in [CullingBackend::Flat, CullingBackend::Grid { cell_size: 16.0 }] {
        let layer = culled(polylines.clone(), backend);
        assert_eq!(layer.visible_polylines(&cam), [0], "{backend:?}");
        assert_eq!(layer.hit_test(Point::new(5.0, 50.0), &cam), expected, "{backend:?}");
        assert!(!layer.hit_test(Point::new(20.0, 50.0), &cam).is_hit());
    }
}

#[test]
fn world_view_with_tiny_grid_cells() {
    let cam = MapCamera::new(Epsg3857, GeoPoint::new(0.0, 0.0), 3.0, Size::new(800.0, 600.0));
    let short = Polyline::new(vec![GeoPoint::new(0.0, -0.5), GeoPoint::new(0.0, 0.5)]);
    let layer = culled(
        vec![TaggedPolyline::new(short, "short")],
        CullingBackend::Grid { cell_size: 0.001 },
    );
    assert_eq!(layer.visible_polylines(&cam), [0]);
    let result = layer.hit_test(Point::new(400.0, 300.0), &cam);
    assert_eq!(result.indices(), &[0]);
    assert!(!layer.hit_test(Point::new(400.0, 100.0), &cam).is_hit());
}

#[test]
fn set_polylines_updates_culling() {
    let cam = PixelCamera::new();
    let mut layer = TapLayer::new(
        vec![TaggedPolyline::new(line(&[(10.0, 0.0), (10.0, 40.0)]), "a")],
        TapLayerOptions {
            polyline_culling: true,
            ..TapLayerOptions::default()
        },
    )
    .unwrap();
    assert!(layer.hit_test(Point::new(11.0, 20.0), &cam).is_hit());

    layer
        .set_polylines(vec![
            TaggedPolyline::new(line(&[(300.0, 0.0), (300.0, 40.0)]), "gone"),
            TaggedPolyline::new(line(&[(60.0, 0.0), (60.0, 40.0)]), "b"),
        ])
        .unwrap();
    assert_eq!(layer.visible_polylines(&cam), [1]);
    assert!(!layer.hit_test(Point::new(11.0, 20.0), &cam).is_hit());
    assert_eq!(layer.hit_test(Point::new(61.0, 20.0), &cam).indices(), &[1]);
}

#[test]
fn invalid_configuration_is_rejected() {
    let bad = line(&[(0.0, 0.0), (1.0, 1.0)]).with_border_stroke_width(-2.0);
    let bad = TaggedPolyline::new(bad, "x");
    assert_eq!(
        TapLayer::new(vec![bad], TapLayerOptions::default()).err(),
        Some(LayerError::InvalidStrokeWidth {
            index: 0,
            width: -2.0
        })
    );
    assert_eq!(
        TapLayer::<()>::new(Vec::new(), options(f64::NAN)).err().map(|e| e.to_string()),
        Some("pointer distance tolerance must be finite and non-negative, got NaN".to_owned())
    );

    let mut layer = TapLayer::<()>::new(Vec::new(), TapLayerOptions::default()).unwrap();
    assert_eq!(
        layer.set_pointer_distance_tolerance(-0.5),
        Err(LayerError::InvalidTolerance(-0.5))
    );
    assert_eq!(layer.options().pointer_distance_tolerance, 15.0);
    assert!(
        layer
            .set_options(TapLayerOptions {
                polyline_culling: true,
                culling_backend: CullingBackend::Grid { cell_size: -1.0 },
                ..TapLayerOptions::default()
            })
            .is_err()
    );
    assert!(!layer.options().polyline_culling);
}

mod meters {
    use super::*;

    const CENTER: GeoPoint = GeoPoint::new(0.0, 0.0);

    fn camera(zoom: f64) -> MapCamera<Epsg3857> {
        MapCamera::new(Epsg3857, CENTER, zoom, Size::new(400.0, 400.0))
    }

    /// East-west line through the viewport center.
    fn across(width: f64, in_meters: bool) -> Polyline {
        let line = Polyline::new(vec![GeoPoint::new(0.0, -0.0005), GeoPoint::new(0.0, 0.0005)]);
        if in_meters {
            line.with_stroke_width_in_meters(width)
        } else {
            line.with_stroke_width(width)
        }
    }

    #[test]
    fn meter_width_at_zoom_18() {
        let cam = camera(18.0);
        let threshold = hit_threshold(&across(100.0, true), cam.pixel_origin(), &cam, 15.0);
        // 100 m at the equator is about 167.6 px at zoom 18.
        assert!((80.0..88.0).contains(&threshold), "threshold {threshold}");

        let tap = Point::new(200.0, 270.0);
        let meters = [TaggedPolyline::new(across(100.0, true), ())];
        let pixels = [TaggedPolyline::new(across(100.0, false), ())];
        assert!(hit_test(tap, &meters, &cam, 15.0).is_hit());
        assert!(!hit_test(tap, &pixels, &cam, 15.0).is_hit());
    }

    #[test]
    fn meter_stroke_off_screen_is_not_culled() {
        let cam = camera(18.0);
        let size = cam.size();
        // Centerline 60 px left of the viewport; 100 m paints about 84 px per side.
        let edge = |y: f64| screen_to_geo(Point::new(-60.0, y), size.width, size.height, &cam);
        let wide = Polyline::new(vec![edge(0.0), edge(400.0)]).with_stroke_width_in_meters(100.0);
        let polylines = vec![TaggedPolyline::new(wide, "wide")];
        let plain = TapLayer::new(polylines.clone(), options(15.0)).unwrap();
        let tap = Point::new(10.0, 200.0);
        assert!(plain.hit_test(tap, &cam).is_hit());
        for backend in [CullingBackend::Flat, CullingBackend::Grid { cell_size: 0.0001 }] {
            let layer = culled(polylines.clone(), backend);
            assert_eq!(layer.hit_test(tap, &cam), plain.hit_test(tap, &cam), "{backend:?}");
        }
    }

    #[test]
    fn meter_threshold_follows_zoom() {
        let line = across(2000.0, true);
        let at = |zoom: f64| {
            let cam = camera(zoom);
            hit_threshold(&line, cam.pixel_origin(), &cam, 0.0)
        };
        let ratio = at(11.0) / at(10.0);
        assert!((ratio - 2.0).abs() < 1e-6, "ratio {ratio}");
    }

    #[test]
    fn pixel_threshold_ignores_zoom() {
        let line = across(24.0, false);
        for zoom in [2.0, 9.0, 17.0] {
            let cam = camera(zoom);
            assert_eq!(hit_threshold(&line, cam.pixel_origin(), &cam, 0.0), 12.0);
        }
    }
}
