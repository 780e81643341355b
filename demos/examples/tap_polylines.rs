// Copyright 2026 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap a few routes drawn over Bratislava.
//!
//! This example shows how to combine:
//! - a `MapCamera` over Web Mercator standing in for the host map,
//! - a `TapLayer` holding tagged polylines with pixel and meter widths,
//! - the hit, miss and tap callbacks, plus double-tap zoom.
//!
//! Run:
//! - `cargo run -p tapline_demos --example tap_polylines`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Line, Point, Size, Vec2};
use tapline_layer::{
    Camera, Epsg3857, GeoPoint, MapCamera, Polyline, TaggedPolyline, TapLayer, TapLayerOptions,
    TapPosition, project,
};
use tapline_precise_hit::segment_distance_sq;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Route {
    Tram,
    Cycleway,
    Ferry,
}

fn main() {
    let mut camera = MapCamera::new(
        Epsg3857,
        GeoPoint::new(48.1440, 17.1100),
        15.0,
        Size::new(800.0, 600.0),
    )
    .with_zoom_limits(3.0, 19.0);

    let tram = Polyline::new(vec![
        GeoPoint::new(48.1400, 17.1000),
        GeoPoint::new(48.1450, 17.1080),
        GeoPoint::new(48.1470, 17.1200),
    ])
    .with_stroke_width(6.0)
    .with_border_stroke_width(2.0);
    // Wide enough on the ground to stay easy to tap when zoomed in.
    let cycleway = Polyline::new(vec![
        GeoPoint::new(48.1380, 17.1050),
        GeoPoint::new(48.1420, 17.1150),
    ])
    .with_stroke_width_in_meters(25.0);
    let ferry = Polyline::new(vec![
        GeoPoint::new(48.1390, 17.0900),
        GeoPoint::new(48.1395, 17.1300),
    ])
    .with_stroke_width(3.0);

    let tapped = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&tapped);
    let options = TapLayerOptions {
        polyline_culling: true,
        ..TapLayerOptions::default()
    };
    let layer = TapLayer::new(
        vec![
            TaggedPolyline::new(tram, Route::Tram),
            TaggedPolyline::new(cycleway, Route::Cycleway),
            TaggedPolyline::new(ferry, Route::Ferry),
        ],
        options,
    );
    let mut layer = match layer {
        Ok(layer) => layer
            .with_on_hit(move |lines, tap| {
                let tags: Vec<Route> = lines.iter().filter_map(|l| l.tag).collect();
                println!("  hit {tags:?} at {:?}", tap.local);
                sink.borrow_mut().extend(tags);
            })
            .with_on_miss(|tap| println!("  miss at {:?}", tap.local))
            .with_on_tap(|_, geo| println!("  tap at {:.5}, {:.5}", geo.lat, geo.lng)),
        Err(err) => {
            eprintln!("bad layer configuration: {err}");
            return;
        }
    };

    // Tap right on each route's first segment midpoint, then somewhere empty.
    let origin = camera.pixel_origin();
    let mut taps = Vec::new();
    for line in layer.polylines() {
        let a = project(origin, line.line.points[0], &camera);
        let b = project(origin, line.line.points[1], &camera);
        taps.push(a.midpoint(b) + Vec2::new(0.0, 4.0));
    }
    taps.push(Point::new(790.0, 10.0));

    for local in taps {
        println!("tap {local:?}");
        let result = layer.on_tap_up(&TapPosition::at(local), &camera);
        println!("  -> {result:?}");
    }

    // Distance from the empty corner to the last route.
    if let Some(last) = layer.polylines().last() {
        let a = project(origin, last.line.points[0], &camera);
        let b = project(origin, last.line.points[1], &camera);
        let d = segment_distance_sq(Point::new(790.0, 10.0), Line::new(a, b)).sqrt();
        println!("corner is {d:.1} px from the ferry");
    }

    println!("visible: {:?}", layer.visible_polylines(&camera));
    println!("tapped so far: {:?}", tapped.borrow());

    let center = layer.on_double_tap_down(&TapPosition::at(Point::new(600.0, 300.0)), &mut camera);
    println!(
        "double tap: zoom {} centered on {:.5}, {:.5}",
        camera.zoom(),
        center.lat,
        center.lng
    );
    let result = layer.on_tap_up(&TapPosition::at(Point::new(400.0, 300.0)), &camera);
    println!("tap at new center -> {result:?}");
}
