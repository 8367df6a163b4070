#![allow(dead_code)]

use bikenav_core::geo::GeoPoint;
use bikenav_core::maneuver::Maneuver;
use bikenav_core::route::{Route, Step};

// A 500m ride north, a left turn, 500m west, then 400m north again.
pub const A: (f64, f64) = (52.2, 21.0);
pub const B: (f64, f64) = (52.2045, 21.0);
pub const C: (f64, f64) = (52.2045, 20.9927);
pub const D: (f64, f64) = (52.2081, 20.9927);

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn pt(lat: f64, lng: f64) -> GeoPoint {
    GeoPoint::from_degrees(lat, lng).unwrap()
}

pub fn test_step(start_lat: f64, start_lng: f64, end_lat: f64, end_lng: f64) -> Step {
    Step {
        index: 0,
        start: pt(start_lat, start_lng),
        end: pt(end_lat, end_lng),
        maneuver: Maneuver::TurnRight,
    }
}

pub fn three_step_route() -> Route {
    Route::new(vec![
        (pt(A.0, A.1), pt(B.0, B.1), Maneuver::Straight),
        (pt(B.0, B.1), pt(C.0, C.1), Maneuver::TurnLeft),
        (pt(C.0, C.1), pt(D.0, D.1), Maneuver::Straight),
    ])
    .unwrap()
}

fn round_7(x: f64) -> f64 {
    (x * 1e7).round() / 1e7
}

fn interpolate(from: (f64, f64), to: (f64, f64), n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|k| {
            let t = k as f64 / n as f64;
            (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
        })
        .collect()
}

pub fn scenario_start() -> GeoPoint {
    pt(A.0 - 0.00005, A.1)
}

/// Riding the three step route from a few meters before `A` to a few meters
/// past `D`, with a couple of meters of GPS noise. Roughly 5m between fixes.
pub fn scenario_walk() -> Vec<GeoPoint> {
    const JITTER: [f64; 4] = [0.0, 0.00002, -0.00002, 0.00001];
    let mut points = interpolate(A, B, 100);
    points.extend(interpolate(B, C, 100));
    points.extend(interpolate(C, D, 80));
    points.push(D);
    points.push((D.0 + 0.00003, D.1));

    let mut walk = vec![scenario_start()];
    for (i, (lat, lng)) in points.into_iter().enumerate() {
        walk.push(pt(
            round_7(lat + JITTER[(i + 1) % 4]),
            round_7(lng + JITTER[i % 4]),
        ));
    }
    walk
}
