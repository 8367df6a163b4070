use crate::geo::GeoPoint;
use crate::line::Line;
use crate::maneuver::Maneuver;
use crate::route::Step;
use std::cmp::Ordering;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoundaboutDirection {
    Left,
    Right,
}

impl RoundaboutDirection {
    pub fn to_maneuver(self) -> Maneuver {
        match self {
            RoundaboutDirection::Left => Maneuver::RoundaboutLeft,
            RoundaboutDirection::Right => Maneuver::RoundaboutRight,
        }
    }
}

// 1 if `point` is on the positive side of the line through `start` and `end`,
// 0 otherwise (including the degenerate zero-length case).
fn side_bit(start: &GeoPoint, end: &GeoPoint, point: &GeoPoint) -> u8 {
    match Line::from_two_points(start, end) {
        Some(line) if line.side(point) == Ordering::Greater => 1,
        _ => 0,
    }
}

/// Decides which way the rider goes around a roundabout, given the step
/// leading into it and the step leading out of it.
///
/// Three orientation tests are packed into a bitmap: where the exit lies
/// relative to the approach, where the entry lies relative to the exit, and
/// where the junction lies relative to the chord from entry to exit.
///
/// TODO: collinear approach/exit and u-turn geometries are not covered by the
/// field fixtures, check them against recorded rides.
pub fn resolve_roundabout_direction(before: &Step, after: &Step) -> RoundaboutDirection {
    let b0 = side_bit(&before.start, &before.end, &after.end);
    let b1 = side_bit(&after.start, &after.end, &before.start);
    let b2 = side_bit(&before.start, &after.end, &before.end);
    let bitmap = (b0 << 2) | (b1 << 1) | b2;
    debug!("roundabout bitmap {bitmap:#05b} for steps {} -> {}", before.index, after.index);

    if ((bitmap >> 2) == 0 || bitmap == 5) && bitmap != 2 {
        RoundaboutDirection::Left
    } else {
        RoundaboutDirection::Right
    }
}
