use crate::geo::{degrees_from_meters, GeoPoint};
use rust_decimal::prelude::*;
use std::cmp::Ordering;

/// A straight line in the (lat, lng) plane, kept in general form
/// `a * lat + b * lng + c`.
///
/// For a line built from two points this is the slope form
/// `lat - slope * lng - intercept` multiplied by `start.lng - end.lng`, so the
/// sign of `signed_value` is the same as the slope form for west-bound lines
/// and flipped for east-bound ones. It keeps the direction of travel and
/// north-south lines need no special case.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    a: Decimal,
    b: Decimal,
    c: Decimal,
}

impl Line {
    /// `None` when both points are the same, there is no line through a
    /// zero-length segment.
    pub fn from_two_points(start: &GeoPoint, end: &GeoPoint) -> Option<Line> {
        if start == end {
            return None;
        }
        let a = start.longitude() - end.longitude();
        let b = end.latitude() - start.latitude();
        Some(Line::through(a, b, start))
    }

    fn through(a: Decimal, b: Decimal, point: &GeoPoint) -> Line {
        let c = -(a * point.latitude() + b * point.longitude());
        Line { a, b, c }
    }

    /// The line through `at` perpendicular to this one.
    pub fn perpendicular(&self, at: &GeoPoint) -> Line {
        // the direction of `self` is `(b, -a)`, which becomes the normal
        Line::through(self.b, -self.a, at)
    }

    /// The line parallel to this one, `offset_degrees` away from it. Positive
    /// offsets move towards the side where `signed_value` is positive.
    pub fn parallel(&self, offset_degrees: Decimal) -> Option<Line> {
        let norm = (self.a * self.a + self.b * self.b).sqrt()?;
        Some(Line {
            a: self.a,
            b: self.b,
            c: self.c - offset_degrees * norm,
        })
    }

    pub fn signed_value(&self, point: &GeoPoint) -> Decimal {
        self.a * point.latitude() + self.b * point.longitude() + self.c
    }

    /// Which half-plane `point` is in.
    pub fn side(&self, point: &GeoPoint) -> Ordering {
        self.signed_value(point).cmp(&Decimal::ZERO)
    }

    /// `None` for parallel lines.
    pub fn intersection(&self, other: &Line) -> Option<GeoPoint> {
        let det = self.a * other.b - other.a * self.b;
        if det.is_zero() {
            return None;
        }
        let latitude = (self.b * other.c - other.b * self.c) / det;
        let longitude = (other.a * self.c - self.a * other.c) / det;
        Some(GeoPoint::new(latitude, longitude))
    }
}

pub fn is_point_between_lines(l: &Line, k: &Line, point: &GeoPoint, reference: &GeoPoint) -> bool {
    l.side(point) == l.side(reference) && k.side(point) == k.side(reference)
}

/// Whether the projection of `point` onto the segment falls strictly inside
/// it. Points exactly on one of the perpendiculars are outside.
pub fn is_point_between_perpendicular_lines(
    start: &GeoPoint,
    end: &GeoPoint,
    point: &GeoPoint,
) -> bool {
    let line = match Line::from_two_points(start, end) {
        Some(line) => line,
        None => return false,
    };
    let at_start = line.perpendicular(start);
    let at_end = line.perpendicular(end);
    at_start.side(point) == at_start.side(end) && at_end.side(point) == at_end.side(start)
}

/// Whether `point` is no further than `half_width_meters` from the line
/// through the segment, tested against the two parallel corridor bounds.
pub fn is_point_in_corridor(
    start: &GeoPoint,
    end: &GeoPoint,
    point: &GeoPoint,
    half_width_meters: f64,
) -> bool {
    let offset = degrees_from_meters(half_width_meters);
    let bounds = Line::from_two_points(start, end)
        .and_then(|line| Some((line.parallel(offset)?, line.parallel(-offset)?)));
    match bounds {
        Some((upper, lower)) => is_point_between_lines(&upper, &lower, point, start),
        None => false,
    }
}

/// Distance in meters from `point` to the foot of the perpendicular dropped
/// from it onto `line`.
pub fn distance_to_line(point: &GeoPoint, line: &Line) -> f64 {
    match line.intersection(&line.perpendicular(point)) {
        Some(foot) => point.haversine_distance(&foot),
        None => f64::INFINITY,
    }
}
