use anyhow::Result;
use rust_decimal::prelude::*;
use std::fmt;

// mean earth radius, unit: meter
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

// One meter in degrees of a great circle, i.e. 1 / (60 * 1852).
pub const METERS_TO_DEGREES: f64 = 8.999280057498208e-6;

/// A position on the map. Coordinates are kept as decimals so that lines
/// built from them can be evaluated exactly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeoPoint {
    latitude: Decimal,
    longitude: Decimal,
}

impl GeoPoint {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        GeoPoint {
            latitude,
            longitude,
        }
    }

    /// Builds a point from the `f64` degrees reported by a location provider
    /// or a directions response. The shortest decimal representation of the
    /// float is kept, so `52.1605765` stays `52.1605765`.
    pub fn from_degrees(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            bail!("invalid latitude: {latitude}");
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            bail!("invalid longitude: {longitude}");
        }
        Ok(GeoPoint {
            latitude: Decimal::from_str(&latitude.to_string())?,
            longitude: Decimal::from_str(&longitude.to_string())?,
        })
    }

    pub fn latitude(&self) -> Decimal {
        self.latitude
    }

    pub fn longitude(&self) -> Decimal {
        self.longitude
    }

    pub fn to_degrees(&self) -> (f64, f64) {
        (
            self.latitude.to_f64().unwrap_or_default(),
            self.longitude.to_f64().unwrap_or_default(),
        )
    }

    pub fn to_radians(&self) -> (f64, f64) {
        let (lat, lng) = self.to_degrees();
        (lat.to_radians(), lng.to_radians())
    }

    pub fn haversine_distance(&self, other: &GeoPoint) -> f64 {
        let (lat1, lng1) = self.to_radians();
        let (lat2, lng2) = other.to_radians();
        let a = ((lat2 - lat1) / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * ((lng2 - lng1) / 2.0).sin().powi(2);
        // rounding can push `a` a tiny bit above 1 for antipodal points
        let a = a.min(1.0);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().atan2((1.0 - a).sqrt())
    }

    pub fn midpoint(&self, other: &GeoPoint) -> GeoPoint {
        let two = Decimal::TWO;
        GeoPoint {
            latitude: (self.latitude + other.latitude) / two,
            longitude: (self.longitude + other.longitude) / two,
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    a.haversine_distance(b)
}

pub fn to_radians(p: &GeoPoint) -> (f64, f64) {
    p.to_radians()
}

/// Converts a lateral distance into degrees so it can be used with the exact
/// line arithmetic. Not latitude aware.
pub fn degrees_from_meters(meters: f64) -> Decimal {
    Decimal::from_f64(meters * METERS_TO_DEGREES).unwrap_or_default()
}
