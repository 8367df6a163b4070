use crate::geo::GeoPoint;
use anyhow::Result;

#[derive(Clone, Debug, PartialEq)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp_ms: Option<i64>,
    pub accuracy: Option<f32>,
    pub speed: Option<f32>,
}

impl PositionFix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        PositionFix {
            latitude,
            longitude,
            timestamp_ms: None,
            accuracy: None,
            speed: None,
        }
    }

    pub fn to_geo_point(&self) -> Result<GeoPoint> {
        GeoPoint::from_degrees(self.latitude, self.longitude)
    }

    /// Reported speed in whole km/h, the unit of the speedometer. Providers
    /// report m/s.
    pub fn speed_kph(&self) -> Option<u8> {
        const MPS_TO_KPH: f32 = 3.6;
        self.speed
            .filter(|speed| speed.is_finite())
            .map(|speed| (speed * MPS_TO_KPH).round().clamp(0.0, u8::MAX as f32) as u8)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum ProcessResult {
    Accept = 0,
    // negative values are for fixes that never reach the step locator
    Ignore = -1,
}

impl ProcessResult {
    pub fn to_int(&self) -> i8 {
        *self as i8
    }
}


pub struct GpsPreprocessor {
    last_timestamp_ms: Option<i64>,
}

impl GpsPreprocessor {
    pub fn new() -> Self {
        GpsPreprocessor {
            last_timestamp_ms: None,
        }
    }

    pub fn last_timestamp_ms(&self) -> Option<i64> {
        self.last_timestamp_ms
    }

    pub fn preprocess(&mut self, fix: &PositionFix) -> ProcessResult {
        // The waypoint radius is 10m, a fix that is off by more than a few
        // times that would make us jump between steps.
        const ACCURACY_THRESHOLD: f32 = 30.0;
        let should_ignore = match fix.accuracy {
            Some(accuracy) => accuracy > ACCURACY_THRESHOLD,
            None => false,
        };
        if should_ignore {
            return ProcessResult::Ignore;
        }

        match fix
            .timestamp_ms
            .and_then(|now| self.last_timestamp_ms.map(|prev| now - prev))
        {
            // NOTE: Location providers sometimes deliver an old fix after a
            // newer one. Feeding it to the locator would move the rider
            // backwards along the route, so we drop it.
            Some(time_diff_in_ms) if time_diff_in_ms < 0 => ProcessResult::Ignore,
            _ => {
                if fix.timestamp_ms.is_some() {
                    self.last_timestamp_ms = fix.timestamp_ms;
                }
                ProcessResult::Accept
            }
        }
    }
}
