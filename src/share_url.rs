//! Destinations shared from the maps app.
//!
//! Sharing a place gives a short `maps.app.goo.gl` link. Resolving it is left
//! to the host (it is a plain HTTP redirect), the functions here only pick the
//! link out of the shared text and read the destination out of the URL the
//! link redirects to.

use crate::geo::GeoPoint;
use regex::Regex;
use std::sync::LazyLock;

static SHARE_PLACE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://maps\.app\.goo\.gl/\w+").unwrap());

// place pin in the `data=` parameter, e.g. `!8m2!3d52.2296756!4d21.0122287`
static DESTINATION_IN_DATA_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!8m2!3d(-?\d{1,2}\.\d+)!4d(-?\d{1,3}\.\d+)").unwrap()
});

// `/maps/dir/<origin>/<destination>/`
static DESTINATION_IN_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https://www\.google\.com/maps/dir/-?\d{1,2}\.\d+,-?\d{1,3}\.\d+/(-?\d{1,2}\.\d+),(-?\d{1,3}\.\d+)/",
    )
    .unwrap()
});

/// The first share-place link in `text`, if any.
pub fn find_share_place_url(text: &str) -> Option<&str> {
    SHARE_PLACE_URL.find(text).map(|m| m.as_str())
}

/// Reads the destination out of a resolved maps URL. The place pin wins over
/// the destination of a directions path when both are present.
pub fn destination_from_share_url(url: &str) -> Option<GeoPoint> {
    let captures = DESTINATION_IN_DATA_PARAM
        .captures(url)
        .or_else(|| DESTINATION_IN_PATH.captures(url))?;
    let latitude: f64 = captures[1].parse().ok()?;
    let longitude: f64 = captures[2].parse().ok()?;
    match GeoPoint::from_degrees(latitude, longitude) {
        Ok(point) => {
            info!("destination {point} found in shared url");
            Some(point)
        }
        Err(e) => {
            warn!("bad destination in shared url: {e}");
            None
        }
    }
}
