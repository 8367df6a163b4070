use crate::geo::GeoPoint;
use crate::maneuver::Maneuver;
use crate::roundabout::resolve_roundabout_direction;
use anyhow::Result;
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub index: usize,
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub maneuver: Maneuver,
}

impl Step {
    pub fn length(&self) -> f64 {
        self.start.haversine_distance(&self.end)
    }
}

/// The steps of one navigation session. Never changes once built, a new route
/// replaces the whole thing.
#[derive(Clone, Debug)]
pub struct Route {
    steps: Vec<Step>,
    // `steps[i].maneuver` with roundabouts resolved from the geometry
    resolved_maneuvers: Vec<Maneuver>,
}

impl Route {
    pub fn new(segments: Vec<(GeoPoint, GeoPoint, Maneuver)>) -> Result<Route> {
        if segments.len() < 2 {
            bail!(
                "a route needs at least 2 steps, got {}",
                segments.len()
            );
        }
        let steps: Vec<Step> = segments
            .into_iter()
            .enumerate()
            .map(|(index, (start, end, maneuver))| Step {
                index,
                start,
                end,
                maneuver,
            })
            .collect();

        let resolved_maneuvers = steps
            .iter()
            .map(|step| match step.index.checked_sub(1) {
                Some(before) if step.maneuver.is_roundabout() => {
                    resolve_roundabout_direction(&steps[before], step).to_maneuver()
                }
                _ => step.maneuver,
            })
            .collect();

        Ok(Route {
            steps,
            resolved_maneuvers,
        })
    }

    /// Builds a route from the first leg of the first route in a directions
    /// service response.
    pub fn from_directions_json(json: &str) -> Result<Route> {
        let response: DirectionsResponse = serde_json::from_str(json)?;
        if response.status != "OK" {
            bail!("directions response has status `{}`", response.status);
        }
        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("directions response has no routes"))?;
        let leg = route
            .legs
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("directions route has no legs"))?;
        if leg.steps.is_empty() {
            bail!("directions leg has no steps");
        }

        let segments = leg
            .steps
            .into_iter()
            .map(|step| {
                Ok((
                    GeoPoint::from_degrees(step.start_location.lat, step.start_location.lng)?,
                    GeoPoint::from_degrees(step.end_location.lat, step.end_location.lng)?,
                    Maneuver::from_tag(step.maneuver.as_deref()),
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        info!("received route with {} steps", segments.len());
        Route::new(segments)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    /// The maneuver of step `index`, with roundabouts resolved.
    pub fn resolved_maneuver(&self, index: usize) -> Option<Maneuver> {
        self.resolved_maneuvers.get(index).copied()
    }
}

#[derive(Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Deserialize)]
struct DirectionsLeg {
    #[serde(default)]
    steps: Vec<DirectionsStep>,
}

#[derive(Deserialize)]
struct DirectionsStep {
    start_location: LatLng,
    end_location: LatLng,
    maneuver: Option<String>,
}

#[derive(Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}
