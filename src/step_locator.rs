use crate::geo::GeoPoint;
use crate::line::{
    distance_to_line, is_point_between_perpendicular_lines, is_point_in_corridor, Line,
};
use crate::maneuver::Maneuver;
use crate::route::Route;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// What to show while riding the last step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinalManeuver {
    Finish,
    RepeatLast,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    pub waypoint_radius_m: f64,
    pub corridor_width_m: f64,
    pub meters_display_interval: f64,
    pub final_maneuver: FinalManeuver,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        LocatorConfig {
            waypoint_radius_m: 10.0,
            corridor_width_m: 200.0,
            meters_display_interval: 2.0,
            final_maneuver: FinalManeuver::Finish,
        }
    }
}

impl LocatorConfig {
    /// Missing fields keep their default value.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LocatorConfig = serde_json::from_str(json)?;
        if config.waypoint_radius_m <= 0.0
            || config.corridor_width_m <= 0.0
            || config.meters_display_interval < 0.0
        {
            bail!("invalid locator config: {config:?}");
        }
        Ok(config)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct DisplayUpdate {
    pub maneuver: Maneuver,
    pub distance_meters: u32,
}

/// Steps whose start/end waypoint is within the waypoint radius of a fix.
/// Indices are in ascending order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WaypointMembership {
    pub near_start: Vec<usize>,
    pub near_end: Vec<usize>,
}

impl WaypointMembership {
    pub fn of(route: &Route, point: &GeoPoint, radius_m: f64) -> Self {
        let mut membership = WaypointMembership::default();
        for step in route.steps() {
            if step.start.haversine_distance(point) < radius_m {
                membership.near_start.push(step.index);
            }
            if step.end.haversine_distance(point) < radius_m {
                membership.near_end.push(step.index);
            }
        }
        membership
    }

    pub fn is_empty(&self) -> bool {
        self.near_start.is_empty() && self.near_end.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProgressState {
    pub current_step: Option<usize>,
    pub last_maneuver: Maneuver,
    pub last_distance_meters: f64,
    pub previous_membership: WaypointMembership,
}

/// Follows a rider along a route and decides what the display should show.
pub struct StepLocator {
    route: Route,
    config: LocatorConfig,
    progress: ProgressState,
}

impl StepLocator {
    /// Starts tracking from `start`, the rider is assumed to be on the first
    /// step. Returns the first thing to display.
    pub fn new(route: Route, start: &GeoPoint, config: LocatorConfig) -> (Self, DisplayUpdate) {
        let previous_membership = WaypointMembership::of(&route, start, config.waypoint_radius_m);
        let mut locator = StepLocator {
            route,
            config,
            progress: ProgressState {
                current_step: Some(0),
                last_maneuver: Maneuver::NoDirection,
                last_distance_meters: 0.0,
                previous_membership,
            },
        };
        let maneuver = locator.displayed_maneuver(Some(0));
        let distance = locator.distance_to_step_end(Some(0), start);
        locator.progress.last_maneuver = maneuver;
        locator.progress.last_distance_meters = distance;
        info!(
            "navigation started on a route of {} steps, showing {maneuver} in {distance:.0}m",
            locator.route.len()
        );
        (locator, to_display_update(maneuver, distance))
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn current_step(&self) -> Option<usize> {
        self.progress.current_step
    }

    /// Feeds a new position. Returns something only when the display needs
    /// to change.
    pub fn update(&mut self, point: &GeoPoint) -> Option<DisplayUpdate> {
        let membership = WaypointMembership::of(&self.route, point, self.config.waypoint_radius_m);
        let mut current = self.progress.current_step;

        // Only react when a waypoint comes into range, lingering next to one
        // must not re-trigger anything.
        let previous = &self.progress.previous_membership;
        if previous.near_end.is_empty() {
            if let Some(&ended) = membership.near_end.last() {
                // arriving at the destination keeps the last step so the
                // display stays on its final maneuver
                current = if ended == self.route.last_index() {
                    Some(ended)
                } else {
                    None
                };
            }
        }
        if previous.near_start.is_empty() {
            if let Some(&started) = membership.near_start.last() {
                current = Some(started);
            }
        }

        let located = match self.locate_within_bounds(point) {
            Some(index) => Some(index),
            // next to a waypoint the strips of both steps may miss the rider
            None if !membership.is_empty() => current,
            None => None,
        };

        if located != self.progress.current_step {
            match located {
                Some(index) => info!("now on step {index}"),
                None => warn!("no step found for {point}"),
            }
        }
        self.progress.current_step = located;
        self.progress.previous_membership = membership;

        let maneuver = self.displayed_maneuver(located);
        let distance = self.distance_to_step_end(located, point);
        let maneuver_changed = maneuver != self.progress.last_maneuver;
        let distance_changed = (distance - self.progress.last_distance_meters).abs()
            > self.config.meters_display_interval;
        if !maneuver_changed && !distance_changed {
            return None;
        }
        self.progress.last_maneuver = maneuver;
        self.progress.last_distance_meters = distance;
        Some(to_display_update(maneuver, distance))
    }

    // Scans the steps from the destination backwards so later steps win ties.
    fn locate_within_bounds(&self, point: &GeoPoint) -> Option<usize> {
        let radius = self.config.waypoint_radius_m;
        let mut best: Option<(usize, f64)> = None;
        for step in self.route.steps().iter().rev() {
            let length = step.length();
            let to_start = step.start.haversine_distance(point);
            let to_end = step.end.haversine_distance(point);
            let near_segment = to_start < radius || (to_start <= length && to_end <= length);
            if !near_segment || to_end < radius {
                continue;
            }
            if !is_point_between_perpendicular_lines(&step.start, &step.end, point)
                || !is_point_in_corridor(&step.start, &step.end, point, self.config.corridor_width_m)
            {
                continue;
            }
            let cross_track = match Line::from_two_points(&step.start, &step.end) {
                Some(line) => distance_to_line(point, &line),
                None => continue,
            };
            match best {
                Some((_, best_cross_track)) if best_cross_track <= cross_track => (),
                _ => best = Some((step.index, cross_track)),
            }
        }
        best.map(|(index, _)| index)
    }

    fn displayed_maneuver(&self, current: Option<usize>) -> Maneuver {
        let index = match current {
            None => return Maneuver::NoDirection,
            Some(index) => index,
        };
        // instructions are shown ahead of the turn
        match self.route.resolved_maneuver(index + 1) {
            Some(maneuver) => maneuver,
            None => match self.config.final_maneuver {
                FinalManeuver::Finish => Maneuver::Finish,
                FinalManeuver::RepeatLast => self
                    .route
                    .resolved_maneuver(index)
                    .unwrap_or(Maneuver::NoDirection),
            },
        }
    }

    fn distance_to_step_end(&self, current: Option<usize>, point: &GeoPoint) -> f64 {
        current
            .and_then(|index| self.route.step(index))
            .map(|step| step.end.haversine_distance(point))
            .unwrap_or(0.0)
    }
}

fn to_display_update(maneuver: Maneuver, distance: f64) -> DisplayUpdate {
    DisplayUpdate {
        maneuver,
        distance_meters: distance.round() as u32,
    }
}
