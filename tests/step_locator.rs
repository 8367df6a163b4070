pub mod test_utils;

use bikenav_core::maneuver::Maneuver;
use bikenav_core::route::Route;
use bikenav_core::step_locator::{DisplayUpdate, FinalManeuver, LocatorConfig, StepLocator};
use std::fs;
use test_utils::{pt, scenario_start, scenario_walk, three_step_route, A, B, C, D};

fn ride(config: LocatorConfig) -> Vec<DisplayUpdate> {
    let (mut locator, first) = StepLocator::new(three_step_route(), &scenario_start(), config);
    let mut updates = vec![first];
    for point in scenario_walk() {
        if let Some(update) = locator.update(&point) {
            updates.push(update);
        }
    }
    updates
}

fn maneuver_sequence(updates: &[DisplayUpdate]) -> Vec<Maneuver> {
    let mut maneuvers: Vec<Maneuver> = updates.iter().map(|u| u.maneuver).collect();
    maneuvers.dedup();
    maneuvers
}

#[test]
fn initial_update() {
    test_utils::init_logger();
    let (locator, update) =
        StepLocator::new(three_step_route(), &scenario_start(), LocatorConfig::default());
    assert_eq!(update.maneuver, Maneuver::TurnLeft);
    assert!((504..=508).contains(&update.distance_meters));
    assert_eq!(locator.current_step(), Some(0));
}

#[test]
fn ride_whole_route() {
    test_utils::init_logger();
    let updates = ride(LocatorConfig::default());
    assert_eq!(
        maneuver_sequence(&updates),
        vec![Maneuver::TurnLeft, Maneuver::Straight, Maneuver::Finish]
    );
    let last = updates.last().unwrap();
    assert_eq!(last.maneuver, Maneuver::Finish);
    assert!(last.distance_meters < 10);
    // the countdown is shown, not only the maneuver changes
    assert!(updates.len() > 100);
}

#[test]
fn ride_is_deterministic() {
    assert_eq!(ride(LocatorConfig::default()), ride(LocatorConfig::default()));
}

#[test]
fn repeat_last_maneuver() {
    let config = LocatorConfig {
        final_maneuver: FinalManeuver::RepeatLast,
        ..LocatorConfig::default()
    };
    assert_eq!(
        maneuver_sequence(&ride(config)),
        vec![Maneuver::TurnLeft, Maneuver::Straight]
    );
}

#[test]
fn small_moves_are_not_shown() {
    let start = pt(A.0, A.1);
    let (mut locator, first) =
        StepLocator::new(three_step_route(), &start, LocatorConfig::default());
    assert_eq!(first.distance_meters, 500);

    let update = locator.update(&pt(A.0 + 0.0009, A.1)).unwrap();
    assert_eq!(update.maneuver, Maneuver::TurnLeft);
    assert_eq!(update.distance_meters, 400);

    // 1.5m further
    assert_eq!(locator.update(&pt(A.0 + 0.0009135, A.1)), None);

    // 2.5m from the last shown position
    let update = locator.update(&pt(A.0 + 0.0009225, A.1)).unwrap();
    assert_eq!(update.maneuver, Maneuver::TurnLeft);
    assert_eq!(update.distance_meters, 398);
}

#[test]
fn off_route() {
    test_utils::init_logger();
    let start = pt(A.0, A.1);
    let (mut locator, _) = StepLocator::new(three_step_route(), &start, LocatorConfig::default());

    // 2km east
    let update = locator.update(&pt(A.0, A.1 + 0.03)).unwrap();
    assert_eq!(
        update,
        DisplayUpdate {
            maneuver: Maneuver::NoDirection,
            distance_meters: 0
        }
    );
    assert_eq!(locator.current_step(), None);
    assert_eq!(locator.update(&pt(A.0, A.1 + 0.0301)), None);

    // back on the first step
    let update = locator.update(&pt(A.0 + 0.001, A.1)).unwrap();
    assert_eq!(update.maneuver, Maneuver::TurnLeft);
    assert_eq!(locator.current_step(), Some(0));
}

#[test]
fn wide_corridor_keeps_the_step() {
    let start = pt(A.0, A.1);
    let (mut locator, _) = StepLocator::new(three_step_route(), &start, LocatorConfig::default());
    // about 34m off the line
    let update = locator.update(&pt(A.0 + 0.001, A.1 + 0.0005)).unwrap();
    assert_eq!(update.maneuver, Maneuver::TurnLeft);
    assert_eq!(locator.current_step(), Some(0));
}

#[test]
fn resolved_roundabout_is_shown() {
    let json = fs::read_to_string("./tests/data/directions_roundabout.json").unwrap();
    let route = Route::from_directions_json(&json).unwrap();
    let start = route.step(1).unwrap().start.clone();
    let (locator, update) = StepLocator::new(route, &start, LocatorConfig::default());
    assert_eq!(locator.current_step(), Some(0));
    // the rider starts right at the end of the first step
    assert_eq!(update.maneuver, Maneuver::TurnLeft);

    let route = locator.route().clone();
    let start = route.step(1).unwrap().end.clone();
    let (mut locator, _) = StepLocator::new(route.clone(), &start, LocatorConfig::default());
    // halfway down the roundabout approach
    let middle = route.step(1).unwrap().start.midpoint(&route.step(1).unwrap().end);
    let update = locator.update(&middle);
    assert_eq!(locator.current_step(), Some(1));
    assert_eq!(update.unwrap().maneuver, Maneuver::RoundaboutLeft);
}

#[test]
fn nearest_step_wins_around_a_corner() {
    let (mut locator, _) =
        StepLocator::new(three_step_route(), &pt(A.0, A.1), LocatorConfig::default());

    // inside the strips of both the first and the second step, closer to the first
    let update = locator.update(&pt(52.2040, 20.9995)).unwrap();
    assert_eq!(locator.current_step(), Some(0));
    assert_eq!(update.maneuver, Maneuver::TurnLeft);
    assert_eq!(update.distance_meters, 65);

    // closer to the second
    let update = locator.update(&pt(52.2042, 20.9990)).unwrap();
    assert_eq!(locator.current_step(), Some(1));
    assert_eq!(update.maneuver, Maneuver::Straight);
    assert_eq!(update.distance_meters, 431);
}

#[test]
fn later_step_wins_a_tie() {
    // out and back along the same street, then east
    let route = Route::new(vec![
        (pt(A.0, A.1), pt(B.0, B.1), Maneuver::Straight),
        (pt(B.0, B.1), pt(A.0, A.1), Maneuver::UturnLeft),
        (pt(A.0, A.1), pt(A.0, 21.005), Maneuver::TurnRight),
    ])
    .unwrap();
    let (mut locator, _) = StepLocator::new(route, &pt(A.0, A.1), LocatorConfig::default());

    let update = locator.update(&pt(52.20225, 21.0002)).unwrap();
    assert_eq!(locator.current_step(), Some(1));
    assert_eq!(update.maneuver, Maneuver::TurnRight);
    assert_eq!(update.distance_meters, 251);
}

#[test]
fn lingering_at_a_waypoint_does_not_retrigger() {
    // a loop that comes back south to end next to B
    let e = (52.2081, 21.0001);
    let f = (52.20445, 21.0001);
    let route = Route::new(vec![
        (pt(A.0, A.1), pt(B.0, B.1), Maneuver::Straight),
        (pt(B.0, B.1), pt(C.0, C.1), Maneuver::TurnLeft),
        (pt(C.0, C.1), pt(D.0, D.1), Maneuver::TurnRight),
        (pt(D.0, D.1), pt(e.0, e.1), Maneuver::TurnRight),
        (pt(e.0, e.1), pt(f.0, f.1), Maneuver::TurnRight),
        (pt(f.0, f.1), pt(52.20445, 21.01), Maneuver::TurnLeft),
    ])
    .unwrap();
    let (mut locator, _) = StepLocator::new(route, &pt(A.0, A.1), LocatorConfig::default());

    // next to B but on the way back south, 13m before the end of that step
    let update = locator.update(&pt(52.20456, 21.00003)).unwrap();
    assert_eq!(locator.current_step(), Some(4));
    assert_eq!(update.distance_meters, 13);
    assert_eq!(locator.progress().previous_membership.near_end, vec![0]);
    assert_eq!(locator.progress().previous_membership.near_start, vec![1]);

    // still next to B, now also next to the end of step 4 and past its strip;
    // waypoints already in range do not move the rider
    locator.update(&pt(52.20443, 21.00003));
    assert_eq!(locator.current_step(), Some(4));
    assert_eq!(locator.progress().previous_membership.near_end, vec![0, 4]);
    assert_eq!(locator.progress().previous_membership.near_start, vec![1, 5]);
}

#[test]
fn overshooting_a_corner() {
    let (mut locator, _) =
        StepLocator::new(three_step_route(), &pt(A.0, A.1), LocatorConfig::default());
    locator.update(&pt(52.2040, 21.0));

    // 16m straight on past B, outside every strip and waypoint
    let update = locator.update(&pt(B.0 + 0.000144, B.1)).unwrap();
    assert_eq!(locator.current_step(), None);
    assert_eq!(
        update,
        DisplayUpdate {
            maneuver: Maneuver::NoDirection,
            distance_meters: 0
        }
    );

    // back within reach of the corner, the next step is picked up
    let update = locator.update(&pt(B.0 + 0.00005, B.1 - 0.0001)).unwrap();
    assert_eq!(locator.current_step(), Some(1));
    assert_eq!(update.maneuver, Maneuver::Straight);
}
