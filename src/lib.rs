#![allow(clippy::new_without_default)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod api;
pub mod geo;
pub mod gps_processor;
pub mod line;
mod logs;
pub mod maneuver;
pub mod navigator;
pub mod roundabout;
pub mod route;
pub mod share_url;
pub mod step_locator;
