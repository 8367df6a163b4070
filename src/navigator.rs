use crate::geo::GeoPoint;
use crate::gps_processor::{GpsPreprocessor, PositionFix, ProcessResult};
use crate::route::Route;
use crate::step_locator::{DisplayUpdate, LocatorConfig, StepLocator};
use std::sync::mpsc;
use strum_macros::{Display, FromRepr};

/// What the display device is showing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, FromRepr)]
#[strum(serialize_all = "kebab-case")]
#[repr(u8)]
pub enum DisplayMode {
    Nothing = 0,
    Navigation = 1,
    Speedometer = 2,
}

impl DisplayMode {
    pub fn to_int(&self) -> u8 {
        *self as u8
    }
}

/// Whatever shows the directions to the rider.
pub trait DisplaySink {
    fn show(&mut self, update: DisplayUpdate);

    /// Current speed in km/h, sent for every accepted fix that has one.
    fn show_speed(&mut self, _speed_kph: u8) {}

    fn show_mode(&mut self, _mode: DisplayMode) {}
}

impl DisplaySink for Vec<DisplayUpdate> {
    fn show(&mut self, update: DisplayUpdate) {
        self.push(update);
    }
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn show(&mut self, update: DisplayUpdate) {
        (**self).show(update);
    }

    fn show_speed(&mut self, speed_kph: u8) {
        (**self).show_speed(speed_kph);
    }

    fn show_mode(&mut self, mode: DisplayMode) {
        (**self).show_mode(mode);
    }
}

impl DisplaySink for mpsc::Sender<DisplayUpdate> {
    fn show(&mut self, update: DisplayUpdate) {
        // the receiving side going away just means nobody is watching
        if self.send(update).is_err() {
            debug!("display receiver is gone, dropping {update:?}");
        }
    }
}

/// One navigation session at a time: owns the locator of the current route
/// and forwards its updates to the display.
pub struct Navigator<S: DisplaySink> {
    config: LocatorConfig,
    gps_preprocessor: GpsPreprocessor,
    locator: Option<StepLocator>,
    mode: DisplayMode,
    display: S,
}

impl<S: DisplaySink> Navigator<S> {
    pub fn new(config: LocatorConfig, display: S) -> Self {
        Navigator {
            config,
            gps_preprocessor: GpsPreprocessor::new(),
            locator: None,
            mode: DisplayMode::Nothing,
            display,
        }
    }

    /// Replaces whatever route was being followed.
    pub fn start(&mut self, route: Route, start: &GeoPoint) {
        if self.locator.is_some() {
            info!("replacing the current route");
        }
        let (locator, update) = StepLocator::new(route, start, self.config.clone());
        self.locator = Some(locator);
        self.gps_preprocessor = GpsPreprocessor::new();
        // the speedometer stays up until the rider switches it off
        if self.mode == DisplayMode::Nothing {
            self.set_mode(DisplayMode::Navigation);
        }
        self.display.show(update);
    }

    pub fn stop(&mut self) {
        if self.locator.take().is_some() {
            info!("navigation stopped");
        }
        if self.mode == DisplayMode::Navigation {
            self.set_mode(DisplayMode::Nothing);
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Toggles the speedometer. Switching it off goes back to the directions
    /// if a route is being followed. Returns whether the speedometer is on.
    pub fn switch_speedometer(&mut self) -> bool {
        if self.mode == DisplayMode::Speedometer {
            let mode = if self.is_navigating() {
                DisplayMode::Navigation
            } else {
                DisplayMode::Nothing
            };
            self.set_mode(mode);
            false
        } else {
            self.set_mode(DisplayMode::Speedometer);
            true
        }
    }

    fn set_mode(&mut self, mode: DisplayMode) {
        info!("display mode {} -> {mode}", self.mode);
        self.mode = mode;
        self.display.show_mode(mode);
    }

    pub fn is_navigating(&self) -> bool {
        self.locator.is_some()
    }

    pub fn locator(&self) -> Option<&StepLocator> {
        self.locator.as_ref()
    }

    pub fn display(&self) -> &S {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut S {
        &mut self.display
    }

    /// Takes effect with the next route.
    pub fn set_config(&mut self, config: LocatorConfig) {
        self.config = config;
    }

    pub fn on_location_update(&mut self, fix: &PositionFix) -> ProcessResult {
        if self.locator.is_none() && self.mode != DisplayMode::Speedometer {
            debug!("location update without a route");
            return ProcessResult::Ignore;
        }
        // before preprocessing, a broken fix must not move its clock
        let point = match fix.to_geo_point() {
            Ok(point) => point,
            Err(e) => {
                warn!("ignoring fix with bad coordinates: {e}");
                return ProcessResult::Ignore;
            }
        };
        if self.gps_preprocessor.preprocess(fix) == ProcessResult::Ignore {
            debug!("ignoring fix {fix:?}");
            return ProcessResult::Ignore;
        }

        if let Some(speed_kph) = fix.speed_kph() {
            self.display.show_speed(speed_kph);
        }
        if let Some(update) = self
            .locator
            .as_mut()
            .and_then(|locator| locator.update(&point))
        {
            self.display.show(update);
        }
        ProcessResult::Accept
    }
}
