use std::sync::{mpsc, Mutex, OnceLock};

use crate::geo::GeoPoint;
use crate::gps_processor::{PositionFix, ProcessResult};
use crate::logs;
use crate::maneuver::Maneuver;
use crate::navigator::{DisplayMode, DisplaySink, Navigator};
use crate::route::Route;
use crate::share_url;
use crate::step_locator::{DisplayUpdate, LocatorConfig};
use anyhow::Result;

/// A step as handed over by the host, coordinates in degrees.
#[derive(Clone, Debug)]
pub struct RouteStep {
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub end_latitude: f64,
    pub end_longitude: f64,
    pub maneuver: Option<String>,
}

#[derive(Default)]
struct HostDisplay {
    sender: Option<mpsc::Sender<DisplayUpdate>>,
    speed_sender: Option<mpsc::Sender<u8>>,
    mode_sender: Option<mpsc::Sender<DisplayMode>>,
}

impl DisplaySink for HostDisplay {
    fn show(&mut self, update: DisplayUpdate) {
        match self.sender.as_mut() {
            Some(sender) => sender.show(update),
            None => debug!("no display registered, dropping {update:?}"),
        }
    }

    fn show_speed(&mut self, speed_kph: u8) {
        if let Some(sender) = self.speed_sender.as_ref() {
            if sender.send(speed_kph).is_err() {
                self.speed_sender = None;
            }
        }
    }

    fn show_mode(&mut self, mode: DisplayMode) {
        if let Some(sender) = self.mode_sender.as_ref() {
            if sender.send(mode).is_err() {
                self.mode_sender = None;
            }
        }
    }
}

struct MainState {
    cache_dir: String,
    navigator: Mutex<Navigator<HostDisplay>>,
}

static MAIN_STATE: OnceLock<MainState> = OnceLock::new();

pub fn init(cache_dir: String) {
    let mut already_initialized = true;
    MAIN_STATE.get_or_init(|| {
        already_initialized = false;
        if let Err(e) = logs::init(&cache_dir) {
            eprintln!("failed to initialize logging: {e}");
        }
        info!("initialized");

        MainState {
            cache_dir,
            navigator: Mutex::new(Navigator::new(
                LocatorConfig::default(),
                HostDisplay::default(),
            )),
        }
    });
    if already_initialized {
        warn!("`init` is called multiple times");
    }
}

fn get() -> &'static MainState {
    MAIN_STATE.get().expect("main state is not initialized")
}

pub fn set_display_sink(sender: mpsc::Sender<DisplayUpdate>) {
    get().navigator.lock().unwrap().display_mut().sender = Some(sender);
}

pub fn set_speed_sink(sender: mpsc::Sender<u8>) {
    get().navigator.lock().unwrap().display_mut().speed_sender = Some(sender);
}

pub fn set_mode_sink(sender: mpsc::Sender<DisplayMode>) {
    get().navigator.lock().unwrap().display_mut().mode_sender = Some(sender);
}

pub fn set_log_sink(sender: mpsc::Sender<String>) {
    logs::set_log_sink(sender);
}

/// Used by the next `start_navigation*` call.
pub fn set_locator_config(config_json: String) -> Result<()> {
    let config = LocatorConfig::from_json_str(&config_json)?;
    get().navigator.lock().unwrap().set_config(config);
    Ok(())
}

pub fn start_navigation(
    steps: Vec<RouteStep>,
    start_latitude: f64,
    start_longitude: f64,
) -> Result<()> {
    let segments = steps
        .into_iter()
        .map(|step| {
            Ok((
                GeoPoint::from_degrees(step.start_latitude, step.start_longitude)?,
                GeoPoint::from_degrees(step.end_latitude, step.end_longitude)?,
                Maneuver::from_tag(step.maneuver.as_deref()),
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    let route = Route::new(segments)?;
    let start = GeoPoint::from_degrees(start_latitude, start_longitude)?;
    get().navigator.lock().unwrap().start(route, &start);
    Ok(())
}

pub fn start_navigation_from_directions_json(
    json: String,
    start_latitude: f64,
    start_longitude: f64,
) -> Result<()> {
    let route = Route::from_directions_json(&json)?;
    let start = GeoPoint::from_degrees(start_latitude, start_longitude)?;
    get().navigator.lock().unwrap().start(route, &start);
    Ok(())
}

pub fn on_location_update(mut fixes: Vec<PositionFix>) {
    // NOTE: fixes can come in batches that are not in order.
    fixes.sort_by_key(|fix| fix.timestamp_ms);

    // handle the whole batch with one lock
    let mut navigator = get().navigator.lock().unwrap();
    let ignored = fixes
        .iter()
        .filter(|fix| navigator.on_location_update(fix) == ProcessResult::Ignore)
        .count();
    if ignored > 0 {
        debug!("ignored {ignored} of {} fixes", fixes.len());
    }
}

pub fn stop_navigation() {
    get().navigator.lock().unwrap().stop();
}

pub fn is_navigating() -> bool {
    get().navigator.lock().unwrap().is_navigating()
}

/// Returns whether the speedometer is now on.
pub fn switch_speedometer() -> bool {
    get().navigator.lock().unwrap().switch_speedometer()
}

pub fn display_mode() -> DisplayMode {
    get().navigator.lock().unwrap().mode()
}

pub fn find_share_place_url(text: String) -> Option<String> {
    share_url::find_share_place_url(&text).map(str::to_string)
}

/// `(latitude, longitude)` of the destination in a resolved share-place URL.
pub fn destination_from_share_url(url: String) -> Option<(f64, f64)> {
    share_url::destination_from_share_url(&url).map(|point| point.to_degrees())
}

pub fn export_logs(target_file_path: String) -> Result<()> {
    logs::export(&get().cache_dir, &target_file_path)
}
