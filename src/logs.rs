use std::{
    fs::{self, File},
    io,
    path::Path,
    sync::{mpsc, Mutex},
    thread,
};

use anyhow::Result;
use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    {ContentLimit, FileRotate},
};
use log::{Level, Log, Metadata, Record};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

const LOG_FILE: &str = "logs/main.log";

// Host app listener for log lines, e.g. a debug screen next to the map.
static HOST_SINK: Mutex<Option<mpsc::Sender<String>>> = Mutex::new(None);

/// Writes every record to the rolling log file and hands a one-line copy to a
/// dispatcher thread, which forwards it to the host if one is listening.
struct NavLogger {
    file: Box<WriteLogger<FileRotate<AppendTimestamp>>>,
    dispatch: Mutex<mpsc::Sender<String>>,
}

impl Log for NavLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.file.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.file.log(record);
        // the dispatcher only stops with the process
        let _ = self.dispatch.lock().unwrap().send(one_line(record));
    }

    fn flush(&self) {
        self.file.flush();
    }
}

// `W step_locator: no step found for (52.2, 21.03)`
fn one_line(record: &Record) -> String {
    let level = match record.level() {
        Level::Error => 'E',
        Level::Warn => 'W',
        Level::Info => 'I',
        Level::Debug => 'D',
        Level::Trace => 'T',
    };
    let target = record.target();
    let module = target.rsplit("::").next().unwrap_or(target);
    format!("{level} {module}: {}", record.args())
}

/// Sets up logging into `<cache_dir>/logs`. Fails if a logger is already
/// installed.
pub fn init(cache_dir: &str) -> Result<()> {
    let log_file = FileRotate::new(
        Path::new(cache_dir).join(LOG_FILE),
        AppendTimestamp::default(FileLimit::MaxFiles(3)),
        ContentLimit::Lines(1000),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();

    let (tx, rx) = mpsc::channel::<String>();
    log::set_boxed_logger(Box::new(NavLogger {
        file: WriteLogger::new(LevelFilter::Info, config, log_file),
        dispatch: Mutex::new(tx),
    }))?;
    log::set_max_level(LevelFilter::Info);

    thread::Builder::new()
        .name("log-dispatch".to_string())
        .spawn(move || {
            for line in rx {
                forward_to_host(line);
            }
        })?;
    Ok(())
}

fn forward_to_host(line: String) {
    let mut sink = HOST_SINK.lock().unwrap();
    if let Some(sender) = sink.as_ref() {
        if sender.send(line).is_err() {
            *sink = None;
        }
    }
}

pub fn set_log_sink(sink: mpsc::Sender<String>) {
    *HOST_SINK.lock().unwrap() = Some(sink);
}

/// Zips the rotated log files of `cache_dir` into `target_file_path`, oldest
/// first, so a rider can attach them to a bug report.
pub fn export(cache_dir: &str, target_file_path: &str) -> Result<()> {
    let log_folder = Path::new(cache_dir).join("logs");
    let mut log_files: Vec<_> = fs::read_dir(&log_folder)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    log_files.sort();

    let mut zip = zip::ZipWriter::new(File::create(target_file_path)?);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    for path in log_files {
        let name = match path.strip_prefix(cache_dir)?.to_str() {
            Some(name) => name.to_string(),
            None => {
                warn!("skipping log file with a non utf-8 name: {path:?}");
                continue;
            }
        };
        zip.start_file(name, options)?;
        io::copy(&mut File::open(&path)?, &mut zip)?;
    }
    zip.finish()?;
    Ok(())
}
