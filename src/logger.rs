use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{Mutex, OnceLock};

use chrono::Local;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Appends log lines to a file. The terminal is owned by the game screen,
/// so nothing is ever printed to stdout.
pub struct Logger {
    file: Mutex<File>,
}

impl Logger {
    fn new(file: File) -> Self {
        Self { file: Mutex::new(file) }
    }

    pub fn log(&self, file: &str, line: u32, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let file_name = file.rsplit(['/', '\\']).next().unwrap_or(file);
        if let Ok(mut out) = self.file.lock() {
            let _ = writeln!(out, "[{}][{}:{}] {}", timestamp, file_name, line, message);
        }
    }
}

/// Without a path logging stays disabled.
pub fn init_logger(path: Option<&str>) -> Result<(), String> {
    let path = match path {
        Some(path) => path,
        None => return Ok(()),
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("Failed to open log file {}: {}", path, e))?;

    LOGGER.get_or_init(|| Logger::new(file));
    Ok(())
}

pub fn log(file: &str, line: u32, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(file, line, message);
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(file!(), line!(), &format!($($arg)*))
    };
}
