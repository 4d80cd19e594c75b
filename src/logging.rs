use std::fs::{self, OpenOptions};

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::Settings;

/// Route `log` records to the file named in `settings` (default
/// ~/.local/share/ubash/ubash.log).
/// Best-effort: failures are silently ignored (logging must never block the shell).
pub fn init(settings: &Settings) {
    let level = settings.log_level_filter();
    if level == LevelFilter::Off {
        return;
    }

    let path = settings.log_path();
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .build();
    let _ = WriteLogger::init(level, config, file);
}
