use once_cell::sync::Lazy;
use crate::settings::PainterSettings;

// Default values for configuration
pub const DEFAULT_WORKER_QUEUE_SIZE: usize = 16;

pub struct Config {
    pub worker_queue_size: usize,   // Max paint requests waiting in the worker queue
    pub log_paint_timings: bool,    // Log per-call paint durations
}

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    // Load settings from YAML file
    let settings = PainterSettings::load(None);

    Config {
        worker_queue_size: if settings.worker_queue_size == 0 {
            DEFAULT_WORKER_QUEUE_SIZE
        } else {
            settings.worker_queue_size
        },
        log_paint_timings: settings.log_paint_timings,
    }
});
