/*
Logging setup for applications embedding the painter.

The library itself only emits records through the `log` macros. `setup_logger()`
installs a composite logger:
- a colored `env_logger` console logger (RUST_LOG overrides the defaults;
  debug builds show DEBUG and above, release builds ERROR only)
- an in-memory circular buffer of the last 1000 painter records, which can be
  read back with `recent_logs()` or written out with `export_debug_logs()`
*/

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use env_logger::fmt::{Color, Formatter};
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

const MAX_LOG_LINES: usize = 1000;
const LOG_TARGET: &str = "label_painter";

pub type LogBuffer = Arc<Mutex<VecDeque<String>>>;

struct BufferLogger {
    log_buffer: LogBuffer,
}

impl BufferLogger {
    fn new() -> Self {
        Self {
            log_buffer: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_LINES))),
        }
    }

    fn log_to_buffer(&self, message: &str, target: &str, line: Option<u32>) {
        let Ok(mut buffer) = self.log_buffer.lock() else {
            return;
        };
        if buffer.len() == MAX_LOG_LINES {
            buffer.pop_front();
        }

        let formatted_message = if let Some(line_num) = line {
            format!("{target}:{line_num} {message}")
        } else {
            format!("{target} {message}")
        };

        buffer.push_back(formatted_message);
    }

    fn get_shared_buffer(&self) -> LogBuffer {
        Arc::clone(&self.log_buffer)
    }
}

impl log::Log for BufferLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with(LOG_TARGET) && metadata.level() <= LevelFilter::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("{:<5} {}", record.level(), record.args());
            self.log_to_buffer(&message, record.target(), record.line());
        }
    }

    fn flush(&self) {}
}

struct CompositeLogger {
    console_logger: env_logger::Logger,
    buffer_logger: BufferLogger,
}

impl log::Log for CompositeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.console_logger.enabled(metadata) || self.buffer_logger.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.console_logger.enabled(record.metadata()) {
            self.console_logger.log(record);
        }
        if self.buffer_logger.enabled(record.metadata()) {
            self.buffer_logger.log(record);
        }
    }

    fn flush(&self) {
        self.console_logger.flush();
        self.buffer_logger.flush();
    }
}

fn build_console_logger() -> env_logger::Logger {
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_env("RUST_LOG");
    } else if cfg!(debug_assertions) {
        builder.filter(Some(LOG_TARGET), LevelFilter::Debug);
    } else {
        builder.filter(Some(LOG_TARGET), LevelFilter::Error);
    }

    builder.format(|buf: &mut Formatter, record: &Record| {
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ");

        let module_info = match (record.module_path(), record.line()) {
            (Some(module), Some(line)) => format!("{module}:{line}"),
            (Some(module), None) => module.to_string(),
            (None, Some(line)) => format!("line:{line}"),
            (None, None) => "unknown".to_string(),
        };

        let mut level_style = buf.style();
        let mut meta_style = buf.style();

        match record.level() {
            Level::Error => level_style.set_color(Color::Red).set_bold(true),
            Level::Warn => level_style.set_color(Color::Yellow).set_bold(true),
            Level::Info => level_style.set_color(Color::Green).set_bold(true),
            Level::Debug => level_style.set_color(Color::Blue).set_bold(true),
            Level::Trace => level_style.set_color(Color::White),
        };
        meta_style.set_color(Color::Rgb(120, 120, 120));

        writeln!(
            buf,
            "{} {} {} {}",
            meta_style.value(timestamp),
            level_style.value(record.level()),
            meta_style.value(module_info),
            record.args()
        )
    });

    builder.build()
}

/// Install the console + buffer logger and return the shared buffer
///
/// Fails if another logger was already installed.
pub fn setup_logger() -> Result<LogBuffer, SetLoggerError> {
    let buffer_logger = BufferLogger::new();
    let shared_buffer = buffer_logger.get_shared_buffer();

    let composite_logger = CompositeLogger {
        console_logger: build_console_logger(),
        buffer_logger,
    };

    log::set_boxed_logger(Box::new(composite_logger))?;

    // Always set the maximum level to Trace so that filtering works correctly
    log::set_max_level(LevelFilter::Trace);

    Ok(shared_buffer)
}

/// Snapshot of the buffered log lines, oldest first
pub fn recent_logs(log_buffer: &LogBuffer) -> Vec<String> {
    log_buffer
        .lock()
        .map(|buffer| buffer.iter().cloned().collect())
        .unwrap_or_default()
}

pub fn get_log_directory(app_name: &str) -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join(app_name).join("logs")
}

/// Write the buffered log lines to `<data_dir>/<app_name>/logs/debug.log`
pub fn export_debug_logs(app_name: &str, log_buffer: &LogBuffer) -> Result<PathBuf, std::io::Error> {
    let log_dir_path = get_log_directory(app_name);
    std::fs::create_dir_all(&log_dir_path)?;

    let debug_log_path = log_dir_path.join("debug.log");
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&debug_log_path)?;

    writeln!(file, "# exported {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;
    for line in recent_logs(log_buffer) {
        writeln!(file, "{}", line)?;
    }
    file.flush()?;

    Ok(debug_log_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_buffer_keeps_painter_records_only() {
        let logger = BufferLogger::new();
        let buffer = logger.get_shared_buffer();

        logger.log(
            &Record::builder()
                .target("label_painter::painter")
                .level(Level::Debug)
                .line(Some(12))
                .args(format_args!("painted"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .target("tokio::runtime")
                .level(Level::Debug)
                .args(format_args!("ignored"))
                .build(),
        );

        let lines = recent_logs(&buffer);
        assert_eq!(lines, vec!["label_painter::painter:12 DEBUG painted".to_string()]);
    }

    #[test]
    fn test_buffer_is_circular() {
        let logger = BufferLogger::new();
        for i in 0..(MAX_LOG_LINES + 5) {
            logger.log_to_buffer(&format!("line {}", i), LOG_TARGET, None);
        }
        let lines = recent_logs(&logger.get_shared_buffer());
        assert_eq!(lines.len(), MAX_LOG_LINES);
        assert_eq!(lines[0], format!("{} line 5", LOG_TARGET));
    }
}
