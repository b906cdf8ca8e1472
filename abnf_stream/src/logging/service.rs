//! Logging service and the sinks it fans events out to

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Destination for events that passed the service's level filter
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

// Sinks must keep working after a thread panicked while holding their lock
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Filters by level and forwards to every sink; no sinks means events are dropped
pub struct LoggingService {
    sinks: Vec<Arc<dyn Logger>>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self {
            sinks: vec![logger],
            min_level,
        }
    }

    /// Build the sinks selected by the runtime logging preferences
    pub fn from_preferences() -> io::Result<Self> {
        let structured = config::use_structured_logging();
        let mut service = Self {
            sinks: Vec::new(),
            min_level: config::get_min_log_level(),
        };

        if config::use_console_logging() {
            let console = if structured {
                ConsoleLogger::json()
            } else {
                ConsoleLogger::text()
            };
            service = service.with_sink(Arc::new(console));
        }
        if let Some(path) = config::use_file_logging() {
            service = service.with_sink(Arc::new(FileLogger::open(path, structured)?));
        }

        Ok(service)
    }

    pub fn with_sink(mut self, logger: Arc<dyn Logger>) -> Self {
        self.sinks.push(logger);
        self
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if !self.should_log(event.level) {
            return;
        }
        for sink in &self.sinks {
            sink.log(&event);
        }
    }
}

fn render(event: &LogEvent, structured: bool) -> String {
    if structured {
        event.format_json().unwrap_or_else(|_| event.format())
    } else {
        event.format()
    }
}

/// Errors go to stderr, everything else to stdout
pub struct ConsoleLogger {
    structured: bool,
}

impl ConsoleLogger {
    pub fn text() -> Self {
        Self { structured: false }
    }

    /// One JSON object per line
    pub fn json() -> Self {
        Self { structured: true }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        let line = render(event, self.structured);
        if event.is_error() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// Appends to a file kept open for the life of the sink
pub struct FileLogger {
    file: Mutex<File>,
    structured: bool,
}

impl FileLogger {
    /// Creates missing parent directories
    pub fn open<P: AsRef<Path>>(path: P, structured: bool) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            file: Mutex::new(file),
            structured,
        })
    }
}

impl Logger for FileLogger {
    fn log(&self, event: &LogEvent) {
        let line = render(event, self.structured);
        // A failing log write has nowhere to be reported
        let _ = writeln!(lock(&self.file), "{}", line);
    }
}

/// Keeps the most recent events in memory, bounded by `LOG_BUFFER_SIZE`
#[derive(Default)]
pub struct MemoryLogger {
    events: Mutex<VecDeque<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        lock(&self.events).iter().cloned().collect()
    }

    pub fn clear(&self) {
        lock(&self.events).clear();
    }

    pub fn event_count(&self) -> usize {
        lock(&self.events).len()
    }

    pub fn count_at(&self, level: LogLevel) -> usize {
        lock(&self.events)
            .iter()
            .filter(|event| event.level == level)
            .count()
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.collect(LogEvent::is_error)
    }

    pub fn get_events_with_code(&self, code: Code) -> Vec<LogEvent> {
        self.collect(|event| event.code == code)
    }

    pub fn has_error_with_code(&self, code: Code) -> bool {
        lock(&self.events)
            .iter()
            .any(|event| event.is_error() && event.code == code)
    }

    fn collect<F: Fn(&LogEvent) -> bool>(&self, keep: F) -> Vec<LogEvent> {
        lock(&self.events)
            .iter()
            .filter(|event| keep(event))
            .cloned()
            .collect()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = lock(&self.events);
        while events.len() >= config::get_log_buffer_size() {
            events.pop_front();
        }
        events.push_back(event.clone());
    }
}
