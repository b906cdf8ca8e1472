//! Global logging module
//!
//! Thread-safe global logging service with a macro interface. Every entry
//! point is a no-op until `init_global_logging` has run, so library users
//! that never initialize logging pay nothing.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use crate::utils::Span;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, FileLogger, Logger, LoggingService, MemoryLogger};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

fn install(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "logging service is already installed".to_string())
}

/// Install the service described by the `ABNF_LOGGING_*` preferences.
///
/// Fails if a service is already installed, if the preferences are
/// inconsistent, or if the log file cannot be opened.
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("invalid logging configuration: {}", e))?;

    let required = [
        codes::system::INTERNAL_ERROR,
        codes::grammar::RECURSION_LIMIT,
        codes::syntax::UNEXPECTED_TOKEN,
    ];
    if let Some(code) = required
        .iter()
        .find(|code| codes::get_error_metadata(code.as_str()).is_none())
    {
        return Err(format!("no registry entry for code {}", code));
    }

    let service = LoggingService::from_preferences()
        .map_err(|e| format!("cannot open log file: {}", e))?;
    install(Arc::new(service))?;

    crate::log_success!(codes::success::SYSTEM_INITIALIZATION_COMPLETED, "Logging installed",
        "min_level" => config::get_min_log_level()
    );
    Ok(())
}

/// Install a caller-built service, typically a `MemoryLogger` in tests
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    install(service)
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(Arc::as_ref)
}

// ============================================================================
// MACRO SUPPORT
// ============================================================================

/// Record an event built on demand.
///
/// Nothing is constructed unless a global service is installed and would
/// keep events of `level`; the `log_*!` macros expand to this call.
#[doc(hidden)]
pub fn emit<E, C>(level: LogLevel, event: E, span: Option<Span>, context: C)
where
    E: FnOnce() -> LogEvent,
    C: FnOnce() -> Vec<(&'static str, String)>,
{
    let Some(logger) = try_get_global_logger() else {
        return;
    };
    if !logger.should_log(level) {
        return;
    }

    let mut event = event();
    if let Some(span) = span {
        event = event.with_span(span);
    }
    for (key, value) in context() {
        event = event.with_context(key, &value);
    }
    logger.log_event(event);
}

/// Installation state, build profile and logging settings, for `--help`
pub fn get_system_diagnostics() -> String {
    format!(
        "DIAGNOSTICS:\n  Logging installed: {}\n  Limits: {}\n{}",
        is_initialized(),
        crate::config::build_info::source_info(),
        config::get_config_summary()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_logging_initialization() {
        // Another test may already have installed the global service
        let _ = init_global_logging();
        assert!(is_initialized());
        assert!(init_global_logging().is_err());
    }

    #[test]
    fn test_emit_is_lazy_without_service() {
        // Debug events are below the default level, and nothing is
        // recorded at all before initialization
        emit(
            LogLevel::Debug,
            || unreachable!("event built without a service"),
            None,
            || unreachable!("context built without a service"),
        );
    }

    #[test]
    fn test_diagnostics() {
        let diagnostics = get_system_diagnostics();
        assert!(diagnostics.starts_with("DIAGNOSTICS:"));
        assert!(diagnostics.contains("Logging installed:"));
        assert!(diagnostics.contains("Limits: Generated from"));
    }
}
