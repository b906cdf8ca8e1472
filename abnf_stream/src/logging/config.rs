//! Logging configuration: compile-time bounds plus runtime preferences
//!
//! Security boundaries come from the generated constants and cannot be
//! lowered at runtime.

use crate::config::compile_time::logging::*;
use crate::config::runtime::LoggingPreferences;
use crate::logging::events::LogLevel;
use std::sync::OnceLock;

// ============================================================================
// RUNTIME PREFERENCES STORAGE
// ============================================================================

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Initialize runtime preferences
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    validate_preferences(&preferences)?;

    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized")?;

    Ok(())
}

/// Active logging preferences, read from the environment on first use
pub fn get_runtime_preferences() -> &'static LoggingPreferences {
    RUNTIME_PREFERENCES.get_or_init(LoggingPreferences::default)
}

fn validate_preferences(preferences: &LoggingPreferences) -> Result<(), String> {
    if preferences.enable_file_logging && preferences.log_file_path.is_empty() {
        return Err("File logging enabled without a log file path".to_string());
    }
    Ok(())
}

// ============================================================================
// CONFIGURATION ACCESS FUNCTIONS
// ============================================================================

/// Minimum log level; never stricter than the compile-time security floor
pub fn get_min_log_level() -> LogLevel {
    get_runtime_preferences()
        .min_log_level
        .max(get_security_log_level())
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

pub fn use_file_logging() -> Option<&'static str> {
    let preferences = get_runtime_preferences();
    preferences
        .enable_file_logging
        .then_some(preferences.log_file_path.as_str())
}

/// Security-relevant events are always emitted at this level or lower
pub fn get_security_log_level() -> LogLevel {
    LogLevel::from_u8(SECURITY_MIN_LOG_LEVEL)
}

pub fn get_log_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

/// Validate the compile-time logging constants and the active preferences
pub fn validate_config() -> Result<(), String> {
    validate_preferences(get_runtime_preferences())?;
    if LOG_BUFFER_SIZE == 0 {
        return Err("LOG_BUFFER_SIZE must be greater than zero".to_string());
    }
    if MAX_LOG_MESSAGE_LENGTH < 16 {
        return Err("MAX_LOG_MESSAGE_LENGTH is too small to be useful".to_string());
    }
    Ok(())
}

pub fn get_config_summary() -> String {
    format!(
        "Logging configuration:\n  min level: {}\n  structured: {}\n  console: {}\n  buffer size: {}\n  security floor: {}",
        get_min_log_level().as_str(),
        use_structured_logging(),
        use_console_logging(),
        LOG_BUFFER_SIZE,
        get_security_log_level().as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_level_respects_security_floor() {
        assert!(get_min_log_level() >= get_security_log_level());
    }

    #[test]
    fn test_validate_config() {
        assert!(validate_config().is_ok());
        assert!(get_config_summary().contains("buffer size"));
    }

    #[test]
    fn test_file_logging_requires_path() {
        let preferences = LoggingPreferences {
            enable_file_logging: true,
            log_file_path: String::new(),
            ..LoggingPreferences::default()
        };
        assert!(validate_preferences(&preferences).is_err());
    }
}
