//! Runtime preferences read from `ABNF_*` environment variables
//!
//! These only change presentation and tracing. Resource limits are fixed at
//! compile time in `compile_time`.

use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::OnceLock;

static ENGINE_PREFERENCES: OnceLock<EnginePreferences> = OnceLock::new();
static LEXICAL_PREFERENCES: OnceLock<LexicalPreferences> = OnceLock::new();

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnginePreferences {
    /// Whether to emit a debug event for every token a root rule consumes
    pub trace_matches: bool,

    /// Whether to log creation of nested recursive instances
    pub log_nested_clones: bool,
}

impl Default for EnginePreferences {
    fn default() -> Self {
        Self {
            trace_matches: env_flag(env_vars::ENGINE_TRACE_MATCHES, false),
            log_nested_clones: env_flag(env_vars::ENGINE_LOG_NESTED_CLONES, true),
        }
    }
}

/// Install engine preferences before the first match; later calls fail
pub fn init_engine_preferences(preferences: EnginePreferences) -> Result<(), String> {
    ENGINE_PREFERENCES
        .set(preferences)
        .map_err(|_| "Engine preferences already initialized".to_string())
}

/// Engine preferences, read from the environment on first use
pub fn engine_preferences() -> &'static EnginePreferences {
    ENGINE_PREFERENCES.get_or_init(EnginePreferences::default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalPreferences {
    /// Whether to keep comment tokens in the scanner output
    pub keep_comments: bool,

    /// Whether to show position information in error messages
    pub include_position_in_errors: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            keep_comments: env_flag(env_vars::LEXICAL_KEEP_COMMENTS, false),
            include_position_in_errors: env_flag(env_vars::LEXICAL_INCLUDE_POSITIONS, true),
        }
    }
}

/// Scanner preferences, read from the environment on first use
pub fn lexical_preferences() -> &'static LexicalPreferences {
    LEXICAL_PREFERENCES.get_or_init(LexicalPreferences::default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use JSON lines instead of plain text
    pub use_structured_logging: bool,

    /// Whether to print log events to the console
    pub enable_console_logging: bool,

    /// Minimum level to record
    pub min_log_level: LogLevel,

    /// Whether to also append events to `log_file_path`
    pub enable_file_logging: bool,

    pub log_file_path: String,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        let log_file_path = env::var(env_vars::LOGGING_FILE).unwrap_or_default();
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(LogLevel::Info),
            enable_file_logging: !log_file_path.is_empty(),
            log_file_path,
        }
    }
}

/// Every preference group, for diagnostics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub engine: EnginePreferences,
    pub lexical: LexicalPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Preferences in effect for this process
    pub fn current() -> Self {
        Self {
            engine: engine_preferences().clone(),
            lexical: lexical_preferences().clone(),
            logging: crate::logging::config::get_runtime_preferences().clone(),
        }
    }

    /// Parse a preferences file; every table and key is required
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Engine
    pub const ENGINE_TRACE_MATCHES: &str = "ABNF_TRACE_MATCHES";
    pub const ENGINE_LOG_NESTED_CLONES: &str = "ABNF_LOG_NESTED_CLONES";

    // Lexical
    pub const LEXICAL_KEEP_COMMENTS: &str = "ABNF_LEXICAL_KEEP_COMMENTS";
    pub const LEXICAL_INCLUDE_POSITIONS: &str = "ABNF_LEXICAL_INCLUDE_POSITIONS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "ABNF_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "ABNF_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "ABNF_LOGGING_MIN_LEVEL";
    pub const LOGGING_FILE: &str = "ABNF_LOGGING_FILE";
}
