//! Log events emitted by the scanner, grammar engine and driver

use super::codes::{self, Code};
use crate::utils::Span;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Log severity, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Level stored as a number in the generated constants
    pub fn from_u8(level: u8) -> Self {
        match level {
            0 => LogLevel::Error,
            1 => LogLevel::Warning,
            2 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }

    /// Placeholder code for events logged without one
    fn default_code(self) -> Code {
        match self {
            LogLevel::Error => codes::system::INTERNAL_ERROR,
            LogLevel::Warning => Code::new("W000"),
            LogLevel::Info => Code::new("I000"),
            LogLevel::Debug => Code::new("D000"),
        }
    }
}

/// Accepts names in any case (`warn` and `warning` alike) or `0` to `3`
impl FromStr for LogLevel {
    type Err = String;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level.to_ascii_lowercase().as_str() {
            "error" | "0" => Ok(LogLevel::Error),
            "warning" | "warn" | "1" => Ok(LogLevel::Warning),
            "info" | "2" => Ok(LogLevel::Info),
            "debug" | "3" => Ok(LogLevel::Debug),
            _ => Err(format!("unknown log level '{}'", level)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded event. Context keys are kept sorted.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub span: Option<Span>,
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    fn new(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: clip_message(message),
            span: None,
            context: BTreeMap::new(),
        }
    }

    pub fn error(error_code: Code, message: &str) -> Self {
        Self::new(LogLevel::Error, error_code, message)
    }

    pub fn warning(message: &str) -> Self {
        Self::new(LogLevel::Warning, LogLevel::Warning.default_code(), message)
    }

    pub fn info(message: &str) -> Self {
        Self::new(LogLevel::Info, LogLevel::Info.default_code(), message)
    }

    /// Info-level event carrying a success code
    pub fn success(success_code: Code, message: &str) -> Self {
        Self::new(LogLevel::Info, success_code, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::new(LogLevel::Debug, LogLevel::Debug.default_code(), message)
    }

    pub fn debug_with_code(debug_code: Code, message: &str) -> Self {
        Self::new(LogLevel::Debug, debug_code, message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.code.as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.code.as_str()).as_str()
    }

    /// One line: level, code, message and the start of the span if any
    pub fn format(&self) -> String {
        self.to_string()
    }

    /// Multi-line form with the registry metadata of the code
    pub fn format_detailed(&self) -> String {
        let code = self.code.as_str();
        let mut lines = vec![
            self.format(),
            format!("  Category: {}", self.category()),
            format!("  Severity: {}", self.severity()),
        ];

        if self.is_error() {
            lines.push(format!("  Recoverable: {}", codes::is_recoverable(code)));
            lines.push(format!("  Requires halt: {}", codes::requires_halt(code)));
            lines.push(format!("  Recommended action: {}", codes::get_action(code)));
        }

        if !self.context.is_empty() {
            lines.push("  Context:".to_string());
            lines.extend(
                self.context
                    .iter()
                    .map(|(key, value)| format!("    {}: {}", key, value)),
            );
        }

        lines.join("\n")
    }

    /// Single JSON object, one per line in structured sinks
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let code = self.code.as_str();
        let mut json = serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            "level": self.level.as_str(),
            "code": code,
            "message": self.message,
            "category": self.category(),
        });

        if self.is_error() {
            json["error"] = serde_json::json!({
                "description": codes::get_description(code),
                "recoverable": codes::is_recoverable(code),
                "action": codes::get_action(code),
            });
        }

        if let Some(span) = &self.span {
            json["span"] = serde_json::json!({
                "start": [span.start().line, span.start().column],
                "end": [span.end().line, span.end().column],
            });
        }

        if !self.context.is_empty() {
            json["context"] = serde_json::json!(self.context);
        }

        serde_json::to_string(&json)
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} - {}", self.level, self.code, self.message)?;
        if let Some(span) = &self.span {
            write!(f, " at {}:{}", span.start().line, span.start().column)?;
        }
        Ok(())
    }
}

fn clip_message(message: &str) -> String {
    let limit = crate::config::compile_time::logging::MAX_LOG_MESSAGE_LENGTH;
    if message.len() <= limit {
        return message.to_string();
    }
    let cut = (0..=limit)
        .rev()
        .find(|&index| message.is_char_boundary(index))
        .unwrap_or(0);
    format!("{}...", &message[..cut])
}
