//! Logging macros taking a code, a message and `"key" => value` context pairs
//!
//! Every macro expands to one `logging::emit` call. The event and its
//! context are built lazily, so a disabled level costs a single check and
//! context values (anything implementing `Display`) are never formatted.

/// Collect `"key" => value` pairs as owned strings
#[doc(hidden)]
#[macro_export]
macro_rules! __log_context {
    ($($key:expr => $value:expr),*) => {
        ::std::vec![$(($key, ::std::format!("{}", $value))),*]
    };
}

// ============================================================================
// ERROR AND SUCCESS MACROS
// ============================================================================

/// Log an error event with its code, an optional span and context
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogLevel::Error,
            || $crate::logging::LogEvent::error($code, $message),
            ::std::option::Option::Some($span),
            || $crate::__log_context!($($key => $value),*),
        )
    };

    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogLevel::Error,
            || $crate::logging::LogEvent::error($code, $message),
            ::std::option::Option::None,
            || $crate::__log_context!($($key => $value),*),
        )
    };
}

/// Log a success event (info level with a success code)
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogLevel::Info,
            || $crate::logging::LogEvent::success($code, $message),
            ::std::option::Option::None,
            || $crate::__log_context!($($key => $value),*),
        )
    };
}

// ============================================================================
// INFO / WARNING / DEBUG MACROS
// ============================================================================

#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogLevel::Info,
            || $crate::logging::LogEvent::info($message),
            ::std::option::Option::None,
            || $crate::__log_context!($($key => $value),*),
        )
    };
}

#[macro_export]
macro_rules! log_warning {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogLevel::Warning,
            || $crate::logging::LogEvent::warning($message),
            ::std::option::Option::None,
            || $crate::__log_context!($($key => $value),*),
        )
    };
}

/// Debug events, optionally carrying a code (`code = ..` first)
#[macro_export]
macro_rules! log_debug {
    (code = $code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogLevel::Debug,
            || $crate::logging::LogEvent::debug_with_code($code, $message),
            ::std::option::Option::None,
            || $crate::__log_context!($($key => $value),*),
        )
    };

    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogLevel::Debug,
            || $crate::logging::LogEvent::debug($message),
            ::std::option::Option::None,
            || $crate::__log_context!($($key => $value),*),
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;
    use crate::utils::{Position, Span};

    #[test]
    fn test_macros_are_safe_without_global_service() {
        let depth: usize = 3;
        log_error!(codes::grammar::RECURSION_LIMIT, "Nested rule refused",
            "depth" => depth,
            "rule" => 7
        );
        log_error!(codes::syntax::UNEXPECTED_END_OF_INPUT, "Input ended",
            span = Span::point(Position::start())
        );
        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "tokens" => 157
        );
        log_info!("Matching", "root" => "declaration");
        log_warning!("Odd input", "index" => 2);
        log_debug!("Nested clone", "depth" => depth);
        log_debug!("plain");
        log_debug!(code = codes::success::RULE_BOUND, "Bound", "rule" => "#4");
    }

    #[test]
    fn test_context_pairs_are_formatted() {
        let context: Vec<(&str, String)> = crate::__log_context!("index" => 4, "token" => "IDENT");
        assert_eq!(
            context,
            [("index", "4".to_string()), ("token", "IDENT".to_string())]
        );
    }
}
