//! Reference values for the compile-time limits.
//!
//! The live values are generated by build.rs from `config/<profile>.toml`
//! and exposed as `crate::config::compile_time`; this module documents the
//! development defaults and the intent behind each limit.

pub mod compile_time {
    pub mod grammar {
        /// Maximum number of rule nodes in one grammar arena, nested clones included
        /// SECURITY: Bounds memory growth from recursive inputs
        pub const MAX_RULES: usize = 100_000;

        /// Maximum nesting of lazily created recursive instances
        /// SECURITY: Prevents DoS via deeply nested input such as `array[array[...]]`
        pub const MAX_RECURSION_DEPTH: usize = 256;
    }

    pub mod lexical {
        /// Maximum tokens produced from a single input
        /// SECURITY: Prevents DoS via token explosion
        pub const MAX_TOKEN_COUNT: usize = 1_000_000;

        /// Maximum length of one raw symbol
        /// SECURITY: Prevents enormous identifiers and literals
        pub const MAX_SYMBOL_LENGTH: usize = 4_096;
    }

    pub mod syntax {
        /// Maximum errors retained by a matcher
        /// RESOURCE: Controls memory usage for error tracking
        pub const MAX_ERROR_HISTORY: usize = 50;

        /// Maximum per-token steps retained in a match report
        /// RESOURCE: Bounds report size for huge inputs
        pub const MAX_REPORTED_STEPS: usize = 100_000;
    }

    pub mod logging {
        /// In-memory log buffer size
        pub const LOG_BUFFER_SIZE: usize = 10_000;

        /// Maximum log message length before truncation
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 10_000;

        /// Minimum log level for security events (cannot be changed at runtime)
        pub const SECURITY_MIN_LOG_LEVEL: u8 = 1; // Warning level minimum
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_development_profile_matches_reference() {
        if crate::config::build_info::profile() != "development" {
            return;
        }
        assert_eq!(
            super::compile_time::grammar::MAX_RECURSION_DEPTH,
            crate::config::compile_time::grammar::MAX_RECURSION_DEPTH
        );
        assert_eq!(
            super::compile_time::lexical::MAX_TOKEN_COUNT,
            crate::config::compile_time::lexical::MAX_TOKEN_COUNT
        );
    }
}
