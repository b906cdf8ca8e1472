//! Consumer side of the engine: feeding token streams to a root rule
//!
//! - [`Matcher`] drives one root rule token by token and locates rejections.
//! - [`match_tokens`] runs a whole stream and returns a [`MatchReport`].
//! - [`Library`] is the reference grammar for declarations.

pub mod driver;
pub mod error;
pub mod library;

use crate::config::compile_time::syntax::*;
use crate::lexical;
use crate::logging::codes;

pub use driver::{match_tokens, MatchReport, MatchStep, Matcher};
pub use error::{SyntaxError, SyntaxResult};
pub use library::{Library, PRODUCTIONS};

/// Tokenize `source` and match it against a production of the reference grammar
pub fn match_source(source: &str, production: &str) -> SyntaxResult<MatchReport> {
    let mut library = Library::new();
    let root = library.require(production)?;
    let tokens = lexical::tokenize(source)?;

    crate::log_info!("Matching source",
        "production" => production,
        "tokens" => tokens.len()
    );

    match_tokens(library.grammar_mut(), root, &tokens)
}

// ============================================================================
// MODULE INITIALIZATION AND VALIDATION
// ============================================================================

/// Check that every syntax error code is registered and the limits are usable
pub fn init_syntax_logging() -> Result<(), String> {
    let syntax_codes = [
        codes::syntax::UNEXPECTED_TOKEN,
        codes::syntax::UNEXPECTED_END_OF_INPUT,
        codes::syntax::RECURSION_LIMIT_EXCEEDED,
        codes::syntax::UNKNOWN_PRODUCTION,
    ];

    for code in &syntax_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Syntax error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    if MAX_ERROR_HISTORY == 0 {
        return Err("MAX_ERROR_HISTORY cannot be zero".to_string());
    }

    crate::log_debug!("Syntax limits initialized",
        "max_error_history" => MAX_ERROR_HISTORY,
        "max_reported_steps" => MAX_REPORTED_STEPS
    );

    Ok(())
}
