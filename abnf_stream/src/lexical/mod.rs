//! Lexical analysis: source text to spanned tokens
//!
//! The scanner splits text into raw symbols, the analyzer turns symbols into
//! the tokens grammar rules match against.

pub mod analyzer;
pub mod scanner;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::SpannedToken;

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalMetrics, LexicalResult};
pub use scanner::Scanner;

/// Tokenize with the preferences read from the environment
pub fn tokenize(source: &str) -> LexicalResult<Vec<SpannedToken>> {
    LexicalAnalyzer::new().tokenize(source)
}

/// Tokenize with custom runtime preferences (security boundaries remain compile-time)
pub fn tokenize_with_preferences(
    source: &str,
    preferences: LexicalPreferences,
) -> LexicalResult<Vec<SpannedToken>> {
    LexicalAnalyzer::with_preferences(preferences).tokenize(source)
}

// ============================================================================
// MODULE INITIALIZATION AND VALIDATION
// ============================================================================

/// Check that every lexical error code is registered and the limits are usable
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    let lexical_codes = [
        codes::lexical::INVALID_CHARACTER,
        codes::lexical::UNTERMINATED_STRING,
        codes::lexical::TOO_MANY_TOKENS,
        codes::lexical::SYMBOL_TOO_LONG,
        codes::lexical::UNTERMINATED_COMMENT,
    ];

    for code in &lexical_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    if MAX_TOKEN_COUNT == 0 {
        return Err("MAX_TOKEN_COUNT cannot be zero".to_string());
    }
    if MAX_SYMBOL_LENGTH == 0 {
        return Err("MAX_SYMBOL_LENGTH cannot be zero".to_string());
    }

    crate::log_debug!("Lexical security limits initialized",
        "max_token_count" => MAX_TOKEN_COUNT,
        "max_symbol_length" => MAX_SYMBOL_LENGTH
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Token;

    #[test]
    fn test_module_init() {
        assert!(init_lexical_analysis_logging().is_ok());
    }

    #[test]
    fn test_tokenize_with_preferences() {
        let preferences = LexicalPreferences {
            keep_comments: true,
            include_position_in_errors: false,
        };
        let tokens = tokenize_with_preferences("// hi", preferences).unwrap();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].value, Token::Comment);
        assert_eq!(tokens[1].value, Token::Eof);
    }

    #[test]
    fn test_empty_source_yields_eof() {
        let preferences = LexicalPreferences {
            keep_comments: false,
            include_position_in_errors: true,
        };
        let tokens = tokenize_with_preferences("", preferences).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, Token::Eof);
    }
}
