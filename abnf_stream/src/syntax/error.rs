//! Errors raised while driving a token stream through a grammar
//!
//! Rules themselves only answer `Reject`; the driver turns a rejection at the
//! root into a located error.

use crate::config::compile_time::grammar::MAX_RECURSION_DEPTH;
use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::tokens::Token;
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unexpected token {found} (token {index}) at {span}")]
    UnexpectedToken {
        found: Token,
        index: usize,
        span: Span,
    },

    #[error("Unexpected end of input at {span}: the match is incomplete")]
    UnexpectedEndOfInput { span: Span },

    #[error("Grammar recursion limit ({MAX_RECURSION_DEPTH}) exceeded at token {index}, {span}")]
    RecursionLimit { index: usize, span: Span },

    #[error("Unknown production '{name}'")]
    UnknownProduction { name: String },

    #[error(transparent)]
    Lexical(#[from] LexerError),
}

impl SyntaxError {
    pub fn unexpected_token(found: Token, index: usize, span: Span) -> Self {
        Self::UnexpectedToken { found, index, span }
    }

    pub fn unexpected_end_of_input(span: Span) -> Self {
        Self::UnexpectedEndOfInput { span }
    }

    pub fn recursion_limit(index: usize, span: Span) -> Self {
        Self::RecursionLimit { index, span }
    }

    pub fn unknown_production(name: &str) -> Self {
        Self::UnknownProduction {
            name: name.to_string(),
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::UnexpectedEndOfInput { .. } => codes::syntax::UNEXPECTED_END_OF_INPUT,
            Self::RecursionLimit { .. } => codes::syntax::RECURSION_LIMIT_EXCEEDED,
            Self::UnknownProduction { .. } => codes::syntax::UNKNOWN_PRODUCTION,
            Self::Lexical(error) => error.error_code(),
        }
    }

    /// Get span if available
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEndOfInput { span }
            | Self::RecursionLimit { span, .. } => Some(*span),
            Self::UnknownProduction { .. } => None,
            Self::Lexical(error) => Some(error.span()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn test_error_codes_and_spans() {
        let span = Span::new(Position::new(4, 1, 5), Position::new(7, 1, 8));
        let error = SyntaxError::unexpected_token(Token::Semicolon, 2, span);

        assert_eq!(error.error_code(), codes::syntax::UNEXPECTED_TOKEN);
        assert_eq!(error.span(), Some(span));
        assert_eq!(error.to_string(), "Unexpected token ; (token 2) at 1:5-8");

        let error = SyntaxError::unknown_production("statement");
        assert_eq!(error.span(), None);
        assert_eq!(error.error_code().as_str(), "E053");
    }

    #[test]
    fn test_lexical_errors_convert() {
        let span = Span::point(Position::start());
        let error: SyntaxError = LexerError::UnterminatedString { span }.into();

        assert_eq!(error.error_code(), codes::lexical::UNTERMINATED_STRING);
        assert_eq!(error.span(), Some(span));
        assert_eq!(error.to_string(), "Unterminated string literal");
    }
}
