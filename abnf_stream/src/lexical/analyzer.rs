//! Lexical analyzer: classifies scanner symbols into grammar tokens
//!
//! Whitespace and line breaks never reach the grammar. Comments are
//! dropped unless the lexical preferences ask to keep them. Every token
//! carries its source span and the stream always ends with `Token::Eof`.

use super::scanner::Scanner;
use crate::config::compile_time::lexical::{MAX_SYMBOL_LENGTH, MAX_TOKEN_COUNT};
use crate::config::runtime::{lexical_preferences, LexicalPreferences};
use crate::logging::codes;
use crate::tokens::{SpannedToken, Token};
use crate::utils::{Span, Spanned};
use crate::{log_debug, log_error, log_success};
use serde::Serialize;

/// Lexical analysis errors with compile-time security boundaries
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Invalid character '{character}' in symbol '{symbol}'")]
    InvalidCharacter {
        character: char,
        symbol: String,
        span: Span,
    },

    #[error("Unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("Unterminated block comment")]
    UnterminatedComment { span: Span },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize, span: Span },

    #[error("Symbol too long: {length} bytes (max {MAX_SYMBOL_LENGTH})")]
    SymbolTooLong { length: usize, span: Span },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexerError::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            LexerError::UnterminatedComment { .. } => codes::lexical::UNTERMINATED_COMMENT,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
            LexerError::SymbolTooLong { .. } => codes::lexical::SYMBOL_TOO_LONG,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            LexerError::InvalidCharacter { span, .. }
            | LexerError::UnterminatedString { span }
            | LexerError::UnterminatedComment { span }
            | LexerError::TooManyTokens { span, .. }
            | LexerError::SymbolTooLong { span, .. } => *span,
        }
    }
}

pub type LexicalResult<T> = Result<T, LexerError>;

/// Counts gathered during one tokenization
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub literal_tokens: usize,
    pub operator_tokens: usize,
    pub type_tokens: usize,
    pub comment_count: usize,
    pub trivia_symbols: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: Token) {
        self.total_tokens += 1;

        match token {
            t if t.is_keyword() => self.keyword_tokens += 1,
            t if t.is_operator() => self.operator_tokens += 1,
            t if t.is_literal() => self.literal_tokens += 1,
            t if t.is_type() => self.type_tokens += 1,
            Token::Ident | Token::Member | Token::Members => self.identifier_tokens += 1,
            _ => {}
        }
    }
}

/// Tokenizer holding the preferences and metrics of the last run
pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(lexical_preferences().clone())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Tokenize `source`, ending the stream with a zero-width `Eof` token
    pub fn tokenize(&mut self, source: &str) -> LexicalResult<Vec<SpannedToken>> {
        self.metrics = LexicalMetrics::default();

        log_debug!("Starting lexical analysis",
            "bytes" => source.len(),
            "max_tokens_allowed" => MAX_TOKEN_COUNT,
            "keep_comments" => self.preferences.keep_comments
        );

        let mut scanner = Scanner::new(source);
        let mut tokens = Vec::new();

        while let Some(symbol) = scanner.next_symbol() {
            let token = match self.classify(&mut scanner, symbol) {
                Ok(Some(token)) => token,
                Ok(None) => continue,
                Err(error) => return Err(self.report(error)),
            };

            if tokens.len() >= MAX_TOKEN_COUNT {
                let error = LexerError::TooManyTokens {
                    count: tokens.len() + 1,
                    span: token.span,
                };
                return Err(self.report(error));
            }

            self.metrics.record_token(token.value);
            tokens.push(token);
        }

        tokens.push(Spanned::new(Token::Eof, Span::point(scanner.position())));

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "tokens" => self.metrics.total_tokens,
            "identifiers" => self.metrics.identifier_tokens,
            "keywords" => self.metrics.keyword_tokens,
            "comments" => self.metrics.comment_count
        );

        Ok(tokens)
    }

    fn report(&self, error: LexerError) -> LexerError {
        if self.preferences.include_position_in_errors {
            log_error!(error.error_code(), &error.to_string(), span = error.span());
        } else {
            log_error!(error.error_code(), &error.to_string());
        }
        error
    }

    /// Token for one symbol; `None` for symbols the grammar never sees
    fn classify<'a>(
        &mut self,
        scanner: &mut Scanner<'a>,
        symbol: Spanned<&'a str>,
    ) -> LexicalResult<Option<SpannedToken>> {
        let token = match Token::lookup(symbol.value) {
            Token::Spaces | Token::Tabs | Token::Newline => {
                self.metrics.trivia_symbols += 1;
                return Ok(None);
            }
            Token::Comment => {
                let tail = scanner.rest_of_line();
                return Ok(self.comment(Token::Comment, symbol.span.merge(tail.span)));
            }
            Token::Comments => {
                let span = block_comment(scanner, symbol.span)?;
                return Ok(self.comment(Token::Comments, span));
            }
            Token::True | Token::False => Token::ValBool,
            Token::NaN | Token::Infinite => Token::ValFloat,
            Token::Placeholder => return classify_placeholder(scanner, symbol).map(Some),
            other => other,
        };

        let token = Spanned::new(token, symbol.span);
        check_length(token.span)?;
        Ok(Some(token))
    }

    fn comment(&mut self, token: Token, span: Span) -> Option<SpannedToken> {
        self.metrics.comment_count += 1;
        self.preferences
            .keep_comments
            .then(|| Spanned::new(token, span))
    }
}

fn check_length(span: Span) -> LexicalResult<()> {
    if span.len() > MAX_SYMBOL_LENGTH {
        return Err(LexerError::SymbolTooLong {
            length: span.len(),
            span,
        });
    }
    Ok(())
}

/// Consume a `---` block comment up to and including the line of its closing `---`
fn block_comment(scanner: &mut Scanner<'_>, open: Span) -> LexicalResult<Span> {
    while let Some(symbol) = scanner.next_symbol() {
        if Token::lookup(symbol.value) == Token::Comments {
            let tail = scanner.rest_of_line();
            return Ok(open.merge(tail.span));
        }
    }
    Err(LexerError::UnterminatedComment { span: open })
}

/// Strings, numbers and names: everything `Token::lookup` leaves unclassified
fn classify_placeholder<'a>(
    scanner: &mut Scanner<'a>,
    symbol: Spanned<&'a str>,
) -> LexicalResult<SpannedToken> {
    let text = symbol.value;

    if let Some(quote @ ('"' | '\'')) = text.chars().next().filter(|_| text.len() == 1) {
        let tail = scanner
            .string_tail(quote)
            .ok_or(LexerError::UnterminatedString { span: symbol.span })?;
        let span = symbol.span.merge(tail.span);
        check_length(span)?;
        return Ok(Spanned::new(Token::ValString, span));
    }

    check_length(symbol.span)?;

    let classified = match text.chars().next() {
        Some(c) if c.is_ascii_digit() => classify_number(text),
        Some(c) if c.is_ascii_alphabetic() || c == '_' => classify_name(text),
        Some(c) => Err(c),
        None => Err('\0'),
    };

    classified
        .map(|token| Spanned::new(token, symbol.span))
        .map_err(|character| LexerError::InvalidCharacter {
            character,
            symbol: text.to_string(),
            span: symbol.span,
        })
}

/// Integer, float or datetime literal; `Err` holds the offending character
fn classify_number(text: &str) -> Result<Token, char> {
    let radix_digits = match text.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix_digits.filter(|_| text.len() > 2) {
        return match text[2..]
            .chars()
            .find(|&c| c != '_' && !c.is_digit(radix))
        {
            Some(bad) => Err(bad),
            None => Ok(Token::ValInteger),
        };
    }

    let mut token = Token::ValInteger;
    for ch in text.chars() {
        match ch {
            'T' | ':' | 'Z' => token = Token::ValDatetime,
            '.' if token == Token::ValDatetime => {}
            '.' | 'e' | 'E' => token = Token::ValFloat,
            '0'..='9' | '+' | '-' | '_' => {}
            other => return Err(other),
        }
    }

    // A bare date such as 2016-01-02
    if token == Token::ValInteger && text.contains('-') {
        token = Token::ValDatetime;
    }
    Ok(token)
}

/// Identifier, or member path when the name holds dots
fn classify_name(text: &str) -> Result<Token, char> {
    let mut segments = 0;
    for segment in text.split('.') {
        if segment.is_empty() {
            return Err('.');
        }
        if let Some(bad) = segment.chars().find(|&c| !(c.is_ascii_alphanumeric() || c == '_')) {
            return Err(bad);
        }
        segments += 1;
    }

    Ok(match segments {
        1 => Token::Ident,
        2 => Token::Member,
        _ => Token::Members,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn analyzer(keep_comments: bool) -> LexicalAnalyzer {
        LexicalAnalyzer::with_preferences(LexicalPreferences {
            keep_comments,
            include_position_in_errors: true,
        })
    }

    fn kinds(source: &str) -> Vec<Token> {
        analyzer(false)
            .tokenize(source)
            .unwrap()
            .into_iter()
            .map(|token| token.value)
            .collect()
    }

    #[test]
    fn test_declaration_tokens() {
        assert_eq!(
            kinds("var count int = 42"),
            [
                Token::Var,
                Token::Ident,
                Token::Int,
                Token::Assign,
                Token::ValInteger,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_literal_classification() {
        assert_eq!(
            kinds(r#"1.5 1e-5 0x1F 2016-01-02T15:04:05Z 2016-01-02 true NaN "s\"q" 'c'"#),
            [
                Token::ValFloat,
                Token::ValFloat,
                Token::ValInteger,
                Token::ValDatetime,
                Token::ValDatetime,
                Token::ValBool,
                Token::ValFloat,
                Token::ValString,
                Token::ValString,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_names_and_members() {
        assert_eq!(
            kinds("x a.b a.b.c _tmp1"),
            [Token::Ident, Token::Member, Token::Members, Token::Ident, Token::Eof]
        );
    }

    #[test]
    fn test_brackets_and_punctuation() {
        assert_eq!(
            kinds("array[int, 3];"),
            [
                Token::Array,
                Token::Left,
                Token::Int,
                Token::Comma,
                Token::ValInteger,
                Token::Right,
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_dropped_or_kept() {
        let source = "use // line comment\n--- block\nstill block ---\nvar";
        assert_eq!(kinds(source), [Token::Use, Token::Var, Token::Eof]);

        let mut keeping = analyzer(true);
        let kept: Vec<_> = keeping
            .tokenize(source)
            .unwrap()
            .into_iter()
            .map(|token| token.value)
            .collect();
        assert_eq!(
            kept,
            [Token::Use, Token::Comment, Token::Comments, Token::Var, Token::Eof]
        );
        assert_eq!(keeping.metrics().comment_count, 2);
    }

    #[test]
    fn test_spans_and_eof_position() {
        let tokens = analyzer(false).tokenize("use\r\n  \"pkg\"").unwrap();

        assert_eq!(tokens[1].value, Token::ValString);
        assert_eq!(tokens[1].span.start.line, 2);
        assert_eq!(tokens[1].span.start.column, 3);
        assert_eq!(tokens[1].span.len(), 5);

        let eof = tokens[2];
        assert_eq!(eof.value, Token::Eof);
        assert!(eof.span.is_empty());
        assert_eq!(eof.span.start.offset, 12);
    }

    #[test]
    fn test_errors() {
        assert_matches!(
            analyzer(false).tokenize("var \"open"),
            Err(LexerError::UnterminatedString { .. })
        );
        assert_matches!(
            analyzer(false).tokenize("--- never closed"),
            Err(LexerError::UnterminatedComment { .. })
        );
        assert_matches!(
            analyzer(false).tokenize("var x @"),
            Err(LexerError::InvalidCharacter { character: '@', .. })
        );
        assert_matches!(
            analyzer(false).tokenize("12abc"),
            Err(LexerError::InvalidCharacter { character: 'a', .. })
        );
        assert_matches!(
            analyzer(false).tokenize("a..b"),
            Err(LexerError::InvalidCharacter { character: '.', .. })
        );
    }

    #[test]
    fn test_symbol_length_limit() {
        let long = "x".repeat(MAX_SYMBOL_LENGTH + 1);
        let error = analyzer(false).tokenize(&long).unwrap_err();

        assert_matches!(error, LexerError::SymbolTooLong { length, .. } if length == MAX_SYMBOL_LENGTH + 1);
        assert_eq!(error.error_code(), codes::lexical::SYMBOL_TOO_LONG);
    }

    #[test]
    fn test_metrics() {
        let mut analyzer = analyzer(false);
        analyzer.tokenize("func f(out int x; string y)").unwrap();
        let metrics = analyzer.metrics();

        assert_eq!(metrics.keyword_tokens, 2);
        assert_eq!(metrics.identifier_tokens, 3);
        assert_eq!(metrics.type_tokens, 2);
        assert_eq!(metrics.total_tokens, 10);
    }
}
