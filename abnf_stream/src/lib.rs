// Internal modules
pub mod config;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use grammar::{Grammar, GrammarError, GrammarStats, MatchResult, RuleId, RuleKind};
pub use syntax::{
    match_source, match_tokens, Library, MatchReport, Matcher, SyntaxError, SyntaxResult,
};
pub use tokens::{SpannedToken, Token};
