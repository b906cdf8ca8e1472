//! Terminal rule: a single token out of a set of categories

use super::result::MatchResult;
use crate::tokens::Token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct TermRule {
    categories: Vec<Token>,
}

impl TermRule {
    pub(super) fn new(categories: Vec<Token>) -> Self {
        Self { categories }
    }

    /// A term without categories matches zero tokens
    pub(super) fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Stateless: the same token always yields the same result
    pub(super) fn matches(&self, tok: Token) -> MatchResult {
        if tok == Token::Eof || self.categories.is_empty() {
            return MatchResult::Done;
        }
        if self.categories.iter().any(|category| category.has(tok)) {
            MatchResult::AcceptComplete
        } else {
            MatchResult::Reject
        }
    }
}
