//! Latching rule: its sub-rule may match at most once until reset

use super::result::MatchResult;
use super::rule::{Grammar, RuleId};
use crate::tokens::Token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct OnceRule {
    pub(super) sub: RuleId,
    /// Set after the sub-rule completed; cleared only by EOF
    latched: bool,
}

impl OnceRule {
    pub(super) fn new(sub: RuleId) -> Self {
        Self { sub, latched: false }
    }
}

impl Grammar {
    pub(super) fn match_once(&mut self, rule: &mut OnceRule, tok: Token) -> MatchResult {
        if rule.latched {
            if tok == Token::Eof {
                self.match_token(rule.sub, Token::Eof);
                rule.latched = false;
            }
            return MatchResult::Done;
        }

        let result = self.match_token(rule.sub, tok);
        if tok == Token::Eof {
            rule.latched = false;
            return MatchResult::Done;
        }
        if matches!(result, MatchResult::AcceptComplete | MatchResult::Done) {
            rule.latched = true;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::{Grammar, MatchResult::*};
    use crate::tokens::Token;

    #[test]
    fn test_once_latches_until_eof() {
        let mut g = Grammar::new();
        let ty = g.term(&[Token::Types]);
        let comma = g.term(&[Token::Comma]);
        let pair = g.seq(&[ty, comma]);
        let once = g.once(pair);

        let toks = [
            Token::Int,
            Token::Comma,
            Token::Bool,
            Token::Eof,
            Token::Bool,
            Token::Comma,
            Token::NaN,
            Token::NaN,
            Token::Eof,
        ];
        let results: Vec<_> = toks.iter().map(|&tok| g.match_token(once, tok)).collect();
        assert_eq!(
            results,
            [Pending, AcceptComplete, Done, Done, Pending, AcceptComplete, Done, Done, Done]
        );
    }

    #[test]
    #[should_panic(expected = "does not support recursion")]
    fn test_once_recursion_panics() {
        let mut g = Grammar::new();
        let placeholder = g.declare_seq();
        let ident = g.term(&[Token::Ident]);
        let once = g.once(placeholder);
        let body = g.seq(&[ident, once]);
        g.bind(placeholder, body);

        g.match_token(once, Token::Ident);
        g.match_token(once, Token::Ident);
    }
}
