//! Optional rule: zero or one occurrence of a sub-rule

use super::result::MatchResult;
use super::rule::{Grammar, RuleId};
use crate::tokens::Token;

/// `Option` never rejects. A token its sub-rule refuses is left for the
/// enclosing rule, and the option reports `Done`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct OptionRule {
    pub(super) sub: RuleId,
}

impl OptionRule {
    pub(super) fn new(sub: RuleId) -> Self {
        Self { sub }
    }
}

impl Grammar {
    pub(super) fn match_option(&mut self, rule: &mut OptionRule, tok: Token) -> MatchResult {
        let result = self.match_token(rule.sub, tok);
        if tok == Token::Eof {
            return MatchResult::Done;
        }
        match result {
            MatchResult::Reject => MatchResult::Done,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::{Grammar, MatchResult, MatchResult::*};
    use crate::tokens::Token;

    fn feed(g: &mut Grammar, rule: crate::grammar::RuleId, toks: &[Token]) -> Vec<MatchResult> {
        toks.iter().map(|&tok| g.match_token(rule, tok)).collect()
    }

    #[test]
    fn test_option_of_term() {
        let mut g = Grammar::new();
        let ident = g.term(&[Token::Ident]);
        let opt = g.option(ident);

        let toks = [
            Token::Use,
            Token::Ident,
            Token::NaN,
            Token::Eof,
            Token::Ident,
            Token::Ident,
            Token::NaN,
            Token::Eof,
        ];
        assert_eq!(
            feed(&mut g, opt, &toks),
            [Done, AcceptComplete, Done, Done, AcceptComplete, AcceptComplete, Done, Done]
        );
    }

    #[test]
    fn test_option_folds_rejected_continuation_to_done() {
        let mut g = Grammar::new();
        let a = g.term(&[Token::Ident]);
        let b = g.term(&[Token::Comma]);
        let pair = g.seq(&[a, b]);
        let opt = g.option(pair);

        let toks = [
            Token::Ident,
            Token::Colon,
            Token::Ident,
            Token::Comma,
            Token::Colon,
            Token::Eof,
            Token::Dot,
        ];
        assert_eq!(
            feed(&mut g, opt, &toks),
            [Pending, Done, Pending, AcceptComplete, Done, Done, Done]
        );
    }
}
