//! Alternation rule: the first branch that accepts a token wins

use super::result::MatchResult;
use super::rule::{Grammar, RuleId};
use crate::tokens::Token;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct AnyRule {
    pub(super) children: Arc<[RuleId]>,
    /// Branch that consumed the previous token and is still pending
    pinned: Option<usize>,
}

impl AnyRule {
    pub(super) fn new(children: Arc<[RuleId]>) -> Self {
        Self {
            children,
            pinned: None,
        }
    }
}

impl Grammar {
    pub(super) fn match_any(&mut self, rule: &mut AnyRule, tok: Token) -> MatchResult {
        if tok == Token::Eof {
            let branch = rule.pinned.take().unwrap_or(0);
            if let Some(&child) = rule.children.get(branch) {
                self.match_token(child, Token::Eof);
            }
            return MatchResult::Done;
        }

        // A pending branch keeps the token stream until it settles
        if let Some(branch) = rule.pinned {
            let result = self.match_token(rule.children[branch], tok);
            if !result.is_pending() {
                rule.pinned = None;
            }
            return result;
        }

        let mut saw_done = false;
        for (branch, &child) in rule.children.iter().enumerate() {
            match self.match_token(child, tok) {
                result @ (MatchResult::Pending | MatchResult::PendingComplete) => {
                    rule.pinned = Some(branch);
                    return result;
                }
                MatchResult::AcceptComplete => return MatchResult::AcceptComplete,
                MatchResult::Done => saw_done = true,
                MatchResult::Reject => {}
            }
        }

        if saw_done {
            MatchResult::Done
        } else {
            MatchResult::Reject
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::{Grammar, MatchResult, MatchResult::*, RuleId};
    use crate::tokens::Token;

    fn feed(g: &mut Grammar, rule: RuleId, toks: &[Token]) -> Vec<MatchResult> {
        toks.iter().map(|&tok| g.match_token(rule, tok)).collect()
    }

    #[test]
    fn test_any_picks_first_accepting_branch() {
        let mut g = Grammar::new();
        let a = g.term(&[Token::Ident]);
        let b = g.term(&[Token::Var]);
        let c = g.term(&[Token::Types]);
        let pair = g.seq(&[b, c]);
        let any = g.any(&[a, pair]);

        let toks = [Token::Var, Token::Int, Token::Ident, Token::Dot, Token::Eof];
        assert_eq!(
            feed(&mut g, any, &toks),
            [Pending, AcceptComplete, AcceptComplete, Reject, Done]
        );
    }

    #[test]
    fn test_any_reports_done_from_optional_branch() {
        let mut g = Grammar::new();
        let a = g.term(&[Token::Ident]);
        let opt = g.option(a);
        let b = g.term(&[Token::Var]);
        let any = g.any(&[opt, b]);

        assert_eq!(g.match_token(any, Token::Var), AcceptComplete);
        assert_eq!(g.match_token(any, Token::Dot), Done);
    }

    #[test]
    fn test_empty_any_rejects() {
        let mut g = Grammar::new();
        let any = g.any(&[]);

        assert_eq!(g.match_token(any, Token::Ident), Reject);
        assert_eq!(g.match_token(any, Token::Eof), Done);
    }

    #[test]
    fn test_recursive_array_types() {
        let mut g = Grammar::new();
        let types = g.declare_any();
        let basic = g.term(&[Token::Types, Token::Ident]);
        let array = g.term(&[Token::Array]);
        let left = g.term(&[Token::Left]);
        let right = g.term(&[Token::Right]);
        let array_type = g.seq(&[array, left, types, right]);
        let body = g.any(&[basic, array_type]);
        g.bind(types, body);

        let toks = [
            Token::Array,
            Token::Left,
            Token::Array,
            Token::Left,
            Token::Int,
            Token::Right,
            Token::Right,
            Token::NaN,
            Token::Eof,
        ];
        assert_eq!(
            feed(&mut g, types, &toks),
            [Pending, Pending, Pending, Pending, Pending, Pending, AcceptComplete, Reject, Done]
        );
        assert!(g.stats().nested_instances >= 1);
        assert!(!g.recursion_limit_hit());
    }
}
