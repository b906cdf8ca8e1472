//! Repetition rule: one or more occurrences of a sub-rule, with an
//! optional separator between occurrences

use super::result::MatchResult;
use super::rule::{Grammar, RuleId};
use crate::tokens::Token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct MoreRule {
    pub(super) sub: RuleId,
    /// Separator rule; an empty term when the repetition has none
    pub(super) sep: RuleId,
    /// A complete occurrence is on record, so stopping here is legal
    standing: bool,
    /// A separator just finished and the next occurrence has not started
    sep_finished: bool,
    /// The separator is mid-match and owns the next token
    sep_active: bool,
}

impl MoreRule {
    pub(super) fn new(sub: RuleId, sep: RuleId) -> Self {
        Self {
            sub,
            sep,
            standing: false,
            sep_finished: false,
            sep_active: false,
        }
    }

    fn clear(&mut self) {
        self.standing = false;
        self.sep_finished = false;
        self.sep_active = false;
    }
}

impl Grammar {
    pub(super) fn match_more(&mut self, rule: &mut MoreRule, tok: Token) -> MatchResult {
        if tok == Token::Eof {
            if !rule.sep_active {
                self.match_token(rule.sub, Token::Eof);
            }
            self.match_token(rule.sep, Token::Eof);
            rule.clear();
            return MatchResult::Done;
        }

        let mut tried_sep = false;
        if rule.sep_active {
            tried_sep = true;
            match self.match_separator(rule, tok) {
                MatchResult::Done => {}
                MatchResult::Reject => {
                    rule.clear();
                    return MatchResult::Reject;
                }
                other => return other,
            }
        }

        let mut result = self.match_token(rule.sub, tok);
        let stopped = result == MatchResult::Done
            || (result == MatchResult::Reject && rule.standing);
        if !tried_sep && stopped {
            tried_sep = true;
            match self.match_separator(rule, tok) {
                MatchResult::Done => {}
                MatchResult::Reject => {
                    rule.clear();
                    return MatchResult::Reject;
                }
                other => return other,
            }
            result = self.match_token(rule.sub, tok);
        }

        match result {
            MatchResult::Reject => {
                let folded = if tried_sep || rule.standing || rule.sep_finished {
                    MatchResult::Done
                } else {
                    MatchResult::Reject
                };
                rule.clear();
                self.match_token(rule.sub, Token::Eof);
                folded
            }
            MatchResult::Pending | MatchResult::PendingComplete => {
                rule.standing = result == MatchResult::PendingComplete;
                rule.sep_finished = false;
                result
            }
            MatchResult::AcceptComplete => {
                rule.standing = true;
                rule.sep_finished = false;
                MatchResult::PendingComplete
            }
            MatchResult::Done => {
                rule.clear();
                MatchResult::Done
            }
        }
    }

    /// Feed the separator; a consumed separator always leaves the
    /// repetition pending, since another occurrence must follow
    fn match_separator(&mut self, rule: &mut MoreRule, tok: Token) -> MatchResult {
        match self.match_token(rule.sep, tok) {
            MatchResult::Reject if rule.standing => MatchResult::Done,
            MatchResult::Reject => MatchResult::Reject,
            MatchResult::Pending => {
                rule.standing = false;
                rule.sep_finished = true;
                rule.sep_active = true;
                MatchResult::Pending
            }
            MatchResult::PendingComplete => {
                rule.standing = false;
                rule.sep_finished = true;
                rule.sep_active = true;
                MatchResult::Pending
            }
            MatchResult::AcceptComplete => {
                rule.standing = true;
                rule.sep_finished = false;
                rule.sep_active = false;
                MatchResult::Pending
            }
            MatchResult::Done => MatchResult::Done,
        }
    }
}
