//! Sequence rule: children matched one after another

use super::result::MatchResult;
use super::rule::{Grammar, RuleId};
use crate::tokens::Token;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SeqRule {
    pub(super) children: Arc<[RuleId]>,
    /// Index from which all remaining children are optional
    boundary: usize,
    /// Child currently receiving tokens
    pos: usize,
}

impl SeqRule {
    pub(super) fn new(children: Arc<[RuleId]>, boundary: usize) -> Self {
        Self {
            children,
            boundary,
            pos: 0,
        }
    }

    /// Same shape over different children, ready for fresh input
    pub(super) fn relinked(&self, children: Arc<[RuleId]>) -> Self {
        Self::new(children, self.boundary)
    }
}

impl Grammar {
    pub(super) fn match_seq(&mut self, rule: &mut SeqRule, tok: Token) -> MatchResult {
        let count = rule.children.len();

        if tok == Token::Eof {
            if count > 0 {
                let current = rule.pos.min(count - 1);
                self.match_token(rule.children[current], Token::Eof);
            }
            rule.pos = 0;
            return MatchResult::Done;
        }

        let mut result = MatchResult::Reject;
        while rule.pos < count {
            result = self.match_token(rule.children[rule.pos], tok);
            match result {
                MatchResult::Reject => {
                    rule.pos = 0;
                    return MatchResult::Reject;
                }
                MatchResult::Pending => return MatchResult::Pending,
                MatchResult::PendingComplete => {
                    // Required children after this one turn a complete child
                    // into an incomplete sequence
                    return if rule.pos + 1 < rule.boundary {
                        MatchResult::Pending
                    } else {
                        MatchResult::PendingComplete
                    };
                }
                MatchResult::AcceptComplete => {
                    rule.pos += 1;
                    if rule.pos == count {
                        rule.pos = 0;
                        return MatchResult::AcceptComplete;
                    }
                    return if rule.pos < rule.boundary {
                        MatchResult::Pending
                    } else {
                        MatchResult::PendingComplete
                    };
                }
                // Child finished without this token; offer it to the next one
                MatchResult::Done => rule.pos += 1,
            }
        }

        rule.pos = 0;
        result
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
    fn test_function_signature_sequence() {
        let mut g = Grammar::new();
        let func = g.term(&[Token::Func]);
        let ident = g.term(&[Token::Ident]);
        let out = g.term(&[Token::Out]);
        let int = g.term(&[Token::Int]);
        let ty = g.term(&[Token::Types]);
        let seq = g.seq(&[func, ident, out, int, ty]);

        let toks = [
            Token::Func,
            Token::Ident,
            Token::Out,
            Token::Int,
            Token::Bool,
            Token::NaN,
            Token::Eof,
        ];
        assert_eq!(
            feed(&mut g, seq, &toks),
            [Pending, Pending, Pending, Pending, AcceptComplete, Reject, Done]
        );
    }

    #[test]
    fn test_optional_middle_child() {
        let mut g = Grammar::new();
        let use_kw = g.term(&[Token::Use]);
        let ident = g.term(&[Token::Ident]);
        let opt_ident = g.option(ident);
        let string = g.term(&[Token::ValString]);
        let seq = g.seq(&[use_kw, opt_ident, string]);

        let toks = [
            Token::Use,
            Token::Ident,
            Token::ValString,
            Token::Dot,
            Token::Eof,
            Token::Use,
            Token::ValString,
            Token::Dot,
            Token::Eof,
        ];
        assert_eq!(
            feed(&mut g, seq, &toks),
            [Pending, Pending, AcceptComplete, Reject, Done, Pending, AcceptComplete, Reject, Done]
        );
    }

    #[test]
    fn test_optional_trailing_children() {
        let mut g = Grammar::new();
        let func = g.term(&[Token::Func]);
        let ident = g.term(&[Token::Ident]);
        let out = g.term(&[Token::Out]);
        let int = g.term(&[Token::Int]);
        let opt_out = g.option(out);
        let opt_int = g.option(int);
        let seq = g.seq(&[func, ident, opt_out, opt_int]);

        let toks = [Token::Func, Token::Ident, Token::Spaces];
        assert_eq!(feed(&mut g, seq, &toks), [Pending, PendingComplete, Done]);
    }

    #[test]
    fn test_leading_optional_child() {
        let mut g = Grammar::new();
        let pub_kw = g.term(&[Token::Pub]);
        let opt_pub = g.option(pub_kw);
        let var = g.term(&[Token::Var]);
        let ident = g.term(&[Token::Ident]);
        let seq = g.seq(&[opt_pub, var, ident]);

        let toks = [
            Token::Var,
            Token::Ident,
            Token::Pub,
            Token::Var,
            Token::Ident,
            Token::Ident,
        ];
        assert_eq!(
            feed(&mut g, seq, &toks),
            [Pending, AcceptComplete, Pending, Pending, AcceptComplete, Reject]
        );
    }

    #[test]
    fn test_repetition_inside_sequence() {
        let mut g = Grammar::new();
        let ty = g.term(&[Token::Types]);
        let ident = g.term(&[Token::Ident]);
        let comma = g.term(&[Token::Comma]);
        let semi = g.term(&[Token::Semicolon]);
        let names = g.more(ident, Some(comma));
        let open = g.seq(&[ty, names]);
        let closed = g.seq(&[ty, names, semi]);

        let toks = [
            Token::Int,
            Token::Ident,
            Token::Comma,
            Token::Ident,
            Token::NaN,
            Token::Eof,
        ];
        assert_eq!(
            feed(&mut g, open, &toks),
            [Pending, PendingComplete, Pending, PendingComplete, Done, Done]
        );

        let toks = [
            Token::Int,
            Token::Ident,
            Token::Comma,
            Token::Ident,
            Token::Semicolon,
            Token::NaN,
        ];
        assert_eq!(
            feed(&mut g, closed, &toks),
            [Pending, Pending, Pending, Pending, AcceptComplete, Reject]
        );
    }

    #[test]
    fn test_trailing_optional_then_eof() {
        let mut g = Grammar::new();
        let x = g.term(&[Token::Ident]);
        let y = g.term(&[Token::Comma]);
        let opt_y = g.option(y);
        let seq = g.seq(&[x, opt_y]);

        assert_eq!(feed(&mut g, seq, &[Token::Ident, Token::Eof]), [PendingComplete, Done]);
    }

    #[test]
    fn test_empty_seq_rejects() {
        let mut g = Grammar::new();
        let seq = g.seq(&[]);
        assert_eq!(g.match_token(seq, Token::Ident), Reject);
        assert_eq!(g.match_token(seq, Token::Eof), Done);
    }
}
