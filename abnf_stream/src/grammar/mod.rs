//! Streaming grammar rules
//!
//! Rules are built inside a [`Grammar`] and fed one token at a time through
//! [`Grammar::match_token`]. Each call answers with a [`MatchResult`] that
//! tells the caller whether the token was consumed and whether a complete
//! match exists at that point. Feeding `Token::Eof` resets a rule.
//!
//! Recursive grammars are built by declaring a placeholder, using it as a
//! child, and binding it once its definition exists:
//!
//! ```
//! use abnf_stream::grammar::{Grammar, MatchResult};
//! use abnf_stream::tokens::Token;
//!
//! let mut g = Grammar::new();
//! let types = g.declare_any();
//! let basic = g.term(&[Token::Types, Token::Ident]);
//! let array = g.term(&[Token::Array]);
//! let left = g.term(&[Token::Left]);
//! let right = g.term(&[Token::Right]);
//! let array_type = g.seq(&[array, left, types, right]);
//! let body = g.any(&[basic, array_type]);
//! g.bind(types, body);
//!
//! assert_eq!(g.match_token(types, Token::Array), MatchResult::Pending);
//! assert_eq!(g.match_token(types, Token::Left), MatchResult::Pending);
//! assert_eq!(g.match_token(types, Token::Int), MatchResult::Pending);
//! assert_eq!(g.match_token(types, Token::Right), MatchResult::AcceptComplete);
//! ```

mod any;
pub mod error;
mod more;
mod once;
mod option;
pub mod result;
pub mod rule;
mod seq;
mod term;

pub use error::{GrammarError, GrammarResult};
pub use result::MatchResult;
pub use rule::{Grammar, GrammarStats, RuleId, RuleKind};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::compile_time::grammar::MAX_RECURSION_DEPTH;
    use crate::tokens::Token;
    use MatchResult::*;

    struct TypeGrammar {
        g: Grammar,
        types: RuleId,
        params: RuleId,
    }

    /// Builtin, map, function and array types with parameter lists
    fn type_grammar() -> TypeGrammar {
        let mut g = Grammar::new();
        let types = g.declare_any();

        let basic = g.term(&[Token::Types, Token::Ident, Token::Member]);
        let array = g.term(&[Token::Array]);
        let map = g.term(&[Token::Map]);
        let func = g.term(&[Token::Func]);
        let out = g.term(&[Token::Out]);
        let left = g.term(&[Token::Left]);
        let right = g.term(&[Token::Right]);
        let comma = g.term(&[Token::Comma]);
        let semicolon = g.term(&[Token::Semicolon]);
        let ident = g.term(&[Token::Ident]);
        let size = g.term(&[Token::ValInteger, Token::Types, Token::Ident, Token::Member]);

        let length = g.seq(&[comma, size]);
        let opt_length = g.option(length);
        let array_type = g.seq(&[array, left, types, opt_length, right]);
        let map_type = g.seq(&[map, left, types, types, opt_length, right]);

        let next_name = g.seq(&[comma, ident]);
        let more_names = g.more(next_name, None);
        let opt_more_names = g.option(more_names);
        let names = g.seq(&[ident, opt_more_names]);
        let opt_names = g.option(names);
        let once_out = g.once(out);
        let opt_out = g.option(once_out);
        let param = g.seq(&[opt_out, types, opt_names]);
        let params = g.more(param, Some(semicolon));

        let signature = g.seq(&[left, params, right]);
        let opt_signature = g.option(signature);
        let func_type = g.seq(&[func, opt_signature]);

        let body = g.any(&[basic, map_type, func_type, array_type]);
        g.bind(types, body);

        TypeGrammar { g, types, params }
    }

    fn feed(g: &mut Grammar, rule: RuleId, toks: &[Token]) -> Vec<MatchResult> {
        toks.iter().map(|&tok| g.match_token(rule, tok)).collect()
    }

    #[test]
    fn test_parameter_lists() {
        let TypeGrammar { mut g, params, .. } = type_grammar();
        let toks = [
            Token::Int,
            Token::Ident,
            Token::Semicolon,
            Token::Bool,
            Token::Ident,
            Token::Comma,
            Token::Ident,
            Token::Semicolon,
        ];
        assert_eq!(
            feed(&mut g, params, &toks),
            [
                PendingComplete,
                PendingComplete,
                Pending,
                PendingComplete,
                PendingComplete,
                Pending,
                PendingComplete,
                Pending,
            ]
        );
    }

    #[test]
    fn test_function_type_inside_parameter_list() {
        let TypeGrammar { mut g, params, .. } = type_grammar();
        let toks = [
            Token::Int,
            Token::Ident,
            Token::Semicolon,
            Token::Bool,
            Token::Ident,
            Token::Comma,
            Token::Ident,
            Token::NaN,
            Token::Func,
            Token::Left,
            Token::Ident,
            Token::Semicolon,
            Token::Bool,
            Token::Ident,
            Token::Semicolon,
            Token::Out,
            Token::F32,
            Token::Semicolon,
            Token::F64,
            Token::Semicolon,
            Token::Right,
            Token::Ident,
        ];
        let mut expected = vec![
            PendingComplete,
            PendingComplete,
            Pending,
            PendingComplete,
            PendingComplete,
            Pending,
            PendingComplete,
            Done,
            PendingComplete,
        ];
        expected.extend([Pending; 11]);
        expected.extend([PendingComplete, PendingComplete]);

        assert_eq!(feed(&mut g, params, &toks), expected);
    }

    #[test]
    fn test_nested_map_and_array_types() {
        let TypeGrammar { mut g, types, .. } = type_grammar();
        let toks = [
            Token::Map,
            Token::Left,
            Token::Int,
            Token::Array,
            Token::Left,
            Token::Bool,
            Token::Comma,
            Token::ValInteger,
            Token::Right,
            Token::Right,
            Token::NaN,
            Token::Eof,
        ];
        let mut expected = vec![Pending; 9];
        expected.extend([AcceptComplete, Reject, Done]);

        assert_eq!(feed(&mut g, types, &toks), expected);
    }

    #[test]
    fn test_function_type() {
        let TypeGrammar { mut g, types, .. } = type_grammar();
        let toks = [
            Token::Func,
            Token::Left,
            Token::Int,
            Token::Ident,
            Token::Right,
            Token::NaN,
            Token::Eof,
        ];
        assert_eq!(
            feed(&mut g, types, &toks),
            [PendingComplete, Pending, Pending, Pending, AcceptComplete, Reject, Done]
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let TypeGrammar { mut g, types, .. } = type_grammar();
        let copy = g.clone_rule(types);
        assert_ne!(copy, types);

        assert_eq!(g.match_token(types, Token::Array), Pending);
        assert_eq!(g.match_token(copy, Token::Int), AcceptComplete);
        assert_eq!(g.match_token(types, Token::Left), Pending);
        assert_eq!(g.match_token(copy, Token::Map), Pending);
        assert_eq!(g.match_token(types, Token::Int), Pending);
        assert_eq!(g.match_token(types, Token::Right), AcceptComplete);
        assert_eq!(g.match_token(copy, Token::Eof), Done);
    }

    #[test]
    fn test_cloned_grammar_is_independent() {
        let TypeGrammar { mut g, types, .. } = type_grammar();
        assert_eq!(g.match_token(types, Token::Array), Pending);

        let mut copy = g.clone();
        assert_eq!(copy.match_token(types, Token::Left), Pending);
        assert_eq!(g.match_token(types, Token::Int), Reject);
        assert_eq!(copy.match_token(types, Token::Int), Pending);
        assert_eq!(copy.match_token(types, Token::Right), AcceptComplete);
    }

    #[test]
    fn test_nested_instances_are_reused() {
        let TypeGrammar { mut g, types, .. } = type_grammar();
        let toks = [
            Token::Array,
            Token::Left,
            Token::Int,
            Token::Right,
            Token::Eof,
        ];

        feed(&mut g, types, &toks);
        let after_first = g.stats();
        feed(&mut g, types, &toks);
        let after_second = g.stats();

        assert!(after_first.nested_instances > 0);
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_recursion_limit_rejects_and_sets_fault() {
        let mut g = Grammar::new();
        let nested = g.declare_any();
        let ident = g.term(&[Token::Ident]);
        let left = g.term(&[Token::Left]);
        let right = g.term(&[Token::Right]);
        let group = g.seq(&[left, nested, right]);
        let body = g.any(&[ident, group]);
        g.bind(nested, body);

        let mut results = Vec::new();
        for _ in 0..MAX_RECURSION_DEPTH + 8 {
            let result = g.match_token(nested, Token::Left);
            results.push(result);
            if result == Reject {
                break;
            }
        }

        assert_eq!(results.last(), Some(&Reject));
        assert!(g.recursion_limit_hit());
        assert_eq!(g.stats().max_depth, MAX_RECURSION_DEPTH);

        g.clear_fault();
        assert!(!g.recursion_limit_hit());
        assert_eq!(g.match_token(nested, Token::Ident), AcceptComplete);
    }

    #[test]
    fn test_stats_serialize() {
        let TypeGrammar { g, .. } = type_grammar();
        let stats = g.stats();
        assert_eq!(stats.rules, g.len());
        assert_eq!(stats.anys, 2);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["nested_instances"], 0);
    }
}
