//! Reference grammar for declarations of the small language
//!
//! Type expressions are recursive (`array[array[int]]`, `map[string, func(int a)]`)
//! and are built with the declare/bind protocol: the `type` production is
//! declared first, used inside its own alternatives, then bound.

use super::error::{SyntaxError, SyntaxResult};
use crate::grammar::{Grammar, RuleId};
use crate::log_debug;
use crate::tokens::Token;

/// Production names understood by [`Library::rule`], in declaration order
pub const PRODUCTIONS: [&str; 8] = [
    "declaration",
    "type",
    "params",
    "use",
    "var",
    "const",
    "func",
    "typedef",
];

/// A built grammar plus its named entry points.
///
/// The grammar is permissive where its combinators are. An optional tail
/// that rejects ends the match instead of failing it, so `var a = var b`
/// reads as `var a =` followed by a second declaration `var b`. A
/// separated repetition accepts a trailing separator, so
/// `func f(int x; ) int` is a complete declaration.
#[derive(Debug, Clone)]
pub struct Library {
    grammar: Grammar,
    productions: Vec<(&'static str, RuleId)>,
}

impl Library {
    pub fn new() -> Self {
        let mut g = Grammar::new();

        // Leaves
        let ident = g.term(&[Token::Ident]);
        let left = g.term(&[Token::Left]);
        let right = g.term(&[Token::Right]);
        let comma = g.term(&[Token::Comma]);
        let semicolon = g.term(&[Token::Semicolon]);
        let assign = g.term(&[Token::Assign]);
        let value = g.term(&[Token::Literals, Token::Ident, Token::Member, Token::Members]);

        // type = named / map[type type (, size)] / func[(params)] / array[type (, size)]
        let types = g.declare_any();
        let named = g.term(&[Token::Types, Token::Ident, Token::Member]);
        let size = g.term(&[Token::ValInteger, Token::Types, Token::Ident, Token::Member]);
        let length = g.seq(&[comma, size]);
        let opt_length = g.option(length);

        let array_kw = g.term(&[Token::Array]);
        let array_type = g.seq(&[array_kw, left, types, opt_length, right]);

        let map_kw = g.term(&[Token::Map]);
        let map_type = g.seq(&[map_kw, left, types, types, opt_length, right]);

        // names = IDENT *("," IDENT)
        let next_name = g.seq(&[comma, ident]);
        let more_names = g.more(next_name, None);
        let opt_more_names = g.option(more_names);
        let names = g.seq(&[ident, opt_more_names]);
        let opt_names = g.option(names);

        // params = param *(";" param), param = [out] type [names]
        let out_kw = g.term(&[Token::Out]);
        let once_out = g.once(out_kw);
        let opt_out = g.option(once_out);
        let param = g.seq(&[opt_out, types, opt_names]);
        let params = g.more(param, Some(semicolon));

        let func_kw = g.term(&[Token::Func]);
        let signature = g.seq(&[left, params, right]);
        let opt_signature = g.option(signature);
        let func_type = g.seq(&[func_kw, opt_signature]);

        let type_body = g.any(&[named, map_type, func_type, array_type]);
        g.bind(types, type_body);
        let opt_types = g.option(types);

        // use [IDENT] VALSTRING
        let use_kw = g.term(&[Token::Use]);
        let opt_ident = g.option(ident);
        let string = g.term(&[Token::ValString]);
        let use_decl = g.seq(&[use_kw, opt_ident, string]);

        // var names [type] ["=" value]
        let var_kw = g.term(&[Token::Var]);
        let initializer = g.seq(&[assign, value]);
        let opt_initializer = g.option(initializer);
        let var_decl = g.seq(&[var_kw, names, opt_types, opt_initializer]);

        // const IDENT [type] "=" value
        let const_kw = g.term(&[Token::Const]);
        let const_decl = g.seq(&[const_kw, ident, opt_types, assign, value]);

        // func IDENT "(" [params] ")" [type]
        let opt_params = g.option(params);
        let func_decl = g.seq(&[func_kw, ident, left, opt_params, right, opt_types]);

        // type IDENT type
        let type_kw = g.term(&[Token::Type]);
        let type_decl = g.seq(&[type_kw, ident, types]);

        // `pub` is factored out of the alternatives: Any commits to the
        // first branch that leaves a match pending
        let pub_kw = g.term(&[Token::Pub]);
        let opt_pub = g.option(pub_kw);
        let body = g.any(&[use_decl, var_decl, const_decl, func_decl, type_decl]);
        let declaration = g.seq(&[opt_pub, body]);

        let productions = vec![
            ("declaration", declaration),
            ("type", types),
            ("params", params),
            ("use", use_decl),
            ("var", var_decl),
            ("const", const_decl),
            ("func", func_decl),
            ("typedef", type_decl),
        ];

        log_debug!("Reference grammar built",
            "rules" => g.len(),
            "productions" => productions.len()
        );

        Self {
            grammar: g,
            productions,
        }
    }

    pub fn rule(&self, name: &str) -> Option<RuleId> {
        self.productions
            .iter()
            .find(|(production, _)| *production == name)
            .map(|&(_, id)| id)
    }

    /// Like [`Library::rule`], failing with `UnknownProduction`
    pub fn require(&self, name: &str) -> SyntaxResult<RuleId> {
        self.rule(name)
            .ok_or_else(|| SyntaxError::unknown_production(name))
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn grammar_mut(&mut self) -> &mut Grammar {
        &mut self.grammar
    }

    pub fn into_grammar(self) -> Grammar {
        self.grammar
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}
