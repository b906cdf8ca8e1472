//! Token identifiers and category membership
//!
//! Tokens are plain copyable identifiers. A handful of them are categories:
//! they stand for a whole set of concrete tokens, and `Token::has` is the
//! containment test grammar terms are built on.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Token {
    /// End of input; never contained in any category
    Eof,

    // === OPERATORS (ordered by family) ===
    Dollar,  // $
    Anti,    // ~
    BitAnd,  // &
    BitOr,   // |
    Xor,     // xor
    Mul,     // mul
    MulSign, // *
    Div,     // div
    DivSign, // /
    Mod,     // mod
    Rem,     // %
    Shl,     // shl
    ShlSign, // <<
    Shr,     // shr
    ShrSign, // >>
    Add,     // add
    Plus,    // +
    Sub,     // -
    DotDot,  // ..
    Eql,     // ==
    Neq,     // !=
    Leq,     // <=
    Geq,     // >=
    Lss,     // <
    Gtr,     // >
    Is,      // is
    IsNot,   // isnot
    Has,     // has
    Not,     // not
    And,     // and
    Or,      // or

    // === KEYWORDS ===
    Use,
    Pub,
    Const,
    Type,
    Static,
    Var,
    Func,
    Proc,
    Break,
    Case,
    Continue,
    Default,
    Defer,
    Else,
    For,
    Go,
    Goto,
    If,
    Map,
    Switch,
    Out,
    Array,

    // === DELIMITERS ===
    Colon,     // :
    Comma,     // ,
    Semicolon, // ;
    Dot,       // .

    // === ASSIGNMENT ===
    Assign, // =
    Inc,    // ++
    Dec,    // --

    // === PAIRED BRACKETS ===
    /// Any of `[ { (`
    Left,
    /// Any of `] } )`
    Right,

    // === LAYOUT ===
    Spaces,
    Tabs,
    Newline,
    /// `//` to end of line
    Comment,
    /// `---` block comment
    Comments,

    // === NAMES ===
    Ident,
    /// `a.b`
    Member,
    /// `a.b.c`
    Members,

    // === LITERALS ===
    ValString,
    ValInteger,
    ValFloat,
    ValBool,
    ValDatetime,
    True,
    False,
    NaN,
    Infinite,

    // === BUILTIN TYPES ===
    Bool,
    Byte,
    String,
    Int,
    I8,
    I16,
    I32,
    I64,
    Uint,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Any,

    /// Symbol not yet classified by the scanner
    Placeholder,

    // === CATEGORIES ===
    /// Every builtin type name
    Types,
    /// Every classified literal value
    Literals,
    /// `use` through `array`
    Keywords,
    /// `$` through `or`
    Operators,
    /// `use` through `proc`
    Declares,
}

/// Source spellings of tokens that have exactly one
const SPELLINGS: &[(Token, &str)] = &[
    (Token::Dollar, "$"),
    (Token::Anti, "~"),
    (Token::BitAnd, "&"),
    (Token::BitOr, "|"),
    (Token::Xor, "xor"),
    (Token::Mul, "mul"),
    (Token::MulSign, "*"),
    (Token::Div, "div"),
    (Token::DivSign, "/"),
    (Token::Mod, "mod"),
    (Token::Rem, "%"),
    (Token::Shl, "shl"),
    (Token::ShlSign, "<<"),
    (Token::Shr, "shr"),
    (Token::ShrSign, ">>"),
    (Token::Add, "add"),
    (Token::Plus, "+"),
    (Token::Sub, "-"),
    (Token::DotDot, ".."),
    (Token::Eql, "=="),
    (Token::Neq, "!="),
    (Token::Leq, "<="),
    (Token::Geq, ">="),
    (Token::Lss, "<"),
    (Token::Gtr, ">"),
    (Token::Is, "is"),
    (Token::IsNot, "isnot"),
    (Token::Has, "has"),
    (Token::Not, "not"),
    (Token::And, "and"),
    (Token::Or, "or"),
    (Token::Use, "use"),
    (Token::Pub, "pub"),
    (Token::Const, "const"),
    (Token::Type, "type"),
    (Token::Static, "static"),
    (Token::Var, "var"),
    (Token::Func, "func"),
    (Token::Proc, "proc"),
    (Token::Break, "break"),
    (Token::Case, "case"),
    (Token::Continue, "continue"),
    (Token::Default, "default"),
    (Token::Defer, "defer"),
    (Token::Else, "else"),
    (Token::For, "for"),
    (Token::Go, "go"),
    (Token::Goto, "goto"),
    (Token::If, "if"),
    (Token::Map, "map"),
    (Token::Switch, "switch"),
    (Token::Out, "out"),
    (Token::Array, "array"),
    (Token::Colon, ":"),
    (Token::Comma, ","),
    (Token::Semicolon, ";"),
    (Token::Dot, "."),
    (Token::Assign, "="),
    (Token::Inc, "++"),
    (Token::Dec, "--"),
    (Token::True, "true"),
    (Token::False, "false"),
    (Token::NaN, "NaN"),
    (Token::Infinite, "Infinite"),
    (Token::Bool, "bool"),
    (Token::Byte, "byte"),
    (Token::String, "string"),
    (Token::Int, "int"),
    (Token::I8, "i8"),
    (Token::I16, "i16"),
    (Token::I32, "i32"),
    (Token::I64, "i64"),
    (Token::Uint, "uint"),
    (Token::U8, "u8"),
    (Token::U16, "u16"),
    (Token::U32, "u32"),
    (Token::U64, "u64"),
    (Token::F32, "f32"),
    (Token::F64, "f64"),
    (Token::Any, "any"),
];

static LOOKUP_TABLE: OnceLock<HashMap<&'static str, Token>> = OnceLock::new();

fn lookup_table() -> &'static HashMap<&'static str, Token> {
    LOOKUP_TABLE.get_or_init(|| {
        let mut table: HashMap<&'static str, Token> =
            SPELLINGS.iter().map(|&(tok, text)| (text, tok)).collect();
        for open in ["[", "{", "("] {
            table.insert(open, Token::Left);
        }
        for close in ["]", "}", ")"] {
            table.insert(close, Token::Right);
        }
        table
    })
}

impl Token {
    /// Containment test: `self` equals `tok`, or `self` is a category holding `tok`
    pub fn has(self, tok: Token) -> bool {
        if tok == Token::Eof {
            return false;
        }
        if self == tok {
            return true;
        }
        match self {
            Token::Types => tok.is_type(),
            Token::Literals => tok.is_literal(),
            Token::Keywords => tok.is_keyword(),
            Token::Operators => tok.is_operator(),
            Token::Declares => tok.is_declare(),
            _ => false,
        }
    }

    /// Map a raw scanner symbol to its token
    ///
    /// Whitespace runs, newlines and comments are recognized by their first
    /// characters; anything else unknown becomes `Placeholder` for the scanner
    /// to classify.
    pub fn lookup(symbol: &str) -> Token {
        if symbol.is_empty() {
            return Token::Eof;
        }
        if let Some(&tok) = lookup_table().get(symbol) {
            return tok;
        }
        if symbol.starts_with(' ') {
            Token::Spaces
        } else if symbol.starts_with('\t') {
            Token::Tabs
        } else if symbol.starts_with('\n') || symbol.starts_with('\r') {
            Token::Newline
        } else if symbol.starts_with("//") {
            Token::Comment
        } else if symbol.starts_with("---") {
            Token::Comments
        } else {
            Token::Placeholder
        }
    }

    /// Source spelling, when the token has exactly one
    pub fn spelling(self) -> Option<&'static str> {
        SPELLINGS
            .iter()
            .find(|(tok, _)| *tok == self)
            .map(|&(_, text)| text)
    }

    /// Binding strength of an operator, 0 for everything else
    pub fn precedence(self) -> u8 {
        use Token::*;
        match self {
            Or => 1,
            And => 2,
            Not => 3,
            Is | IsNot | Has => 4,
            Eql | Neq | Leq | Geq | Lss | Gtr => 5,
            DotDot => 6,
            Add | Plus | Sub => 7,
            Mul | MulSign | Div | DivSign | Mod | Rem | Shl | ShlSign | Shr | ShrSign => 8,
            BitAnd | BitOr | Xor => 9,
            Anti => 10,
            Dollar => 11,
            _ => 0,
        }
    }

    pub fn is_operator(self) -> bool {
        self >= Token::Dollar && self <= Token::Or
    }

    pub fn is_keyword(self) -> bool {
        self >= Token::Use && self <= Token::Array
    }

    pub fn is_declare(self) -> bool {
        self >= Token::Use && self <= Token::Proc
    }

    pub fn is_type(self) -> bool {
        self >= Token::Bool && self <= Token::Any
    }

    pub fn is_literal(self) -> bool {
        self >= Token::ValString && self <= Token::ValDatetime
    }

    pub fn is_assign(self) -> bool {
        matches!(self, Token::Assign | Token::Inc | Token::Dec)
    }

    pub fn is_category(self) -> bool {
        self >= Token::Types
    }

    /// Layout tokens carry no grammar meaning
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Token::Spaces | Token::Tabs | Token::Newline | Token::Comment | Token::Comments
        )
    }

    fn name(self) -> &'static str {
        match self {
            Token::Eof => "EOF",
            Token::Left => "LEFT",
            Token::Right => "RIGHT",
            Token::Spaces => "SPACES",
            Token::Tabs => "TABS",
            Token::Newline => "NEWLINE",
            Token::Comment => "COMMENT",
            Token::Comments => "COMMENTS",
            Token::Ident => "IDENT",
            Token::Member => "MEMBER",
            Token::Members => "MEMBERS",
            Token::ValString => "VALSTRING",
            Token::ValInteger => "VALINTEGER",
            Token::ValFloat => "VALFLOAT",
            Token::ValBool => "VALBOOL",
            Token::ValDatetime => "VALDATETIME",
            Token::Placeholder => "PLACEHOLDER",
            Token::Types => "TYPES",
            Token::Literals => "LITERALS",
            Token::Keywords => "KEYWORDS",
            Token::Operators => "OPERATORS",
            Token::Declares => "DECLARES",
            other => other.spelling().unwrap_or("UNKNOWN"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_equality_and_categories() {
        assert!(Token::Ident.has(Token::Ident));
        assert!(!Token::Ident.has(Token::Member));
        assert!(Token::Types.has(Token::Int));
        assert!(Token::Types.has(Token::F64));
        assert!(!Token::Types.has(Token::Ident));
        assert!(Token::Literals.has(Token::ValString));
        assert!(!Token::Literals.has(Token::True));
        assert!(Token::Declares.has(Token::Proc));
        assert!(!Token::Declares.has(Token::Break));
        assert!(Token::Keywords.has(Token::Array));
        assert!(Token::Operators.has(Token::Or));
        assert!(Token::Types.has(Token::Types));
    }

    #[test]
    fn test_eof_is_never_contained() {
        for category in [
            Token::Eof,
            Token::Types,
            Token::Literals,
            Token::Keywords,
            Token::Operators,
            Token::Declares,
        ] {
            assert!(!category.has(Token::Eof));
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(Token::lookup(""), Token::Eof);
        assert_eq!(Token::lookup("func"), Token::Func);
        assert_eq!(Token::lookup("<<"), Token::ShlSign);
        assert_eq!(Token::lookup("{"), Token::Left);
        assert_eq!(Token::lookup(")"), Token::Right);
        assert_eq!(Token::lookup("   "), Token::Spaces);
        assert_eq!(Token::lookup("\t\t"), Token::Tabs);
        assert_eq!(Token::lookup("\r\n"), Token::Newline);
        assert_eq!(Token::lookup("// note"), Token::Comment);
        assert_eq!(Token::lookup("----"), Token::Comments);
        assert_eq!(Token::lookup("u32"), Token::U32);
        assert_eq!(Token::lookup("counter"), Token::Placeholder);
    }

    #[test]
    fn test_precedence_and_classification() {
        assert_eq!(Token::Or.precedence(), 1);
        assert_eq!(Token::MulSign.precedence(), 8);
        assert_eq!(Token::Dollar.precedence(), 11);
        assert_eq!(Token::Ident.precedence(), 0);
        assert!(Token::Inc.is_assign());
        assert!(Token::Types.is_category());
        assert!(!Token::Any.is_category());
        assert!(Token::Comment.is_trivia());
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::Eof.to_string(), "EOF");
        assert_eq!(Token::Func.to_string(), "func");
        assert_eq!(Token::Neq.to_string(), "!=");
        assert_eq!(Token::ValInteger.to_string(), "VALINTEGER");
        assert_eq!(Token::Types.to_string(), "TYPES");
    }
}
