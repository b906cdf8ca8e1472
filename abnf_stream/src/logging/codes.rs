//! Error and success codes for the matching engine
//!
//! Single source of truth for every code the crate logs, together with its
//! classification metadata.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Error, success or placeholder code such as `E050` or `I040`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Classification of one code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    /// An input problem; matching can continue with the next token or file
    const fn recoverable(
        code: Code,
        category: &'static str,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code: code.as_str(),
            category,
            severity: Severity::Medium,
            recoverable: true,
            requires_halt: false,
            description,
            recommended_action,
        }
    }

    /// A broken grammar, a broken build or an exhausted limit
    const fn fatal(
        code: Code,
        category: &'static str,
        severity: Severity,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code: code.as_str(),
            category,
            severity,
            recoverable: false,
            requires_halt: true,
            description,
            recommended_action,
        }
    }

    const fn success(code: Code, description: &'static str) -> Self {
        Self {
            code: code.as_str(),
            category: "Success",
            severity: Severity::Low,
            recoverable: true,
            requires_halt: false,
            description,
            recommended_action: "No action required",
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
}

/// Scanner error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const TOO_MANY_TOKENS: Code = Code::new("E022");
    pub const SYMBOL_TOO_LONG: Code = Code::new("E023");
    pub const UNTERMINATED_COMMENT: Code = Code::new("E024");
}

/// Driver error codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E050");
    pub const UNEXPECTED_END_OF_INPUT: Code = Code::new("E051");
    pub const RECURSION_LIMIT_EXCEEDED: Code = Code::new("E052");
    pub const UNKNOWN_PRODUCTION: Code = Code::new("E053");
}

/// Grammar construction and evaluation error codes
pub mod grammar {
    use super::Code;

    pub const KIND_MISMATCH: Code = Code::new("E060");
    pub const BIND_WHILE_HANDLING: Code = Code::new("E061");
    pub const TERM_NOT_BINDABLE: Code = Code::new("E062");
    pub const UNKNOWN_RULE: Code = Code::new("E063");
    pub const RECURSION_LIMIT: Code = Code::new("E064");
    pub const ONCE_RECURSION: Code = Code::new("E065");
    pub const TOO_MANY_RULES: Code = Code::new("E066");
}

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const MATCH_COMPLETE: Code = Code::new("I040");
    pub const RULE_BOUND: Code = Code::new("I060");
    pub const NESTED_INSTANCE_CREATED: Code = Code::new("I061");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

const CODE_TABLE: &[ErrorMetadata] = &[
    ErrorMetadata::fatal(
        system::INTERNAL_ERROR,
        "System",
        Severity::Critical,
        "Internal engine error",
        "File a bug report with the input that triggered it",
    ),
    ErrorMetadata::recoverable(
        lexical::INVALID_CHARACTER,
        "Lexical",
        "Invalid character or unclassifiable symbol",
        "Remove or replace the offending character",
    ),
    ErrorMetadata::recoverable(
        lexical::UNTERMINATED_STRING,
        "Lexical",
        "Unterminated string literal",
        "Add the closing quote",
    ),
    ErrorMetadata::fatal(
        lexical::TOO_MANY_TOKENS,
        "Lexical",
        Severity::High,
        "Token count limit exceeded",
        "Split the input or raise max_token_count",
    ),
    ErrorMetadata::recoverable(
        lexical::SYMBOL_TOO_LONG,
        "Lexical",
        "Symbol exceeds maximum length",
        "Shorten the identifier or literal",
    ),
    ErrorMetadata::recoverable(
        lexical::UNTERMINATED_COMMENT,
        "Lexical",
        "Block comment opened with --- is never closed",
        "Close the block comment with a matching ---",
    ),
    ErrorMetadata::recoverable(
        syntax::UNEXPECTED_TOKEN,
        "Syntax",
        "Unexpected token during matching",
        "Check token sequence against the grammar",
    ),
    ErrorMetadata::recoverable(
        syntax::UNEXPECTED_END_OF_INPUT,
        "Syntax",
        "Input ended before the rule completed",
        "Complete the construct before end of input",
    ),
    ErrorMetadata::fatal(
        syntax::RECURSION_LIMIT_EXCEEDED,
        "Syntax",
        Severity::High,
        "Grammar recursion limit reached while matching",
        "Reduce nesting depth of the input",
    ),
    ErrorMetadata::recoverable(
        syntax::UNKNOWN_PRODUCTION,
        "Syntax",
        "No production with the requested name",
        "Pick one of the productions listed by --help",
    ),
    ErrorMetadata::fatal(
        grammar::KIND_MISMATCH,
        "Grammar",
        Severity::Critical,
        "Placeholder bound to a rule of a different kind",
        "Bind placeholders only to rules of the same variant",
    ),
    ErrorMetadata::fatal(
        grammar::BIND_WHILE_HANDLING,
        "Grammar",
        Severity::Critical,
        "Rule bound while its match is executing",
        "Finish grammar construction before matching",
    ),
    ErrorMetadata::fatal(
        grammar::TERM_NOT_BINDABLE,
        "Grammar",
        Severity::Critical,
        "Term rules cannot be bound",
        "Declare an Any or Seq placeholder instead",
    ),
    ErrorMetadata::fatal(
        grammar::UNKNOWN_RULE,
        "Grammar",
        Severity::Critical,
        "Rule handle does not belong to this grammar",
        "Use handles returned by the same grammar",
    ),
    ErrorMetadata::fatal(
        grammar::RECURSION_LIMIT,
        "Grammar",
        Severity::High,
        "Nested rule instance exceeds recursion depth",
        "Reduce input nesting or raise max_recursion_depth",
    ),
    ErrorMetadata::fatal(
        grammar::ONCE_RECURSION,
        "Grammar",
        Severity::Critical,
        "Once rule re-entered recursively",
        "Do not reference a Once rule from inside itself",
    ),
    ErrorMetadata::fatal(
        grammar::TOO_MANY_RULES,
        "Grammar",
        Severity::High,
        "Rule arena exceeds maximum size",
        "Reduce grammar size or raise max_rules",
    ),
    ErrorMetadata::success(success::SYSTEM_INITIALIZATION_COMPLETED, "System initialization completed"),
    ErrorMetadata::success(success::TOKENIZATION_COMPLETE, "Tokenization completed"),
    ErrorMetadata::success(success::MATCH_COMPLETE, "Token stream matched grammar"),
    ErrorMetadata::success(success::RULE_BOUND, "Placeholder rule bound"),
    ErrorMetadata::success(success::NESTED_INSTANCE_CREATED, "Nested rule instance created for recursion"),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| CODE_TABLE.iter().map(|entry| (entry.code, entry)).collect())
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code).copied()
}

/// Unregistered codes classify as `Medium`
pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code).map_or(Severity::Medium, |metadata| metadata.severity)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code).map_or(true, |metadata| metadata.recoverable)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code).is_some_and(|metadata| metadata.requires_halt)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code).map_or("Unknown error", |metadata| metadata.description)
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code).map_or("No specific action available", |metadata| {
        metadata.recommended_action
    })
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code).map_or("Unknown", |metadata| metadata.category)
}
