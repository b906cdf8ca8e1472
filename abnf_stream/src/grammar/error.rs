//! Grammar construction errors
//!
//! These only arise from invalid grammar definitions. A token that does not
//! match is reported as `MatchResult::Reject`, never as an error.

use super::rule::{RuleId, RuleKind};
use crate::logging::{codes, Code};

pub type GrammarResult<T> = Result<T, GrammarError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("Cannot bind {placeholder_kind} rule {placeholder} to {rule_kind} rule {rule}")]
    KindMismatch {
        placeholder: RuleId,
        placeholder_kind: RuleKind,
        rule: RuleId,
        rule_kind: RuleKind,
    },

    #[error("Rule {rule} cannot be bound while its match is executing")]
    BindWhileHandling { rule: RuleId },

    #[error("Term rule {rule} cannot be bound")]
    TermNotBindable { rule: RuleId },

    #[error("Rule {rule} does not belong to this grammar")]
    UnknownRule { rule: RuleId },
}

impl GrammarError {
    pub fn kind_mismatch(
        placeholder: RuleId,
        placeholder_kind: RuleKind,
        rule: RuleId,
        rule_kind: RuleKind,
    ) -> Self {
        Self::KindMismatch {
            placeholder,
            placeholder_kind,
            rule,
            rule_kind,
        }
    }

    pub fn bind_while_handling(rule: RuleId) -> Self {
        Self::BindWhileHandling { rule }
    }

    pub fn term_not_bindable(rule: RuleId) -> Self {
        Self::TermNotBindable { rule }
    }

    pub fn unknown_rule(rule: RuleId) -> Self {
        Self::UnknownRule { rule }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::KindMismatch { .. } => codes::grammar::KIND_MISMATCH,
            Self::BindWhileHandling { .. } => codes::grammar::BIND_WHILE_HANDLING,
            Self::TermNotBindable { .. } => codes::grammar::TERM_NOT_BINDABLE,
            Self::UnknownRule { .. } => codes::grammar::UNKNOWN_RULE,
        }
    }
}
