//! The five observable outcomes of feeding one token to a rule

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single `match_token` call.
///
/// `Reject`, `AcceptComplete` and `Done` leave the rule back in its ready
/// state. `Pending` and `PendingComplete` leave it primed for the next token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    /// Token not matched, nothing consumed
    Reject,
    /// Token consumed, more tokens required
    Pending,
    /// Token consumed, a complete match exists but may still extend
    PendingComplete,
    /// Token consumed, match is definitively complete
    AcceptComplete,
    /// Token not consumed, the match was already complete before it
    Done,
}

impl MatchResult {
    /// The token was consumed by the rule
    pub fn consumed(self) -> bool {
        matches!(
            self,
            MatchResult::Pending | MatchResult::PendingComplete | MatchResult::AcceptComplete
        )
    }

    /// A legal completion point exists at this token
    pub fn is_complete(self) -> bool {
        matches!(
            self,
            MatchResult::PendingComplete | MatchResult::AcceptComplete | MatchResult::Done
        )
    }

    /// The rule is waiting for more input
    pub fn is_pending(self) -> bool {
        matches!(self, MatchResult::Pending | MatchResult::PendingComplete)
    }

    /// The rule has returned to its ready-for-fresh-input state
    pub fn is_terminal(self) -> bool {
        !self.is_pending()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchResult::Reject => "Reject",
            MatchResult::Pending => "Pending",
            MatchResult::PendingComplete => "PendingComplete",
            MatchResult::AcceptComplete => "AcceptComplete",
            MatchResult::Done => "Done",
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_lattice() {
        use MatchResult::*;
        let all = [Reject, Pending, PendingComplete, AcceptComplete, Done];

        let consumed: Vec<_> = all.iter().filter(|r| r.consumed()).collect();
        assert_eq!(consumed, [&Pending, &PendingComplete, &AcceptComplete]);

        let complete: Vec<_> = all.iter().filter(|r| r.is_complete()).collect();
        assert_eq!(complete, [&PendingComplete, &AcceptComplete, &Done]);

        let terminal: Vec<_> = all.iter().filter(|r| r.is_terminal()).collect();
        assert_eq!(terminal, [&Reject, &AcceptComplete, &Done]);
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(MatchResult::PendingComplete.to_string(), "PendingComplete");
        let json = serde_json::to_string(&MatchResult::Done).unwrap();
        assert_eq!(json, "\"Done\"");
    }
}
