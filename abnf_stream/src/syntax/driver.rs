//! Token-at-a-time driver around a root rule
//!
//! The `Matcher` owns the streaming protocol on the consumer side: it feeds
//! each token to the root, counts completed matches, restarts the root when
//! a match ends before the current token, and turns root rejections into
//! located `SyntaxError`s.

use super::error::{SyntaxError, SyntaxResult};
use crate::config::compile_time::syntax::{MAX_ERROR_HISTORY, MAX_REPORTED_STEPS};
use crate::config::runtime::engine_preferences;
use crate::grammar::{Grammar, GrammarStats, MatchResult, RuleId};
use crate::logging::codes;
use crate::tokens::{SpannedToken, Token};
use crate::utils::Span;
use crate::{log_debug, log_error, log_success};
use serde::Serialize;
use std::collections::VecDeque;

/// One token fed to the root and the answer it produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchStep {
    pub index: usize,
    pub token: Token,
    pub span: Span,
    pub result: MatchResult,
    /// The previous match ended before this token, which then started a new one
    pub restarted: bool,
}

/// Outcome of driving a whole token stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub root: RuleId,
    pub tokens: usize,
    pub completions: usize,
    pub steps: Vec<MatchStep>,
    /// Steps beyond the reporting limit were not recorded
    pub truncated: bool,
    pub grammar: GrammarStats,
}

impl MatchReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub struct Matcher<'g> {
    grammar: &'g mut Grammar,
    root: RuleId,
    index: usize,
    /// Result of the last token since the root was last ready
    last: Option<MatchResult>,
    completions: usize,
    steps: Vec<MatchStep>,
    truncated: bool,
    error_history: VecDeque<SyntaxError>,
    trace: bool,
}

impl<'g> Matcher<'g> {
    pub fn new(grammar: &'g mut Grammar, root: RuleId) -> Self {
        log_debug!("Creating matcher", "root" => root, "rules" => grammar.len());
        grammar.clear_fault();

        Self {
            grammar,
            root,
            index: 0,
            last: None,
            completions: 0,
            steps: Vec::new(),
            truncated: false,
            error_history: VecDeque::new(),
            trace: engine_preferences().trace_matches,
        }
    }

    pub fn completions(&self) -> usize {
        self.completions
    }

    pub fn steps(&self) -> &[MatchStep] {
        &self.steps
    }

    /// Most recent errors, oldest first
    pub fn errors(&self) -> impl Iterator<Item = &SyntaxError> {
        self.error_history.iter()
    }

    /// Feed one token; `Token::Eof` finishes the current match
    pub fn feed(&mut self, token: SpannedToken) -> SyntaxResult<MatchResult> {
        if token.value == Token::Eof {
            return self.finish(token.span).map(|_| MatchResult::Done);
        }

        let index = self.index;
        self.index += 1;

        let mut result = self.grammar.match_token(self.root, token.value);
        let mut restarted = false;

        if result == MatchResult::Done && !self.grammar.recursion_limit_hit() {
            // The previous match, if any, is complete; the root is ready again
            restarted = self.last.is_some();
            if restarted {
                self.complete();
            }
            result = self.grammar.match_token(self.root, token.value);
            if result == MatchResult::Done {
                // An optional root that cannot use this token would loop forever
                result = MatchResult::Reject;
            }
        }

        // A refused nested instance invalidates whatever the root answered
        if self.grammar.recursion_limit_hit() {
            result = MatchResult::Reject;
        }

        self.record(index, token, result, restarted);

        match result {
            MatchResult::Reject => Err(self.reject(index, token)),
            MatchResult::AcceptComplete => {
                self.complete();
                Ok(result)
            }
            _ => {
                self.last = Some(result);
                Ok(result)
            }
        }
    }

    /// End the stream: the root must be at a completion point
    pub fn finish(&mut self, span: Span) -> SyntaxResult<usize> {
        let last = self.last.take();
        let index = self.index;
        self.grammar.reset(self.root);
        self.record(
            index,
            SpannedToken::new(Token::Eof, span),
            MatchResult::Done,
            false,
        );

        match last {
            Some(MatchResult::Pending) => {
                let error = SyntaxError::unexpected_end_of_input(span);
                log_error!(error.error_code(), "Input ended inside a match",
                    span = span,
                    "root" => self.root,
                    "tokens" => index
                );
                Err(self.remember(error))
            }
            Some(MatchResult::PendingComplete) => {
                self.complete();
                Ok(self.completions)
            }
            _ => Ok(self.completions),
        }
    }

    fn complete(&mut self) {
        self.completions += 1;
        self.last = None;
    }

    fn record(&mut self, index: usize, token: SpannedToken, result: MatchResult, restarted: bool) {
        if self.trace {
            log_debug!("Token matched",
                "index" => index,
                "token" => token.value,
                "result" => result,
                "restarted" => restarted
            );
        }

        if self.steps.len() >= MAX_REPORTED_STEPS {
            self.truncated = true;
            return;
        }
        self.steps.push(MatchStep {
            index,
            token: token.value,
            span: token.span,
            result,
            restarted,
        });
    }

    fn reject(&mut self, index: usize, token: SpannedToken) -> SyntaxError {
        // The rejecting rule is back in its ready state; the rest of the
        // graph may still hold partial state
        self.grammar.reset(self.root);
        self.last = None;

        let error = if self.grammar.recursion_limit_hit() {
            self.grammar.clear_fault();
            SyntaxError::recursion_limit(index, token.span)
        } else {
            SyntaxError::unexpected_token(token.value, index, token.span)
        };

        log_error!(error.error_code(), &error.to_string(),
            span = token.span,
            "root" => self.root,
            "index" => index
        );
        self.remember(error)
    }

    fn remember(&mut self, error: SyntaxError) -> SyntaxError {
        if self.error_history.len() >= MAX_ERROR_HISTORY {
            self.error_history.pop_front();
        }
        self.error_history.push_back(error.clone());
        error
    }

    pub fn into_report(self) -> MatchReport {
        MatchReport {
            root: self.root,
            tokens: self.index,
            completions: self.completions,
            steps: self.steps,
            truncated: self.truncated,
            grammar: self.grammar.stats(),
        }
    }
}

/// Run a whole token stream through `root`, stopping at the first error.
///
/// A stream without a trailing `Eof` is finished at the end of its last token.
pub fn match_tokens(
    grammar: &mut Grammar,
    root: RuleId,
    tokens: &[SpannedToken],
) -> SyntaxResult<MatchReport> {
    let mut matcher = Matcher::new(grammar, root);
    let mut finished = false;

    for &token in tokens {
        matcher.feed(token)?;
        if token.value == Token::Eof {
            finished = true;
            break;
        }
    }

    if !finished {
        let end = tokens
            .last()
            .map(|token| Span::point(token.span.end))
            .unwrap_or_default();
        matcher.finish(end)?;
    }

    let report = matcher.into_report();
    log_success!(codes::success::MATCH_COMPLETE, "Token stream matched",
        "root" => report.root,
        "tokens" => report.tokens,
        "completions" => report.completions
    );
    Ok(report)
}
