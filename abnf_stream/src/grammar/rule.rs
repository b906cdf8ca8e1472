//! Rule arena: construction, binding, cloning and per-token dispatch
//!
//! Every rule lives in a `Grammar` and is addressed by a copyable `RuleId`.
//! Recursive grammars are cyclic graphs of ids, built by declaring a
//! placeholder first and binding it once its children exist.

use super::any::AnyRule;
use super::error::{GrammarError, GrammarResult};
use super::more::MoreRule;
use super::once::OnceRule;
use super::option::OptionRule;
use super::result::MatchResult;
use super::seq::SeqRule;
use super::term::TermRule;
use crate::config::compile_time::grammar::{MAX_RECURSION_DEPTH, MAX_RULES};
use crate::config::runtime;
use crate::logging::codes;
use crate::tokens::Token;
use crate::{log_debug, log_error};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// HANDLES AND KINDS
// ============================================================================

/// Handle to a rule inside a `Grammar`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleId(usize);

impl RuleId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The six rule variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    Term,
    Option,
    Once,
    More,
    Any,
    Seq,
}

impl RuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::Term => "Term",
            RuleKind::Option => "Option",
            RuleKind::Once => "Once",
            RuleKind::More => "More",
            RuleKind::Any => "Any",
            RuleKind::Seq => "Seq",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// NODES
// ============================================================================

#[derive(Debug, Clone)]
pub(super) enum Rule {
    Term(TermRule),
    Option(OptionRule),
    Once(OnceRule),
    More(MoreRule),
    Any(AnyRule),
    Seq(SeqRule),
}

impl Rule {
    fn kind(&self) -> RuleKind {
        match self {
            Rule::Term(_) => RuleKind::Term,
            Rule::Option(_) => RuleKind::Option,
            Rule::Once(_) => RuleKind::Once,
            Rule::More(_) => RuleKind::More,
            Rule::Any(_) => RuleKind::Any,
            Rule::Seq(_) => RuleKind::Seq,
        }
    }

    /// Rules referenced by this one, in a fixed order understood by `relink`
    fn links(&self) -> Vec<RuleId> {
        match self {
            Rule::Term(_) => Vec::new(),
            Rule::Option(rule) => vec![rule.sub],
            Rule::Once(rule) => vec![rule.sub],
            Rule::More(rule) => vec![rule.sub, rule.sep],
            Rule::Any(rule) => rule.children.to_vec(),
            Rule::Seq(rule) => rule.children.to_vec(),
        }
    }

    /// Same variant in its ready state, pointing at `links`
    fn relink(&self, links: &[RuleId]) -> Rule {
        match self {
            Rule::Term(rule) => Rule::Term(rule.clone()),
            Rule::Option(_) => Rule::Option(OptionRule::new(links[0])),
            Rule::Once(_) => Rule::Once(OnceRule::new(links[0])),
            Rule::More(_) => Rule::More(MoreRule::new(links[0], links[1])),
            Rule::Any(_) => Rule::Any(AnyRule::new(links.into())),
            Rule::Seq(rule) => Rule::Seq(rule.relinked(links.into())),
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    rule: Rule,
    /// True while this node's own `match_token` is executing
    handling: bool,
    /// Lazily created instance serving recursive re-entry
    next: Option<RuleId>,
    /// Nesting level of recursive instances; 0 for rules built directly
    depth: usize,
}

impl Node {
    fn new(rule: Rule, depth: usize) -> Self {
        Self {
            rule,
            handling: false,
            next: None,
            depth,
        }
    }
}

/// Node counts by variant plus recursion bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarStats {
    pub rules: usize,
    pub terms: usize,
    pub options: usize,
    pub onces: usize,
    pub mores: usize,
    pub anys: usize,
    pub seqs: usize,
    pub nested_instances: usize,
    pub max_depth: usize,
}

// ============================================================================
// GRAMMAR ARENA
// ============================================================================

/// Owner of every rule of one grammar.
///
/// A grammar holds the mutable matching state of all its rules, so one
/// grammar serves one parse at a time. `Clone` produces an independent
/// grammar in which every `RuleId` refers to the corresponding copy.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    nodes: Vec<Node>,
    nested_instances: usize,
    recursion_fault: bool,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, rule: Rule) -> RuleId {
        let id = RuleId(self.nodes.len());
        self.nodes.push(Node::new(rule, 0));
        id
    }

    fn node(&self, id: RuleId) -> GrammarResult<&Node> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| GrammarError::unknown_rule(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: RuleId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn kind(&self, id: RuleId) -> Option<RuleKind> {
        self.nodes.get(id.0).map(|node| node.rule.kind())
    }

    // ------------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------------

    /// Matches one token contained in any of `categories`; empty matches nothing
    pub fn term(&mut self, categories: &[Token]) -> RuleId {
        self.push(Rule::Term(TermRule::new(categories.to_vec())))
    }

    pub fn option(&mut self, sub: RuleId) -> RuleId {
        self.push(Rule::Option(OptionRule::new(sub)))
    }

    pub fn once(&mut self, sub: RuleId) -> RuleId {
        self.push(Rule::Once(OnceRule::new(sub)))
    }

    /// One or more `sub`, separated by `sep` when given
    pub fn more(&mut self, sub: RuleId, sep: Option<RuleId>) -> RuleId {
        let sep = match sep {
            Some(sep) => sep,
            None => self.term(&[]),
        };
        self.push(Rule::More(MoreRule::new(sub, sep)))
    }

    pub fn any(&mut self, children: &[RuleId]) -> RuleId {
        self.push(Rule::Any(AnyRule::new(children.into())))
    }

    pub fn seq(&mut self, children: &[RuleId]) -> RuleId {
        let boundary = self.optional_tail(children);
        self.push(Rule::Seq(SeqRule::new(children.into(), boundary)))
    }

    /// Empty `Any` to be bound once its children exist
    pub fn declare_any(&mut self) -> RuleId {
        self.any(&[])
    }

    /// Empty `Seq` to be bound once its children exist
    pub fn declare_seq(&mut self) -> RuleId {
        self.seq(&[])
    }

    /// Index from which every child of a sequence is optional
    fn optional_tail(&self, children: &[RuleId]) -> usize {
        children
            .iter()
            .rposition(|&child| !self.is_option(child))
            .map_or(0, |last_required| last_required + 1)
    }

    // ------------------------------------------------------------------------
    // Binding
    // ------------------------------------------------------------------------

    /// Fill in a placeholder; panics on misuse, see `try_bind`
    pub fn bind(&mut self, placeholder: RuleId, rule: RuleId) {
        if let Err(err) = self.try_bind(placeholder, rule) {
            log_error!(err.error_code(), &err.to_string(),
                "placeholder" => placeholder,
                "rule" => rule
            );
            panic!("{}", err);
        }
    }

    /// Fill in a placeholder.
    ///
    /// `Any` and `Seq` placeholders take over the children of `rule`, which
    /// must be of the same kind. `Option`, `Once` and `More` take `rule` as
    /// their new sub-rule. `Term` rules cannot be bound.
    pub fn try_bind(&mut self, placeholder: RuleId, rule: RuleId) -> GrammarResult<()> {
        let target = self.node(placeholder)?;
        let source = self.node(rule)?;
        if target.handling {
            return Err(GrammarError::bind_while_handling(placeholder));
        }

        let bound = match (&target.rule, &source.rule) {
            (Rule::Term(_), _) => return Err(GrammarError::term_not_bindable(placeholder)),
            (Rule::Any(_), Rule::Any(source)) => Rule::Any(AnyRule::new(source.children.clone())),
            (Rule::Seq(_), Rule::Seq(source)) => {
                let children: Arc<[RuleId]> = source.children.clone();
                let boundary = self.optional_tail(&children);
                Rule::Seq(SeqRule::new(children, boundary))
            }
            (Rule::Option(_), _) => Rule::Option(OptionRule::new(rule)),
            (Rule::Once(_), _) => Rule::Once(OnceRule::new(rule)),
            (Rule::More(current), _) => Rule::More(MoreRule::new(rule, current.sep)),
            (target_rule, source_rule) => {
                return Err(GrammarError::kind_mismatch(
                    placeholder,
                    target_rule.kind(),
                    rule,
                    source_rule.kind(),
                ))
            }
        };

        self.nodes[placeholder.0].rule = bound;
        log_debug!(code = codes::success::RULE_BOUND, "Placeholder rule bound",
            "placeholder" => placeholder,
            "rule" => rule
        );
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Whether the rule can match zero tokens
    pub fn is_option(&self, id: RuleId) -> bool {
        self.is_option_guarded(id, &mut HashSet::new())
    }

    fn is_option_guarded(&self, id: RuleId, visiting: &mut HashSet<RuleId>) -> bool {
        // A cycle back to a rule under evaluation contributes nothing optional
        if !visiting.insert(id) {
            return false;
        }
        let optional = match self.nodes.get(id.0).map(|node| &node.rule) {
            None => false,
            Some(Rule::Term(rule)) => rule.is_empty(),
            Some(Rule::Option(_)) => true,
            Some(Rule::Once(rule)) => self.is_option_guarded(rule.sub, visiting),
            Some(Rule::More(_)) | Some(Rule::Seq(_)) => false,
            Some(Rule::Any(rule)) => rule
                .children
                .iter()
                .all(|&child| self.is_option_guarded(child, visiting)),
        };
        visiting.remove(&id);
        optional
    }

    /// True once a nested instance was refused, for depth or for arena size
    pub fn recursion_limit_hit(&self) -> bool {
        self.recursion_fault
    }

    pub fn clear_fault(&mut self) {
        self.recursion_fault = false;
    }

    pub fn stats(&self) -> GrammarStats {
        let mut stats = GrammarStats {
            rules: self.nodes.len(),
            nested_instances: self.nested_instances,
            ..GrammarStats::default()
        };
        for node in &self.nodes {
            match node.rule.kind() {
                RuleKind::Term => stats.terms += 1,
                RuleKind::Option => stats.options += 1,
                RuleKind::Once => stats.onces += 1,
                RuleKind::More => stats.mores += 1,
                RuleKind::Any => stats.anys += 1,
                RuleKind::Seq => stats.seqs += 1,
            }
            stats.max_depth = stats.max_depth.max(node.depth);
        }
        stats
    }

    // ------------------------------------------------------------------------
    // Cloning
    // ------------------------------------------------------------------------

    /// Deep copy of the graph reachable from `id`, in its ready state.
    ///
    /// Cycles are copied as cycles: a reference back to a rule already being
    /// copied points at its copy. Terms are stateless and shared.
    pub fn clone_rule(&mut self, id: RuleId) -> RuleId {
        if !self.contains(id) {
            return id;
        }
        self.copy_graph(id, 0, &mut HashMap::new())
    }

    /// Number of nodes `copy_graph` allocates for `id`; terms are shared
    fn reachable_rules(&self, id: RuleId) -> usize {
        let mut seen = HashSet::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            let Some(node) = self.nodes.get(next.0) else {
                continue;
            };
            if matches!(node.rule, Rule::Term(_)) || !seen.insert(next) {
                continue;
            }
            pending.extend(node.rule.links());
        }
        seen.len()
    }

    fn copy_graph(
        &mut self,
        id: RuleId,
        depth_increase: usize,
        copies: &mut HashMap<RuleId, RuleId>,
    ) -> RuleId {
        let source = &self.nodes[id.0];
        if let Rule::Term(_) = source.rule {
            return id;
        }
        if let Some(&copy) = copies.get(&id) {
            return copy;
        }

        let links = source.rule.links();
        let template = source.rule.clone();
        let depth = source.depth + depth_increase;

        // Reserve the slot first so back-edges resolve to the copy
        let copy = RuleId(self.nodes.len());
        self.nodes.push(Node::new(template.relink(&links), depth));
        copies.insert(id, copy);

        let copied_links: Vec<RuleId> = links
            .iter()
            .map(|&link| self.copy_graph(link, depth_increase, copies))
            .collect();
        self.nodes[copy.0].rule = template.relink(&copied_links);
        copy
    }

    // ------------------------------------------------------------------------
    // Matching
    // ------------------------------------------------------------------------

    /// Feed one token to a rule
    pub fn match_token(&mut self, id: RuleId, tok: Token) -> MatchResult {
        let Some(node) = self.nodes.get(id.0) else {
            log_error!(codes::grammar::UNKNOWN_RULE, "Match on a rule outside this grammar",
                "rule" => id
            );
            return MatchResult::Reject;
        };

        if let Rule::Term(term) = &node.rule {
            return term.matches(tok);
        }

        if node.handling {
            if let Rule::Once(_) = node.rule {
                log_error!(codes::grammar::ONCE_RECURSION, "Once rule re-entered",
                    "rule" => id
                );
                panic!("Once rule {} does not support recursion", id);
            }
            return self.reenter(id, tok);
        }

        let mut rule = node.rule.clone();
        self.nodes[id.0].handling = true;

        let result = match &mut rule {
            Rule::Term(term) => term.matches(tok),
            Rule::Option(option) => self.match_option(option, tok),
            Rule::Once(once) => self.match_once(once, tok),
            Rule::More(more) => self.match_more(more, tok),
            Rule::Any(any) => self.match_any(any, tok),
            Rule::Seq(seq) => self.match_seq(seq, tok),
        };

        let node = &mut self.nodes[id.0];
        node.handling = false;
        node.rule = rule;

        if tok == Token::Eof {
            if let Some(next) = node.next {
                self.match_token(next, Token::Eof);
            }
        }

        result
    }

    /// Return a rule to its ready state
    pub fn reset(&mut self, id: RuleId) -> MatchResult {
        self.match_token(id, Token::Eof)
    }

    /// Route a recursive call to this rule's nested instance
    fn reenter(&mut self, id: RuleId, tok: Token) -> MatchResult {
        // The owner hands Eof to its instance once, after its own reset
        if tok == Token::Eof {
            return MatchResult::Done;
        }
        let next = match self.nodes[id.0].next {
            Some(next) => next,
            None => match self.spawn_nested(id) {
                Some(next) => next,
                None => return MatchResult::Reject,
            },
        };
        self.match_token(next, tok)
    }

    fn spawn_nested(&mut self, id: RuleId) -> Option<RuleId> {
        let depth = self.nodes[id.0].depth + 1;
        if depth > MAX_RECURSION_DEPTH {
            self.recursion_fault = true;
            log_error!(codes::grammar::RECURSION_LIMIT, "Nested rule instance refused",
                "rule" => id,
                "depth" => depth,
                "limit" => MAX_RECURSION_DEPTH
            );
            return None;
        }
        let needed = self.reachable_rules(id);
        if self.nodes.len() + needed > MAX_RULES {
            self.recursion_fault = true;
            log_error!(codes::grammar::TOO_MANY_RULES, "Rule arena is full",
                "rule" => id,
                "rules" => self.nodes.len(),
                "needed" => needed,
                "limit" => MAX_RULES
            );
            return None;
        }

        let nested = self.copy_graph(id, 1, &mut HashMap::new());
        self.nodes[id.0].next = Some(nested);
        self.nested_instances += 1;

        if runtime::engine_preferences().log_nested_clones {
            log_debug!(code = codes::success::NESTED_INSTANCE_CREATED, "Nested rule instance created",
                "rule" => id,
                "instance" => nested,
                "depth" => depth
            );
        }
        Some(nested)
    }
}
