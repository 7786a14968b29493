//! # Listener Sink
//!
//! The parser announces completed nodes, recovery insertions and removed
//! input through a [`Listener`]. One implementation builds the AST
//! ([`crate::ast::AstListener`]); [`EventLog`] records the raw event stream
//! for tests and tooling.
//!
//! Events arrive in source order: a missing-node event always precedes its
//! successor's events, and an invalid-token event precedes the events of the
//! re-attempted rule.

use crate::grammar::RuleId;
use crate::lexer::Token;

/// Sink for parse events.
pub trait Listener {
    /// A production has been entered.
    fn enter_node(&mut self, rule: RuleId);

    /// A rule has completed. For terminals `tokens` holds the consumed
    /// token; for productions it holds structural tokens, if any.
    fn exit_node(&mut self, rule: RuleId, tokens: &[Token]);

    /// Recovery inserted a synthetic node for a rule the input lacked.
    fn add_missing_node(&mut self, rule: RuleId);

    /// Recovery removed an input token; it is preserved for diagnostics.
    fn add_invalid_token(&mut self, token: Token);

    /// An absent optional produced an empty node.
    fn add_empty_node(&mut self);
}

/// A single recorded parse event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    Enter(RuleId),
    Exit { rule: RuleId, tokens: Vec<Token> },
    Missing(RuleId),
    Invalid(Token),
    Empty,
}

/// Listener that records every event in order.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<ParseEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded events, in emission order.
    #[must_use]
    pub fn events(&self) -> &[ParseEvent] {
        &self.events
    }

    /// Consume the log, yielding its events.
    #[must_use]
    pub fn into_events(self) -> Vec<ParseEvent> {
        self.events
    }
}

impl Listener for EventLog {
    fn enter_node(&mut self, rule: RuleId) {
        self.events.push(ParseEvent::Enter(rule));
    }

    fn exit_node(&mut self, rule: RuleId, tokens: &[Token]) {
        self.events.push(ParseEvent::Exit {
            rule,
            tokens: tokens.to_vec(),
        });
    }

    fn add_missing_node(&mut self, rule: RuleId) {
        self.events.push(ParseEvent::Missing(rule));
    }

    fn add_invalid_token(&mut self, token: Token) {
        self.events.push(ParseEvent::Invalid(token));
    }

    fn add_empty_node(&mut self) {
        self.events.push(ParseEvent::Empty);
    }
}
