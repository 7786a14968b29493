//! # Parser
//!
//! The recursive-descent driver and its error-recovery engine.
//!
//! ## Overview
//!
//! [`Parser`] owns the token buffer and the live context stack, and is
//! parametric in its two capability sinks: a [`Listener`] receiving tree
//! events and an [`ErrorReporter`] receiving diagnostics. The driver
//! routines live in [`driver`]; the bounded-lookahead recovery engine lives
//! in [`recovery`].
//!
//! For the common case, [`parse`] runs the driver with an AST-building
//! listener and a collecting reporter:
//!
//! ```rust
//! let result = resyn::parse("function foo() returns int { int x = 1; }");
//! assert!(result.diagnostics.is_empty());
//! ```
//!
//! Malformed input never aborts the parse; it yields diagnostics and a tree
//! with synthetic nodes in the required positions:
//!
//! ```rust
//! let result = resyn::parse("function foo() { int x = 1 }");
//! assert_eq!(result.diagnostics.len(), 1);
//! assert_eq!(result.diagnostics[0].to_string(), "1:27: missing ';'");
//! ```

pub mod driver;
pub mod recovery;

pub use recovery::{Action, Solution, LOOKAHEAD_LIMIT};

use crate::ast::{AstListener, AstNode};
use crate::error::{CollectingReporter, Diagnostic, ErrorReporter};
use crate::grammar::ContextStack;
use crate::lexer::{Lexer, Token, TokenBuffer};
use crate::listener::Listener;
use std::time::{Duration, Instant};

/// Knobs for the recovery engine.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Treat an isolated `;` at a statement position as an empty statement
    /// to remove, rather than searching the statement alternatives. Disable
    /// for strictness comparisons.
    pub empty_statement_recovery: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            empty_statement_recovery: true,
        }
    }
}

/// Counters collected during a parse.
#[derive(Debug, Clone, Default)]
pub struct ParseMetrics {
    pub tokens_consumed: usize,
    pub nodes_created: usize,
    pub errors_recovered: usize,
    pub parse_time: Duration,
}

/// The error-tolerant parser.
pub struct Parser<'s, L, R> {
    buffer: TokenBuffer<'s>,
    ctx: ContextStack,
    listener: L,
    reporter: R,
    config: ParserConfig,
    metrics: ParseMetrics,
}

impl<'s, L: Listener, R: ErrorReporter> Parser<'s, L, R> {
    /// Create a parser over the given source with the default configuration.
    #[must_use]
    pub fn new(source: &'s str, listener: L, reporter: R) -> Self {
        Self::with_config(source, listener, reporter, ParserConfig::default())
    }

    /// Create a parser with an explicit configuration.
    #[must_use]
    pub fn with_config(source: &'s str, listener: L, reporter: R, config: ParserConfig) -> Self {
        Self {
            buffer: TokenBuffer::new(Lexer::new(source)),
            ctx: ContextStack::new(),
            listener,
            reporter,
            config,
            metrics: ParseMetrics::default(),
        }
    }

    /// Run the parse to end of input.
    pub fn parse(&mut self) {
        self.parse_comp_unit();
    }

    /// Number of currently open productions on the live context stack.
    #[must_use]
    pub fn context_depth(&self) -> usize {
        self.ctx.depth()
    }

    /// The listener, for inspection mid-parse.
    #[must_use]
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// The reporter, for inspection mid-parse.
    #[must_use]
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Metrics collected so far.
    #[must_use]
    pub const fn metrics(&self) -> &ParseMetrics {
        &self.metrics
    }

    /// Consume the parser, yielding its sinks and metrics.
    #[must_use]
    pub fn finish(self) -> (L, R, ParseMetrics) {
        (self.listener, self.reporter, self.metrics)
    }
}

/// Outcome of a convenience parse: the total tree, the diagnostics, the
/// input recovery removed, and the collected metrics.
#[derive(Debug)]
pub struct ParseResult {
    pub root: AstNode,
    pub diagnostics: Vec<Diagnostic>,
    pub invalid_tokens: Vec<Token>,
    pub metrics: ParseMetrics,
}

impl ParseResult {
    /// Check whether the input parsed without recovery.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parse source text with the default configuration.
#[must_use]
pub fn parse(source: &str) -> ParseResult {
    parse_with_config(source, ParserConfig::default())
}

/// Parse source text with an explicit configuration.
#[must_use]
pub fn parse_with_config(source: &str, config: ParserConfig) -> ParseResult {
    let start = Instant::now();
    let mut parser = Parser::with_config(
        source,
        AstListener::new(),
        CollectingReporter::new(),
        config,
    );
    parser.parse();
    let (listener, reporter, mut metrics) = parser.finish();
    metrics.parse_time = start.elapsed();
    let (root, invalid_tokens) = listener.finish();
    ParseResult {
        root,
        diagnostics: reporter.into_diagnostics(),
        invalid_tokens,
        metrics,
    }
}
