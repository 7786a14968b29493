//! # Resyn
//!
//! An experimental, hand-written, error-tolerant parser for a subset of a
//! statically typed scripting language.
//!
//! ## Overview
//!
//! Where a conventional recursive-descent parser aborts at the first
//! unexpected token, resyn recovers: a bounded lookahead search weighs
//! inserting the token the grammar expected against deleting the token it
//! found, and commits whichever single step lets the parse progress
//! furthest. The result is always a complete tree - synthetic nodes fill the
//! positions the input left empty, removed input is preserved for
//! diagnostics - so downstream passes can traverse it safely no matter how
//! broken the source was.
//!
//! ## Quick Start
//!
//! ```rust
//! let result = resyn::parse("function foo() returns int { int x = 1; }");
//! assert!(result.is_clean());
//!
//! let broken = resyn::parse("function foo() { int x = 1 }");
//! assert_eq!(broken.diagnostics.len(), 1);
//! assert!(broken.diagnostics[0].to_string().contains("missing ';'"));
//! ```
//!
//! Custom sinks can be injected for tree building and error reporting:
//!
//! ```rust
//! use resyn::error::CollectingReporter;
//! use resyn::listener::EventLog;
//! use resyn::parser::Parser;
//!
//! let mut parser = Parser::new(
//!     "function foo() = external;",
//!     EventLog::new(),
//!     CollectingReporter::new(),
//! );
//! parser.parse();
//! let (events, reporter, _metrics) = parser.finish();
//! assert!(reporter.into_diagnostics().is_empty());
//! assert!(!events.into_events().is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`lexer`] - tokenization and the lookahead token buffer
//! - [`grammar`] - rule ids, synchronization sets, the transition function
//! - [`parser`] - the recursive-descent driver and the recovery engine
//! - [`listener`] - tree-event sinks
//! - [`ast`] - concrete tree nodes and the AST-building listener
//! - [`error`] - diagnostics and error reporting
//! - [`span`] - line/column positions

pub mod ast;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod listener;
pub mod parser;
pub mod span;

pub use ast::{AstListener, AstNode};
pub use error::{CollectingReporter, Diagnostic, DiagnosticKind, ErrorReporter, Severity};
pub use grammar::{ContextStack, RuleId, RuleKind};
pub use lexer::{Lexer, Token, TokenBuffer, TokenKind};
pub use listener::{EventLog, Listener, ParseEvent};
pub use parser::{
    parse, parse_with_config, Action, ParseMetrics, ParseResult, Parser, ParserConfig, Solution,
    LOOKAHEAD_LIMIT,
};
pub use span::Span;
