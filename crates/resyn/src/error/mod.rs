//! # Diagnostics
//!
//! Error types and the reporting surface for the parser.
//!
//! ## Overview
//!
//! The parser never aborts on a grammar violation; every violation becomes a
//! [`Diagnostic`] delivered through an [`ErrorReporter`]. Two kinds exist:
//!
//! - **Invalid token** - input the grammar cannot place anywhere; the token
//!   is removed and reported at its own start column.
//! - **Missing token** - input the grammar requires but does not find; a
//!   synthetic node is inserted and reported at the end column of the last
//!   consumed token.
//!
//! Reporters are injected at parser construction. [`CollectingReporter`]
//! gathers diagnostics into a vector; other implementations may format and
//! emit to any channel.

use crate::lexer::Token;
use crate::span::Span;
use compact_str::CompactString;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// What went wrong at a diagnostic's position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum DiagnosticKind {
    #[error("invalid token '{0}'")]
    InvalidToken(CompactString),

    #[error("{0}")]
    MissingToken(String),
}

/// Diagnostic severity. All recovery diagnostics are errors; the lower
/// levels exist for downstream passes that reuse the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single user-visible diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Diagnostic {
    pub severity: Severity,
    pub span: Span,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Create an error-severity diagnostic.
    #[must_use]
    pub const fn error(span: Span, kind: DiagnosticKind) -> Self {
        Self {
            severity: Severity::Error,
            span,
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.span.line, self.span.start_col, self.kind)
    }
}

/// Sink for recovery diagnostics.
///
/// Implementations are pure with respect to the parse: they may format and
/// emit anywhere, but must not feed back into the token stream.
pub trait ErrorReporter {
    /// An input token no forward path admits; `token` is the culprit.
    fn report_invalid_token(&mut self, token: &Token);

    /// A required token was not found; `token` is the last consumed token
    /// and the message names the missing rule.
    fn report_missing_token(&mut self, token: &Token, message: &str);
}

/// Reporter that accumulates diagnostics in order.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The diagnostics collected so far, in input order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the reporter, yielding its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl ErrorReporter for CollectingReporter {
    fn report_invalid_token(&mut self, token: &Token) {
        let span = Span::at(token.span.line, token.span.start_col);
        self.diagnostics.push(Diagnostic::error(
            span,
            DiagnosticKind::InvalidToken(token.text.clone()),
        ));
    }

    fn report_missing_token(&mut self, token: &Token, message: &str) {
        let span = Span::at(token.span.line, token.span.end_col);
        self.diagnostics.push(Diagnostic::error(
            span,
            DiagnosticKind::MissingToken(message.to_string()),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    #[test]
    fn test_invalid_token_anchors_at_start() {
        let mut reporter = CollectingReporter::new();
        let token = Token::new(TokenKind::Comma, ",", Span::new(2, 14, 15));
        reporter.report_invalid_token(&token);

        let diagnostics = reporter.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].span, Span::at(2, 14));
        assert_eq!(diagnostics[0].to_string(), "2:14: invalid token ','");
    }

    #[test]
    fn test_missing_token_anchors_at_end_of_head() {
        let mut reporter = CollectingReporter::new();
        let head = Token::new(TokenKind::Int, "1", Span::new(1, 27, 28));
        reporter.report_missing_token(&head, "missing ';'");

        let diagnostics = reporter.into_diagnostics();
        assert_eq!(diagnostics[0].span, Span::at(1, 28));
        assert_eq!(diagnostics[0].to_string(), "1:28: missing ';'");
    }

    #[test]
    fn test_severity() {
        let diagnostic = Diagnostic::error(
            Span::at(1, 1),
            DiagnosticKind::MissingToken("missing '{'".to_string()),
        );
        assert_eq!(diagnostic.severity, Severity::Error);
    }
}
