//! # Grammar
//!
//! Static description of the parser's rules: terminals, productions,
//! optionals and alternatives, plus the synchronization sets and the
//! transition function that maps a rule to its successor in context.
//!
//! The rule graph is deliberately data-shaped rather than pointer-shaped:
//! [`RuleId`] is a flat enumeration, [`RuleKind`] tags how each rule is
//! matched, and [`next_rule`] is a total function over `(rule, lookahead,
//! context stack)`.

pub mod context;
pub mod graph;

pub use context::{ContextSnapshot, ContextStack};
pub use graph::next_rule;

use crate::lexer::TokenKind;
use std::fmt;

/// How a rule participates in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Requires one specific token kind.
    Terminal,
    /// Matched by a sentinel token; skipped without consuming otherwise.
    Optional,
    /// Expands to a sequence of sub-rules without consuming a token itself.
    Production,
    /// Selects one of several right-hand sides by lookahead.
    Alternatives,
}

/// Identifier of a grammar rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    // Productions
    CompUnit,
    FuncDefinition,
    FuncSignature,
    ReturnTypeDescriptor,
    FuncBodyBlock,
    ExternalFuncBody,
    VarDefStmt,
    AssignmentStmt,
    Expression,
    BinaryExprRhs,
    ParamList,
    Parameter,

    // Alternatives
    FuncBody,
    Statement,

    // Optionals
    TopLevelNode,
    ReturnsKeyword,

    // Terminals
    FunctionKeyword,
    FuncName,
    OpenParen,
    CloseParen,
    TypeDescriptor,
    OpenBrace,
    CloseBrace,
    AssignOp,
    ExternalKeyword,
    Semicolon,
    VariableName,
    BinaryOperator,
}

/// The right-hand sides of the function-body alternatives rule, in
/// declaration (tie-break) order.
pub const FUNC_BODIES: [RuleId; 2] = [RuleId::FuncBodyBlock, RuleId::ExternalFuncBody];

/// The right-hand sides of the statement alternatives rule, in declaration
/// (tie-break) order.
pub const STATEMENTS: [RuleId; 2] = [RuleId::AssignmentStmt, RuleId::VarDefStmt];

impl RuleId {
    /// How this rule is matched.
    #[must_use]
    pub const fn kind(self) -> RuleKind {
        match self {
            Self::FuncBody | Self::Statement => RuleKind::Alternatives,
            Self::TopLevelNode | Self::ReturnsKeyword => RuleKind::Optional,
            Self::FunctionKeyword
            | Self::FuncName
            | Self::OpenParen
            | Self::CloseParen
            | Self::TypeDescriptor
            | Self::OpenBrace
            | Self::CloseBrace
            | Self::AssignOp
            | Self::ExternalKeyword
            | Self::Semicolon
            | Self::VariableName
            | Self::BinaryOperator => RuleKind::Terminal,
            _ => RuleKind::Production,
        }
    }

    /// The token kind a simple terminal requires, if there is exactly one.
    #[must_use]
    pub const fn expected_token(self) -> Option<TokenKind> {
        match self {
            Self::FunctionKeyword => Some(TokenKind::Function),
            Self::FuncName | Self::VariableName => Some(TokenKind::Identifier),
            Self::OpenParen => Some(TokenKind::OpenParen),
            Self::CloseParen => Some(TokenKind::CloseParen),
            Self::TypeDescriptor => Some(TokenKind::Type),
            Self::OpenBrace => Some(TokenKind::OpenBrace),
            Self::CloseBrace => Some(TokenKind::CloseBrace),
            Self::AssignOp => Some(TokenKind::Assign),
            Self::ExternalKeyword => Some(TokenKind::External),
            Self::Semicolon => Some(TokenKind::Semicolon),
            Self::ReturnsKeyword => Some(TokenKind::Returns),
            Self::TopLevelNode => Some(TokenKind::Public),
            _ => None,
        }
    }

    /// The right-hand sides of an alternatives rule; empty otherwise.
    #[must_use]
    pub const fn alternatives(self) -> &'static [RuleId] {
        match self {
            Self::FuncBody => &FUNC_BODIES,
            Self::Statement => &STATEMENTS,
            _ => &[],
        }
    }

    /// Human-readable name used in diagnostics.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::CompUnit => "compilation unit",
            Self::FuncDefinition => "function definition",
            Self::FuncSignature => "function signature",
            Self::ReturnTypeDescriptor => "return type desc",
            Self::FuncBodyBlock => "function body",
            Self::ExternalFuncBody => "external function body",
            Self::VarDefStmt => "variable definition",
            Self::AssignmentStmt => "assignment",
            Self::Expression => "expression",
            Self::BinaryExprRhs => "binary expression",
            Self::ParamList => "parameters",
            Self::Parameter => "parameter",
            Self::FuncBody => "function body",
            Self::Statement => "statement",
            Self::TopLevelNode => "modifier",
            Self::ReturnsKeyword => "'returns'",
            Self::FunctionKeyword => "'function'",
            Self::FuncName => "function name",
            Self::OpenParen => "'('",
            Self::CloseParen => "')'",
            Self::TypeDescriptor => "type",
            Self::OpenBrace => "'{'",
            Self::CloseBrace => "'}'",
            Self::AssignOp => "'='",
            Self::ExternalKeyword => "'external'",
            Self::Semicolon => "';'",
            Self::VariableName => "variable",
            Self::BinaryOperator => "operator",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Tokens that terminate a statement block and act as re-entry points.
#[must_use]
pub const fn is_end_of_block(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::CloseBrace | TokenKind::Public | TokenKind::Function | TokenKind::Eof
    )
}

/// Tokens that terminate an expression.
#[must_use]
pub const fn is_end_of_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::CloseParen
            | TokenKind::CloseBracket
            | TokenKind::CloseBrace
            | TokenKind::Semicolon
            | TokenKind::Comma
            | TokenKind::Public
            | TokenKind::Function
            | TokenKind::Eof
    )
}

/// Binding power of a binary operator: multiplicative over additive over
/// comparison. `None` for anything that is not a binary operator.
#[must_use]
pub const fn binary_precedence(kind: TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Mul | TokenKind::Div => Some(3),
        TokenKind::Add | TokenKind::Sub => Some(2),
        TokenKind::Lt
        | TokenKind::Gt
        | TokenKind::Equal
        | TokenKind::RefEqual
        | TokenKind::EqualGt => Some(1),
        _ => None,
    }
}
