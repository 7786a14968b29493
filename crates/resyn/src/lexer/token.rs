use crate::span::Span;
use compact_str::CompactString;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// The closed set of token kinds produced by the lexer.
///
/// The set is split into keywords, punctuation, operators, literals, trivia,
/// and the three sentinels `Invalid`, `Sof` and `Eof`. Trivia tokens are
/// materialized by the lexer but skipped by the token buffer for logical
/// reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum TokenKind {
    // Keywords
    Public,
    Function,
    Returns,
    External,
    /// A built-in type name (`int`, `float`, `string`, `boolean`); the
    /// concrete name is kept in the token text.
    Type,

    // Punctuation
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Semicolon,
    Comma,
    Ellipsis,

    // Operators
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    /// `==`
    Equal,
    /// `===`
    RefEqual,
    /// `=>`
    EqualGt,

    // Literals
    Int,
    Hex,
    Float,
    Identifier,

    // Trivia
    Whitespace,
    Newline,
    Comment,

    Invalid,
    /// Start-of-file sentinel; never produced by the lexer, used as the
    /// buffer's initial head.
    Sof,
    Eof,
}

impl TokenKind {
    /// Check whether this kind is whitespace, a newline, or a comment.
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Newline | Self::Comment)
    }

    /// Check whether this kind is a reserved word (including type names).
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::Public | Self::Function | Self::Returns | Self::External | Self::Type
        )
    }

    /// Check whether this kind is a numeric literal.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::Int | Self::Hex | Self::Float)
    }

    /// Check whether this kind can appear as a binary operator.
    #[must_use]
    pub const fn is_binary_operator(self) -> bool {
        matches!(
            self,
            Self::Add
                | Self::Sub
                | Self::Mul
                | Self::Div
                | Self::Lt
                | Self::Gt
                | Self::Equal
                | Self::RefEqual
                | Self::EqualGt
        )
    }
}

/// An immutable lexical token with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub text: CompactString,
    pub span: Span,
}

impl Token {
    /// Create a new token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<CompactString>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// The start-of-file sentinel used as the buffer's initial head.
    #[must_use]
    pub fn sof() -> Self {
        Self::new(TokenKind::Sof, "", Span::at(1, 1))
    }

    #[inline]
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }
}
