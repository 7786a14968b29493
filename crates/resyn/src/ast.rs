//! # Syntax Tree
//!
//! Concrete tree nodes and the listener that assembles them from parse
//! events.
//!
//! The tree is total: every production the driver enters contributes exactly
//! one node, with [`AstNode::Missing`] standing in for tokens recovery had
//! to insert and [`AstNode::Empty`] for absent optionals. Every token the
//! parser consumed is attached to some leaf, so serializing the tree
//! reproduces the input token sequence (trivia aside).

use crate::grammar::RuleId;
use crate::lexer::Token;
use crate::listener::Listener;

/// A node of the concrete syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    CompilationUnit {
        functions: Vec<AstNode>,
    },
    Function {
        modifiers: Vec<AstNode>,
        keyword: Box<AstNode>,
        name: Box<AstNode>,
        signature: Box<AstNode>,
        body: Box<AstNode>,
    },
    Signature {
        open: Box<AstNode>,
        params: Box<AstNode>,
        close: Box<AstNode>,
        return_type: Box<AstNode>,
    },
    Params(Vec<AstNode>),
    ReturnTypeDesc {
        keyword: Box<AstNode>,
        annotations: Box<AstNode>,
        ty: Box<AstNode>,
    },
    Block {
        open: Box<AstNode>,
        statements: Vec<AstNode>,
        close: Box<AstNode>,
    },
    ExternalBody {
        assign: Box<AstNode>,
        annotations: Box<AstNode>,
        keyword: Box<AstNode>,
        semicolon: Box<AstNode>,
    },
    VarDef {
        ty: Box<AstNode>,
        name: Box<AstNode>,
        assign: Box<AstNode>,
        expr: Box<AstNode>,
        semicolon: Box<AstNode>,
    },
    Assignment {
        target: Box<AstNode>,
        assign: Box<AstNode>,
        expr: Box<AstNode>,
        semicolon: Box<AstNode>,
    },
    Binary {
        lhs: Box<AstNode>,
        op: Box<AstNode>,
        rhs: Box<AstNode>,
    },
    Grouped {
        open: Box<AstNode>,
        expr: Box<AstNode>,
        close: Box<AstNode>,
    },
    /// A consumed terminal.
    Leaf(Token),
    /// A synthetic node inserted by recovery.
    Missing(RuleId),
    /// An absent optional.
    Empty,
}

impl AstNode {
    /// Collect every token attached to this subtree, in source order.
    pub fn collect_tokens(&self, out: &mut Vec<Token>) {
        match self {
            Self::CompilationUnit { functions } => {
                for node in functions {
                    node.collect_tokens(out);
                }
            }
            Self::Function {
                modifiers,
                keyword,
                name,
                signature,
                body,
            } => {
                for node in modifiers {
                    node.collect_tokens(out);
                }
                keyword.collect_tokens(out);
                name.collect_tokens(out);
                signature.collect_tokens(out);
                body.collect_tokens(out);
            }
            Self::Signature {
                open,
                params,
                close,
                return_type,
            } => {
                open.collect_tokens(out);
                params.collect_tokens(out);
                close.collect_tokens(out);
                return_type.collect_tokens(out);
            }
            Self::Params(params) => {
                for node in params {
                    node.collect_tokens(out);
                }
            }
            Self::ReturnTypeDesc {
                keyword,
                annotations,
                ty,
            } => {
                keyword.collect_tokens(out);
                annotations.collect_tokens(out);
                ty.collect_tokens(out);
            }
            Self::Block {
                open,
                statements,
                close,
            } => {
                open.collect_tokens(out);
                for node in statements {
                    node.collect_tokens(out);
                }
                close.collect_tokens(out);
            }
            Self::ExternalBody {
                assign,
                annotations,
                keyword,
                semicolon,
            } => {
                assign.collect_tokens(out);
                annotations.collect_tokens(out);
                keyword.collect_tokens(out);
                semicolon.collect_tokens(out);
            }
            Self::VarDef {
                ty,
                name,
                assign,
                expr,
                semicolon,
            } => {
                ty.collect_tokens(out);
                name.collect_tokens(out);
                assign.collect_tokens(out);
                expr.collect_tokens(out);
                semicolon.collect_tokens(out);
            }
            Self::Assignment {
                target,
                assign,
                expr,
                semicolon,
            } => {
                target.collect_tokens(out);
                assign.collect_tokens(out);
                expr.collect_tokens(out);
                semicolon.collect_tokens(out);
            }
            Self::Binary { lhs, op, rhs } => {
                lhs.collect_tokens(out);
                op.collect_tokens(out);
                rhs.collect_tokens(out);
            }
            Self::Grouped { open, expr, close } => {
                open.collect_tokens(out);
                expr.collect_tokens(out);
                close.collect_tokens(out);
            }
            Self::Leaf(token) => out.push(token.clone()),
            Self::Missing(_) | Self::Empty => {}
        }
    }

    /// All tokens of the subtree, in source order.
    #[must_use]
    pub fn tokens(&self) -> Vec<Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }
}

/// Listener that materializes [`AstNode`]s from parse events.
///
/// Nodes are assembled on a stack: terminals push leaves, and each
/// production exit pops its fixed shape. Statements and modifiers are
/// gathered in side lists, as their counts are not fixed.
#[derive(Debug, Default)]
pub struct AstListener {
    stack: Vec<AstNode>,
    statements: Vec<AstNode>,
    modifiers: Vec<AstNode>,
    invalid: Vec<Token>,
    root: Option<AstNode>,
}

impl AstListener {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The finished tree; an empty compilation unit if the parse never
    /// completed.
    #[must_use]
    pub fn into_root(self) -> AstNode {
        self.root.unwrap_or(AstNode::CompilationUnit {
            functions: Vec::new(),
        })
    }

    /// Tokens recovery removed from the input, in source order.
    #[must_use]
    pub fn invalid_tokens(&self) -> &[Token] {
        &self.invalid
    }

    /// Consume the listener, yielding the root and the removed tokens.
    #[must_use]
    pub fn finish(mut self) -> (AstNode, Vec<Token>) {
        let invalid = std::mem::take(&mut self.invalid);
        (self.into_root(), invalid)
    }

    fn pop(&mut self) -> AstNode {
        self.stack.pop().unwrap_or(AstNode::Empty)
    }
}

impl Listener for AstListener {
    fn enter_node(&mut self, _rule: RuleId) {}

    fn exit_node(&mut self, rule: RuleId, tokens: &[Token]) {
        match rule {
            // Terminals become leaves.
            RuleId::FunctionKeyword
            | RuleId::FuncName
            | RuleId::OpenParen
            | RuleId::CloseParen
            | RuleId::ReturnsKeyword
            | RuleId::TypeDescriptor
            | RuleId::OpenBrace
            | RuleId::CloseBrace
            | RuleId::AssignOp
            | RuleId::ExternalKeyword
            | RuleId::Semicolon
            | RuleId::VariableName => {
                for token in tokens {
                    self.stack.push(AstNode::Leaf(token.clone()));
                }
            }
            RuleId::TopLevelNode => {
                for token in tokens {
                    self.modifiers.push(AstNode::Leaf(token.clone()));
                }
            }
            RuleId::ParamList => self.stack.push(AstNode::Params(Vec::new())),
            RuleId::Expression => {
                if let Some(token) = tokens.first() {
                    self.stack.push(AstNode::Leaf(token.clone()));
                } else {
                    // A grouped expression: close, inner, open are on the stack.
                    let close = self.pop();
                    let expr = self.pop();
                    let open = self.pop();
                    self.stack.push(AstNode::Grouped {
                        open: Box::new(open),
                        expr: Box::new(expr),
                        close: Box::new(close),
                    });
                }
            }
            RuleId::BinaryExprRhs => {
                let rhs = self.pop();
                let lhs = self.pop();
                let op = tokens
                    .first()
                    .map_or(AstNode::Missing(RuleId::BinaryOperator), |t| {
                        AstNode::Leaf(t.clone())
                    });
                self.stack.push(AstNode::Binary {
                    lhs: Box::new(lhs),
                    op: Box::new(op),
                    rhs: Box::new(rhs),
                });
            }
            RuleId::FuncSignature => {
                let return_type = self.pop();
                let close = self.pop();
                let params = self.pop();
                let open = self.pop();
                self.stack.push(AstNode::Signature {
                    open: Box::new(open),
                    params: Box::new(params),
                    close: Box::new(close),
                    return_type: Box::new(return_type),
                });
            }
            RuleId::ReturnTypeDescriptor => {
                let ty = self.pop();
                let annotations = self.pop();
                let keyword = self.pop();
                self.stack.push(AstNode::ReturnTypeDesc {
                    keyword: Box::new(keyword),
                    annotations: Box::new(annotations),
                    ty: Box::new(ty),
                });
            }
            RuleId::FuncBodyBlock => {
                let close = self.pop();
                let open = self.pop();
                let statements = std::mem::take(&mut self.statements);
                self.stack.push(AstNode::Block {
                    open: Box::new(open),
                    statements,
                    close: Box::new(close),
                });
            }
            RuleId::ExternalFuncBody => {
                let semicolon = self.pop();
                let keyword = self.pop();
                let annotations = self.pop();
                let assign = self.pop();
                self.stack.push(AstNode::ExternalBody {
                    assign: Box::new(assign),
                    annotations: Box::new(annotations),
                    keyword: Box::new(keyword),
                    semicolon: Box::new(semicolon),
                });
            }
            RuleId::VarDefStmt => {
                let semicolon = self.pop();
                let expr = self.pop();
                let assign = self.pop();
                let name = self.pop();
                let ty = self.pop();
                self.statements.push(AstNode::VarDef {
                    ty: Box::new(ty),
                    name: Box::new(name),
                    assign: Box::new(assign),
                    expr: Box::new(expr),
                    semicolon: Box::new(semicolon),
                });
            }
            RuleId::AssignmentStmt => {
                let semicolon = self.pop();
                let expr = self.pop();
                let assign = self.pop();
                let target = self.pop();
                self.statements.push(AstNode::Assignment {
                    target: Box::new(target),
                    assign: Box::new(assign),
                    expr: Box::new(expr),
                    semicolon: Box::new(semicolon),
                });
            }
            RuleId::FuncDefinition => {
                let body = self.pop();
                let signature = self.pop();
                let name = self.pop();
                let keyword = self.pop();
                let modifiers = std::mem::take(&mut self.modifiers);
                self.stack.push(AstNode::Function {
                    modifiers,
                    keyword: Box::new(keyword),
                    name: Box::new(name),
                    signature: Box::new(signature),
                    body: Box::new(body),
                });
            }
            RuleId::CompUnit => {
                let functions = std::mem::take(&mut self.stack);
                self.root = Some(AstNode::CompilationUnit { functions });
            }
            // The body node was pushed by the matched alternative.
            RuleId::FuncBody
            | RuleId::Statement
            | RuleId::Parameter
            | RuleId::BinaryOperator => {}
        }
    }

    fn add_missing_node(&mut self, rule: RuleId) {
        self.stack.push(AstNode::Missing(rule));
    }

    fn add_invalid_token(&mut self, token: Token) {
        self.invalid.push(token);
    }

    fn add_empty_node(&mut self) {
        self.stack.push(AstNode::Empty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;
    use crate::span::Span;

    fn leaf(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, Span::at(1, 1))
    }

    #[test]
    fn test_var_def_assembly() {
        let mut listener = AstListener::new();
        listener.exit_node(RuleId::TypeDescriptor, &[leaf(TokenKind::Type, "int")]);
        listener.exit_node(RuleId::VariableName, &[leaf(TokenKind::Identifier, "x")]);
        listener.exit_node(RuleId::AssignOp, &[leaf(TokenKind::Assign, "=")]);
        listener.exit_node(RuleId::Expression, &[leaf(TokenKind::Int, "1")]);
        listener.exit_node(RuleId::Semicolon, &[leaf(TokenKind::Semicolon, ";")]);
        listener.exit_node(RuleId::VarDefStmt, &[]);

        assert_eq!(listener.statements.len(), 1);
        let AstNode::VarDef { ty, expr, .. } = &listener.statements[0] else {
            panic!("expected a VarDef");
        };
        assert_eq!(**ty, AstNode::Leaf(leaf(TokenKind::Type, "int")));
        assert_eq!(**expr, AstNode::Leaf(leaf(TokenKind::Int, "1")));
    }

    #[test]
    fn test_missing_node_fills_slot() {
        let mut listener = AstListener::new();
        listener.exit_node(RuleId::TypeDescriptor, &[leaf(TokenKind::Type, "int")]);
        listener.add_missing_node(RuleId::VariableName);
        listener.exit_node(RuleId::AssignOp, &[leaf(TokenKind::Assign, "=")]);
        listener.exit_node(RuleId::Expression, &[leaf(TokenKind::Int, "1")]);
        listener.exit_node(RuleId::Semicolon, &[leaf(TokenKind::Semicolon, ";")]);
        listener.exit_node(RuleId::VarDefStmt, &[]);

        let AstNode::VarDef { name, .. } = &listener.statements[0] else {
            panic!("expected a VarDef");
        };
        assert_eq!(**name, AstNode::Missing(RuleId::VariableName));
    }

    #[test]
    fn test_token_collection_order() {
        let mut listener = AstListener::new();
        listener.exit_node(RuleId::TypeDescriptor, &[leaf(TokenKind::Type, "int")]);
        listener.exit_node(RuleId::VariableName, &[leaf(TokenKind::Identifier, "x")]);
        listener.add_empty_node();
        listener.add_empty_node();
        listener.exit_node(RuleId::Semicolon, &[leaf(TokenKind::Semicolon, ";")]);
        listener.exit_node(RuleId::VarDefStmt, &[]);

        let texts: Vec<_> = listener.statements[0]
            .tokens()
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["int", "x", ";"]);
    }

    #[test]
    fn test_invalid_tokens_kept_aside() {
        let mut listener = AstListener::new();
        listener.add_invalid_token(leaf(TokenKind::Comma, ","));
        assert_eq!(listener.invalid_tokens().len(), 1);
        assert!(listener.stack.is_empty());
    }
}
