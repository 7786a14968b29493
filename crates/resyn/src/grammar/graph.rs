//! The rule transition function.
//!
//! [`next_rule`] answers "after `current`, which rule comes next?" given the
//! token the successor will face and the stack of open productions. It is
//! side-effectful on the stack: entering a production pushes it, and the
//! terminal that closes a production pops it. The recovery engine calls this
//! on a snapshot during exploration; the driver's recursive structure plays
//! the same transitions out implicitly.

use super::{is_end_of_block, is_end_of_expression, ContextStack, RuleId};
use crate::lexer::TokenKind;

/// Successor of `current`, where `lookahead` is the kind of the token the
/// successor will be matched against (the token after a matched terminal,
/// or the same token when an optional was skipped).
///
/// # Panics
///
/// Panics when asked for the successor of a rule in a context the grammar
/// does not admit; that is an internal invariant violation, not an input
/// error.
pub fn next_rule(current: RuleId, lookahead: TokenKind, stack: &mut ContextStack) -> RuleId {
    // Entering a production opens its context. Kept separate from the
    // transition match for readability.
    match current {
        RuleId::CompUnit
        | RuleId::FuncDefinition
        | RuleId::FuncSignature
        | RuleId::ReturnTypeDescriptor
        | RuleId::ExternalFuncBody
        | RuleId::FuncBodyBlock
        | RuleId::VarDefStmt
        | RuleId::AssignmentStmt => stack.push(current),
        _ => {}
    }

    match current {
        RuleId::CompUnit => RuleId::TopLevelNode,
        RuleId::TopLevelNode => RuleId::FuncDefinition,
        RuleId::FuncDefinition => RuleId::FunctionKeyword,
        RuleId::FunctionKeyword => RuleId::FuncName,
        RuleId::FuncName => RuleId::FuncSignature,
        RuleId::FuncSignature => RuleId::OpenParen,
        RuleId::OpenParen => match stack.parent() {
            Some(RuleId::Expression) => RuleId::Expression,
            _ => RuleId::ParamList,
        },
        RuleId::ParamList => RuleId::Parameter,
        RuleId::Parameter => RuleId::CloseParen,
        RuleId::CloseParen => match stack.parent() {
            Some(RuleId::FuncSignature) => {
                stack.pop(); // ')' closes the signature
                RuleId::ReturnsKeyword
            }
            Some(RuleId::Expression) => {
                stack.pop(); // ')' closes the grouped expression
                if is_end_of_expression(lookahead) {
                    RuleId::Semicolon
                } else {
                    RuleId::BinaryExprRhs
                }
            }
            parent => unexpected(current, parent),
        },
        RuleId::ReturnsKeyword => RuleId::TypeDescriptor,
        RuleId::ReturnTypeDescriptor => RuleId::ReturnsKeyword,
        RuleId::TypeDescriptor => match stack.parent() {
            Some(RuleId::VarDefStmt | RuleId::AssignmentStmt | RuleId::Statement) => {
                RuleId::VariableName
            }
            Some(RuleId::ReturnTypeDescriptor) => {
                stack.pop(); // the type closes the returns clause
                RuleId::FuncBody
            }
            _ => RuleId::FuncBody,
        },
        RuleId::VariableName => RuleId::AssignOp,
        RuleId::AssignOp => match stack.parent() {
            Some(RuleId::ExternalFuncBody) => RuleId::ExternalKeyword,
            Some(RuleId::VarDefStmt | RuleId::AssignmentStmt | RuleId::Statement) => {
                RuleId::Expression
            }
            parent => unexpected(current, parent),
        },
        RuleId::ExternalKeyword => RuleId::Semicolon,
        RuleId::Semicolon => match stack.parent() {
            Some(RuleId::ExternalFuncBody) => {
                stack.pop(); // ';' closes the external body
                if stack.parent() == Some(RuleId::FuncDefinition) {
                    stack.pop(); // and with it the function
                }
                RuleId::TopLevelNode
            }
            Some(RuleId::VarDefStmt | RuleId::AssignmentStmt) => {
                stack.pop(); // ';' closes the statement
                if is_end_of_block(lookahead) {
                    RuleId::CloseBrace
                } else {
                    RuleId::Statement
                }
            }
            Some(RuleId::Expression) => {
                // The ';' ends every unterminated group and the statement.
                while stack.parent() == Some(RuleId::Expression) {
                    stack.pop();
                }
                if matches!(
                    stack.parent(),
                    Some(RuleId::VarDefStmt | RuleId::AssignmentStmt)
                ) {
                    stack.pop();
                }
                if is_end_of_block(lookahead) {
                    RuleId::CloseBrace
                } else {
                    RuleId::Statement
                }
            }
            parent => unexpected(current, parent),
        },
        RuleId::OpenBrace => {
            if is_end_of_block(lookahead) {
                RuleId::CloseBrace
            } else {
                RuleId::Statement
            }
        }
        RuleId::CloseBrace => {
            // '}' closes anything still open inside the block.
            while matches!(
                stack.parent(),
                Some(RuleId::Expression | RuleId::VarDefStmt | RuleId::AssignmentStmt)
            ) {
                stack.pop();
            }
            match stack.parent() {
                Some(RuleId::FuncBodyBlock) => {
                    stack.pop(); // '}' closes the block
                    if stack.parent() == Some(RuleId::FuncDefinition) {
                        stack.pop(); // and with it the function
                    }
                    RuleId::TopLevelNode
                }
                parent => unexpected(current, parent),
            }
        }
        RuleId::FuncBody => RuleId::TopLevelNode,
        RuleId::FuncBodyBlock => RuleId::OpenBrace,
        RuleId::ExternalFuncBody => RuleId::AssignOp,
        RuleId::VarDefStmt => RuleId::TypeDescriptor,
        RuleId::AssignmentStmt => RuleId::VariableName,
        RuleId::Statement => {
            if is_end_of_block(lookahead) {
                RuleId::CloseBrace
            } else {
                unexpected(current, stack.parent())
            }
        }
        RuleId::Expression => {
            if is_end_of_expression(lookahead) {
                RuleId::Semicolon
            } else {
                RuleId::BinaryExprRhs
            }
        }
        RuleId::BinaryExprRhs => RuleId::BinaryOperator,
        RuleId::BinaryOperator => RuleId::Expression,
    }
}

fn unexpected(current: RuleId, parent: Option<RuleId>) -> ! {
    panic!("no successor for rule {current:?} in context {parent:?}")
}
