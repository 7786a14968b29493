//! # Parser Driver
//!
//! The recursive-descent routines, one per production. Each routine opens
//! its context on entry and closes it on exit, reads tokens only through the
//! buffer's non-trivia interface, and hands every mismatch to the recovery
//! engine:
//!
//! - on a `Remove` action the offending token is gone and the current
//!   sub-rule restarts;
//! - on an `Insert` action the expected node has been synthesized and the
//!   routine proceeds past it. When the mismatch was at an alternatives
//!   rule, the action names the matched alternative and the driver re-enters
//!   it directly.

use super::recovery::Action;
use super::Parser;
use crate::error::ErrorReporter;
use crate::grammar::{self, RuleId};
use crate::lexer::{Token, TokenKind};
use crate::listener::Listener;

impl<L: Listener, R: ErrorReporter> Parser<'_, L, R> {
    /// `compilation-unit := top-level-node* EOF`
    pub(crate) fn parse_comp_unit(&mut self) {
        self.listener.enter_node(RuleId::CompUnit);
        // The root context has no closing terminal and stays open for the
        // lifetime of the parse.
        self.ctx.push(RuleId::CompUnit);
        while self.peek_kind() != TokenKind::Eof {
            self.parse_top_level_node();
        }
        self.emit_exit(RuleId::CompUnit, &[]);
    }

    /// `top-level-node := [public] function-defn`
    fn parse_top_level_node(&mut self) {
        match self.peek_kind() {
            TokenKind::Public => self.consume_into(RuleId::TopLevelNode),
            TokenKind::Function => self.parse_function_definition(),
            _ => self.remove_invalid_token(),
        }
    }

    /// `function-defn := FUNCTION identifier function-signature function-body`
    fn parse_function_definition(&mut self) {
        self.listener.enter_node(RuleId::FuncDefinition);
        self.ctx.push(RuleId::FuncDefinition);

        // The 'function' keyword is verified by the dispatcher.
        self.consume_into(RuleId::FunctionKeyword);
        self.parse_terminal(RuleId::FuncName, TokenKind::Identifier);
        self.parse_function_signature();
        self.parse_function_body();

        self.ctx.pop();
        self.emit_exit(RuleId::FuncDefinition, &[]);
    }

    /// `function-signature := ( param-list ) return-type-descriptor`
    fn parse_function_signature(&mut self) {
        self.listener.enter_node(RuleId::FuncSignature);
        self.ctx.push(RuleId::FuncSignature);
        self.parse_terminal(RuleId::OpenParen, TokenKind::OpenParen);
        self.parse_param_list();
        self.parse_terminal(RuleId::CloseParen, TokenKind::CloseParen);
        self.ctx.pop();
        self.parse_return_type_descriptor();
        self.emit_exit(RuleId::FuncSignature, &[]);
    }

    fn parse_param_list(&mut self) {
        // Parameters are not part of the surface grammar yet; the list node
        // is always empty and stray tokens are recovered at the ')'.
        self.emit_exit(RuleId::ParamList, &[]);
    }

    /// `return-type-descriptor := [ returns annots type-descriptor ]`
    fn parse_return_type_descriptor(&mut self) {
        if self.peek_kind() != TokenKind::Returns {
            self.emit_empty();
            return;
        }

        self.listener.enter_node(RuleId::ReturnTypeDescriptor);
        self.ctx.push(RuleId::ReturnTypeDescriptor);
        self.consume_into(RuleId::ReturnsKeyword);
        self.emit_empty(); // annotations
        self.parse_terminal(RuleId::TypeDescriptor, TokenKind::Type);
        self.ctx.pop();
        self.emit_exit(RuleId::ReturnTypeDescriptor, &[]);
    }

    /// `function-body := function-body-block | external-function-body`
    fn parse_function_body(&mut self) {
        self.listener.enter_node(RuleId::FuncBody);
        loop {
            match self.peek_kind() {
                TokenKind::Assign => {
                    self.parse_external_function_body();
                    break;
                }
                TokenKind::OpenBrace => {
                    self.parse_function_body_block();
                    break;
                }
                _ => {
                    let solution = self.recover(RuleId::FuncBody);
                    match solution.action {
                        Action::Remove => {}
                        Action::Insert => {
                            match solution.enclosing_rule {
                                RuleId::FuncBodyBlock => self.parse_function_body_block(),
                                RuleId::ExternalFuncBody => self.parse_external_function_body(),
                                // End of input: the missing body node is
                                // already in place.
                                _ => {}
                            }
                            break;
                        }
                    }
                }
            }
        }
        self.emit_exit(RuleId::FuncBody, &[]);
    }

    /// `function-body-block := { statement* }`
    fn parse_function_body_block(&mut self) {
        self.listener.enter_node(RuleId::FuncBodyBlock);
        self.ctx.push(RuleId::FuncBodyBlock);
        self.parse_terminal(RuleId::OpenBrace, TokenKind::OpenBrace);
        self.parse_statements();
        self.parse_terminal(RuleId::CloseBrace, TokenKind::CloseBrace);
        self.ctx.pop();
        self.emit_exit(RuleId::FuncBodyBlock, &[]);
    }

    /// `external-function-body := = annots external ;`
    fn parse_external_function_body(&mut self) {
        self.listener.enter_node(RuleId::ExternalFuncBody);
        self.ctx.push(RuleId::ExternalFuncBody);
        self.parse_terminal(RuleId::AssignOp, TokenKind::Assign);
        self.emit_empty(); // annotations
        self.parse_terminal(RuleId::ExternalKeyword, TokenKind::External);
        self.parse_terminal(RuleId::Semicolon, TokenKind::Semicolon);
        self.ctx.pop();
        self.emit_exit(RuleId::ExternalFuncBody, &[]);
    }

    fn parse_statements(&mut self) {
        while !grammar::is_end_of_block(self.peek_kind()) {
            let before = self.metrics.tokens_consumed;
            self.parse_statement();
            if self.metrics.tokens_consumed == before {
                // A statement synthesized without consuming anything would
                // meet the same token again; drop it to keep moving.
                self.remove_invalid_token();
            }
        }
    }

    /// `statement := var-def-stmt | assignment-stmt`
    fn parse_statement(&mut self) {
        match self.peek_kind() {
            TokenKind::Type => self.parse_var_def_stmt(),
            TokenKind::Identifier => self.parse_assignment_stmt(),
            _ => {
                let solution = self.recover(RuleId::Statement);
                if solution.action == Action::Insert {
                    match solution.enclosing_rule {
                        RuleId::VarDefStmt => self.parse_var_def_stmt(),
                        RuleId::AssignmentStmt => self.parse_assignment_stmt(),
                        _ => self.remove_invalid_token(),
                    }
                }
            }
        }
    }

    /// `var-def-stmt := type-descriptor identifier [= expression] ;`
    fn parse_var_def_stmt(&mut self) {
        self.listener.enter_node(RuleId::VarDefStmt);
        self.ctx.push(RuleId::VarDefStmt);
        self.parse_terminal(RuleId::TypeDescriptor, TokenKind::Type);
        self.parse_terminal(RuleId::VariableName, TokenKind::Identifier);

        if self.peek_kind() == TokenKind::Semicolon {
            self.emit_empty(); // assign
            self.emit_empty(); // initializer
        } else {
            self.parse_terminal(RuleId::AssignOp, TokenKind::Assign);
            self.parse_expression();
        }

        self.parse_terminal(RuleId::Semicolon, TokenKind::Semicolon);
        self.ctx.pop();
        self.emit_exit(RuleId::VarDefStmt, &[]);
    }

    /// `assignment-stmt := identifier = expression ;`
    fn parse_assignment_stmt(&mut self) {
        self.listener.enter_node(RuleId::AssignmentStmt);
        self.ctx.push(RuleId::AssignmentStmt);
        self.parse_terminal(RuleId::VariableName, TokenKind::Identifier);
        self.parse_terminal(RuleId::AssignOp, TokenKind::Assign);
        self.parse_expression();
        self.parse_terminal(RuleId::Semicolon, TokenKind::Semicolon);
        self.ctx.pop();
        self.emit_exit(RuleId::AssignmentStmt, &[]);
    }

    /// `expression := expr-terminal [binary-expr-rhs]`, with the binary
    /// tail grouped by precedence: multiplicative over additive over
    /// comparison.
    fn parse_expression(&mut self) {
        self.parse_binary_expr(1);
    }

    fn parse_binary_expr(&mut self, min_precedence: u8) {
        self.parse_expression_terminal();
        while let Some(precedence) = grammar::binary_precedence(self.peek_kind()) {
            if precedence < min_precedence {
                break;
            }
            let op = self.consume();
            self.parse_binary_expr(precedence + 1);
            self.emit_exit(RuleId::BinaryExprRhs, &[op]);
        }
    }

    /// `expr-terminal := literal | identifier | ( expression )`
    fn parse_expression_terminal(&mut self) {
        loop {
            match self.peek_kind() {
                TokenKind::Int | TokenKind::Hex | TokenKind::Float | TokenKind::Identifier => {
                    let token = self.consume();
                    self.emit_exit(RuleId::Expression, &[token]);
                    return;
                }
                TokenKind::OpenParen => {
                    self.parse_grouped_expression();
                    return;
                }
                _ => match self.recover(RuleId::Expression).action {
                    Action::Remove => {}
                    Action::Insert => return,
                },
            }
        }
    }

    fn parse_grouped_expression(&mut self) {
        self.listener.enter_node(RuleId::Expression);
        self.consume_into(RuleId::OpenParen);
        self.ctx.push(RuleId::Expression);
        self.parse_binary_expr(1);
        self.parse_terminal(RuleId::CloseParen, TokenKind::CloseParen);
        self.ctx.pop();
        self.emit_exit(RuleId::Expression, &[]);
    }

    /// Match one terminal, recovering until it is consumed or synthesized.
    fn parse_terminal(&mut self, rule: RuleId, expected: TokenKind) {
        loop {
            if self.peek_kind() == expected {
                self.consume_into(rule);
                return;
            }
            match self.recover(rule).action {
                Action::Remove => {}
                Action::Insert => return,
            }
        }
    }

    /*
     * Buffer and event plumbing
     */

    pub(crate) fn peek_kind(&mut self) -> TokenKind {
        self.buffer.peek(1).kind
    }

    pub(crate) fn consume(&mut self) -> Token {
        self.metrics.tokens_consumed += 1;
        self.buffer.consume()
    }

    /// Consume the verified next token and emit it as `rule`.
    fn consume_into(&mut self, rule: RuleId) {
        let token = self.consume();
        self.emit_exit(rule, &[token]);
    }

    pub(crate) fn emit_exit(&mut self, rule: RuleId, tokens: &[Token]) {
        self.metrics.nodes_created += 1;
        self.listener.exit_node(rule, tokens);
    }

    pub(crate) fn emit_missing(&mut self, rule: RuleId) {
        self.metrics.nodes_created += 1;
        self.listener.add_missing_node(rule);
    }

    fn emit_empty(&mut self) {
        self.metrics.nodes_created += 1;
        self.listener.add_empty_node();
    }
}
