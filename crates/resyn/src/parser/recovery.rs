//! # Recovery Engine
//!
//! Bounded-lookahead error recovery.
//!
//! ## Overview
//!
//! When the driver hits a token its current rule cannot accept, the engine
//! explores how the parse could continue under two hypotheses - the expected
//! token is *missing* (insert a synthetic node) or the offending token is
//! *spurious* (delete it) - and commits the single first step of whichever
//! hypothesis lets the parse progress furthest within a fixed horizon.
//!
//! Scoring walks the rule graph ahead of the failure point, counting rules
//! that match without needing a fix. Hypotheses are compared by that match
//! count; ties go to insertion, which never discards user input. Rules with
//! alternatives are resolved by exploring every right-hand side from a
//! context-stack snapshot and keeping the best result (most matches, then
//! fewest fixes, then declaration order).
//!
//! Exploration is read-only: it peeks through the same token buffer the
//! driver uses but consumes nothing, and every hypothetical walk runs on a
//! snapshot of the context stack that is restored afterwards. Only the
//! committed fix touches the buffer, the listener, or the reporter.

use super::Parser;
use crate::error::ErrorReporter;
use crate::grammar::{self, RuleId, FUNC_BODIES, STATEMENTS};
use crate::lexer::TokenKind;
use crate::listener::Listener;
use compact_str::CompactString;
use std::collections::VecDeque;

/// Limit for the distance to travel to determine a successful lookahead.
pub const LOOKAHEAD_LIMIT: usize = 5;

/// How the driver should proceed after recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A synthetic node was inserted; proceed past the expected terminal
    /// without consuming input.
    Insert,
    /// The offending token was consumed; restart the current sub-rule.
    Remove,
}

/// A committed recovery step: the edit, the rule it applies to, the
/// production it was found in, and the token text involved.
#[derive(Debug, Clone)]
pub struct Solution {
    pub action: Action,
    pub rule: RuleId,
    pub enclosing_rule: RuleId,
    pub token_text: CompactString,
}

/// Result of a token-sequence search in one sub-tree: the fixes required to
/// traverse it and the number of tokens matched without a fix.
#[derive(Debug, Default)]
struct SearchResult {
    matches: usize,
    fixes: VecDeque<Solution>,
}

impl<L: Listener, R: ErrorReporter> Parser<'_, L, R> {
    /// Recover from a mismatch of `current` against the next token.
    ///
    /// Searches for the action that lets the parser proceed the farthest,
    /// applies its first step (emitting the diagnostic and tree event, and
    /// consuming the offending token on a removal), and returns it.
    pub fn recover(&mut self, current: RuleId) -> Solution {
        let next = self.buffer.peek(1).clone();

        if next.kind == TokenKind::Eof {
            // Nothing left to delete; insert the missing node.
            self.report_missing(current);
            self.emit_missing(current);
            self.metrics.errors_recovered += 1;
            return Solution {
                action: Action::Insert,
                rule: current,
                enclosing_rule: current,
                token_text: CompactString::new(current.display_name()),
            };
        }

        let mut best = self.seek_in_subtree(current, 1, 0);
        if best.matches > 0 {
            if let Some(fix) = best.fixes.pop_front() {
                self.apply_fix(current, &fix);
                return fix;
            }
        }

        // No path progresses: consume the offending token.
        self.remove_invalid_token();
        Solution {
            action: Action::Remove,
            rule: current,
            enclosing_rule: current,
            token_text: next.text,
        }
    }

    /// Consume the next token as invalid input, reporting it and preserving
    /// it for diagnostics.
    pub fn remove_invalid_token(&mut self) {
        let token = self.consume();
        self.reporter.report_invalid_token(&token);
        self.metrics.nodes_created += 1;
        self.listener.add_invalid_token(token);
        self.metrics.errors_recovered += 1;
    }

    fn apply_fix(&mut self, current: RuleId, fix: &Solution) {
        match fix.action {
            Action::Remove => self.remove_invalid_token(),
            Action::Insert => {
                // At an alternatives rule the driver re-enters the matched
                // alternative and the error is reported at the precise inner
                // position on the second pass.
                if !current.alternatives().contains(&fix.enclosing_rule) {
                    self.report_missing(fix.rule);
                    self.emit_missing(fix.rule);
                    self.metrics.errors_recovered += 1;
                }
            }
        }
    }

    fn report_missing(&mut self, rule: RuleId) {
        let head = self.buffer.head().clone();
        self.reporter
            .report_missing_token(&head, &format!("missing {rule}"));
    }

    /*
     * seek methods - exploration only, never observable from outside
     */

    /// Search one sub-tree from a snapshot of the context stack, restoring
    /// it on return.
    fn seek_in_subtree(&mut self, rule: RuleId, lookahead: usize, depth: usize) -> SearchResult {
        let snapshot = self.ctx.snapshot();
        let result = self.seek(rule, lookahead, depth);
        self.ctx.restore(snapshot);
        result
    }

    /// Walk rules from `current` against the tokens from `lookahead` on,
    /// counting matches until the horizon, end of input, or a mismatch that
    /// forces a fix.
    fn seek(&mut self, mut current: RuleId, mut lookahead: usize, mut depth: usize) -> SearchResult {
        let fixes: VecDeque<Solution> = VecDeque::new();
        let mut matches = 0;

        while depth < LOOKAHEAD_LIMIT {
            let kind = self.buffer.peek(lookahead).kind;
            if kind == TokenKind::Eof {
                break;
            }

            let mut skip_rule = false;
            let mut next_override = None;
            let has_match = match current {
                RuleId::FunctionKeyword => kind == TokenKind::Function,
                RuleId::FuncName | RuleId::VariableName => kind == TokenKind::Identifier,
                RuleId::OpenParen => kind == TokenKind::OpenParen,
                RuleId::CloseParen => kind == TokenKind::CloseParen,
                RuleId::TypeDescriptor => kind == TokenKind::Type,
                RuleId::OpenBrace => kind == TokenKind::OpenBrace,
                RuleId::CloseBrace => kind == TokenKind::CloseBrace,
                RuleId::AssignOp => kind == TokenKind::Assign,
                RuleId::ExternalKeyword => kind == TokenKind::External,
                RuleId::Semicolon => kind == TokenKind::Semicolon,
                RuleId::BinaryOperator => kind.is_binary_operator(),
                RuleId::ParamList | RuleId::Parameter => {
                    skip_rule = true;
                    true
                }
                RuleId::ReturnsKeyword => {
                    // Optional: skipped without advancing when absent.
                    if kind == TokenKind::Returns {
                        next_override = Some(RuleId::TypeDescriptor);
                    } else {
                        skip_rule = true;
                        next_override = Some(RuleId::FuncBody);
                    }
                    true
                }
                RuleId::TopLevelNode => {
                    if kind != TokenKind::Public {
                        skip_rule = true;
                    }
                    next_override = Some(RuleId::FuncDefinition);
                    true
                }
                RuleId::Statement => {
                    if grammar::is_end_of_block(kind) {
                        skip_rule = true;
                        next_override = Some(RuleId::CloseBrace);
                        true
                    } else {
                        let sub = self.seek_in_statements(lookahead, depth);
                        return Self::final_result(matches, fixes, sub);
                    }
                }
                RuleId::FuncBody => {
                    let sub = self.seek_in_alternatives(lookahead, depth, &FUNC_BODIES);
                    return Self::final_result(matches, fixes, sub);
                }
                RuleId::Expression => {
                    let sub = self.seek_in_expression(lookahead, depth);
                    return Self::final_result(matches, fixes, sub);
                }
                // Productions stay at the same token and continue with
                // their first sub-rule.
                RuleId::CompUnit
                | RuleId::FuncDefinition
                | RuleId::FuncSignature
                | RuleId::ReturnTypeDescriptor
                | RuleId::FuncBodyBlock
                | RuleId::ExternalFuncBody
                | RuleId::VarDefStmt
                | RuleId::AssignmentStmt
                | RuleId::BinaryExprRhs => {
                    skip_rule = true;
                    true
                }
            };

            if !has_match {
                // The current rule is not counted as a match: it needed the
                // fix.
                let fixed = self.fix_and_continue(current, lookahead, depth + 1);
                return Self::final_result(matches, fixes, fixed);
            }

            if !skip_rule {
                depth += 1;
                matches += 1;
                lookahead += 1;
            }
            current = match next_override {
                Some(next) => next,
                None => {
                    let next_kind = self.buffer.peek(lookahead).kind;
                    grammar::next_rule(current, next_kind, &mut self.ctx)
                }
            };
        }

        SearchResult { matches, fixes }
    }

    /// Score the insertion and deletion hypotheses at a mismatch and keep
    /// the better one, recording its fix at the front of the result.
    ///
    /// Selection: most matches wins; a tie goes to insertion, which keeps
    /// the user's input intact.
    fn fix_and_continue(&mut self, current: RuleId, lookahead: usize, depth: usize) -> SearchResult {
        // Remove the token: continue with the next token in the current
        // rule. Explored first because finding the successor below mutates
        // the exploration stack.
        let deletion = self.seek_in_subtree(current, lookahead + 1, depth);

        // Insert the token: continue with the same token in the successor
        // rule.
        let next_kind = self.buffer.peek(lookahead).kind;
        let next = grammar::next_rule(current, next_kind, &mut self.ctx);
        let mut insertion = self.seek_in_subtree(next, lookahead, depth);

        if insertion.matches == 0 && deletion.matches == 0 {
            return insertion;
        }

        let enclosing = self.ctx.parent().unwrap_or(RuleId::CompUnit);
        if insertion.matches >= deletion.matches {
            insertion.fixes.push_front(Solution {
                action: Action::Insert,
                rule: current,
                enclosing_rule: enclosing,
                token_text: CompactString::new(current.display_name()),
            });
            insertion
        } else {
            let mut deletion = deletion;
            deletion.fixes.push_front(Solution {
                action: Action::Remove,
                rule: current,
                enclosing_rule: enclosing,
                token_text: self.buffer.peek(lookahead).text.clone(),
            });
            deletion
        }
    }

    /// Explore every alternative from the same starting point and keep the
    /// best result: most matches, then fewest fixes, then declaration
    /// order.
    fn seek_in_alternatives(
        &mut self,
        lookahead: usize,
        depth: usize,
        rules: &[RuleId],
    ) -> SearchResult {
        // Results are grouped by match count so the best group can be read
        // off without sorting.
        let mut groups: [Vec<SearchResult>; LOOKAHEAD_LIMIT + 1] =
            std::array::from_fn(|_| Vec::new());
        let mut best_matches = 0;

        for &rule in rules {
            let result = self.seek_in_subtree(rule, lookahead, depth);
            let bucket = result.matches.min(LOOKAHEAD_LIMIT);
            best_matches = best_matches.max(bucket);
            groups[bucket].push(result);
        }

        if best_matches == 0 {
            return SearchResult::default();
        }

        let candidates = &mut groups[best_matches];
        let mut winner = 0;
        for index in 1..candidates.len() {
            if candidates[index].fixes.len() < candidates[winner].fixes.len() {
                winner = index;
            }
        }
        candidates.swap_remove(winner)
    }

    /// Statement search, with the empty-statement shortcut: an isolated ';'
    /// is a statement to drop, not a statement with everything missing.
    fn seek_in_statements(&mut self, lookahead: usize, depth: usize) -> SearchResult {
        let next = self.buffer.peek(lookahead).clone();
        if next.kind == TokenKind::Semicolon && self.config.empty_statement_recovery {
            let sub = self.seek_in_subtree(RuleId::Statement, lookahead + 1, depth + 1);
            let mut fixes = VecDeque::with_capacity(sub.fixes.len() + 1);
            fixes.push_back(Solution {
                action: Action::Remove,
                rule: RuleId::Statement,
                enclosing_rule: self.ctx.parent().unwrap_or(RuleId::CompUnit),
                token_text: next.text,
            });
            fixes.extend(sub.fixes);
            return SearchResult {
                matches: sub.matches,
                fixes,
            };
        }

        self.seek_in_alternatives(lookahead, depth, &STATEMENTS)
    }

    /// Expression search: one terminal, then either the statement's ';' or
    /// a binary tail, decided by the end-of-expression set.
    fn seek_in_expression(&mut self, lookahead: usize, depth: usize) -> SearchResult {
        let kind = self.buffer.peek(lookahead).kind;
        let depth = depth + 1;
        let has_match = matches!(
            kind,
            TokenKind::Int
                | TokenKind::Hex
                | TokenKind::Float
                | TokenKind::Identifier
                | TokenKind::OpenParen
        );
        if !has_match {
            return self.fix_and_continue(RuleId::Expression, lookahead, depth);
        }

        let lookahead = lookahead + 1;
        let sub = if kind == TokenKind::OpenParen {
            // Keep seeking inside the group; the closing paren is left to
            // the fix search if the horizon reaches it.
            self.seek(RuleId::Expression, lookahead, depth)
        } else {
            let next_kind = self.buffer.peek(lookahead).kind;
            let next = if grammar::is_end_of_expression(next_kind) {
                RuleId::Semicolon
            } else {
                RuleId::BinaryExprRhs
            };
            self.seek(next, lookahead, depth)
        };

        SearchResult {
            matches: 1 + sub.matches,
            fixes: sub.fixes,
        }
    }

    /// Merge a sub-tree result into the counts accumulated so far.
    fn final_result(
        matches: usize,
        mut fixes: VecDeque<Solution>,
        sub: SearchResult,
    ) -> SearchResult {
        fixes.extend(sub.fixes);
        SearchResult {
            matches: matches + sub.matches,
            fixes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectingReporter;
    use crate::listener::{EventLog, ParseEvent};
    use crate::parser::{Parser, ParserConfig};

    fn parser(source: &str) -> Parser<'_, EventLog, CollectingReporter> {
        Parser::new(source, EventLog::new(), CollectingReporter::new())
    }

    #[test]
    fn test_eof_recovery_inserts() {
        let mut p = parser("");
        p.ctx.push(RuleId::CompUnit);
        p.ctx.push(RuleId::FuncDefinition);

        let solution = p.recover(RuleId::FuncName);
        assert_eq!(solution.action, Action::Insert);
        assert_eq!(solution.rule, RuleId::FuncName);
        assert_eq!(p.listener().events(), &[ParseEvent::Missing(RuleId::FuncName)]);
    }

    #[test]
    fn test_never_removes_at_eof() {
        for rule in [
            RuleId::Semicolon,
            RuleId::CloseBrace,
            RuleId::Expression,
            RuleId::FuncBody,
            RuleId::Statement,
        ] {
            let mut p = parser("");
            p.ctx.push(RuleId::CompUnit);
            p.ctx.push(RuleId::FuncDefinition);
            assert_eq!(p.recover(rule).action, Action::Insert);
        }
    }

    #[test]
    fn test_recovery_leaves_live_stack_untouched() {
        let mut p = parser("int x = 1 }");
        p.ctx.push(RuleId::CompUnit);
        p.ctx.push(RuleId::FuncDefinition);
        let before = p.ctx.entries().to_vec();

        // '{' is missing; recovery must pick insertion without mutating the
        // live stack.
        let solution = p.recover(RuleId::FuncBody);
        assert_eq!(solution.action, Action::Insert);
        assert_eq!(p.ctx.entries(), before.as_slice());
    }

    #[test]
    fn test_missing_open_brace_resolves_block_alternative() {
        let mut p = parser("int x = 1 ; }");
        p.ctx.push(RuleId::CompUnit);
        p.ctx.push(RuleId::FuncDefinition);

        let solution = p.recover(RuleId::FuncBody);
        assert_eq!(solution.action, Action::Insert);
        assert_eq!(solution.enclosing_rule, RuleId::FuncBodyBlock);
        // The alternative is re-parsed by the driver; no diagnostic yet.
        assert!(p.reporter().diagnostics().is_empty());
    }

    #[test]
    fn test_missing_external_keyword() {
        let mut p = parser(";");
        p.ctx.push(RuleId::CompUnit);
        p.ctx.push(RuleId::FuncDefinition);
        p.ctx.push(RuleId::ExternalFuncBody);

        let solution = p.recover(RuleId::ExternalKeyword);
        assert_eq!(solution.action, Action::Insert);
        let diagnostics = p.reporter().diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].to_string().contains("missing 'external'"));
    }

    #[test]
    fn test_spurious_token_removed() {
        let mut p = parser(", ) { }");
        p.ctx.push(RuleId::CompUnit);
        p.ctx.push(RuleId::FuncDefinition);
        p.ctx.push(RuleId::FuncSignature);

        let solution = p.recover(RuleId::CloseParen);
        assert_eq!(solution.action, Action::Remove);
        assert_eq!(p.buffer.peek(1).kind, TokenKind::CloseParen);
        let diagnostics = p.reporter().diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].to_string().contains("invalid token ','"));
    }

    #[test]
    fn test_empty_statement_shortcut() {
        let mut p = parser("; }");
        p.ctx.push(RuleId::CompUnit);
        p.ctx.push(RuleId::FuncDefinition);
        p.ctx.push(RuleId::FuncBodyBlock);

        let solution = p.recover(RuleId::Statement);
        assert_eq!(solution.action, Action::Remove);
        // The ';' was consumed as invalid input.
        assert_eq!(p.buffer.peek(1).kind, TokenKind::CloseBrace);
    }

    #[test]
    fn test_empty_statement_shortcut_disabled() {
        let mut p = Parser::with_config(
            "; }",
            EventLog::new(),
            CollectingReporter::new(),
            ParserConfig {
                empty_statement_recovery: false,
            },
        );
        p.ctx.push(RuleId::CompUnit);
        p.ctx.push(RuleId::FuncDefinition);
        p.ctx.push(RuleId::FuncBodyBlock);

        // Without the shortcut the ';' is read as a statement with all its
        // leading pieces missing: recovery resolves an alternative instead
        // of dropping the token.
        let solution = p.recover(RuleId::Statement);
        assert_eq!(solution.action, Action::Insert);
        assert_eq!(solution.enclosing_rule, RuleId::AssignmentStmt);
        assert_eq!(p.buffer.peek(1).kind, TokenKind::Semicolon);
    }

    #[test]
    fn test_statement_alternatives_prefer_fewer_fixes() {
        // 'x = 1 ;' at a statement position must resolve to an assignment,
        // not a var-def with an inserted type.
        let mut p = parser("= 1 ; }");
        p.ctx.push(RuleId::CompUnit);
        p.ctx.push(RuleId::FuncDefinition);
        p.ctx.push(RuleId::FuncBodyBlock);

        let solution = p.recover(RuleId::Statement);
        assert_eq!(solution.action, Action::Insert);
        assert!(matches!(
            solution.enclosing_rule,
            RuleId::AssignmentStmt | RuleId::VarDefStmt
        ));
    }

    #[test]
    fn test_insertion_preferred_on_tie() {
        // 'int = 1 ;' recovering at the variable name: insertion of the
        // name scores at least as well as deleting '=', and the tie rule
        // keeps the user's input.
        let mut p = parser("= 1 ; }");
        p.ctx.push(RuleId::CompUnit);
        p.ctx.push(RuleId::FuncDefinition);
        p.ctx.push(RuleId::FuncBodyBlock);
        p.ctx.push(RuleId::VarDefStmt);

        let solution = p.recover(RuleId::VariableName);
        assert_eq!(solution.action, Action::Insert);
        let diagnostics = p.reporter().diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].to_string().contains("missing variable"));
    }
}
