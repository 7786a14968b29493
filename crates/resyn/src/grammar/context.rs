//! Stack of currently open productions.
//!
//! The stack has two modes of use: the driver mutates the live stack as it
//! enters and leaves productions, and the recovery engine explores on top of
//! a snapshot that is restored afterwards. The storage is an inline small
//! vector, so a snapshot is a fixed-size copy for any realistic nesting
//! depth.

use super::RuleId;
use smallvec::SmallVec;

type Entries = SmallVec<[RuleId; 16]>;

/// A restorable copy of the stack contents.
#[derive(Debug, Clone)]
pub struct ContextSnapshot(Entries);

/// The stack of open productions.
#[derive(Debug, Clone, Default)]
pub struct ContextStack {
    entries: Entries,
}

impl ContextStack {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a production.
    pub fn push(&mut self, rule: RuleId) {
        self.entries.push(rule);
    }

    /// Close the innermost production.
    pub fn pop(&mut self) -> Option<RuleId> {
        self.entries.pop()
    }

    /// The innermost open production, if any.
    #[must_use]
    pub fn parent(&self) -> Option<RuleId> {
        self.entries.last().copied()
    }

    /// Number of open productions.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capture the current contents for later [`restore`](Self::restore).
    #[must_use]
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot(self.entries.clone())
    }

    /// Restore contents captured by [`snapshot`](Self::snapshot).
    pub fn restore(&mut self, snapshot: ContextSnapshot) {
        self.entries = snapshot.0;
    }

    /// The stack contents, outermost first.
    #[must_use]
    pub fn entries(&self) -> &[RuleId] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_parent() {
        let mut stack = ContextStack::new();
        assert!(stack.is_empty());
        stack.push(RuleId::CompUnit);
        stack.push(RuleId::FuncDefinition);
        assert_eq!(stack.parent(), Some(RuleId::FuncDefinition));
        assert_eq!(stack.pop(), Some(RuleId::FuncDefinition));
        assert_eq!(stack.parent(), Some(RuleId::CompUnit));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut stack = ContextStack::new();
        stack.push(RuleId::CompUnit);
        stack.push(RuleId::FuncDefinition);
        let snapshot = stack.snapshot();

        stack.pop();
        stack.push(RuleId::FuncBodyBlock);
        stack.push(RuleId::VarDefStmt);
        assert_eq!(stack.depth(), 3);

        stack.restore(snapshot);
        assert_eq!(
            stack.entries(),
            &[RuleId::CompUnit, RuleId::FuncDefinition]
        );
    }

    #[test]
    fn test_pop_empty() {
        let mut stack = ContextStack::new();
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.parent(), None);
    }
}
