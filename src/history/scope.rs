use log::debug;

use crate::{HistoryError, Reversion};

/// Both directions of one committed change.
pub(super) struct HistoryEntry<Root> {
    pub undo: Reversion<Root>,
    pub redo: Reversion<Root>,
}

struct RedoEntry<Root> {
    entry: HistoryEntry<Root>,
    /// Scope the entry was undone out of.
    depth: usize,
}

/// Nested undo scopes plus the shared redo stack.
///
/// There is always at least the root scope. Redo entries never point deeper
/// than the active scope, but an undo that reached past an empty scope
/// leaves a shallower entry above deeper ones.
pub(super) struct ScopeStack<Root> {
    scopes: Vec<Vec<HistoryEntry<Root>>>,
    redo: Vec<RedoEntry<Root>>,
}

impl<Root> ScopeStack<Root> {
    pub fn new() -> Self {
        Self {
            scopes: vec![Vec::new()],
            redo: Vec::new(),
        }
    }

    /// Zero for the root scope.
    pub fn depth(&self) -> usize { self.scopes.len().saturating_sub(1) }

    pub fn undo_count(&self) -> usize { self.scopes[self.depth()].len() }

    /// Entries undone out of the active scope, wherever they sit in the
    /// redo stack.
    pub fn redo_count(&self) -> usize {
        let depth = self.depth();
        self.redo.iter().filter(|redo| redo.depth == depth).count()
    }

    /// Commits a new entry to the active scope, which invalidates every redo.
    pub fn record(&mut self, entry: HistoryEntry<Root>, undo_limit: Option<usize>) {
        self.redo.clear();
        let depth = self.depth();
        self.scopes[depth].push(entry);
        self.trim(undo_limit);
    }

    /// Drops the newest entry of the active scope without touching redo.
    pub fn forget_last(&mut self) -> Option<HistoryEntry<Root>> {
        let depth = self.depth();
        self.scopes[depth].pop()
    }

    /// The newest entry of the innermost scope that has one.
    pub fn last_undo(&self) -> Option<(usize, &HistoryEntry<Root>)> {
        self.scopes
            .iter()
            .enumerate()
            .rev()
            .find_map(|(depth, scope)| scope.last().map(|entry| (depth, entry)))
    }

    pub fn move_to_redo(&mut self, depth: usize) {
        if let Some(entry) = self.scopes[depth].pop() {
            self.redo.push(RedoEntry { entry, depth });
        }
    }

    pub fn last_redo(&self) -> Option<&HistoryEntry<Root>> {
        self.redo.last().map(|redo| &redo.entry)
    }

    /// Puts the top redo entry back into the scope it came from and returns
    /// that scope's depth.
    pub fn restore_from_redo(&mut self) -> Option<usize> {
        let RedoEntry { entry, depth } = self.redo.pop()?;
        let depth = depth.min(self.depth());
        self.scopes[depth].push(entry);
        Some(depth)
    }

    pub fn push_scope(&mut self) { self.scopes.push(Vec::new()); }

    /// Entries of the active scope in commit order.
    ///
    /// # Errors
    ///
    /// [`HistoryError::ScopeUnderflow`] when the active scope is the root.
    pub fn nested_entries(&self) -> Result<&[HistoryEntry<Root>], HistoryError> {
        match self.depth() {
            0 => Err(HistoryError::ScopeUnderflow),
            depth => Ok(&self.scopes[depth]),
        }
    }

    /// Moves every entry of the active scope to redo, newest first, as if
    /// each had been undone in turn.
    pub fn move_scope_to_redo(&mut self) {
        let depth = self.depth();
        while let Some(entry) = self.scopes[depth].pop() {
            self.redo.push(RedoEntry { entry, depth });
        }
    }

    /// Merges the active scope into its parent, preserving commit order.
    /// Redo entries undone out of it now belong to the parent.
    pub fn pop_scope(&mut self, undo_limit: Option<usize>) -> Result<usize, HistoryError> {
        let depth = self.depth();
        if depth == 0 {
            return Err(HistoryError::ScopeUnderflow);
        }

        let entries = self.scopes.pop().unwrap_or_default();
        let merged = entries.len();
        self.scopes[depth - 1].extend(entries);
        for redo in &mut self.redo {
            if redo.depth == depth {
                redo.depth = depth - 1;
            }
        }
        self.trim(undo_limit);

        Ok(merged)
    }

    /// Drops the active scope together with the redo entries undone out of
    /// it.
    pub fn discard_scope(&mut self) -> Result<usize, HistoryError> {
        let depth = self.depth();
        if depth == 0 {
            return Err(HistoryError::ScopeUnderflow);
        }

        let dropped = self.scopes.pop().map_or(0, |entries| entries.len());
        self.redo.retain(|redo| redo.depth < depth);

        Ok(dropped)
    }

    fn trim(&mut self, undo_limit: Option<usize>) {
        let Some(limit) = undo_limit else {
            return;
        };

        let root = &mut self.scopes[0];
        let excess = root.len().saturating_sub(limit);
        if excess > 0 {
            debug!("Undo limit of {limit} reached, dropping {excess} oldest entry(s)");
            root.drain(..excess);
        }
    }
}
