mod config;
mod scope;

use std::{
    cell::RefCell,
    fmt::{self, Debug},
    sync::{Arc, Weak},
    time::Instant,
};

pub use config::{ErrorPolicy, HistoryConfig};
use log::{debug, warn};
use parking_lot::{Mutex, ReentrantMutex};
use scope::{HistoryEntry, ScopeStack};

use crate::{HistoryError, Reversion, Revertible, diff};

/// Undo/redo history over a value, with nested transactional scopes.
///
/// Every `append` records the reversions in both directions between the
/// previously tracked value and the new one. Entries live in a stack of
/// scopes; the innermost one receives new entries and can later be merged
/// into its parent ([`pop_current_scope`](Self::pop_current_scope)) or
/// dropped ([`discard_current_scope`](Self::discard_current_scope)).
///
/// All calls are serialized by a reentrant lock, so a controller can be
/// shared between threads and called again from code it is running.
///
/// A controller created with [`attached`](Self::attached) only holds its
/// root weakly. Undo and redo then revert the live root and write the
/// result back; the root's lock must not be held while calling them.
pub struct HistoryController<Root> {
    state: ReentrantMutex<RefCell<State<Root>>>,
    root: Option<Weak<Mutex<Root>>>,
    config: HistoryConfig,
}

struct State<Root> {
    tracked: Root,
    scopes: ScopeStack<Root>,
    pending: Option<Pending<Root>>,
    last_error: Option<HistoryError>,
    /// Bumped by every change, so a step can tell whether a reentrant call
    /// changed the history while the lock-free part of it ran.
    revision: u64,
}

impl<Root> State<Root> {
    fn touch(&mut self) { self.revision = self.revision.wrapping_add(1); }
}

/// The newest entry while it can still absorb further appends.
struct Pending<Root> {
    before: Root,
    at: Instant,
    depth: usize,
}

impl<Root: Revertible> HistoryController<Root> {
    #[must_use]
    pub fn new(initial: Root, config: HistoryConfig) -> Self { Self::build(initial, None, config) }

    /// Tracks a shared root without keeping it alive.
    #[must_use]
    pub fn attached(root: &Arc<Mutex<Root>>, config: HistoryConfig) -> Self {
        let initial = root.lock().clone();
        Self::build(initial, Some(Arc::downgrade(root)), config)
    }

    fn build(initial: Root, root: Option<Weak<Mutex<Root>>>, config: HistoryConfig) -> Self {
        debug!(
            "Creating history controller (debounce: {}ms, error policy: {}, attached: {})",
            config.debounce_ms,
            config.error_policy,
            root.is_some()
        );

        Self {
            state: ReentrantMutex::new(RefCell::new(State {
                tracked: initial,
                scopes: ScopeStack::new(),
                pending: None,
                last_error: None,
                revision: 0,
            })),
            root,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &HistoryConfig { &self.config }

    /// Records the change from the last tracked value to `value` in the
    /// active scope.
    ///
    /// Nothing is recorded when the two are equal. A recorded change clears
    /// the redo stack. Within the debounce interval of the previous append
    /// the change is merged into the pending entry instead.
    pub fn append(&self, value: Root) {
        let guard = self.state.lock();

        let (old, coalescing) = {
            let state = guard.borrow();
            match state
                .pending
                .as_ref()
                .filter(|pending| self.can_coalesce(&state, pending))
            {
                Some(pending) => (pending.before.clone(), true),
                None => (state.tracked.clone(), false),
            }
        };

        let now = Instant::now();
        let entry = diff(&value, &old)
            .zip(diff(&old, &value))
            .map(|(undo, redo)| HistoryEntry { undo, redo });

        let mut state = guard.borrow_mut();
        state.touch();
        if coalescing {
            state.scopes.forget_last();
        }
        state.tracked = value;

        let Some(entry) = entry else {
            if coalescing {
                debug!("Coalesced edits cancel out, dropping the pending entry");
                state.pending = None;
            }
            return;
        };

        let depth = state.scopes.depth();
        debug!(
            "{} entry with {} undo operation(s) in scope {depth}",
            if coalescing { "Coalesced" } else { "Appended" },
            entry.undo.len()
        );
        state.scopes.record(entry, self.config.undo_limit);
        state.pending = self.config.debounce().map(|_| Pending {
            before: old,
            at: now,
            depth,
        });
    }

    /// Appends the current value of the attached root.
    ///
    /// Without an attached root there is nothing new to record.
    ///
    /// # Errors
    ///
    /// [`HistoryError::RootReleased`] if the attached root was dropped.
    pub fn append_current(&self) -> Result<(), HistoryError> {
        let guard = self.state.lock();
        let live = self.live_value(&guard.borrow());

        match live {
            Ok(value) => {
                self.append(value);
                Ok(())
            }
            Err(error) => self.settle(&guard, Err(error), |_| ()),
        }
    }

    /// Reverts the newest entry of the innermost non-empty scope and returns
    /// the resulting value. With no history left this changes nothing.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::Revert`] if the value no longer matches the entry.
    /// - [`HistoryError::RootReleased`] if the attached root was dropped.
    /// - [`HistoryError::Interrupted`] if code run while reverting changed
    ///   the history.
    pub fn undo(&self) -> Result<Root, HistoryError> {
        let guard = self.state.lock();
        let result = self.undo_step(&guard);
        self.settle(&guard, result, |state| state.tracked.clone())
    }

    /// Reapplies the most recently undone entry and returns the resulting
    /// value. With nothing to redo this changes nothing.
    ///
    /// # Errors
    ///
    /// Same as [`undo`](Self::undo).
    pub fn redo(&self) -> Result<Root, HistoryError> {
        let guard = self.state.lock();
        let result = self.redo_step(&guard);
        self.settle(&guard, result, |state| state.tracked.clone())
    }

    /// Opens a nested scope that receives subsequent appends.
    pub fn push_new_scope(&self) {
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();
        state.touch();
        state.scopes.push_scope();
        state.pending = None;
        debug!("Pushed scope {}", state.scopes.depth());
    }

    /// Merges the active scope's entries into its parent.
    ///
    /// # Errors
    ///
    /// [`HistoryError::ScopeUnderflow`] when called on the root scope.
    pub fn pop_current_scope(&self) -> Result<(), HistoryError> {
        let guard = self.state.lock();
        let result = {
            let mut state = guard.borrow_mut();
            state.touch();
            state.pending = None;
            state.scopes.pop_scope(self.config.undo_limit).map(|merged| {
                debug!("Popped scope, merging {merged} entry(s) into the parent");
            })
        };
        self.settle(&guard, result, |_| ())
    }

    /// Drops the active scope's entries. The tracked value is left as is.
    ///
    /// # Errors
    ///
    /// [`HistoryError::ScopeUnderflow`] when called on the root scope.
    pub fn discard_current_scope(&self) -> Result<(), HistoryError> {
        let guard = self.state.lock();
        let result = {
            let mut state = guard.borrow_mut();
            state.touch();
            state.pending = None;
            state.scopes.discard_scope().map(|dropped| {
                debug!("Discarded scope with {dropped} entry(s)");
            })
        };
        self.settle(&guard, result, |_| ())
    }

    /// Undoes every entry of the active scope, newest first, then pops it.
    /// The undone entries stay redoable from the parent scope.
    ///
    /// # Errors
    ///
    /// [`HistoryError::ScopeUnderflow`] on the root scope, or any error of
    /// [`undo`](Self::undo); either way nothing changes.
    pub fn undo_current_scope(&self) -> Result<Root, HistoryError> {
        let guard = self.state.lock();
        let result = self.undo_scope(&guard, true);
        self.settle(&guard, result, |state| state.tracked.clone())
    }

    /// Undoes every entry of the active scope, newest first, then discards
    /// it.
    ///
    /// # Errors
    ///
    /// Same as [`undo_current_scope`](Self::undo_current_scope).
    pub fn undo_and_discard_current_scope(&self) -> Result<Root, HistoryError> {
        let guard = self.state.lock();
        let result = self.undo_scope(&guard, false);
        self.settle(&guard, result, |state| state.tracked.clone())
    }

    /// Replaces the tracked value and forgets all history and scopes.
    pub fn reset(&self, value: Root) {
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();
        state.touch();
        state.tracked = value;
        state.scopes = ScopeStack::new();
        state.pending = None;
        debug!("History reset");
    }

    /// The last appended or restored value.
    #[must_use]
    pub fn current(&self) -> Root { self.state.lock().borrow().tracked.clone() }

    /// Whether the active scope has anything to undo.
    #[must_use]
    pub fn has_undo(&self) -> bool { self.undo_count() > 0 }

    /// Whether anything was undone out of the active scope.
    #[must_use]
    pub fn has_redo(&self) -> bool { self.redo_count() > 0 }

    #[must_use]
    pub fn undo_count(&self) -> usize { self.state.lock().borrow().scopes.undo_count() }

    #[must_use]
    pub fn redo_count(&self) -> usize { self.state.lock().borrow().scopes.redo_count() }

    /// Number of nested scopes; zero at the root.
    #[must_use]
    pub fn scope_level(&self) -> usize { self.state.lock().borrow().scopes.depth() }

    /// The most recent error captured under [`ErrorPolicy::Capture`].
    #[must_use]
    pub fn last_error(&self) -> Option<HistoryError> {
        self.state.lock().borrow().last_error.clone()
    }

    pub fn take_last_error(&self) -> Option<HistoryError> {
        self.state.lock().borrow_mut().last_error.take()
    }

    fn undo_step(&self, cell: &RefCell<State<Root>>) -> Result<Root, HistoryError> {
        let (revision, depth, undo, live) = {
            let state = cell.borrow();
            let Some((depth, entry)) = state.scopes.last_undo() else {
                debug!("Nothing to undo");
                return Ok(state.tracked.clone());
            };
            (state.revision, depth, entry.undo.clone(), self.live_value(&state)?)
        };

        let value = undo.reverted(&live)?;
        self.commit(cell, revision, value, |state| {
            state.scopes.move_to_redo(depth);
            debug!("Undid the newest entry of scope {depth}");
            Ok(())
        })
    }

    fn redo_step(&self, cell: &RefCell<State<Root>>) -> Result<Root, HistoryError> {
        let (revision, redo, live) = {
            let state = cell.borrow();
            let Some(entry) = state.scopes.last_redo() else {
                debug!("Nothing to redo");
                return Ok(state.tracked.clone());
            };
            (state.revision, entry.redo.clone(), self.live_value(&state)?)
        };

        let value = redo.reverted(&live)?;
        self.commit(cell, revision, value, |state| {
            let depth = state.scopes.restore_from_redo();
            debug!("Redid an entry back into scope {depth:?}");
            Ok(())
        })
    }

    fn undo_scope(
        &self,
        cell: &RefCell<State<Root>>,
        keep_redo: bool,
    ) -> Result<Root, HistoryError> {
        let (revision, undos, live) = {
            let state = cell.borrow();
            let undos: Vec<Reversion<Root>> = state
                .scopes
                .nested_entries()?
                .iter()
                .rev()
                .map(|entry| entry.undo.clone())
                .collect();
            (state.revision, undos, self.live_value(&state)?)
        };

        let mut value = live;
        for undo in &undos {
            value = undo.reverted(&value)?;
        }

        self.commit(cell, revision, value, |state| {
            if keep_redo {
                state.scopes.move_scope_to_redo();
                state.scopes.pop_scope(self.config.undo_limit)?;
            } else {
                state.scopes.discard_scope()?;
            }
            debug!(
                "Undid {} entry(s) and {} the scope",
                undos.len(),
                if keep_redo { "popped" } else { "discarded" }
            );
            Ok(())
        })
    }

    fn can_coalesce(&self, state: &State<Root>, pending: &Pending<Root>) -> bool {
        self.config
            .debounce()
            .is_some_and(|interval| pending.at.elapsed() < interval)
            && pending.depth == state.scopes.depth()
            && state.scopes.undo_count() > 0
    }

    /// The value reversions are applied to: the attached root if there is
    /// one, the tracked value otherwise.
    fn live_value(&self, state: &State<Root>) -> Result<Root, HistoryError> {
        match &self.root {
            None => Ok(state.tracked.clone()),
            Some(root) => root
                .upgrade()
                .map(|root| root.lock().clone())
                .ok_or(HistoryError::RootReleased),
        }
    }

    /// Stores the outcome of a step, unless the history changed since
    /// `revision` was read, and writes it back to the attached root.
    fn commit(
        &self,
        cell: &RefCell<State<Root>>,
        revision: u64,
        value: Root,
        update: impl FnOnce(&mut State<Root>) -> Result<(), HistoryError>,
    ) -> Result<Root, HistoryError> {
        let tracked = value.clone();
        {
            let mut state = cell.borrow_mut();
            if state.revision != revision {
                return Err(HistoryError::Interrupted);
            }
            update(&mut state)?;
            state.touch();
            state.pending = None;
            state.tracked = tracked;
        }

        if let Some(root) = self.root.as_ref().and_then(Weak::upgrade) {
            root.lock().clone_from(&value);
        }
        Ok(value)
    }

    fn settle<T>(
        &self,
        cell: &RefCell<State<Root>>,
        result: Result<T, HistoryError>,
        fallback: impl FnOnce(&State<Root>) -> T,
    ) -> Result<T, HistoryError> {
        match (result, self.config.error_policy) {
            (Ok(value), _) => Ok(value),
            (Err(error), ErrorPolicy::Propagate) => Err(error),
            (Err(error), ErrorPolicy::Capture) => {
                warn!("Captured history error: {error}");
                let value = fallback(&cell.borrow());
                cell.borrow_mut().last_error = Some(error);
                Ok(value)
            }
        }
    }
}
impl<Root> Debug for HistoryController<Root> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryController")
            .field("attached", &self.root.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
