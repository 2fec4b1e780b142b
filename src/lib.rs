//! Minimal, replayable structural diffs between two versions of a value,
//! and an undo/redo history built on them.
//!
//! [`diff`] compares a *current* and a *previous* value and returns a
//! [`Reversion`]: the operations that turn the current value back into the
//! previous one, guarded by a fingerprint of the value they were computed
//! from. Which parts of a record take part, and how each is compared, is
//! declared by implementing [`Revertible`].
//!
//! [`HistoryController`] stores reversions in both directions to provide
//! undo and redo with nested scopes, debouncing and a configurable error
//! policy.

mod consts;
mod containers;
mod differ;
mod errors;
mod fingerprint;
mod history;
mod operation;
mod path;
mod reversion;
mod reverter;
mod utils;

pub use containers::{MapContainer, SequenceContainer, SetContainer};
pub use differ::{
    Differ, FloatDiffer, Identifiable, IdentifiedKeyedDiffer, IdentifiedSequenceDiffer,
    KeyedDiffer, LeafDiffer, NestedDiffer, OptionalDiffer, Revertible, SequenceDiffer, SetDiffer,
};
pub use errors::{HistoryError, RevertError};
pub use fingerprint::{Fingerprint, Fingerprinter, StructuralFingerprint};
pub use history::{ErrorPolicy, HistoryConfig, HistoryController};
pub use operation::{Operation, OperationKind};
pub use path::{Path, Segment};
pub use reversion::{Reversion, diff, diff_with};
pub use reverter::Reverter;
