use thiserror::Error;

use crate::{OperationKind, StructuralFingerprint};

/// Error type for applying a `Reversion`.
///
/// A failed revert never leaves the target partially mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RevertError {
    /// The value is not the one the reversion was computed from
    #[error(
        "Version mismatch: the reversion was computed from a value with fingerprint {expected}, \
         but the target has fingerprint {found}"
    )]
    VersionMismatch {
        /// Fingerprint captured when the reversion was built
        expected: StructuralFingerprint,
        /// Fingerprint of the value the reversion was applied to
        found: StructuralFingerprint,
    },

    /// An operation's path does not lead anywhere on the target
    #[error("Path `{path}` does not resolve on the target value")]
    UnresolvedPath {
        /// Rendered path of the offending operation
        path: String,
    },

    /// An operation's path resolved but its container rule could not run
    #[error("{operation} at `{path}` cannot be applied: {reason}")]
    Inapplicable {
        operation: OperationKind,
        path: String,
        reason: String,
    },
}

/// Errors surfaced by a `HistoryController`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// Tried to pop, discard or undo the root scope
    #[error("Scope underflow: there is no nested scope to leave")]
    ScopeUnderflow,

    /// The root the controller was attached to has been dropped
    #[error("The attached root value has been released")]
    RootReleased,

    /// The history was changed by a reentrant call while an undo or redo
    /// was being applied; the step was abandoned
    #[error("The history changed while a step was being applied")]
    Interrupted,

    #[error(transparent)]
    Revert(#[from] RevertError),
}

/// Failure of a single container apply rule, before the owning operation
/// attaches its kind and path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum PatchError {
    #[error("path does not resolve")]
    Unresolved,

    #[error("{0}")]
    Inapplicable(String),
}

impl PatchError {
    pub(crate) fn inapplicable(reason: impl Into<String>) -> Self {
        Self::Inapplicable(reason.into())
    }
}
