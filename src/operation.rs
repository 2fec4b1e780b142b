mod keyed;
mod overwrite;
mod sequence;
mod set;

use std::{
    fmt::{self, Debug, Display},
    sync::Arc,
};

pub(crate) use keyed::{KeyedMove, KeyedRemove, KeyedUpsert};
pub(crate) use overwrite::Overwrite;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
pub(crate) use sequence::{SequenceInsert, SequenceMove, SequenceRemove};
pub(crate) use set::{SetInsert, SetRemove};

use crate::{
    Path, RevertError, Segment,
    errors::PatchError,
    path::render_segments,
};

/// The four shapes of change a reversion is made of.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Overwrite,
    Insert,
    Remove,
    Move,
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Overwrite => write!(f, "Overwrite"),
            OperationKind::Insert => write!(f, "Insert"),
            OperationKind::Remove => write!(f, "Remove"),
            OperationKind::Move => write!(f, "Move"),
        }
    }
}

/// A container apply rule acting on the value an operation is bound to.
pub(crate) trait Patch<Target>: Debug + Send + Sync {
    fn apply(&self, target: &mut Target) -> Result<(), PatchError>;
}

/// A single change bound to a path inside `Root`.
///
/// Operations are immutable and cheap to clone; the apply rule is shared.
pub struct Operation<Root> {
    kind: OperationKind,
    segments: Vec<Segment>,
    patch: Arc<dyn Patch<Root>>,
}

impl<Root: 'static> Operation<Root> {
    /// An operation acting on the root itself.
    pub(crate) fn new(kind: OperationKind, patch: impl Patch<Root> + 'static) -> Self {
        Self {
            kind,
            segments: Vec::new(),
            patch: Arc::new(patch),
        }
    }

    /// Re-roots the operation under `path`, so that it can be applied to a
    /// `Parent` containing the value it was computed for.
    #[must_use]
    pub fn lift<Parent: 'static>(self, path: &Path<Parent, Root>) -> Operation<Parent> {
        Operation {
            kind: self.kind,
            segments: path
                .segments()
                .iter()
                .chain(&self.segments)
                .cloned()
                .collect(),
            patch: Arc::new(Lifted {
                path: path.clone(),
                inner: self.patch,
            }),
        }
    }

    /// Applies the operation in place.
    ///
    /// Unlike [`Reversion::revert`](crate::Reversion::revert) this performs
    /// no version check and may leave `root` partially changed on error.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not resolve on `root` or if the
    /// container rule does not fit the value found there.
    pub fn apply(&self, root: &mut Root) -> Result<(), RevertError> {
        self.patch.apply(root).map_err(|error| match error {
            PatchError::Unresolved => RevertError::UnresolvedPath { path: self.path() },
            PatchError::Inapplicable(reason) => RevertError::Inapplicable {
                operation: self.kind,
                path: self.path(),
                reason,
            },
        })
    }
}

impl<Root> Operation<Root> {
    #[must_use]
    pub fn kind(&self) -> OperationKind { self.kind }

    #[must_use]
    pub fn segments(&self) -> &[Segment] { &self.segments }

    /// The bound path rendered as `$.field[0]`.
    #[must_use]
    pub fn path(&self) -> String { render_segments(&self.segments) }
}

impl<Root> Clone for Operation<Root> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            segments: self.segments.clone(),
            patch: Arc::clone(&self.patch),
        }
    }
}

impl<Root> Display for Operation<Root> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.path())
    }
}

impl<Root> Debug for Operation<Root> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("kind", &self.kind)
            .field("path", &self.path())
            .field("patch", &self.patch)
            .finish()
    }
}

/// Resolves `path` before handing the sub-value to the inner rule.
struct Lifted<Root, Value> {
    path: Path<Root, Value>,
    inner: Arc<dyn Patch<Value>>,
}

impl<Root, Value> Debug for Lifted<Root, Value> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { Debug::fmt(&self.inner, f) }
}

impl<Root: 'static, Value: 'static> Patch<Root> for Lifted<Root, Value> {
    fn apply(&self, target: &mut Root) -> Result<(), PatchError> {
        let value = self.path.get_mut(target).ok_or(PatchError::Unresolved)?;
        self.inner.apply(value)
    }
}
