use std::fmt::{self, Debug, Display};

use log::trace;

use crate::{
    Differ, Fingerprint, NestedDiffer, Operation, RevertError, Revertible, StructuralFingerprint,
};

/// An immutable patch turning one value back into an earlier version of
/// itself.
///
/// The reversion remembers the fingerprint of the value it was computed
/// from and refuses to touch anything else. It can be applied any number of
/// times.
pub struct Reversion<Root> {
    source_fingerprint: StructuralFingerprint,
    operations: Vec<Operation<Root>>,
}

impl<Root: Fingerprint + Clone + 'static> Reversion<Root> {
    /// Applies every operation, in order, to `target`.
    ///
    /// Operations run against a scratch copy which only replaces `target`
    /// once all of them succeeded.
    ///
    /// # Errors
    ///
    /// - [`RevertError::VersionMismatch`] if `target` is not the value the
    ///   reversion was computed from.
    /// - [`RevertError::UnresolvedPath`] or [`RevertError::Inapplicable`] if
    ///   an operation cannot be carried out.
    ///
    /// `target` is left untouched in every error case.
    pub fn revert(&self, target: &mut Root) -> Result<(), RevertError> {
        *target = self.reverted(target)?;
        Ok(())
    }

    /// Like [`Reversion::revert`], but returns the result as a new value.
    ///
    /// # Errors
    ///
    /// Same as [`Reversion::revert`].
    pub fn reverted(&self, source: &Root) -> Result<Root, RevertError> {
        let found = source.fingerprint();
        if found != self.source_fingerprint {
            return Err(RevertError::VersionMismatch {
                expected: self.source_fingerprint,
                found,
            });
        }

        let mut scratch = source.clone();
        for operation in &self.operations {
            operation.apply(&mut scratch)?;
        }

        Ok(scratch)
    }
}

impl<Root> Reversion<Root> {
    #[must_use]
    pub fn source_fingerprint(&self) -> StructuralFingerprint { self.source_fingerprint }

    #[must_use]
    pub fn operations(&self) -> &[Operation<Root>] { &self.operations }

    #[must_use]
    pub fn len(&self) -> usize { self.operations.len() }

    /// Always `false` for reversions returned by [`diff`]; kept for
    /// symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.operations.is_empty() }
}

impl<Root> Clone for Reversion<Root> {
    fn clone(&self) -> Self {
        Self {
            source_fingerprint: self.source_fingerprint,
            operations: self.operations.clone(),
        }
    }
}

impl<Root> Debug for Reversion<Root> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reversion")
            .field("source_fingerprint", &self.source_fingerprint)
            .field("operations", &self.operations)
            .finish()
    }
}

/// One operation per line, preceded by the source fingerprint.
impl<Root> Display for Reversion<Root> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reversion from {}", self.source_fingerprint)?;
        for operation in &self.operations {
            write!(f, "\n  {operation}")?;
        }
        Ok(())
    }
}

/// Computes the reversion that turns `current` back into `previous`, using
/// the field registrations of `Root`.
///
/// Returns `None` when there is nothing to revert.
///
/// ```
/// use reversion::diff;
///
/// let mut text = "abcd".to_owned();
/// let reversion = diff(&text, &"abcde".to_owned()).unwrap();
/// assert_eq!(reversion.len(), 1);
///
/// reversion.revert(&mut text).unwrap();
/// assert_eq!(text, "abcde");
///
/// assert!(diff(&text, &text.clone()).is_none());
/// ```
#[must_use]
pub fn diff<Root: Revertible>(current: &Root, previous: &Root) -> Option<Reversion<Root>> {
    diff_with(current, previous, &NestedDiffer)
}

/// Like [`diff`], but diffs the root with an explicit strategy instead of
/// its registrations; for example an `IdentifiedSequenceDiffer` on a bare
/// vector.
#[must_use]
pub fn diff_with<Root, D>(current: &Root, previous: &Root, differ: &D) -> Option<Reversion<Root>>
where
    Root: Fingerprint + Clone + 'static,
    D: Differ<Root>,
{
    let operations = differ.diff(current, previous);
    trace!("Diff produced {} operation(s)", operations.len());
    if operations.is_empty() {
        return None;
    }

    Some(Reversion {
        source_fingerprint: current.fingerprint(),
        operations,
    })
}
