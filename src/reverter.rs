use std::fmt::{self, Debug};

use log::debug;

use crate::{Differ, Operation, Path, Revertible};

/// Collects the operations of every tracked field of a record.
///
/// Handed to [`Revertible::describe`]; each registration diffs one field
/// with the given strategy and lifts the resulting operations onto the
/// record. Output order is registration order.
pub struct Reverter<'a, Root> {
    current: &'a Root,
    previous: &'a Root,
    operations: Vec<Operation<Root>>,
}

impl<'a, Root: 'static> Reverter<'a, Root> {
    /// Registers a tracked field.
    pub fn field<Value, D>(&mut self, path: Path<Root, Value>, differ: D) -> &mut Self
    where
        Value: 'static,
        D: Differ<Value>,
    {
        let (Some(current), Some(previous)) = (path.get(self.current), path.get(self.previous))
        else {
            debug!("Skipping field {path} as it does not resolve on both versions");
            return self;
        };

        self.operations.extend(
            differ
                .diff(current, previous)
                .into_iter()
                .map(|operation| operation.lift(&path)),
        );
        self
    }

    /// Diffs the whole value with a single strategy; used by scalars and
    /// containers that have no fields of their own.
    pub fn whole<D: Differ<Root>>(&mut self, differ: D) -> &mut Self {
        self.operations
            .extend(differ.diff(self.current, self.previous));
        self
    }

    #[must_use]
    pub fn current(&self) -> &'a Root { self.current }

    #[must_use]
    pub fn previous(&self) -> &'a Root { self.previous }
}

impl<Root: Revertible> Reverter<'_, Root> {
    /// Runs the registrations of `Root` and returns the collected operations.
    pub(crate) fn operations(current: &Root, previous: &Root) -> Vec<Operation<Root>> {
        let mut reverter = Reverter {
            current,
            previous,
            operations: Vec::new(),
        };
        Root::describe(&mut reverter);
        reverter.operations
    }
}

impl<Root> Debug for Reverter<'_, Root> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reverter")
            .field("operations", &self.operations)
            .finish_non_exhaustive()
    }
}
