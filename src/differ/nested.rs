use crate::{Differ, Operation, Reverter, Revertible};

/// Recurses into a sub-record using its own field registrations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedDiffer;

impl<Value: Revertible> Differ<Value> for NestedDiffer {
    fn diff(&self, current: &Value, previous: &Value) -> Vec<Operation<Value>> {
        Reverter::operations(current, previous)
    }
}
