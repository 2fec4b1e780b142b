use std::fmt::Debug;

use crate::{
    Differ, Operation, OperationKind, Path,
    operation::Overwrite,
};

/// Wraps another differ for `Option` fields.
///
/// Switching between `None` and `Some` is always a whole `Overwrite`; two
/// `Some`s are diffed with the inner differ behind an unwrapping path step.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalDiffer<D>(pub D);

impl<Value, D> Differ<Option<Value>> for OptionalDiffer<D>
where
    Value: Clone + Debug + Send + Sync + 'static,
    D: Differ<Value>,
{
    fn diff(&self, current: &Option<Value>, previous: &Option<Value>) -> Vec<Operation<Option<Value>>> {
        match (current, previous) {
            (None, None) => Vec::new(),
            (Some(current), Some(previous)) => {
                let unwrap = Path::some();
                self.0
                    .diff(current, previous)
                    .into_iter()
                    .map(|operation| operation.lift(&unwrap))
                    .collect()
            }
            _ => vec![Operation::new(
                OperationKind::Overwrite,
                Overwrite {
                    value: previous.clone(),
                },
            )],
        }
    }
}
