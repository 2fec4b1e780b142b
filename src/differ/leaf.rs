use std::fmt::Debug;

use crate::{
    Differ, Operation, OperationKind,
    operation::Overwrite,
};

/// Equality-based diff for scalars: one `Overwrite` when the values differ.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeafDiffer;

impl<Value> Differ<Value> for LeafDiffer
where
    Value: PartialEq + Clone + Debug + Send + Sync + 'static,
{
    fn diff(&self, current: &Value, previous: &Value) -> Vec<Operation<Value>> {
        if current == previous {
            return Vec::new();
        }

        vec![Operation::new(
            OperationKind::Overwrite,
            Overwrite {
                value: previous.clone(),
            },
        )]
    }
}

/// Leaf diff for floats that compares bit patterns, so `NaN` equals itself
/// and `-0.0` is told apart from `0.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatDiffer;

macro_rules! float_differ {
    ($($ty:ty),*) => {
        $(
            impl Differ<$ty> for FloatDiffer {
                fn diff(&self, current: &$ty, previous: &$ty) -> Vec<Operation<$ty>> {
                    if current.to_bits() == previous.to_bits() {
                        return Vec::new();
                    }

                    LeafDiffer.diff(current, previous)
                }
            }
        )*
    };
}

float_differ!(f32, f64);
