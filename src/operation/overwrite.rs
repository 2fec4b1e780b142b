use std::fmt::Debug;

use super::Patch;
use crate::errors::PatchError;

/// Replaces the bound value wholesale.
#[derive(Debug, Clone)]
pub(crate) struct Overwrite<Value> {
    pub value: Value,
}

impl<Value> Patch<Value> for Overwrite<Value>
where
    Value: Clone + Debug + Send + Sync,
{
    fn apply(&self, target: &mut Value) -> Result<(), PatchError> {
        target.clone_from(&self.value);
        Ok(())
    }
}
