use super::Patch;
use crate::{SetContainer, errors::PatchError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SetRemove<Element> {
    pub elements: Vec<Element>,
}

impl<Set: SetContainer> Patch<Set> for SetRemove<Set::Element> {
    fn apply(&self, target: &mut Set) -> Result<(), PatchError> {
        for element in &self.elements {
            if !target.discard(element) {
                return Err(PatchError::inapplicable(format!(
                    "{element:?} is not a member"
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SetInsert<Element> {
    pub elements: Vec<Element>,
}

impl<Set: SetContainer> Patch<Set> for SetInsert<Set::Element> {
    fn apply(&self, target: &mut Set) -> Result<(), PatchError> {
        for element in &self.elements {
            if !target.add(element.clone()) {
                return Err(PatchError::inapplicable(format!(
                    "{element:?} is already a member"
                )));
            }
        }

        Ok(())
    }
}
