use crate::{
    Differ, Operation, OperationKind, SetContainer,
    operation::{SetInsert, SetRemove},
};

/// Symmetric-difference diff for unordered sets: at most one batched
/// `Remove` and one batched `Insert`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetDiffer;

impl<Set: SetContainer> Differ<Set> for SetDiffer {
    fn diff(&self, current: &Set, previous: &Set) -> Vec<Operation<Set>> {
        let to_remove: Vec<Set::Element> = current
            .members()
            .filter(|element| !previous.has(element))
            .cloned()
            .collect();
        let to_insert: Vec<Set::Element> = previous
            .members()
            .filter(|element| !current.has(element))
            .cloned()
            .collect();

        let mut operations = Vec::with_capacity(2);
        if !to_remove.is_empty() {
            operations.push(Operation::new(
                OperationKind::Remove,
                SetRemove {
                    elements: to_remove,
                },
            ));
        }
        if !to_insert.is_empty() {
            operations.push(Operation::new(
                OperationKind::Insert,
                SetInsert {
                    elements: to_insert,
                },
            ));
        }

        operations
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashSet};

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_symmetric_difference() {
        let current: BTreeSet<u8> = [1, 2, 3].into();
        let previous: BTreeSet<u8> = [2, 3, 4, 5].into();
        let operations = SetDiffer.diff(&current, &previous);

        assert_eq!(
            operations.iter().map(Operation::kind).collect::<Vec<_>>(),
            vec![OperationKind::Remove, OperationKind::Insert]
        );

        let mut value = current;
        for operation in &operations {
            operation.apply(&mut value).unwrap();
        }
        assert_eq!(value, previous);
    }

    #[test]
    fn test_pure_addition_is_one_insert() {
        let current: HashSet<&str> = ["a"].into();
        let previous: HashSet<&str> = ["a", "b", "c"].into();
        let operations = SetDiffer.diff(&current, &previous);

        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].kind(), OperationKind::Insert);
    }

    #[test]
    fn test_equal_sets_produce_nothing() {
        let set: HashSet<u32> = (0..10).collect();
        assert!(SetDiffer.diff(&set, &set.clone()).is_empty());
    }
}
