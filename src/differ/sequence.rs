use crate::{
    Differ, Operation, OperationKind, SequenceContainer,
    operation::{SequenceInsert, SequenceRemove},
    utils::{
        compact_ranges::compact_ranges,
        myers_diff::{Edit, myers_diff},
    },
};

/// Edit-script diff for ordered containers: vectors, deques and text.
///
/// Produces at most one `Remove` (positions in `current`, compacted into
/// ranges) followed by at most one `Insert` (positions in `previous`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceDiffer;

impl<Container: SequenceContainer> Differ<Container> for SequenceDiffer {
    fn diff(&self, current: &Container, previous: &Container) -> Vec<Operation<Container>> {
        let current_elements = current.elements();
        let previous_elements = previous.elements();
        if current_elements == previous_elements {
            return Vec::new();
        }

        let mut removals = Vec::new();
        let mut insertions = Vec::new();
        for edit in myers_diff(&current_elements, &previous_elements) {
            match edit {
                Edit::Delete { old_index } => removals.push(old_index),
                Edit::Insert { new_index } => {
                    insertions.push((new_index, previous_elements[new_index].clone()));
                }
                Edit::Equal { .. } => {}
            }
        }
        insertions.sort_by_key(|(index, _)| *index);

        let mut operations = Vec::with_capacity(2);
        if !removals.is_empty() {
            operations.push(Operation::new(
                OperationKind::Remove,
                SequenceRemove {
                    ranges: compact_ranges(removals),
                },
            ));
        }
        if !insertions.is_empty() {
            operations.push(Operation::new(
                OperationKind::Insert,
                SequenceInsert { items: insertions },
            ));
        }

        operations
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    fn revert<C: SequenceContainer>(current: &C, previous: &C) -> (C, Vec<OperationKind>) {
        let operations = SequenceDiffer.diff(current, previous);
        let mut value = current.clone();
        for operation in &operations {
            operation.apply(&mut value).unwrap();
        }
        (value, operations.iter().map(Operation::kind).collect())
    }

    #[test]
    fn test_appended_character_is_one_insert() {
        let (value, kinds) = revert(&"abcd".to_owned(), &"abcde".to_owned());
        assert_eq!(value, "abcde");
        assert_eq!(kinds, vec![OperationKind::Insert]);
    }

    #[test]
    fn test_dropped_element_is_one_remove() {
        let (value, kinds) = revert(&vec![0, 1, 2, 3], &vec![0, 1, 3]);
        assert_eq!(value, vec![0, 1, 3]);
        assert_eq!(kinds, vec![OperationKind::Remove]);
    }

    #[test]
    fn test_identical_sequences_produce_nothing() {
        assert!(SequenceDiffer.diff(&vec![1, 2, 3], &vec![1, 2, 3]).is_empty());
        assert!(SequenceDiffer.diff(&String::new(), &String::new()).is_empty());
    }

    #[test]
    fn test_full_replacement_is_one_remove_and_one_insert() {
        let (value, kinds) = revert(&vec![1, 2, 3], &vec![7, 8]);
        assert_eq!(value, vec![7, 8]);
        assert_eq!(kinds, vec![OperationKind::Remove, OperationKind::Insert]);
    }

    #[test]
    fn test_removals_are_compacted_into_ranges() {
        let operations = SequenceDiffer.diff(&vec![0, 1, 2, 3, 4, 5], &vec![0, 4, 5]);
        assert_eq!(operations.len(), 1);
        assert_eq!(
            format!("{:?}", operations[0]),
            r#"Operation { kind: Remove, path: "$", patch: SequenceRemove { ranges: [1..=3] } }"#
        );
    }

    #[test_case("kitten", "sitting" ; "substitutions and append")]
    #[test_case("", "hello" ; "from empty")]
    #[test_case("hello", "" ; "to empty")]
    #[test_case("árvíztűrő", "tükörfúrógép" ; "multi byte")]
    #[test_case("abcabba", "cbabac" ; "interleaved")]
    fn test_text_round_trip(current: &str, previous: &str) {
        let (value, _) = revert(&current.to_owned(), &previous.to_owned());
        assert_eq!(value, previous);
    }

    #[test]
    fn test_deque_round_trip() {
        let current: VecDeque<u8> = [1, 2, 3, 4].into_iter().collect();
        let previous: VecDeque<u8> = [0, 2, 4, 5].into_iter().collect();
        let (value, _) = revert(&current, &previous);
        assert_eq!(value, previous);
    }
}
