use crate::{
    Differ, MapContainer, Operation, OperationKind,
    operation::{KeyedRemove, KeyedUpsert},
};

/// Diff for maps whose values carry no identity. Changed values are replaced
/// wholesale; there is no recursion into them.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyedDiffer;

impl<Map> Differ<Map> for KeyedDiffer
where
    Map: MapContainer,
    Map::Value: PartialEq,
{
    fn diff(&self, current: &Map, previous: &Map) -> Vec<Operation<Map>> {
        let keys_to_remove: Vec<Map::Key> = current
            .entries()
            .filter(|(key, _)| !previous.has_key(key))
            .map(|(key, _)| key.clone())
            .collect();
        let upserts: Vec<(Map::Key, Map::Value)> = previous
            .entries()
            .filter(|(key, value)| current.value(key) != Some(*value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let mut operations = Vec::with_capacity(2);
        if !keys_to_remove.is_empty() {
            operations.push(Operation::new(
                OperationKind::Remove,
                KeyedRemove {
                    keys: keys_to_remove,
                },
            ));
        }
        if !upserts.is_empty() {
            operations.push(Operation::new(
                OperationKind::Insert,
                KeyedUpsert { entries: upserts },
            ));
        }

        operations
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use pretty_assertions::assert_eq;

    use super::*;

    fn revert<M: MapContainer>(current: &M, previous: &M) -> (M, Vec<OperationKind>)
    where
        M::Value: PartialEq,
    {
        let operations = KeyedDiffer.diff(current, previous);
        let mut value = current.clone();
        for operation in &operations {
            operation.apply(&mut value).unwrap();
        }
        (value, operations.iter().map(Operation::kind).collect())
    }

    #[test]
    fn test_added_entry_is_one_insert() {
        let current = HashMap::from([(1, "1".to_owned()), (2, "2".to_owned())]);
        let previous = HashMap::from([
            (1, "1".to_owned()),
            (2, "2".to_owned()),
            (3, "3".to_owned()),
        ]);
        let operations = KeyedDiffer.diff(&current, &previous);
        assert_eq!(operations.len(), 1);
        assert_eq!(
            format!("{:?}", operations[0]),
            r#"Operation { kind: Insert, path: "$", patch: KeyedUpsert { entries: [(3, "3")] } }"#
        );

        let (value, _) = revert(&current, &previous);
        assert_eq!(value, previous);
    }

    #[test]
    fn test_changed_value_and_dropped_key() {
        let current = BTreeMap::from([("a", 1), ("b", 2), ("c", 3)]);
        let previous = BTreeMap::from([("a", 1), ("b", 20)]);
        let (value, kinds) = revert(&current, &previous);

        assert_eq!(value, previous);
        assert_eq!(kinds, vec![OperationKind::Remove, OperationKind::Insert]);
    }

    #[test]
    fn test_equal_maps_produce_nothing() {
        let map = BTreeMap::from([(1, 1.0), (2, 2.0)]);
        assert!(KeyedDiffer.diff(&map, &map.clone()).is_empty());
    }
}
