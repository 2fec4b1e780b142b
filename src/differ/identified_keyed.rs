use log::debug;

use crate::{
    Differ, Identifiable, MapContainer, Operation, OperationKind, Path, Reverter, Revertible,
    operation::{KeyedMove, KeyedRemove, KeyedUpsert, Overwrite},
    utils::unique_index::unique_index,
};

/// Reconciles maps whose values carry a stable identity.
///
/// On top of the plain keyed diff this detects a value that now lives under
/// a different key and emits a `Move` from its current key to its previous
/// key, then recurses into the value at the previous key.
///
/// Operations are emitted in apply order: `Remove`, `Move`, `Insert`, then
/// nested updates. Duplicate identities fall back to a whole `Overwrite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifiedKeyedDiffer;

impl<Map> Differ<Map> for IdentifiedKeyedDiffer
where
    Map: MapContainer + PartialEq,
    Map::Value: Identifiable + Revertible,
{
    fn diff(&self, current: &Map, previous: &Map) -> Vec<Operation<Map>> {
        if current == previous {
            return Vec::new();
        }

        let (Some(current_keys), Some(previous_keys)) = (
            unique_index(current.entries().map(|(key, value)| (value.id(), key))),
            unique_index(previous.entries().map(|(key, value)| (value.id(), key))),
        ) else {
            debug!("Duplicate identities in a reconciled map, overwriting it whole");
            return vec![Operation::new(
                OperationKind::Overwrite,
                Overwrite {
                    value: previous.clone(),
                },
            )];
        };

        let removals: Vec<Map::Key> = current
            .entries()
            .filter(|(_, value)| !previous_keys.contains_key(&value.id()))
            .map(|(key, _)| key.clone())
            .collect();

        let mut insertions = Vec::new();
        let mut moves = Vec::new();
        let mut updates = Vec::new();
        for (previous_key, value) in previous.entries() {
            match current_keys.get(&value.id()) {
                None => insertions.push((previous_key.clone(), value.clone())),
                Some(&current_key) => {
                    if current_key != previous_key {
                        moves.push((current_key.clone(), previous_key.clone()));
                    }
                    updates.push((current_key, previous_key));
                }
            }
        }

        let mut operations = Vec::new();
        if !removals.is_empty() {
            operations.push(Operation::new(
                OperationKind::Remove,
                KeyedRemove { keys: removals },
            ));
        }
        if !moves.is_empty() {
            operations.push(Operation::new(OperationKind::Move, KeyedMove { moves }));
        }
        if !insertions.is_empty() {
            operations.push(Operation::new(
                OperationKind::Insert,
                KeyedUpsert {
                    entries: insertions,
                },
            ));
        }
        for (current_key, previous_key) in updates {
            let (Some(current_value), Some(previous_value)) =
                (current.value(current_key), previous.value(previous_key))
            else {
                continue;
            };
            let entry = Path::<Map, Map::Value>::key(previous_key.clone());
            operations.extend(
                Reverter::operations(current_value, previous_value)
                    .into_iter()
                    .map(|operation| operation.lift(&entry)),
            );
        }

        operations
    }
}
