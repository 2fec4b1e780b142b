use log::debug;

use crate::{
    Differ, Identifiable, Operation, OperationKind, Path, Reverter, Revertible,
    operation::{Overwrite, SequenceInsert, SequenceMove, SequenceRemove},
    utils::{compact_ranges::compact_ranges, unique_index::unique_index},
};

/// Reconciles vectors whose elements carry a stable identity.
///
/// Every identity ends up in exactly one bucket: removed, inserted, moved, or
/// updated in place. Elements that survive are diffed recursively instead of
/// being replaced, and reordering shows up as a `Move` rather than a
/// remove and insert pair.
///
/// Operations are emitted in apply order:
/// 1. `Remove` of positions in `current` whose identity is gone,
/// 2. `Insert` of new identities at their final positions,
/// 3. `Move` of survivors from where they landed after the first two steps
///    to their final positions,
/// 4. nested updates addressed at final positions.
///
/// Duplicate identities make positions ambiguous, in which case the whole
/// vector is overwritten.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifiedSequenceDiffer;

impl<T> Differ<Vec<T>> for IdentifiedSequenceDiffer
where
    T: Identifiable + Revertible + PartialEq,
{
    fn diff(&self, current: &Vec<T>, previous: &Vec<T>) -> Vec<Operation<Vec<T>>> {
        if current == previous {
            return Vec::new();
        }

        let current_ids: Vec<T::Id> = current.iter().map(Identifiable::id).collect();
        let previous_ids: Vec<T::Id> = previous.iter().map(Identifiable::id).collect();

        let (Some(current_positions), Some(previous_positions)) = (
            unique_index(current_ids.iter().zip(0..)),
            unique_index(previous_ids.iter().zip(0..)),
        ) else {
            debug!("Duplicate identities in a reconciled sequence, overwriting it whole");
            return vec![Operation::new(
                OperationKind::Overwrite,
                Overwrite {
                    value: previous.clone(),
                },
            )];
        };

        let removals: Vec<usize> = current_ids
            .iter()
            .enumerate()
            .filter(|(_, id)| !previous_positions.contains_key(id))
            .map(|(index, _)| index)
            .collect();
        let insertions: Vec<(usize, T)> = previous_ids
            .iter()
            .enumerate()
            .filter(|(_, id)| !current_positions.contains_key(id))
            .map(|(index, _)| (index, previous[index].clone()))
            .collect();

        // After removing and inserting, survivors keep their relative order
        // from `current` and fill the positions `previous` did not get from
        // an insertion.
        let survivors = current_ids
            .iter()
            .filter(|id| previous_positions.contains_key(id));
        let survivor_slots =
            (0..previous.len()).filter(|index| current_positions.contains_key(&previous_ids[*index]));

        let mut moves = Vec::new();
        let mut updates = Vec::new();
        for (slot, id) in survivor_slots.zip(survivors) {
            let destination = previous_positions[id];
            if slot != destination {
                moves.push((slot, destination));
            }
            updates.push((destination, current_positions[id]));
        }
        updates.sort_unstable();

        let mut operations = Vec::new();
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
        if !moves.is_empty() {
            operations.push(Operation::new(OperationKind::Move, SequenceMove { moves }));
        }
        for (destination, origin) in updates {
            let element = Path::index(destination);
            operations.extend(
                Reverter::operations(&current[origin], &previous[destination])
                    .into_iter()
                    .map(|operation| operation.lift(&element)),
            );
        }

        operations
    }
}
