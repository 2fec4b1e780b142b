//! Property-based round-trip tests for diffing and history.

use std::collections::{BTreeMap, HashMap, HashSet};

use proptest::prelude::*;
use reversion::{
    Fingerprint, Fingerprinter, HistoryConfig, HistoryController, Identifiable,
    IdentifiedKeyedDiffer, IdentifiedSequenceDiffer, LeafDiffer, OperationKind, Reverter,
    Revertible, diff, diff_with, field,
};

#[derive(Debug, Clone, PartialEq)]
struct Card {
    id: u8,
    rank: u8,
}

impl Identifiable for Card {
    type Id = u8;

    fn id(&self) -> u8 { self.id }
}

impl Fingerprint for Card {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        self.id.write_fingerprint(fingerprinter);
        self.rank.write_fingerprint(fingerprinter);
    }
}

impl Revertible for Card {
    fn describe(reverter: &mut Reverter<'_, Self>) {
        reverter.field(field!(Card, rank), LeafDiffer);
    }
}

/// Cards with distinct identities and arbitrary ranks, in arbitrary order.
fn hand_strategy() -> impl Strategy<Value = Vec<Card>> {
    prop::collection::btree_set(any::<u8>(), 0..12)
        .prop_flat_map(|ids| {
            let count = ids.len();
            (
                Just(ids.into_iter().collect::<Vec<_>>()).prop_shuffle(),
                prop::collection::vec(0..4_u8, count),
            )
        })
        .prop_map(|(ids, ranks)| {
            ids.into_iter()
                .zip(ranks)
                .map(|(id, rank)| Card { id, rank })
                .collect()
        })
}

proptest! {
    #[test]
    fn prop_text_round_trip(current in "[a-e]{0,24}", previous in "[a-e]{0,24}") {
        match diff(&current, &previous) {
            None => prop_assert_eq!(&current, &previous),
            Some(reversion) => prop_assert_eq!(reversion.reverted(&current).unwrap(), previous),
        }
    }

    #[test]
    fn prop_vector_round_trip(
        current in prop::collection::vec(0..6_i32, 0..20),
        previous in prop::collection::vec(0..6_i32, 0..20),
    ) {
        match diff(&current, &previous) {
            None => prop_assert_eq!(&current, &previous),
            Some(reversion) => {
                prop_assert!(reversion.len() <= 2);
                prop_assert_eq!(reversion.reverted(&current).unwrap(), previous);
            }
        }
    }

    #[test]
    fn prop_single_insertion_is_one_insert(
        items in prop::collection::vec(any::<u16>(), 0..20),
        position in any::<prop::sample::Index>(),
        extra in any::<u16>(),
    ) {
        let mut previous = items.clone();
        previous.insert(position.index(items.len() + 1), extra);

        let reversion = diff(&items, &previous).unwrap();
        prop_assert_eq!(reversion.len(), 1);
        prop_assert_eq!(reversion.operations()[0].kind(), OperationKind::Insert);
    }

    #[test]
    fn prop_set_round_trip(
        current in prop::collection::hash_set(0..16_u8, 0..10),
        previous in prop::collection::hash_set(0..16_u8, 0..10),
    ) {
        let reverted = diff(&current, &previous)
            .map_or_else(|| current.clone(), |reversion| reversion.reverted(&current).unwrap());
        prop_assert_eq!(reverted, previous);
    }

    #[test]
    fn prop_map_round_trip(
        current in prop::collection::btree_map(0..8_u8, "[xy]{1,2}", 0..6),
        previous in prop::collection::btree_map(0..8_u8, "[xy]{1,2}", 0..6),
    ) {
        let reverted = diff(&current, &previous)
            .map_or_else(|| current.clone(), |reversion| reversion.reverted(&current).unwrap());
        prop_assert_eq!(reverted, previous);
    }

    #[test]
    fn prop_identity_sequence_round_trip(current in hand_strategy(), previous in hand_strategy()) {
        let reverted = diff_with(&current, &previous, &IdentifiedSequenceDiffer)
            .map_or_else(|| current.clone(), |reversion| reversion.reverted(&current).unwrap());
        prop_assert_eq!(reverted, previous);
    }

    #[test]
    fn prop_reordering_never_removes(hand in hand_strategy(), seed in any::<prop::sample::Index>()) {
        let mut reordered = hand.clone();
        if !reordered.is_empty() {
            let pivot = seed.index(reordered.len());
            reordered.rotate_left(pivot);
        }

        if let Some(reversion) = diff_with(&hand, &reordered, &IdentifiedSequenceDiffer) {
            let kinds = reversion
                .operations()
                .iter()
                .map(reversion::Operation::kind)
                .collect::<HashSet<_>>();
            prop_assert_eq!(kinds, HashSet::from([OperationKind::Move]));
            prop_assert_eq!(reversion.reverted(&hand).unwrap(), reordered);
        }
    }

    #[test]
    fn prop_identity_map_round_trip(
        current in hand_strategy(),
        previous in hand_strategy(),
        current_keys in prop::collection::vec(any::<u16>(), 12),
        previous_keys in prop::collection::vec(any::<u16>(), 12),
    ) {
        let current: HashMap<u16, Card> = current_keys.into_iter().zip(current).collect();
        let previous: HashMap<u16, Card> = previous_keys.into_iter().zip(previous).collect();

        let reverted = diff_with(&current, &previous, &IdentifiedKeyedDiffer)
            .map_or_else(|| current.clone(), |reversion| reversion.reverted(&current).unwrap());
        prop_assert_eq!(reverted, previous);
    }

    #[test]
    fn prop_unrelated_value_is_refused(
        current in prop::collection::btree_map(0..8_u8, any::<bool>(), 1..6),
        previous in prop::collection::btree_map(0..8_u8, any::<bool>(), 0..6),
        other in prop::collection::btree_map(8..16_u8, any::<bool>(), 1..6),
    ) {
        let Some(reversion) = diff(&current, &previous) else {
            return Ok(());
        };
        prop_assume!(other.fingerprint() != current.fingerprint());

        let mut target: BTreeMap<u8, bool> = other.clone();
        prop_assert!(reversion.revert(&mut target).is_err());
        prop_assert_eq!(target, other);
    }

    #[test]
    fn prop_history_undo_redo_round_trip(
        versions in prop::collection::vec("[ab]{0,6}", 1..12),
    ) {
        let history = HistoryController::new(String::new(), HistoryConfig::default());
        let mut applied = vec![String::new()];
        for version in &versions {
            history.append(version.clone());
            if applied.last() != Some(version) {
                applied.push(version.clone());
            }
        }
        prop_assert_eq!(history.undo_count(), applied.len() - 1);

        for expected in applied.iter().rev().skip(1) {
            prop_assert_eq!(&history.undo().unwrap(), expected);
        }
        prop_assert!(!history.has_undo());

        for expected in applied.iter().skip(1) {
            prop_assert_eq!(&history.redo().unwrap(), expected);
        }
        prop_assert!(!history.has_redo());
        prop_assert_eq!(history.current(), versions.last().cloned().unwrap_or_default());
    }
}
