use std::{fmt::Debug, ops::RangeInclusive};

use super::Patch;
use crate::{SequenceContainer, errors::PatchError};

/// Removes closed ranges of positions. Ranges are sorted ascending and
/// applied from the highest down, so earlier removals never shift the
/// positions of later ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SequenceRemove {
    pub ranges: Vec<RangeInclusive<usize>>,
}

impl<Container: SequenceContainer> Patch<Container> for SequenceRemove {
    fn apply(&self, target: &mut Container) -> Result<(), PatchError> {
        for range in self.ranges.iter().rev() {
            let length = target.element_count();
            if *range.end() >= length {
                return Err(PatchError::inapplicable(format!(
                    "range {}..={} is out of bounds for length {length}",
                    range.start(),
                    range.end()
                )));
            }
            target.remove_range(range.clone());
        }

        Ok(())
    }
}

/// Inserts elements at their final positions. Positions are distinct and
/// sorted ascending, which is also the order they are applied in.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SequenceInsert<Element> {
    pub items: Vec<(usize, Element)>,
}

impl<Container: SequenceContainer> Patch<Container> for SequenceInsert<Container::Element> {
    fn apply(&self, target: &mut Container) -> Result<(), PatchError> {
        for (index, element) in &self.items {
            let length = target.element_count();
            if *index > length {
                return Err(PatchError::inapplicable(format!(
                    "insertion index {index} is out of bounds for length {length}"
                )));
            }
            target.insert_at(*index, element.clone());
        }

        Ok(())
    }
}

/// Relocates elements of a vector. Each pair is `(origin, destination)`;
/// every moved element is taken out before any is put back, so the pairs
/// form a permutation over the touched positions and everything else stays
/// where it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SequenceMove {
    pub moves: Vec<(usize, usize)>,
}

impl SequenceMove {
    /// Checks that every origin exists and is taken once, and that every
    /// destination is vacated by some origin and filled once.
    fn validate(&self, length: usize) -> Result<(), PatchError> {
        let mut vacated = vec![false; length];
        for &(origin, _) in &self.moves {
            match vacated.get_mut(origin) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(PatchError::inapplicable(format!(
                        "no element to move at position {origin}"
                    )));
                }
            }
        }

        for &(_, destination) in &self.moves {
            match vacated.get_mut(destination) {
                Some(slot) if *slot => *slot = false,
                _ => {
                    return Err(PatchError::inapplicable(format!(
                        "move destination {destination} is not vacant"
                    )));
                }
            }
        }

        Ok(())
    }
}

impl<T: Debug + Send + Sync> Patch<Vec<T>> for SequenceMove {
    fn apply(&self, target: &mut Vec<T>) -> Result<(), PatchError> {
        self.validate(target.len())?;

        let mut slots: Vec<Option<T>> = std::mem::take(target).into_iter().map(Some).collect();
        let moving: Vec<_> = self
            .moves
            .iter()
            .filter_map(|&(origin, destination)| {
                slots[origin].take().map(|element| (destination, element))
            })
            .collect();
        for (destination, element) in moving {
            slots[destination] = Some(element);
        }

        *target = slots.into_iter().flatten().collect();
        Ok(())
    }
}
