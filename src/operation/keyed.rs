use super::Patch;
use crate::{MapContainer, errors::PatchError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct KeyedRemove<Key> {
    pub keys: Vec<Key>,
}

impl<Map: MapContainer> Patch<Map> for KeyedRemove<Map::Key> {
    fn apply(&self, target: &mut Map) -> Result<(), PatchError> {
        for key in &self.keys {
            if target.delete(key).is_none() {
                return Err(PatchError::inapplicable(format!("key {key:?} is missing")));
            }
        }

        Ok(())
    }
}

/// Inserts new entries and replaces changed ones in a single batch.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct KeyedUpsert<Key, Value> {
    pub entries: Vec<(Key, Value)>,
}

impl<Map: MapContainer> Patch<Map> for KeyedUpsert<Map::Key, Map::Value> {
    fn apply(&self, target: &mut Map) -> Result<(), PatchError> {
        for (key, value) in &self.entries {
            target.upsert(key.clone(), value.clone());
        }

        Ok(())
    }
}

/// Re-keys values. All origins are vacated before any destination is
/// filled, so chains and swaps of keys are safe.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct KeyedMove<Key> {
    pub moves: Vec<(Key, Key)>,
}

impl<Key: PartialEq + std::fmt::Debug> KeyedMove<Key> {
    fn validate<Map: MapContainer<Key = Key>>(&self, target: &Map) -> Result<(), PatchError> {
        for (position, (origin, destination)) in self.moves.iter().enumerate() {
            let earlier = &self.moves[..position];
            if !target.has_key(origin) || earlier.iter().any(|(other, _)| other == origin) {
                return Err(PatchError::inapplicable(format!(
                    "no value to move under key {origin:?}"
                )));
            }

            let vacated = self.moves.iter().any(|(other, _)| other == destination);
            if (target.has_key(destination) && !vacated)
                || earlier.iter().any(|(_, other)| other == destination)
            {
                return Err(PatchError::inapplicable(format!(
                    "move destination {destination:?} is occupied"
                )));
            }
        }

        Ok(())
    }
}

impl<Map: MapContainer> Patch<Map> for KeyedMove<Map::Key> {
    fn apply(&self, target: &mut Map) -> Result<(), PatchError> {
        self.validate(target)?;

        let moving: Vec<_> = self
            .moves
            .iter()
            .filter_map(|(origin, destination)| {
                target.delete(origin).map(|value| (destination, value))
            })
            .collect();
        for (destination, value) in moving {
            target.upsert(destination.clone(), value);
        }

        Ok(())
    }
}
